use std::cell::Cell;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use globe_viewer::{
    FrameContext, FrameScheduler, InputEvent, Layer, LayerList, RenderHost,
};

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

const PAN_STEP_PIXELS: f64 = 20.0;
const ZOOM_STEP: f64 = 1.0;
const ROTATE_STEP_DEGREES: f64 = 5.0;
const TILT_STEP_DEGREES: f64 = 5.0;

/// Forwards the host's frame requests to the window system
struct WindowScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&self) {
        // winit coalesces duplicate redraw requests into one
        self.window.request_redraw();
    }
}

/// Stand-in for layers whose resources arrive asynchronously: the first
/// frame draws nothing and asks for a follow-up once
struct WarmupLayer {
    warmed_up: Cell<bool>,
}

impl WarmupLayer {
    fn new() -> Self {
        Self {
            warmed_up: Cell::new(false),
        }
    }
}

impl Layer for WarmupLayer {
    fn display_name(&self) -> &str {
        "Warmup"
    }

    fn render(&self, context: &mut FrameContext) {
        if !self.warmed_up.replace(true) {
            log::info!("warmup layer not ready, requesting a follow-up frame");
            context.request_render();
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    host: Option<RenderHost>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            host: None,
        }
    }

    fn gesture_for(key: KeyCode) -> Option<InputEvent> {
        match key {
            KeyCode::ArrowUp => Some(InputEvent::Pan {
                dx: 0.0,
                dy: PAN_STEP_PIXELS,
            }),
            KeyCode::ArrowDown => Some(InputEvent::Pan {
                dx: 0.0,
                dy: -PAN_STEP_PIXELS,
            }),
            KeyCode::ArrowLeft => Some(InputEvent::Pan {
                dx: -PAN_STEP_PIXELS,
                dy: 0.0,
            }),
            KeyCode::ArrowRight => Some(InputEvent::Pan {
                dx: PAN_STEP_PIXELS,
                dy: 0.0,
            }),
            KeyCode::Equal => Some(InputEvent::Zoom { amount: ZOOM_STEP }),
            KeyCode::Minus => Some(InputEvent::Zoom { amount: -ZOOM_STEP }),
            KeyCode::KeyQ => Some(InputEvent::Rotate {
                degrees: -ROTATE_STEP_DEGREES,
            }),
            KeyCode::KeyE => Some(InputEvent::Rotate {
                degrees: ROTATE_STEP_DEGREES,
            }),
            KeyCode::KeyR => Some(InputEvent::Tilt {
                degrees: TILT_STEP_DEGREES,
            }),
            KeyCode::KeyF => Some(InputEvent::Tilt {
                degrees: -TILT_STEP_DEGREES,
            }),
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Globe Viewer")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let scheduler = Arc::new(WindowScheduler {
                window: window.clone(),
            });
            let mut host = RenderHost::new(scheduler);

            let mut layers = LayerList::new();
            layers.add(Box::new(WarmupLayer::new()));
            host.set_layers(Arc::new(layers));

            host.on_surface_created();
            let size = window.inner_size();
            host.on_surface_resized(size.width, size.height);
            window.request_redraw();

            self.window = Some(window);
            self.host = Some(host);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(host), Some(window)) = (&mut self.host, &self.window) {
                    host.on_surface_resized(size.width, size.height);
                    // Resizing never schedules a frame by itself
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                if let (Some(host), Some(gesture)) = (&mut self.host, App::gesture_for(key)) {
                    host.on_input(gesture);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(host) = &mut self.host {
                    host.on_frame();
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    // Frames are produced on demand, never on a clock
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    println!("Globe Viewer - arrows pan, +/- zoom, Q/E rotate, R/F tilt, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
