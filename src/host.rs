use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::controller::{HostHandle, InputEvent, OrbitController, ViewpointController};
use crate::error::InvalidArgument;
use crate::frame::FrameContext;
use crate::globe::Globe;
use crate::layer::LayerList;
use crate::pipeline::{BasicFramePipeline, FramePipeline, SurfaceState};
use crate::stats::FrameStatistics;
use crate::viewpoint::{BasicViewpoint, Viewpoint};
use crate::viewport::Viewport;

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Outbound scheduling contract implemented by the platform layer
///
/// The host calls this at most once per frame cycle, and only when drawing
/// signaled that another frame is needed. Requests are fire-and-forget; the
/// host environment coalesces duplicates into at most one pending frame.
pub trait FrameScheduler: Send + Sync {
    fn request_frame(&self);
}

/// Render host - owns the scene state and runs the per-frame sequence
///
/// The hosting platform drives it through three lifecycle calls:
/// [`on_surface_created`](Self::on_surface_created),
/// [`on_surface_resized`](Self::on_surface_resized) and
/// [`on_frame`](Self::on_frame). Frames are produced on demand only; no
/// mutator schedules one implicitly, and every state change that should
/// become visible needs an explicit frame request from the caller.
///
/// All methods take `&mut self`, which confines mutation and the frame cycle
/// to one thread at a time by construction. Only the [`FrameScheduler`]
/// handle may be poked from elsewhere.
pub struct RenderHost {
    id: u64,
    scheduler: Arc<dyn FrameScheduler>,
    globe: Arc<Globe>,
    layers: Arc<LayerList>,
    vertical_exaggeration: f64,
    viewpoint: Box<dyn Viewpoint>,
    controller: Box<dyn ViewpointController>,
    pipeline: Box<dyn FramePipeline>,
    viewport: Viewport,
    surface_state: SurfaceState,
    frame_context: FrameContext,
}

impl RenderHost {
    /// Create a host with default collaborators: WGS84 globe, empty layer
    /// list, basic viewpoint with an attached orbit controller, and the
    /// basic drawing pipeline
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        let id = NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed);
        let globe = Arc::new(Globe::wgs84());
        let layers = Arc::new(LayerList::new());
        let frame_context = FrameContext::new(globe.clone(), layers.clone());

        let mut controller: Box<dyn ViewpointController> = Box::new(OrbitController::new());
        controller
            .attach(HostHandle::new(id, &scheduler))
            .expect("a newly constructed controller is detached");

        log::debug!("render host {id} created");
        Self {
            id,
            scheduler,
            globe,
            layers,
            vertical_exaggeration: 1.0,
            viewpoint: Box::new(BasicViewpoint::new()),
            controller,
            pipeline: Box::new(BasicFramePipeline::new()),
            viewport: Viewport::default(),
            surface_state: SurfaceState::frame_defaults(),
            frame_context,
        }
    }

    /// Identity of this host, matched by controller host handles
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    /// Replace the globe model; takes effect at the next frame cycle
    pub fn set_globe(&mut self, globe: Arc<Globe>) {
        self.globe = globe;
    }

    pub fn layers(&self) -> &LayerList {
        &self.layers
    }

    /// Replace the layer list as a whole; insertion order is paint order
    pub fn set_layers(&mut self, layers: Arc<LayerList>) {
        self.layers = layers;
    }

    pub fn vertical_exaggeration(&self) -> f64 {
        self.vertical_exaggeration
    }

    /// Set the terrain height scale; must be a positive finite number
    pub fn set_vertical_exaggeration(
        &mut self,
        vertical_exaggeration: f64,
    ) -> Result<(), InvalidArgument> {
        if !vertical_exaggeration.is_finite() || vertical_exaggeration <= 0.0 {
            return Err(InvalidArgument::new(
                "vertical_exaggeration",
                "must be a positive finite number",
            ));
        }
        self.vertical_exaggeration = vertical_exaggeration;
        Ok(())
    }

    pub fn viewpoint(&self) -> &dyn Viewpoint {
        self.viewpoint.as_ref()
    }

    pub fn viewpoint_mut(&mut self) -> &mut dyn Viewpoint {
        self.viewpoint.as_mut()
    }

    pub fn set_viewpoint(&mut self, viewpoint: Box<dyn Viewpoint>) {
        self.viewpoint = viewpoint;
    }

    pub fn viewpoint_controller(&self) -> &dyn ViewpointController {
        self.controller.as_ref()
    }

    /// Swap the viewpoint controller
    ///
    /// Rejects a controller that is attached to another host and leaves the
    /// current one in place. On success the old controller ends up detached
    /// and the new one attached to this host; the sequence is not observable
    /// from outside, so at no point do two controllers appear attached.
    pub fn set_viewpoint_controller(
        &mut self,
        mut controller: Box<dyn ViewpointController>,
    ) -> Result<(), InvalidArgument> {
        if controller.is_attached() {
            return Err(InvalidArgument::new(
                "controller",
                "controller is already attached to a host",
            ));
        }

        // Attach before touching the stored controller so a failure cannot
        // leave the host without one
        controller.attach(self.handle())?;
        self.controller.detach();
        self.controller = controller;
        Ok(())
    }

    pub fn frame_pipeline(&self) -> &dyn FramePipeline {
        self.pipeline.as_ref()
    }

    /// Replace the drawing pipeline; statistics follow the new pipeline
    pub fn set_frame_pipeline(&mut self, pipeline: Box<dyn FramePipeline>) {
        self.pipeline = pipeline;
    }

    /// Statistics of the currently attached drawing pipeline
    pub fn frame_statistics(&self) -> &FrameStatistics {
        self.pipeline.frame_statistics()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// GPU state the current surface was configured with
    pub fn surface_state(&self) -> &SurfaceState {
        &self.surface_state
    }

    /// Handle a controller can use to identify this host and request frames
    fn handle(&self) -> HostHandle {
        HostHandle::new(self.id, &self.scheduler)
    }

    /// The surface is ready; establish the drawing state
    ///
    /// Safe to call again after a context loss: the state is rebuilt from
    /// defaults each time, never accumulated.
    pub fn on_surface_created(&mut self) {
        self.surface_state = SurfaceState::frame_defaults();
        log::debug!("host {}: surface created", self.id);
    }

    /// The surface changed size; the viewport follows the full new area
    ///
    /// Does not schedule a frame. The host environment requests one when it
    /// wants the resize to become visible.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        log::debug!("host {}: surface resized to {width}x{height}", self.id);
    }

    /// Run one frame cycle
    ///
    /// Prepares the frame context from the host state as of this instant,
    /// lets the viewpoint stamp its view state, hands the context to the
    /// drawing pipeline, and finally forwards a render request - at most one
    /// per cycle - to the host environment if drawing raised the flag.
    pub fn on_frame(&mut self) {
        self.prepare_to_draw_frame();
        self.viewpoint.apply_state(&mut self.frame_context);
        self.pipeline.draw_frame(&mut self.frame_context);

        // The flag on the context decouples drawing code from the host; the
        // host environment deduplicates pending requests.
        if self.frame_context.is_render_requested() {
            log::trace!("host {}: follow-up frame requested", self.id);
            self.scheduler.request_frame();
        }
    }

    /// Route one input gesture to the attached controller
    pub fn on_input(&mut self, event: InputEvent) {
        self.controller.on_event(event, self.viewpoint.as_mut());
    }

    fn prepare_to_draw_frame(&mut self) {
        let context = &mut self.frame_context;
        context.reset();
        context.set_globe(self.globe.clone());
        context.set_layers(self.layers.clone());
        context.set_vertical_exaggeration(self.vertical_exaggeration);
        context.set_viewport(self.viewport);
    }
}
