use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::InvalidArgument;
use crate::host::FrameScheduler;
use crate::viewpoint::Viewpoint;

/// Platform-free input gesture delivered to a viewpoint controller
///
/// Decoding window-system events into these is the platform layer's job;
/// the core only applies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Drag across the surface, in pixels
    Pan { dx: f64, dy: f64 },
    /// Zoom toward (positive) or away from (negative) the surface
    Zoom { amount: f64 },
    /// Turn the view about the local vertical, in degrees
    Rotate { degrees: f64 },
    /// Pitch the view away from the local vertical, in degrees
    Tilt { degrees: f64 },
}

/// Non-owning handle a controller keeps to its hosting render host
///
/// Holds only what the controller is allowed to do with its host: identify
/// it and ask it for another frame. The scheduler reference is weak, so a
/// controller can never keep a dropped host environment alive.
#[derive(Clone)]
pub struct HostHandle {
    host_id: u64,
    scheduler: Weak<dyn FrameScheduler>,
}

impl HostHandle {
    /// Mint a handle; render hosts do this when attaching a controller
    pub fn new(host_id: u64, scheduler: &Arc<dyn FrameScheduler>) -> Self {
        Self {
            host_id,
            scheduler: Arc::downgrade(scheduler),
        }
    }

    /// Identity of the host this handle points at
    pub fn host_id(&self) -> u64 {
        self.host_id
    }

    /// Ask the host environment to schedule a frame
    ///
    /// Returns false when the host environment is already gone.
    pub fn request_frame(&self) -> bool {
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                scheduler.request_frame();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandle")
            .field("host_id", &self.host_id)
            .finish()
    }
}

/// Viewpoint controller - applies input gestures to a host's viewpoint
///
/// A controller is either detached or attached to exactly one host.
/// `attach` is only valid while detached; the render host sequences
/// detach-then-attach when controllers are swapped, so no outside observer
/// ever sees two controllers attached to one host.
pub trait ViewpointController {
    /// Bind this controller to a host; fails if already attached
    fn attach(&mut self, host: HostHandle) -> Result<(), InvalidArgument>;

    /// Unbind from the current host, returning the handle if there was one
    fn detach(&mut self) -> Option<HostHandle>;

    /// Handle of the host this controller is attached to, if any
    fn attached_host(&self) -> Option<&HostHandle>;

    fn is_attached(&self) -> bool {
        self.attached_host().is_some()
    }

    /// Apply one gesture to the host's viewpoint
    ///
    /// Implementations request a frame through the attached host handle when
    /// the gesture changed anything visible.
    fn on_event(&mut self, event: InputEvent, viewpoint: &mut dyn Viewpoint);
}

/// Default controller: orbits the globe, zooms along the vertical
pub struct OrbitController {
    host: Option<HostHandle>,
}

/// Degrees of travel per pixel of drag at the reference altitude
const PAN_DEGREES_PER_PIXEL: f64 = 0.05;
/// Altitude at which the pan rate is exactly `PAN_DEGREES_PER_PIXEL`
const PAN_REFERENCE_ALTITUDE: f64 = 1.0e7;
/// Fraction of altitude consumed per unit of zoom
const ZOOM_RATE: f64 = 0.1;

impl OrbitController {
    pub fn new() -> Self {
        Self { host: None }
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewpointController for OrbitController {
    fn attach(&mut self, host: HostHandle) -> Result<(), InvalidArgument> {
        if self.host.is_some() {
            return Err(InvalidArgument::new(
                "host",
                "controller is already attached to a host",
            ));
        }
        log::debug!("controller attached to host {}", host.host_id());
        self.host = Some(host);
        Ok(())
    }

    fn detach(&mut self) -> Option<HostHandle> {
        if let Some(host) = &self.host {
            log::debug!("controller detached from host {}", host.host_id());
        }
        self.host.take()
    }

    fn attached_host(&self) -> Option<&HostHandle> {
        self.host.as_ref()
    }

    fn on_event(&mut self, event: InputEvent, viewpoint: &mut dyn Viewpoint) {
        match event {
            InputEvent::Pan { dx, dy } => {
                // Pan slows as the eye descends so a drag covers roughly the
                // same on-screen distance at any altitude
                let rate =
                    PAN_DEGREES_PER_PIXEL * (viewpoint.altitude() / PAN_REFERENCE_ALTITUDE);
                viewpoint.set_latitude(viewpoint.latitude() + dy * rate);
                viewpoint.set_longitude(viewpoint.longitude() - dx * rate);
            }
            InputEvent::Zoom { amount } => {
                viewpoint.set_altitude(viewpoint.altitude() * (1.0 - amount * ZOOM_RATE));
            }
            InputEvent::Rotate { degrees } => {
                viewpoint.set_heading(viewpoint.heading() + degrees);
            }
            InputEvent::Tilt { degrees } => {
                viewpoint.set_tilt(viewpoint.tilt() + degrees);
            }
        }

        if let Some(host) = &self.host {
            host.request_frame();
        }
    }
}
