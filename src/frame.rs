use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::globe::Globe;
use crate::layer::LayerList;
use crate::viewport::Viewport;

/// Per-frame view state as a GPU uniform buffer payload
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniform {
    pub modelview_projection: [[f32; 4]; 4],
    pub eye_position: [f32; 3],
    pub vertical_exaggeration: f32,
}

/// Frame context - the mutable aggregate threaded through one frame cycle
///
/// A single long-lived instance is owned by the render host and loaned to
/// collaborators for the duration of one frame cycle. It is `reset` at the
/// start of every frame and repopulated with the host's current scene state
/// before any collaborator reads it; its content is only valid until the
/// cycle ends. Collaborators must not hold on to it across frames.
///
/// The globe and layer list are shared handles, so restamping them every
/// frame is a pointer copy, not an allocation.
pub struct FrameContext {
    globe: Arc<Globe>,
    layers: Arc<LayerList>,
    vertical_exaggeration: f64,
    viewport: Viewport,
    modelview: Mat4,
    projection: Mat4,
    modelview_projection: Mat4,
    eye_position: Vec3,
    render_requested: bool,
}

impl FrameContext {
    /// Create a context bound to the host's initial scene state
    pub fn new(globe: Arc<Globe>, layers: Arc<LayerList>) -> Self {
        Self {
            globe,
            layers,
            vertical_exaggeration: 1.0,
            viewport: Viewport::default(),
            modelview: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            modelview_projection: Mat4::IDENTITY,
            eye_position: Vec3::ZERO,
            render_requested: false,
        }
    }

    /// Clear transient per-frame state
    ///
    /// Only the render-requested flag is transient; the caller repopulates
    /// the scene fields immediately afterwards as part of frame preparation.
    pub fn reset(&mut self) {
        self.render_requested = false;
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    /// Shared handle to the globe, for collaborators that keep one per frame
    pub fn globe_handle(&self) -> &Arc<Globe> {
        &self.globe
    }

    pub fn set_globe(&mut self, globe: Arc<Globe>) {
        self.globe = globe;
    }

    pub fn layers(&self) -> &LayerList {
        &self.layers
    }

    /// Shared handle to the layer list; the drawing pipeline clones this to
    /// iterate paint order while mutating the context
    pub fn layer_handle(&self) -> &Arc<LayerList> {
        &self.layers
    }

    pub fn set_layers(&mut self, layers: Arc<LayerList>) {
        self.layers = layers;
    }

    pub fn vertical_exaggeration(&self) -> f64 {
        self.vertical_exaggeration
    }

    pub fn set_vertical_exaggeration(&mut self, vertical_exaggeration: f64) {
        self.vertical_exaggeration = vertical_exaggeration;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Stamp the viewpoint's matrices and eye position into this frame
    pub fn set_view_state(&mut self, modelview: Mat4, projection: Mat4, eye_position: Vec3) {
        self.modelview = modelview;
        self.projection = projection;
        self.modelview_projection = projection * modelview;
        self.eye_position = eye_position;
    }

    pub fn modelview(&self) -> Mat4 {
        self.modelview
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn modelview_projection(&self) -> Mat4 {
        self.modelview_projection
    }

    pub fn eye_position(&self) -> Vec3 {
        self.eye_position
    }

    /// Ask the host to schedule one more frame after this one
    ///
    /// This is the only signal drawing code has toward the host, which keeps
    /// layers and pipelines free of any direct host reference. Unready
    /// resources are reported this way, never as errors.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    pub fn is_render_requested(&self) -> bool {
        self.render_requested
    }

    /// Snapshot the stamped view state for upload to a uniform buffer
    pub fn view_uniform(&self) -> ViewUniform {
        ViewUniform {
            modelview_projection: self.modelview_projection.to_cols_array_2d(),
            eye_position: self.eye_position.to_array(),
            vertical_exaggeration: self.vertical_exaggeration as f32,
        }
    }
}
