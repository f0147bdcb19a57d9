use std::sync::Arc;

use crate::frame::FrameContext;
use crate::stats::FrameStatistics;

/// Fixed-function GPU state established when the rendering surface comes up
///
/// Rebuilt from defaults on every surface creation, so a surface recreated
/// after a context loss starts from the same state rather than accumulating
/// leftovers.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    /// Source-over compositing of premultiplied colors
    pub blend: wgpu::BlendState,
    pub cull_mode: Option<wgpu::Face>,
    pub depth_compare: wgpu::CompareFunction,
    pub depth_write_enabled: bool,
}

impl SurfaceState {
    /// The state every frame is drawn under
    pub fn frame_defaults() -> Self {
        Self {
            blend: wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            cull_mode: Some(wgpu::Face::Back),
            depth_compare: wgpu::CompareFunction::LessEqual,
            depth_write_enabled: true,
        }
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::frame_defaults()
    }
}

/// Frame drawing pipeline - consumes a prepared frame context and draws it
///
/// Implementations accumulate [`FrameStatistics`] across frames; a host
/// exposes whichever pipeline is currently attached, so swapping pipelines
/// swaps the visible statistics with them.
pub trait FramePipeline {
    /// Draw one frame from the prepared context
    ///
    /// May set the context's render-requested flag when a follow-up frame is
    /// needed, e.g. because a resource was not ready yet.
    fn draw_frame(&mut self, context: &mut FrameContext);

    /// Statistics accumulated by this pipeline
    fn frame_statistics(&self) -> &FrameStatistics;
}

/// Default pipeline: draws every enabled layer in paint order
#[derive(Default)]
pub struct BasicFramePipeline {
    stats: FrameStatistics,
}

impl BasicFramePipeline {
    pub fn new() -> Self {
        Self {
            stats: FrameStatistics::new(),
        }
    }
}

impl FramePipeline for BasicFramePipeline {
    fn draw_frame(&mut self, context: &mut FrameContext) {
        self.stats.begin_frame();

        // Clone the list handle so layers can mutate the context while the
        // paint order is walked
        let layers = Arc::clone(context.layer_handle());
        for layer in layers.iter() {
            if layer.is_enabled() {
                layer.render(context);
            }
        }

        self.stats.end_frame();
        log::trace!(
            "frame {} drew {} layers in {:?}",
            self.stats.frame_count(),
            layers.len(),
            self.stats.last_frame_time()
        );
    }

    fn frame_statistics(&self) -> &FrameStatistics {
        &self.stats
    }
}
