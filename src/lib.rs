pub mod controller;
pub mod error;
pub mod frame;
pub mod globe;
pub mod host;
pub mod layer;
pub mod pipeline;
pub mod stats;
pub mod viewpoint;
pub mod viewport;

pub use controller::{HostHandle, InputEvent, OrbitController, ViewpointController};
pub use error::InvalidArgument;
pub use frame::{FrameContext, ViewUniform};
pub use globe::{Globe, WGS84_EQUATORIAL_RADIUS, WGS84_INVERSE_FLATTENING};
pub use host::{FrameScheduler, RenderHost};
pub use layer::{Layer, LayerList};
pub use pipeline::{BasicFramePipeline, FramePipeline, SurfaceState};
pub use stats::FrameStatistics;
pub use viewpoint::{BasicViewpoint, Viewpoint};
pub use viewport::Viewport;
