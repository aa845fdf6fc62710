pub mod camera;
pub mod perf;
/// CPU triangle renderer - frustum clipping, perspective-correct
/// texture mapping and z-buffering over swappable edge arithmetic
pub mod rendering;
pub mod scene;

pub use camera::{Camera, CameraController};
pub use perf::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
pub use rendering::{DepthBuffer, EdgePrecision, Framebuffer, Rasterizer, RenderMode, Texture};
pub use scene::{DirectionalLight, Mesh};
