pub mod clipping;
pub mod depth;
pub mod edge;
pub mod framebuffer;
/// Software rasterization pipeline
/// Frustum clipping, perspective-correct interpolation and z-buffering
pub mod rasterizer;
pub mod texture;

pub use clipping::{clip_triangle, ClipVertex, Frustum, Plane};
pub use depth::DepthBuffer;
pub use edge::EdgePrecision;
pub use framebuffer::Framebuffer;
pub use rasterizer::{Rasterizer, RenderMode};
pub use texture::Texture;
