pub mod light;
/// Scene content: triangle meshes, OBJ loading, lighting
pub mod mesh;
pub mod wavefront;

pub use light::{apply_intensity, DirectionalLight};
pub use mesh::{Face, Mesh};
pub use wavefront::{load_obj, WavefrontError};
