//! WebGPU rendering module
//!
//! The scene is rebuilt as a flat triangle list every frame and drawn with a
//! single alpha-blended pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Backdrop, SceneStyle, build_scene};
pub use vertex::Vertex;
