//! WebGPU rendering module
//!
//! The scene is a set of flat-shaded boxes rebuilt into one vertex buffer
//! per frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::SceneMesh;
