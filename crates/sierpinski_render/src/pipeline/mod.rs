//! Rendering pipeline components
//!
//! Three render pipelines share one shader module and one uniform buffer:
//! unlit lines for the wireframe, lit triangles for faces and the light
//! indicator, and a textured pipeline for the ground.

pub mod types;
pub mod render_pipeline;

// Re-export types
pub use types::{Vertex3D, LightUniform, SceneUniforms};

// Re-export pipelines
pub use render_pipeline::{RenderPipeline, VertexBuffer};
