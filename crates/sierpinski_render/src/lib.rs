//! wgpu renderer for the Sierpinski scene
//!
//! This crate provides the GPU side of the [`Renderer`](sierpinski_core::Renderer)
//! collaborator: immediate-mode calls are recorded into vertex lists, lit in
//! a WGSL shader, and drawn over a textured ground plane.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`recorder::FrameRecorder`] - CPU transform stack and vertex recording
//! - [`pipeline::RenderPipeline`] - line, lit triangle and ground pipelines
//! - [`ground::GroundTexture`] - decoded ground image with a white fallback

pub mod context;
pub mod pipeline;
pub mod recorder;
pub mod ground;
pub mod indicator;

pub use context::{RenderContext, ContextError};
pub use recorder::FrameRecorder;
pub use ground::{GroundTexture, GroundMesh, TextureError};
pub use indicator::SphereMesh;
