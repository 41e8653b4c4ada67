//! GPU-compatible data types for the scene pipelines
//!
//! These types are designed to match the shader layouts in `scene.wgsl`
//! exactly. All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use sierpinski_core::{LightRig, LightSlot};
use sierpinski_math::mat4::{self, Mat4};

/// A vertex as consumed by every scene pipeline
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex3D {
    /// World-space position
    pub position: [f32; 3],
    /// World-space normal (zero for unlit geometry)
    pub normal: [f32; 3],
    /// RGBA color
    pub color: [f32; 4],
    /// Texture coordinates (ground only)
    pub uv: [f32; 2],
}

impl Default for Vertex3D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            color: [1.0; 4],
            uv: [0.0; 2],
        }
    }
}

/// One light slot
/// Layout: 48 bytes (must match scene.wgsl Light)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz + w (1 = point, 0 = directional)
    pub position: [f32; 4],
    pub color: [f32; 4],
    /// constant, linear, quadratic attenuation + enabled flag (1.0 / 0.0)
    pub attenuation: [f32; 4],
}

impl From<&LightSlot> for LightUniform {
    fn from(slot: &LightSlot) -> Self {
        let [c, l, q] = slot.attenuation;
        Self {
            position: slot.position,
            color: slot.color,
            attenuation: [c, l, q, if slot.enabled { 1.0 } else { 0.0 }],
        }
    }
}

/// Scene uniforms shared by all pipelines
/// Layout: 176 bytes total (must match scene.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: Mat4,
    /// Point light (slot 0) and directional light (slot 1), 96 bytes
    pub lights: [LightUniform; 2],
    /// x = ambient strength, rest padding (16 bytes)
    pub ambient: [f32; 4],
}

impl SceneUniforms {
    /// Build uniforms from the camera matrix and the frame's light rig
    pub fn new(view_proj: Mat4, rig: &LightRig) -> Self {
        Self {
            view_proj,
            lights: [LightUniform::from(&rig.point), LightUniform::from(&rig.directional)],
            ambient: [rig.ambient, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            lights: [LightUniform::default(); 2],
            ambient: [0.2, 0.0, 0.0, 0.0],
        }
    }
}
