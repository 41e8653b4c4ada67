//! Immediate-mode calls collected into GPU vertex lists
//!
//! [`FrameRecorder`] is the wgpu-side [`Renderer`]. It applies the transform
//! stack on the CPU and sorts vertices into one list per pipeline, which the
//! render pipeline uploads once per frame.

use sierpinski_core::{DrawSurface, LightRig, Renderer, Topology};
use sierpinski_math::mat4::{self, Mat4};
use sierpinski_math::Vec3;

use crate::ground::GroundMesh;
use crate::indicator::SphereMesh;
use crate::pipeline::{SceneUniforms, Vertex3D};

/// Collects one frame of drawing commands
pub struct FrameRecorder {
    /// Line-list vertices (unlit)
    pub lines: Vec<Vertex3D>,
    /// Triangle-list vertices (lit, alpha blended)
    pub triangles: Vec<Vertex3D>,
    /// Ground vertices (lit, textured)
    pub ground: Vec<Vertex3D>,
    lights: Option<LightRig>,
    transform: Mat4,
    stack: Vec<Mat4>,
    topology: Option<Topology>,
    color: [f32; 4],
    normal: Vec3,
    ground_mesh: GroundMesh,
    sphere: SphereMesh,
}

impl FrameRecorder {
    /// Create a recorder with the default ground grid
    pub fn new() -> Self {
        Self::with_ground(GroundMesh::default())
    }

    /// Create a recorder with a custom ground grid
    pub fn with_ground(ground_mesh: GroundMesh) -> Self {
        Self {
            lines: Vec::new(),
            triangles: Vec::new(),
            ground: Vec::new(),
            lights: None,
            transform: mat4::IDENTITY,
            stack: Vec::new(),
            topology: None,
            color: [1.0; 4],
            normal: Vec3::ZERO,
            ground_mesh,
            sphere: SphereMesh::default(),
        }
    }

    /// Reset for a new frame, keeping allocations
    pub fn clear(&mut self) {
        self.lines.clear();
        self.triangles.clear();
        self.ground.clear();
        self.lights = None;
        self.transform = mat4::IDENTITY;
        self.stack.clear();
        self.topology = None;
        self.color = [1.0; 4];
        self.normal = Vec3::ZERO;
    }

    /// Lights configured this frame, if any
    pub fn lights(&self) -> Option<&LightRig> {
        self.lights.as_ref()
    }

    /// Uniforms for this frame
    ///
    /// With no lights configured only the ambient term is applied.
    pub fn uniforms(&self, view_proj: Mat4) -> SceneUniforms {
        match &self.lights {
            Some(rig) => SceneUniforms::new(view_proj, rig),
            None => SceneUniforms {
                view_proj,
                ..SceneUniforms::default()
            },
        }
    }

    /// Current model transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    fn make_vertex(&self, position: Vec3, normal: Vec3, color: [f32; 4], uv: [f32; 2]) -> Vertex3D {
        Vertex3D {
            position: mat4::transform_point(&self.transform, position).to_array(),
            normal: mat4::transform_vector(&self.transform, normal)
                .normalized()
                .to_array(),
            color,
            uv,
        }
    }

    fn post_multiply(&mut self, m: Mat4) {
        self.transform = mat4::mul(&self.transform, &m);
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for FrameRecorder {
    fn begin(&mut self, topology: Topology) {
        if self.topology.is_some() {
            log::warn!("begin() called inside an open batch");
        }
        self.topology = Some(topology);
    }

    fn end(&mut self) {
        if self.topology.take().is_none() {
            log::warn!("end() called without a matching begin()");
        }
    }

    fn color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }

    fn normal(&mut self, normal: Vec3) {
        self.normal = normal;
    }

    fn vertex(&mut self, position: Vec3) {
        let Some(topology) = self.topology else {
            log::warn!("vertex() called outside a batch; ignored");
            return;
        };
        let v = self.make_vertex(position, self.normal, self.color, [0.0; 2]);
        match topology {
            Topology::Lines => self.lines.push(v),
            Topology::Triangles => self.triangles.push(v),
        }
    }

    fn push_matrix(&mut self) {
        self.stack.push(self.transform);
    }

    fn pop_matrix(&mut self) {
        match self.stack.pop() {
            Some(m) => self.transform = m,
            None => log::warn!("pop_matrix() on an empty transform stack"),
        }
    }

    fn translate(&mut self, offset: Vec3) {
        self.post_multiply(mat4::translation(offset));
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.post_multiply(mat4::rotation_axis_angle(degrees, axis));
    }

    fn scale(&mut self, factors: Vec3) {
        self.post_multiply(mat4::scaling(factors));
    }
}

impl Renderer for FrameRecorder {
    fn configure_lights(&mut self, rig: &LightRig) {
        self.lights = Some(*rig);
    }

    fn draw_ground(&mut self) {
        let transform = self.transform;
        self.ground.extend(self.ground_mesh.vertices.iter().map(|v| Vertex3D {
            position: mat4::transform_point(&transform, Vec3::from_array(v.position)).to_array(),
            normal: mat4::transform_vector(&transform, Vec3::from_array(v.normal))
                .normalized()
                .to_array(),
            ..*v
        }));
    }

    fn draw_light_indicator(&mut self, rgba: [f32; 4]) {
        let vertices: Vec<Vertex3D> = self
            .sphere
            .positions
            .iter()
            .map(|&p| self.make_vertex(p, p, rgba, [0.0; 2]))
            .collect();
        self.triangles.extend(vertices);
    }
}
