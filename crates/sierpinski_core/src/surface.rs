//! Abstract drawing collaborator
//!
//! The traversal never talks to a graphics API directly. It submits
//! immediate-mode batches to a [`DrawSurface`]; the scene-level pieces that
//! have no algorithmic content (lights, ground, light indicator) go through
//! the [`Renderer`] extension.

use sierpinski_math::Vec3;

use crate::lighting::LightRig;

/// Primitive topology of a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every two vertices form one line segment
    Lines,
    /// Every three vertices form one triangle
    Triangles,
}

/// Immediate-mode drawing surface with a transform stack
///
/// Vertices are submitted between [`begin`](DrawSurface::begin) and
/// [`end`](DrawSurface::end) and pick up the current color and normal.
/// The current transform (built with translate/rotate/scale and saved with
/// push/pop) applies to every vertex submitted afterwards.
pub trait DrawSurface {
    /// Start a batch of the given topology
    fn begin(&mut self, topology: Topology);

    /// Finish the current batch
    fn end(&mut self);

    /// Set the color for subsequent vertices (RGBA)
    fn color(&mut self, rgba: [f32; 4]);

    /// Set the normal for subsequent vertices
    fn normal(&mut self, normal: Vec3);

    /// Submit a vertex
    fn vertex(&mut self, position: Vec3);

    /// Save the current transform
    fn push_matrix(&mut self);

    /// Restore the most recently saved transform
    fn pop_matrix(&mut self);

    /// Post-multiply the current transform by a translation
    fn translate(&mut self, offset: Vec3);

    /// Post-multiply the current transform by a rotation of `degrees` about `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3);

    /// Post-multiply the current transform by a scale
    fn scale(&mut self, factors: Vec3);
}

/// Scene-level drawing collaborator
pub trait Renderer: DrawSurface {
    /// Apply the light slots for this frame
    fn configure_lights(&mut self, rig: &LightRig);

    /// Draw the ground plane (textured when a texture is available)
    fn draw_ground(&mut self);

    /// Draw a unit sphere marking a light under the current transform
    fn draw_light_indicator(&mut self, rgba: [f32; 4]);
}

/// A surface that counts primitives instead of drawing them
///
/// Partial batches (a trailing vertex that does not complete a primitive)
/// are not counted.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveCounter {
    /// Completed line segments
    pub lines: usize,
    /// Completed triangles
    pub triangles: usize,
    /// Number of `begin`/`end` batches
    pub batches: usize,
    /// Ground draw calls
    pub ground_draws: usize,
    /// Light indicator draw calls
    pub indicator_draws: usize,
    /// Last light rig passed to `configure_lights`
    pub last_rig: Option<LightRig>,
    /// Current transform stack depth (pushes minus pops)
    pub stack_depth: isize,
    /// Deepest transform stack seen
    pub max_stack_depth: isize,
    current: Option<Topology>,
    pending: usize,
}

impl PrimitiveCounter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawSurface for PrimitiveCounter {
    fn begin(&mut self, topology: Topology) {
        self.current = Some(topology);
        self.pending = 0;
    }

    fn end(&mut self) {
        match self.current.take() {
            Some(Topology::Lines) => self.lines += self.pending / 2,
            Some(Topology::Triangles) => self.triangles += self.pending / 3,
            None => log::warn!("end() called without a matching begin()"),
        }
        self.pending = 0;
        self.batches += 1;
    }

    fn color(&mut self, _rgba: [f32; 4]) {}

    fn normal(&mut self, _normal: Vec3) {}

    fn vertex(&mut self, _position: Vec3) {
        if self.current.is_some() {
            self.pending += 1;
        }
    }

    fn push_matrix(&mut self) {
        self.stack_depth += 1;
        self.max_stack_depth = self.max_stack_depth.max(self.stack_depth);
    }

    fn pop_matrix(&mut self) {
        self.stack_depth -= 1;
    }

    fn translate(&mut self, _offset: Vec3) {}

    fn rotate(&mut self, _degrees: f32, _axis: Vec3) {}

    fn scale(&mut self, _factors: Vec3) {}
}

impl Renderer for PrimitiveCounter {
    fn configure_lights(&mut self, rig: &LightRig) {
        self.last_rig = Some(*rig);
    }

    fn draw_ground(&mut self) {
        self.ground_draws += 1;
    }

    fn draw_light_indicator(&mut self, _rgba: [f32; 4]) {
        self.indicator_draws += 1;
    }
}
