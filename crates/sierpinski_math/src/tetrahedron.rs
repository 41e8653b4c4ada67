//! Tetrahedron geometry and Sierpinski subdivision
//!
//! A tetrahedron is an ordered set of four vertices. Its topology (which
//! vertices form edges and faces) is fixed by [`EDGES`] and [`FACES`] and
//! never changes under subdivision, so children are always built by indexing
//! the parent's vertices and edge midpoints.

use serde::{Serialize, Deserialize};

use crate::Vec3;

/// The 6 edges of a tetrahedron as vertex index pairs.
///
/// The order matters: [`subdivide`] indexes the edge midpoints in this order.
pub const EDGES: [[usize; 2]; 6] = [
    [0, 1],
    [0, 2],
    [0, 3],
    [1, 2],
    [1, 3],
    [2, 3],
];

/// The 4 triangular faces of a tetrahedron as vertex index triples
pub const FACES: [[usize; 3]; 4] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 1, 3],
    [1, 2, 3],
];

/// For each corner, the indices into [`EDGES`] of the three incident edges,
/// in edge enumeration order.
const INCIDENT_EDGES: [[usize; 3]; 4] = [
    [0, 1, 2],
    [0, 3, 4],
    [1, 3, 5],
    [2, 4, 5],
];

/// A tetrahedron defined by four vertex positions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tetrahedron {
    pub vertices: [Vec3; 4],
}

impl Tetrahedron {
    /// Regular tetrahedron inscribed in the cube [-1, 1]^3
    pub const REGULAR: Self = Self::new([
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]);

    /// Pyramid resting on the y = 0 ground plane with its apex at
    /// (0, sqrt(20)/3, 0)
    pub const PYRAMID: Self = Self::new([
        Vec3::new(-1.0, 0.0, -2.0 / 3.0),
        Vec3::new(1.0, 0.0, -2.0 / 3.0),
        Vec3::new(0.0, 0.0, 4.0 / 3.0),
        Vec3::new(0.0, 1.490_712, 0.0),
    ]);

    /// Create a tetrahedron from four vertices
    #[inline]
    pub const fn new(vertices: [Vec3; 4]) -> Self {
        Self { vertices }
    }

    /// Create a tetrahedron from four `[x, y, z]` arrays
    pub fn from_arrays(vertices: [[f32; 3]; 4]) -> Self {
        Self::new(vertices.map(Vec3::from_array))
    }

    /// Midpoints of the 6 edges, in [`EDGES`] order
    pub fn edge_midpoints(&self) -> [Vec3; 6] {
        EDGES.map(|[a, b]| midpoint(self.vertices[a], self.vertices[b]))
    }

    /// Unsigned volume
    pub fn volume(&self) -> f32 {
        let [a, b, c, d] = self.vertices;
        ((b - a).dot((c - a).cross(d - a)) / 6.0).abs()
    }

    /// Multiply every vertex by `factor` (scaling about the origin)
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.vertices.map(|v| v * factor))
    }
}

/// Arithmetic mean of two points, component-wise
#[inline]
pub fn midpoint(p1: Vec3, p2: Vec3) -> Vec3 {
    Vec3::new(
        (p1.x + p2.x) / 2.0,
        (p1.y + p2.y) / 2.0,
        (p1.z + p2.z) / 2.0,
    )
}

/// Split a tetrahedron into its four corner children.
///
/// Child `i` keeps parent vertex `i` in slot 0 and takes the midpoints of
/// the three edges incident to vertex `i` (in [`EDGES`] order) for slots 1..4.
/// Each child has 1/8 of the parent volume; the central octahedron is left
/// out.
pub fn subdivide(tetra: &Tetrahedron) -> [Tetrahedron; 4] {
    let mid = tetra.edge_midpoints();

    std::array::from_fn(|corner| {
        let [e0, e1, e2] = INCIDENT_EDGES[corner];
        Tetrahedron::new([tetra.vertices[corner], mid[e0], mid[e1], mid[e2]])
    })
}

/// Unit normal of the plane through the three vertices named by `face`.
///
/// Computed as `(p1 - p0) x (p2 - p0)`, normalized. Three collinear points
/// produce [`Vec3::ZERO`] instead of NaN.
pub fn face_normal(tetra: &Tetrahedron, face: [usize; 3]) -> Vec3 {
    let p0 = tetra.vertices[face[0]];
    let p1 = tetra.vertices[face[1]];
    let p2 = tetra.vertices[face[2]];

    (p1 - p0).cross(p2 - p0).normalized()
}
