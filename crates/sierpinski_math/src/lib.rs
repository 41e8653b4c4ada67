//! Geometry engine for the Sierpinski pyramid
//!
//! Pure, stateless math: nothing in this crate performs I/O or touches a
//! graphics API.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector / point
//! - [`Mat4`] - column-major 4x4 matrix helpers for the transform stack
//! - [`Tetrahedron`] - four vertices plus the fixed edge and face topology
//!
//! ## Subdivision
//!
//! - [`midpoint`] - arithmetic mean of two points
//! - [`subdivide`] - split a tetrahedron into its four corner children
//! - [`face_normal`] - unit normal of one of the four faces

mod vec3;
pub mod mat4;
pub mod tetrahedron;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use tetrahedron::{Tetrahedron, EDGES, FACES, midpoint, subdivide, face_normal};
