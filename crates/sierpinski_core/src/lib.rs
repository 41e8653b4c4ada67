//! Scene renderer for the Sierpinski pyramid
//!
//! This crate owns everything between the geometry engine and the GPU:
//!
//! - [`DrawSurface`] / [`Renderer`] - the abstract drawing collaborator
//! - [`render_tetrahedron`] - recursive traversal that emits edges and faces
//! - [`SceneSettings`] - configuration fixed at startup (depth, palette, steps)
//! - [`SceneState`] / [`SceneEvent`] - per-frame mutable state and its pure transitions
//! - [`LightRig`] - the two light slots derived from the scene state
//! - [`draw_scene`] - one frame's worth of drawing commands
//! - [`PrimitiveCounter`] - a surface that only counts what it is given
//!
//! Nothing here depends on a windowing system or graphics API.

mod surface;
mod settings;
mod traversal;
mod state;
mod lighting;
mod scene;

pub use surface::{Topology, DrawSurface, Renderer, PrimitiveCounter};
pub use settings::{Palette, SceneSettings, PrimitiveCount, MAX_SUPPORTED_DEPTH};
pub use traversal::render_tetrahedron;
pub use state::{SceneState, SceneEvent, LightMode, Axis, PanDirection};
pub use lighting::{LightRig, LightSlot, point_light_position};
pub use scene::draw_scene;

// Re-export commonly used types from sierpinski_math for convenience
pub use sierpinski_math::{Vec3, Mat4, Tetrahedron, EDGES, FACES};
