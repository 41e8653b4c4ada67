//! Sierpinski pyramid demo
//!
//! Application layer on top of the geometry, scene and render crates:
//! configuration, input mapping and the per-frame systems driven by `main`.

pub mod config;
pub mod input;
pub mod systems;
