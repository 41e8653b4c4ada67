//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod frame;
mod render;
mod window;

pub use frame::FrameSystem;
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
