//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use sierpinski_core::{LightMode, SceneSettings, SceneState};
use crate::config::WindowConfig;

/// Owns the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
    last_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
            last_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Show the scene state in the title bar
    ///
    /// The window is only touched when the text changes.
    pub fn update_title(&mut self, state: &SceneState, settings: &SceneSettings) {
        let title = format_title(&self.base_title, state, settings);
        if title != self.last_title {
            self.window.set_title(&title);
            self.last_title = title;
        }
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn format_title(base: &str, state: &SceneState, settings: &SceneSettings) -> String {
    let light = match state.light_mode {
        LightMode::Point => "point",
        LightMode::Directional => "directional",
    };
    let faces = if state.paint_faces && settings.face_painting_allowed() {
        "faces"
    } else {
        "wireframe"
    };
    format!(
        "{} - depth {} - {} - {} light",
        base, settings.depth, faces, light
    )
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
