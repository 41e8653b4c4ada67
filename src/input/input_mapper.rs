//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard and mouse wheel input to application actions (exit,
//! fullscreen) and to [`SceneEvent`]s that the frame system folds into the
//! scene state.

use sierpinski_core::{Axis, PanDirection, SceneEvent};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of touchpad scroll that count as one wheel notch
const PIXELS_PER_NOTCH: f64 = 100.0;

/// Actions triggered by input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Scene transition, queued until the next frame
    Scene(SceneEvent),
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases and unbound keys.
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        let event = match key {
            KeyCode::Escape => return Some(InputAction::Exit),
            KeyCode::KeyF => return Some(InputAction::ToggleFullscreen),

            KeyCode::KeyR => SceneEvent::TogglePyramidRotation,
            KeyCode::KeyY => SceneEvent::ToggleLightRotation,
            KeyCode::KeyT => SceneEvent::ToggleFacePainting,
            KeyCode::KeyL => SceneEvent::CycleLightMode,

            KeyCode::Digit7 => SceneEvent::SetLightColor(0),
            KeyCode::Digit8 => SceneEvent::SetLightColor(1),
            KeyCode::Digit9 => SceneEvent::SetLightColor(2),
            KeyCode::Digit0 => SceneEvent::SetLightColor(3),

            KeyCode::KeyA => nudge(Axis::X, -1.0),
            KeyCode::KeyD => nudge(Axis::X, 1.0),
            KeyCode::KeyW => nudge(Axis::Y, 1.0),
            KeyCode::KeyS => nudge(Axis::Y, -1.0),
            KeyCode::KeyQ => nudge(Axis::Z, 1.0),
            KeyCode::KeyE => nudge(Axis::Z, -1.0),

            KeyCode::ArrowUp => SceneEvent::Pan(PanDirection::Up),
            KeyCode::ArrowDown => SceneEvent::Pan(PanDirection::Down),
            KeyCode::ArrowLeft => SceneEvent::Pan(PanDirection::Left),
            KeyCode::ArrowRight => SceneEvent::Pan(PanDirection::Right),

            KeyCode::Equal | KeyCode::NumpadAdd => SceneEvent::Zoom(1.0),
            KeyCode::Minus | KeyCode::NumpadSubtract => SceneEvent::Zoom(-1.0),

            _ => return None,
        };

        Some(InputAction::Scene(event))
    }

    /// Map a mouse wheel movement to a zoom
    ///
    /// Scrolling up moves the camera towards the scene.
    pub fn map_scroll(delta: MouseScrollDelta) -> Option<InputAction> {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
        };

        if notches == 0.0 {
            None
        } else {
            Some(InputAction::Scene(SceneEvent::Zoom(notches)))
        }
    }
}

fn nudge(axis: Axis, steps: f32) -> SceneEvent {
    SceneEvent::NudgeLight { axis, steps }
}
