//! Per-frame scene state and its input transitions
//!
//! [`SceneState`] is a plain value. Input is folded into it with
//! [`SceneState::apply`] and animation with [`SceneState::advance`], both of
//! which return a new state, so every transition can be tested without a
//! window or GPU.

use serde::{Serialize, Deserialize};
use sierpinski_math::{mat4, Mat4, Vec3};

use crate::settings::SceneSettings;

/// Which light slot is active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// Point light orbiting the pyramid
    #[default]
    Point,
    /// Directional light along a user-adjustable vector
    Directional,
}

impl LightMode {
    /// The other mode
    pub fn cycled(self) -> Self {
        match self {
            LightMode::Point => LightMode::Directional,
            LightMode::Directional => LightMode::Point,
        }
    }
}

/// World axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Camera pan direction (as seen on screen)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Discrete input events understood by the scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneEvent {
    /// Start or stop the pyramid rotation
    TogglePyramidRotation,
    /// Start or stop the point light orbit
    ToggleLightRotation,
    /// Turn face painting on or off (on is refused above the depth threshold)
    ToggleFacePainting,
    /// Switch between point and directional light
    CycleLightMode,
    /// Pick one of the configured light color presets
    SetLightColor(usize),
    /// Move the directional light vector by `steps` nudge steps along `axis`
    NudgeLight { axis: Axis, steps: f32 },
    /// Pan the camera one step
    Pan(PanDirection),
    /// Move the camera towards (positive) or away from (negative) the scene
    Zoom(f32),
}

/// Mutable scene state, updated once per frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneState {
    /// Pyramid rotation about +Y, degrees in [0, 360)
    pub pyramid_angle: f32,
    pub pyramid_rotating: bool,
    /// Point light orbit angle, radians in [0, 2pi)
    pub light_angle: f32,
    pub light_rotating: bool,
    pub paint_faces: bool,
    pub light_mode: LightMode,
    /// Directional light color (RGBA)
    pub light_color: [f32; 4],
    /// Directional light vector (also where its indicator is drawn)
    pub light_direction: Vec3,
    /// Camera translation applied as the view matrix
    pub camera_offset: Vec3,
}

impl SceneState {
    /// Initial state for the given settings
    ///
    /// Face painting starts on whenever the configured depth allows it.
    pub fn new(settings: &SceneSettings) -> Self {
        Self {
            pyramid_angle: 0.0,
            pyramid_rotating: true,
            light_angle: 0.0,
            light_rotating: true,
            paint_faces: settings.face_painting_allowed(),
            light_mode: LightMode::Point,
            light_color: [1.0, 1.0, 1.0, 1.0],
            light_direction: Vec3::from_array(settings.light_direction),
            camera_offset: Vec3::from_array(settings.camera_start),
        }
    }

    /// Apply one input event
    pub fn apply(mut self, settings: &SceneSettings, event: SceneEvent) -> Self {
        match event {
            SceneEvent::TogglePyramidRotation => {
                self.pyramid_rotating = !self.pyramid_rotating;
            }
            SceneEvent::ToggleLightRotation => {
                self.light_rotating = !self.light_rotating;
            }
            SceneEvent::ToggleFacePainting => {
                self.paint_faces = !self.paint_faces && settings.face_painting_allowed();
            }
            SceneEvent::CycleLightMode => {
                self.light_mode = self.light_mode.cycled();
            }
            SceneEvent::SetLightColor(preset) => {
                if let Some(color) = settings.light_color_presets.get(preset) {
                    self.light_color = *color;
                }
            }
            SceneEvent::NudgeLight { axis, steps } => {
                self.light_direction += axis.unit() * (steps * settings.light_nudge_step);
            }
            SceneEvent::Pan(direction) => {
                let step = settings.pan_step;
                // the camera moves, so the scene shifts the opposite way
                self.camera_offset += match direction {
                    PanDirection::Up => Vec3::new(0.0, -step, 0.0),
                    PanDirection::Down => Vec3::new(0.0, step, 0.0),
                    PanDirection::Left => Vec3::new(step, 0.0, 0.0),
                    PanDirection::Right => Vec3::new(-step, 0.0, 0.0),
                };
            }
            SceneEvent::Zoom(steps) => {
                self.camera_offset.z += steps * settings.zoom_step;
            }
        }
        self
    }

    /// Apply a sequence of events in order
    pub fn apply_all<I>(self, settings: &SceneSettings, events: I) -> Self
    where
        I: IntoIterator<Item = SceneEvent>,
    {
        events
            .into_iter()
            .fold(self, |state, event| state.apply(settings, event))
    }

    /// Advance the animation by one frame
    ///
    /// The light only orbits while the point light is active.
    pub fn advance(mut self, settings: &SceneSettings) -> Self {
        if self.pyramid_rotating {
            self.pyramid_angle = (self.pyramid_angle + settings.rotation_speed).rem_euclid(360.0);
        }
        if self.light_rotating && self.light_mode == LightMode::Point {
            self.light_angle =
                (self.light_angle + settings.light_orbit_speed).rem_euclid(std::f32::consts::TAU);
        }
        self
    }

    /// View matrix for the current camera translation
    pub fn view_matrix(&self) -> Mat4 {
        mat4::translation(self.camera_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SceneSettings {
        SceneSettings::default()
    }

    #[test]
    fn test_initial_state() {
        let s = settings();
        let state = SceneState::new(&s);
        assert!(state.paint_faces);
        assert!(state.pyramid_rotating);
        assert_eq!(state.light_mode, LightMode::Point);
        assert_eq!(state.camera_offset, Vec3::new(0.0, -1.0, -5.0));
        assert_eq!(state.light_direction, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_initial_state_deep_disables_painting() {
        let s = settings().with_requested_depth(5);
        assert!(!SceneState::new(&s).paint_faces);
    }

    #[test]
    fn test_toggle_face_painting() {
        let s = settings();
        let state = SceneState::new(&s);
        let off = state.apply(&s, SceneEvent::ToggleFacePainting);
        assert!(!off.paint_faces);
        let on = off.apply(&s, SceneEvent::ToggleFacePainting);
        assert!(on.paint_faces);
    }

    #[test]
    fn test_toggle_face_painting_refused_when_deep() {
        let s = settings().with_requested_depth(6);
        let state = SceneState::new(&s).apply(&s, SceneEvent::ToggleFacePainting);
        assert!(!state.paint_faces);
    }

    #[test]
    fn test_toggles_are_involutions() {
        let s = settings();
        let state = SceneState::new(&s);
        for event in [
            SceneEvent::TogglePyramidRotation,
            SceneEvent::ToggleLightRotation,
            SceneEvent::CycleLightMode,
        ] {
            let twice = state.apply(&s, event).apply(&s, event);
            assert_eq!(twice, state, "{:?}", event);
            assert_ne!(state.apply(&s, event), state, "{:?}", event);
        }
    }

    #[test]
    fn test_set_light_color() {
        let s = settings();
        let state = SceneState::new(&s).apply(&s, SceneEvent::SetLightColor(1));
        assert_eq!(state.light_color, [0.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_set_light_color_unknown_preset_ignored() {
        let s = settings();
        let state = SceneState::new(&s);
        assert_eq!(state.apply(&s, SceneEvent::SetLightColor(42)), state);
    }

    #[test]
    fn test_nudge_light() {
        let s = settings();
        let state = SceneState::new(&s).apply_all(
            &s,
            [
                SceneEvent::NudgeLight { axis: Axis::X, steps: -1.0 },
                SceneEvent::NudgeLight { axis: Axis::Z, steps: 1.0 },
                SceneEvent::NudgeLight { axis: Axis::Z, steps: 1.0 },
            ],
        );
        assert!(state.light_direction.approx_eq(Vec3::new(0.8, 1.0, 1.4), 1e-6));
    }

    #[test]
    fn test_pan_and_zoom() {
        let s = settings();
        let state = SceneState::new(&s).apply_all(
            &s,
            [
                SceneEvent::Pan(PanDirection::Up),
                SceneEvent::Pan(PanDirection::Left),
                SceneEvent::Zoom(1.0),
                SceneEvent::Zoom(1.0),
                SceneEvent::Zoom(-1.0),
            ],
        );
        assert!(state.camera_offset.approx_eq(Vec3::new(0.5, -1.5, -4.0), 1e-6));
    }

    #[test]
    fn test_opposite_pans_cancel() {
        let s = settings();
        let state = SceneState::new(&s);
        let moved = state.apply_all(
            &s,
            [
                SceneEvent::Pan(PanDirection::Down),
                SceneEvent::Pan(PanDirection::Right),
                SceneEvent::Pan(PanDirection::Up),
                SceneEvent::Pan(PanDirection::Left),
            ],
        );
        assert!(moved.camera_offset.approx_eq(state.camera_offset, 1e-6));
    }

    #[test]
    fn test_advance_rotates() {
        let s = settings();
        let state = SceneState::new(&s).advance(&s).advance(&s);
        assert!((state.pyramid_angle - 1.0).abs() < 1e-6);
        assert!((state.light_angle - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_advance_respects_toggles() {
        let s = settings();
        let state = SceneState::new(&s)
            .apply(&s, SceneEvent::TogglePyramidRotation)
            .apply(&s, SceneEvent::ToggleLightRotation)
            .advance(&s);
        assert_eq!(state.pyramid_angle, 0.0);
        assert_eq!(state.light_angle, 0.0);
    }

    #[test]
    fn test_light_orbit_paused_in_directional_mode() {
        let s = settings();
        let state = SceneState::new(&s)
            .apply(&s, SceneEvent::CycleLightMode)
            .advance(&s);
        assert_eq!(state.light_angle, 0.0);
        assert!(state.pyramid_angle > 0.0);
    }

    #[test]
    fn test_pyramid_angle_wraps() {
        let s = settings();
        let mut state = SceneState::new(&s);
        state.pyramid_angle = 359.75;
        let state = state.advance(&s);
        assert!((state.pyramid_angle - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_translates() {
        let s = settings();
        let view = SceneState::new(&s).view_matrix();
        let p = mat4::transform_point(&view, Vec3::ZERO);
        assert_eq!(p, Vec3::new(0.0, -1.0, -5.0));
    }

    #[test]
    fn test_light_mode_cycles() {
        assert_eq!(LightMode::Point.cycled(), LightMode::Directional);
        assert_eq!(LightMode::Directional.cycled(), LightMode::Point);
    }
}
