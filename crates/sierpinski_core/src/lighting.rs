//! Light slots derived from the scene state
//!
//! Two slots exist, mirroring a classic two-light setup: slot 0 is a point
//! light orbiting the pyramid, slot 1 a directional light. Exactly one is
//! enabled at a time, chosen by [`LightMode`].

use sierpinski_math::Vec3;

use crate::settings::SceneSettings;
use crate::state::{LightMode, SceneState};

/// Alpha used for the translucent light indicator sphere
const INDICATOR_ALPHA: f32 = 0.5;

/// One light slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSlot {
    /// Homogeneous position: w = 1 for a point light, w = 0 for a direction
    pub position: [f32; 4],
    /// Diffuse/ambient color (RGBA)
    pub color: [f32; 4],
    /// Constant, linear and quadratic attenuation (ignored when w = 0)
    pub attenuation: [f32; 3],
    pub enabled: bool,
}

/// Both light slots plus the global ambient term
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub point: LightSlot,
    pub directional: LightSlot,
    pub ambient: f32,
}

impl LightRig {
    /// Build the light rig for one frame
    pub fn new(state: &SceneState, settings: &SceneSettings) -> Self {
        let orbit = point_light_position(state.light_angle, settings);
        let dir = state.light_direction;

        Self {
            point: LightSlot {
                position: [orbit.x, orbit.y, orbit.z, 1.0],
                color: [1.0, 1.0, 1.0, 1.0],
                attenuation: settings.attenuation,
                enabled: state.light_mode == LightMode::Point,
            },
            directional: LightSlot {
                position: [dir.x, dir.y, dir.z, 0.0],
                color: state.light_color,
                attenuation: settings.attenuation,
                enabled: state.light_mode == LightMode::Directional,
            },
            ambient: settings.ambient,
        }
    }

    /// The enabled slot
    pub fn active(&self) -> &LightSlot {
        if self.directional.enabled {
            &self.directional
        } else {
            &self.point
        }
    }

    /// Where to draw the light indicator, and in which color
    pub fn indicator(&self) -> (Vec3, [f32; 4]) {
        let slot = self.active();
        let [x, y, z, _] = slot.position;
        let [r, g, b, _] = slot.color;
        (Vec3::new(x, y, z), [r, g, b, INDICATOR_ALPHA])
    }
}

/// Point light on a horizontal circle around the Y axis
pub fn point_light_position(angle: f32, settings: &SceneSettings) -> Vec3 {
    let r = settings.light_orbit_radius;
    Vec3::new(r * angle.cos(), settings.light_height, r * angle.sin())
}
