//! Startup configuration for the scene
//!
//! Everything here is fixed once the render loop starts. The recursion depth
//! is normalized into `[0, max_depth]` when the settings are built, so the
//! traversal never sees an out-of-range value.

use sierpinski_math::Tetrahedron;

/// Hard ceiling on `max_depth`, whatever the configuration asks for
pub const MAX_SUPPORTED_DEPTH: u32 = 8;

/// Colors used by the traversal
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Color of every wireframe edge
    pub edge_color: [f32; 4],
    /// Face vertex colors, picked by the vertex's position within the face
    pub face_colors: Vec<[f32; 4]>,
}

impl Palette {
    /// Color for the `slot`-th vertex of a face
    ///
    /// Wraps around a short table; an empty table falls back to the edge color.
    pub fn face_color(&self, slot: usize) -> [f32; 4] {
        if self.face_colors.is_empty() {
            self.edge_color
        } else {
            self.face_colors[slot % self.face_colors.len()]
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            edge_color: [1.0, 1.0, 1.0, 1.0],
            face_colors: vec![
                [1.0, 0.0, 0.0, 1.0],
                [1.0, 1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [0.0, 1.0, 1.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
            ],
        }
    }
}

/// Number of primitives one traversal emits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveCount {
    pub lines: u64,
    pub triangles: u64,
}

impl PrimitiveCount {
    /// 6 * 4^depth lines, plus 4 * 4^depth triangles when faces are painted
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    pub fn at_depth(depth: u32, paint_faces: bool) -> Self {
        let leaves = 4u64.saturating_pow(depth);
        Self {
            lines: leaves.saturating_mul(6),
            triangles: if paint_faces { leaves.saturating_mul(4) } else { 0 },
        }
    }
}

/// Scene configuration fixed at startup
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    /// Base tetrahedron the recursion starts from
    pub base: Tetrahedron,
    /// Recursion depth, always within `[0, max_depth]`
    pub depth: u32,
    /// Depth ceiling
    pub max_depth: u32,
    /// Deepest level at which face painting may be switched on
    pub paint_faces_max_depth: u32,
    /// Edge and face colors
    pub palette: Palette,
    /// Pyramid rotation per frame, degrees
    pub rotation_speed: f32,
    /// Point light orbit advance per frame, radians
    pub light_orbit_speed: f32,
    /// Point light orbit radius
    pub light_orbit_radius: f32,
    /// Point light height above the ground
    pub light_height: f32,
    /// Directional light nudge per key press
    pub light_nudge_step: f32,
    /// Initial directional light vector
    pub light_direction: [f32; 3],
    /// Selectable light colors (RGBA)
    pub light_color_presets: Vec<[f32; 4]>,
    /// Constant, linear and quadratic attenuation for both light slots
    pub attenuation: [f32; 3],
    /// Global ambient term
    pub ambient: f32,
    /// Initial camera translation
    pub camera_start: [f32; 3],
    /// Camera pan per key press
    pub pan_step: f32,
    /// Camera translation along Z per zoom step
    pub zoom_step: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            base: Tetrahedron::PYRAMID,
            depth: 3,
            max_depth: 6,
            paint_faces_max_depth: 4,
            palette: Palette::default(),
            rotation_speed: 0.5,
            light_orbit_speed: 0.01,
            light_orbit_radius: 2.0,
            light_height: 0.75,
            light_nudge_step: 0.2,
            light_direction: [1.0, 1.0, 1.0],
            light_color_presets: vec![
                [0.5, 0.0, 0.0, 1.0],
                [0.0, 0.5, 0.0, 1.0],
                [0.0, 0.0, 0.5, 1.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
            attenuation: [0.2, 0.1, 0.01],
            ambient: 0.2,
            camera_start: [0.0, -1.0, -5.0],
            pan_step: 0.5,
            zoom_step: 1.0,
        }
    }
}

impl SceneSettings {
    /// Clamp a user-supplied depth into `[0, max_depth]`
    pub fn clamp_depth(&self, requested: i64) -> u32 {
        requested.clamp(0, self.max_depth as i64) as u32
    }

    /// Builder: set the recursion depth, clamping out-of-range requests
    pub fn with_requested_depth(mut self, requested: i64) -> Self {
        let depth = self.clamp_depth(requested);
        if depth as i64 != requested {
            log::warn!(
                "Requested depth {} is outside [0, {}], using {}",
                requested,
                self.max_depth,
                depth
            );
        }
        self.depth = depth;
        self
    }

    /// Builder: set the depth ceiling (the current depth is re-clamped)
    ///
    /// Ceilings above [`MAX_SUPPORTED_DEPTH`] are lowered to it.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        let max_depth = if max_depth > MAX_SUPPORTED_DEPTH {
            log::warn!(
                "Depth ceiling {} exceeds the supported {}, using {}",
                max_depth,
                MAX_SUPPORTED_DEPTH,
                MAX_SUPPORTED_DEPTH
            );
            MAX_SUPPORTED_DEPTH
        } else {
            max_depth
        };
        self.max_depth = max_depth;
        self.depth = self.depth.min(max_depth);
        self
    }

    /// Builder: set the base tetrahedron
    pub fn with_base(mut self, base: Tetrahedron) -> Self {
        self.base = base;
        self
    }

    /// Builder: set the palette
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Builder: set the face painting threshold
    pub fn with_paint_faces_max_depth(mut self, depth: u32) -> Self {
        self.paint_faces_max_depth = depth;
        self
    }

    /// Whether face painting may be on at the configured depth
    pub fn face_painting_allowed(&self) -> bool {
        self.depth <= self.paint_faces_max_depth
    }

    /// Primitives emitted per frame at the configured depth
    pub fn primitive_count(&self, paint_faces: bool) -> PrimitiveCount {
        PrimitiveCount::at_depth(self.depth, paint_faces && self.face_painting_allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_depth() {
        let settings = SceneSettings::default();
        assert_eq!(settings.clamp_depth(-3), 0);
        assert_eq!(settings.clamp_depth(0), 0);
        assert_eq!(settings.clamp_depth(4), 4);
        assert_eq!(settings.clamp_depth(6), 6);
        assert_eq!(settings.clamp_depth(100), 6);
        assert_eq!(settings.clamp_depth(i64::MIN), 0);
    }

    #[test]
    fn test_requested_depth_above_ceiling_equals_ceiling() {
        let above = SceneSettings::default().with_requested_depth(9);
        let at = SceneSettings::default().with_requested_depth(6);
        assert_eq!(above, at);
    }

    #[test]
    fn test_lower_ceiling_reclamps_depth() {
        let settings = SceneSettings::default().with_requested_depth(6).with_max_depth(4);
        assert_eq!(settings.depth, 4);
    }

    #[test]
    fn test_oversized_ceiling_capped() {
        let settings = SceneSettings::default()
            .with_max_depth(40)
            .with_requested_depth(40);
        assert_eq!(settings.max_depth, MAX_SUPPORTED_DEPTH);
        assert_eq!(settings.depth, MAX_SUPPORTED_DEPTH);

        let count = settings.primitive_count(false);
        assert_eq!(count.lines, 6 * 4u64.pow(MAX_SUPPORTED_DEPTH));
    }

    #[test]
    fn test_primitive_count_saturates() {
        let count = PrimitiveCount::at_depth(40, true);
        assert_eq!(count.lines, u64::MAX);
        assert_eq!(count.triangles, u64::MAX);
    }

    #[test]
    fn test_face_painting_threshold() {
        let settings = SceneSettings::default();
        assert!(settings.clone().with_requested_depth(4).face_painting_allowed());
        assert!(!settings.clone().with_requested_depth(5).face_painting_allowed());
        assert!(!settings.with_requested_depth(6).face_painting_allowed());
    }

    #[test]
    fn test_primitive_count_law() {
        assert_eq!(
            PrimitiveCount::at_depth(0, true),
            PrimitiveCount { lines: 6, triangles: 4 }
        );
        assert_eq!(
            PrimitiveCount::at_depth(1, true),
            PrimitiveCount { lines: 24, triangles: 16 }
        );
        assert_eq!(
            PrimitiveCount::at_depth(3, false),
            PrimitiveCount { lines: 384, triangles: 0 }
        );
    }

    #[test]
    fn test_primitive_count_respects_threshold() {
        let settings = SceneSettings::default().with_requested_depth(5);
        assert_eq!(settings.primitive_count(true).triangles, 0);
    }

    #[test]
    fn test_palette_face_color_wraps() {
        let palette = Palette {
            edge_color: [1.0; 4],
            face_colors: vec![[0.1, 0.0, 0.0, 1.0], [0.2, 0.0, 0.0, 1.0]],
        };
        assert_eq!(palette.face_color(0), [0.1, 0.0, 0.0, 1.0]);
        assert_eq!(palette.face_color(2), [0.1, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_palette_empty_falls_back_to_edge() {
        let palette = Palette {
            edge_color: [0.5; 4],
            face_colors: Vec::new(),
        };
        assert_eq!(palette.face_color(1), [0.5; 4]);
    }
}
