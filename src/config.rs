//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SIERPINSKI_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use sierpinski_core::{Palette, SceneSettings, Tetrahedron};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Pyramid configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Light configuration
    #[serde(default)]
    pub lighting: LightingConfig,
    /// Ground plane configuration
    #[serde(default)]
    pub ground: GroundConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SIERPINSKI_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SIERPINSKI_SCENE__LEVELS=4 -> scene.levels = 4
        figment = figment.merge(Env::prefixed("SIERPINSKI_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Scene settings for a requested recursion depth
    ///
    /// The depth is clamped into `[0, scene.max_depth]`.
    pub fn to_scene_settings(&self, requested_depth: i64) -> SceneSettings {
        let scene = &self.scene;
        let lighting = &self.lighting;

        SceneSettings {
            rotation_speed: scene.rotation_speed,
            light_orbit_speed: lighting.orbit_speed,
            light_orbit_radius: lighting.orbit_radius,
            light_height: lighting.height,
            light_nudge_step: lighting.nudge_step,
            light_direction: lighting.direction,
            light_color_presets: lighting.color_presets.clone(),
            attenuation: lighting.attenuation,
            ambient: lighting.ambient,
            camera_start: self.camera.start_position,
            pan_step: self.camera.pan_step,
            zoom_step: self.camera.zoom_step,
            ..SceneSettings::default()
        }
        .with_base(scene.base.tetrahedron())
        .with_palette(Palette {
            edge_color: scene.edge_color,
            face_colors: scene.face_colors.clone(),
        })
        .with_max_depth(scene.max_depth)
        .with_paint_faces_max_depth(scene.paint_faces_max_depth)
        .with_requested_depth(requested_depth)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sierpinski Pyramid".to_string(),
            width: 1200,
            height: 800,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial camera translation [x, y, z]
    pub start_position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Translation per arrow key press
    pub pan_step: f32,
    /// Translation along Z per wheel notch or +/- press
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, -1.0, -5.0],
            fov: 70.0,
            near: 0.1,
            far: 50.0,
            pan_step: 0.5,
            zoom_step: 1.0,
        }
    }
}

/// Which tetrahedron the recursion starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseShape {
    /// Regular tetrahedron resting on the ground, apex up
    #[default]
    Pyramid,
    /// Regular tetrahedron inscribed in the cube [-1, 1]^3
    Regular,
}

impl BaseShape {
    pub fn tetrahedron(self) -> Tetrahedron {
        match self {
            BaseShape::Pyramid => Tetrahedron::PYRAMID,
            BaseShape::Regular => Tetrahedron::REGULAR,
        }
    }
}

/// Pyramid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Recursion depth used when none is given on the command line
    pub levels: i64,
    /// Ask for the depth on stdin when none is given on the command line
    pub prompt_levels: bool,
    /// Depth ceiling
    pub max_depth: u32,
    /// Deepest level at which faces may be painted
    pub paint_faces_max_depth: u32,
    /// Base tetrahedron
    pub base: BaseShape,
    /// Pyramid rotation per frame in degrees
    pub rotation_speed: f32,
    /// Wireframe edge color
    pub edge_color: [f32; 4],
    /// Face vertex colors, picked by position within the face
    pub face_colors: Vec<[f32; 4]>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let settings = SceneSettings::default();
        Self {
            levels: settings.depth as i64,
            prompt_levels: false,
            max_depth: settings.max_depth,
            paint_faces_max_depth: settings.paint_faces_max_depth,
            base: BaseShape::default(),
            rotation_speed: settings.rotation_speed,
            edge_color: settings.palette.edge_color,
            face_colors: settings.palette.face_colors,
        }
    }
}

impl SceneConfig {
    /// Pick the requested depth
    ///
    /// Priority: the command-line argument, then the prompt (only consulted
    /// when `prompt_levels` is set), then `levels`. Unparseable input is
    /// logged and skipped.
    pub fn resolve_levels<F>(&self, arg: Option<&str>, prompt: F) -> i64
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(arg) = arg {
            match parse_levels(arg) {
                Some(levels) => return levels,
                None => log::warn!("Ignoring invalid level count {:?}", arg),
            }
        }

        if self.prompt_levels {
            if let Some(answer) = prompt() {
                match parse_levels(&answer) {
                    Some(levels) => return levels,
                    None => log::warn!("Ignoring invalid level count {:?}", answer.trim()),
                }
            }
        }

        self.levels
    }
}

fn parse_levels(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Light configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Point light orbit advance per frame in radians
    pub orbit_speed: f32,
    /// Point light orbit radius
    pub orbit_radius: f32,
    /// Point light height
    pub height: f32,
    /// Directional light nudge per key press
    pub nudge_step: f32,
    /// Initial directional light vector
    pub direction: [f32; 3],
    /// Colors selected by keys 7, 8, 9, 0
    pub color_presets: Vec<[f32; 4]>,
    /// Constant, linear and quadratic attenuation
    pub attenuation: [f32; 3],
    /// Global ambient term
    pub ambient: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        let settings = SceneSettings::default();
        Self {
            orbit_speed: settings.light_orbit_speed,
            orbit_radius: settings.light_orbit_radius,
            height: settings.light_height,
            nudge_step: settings.light_nudge_step,
            direction: settings.light_direction,
            color_presets: settings.light_color_presets,
            attenuation: settings.attenuation,
            ambient: settings.ambient,
        }
    }
}

/// Ground plane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Image file tiled over the ground
    pub texture: String,
    /// Half-width of the ground grid
    pub extent: f32,
    /// Tile edge length
    pub tile: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            texture: "assets/sand.jpg".to_string(),
            extent: 30.0,
            tile: 10.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Pause between frames in milliseconds
    pub frame_delay_ms: u64,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            frame_delay_ms: 10,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use sierpinski_core::MAX_SUPPORTED_DEPTH;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.camera.fov, 70.0);
        assert_eq!(config.scene.max_depth, 6);
        assert_eq!(config.rendering.frame_delay_ms, 10);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("levels"));
        assert!(toml.contains("base = \"pyramid\""));
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_scene() {
        let toml = toml::to_string(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.scene.face_colors, AppConfig::default().scene.face_colors);
        assert_eq!(parsed.lighting.attenuation, [0.2, 0.1, 0.01]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[debug]\nlog_level = \"trace\"\n").unwrap();
        assert_eq!(parsed.debug.log_level, "trace");
        assert_eq!(parsed.window.width, 1200);

        let parsed: AppConfig = toml::from_str("[window]\ntitle = \"x\"\n").unwrap();
        assert_eq!(parsed.window.title, "x");
        assert_eq!(parsed.window.height, 800);
    }

    #[test]
    fn test_scene_settings_clamps_depth() {
        let config = AppConfig::default();
        assert_eq!(config.to_scene_settings(9).depth, 6);
        assert_eq!(config.to_scene_settings(-2).depth, 0);
        assert_eq!(config.to_scene_settings(2).depth, 2);
    }

    #[test]
    fn test_scene_settings_cap_max_depth() {
        let mut config = AppConfig::default();
        config.scene.max_depth = 40;

        let settings = config.to_scene_settings(40);
        assert_eq!(settings.max_depth, MAX_SUPPORTED_DEPTH);
        assert_eq!(settings.depth, MAX_SUPPORTED_DEPTH);
    }

    #[test]
    fn test_scene_settings_follow_config() {
        let mut config = AppConfig::default();
        config.scene.max_depth = 3;
        config.scene.base = BaseShape::Regular;
        config.camera.pan_step = 2.0;
        config.scene.edge_color = [0.0, 0.0, 0.0, 1.0];

        let settings = config.to_scene_settings(5);
        assert_eq!(settings.depth, 3);
        assert_eq!(settings.base, Tetrahedron::REGULAR);
        assert_eq!(settings.pan_step, 2.0);
        assert_eq!(settings.palette.edge_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.palette.face_colors, config.scene.face_colors);
    }

    #[test]
    fn test_resolve_levels_prefers_argument() {
        let scene = SceneConfig {
            prompt_levels: true,
            ..SceneConfig::default()
        };
        let levels = scene.resolve_levels(Some("5"), || panic!("prompt not expected"));
        assert_eq!(levels, 5);
    }

    #[test]
    fn test_resolve_levels_prompts_when_enabled() {
        let scene = SceneConfig {
            prompt_levels: true,
            ..SceneConfig::default()
        };
        assert_eq!(scene.resolve_levels(None, || Some(" 4\n".to_string())), 4);
        assert_eq!(scene.resolve_levels(Some("abc"), || Some("2".to_string())), 2);
    }

    #[test]
    fn test_resolve_levels_falls_back_to_config() {
        let scene = SceneConfig {
            levels: 1,
            ..SceneConfig::default()
        };
        assert_eq!(scene.resolve_levels(None, || panic!("prompt disabled")), 1);
        assert_eq!(scene.resolve_levels(Some("x"), || None), 1);

        let prompting = SceneConfig {
            prompt_levels: true,
            ..scene
        };
        assert_eq!(prompting.resolve_levels(None, || Some("nope".to_string())), 1);
    }
}
