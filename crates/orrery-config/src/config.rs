//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "orrery";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Mesh tessellation and camera projection settings.
    pub render: RenderConfig,
    /// Solar system layout and orbit modifiers.
    pub scene: SceneConfig,
    /// Skybox, static model and settings file locations.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Radius of the generated body sphere in model units.
    pub sphere_radius: f32,
    /// Number of latitude bands in the body sphere.
    pub latitude_segments: u32,
    /// Number of longitude slices in the body sphere.
    pub longitude_segments: u32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Initial vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Fly camera speed in world units per second.
    pub camera_speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Background colour used when no settings file has been saved yet.
    pub clear_color: [f32; 3],
}

/// The central body. Its position never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    pub name: String,
    /// Texture path; empty means untextured.
    pub texture: String,
    pub mass: f32,
    pub scale: f32,
    pub position: [f32; 3],
}

/// One orbiting body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    /// Texture path; empty means untextured.
    #[serde(default)]
    pub texture: String,
    /// Semi-major axis along X.
    pub semi_major_axis: f32,
    /// Semi-minor axis along Z. Must not exceed `semi_major_axis`.
    pub semi_minor_axis: f32,
    #[serde(default = "default_body_scale")]
    pub scale: f32,
    #[serde(default = "default_body_mass")]
    pub mass: f32,
}

fn default_body_scale() -> f32 {
    0.1
}

fn default_body_mass() -> f32 {
    0.01
}

/// Scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for orbit phase/speed jitter. `None` picks a random seed at startup.
    pub seed: Option<u64>,
    /// Divide the barycenter by total mass instead of using the raw weighted sum.
    pub normalize_barycenter: bool,
    /// Uniform multiplier applied to every orbit's axes (debug slider, 1..3).
    pub orbit_scale: f32,
    /// Global multiplier on every body's angular speed.
    pub speed_multiplier: f32,
    /// Extra scale added to the sun only (debug slider, 0..1).
    pub sun_scale_modifier: f32,
    pub sun: SunConfig,
    pub bodies: Vec<BodyConfig>,
}

/// Asset locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Cubemap faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub skybox_faces: Vec<String>,
    /// Static OBJ model; empty disables it.
    pub model: String,
    /// World-space translation of the static model.
    pub model_offset: [f32; 3],
    /// Flat settings file written on shutdown.
    pub settings_file: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Show the debug overlay at startup.
    pub overlay_enabled: bool,
    /// Port for the local debug API (debug builds only).
    pub api_port: u16,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 7.0,
            latitude_segments: 100,
            longitude_segments: 100,
            near: 0.1,
            far: 1000.0,
            fov_degrees: 45.0,
            camera_speed: 10.0,
            mouse_sensitivity: 0.1,
            clear_color: [0.0; 3],
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            name: "sun".to_string(),
            texture: "resources/textures/sun.jpg".to_string(),
            mass: 1.0,
            scale: 0.3,
            position: [0.0; 3],
        }
    }
}

impl BodyConfig {
    fn planet(name: &str, a: f32, b: f32, scale: f32, mass: f32) -> Self {
        Self {
            name: name.to_string(),
            texture: format!("resources/textures/{name}.jpg"),
            semi_major_axis: a,
            semi_minor_axis: b,
            scale,
            mass,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            normalize_barycenter: false,
            orbit_scale: 1.0,
            speed_multiplier: 1.0,
            sun_scale_modifier: 0.0,
            sun: SunConfig::default(),
            bodies: vec![
                BodyConfig::planet("earth", 52.0, 50.0, 0.1, 0.01),
                BodyConfig::planet("mars", 57.0, 55.0, 0.2, 0.5),
                BodyConfig::planet("venus", 62.0, 60.0, 0.1, 0.01),
                BodyConfig::planet("jupiter", 72.0, 70.0, 0.15, 0.01),
            ],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        let faces = ["right", "left", "top", "bot", "front", "back"];
        Self {
            skybox_faces: faces
                .iter()
                .map(|face| format!("resources/skybox/blue/bkg1_{face}.png"))
                .collect(),
            model: "resources/objects/backpack/backpack.obj".to_string(),
            model_offset: [0.0, 5.0, 0.0],
            settings_file: PathBuf::from("resources").join("program_state.txt"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            overlay_enabled: true,
            api_port: 9999,
        }
    }
}

/// Platform config directory for the orrery, e.g. `~/.config/orrery` on Linux.
///
/// Falls back to `./config` when the OS exposes no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("config"))
}

// --- Load / Save / Reload ---

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn require(field: &'static str, value: f32, ok: bool, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason,
        })
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require(field, value, value.is_finite(), "must be finite")
}

impl Config {
    /// Reject values that would poison the scene or the projection.
    ///
    /// Orbit geometry is checked later, when the scene is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        require(
            "render.sphere_radius",
            render.sphere_radius,
            render.sphere_radius.is_finite() && render.sphere_radius > 0.0,
            "must be positive",
        )?;
        require(
            "render.near",
            render.near,
            render.near.is_finite() && render.near > 0.0,
            "must be positive",
        )?;
        require(
            "render.far",
            render.far,
            render.far.is_finite() && render.far > render.near,
            "must exceed render.near",
        )?;
        require(
            "render.fov_degrees",
            render.fov_degrees,
            render.fov_degrees > 0.0 && render.fov_degrees < 180.0,
            "must be between 0 and 180",
        )?;
        require_finite("render.camera_speed", render.camera_speed)?;
        require_finite("render.mouse_sensitivity", render.mouse_sensitivity)?;
        for value in render.clear_color {
            require_finite("render.clear_color", value)?;
        }

        let scene = &self.scene;
        require_finite("scene.orbit_scale", scene.orbit_scale)?;
        require_finite("scene.speed_multiplier", scene.speed_multiplier)?;
        require_finite("scene.sun_scale_modifier", scene.sun_scale_modifier)?;
        Ok(())
    }

    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if it does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let write_error = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        // Body lists nest four deep; keep them readable.
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(write_error)
    }

    /// Re-read `config.ron`. `Some` only when it differs from `self`.
    ///
    /// A file that parses but fails [`Config::validate`] is an error, so the
    /// caller keeps running on `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        new_config.validate()?;
        if new_config == *self {
            return Ok(None);
        }
        log::info!("Config reloaded with changes");
        Ok(Some(new_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(4))
                .unwrap();
        assert!(ron_str.contains("width: 1200"));
        assert!(ron_str.contains("latitude_segments: 100"));
        assert!(ron_str.contains("\"jupiter\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_default_scene_matches_classic_layout() {
        let scene = SceneConfig::default();
        assert_eq!(scene.bodies.len(), 4);
        let mars = &scene.bodies[1];
        assert_eq!(mars.name, "mars");
        assert_eq!(mars.semi_major_axis, 57.0);
        assert_eq!(mars.semi_minor_axis, 55.0);
        assert_eq!(mars.mass, 0.5);
        assert!(!scene.normalize_barycenter);
        assert_eq!(scene.sun.mass, 1.0);
        for body in &scene.bodies {
            assert!(body.semi_major_axis >= body.semi_minor_axis);
        }
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scene, SceneConfig::default());
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_body_optional_fields_default() {
        let ron_str = r#"(scene: (bodies: [(name: "rock", semi_major_axis: 20.0, semi_minor_axis: 18.0)]))"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        let rock = &config.scene.bodies[0];
        assert_eq!(rock.texture, "");
        assert_eq!(rock.scale, 0.1);
        assert_eq!(rock.mass, 0.01);
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.scene.seed = Some(42);
        config.scene.normalize_barycenter = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.scene.orbit_scale = 2.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().scene.orbit_scale, 2.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_read_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        let dir = default_config_dir();
        assert!(dir.ends_with(APP_NAME) || dir.ends_with("config"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.scene.speed_multiplier = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "scene.speed_multiplier", .. })
        ));

        let mut config = Config::default();
        config.render.far = config.render.near;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "render.far", .. })
        ));

        let mut config = Config::default();
        config.render.sphere_radius = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_infinite_speed_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "(scene: (speed_multiplier: inf))",
        )
        .unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "scene.speed_multiplier", .. }
        ));
        assert!(err.to_string().contains("speed_multiplier"));
    }

    #[test]
    fn test_reload_rejects_invalid_edit() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "(scene: (speed_multiplier: NaN))",
        )
        .unwrap();
        assert!(matches!(
            config.reload(dir.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
