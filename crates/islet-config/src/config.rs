//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use islet_lighting::{LightMotion, LightViewStrategy, OrthoBounds};
use islet_space::{ActorDesc, CloudBillboard, default_clouds, default_solar_system};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Terrain grid and noise settings.
    pub terrain: TerrainConfig,
    /// Light motion and shadow projection.
    pub light: LightConfig,
    /// Orbit camera settings.
    pub camera: CameraConfig,
    /// Actors and billboards.
    pub scene: SceneConfig,
    /// Frame stepping.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Octave settings for the terrain noise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: u32,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
    /// Frequency of the first octave.
    pub base_frequency: f64,
}

/// Terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Heightfield samples along X.
    pub grid_width: usize,
    /// Heightfield samples along Y.
    pub grid_height: usize,
    /// Elevation below which vertices are flattened to water.
    pub water_level: f32,
    /// Uniform scale applied to mesh positions.
    pub world_scale: f32,
    /// Extent of the sampled noise window.
    pub zoom: f32,
    /// Starting noise-space offset.
    pub offset: [f32; 2],
    pub noise: NoiseConfig,
}

/// Light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    /// World-space light position at `sim_time = 0`.
    pub start_position: [f32; 3],
    /// Radians per simulated second about the world Y axis.
    pub angular_speed: f32,
    /// How the shadow camera is derived from the light position.
    pub strategy: LightViewStrategy,
    /// Distance of the orbit-derived shadow camera from the origin.
    pub orbit_radius: f32,
    /// Orthographic shadow projection box.
    pub ortho: OrthoBounds,
}

/// Orbit camera configuration. Angles are in radians.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the origin at a distance factor of 1.
    pub distance_base: f32,
    pub angle_z: f32,
    pub angle_y: f32,
    pub distance_factor: f32,
    pub min_distance_factor: f32,
    pub max_distance_factor: f32,
    /// Distance factor multiplier per zoom step.
    pub zoom_step: f32,
    /// Angles restored by the preset view.
    pub preset_angle_z: f32,
    pub preset_angle_y: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Noise-space distance per pan step.
    pub pan_speed: f32,
}

/// Scene content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Actors in draw order.
    pub actors: Vec<ActorDesc>,
    pub clouds: Vec<CloudBillboard>,
    /// Ring count of the actor sphere mesh.
    pub sphere_divisions: u32,
}

/// Headless stepping configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of frames to run.
    pub frames: u32,
    /// Seconds of simulated time per frame.
    pub frame_time: f32,
    /// Begin with the simulation clock paused.
    pub start_paused: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Islet".to_string(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.35,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid_width: 96,
            grid_height: 96,
            water_level: -0.03125,
            world_scale: 1.0,
            zoom: 10.0,
            offset: [0.0, 0.0],
            noise: NoiseConfig::default(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        let motion = LightMotion::default();
        Self {
            start_position: motion.start_position,
            angular_speed: motion.angular_speed,
            strategy: LightViewStrategy::default(),
            orbit_radius: 100.0,
            ortho: OrthoBounds::default(),
        }
    }
}

impl LightConfig {
    pub fn motion(&self) -> LightMotion {
        LightMotion {
            start_position: self.start_position,
            angular_speed: self.angular_speed,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_base: 0.75,
            angle_z: -0.5,
            angle_y: -0.42,
            distance_factor: 1.0,
            min_distance_factor: 0.5,
            max_distance_factor: 1.5,
            zoom_step: 1.08,
            preset_angle_z: -1.0,
            preset_angle_y: -0.42,
            fov_y_degrees: 60.0,
            near: 0.01,
            far: 100.0,
            pan_speed: 0.1,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            actors: default_solar_system(),
            clouds: default_clouds(),
            sphere_divisions: 10,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            frame_time: 1.0 / 60.0,
            start_paused: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Islet, e.g. `~/.config/islet` on Linux.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("islet")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values that parse but would produce a degenerate scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.terrain.grid_width == 0 || self.terrain.grid_height == 0 {
            return invalid("terrain.grid_width/grid_height", "must be non-zero");
        }
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window.width/height", "must be non-zero");
        }
        if self.scene.sphere_divisions < 2 {
            return invalid("scene.sphere_divisions", "must be at least 2");
        }
        if self.camera.min_distance_factor > self.camera.max_distance_factor {
            return invalid("camera.min_distance_factor", "exceeds max_distance_factor");
        }
        let frame_time = self.simulation.frame_time;
        if !frame_time.is_finite() || frame_time < 0.0 {
            return invalid("simulation.frame_time", "must be a non-negative number");
        }
        Ok(())
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
        assert!(ron_str.contains("grid_width: 96"));
        assert!(ron_str.contains("OrbitLookAt"));
        assert!(ron_str.contains("\"moon\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), terrain: (grid_width: 32), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.terrain.grid_width, 32);
        assert_eq!(config.terrain.grid_height, 96);
        assert_eq!(config.light, LightConfig::default());
        assert_eq!(config.scene.actors.len(), 4);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_strategy_from_ron() {
        let config: Config = ron::from_str("(light: (strategy: DirectLookAt))").unwrap();
        assert_eq!(config.light.strategy, LightViewStrategy::DirectLookAt);
        assert_eq!(config.light.orbit_radius, 100.0);
    }

    #[test]
    fn test_light_motion_from_config() {
        let light = LightConfig {
            angular_speed: 0.0,
            ..Default::default()
        };
        let p = light.motion().position_at(10.0);
        assert_eq!(p.to_array(), [-100.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.terrain.grid_width = 128;
        config.light.strategy = LightViewStrategy::DirectLookAt;
        config.scene.actors.truncate(1);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.pan_speed = 0.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().camera.pan_speed, 0.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// This is a comment\n(\n  // Another comment\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.terrain.grid_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field.starts_with("terrain")
        ));

        let mut config = Config::default();
        config.camera.min_distance_factor = 2.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.frame_time = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_dir_is_named() {
        assert!(default_config_dir().ends_with("islet"));
    }
}
