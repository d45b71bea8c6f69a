//! Configuration structs with defaults, validation, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sightline_voxel::MAX_CACHE_RADIUS;

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tracing engine settings.
    pub trace: TraceConfig,
    /// Probe scene and sweep settings.
    pub probe: ProbeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Tracing engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    /// Opacity cache radius in chunks; the window spans `2 * r + 1` chunks per axis.
    pub cache_radius: u32,
    /// Obstruction length tolerated per query. `0.0` selects binary mode.
    pub threshold: f64,
    /// Skip the opaque run the viewer stands in.
    pub ignore_start_if_opaque: bool,
}

/// Probe scene and sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Half-extent in voxels of the target cube swept around the origin.
    pub reach: i32,
    /// Fraction of voxels above the ground made opaque (0.0 - 1.0).
    pub density: f64,
    /// Scene generator seed.
    pub seed: u64,
    /// Viewer position.
    pub origin: [f64; 3],
    /// Sweeps run from the first origin.
    pub passes: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            cache_radius: 4,
            threshold: 0.0,
            ignore_start_if_opaque: false,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            reach: 24,
            density: 0.04,
            seed: 0x5EED,
            origin: [0.5, 64.5, 0.5],
            passes: 2,
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

/// Platform config directory for sightline, e.g. `~/.config/sightline`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sightline")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

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

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Rejects settings the engine or probe cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trace.cache_radius > MAX_CACHE_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "trace.cache_radius {} exceeds {}",
                self.trace.cache_radius, MAX_CACHE_RADIUS
            )));
        }
        if self.trace.threshold.is_nan() || self.trace.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "trace.threshold must be >= 0, got {}",
                self.trace.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.probe.density) {
            return Err(ConfigError::Invalid(format!(
                "probe.density must be within [0, 1], got {}",
                self.probe.density
            )));
        }
        if self.probe.reach < 0 {
            return Err(ConfigError::Invalid(format!(
                "probe.reach must be >= 0, got {}",
                self.probe.reach
            )));
        }
        Ok(())
    }
}
