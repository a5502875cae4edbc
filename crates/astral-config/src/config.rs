//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity and persistence settings.
    pub world: WorldConfig,
    /// Chunk streaming settings.
    pub streaming: StreamingConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World identity and persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World name; also names the snapshot subdirectory.
    pub name: String,
    /// Seed for deterministic terrain generation.
    pub seed: u32,
    /// Planet radius in voxels.
    pub planet_radius: f32,
    /// Root directory for chunk snapshots. `None` uses the platform data
    /// directory; an empty world is regenerated if it is unavailable.
    pub data_dir: Option<PathBuf>,
    /// Directory of block definition files; missing is non-fatal.
    pub definitions_dir: Option<PathBuf>,
}

/// Chunk streaming tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Streaming radius in chunks.
    pub render_distance: i32,
    /// Pipeline submissions per planet per frame.
    pub max_chunks_per_frame: usize,
    /// Generation pool threads (0 = size from CPU count).
    pub generation_threads: usize,
    /// Mesh pool threads (0 = size from CPU count).
    pub mesh_threads: usize,
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Texture atlas columns (atlas is square).
    pub atlas_columns: u32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            seed: 42,
            planet_radius: 64.0,
            data_dir: None,
            definitions_dir: None,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: 8,
            max_chunks_per_frame: 8,
            generation_threads: 0,
            mesh_threads: 0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { atlas_columns: 10 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform data directory for chunk snapshots, when one exists.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("astral"))
}

// --- Load / Save ---

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
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
