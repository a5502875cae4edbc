//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "astral", about = "Voxel planet chunk pipeline")]
pub struct CliArgs {
    /// World name.
    #[arg(long)]
    pub world: Option<String>,

    /// Terrain generation seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Chunk snapshot directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Block definition directory.
    #[arg(long)]
    pub definitions_dir: Option<PathBuf>,

    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<i32>,

    /// Pipeline submissions per planet per frame.
    #[arg(long)]
    pub max_chunks_per_frame: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref name) = args.world {
            self.world.name = name.clone();
        }
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref dir) = args.data_dir {
            self.world.data_dir = Some(dir.clone());
        }
        if let Some(ref dir) = args.definitions_dir {
            self.world.definitions_dir = Some(dir.clone());
        }
        if let Some(rd) = args.render_distance {
            self.streaming.render_distance = rd;
        }
        if let Some(cap) = args.max_chunks_per_frame {
            self.streaming.max_chunks_per_frame = cap;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            world: Some("mars-test".to_string()),
            seed: Some(1234),
            render_distance: Some(4),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.name, "mars-test");
        assert_eq!(config.world.seed, 1234);
        assert_eq!(config.streaming.render_distance, 4);
        // Non-overridden fields retain defaults
        assert_eq!(config.streaming.max_chunks_per_frame, 8);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
