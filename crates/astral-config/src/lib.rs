//! Configuration for the chunk pipeline.
//!
//! Settings persist to disk as a RON file with forward-compatible
//! serialization; CLI arguments override individual values after loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, RenderConfig, StreamingConfig, WorldConfig, default_data_dir};
pub use error::ConfigError;
