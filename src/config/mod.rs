//! Configuration loading for tuned-viewer itself.
//!
//! This module handles:
//! - TOML config file parsing
//! - Config file discovery via environment and user config directory

pub mod loader;
pub mod parser;
pub mod types;

pub use loader::{config_path, load_config, load_config_from};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{LoadedConfig, OutputFormat, ViewerConfig};
