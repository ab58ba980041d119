use crate::config::types::ViewerConfig;
use crate::error::{Result, TunedError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<ViewerConfig> {
	let content = std::fs::read_to_string(path).map_err(|source| TunedError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<ViewerConfig> {
	toml::from_str(content).map_err(|source| TunedError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})
}
