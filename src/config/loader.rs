use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, ViewerConfig};
use crate::error::{Result, TunedError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TUNED_VIEWER_CONFIG";

/// Environment variable that, if truthy, skips config lookup entirely.
pub const NO_CONFIG_ENV_VAR: &str = "TUNED_VIEWER_NO_CONFIG";

/// Load the viewer config, falling back to defaults when there is none.
///
/// The lookup order is:
/// 1. Nothing at all if `TUNED_VIEWER_NO_CONFIG` is truthy
/// 2. `$TUNED_VIEWER_CONFIG` if set
/// 3. `<config dir>/tuned-viewer/config.toml`
///
/// A missing file yields defaults; an unreadable or invalid one is an error.
pub fn load_config() -> Result<LoadedConfig> {
	if env_flag(NO_CONFIG_ENV_VAR) {
		debug!("config lookup disabled by {NO_CONFIG_ENV_VAR}");
		return Ok(defaults());
	}

	let path = match config_path() {
		Ok(path) => path,
		Err(TunedError::ConfigDirectoryNotFound) => {
			debug!("no user config directory, using defaults");
			return Ok(defaults());
		}
		Err(e) => return Err(e),
	};

	load_config_from(&path)
}

/// Load the config at `path`, or defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<LoadedConfig> {
	if !path.exists() {
		debug!(path = %path.display(), "no config file, using defaults");
		return Ok(defaults());
	}

	let config = parse_config_file(path)?;
	debug!(path = %path.display(), "loaded config file");
	Ok(LoadedConfig {
		config,
		path: Some(path.to_path_buf()),
	})
}

/// Get the path to the user's config file.
pub fn config_path() -> Result<PathBuf> {
	if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
		return Ok(PathBuf::from(explicit));
	}

	let config_dir = dirs::config_dir().ok_or(TunedError::ConfigDirectoryNotFound)?;
	Ok(config_dir.join("tuned-viewer").join("config.toml"))
}

fn defaults() -> LoadedConfig {
	LoadedConfig {
		config: ViewerConfig::default(),
		path: None,
	}
}

/// An unset variable, or one holding a falsy value, leaves the flag off.
fn env_flag(var_name: &str) -> bool {
	std::env::var(var_name).is_ok_and(|value| !is_falsy(&value))
}

fn is_falsy(value: &str) -> bool {
	matches!(
		value.trim().to_lowercase().as_str(),
		"" | "0" | "false" | "no"
	)
}
