use serde::Deserialize;
use std::path::PathBuf;

/// Output format for `show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	/// tuned.conf-style sections
	#[default]
	Ini,
	/// Merged profile, hierarchy and merge summary as JSON
	Json,
	/// Human-readable overview
	Summary,
}

/// Settings from the viewer's own config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewerConfig {
	/// Profile search roots. Replaces the standard tuned directories.
	#[serde(default)]
	pub directories: Vec<PathBuf>,

	/// If false, never switch to pod-mounted directories.
	#[serde(default = "default_detect_pod")]
	pub detect_pod: bool,

	/// Default format for `show` when `--format` is not given.
	#[serde(default)]
	pub format: Option<OutputFormat>,

	/// Files holding the active profile name, first readable one wins.
	#[serde(default)]
	pub active_profile_files: Vec<PathBuf>,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			directories: Vec::new(),
			detect_pod: true,
			format: None,
			active_profile_files: Vec::new(),
		}
	}
}

fn default_detect_pod() -> bool {
	true
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: ViewerConfig,

	/// The path this config was loaded from, `None` for built-in defaults.
	pub path: Option<PathBuf>,
}
