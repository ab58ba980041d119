use std::path::PathBuf;

/// Library-level structured errors for tuned-viewer.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum TunedError {
	#[error("Malformed profile '{name}' at line {line}: {message}")]
	MalformedDocument {
		name: String,
		line: usize,
		message: String,
	},

	#[error("Duplicate section [{section}] in profile '{name}' at line {line}")]
	DuplicateSection {
		name: String,
		section: String,
		line: usize,
	},

	#[error("Profile '{name}' not found in directories: {}", display_paths(searched))]
	ProfileNotFound { name: String, searched: Vec<PathBuf> },

	#[error("Circular include detected: {}", cycle.join(" -> "))]
	CircularInclude { cycle: Vec<String> },

	#[error("Failed to read profile file: {path}")]
	ProfileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to resolve the user config directory")]
	ConfigDirectoryNotFound,
}

fn display_paths(paths: &[PathBuf]) -> String {
	paths
		.iter()
		.map(|p| p.display().to_string())
		.collect::<Vec<_>>()
		.join(", ")
}

/// Result type alias using TunedError.
pub type Result<T> = std::result::Result<T, TunedError>;
