use crate::error::{Result, TunedError};
use crate::hierarchy::ProfileLoader;
use crate::locator::environment::{
	DirectoryStatus, EnvironmentInfo, detect_pod_environment, directory_status, environment_info,
};
use crate::profile::parser::{is_valid_profile_name, parse_file};
use crate::profile::types::Document;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Standard tuned profile directories in order of precedence.
pub const STANDARD_DIRECTORIES: &[&str] = &[
	"/etc/tuned/profiles",
	"/usr/lib/tuned/profiles",
	"/run/tuned/profiles",
];

/// Profile directories when running in a pod with the host mounted at `/host`.
pub const POD_MOUNT_DIRECTORIES: &[&str] = &[
	"/host/etc/tuned/profiles",
	"/host/usr/lib/tuned/profiles",
	"/etc/tuned/profiles",
	"/usr/lib/tuned/profiles",
];

/// Files recording the active profile, first readable one wins.
pub const ACTIVE_PROFILE_FILES: &[&str] = &["/etc/tuned/active_profile", "/host/etc/tuned/active_profile"];

/// Local directory searched first when it exists.
pub const LOCAL_PROFILES_DIR: &str = "./profiles";

/// File name of a profile inside its directory.
pub const PROFILE_FILE: &str = "tuned.conf";

/// Kind of search root a profile was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
	User,
	System,
	Runtime,
	Custom,
}

impl Origin {
	fn for_directory(dir: &Path) -> Self {
		let dir = dir.to_string_lossy();
		if dir.contains("/etc/tuned/profiles") {
			Origin::User
		} else if dir.contains("/usr/lib/tuned/profiles") {
			Origin::System
		} else if dir.contains("/run/tuned/profiles") {
			Origin::Runtime
		} else {
			Origin::Custom
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Origin::User => "user",
			Origin::System => "system",
			Origin::Runtime => "runtime",
			Origin::Custom => "custom",
		}
	}
}

impl fmt::Display for Origin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Basic facts about an installed profile, shown by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
	pub name: String,
	pub path: PathBuf,
	pub directory: PathBuf,
	pub origin: Origin,
	pub summary: Option<String>,
}

/// Finds profiles in a ranked list of search roots.
#[derive(Debug, Clone)]
pub struct ProfileLocator {
	directories: Vec<PathBuf>,
	in_pod: bool,
	active_profile_files: Vec<PathBuf>,
}

impl ProfileLocator {
	/// Build a locator from custom roots, or the standard roots for this host.
	///
	/// `./profiles` is searched first when it exists.
	pub fn new(custom_directories: Option<Vec<PathBuf>>, detect_pod: bool) -> Self {
		let in_pod = detect_pod && detect_pod_environment();

		let mut directories = match custom_directories {
			Some(dirs) if !dirs.is_empty() => dirs,
			_ if in_pod => POD_MOUNT_DIRECTORIES.iter().map(PathBuf::from).collect(),
			_ => STANDARD_DIRECTORIES.iter().map(PathBuf::from).collect(),
		};

		let local = PathBuf::from(LOCAL_PROFILES_DIR);
		if local.exists() {
			directories.insert(0, local);
		}

		debug!(?directories, in_pod, "profile search roots");
		Self {
			directories,
			in_pod,
			active_profile_files: ACTIVE_PROFILE_FILES.iter().map(PathBuf::from).collect(),
		}
	}

	/// Build a locator that searches exactly `directories`.
	pub fn with_directories(directories: Vec<PathBuf>) -> Self {
		Self {
			directories,
			in_pod: false,
			active_profile_files: ACTIVE_PROFILE_FILES.iter().map(PathBuf::from).collect(),
		}
	}

	/// Replace the files consulted by [`ProfileLocator::active_profile`].
	pub fn with_active_profile_files(mut self, files: Vec<PathBuf>) -> Self {
		self.active_profile_files = files;
		self
	}

	pub fn directories(&self) -> &[PathBuf] {
		&self.directories
	}

	pub fn in_pod(&self) -> bool {
		self.in_pod
	}

	/// Path of the first `<root>/<name>/tuned.conf` that exists.
	pub fn find_profile(&self, name: &str) -> Option<PathBuf> {
		if !is_valid_profile_name(name) {
			debug!(profile = name, "rejecting invalid profile name");
			return None;
		}

		self.directories
			.iter()
			.filter(|dir| dir.is_dir())
			.map(|dir| dir.join(name).join(PROFILE_FILE))
			.find(|path| path.is_file())
	}

	/// Names of all profiles in any search root, sorted.
	pub fn list_available_profiles(&self) -> Vec<String> {
		let mut names = BTreeSet::new();

		for dir in &self.directories {
			let Ok(entries) = std::fs::read_dir(dir) else {
				continue;
			};
			for entry in entries.flatten() {
				let path = entry.path();
				if path.join(PROFILE_FILE).is_file() {
					names.insert(entry.file_name().to_string_lossy().into_owned());
				}
			}
		}

		names.into_iter().collect()
	}

	/// Location, origin and summary of a profile.
	pub fn profile_info(&self, name: &str) -> Option<ProfileInfo> {
		let path = self.find_profile(name)?;
		let directory = path.parent()?.to_path_buf();
		let origin = directory
			.parent()
			.map(Origin::for_directory)
			.unwrap_or(Origin::Custom);

		Some(ProfileInfo {
			name: name.to_string(),
			summary: read_summary(&path),
			path,
			directory,
			origin,
		})
	}

	/// Name recorded in the first readable active-profile file.
	pub fn active_profile(&self) -> Option<String> {
		for file in &self.active_profile_files {
			if !file.is_file() {
				continue;
			}
			match std::fs::read_to_string(file) {
				Ok(content) => return Some(content.trim().to_string()),
				Err(e) => warn!(path = %file.display(), error = %e, "unreadable active profile file"),
			}
		}
		None
	}

	pub fn environment_info(&self) -> EnvironmentInfo {
		environment_info(self.in_pod, &self.directories)
	}

	pub fn validate_directories(&self) -> Vec<DirectoryStatus> {
		directory_status(&self.directories)
	}
}

impl ProfileLoader for ProfileLocator {
	fn locate_and_parse(&self, name: &str) -> Result<Document> {
		let path = self
			.find_profile(name)
			.ok_or_else(|| TunedError::ProfileNotFound {
				name: name.to_string(),
				searched: self.directories.clone(),
			})?;

		debug!(profile = name, path = %path.display(), "parsing profile");
		parse_file(&path)
	}
}

/// Value of the first `summary=` line, if any.
fn read_summary(path: &Path) -> Option<String> {
	let content = std::fs::read_to_string(path).ok()?;
	content.lines().find_map(|line| {
		let (key, value) = line.trim().split_once('=')?;
		(key.trim() == "summary").then(|| value.trim().to_string())
	})
}
