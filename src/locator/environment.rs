use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Service account mount present in every Kubernetes pod.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Host `/etc` as mounted into tuned pods.
pub const HOST_ETC_DIR: &str = "/host/etc";

/// Environment variables reported by `env`.
pub const REPORTED_ENV_VARS: &[&str] = &[
	"NODE_NAME",
	"KUBERNETES_SERVICE_HOST",
	"KUBERNETES_NAMESPACE",
	"POD_NAME",
];

/// Whether a profile search root exists and can be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStatus {
	pub path: PathBuf,
	pub readable: bool,
}

/// Where the locator is running and where it looks for profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
	pub in_pod: bool,
	pub searched_directories: Vec<DirectoryStatus>,
	pub environment_variables: BTreeMap<String, String>,
	pub service_account: bool,
	pub namespace: Option<String>,
}

/// Detect if we're running inside a Kubernetes pod.
pub fn detect_pod_environment() -> bool {
	Path::new(SERVICE_ACCOUNT_DIR).exists()
		|| std::env::var_os("KUBERNETES_SERVICE_HOST").is_some()
		|| Path::new(HOST_ETC_DIR).exists()
		|| std::env::var_os("NODE_NAME").is_some()
}

/// Gather pod-related environment details for the given search roots.
pub fn environment_info(in_pod: bool, directories: &[PathBuf]) -> EnvironmentInfo {
	let environment_variables = REPORTED_ENV_VARS
		.iter()
		.filter_map(|var| {
			std::env::var(var)
				.ok()
				.filter(|value| !value.is_empty())
				.map(|value| (var.to_string(), value))
		})
		.collect();

	let service_account = Path::new(SERVICE_ACCOUNT_DIR).exists();
	let namespace = if service_account {
		std::fs::read_to_string(Path::new(SERVICE_ACCOUNT_DIR).join("namespace"))
			.ok()
			.map(|ns| ns.trim().to_string())
	} else {
		None
	};

	EnvironmentInfo {
		in_pod,
		searched_directories: directory_status(directories),
		environment_variables,
		service_account,
		namespace,
	}
}

/// Check that each directory exists and is readable.
pub fn directory_status(directories: &[PathBuf]) -> Vec<DirectoryStatus> {
	directories
		.iter()
		.map(|path| DirectoryStatus {
			path: path.clone(),
			readable: path.is_dir() && std::fs::read_dir(path).is_ok(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_directory_status() {
		let temp_dir = tempfile::tempdir().unwrap();
		let missing = temp_dir.path().join("missing");
		let status = directory_status(&[temp_dir.path().to_path_buf(), missing.clone()]);

		assert_eq!(status.len(), 2);
		assert!(status[0].readable);
		assert_eq!(status[1].path, missing);
		assert!(!status[1].readable);
	}

	#[test]
	fn test_environment_info_reports_directories() {
		let temp_dir = tempfile::tempdir().unwrap();
		let info = environment_info(false, &[temp_dir.path().to_path_buf()]);
		assert!(!info.in_pod);
		assert_eq!(info.searched_directories.len(), 1);
		assert!(info.searched_directories[0].readable);
		for key in info.environment_variables.keys() {
			assert!(REPORTED_ENV_VARS.contains(&key.as_str()));
		}
	}
}
