//! Finding profiles on disk.
//!
//! This module handles:
//! - Ranked search roots (standard, pod-mounted, custom)
//! - Profile listing and per-profile information
//! - The active-profile marker file
//! - Pod environment detection

pub mod environment;
pub mod profiles;

pub use environment::{DirectoryStatus, EnvironmentInfo, detect_pod_environment};
pub use profiles::{Origin, ProfileInfo, ProfileLocator};
