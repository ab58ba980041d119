//! Text and JSON presentation of profiles and reports.
//!
//! Views implement `Display` so the CLI can print them directly and tests
//! can compare strings.

pub mod profile;
pub mod report;

pub use profile::{IniView, SummaryView, to_json};
pub use report::{EnvironmentView, HierarchyView, ListView, ValidationView};
