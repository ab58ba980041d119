//! Include resolution for profile hierarchies.
//!
//! This module handles:
//! - Depth-first expansion of `include` directives
//! - Cycle and missing-profile detection
//! - Absolute-path includes loaded as variable files
//! - Tree views and non-failing validation reports

pub mod resolver;

pub use resolver::{HierarchyTree, ProfileLoader, ProfileNode, Resolver, ValidationReport};
