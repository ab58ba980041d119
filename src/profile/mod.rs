//! Profile documents and their parsing.
//!
//! This module handles:
//! - The in-memory model of one `tuned.conf` (options, variables, units)
//! - INI-style parsing of profile text
//! - `${name}` variable substitution for callers that want it

pub mod parser;
pub mod types;
pub mod variables;

pub use parser::{RawSection, is_valid_profile_name, parse_document, parse_file, parse_sections};
pub use types::{Document, Unit, is_truthy};
pub use variables::{expand_document, expand_variables, referenced_variables};
