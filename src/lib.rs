//! tuned-viewer - resolve and merge tuned profile hierarchies.
//!
//! This library provides the core functionality for tuned-viewer, including:
//! - Parsing of `tuned.conf` profile documents
//! - Depth-first include resolution with cycle detection
//! - The merge rules tuned applies when profiles include each other
//! - Locating profiles in the standard tuned directories
//!
//! # Example
//!
//! ```no_run
//! use tuned_viewer::hierarchy::Resolver;
//! use tuned_viewer::locator::ProfileLocator;
//! use tuned_viewer::merge::merge;
//!
//! let resolver = Resolver::new(ProfileLocator::new(None, true));
//! let profiles = resolver.resolve("throughput-performance").unwrap();
//! let effective = merge(&profiles);
//!
//! for (name, unit) in &effective.units {
//!     println!("[{name}] {} options", unit.options.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod locator;
pub mod merge;
pub mod profile;
pub mod render;

pub use error::{Result, TunedError};
