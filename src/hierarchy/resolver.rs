use crate::error::{Result, TunedError};
use crate::merge::merge;
use crate::profile::parser::{is_valid_profile_name, parse_sections};
use crate::profile::types::{Document, VARIABLES_SECTION};
use crate::profile::variables::referenced_variables;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Capability the resolver needs to turn a profile name into a document.
///
/// The filesystem implementation is [`crate::locator::ProfileLocator`];
/// tests use an in-memory map.
pub trait ProfileLoader {
	/// Find and parse the named profile.
	///
	/// Must fail with [`TunedError::ProfileNotFound`] when the name is unknown.
	fn locate_and_parse(&self, name: &str) -> Result<Document>;

	/// Read an include given as an absolute path. `None` skips the include.
	fn read_external(&self, path: &Path) -> Option<String> {
		match std::fs::read_to_string(path) {
			Ok(content) => Some(content),
			Err(e) => {
				debug!(path = %path.display(), error = %e, "skipping unreadable external include");
				None
			}
		}
	}
}

/// One profile in a [`HierarchyTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileNode {
	pub name: String,
	pub includes: Vec<String>,
	pub sections: Vec<String>,
	pub variables: Vec<String>,
	pub options: IndexMap<String, String>,
}

/// Resolved hierarchy of a profile, ancestors first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyTree {
	pub root: Option<String>,
	pub profiles: Vec<ProfileNode>,
	pub total_count: usize,
}

/// Outcome of [`Resolver::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
	pub valid: bool,
	pub errors: Vec<String>,
	pub warnings: Vec<String>,
	pub profile_count: usize,
	pub profiles: Vec<String>,
}

/// Expands `include` directives depth-first into dependency order.
#[derive(Debug)]
pub struct Resolver<L> {
	loader: L,
}

/// Working set of one resolution.
#[derive(Default)]
struct Walk {
	/// Names currently being expanded.
	path: Vec<String>,
	seen: HashSet<String>,
	output: Vec<Document>,
}

impl<L: ProfileLoader> Resolver<L> {
	pub fn new(loader: L) -> Self {
		Self { loader }
	}

	pub fn loader(&self) -> &L {
		&self.loader
	}

	/// Resolve `name` and everything it includes.
	///
	/// Every profile appears once, after all of its includes; `name` is last.
	/// The first cycle or missing profile aborts the whole resolution.
	pub fn resolve(&self, name: &str) -> Result<Vec<Document>> {
		let mut walk = Walk::default();
		self.visit(name, &mut walk)?;
		debug!(
			root = name,
			count = walk.output.len(),
			"resolved profile hierarchy"
		);
		Ok(walk.output)
	}

	fn visit(&self, name: &str, walk: &mut Walk) -> Result<()> {
		if let Some(start) = walk.path.iter().position(|n| n == name) {
			let mut cycle = walk.path[start..].to_vec();
			cycle.push(name.to_string());
			return Err(TunedError::CircularInclude { cycle });
		}

		if walk.seen.contains(name) {
			return Ok(());
		}

		debug!(profile = name, depth = walk.path.len(), "resolving profile");
		let document = self.loader.locate_and_parse(name)?;
		walk.seen.insert(name.to_string());
		walk.path.push(name.to_string());

		for include in &document.includes {
			let include_path = Path::new(include);
			if include_path.is_absolute() {
				if let Some(external) = self.external_include(include_path, name) {
					walk.output.push(external);
				}
			} else {
				self.visit(include, walk)?;
			}
		}

		walk.path.pop();
		walk.output.push(document);
		Ok(())
	}

	/// Load an absolute-path include as a variables-only profile.
	///
	/// Keys of a `[variables]` section are used as-is; otherwise every
	/// option becomes `section.option`.
	fn external_include(&self, path: &Path, owner: &str) -> Option<Document> {
		let content = self.loader.read_external(path)?;
		let label = path.display().to_string();

		let sections = match parse_sections(&content, &label) {
			Ok(sections) => sections,
			Err(e) => {
				warn!(path = %label, error = %e, "ignoring unparsable external include");
				return None;
			}
		};

		let mut external = Document::new(format!("{owner}_external"));
		match sections.iter().find(|s| s.name == VARIABLES_SECTION) {
			Some(variables) => external.variables.extend(variables.entries.clone()),
			None => {
				for section in &sections {
					for (key, value) in &section.entries {
						external
							.variables
							.insert(format!("{}.{}", section.name, key), value.clone());
					}
				}
			}
		}

		debug!(
			path = %label,
			variables = external.variables.len(),
			"loaded external include"
		);
		Some(external)
	}

	/// Describe the resolved hierarchy of `name` profile by profile.
	pub fn dependency_tree(&self, name: &str) -> Result<HierarchyTree> {
		let profiles = self.resolve(name)?;

		Ok(HierarchyTree {
			root: profiles.last().map(|p| p.name.clone()),
			total_count: profiles.len(),
			profiles: profiles
				.iter()
				.map(|p| ProfileNode {
					name: p.name.clone(),
					includes: p.includes.clone(),
					sections: p.units.keys().cloned().collect(),
					variables: p.variables.keys().cloned().collect(),
					options: p.options.clone(),
				})
				.collect(),
		})
	}

	/// Check that `name` resolves, reporting problems instead of failing.
	pub fn validate(&self, name: &str) -> ValidationReport {
		let mut report = ValidationReport::default();

		match self.resolve(name) {
			Ok(profiles) => {
				report.valid = true;
				report.profile_count = profiles.len();
				report.profiles = profiles.iter().map(|p| p.name.clone()).collect();
				report.warnings = collect_warnings(&profiles);
			}
			Err(e) => {
				let message = match &e {
					TunedError::CircularInclude { .. } => format!("Circular dependency: {e}"),
					TunedError::ProfileNotFound { .. } => format!("Missing profile: {e}"),
					TunedError::MalformedDocument { .. } | TunedError::DuplicateSection { .. } => {
						format!("Invalid profile: {e}")
					}
					_ => format!("Unexpected error: {e}"),
				};
				report.errors.push(message);
			}
		}

		report
	}
}

/// Non-fatal problems in an otherwise resolvable hierarchy.
fn collect_warnings(profiles: &[Document]) -> Vec<String> {
	let mut warnings = Vec::new();

	for profile in profiles {
		if !is_valid_profile_name(&profile.name) {
			warnings.push(format!(
				"Profile name '{}' does not follow tuned naming rules",
				profile.name
			));
		}
		for unit in profile.units.values() {
			if unit.has_invalid_priority() {
				warnings.push(format!(
					"Unit [{}] in profile '{}' has a non-integer priority '{}'",
					unit.name,
					profile.name,
					unit.options.get("priority").map(String::as_str).unwrap_or_default()
				));
			}
		}
	}

	let merged = merge(profiles);
	for unit in merged.units.values() {
		for (key, value) in &unit.options {
			for variable in referenced_variables(value) {
				if !merged.variables.contains_key(variable) {
					warnings.push(format!(
						"Unit [{}] option '{}' references undefined variable '{}'",
						unit.name, key, variable
					));
				}
			}
		}
	}

	warnings
}
