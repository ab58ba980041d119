use indexmap::IndexMap;
use serde::Serialize;

/// Name of the reserved section holding top-level profile options.
pub const MAIN_SECTION: &str = "main";

/// Name of the reserved section holding profile variables.
pub const VARIABLES_SECTION: &str = "variables";

/// Name of the unit whose `script` option accumulates across the hierarchy.
pub const SCRIPT_UNIT: &str = "script";

/// Option in `[main]` listing the profiles this profile inherits from.
pub const INCLUDE_OPTION: &str = "include";

/// Prefix of an option that removes a previously inherited option.
pub const DROP_PREFIX: &str = "drop_";

/// Truthiness rule tuned applies to unit flags such as `replace` and `enabled`.
pub fn is_truthy(value: &str) -> bool {
	matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// A single parsed tuned profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
	/// Profile name, normally the name of the directory holding `tuned.conf`.
	pub name: String,

	/// Options from `[main]`, excluding `include`.
	pub options: IndexMap<String, String>,

	/// Variables from `[variables]` in declaration order.
	pub variables: IndexMap<String, String>,

	/// All non-reserved sections, keyed by section name.
	pub units: IndexMap<String, Unit>,

	/// Profiles (or absolute paths) listed in `include`, in declared order.
	pub includes: Vec<String>,
}

impl Document {
	/// Create an empty profile with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

/// A named configuration section within a profile, e.g. `[sysctl]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
	pub name: String,

	/// Stored settings. Never contains `replace`; that is consumed into the flag.
	pub options: IndexMap<String, String>,

	/// Whether this unit discards any inherited unit of the same name.
	pub replace: bool,

	/// Parsed `priority`, `None` when absent or not an integer.
	pub priority: Option<i64>,

	pub enabled: bool,

	pub devices: String,
}

impl Unit {
	/// Build a unit from its raw section options, deriving the flag fields.
	pub fn new(name: impl Into<String>, mut options: IndexMap<String, String>) -> Self {
		let replace = options
			.shift_remove("replace")
			.is_some_and(|value| is_truthy(&value));
		let priority = options
			.get("priority")
			.map(String::as_str)
			.and_then(parse_priority);
		let enabled = options.get("enabled").is_none_or(|value| is_truthy(value));
		let devices = options.get("devices").cloned().unwrap_or_default();

		Self {
			name: name.into(),
			options,
			replace,
			priority,
			enabled,
			devices,
		}
	}

	/// True when the unit carries a `priority` option that is not an integer.
	pub fn has_invalid_priority(&self) -> bool {
		self.options.contains_key("priority") && self.priority.is_none()
	}
}

fn parse_priority(value: &str) -> Option<i64> {
	value.trim().parse().ok()
}
