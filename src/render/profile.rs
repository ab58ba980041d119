use crate::merge::{MergeSummary, summarize};
use crate::profile::types::{Document, MAIN_SECTION, VARIABLES_SECTION};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Merged profile in `tuned.conf` syntax.
pub struct IniView<'a>(pub &'a Document);

impl fmt::Display for IniView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let profile = self.0;
		writeln!(f, "# Merged tuned profile: {}", profile.name)?;
		writeln!(f, "# This is the final configuration that would be applied")?;
		writeln!(f)?;

		if !profile.options.is_empty() {
			writeln!(f, "[{MAIN_SECTION}]")?;
			write_options(f, &profile.options)?;
			writeln!(f)?;
		}

		if !profile.variables.is_empty() {
			writeln!(f, "[{VARIABLES_SECTION}]")?;
			write_options(f, &profile.variables)?;
			writeln!(f)?;
		}

		for (name, unit) in &profile.units {
			writeln!(f, "[{name}]")?;
			if let Some(priority) = unit.priority {
				writeln!(f, "# Priority: {priority}")?;
			}
			if !unit.enabled {
				writeln!(f, "# Enabled: false")?;
			}
			if !unit.devices.is_empty() {
				writeln!(f, "# Devices: {}", unit.devices)?;
			}
			write_options(f, &unit.options)?;
			writeln!(f)?;
		}

		Ok(())
	}
}

/// Multi-line values are written as indented continuation lines.
fn write_options(f: &mut fmt::Formatter<'_>, options: &IndexMap<String, String>) -> fmt::Result {
	for (key, value) in options {
		writeln!(f, "{key}={}", value.replace('\n', "\n\t"))?;
	}
	Ok(())
}

/// Human-readable overview of a merge.
pub struct SummaryView<'a> {
	pub merged: &'a Document,
	pub profiles: &'a [Document],
}

impl fmt::Display for SummaryView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let summary = summarize(self.profiles);

		writeln!(f, "Merged Profile Summary: {}", self.merged.name)?;
		writeln!(f, "{}", "=".repeat(50))?;
		writeln!(f, "Profile hierarchy: {}", summary.profiles.join(" -> "))?;
		writeln!(f, "Total sections: {}", summary.final_section_count)?;
		writeln!(f, "Total variables: {}", summary.final_variable_count)?;
		writeln!(f, "Conflicts resolved: {}", summary.conflicts_resolved)?;
		writeln!(f)?;

		if !self.merged.variables.is_empty() {
			writeln!(f, "Variables:")?;
			for (key, value) in &self.merged.variables {
				writeln!(f, "  {key} = {value}")?;
			}
			writeln!(f)?;
		}

		writeln!(f, "Configuration sections:")?;
		for (name, unit) in &self.merged.units {
			let status = if unit.enabled { "enabled" } else { "disabled" };
			match unit.priority {
				Some(priority) => writeln!(f, "  [{name}] - {status} (priority: {priority})")?,
				None => writeln!(f, "  [{name}] - {status}")?,
			}
		}

		Ok(())
	}
}

#[derive(Serialize)]
struct JsonUnit<'a> {
	enabled: bool,
	priority: Option<i64>,
	devices: &'a str,
	options: &'a IndexMap<String, String>,
}

#[derive(Serialize)]
struct JsonProfile<'a> {
	name: &'a str,
	variables: &'a IndexMap<String, String>,
	options: &'a IndexMap<String, String>,
	units: IndexMap<&'a str, JsonUnit<'a>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
	merged_profile: JsonProfile<'a>,
	hierarchy: Vec<&'a str>,
	merge_summary: MergeSummary,
}

/// Merged profile, hierarchy and merge summary as pretty-printed JSON.
pub fn to_json(merged: &Document, profiles: &[Document]) -> serde_json::Result<String> {
	let report = JsonReport {
		merged_profile: JsonProfile {
			name: &merged.name,
			variables: &merged.variables,
			options: &merged.options,
			units: merged
				.units
				.iter()
				.map(|(name, unit)| {
					(
						name.as_str(),
						JsonUnit {
							enabled: unit.enabled,
							priority: unit.priority,
							devices: &unit.devices,
							options: &unit.options,
						},
					)
				})
				.collect(),
		},
		hierarchy: profiles.iter().map(|p| p.name.as_str()).collect(),
		merge_summary: summarize(profiles),
	};

	serde_json::to_string_pretty(&report)
}
