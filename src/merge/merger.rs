use crate::profile::types::{DROP_PREFIX, Document, SCRIPT_UNIT, Unit, VARIABLES_SECTION, is_truthy};
use serde::Serialize;
use std::collections::HashSet;

/// Diagnostic overview of a merge, as shown by `show --format summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
	/// Input profile names in the order given.
	pub profiles: Vec<String>,

	/// Order in which profiles were folded (same as `profiles`).
	pub merge_order: Vec<String>,

	/// Number of units across all inputs.
	pub total_input_sections: usize,

	pub final_sections: Vec<String>,
	pub final_section_count: usize,
	pub final_variables: Vec<String>,
	pub final_variable_count: usize,

	/// Units that were defined by more than one input.
	pub conflicts_resolved: usize,
}

/// Merge profiles given in dependency order (ancestors first) into one.
///
/// The result is named after the last profile. An empty slice yields an
/// empty placeholder profile.
pub fn merge(profiles: &[Document]) -> Document {
	let Some((first, rest)) = profiles.split_first() else {
		return Document::default();
	};

	let mut merged = rest.iter().fold(first.clone(), |mut acc, next| {
		merge_into(&mut acc, next);
		acc
	});

	if let Some(last) = profiles.last() {
		merged.name = last.name.clone();
	}

	merged
}

/// Summarize what merging `profiles` produces.
pub fn summarize(profiles: &[Document]) -> MergeSummary {
	if profiles.is_empty() {
		return MergeSummary::default();
	}

	let merged = merge(profiles);
	let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();

	MergeSummary {
		profiles: names.clone(),
		merge_order: names,
		total_input_sections: profiles.iter().map(|p| p.units.len()).sum(),
		final_sections: merged.units.keys().cloned().collect(),
		final_section_count: merged.units.len(),
		final_variables: merged.variables.keys().cloned().collect(),
		final_variable_count: merged.variables.len(),
		conflicts_resolved: count_conflicts(profiles),
	}
}

/// Fold `next` into the accumulated profile.
fn merge_into(acc: &mut Document, next: &Document) {
	for (key, value) in &next.options {
		acc.options.insert(key.clone(), value.clone());
	}

	merge_variables(acc, next);

	for (name, unit) in &next.units {
		if name == VARIABLES_SECTION {
			continue;
		}

		match acc.units.get_mut(name) {
			Some(existing) if !unit.replace => merge_unit(existing, unit),
			_ => {
				acc.units.insert(name.clone(), unit.clone());
			}
		}
	}
}

/// New variables are prepended; existing ones are updated in place.
fn merge_variables(acc: &mut Document, next: &Document) {
	if next
		.units
		.get(VARIABLES_SECTION)
		.is_some_and(|unit| unit.replace)
	{
		acc.variables.clear();
	}

	for (key, value) in &next.variables {
		match acc.variables.get_mut(key) {
			Some(existing) => existing.clone_from(value),
			None => {
				acc.variables.shift_insert(0, key.clone(), value.clone());
			}
		}
	}
}

fn merge_unit(target: &mut Unit, source: &Unit) {
	let concat_script = target.name == SCRIPT_UNIT;

	// Script bodies accumulate before drops apply, so `drop_script` wins
	if concat_script && let Some(script) = source.options.get(SCRIPT_UNIT) {
		target
			.options
			.entry(SCRIPT_UNIT.to_string())
			.or_default()
			.push_str(script);
	}

	for (key, value) in &source.options {
		if concat_script && key == SCRIPT_UNIT {
			continue;
		}

		if let Some(dropped) = key.strip_prefix(DROP_PREFIX) {
			target.options.shift_remove(dropped);
			continue;
		}

		target.options.insert(key.clone(), value.clone());
	}

	if source.priority.is_some() {
		target.priority = source.priority;
	}

	if let Some(enabled) = source.options.get("enabled") {
		target.enabled = is_truthy(enabled);
	}

	if let Some(devices) = source.options.get("devices") {
		target.devices.clone_from(devices);
	}
}

fn count_conflicts(profiles: &[Document]) -> usize {
	let total: usize = profiles.iter().map(|p| p.units.len()).sum();
	let distinct: HashSet<&str> = profiles
		.iter()
		.flat_map(|p| p.units.keys().map(String::as_str))
		.collect();

	total - distinct.len()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::profile::parser::parse_document;

	fn profile(name: &str, content: &str) -> Document {
		parse_document(content, name).unwrap()
	}

	fn unit_option<'a>(doc: &'a Document, unit: &str, key: &str) -> Option<&'a str> {
		doc.units[unit].options.get(key).map(String::as_str)
	}

	#[test]
	fn test_merge_empty_returns_placeholder() {
		let merged = merge(&[]);
		assert_eq!(merged.name, "");
		assert!(merged.variables.is_empty());
		assert!(merged.units.is_empty());
		assert!(merged.options.is_empty());
	}

	#[test]
	fn test_merge_single_profile_is_identity() {
		let a = profile("a", "[main]\nsummary=A\n[cpu]\ngovernor=performance\n");
		assert_eq!(merge(std::slice::from_ref(&a)), a);
	}

	#[test]
	fn test_merge_name_is_last_profile() {
		let a = profile("base", "[cpu]\ngovernor=powersave\n");
		let b = profile("middle", "");
		let c = profile("leaf", "");
		assert_eq!(merge(&[a, b, c]).name, "leaf");
	}

	#[test]
	fn test_merge_options_override() {
		let a = profile("a", "[main]\nsummary=A\nowner=ops\n");
		let b = profile("b", "[main]\nsummary=B\n");
		let merged = merge(&[a, b]);
		assert_eq!(merged.options.get("summary").map(String::as_str), Some("B"));
		assert_eq!(merged.options.get("owner").map(String::as_str), Some("ops"));
	}

	#[test]
	fn test_merge_includes_come_from_first_profile() {
		let a = profile("a", "");
		let b = profile("b", "[main]\ninclude=a\n");
		assert!(merge(&[a, b]).includes.is_empty());
	}

	#[test]
	fn test_merge_replace_discards_inherited_unit() {
		let a = profile("a", "[net]\nsysctl=1\nmtu=1500\n");
		let b = profile("b", "[net]\nreplace=true\nmtu=9000\n");
		let merged = merge(&[a, b]);

		let net = &merged.units["net"];
		assert_eq!(net.options.len(), 1);
		assert_eq!(unit_option(&merged, "net", "mtu"), Some("9000"));
		assert!(!net.options.contains_key("replace"));
	}

	#[test]
	fn test_merge_drop_removes_option() {
		let a = profile("a", "[net]\nsysctl=1\nmtu=1500\n");
		let b = profile("b", "[net]\ndrop_sysctl=\n");
		let merged = merge(&[a, b]);

		let net = &merged.units["net"];
		assert!(!net.options.contains_key("sysctl"));
		assert!(!net.options.contains_key("drop_sysctl"));
		assert_eq!(unit_option(&merged, "net", "mtu"), Some("1500"));
	}

	#[test]
	fn test_merge_drop_of_absent_option_is_ignored() {
		let a = profile("a", "[net]\nmtu=1500\n");
		let b = profile("b", "[net]\ndrop_nothing=1\n");
		let merged = merge(&[a, b]);
		assert_eq!(merged.units["net"].options.len(), 1);
	}

	#[test]
	fn test_merge_field_level_override() {
		let a = profile(
			"a",
			"[disk]\nreadahead=4096\npriority=10\ndevices=sda\nenabled=true\n",
		);
		let b = profile("b", "[disk]\nreadahead=8192\npriority=20\nenabled=0\n");
		let merged = merge(&[a, b]);

		let disk = &merged.units["disk"];
		assert_eq!(unit_option(&merged, "disk", "readahead"), Some("8192"));
		assert_eq!(disk.priority, Some(20));
		assert!(!disk.enabled);
		assert_eq!(disk.devices, "sda");
	}

	#[test]
	fn test_merge_invalid_priority_keeps_previous() {
		let a = profile("a", "[disk]\npriority=10\n");
		let b = profile("b", "[disk]\npriority=high\n");
		let merged = merge(&[a, b]);
		assert_eq!(merged.units["disk"].priority, Some(10));
	}

	#[test]
	fn test_merge_devices_override() {
		let a = profile("a", "[disk]\ndevices=sda\n");
		let b = profile("b", "[disk]\ndevices=nvme0n1\n");
		let merged = merge(&[a, b]);
		assert_eq!(merged.units["disk"].devices, "nvme0n1");
	}

	#[test]
	fn test_merge_new_unit_added() {
		let a = profile("a", "[cpu]\ngovernor=performance\n");
		let b = profile("b", "[vm]\ntransparent_hugepages=never\n");
		let merged = merge(&[a, b]);
		let names: Vec<_> = merged.units.keys().cloned().collect();
		assert_eq!(names, vec!["cpu", "vm"]);
	}

	#[test]
	fn test_merge_script_concatenates() {
		let a = profile("a", "[script]\nscript=echo A\n");
		let b = profile("b", "[script]\nscript=echo B\n");
		let merged = merge(&[a, b]);
		assert_eq!(unit_option(&merged, "script", "script"), Some("echo Aecho B"));
	}

	#[test]
	fn test_merge_drop_script_removes_accumulated_script() {
		let a = profile("a", "[script]\nscript=echo A\n");
		let b = profile("b", "[script]\ndrop_script=1\nscript=echo B\n");
		let merged = merge(&[a, b]);
		assert_eq!(unit_option(&merged, "script", "script"), None);
		assert!(!merged.units["script"].options.contains_key("drop_script"));
	}

	#[test]
	fn test_merge_script_replace_overrides() {
		let a = profile("a", "[script]\nscript=echo A\n");
		let b = profile("b", "[script]\nreplace=1\nscript=echo B\n");
		let merged = merge(&[a, b]);
		assert_eq!(unit_option(&merged, "script", "script"), Some("echo B"));
	}

	#[test]
	fn test_merge_script_option_in_other_unit_overwrites() {
		let a = profile("a", "[custom]\nscript=echo A\n");
		let b = profile("b", "[custom]\nscript=echo B\n");
		let merged = merge(&[a, b]);
		assert_eq!(unit_option(&merged, "custom", "script"), Some("echo B"));
	}

	#[test]
	fn test_merge_variables_prepend_new_keys() {
		let a = profile("a", "");
		let b = profile("b", "[variables]\nx=2\n");
		let c = profile("c", "[variables]\nx=3\ny=4\n");

		let merged = merge(&[a.clone(), b.clone()]);
		let keys: Vec<_> = merged.variables.keys().cloned().collect();
		assert_eq!(keys, vec!["x"]);
		assert_eq!(merged.variables["x"], "2");

		let merged = merge(&[a, b, c]);
		let pairs: Vec<_> = merged
			.variables
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect();
		assert_eq!(pairs, vec![("y", "4"), ("x", "3")]);
	}

	#[test]
	fn test_merge_variables_each_new_key_goes_to_front() {
		let a = profile("a", "[variables]\nbase=0\n");
		let b = profile("b", "[variables]\np=1\nq=2\nbase=9\n");
		let merged = merge(&[a, b]);
		let keys: Vec<_> = merged.variables.keys().cloned().collect();
		assert_eq!(keys, vec!["q", "p", "base"]);
		assert_eq!(merged.variables["base"], "9");
	}

	#[test]
	fn test_merge_variables_replace_unit_clears() {
		let a = profile("a", "[variables]\nold=1\n");
		let mut b = profile("b", "[variables]\nnew=2\n");
		b.units.insert(
			VARIABLES_SECTION.to_string(),
			Unit::new(
				VARIABLES_SECTION,
				[("replace".to_string(), "true".to_string())]
					.into_iter()
					.collect(),
			),
		);

		let merged = merge(&[a, b]);
		let keys: Vec<_> = merged.variables.keys().cloned().collect();
		assert_eq!(keys, vec!["new"]);
		assert!(!merged.units.contains_key(VARIABLES_SECTION));
	}

	#[test]
	fn test_merge_does_not_mutate_inputs() {
		let a = profile("a", "[net]\nsysctl=1\n");
		let b = profile("b", "[net]\ndrop_sysctl=1\n");
		let inputs = vec![a.clone(), b.clone()];
		let _ = merge(&inputs);
		assert_eq!(inputs[0], a);
		assert_eq!(inputs[1], b);
	}

	#[test]
	fn test_summarize() {
		let a = profile("a", "[variables]\nx=1\n[cpu]\ngovernor=powersave\n[vm]\nswappiness=10\n");
		let b = profile("b", "[cpu]\ngovernor=performance\n[disk]\nreadahead=4096\n");
		let summary = summarize(&[a, b]);

		assert_eq!(summary.profiles, vec!["a", "b"]);
		assert_eq!(summary.merge_order, vec!["a", "b"]);
		assert_eq!(summary.total_input_sections, 4);
		assert_eq!(summary.final_sections, vec!["cpu", "vm", "disk"]);
		assert_eq!(summary.final_section_count, 3);
		assert_eq!(summary.final_variables, vec!["x"]);
		assert_eq!(summary.final_variable_count, 1);
		assert_eq!(summary.conflicts_resolved, 1);
	}

	#[test]
	fn test_summarize_empty() {
		assert_eq!(summarize(&[]), MergeSummary::default());
	}
}
