use crate::profile::types::Document;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static VARIABLE_REFERENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid variable reference regex"));

/// Substitute `${name}` references in `text` with values from `variables`.
///
/// Unknown names are left as written. Function references such as
/// `${f:calc_isolated_cores:1}` are never expanded.
pub fn expand_variables(text: &str, variables: &IndexMap<String, String>) -> String {
	if !text.contains("${") {
		return text.to_string();
	}

	VARIABLE_REFERENCE
		.replace_all(text, |caps: &Captures| {
			let name = &caps[1];
			if name.contains(':') {
				return caps[0].to_string();
			}
			variables
				.get(name)
				.cloned()
				.unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}

/// Copy of `document` with its own variables substituted into unit options.
pub fn expand_document(document: &Document) -> Document {
	let mut expanded = document.clone();

	for unit in expanded.units.values_mut() {
		for value in unit.options.values_mut() {
			*value = expand_variables(value, &document.variables);
		}
		unit.devices = expand_variables(&unit.devices, &document.variables);
	}

	expanded
}

/// Names referenced through plain `${name}` syntax, in order of appearance.
pub fn referenced_variables(text: &str) -> Vec<&str> {
	VARIABLE_REFERENCE
		.captures_iter(text)
		.filter_map(|caps| caps.get(1))
		.map(|m| m.as_str())
		.filter(|name| !name.contains(':'))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vars(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_expand_known_variable() {
		let variables = vars(&[("isolated_cores", "2-7")]);
		assert_eq!(
			expand_variables("isolcpus=${isolated_cores}", &variables),
			"isolcpus=2-7"
		);
	}

	#[test]
	fn test_expand_leaves_unknown_variable() {
		let variables = vars(&[]);
		assert_eq!(expand_variables("${missing}", &variables), "${missing}");
	}

	#[test]
	fn test_expand_leaves_function_reference() {
		let variables = vars(&[("f", "nope")]);
		let text = "${f:calc_isolated_cores:1}";
		assert_eq!(expand_variables(text, &variables), text);
	}

	#[test]
	fn test_expand_is_single_pass() {
		let variables = vars(&[("a", "${b}"), ("b", "final")]);
		assert_eq!(expand_variables("${a} ${b}", &variables), "${b} final");
	}

	#[test]
	fn test_expand_document_units() {
		let document = crate::profile::parser::parse_document(
			"[variables]\ncores=2-7\ndisk=sda\n[bootloader]\ncmdline=isolcpus=${cores}\n[disk]\ndevices=${disk}\n",
			"p",
		)
		.unwrap();

		let expanded = expand_document(&document);
		assert_eq!(
			expanded.units["bootloader"].options["cmdline"],
			"isolcpus=2-7"
		);
		assert_eq!(expanded.units["disk"].devices, "sda");
		assert_eq!(expanded.units["disk"].options["devices"], "sda");
		assert_eq!(document.units["disk"].devices, "${disk}");
	}

	#[test]
	fn test_referenced_variables() {
		let text = "${a} and ${f:exec:ls} then ${b}";
		assert_eq!(referenced_variables(text), vec!["a", "b"]);
	}
}
