use crate::error::{Result, TunedError};
use crate::profile::types::{Document, INCLUDE_OPTION, MAIN_SECTION, Unit, VARIABLES_SECTION};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static PROFILE_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid profile name regex"));

static INCLUDE_SEPARATOR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s*[,;]\s*").expect("valid include separator regex"));

/// One `[section]` of a profile file with its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
	pub name: String,

	/// 1-based line of the section header.
	pub line: usize,

	pub entries: IndexMap<String, String>,
}

/// Parse a profile file from the given path.
///
/// The profile is named after the directory holding the file, matching the
/// `<root>/<name>/tuned.conf` layout.
pub fn parse_file(path: &Path) -> Result<Document> {
	let content = std::fs::read_to_string(path).map_err(|source| TunedError::ProfileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let name = path
		.parent()
		.and_then(|dir| dir.file_name())
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default();

	parse_document(&content, &name)
}

/// Parse a profile from a string (useful for testing).
pub fn parse_document(content: &str, name: &str) -> Result<Document> {
	let mut document = Document::new(name);

	for section in parse_sections(content, name)? {
		match section.name.as_str() {
			MAIN_SECTION => {
				for (key, value) in section.entries {
					if key == INCLUDE_OPTION {
						document.includes.extend(split_includes(&value));
					} else {
						document.options.insert(key, value);
					}
				}
			}
			VARIABLES_SECTION => document.variables.extend(section.entries),
			_ => {
				let unit = Unit::new(section.name.clone(), section.entries);
				document.units.insert(section.name, unit);
			}
		}
	}

	Ok(document)
}

/// Split raw profile text into sections without interpreting them.
///
/// Fails on text outside a section, lines without `=`, malformed headers
/// and repeated section names.
pub fn parse_sections(content: &str, name: &str) -> Result<Vec<RawSection>> {
	let malformed = |line: usize, message: &str| TunedError::MalformedDocument {
		name: name.to_string(),
		line,
		message: message.to_string(),
	};

	let mut sections: Vec<RawSection> = Vec::new();
	let mut seen = HashSet::new();
	// Key of the previous option line and its indent width
	let mut last_key: Option<(String, usize)> = None;

	for (index, raw_line) in content.lines().enumerate() {
		let line_no = index + 1;
		let trimmed = raw_line.trim();

		if trimmed.is_empty() {
			last_key = None;
			continue;
		}
		if trimmed.starts_with('#') || trimmed.starts_with(';') {
			continue;
		}

		let indent = raw_line.len() - raw_line.trim_start().len();

		// Lines indented deeper than the previous key continue its value
		if let Some((key, key_indent)) = &last_key
			&& indent > *key_indent
			&& let Some(section) = sections.last_mut()
			&& let Some(value) = section.entries.get_mut(key)
		{
			let extra = strip_inline_comment(trimmed).trim();
			if !extra.is_empty() {
				value.push('\n');
				value.push_str(extra);
			}
			continue;
		}

		if trimmed.starts_with('[') {
			let header = strip_inline_comment(trimmed).trim();
			let section_name = header
				.strip_prefix('[')
				.and_then(|h| h.strip_suffix(']'))
				.map(str::trim)
				.ok_or_else(|| malformed(line_no, "unterminated section header"))?;
			if section_name.is_empty() {
				return Err(malformed(line_no, "empty section name"));
			}
			if !seen.insert(section_name.to_string()) {
				return Err(TunedError::DuplicateSection {
					name: name.to_string(),
					section: section_name.to_string(),
					line: line_no,
				});
			}
			sections.push(RawSection {
				name: section_name.to_string(),
				line: line_no,
				entries: IndexMap::new(),
			});
			last_key = None;
			continue;
		}

		let section = sections
			.last_mut()
			.ok_or_else(|| malformed(line_no, "option outside of any section"))?;
		let (key, value) = trimmed
			.split_once('=')
			.ok_or_else(|| malformed(line_no, "expected 'key=value'"))?;
		let key = key.trim();
		if key.is_empty() {
			return Err(malformed(line_no, "empty option name"));
		}
		let value = strip_inline_comment(value).trim();

		section.entries.insert(key.to_string(), value.to_string());
		last_key = Some((key.to_string(), indent));
	}

	Ok(sections)
}

/// Check a name against tuned's profile naming rule.
pub fn is_valid_profile_name(name: &str) -> bool {
	PROFILE_NAME.is_match(name)
}

/// Split an `include` value on `,` or `;`.
fn split_includes(value: &str) -> Vec<String> {
	INCLUDE_SEPARATOR
		.split(value.trim())
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// Cut a trailing `#` comment that sits outside quotes and follows whitespace.
fn strip_inline_comment(text: &str) -> &str {
	let mut quote: Option<char> = None;
	let mut prev_is_space = false;

	for (i, c) in text.char_indices() {
		match quote {
			Some(q) if c == q => quote = None,
			Some(_) => {}
			None if c == '"' || c == '\'' => quote = Some(c),
			None if c == '#' && prev_is_space => return &text[..i],
			None => {}
		}
		prev_is_space = c.is_whitespace();
	}

	text
}
