use crate::hierarchy::{HierarchyTree, ValidationReport};
use crate::locator::{EnvironmentInfo, ProfileInfo};
use std::fmt;

/// Dependency tree as shown by `hierarchy`.
pub struct HierarchyView<'a>(pub &'a HierarchyTree);

impl fmt::Display for HierarchyView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let tree = self.0;
		writeln!(
			f,
			"Profile hierarchy for: {}",
			tree.root.as_deref().unwrap_or("(none)")
		)?;
		writeln!(f, "{}", "=".repeat(50))?;
		writeln!(f, "Total profiles in hierarchy: {}", tree.total_count)?;
		writeln!(f)?;

		for (i, node) in tree.profiles.iter().enumerate() {
			let indent = "  ".repeat(i);
			writeln!(f, "{indent}├─ {}", node.name)?;

			if !node.includes.is_empty() {
				writeln!(f, "{indent}│  Includes: {}", node.includes.join(", "))?;
			}

			if !node.sections.is_empty() {
				let shown: Vec<&str> = node.sections.iter().take(3).map(String::as_str).collect();
				let more = if node.sections.len() > 3 { "..." } else { "" };
				writeln!(
					f,
					"{indent}│  Sections: {} ({}{more})",
					node.sections.len(),
					shown.join(", ")
				)?;
			}

			if !node.variables.is_empty() {
				writeln!(f, "{indent}│  Variables: {}", node.variables.len())?;
			}

			if i + 1 < tree.profiles.len() {
				writeln!(f, "{indent}│")?;
			}
		}

		Ok(())
	}
}

/// Installed profiles as shown by `list`.
pub struct ListView<'a> {
	pub profiles: &'a [ProfileInfo],
	pub active: Option<&'a str>,
}

impl fmt::Display for ListView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.profiles.is_empty() {
			return writeln!(f, "No tuned profiles found.");
		}

		writeln!(
			f,
			"Available tuned profiles ({} found):",
			self.profiles.len()
		)?;
		writeln!(f, "{}", "-".repeat(50))?;

		for info in self.profiles {
			let marker = if self.active == Some(info.name.as_str()) {
				" *"
			} else {
				"  "
			};
			writeln!(f, "{marker} {:<25} [{}]", info.name, info.origin)?;
			writeln!(
				f,
				"    {}",
				info.summary.as_deref().unwrap_or("No description available")
			)?;
		}

		if let Some(active) = self.active {
			writeln!(f)?;
			writeln!(f, "* Currently active: {active}")?;
		}

		Ok(())
	}
}

/// Result of `validate`.
pub struct ValidationView<'a> {
	pub name: &'a str,
	pub report: &'a ValidationReport,
}

impl fmt::Display for ValidationView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let report = self.report;
		writeln!(f, "Validation for profile '{}':", self.name)?;
		writeln!(f, "{}", "-".repeat(50))?;

		if report.valid {
			writeln!(f, "✓ Profile hierarchy is valid")?;
			writeln!(
				f,
				"✓ Found {} profile(s) in hierarchy",
				report.profile_count
			)?;
			writeln!(f, "✓ Dependency chain: {}", report.profiles.join(" -> "))?;
		} else {
			writeln!(f, "✗ Profile hierarchy has errors:")?;
			for error in &report.errors {
				writeln!(f, "  - {error}")?;
			}
		}

		if !report.warnings.is_empty() {
			writeln!(f)?;
			writeln!(f, "Warnings:")?;
			for warning in &report.warnings {
				writeln!(f, "  - {warning}")?;
			}
		}

		Ok(())
	}
}

/// Environment details as shown by `env`.
pub struct EnvironmentView<'a> {
	pub info: &'a EnvironmentInfo,
	pub active: Option<&'a str>,
}

impl fmt::Display for EnvironmentView<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let info = self.info;
		let yes_no = |flag: bool| if flag { "yes" } else { "no" };

		writeln!(f, "Environment")?;
		writeln!(f, "{}", "-".repeat(50))?;
		writeln!(f, "Running in pod: {}", yes_no(info.in_pod))?;
		writeln!(f, "Service account: {}", yes_no(info.service_account))?;
		if let Some(ref namespace) = info.namespace {
			writeln!(f, "Namespace: {namespace}")?;
		}
		writeln!(f, "Active profile: {}", self.active.unwrap_or("(unknown)"))?;

		if !info.environment_variables.is_empty() {
			writeln!(f)?;
			writeln!(f, "Environment variables:")?;
			for (key, value) in &info.environment_variables {
				writeln!(f, "  {key}={value}")?;
			}
		}

		writeln!(f)?;
		writeln!(f, "Profile directories (in search order):")?;
		for dir in &info.searched_directories {
			if dir.readable {
				writeln!(f, "  ✓ {}", dir.path.display())?;
			} else {
				writeln!(f, "  ✗ {} (missing or unreadable)", dir.path.display())?;
			}
		}

		Ok(())
	}
}
