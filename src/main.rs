use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tuned_viewer::TunedError;
use tuned_viewer::config::{LoadedConfig, OutputFormat, load_config};
use tuned_viewer::hierarchy::Resolver;
use tuned_viewer::locator::ProfileLocator;
use tuned_viewer::merge::merge;
use tuned_viewer::profile::expand_document;
use tuned_viewer::render::{
	EnvironmentView, HierarchyView, IniView, ListView, SummaryView, ValidationView, to_json,
};

#[derive(Parser)]
#[command(name = "tuned-viewer")]
#[command(
	author,
	version,
	about = "Analyze tuned profile hierarchies and show the merged configuration"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Custom directories to search for profiles
	#[arg(long, value_name = "DIR", num_args = 1.., global = true)]
	directories: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// List available profiles
	List,
	/// Show merged profile configuration
	Show {
		/// Profile name to show
		profile: String,

		/// Output format [default: ini, or `format` from the config file]
		#[arg(long, value_enum)]
		format: Option<OutputFormat>,

		/// Substitute ${name} variables into unit options
		#[arg(long)]
		expand: bool,
	},
	/// Show profile hierarchy
	Hierarchy {
		/// Profile name to analyze
		profile: String,
	},
	/// Validate profile hierarchy
	Validate {
		/// Profile name to validate
		profile: String,
	},
	/// Show environment and profile search directories
	Env,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
		)
		.with_writer(std::io::stderr)
		.init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	let loaded = load_config().context("Failed to load configuration")?;
	let resolver = Resolver::new(build_locator(&cli.directories, &loaded));

	match cli.command {
		Commands::List => handle_list(resolver.loader()),
		Commands::Show {
			profile,
			format,
			expand,
		} => {
			let format = format.or(loaded.config.format).unwrap_or_default();
			handle_show(&resolver, &profile, format, expand)
		}
		Commands::Hierarchy { profile } => handle_hierarchy(&resolver, &profile),
		Commands::Validate { profile } => handle_validate(&resolver, &profile),
		Commands::Env => handle_env(resolver.loader(), &loaded),
	}
}

/// Command-line directories win over the config file, which wins over the
/// standard tuned directories.
fn build_locator(cli_directories: &[PathBuf], loaded: &LoadedConfig) -> ProfileLocator {
	let directories = if !cli_directories.is_empty() {
		Some(cli_directories.to_vec())
	} else if !loaded.config.directories.is_empty() {
		Some(loaded.config.directories.clone())
	} else {
		None
	};

	let locator = ProfileLocator::new(directories, loaded.config.detect_pod);
	if loaded.config.active_profile_files.is_empty() {
		locator
	} else {
		locator.with_active_profile_files(loaded.config.active_profile_files.clone())
	}
}

/// Print hierarchy errors as a clean diagnostic; anything else is unexpected.
fn report_resolution_error(err: TunedError, profile: &str) -> Result<ExitCode> {
	match err {
		TunedError::CircularInclude { .. } | TunedError::ProfileNotFound { .. } => {
			eprintln!("Error: {err}");
			Ok(ExitCode::FAILURE)
		}
		other => Err(other).with_context(|| format!("Failed to resolve profile '{profile}'")),
	}
}

fn handle_list(locator: &ProfileLocator) -> Result<ExitCode> {
	let profiles: Vec<_> = locator
		.list_available_profiles()
		.iter()
		.filter_map(|name| locator.profile_info(name))
		.collect();
	let active = locator.active_profile();

	print!(
		"{}",
		ListView {
			profiles: &profiles,
			active: active.as_deref(),
		}
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_show(
	resolver: &Resolver<ProfileLocator>,
	profile: &str,
	format: OutputFormat,
	expand: bool,
) -> Result<ExitCode> {
	let profiles = match resolver.resolve(profile) {
		Ok(profiles) => profiles,
		Err(e) => return report_resolution_error(e, profile),
	};

	let mut merged = merge(&profiles);
	if expand {
		merged = expand_document(&merged);
	}

	match format {
		OutputFormat::Ini => print!("{}", IniView(&merged)),
		OutputFormat::Json => {
			let json = to_json(&merged, &profiles).context("Failed to serialize merged profile")?;
			println!("{json}");
		}
		OutputFormat::Summary => print!(
			"{}",
			SummaryView {
				merged: &merged,
				profiles: &profiles,
			}
		),
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_hierarchy(resolver: &Resolver<ProfileLocator>, profile: &str) -> Result<ExitCode> {
	match resolver.dependency_tree(profile) {
		Ok(tree) => {
			print!("{}", HierarchyView(&tree));
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => report_resolution_error(e, profile),
	}
}

fn handle_validate(resolver: &Resolver<ProfileLocator>, profile: &str) -> Result<ExitCode> {
	let report = resolver.validate(profile);

	print!(
		"{}",
		ValidationView {
			name: profile,
			report: &report,
		}
	);

	if report.valid {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::FAILURE)
	}
}

fn handle_env(locator: &ProfileLocator, loaded: &LoadedConfig) -> Result<ExitCode> {
	let info = locator.environment_info();
	let active = locator.active_profile();

	print!(
		"{}",
		EnvironmentView {
			info: &info,
			active: active.as_deref(),
		}
	);

	println!();
	match loaded.path {
		Some(ref path) => println!("Config file: {}", path.display()),
		None => println!("Config file: (none, using defaults)"),
	}

	Ok(ExitCode::SUCCESS)
}
