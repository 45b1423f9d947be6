use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::ExitCode;

use wildrep_cli::WildrepError;
use wildrep_cli::config::{discover_configs, load_merged_config, user_config_path};
use wildrep_cli::edit::{FileReport, process_file};
use wildrep_cli::files::find_files;
use wildrep_cli::rules::{Operation, compile_rules, find_rule, longest_fixed_part};

/// Exit code when nothing matched.
const EXIT_NO_HITS: u8 = 1;

/// Exit code for errors.
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "wildrep")]
#[command(
	author,
	version,
	about = "Wildcard find and replace over lines of text",
	long_about = "Wildcard find and replace over lines of text.\n\n\
		In patterns '*' matches any text, '\\*' is a literal asterisk and '\\\\' a literal backslash. \
		Each '*' in REPLACEMENT inserts the text captured by the next '*' of PATTERN, \
		rewritten recursively."
)]
#[command(arg_required_else_help = true, args_conflicts_with_subcommands = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Wildcard pattern to search for
	#[arg(conflicts_with = "rule")]
	pattern: Option<String>,

	/// Pattern to rewrite matching lines into
	replacement: Option<String>,

	/// Run a named rule from .wildrep.toml instead of PATTERN
	#[arg(long, value_name = "NAME")]
	rule: Option<String>,

	/// Only process files matching this glob ('**' spans folders); may be repeated
	#[arg(short = 'p', long = "path", value_name = "GLOB")]
	paths: Vec<String>,

	/// Write changes back to the files instead of printing them
	#[arg(short, long)]
	write: bool,

	/// Print the longest fixed part of PATTERN and exit
	#[arg(long, requires = "pattern")]
	fixed_part: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the configuration cascade with its rules
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::from(EXIT_ERROR)
		}
	}
}

fn init_logging() {
	let env = env_logger::Env::new()
		.filter_or("WILDREP_LOG", "warn")
		.write_style("WILDREP_LOG_STYLE");
	env_logger::Builder::from_env(env)
		.format_timestamp(None)
		.init();
}

fn run() -> Result<ExitCode> {
	let mut cli = Cli::parse();

	if let Some(command) = cli.command.take() {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	if cli.fixed_part {
		let pattern = cli.pattern.as_deref().unwrap_or_default();
		println!("{}", longest_fixed_part(pattern));
		return Ok(ExitCode::SUCCESS);
	}

	handle_run(&cli)
}

fn handle_run(cli: &Cli) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_merged_config(&cwd).context("Failed to load configuration")?;

	let (operation, rule_paths) = if let Some(ref name) = cli.rule {
		let rules = compile_rules(&config).context("Failed to compile rules")?;
		let rule = find_rule(&rules, name)?;
		log::debug!("running rule '{}' from {}", rule.name, rule.source.display());
		(rule.operation.clone(), rule.paths.clone())
	} else {
		let pattern = cli
			.pattern
			.as_deref()
			.ok_or_else(|| anyhow::anyhow!("Missing PATTERN (or --rule NAME)"))?;
		(
			Operation::new(pattern, cli.replacement.as_deref()),
			Vec::new(),
		)
	};

	operation
		.validate()
		.context("Invalid replacement pattern")?;

	// Command line paths win over the rule's, which win over the config's
	let paths = [&cli.paths, &rule_paths, &config.paths]
		.into_iter()
		.find(|paths| !paths.is_empty())
		.cloned()
		.unwrap_or_default();

	let filter = operation.fixed_part();
	let files = find_files(&filter, &paths, &cwd).context("Failed to find files")?;
	log::debug!("{} candidate files", files.len());

	let mut hits = false;
	for file in &files {
		let report = match process_file(file, &operation, cli.write) {
			Ok(report) => report,
			Err(e @ WildrepError::FileRead { .. }) => {
				log::warn!("skipping: {e}");
				continue;
			}
			Err(e) => return Err(e.into()),
		};

		hits |= report.has_hits();
		print_report(&report, &cwd);
	}

	if hits {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::from(EXIT_NO_HITS))
	}
}

fn print_report(report: &FileReport, cwd: &Path) {
	let path = report.path.strip_prefix(cwd).unwrap_or(&report.path);

	for m in &report.matches {
		println!("{}:{}:{}", path.display(), m.number, m.line);
	}

	if report.written {
		println!(
			"Updated {} ({} lines)",
			path.display(),
			report.changes.len()
		);
		return;
	}

	for change in &report.changes {
		println!("{}:{}:", path.display(), change.number);
		println!("- {}", change.before);
		println!("+ {}", change.after);
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		if !loaded.config.paths.is_empty() {
			println!("# paths: {}", loaded.config.paths.join(", "));
		}
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for rule in &loaded.config.rules {
			println!("  Rule {}:", rule.name);
			println!("    pattern: {}", rule.pattern);
			println!("    fixed part: {}", longest_fixed_part(&rule.pattern));
			if let Some(ref replacement) = rule.replacement {
				println!("    replacement: {}", replacement);
			}
			if !rule.paths.is_empty() {
				println!("    paths: {}", rule.paths.join(", "));
			}
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} rules)",
						loaded.path.display(),
						loaded.config.rules.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {:?}", anyhow::Error::new(e));
			Ok(ExitCode::from(EXIT_ERROR))
		}
	}
}
