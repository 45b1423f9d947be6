use crate::error::{Result, WildrepError};
use crate::rules::Pattern;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.wildrep.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade and jump directly to ~/.wildrep.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.wildrep.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Default path globs used when none are given on the command line.
	#[serde(default)]
	pub paths: Vec<String>,

	/// Named rules that can be run with `--rule`.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A named search or rewrite.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Name used to select the rule.
	pub name: String,

	/// Wildcard pattern to search for.
	pub pattern: String,

	/// Wildcard pattern to rewrite matches into. Without it the rule only searches.
	pub replacement: Option<String>,

	/// Path globs for this rule, overriding the top-level `paths`.
	#[serde(default)]
	pub paths: Vec<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Rules from all configs; a name defined closer to the working directory wins.
	pub rules: Vec<RuleWithSource>,

	/// Default path globs from the most specific config that sets any.
	pub paths: Vec<String>,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl Rule {
	/// Validate a single rule loaded from `path`.
	pub fn validate(&self, path: &Path) -> Result<()> {
		if self.name.trim().is_empty() {
			return Err(WildrepError::InvalidRule {
				path: path.to_path_buf(),
				reason: "rule without a name".to_string(),
			});
		}

		if self.pattern.is_empty() {
			return Err(WildrepError::InvalidRule {
				path: path.to_path_buf(),
				reason: format!("rule '{}' has an empty pattern", self.name),
			});
		}

		if let Some(ref replacement) = self.replacement {
			let wildcards = Pattern::new(replacement.as_str()).wildcard_count();
			let captures = Pattern::new(self.pattern.as_str()).wildcard_count();
			if wildcards > captures {
				return Err(WildrepError::TooManyWildcards {
					pattern: replacement.clone(),
					wildcards,
					captures,
				});
			}
		}

		Ok(())
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self, path: &Path) -> Result<()> {
		let mut names = HashSet::new();
		for rule in &self.rules {
			rule.validate(path)?;
			if !names.insert(rule.name.as_str()) {
				return Err(WildrepError::DuplicateRule {
					name: rule.name.clone(),
					path: path.to_path_buf(),
				});
			}
		}
		Ok(())
	}
}
