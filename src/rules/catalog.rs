use crate::config::types::{MergedConfig, RuleWithSource};
use crate::error::{Result, WildrepError};
use crate::rules::pattern::Pattern;
use crate::rules::rewriter::Rewrite;
use std::path::PathBuf;

/// What to do with each candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Report lines matching the pattern.
	Search(Pattern),

	/// Rewrite lines matching the source pattern.
	Rewrite(Rewrite),
}

impl Operation {
	/// Build an operation from a pattern and an optional replacement.
	pub fn new(pattern: &str, replacement: Option<&str>) -> Self {
		match replacement {
			Some(replacement) => Operation::Rewrite(Rewrite::new(pattern, replacement)),
			None => Operation::Search(Pattern::new(pattern)),
		}
	}

	/// The pattern lines are matched against.
	pub fn pattern(&self) -> &Pattern {
		match self {
			Operation::Search(pattern) => pattern,
			Operation::Rewrite(rewrite) => &rewrite.source,
		}
	}

	/// Longest literal part of the pattern, used to skip lines cheaply.
	pub fn fixed_part(&self) -> String {
		self.pattern().fixed_part()
	}

	/// Check a rewrite's destination against its source; searches always pass.
	pub fn validate(&self) -> Result<()> {
		match self {
			Operation::Search(_) => Ok(()),
			Operation::Rewrite(rewrite) => rewrite.validate(),
		}
	}
}

/// A configured rule ready to run.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The rule name.
	pub name: String,

	/// The compiled search or rewrite.
	pub operation: Operation,

	/// Path globs for this rule (may be empty).
	pub paths: Vec<String>,

	/// Source config path (for debugging).
	pub source: PathBuf,
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let operation = Operation::new(&rws.rule.pattern, rws.rule.replacement.as_deref());
		operation.validate()?;

		Ok(CompiledRule {
			name: rws.rule.name.clone(),
			operation,
			paths: rws.rule.paths.clone(),
			source: rws.source.clone(),
		})
	}
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// Find a compiled rule by name.
pub fn find_rule<'a>(rules: &'a [CompiledRule], name: &str) -> Result<&'a CompiledRule> {
	rules
		.iter()
		.find(|rule| rule.name == name)
		.ok_or_else(|| WildrepError::UnknownRule {
			name: name.to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::Rule;
	use crate::rules::rewriter::Replacement;

	fn make_rule_with_source(rule: Rule) -> RuleWithSource {
		RuleWithSource {
			rule,
			source: PathBuf::from("test.toml"),
		}
	}

	fn merged(rules: Vec<Rule>) -> MergedConfig {
		MergedConfig {
			rules: rules.into_iter().map(make_rule_with_source).collect(),
			..Default::default()
		}
	}

	#[test]
	fn test_operation_new() {
		assert_eq!(
			Operation::new("*a*", None),
			Operation::Search(Pattern::new("*a*"))
		);
		assert_eq!(
			Operation::new("*a*", Some("*b*")),
			Operation::Rewrite(Rewrite::new("*a*", "*b*"))
		);
	}

	#[test]
	fn test_operation_fixed_part() {
		let op = Operation::new(r"*\*fywire.*", Some("*"));
		assert_eq!(op.fixed_part(), "*fywire.");
	}

	#[test]
	fn test_compile_rewrite_rule() {
		let rule = Rule {
			name: "hopp".to_string(),
			pattern: "*hej*".to_string(),
			replacement: Some("*hopp*".to_string()),
			paths: vec!["*.txt".to_string()],
		};
		let compiled = CompiledRule::from_rule_with_source(&make_rule_with_source(rule)).unwrap();

		assert_eq!(compiled.name, "hopp");
		assert_eq!(compiled.paths, vec!["*.txt"]);
		match compiled.operation {
			Operation::Rewrite(rewrite) => assert_eq!(
				rewrite.apply("hej hej").unwrap(),
				Replacement::Modified("hopp hopp".to_string())
			),
			Operation::Search(_) => panic!("Expected a rewrite"),
		}
	}

	#[test]
	fn test_compile_rejects_too_many_wildcards() {
		let rule = Rule {
			name: "bad".to_string(),
			pattern: "*".to_string(),
			replacement: Some("**".to_string()),
			..Default::default()
		};
		let result = compile_rules(&merged(vec![rule]));
		assert!(matches!(
			result.unwrap_err(),
			WildrepError::TooManyWildcards { .. }
		));
	}

	#[test]
	fn test_find_rule() {
		let rules = compile_rules(&merged(vec![
			Rule {
				name: "first".to_string(),
				pattern: "*a*".to_string(),
				..Default::default()
			},
			Rule {
				name: "second".to_string(),
				pattern: "*b*".to_string(),
				..Default::default()
			},
		]))
		.unwrap();

		let found = find_rule(&rules, "second").unwrap();
		assert_eq!(found.operation.pattern().as_str(), "*b*");

		match find_rule(&rules, "third").unwrap_err() {
			WildrepError::UnknownRule { name } => assert_eq!(name, "third"),
			e => panic!("Expected UnknownRule error, got {e:?}"),
		}
	}
}
