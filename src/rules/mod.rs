//! Wildcard matching and rewriting for wildrep.
//!
//! This module handles:
//! - Pattern tokenization with `\*` and `\\` escapes
//! - Backtracking wildcard matching with ordered captures
//! - Recursive rewriting of lines into a destination pattern
//! - Compiling named rules from configuration

pub mod catalog;
pub mod matcher;
pub mod pattern;
pub mod rewriter;

pub use catalog::{CompiledRule, Operation, compile_rules, find_rule};
pub use matcher::match_pattern;
pub use pattern::{Pattern, Token, longest_fixed_part};
pub use rewriter::{Replacement, Rewrite, replace};
