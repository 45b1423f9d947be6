//! Wildrep - wildcard find and replace over lines of text.
//!
//! This library provides the core functionality for wildrep, including:
//! - Wildcard pattern matching with ordered captures
//! - Rewriting lines from one wildcard pattern into another, recursively
//!   inside captured text
//! - Configuration file parsing and cascade discovery
//! - Candidate file enumeration and line-by-line file editing
//!
//! In a pattern, `*` matches any substring, `\*` is a literal asterisk and
//! `\\` a literal backslash. Any other backslash is an ordinary character.
//!
//! # Example
//!
//! ```
//! use wildrep_cli::rules::{Replacement, longest_fixed_part, match_pattern, replace};
//!
//! assert_eq!(
//! 	match_pattern("rfu*iiufuier", "rfuXXXiiufuier"),
//! 	Some(vec!["XXX".to_string()])
//! );
//!
//! assert_eq!(longest_fixed_part("*hej*"), "hej");
//!
//! let result = replace("hej hej hej", "*hej*", "*hopp*").unwrap();
//! assert_eq!(result, Replacement::Modified("hopp hopp hopp".to_string()));
//! ```

pub mod config;
pub mod edit;
pub mod error;
pub mod files;
pub mod rules;

pub use error::{Result, WildrepError};
