use std::path::PathBuf;

/// Library-level structured errors for wildrep.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum WildrepError {
	#[error(
		"Too many '*' in replacement pattern '{pattern}' ({wildcards} wildcards, {captures} captures)"
	)]
	TooManyWildcards {
		pattern: String,
		wildcards: usize,
		captures: usize,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid rule in {path}: {reason}")]
	InvalidRule { path: PathBuf, reason: String },

	#[error("Duplicate rule name '{name}' in {path}")]
	DuplicateRule { name: String, path: PathBuf },

	#[error("Unknown rule: {name}")]
	UnknownRule { name: String },

	#[error("Bad path pattern: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error("Failed to read {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Missing git executable on PATH")]
	GitNotFound,

	#[error("Not a git repository: {path}")]
	NotAGitRepository { path: PathBuf, stderr: String },

	#[error("git grep failed (exit code: {exit_code:?}): {stderr}")]
	GitGrepFailed {
		exit_code: Option<i32>,
		stderr: String,
	},

	#[error("Failed to run git")]
	GitSpawnFailed {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using WildrepError.
pub type Result<T> = std::result::Result<T, WildrepError>;
