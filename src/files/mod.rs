//! Candidate file enumeration for wildrep.
//!
//! This module handles:
//! - Expanding path globs, where `**` spans any number of folders
//! - Finding files that contain a fixed string with `git grep`
//! - Listing the current folder when nothing narrows the search

use crate::error::{Result, WildrepError};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

/// Find the files to process.
///
/// A file only has to match one of `path_patterns`. Bad patterns are skipped
/// with a warning. Without patterns, files under `cwd` that contain `filter`
/// are found with `git grep`, so only files tracked by git are seen; with an
/// empty filter as well, every file directly in `cwd` is taken.
///
/// Returned paths are absolute, deduplicated and sorted.
pub fn find_files(filter: &str, path_patterns: &[String], cwd: &Path) -> Result<Vec<PathBuf>> {
	if path_patterns.is_empty() {
		if filter.is_empty() {
			return list_dir(cwd);
		}
		return git_grep(filter, cwd);
	}

	let mut unique = BTreeSet::new();
	for pattern in path_patterns {
		match expand_glob(pattern, cwd) {
			Ok(paths) => unique.extend(paths),
			Err(e) => log::warn!("{e}"),
		}
	}
	Ok(unique.into_iter().collect())
}

/// Expand one glob pattern relative to `cwd`.
pub fn expand_glob(pattern: &str, cwd: &Path) -> Result<Vec<PathBuf>> {
	let absolute = absolutize(cwd, pattern);
	let matcher = compile_glob(&absolute.to_string_lossy(), pattern)?;
	let root = literal_prefix(&absolute);

	let mut found = Vec::new();
	if root.is_file() {
		if matcher.is_match(&root) {
			found.push(root);
		}
		return Ok(found);
	}

	walk(&root, &mut |path| {
		if matcher.is_match(path) {
			found.push(path.to_path_buf());
		}
	});
	log::debug!("{pattern}: {} files", found.len());
	Ok(found)
}

/// Join `path` onto `cwd`, resolving `.` and `..` without touching the disk.
///
/// Walked paths then line up with the glob, and the same file reached through
/// different patterns gets the same path.
fn absolutize(cwd: &Path, path: &str) -> PathBuf {
	let mut out = PathBuf::new();
	for component in cwd.join(path).components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			other => out.push(other),
		}
	}
	out
}

fn compile_glob(glob: &str, pattern: &str) -> Result<GlobMatcher> {
	let glob = GlobBuilder::new(glob)
		.literal_separator(true)
		.build()
		.map_err(|source| WildrepError::InvalidGlob {
			pattern: pattern.to_string(),
			source,
		})?;
	Ok(glob.compile_matcher())
}

/// Leading path components that contain no glob syntax.
fn literal_prefix(path: &Path) -> PathBuf {
	path.components()
		.take_while(|c| match c {
			Component::Normal(part) => !part
				.to_string_lossy()
				.contains(['*', '?', '[', ']', '{', '}']),
			_ => true,
		})
		.collect()
}

/// Visit every regular file below `dir`, skipping `.git` folders.
///
/// Symlinked folders are not followed. Unreadable folders are logged and skipped.
fn walk(dir: &Path, visit: &mut dyn FnMut(&Path)) {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) => {
			if dir.exists() {
				log::warn!("cannot read {}: {e}", dir.display());
			}
			return;
		}
	};

	for entry in entries.flatten() {
		let path = entry.path();
		let Ok(file_type) = entry.file_type() else {
			continue;
		};
		if file_type.is_dir() {
			if entry.file_name() != ".git" {
				walk(&path, visit);
			}
		} else if path.is_file() {
			visit(&path);
		}
	}
}

/// Regular files directly inside `dir`, sorted.
fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
	let entries = std::fs::read_dir(dir).map_err(|source| WildrepError::FileRead {
		path: dir.to_path_buf(),
		source,
	})?;

	let files: BTreeSet<PathBuf> = entries
		.flatten()
		.map(|entry| entry.path())
		.filter(|path| path.is_file())
		.collect();
	Ok(files.into_iter().collect())
}

/// Files tracked by git under `cwd` that contain `filter` verbatim.
fn git_grep(filter: &str, cwd: &Path) -> Result<Vec<PathBuf>> {
	let git = resolve_command("git").ok_or(WildrepError::GitNotFound)?;

	let output = Command::new(git)
		.args(["grep", "-F", "-I", "-z", "--name-only", "-e", filter])
		.current_dir(cwd)
		.stdin(Stdio::null())
		.output()
		.map_err(|source| WildrepError::GitSpawnFailed { source })?;

	let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
	match output.status.code() {
		Some(0) => {}
		// Normal exit, just nothing found
		Some(1) => return Ok(Vec::new()),
		Some(128) => {
			return Err(WildrepError::NotAGitRepository {
				path: cwd.to_path_buf(),
				stderr,
			});
		}
		exit_code => return Err(WildrepError::GitGrepFailed { exit_code, stderr }),
	}

	// With -z names are NUL separated and never quoted
	let files: BTreeSet<PathBuf> = String::from_utf8_lossy(&output.stdout)
		.split('\0')
		.filter(|name| !name.is_empty())
		.map(|name| cwd.join(name))
		.collect();
	Ok(files.into_iter().collect())
}

/// Resolve a command name to its full path.
///
/// If the command is already an absolute path, returns it as-is.
/// Otherwise, searches PATH for the command.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.is_absolute() {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|full_path| full_path.is_file())
}
