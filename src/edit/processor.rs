use crate::error::{Result, WildrepError};
use crate::rules::{Operation, Replacement};
use std::path::{Path, PathBuf};

/// A line that matched a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
	/// 1-based line number.
	pub number: usize,

	/// The line without its terminator.
	pub line: String,

	/// Text captured by each wildcard.
	pub captures: Vec<String>,
}

/// A line changed by a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
	/// 1-based line number.
	pub number: usize,

	pub before: String,

	pub after: String,
}

/// Result of processing one file.
#[derive(Debug, Default)]
pub struct FileReport {
	/// The processed file.
	pub path: PathBuf,

	/// Matching lines (search only).
	pub matches: Vec<LineMatch>,

	/// Changed lines (rewrite only).
	pub changes: Vec<LineChange>,

	/// Lines where the rewrite failed, left unchanged.
	pub failures: Vec<(usize, WildrepError)>,

	/// Whether the changes were written back to disk.
	pub written: bool,
}

impl FileReport {
	/// True if any line matched or changed.
	pub fn has_hits(&self) -> bool {
		!self.matches.is_empty() || !self.changes.is_empty()
	}
}

/// Run `operation` over every line of `path`.
///
/// With `write`, a rewritten file is saved in place. Files that are not
/// valid UTF-8 fail with [`WildrepError::FileRead`].
pub fn process_file(path: &Path, operation: &Operation, write: bool) -> Result<FileReport> {
	let text = std::fs::read_to_string(path).map_err(|source| WildrepError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let (mut report, rewritten) = process_text(path, &text, operation);

	if write && let Some(contents) = rewritten {
		std::fs::write(path, contents).map_err(|source| WildrepError::FileWrite {
			path: path.to_path_buf(),
			source,
		})?;
		log::debug!("wrote {} changes to {}", report.changes.len(), path.display());
		report.written = true;
	}

	Ok(report)
}

/// Run `operation` over every line of `text`.
///
/// Returns the report and, if any line changed, the new contents. Line
/// terminators (`\n` or `\r\n`) are kept as they were.
pub fn process_text(path: &Path, text: &str, operation: &Operation) -> (FileReport, Option<String>) {
	let fixed = operation.fixed_part();
	let mut report = FileReport {
		path: path.to_path_buf(),
		..Default::default()
	};
	let mut out = String::with_capacity(text.len());

	for (i, raw) in text.split_inclusive('\n').enumerate() {
		let number = i + 1;
		let (line, ending) = split_terminator(raw);

		// Cheap substring check before the backtracking matcher
		if !line.contains(fixed.as_str()) {
			out.push_str(raw);
			continue;
		}

		match operation {
			Operation::Search(pattern) => {
				if let Some(captures) = pattern.captures(line) {
					report.matches.push(LineMatch {
						number,
						line: line.to_string(),
						captures,
					});
				}
				out.push_str(raw);
			}
			Operation::Rewrite(rewrite) => match rewrite.apply(line) {
				Ok(Replacement::Modified(after)) => {
					out.push_str(&after);
					out.push_str(ending);
					report.changes.push(LineChange {
						number,
						before: line.to_string(),
						after,
					});
				}
				Ok(Replacement::Unmodified) => out.push_str(raw),
				Err(e) => {
					log::warn!("{}:{number}: {e}", path.display());
					report.failures.push((number, e));
					out.push_str(raw);
				}
			},
		}
	}

	let rewritten = (!report.changes.is_empty()).then_some(out);
	(report, rewritten)
}

fn split_terminator(raw: &str) -> (&str, &str) {
	if let Some(line) = raw.strip_suffix("\r\n") {
		(line, "\r\n")
	} else if let Some(line) = raw.strip_suffix('\n') {
		(line, "\n")
	} else {
		(raw, "")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::Rewrite;
	use std::fs;

	fn path() -> PathBuf {
		PathBuf::from("test.txt")
	}

	#[test]
	fn test_split_terminator() {
		assert_eq!(split_terminator("a\r\n"), ("a", "\r\n"));
		assert_eq!(split_terminator("a\n"), ("a", "\n"));
		assert_eq!(split_terminator("a"), ("a", ""));
		assert_eq!(split_terminator("\n"), ("", "\n"));
	}

	#[test]
	fn test_search_reports_matching_lines() {
		let text = "let a = 1;\nfoo(bar)\nlet b = 2;\n";
		let op = Operation::new("let * = *;", None);
		let (report, rewritten) = process_text(&path(), text, &op);

		assert!(rewritten.is_none());
		assert_eq!(report.matches.len(), 2);
		assert_eq!(report.matches[0].number, 1);
		assert_eq!(report.matches[0].captures, vec!["a", "1"]);
		assert_eq!(report.matches[1].number, 3);
		assert_eq!(report.matches[1].line, "let b = 2;");
	}

	#[test]
	fn test_rewrite_keeps_line_endings() {
		let text = "hej du\r\nnej\nhej\n";
		let op = Operation::new("*hej*", Some("*hopp*"));
		let (report, rewritten) = process_text(&path(), text, &op);

		assert_eq!(rewritten.unwrap(), "hopp du\r\nnej\nhopp\n");
		assert_eq!(report.changes.len(), 2);
		assert_eq!(
			report.changes[0],
			LineChange {
				number: 1,
				before: "hej du".to_string(),
				after: "hopp du".to_string(),
			}
		);
		assert_eq!(report.changes[1].number, 3);
	}

	#[test]
	fn test_rewrite_without_trailing_newline() {
		let op = Operation::new("a*", Some("b*"));
		let (_, rewritten) = process_text(&path(), "x\na1", &op);
		assert_eq!(rewritten.unwrap(), "x\nb1");
	}

	#[test]
	fn test_rewrite_without_changes() {
		let op = Operation::new("*tjo*", Some("*hopp*"));
		let (report, rewritten) = process_text(&path(), "hej hej hej\n", &op);
		assert!(rewritten.is_none());
		assert!(!report.has_hits());
	}

	#[test]
	fn test_rewrite_failure_leaves_line() {
		let op = Operation::Rewrite(Rewrite::new("*=*", "* * *"));
		let (report, rewritten) = process_text(&path(), "a=b\nplain\n", &op);

		assert!(rewritten.is_none());
		assert_eq!(report.failures.len(), 1);
		assert_eq!(report.failures[0].0, 1);
		assert!(matches!(
			report.failures[0].1,
			WildrepError::TooManyWildcards { .. }
		));
	}

	#[test]
	fn test_process_file_writes_back() {
		let temp_dir = tempfile::tempdir().unwrap();
		let file = temp_dir.path().join("input.go");
		fs::write(&file, "\tf(*fywire.Abort)\nother\n").unwrap();

		let op = Operation::new(r"*\*fywire.*", Some(r"*\*pb.*"));

		let dry = process_file(&file, &op, false).unwrap();
		assert_eq!(dry.changes.len(), 1);
		assert!(!dry.written);
		assert_eq!(
			fs::read_to_string(&file).unwrap(),
			"\tf(*fywire.Abort)\nother\n"
		);

		let report = process_file(&file, &op, true).unwrap();
		assert!(report.written);
		assert_eq!(fs::read_to_string(&file).unwrap(), "\tf(*pb.Abort)\nother\n");
	}

	#[test]
	fn test_process_file_rejects_binary() {
		let temp_dir = tempfile::tempdir().unwrap();
		let file = temp_dir.path().join("blob.bin");
		fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

		let result = process_file(&file, &Operation::new("*", None), false);
		assert!(matches!(result.unwrap_err(), WildrepError::FileRead { .. }));
	}
}
