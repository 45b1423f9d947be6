use crate::error::{Result, WildrepError};
use crate::rules::pattern::{Pattern, Token};

/// Outcome of applying a rewrite to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
	/// The line matched and the rewrite produced different text.
	Modified(String),

	/// The line did not match, or the rewrite reproduced it exactly.
	Unmodified,
}

impl Replacement {
	/// The rewritten text, if any.
	pub fn into_modified(self) -> Option<String> {
		match self {
			Replacement::Modified(line) => Some(line),
			Replacement::Unmodified => None,
		}
	}

	/// Whether the rewrite changed the line.
	pub fn is_modified(&self) -> bool {
		matches!(self, Replacement::Modified(_))
	}
}

/// A compiled source/destination pattern pair.
///
/// Wildcards in `source` capture text; wildcards in `destination` insert the
/// captures again, in order. Captures are rewritten recursively before they
/// are inserted, so nested occurrences of the source pattern change too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	/// The pattern to match.
	pub source: Pattern,

	/// The pattern to assemble the new line from.
	pub destination: Pattern,
}

impl Rewrite {
	/// Compile both patterns.
	pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
		Rewrite {
			source: Pattern::new(source),
			destination: Pattern::new(destination),
		}
	}

	/// Check up front that the destination never asks for more captures than
	/// the source provides.
	pub fn validate(&self) -> Result<()> {
		let wildcards = self.destination.wildcard_count();
		let captures = self.source.wildcard_count();
		if wildcards > captures {
			return Err(self.too_many_wildcards(captures));
		}
		Ok(())
	}

	/// Apply this rewrite to a line.
	///
	/// ```
	/// use wildrep_cli::rules::{Replacement, Rewrite};
	///
	/// let rewrite = Rewrite::new("*hej*", "*hopp*");
	/// assert_eq!(
	/// 	rewrite.apply("hej hej hej").unwrap(),
	/// 	Replacement::Modified("hopp hopp hopp".to_string())
	/// );
	/// ```
	pub fn apply(&self, line: &str) -> Result<Replacement> {
		let Some(captures) = self.source.capture_slices(line) else {
			return Ok(Replacement::Unmodified);
		};

		// The pattern might match inside the captures too. Nesting can go as
		// deep as the line is long, so pending lines live on an explicit stack.
		let mut stack = vec![Frame::new(line, captures)];
		let mut rewritten = String::new();

		while let Some(frame) = stack.last_mut() {
			if let Some(capture) = frame.pending.next() {
				// An empty capture or one spanning its line would recurse forever
				let inner = if capture.is_empty() || capture == frame.line {
					None
				} else {
					self.source.capture_slices(capture)
				};
				match inner {
					Some(captures) => stack.push(Frame::new(capture, captures)),
					None => frame.done.push(capture.to_string()),
				}
				continue;
			}

			let captures = std::mem::take(&mut frame.done);
			stack.pop();
			let assembled = self.assemble(&captures)?;
			match stack.last_mut() {
				Some(parent) => parent.done.push(assembled),
				None => rewritten = assembled,
			}
		}

		if rewritten == line {
			return Ok(Replacement::Unmodified);
		}
		Ok(Replacement::Modified(rewritten))
	}

	/// Fill the destination pattern with `captures`; surplus captures are ignored.
	fn assemble(&self, captures: &[String]) -> Result<String> {
		let mut out = String::new();
		let mut parts = captures.iter();

		for token in self.destination.tokens() {
			match token {
				Token::Literal(c) => out.push(*c),
				Token::Wildcard => {
					let part = parts
						.next()
						.ok_or_else(|| self.too_many_wildcards(captures.len()))?;
					out.push_str(part);
				}
			}
		}

		Ok(out)
	}

	fn too_many_wildcards(&self, captures: usize) -> WildrepError {
		WildrepError::TooManyWildcards {
			pattern: self.destination.as_str().to_string(),
			wildcards: self.destination.wildcard_count(),
			captures,
		}
	}
}

/// A matched line whose captures are being rewritten.
struct Frame<'a> {
	line: &'a str,
	pending: std::vec::IntoIter<&'a str>,
	done: Vec<String>,
}

impl<'a> Frame<'a> {
	fn new(line: &'a str, captures: Vec<&'a str>) -> Self {
		Frame {
			line,
			done: Vec::with_capacity(captures.len()),
			pending: captures.into_iter(),
		}
	}
}

/// Rewrite `line` from the `source` pattern into the `destination` pattern.
///
/// Returns [`Replacement::Unmodified`] when the line does not match or the
/// result equals the input, and [`WildrepError::TooManyWildcards`] when
/// `destination` uses more wildcards than `source` captured.
pub fn replace(line: &str, source: &str, destination: &str) -> Result<Replacement> {
	Rewrite::new(source, destination).apply(line)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn modified(line: &str) -> Replacement {
		Replacement::Modified(line.to_string())
	}

	#[rstest]
	#[case::basic("hej hej hej", "*hej*", "*hopp*", modified("hopp hopp hopp"))]
	#[case::none("hej hej hej", "*tjo*", "*hopp*", Replacement::Unmodified)]
	#[case::duplicates("hhhh", "*hh*", "*h*", modified("hh"))]
	#[case::escaped_wildcard("hh*hh", r"*h\*h*", r"*g\*g*", modified("hg*gh"))]
	#[case::escaped_backslash(r"hh\hh", r"*h\\h*", r"*g\\g*", modified(r"hg\gh"))]
	#[case::escaped_backslash_wildcard(r"hh\*hh", r"*h\\\*h*", r"*g\\g*", modified(r"hg\gh"))]
	#[case::escaped_backslash_wildcard_fail(
		r"hh\hh",
		r"*h\\\*h*",
		r"*g\\\*g*",
		Replacement::Unmodified
	)]
	#[case::escaped_backslash_real_wildcard(r"hh\kh", r"*h\\*h*", r"*g\\*g*", modified(r"hg\kg"))]
	#[case::leading_asterisk(
		"\thandleClusterAbort(*fywire.ClusterAbort, factory.NodeID) (lnfactory_pb.Message, error)",
		r"*\*fywire.*",
		r"*\*lnfactory_pb.*",
		modified(
			"\thandleClusterAbort(*lnfactory_pb.ClusterAbort, factory.NodeID) (lnfactory_pb.Message, error)"
		)
	)]
	#[case::surplus_captures_dropped("key=value", "*=*", "*", modified("key"))]
	#[case::literal_destination("abc", "a*c", "done", modified("done"))]
	#[case::swap("left,right", "*,*", "*;*", modified("left;right"))]
	fn test_replace(
		#[case] line: &str,
		#[case] source: &str,
		#[case] destination: &str,
		#[case] want: Replacement,
	) {
		assert_eq!(replace(line, source, destination).unwrap(), want);
	}

	#[test]
	fn test_replace_recurses_into_captures() {
		// The inner call(x) sits inside the capture of the outer one
		let result = replace("call(call(x))", "call(*)", "run[*]").unwrap();
		assert_eq!(result, modified("run[run[x]]"));
	}

	#[test]
	fn test_replace_long_line() {
		// Every level peels one `x` off the second capture
		let line = "x".repeat(50_000);
		let result = replace(&line, "*x*", "*y*").unwrap();
		assert_eq!(result, modified(&"y".repeat(50_000)));
	}

	#[test]
	fn test_replace_rewrites_each_capture() {
		// The first call is rewritten at the top level, the second inside the tail capture
		let result = replace("f(a) f(b)", "*f(*)*", "*g[*]*").unwrap();
		assert_eq!(result, modified("g[a] g[b]"));
	}

	#[test]
	fn test_replace_is_not_a_fixed_point() {
		let first = replace("hhhh", "*hh*", "*h*").unwrap();
		assert_eq!(first, modified("hh"));

		// Applying again terminates and keeps shrinking
		let second = replace("hh", "*hh*", "*h*").unwrap();
		assert_eq!(second, modified("h"));
		let third = replace("h", "*hh*", "*h*").unwrap();
		assert_eq!(third, Replacement::Unmodified);
	}

	#[test]
	fn test_whole_line_capture_does_not_recurse() {
		// `*` captures the whole line; rewriting it must terminate
		let result = replace("abc", "*", "<*>").unwrap();
		assert_eq!(result, modified("<abc>"));
	}

	#[rstest]
	#[case("hej hej hej", "*hej*")]
	#[case("anything", "*")]
	#[case("no match here", "*tjo*")]
	#[case(r"a\*b", r"a\\\*b")]
	fn test_identical_patterns_leave_line_unmodified(#[case] line: &str, #[case] pattern: &str) {
		assert_eq!(
			replace(line, pattern, pattern).unwrap(),
			Replacement::Unmodified
		);
	}

	#[test]
	fn test_too_many_wildcards_in_destination() {
		let result = replace("a=b", "*=*", "* * *");
		match result.unwrap_err() {
			WildrepError::TooManyWildcards {
				pattern,
				wildcards,
				captures,
			} => {
				assert_eq!(pattern, "* * *");
				assert_eq!(wildcards, 3);
				assert_eq!(captures, 2);
			}
			e => panic!("Expected TooManyWildcards error, got {e:?}"),
		}
	}

	#[test]
	fn test_too_many_wildcards_ignored_without_match() {
		let result = replace("no equals sign", "*=*", "* * *").unwrap();
		assert_eq!(result, Replacement::Unmodified);
	}

	#[test]
	fn test_validate() {
		assert!(Rewrite::new("*=*", "*").validate().is_ok());
		assert!(Rewrite::new("*=*", "*:*").validate().is_ok());
		assert!(Rewrite::new("*=*", "***").validate().is_err());
	}

	#[test]
	fn test_replacement_accessors() {
		assert!(modified("x").is_modified());
		assert!(!Replacement::Unmodified.is_modified());
		assert_eq!(modified("x").into_modified(), Some("x".to_string()));
		assert_eq!(Replacement::Unmodified.into_modified(), None);
	}
}
