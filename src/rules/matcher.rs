//! Backtracking matcher for wildcard patterns.
//!
//! A wildcard is bounded by its anchor, the literal that follows it in the
//! pattern. Split points are tried at each occurrence of the anchor in the
//! target, earliest first, and the rest of the pattern is matched
//! recursively from there. The first split that lets the remainder succeed
//! wins. Worst case is exponential in the number of ambiguous anchors.

use crate::rules::pattern::{Pattern, Token};

impl Pattern {
	/// Match `target` against this pattern.
	///
	/// Returns the text consumed by each wildcard, in pattern order, or
	/// `None` if the pattern does not cover the whole target.
	pub fn captures(&self, target: &str) -> Option<Vec<String>> {
		let slices = self.capture_slices(target)?;
		Some(slices.into_iter().map(str::to_string).collect())
	}

	/// Like [`Pattern::captures`], but borrowing the captured text from `target`.
	pub fn capture_slices<'a>(&self, target: &'a str) -> Option<Vec<&'a str>> {
		match_tokens(self.tokens(), target)
	}

	/// Check whether the whole `target` matches this pattern.
	pub fn matches(&self, target: &str) -> bool {
		self.capture_slices(target).is_some()
	}
}

/// Match `target` against the wildcard `pattern`.
///
/// ```
/// use wildrep_cli::rules::match_pattern;
///
/// assert_eq!(
/// 	match_pattern("a*b*b", "aXbYb"),
/// 	Some(vec!["X".to_string(), "Y".to_string()])
/// );
/// assert_eq!(match_pattern("a*", "ba"), None);
/// ```
pub fn match_pattern(pattern: &str, target: &str) -> Option<Vec<String>> {
	Pattern::new(pattern).captures(target)
}

/// Core recursive matcher over tokens and a target string.
///
/// Recursion depth is bounded by the number of wildcards in `tokens`.
pub(crate) fn match_tokens<'a>(tokens: &[Token], target: &'a str) -> Option<Vec<&'a str>> {
	let mut captures = Vec::new();
	let mut remaining = target;

	for (i, token) in tokens.iter().enumerate() {
		match token {
			Token::Literal(c) => {
				remaining = remaining.strip_prefix(*c)?;
			}
			Token::Wildcard => {
				let rest = &tokens[i + 1..];

				// Trailing wildcard takes everything left
				let Some(next) = rest.first() else {
					captures.push(remaining);
					return Some(captures);
				};

				// A literal anchor only splits where the target holds that
				// character; a following wildcard accepts any position.
				let is_split = |j: usize| match next {
					Token::Literal(anchor) => remaining[j..].starts_with(*anchor),
					Token::Wildcard => true,
				};

				let (j, tail) = remaining
					.char_indices()
					.map(|(j, _)| j)
					.chain([remaining.len()])
					.filter(|&j| is_split(j))
					.find_map(|j| match_tokens(rest, &remaining[j..]).map(|tail| (j, tail)))?;

				captures.push(&remaining[..j]);
				captures.extend(tail);
				return Some(captures);
			}
		}
	}

	remaining.is_empty().then_some(captures)
}
