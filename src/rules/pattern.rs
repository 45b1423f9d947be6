/// A single element of a wildcard pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
	/// An unescaped `*`, matching zero or more characters.
	Wildcard,

	/// Exactly one character, after escapes have been resolved.
	Literal(char),
}

/// A compiled wildcard pattern.
///
/// Patterns are created from strings where:
/// - `*` matches any substring (including the empty one)
/// - `\*` is a literal asterisk and `\\` a literal backslash
/// - any other backslash is an ordinary character
///
/// Compilation is infallible; every string is a valid pattern.
///
/// # Examples
///
/// ```
/// use wildrep_cli::rules::Pattern;
///
/// let pattern = Pattern::new("rfu*iiufuier");
/// assert_eq!(
/// 	pattern.captures("rfuXXXiiufuier"),
/// 	Some(vec!["XXX".to_string()])
/// );
/// assert!(!pattern.matches("rfuXXX"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
	source: String,
	tokens: Vec<Token>,
}

impl Pattern {
	/// Compile a pattern string into tokens.
	pub fn new(source: impl Into<String>) -> Self {
		let source = source.into();
		let tokens = tokenize(&source);
		Pattern { source, tokens }
	}

	/// The pattern text as given.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// The token sequence.
	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Number of wildcard tokens, which is also the length of every capture list.
	pub fn wildcard_count(&self) -> usize {
		self.tokens
			.iter()
			.filter(|t| matches!(t, Token::Wildcard))
			.count()
	}

	/// Longest run of literal tokens, see [`longest_fixed_part`].
	pub fn fixed_part(&self) -> String {
		let mut longest: &[Token] = &[];
		let mut longest_len = 0;
		for segment in self.tokens.split(|t| matches!(t, Token::Wildcard)) {
			let len = literal_len(segment);
			// Strictly greater keeps the earliest of equally long segments.
			if len > longest_len {
				longest = segment;
				longest_len = len;
			}
		}
		longest
			.iter()
			.filter_map(|t| match t {
				Token::Literal(c) => Some(*c),
				Token::Wildcard => None,
			})
			.collect()
	}
}

/// UTF-8 length in bytes of the literal text in `tokens`.
fn literal_len(tokens: &[Token]) -> usize {
	tokens
		.iter()
		.map(|t| match t {
			Token::Literal(c) => c.len_utf8(),
			Token::Wildcard => 0,
		})
		.sum()
}

impl std::fmt::Display for Pattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.source)
	}
}

impl From<&str> for Pattern {
	fn from(source: &str) -> Self {
		Pattern::new(source)
	}
}

/// Split a pattern string into tokens, resolving `\*` and `\\`.
pub fn tokenize(pattern: &str) -> Vec<Token> {
	let mut tokens = Vec::with_capacity(pattern.len());
	let mut chars = pattern.chars().peekable();
	let mut escaped = false;

	while let Some(c) = chars.next() {
		if escaped {
			tokens.push(Token::Literal(c));
			escaped = false;
		} else if c == '\\' && matches!(chars.peek(), Some('*' | '\\')) {
			escaped = true;
		} else if c == '*' {
			tokens.push(Token::Wildcard);
		} else {
			tokens.push(Token::Literal(c));
		}
	}

	tokens
}

/// Longest substring of `pattern` that contains no wildcard.
///
/// Literal segments are de-escaped before comparing their UTF-8 lengths in bytes.
/// Of several equally long segments the first one wins. A pattern made only
/// of wildcards gives an empty string.
///
/// ```
/// use wildrep_cli::rules::longest_fixed_part;
///
/// assert_eq!(longest_fixed_part("rfu*iiufuier"), "iiufuier");
/// assert_eq!(longest_fixed_part(r"rfu\*ii\\"), r"rfu*ii\");
/// ```
pub fn longest_fixed_part(pattern: &str) -> String {
	Pattern::new(pattern).fixed_part()
}
