//! Query compilation and candidate scoring.
//!
//! A query string is parsed once into a [`Pattern`], a tagged tree of matchers
//! that can then score any number of candidates without re-parsing. A score of
//! `None` means "no match"; a match always has a positive score.

mod content;
mod fold;
mod fuzzy;
mod parser;
mod weights;

use regex::RegexBuilder;
use regex::bytes::RegexBuilder as BytesRegexBuilder;
use thiserror::Error;

pub use content::{CONTENT_CHUNK_BYTES, ContentProbe, ContentReader};
pub use fuzzy::FuzzyPattern;
pub use weights::{DEFAULT_CONTENT_MAX_BYTES, FuzzyWeights, MatchOptions, MatchWeights};

use fold::fold_chars;
use parser::{Expr, Term, TermKind};

/// Errors raised while compiling a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	#[error("invalid regex `{pattern}`: {message}")]
	InvalidRegex { pattern: String, message: String },
	#[error("unbalanced parenthesis at offset {position}")]
	UnbalancedParenthesis { position: usize },
	#[error("missing operand at offset {position}")]
	MissingOperand { position: usize },
	#[error("unknown flag `{flag}`")]
	UnknownFlag { flag: char },
	#[error("unexpected token at offset {position}")]
	UnexpectedToken { position: usize },
}

/// A compiled query.
#[derive(Debug, Clone)]
pub enum Pattern {
	Fuzzy(FuzzyPattern),
	Exact(ExactPattern),
	Regex(RegexPattern),
	ContentExact(ContentExactPattern),
	ContentRegex(ContentRegexPattern),
	Composite(Box<Composite>),
}

/// Boolean combination of two (or, for `Not`, one) sub-patterns.
#[derive(Debug, Clone)]
pub enum Composite {
	And(Pattern, Pattern),
	Or(Pattern, Pattern),
	Not { inner: Pattern, score: u32 },
}

#[derive(Debug, Clone)]
pub struct ExactPattern {
	needle: String,
	case_sensitive: bool,
	score: u32,
}

#[derive(Debug, Clone)]
pub struct RegexPattern {
	regex: regex::Regex,
	score: u32,
}

#[derive(Debug, Clone)]
pub struct ContentExactPattern {
	needle: Vec<u8>,
	case_sensitive: bool,
	max_bytes: u64,
	score: u32,
}

#[derive(Debug, Clone)]
pub struct ContentRegexPattern {
	regex: regex::bytes::Regex,
	max_bytes: u64,
	score: u32,
}

/// One entry offered for scoring. `content` is present only for regular files
/// that passed the structural filters; content patterns never match otherwise.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
	pub name: &'a str,
	pub content: Option<ContentProbe<'a>>,
}

impl<'a> Candidate<'a> {
	#[must_use]
	pub fn name(name: &'a str) -> Self {
		Self {
			name,
			content: None,
		}
	}
}

/// Compile `query`. A blank query yields `Ok(None)`: no pattern is active.
pub fn compile(query: &str, options: &MatchOptions) -> Result<Option<Pattern>, PatternError> {
	if query.trim().is_empty() {
		return Ok(None);
	}
	let expr = parser::parse(query)?;
	lower(expr, options).map(Some)
}

fn lower(expr: Expr, options: &MatchOptions) -> Result<Pattern, PatternError> {
	Ok(match expr {
		Expr::Term(term) => compile_term(term, options)?,
		Expr::Not(inner) => Pattern::Composite(Box::new(Composite::Not {
			inner: lower(*inner, options)?,
			score: options.weights.not_score.max(1),
		})),
		Expr::And(left, right) => Pattern::Composite(Box::new(Composite::And(
			lower(*left, options)?,
			lower(*right, options)?,
		))),
		Expr::Or(left, right) => Pattern::Composite(Box::new(Composite::Or(
			lower(*left, options)?,
			lower(*right, options)?,
		))),
	})
}

fn compile_term(term: Term, options: &MatchOptions) -> Result<Pattern, PatternError> {
	let weights = &options.weights;
	let case_sensitive = options.exact_case_sensitive;
	Ok(match term.kind {
		TermKind::Fuzzy => Pattern::Fuzzy(FuzzyPattern::new(&term.text, weights.fuzzy)),
		TermKind::Exact => Pattern::Exact(ExactPattern {
			needle: if case_sensitive {
				term.text
			} else {
				fold_chars(&term.text).into_iter().collect()
			},
			case_sensitive,
			score: weights.exact_score.max(1),
		}),
		TermKind::Regex { flags } => {
			let insensitive = parse_flags(&flags)?;
			let regex = RegexBuilder::new(&term.text)
				.case_insensitive(insensitive)
				.build()
				.map_err(|err| invalid_regex(&term.text, &err))?;
			Pattern::Regex(RegexPattern {
				regex,
				score: weights.regex_score.max(1),
			})
		}
		TermKind::ContentExact => Pattern::ContentExact(ContentExactPattern {
			needle: if case_sensitive {
				term.text.into_bytes()
			} else {
				term.text.to_ascii_lowercase().into_bytes()
			},
			case_sensitive,
			max_bytes: options.content_max_bytes,
			score: weights.content_score.max(1),
		}),
		TermKind::ContentRegex { flags } => {
			let insensitive = parse_flags(&flags)?;
			let regex = BytesRegexBuilder::new(&term.text)
				.case_insensitive(insensitive)
				.build()
				.map_err(|err| invalid_regex(&term.text, &err))?;
			Pattern::ContentRegex(ContentRegexPattern {
				regex,
				max_bytes: options.content_max_bytes,
				score: weights.content_score.max(1),
			})
		}
	})
}

fn parse_flags(flags: &str) -> Result<bool, PatternError> {
	let mut insensitive = false;
	for flag in flags.chars() {
		match flag {
			'i' => insensitive = true,
			other => return Err(PatternError::UnknownFlag { flag: other }),
		}
	}
	Ok(insensitive)
}

fn invalid_regex(pattern: &str, err: &regex::Error) -> PatternError {
	PatternError::InvalidRegex {
		pattern: pattern.to_string(),
		message: err.to_string(),
	}
}

impl Pattern {
	/// Score a bare name. Content patterns never match here.
	#[must_use]
	pub fn score(&self, candidate: &str) -> Option<u32> {
		self.score_entry(&Candidate::name(candidate))
	}

	/// Score a candidate entry, reading its content only when a content leaf
	/// is actually reached.
	#[must_use]
	pub fn score_entry(&self, candidate: &Candidate<'_>) -> Option<u32> {
		match self {
			Self::Fuzzy(fuzzy) => fuzzy.score(candidate.name),
			Self::Exact(exact) => exact.score(candidate.name),
			Self::Regex(regex) => regex.regex.is_match(candidate.name).then_some(regex.score),
			Self::ContentExact(exact) => {
				let probe = candidate.content.as_ref()?;
				content::contains_bytes(probe, &exact.needle, !exact.case_sensitive, exact.max_bytes)
					.then_some(exact.score)
			}
			Self::ContentRegex(regex) => {
				let probe = candidate.content.as_ref()?;
				content::regex_matches(probe, &regex.regex, regex.max_bytes).then_some(regex.score)
			}
			Self::Composite(composite) => composite.score(candidate),
		}
	}

	/// True when any leaf inspects file contents.
	#[must_use]
	pub fn reads_content(&self) -> bool {
		match self {
			Self::ContentExact(_) | Self::ContentRegex(_) => true,
			Self::Fuzzy(_) | Self::Exact(_) | Self::Regex(_) => false,
			Self::Composite(composite) => match composite.as_ref() {
				Composite::And(left, right) | Composite::Or(left, right) => {
					left.reads_content() || right.reads_content()
				}
				Composite::Not { inner, .. } => inner.reads_content(),
			},
		}
	}
}

impl Composite {
	fn score(&self, candidate: &Candidate<'_>) -> Option<u32> {
		match self {
			Self::And(left, right) => {
				let left = left.score_entry(candidate)?;
				let right = right.score_entry(candidate)?;
				Some(left.saturating_add(right))
			}
			Self::Or(left, right) => {
				match (left.score_entry(candidate), right.score_entry(candidate)) {
					(Some(a), Some(b)) => Some(a.saturating_add(b)),
					(Some(a), None) | (None, Some(a)) => Some(a),
					(None, None) => None,
				}
			}
			Self::Not { inner, score } => match inner.score_entry(candidate) {
				Some(_) => None,
				None => Some(*score),
			},
		}
	}
}

impl ExactPattern {
	fn score(&self, candidate: &str) -> Option<u32> {
		let found = if self.case_sensitive {
			candidate.contains(self.needle.as_str())
		} else {
			let folded: String = fold_chars(candidate).into_iter().collect();
			folded.contains(self.needle.as_str())
		};
		found.then_some(self.score)
	}
}

#[cfg(test)]
mod tests {
	use std::io::{self, Cursor, Read};
	use std::path::Path;

	use super::*;
	use crate::cancel::CancellationToken;

	fn pattern(query: &str) -> Pattern {
		compile(query, &MatchOptions::default())
			.expect("compile")
			.expect("non-empty query")
	}

	struct Text(&'static str);

	impl ContentReader for Text {
		fn open_content(&self, _path: &Path) -> io::Result<Box<dyn Read + '_>> {
			Ok(Box::new(Cursor::new(self.0.as_bytes())))
		}
	}

	fn with_content<'a>(
		name: &'a str,
		reader: &'a Text,
		token: &'a CancellationToken,
	) -> Candidate<'a> {
		Candidate {
			name,
			content: Some(ContentProbe {
				reader,
				path: Path::new(name),
				token,
			}),
		}
	}

	#[test]
	fn blank_query_compiles_to_nothing() {
		assert!(compile("", &MatchOptions::default()).unwrap().is_none());
		assert!(compile("   ", &MatchOptions::default()).unwrap().is_none());
	}

	#[test]
	fn exact_is_case_insensitive_by_default() {
		let p = pattern("=readme");
		assert_eq!(p.score("README.md"), Some(50_000));
		assert_eq!(p.score("license"), None);
	}

	#[test]
	fn exact_can_be_case_sensitive() {
		let options = MatchOptions {
			exact_case_sensitive: true,
			..MatchOptions::default()
		};
		let p = compile("=README", &options).unwrap().unwrap();
		assert!(p.score("README.md").is_some());
		assert!(p.score("readme.md").is_none());
	}

	#[test]
	fn regex_flags() {
		assert!(pattern("/^main/").score("Main.rs").is_none());
		assert!(pattern("/^main/i").score("Main.rs").is_some());
		assert!(matches!(
			compile("/x/g", &MatchOptions::default()),
			Err(PatternError::UnknownFlag { flag: 'g' })
		));
	}

	#[test]
	fn invalid_regex_is_reported() {
		assert!(matches!(
			compile("/(unclosed/", &MatchOptions::default()),
			Err(PatternError::InvalidRegex { .. })
		));
	}

	#[test]
	fn and_sums_and_short_circuits() {
		let p = pattern("=ma & =in");
		assert_eq!(p.score("main"), Some(100_000));
		assert_eq!(p.score("map"), None);
	}

	#[test]
	fn or_sums_when_both_match() {
		let p = pattern("=ma | =zz");
		assert_eq!(p.score("main"), Some(50_000));
		assert_eq!(pattern("=ma | =in").score("main"), Some(100_000));
		assert_eq!(p.score("other"), None);
	}

	#[test]
	fn not_returns_nominal_score() {
		let p = pattern("!=test");
		assert_eq!(p.score("main.rs"), Some(1));
		assert_eq!(p.score("tests.rs"), None);
	}

	#[test]
	fn content_patterns_need_a_probe() {
		let p = pattern("c/needle/");
		assert!(p.reads_content());
		assert_eq!(p.score("needle.txt"), None);

		let reader = Text("hay NEEDLE hay");
		let token = CancellationToken::new();
		let candidate = with_content("notes.txt", &reader, &token);
		assert_eq!(p.score_entry(&candidate), Some(50_000));
	}

	#[test]
	fn content_regex_matches_bytes() {
		let p = pattern("cr/fn\\s+main/");
		let reader = Text("pub fn  main() {}");
		let token = CancellationToken::new();
		assert!(p.score_entry(&with_content("main.rs", &reader, &token)).is_some());
	}

	#[test]
	fn name_and_content_combine() {
		let p = pattern("=.rs & c/todo/");
		let reader = Text("// TODO: tidy");
		let token = CancellationToken::new();
		assert_eq!(
			p.score_entry(&with_content("lib.rs", &reader, &token)),
			Some(100_000)
		);
		assert_eq!(p.score_entry(&with_content("lib.md", &reader, &token)), None);
		assert!(!pattern("=a | !b").reads_content());
	}
}
