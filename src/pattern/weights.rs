use serde::{Deserialize, Serialize};

/// Default cap on how many bytes a content pattern reads from one file.
pub const DEFAULT_CONTENT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Weights of the fuzzy scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyWeights {
	pub base: i64,
	/// Subtracted once per candidate character.
	pub length_penalty: i64,
	/// Subtracted once per character of the matched span.
	pub span_penalty: i64,
	/// Subtracted once per gap between matched characters.
	pub hole_penalty: i64,
	/// Subtracted once per matched character with no matched neighbour.
	pub isolated_char_penalty: i64,
	pub start_bonus: i64,
	pub word_start_bonus: i64,
	pub exact_bonus: i64,
}

impl Default for FuzzyWeights {
	fn default() -> Self {
		Self {
			base: 50_000,
			length_penalty: 1,
			span_penalty: 10,
			hole_penalty: 30,
			isolated_char_penalty: 15,
			start_bonus: 10,
			word_start_bonus: 5,
			exact_bonus: 1_000,
		}
	}
}

/// Scores of every pattern variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
	pub fuzzy: FuzzyWeights,
	pub exact_score: u32,
	pub regex_score: u32,
	pub content_score: u32,
	/// Score a `!p` pattern returns when `p` does not match.
	pub not_score: u32,
}

impl Default for MatchWeights {
	fn default() -> Self {
		Self {
			fuzzy: FuzzyWeights::default(),
			exact_score: 50_000,
			regex_score: 50_000,
			content_score: 50_000,
			not_score: 1,
		}
	}
}

/// Compile-time options shared by every pattern of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
	pub exact_case_sensitive: bool,
	pub content_max_bytes: u64,
	pub weights: MatchWeights,
}

impl Default for MatchOptions {
	fn default() -> Self {
		Self {
			exact_case_sensitive: false,
			content_max_bytes: DEFAULT_CONTENT_MAX_BYTES,
			weights: MatchWeights::default(),
		}
	}
}
