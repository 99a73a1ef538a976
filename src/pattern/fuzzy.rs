use super::fold::{fold_chars, is_word_start};
use super::weights::FuzzyWeights;

/// Ordered-subsequence matcher over folded characters.
#[derive(Debug, Clone)]
pub struct FuzzyPattern {
	chars: Vec<char>,
	weights: FuzzyWeights,
}

#[derive(Debug, Clone, Copy)]
struct SpanMatch {
	start: usize,
	span: usize,
	holes: usize,
	isolated: usize,
	word_start: bool,
}

impl FuzzyPattern {
	pub(crate) fn new(source: &str, weights: FuzzyWeights) -> Self {
		Self {
			chars: fold_chars(source),
			weights,
		}
	}

	/// Number of folded characters in the pattern.
	#[must_use]
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Score `candidate`, or `None` when the pattern is not a subsequence of it.
	#[must_use]
	pub fn score(&self, candidate: &str) -> Option<u32> {
		if self.chars.is_empty() {
			return None;
		}
		let original: Vec<char> = candidate.chars().collect();
		if original.len() < self.chars.len() {
			return None;
		}
		let folded = fold_chars(candidate);
		let best = self.best_span(&original, &folded)?;
		Some(self.compute_score(&best, original.len()))
	}

	/// Pick the occurrence with the smallest span, preferring word-boundary
	/// starts on ties. A contiguous match at a word start cannot be beaten and
	/// ends the search.
	fn best_span(&self, original: &[char], folded: &[char]) -> Option<SpanMatch> {
		let needed = self.chars.len();
		let first = self.chars[0];
		let mut best: Option<SpanMatch> = None;

		for start in 0..=(folded.len() - needed) {
			if folded[start] != first {
				continue;
			}
			// When no full match exists from this start, none exists later.
			let Some(positions) = self.match_from(folded, start) else {
				break;
			};
			let candidate = describe(&positions, original);
			if candidate.span == needed && candidate.word_start {
				return Some(candidate);
			}
			let better = match &best {
				None => true,
				Some(current) => {
					candidate.span < current.span
						|| (candidate.span == current.span
							&& candidate.word_start && !current.word_start)
				}
			};
			if better {
				best = Some(candidate);
			}
		}

		best
	}

	/// Greedy leftmost match from a fixed start; yields the earliest end.
	fn match_from(&self, folded: &[char], start: usize) -> Option<Vec<usize>> {
		let mut positions = Vec::with_capacity(self.chars.len());
		positions.push(start);
		let mut cursor = start + 1;
		for &wanted in &self.chars[1..] {
			let offset = folded[cursor..].iter().position(|&c| c == wanted)?;
			positions.push(cursor + offset);
			cursor += offset + 1;
		}
		Some(positions)
	}

	fn compute_score(&self, found: &SpanMatch, candidate_len: usize) -> u32 {
		let w = &self.weights;
		let penalty = |weight: i64, count: usize| {
			weight.saturating_mul(i64::try_from(count).unwrap_or(i64::MAX))
		};
		let bonus = |weight: i64, applies: bool| if applies { weight } else { 0 };
		let score = w
			.base
			.saturating_sub(penalty(w.length_penalty, candidate_len))
			.saturating_sub(penalty(w.span_penalty, found.span))
			.saturating_sub(penalty(w.hole_penalty, found.holes))
			.saturating_sub(penalty(w.isolated_char_penalty, found.isolated))
			.saturating_add(bonus(w.start_bonus, found.start == 0))
			.saturating_add(bonus(w.word_start_bonus, found.word_start))
			.saturating_add(bonus(w.exact_bonus, self.chars.len() == candidate_len));
		u32::try_from(score.max(1)).unwrap_or(u32::MAX)
	}
}

fn describe(positions: &[usize], original: &[char]) -> SpanMatch {
	let start = positions[0];
	let end = positions[positions.len() - 1];
	let holes = positions
		.windows(2)
		.filter(|pair| pair[1] > pair[0] + 1)
		.count();
	let isolated = positions
		.iter()
		.enumerate()
		.filter(|(i, pos)| {
			let before = *i > 0 && positions[i - 1] + 1 == **pos;
			let after = positions.get(i + 1).is_some_and(|next| **pos + 1 == *next);
			!before && !after
		})
		.count();
	SpanMatch {
		start,
		span: end - start + 1,
		holes,
		isolated,
		word_start: is_word_start(original, start),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pattern(source: &str) -> FuzzyPattern {
		FuzzyPattern::new(source, FuzzyWeights::default())
	}

	#[test]
	fn requires_ordered_subsequence() {
		assert!(pattern("mr").score("main.rs").is_some());
		assert!(pattern("rm").score("main.rs").is_none());
		assert!(pattern("xyz").score("main.rs").is_none());
	}

	#[test]
	fn extreme_weights_saturate() {
		let heavy = FuzzyPattern::new(
			"ab",
			FuzzyWeights {
				length_penalty: i64::MAX,
				span_penalty: i64::MAX,
				..FuzzyWeights::default()
			},
		);
		assert_eq!(heavy.score("xaxbx"), Some(1));

		let generous = FuzzyPattern::new(
			"ab",
			FuzzyWeights {
				base: i64::MAX,
				exact_bonus: i64::MAX,
				start_bonus: i64::MAX,
				..FuzzyWeights::default()
			},
		);
		assert_eq!(generous.score("ab"), Some(u32::MAX));
	}

	#[test]
	fn folds_diacritics_and_case() {
		assert!(pattern("reveille").score("RÉVEILLÉ").is_some());
	}

	#[test]
	fn tighter_spans_score_higher() {
		let p = pattern("abc");
		let tight = p.score("xabcx").expect("tight");
		let loose = p.score("xaxbxc").expect("loose");
		assert!(tight > loose);
	}

	#[test]
	fn prefix_and_exact_matches_win() {
		let p = pattern("main");
		let exact = p.score("main").expect("exact");
		let prefix = p.score("main.rs").expect("prefix");
		let inner = p.score("domain.rs").expect("inner");
		assert!(exact > prefix);
		assert!(prefix > inner);
	}

	#[test]
	fn prefers_minimal_span_over_first_occurrence() {
		let p = pattern("ab");
		let found = p
			.best_span(&"a__ab".chars().collect::<Vec<_>>(), &fold_chars("a__ab"))
			.expect("match");
		assert_eq!(found.start, 3);
		assert_eq!(found.span, 2);
	}

	#[test]
	fn ties_prefer_word_starts() {
		let p = pattern("ab");
		let text = "xab_ab";
		let found = p
			.best_span(&text.chars().collect::<Vec<_>>(), &fold_chars(text))
			.expect("match");
		assert_eq!(found.start, 4);
		assert!(found.word_start);
	}

	#[test]
	fn scores_are_positive() {
		let p = FuzzyPattern::new(
			"a",
			FuzzyWeights {
				base: 0,
				..FuzzyWeights::default()
			},
		);
		assert_eq!(p.score("a very long candidate name"), Some(1));
	}
}
