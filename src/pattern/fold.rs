//! Case and diacritic folding.
//!
//! Folding is done per character so that indices in the folded text line up
//! with indices in the original text; word boundaries are computed on the
//! original characters.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold one character to its lowercase base letter (`É` -> `e`).
pub(crate) fn fold_char(c: char) -> char {
	if c.is_ascii() {
		return c.to_ascii_lowercase();
	}
	c.nfd()
		.find(|part| !is_combining_mark(*part))
		.and_then(|base| base.to_lowercase().next())
		.unwrap_or(c)
}

pub(crate) fn fold_chars(text: &str) -> Vec<char> {
	text.chars().map(fold_char).collect()
}

fn is_separator(c: char) -> bool {
	matches!(c, '_' | '-' | '.' | ' ' | '/' | '\\')
}

/// True when a match starting at `index` begins a word: at the start of the
/// text, right after a separator, or on a lowercase-to-uppercase transition.
pub(crate) fn is_word_start(original: &[char], index: usize) -> bool {
	if index == 0 {
		return true;
	}
	let Some(&previous) = original.get(index - 1) else {
		return false;
	};
	if is_separator(previous) {
		return true;
	}
	original
		.get(index)
		.is_some_and(|current| previous.is_lowercase() && current.is_uppercase())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_case_and_accents() {
		let folded: String = fold_chars("RÉVEILLÉ").into_iter().collect();
		assert_eq!(folded, "reveille");
	}

	#[test]
	fn keeps_length_aligned() {
		let text = "Ångström_ß";
		assert_eq!(fold_chars(text).len(), text.chars().count());
	}

	#[test]
	fn word_starts() {
		let chars: Vec<char> = "my_fileName.rs".chars().collect();
		assert!(is_word_start(&chars, 0));
		assert!(is_word_start(&chars, 3));
		assert!(is_word_start(&chars, 7));
		assert!(is_word_start(&chars, 12));
		assert!(!is_word_start(&chars, 4));
	}
}
