use std::collections::HashSet;
use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use sprig::tree::normalize_extension;

/// Normalize and deduplicate file extensions provided by the user.
pub(super) fn sanitize_extensions(values: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	values
		.into_iter()
		.map(|value| normalize_extension(&value))
		.filter(|value| !value.is_empty() && seen.insert(value.clone()))
		.collect()
}

/// Trim entry names, dropping blanks and duplicates.
pub(super) fn sanitize_names(values: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	values
		.into_iter()
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty() && seen.insert(value.clone()))
		.collect()
}

/// Render `path` relative to the home directory when it lives inside it.
pub(super) fn home_relative(path: &Path) -> String {
	if let Some(home_os) = env::var_os("HOME") {
		let home = PathBuf::from(home_os);
		if let Ok(rel) = path.strip_prefix(&home) {
			if rel.components().next().is_none() {
				return "~".to_string();
			}
			return format!("~{MAIN_SEPARATOR}{}", rel.display());
		}
	}
	path.display().to_string()
}

#[cfg(test)]
mod tests {
	use tempfile::tempdir;

	use super::*;

	#[test]
	fn extensions_are_cleaned_and_deduplicated() {
		let cleaned =
			sanitize_extensions(vec![" .RS ".into(), "rs".into(), "".into(), ".Txt".into()]);
		assert_eq!(cleaned, vec!["rs", "txt"]);
	}

	#[test]
	fn names_are_trimmed_and_filtered() {
		let names = sanitize_names(vec![" target ".into(), "".into(), "target".into(), ".git".into()]);
		assert_eq!(names, vec!["target", ".git"]);
	}

	#[test]
	fn home_relative_prefers_tilde() {
		let dir = tempdir().expect("tempdir");
		let home = dir.path();
		let old_home = env::var_os("HOME");
		// SAFETY: Adjusting the HOME environment variable for the duration of this test.
		unsafe {
			env::set_var("HOME", home.as_os_str());
		}

		assert!(home_relative(&home.join("projects/foo")).starts_with('~'));
		assert_eq!(home_relative(home), "~");

		// SAFETY: Restoring the previous HOME value captured at the start of the test.
		unsafe {
			match old_home {
				Some(value) => env::set_var("HOME", value),
				None => env::remove_var("HOME"),
			}
		}
	}
}
