use std::collections::HashSet;

use crate::source::IgnoreOptions;

use super::BuildError;

/// Lines the viewport is expected to show when nothing else is configured.
pub const DEFAULT_TARGET_LINE_COUNT: usize = 50;
/// How many more candidates a pattern build gathers before ranking.
pub const DEFAULT_PATTERN_MULTIPLIER: usize = 10;

/// Constants of the per-node score `base_depth_score - depth (+ pattern score
/// + direct_match_bonus)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
	pub base_depth_score: i64,
	pub direct_match_bonus: i64,
}

impl Default for ScoreWeights {
	fn default() -> Self {
		Self {
			base_depth_score: 10_000,
			direct_match_bonus: 10,
		}
	}
}

/// Structural filters and tunables of one tree build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
	/// Show dot-prefixed entries.
	pub show_hidden: bool,
	/// Descend into symlinked directories.
	pub follow_symlinks: bool,
	/// Ignore files to honour.
	pub ignore: IgnoreOptions,
	/// Entry names that are always ignored.
	pub global_ignores: Vec<String>,
	/// Drop files, keep directories only.
	pub only_folders: bool,
	/// File extensions to keep, without the leading dot.
	pub allowed_extensions: Option<Vec<String>>,
	/// Deepest level whose entries are listed; the root is depth 0.
	pub max_depth: Option<usize>,
	/// Viewport line capacity; early termination without a pattern.
	pub target_line_count: usize,
	/// Hard cap on emitted lines, prune markers included. Defaults to the
	/// target line count.
	pub capacity: Option<usize>,
	pub pattern_multiplier: usize,
	pub weights: ScoreWeights,
}

impl Default for TreeOptions {
	fn default() -> Self {
		Self {
			show_hidden: false,
			follow_symlinks: false,
			ignore: IgnoreOptions::default(),
			global_ignores: default_global_ignores(),
			only_folders: false,
			allowed_extensions: None,
			max_depth: None,
			target_line_count: DEFAULT_TARGET_LINE_COUNT,
			capacity: None,
			pattern_multiplier: DEFAULT_PATTERN_MULTIPLIER,
			weights: ScoreWeights::default(),
		}
	}
}

/// Names skipped everywhere unless overridden.
#[must_use]
pub fn default_global_ignores() -> Vec<String> {
	[
		".git",
		"node_modules",
		"target",
		".venv",
		".cache",
		"__pycache__",
		".mypy_cache",
		".pytest_cache",
		".DS_Store",
	]
	.into_iter()
	.map(String::from)
	.collect()
}

impl TreeOptions {
	/// Reject options that cannot produce a bounded tree.
	pub fn validate(&self) -> Result<(), BuildError> {
		if self.target_line_count == 0 {
			return Err(BuildError::InvalidOptions(
				"target line count must be at least 1".into(),
			));
		}
		if self.capacity() < 2 {
			return Err(BuildError::InvalidOptions(format!(
				"capacity must be at least 2, got {}",
				self.capacity()
			)));
		}
		if self.pattern_multiplier == 0 {
			return Err(BuildError::InvalidOptions(
				"pattern multiplier must be at least 1".into(),
			));
		}
		if self.max_depth == Some(0) {
			return Err(BuildError::InvalidOptions(
				"max depth must be at least 1".into(),
			));
		}
		if self.weights.base_depth_score <= 0 {
			return Err(BuildError::InvalidOptions(
				"base depth score must be positive".into(),
			));
		}
		Ok(())
	}

	#[must_use]
	pub fn capacity(&self) -> usize {
		self.capacity.unwrap_or(self.target_line_count)
	}

	/// Number of nodes gathered before traversal stops early.
	#[must_use]
	pub fn gather_limit(&self, pattern_active: bool) -> usize {
		if pattern_active {
			self.target_line_count.saturating_mul(self.pattern_multiplier)
		} else {
			self.target_line_count
		}
	}

	/// Whether directories at `depth` may be listed.
	#[must_use]
	pub fn may_expand(&self, depth: usize) -> bool {
		self.max_depth.is_none_or(|max| depth < max)
	}

	/// Build a set of allowed extensions if configured.
	#[must_use]
	pub fn extension_filter(&self) -> Option<HashSet<String>> {
		self.allowed_extensions.as_ref().map(|extensions| {
			extensions
				.iter()
				.map(|ext| normalize_extension(ext))
				.filter(|ext| !ext.is_empty())
				.collect()
		})
	}

	#[must_use]
	pub fn global_ignore_set(&self) -> HashSet<&str> {
		self.global_ignores.iter().map(String::as_str).collect()
	}
}

/// Normalize an extension by trimming and removing leading dots.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
	ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
