use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use sprig::{IgnoreOptions, ScoreWeights, TreeOptions};

use super::super::util::{sanitize_extensions, sanitize_names};
use crate::cli::CliArgs;

/// `[tree]` options as they are read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct TreeSection {
	pub(super) root: Option<PathBuf>,
	pub(super) show_hidden: Option<bool>,
	pub(super) follow_symlinks: Option<bool>,
	pub(super) respect_ignore_files: Option<bool>,
	pub(super) git_ignore: Option<bool>,
	pub(super) git_global: Option<bool>,
	pub(super) git_exclude: Option<bool>,
	pub(super) only_folders: Option<bool>,
	pub(super) max_depth: Option<usize>,
	pub(super) allowed_extensions: Option<Vec<String>>,
	pub(super) global_ignores: Option<Vec<String>>,
	pub(super) target_lines: Option<usize>,
	pub(super) capacity: Option<usize>,
	pub(super) pattern_multiplier: Option<usize>,
	pub(super) base_depth_score: Option<i64>,
	pub(super) direct_match_bonus: Option<i64>,
}

impl TreeSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(root) = cli.root.clone() {
			self.root = Some(root);
		}
		if let Some(value) = cli.hidden {
			self.show_hidden = Some(value);
		}
		if let Some(value) = cli.follow_symlinks {
			self.follow_symlinks = Some(value);
		}
		if let Some(value) = cli.respect_ignore_files {
			self.respect_ignore_files = Some(value);
		}
		if let Some(value) = cli.git_ignore {
			self.git_ignore = Some(value);
		}
		if let Some(value) = cli.git_global {
			self.git_global = Some(value);
		}
		if let Some(value) = cli.git_exclude {
			self.git_exclude = Some(value);
		}
		if let Some(value) = cli.only_folders {
			self.only_folders = Some(value);
		}
		if let Some(value) = cli.max_depth {
			self.max_depth = Some(value);
		}
		if let Some(value) = &cli.extensions {
			self.allowed_extensions = Some(value.clone());
		}
		if let Some(value) = &cli.global_ignores {
			self.global_ignores = Some(value.clone());
		}
		if let Some(value) = cli.lines {
			self.target_lines = Some(value);
		}
		if let Some(value) = cli.capacity {
			self.capacity = Some(value);
		}
		if let Some(value) = cli.pattern_multiplier {
			self.pattern_multiplier = Some(value);
		}
	}

	/// Canonical root plus the build options. The root must be a directory.
	pub(super) fn resolve(self) -> Result<(PathBuf, TreeOptions)> {
		let mut root = match self.root {
			Some(path) => path,
			None => env::current_dir().context("failed to determine working directory")?,
		};
		if root.is_relative() {
			root = env::current_dir()
				.context("failed to resolve current directory for root")?
				.join(root);
		}
		root = fs::canonicalize(&root)
			.with_context(|| format!("failed to canonicalize root {}", root.display()))?;

		let metadata = fs::metadata(&root)
			.with_context(|| format!("failed to inspect root {}", root.display()))?;
		ensure!(metadata.is_dir(), "root must be a directory");

		let defaults = TreeOptions::default();
		let options = TreeOptions {
			show_hidden: self.show_hidden.unwrap_or(defaults.show_hidden),
			follow_symlinks: self.follow_symlinks.unwrap_or(defaults.follow_symlinks),
			ignore: IgnoreOptions {
				respect_ignore_files: self.respect_ignore_files.unwrap_or(true),
				git_ignore: self.git_ignore.unwrap_or(true),
				git_global: self.git_global.unwrap_or(true),
				git_exclude: self.git_exclude.unwrap_or(true),
			},
			global_ignores: self
				.global_ignores
				.map(sanitize_names)
				.unwrap_or(defaults.global_ignores),
			only_folders: self.only_folders.unwrap_or(defaults.only_folders),
			allowed_extensions: self
				.allowed_extensions
				.map(sanitize_extensions)
				.filter(|exts| !exts.is_empty()),
			max_depth: self.max_depth,
			target_line_count: self.target_lines.unwrap_or(defaults.target_line_count),
			capacity: self.capacity,
			pattern_multiplier: self.pattern_multiplier.unwrap_or(defaults.pattern_multiplier),
			weights: ScoreWeights {
				base_depth_score: self
					.base_depth_score
					.unwrap_or(defaults.weights.base_depth_score),
				direct_match_bonus: self
					.direct_match_bonus
					.unwrap_or(defaults.weights.direct_match_bonus),
			},
		};

		Ok((root, options))
	}
}
