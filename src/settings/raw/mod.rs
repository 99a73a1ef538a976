use std::env;

use anyhow::{Error, Result};
use serde::Deserialize;

use super::resolved::{ConfigSources, ResolvedConfig, SettingSource};
use crate::cli::CliArgs;

mod pattern;
mod tree;
mod ui;

use pattern::PatternSection;
use tree::TreeSection;
use ui::UiSection;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	tree: TreeSection,
	pattern: PatternSection,
	ui: UiSection,
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		self.tree.apply_cli_overrides(cli);
		self.pattern.apply_cli_overrides(cli);
		self.ui.apply_cli_overrides(cli);
	}

	/// Convert the raw configuration into a [`ResolvedConfig`], validating and
	/// filling defaults where required.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let sources = ConfigSources {
			max_depth: detect_source(
				cli.max_depth.is_some(),
				self.tree.max_depth.is_some(),
				"SPRIG__TREE__MAX_DEPTH",
				Some("--max-depth"),
				"tree.max_depth",
			),
			target_lines: detect_source(
				cli.lines.is_some(),
				self.tree.target_lines.is_some(),
				"SPRIG__TREE__TARGET_LINES",
				Some("--lines"),
				"tree.target_lines",
			),
			capacity: detect_source(
				cli.capacity.is_some(),
				self.tree.capacity.is_some(),
				"SPRIG__TREE__CAPACITY",
				Some("--capacity"),
				"tree.capacity",
			),
			pattern_multiplier: detect_source(
				cli.pattern_multiplier.is_some(),
				self.tree.pattern_multiplier.is_some(),
				"SPRIG__TREE__PATTERN_MULTIPLIER",
				Some("--pattern-multiplier"),
				"tree.pattern_multiplier",
			),
			base_depth_score: detect_source(
				false,
				self.tree.base_depth_score.is_some(),
				"SPRIG__TREE__BASE_DEPTH_SCORE",
				None,
				"tree.base_depth_score",
			),
			content_max_bytes: detect_source(
				cli.content_max_bytes.is_some(),
				self.pattern.content_max_bytes.is_some(),
				"SPRIG__PATTERN__CONTENT_MAX_BYTES",
				Some("--content-max-bytes"),
				"pattern.content_max_bytes",
			),
		};

		let fit_to_terminal = self.tree.target_lines.is_none();
		let (root, tree) = self.tree.resolve()?;
		let matching = self.pattern.resolve();
		let ui = self.ui.finalize();

		let config = ResolvedConfig {
			root,
			tree,
			matching,
			fit_to_terminal,
			initial_query: ui.initial_query,
			initial_wait: ui.initial_wait,
		};

		config.validate(&sources).map_err(Error::new)?;

		Ok(config)
	}
}

fn detect_source(
	cli_present: bool,
	value_present: bool,
	env_var: &'static str,
	cli_flag: Option<&'static str>,
	key: &'static str,
) -> Option<SettingSource> {
	if !value_present {
		return None;
	}

	if cli_present && let Some(flag) = cli_flag {
		return Some(SettingSource::CliFlag(flag));
	}

	if env::var_os(env_var).is_some() {
		return Some(SettingSource::Environment(env_var));
	}

	Some(SettingSource::ConfigKey(key))
}

#[cfg(test)]
mod tests;
