use serde::Deserialize;
use sprig::{MatchOptions, MatchWeights};

use crate::cli::CliArgs;

/// `[pattern]` options as they are read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct PatternSection {
	pub(super) exact_case_sensitive: Option<bool>,
	pub(super) content_max_bytes: Option<u64>,
	pub(super) weights: Option<MatchWeights>,
}

impl PatternSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(value) = cli.case_sensitive {
			self.exact_case_sensitive = Some(value);
		}
		if let Some(value) = cli.content_max_bytes {
			self.content_max_bytes = Some(value);
		}
	}

	pub(super) fn resolve(self) -> MatchOptions {
		let defaults = MatchOptions::default();
		MatchOptions {
			exact_case_sensitive: self
				.exact_case_sensitive
				.unwrap_or(defaults.exact_case_sensitive),
			content_max_bytes: self.content_max_bytes.unwrap_or(defaults.content_max_bytes),
			weights: self.weights.unwrap_or(defaults.weights),
		}
	}
}
