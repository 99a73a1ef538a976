use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;

const DEFAULT_INITIAL_WAIT_MS: u64 = 250;

/// `[ui]` options prior to validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UiSection {
	pub(super) initial_pattern: Option<String>,
	/// How long startup waits for the first tree, in milliseconds.
	pub(super) initial_wait_ms: Option<u64>,
}

pub(super) struct UiResolution {
	pub(super) initial_query: String,
	pub(super) initial_wait: Option<Duration>,
}

impl UiSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(query) = cli.query.clone() {
			self.initial_pattern = Some(query);
		}
	}

	pub(super) fn finalize(self) -> UiResolution {
		let wait = self.initial_wait_ms.unwrap_or(DEFAULT_INITIAL_WAIT_MS);
		UiResolution {
			initial_query: self.initial_pattern.unwrap_or_default(),
			initial_wait: (wait > 0).then(|| Duration::from_millis(wait)),
		}
	}
}
