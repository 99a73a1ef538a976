use std::path::PathBuf;
use std::time::Duration;

use sprig::{MatchOptions, TreeOptions};

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug)]
pub struct ResolvedConfig {
	pub root: PathBuf,
	pub tree: TreeOptions,
	pub matching: MatchOptions,
	/// No explicit line target was given; the interactive view sizes the tree
	/// to the terminal.
	pub fit_to_terminal: bool,
	pub initial_query: String,
	pub initial_wait: Option<Duration>,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Print a human readable summary of the effective configuration.
	pub fn print_summary(&self) {
		print!("{}", summary::render_summary(self));
	}
}
