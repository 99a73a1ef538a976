//! Logger setup for the `sprig` binary.
//!
//! The library only talks to the `log` facade. The binary installs
//! `env_logger` once at startup: on stderr for one-shot output, or into a file
//! under the cache directory while the interactive UI owns the terminal.

use std::fs::{self, File};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SPRIG_LOG";
pub const DEFAULT_FILTER: &str = "warn";
const LOG_FILE_NAME: &str = "sprig.log";

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
	Stderr,
	/// The session log in the cache directory, falling back to stderr when it
	/// cannot be created.
	CacheFile,
}

/// Install the global logger. `level` (a filter such as `debug` or
/// `sprig=trace`) overrides [`LOG_ENV`]. Returns the log file path when
/// records go to a file. Calling this twice keeps the first logger.
pub fn initialize(level: Option<&str>, destination: LogDestination) -> Option<PathBuf> {
	let mut builder = filter_builder(level);
	let log_path = match destination {
		LogDestination::Stderr => None,
		LogDestination::CacheFile => open_log_file().map(|(path, file)| {
			builder.target(Target::Pipe(Box::new(file)));
			path
		}),
	};
	if builder.try_init().is_err() {
		log::debug!("logger already installed");
		return None;
	}
	log_path
}

fn filter_builder(level: Option<&str>) -> Builder {
	let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, DEFAULT_FILTER));
	if let Some(level) = level {
		builder.parse_filters(level);
	}
	builder
}

fn open_log_file() -> Option<(PathBuf, File)> {
	let dir = crate::app_dirs::get_cache_dir().ok()?;
	fs::create_dir_all(&dir).ok()?;
	let path = dir.join(LOG_FILE_NAME);
	let file = File::create(&path).ok()?;
	Some((path, file))
}

#[cfg(test)]
mod tests {
	use log::LevelFilter;

	use super::*;

	#[test]
	fn explicit_level_overrides_environment() {
		let logger = filter_builder(Some("debug")).build();
		assert_eq!(logger.filter(), LevelFilter::Debug);
	}

	#[test]
	fn module_filters_are_accepted() {
		let logger = filter_builder(Some("warn,sprig=trace")).build();
		assert_eq!(logger.filter(), LevelFilter::Trace);
	}
}
