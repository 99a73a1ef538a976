//! Where `sprig` looks for its configuration and keeps its session log.
//!
//! Each location can be pinned with an environment variable; otherwise the
//! platform layout from the `directories` crate applies.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

/// Per-user locations used by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDir {
	/// Holds `config.toml`.
	Config,
	/// Holds the interactive session log.
	Cache,
}

impl AppDir {
	/// Environment variable that overrides this location.
	#[must_use]
	pub fn env_var(self) -> &'static str {
		match self {
			Self::Config => "SPRIG_CONFIG_DIR",
			Self::Cache => "SPRIG_CACHE_DIR",
		}
	}

	/// Resolve the directory, preferring a non-empty override.
	pub fn resolve(self) -> Result<PathBuf> {
		if let Some(dir) = env::var_os(self.env_var()).filter(|value| !value.is_empty()) {
			return Ok(PathBuf::from(dir));
		}
		let dirs = ProjectDirs::from("io", "sprig", "sprig")
			.ok_or_else(|| anyhow!("no home directory to place sprig files in"))?;
		Ok(match self {
			Self::Config => dirs.config_local_dir().to_path_buf(),
			Self::Cache => dirs.cache_dir().to_path_buf(),
		})
	}
}

pub fn get_config_dir() -> Result<PathBuf> {
	AppDir::Config.resolve()
}

pub fn get_cache_dir() -> Result<PathBuf> {
	AppDir::Cache.resolve()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overrides_are_distinct() {
		assert_ne!(AppDir::Config.env_var(), AppDir::Cache.env_var());
	}

	#[test]
	fn empty_override_falls_back_to_platform_layout() {
		// SAFETY: no other test touches the cache override.
		unsafe {
			env::set_var(AppDir::Cache.env_var(), "/tmp/sprig-cache");
		}
		assert_eq!(get_cache_dir().ok(), Some(PathBuf::from("/tmp/sprig-cache")));

		// SAFETY: as above.
		unsafe {
			env::set_var(AppDir::Cache.env_var(), "");
		}
		assert_ne!(get_cache_dir().ok(), Some(PathBuf::new()));

		// SAFETY: as above.
		unsafe {
			env::remove_var(AppDir::Cache.env_var());
		}
	}
}
