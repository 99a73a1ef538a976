use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sprig::app_dirs;

use crate::cli::CliArgs;

/// Keys read from `SPRIG__…` variables as comma-separated lists.
const LIST_KEYS: [&str; 2] = ["tree.global_ignores", "tree.allowed_extensions"];

/// Layer the config files and `SPRIG__` variables, lowest precedence first.
/// CLI flags are applied later, on the deserialized sections.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let defaults = if cli.no_config {
		Vec::new()
	} else {
		default_config_files()
	};
	let layers = defaults
		.into_iter()
		.map(|path| (path, false))
		.chain(cli.config.iter().map(|path| (path.clone(), true)));

	let mut builder = Config::builder();
	for (path, required) in layers {
		log::debug!("config layer {} (required: {required})", path.display());
		builder = builder.add_source(File::from(path).required(required));
	}

	builder
		.add_source(sprig_environment())
		.build()
		.context("failed to assemble configuration")
}

fn sprig_environment() -> Environment {
	LIST_KEYS.into_iter().fold(
		Environment::with_prefix("sprig")
			.prefix_separator("__")
			.separator("__")
			.try_parsing(true)
			.list_separator(","),
		Environment::with_list_parse_key,
	)
}

/// `config.toml` in the config directory, then `.sprig.toml` and `sprig.toml`
/// in the working directory.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	let user = app_dirs::get_config_dir()
		.ok()
		.map(|dir| dir.join("config.toml"));
	let local = env::current_dir()
		.ok()
		.into_iter()
		.flat_map(|dir| [dir.join(".sprig.toml"), dir.join("sprig.toml")]);
	user.into_iter().chain(local).collect()
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;
	use tempfile::tempdir;

	use super::*;

	#[test]
	fn default_files_include_current_directory_variants() {
		let files = default_config_files();
		assert!(files.iter().any(|path| path.ends_with(".sprig.toml")));
		assert!(files.iter().any(|path| path.ends_with("sprig.toml")));
	}

	#[test]
	fn explicit_files_are_merged() {
		let dir = tempdir().expect("tempdir");
		let path = dir.path().join("custom.toml");
		fs::write(&path, "[tree]\nmax_depth = 3\n\n[ui]\ninitial_pattern = \"rs\"\n").expect("write");

		let mut cli = CliArgs::parse_from(["sprig", "--no-config"]);
		cli.config = vec![path];
		let config = build_config(&cli).expect("config");
		assert_eq!(config.get_int("tree.max_depth").expect("depth"), 3);
		assert_eq!(config.get_string("ui.initial_pattern").expect("pattern"), "rs");
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let mut cli = CliArgs::parse_from(["sprig", "--no-config"]);
		cli.config = vec![PathBuf::from("/definitely/not/here/sprig.toml")];
		assert!(build_config(&cli).is_err());
	}
}
