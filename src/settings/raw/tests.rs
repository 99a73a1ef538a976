use std::path::PathBuf;

use clap::Parser;
use tempfile::tempdir;

use super::RawConfig;
use crate::cli::CliArgs;

#[test]
fn cli_overrides_take_precedence() {
	let mut cli = CliArgs::parse_from(["sprig", "-q", "rs"]);
	cli.root = Some(PathBuf::from("/tmp"));
	cli.hidden = Some(true);
	cli.follow_symlinks = Some(true);
	cli.only_folders = Some(true);
	cli.git_ignore = Some(false);
	cli.max_depth = Some(4);
	cli.extensions = Some(vec!["rs".into()]);
	cli.global_ignores = Some(vec!["target".into()]);
	cli.lines = Some(20);
	cli.capacity = Some(30);
	cli.case_sensitive = Some(true);

	let mut config = RawConfig::default();
	config.tree.max_depth = Some(9);
	config.apply_cli_overrides(&cli);

	assert_eq!(config.tree.root, cli.root);
	assert_eq!(config.tree.show_hidden, Some(true));
	assert_eq!(config.tree.only_folders, Some(true));
	assert_eq!(config.tree.git_ignore, Some(false));
	assert_eq!(config.tree.max_depth, Some(4));
	assert_eq!(config.tree.target_lines, Some(20));
	assert_eq!(config.tree.capacity, Some(30));
	assert_eq!(config.pattern.exact_case_sensitive, Some(true));
	assert_eq!(config.ui.initial_pattern.as_deref(), Some("rs"));
}

#[test]
fn resolve_fills_defaults_and_canonicalizes_root() {
	let dir = tempdir().expect("tempdir");
	let cli = CliArgs::parse_from(["sprig"]);
	let mut config = RawConfig::default();
	config.tree.root = Some(dir.path().to_path_buf());

	let resolved = config.resolve(&cli).expect("resolve");
	assert_eq!(resolved.root, dir.path().canonicalize().expect("canonical"));
	assert_eq!(resolved.tree, sprig::TreeOptions::default());
	assert!(resolved.fit_to_terminal);
	assert_eq!(resolved.initial_query, "");
}

#[test]
fn resolve_rejects_invalid_capacity() {
	let dir = tempdir().expect("tempdir");
	let cli = CliArgs::parse_from(["sprig", "--capacity", "1"]);
	let mut config = RawConfig::default();
	config.apply_cli_overrides(&cli);
	config.tree.root = Some(dir.path().to_path_buf());

	let err = config.resolve(&cli).expect_err("invalid");
	let message = err.to_string();
	assert!(message.contains("tree.capacity"), "{message}");
	assert!(message.contains("--capacity"), "{message}");
}

#[test]
fn resolve_rejects_file_root() {
	let dir = tempdir().expect("tempdir");
	let file = dir.path().join("file.txt");
	std::fs::write(&file, "x").expect("write");
	let cli = CliArgs::parse_from(["sprig"]);
	let mut config = RawConfig::default();
	config.tree.root = Some(file);

	assert!(config.resolve(&cli).is_err());
}
