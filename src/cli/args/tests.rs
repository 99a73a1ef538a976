use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use super::{CliArgs, OutputFormat};

#[test]
fn command_supports_custom_styles() {
	let command = CliArgs::command();
	assert!(command.get_about().is_some());
	command.debug_assert();
}

#[test]
fn parse_cli_accepts_default_arguments() {
	let parsed = CliArgs::parse_from(["sprig"]);
	assert_eq!(parsed.output, OutputFormat::Plain);
	assert_eq!(parsed.root, None);
	assert!(!parsed.print);
}

#[test]
fn bare_boolean_flags_mean_true() {
	let parsed = CliArgs::parse_from(["sprig", "-H", "--only-folders", "--git-ignore", "false", "src"]);
	assert_eq!(parsed.hidden, Some(true));
	assert_eq!(parsed.only_folders, Some(true));
	assert_eq!(parsed.git_ignore, Some(false));
	assert_eq!(parsed.root, Some(PathBuf::from("src")));
}

#[test]
fn lists_and_queries_parse() {
	let parsed = CliArgs::parse_from([
		"sprig",
		"-q",
		"!=test & rs",
		"--extensions",
		"rs,toml",
		"-o",
		"json",
		"--print",
	]);
	assert_eq!(parsed.query.as_deref(), Some("!=test & rs"));
	assert_eq!(parsed.extensions, Some(vec!["rs".to_string(), "toml".to_string()]));
	assert_eq!(parsed.output, OutputFormat::Json);
	assert!(parsed.print);
}
