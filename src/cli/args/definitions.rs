use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, ColorChoice, Parser};

use super::options::OutputFormat;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `sprig` binary.
#[derive(Parser, Debug)]
#[command(
	name = "sprig",
	version,
	long_version = long_version(),
	about = "Score-ranked directory tree that fits your screen",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		value_name = "ROOT",
		help = "Directory to show (default: current directory)"
	)]
	pub(crate) root: Option<PathBuf>,
	#[arg(
		short = 'q',
		long = "query",
		value_name = "PATTERN",
		allow_hyphen_values = true,
		help = "Initial pattern (default: empty)"
	)]
	pub(crate) query: Option<String>,
	#[arg(
		long,
		help = "Print the tree once instead of starting the interactive view (default: when stdout is not a terminal)"
	)]
	pub(crate) print: bool,
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "SPRIG_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'H',
		long = "hidden",
		value_name = "BOOL",
		num_args = 0..=1,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new(),
		help = "Show dot-prefixed entries (default: disabled)"
	)]
	pub(crate) hidden: Option<bool>,
	#[arg(
		short = 'L',
		long = "follow-symlinks",
		value_name = "BOOL",
		num_args = 0..=1,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new(),
		help = "Descend into symlinked directories (default: disabled)"
	)]
	pub(crate) follow_symlinks: Option<bool>,
	#[arg(
		short = 'D',
		long = "only-folders",
		value_name = "BOOL",
		num_args = 0..=1,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new(),
		help = "Show directories only (default: disabled)"
	)]
	pub(crate) only_folders: Option<bool>,
	#[arg(
		long = "respect-ignore-files",
		value_name = "BOOL",
		value_parser = BoolishValueParser::new(),
		help = "Respect .ignore files (default: enabled)"
	)]
	pub(crate) respect_ignore_files: Option<bool>,
	#[arg(
		long = "git-ignore",
		value_name = "BOOL",
		value_parser = BoolishValueParser::new(),
		help = "Respect .gitignore files (default: enabled)"
	)]
	pub(crate) git_ignore: Option<bool>,
	#[arg(
		long = "git-global",
		value_name = "BOOL",
		value_parser = BoolishValueParser::new(),
		help = "Respect global gitignore settings (default: enabled)"
	)]
	pub(crate) git_global: Option<bool>,
	#[arg(
		long = "git-exclude",
		value_name = "BOOL",
		value_parser = BoolishValueParser::new(),
		help = "Respect git exclude files (default: enabled)"
	)]
	pub(crate) git_exclude: Option<bool>,
	#[arg(
		short = 'd',
		long = "max-depth",
		value_name = "NUM",
		help = "Deepest level to list; the root is depth 0 (default: unlimited)"
	)]
	pub(crate) max_depth: Option<usize>,
	#[arg(
		long = "extensions",
		value_delimiter = ',',
		value_name = "EXT",
		help = "Comma-separated file extensions to keep (default: all)"
	)]
	pub(crate) extensions: Option<Vec<String>>,
	#[arg(
		long = "global-ignores",
		value_delimiter = ',',
		value_name = "NAME",
		help = "Comma-separated entry names to always ignore (default: .git,node_modules,target,...)"
	)]
	pub(crate) global_ignores: Option<Vec<String>>,
	#[arg(
		short = 'l',
		long = "lines",
		value_name = "NUM",
		help = "Target number of lines (default: terminal height, or 50 when printing)"
	)]
	pub(crate) lines: Option<usize>,
	#[arg(
		long = "capacity",
		value_name = "NUM",
		help = "Hard cap on emitted lines, markers included (default: target lines)"
	)]
	pub(crate) capacity: Option<usize>,
	#[arg(
		long = "pattern-multiplier",
		value_name = "NUM",
		help = "Candidates gathered per target line while a pattern is active (default: 10)"
	)]
	pub(crate) pattern_multiplier: Option<usize>,
	#[arg(
		long = "case-sensitive",
		value_name = "BOOL",
		num_args = 0..=1,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new(),
		help = "Match exact patterns case-sensitively (default: disabled)"
	)]
	pub(crate) case_sensitive: Option<bool>,
	#[arg(
		long = "content-max-bytes",
		value_name = "BYTES",
		help = "Bytes a content pattern reads per file (default: 10485760)"
	)]
	pub(crate) content_max_bytes: Option<u64>,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		long = "log-level",
		value_name = "FILTER",
		help = "Log filter such as warn, debug or sprig=trace (default: $SPRIG_LOG or warn)"
	)]
	pub(crate) log_level: Option<String>,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Choose how to print the result"
	)]
	pub(crate) output: OutputFormat,
}
