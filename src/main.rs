mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{CliArgs, parse_cli, print_outcome, print_tree};
use settings::ResolvedConfig;
use sprig::logging::{self, LogDestination};
use workflow::Mode;

fn main() -> Result<()> {
	let cli = parse_cli();
	let mode = Mode::detect(cli.print);

	let destination = match mode {
		Mode::Interactive => LogDestination::CacheFile,
		Mode::Print => LogDestination::Stderr,
	};
	if let Some(path) = logging::initialize(cli.log_level.as_deref(), destination) {
		log::info!("logging to {}", path.display());
	}

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	run(&cli, mode, resolved)
}

/// Execute the chosen mode and print output in the chosen format.
fn run(cli: &CliArgs, mode: Mode, settings: ResolvedConfig) -> Result<()> {
	match mode {
		Mode::Print => {
			let tree = workflow::print_once(settings)?;
			print_tree(&tree, cli.output)
		}
		Mode::Interactive => {
			let outcome = workflow::run_interactive(settings)?;
			print_outcome(&outcome, cli.output)
		}
	}
}
