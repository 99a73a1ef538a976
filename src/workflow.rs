use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use ratatui::crossterm::terminal;
use sprig::tui::{self, App, Outcome};
use sprig::{BuildRuntime, CancellationToken, FsSource, Tree, build_tree, compile};

use crate::settings::ResolvedConfig;

/// Rows the interactive view keeps for the query and status lines.
const CHROME_ROWS: u16 = 2;

/// Whether the run draws the interactive view or prints one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
	Print,
	Interactive,
}

impl Mode {
	/// Interactive only when asked for nothing else and stdout is a terminal.
	pub(crate) fn detect(print: bool) -> Self {
		if print || !io::stdout().is_terminal() {
			Self::Print
		} else {
			Self::Interactive
		}
	}
}

/// Build a single tree for the initial pattern.
pub(crate) fn print_once(config: ResolvedConfig) -> Result<Tree> {
	let ResolvedConfig {
		root,
		tree,
		matching,
		initial_query,
		..
	} = config;

	let pattern = compile(&initial_query, &matching)
		.with_context(|| format!("invalid pattern '{initial_query}'"))?;
	log::debug!("printing tree of {} for {initial_query:?}", root.display());
	let built = build_tree(
		&FsSource,
		&root,
		&tree,
		pattern.as_ref(),
		&CancellationToken::new(),
	)
	.with_context(|| format!("failed to build tree of {}", root.display()))?;
	Ok(built)
}

/// Run the interactive view until the user accepts or cancels.
pub(crate) fn run_interactive(config: ResolvedConfig) -> Result<Outcome> {
	let ResolvedConfig {
		root,
		mut tree,
		matching,
		fit_to_terminal,
		initial_query,
		initial_wait,
	} = config;

	if fit_to_terminal {
		let (_, rows) = terminal::size().context("failed to query terminal size")?;
		let rows = usize::from(rows.saturating_sub(CHROME_ROWS)).max(2);
		log::debug!("fitting tree to {rows} terminal rows");
		tree.target_line_count = rows;
	}

	let runtime = BuildRuntime::spawn(Arc::new(FsSource), root, tree, matching);
	let mut app = App::new(runtime, initial_query).with_initial_results_timeout(initial_wait);
	tui::run(&mut app)
}
