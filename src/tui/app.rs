use std::path::PathBuf;
use std::time::Duration;

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use throbber_widgets_tui::ThrobberState;

use super::input::QueryInput;
use super::status::{NoStatus, StatusProvider};
use super::widget::{StatusLine, TreeWidget};
use crate::build::BuildRuntime;
use crate::tree::BuildError;
use crate::view::TreeView;

/// How the interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
	pub accepted: bool,
	pub query: String,
	pub selection: Option<PathBuf>,
}

/// Interactive state: the query being edited, the displayed tree and the
/// build runtime feeding it.
pub struct App {
	runtime: BuildRuntime,
	view: TreeView,
	input: QueryInput,
	diagnostic: Option<String>,
	pub(super) throbber_state: ThrobberState,
	status: Box<dyn StatusProvider>,
	initial_results_timeout: Option<Duration>,
}

impl App {
	pub fn new(runtime: BuildRuntime, initial_query: impl Into<String>) -> Self {
		Self {
			runtime,
			view: TreeView::default(),
			input: QueryInput::new(initial_query),
			diagnostic: None,
			throbber_state: ThrobberState::default(),
			status: Box::new(NoStatus),
			initial_results_timeout: Some(Duration::from_millis(250)),
		}
	}

	#[must_use]
	pub fn with_status(mut self, status: Box<dyn StatusProvider>) -> Self {
		self.status = status;
		self
	}

	/// How long startup blocks for the first tree before drawing. `None`
	/// draws immediately.
	#[must_use]
	pub fn with_initial_results_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.initial_results_timeout = timeout;
		self
	}

	#[must_use]
	pub fn view(&self) -> &TreeView {
		&self.view
	}

	#[must_use]
	pub fn query(&self) -> &str {
		self.input.text()
	}

	/// Message of the last rejected query, cleared by the next accepted one.
	#[must_use]
	pub fn diagnostic(&self) -> Option<&str> {
		self.diagnostic.as_deref()
	}

	/// Issue a build for the current query.
	pub fn request_build(&mut self) {
		let outcome = self.runtime.issue(self.input.text());
		self.record(outcome);
	}

	fn refresh(&mut self) {
		let outcome = self.runtime.refresh();
		self.record(outcome);
	}

	fn record(&mut self, outcome: Result<u64, BuildError>) {
		match outcome {
			Ok(_) => self.diagnostic = None,
			Err(err) => {
				log::debug!("query {:?} rejected: {err}", self.input.text());
				self.diagnostic = Some(err.to_string());
			}
		}
	}

	/// Swap in a finished tree, if the latest build has reported. Returns
	/// whether the view changed.
	pub fn pump_builds(&mut self) -> bool {
		match self.runtime.poll() {
			Some(tree) => {
				self.view.rebuild(tree);
				true
			}
			None => false,
		}
	}

	/// Block until the build in flight reports or `timeout` elapses.
	pub fn wait_for_build(&mut self, timeout: Duration) -> bool {
		if !self.runtime.is_in_flight() {
			return false;
		}
		match self.runtime.wait(timeout) {
			Some(Ok(tree)) => {
				self.view.rebuild(tree);
				true
			}
			Some(Err(err)) => {
				if !err.is_cancelled() {
					log::warn!("build failed: {err}");
				}
				false
			}
			None => false,
		}
	}

	pub(super) fn hydrate(&mut self) {
		self.request_build();
		if let Some(timeout) = self.initial_results_timeout {
			self.wait_for_build(timeout);
		}
	}

	pub(super) fn tick(&mut self) {
		if self.runtime.is_in_flight() {
			self.throbber_state.calc_next();
		}
	}

	/// React to a key press. Returns the outcome once the session ends.
	pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Esc => return Some(self.outcome(false)),
			KeyCode::Char('c') if ctrl => return Some(self.outcome(false)),
			KeyCode::Enter => return Some(self.outcome(true)),
			KeyCode::Up => {
				self.view.move_selection(-1);
			}
			KeyCode::Down => {
				self.view.move_selection(1);
			}
			KeyCode::PageUp => {
				self.view.page(-1);
			}
			KeyCode::PageDown => {
				self.view.page(1);
			}
			KeyCode::Home => {
				self.view.select_first();
			}
			KeyCode::End => {
				self.view.select_last();
			}
			KeyCode::Char('r') if ctrl => self.refresh(),
			_ => {
				if self.input.input(key) {
					self.request_build();
				}
			}
		}
		None
	}

	fn outcome(&mut self, accepted: bool) -> Outcome {
		self.runtime.cancel();
		let selection = if accepted {
			self.view.selected_line().map(|line| line.path.clone())
		} else {
			None
		};
		Outcome {
			accepted,
			query: self.input.text().to_string(),
			selection,
		}
	}

	pub fn draw(&mut self, frame: &mut Frame) {
		let [input_area, tree_area, status_area] = Layout::vertical([
			Constraint::Length(1),
			Constraint::Min(1),
			Constraint::Length(1),
		])
		.areas(frame.area());

		self.view.set_viewport_height(usize::from(tree_area.height));
		self.input.render(frame, input_area);
		frame.render_widget(
			TreeWidget::from_view(&self.view).status(self.status.as_ref()),
			tree_area,
		);

		let tree = self.view.tree();
		frame.render_widget(
			StatusLine::new(&tree.stats, tree.len(), &self.throbber_state)
				.diagnostic(self.diagnostic.as_deref())
				.building(self.runtime.is_in_flight()),
			status_area,
		);
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;
	use std::sync::Arc;

	use ratatui::Terminal;
	use ratatui::backend::TestBackend;

	use super::*;
	use crate::pattern::MatchOptions;
	use crate::source::MemorySource;
	use crate::tree::TreeOptions;

	const WAIT: Duration = Duration::from_secs(5);

	fn app(query: &str) -> App {
		let source = Arc::new(MemorySource::with_paths("root", ["a/x.txt", "a/y.txt", "b.txt"]));
		let root = source.root().to_path_buf();
		let runtime =
			BuildRuntime::spawn(source, root, TreeOptions::default(), MatchOptions::default());
		let mut app = App::new(runtime, query).with_initial_results_timeout(Some(WAIT));
		app.hydrate();
		app
	}

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn screen(app: &mut App, width: u16, height: u16) -> Vec<String> {
		let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
		terminal.draw(|frame| app.draw(frame)).expect("draw");
		let buffer = terminal.backend().buffer();
		(0..height)
			.map(|y| {
				(0..width)
					.map(|x| buffer[(x, y)].symbol())
					.collect::<String>()
					.trim_end()
					.to_string()
			})
			.collect()
	}

	#[test]
	fn initial_render_shows_matching_tree() {
		let mut app = app("x.");
		let rows = screen(&mut app, 64, 7);
		assert_eq!(
			rows[..6],
			[
				"> x.",
				"root/",
				"├── a/",
				"│   ├── x.txt",
				"│   └── … 1 unlisted",
				"└── … 1 unlisted",
			]
		);
		assert!(rows[6].starts_with("5 lines"));
		assert_eq!(
			app.view().selected_line().map(|line| line.name.as_str()),
			Some("x.txt")
		);
	}

	#[test]
	fn enter_returns_selected_path() {
		let mut app = app("x.");
		let outcome = app.handle_key(key(KeyCode::Enter)).expect("outcome");
		assert!(outcome.accepted);
		assert_eq!(outcome.query, "x.");
		assert_eq!(outcome.selection.as_deref(), Some(Path::new("root/a/x.txt")));
	}

	#[test]
	fn escape_cancels_without_selection() {
		let mut app = app("");
		let outcome = app.handle_key(key(KeyCode::Esc)).expect("outcome");
		assert!(!outcome.accepted);
		assert_eq!(outcome.selection, None);
	}

	#[test]
	fn rejected_query_keeps_tree_and_reports() {
		let mut app = app("x.");
		let before = app.view().tree().clone();
		assert!(app.handle_key(key(KeyCode::Char('('))).is_none());
		assert!(app.diagnostic().is_some());
		assert!(!app.wait_for_build(Duration::from_millis(50)));
		assert_eq!(app.view().tree(), &before);

		app.handle_key(key(KeyCode::Backspace));
		assert_eq!(app.diagnostic(), None);
		assert!(app.wait_for_build(WAIT));
	}

	#[test]
	fn typing_rebuilds_and_navigation_skips_markers() {
		let mut app = app("");
		for ch in "x.".chars() {
			app.handle_key(key(KeyCode::Char(ch)));
		}
		assert!(app.wait_for_build(WAIT));
		assert_eq!(app.view().tree().pattern.as_deref(), Some("x."));

		app.handle_key(key(KeyCode::End));
		assert_eq!(
			app.view().selected_line().map(|line| line.name.as_str()),
			Some("x.txt")
		);
		app.handle_key(key(KeyCode::Home));
		assert_eq!(app.view().selected(), Some(0));
	}
}
