use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use throbber_widgets_tui::{Throbber, ThrobberState};

use super::status::{NoStatus, StatusProvider};
use crate::tree::{BuildStats, DisplayLine, LineKind};
use crate::view::TreeView;

const OPEN_COLUMN: &str = "│   ";
const CLOSED_COLUMN: &str = "    ";
const TEE: &str = "├── ";
const ELBOW: &str = "└── ";

/// Connector columns drawn left of a line.
#[must_use]
pub fn branch_prefix(line: &DisplayLine) -> String {
	let mut prefix = String::new();
	if let Some((own, ancestors)) = line.left_branches.split_last() {
		for &open in ancestors {
			prefix.push_str(if open { OPEN_COLUMN } else { CLOSED_COLUMN });
		}
		prefix.push_str(if *own { TEE } else { ELBOW });
	}
	prefix
}

/// Text of a line without its connectors.
#[must_use]
pub fn line_label(line: &DisplayLine) -> String {
	match &line.kind {
		LineKind::File => line.name.clone(),
		LineKind::Directory => format!("{}/", line.name),
		LineKind::SymbolicLink {
			target,
			resolved_is_directory,
		} => {
			let slash = if *resolved_is_directory { "/" } else { "" };
			format!("{} -> {}{slash}", line.name, target.display())
		}
		LineKind::BrokenSymbolicLink { target } => {
			format!("{} -> {} (broken)", line.name, target.display())
		}
		LineKind::PruneMarker => format!("… {} unlisted", line.unlisted),
	}
}

/// One-line summary of a build's counters.
#[must_use]
pub fn stats_summary(stats: &BuildStats, lines: usize) -> String {
	let mut summary = format!(
		"{lines} lines · {} hidden · {} ignored · {} filtered · {} errors",
		stats.hidden, stats.ignored, stats.filtered, stats.errors
	);
	if stats.truncated {
		summary.push_str(" · truncated");
	}
	summary
}

/// Renders the visible slice of a tree, one line per row.
pub struct TreeWidget<'a> {
	lines: &'a [DisplayLine],
	range: Range<usize>,
	selected: Option<usize>,
	status: &'a dyn StatusProvider,
}

impl<'a> TreeWidget<'a> {
	#[must_use]
	pub fn new(lines: &'a [DisplayLine], range: Range<usize>) -> Self {
		Self {
			lines,
			range,
			selected: None,
			status: &NoStatus,
		}
	}

	/// Widget over the viewport and selection of `view`.
	#[must_use]
	pub fn from_view(view: &'a TreeView) -> Self {
		Self::new(view.lines(), view.viewport()).selected(view.selected())
	}

	#[must_use]
	pub fn selected(mut self, selected: Option<usize>) -> Self {
		self.selected = selected;
		self
	}

	#[must_use]
	pub fn status(mut self, status: &'a dyn StatusProvider) -> Self {
		self.status = status;
		self
	}
}

impl Widget for TreeWidget<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		if area.is_empty() {
			return;
		}
		let end = self.range.end.min(self.lines.len());
		let start = self.range.start.min(end);
		for (row, index) in (start..end).enumerate().take(usize::from(area.height)) {
			let y = area.y + row as u16;
			let line = &self.lines[index];

			let mut spans = vec![Span::styled(branch_prefix(line), connector_style())];
			spans.extend(entry_spans(line));
			if !line.is_marker()
				&& let Some(tag) = self.status.status(&line.path)
			{
				spans.push(Span::raw(" "));
				spans.push(Span::styled(tag, Style::default().fg(Color::Yellow)));
			}
			buf.set_line(area.x, y, &Line::from(spans), area.width);

			if self.selected == Some(index) {
				buf.set_style(
					Rect::new(area.x, y, area.width, 1),
					Style::default().add_modifier(Modifier::REVERSED),
				);
			}
		}
	}
}

fn connector_style() -> Style {
	Style::default().fg(Color::DarkGray)
}

fn entry_spans(line: &DisplayLine) -> Vec<Span<'static>> {
	let mut spans = Vec::with_capacity(2);
	if line.has_error {
		spans.push(Span::styled(
			"! ",
			Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
		));
	}
	let mut style = match &line.kind {
		LineKind::File => Style::default(),
		LineKind::Directory => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
		LineKind::SymbolicLink { .. } => Style::default().fg(Color::Cyan),
		LineKind::BrokenSymbolicLink { .. } => Style::default().fg(Color::Red),
		LineKind::PruneMarker => Style::default()
			.fg(Color::DarkGray)
			.add_modifier(Modifier::ITALIC),
	};
	if line.direct_match {
		style = style.fg(Color::Green);
	}
	spans.push(Span::styled(line_label(line), style));
	spans
}

/// Bottom row: build counters on the left, a diagnostic or spinner on the right.
pub struct StatusLine<'a> {
	stats: &'a BuildStats,
	lines: usize,
	diagnostic: Option<&'a str>,
	building: bool,
	throbber: &'a ThrobberState,
}

impl<'a> StatusLine<'a> {
	#[must_use]
	pub fn new(stats: &'a BuildStats, lines: usize, throbber: &'a ThrobberState) -> Self {
		Self {
			stats,
			lines,
			diagnostic: None,
			building: false,
			throbber,
		}
	}

	#[must_use]
	pub fn diagnostic(mut self, diagnostic: Option<&'a str>) -> Self {
		self.diagnostic = diagnostic;
		self
	}

	#[must_use]
	pub fn building(mut self, building: bool) -> Self {
		self.building = building;
		self
	}
}

impl Widget for StatusLine<'_> {
	fn render(self, area: Rect, buf: &mut Buffer) {
		if area.is_empty() {
			return;
		}
		let muted = Style::default().fg(Color::DarkGray);
		let summary = stats_summary(self.stats, self.lines);
		buf.set_line(
			area.x,
			area.y,
			&Line::from(Span::styled(summary, muted)),
			area.width,
		);

		let mut right = Line::default();
		if self.building {
			let spinner = Throbber::default().style(muted).throbber_style(muted);
			right.spans.push(spinner.to_symbol_span(self.throbber));
		}
		if let Some(diagnostic) = self.diagnostic {
			right
				.spans
				.push(Span::styled(diagnostic.to_string(), Style::default().fg(Color::Red)));
		}
		let width = right.width() as u16;
		if width == 0 {
			return;
		}
		// The spinner and diagnostic overwrite the summary when space is short.
		let start = area.right().saturating_sub(width).max(area.x);
		buf.set_line(start, area.y, &right, area.right().saturating_sub(start));
	}
}
