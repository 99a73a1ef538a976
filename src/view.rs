//! Selection and scrolling over the current tree.

use std::ops::Range;
use std::path::Path;

use crate::tree::{DisplayLine, Tree};

/// Owns the displayed [`Tree`], the selected line and the scroll offset.
///
/// The tree is only ever swapped whole through [`TreeView::rebuild`]; the
/// renderer reads it through [`TreeView::viewport`] and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
	tree: Tree,
	selected: Option<usize>,
	scroll_offset: usize,
	viewport_height: usize,
}

impl TreeView {
	#[must_use]
	pub fn new(viewport_height: usize) -> Self {
		Self {
			viewport_height,
			..Self::default()
		}
	}

	#[must_use]
	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	#[must_use]
	pub fn lines(&self) -> &[DisplayLine] {
		&self.tree.lines
	}

	#[must_use]
	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	#[must_use]
	pub fn selected_line(&self) -> Option<&DisplayLine> {
		self.selected.and_then(|index| self.tree.lines.get(index))
	}

	#[must_use]
	pub fn scroll_offset(&self) -> usize {
		self.scroll_offset
	}

	#[must_use]
	pub fn viewport_height(&self) -> usize {
		self.viewport_height
	}

	pub fn set_viewport_height(&mut self, height: usize) {
		self.viewport_height = height;
		self.ensure_visible();
	}

	/// Swap in a freshly built tree. Keeps the selected path when it survived,
	/// otherwise selects the best-scoring line. Returns whether the previous
	/// selection was preserved.
	pub fn rebuild(&mut self, tree: Tree) -> bool {
		let previous = self.selected_line().map(|line| line.path.clone());
		self.tree = tree;

		let preserved = previous
			.as_deref()
			.and_then(|path| self.tree.position_of(path));
		self.selected = preserved.or_else(|| self.best_line());
		self.ensure_visible();
		preserved.is_some()
	}

	/// Move by `delta` lines, stepping over prune markers and stopping at the
	/// ends. Returns whether the selection changed.
	pub fn move_selection(&mut self, delta: isize) -> bool {
		let Some(current) = self.selected else {
			return false;
		};
		let last = self.tree.lines.len().saturating_sub(1);
		let target = current.saturating_add_signed(delta).min(last);
		let Some(target) = self.nearest_selectable(target, delta >= 0) else {
			return false;
		};
		self.selected = Some(target);
		self.ensure_visible();
		target != current
	}

	/// Move by whole viewports.
	pub fn page(&mut self, pages: isize) -> bool {
		let step = isize::try_from(self.viewport_height.max(1)).unwrap_or(isize::MAX);
		self.move_selection(pages.saturating_mul(step))
	}

	pub fn select_first(&mut self) -> bool {
		self.select_index(0, true)
	}

	pub fn select_last(&mut self) -> bool {
		let last = self.tree.lines.len().saturating_sub(1);
		self.select_index(last, false)
	}

	/// Select the line for `path`. Returns whether one was found.
	pub fn select_by_path(&mut self, path: &Path) -> bool {
		match self.tree.position_of(path) {
			Some(index) => {
				self.selected = Some(index);
				self.ensure_visible();
				true
			}
			None => false,
		}
	}

	/// Half-open range of line indices inside the viewport.
	#[must_use]
	pub fn viewport(&self) -> Range<usize> {
		let len = self.tree.lines.len();
		let start = self.scroll_offset.min(len);
		let end = self.scroll_offset.saturating_add(self.viewport_height).min(len);
		start..end
	}

	fn select_index(&mut self, index: usize, forward: bool) -> bool {
		let Some(target) = self.nearest_selectable(index, forward) else {
			return false;
		};
		let changed = self.selected != Some(target);
		self.selected = Some(target);
		self.ensure_visible();
		changed
	}

	/// First selectable line at or after `index` in the direction of travel,
	/// falling back to the other direction.
	fn nearest_selectable(&self, index: usize, forward: bool) -> Option<usize> {
		let lines = &self.tree.lines;
		if lines.is_empty() {
			return None;
		}
		let index = index.min(lines.len() - 1);
		if forward {
			first_selectable(lines, index..lines.len())
				.or_else(|| first_selectable(lines, (0..index).rev()))
		} else {
			first_selectable(lines, (0..=index).rev())
				.or_else(|| first_selectable(lines, index + 1..lines.len()))
		}
	}

	fn best_line(&self) -> Option<usize> {
		self.tree
			.lines
			.iter()
			.enumerate()
			.filter(|(_, line)| line.is_selectable())
			.max_by(|(a_index, a), (b_index, b)| a.score.cmp(&b.score).then(b_index.cmp(a_index)))
			.map(|(index, _)| index)
	}

	/// Scroll just enough to show the selection.
	fn ensure_visible(&mut self) {
		let len = self.tree.lines.len();
		let height = self.viewport_height;
		if height == 0 {
			return;
		}
		self.scroll_offset = self.scroll_offset.min(len.saturating_sub(height));
		let Some(selected) = self.selected else {
			return;
		};
		if selected < self.scroll_offset {
			self.scroll_offset = selected;
		} else if selected >= self.scroll_offset + height {
			self.scroll_offset = selected + 1 - height;
		}
	}
}

fn first_selectable(lines: &[DisplayLine], mut indices: impl Iterator<Item = usize>) -> Option<usize> {
	indices.find(|&index| lines[index].is_selectable())
}
