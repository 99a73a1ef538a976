//! Bounded, score-ranked tree builds.
//!
//! [`build_tree`] walks a [`TreeSource`](crate::source::TreeSource) breadth
//! first into a build arena, prunes and trims it to the line capacity, and
//! flattens the survivors into an immutable sequence of [`DisplayLine`]s.

mod arena;
mod builder;
mod error;
mod materialize;
mod options;
mod trim;

use std::path::{Path, PathBuf};

pub use builder::{TreeBuilder, build_tree};
pub use error::BuildError;
pub use options::{
	DEFAULT_PATTERN_MULTIPLIER, DEFAULT_TARGET_LINE_COUNT, ScoreWeights, TreeOptions,
	default_global_ignores, normalize_extension,
};
pub use trim::TopScores;

/// Position of a line in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
	File,
	Directory,
	SymbolicLink {
		target: PathBuf,
		resolved_is_directory: bool,
	},
	BrokenSymbolicLink {
		target: PathBuf,
	},
	/// Stands in for `unlisted` entries of its parent directory.
	PruneMarker,
}

/// One row of a materialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
	pub id: LineId,
	/// Only for lookups; lines are never traversed through it.
	pub parent: Option<LineId>,
	pub depth: usize,
	pub path: PathBuf,
	pub name: String,
	pub kind: LineKind,
	pub score: i64,
	pub direct_match: bool,
	pub has_error: bool,
	pub surviving_children: usize,
	/// Entries of this directory (or, for a marker, of its parent) that are
	/// not shown.
	pub unlisted: usize,
	/// `left_branches[i]` is true when the ancestor column at depth `i + 1`
	/// still has siblings below this line.
	pub left_branches: Vec<bool>,
	/// Whether the children of a directory were enumerated.
	pub explored: bool,
}

impl DisplayLine {
	#[must_use]
	pub fn is_marker(&self) -> bool {
		matches!(self.kind, LineKind::PruneMarker)
	}

	#[must_use]
	pub fn is_selectable(&self) -> bool {
		!self.is_marker()
	}

	#[must_use]
	pub fn is_directory(&self) -> bool {
		matches!(
			self.kind,
			LineKind::Directory
				| LineKind::SymbolicLink {
					resolved_is_directory: true,
					..
				}
		)
	}
}

/// Entries excluded or failing during a build; every entry lands in at most
/// one of `hidden`, `ignored` and `filtered`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
	pub hidden: usize,
	pub ignored: usize,
	pub filtered: usize,
	pub errors: usize,
	/// Entries returned by the source.
	pub seen: usize,
	/// Nodes dropped to honour the line capacity.
	pub trimmed: usize,
	/// Traversal stopped before every reachable directory was listed.
	pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
	Idle,
	/// Listing the directories at this depth.
	Traversing(usize),
	Completed,
	Cancelled,
}

/// Result of one completed build. Replaced wholesale on rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
	pub lines: Vec<DisplayLine>,
	pub stats: BuildStats,
	/// Query the tree was built for, if any.
	pub pattern: Option<String>,
	pub generation: u64,
}

impl Tree {
	#[must_use]
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	#[must_use]
	pub fn line(&self, id: LineId) -> Option<&DisplayLine> {
		self.lines.get(id.0)
	}

	#[must_use]
	pub fn root(&self) -> Option<&DisplayLine> {
		self.lines.first()
	}

	#[must_use]
	pub fn position_of(&self, path: &Path) -> Option<usize> {
		self.lines
			.iter()
			.position(|line| line.is_selectable() && line.path == path)
	}

	/// Ancestors of `id`, nearest first.
	pub fn ancestors(&self, id: LineId) -> impl Iterator<Item = &DisplayLine> + '_ {
		let start = self.line(id).and_then(|line| line.parent);
		std::iter::successors(start.and_then(|parent| self.line(parent)), |line| {
			line.parent.and_then(|parent| self.line(parent))
		})
	}

	/// Number of prune markers in the tree.
	#[must_use]
	pub fn marker_count(&self) -> usize {
		self.lines.iter().filter(|line| line.is_marker()).count()
	}
}
