//! Core crate exports for building and browsing score-ranked directory trees.
//!
//! A query is compiled once into a [`Pattern`], the [`tree`] builder walks a
//! [`TreeSource`] breadth first under a [`CancellationToken`], and the result
//! is flattened into display lines that a [`TreeView`] navigates. The
//! [`build`] module runs builds off the interactive thread and discards stale
//! generations.

pub mod app_dirs;
pub mod build;
pub mod cancel;
pub mod logging;
pub mod pattern;
pub mod source;
pub mod tree;
pub mod tui;
pub mod view;

pub use build::{BuildRuntime, BuildResult};
pub use cancel::CancellationToken;
pub use pattern::{MatchOptions, MatchWeights, Pattern, PatternError, compile};
pub use source::{FsSource, IgnoreOptions, MemorySource, TreeSource};
pub use tree::{
	BuildError, BuildStats, DisplayLine, LineId, LineKind, ScoreWeights, Tree, TreeOptions,
	build_tree,
};
pub use tui::{NoStatus, StatusProvider, TreeWidget};
pub use view::TreeView;
