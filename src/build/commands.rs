use std::path::PathBuf;

use crate::cancel::CancellationToken;
use crate::pattern::Pattern;
use crate::tree::{BuildError, Tree, TreeOptions};

/// Everything the worker needs to run one build.
#[derive(Debug)]
pub struct BuildRequest {
	/// Identifier that lets the interactive side discard superseded results.
	pub generation: u64,
	pub root: PathBuf,
	pub options: TreeOptions,
	/// Query text the pattern was compiled from.
	pub query: String,
	/// Compiled once on the interactive side; `None` when the query is blank.
	pub pattern: Option<Pattern>,
	pub token: CancellationToken,
}

/// Commands understood by the background build worker.
#[derive(Debug)]
pub enum BuildCommand {
	Build(BuildRequest),
	/// Stop the background worker thread.
	Shutdown,
}

/// Outcome of one request, tagged with its generation.
#[derive(Debug)]
pub struct BuildResult {
	pub generation: u64,
	pub outcome: Result<Tree, BuildError>,
}
