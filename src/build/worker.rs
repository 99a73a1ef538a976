use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::commands::{BuildCommand, BuildRequest, BuildResult};
use crate::source::TreeSource;
use crate::tree::{BuildError, Tree, build_tree};

/// Launches the background build worker thread and returns its channels plus
/// the shared latest generation.
pub fn spawn(
	source: Arc<dyn TreeSource + Send + Sync>,
) -> (Sender<BuildCommand>, Receiver<BuildResult>, Arc<AtomicU64>) {
	let (command_tx, command_rx) = mpsc::channel();
	let (result_tx, result_rx) = mpsc::channel();
	let latest_generation = Arc::new(AtomicU64::new(0));
	let thread_latest = Arc::clone(&latest_generation);

	thread::spawn(move || worker_loop(source.as_ref(), command_rx, result_tx, &thread_latest));

	(command_tx, result_rx, latest_generation)
}

fn worker_loop(
	source: &(dyn TreeSource + Send + Sync),
	command_rx: Receiver<BuildCommand>,
	result_tx: Sender<BuildResult>,
	latest_generation: &AtomicU64,
) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(source, &result_tx, latest_generation, command) {
			break;
		}
	}
	log::debug!("build worker stopped");
}

fn handle_command(
	source: &(dyn TreeSource + Send + Sync),
	result_tx: &Sender<BuildResult>,
	latest_generation: &AtomicU64,
	command: BuildCommand,
) -> bool {
	match command {
		BuildCommand::Build(request) => {
			let generation = request.generation;
			let outcome = if generation < latest_generation.load(AtomicOrdering::Acquire) {
				log::debug!("skipping superseded build {generation}");
				Err(BuildError::Cancelled)
			} else {
				run(source, request)
			};
			result_tx.send(BuildResult { generation, outcome }).is_ok()
		}
		BuildCommand::Shutdown => false,
	}
}

fn run(source: &(dyn TreeSource + Send + Sync), request: BuildRequest) -> Result<Tree, BuildError> {
	let BuildRequest {
		generation,
		root,
		options,
		query,
		pattern,
		token,
	} = request;
	let mut tree = build_tree(source, &root, &options, pattern.as_ref(), &token)?;
	tree.generation = generation;
	tree.pattern = pattern.is_some().then_some(query);
	Ok(tree)
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;
	use crate::cancel::CancellationToken;
	use crate::pattern::{MatchOptions, compile};
	use crate::source::MemorySource;
	use crate::tree::TreeOptions;

	fn request(source: &MemorySource, generation: u64, query: &str) -> BuildRequest {
		BuildRequest {
			generation,
			root: source.root().to_path_buf(),
			options: TreeOptions::default(),
			query: query.to_string(),
			pattern: compile(query, &MatchOptions::default()).expect("compile"),
			token: CancellationToken::new(),
		}
	}

	#[test]
	fn builds_and_tags_results() {
		let source = Arc::new(MemorySource::with_paths("root", ["a/x.txt", "b.txt"]));
		let req = request(&source, 1, "x");
		let (tx, rx, latest) = spawn(source);
		latest.store(1, AtomicOrdering::Release);
		tx.send(BuildCommand::Build(req)).expect("send");

		let result = rx.recv_timeout(Duration::from_secs(5)).expect("result");
		assert_eq!(result.generation, 1);
		let tree = result.outcome.expect("tree");
		assert_eq!(tree.generation, 1);
		assert_eq!(tree.pattern.as_deref(), Some("x"));
		tx.send(BuildCommand::Shutdown).expect("shutdown");
	}

	#[test]
	fn superseded_requests_are_skipped() {
		let source = Arc::new(MemorySource::with_paths("root", ["a.txt"]));
		let stale = request(&source, 1, "");
		let fresh = request(&source, 2, "");
		let (tx, rx, latest) = spawn(Arc::clone(&source) as Arc<dyn TreeSource + Send + Sync>);
		latest.store(2, AtomicOrdering::Release);
		tx.send(BuildCommand::Build(stale)).expect("send");
		tx.send(BuildCommand::Build(fresh)).expect("send");

		let first = rx.recv_timeout(Duration::from_secs(5)).expect("first");
		assert_eq!(first.generation, 1);
		assert_eq!(first.outcome.unwrap_err(), BuildError::Cancelled);
		let second = rx.recv_timeout(Duration::from_secs(5)).expect("second");
		assert!(second.outcome.is_ok());
		assert_eq!(source.listings(), 1);
	}
}
