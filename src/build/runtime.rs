use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use super::commands::{BuildCommand, BuildRequest, BuildResult};
use super::worker;
use crate::cancel::CancellationToken;
use crate::pattern::{MatchOptions, compile};
use crate::source::TreeSource;
use crate::tree::{BuildError, Tree, TreeOptions};

/// Interactive-side handle on the build worker.
///
/// Every [`issue`](Self::issue) cancels the build in flight and bumps the
/// generation; only a result carrying the latest generation is ever handed
/// back.
pub struct BuildRuntime {
	tx: Sender<BuildCommand>,
	rx: Receiver<BuildResult>,
	latest_generation: Arc<AtomicU64>,
	next_generation: u64,
	current_generation: Option<u64>,
	token: Option<CancellationToken>,
	in_flight: bool,
	root: PathBuf,
	options: TreeOptions,
	match_options: MatchOptions,
	last_query: String,
}

impl BuildRuntime {
	/// Spawn a worker over `source` and wrap it.
	pub fn spawn(
		source: Arc<dyn TreeSource + Send + Sync>,
		root: PathBuf,
		options: TreeOptions,
		match_options: MatchOptions,
	) -> Self {
		let (tx, rx, latest_generation) = worker::spawn(source);
		Self::new(tx, rx, latest_generation, root, options, match_options)
	}

	pub fn new(
		tx: Sender<BuildCommand>,
		rx: Receiver<BuildResult>,
		latest_generation: Arc<AtomicU64>,
		root: PathBuf,
		options: TreeOptions,
		match_options: MatchOptions,
	) -> Self {
		Self {
			tx,
			rx,
			latest_generation,
			next_generation: 0,
			current_generation: None,
			token: None,
			in_flight: false,
			root,
			options,
			match_options,
			last_query: String::new(),
		}
	}

	/// Start a build for `query`. A query that fails to compile, or options
	/// that fail validation, start nothing and leave the build in flight alone.
	pub fn issue(&mut self, query: &str) -> Result<u64, BuildError> {
		let pattern = compile(query, &self.match_options)?;
		self.options.validate()?;

		if let Some(previous) = self.token.take() {
			previous.cancel();
		}
		let token = CancellationToken::new();
		self.next_generation = self.next_generation.saturating_add(1);
		let generation = self.next_generation;
		self.current_generation = Some(generation);
		self.latest_generation.store(generation, AtomicOrdering::Release);
		self.token = Some(token.clone());
		self.in_flight = true;
		self.last_query = query.to_string();

		log::debug!("issuing build {generation} for {query:?}");
		let request = BuildRequest {
			generation,
			root: self.root.clone(),
			options: self.options.clone(),
			query: query.to_string(),
			pattern,
			token,
		};
		if self.tx.send(BuildCommand::Build(request)).is_err() {
			log::warn!("build worker is gone; build {generation} dropped");
			self.in_flight = false;
		}
		Ok(generation)
	}

	/// Re-run the last issued query, picking up source changes.
	pub fn refresh(&mut self) -> Result<u64, BuildError> {
		let query = self.last_query.clone();
		self.issue(&query)
	}

	/// Cancel the build in flight, if any. Its result will be discarded, even
	/// one that finished before it noticed the cancellation.
	pub fn cancel(&mut self) {
		if let Some(token) = self.token.take() {
			token.cancel();
		}
		self.current_generation = None;
		self.in_flight = false;
	}

	#[must_use]
	pub fn matches_latest(&self, generation: u64) -> bool {
		Some(generation) == self.current_generation
	}

	/// Filter a worker result: the tree comes back only when it belongs to the
	/// latest generation and completed.
	pub fn accept(&mut self, result: BuildResult) -> Option<Tree> {
		if !self.matches_latest(result.generation) {
			log::debug!("discarding stale build {}", result.generation);
			return None;
		}
		self.in_flight = false;
		match result.outcome {
			Ok(tree) => Some(tree),
			Err(BuildError::Cancelled) => None,
			Err(err) => {
				log::warn!("build {} failed: {err}", result.generation);
				None
			}
		}
	}

	/// Drain pending results without blocking; returns the latest tree.
	pub fn poll(&mut self) -> Option<Tree> {
		let mut accepted = None;
		while let Ok(result) = self.rx.try_recv() {
			if let Some(tree) = self.accept(result) {
				accepted = Some(tree);
			}
		}
		accepted
	}

	/// Block until the latest build reports back or `timeout` elapses.
	pub fn wait(&mut self, timeout: Duration) -> Option<Result<Tree, BuildError>> {
		let deadline = Instant::now() + timeout;
		loop {
			let remaining = deadline.saturating_duration_since(Instant::now());
			let result = match self.rx.recv_timeout(remaining) {
				Ok(result) => result,
				Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
			};
			if self.matches_latest(result.generation) {
				self.in_flight = false;
				return Some(result.outcome);
			}
			log::debug!("discarding stale build {}", result.generation);
		}
	}

	#[must_use]
	pub fn is_in_flight(&self) -> bool {
		self.in_flight
	}

	#[must_use]
	pub fn generation(&self) -> Option<u64> {
		self.current_generation
	}

	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn shutdown(&self) {
		let _ = self.tx.send(BuildCommand::Shutdown);
	}
}

impl Drop for BuildRuntime {
	fn drop(&mut self) {
		self.cancel();
		self.shutdown();
	}
}
