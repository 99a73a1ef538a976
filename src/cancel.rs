//! Cooperative cancellation for tree builds.
//!
//! A token is a shared flag. The interactive side sets it when a newer build
//! supersedes the one holding the token; the builder polls it between
//! directory entries, between levels and between content chunks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::tree::BuildError;

/// Shared, cheaply pollable cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	/// Create a fresh token that is not cancelled.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark every clone of this token as cancelled.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	#[inline]
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}

	/// Return `Err(BuildError::Cancelled)` once the token has been set, so
	/// builder loops can bail out with `?`.
	#[inline]
	pub fn ensure_active(&self) -> Result<(), BuildError> {
		if self.is_cancelled() {
			Err(BuildError::Cancelled)
		} else {
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_token_is_active() {
		let token = CancellationToken::new();
		assert!(!token.is_cancelled());
		assert!(token.ensure_active().is_ok());
	}

	#[test]
	fn cancel_is_visible_through_clones() {
		let token = CancellationToken::new();
		let observer = token.clone();
		token.cancel();
		assert!(observer.is_cancelled());
		assert!(matches!(observer.ensure_active(), Err(BuildError::Cancelled)));
	}

	#[test]
	fn cancel_from_another_thread() {
		let token = CancellationToken::new();
		let remote = token.clone();
		std::thread::spawn(move || remote.cancel())
			.join()
			.expect("join cancelling thread");
		assert!(token.is_cancelled());
	}
}
