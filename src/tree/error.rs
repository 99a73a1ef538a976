use thiserror::Error;

use crate::pattern::PatternError;

/// Reasons a build produced no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
	/// A newer build superseded this one. Never shown to the user.
	#[error("build cancelled")]
	Cancelled,
	#[error("invalid tree options: {0}")]
	InvalidOptions(String),
	#[error(transparent)]
	Pattern(#[from] PatternError),
}

impl BuildError {
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}
