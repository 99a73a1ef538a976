use std::fmt::Display;

use thiserror::Error;

use super::SettingSource;

/// A resolved value that cannot drive a build.
#[derive(Debug, Error)]
#[error("{origin} sets {key} to {value}, which {reason}")]
pub(crate) struct ConfigError {
	pub(crate) key: &'static str,
	pub(crate) value: String,
	pub(crate) origin: SettingSource,
	pub(crate) reason: String,
}

impl ConfigError {
	pub(crate) fn new(
		key: &'static str,
		value: impl Display,
		origin: SettingSource,
		reason: impl Into<String>,
	) -> Self {
		Self {
			key,
			value: value.to_string(),
			origin,
			reason: reason.into(),
		}
	}

	pub(crate) fn below(
		key: &'static str,
		value: impl Display,
		minimum: u64,
		origin: SettingSource,
	) -> Self {
		Self::new(key, value, origin, format!("is below the minimum of {minimum}"))
	}
}
