use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Where each validated value came from.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	pub(crate) max_depth: Option<SettingSource>,
	pub(crate) target_lines: Option<SettingSource>,
	pub(crate) capacity: Option<SettingSource>,
	pub(crate) pattern_multiplier: Option<SettingSource>,
	pub(crate) base_depth_score: Option<SettingSource>,
	pub(crate) content_max_bytes: Option<SettingSource>,
}

impl ConfigSources {
	/// Source recorded for a value, or its config key when none was.
	pub(crate) fn or_key(source: &Option<SettingSource>, key: &'static str) -> SettingSource {
		source.clone().unwrap_or(SettingSource::ConfigKey(key))
	}
}
