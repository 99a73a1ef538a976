use super::{ConfigError, ConfigSources, ResolvedConfig, SettingSource};

pub(super) fn validate(config: &ResolvedConfig, sources: &ConfigSources) -> Result<(), ConfigError> {
	let tree = &config.tree;
	let origin = |source: &Option<SettingSource>, key| ConfigSources::or_key(source, key);

	if let Some(max_depth) = tree.max_depth
		&& max_depth == 0
	{
		return Err(ConfigError::below(
			"tree.max_depth",
			max_depth,
			1,
			origin(&sources.max_depth, "tree.max_depth"),
		));
	}

	if tree.target_line_count == 0 {
		return Err(ConfigError::below(
			"tree.target_lines",
			0,
			1,
			origin(&sources.target_lines, "tree.target_lines"),
		));
	}

	// An explicit capacity is blamed on its own source, a derived one on the
	// line target it came from.
	let capacity = tree.capacity();
	if capacity < 2 {
		let source = match tree.capacity {
			Some(_) => origin(&sources.capacity, "tree.capacity"),
			None => origin(&sources.target_lines, "tree.target_lines"),
		};
		return Err(ConfigError::new(
			"tree.capacity",
			capacity,
			source,
			"leaves no room for a line and its prune marker (minimum 2)",
		));
	}

	if tree.pattern_multiplier == 0 {
		return Err(ConfigError::below(
			"tree.pattern_multiplier",
			0,
			1,
			origin(&sources.pattern_multiplier, "tree.pattern_multiplier"),
		));
	}

	if tree.weights.base_depth_score <= 0 {
		return Err(ConfigError::below(
			"tree.base_depth_score",
			tree.weights.base_depth_score,
			1,
			origin(&sources.base_depth_score, "tree.base_depth_score"),
		));
	}

	if config.matching.content_max_bytes == 0 {
		return Err(ConfigError::below(
			"pattern.content_max_bytes",
			0,
			1,
			origin(&sources.content_max_bytes, "pattern.content_max_bytes"),
		));
	}

	Ok(())
}
