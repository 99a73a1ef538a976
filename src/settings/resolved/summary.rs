use std::fmt::Write;

use super::super::util::home_relative;
use super::ResolvedConfig;

pub(super) fn render_summary(config: &ResolvedConfig) -> String {
	let tree = &config.tree;
	let ignore = &tree.ignore;
	let mut out = String::new();
	let _ = writeln!(out, "Effective configuration:");
	let _ = writeln!(out, "  Root: {}", home_relative(&config.root));
	let _ = writeln!(out, "  Show hidden: {}", bool_to_word(tree.show_hidden));
	let _ = writeln!(out, "  Follow symlinks: {}", bool_to_word(tree.follow_symlinks));
	let _ = writeln!(out, "  Only folders: {}", bool_to_word(tree.only_folders));
	let _ = writeln!(
		out,
		"  Respect ignore files: {}",
		bool_to_word(ignore.respect_ignore_files)
	);
	let _ = writeln!(out, "  Git ignore: {}", bool_to_word(ignore.git_ignore));
	let _ = writeln!(out, "  Git global: {}", bool_to_word(ignore.git_global));
	let _ = writeln!(out, "  Git exclude: {}", bool_to_word(ignore.git_exclude));
	match tree.max_depth {
		Some(depth) => {
			let _ = writeln!(out, "  Max depth: {depth}");
		}
		None => {
			let _ = writeln!(out, "  Max depth: unlimited");
		}
	}
	match &tree.allowed_extensions {
		Some(exts) if !exts.is_empty() => {
			let _ = writeln!(out, "  Allowed extensions: {}", exts.join(", "));
		}
		_ => {
			let _ = writeln!(out, "  Allowed extensions: (all)");
		}
	}
	if !tree.global_ignores.is_empty() {
		let _ = writeln!(out, "  Global ignores: {}", tree.global_ignores.join(", "));
	}
	if config.fit_to_terminal {
		let _ = writeln!(out, "  Target lines: (terminal height)");
	} else {
		let _ = writeln!(out, "  Target lines: {}", tree.target_line_count);
	}
	let _ = writeln!(out, "  Capacity: {}", tree.capacity());
	let _ = writeln!(out, "  Pattern multiplier: {}", tree.pattern_multiplier);
	let _ = writeln!(
		out,
		"  Exact matching: {}",
		if config.matching.exact_case_sensitive {
			"case-sensitive"
		} else {
			"case-insensitive"
		}
	);
	let _ = writeln!(
		out,
		"  Content read limit: {} bytes",
		config.matching.content_max_bytes
	);
	if !config.initial_query.is_empty() {
		let _ = writeln!(out, "  Initial pattern: {}", config.initial_query);
	}
	out
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
