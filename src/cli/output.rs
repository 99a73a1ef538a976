use anyhow::Result;
use serde_json::{Value, json};
use sprig::tui::{Outcome, branch_prefix, line_label, stats_summary};
use sprig::{DisplayLine, LineKind, Tree};

use super::OutputFormat;

/// Print a one-shot tree in the chosen format.
pub(crate) fn print_tree(tree: &Tree, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Plain => {
			print!("{}", format_tree_plain(tree));
			eprintln!("{}", stats_summary(&tree.stats, tree.len()));
		}
		OutputFormat::Json => println!("{}", format_tree_json(tree)?),
	}
	Ok(())
}

/// Print the result of an interactive session.
pub(crate) fn print_outcome(outcome: &Outcome, format: OutputFormat) -> Result<()> {
	match format {
		OutputFormat::Plain => print_outcome_plain(outcome),
		OutputFormat::Json => println!("{}", format_outcome_json(outcome)?),
	}
	Ok(())
}

fn print_outcome_plain(outcome: &Outcome) {
	if !outcome.accepted {
		eprintln!("Cancelled (pattern: '{}')", outcome.query);
		return;
	}

	match &outcome.selection {
		Some(path) => println!("{}", path.display()),
		None => eprintln!("No selection"),
	}
}

pub(crate) fn format_tree_plain(tree: &Tree) -> String {
	let mut out = String::new();
	for line in &tree.lines {
		out.push_str(&branch_prefix(line));
		if line.has_error {
			out.push_str("! ");
		}
		out.push_str(&line_label(line));
		out.push('\n');
	}
	out
}

pub(crate) fn format_tree_json(tree: &Tree) -> Result<String> {
	let lines: Vec<Value> = tree.lines.iter().map(line_json).collect();
	let stats = &tree.stats;
	let payload = json!({
		"pattern": tree.pattern,
		"lines": lines,
		"stats": {
			"hidden": stats.hidden,
			"ignored": stats.ignored,
			"filtered": stats.filtered,
			"errors": stats.errors,
			"seen": stats.seen,
			"trimmed": stats.trimmed,
			"truncated": stats.truncated,
		},
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

fn line_json(line: &DisplayLine) -> Value {
	let (kind, target) = match &line.kind {
		LineKind::File => ("file", None),
		LineKind::Directory => ("directory", None),
		LineKind::SymbolicLink { target, .. } => ("symlink", Some(target)),
		LineKind::BrokenSymbolicLink { target } => ("broken_symlink", Some(target)),
		LineKind::PruneMarker => ("marker", None),
	};
	json!({
		"id": line.id.0,
		"parent": line.parent.map(|parent| parent.0),
		"depth": line.depth,
		"path": line.path,
		"name": line.name,
		"kind": kind,
		"target": target,
		"score": line.score,
		"direct_match": line.direct_match,
		"error": line.has_error,
		"unlisted": line.unlisted,
	})
}

pub(crate) fn format_outcome_json(outcome: &Outcome) -> Result<String> {
	let payload = json!({
		"accepted": outcome.accepted,
		"query": outcome.query,
		"selection": outcome.selection,
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use sprig::{CancellationToken, MatchOptions, MemorySource, TreeOptions, build_tree, compile};

	use super::*;

	fn tree(query: &str) -> Tree {
		let source = MemorySource::with_paths("root", ["a/x.txt", "a/y.txt", "b.txt"]);
		let pattern = compile(query, &MatchOptions::default()).expect("compile");
		build_tree(
			&source,
			source.root(),
			&TreeOptions::default(),
			pattern.as_ref(),
			&CancellationToken::new(),
		)
		.expect("build")
	}

	#[test]
	fn plain_tree_uses_connectors() {
		let text = format_tree_plain(&tree("x."));
		assert_eq!(
			text,
			"root/\n├── a/\n│   ├── x.txt\n│   └── … 1 unlisted\n└── … 1 unlisted\n"
		);
	}

	#[test]
	fn json_tree_lists_lines_and_stats() {
		let json = format_tree_json(&tree("x.")).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["lines"].as_array().map(Vec::len), Some(5));
		assert_eq!(value["lines"][2]["name"], "x.txt");
		assert_eq!(value["lines"][2]["direct_match"], true);
		assert_eq!(value["lines"][3]["kind"], "marker");
		assert_eq!(value["lines"][3]["unlisted"], 1);
		assert_eq!(value["stats"]["errors"], 0);
	}

	#[test]
	fn json_outcome_includes_selection() {
		let outcome = Outcome {
			accepted: true,
			query: "x".into(),
			selection: Some(PathBuf::from("root/a/x.txt")),
		};

		let json = format_outcome_json(&outcome).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["selection"], "root/a/x.txt");
		assert_eq!(value["accepted"], true);
	}
}
