use std::fs;
use std::path::Path;

use sprig::{
	BuildError, CancellationToken, FsSource, IgnoreOptions, LineKind, MatchOptions,
	MemorySource, Tree, TreeOptions, TreeSource, build_tree, compile,
};

fn options() -> TreeOptions {
	TreeOptions {
		ignore: IgnoreOptions {
			git_global: false,
			git_exclude: false,
			..IgnoreOptions::default()
		},
		..TreeOptions::default()
	}
}

fn build(source: &dyn TreeSource, root: &Path, options: &TreeOptions, query: &str) -> Tree {
	let pattern = compile(query, &MatchOptions::default()).expect("compile");
	build_tree(source, root, options, pattern.as_ref(), &CancellationToken::new())
		.expect("build")
}

fn outline(tree: &Tree) -> Vec<String> {
	tree.lines
		.iter()
		.skip(1)
		.map(|line| match line.kind {
			LineKind::PruneMarker => format!("{}[{}]", "  ".repeat(line.depth), line.unlisted),
			_ => format!("{}{}", "  ".repeat(line.depth), line.name),
		})
		.collect()
}

fn write(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).expect("mkdir");
	}
	fs::write(path, content).expect("write");
}

#[test]
fn matching_file_keeps_its_ancestors() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(dir.path(), "a/x.txt", "");
	write(dir.path(), "a/y.txt", "");
	write(dir.path(), "b.txt", "");

	let tree = build(&FsSource, dir.path(), &options(), "x.");
	assert_eq!(outline(&tree), vec!["  a", "    x.txt", "    [1]", "  [1]"]);
	assert!(tree.lines[2].direct_match);
	assert!(!tree.lines[1].direct_match);
	assert!(tree.lines.iter().all(|line| line.path != dir.path().join("b.txt")));
}

#[test]
fn every_line_follows_its_parent() {
	let dir = tempfile::tempdir().expect("tempdir");
	for path in ["src/main.rs", "src/lib/mod.rs", "docs/guide.md", "README.md"] {
		write(dir.path(), path, "");
	}

	let tree = build(&FsSource, dir.path(), &options(), "rs");
	for line in tree.lines.iter().skip(1) {
		let parent = tree.line(line.parent.expect("parent")).expect("parent line");
		assert!(parent.id < line.id);
		assert!(parent.is_directory());
		assert_eq!(parent.depth + 1, line.depth);
	}
}

#[test]
fn ignore_files_and_hidden_entries_are_counted() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(dir.path(), ".gitignore", "*.log\n");
	write(dir.path(), "app.log", "");
	write(dir.path(), "main.rs", "");

	let tree = build(&FsSource, dir.path(), &options(), "");
	assert_eq!(outline(&tree), vec!["  main.rs", "  [2]"]);
	assert_eq!(tree.stats.hidden, 1);
	assert_eq!(tree.stats.ignored, 1);

	let shown = TreeOptions {
		show_hidden: true,
		ignore: IgnoreOptions::none(),
		..options()
	};
	let tree = build(&FsSource, dir.path(), &shown, "");
	assert_eq!(outline(&tree), vec!["  .gitignore", "  app.log", "  main.rs"]);
}

#[test]
fn content_patterns_read_files() {
	let dir = tempfile::tempdir().expect("tempdir");
	write(dir.path(), "notes.md", "a needle in here\n");
	write(dir.path(), "other.md", "only hay\n");

	let tree = build(&FsSource, dir.path(), &options(), "c/needle/");
	assert_eq!(outline(&tree), vec!["  notes.md", "  [1]"]);
}

#[cfg(unix)]
#[test]
fn broken_links_are_listed() {
	use std::os::unix::fs::symlink;

	let dir = tempfile::tempdir().expect("tempdir");
	symlink(dir.path().join("missing"), dir.path().join("dangling")).expect("symlink");

	let tree = build(&FsSource, dir.path(), &options(), "");
	assert!(matches!(
		tree.lines[1].kind,
		LineKind::BrokenSymbolicLink { .. }
	));
}

#[test]
fn capacity_bounds_lines_and_markers() {
	let paths: Vec<String> = (0..10).map(|i| format!("f{i:02}.txt")).collect();
	let source = MemorySource::with_paths("root", paths.iter().map(String::as_str));
	let options = TreeOptions {
		global_ignores: Vec::new(),
		target_line_count: 4,
		..TreeOptions::default()
	};

	let tree = build(&source, source.root(), &options, "");
	assert!(tree.len() <= 4);
	assert_eq!(tree.marker_count(), 1);
	let shown = tree.lines.iter().filter(|line| line.depth == 1 && !line.is_marker()).count();
	let marker = tree.lines.last().expect("marker");
	assert!(marker.is_marker());
	assert_eq!(shown + marker.unlisted, 10);
	assert!(tree.stats.trimmed > 0);
}

#[test]
fn rebuilding_is_idempotent() {
	let source = MemorySource::with_paths("root", ["a/x.txt", "a/y.txt", "b.txt", "c/d/e.rs"]);
	let options = TreeOptions {
		global_ignores: Vec::new(),
		..TreeOptions::default()
	};
	for query in ["", "x", "=e.rs", "!txt"] {
		assert_eq!(
			build(&source, source.root(), &options, query),
			build(&source, source.root(), &options, query),
			"query {query:?}"
		);
	}
}

#[test]
fn cancellation_mid_build_returns_nothing() {
	let token = CancellationToken::new();
	let source = MemorySource::with_paths("root", ["a/x.txt", "b/y.txt"])
		.cancel_when_listing("a", token.clone());
	let result = build_tree(&source, source.root(), &TreeOptions::default(), None, &token);
	assert_eq!(result, Err(BuildError::Cancelled));
}
