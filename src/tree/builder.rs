use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cancel::CancellationToken;
use crate::pattern::{Candidate, ContentProbe, Pattern};
use crate::source::{EntryKind, IgnoreRules, RawEntry, TreeSource, display_name};

use super::arena::{Arena, BuildNode, NodeId};
use super::materialize::materialize;
use super::trim::trim_to_capacity;
use super::{BuildError, BuildState, BuildStats, Tree, TreeOptions};

/// Build the tree under `root` in one go.
pub fn build_tree(
	source: &dyn TreeSource,
	root: &Path,
	options: &TreeOptions,
	pattern: Option<&Pattern>,
	token: &CancellationToken,
) -> Result<Tree, BuildError> {
	TreeBuilder::new(source, options, pattern, token).build(root)
}

/// One breadth-first build. Reports its [`BuildState`] as it goes.
pub struct TreeBuilder<'a> {
	source: &'a dyn TreeSource,
	options: &'a TreeOptions,
	pattern: Option<&'a Pattern>,
	token: &'a CancellationToken,
	state: BuildState,
}

/// Per-build lookups derived from the options.
struct Filters<'a> {
	rules: Box<dyn IgnoreRules + 'a>,
	global_ignores: HashSet<&'a str>,
	extensions: Option<HashSet<String>>,
}

/// Where newly queued directories go, and how many nodes the arena may hold.
struct Gather<'a> {
	limit: usize,
	next: &'a mut Vec<NodeId>,
}

enum Exclusion {
	Hidden,
	Ignored,
	Filtered,
}

impl<'a> TreeBuilder<'a> {
	#[must_use]
	pub fn new(
		source: &'a dyn TreeSource,
		options: &'a TreeOptions,
		pattern: Option<&'a Pattern>,
		token: &'a CancellationToken,
	) -> Self {
		Self {
			source,
			options,
			pattern,
			token,
			state: BuildState::Idle,
		}
	}

	#[must_use]
	pub fn state(&self) -> BuildState {
		self.state
	}

	/// Run the build. On cancellation the arena is dropped and nothing is
	/// returned.
	pub fn build(&mut self, root: &Path) -> Result<Tree, BuildError> {
		self.options.validate()?;
		let started = Instant::now();
		let result = self.run(root);
		self.state = match &result {
			Ok(_) => BuildState::Completed,
			Err(BuildError::Cancelled) => BuildState::Cancelled,
			Err(_) => self.state,
		};
		match &result {
			Ok(tree) => log::debug!(
				"built {} lines under {} in {:?} (seen {}, hidden {}, ignored {}, filtered {}, errors {}, trimmed {})",
				tree.len(),
				root.display(),
				started.elapsed(),
				tree.stats.seen,
				tree.stats.hidden,
				tree.stats.ignored,
				tree.stats.filtered,
				tree.stats.errors,
				tree.stats.trimmed,
			),
			Err(err) => log::debug!("build under {} stopped: {err}", root.display()),
		}
		result
	}

	fn run(&mut self, root: &Path) -> Result<Tree, BuildError> {
		let mut stats = BuildStats::default();
		let filters = Filters {
			rules: self.source.ignore_rules(root, &self.options.ignore),
			global_ignores: self.options.global_ignore_set(),
			extensions: self.options.extension_filter(),
		};
		let mut visited = HashSet::new();
		if self.options.follow_symlinks
			&& let Some(canonical) = self.source.canonicalize(root)
		{
			visited.insert(canonical);
		}

		let mut root_node = BuildNode::new(
			None,
			0,
			root.to_path_buf(),
			display_name(root),
			EntryKind::Directory,
		);
		root_node.has_match = true;
		let mut arena = Arena::with_root(root_node);

		let limit = self.options.gather_limit(self.pattern.is_some());
		let mut level = vec![0];
		let mut depth = 0;
		'levels: while !level.is_empty() {
			self.state = BuildState::Traversing(depth);
			log::trace!("listing {} directories at depth {depth}", level.len());
			let mut next = Vec::new();
			for &dir in &level {
				self.token.ensure_active()?;
				if arena.len() >= limit {
					stats.truncated = true;
					break 'levels;
				}
				let gather = Gather {
					limit,
					next: &mut next,
				};
				self.expand(&mut arena, dir, &filters, &mut visited, &mut stats, gather)?;
			}
			self.token.ensure_active()?;
			level = next;
			depth += 1;
		}

		let mut kept = prune(&mut arena);
		stats.trimmed = trim_to_capacity(&mut arena, &mut kept, self.options.capacity());
		self.token.ensure_active()?;

		Ok(Tree {
			lines: materialize(&mut arena, &kept),
			stats,
			pattern: None,
			generation: 0,
		})
	}

	/// List the children of `dir`, filter and score them, and queue the ones
	/// to descend into.
	fn expand(
		&self,
		arena: &mut Arena,
		dir: NodeId,
		filters: &Filters<'_>,
		visited: &mut HashSet<PathBuf>,
		stats: &mut BuildStats,
		mut gather: Gather<'_>,
	) -> Result<(), BuildError> {
		let listing = match self.source.list_children(&arena[dir].path) {
			Ok(listing) => listing,
			Err(err) => {
				log::debug!("cannot list {}: {err}", arena[dir].path.display());
				arena[dir].has_error = true;
				stats.errors += 1;
				return Ok(());
			}
		};
		arena[dir].explored = true;
		arena[dir].unlisted += listing.unreadable;
		stats.errors += listing.unreadable;
		stats.seen += listing.entries.len() + listing.unreadable;

		let mut entries = listing.entries;
		entries.sort_by(|a, b| {
			a.name
				.to_lowercase()
				.cmp(&b.name.to_lowercase())
				.then_with(|| a.name.cmp(&b.name))
		});

		let depth = arena[dir].depth + 1;
		let total = entries.len();
		for (position, entry) in entries.into_iter().enumerate() {
			self.token.ensure_active()?;

			if arena.len() >= gather.limit {
				let rest = total - position;
				log::trace!(
					"gather limit reached in {}; {rest} entries left unlisted",
					arena[dir].path.display()
				);
				arena[dir].unlisted += rest;
				stats.truncated = true;
				break;
			}

			if let Some(exclusion) = self.exclusion(&entry, filters) {
				arena[dir].unlisted += 1;
				match exclusion {
					Exclusion::Hidden => stats.hidden += 1,
					Exclusion::Ignored => stats.ignored += 1,
					Exclusion::Filtered => stats.filtered += 1,
				}
				continue;
			}
			if entry.error {
				stats.errors += 1;
			}

			let score = self.pattern.and_then(|pattern| self.score(pattern, &entry));
			let descend = self.can_descend(&entry.kind);
			if self.pattern.is_some() && score.is_none() && !descend {
				arena[dir].unlisted += 1;
				continue;
			}

			let mut node = BuildNode::new(Some(dir), depth, entry.path, entry.name, entry.kind);
			node.has_error = entry.error;
			node.score = self
				.options
				.weights
				.base_depth_score
				.saturating_sub(i64::try_from(depth).unwrap_or(i64::MAX));
			if let Some(pattern_score) = score {
				node.direct_match = true;
				node.score = node
					.score
					.saturating_add(i64::from(pattern_score))
					.saturating_add(self.options.weights.direct_match_bonus);
			}
			let id = arena.push(node);
			if self.pattern.is_none() || score.is_some() {
				arena.mark_match_path(id);
			}

			if descend && self.options.may_expand(depth) && self.first_visit(&arena[id], visited) {
				gather.next.push(id);
			}
		}
		Ok(())
	}

	fn exclusion(&self, entry: &RawEntry, filters: &Filters<'_>) -> Option<Exclusion> {
		if !self.options.show_hidden && entry.is_hidden() {
			return Some(Exclusion::Hidden);
		}
		if filters.global_ignores.contains(entry.name.as_str())
			|| filters.rules.is_ignored(&entry.path, entry.kind.is_dir_like())
		{
			return Some(Exclusion::Ignored);
		}
		if entry.kind.is_dir_like() {
			return None;
		}
		if self.options.only_folders {
			return Some(Exclusion::Filtered);
		}
		if let Some(allowed) = &filters.extensions {
			let extension = Path::new(&entry.name)
				.extension()
				.and_then(|ext| ext.to_str())
				.map(str::to_ascii_lowercase);
			if extension.as_ref().is_none_or(|ext| !allowed.contains(ext)) {
				return Some(Exclusion::Filtered);
			}
		}
		None
	}

	fn score(&self, pattern: &Pattern, entry: &RawEntry) -> Option<u32> {
		let content = (entry.kind.is_file_like() && !entry.error).then_some(ContentProbe {
			reader: self.source,
			path: &entry.path,
			token: self.token,
		});
		pattern.score_entry(&Candidate {
			name: &entry.name,
			content,
		})
	}

	fn can_descend(&self, kind: &EntryKind) -> bool {
		match kind {
			EntryKind::Directory => true,
			EntryKind::Symlink {
				resolved_is_dir: true,
				..
			} => self.options.follow_symlinks,
			_ => false,
		}
	}

	/// Symlink cycles are only possible when links are followed.
	fn first_visit(&self, node: &BuildNode, visited: &mut HashSet<PathBuf>) -> bool {
		if !self.options.follow_symlinks {
			return true;
		}
		match self.source.canonicalize(&node.path) {
			Some(canonical) => visited.insert(canonical),
			None => true,
		}
	}
}

/// Keep a node when its parent is kept and a match lives at or below it.
/// Each removed node is counted as unlisted in its kept parent.
fn prune(arena: &mut Arena) -> Vec<bool> {
	let mut kept = vec![false; arena.len()];
	kept[0] = true;
	for id in 1..arena.len() {
		let Some(parent) = arena[id].parent else {
			continue;
		};
		if !kept[parent] {
			continue;
		}
		if arena[id].has_match {
			kept[id] = true;
		} else {
			arena[parent].unlisted += 1;
		}
	}
	kept
}
