use std::collections::{BTreeMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::rules::{IgnoreOptions, IgnoreRules, NoIgnore};
use super::{EntryKind, Listing, RawEntry, TreeSource, display_name};
use crate::cancel::CancellationToken;
use crate::pattern::ContentReader;

const MAX_LINK_HOPS: usize = 32;

#[derive(Debug, Clone)]
enum MemoryNode {
	Dir { unreadable: bool },
	File(Vec<u8>),
	Link(PathBuf),
	/// Listed by its parent, but its metadata cannot be read.
	Faulty,
}

/// An in-memory tree for fixtures and tests.
///
/// Paths passed to the `with_*` builders are relative to the root; missing
/// parent directories are created on the way.
#[derive(Debug)]
pub struct MemorySource {
	root: PathBuf,
	nodes: BTreeMap<PathBuf, MemoryNode>,
	ignored: HashSet<PathBuf>,
	cancel_on_list: Option<(PathBuf, CancellationToken)>,
	listings: AtomicUsize,
}

impl MemorySource {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		let mut nodes = BTreeMap::new();
		nodes.insert(root.clone(), MemoryNode::Dir { unreadable: false });
		Self {
			root,
			nodes,
			ignored: HashSet::new(),
			cancel_on_list: None,
			listings: AtomicUsize::new(0),
		}
	}

	/// Build from relative paths; a trailing `/` marks a directory.
	pub fn with_paths<'a>(root: impl Into<PathBuf>, paths: impl IntoIterator<Item = &'a str>) -> Self {
		paths.into_iter().fold(Self::new(root), |source, path| {
			if let Some(dir) = path.strip_suffix('/') {
				source.with_dir(dir)
			} else {
				source.with_file(path, Vec::new())
			}
		})
	}

	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}

	#[must_use]
	pub fn with_dir(self, relative: &str) -> Self {
		self.insert(relative, MemoryNode::Dir { unreadable: false })
	}

	#[must_use]
	pub fn with_file(self, relative: &str, content: impl Into<Vec<u8>>) -> Self {
		self.insert(relative, MemoryNode::File(content.into()))
	}

	/// A link at `relative` pointing at `target` (also relative to the root).
	#[must_use]
	pub fn with_symlink(self, relative: &str, target: &str) -> Self {
		let target = self.root.join(target);
		self.insert(relative, MemoryNode::Link(target))
	}

	/// A directory whose listing fails.
	#[must_use]
	pub fn with_unreadable_dir(self, relative: &str) -> Self {
		self.insert(relative, MemoryNode::Dir { unreadable: true })
	}

	/// An entry whose metadata cannot be read.
	#[must_use]
	pub fn with_faulty_entry(self, relative: &str) -> Self {
		self.insert(relative, MemoryNode::Faulty)
	}

	/// Mark an entry as matched by an ignore rule.
	#[must_use]
	pub fn with_ignored(mut self, relative: &str) -> Self {
		let path = self.root.join(relative);
		self.ignored.insert(path);
		self
	}

	/// Cancel `token` as soon as `relative` is listed.
	#[must_use]
	pub fn cancel_when_listing(mut self, relative: &str, token: CancellationToken) -> Self {
		self.cancel_on_list = Some((self.root.join(relative), token));
		self
	}

	/// Number of `list_children` calls so far.
	#[must_use]
	pub fn listings(&self) -> usize {
		self.listings.load(Ordering::Relaxed)
	}

	fn insert(mut self, relative: &str, node: MemoryNode) -> Self {
		let path = self.root.join(relative);
		let mut parent = path.parent();
		while let Some(dir) = parent {
			if !dir.starts_with(&self.root) || self.nodes.contains_key(dir) {
				break;
			}
			self.nodes
				.insert(dir.to_path_buf(), MemoryNode::Dir { unreadable: false });
			parent = dir.parent();
		}
		self.nodes.insert(path, node);
		self
	}

	/// Follow links in every component of `path`.
	fn resolve(&self, path: &Path) -> Option<PathBuf> {
		let mut resolved = PathBuf::new();
		for component in path.components() {
			match component {
				Component::ParentDir => {
					resolved.pop();
				}
				Component::CurDir => {}
				other => resolved.push(other),
			}
			let mut hops = 0;
			while let Some(MemoryNode::Link(target)) = self.nodes.get(&resolved) {
				hops += 1;
				if hops > MAX_LINK_HOPS {
					return None;
				}
				resolved = target.clone();
			}
		}
		Some(resolved)
	}

	fn kind_of(&self, path: &Path) -> (EntryKind, bool) {
		match self.nodes.get(path) {
			Some(MemoryNode::Dir { .. }) => (EntryKind::Directory, false),
			Some(MemoryNode::File(_)) | None => (EntryKind::File, false),
			Some(MemoryNode::Faulty) => (EntryKind::File, true),
			Some(MemoryNode::Link(target)) => {
				let target = target.clone();
				let kind = match self.resolve(path).and_then(|real| self.nodes.get(&real)) {
					Some(MemoryNode::Dir { .. }) => EntryKind::Symlink {
						target,
						resolved_is_dir: true,
					},
					Some(MemoryNode::File(_)) => EntryKind::Symlink {
						target,
						resolved_is_dir: false,
					},
					_ => EntryKind::BrokenSymlink { target },
				};
				(kind, false)
			}
		}
	}
}

impl ContentReader for MemorySource {
	fn open_content(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
		let real = self.resolve(path).ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
		match self.nodes.get(&real) {
			Some(MemoryNode::File(bytes)) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
			Some(_) => Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file")),
			None => Err(io::Error::from(io::ErrorKind::NotFound)),
		}
	}
}

impl TreeSource for MemorySource {
	fn list_children(&self, path: &Path) -> io::Result<Listing> {
		self.listings.fetch_add(1, Ordering::Relaxed);
		if let Some((trigger, token)) = &self.cancel_on_list
			&& trigger == path
		{
			token.cancel();
		}

		let real = self.resolve(path).ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
		match self.nodes.get(&real) {
			Some(MemoryNode::Dir { unreadable: false }) => {}
			Some(MemoryNode::Dir { unreadable: true }) => {
				return Err(io::Error::from(io::ErrorKind::PermissionDenied));
			}
			_ => return Err(io::Error::from(io::ErrorKind::NotFound)),
		}

		let entries = self
			.nodes
			.keys()
			.filter(|candidate| candidate.parent() == Some(real.as_path()))
			.map(|candidate| {
				let name = display_name(candidate);
				let (kind, error) = self.kind_of(candidate);
				RawEntry {
					path: path.join(&name),
					name,
					kind,
					error,
				}
			})
			.collect();
		Ok(Listing {
			entries,
			unreadable: 0,
		})
	}

	fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
		self.resolve(path)
	}

	fn ignore_rules(&self, _root: &Path, options: &IgnoreOptions) -> Box<dyn IgnoreRules + '_> {
		if options.any() {
			Box::new(MemoryIgnore(&self.ignored))
		} else {
			Box::new(NoIgnore)
		}
	}
}

struct MemoryIgnore<'a>(&'a HashSet<PathBuf>);

impl IgnoreRules for MemoryIgnore<'_> {
	fn is_ignored(&self, path: &Path, _is_dir: bool) -> bool {
		self.0.contains(path)
	}
}
