//! Hierarchical sources the tree builder enumerates.
//!
//! A [`TreeSource`] lists the children of one node at a time and opens file
//! contents for content patterns. [`FsSource`] reads the real filesystem;
//! [`MemorySource`] holds a fixture tree in memory.

mod fs;
mod memory;
mod rules;

use std::io;
use std::path::{Path, PathBuf};

pub use self::fs::FsSource;
pub use self::memory::MemorySource;
pub use self::rules::{GitIgnoreRules, IgnoreOptions, IgnoreRules, NoIgnore};
use crate::pattern::ContentReader;

/// Kind of a listed entry, resolved without a second round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
	File,
	Directory,
	Symlink { target: PathBuf, resolved_is_dir: bool },
	BrokenSymlink { target: PathBuf },
}

impl EntryKind {
	/// Directories and links to directories may have children.
	#[must_use]
	pub fn is_dir_like(&self) -> bool {
		matches!(
			self,
			Self::Directory
				| Self::Symlink {
					resolved_is_dir: true,
					..
				}
		)
	}

	/// Regular files and links to files carry content.
	#[must_use]
	pub fn is_file_like(&self) -> bool {
		matches!(
			self,
			Self::File
				| Self::Symlink {
					resolved_is_dir: false,
					..
				}
		)
	}
}

/// One child as reported by [`TreeSource::list_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
	pub name: String,
	pub path: PathBuf,
	pub kind: EntryKind,
	/// The entry exists but its metadata could not be read.
	pub error: bool,
}

impl RawEntry {
	#[must_use]
	pub fn is_hidden(&self) -> bool {
		self.name.starts_with('.')
	}
}

/// Children of one node. `unreadable` counts entries that could not even be
/// named; they are accounted for but never shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
	pub entries: Vec<RawEntry>,
	pub unreadable: usize,
}

pub trait TreeSource: ContentReader {
	/// Enumerate the direct children of `path`.
	fn list_children(&self, path: &Path) -> io::Result<Listing>;

	/// Canonical identity of a directory, used to break symlink cycles.
	fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
		Some(path.to_path_buf())
	}

	/// Ignore rules for a build rooted at `root`.
	fn ignore_rules(&self, _root: &Path, _options: &IgnoreOptions) -> Box<dyn IgnoreRules + '_> {
		Box::new(NoIgnore)
	}
}

/// Display name of a path: its last component, or the whole path for roots
/// like `/` or `.`.
#[must_use]
pub fn display_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}
