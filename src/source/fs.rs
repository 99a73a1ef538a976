use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::rules::{GitIgnoreRules, IgnoreOptions, IgnoreRules, NoIgnore};
use super::{EntryKind, Listing, RawEntry, TreeSource};
use crate::pattern::ContentReader;

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FsSource {
	fn describe(path: &Path) -> io::Result<EntryKind> {
		let metadata = fs::symlink_metadata(path)?;
		let file_type = metadata.file_type();
		if file_type.is_dir() {
			return Ok(EntryKind::Directory);
		}
		if !file_type.is_symlink() {
			return Ok(EntryKind::File);
		}
		let target = fs::read_link(path).unwrap_or_else(|_| PathBuf::new());
		Ok(match fs::metadata(path) {
			Ok(resolved) => EntryKind::Symlink {
				target,
				resolved_is_dir: resolved.is_dir(),
			},
			Err(_) => EntryKind::BrokenSymlink { target },
		})
	}
}

impl ContentReader for FsSource {
	fn open_content(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
		Ok(Box::new(BufReader::new(File::open(path)?)))
	}
}

impl TreeSource for FsSource {
	fn list_children(&self, path: &Path) -> io::Result<Listing> {
		let mut listing = Listing::default();
		for entry in fs::read_dir(path)? {
			let entry = match entry {
				Ok(entry) => entry,
				Err(err) => {
					log::debug!("unreadable entry under {}: {err}", path.display());
					listing.unreadable += 1;
					continue;
				}
			};
			let child = entry.path();
			let name = entry.file_name().to_string_lossy().into_owned();
			let (kind, error) = match Self::describe(&child) {
				Ok(kind) => (kind, false),
				Err(err) => {
					log::debug!("metadata for {} failed: {err}", child.display());
					(EntryKind::File, true)
				}
			};
			listing.entries.push(RawEntry {
				name,
				path: child,
				kind,
				error,
			});
		}
		Ok(listing)
	}

	fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
		fs::canonicalize(path).ok()
	}

	fn ignore_rules(&self, root: &Path, options: &IgnoreOptions) -> Box<dyn IgnoreRules + '_> {
		if options.any() {
			Box::new(GitIgnoreRules::new(root, *options))
		} else {
			Box::new(NoIgnore)
		}
	}
}
