use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Which ignore files are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreOptions {
	/// Respect `.ignore` files.
	pub respect_ignore_files: bool,
	/// Respect `.gitignore` files.
	pub git_ignore: bool,
	/// Respect the user's global git excludes.
	pub git_global: bool,
	/// Respect `.git/info/exclude`.
	pub git_exclude: bool,
}

impl Default for IgnoreOptions {
	fn default() -> Self {
		Self {
			respect_ignore_files: true,
			git_ignore: true,
			git_global: true,
			git_exclude: true,
		}
	}
}

impl IgnoreOptions {
	#[must_use]
	pub fn none() -> Self {
		Self {
			respect_ignore_files: false,
			git_ignore: false,
			git_global: false,
			git_exclude: false,
		}
	}

	#[must_use]
	pub fn any(&self) -> bool {
		self.respect_ignore_files || self.git_ignore || self.git_global || self.git_exclude
	}
}

pub trait IgnoreRules {
	/// Failures to load rules are treated as "not ignored".
	fn is_ignored(&self, path: &Path, is_dir: bool) -> bool;
}

/// Ignores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnore;

impl IgnoreRules for NoIgnore {
	fn is_ignored(&self, _path: &Path, _is_dir: bool) -> bool {
		false
	}
}

/// `.gitignore` / `.ignore` files loaded lazily per directory, plus the
/// repository exclude file and the global excludes. Directories above the
/// enclosing repository (or above the build root outside a repository) are
/// never consulted.
pub struct GitIgnoreRules {
	options: IgnoreOptions,
	boundary: PathBuf,
	exclude: Option<Gitignore>,
	global: Option<Gitignore>,
	per_dir: RefCell<HashMap<PathBuf, Option<Rc<Gitignore>>>>,
}

impl GitIgnoreRules {
	#[must_use]
	pub fn new(root: &Path, options: IgnoreOptions) -> Self {
		let repository = repository_root(root);
		let exclude = options
			.git_exclude
			.then(|| repository.clone())
			.flatten()
			.and_then(|repo| {
				let exclude = repo.join(".git").join("info").join("exclude");
				exclude.is_file().then(|| load(&repo, &[exclude])).flatten()
			});
		let global = options.git_global.then(|| {
			let (matcher, err) = Gitignore::global();
			if let Some(err) = err {
				log::warn!("global gitignore: {err}");
			}
			matcher
		});
		Self {
			options,
			boundary: repository.unwrap_or_else(|| root.to_path_buf()),
			exclude,
			global,
			per_dir: RefCell::new(HashMap::new()),
		}
	}

	fn matcher_for(&self, dir: &Path) -> Option<Rc<Gitignore>> {
		if let Some(cached) = self.per_dir.borrow().get(dir) {
			return cached.clone();
		}
		let mut files = Vec::new();
		if self.options.git_ignore {
			files.push(dir.join(".gitignore"));
		}
		if self.options.respect_ignore_files {
			files.push(dir.join(".ignore"));
		}
		files.retain(|file| file.is_file());
		let matcher = if files.is_empty() {
			None
		} else {
			load(dir, &files).map(Rc::new)
		};
		self.per_dir
			.borrow_mut()
			.insert(dir.to_path_buf(), matcher.clone());
		matcher
	}
}

impl IgnoreRules for GitIgnoreRules {
	fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
		// Closest directory wins; a whitelist (`!pattern`) stops the search.
		let scoped = path
			.ancestors()
			.skip(1)
			.take_while(|dir| dir.starts_with(&self.boundary));
		for dir in scoped {
			let Some(matcher) = self.matcher_for(dir) else {
				continue;
			};
			match matcher.matched(path, is_dir) {
				Match::Ignore(_) => return true,
				Match::Whitelist(_) => return false,
				Match::None => {}
			}
		}
		[self.exclude.as_ref(), self.global.as_ref()]
			.into_iter()
			.flatten()
			.any(|matcher| matcher.matched(path, is_dir).is_ignore())
	}
}

fn repository_root(start: &Path) -> Option<PathBuf> {
	start
		.ancestors()
		.find(|dir| dir.join(".git").is_dir())
		.map(Path::to_path_buf)
}

/// Later files take precedence over earlier ones.
fn load(dir: &Path, files: &[PathBuf]) -> Option<Gitignore> {
	let mut builder = GitignoreBuilder::new(dir);
	for file in files {
		if let Some(err) = builder.add(file) {
			log::warn!("ignore file {}: {err}", file.display());
		}
	}
	match builder.build() {
		Ok(matcher) => Some(matcher),
		Err(err) => {
			log::warn!("ignore rules under {}: {err}", dir.display());
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	fn local_only() -> IgnoreOptions {
		IgnoreOptions {
			git_global: false,
			git_exclude: false,
			..IgnoreOptions::default()
		}
	}

	#[test]
	fn honours_nested_gitignore() {
		let dir = tempfile::tempdir().expect("tempdir");
		let root = dir.path();
		fs::create_dir_all(root.join("sub")).expect("mkdir");
		fs::write(root.join(".gitignore"), "*.log\n").expect("write");
		fs::write(root.join("sub/.gitignore"), "!keep.log\nbuild/\n").expect("write");

		let rules = GitIgnoreRules::new(root, local_only());
		assert!(rules.is_ignored(&root.join("debug.log"), false));
		assert!(rules.is_ignored(&root.join("sub/other.log"), false));
		assert!(!rules.is_ignored(&root.join("sub/keep.log"), false));
		assert!(rules.is_ignored(&root.join("sub/build"), true));
		assert!(!rules.is_ignored(&root.join("sub/build"), false));
		assert!(!rules.is_ignored(&root.join("main.rs"), false));
	}

	#[test]
	fn dot_ignore_overrides_gitignore() {
		let dir = tempfile::tempdir().expect("tempdir");
		let root = dir.path();
		fs::write(root.join(".gitignore"), "secret.txt\n").expect("write");
		fs::write(root.join(".ignore"), "!secret.txt\n").expect("write");

		let rules = GitIgnoreRules::new(root, local_only());
		assert!(!rules.is_ignored(&root.join("secret.txt"), false));

		let git_only = IgnoreOptions {
			respect_ignore_files: false,
			..local_only()
		};
		let rules = GitIgnoreRules::new(root, git_only);
		assert!(rules.is_ignored(&root.join("secret.txt"), false));
	}

	#[test]
	fn ignore_files_above_the_root_do_not_apply() {
		let dir = tempfile::tempdir().expect("tempdir");
		let outer = dir.path();
		let root = outer.join("inner");
		fs::create_dir_all(&root).expect("mkdir");
		fs::write(outer.join(".gitignore"), "*.txt\n").expect("write");
		fs::write(root.join(".gitignore"), "*.log\n").expect("write");

		let rules = GitIgnoreRules::new(&root, local_only());
		assert!(!rules.is_ignored(&root.join("notes.txt"), false));
		assert!(rules.is_ignored(&root.join("debug.log"), false));
		assert!(!rules.per_dir.borrow().contains_key(outer));
	}

	#[test]
	fn repository_ignore_files_apply_below_the_repository_root() {
		let dir = tempfile::tempdir().expect("tempdir");
		let repo = dir.path();
		let root = repo.join("crates/inner");
		fs::create_dir_all(repo.join(".git")).expect("mkdir");
		fs::create_dir_all(&root).expect("mkdir");
		fs::write(repo.join(".gitignore"), "*.txt\n").expect("write");

		let rules = GitIgnoreRules::new(&root, local_only());
		assert!(rules.is_ignored(&root.join("notes.txt"), false));
		assert!(!rules.per_dir.borrow().contains_key(repo.parent().expect("parent")));
	}

	#[test]
	fn reads_repository_exclude() {
		let dir = tempfile::tempdir().expect("tempdir");
		let root = dir.path();
		fs::create_dir_all(root.join(".git/info")).expect("mkdir");
		fs::write(root.join(".git/info/exclude"), "scratch/\n").expect("write");

		let options = IgnoreOptions {
			git_global: false,
			..IgnoreOptions::default()
		};
		let rules = GitIgnoreRules::new(root, options);
		assert!(rules.is_ignored(&root.join("scratch"), true));
	}
}
