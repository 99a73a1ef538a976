use std::path::Path;

/// Per-path annotations shown next to tree entries, such as version control
/// state. Only consulted for lines inside the viewport.
pub trait StatusProvider {
	/// Short tag for `path`, or `None` to show nothing.
	fn status(&self, path: &Path) -> Option<String>;
}

/// Annotates nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatus;

impl StatusProvider for NoStatus {
	fn status(&self, _path: &Path) -> Option<String> {
		None
	}
}
