//! File content matching.
//!
//! Content is read through a [`ContentReader`] in fixed-size chunks with a
//! cancellation check before each chunk. Exact needles are searched chunk by
//! chunk with an overlap window so matches spanning a chunk boundary are
//! found; regexes run over the whole bounded prefix.

use std::io::{self, Read};
use std::path::Path;

use memchr::memmem;
use regex::bytes::Regex;

use crate::cancel::CancellationToken;

/// Size of one content read.
pub const CONTENT_CHUNK_BYTES: usize = 64 * 1024;

/// Opens file contents for content patterns.
pub trait ContentReader {
	fn open_content(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;
}

/// Everything a content pattern needs to lazily read one regular file.
#[derive(Clone, Copy)]
pub struct ContentProbe<'a> {
	pub reader: &'a dyn ContentReader,
	pub path: &'a Path,
	pub token: &'a CancellationToken,
}

impl ContentProbe<'_> {
	fn open(&self) -> Option<Box<dyn Read + '_>> {
		match self.reader.open_content(self.path) {
			Ok(reader) => Some(reader),
			Err(err) => {
				log::trace!("content of {} unreadable: {err}", self.path.display());
				None
			}
		}
	}
}

/// Search for `needle` in the first `max_bytes` of the probed file. `needle`
/// must already be lowercase when `case_insensitive` is set.
pub(crate) fn contains_bytes(
	probe: &ContentProbe<'_>,
	needle: &[u8],
	case_insensitive: bool,
	max_bytes: u64,
) -> bool {
	if needle.is_empty() {
		return false;
	}
	let Some(mut reader) = probe.open() else {
		return false;
	};
	let finder = memmem::Finder::new(needle);
	let overlap = needle.len() - 1;
	let mut buffer = vec![0u8; CONTENT_CHUNK_BYTES + overlap];
	let mut carry = 0usize;
	let mut remaining = max_bytes;
	let mut first_chunk = true;

	while remaining > 0 {
		if probe.token.is_cancelled() {
			return false;
		}
		let want = (buffer.len() - carry).min(remaining.try_into().unwrap_or(usize::MAX));
		let read = match reader.read(&mut buffer[carry..carry + want]) {
			Ok(0) | Err(_) => break,
			Ok(read) => read,
		};
		remaining = remaining.saturating_sub(read as u64);

		let filled = carry + read;
		if first_chunk {
			if looks_binary(&buffer[..filled]) {
				return false;
			}
			first_chunk = false;
		}
		if case_insensitive {
			buffer[carry..filled].make_ascii_lowercase();
		}
		if finder.find(&buffer[..filled]).is_some() {
			return true;
		}

		let keep = overlap.min(filled);
		buffer.copy_within(filled - keep..filled, 0);
		carry = keep;
	}

	false
}

/// Run `regex` over the first `max_bytes` of the probed file.
pub(crate) fn regex_matches(probe: &ContentProbe<'_>, regex: &Regex, max_bytes: u64) -> bool {
	let Some(mut reader) = probe.open() else {
		return false;
	};
	let mut content = Vec::new();
	let mut chunk = vec![0u8; CONTENT_CHUNK_BYTES];
	let mut remaining = max_bytes;

	while remaining > 0 {
		if probe.token.is_cancelled() {
			return false;
		}
		let want = chunk.len().min(remaining.try_into().unwrap_or(usize::MAX));
		let read = match reader.read(&mut chunk[..want]) {
			Ok(0) | Err(_) => break,
			Ok(read) => read,
		};
		if content.is_empty() && looks_binary(&chunk[..read]) {
			return false;
		}
		content.extend_from_slice(&chunk[..read]);
		remaining = remaining.saturating_sub(read as u64);
	}

	regex.is_match(&content)
}

fn looks_binary(bytes: &[u8]) -> bool {
	memchr::memchr(0, bytes).is_some()
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	struct Fixed(Vec<u8>);

	impl ContentReader for Fixed {
		fn open_content(&self, _path: &Path) -> io::Result<Box<dyn Read + '_>> {
			Ok(Box::new(Cursor::new(self.0.as_slice())))
		}
	}

	/// Hands out at most four bytes per read.
	struct Trickle<'a>(&'a [u8]);

	impl Read for Trickle<'_> {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			let count = buf.len().min(4).min(self.0.len());
			buf[..count].copy_from_slice(&self.0[..count]);
			self.0 = &self.0[count..];
			Ok(count)
		}
	}

	struct Trickled(Vec<u8>);

	impl ContentReader for Trickled {
		fn open_content(&self, _path: &Path) -> io::Result<Box<dyn Read + '_>> {
			Ok(Box::new(Trickle(self.0.as_slice())))
		}
	}

	struct Unreadable;

	impl ContentReader for Unreadable {
		fn open_content(&self, _path: &Path) -> io::Result<Box<dyn Read + '_>> {
			Err(io::Error::from(io::ErrorKind::PermissionDenied))
		}
	}

	const ALL: u64 = u64::MAX;

	fn probe<'a>(reader: &'a dyn ContentReader, token: &'a CancellationToken) -> ContentProbe<'a> {
		ContentProbe {
			reader,
			path: Path::new("file.txt"),
			token,
		}
	}

	#[test]
	fn finds_needle_across_read_boundary() {
		let reader = Trickled(b"xxneedlexx".to_vec());
		let token = CancellationToken::new();
		assert!(contains_bytes(&probe(&reader, &token), b"needle", false, ALL));
	}

	#[test]
	fn case_insensitive_search_lowercases_haystack() {
		let reader = Fixed(b"Hello World".to_vec());
		let token = CancellationToken::new();
		assert!(contains_bytes(&probe(&reader, &token), b"world", true, ALL));
		assert!(!contains_bytes(&probe(&reader, &token), b"world", false, ALL));
	}

	#[test]
	fn respects_max_bytes() {
		let reader = Fixed(b"0123456789 needle".to_vec());
		let token = CancellationToken::new();
		assert!(!contains_bytes(&probe(&reader, &token), b"needle", false, 10));
		assert!(contains_bytes(&probe(&reader, &token), b"needle", false, 17));
	}

	#[test]
	fn binary_files_never_match() {
		let reader = Fixed(b"\0\x01needle".to_vec());
		let token = CancellationToken::new();
		assert!(!contains_bytes(&probe(&reader, &token), b"needle", false, ALL));
		let regex = Regex::new("needle").expect("regex");
		assert!(!regex_matches(&probe(&reader, &token), &regex, ALL));
	}

	#[test]
	fn cancelled_probe_reports_no_match() {
		let reader = Fixed(b"needle".to_vec());
		let token = CancellationToken::new();
		token.cancel();
		assert!(!contains_bytes(&probe(&reader, &token), b"needle", false, ALL));
	}

	#[test]
	fn unreadable_files_do_not_match() {
		let token = CancellationToken::new();
		let regex = Regex::new("x").expect("regex");
		assert!(!regex_matches(&probe(&Unreadable, &token), &regex, ALL));
	}

	#[test]
	fn regex_runs_over_prefix() {
		let reader = Fixed(b"fn main() {}\n".to_vec());
		let token = CancellationToken::new();
		let regex = Regex::new(r"fn\s+main").expect("regex");
		assert!(regex_matches(&probe(&reader, &token), &regex, ALL));
	}
}
