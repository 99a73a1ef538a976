use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "> ";

/// Single-line query editor.
#[derive(Debug, Clone, Default)]
pub struct QueryInput {
	text: String,
	/// Cursor position as a byte offset on a char boundary.
	cursor: usize,
}

impl QueryInput {
	#[must_use]
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let cursor = text.len();
		Self { text, cursor }
	}

	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Apply an editing key. Returns whether the text changed.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Char('u') if ctrl => {
				let changed = !self.text.is_empty();
				self.text.clear();
				self.cursor = 0;
				changed
			}
			KeyCode::Char('w') if ctrl => self.delete_word(),
			KeyCode::Char('a') if ctrl => {
				self.cursor = 0;
				false
			}
			KeyCode::Char('e') if ctrl => {
				self.cursor = self.text.len();
				false
			}
			KeyCode::Char(_) if ctrl => false,
			KeyCode::Char(ch) => {
				self.text.insert(self.cursor, ch);
				self.cursor += ch.len_utf8();
				true
			}
			KeyCode::Backspace => match self.previous_boundary() {
				Some(start) => {
					self.text.replace_range(start..self.cursor, "");
					self.cursor = start;
					true
				}
				None => false,
			},
			KeyCode::Delete => match self.next_boundary() {
				Some(end) => {
					self.text.replace_range(self.cursor..end, "");
					true
				}
				None => false,
			},
			KeyCode::Left => {
				if let Some(start) = self.previous_boundary() {
					self.cursor = start;
				}
				false
			}
			KeyCode::Right => {
				if let Some(end) = self.next_boundary() {
					self.cursor = end;
				}
				false
			}
			_ => false,
		}
	}

	fn previous_boundary(&self) -> Option<usize> {
		self.text[..self.cursor]
			.char_indices()
			.next_back()
			.map(|(index, _)| index)
	}

	fn next_boundary(&self) -> Option<usize> {
		self.text[self.cursor..]
			.chars()
			.next()
			.map(|ch| self.cursor + ch.len_utf8())
	}

	fn delete_word(&mut self) -> bool {
		let before = &self.text[..self.cursor];
		let trimmed = before.trim_end();
		let start = trimmed
			.char_indices()
			.rev()
			.find(|(_, ch)| ch.is_whitespace())
			.map_or(0, |(index, ch)| index + ch.len_utf8());
		if start == self.cursor {
			return false;
		}
		self.text.replace_range(start..self.cursor, "");
		self.cursor = start;
		true
	}

	/// Draw the prompt row and place the terminal cursor.
	pub fn render(&self, frame: &mut Frame, area: Rect) {
		if area.is_empty() {
			return;
		}
		let line = Line::from(vec![
			Span::styled(
				PROMPT,
				Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
			),
			Span::raw(self.text.as_str()),
		]);
		frame.buffer_mut().set_line(area.x, area.y, &line, area.width);

		let column = PROMPT.width() + self.text[..self.cursor].width();
		let x = area.x.saturating_add(u16::try_from(column).unwrap_or(u16::MAX));
		frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn ctrl(ch: char) -> KeyEvent {
		KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
	}

	fn typed(text: &str) -> QueryInput {
		let mut input = QueryInput::default();
		for ch in text.chars() {
			input.input(key(KeyCode::Char(ch)));
		}
		input
	}

	#[test]
	fn typing_and_backspace_edit_at_cursor() {
		let mut input = typed("ab");
		assert!(!input.input(key(KeyCode::Left)));
		assert!(input.input(key(KeyCode::Char('é'))));
		assert_eq!(input.text(), "aéb");
		assert!(input.input(key(KeyCode::Backspace)));
		assert_eq!(input.text(), "ab");
		assert!(input.input(key(KeyCode::Delete)));
		assert_eq!(input.text(), "a");
		assert!(!input.input(key(KeyCode::Delete)));
	}

	#[test]
	fn control_keys_do_not_insert() {
		let mut input = typed("foo bar");
		assert!(!input.input(ctrl('x')));
		assert!(input.input(ctrl('w')));
		assert_eq!(input.text(), "foo ");
		assert!(input.input(ctrl('u')));
		assert_eq!(input.text(), "");
		assert!(!input.input(key(KeyCode::Backspace)));
	}

	#[test]
	fn initial_text_places_cursor_at_end() {
		let mut input = QueryInput::new("ab");
		input.input(key(KeyCode::Char('c')));
		assert_eq!(input.text(), "abc");
	}
}
