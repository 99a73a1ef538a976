//! Query tokenizer and recursive-descent parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or      := and ('|' and)*
//! and     := not ('&' not)*
//! not     := '!' not | primary
//! primary := '(' or ')' | term
//! ```

use super::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TermKind {
	Fuzzy,
	Exact,
	Regex { flags: String },
	ContentExact,
	ContentRegex { flags: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Term {
	pub(super) kind: TermKind,
	pub(super) text: String,
	pub(super) position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
	LParen,
	RParen,
	Bang,
	And,
	Or,
	Term(Term),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
	kind: TokenKind,
	position: usize,
}

/// Parsed query before the leaves are compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Expr {
	Term(Term),
	Not(Box<Expr>),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
}

pub(super) fn parse(input: &str) -> Result<Expr, PatternError> {
	let tokens = tokenize(input)?;
	let mut parser = Parser { tokens, index: 0 };
	let expr = parser.parse_or()?;
	if let Some(token) = parser.peek() {
		return Err(match token.kind {
			TokenKind::RParen => PatternError::UnbalancedParenthesis {
				position: token.position,
			},
			_ => PatternError::UnexpectedToken {
				position: token.position,
			},
		});
	}
	Ok(expr)
}

struct Parser {
	tokens: Vec<Token>,
	index: usize,
}

impl Parser {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.index)
	}

	fn end_position(&self) -> usize {
		self.tokens
			.last()
			.map_or(0, |token| token.position + 1)
	}

	fn consume(&mut self, kind: &TokenKind) -> bool {
		if self.peek().is_some_and(|token| &token.kind == kind) {
			self.index += 1;
			true
		} else {
			false
		}
	}

	fn parse_or(&mut self) -> Result<Expr, PatternError> {
		let mut left = self.parse_and()?;
		while self.consume(&TokenKind::Or) {
			let right = self.parse_and()?;
			left = Expr::Or(Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn parse_and(&mut self) -> Result<Expr, PatternError> {
		let mut left = self.parse_not()?;
		while self.consume(&TokenKind::And) {
			let right = self.parse_not()?;
			left = Expr::And(Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn parse_not(&mut self) -> Result<Expr, PatternError> {
		if self.consume(&TokenKind::Bang) {
			let inner = self.parse_not()?;
			return Ok(Expr::Not(Box::new(inner)));
		}
		self.parse_primary()
	}

	fn parse_primary(&mut self) -> Result<Expr, PatternError> {
		let Some(token) = self.peek().cloned() else {
			return Err(PatternError::MissingOperand {
				position: self.end_position(),
			});
		};
		self.index += 1;
		match token.kind {
			TokenKind::Term(term) => Ok(Expr::Term(term)),
			TokenKind::LParen => {
				let inner = self.parse_or()?;
				if self.consume(&TokenKind::RParen) {
					Ok(inner)
				} else {
					Err(PatternError::UnbalancedParenthesis {
						position: token.position,
					})
				}
			}
			TokenKind::RParen => Err(PatternError::UnbalancedParenthesis {
				position: token.position,
			}),
			TokenKind::And | TokenKind::Or | TokenKind::Bang => {
				Err(PatternError::MissingOperand {
					position: token.position,
				})
			}
		}
	}
}

fn tokenize(input: &str) -> Result<Vec<Token>, PatternError> {
	let chars: Vec<(usize, char)> = input.char_indices().collect();
	let mut tokens = Vec::new();
	let mut i = 0;

	while i < chars.len() {
		let (position, c) = chars[i];
		let simple = match c {
			'(' => Some(TokenKind::LParen),
			')' => Some(TokenKind::RParen),
			'!' => Some(TokenKind::Bang),
			'&' => Some(TokenKind::And),
			'|' => Some(TokenKind::Or),
			_ => None,
		};
		if let Some(kind) = simple {
			tokens.push(Token { kind, position });
			i += 1;
			continue;
		}
		if c.is_whitespace() {
			i += 1;
			continue;
		}

		let (term, next) = lex_term(&chars, i)?;
		tokens.push(Token {
			kind: TokenKind::Term(term),
			position,
		});
		i = next;
	}

	Ok(tokens)
}

fn starts_with_at(chars: &[(usize, char)], at: usize, prefix: &str) -> bool {
	prefix
		.chars()
		.enumerate()
		.all(|(offset, expected)| chars.get(at + offset).is_some_and(|(_, c)| *c == expected))
}

fn lex_term(chars: &[(usize, char)], start: usize) -> Result<(Term, usize), PatternError> {
	let position = chars[start].0;
	if starts_with_at(chars, start, "cr/") {
		let (text, flags, next) = lex_delimited(chars, start + 3)?;
		return Ok((
			Term {
				kind: TermKind::ContentRegex { flags },
				text,
				position,
			},
			next,
		));
	}
	if starts_with_at(chars, start, "c/") {
		let (text, flags, next) = lex_delimited(chars, start + 2)?;
		if let Some(flag) = flags.chars().next() {
			return Err(PatternError::UnknownFlag { flag });
		}
		return Ok((
			Term {
				kind: TermKind::ContentExact,
				text,
				position,
			},
			next,
		));
	}
	if chars[start].1 == '/' {
		let (text, flags, next) = lex_delimited(chars, start + 1)?;
		return Ok((
			Term {
				kind: TermKind::Regex { flags },
				text,
				position,
			},
			next,
		));
	}

	let (kind, body_start) = if chars[start].1 == '=' {
		(TermKind::Exact, start + 1)
	} else {
		(TermKind::Fuzzy, start)
	};
	let mut end = body_start;
	while end < chars.len() && !matches!(chars[end].1, '(' | ')' | '&' | '|') {
		end += 1;
	}
	let text: String = chars[body_start..end].iter().map(|(_, c)| *c).collect();
	let text = text.trim().to_string();
	if text.is_empty() {
		return Err(PatternError::MissingOperand { position });
	}
	Ok((
		Term {
			kind,
			text,
			position,
		},
		end,
	))
}

/// Read a `/`-terminated body (with `\/` as an escaped slash) followed by
/// optional flag letters. The closing slash may be missing at end of input.
fn lex_delimited(
	chars: &[(usize, char)],
	start: usize,
) -> Result<(String, String, usize), PatternError> {
	let mut body = String::new();
	let mut i = start;
	let mut closed = false;
	while i < chars.len() {
		let c = chars[i].1;
		if c == '\\' && chars.get(i + 1).is_some_and(|(_, next)| *next == '/') {
			body.push('/');
			i += 2;
			continue;
		}
		if c == '/' {
			closed = true;
			i += 1;
			break;
		}
		body.push(c);
		i += 1;
	}

	let mut flags = String::new();
	if closed {
		while i < chars.len() && chars[i].1.is_ascii_alphabetic() {
			flags.push(chars[i].1);
			i += 1;
		}
	}
	if body.is_empty() {
		let position = chars.get(start).map_or_else(
			|| chars.last().map_or(0, |(pos, _)| pos + 1),
			|(pos, _)| *pos,
		);
		return Err(PatternError::MissingOperand { position });
	}
	Ok((body, flags, i))
}
