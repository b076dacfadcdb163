use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token};
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

/// Lexes `src` lazily. Offsets in the produced spans are byte offsets.
pub fn tokenize(src: &str) -> Lexer<impl Iterator<Item = (u32, char)> + '_> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	ch: Option<char>,
	next_ch: Option<(u32, char)>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(mut input: T) -> Self {
		let next_ch = input.next();

		let mut lexer = Self {
			position: 0,
			ch: None,
			next_ch,
			input,
			finished: false,
		};

		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		loop {
			match self.ch {
				Some(' ' | '\t' | '\n' | '\r' | '\x0C') => {
					self.next_char();
				},
				_ => break
			}
		}

		let span = match self.ch {
			Some(ch) => match ch {
				'/' if self.peek() == Some('/') => return Ok(self.lex_line_comment()),
				'/' if self.peek() == Some('*') => return self.lex_block_comment(),
				'#' => return Ok(self.lex_line_comment()),
				'"' => return self.lex_string(),

				'=' if self.peek() == Some('=') => self.eat_two_chars(Token::Equal),
				'!' if self.peek() == Some('=') => self.eat_two_chars(Token::NotEqual),
				'<' if self.peek() == Some('=') => self.eat_two_chars(Token::LessThanOrEqual),
				'>' if self.peek() == Some('=') => self.eat_two_chars(Token::GreaterThanOrEqual),
				'&' if self.peek() == Some('&') => self.eat_two_chars(Token::And),
				'|' if self.peek() == Some('|') => self.eat_two_chars(Token::Or),

				'=' => self.eat_one_char(Token::Assign),
				'!' => self.eat_one_char(Token::Bang),
				'<' => self.eat_one_char(Token::LessThan),
				'>' => self.eat_one_char(Token::GreaterThan),
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Star),
				'/' => self.eat_one_char(Token::Slash),
				'%' => self.eat_one_char(Token::Percent),
				',' => self.eat_one_char(Token::Comma),
				':' => self.eat_one_char(Token::Colon),
				';' => self.eat_one_char(Token::Semicolon),
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				'[' => self.eat_one_char(Token::LSBracket),
				']' => self.eat_one_char(Token::RSBracket),

				'a'..='z' | 'A'..='Z' | '_' => {
					return Ok(self.lex_ident());
				},
				'0'..='9' => {
					return self.lex_number();
				},
				c => {
					let start = self.position;
					let end = start + c.len_utf8() as u32;

					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: SrcSpan { start, end },
					});
				}
			},
			None => (self.position, Token::Eof, self.position)
		};

		Ok(span)
	}

	fn peek(&self) -> Option<char> {
		self.next_ch.map(|(_, ch)| ch)
	}

	fn next_char(&mut self) -> Option<char> {
		let current = self.ch.take();
		let end_of_current = self.position + current.map_or(0, |c| c.len_utf8() as u32);

		match self.next_ch.take() {
			Some((pos, ch)) => {
				self.position = pos;
				self.ch = Some(ch);
			},
			None => {
				self.position = end_of_current;
			}
		}

		self.next_ch = self.input.next();

		current
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_two_chars(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch.filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_') {
			ident.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		match str_to_keyword(&ident) {
			Some(tok) => (start_pos, tok, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
		}
	}

	fn eat_digits(&mut self, value: &mut String) -> usize {
		let mut count = 0;

		while let Some(ch) = self.ch.filter(char::is_ascii_digit) {
			value.push(ch);
			self.next_char();
			count += 1;
		}

		count
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		self.eat_digits(&mut value);

		if self.ch == Some('.') {
			value.push('.');
			self.next_char();

			if self.eat_digits(&mut value) == 0 {
				return Err(LexicalError {
					error: LexicalErrorType::MissingDigitAfterPeriod,
					location: SrcSpan::from(start_pos, self.position)
				});
			}

			if self.ch == Some('.') && self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
				self.next_char();

				return Err(LexicalError {
					error: LexicalErrorType::MultipleFloatingPoints,
					location: SrcSpan::from(start_pos, self.position)
				});
			}
		}

		if matches!(self.ch, Some('e' | 'E')) {
			value.push('e');
			self.next_char();

			if let Some(sign @ ('+' | '-')) = self.ch {
				value.push(sign);
				self.next_char();
			}

			if self.eat_digits(&mut value) == 0 {
				return Err(LexicalError {
					error: LexicalErrorType::MissingDigitsAfterExponent,
					location: SrcSpan::from(start_pos, self.position)
				});
			}
		}

		let end_pos = self.position;

		// the accepted shape is always a valid f64 literal
		let number = value.parse::<f64>().unwrap_or(f64::NAN);

		Ok((start_pos, Token::Number(number), end_pos))
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		self.next_char(); // opening quote

		loop {
			match self.ch {
				Some('"') => {
					self.next_char();
					break;
				},
				Some('\\') => {
					let escape_pos = self.position;
					self.next_char();

					let escaped = match self.ch {
						Some('n') => '\n',
						Some('t') => '\t',
						Some('r') => '\r',
						Some('0') => '\0',
						Some('\\') => '\\',
						Some('"') => '"',
						Some('\'') => '\'',
						Some(ch) if ch != '\n' => {
							let end = self.position + ch.len_utf8() as u32;

							return Err(LexicalError {
								error: LexicalErrorType::InvalidEscape { ch },
								location: SrcSpan::from(escape_pos, end)
							});
						},
						_ => return Err(LexicalError {
							error: LexicalErrorType::UnterminatedString,
							location: SrcSpan::from(start_pos, self.position)
						})
					};

					value.push(escaped);
					self.next_char();
				},
				Some('\n') | None => {
					return Err(LexicalError {
						error: LexicalErrorType::UnterminatedString,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some(ch) => {
					value.push(ch);
					self.next_char();
				}
			}
		}

		Ok((start_pos, Token::String(value), self.position))
	}

	fn lex_line_comment(&mut self) -> Spanned {
		let start_pos = self.position;

		while !matches!(self.ch, Some('\n') | None) {
			self.next_char();
		}

		(start_pos, Token::Comment, self.position)
	}

	fn lex_block_comment(&mut self) -> LexResult {
		let start_pos = self.position;

		self.next_char(); // skip /
		self.next_char(); // skip *

		while !(self.ch == Some('*') && self.peek() == Some('/')) {
			if self.next_char().is_none() {
				return Err(LexicalError {
					error: LexicalErrorType::MissingCommentEnd,
					location: SrcSpan::from(start_pos, self.position)
				})
			};
		}

		self.next_char(); // skip *
		self.next_char(); // skip /

		Ok((start_pos, Token::Comment, self.position))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	/// Yields tokens up to and including a single `Eof`, or up to the first
	/// error; `None` afterwards.
	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}
