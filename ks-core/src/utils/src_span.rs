use std::fmt::Display;

/// Byte range into the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	/// Line and column (both 1-based, column counted in chars) of `start`.
	pub fn position(&self, src: &str) -> Position {
		Position::of_offset(src, self.start)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
	pub line: u32,
	pub column: u32,
}

impl Position {
	pub fn of_offset(src: &str, offset: u32) -> Self {
		let mut line = 1;
		let mut column = 1;

		for (idx, ch) in src.char_indices() {
			if idx as u32 >= offset {
				break;
			}

			if ch == '\n' {
				line += 1;
				column = 1;
			} else {
				column += 1;
			}
		}

		Self { line, column }
	}
}

impl Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}
