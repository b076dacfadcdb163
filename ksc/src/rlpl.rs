use ks_core::{
	lexer::prelude::{tokenize, Token},
	utils::prelude::Position
};

use crate::cli::read_line;

const PROMPT: &str = "lex> ";

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				for res in tokenize(&input) {
					match res {
						Ok((start, token, end)) => {
							println!("{start}..{end} {:?} {token:?}", token.kind());

							if token == Token::Eof {
								break;
							}
						},
						Err(err) => {
							let (message, notes) = err.details();
							let position = Position::of_offset(&input, err.location.start);

							println!("[at {position}] Lexical error: {message}");
							if !notes.is_empty() {
								println!("{}", notes.join("\n"));
							}
							break;
						}
					}
				}
			}
		}
	}

	Ok(())
}
