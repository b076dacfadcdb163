use ks_core::parser::prelude::parse_program;

use crate::cli::read_line;

const PROMPT: &str = "parse> ";

pub fn start(print_ast: bool) -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				match parse_program(&input) {
					Ok(program) if print_ast => println!("{program:#?}"),
					Ok(program) => println!("{program}"),
					Err(err) => {
						let (message, messages) = err.details();
						let position = err.span.position(&input);

						println!("[at {position}] Parse error: {err}. {message}");
						if !messages.is_empty() {
							println!("\t{}", messages.join("\n\t"));
						}
					}
				}
			}
		}
	}

	Ok(())
}
