use std::{
    io::{BufReader, Read},
    path::{Path, PathBuf}
};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::Value,
    eval::prelude::Interpreter,
    parser::prelude::{parse_program, parse_program_from_stream, Program}
};

pub use crate::utils::error::Error;

/// Lexes and parses a file without running it.
pub fn check(path: PathBuf) -> Result<Program, Error> {
    let src = std::fs::read_to_string(&path)?;

    parse_program(&src).map_err(|error| Error::Parse { path, src, error })
}

/// Parses and evaluates `src` in the interpreter's session.
pub fn run_source(path: &Path, src: &str, interpreter: &mut Interpreter) -> Result<Value, Error> {
    let program = parse_program(src).map_err(|error| Error::Parse {
        path: path.to_path_buf(),
        src: src.to_string(),
        error,
    })?;

    interpreter.evaluate(&program).map_err(|error| Error::Runtime {
        path: path.to_path_buf(),
        src: src.to_string(),
        error,
    })
}

/// Like [`run_source`], but lexes the file as a character stream while it
/// is being read.
pub fn run(path: PathBuf, interpreter: &mut Interpreter) -> Result<Value, Error> {
    let (program, src) = parse_from_stream(&path)?;

    interpreter.evaluate(&program).map_err(|error| Error::Runtime { path, src, error })
}

fn parse_from_stream(path: &Path) -> Result<(Program, String), Error> {
    let file = std::fs::File::open(path)?;

    let file_size = file.metadata()?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = BufReader::new(file);
    let mut io_error = None;

    let parsed = {
        let stream = reader.chars()
            .map_while(|ch| match ch {
                Ok(ch) => {
                    src.push(ch);
                    Some(ch)
                },
                Err(err) => {
                    io_error = Some(err);
                    None
                }
            });

        parse_program_from_stream(stream)
    };

    if let Some(err) = io_error {
        return Err(err.into());
    }

    match parsed {
        Ok(program) => Ok((program, src)),
        Err(error) => {
            // the parser stops early, the diagnostic wants the whole file
            reader.read_to_string(&mut src)?;

            Err(Error::Parse { path: path.to_path_buf(), src, error })
        }
    }
}

/// Splits `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_env_pair(entry: &str) -> Option<(String, String)> {
    let (key, value) = entry.split_once('=')?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), value.trim().to_string()))
}

/// Reads `KEY=VALUE` lines, skipping blank lines and `#` or `//` comments.
pub fn parse_env_assignments(path: &Path, src: &str) -> Result<Vec<(String, String)>, Error> {
    let mut vars = vec![];

    for (idx, line) in src.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        match parse_env_pair(line) {
            Some(pair) => vars.push(pair),
            None => return Err(Error::EnvEntry {
                path: path.to_path_buf(),
                line: idx + 1,
                entry: line.to_string(),
            })
        }
    }

    Ok(vars)
}

pub fn load_env_file(path: PathBuf) -> Result<Vec<(String, String)>, Error> {
    let src = std::fs::read_to_string(&path)?;

    parse_env_assignments(&path, &src)
}
