use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan
};
use super::diagnostic::{Diagnostic, Label, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("evaluation failed")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("invalid environment entry on line {line}")]
    EnvEntry {
        path: PathBuf,
        line: usize,
        entry: String
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo { err: value.kind() }
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        match self.pretty(&mut nocolor) {
            Ok(()) => String::from_utf8_lossy(&nocolor.into_inner()).into_owned(),
            Err(_) => self.summary()
        }
    }

    pub fn pretty(&self, buf: &mut Buffer) -> std::io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    /// One line, `path:line:column: message`.
    pub fn summary(&self) -> String {
        match self {
            Error::Parse { path, src, error } => {
                format!("{}:{}: {}", path.display(), error.span.position(src), error)
            },
            Error::Runtime { path, src, error } => {
                format!("{}:{}: {}", path.display(), error.span.position(src), error)
            },
            Error::EnvEntry { path, line, entry } => {
                format!("{}:{line}: expected KEY=VALUE, found `{entry}`", path.display())
            },
            Error::StdIo { err } => format!("io error: {err}")
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic<'_>> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();

                let (title, span) = match &error.error {
                    ParseErrorType::LexError { .. } => ("Lexical error", error.span),
                    ParseErrorType::UnexpectedEof => ("Syntax error", SrcSpan {
                        start: src.len() as u32,
                        end: src.len() as u32,
                    }),
                    _ => ("Syntax error", error.span)
                };

                vec![Diagnostic {
                    title: title.into(),
                    text: std::iter::once(error.to_string()).chain(extra).collect::<Vec<_>>().join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                let title = match error.error.is_type_error() {
                    true => "Type error",
                    false => "Runtime error"
                };

                vec![Diagnostic {
                    title: title.into(),
                    text: std::iter::once(error.to_string()).chain(extra).collect::<Vec<_>>().join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::EnvEntry { path, line, entry } => {
                vec![Diagnostic {
                    title: "Invalid environment entry".into(),
                    text: format!("{}:{line}: expected `KEY=VALUE`, found `{entry}`", path.display()),
                    location: None,
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    location: None,
                }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        environment::prelude::ValueType,
        eval::prelude::RuntimeErrorType,
        parser::prelude::parse_program
    };

    use super::*;

    fn parse_failure(src: &str) -> Error {
        Error::Parse {
            path: PathBuf::from("test.ks"),
            src: src.to_string(),
            error: parse_program(src).unwrap_err(),
        }
    }

    #[test]
    fn test_summary_has_position() {
        assert_eq!(parse_failure("var = ;").summary(), "test.ks:1:5: expected an identifier");

        let runtime = Error::Runtime {
            path: PathBuf::from("test.ks"),
            src: "var x;\nx();".to_string(),
            error: RuntimeError::new(
                RuntimeErrorType::UndefinedVariable { name: "y".into() },
                SrcSpan::from(7, 8)
            ),
        };
        assert_eq!(runtime.summary(), "test.ks:2:1: undefined variable `y`");
    }

    #[test]
    fn test_pretty_titles() {
        let pretty = parse_failure("var = ;").pretty_string();
        assert!(pretty.contains("error: Syntax error"), "{pretty}");
        assert!(pretty.contains("test.ks:1:5"), "{pretty}");

        let lexical = parse_failure("var s = \"open").pretty_string();
        assert!(lexical.contains("Lexical error"), "{lexical}");

        let eof = parse_failure("var x = (1 + 2").pretty_string();
        assert!(eof.contains("unexpected end of input"), "{eof}");

        let runtime = Error::Runtime {
            path: PathBuf::from("test.ks"),
            src: "1 / 0;".to_string(),
            error: RuntimeError::new(RuntimeErrorType::DivisionByZero, SrcSpan::from(0, 5)),
        };
        assert!(runtime.pretty_string().contains("Runtime error"));

        let type_error = Error::Runtime {
            path: PathBuf::from("test.ks"),
            src: "1 + true;".to_string(),
            error: RuntimeError::new(RuntimeErrorType::ExpectedBoolean { found: ValueType::Number }, SrcSpan::from(0, 8)),
        };
        assert!(type_error.pretty_string().contains("Type error"));
    }

    #[test]
    fn test_io_error() {
        let error = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));

        assert_eq!(error, Error::StdIo { err: std::io::ErrorKind::NotFound });
        assert!(error.pretty_string().contains("Standard IO error"));
    }
}
