use thiserror::Error;

use crate::{lexer::prelude::{LexicalError, Token, TokenKind}, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("expected an identifier")]
    ExpectedIdent,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected {token}")]
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    #[error("missing semicolon")]
    MissingSemicolon,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("duplicate parameter `{name}`")]
    DuplicateParameter { name: String },
    #[error("{error}")]
    LexError { error: LexicalError },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected an identifier here", vec![]),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token.kind() {
                    TokenKind::Number => "a Number".to_string(),
                    TokenKind::String => "a String".to_string(),
                    TokenKind::Identifier => format!("the identifier `{}`", token.as_literal()),
                    TokenKind::Keyword => format!("the keyword `{}`", token.as_literal()),
                    _ => format!("`{}`", token.as_literal())
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::MissingSemicolon => ("Missing semicolon", vec![
                "Every statement except blocks, `if`, loops and function declarations ends with `;`".to_string()
            ]),
            ParseErrorType::InvalidAssignmentTarget => ("Cannot assign to this", vec![
                "Only variables and index expressions like `a[i]` can be assigned".to_string()
            ]),
            ParseErrorType::DuplicateParameter { name } => ("Parameter declared twice", vec![
                format!("`{name}` already appears earlier in this parameter list")
            ]),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}
