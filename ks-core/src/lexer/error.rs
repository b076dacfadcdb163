use thiserror::Error;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    #[error("unrecognized character `{tok}`")]
    UnrecognizedToken { tok: char },
    #[error("missing digit after the decimal point")]
    MissingDigitAfterPeriod,
    #[error("missing digits after the exponent")]
    MissingDigitsAfterExponent,
    #[error("more than one decimal point in a number")]
    MultipleFloatingPoints,
    #[error("unknown escape sequence `\\{ch}`")]
    InvalidEscape { ch: char },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    MissingCommentEnd,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{error}")]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("I don't know what to do with this character", vec![
                    format!("Found `{}` (U+{:04X})", tok.escape_debug(), tok as u32)
                ])
            },
            LexicalErrorType::MissingDigitAfterPeriod => {
                ("Expected a digit after the decimal point", vec![])
            },
            LexicalErrorType::MissingDigitsAfterExponent => {
                ("Expected digits after the exponent", vec![])
            },
            LexicalErrorType::MultipleFloatingPoints => {
                ("A number can contain only one decimal point", vec![])
            },
            LexicalErrorType::InvalidEscape { .. } => {
                ("Unknown escape sequence", vec![
                    "Supported escapes: \\n \\t \\r \\0 \\\\ \\\" \\'".to_string()
                ])
            },
            LexicalErrorType::UnterminatedString => {
                ("This string is never closed", vec![])
            },
            LexicalErrorType::MissingCommentEnd => {
                ("Missing the closing `*/` of this comment", vec![])
            }
        }
    }
}
