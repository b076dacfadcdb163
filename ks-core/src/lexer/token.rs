use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // [A-Za-z_][A-Za-z0-9_]*
    Ident(String),
    // digits [. digits] [(e|E) [+|-] digits]
    Number(f64),
    // "..." with escapes already resolved
    String(String),
    // // line, # line, /* block */
    Comment,

    // Keywords
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    True,
    False,
    Null,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Logic
    And,
    Or,
    Bang,

    Assign,

    // Punctuation
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LSBracket,
    RSBracket,

    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    Operator,
    Punctuation,
    Comment,
    EndOfInput,
}

pub fn str_to_keyword(word: &str) -> Option<Token> {
    Some(match word {
        "var" => Token::Var,
        "function" => Token::Function,
        "return" => Token::Return,
        "if" => Token::If,
        "else" => Token::Else,
        "while" => Token::While,
        "for" => Token::For,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "true" => Token::True,
        "false" => Token::False,
        "null" => Token::Null,
        _ => return None,
    })
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Ident(_) => TokenKind::Identifier,
            Token::Number(_) => TokenKind::Number,
            Token::String(_) => TokenKind::String,
            Token::Comment => TokenKind::Comment,
            Token::Eof => TokenKind::EndOfInput,
            _ if self.is_reserved_word() => TokenKind::Keyword,
            _ if self.is_operator() => TokenKind::Operator,
            _ => TokenKind::Punctuation,
        }
    }

    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            Token::Var
                | Token::Function
                | Token::Return
                | Token::If
                | Token::Else
                | Token::While
                | Token::For
                | Token::Break
                | Token::Continue
                | Token::True
                | Token::False
                | Token::Null
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::Equal
                | Token::NotEqual
                | Token::LessThan
                | Token::LessThanOrEqual
                | Token::GreaterThan
                | Token::GreaterThanOrEqual
                | Token::And
                | Token::Or
                | Token::Bang
                | Token::Assign
        )
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Number(value) => format_number(*value),
            Token::String(value) => format!("\"{}\"", escape(value)),
            Token::Comment => "comment".to_string(),

            Token::Var => "var".to_string(),
            Token::Function => "function".to_string(),
            Token::Return => "return".to_string(),
            Token::If => "if".to_string(),
            Token::Else => "else".to_string(),
            Token::While => "while".to_string(),
            Token::For => "for".to_string(),
            Token::Break => "break".to_string(),
            Token::Continue => "continue".to_string(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::Null => "null".to_string(),

            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Percent => "%".to_string(),
            Token::Equal => "==".to_string(),
            Token::NotEqual => "!=".to_string(),
            Token::LessThan => "<".to_string(),
            Token::LessThanOrEqual => "<=".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::GreaterThanOrEqual => ">=".to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Bang => "!".to_string(),
            Token::Assign => "=".to_string(),

            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),
            Token::Semicolon => ";".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::LSBracket => "[".to_string(),
            Token::RSBracket => "]".to_string(),

            Token::Eof => "end of input".to_string(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

/// Number literal text that lexes back to `value`. Literals too large for
/// an `f64` hold infinity, which is written with an overflowing exponent.
pub fn format_number(value: f64) -> String {
    match value {
        value if value == f64::INFINITY => "1e999".to_string(),
        value => format!("{value}")
    }
}

/// Inverse of the lexer's escape handling.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            ch => escaped.push(ch),
        }
    }

    escaped
}
