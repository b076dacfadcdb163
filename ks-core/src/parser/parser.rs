use crate::{lexer::prelude::{tokenize, LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::Program;

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: super::ast::Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,
    pub lex_errors: Vec<LexicalError>,

    last_end: u32,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],
            lex_errors: vec![],

            last_end: 0,
            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    /// Advances by one token and returns the one that was current.
    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        loop {
            match self.tokens.next() {
                Some(Ok((start, Token::Comment, end))) => {
                    self.comments.push(SrcSpan { start, end })
                },
                Some(Err(err)) => {
                    self.lex_errors.push(err);

                    break;
                },
                Some(Ok(tok)) => {
                    next = Some(tok);

                    break;
                },
                None => {
                    break;
                }
            }
        }

        if let Some((_, _, end)) = &t {
            self.last_end = *end;
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn current_is(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, tok, _)) if tok == token)
    }

    /// End offset of the most recently consumed token.
    pub fn last_end(&self) -> u32 {
        self.last_end
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let program = Program::parse(self, None);

        if let Some(lex_error) = self.lex_errors.first() {
            // a syntax error strictly before the bad character still wins
            if let Err(err) = &program {
                if err.error != ParseErrorType::UnexpectedEof && err.span.start < lex_error.location.start {
                    return program;
                }
            }

            return parse_error(
                ParseErrorType::LexError {
                    error: *lex_error
                },
                lex_error.location
            );
        }

        program
    }

    /// Error for the current token, which is not any of `expected`.
    pub fn unexpected<R>(&self, expected: Vec<String>) -> Result<R, ParseError> {
        match &self.current_token {
            Some((start, Token::Eof, end)) => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: *start, end: *end }
            ),
            Some((start, token, end)) => parse_error(
                ParseErrorType::UnexpectedToken {
                    token: token.clone(),
                    expected,
                },
                SrcSpan { start: *start, end: *end }
            ),
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: self.last_end, end: self.last_end }
            )
        }
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.current_token = Some((start, tok, end));
                self.step();
                Ok((start, end))
            },
            t => {
                self.current_token = t;

                self.unexpected(vec![format!("`{}`", token.as_literal())])
            }
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.current_token = Some((start, Token::Ident(value.clone()), end));
                self.step();
                Ok((start, value, end))
            },
            Some((start, tok, end)) if tok != Token::Eof => {
                self.current_token = Some((start, tok, end));

                parse_error(
                    ParseErrorType::ExpectedIdent,
                    SrcSpan { start, end }
                )
            },
            t => {
                self.current_token = t;

                self.unexpected(vec!["an identifier".to_string()])
            }
        }
    }

    /// Consumes the `;` closing a simple statement and returns its end.
    pub fn expect_semicolon(&mut self) -> Result<u32, ParseError> {
        match &self.current_token {
            Some((_, Token::Semicolon, end)) => {
                let end = *end;
                self.step();
                Ok(end)
            },
            None => self.unexpected(vec!["`;`".to_string()]),
            Some(_) => {
                let end = self.last_end;

                parse_error(
                    ParseErrorType::MissingSemicolon,
                    SrcSpan { start: end, end }
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call
}

pub fn parse_program(src: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokenize(src));

    parser.parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Result<Program, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Assign => Self::Assign,
            Token::Or => Self::Or,
            Token::And => Self::And,
            Token::Equal | Token::NotEqual => Self::Equals,
            Token::LessThan | Token::GreaterThan |
            Token::LessThanOrEqual | Token::GreaterThanOrEqual => Self::LessGreater,
            Token::Plus | Token::Minus => Self::Sum,
            Token::Star | Token::Slash | Token::Percent => Self::Product,
            Token::LParen | Token::LSBracket => Self::Call,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
