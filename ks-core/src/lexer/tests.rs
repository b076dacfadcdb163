use pretty_assertions::assert_eq;

use crate::utils::prelude::SrcSpan;
use super::prelude::{tokenize, LexicalError, LexicalErrorType, Token, TokenKind};

fn tokens(input: &str) -> Result<Vec<Token>, LexicalError> {
    tokenize(input)
        .map(|res| res.map(|(_, token, _)| token))
        .collect()
}

#[test]
fn test_numbers() -> std::result::Result<(), LexicalError> {
    let input = r#"
        10
        0
        1.5
        10e5
        10.4E5
        2e-3
        7E+2
        007
    "#;

    let expected = vec![
        Token::Number(10.0),
        Token::Number(0.0),
        Token::Number(1.5),
        Token::Number(1000000.0),
        Token::Number(1040000.0),
        Token::Number(0.002),
        Token::Number(700.0),
        Token::Number(7.0),
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);

    Ok(())
}

#[test]
fn test_invalid_numbers() {
    let fails = vec![
        ("1.", LexicalErrorType::MissingDigitAfterPeriod),
        ("1.x", LexicalErrorType::MissingDigitAfterPeriod),
        ("1e", LexicalErrorType::MissingDigitsAfterExponent),
        ("1e+", LexicalErrorType::MissingDigitsAfterExponent),
        ("1.2.3", LexicalErrorType::MultipleFloatingPoints),
    ];

    for (input, error) in fails {
        match tokens(input) {
            Err(err) => assert_eq!(err.error, error, "input: {input}"),
            Ok(tokens) => panic!("{input} lexed as {tokens:?}")
        }
    }
}

#[test]
fn test_identifiers_and_keywords() -> Result<(), LexicalError> {
    let input = "var function return if else while for break continue true false null _x y2 variable";

    let expected = vec![
        Token::Var,
        Token::Function,
        Token::Return,
        Token::If,
        Token::Else,
        Token::While,
        Token::For,
        Token::Break,
        Token::Continue,
        Token::True,
        Token::False,
        Token::Null,
        Token::Ident("_x".into()),
        Token::Ident("y2".into()),
        Token::Ident("variable".into()),
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);

    Ok(())
}

#[test]
fn test_operators_longest_match() -> Result<(), LexicalError> {
    let input = "== = != ! <= < >= > && || + - * / % , : ; ( ) { } [ ]";

    let expected = vec![
        Token::Equal,
        Token::Assign,
        Token::NotEqual,
        Token::Bang,
        Token::LessThanOrEqual,
        Token::LessThan,
        Token::GreaterThanOrEqual,
        Token::GreaterThan,
        Token::And,
        Token::Or,
        Token::Plus,
        Token::Minus,
        Token::Star,
        Token::Slash,
        Token::Percent,
        Token::Comma,
        Token::Colon,
        Token::Semicolon,
        Token::LParen,
        Token::RParen,
        Token::LBrace,
        Token::RBrace,
        Token::LSBracket,
        Token::RSBracket,
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);
    assert_eq!(tokens("a===b")?, vec![
        Token::Ident("a".into()),
        Token::Equal,
        Token::Assign,
        Token::Ident("b".into()),
        Token::Eof,
    ]);

    Ok(())
}

#[test]
fn test_strings() -> Result<(), LexicalError> {
    let input = r#""plain" "tab\there" "quote\"d" "back\\slash" "new\nline" "ünï""#;

    let expected = vec![
        Token::String("plain".into()),
        Token::String("tab\there".into()),
        Token::String("quote\"d".into()),
        Token::String("back\\slash".into()),
        Token::String("new\nline".into()),
        Token::String("ünï".into()),
        Token::Eof,
    ];

    assert_eq!(tokens(input)?, expected);

    Ok(())
}

#[test]
fn test_invalid_strings() {
    let unterminated = tokens("print(\"abc);").unwrap_err();
    assert_eq!(unterminated.error, LexicalErrorType::UnterminatedString);
    assert_eq!(unterminated.location.start, 6);

    let newline = tokens("\"abc\ndef\"").unwrap_err();
    assert_eq!(newline.error, LexicalErrorType::UnterminatedString);

    let escape = tokens(r#""a\qb""#).unwrap_err();
    assert_eq!(escape.error, LexicalErrorType::InvalidEscape { ch: 'q' });
    assert_eq!(escape.location, SrcSpan { start: 2, end: 4 });
}

#[test]
fn test_comments() -> Result<(), LexicalError> {
    let input = "a // line\n# hash\nb /* block\n over lines */ c";

    assert_eq!(tokens(input)?, vec![
        Token::Ident("a".into()),
        Token::Comment,
        Token::Comment,
        Token::Ident("b".into()),
        Token::Comment,
        Token::Ident("c".into()),
        Token::Eof,
    ]);

    let unterminated = tokens("a /* never closed").unwrap_err();
    assert_eq!(unterminated.error, LexicalErrorType::MissingCommentEnd);

    Ok(())
}

#[test]
fn test_unrecognized_character_position() {
    let mut lexer = tokenize("var x = 1;\nvar y = @;");

    let error = loop {
        match lexer.next() {
            Some(Ok(_)) => continue,
            Some(Err(err)) => break err,
            None => panic!("lexer finished without an error")
        }
    };

    assert_eq!(error.error, LexicalErrorType::UnrecognizedToken { tok: '@' });
    assert_eq!(error.location, SrcSpan { start: 19, end: 20 });
    assert_eq!(lexer.next(), None);

    assert_eq!(
        tokens("a & b").unwrap_err().error,
        LexicalErrorType::UnrecognizedToken { tok: '&' }
    );
}

#[test]
fn test_spans() -> Result<(), LexicalError> {
    let spans = tokenize("var ab = \"é\";")
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(spans, vec![
        (0, Token::Var, 3),
        (4, Token::Ident("ab".into()), 6),
        (7, Token::Assign, 8),
        (9, Token::String("é".into()), 13),
        (13, Token::Semicolon, 14),
        (14, Token::Eof, 14),
    ]);

    Ok(())
}

#[test]
fn test_single_eof_then_none() {
    let mut lexer = tokenize("   ");

    assert_eq!(lexer.next(), Some(Ok((3, Token::Eof, 3))));
    assert_eq!(lexer.next(), None);
    assert_eq!(lexer.next(), None);
}

#[test]
fn test_relexing_is_deterministic() {
    let input = "function add(a, b) { return a + b; } print(add(2, 3));";

    let first = tokenize(input).collect::<Vec<_>>();
    let second = tokenize(input).collect::<Vec<_>>();

    assert_eq!(first, second);
}

#[test]
fn test_token_kinds() {
    assert_eq!(Token::Ident("x".into()).kind(), TokenKind::Identifier);
    assert_eq!(Token::While.kind(), TokenKind::Keyword);
    assert_eq!(Token::Number(1.0).kind(), TokenKind::Number);
    assert_eq!(Token::String("s".into()).kind(), TokenKind::String);
    assert_eq!(Token::Equal.kind(), TokenKind::Operator);
    assert_eq!(Token::Semicolon.kind(), TokenKind::Punctuation);
    assert_eq!(Token::Eof.kind(), TokenKind::EndOfInput);
}
