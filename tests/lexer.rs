//! Lexer edge cases and error tests.

mod common;

use common::kinds;
use ourjs::{LexErrorKind, TokenKind, Value, tokenize};

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    let tokens = tokenize("<test>", "").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn lex_only_whitespace() {
    assert_eq!(kinds(" \t  \r "), vec![TokenKind::Eof]);
}

#[test]
fn lex_eof_positioned_at_end() {
    let tokens = tokenize("<test>", "ab\ncd").expect("tokenize");
    let eof = tokens.last().unwrap();
    assert_eq!(eof.start.index, 5);
    assert_eq!(eof.start.line, 2);
    assert_eq!(eof.start.column, 3);
}

#[test]
fn lex_and_operator() {
    let tokens = tokenize("<test>", "a && b").expect("tokenize");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Identifier,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
    assert_eq!(tokens[0].text(), Some("a"));
    assert_eq!(tokens[2].text(), Some("b"));
}

#[test]
fn lex_or_operator() {
    assert_eq!(
        kinds("a || b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Or,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn lex_single_char_tokens() {
    assert_eq!(
        kinds("+-*/(){},"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Mul,
            TokenKind::Div,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LCurl,
            TokenKind::RCurl,
            TokenKind::Comma,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_keywords_versus_identifiers() {
    let tokens = tokenize("<test>", "let lettuce if iffy func_1").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Keyword);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].text(), Some("func_1"));
}

#[test]
fn lex_numbers() {
    let tokens = tokenize("<test>", "42 3.25 7.").expect("tokenize");
    assert_eq!(tokens[0].value, Some(Value::Int(42)));
    assert_eq!(tokens[1].value, Some(Value::Float(3.25)));
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[2].value, Some(Value::Float(7.0)));
}

#[test]
fn lex_integer_wider_than_i64() {
    let tokens = tokenize("<test>", "123456789012345678901234 + 1").expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].lexeme(), "123456789012345678901234");
    assert_eq!(tokens[2].value, Some(Value::Int(1)));
}

#[test]
fn lex_double_dot_regression() {
    let tokens = tokenize("<test>", "1.2.3").expect("tokenize");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![TokenKind::Float, TokenKind::Float, TokenKind::Eof]
    );
    assert_eq!(tokens[0].value, Some(Value::Float(1.2)));
    assert_eq!(tokens[1].value, Some(Value::Float(0.3)));
}

#[test]
fn lex_semicolon_is_newline() {
    assert_eq!(
        kinds("1;2\n3"),
        vec![
            TokenKind::Int,
            TokenKind::Newline,
            TokenKind::Int,
            TokenKind::Newline,
            TokenKind::Int,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_string_unknown_escape_maps_to_itself() {
    let tokens = tokenize("<test>", r#""\q\\""#).expect("tokenize");
    assert_eq!(tokens[0].text(), Some("q\\"));
}

#[test]
fn lex_string_unicode() {
    let tokens = tokenize("<test>", "\"héllo\" x").expect("tokenize");
    assert_eq!(tokens[0].text(), Some("héllo"));
    assert_eq!(tokens[1].start.column, 9);
    assert_eq!(tokens[1].start.index, 9);
}

// -----------------------------------------------------------
// Lexer errors.
// -----------------------------------------------------------

#[test]
fn lex_error_single_ampersand() {
    let err = tokenize("<test>", "a & b").unwrap_err();
    assert!(matches!(
        err.kind,
        LexErrorKind::ExpectedCharacter { expected: '&', .. }
    ));
}

#[test]
fn lex_error_single_pipe_at_end() {
    let err = tokenize("<test>", "a |").unwrap_err();
    assert!(matches!(
        err.kind,
        LexErrorKind::ExpectedCharacter { expected: '|', .. }
    ));
    assert_eq!(err.start.index, 2);
}

#[test]
fn lex_error_illegal_character() {
    let err = tokenize("<test>", "x = 1 @ 2").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::IllegalCharacter('@'));
    assert_eq!(err.start.column, 7);
}

#[test]
fn lex_error_leading_underscore() {
    let err = tokenize("<test>", "_x").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::IllegalCharacter('_'));
}

#[test]
fn lex_error_lone_dot() {
    let err = tokenize("<test>", "a . b").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::IllegalCharacter('.'));
}

#[test]
fn display_error_types() {
    let err = tokenize("main.ojs", "a\n#").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Illegal Character: '#'"));
    assert!(msg.contains("main.ojs"));
    assert!(msg.contains("line 2"));

    let err = tokenize("<test>", "a | b").unwrap_err();
    assert!(err.to_string().contains("Expected Character: '|' (after '|')"));
}
