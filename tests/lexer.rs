//! Integration tests for mhs-lexer crate.

use mhs_common::Position;
use mhs_lexer::{LexErrorKind, Lexer, TokenKind, tokenize};

fn lex(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap_or_else(|e| panic!("lex error in {source:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lex_error(source: &str) -> LexErrorKind {
    tokenize(source).unwrap_err().kind
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Ident(s.to_string())
}

fn op(s: &str) -> TokenKind {
    TokenKind::Operator(s.to_string())
}

// ============================================================================
// Basic Token Tests
// ============================================================================

#[test]
fn test_keywords() {
    assert_eq!(
        lex("let in case of if then else infix infixl infixr"),
        vec![
            TokenKind::Let,
            TokenKind::In,
            TokenKind::Case,
            TokenKind::Of,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::Infix,
            TokenKind::Infixl,
            TokenKind::Infixr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_identifiers_and_constructors() {
    assert_eq!(
        lex("x _y foo' Just letter"),
        vec![
            ident("x"),
            ident("_y"),
            ident("foo'"),
            TokenKind::ConIdent("Just".into()),
            ident("letter"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_underscore_alone_is_wildcard() {
    assert_eq!(lex("_"), vec![TokenKind::Underscore, TokenKind::Eof]);
}

#[test]
fn test_literals() {
    assert_eq!(
        lex(r#"42 "hi\n" 0"#),
        vec![
            TokenKind::Int(42),
            TokenKind::Str("hi\n".into()),
            TokenKind::Int(0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        lex(r#""a\tb\\c\"d\0""#),
        vec![TokenKind::Str("a\tb\\c\"d\0".into()), TokenKind::Eof]
    );
}

#[test]
fn test_delimiters() {
    assert_eq!(
        lex("( ) [ ] { } , ; `"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Backtick,
            TokenKind::Eof,
        ]
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_reserved_symbols() {
    assert_eq!(
        lex("= -> \\ .."),
        vec![
            TokenKind::Equals,
            TokenKind::Arrow,
            TokenKind::Backslash,
            TokenKind::DotDot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operators_are_maximal_runs() {
    assert_eq!(
        lex("a == b >>= c : d <$> e"),
        vec![
            ident("a"),
            op("=="),
            ident("b"),
            op(">>="),
            ident("c"),
            op(":"),
            ident("d"),
            op("<$>"),
            ident("e"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lambda_without_spaces() {
    assert_eq!(
        lex("\\x->x"),
        vec![
            TokenKind::Backslash,
            ident("x"),
            TokenKind::Arrow,
            ident("x"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unknown_characters_are_tokens() {
    assert_eq!(
        lex("a ' b"),
        vec![ident("a"), TokenKind::Unknown('\''), ident("b"), TokenKind::Eof]
    );
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_comments() {
    assert_eq!(
        lex("1 -- one\n2 --- two\n3 --"),
        vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Int(3), TokenKind::Eof]
    );
}

#[test]
fn test_dash_operator_is_not_a_comment() {
    assert_eq!(
        lex("a -->b"),
        vec![ident("a"), op("-->"), ident("b"), TokenKind::Eof]
    );
}

#[test]
fn test_nested_block_comments() {
    assert_eq!(
        lex("1 {- outer {- inner -} still outer -} 2"),
        vec![TokenKind::Int(1), TokenKind::Int(2), TokenKind::Eof]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    assert_eq!(lex_error("\"abc"), LexErrorKind::UnterminatedString);
    assert_eq!(lex_error("\"abc\ndef\""), LexErrorKind::UnterminatedString);
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(lex_error("1 {- {- -}"), LexErrorKind::UnterminatedComment);
}

#[test]
fn test_invalid_escape() {
    assert_eq!(lex_error(r#""\q""#), LexErrorKind::InvalidEscape('q'));
}

#[test]
fn test_control_character() {
    assert_eq!(lex_error("1 \u{7} 2"), LexErrorKind::InvalidCharacter('\u{7}'));
}

#[test]
fn test_integer_overflow() {
    assert_eq!(
        lex_error("99999999999999999999"),
        LexErrorKind::IntegerOverflow("99999999999999999999".into())
    );
}

#[test]
fn test_error_position() {
    let err = tokenize("x\n  \"open").unwrap_err();
    assert_eq!(err.pos, Position::new(2, 3));
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_lexer_is_lazy() {
    let mut lexer = Lexer::new("a b \"unterminated");
    assert_eq!(lexer.next().unwrap().unwrap().kind, ident("a"));
    assert_eq!(lexer.next().unwrap().unwrap().kind, ident("b"));
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn test_lexer_stops_after_eof() {
    let mut lexer = Lexer::new("x");
    assert!(lexer.next().is_some());
    assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Eof);
    assert!(lexer.next().is_none());
}

#[test]
fn test_spans_cover_token_text() {
    let source = "foo  +  \"bar\"";
    let tokens = tokenize(source).unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.span.snippet(source).unwrap()).collect();
    assert_eq!(texts, vec!["foo", "+", "\"bar\"", ""]);
}
