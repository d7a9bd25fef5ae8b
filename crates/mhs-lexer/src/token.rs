//! Token definitions for micro-Haskell.

use std::fmt;

use mhs_common::{Position, Span};
use serde::Serialize;

/// A token with its kind, byte span and starting line/column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, pos: Position) -> Self {
        Self { kind, span, pos }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum TokenKind {
    // Literals
    Int(i64),
    Str(String),

    // Identifiers
    /// Lowercase or `_`-prefixed name.
    Ident(String),
    /// Capitalised name, always a data constructor.
    ConIdent(String),

    // Keywords
    Let,
    In,
    Case,
    Of,
    If,
    Then,
    Else,
    Infix,
    Infixl,
    Infixr,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Reserved symbols
    Comma,      // ,
    Semicolon,  // ;
    Backslash,  // \
    Arrow,      // ->
    Equals,     // =
    Underscore, // _
    Backtick,   // `
    DotDot,     // ..

    /// Any other run of symbol characters, e.g. `+`, `>>=`, `:`.
    Operator(String),

    /// A printable character that is not part of the language.
    Unknown(char),

    // Special
    Eof,
}

impl TokenKind {
    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::In
                | TokenKind::Case
                | TokenKind::Of
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::Infix
                | TokenKind::Infixl
                | TokenKind::Infixr
        )
    }

    /// Returns the keyword for an identifier, if any.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "let" => Some(TokenKind::Let),
            "in" => Some(TokenKind::In),
            "case" => Some(TokenKind::Case),
            "of" => Some(TokenKind::Of),
            "if" => Some(TokenKind::If),
            "then" => Some(TokenKind::Then),
            "else" => Some(TokenKind::Else),
            "infix" => Some(TokenKind::Infix),
            "infixl" => Some(TokenKind::Infixl),
            "infixr" => Some(TokenKind::Infixr),
            _ => None,
        }
    }

    /// Returns the reserved token for a run of symbol characters, if any.
    pub fn reserved_symbol(s: &str) -> Option<TokenKind> {
        match s {
            "=" => Some(TokenKind::Equals),
            "->" => Some(TokenKind::Arrow),
            "\\" => Some(TokenKind::Backslash),
            ".." => Some(TokenKind::DotDot),
            _ => None,
        }
    }

    /// Returns true for tokens that can begin an atomic expression.
    pub fn starts_atom(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::Ident(_)
                | TokenKind::ConIdent(_)
                | TokenKind::LParen
                | TokenKind::LBracket
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "integer `{n}`"),
            TokenKind::Str(s) => write!(f, "string {s:?}"),
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::ConIdent(name) => write!(f, "constructor `{name}`"),
            TokenKind::Let => f.write_str("`let`"),
            TokenKind::In => f.write_str("`in`"),
            TokenKind::Case => f.write_str("`case`"),
            TokenKind::Of => f.write_str("`of`"),
            TokenKind::If => f.write_str("`if`"),
            TokenKind::Then => f.write_str("`then`"),
            TokenKind::Else => f.write_str("`else`"),
            TokenKind::Infix => f.write_str("`infix`"),
            TokenKind::Infixl => f.write_str("`infixl`"),
            TokenKind::Infixr => f.write_str("`infixr`"),
            TokenKind::LParen => f.write_str("`(`"),
            TokenKind::RParen => f.write_str("`)`"),
            TokenKind::LBracket => f.write_str("`[`"),
            TokenKind::RBracket => f.write_str("`]`"),
            TokenKind::LBrace => f.write_str("`{`"),
            TokenKind::RBrace => f.write_str("`}`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Semicolon => f.write_str("`;`"),
            TokenKind::Backslash => f.write_str("`\\`"),
            TokenKind::Arrow => f.write_str("`->`"),
            TokenKind::Equals => f.write_str("`=`"),
            TokenKind::Underscore => f.write_str("`_`"),
            TokenKind::Backtick => f.write_str("`` ` ``"),
            TokenKind::DotDot => f.write_str("`..`"),
            TokenKind::Operator(op) => write!(f, "operator `{op}`"),
            TokenKind::Unknown(ch) => write!(f, "unknown character {ch:?}"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
