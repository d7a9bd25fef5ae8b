//! Lexer errors.

use mhs_common::{Position, Span};
use mhs_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use thiserror::Error;

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("integer literal `{0}` is too large")]
    IntegerOverflow(String),
}

/// A lexical error with the location where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {pos}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub pos: Position,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span, pos: Position) -> Self {
        Self { kind, span, pos }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::UnterminatedString,
            LexErrorKind::UnterminatedComment => ErrorCode::UnterminatedComment,
            LexErrorKind::InvalidEscape(_) => ErrorCode::InvalidEscape,
            LexErrorKind::InvalidCharacter(_) => ErrorCode::InvalidCharacter,
            LexErrorKind::IntegerOverflow(_) => ErrorCode::IntegerOverflow,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Lexer, self.span, self.kind.to_string())
            .with_code(self.code())
            .with_label(Label::new(self.span, self.code().description()))
    }
}
