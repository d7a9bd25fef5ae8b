//! Parse errors.

use mhs_common::{Position, Span};
use mhs_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use mhs_lexer::{LexError, Token};
use thiserror::Error;

/// A syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {pos}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    /// The construct the parser was looking for, if there was one.
    pub expected: Option<String>,
    /// Description of the token that was found instead.
    pub found: String,
    pub span: Span,
    pub pos: Position,
}

impl ParseError {
    /// `expected <what>, found <token>`
    pub fn expected(code: ErrorCode, what: impl Into<String>, token: &Token) -> Self {
        let what = what.into();
        let found = token.kind.to_string();
        Self {
            code,
            message: format!("expected {what}, found {found}"),
            expected: Some(what),
            found,
            span: token.span,
            pos: token.pos,
        }
    }

    /// An error with a custom message reported at `token`.
    pub fn at(code: ErrorCode, message: impl Into<String>, token: &Token) -> Self {
        Self {
            code,
            message: message.into(),
            expected: None,
            found: token.kind.to_string(),
            span: token.span,
            pos: token.pos,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match &self.expected {
            Some(what) => format!("expected {what} here"),
            None => self.code.description().to_string(),
        };
        Diagnostic::error(DiagnosticKind::Parser, self.span, &self.message)
            .with_code(self.code)
            .with_label(Label::new(self.span, label))
    }
}

/// Anything that can go wrong turning source text into a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(err) => err.span,
            SyntaxError::Parse(err) => err.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SyntaxError::Lex(err) => err.to_diagnostic(),
            SyntaxError::Parse(err) => err.to_diagnostic(),
        }
    }
}
