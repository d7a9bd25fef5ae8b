//! Interpreter errors.

use mhs_common::Span;
use mhs_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use mhs_lexer::LexError;
use mhs_parser::{ParseError, SyntaxError};
use thiserror::Error;

/// Everything that can stop a program from producing a value.
///
/// Evaluation aborts at the first error; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("variable `{name}` is not in scope")]
    UnboundVariable { name: String, span: Span },

    #[error("cannot apply {found}: it is not a function")]
    NotAFunction { found: String, span: Span },

    #[error("non-exhaustive patterns: no alternative matches {value}")]
    NonExhaustiveMatch { value: String, span: Span },

    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("arithmetic error: {message}")]
    Arithmetic { message: String, span: Span },

    #[error("`{name}` depends on its own value")]
    DivergingReference { name: String, span: Span },

    #[error("error: {message}")]
    User { message: String, span: Span },
}

pub type EvalResult<T> = Result<T, InterpreterError>;

impl From<SyntaxError> for InterpreterError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lex(err) => InterpreterError::Lex(err),
            SyntaxError::Parse(err) => InterpreterError::Parse(err),
        }
    }
}

impl InterpreterError {
    pub fn type_error(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        InterpreterError::Type {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn arithmetic(message: impl Into<String>, span: Span) -> Self {
        InterpreterError::Arithmetic {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            InterpreterError::Lex(err) => err.span,
            InterpreterError::Parse(err) => err.span,
            InterpreterError::UnboundVariable { span, .. }
            | InterpreterError::NotAFunction { span, .. }
            | InterpreterError::NonExhaustiveMatch { span, .. }
            | InterpreterError::Type { span, .. }
            | InterpreterError::Arithmetic { span, .. }
            | InterpreterError::DivergingReference { span, .. }
            | InterpreterError::User { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            InterpreterError::Lex(err) => err.code(),
            InterpreterError::Parse(err) => err.code,
            InterpreterError::UnboundVariable { .. } => ErrorCode::UnboundVariable,
            InterpreterError::NotAFunction { .. } => ErrorCode::NotAFunction,
            InterpreterError::NonExhaustiveMatch { .. } => ErrorCode::NonExhaustiveMatch,
            InterpreterError::Type { .. } => ErrorCode::TypeMismatch,
            InterpreterError::Arithmetic { .. } => ErrorCode::ArithmeticError,
            InterpreterError::DivergingReference { .. } => ErrorCode::DivergingReference,
            InterpreterError::User { .. } => ErrorCode::UserError,
        }
    }

    /// Lex and parse errors are reported before any evaluation happens.
    pub fn is_syntax(&self) -> bool {
        matches!(self, InterpreterError::Lex(_) | InterpreterError::Parse(_))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self {
            InterpreterError::Lex(err) => return err.to_diagnostic(),
            InterpreterError::Parse(err) => return err.to_diagnostic(),
            InterpreterError::UnboundVariable { .. } => "not found in this scope".to_string(),
            InterpreterError::NotAFunction { found, .. } => format!("this is {found}"),
            InterpreterError::NonExhaustiveMatch { .. } => "no pattern matched here".to_string(),
            InterpreterError::Type { expected, .. } => format!("expected {expected}"),
            InterpreterError::Arithmetic { message, .. } => message.clone(),
            InterpreterError::DivergingReference { .. } => {
                "evaluation re-entered this binding".to_string()
            }
            InterpreterError::User { .. } => "raised here".to_string(),
        };
        let span = self.span();
        let mut diagnostic = Diagnostic::error(DiagnosticKind::Eval, span, self.to_string())
            .with_code(self.code());
        if !span.is_dummy() {
            diagnostic = diagnostic.with_label(Label::new(span, label));
        }
        if let InterpreterError::DivergingReference { name, .. } = self {
            diagnostic = diagnostic.with_note(format!(
                "forcing `{name}` needs the value of `{name}` itself"
            ));
        }
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = InterpreterError::UnboundVariable {
            name: "y".into(),
            span: Span::DUMMY,
        };
        assert_eq!(err.to_string(), "variable `y` is not in scope");
        assert_eq!(err.code(), ErrorCode::UnboundVariable);

        let err = InterpreterError::arithmetic("division by zero", Span::from_usize(2, 3));
        assert_eq!(err.to_string(), "arithmetic error: division by zero");
        assert_eq!(err.span(), Span::from_usize(2, 3));
    }

    #[test]
    fn test_diagnostic_carries_code() {
        let err = InterpreterError::type_error("integer", "string \"a\"", Span::from_usize(0, 3));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, Some(ErrorCode::TypeMismatch));
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.kind, DiagnosticKind::Eval);
    }
}
