//! Error codes for micro-Haskell diagnostics.

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer errors (E0001 - E0099)
    InvalidCharacter,
    UnterminatedString,
    UnterminatedComment,
    InvalidEscape,
    IntegerOverflow,

    // Parser errors (E0100 - E0199)
    UnexpectedToken,
    ExpectedExpression,
    ExpectedPattern,
    UnclosedDelimiter,
    InvalidFixity,
    DuplicateFixity,
    NonAssociativeChain,
    ClauseArityMismatch,
    DuplicateDefinition,
    FixityWithoutBinding,

    // Static check errors (E0200 - E0299)
    UnboundVariable,
    MissingEntryPoint,
    ShadowedName,

    // Eval errors (E0300 - E0399)
    NotAFunction,
    NonExhaustiveMatch,
    TypeMismatch,
    ArithmeticError,
    DivergingReference,
    UserError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::InvalidCharacter => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::UnterminatedComment => "E0003",
            ErrorCode::InvalidEscape => "E0004",
            ErrorCode::IntegerOverflow => "E0005",

            // Parser
            ErrorCode::UnexpectedToken => "E0100",
            ErrorCode::ExpectedExpression => "E0101",
            ErrorCode::ExpectedPattern => "E0102",
            ErrorCode::UnclosedDelimiter => "E0103",
            ErrorCode::InvalidFixity => "E0104",
            ErrorCode::DuplicateFixity => "E0105",
            ErrorCode::NonAssociativeChain => "E0106",
            ErrorCode::ClauseArityMismatch => "E0107",
            ErrorCode::DuplicateDefinition => "E0108",
            ErrorCode::FixityWithoutBinding => "E0109",

            // Static checks
            ErrorCode::UnboundVariable => "E0200",
            ErrorCode::MissingEntryPoint => "E0201",
            ErrorCode::ShadowedName => "E0202",

            // Eval
            ErrorCode::NotAFunction => "E0300",
            ErrorCode::NonExhaustiveMatch => "E0301",
            ErrorCode::TypeMismatch => "E0302",
            ErrorCode::ArithmeticError => "E0303",
            ErrorCode::DivergingReference => "E0304",
            ErrorCode::UserError => "E0305",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::InvalidCharacter => "invalid character in input",
            ErrorCode::UnterminatedString => "string literal is not terminated",
            ErrorCode::UnterminatedComment => "block comment is not terminated",
            ErrorCode::InvalidEscape => "invalid escape sequence in string",
            ErrorCode::IntegerOverflow => "integer literal does not fit in 64 bits",

            // Parser
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::ExpectedExpression => "expected an expression",
            ErrorCode::ExpectedPattern => "expected a pattern",
            ErrorCode::UnclosedDelimiter => "unclosed delimiter",
            ErrorCode::InvalidFixity => "invalid fixity declaration",
            ErrorCode::DuplicateFixity => "operator fixity declared twice",
            ErrorCode::NonAssociativeChain => "non-associative operators used in a chain",
            ErrorCode::ClauseArityMismatch => "function clauses have different numbers of arguments",
            ErrorCode::DuplicateDefinition => "name is defined more than once",
            ErrorCode::FixityWithoutBinding => "fixity declaration has no binding in the same group",

            // Static checks
            ErrorCode::UnboundVariable => "cannot find value in this scope",
            ErrorCode::MissingEntryPoint => "program has no entry point",
            ErrorCode::ShadowedName => "definition hides a name that is already in scope",

            // Eval
            ErrorCode::NotAFunction => "expected a function, found a different value",
            ErrorCode::NonExhaustiveMatch => "no case alternative matched",
            ErrorCode::TypeMismatch => "value has the wrong shape for this operation",
            ErrorCode::ArithmeticError => "arithmetic error",
            ErrorCode::DivergingReference => "binding refers to its own value",
            ErrorCode::UserError => "error raised by program",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedString => Some("add a closing quote `\"` to terminate the string"),
            ErrorCode::UnterminatedComment => Some("add `-}` to close the comment"),
            ErrorCode::UnclosedDelimiter => Some("add the matching closing delimiter"),
            ErrorCode::InvalidFixity => Some("precedence must be a single digit between 0 and 9"),
            ErrorCode::NonAssociativeChain => Some("add parentheses to group the operators"),
            ErrorCode::FixityWithoutBinding => Some("define the operator next to its fixity declaration"),
            ErrorCode::UnboundVariable => Some("check the spelling or define the name with `let`"),
            ErrorCode::MissingEntryPoint => Some("define a `main` binding"),
            ErrorCode::NonExhaustiveMatch => Some("add an alternative for the missing case or a `_` pattern"),
            _ => None,
        }
    }
}
