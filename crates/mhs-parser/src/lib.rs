//! Parser for micro-Haskell.
//!
//! This crate provides a recursive descent parser that converts tokens into
//! the AST of `mhs-syntax`. Operators are resolved against a
//! [`FixityTable`] that starts from the Haskell defaults and picks up the
//! program's own `infix`/`infixl`/`infixr` declarations.
//!
//! Parsing stops at the first error.

mod desugar;
mod error;
mod fixity;
mod parser;

pub use error::{ParseError, SyntaxError};
pub use fixity::FixityTable;
pub use parser::Parser;

use std::rc::Rc;

use mhs_lexer::Lexer;
use mhs_syntax::{Expr, Program};

/// A parsed program together with the fixities in force after parsing it.
#[derive(Debug, Clone)]
pub struct ParsedProgram {
    pub program: Program,
    pub fixities: FixityTable,
}

/// Parse source code using `fixities` as the starting operator table.
pub fn parse_program(source: &str, fixities: &FixityTable) -> Result<ParsedProgram, SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens, fixities.clone());
    let program = parser.parse_program()?;
    Ok(ParsedProgram {
        program,
        fixities: parser.into_fixities(),
    })
}

/// Parse source code with the default Haskell fixities.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    parse_program(source, &FixityTable::default()).map(|parsed| parsed.program)
}

/// Parse a single expression with the default Haskell fixities.
pub fn parse_expr(source: &str) -> Result<Rc<Expr>, SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens, FixityTable::default());
    Ok(parser.parse_standalone_expr()?)
}
