//! Lexical analysis for micro-Haskell.
//! micro-Haskell 词法分析模块。
//!
//! The lexer is a lazy iterator over tokens. It can be cloned at any point to
//! restart scanning from that position, and stops after the first error.

mod error;
mod lexer;
mod token;

pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, is_symbol_char};
pub use token::{Token, TokenKind};

/// Tokenize a whole source text, stopping at the first error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}
