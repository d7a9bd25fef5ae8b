//! AST and syntax definitions for micro-Haskell.
//!
//! This crate defines the abstract syntax tree produced by the parser and
//! walked by the evaluator. Nodes are immutable once built and share their
//! children through `Rc`, so closures and thunks can hold on to subtrees
//! without copying them.

mod ast;
mod expr;
mod pattern;

pub mod names;

pub use ast::*;
pub use expr::*;
pub use pattern::*;
