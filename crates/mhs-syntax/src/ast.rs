//! Top-level AST: bindings, fixity declarations and programs.

use std::fmt;
use std::rc::Rc;

use crate::{Expr, Name};
use mhs_common::Span;

/// A named binding, either top-level or inside `let`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Name,
    pub expr: Rc<Expr>,
    pub span: Span,
}

impl Binding {
    pub fn new(name: Name, expr: Rc<Expr>, span: Span) -> Self {
        Self { name, expr, span }
    }
}

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
    None,
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Assoc::Left => "infixl",
            Assoc::Right => "infixr",
            Assoc::None => "infix",
        })
    }
}

/// Associativity and precedence (0..=9) of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fixity {
    pub assoc: Assoc,
    pub precedence: u8,
}

impl Fixity {
    pub const MAX_PRECEDENCE: u8 = 9;

    /// Fixity of operators that were never declared.
    pub const DEFAULT: Fixity = Fixity {
        assoc: Assoc::Left,
        precedence: 9,
    };

    pub const fn new(assoc: Assoc, precedence: u8) -> Self {
        Self { assoc, precedence }
    }
}

/// `infixl 6 +`
#[derive(Debug, Clone, PartialEq)]
pub struct FixityDecl {
    pub operator: Name,
    pub fixity: Fixity,
    pub span: Span,
}

impl fmt::Display for FixityDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.fixity.assoc, self.fixity.precedence, self.operator)
    }
}

/// A sequence of `;`-terminated top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub bindings: Vec<Binding>,
    pub fixities: Vec<FixityDecl>,
    pub span: Span,
}

impl Module {
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| &*b.name == name)
    }
}

/// A parsed program: a single expression, or a module whose value is an
/// entry binding such as `main`.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    Expr(Rc<Expr>),
    Module(Module),
}

impl Program {
    pub fn span(&self) -> Span {
        match self {
            Program::Expr(expr) => expr.span,
            Program::Module(module) => module.span,
        }
    }
}
