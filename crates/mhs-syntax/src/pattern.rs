//! Pattern AST nodes.

use std::fmt;

use crate::{Literal, Name};
use mhs_common::Span;

/// A pattern for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn var(name: impl Into<Name>, span: Span) -> Self {
        Self::new(PatternKind::Var(name.into()), span)
    }

    pub fn con(name: impl Into<Name>, args: Vec<Pattern>, span: Span) -> Self {
        Self::new(
            PatternKind::Con {
                name: name.into(),
                args,
            },
            span,
        )
    }

    /// Returns true if this pattern matches anything without inspecting it.
    pub fn is_irrefutable(&self) -> bool {
        matches!(self.kind, PatternKind::Wildcard | PatternKind::Var(_))
    }

    /// Variables bound by this pattern, left to right.
    pub fn bound_names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, out: &mut Vec<Name>) {
        match &self.kind {
            PatternKind::Var(name) => out.push(name.clone()),
            PatternKind::Con { args, .. } => args.iter().for_each(|p| p.collect_names(out)),
            PatternKind::Wildcard | PatternKind::Lit(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// Wildcard `_`
    Wildcard,

    /// Variable binding `x`
    Var(Name),

    /// Literal pattern `42`, `"hello"`
    Lit(Literal),

    /// Constructor pattern `Cons x xs`, `Nil`, `(a, b)`
    Con { name: Name, args: Vec<Pattern> },
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::Wildcard => f.write_str("_"),
            PatternKind::Var(name) => f.write_str(name),
            PatternKind::Lit(lit) => write!(f, "{lit}"),
            PatternKind::Con { name, args } if args.is_empty() => f.write_str(name),
            PatternKind::Con { name, args } => {
                write!(f, "({name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_names_in_order() {
        let p = Pattern::con(
            "Cons",
            vec![Pattern::var("x", Span::DUMMY), Pattern::new(PatternKind::Wildcard, Span::DUMMY)],
            Span::DUMMY,
        );
        let nested = Pattern::con("(,)", vec![p, Pattern::var("y", Span::DUMMY)], Span::DUMMY);
        let names: Vec<String> = nested.bound_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(nested.to_string(), "((,) (Cons x _) y)");
    }
}
