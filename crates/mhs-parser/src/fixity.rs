//! Operator fixity table.

use std::collections::HashMap;
use std::rc::Rc;

use mhs_syntax::{Assoc, Fixity, FixityDecl, Name};

/// Associativity and precedence of every known operator.
///
/// Operators that were never declared resolve to [`Fixity::DEFAULT`]
/// (left-associative, precedence 9).
#[derive(Debug, Clone)]
pub struct FixityTable {
    entries: HashMap<Name, Fixity>,
}

const HASKELL_DEFAULTS: &[(&str, Assoc, u8)] = &[
    ("$", Assoc::Right, 0),
    ("seq", Assoc::Right, 0),
    ("||", Assoc::Right, 2),
    ("&&", Assoc::Right, 3),
    ("==", Assoc::None, 4),
    ("/=", Assoc::None, 4),
    ("!=", Assoc::None, 4),
    ("<", Assoc::None, 4),
    ("<=", Assoc::None, 4),
    (">", Assoc::None, 4),
    (">=", Assoc::None, 4),
    ("elem", Assoc::None, 4),
    (":", Assoc::Right, 5),
    ("++", Assoc::Right, 5),
    ("<>", Assoc::Right, 6),
    ("+", Assoc::Left, 6),
    ("-", Assoc::Left, 6),
    ("*", Assoc::Left, 7),
    ("/", Assoc::Left, 7),
    ("%", Assoc::Left, 7),
    ("div", Assoc::Left, 7),
    ("mod", Assoc::Left, 7),
    (".", Assoc::Right, 9),
    ("!!", Assoc::Left, 9),
];

impl FixityTable {
    /// A table with no declarations at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The standard fixities of the Haskell prelude operators.
    pub fn haskell_defaults() -> Self {
        let entries = HASKELL_DEFAULTS
            .iter()
            .map(|&(op, assoc, precedence)| (Rc::from(op), Fixity::new(assoc, precedence)))
            .collect();
        Self { entries }
    }

    /// Fixity of `op`, falling back to [`Fixity::DEFAULT`].
    pub fn get(&self, op: &str) -> Fixity {
        self.entries.get(op).copied().unwrap_or(Fixity::DEFAULT)
    }

    pub fn is_declared(&self, op: &str) -> bool {
        self.entries.contains_key(op)
    }

    /// Set the fixity of `op`, replacing any earlier entry.
    pub fn declare(&mut self, op: Name, fixity: Fixity) {
        self.entries.insert(op, fixity);
    }

    pub fn extend<'a>(&mut self, decls: impl IntoIterator<Item = &'a FixityDecl>) {
        for decl in decls {
            self.declare(decl.operator.clone(), decl.fixity);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FixityTable {
    fn default() -> Self {
        Self::haskell_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = FixityTable::default();
        assert_eq!(table.get("+"), Fixity::new(Assoc::Left, 6));
        assert_eq!(table.get("$"), Fixity::new(Assoc::Right, 0));
        assert_eq!(table.get("=="), Fixity::new(Assoc::None, 4));
    }

    #[test]
    fn test_undeclared_is_infixl_9() {
        let table = FixityTable::empty();
        assert_eq!(table.get("<+>"), Fixity::DEFAULT);
        assert!(!table.is_declared("<+>"));
    }

    #[test]
    fn test_declare_overrides() {
        let mut table = FixityTable::default();
        table.declare("+".into(), Fixity::new(Assoc::Right, 2));
        assert_eq!(table.get("+"), Fixity::new(Assoc::Right, 2));
    }
}
