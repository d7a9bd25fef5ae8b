//! Built-in constructor names used by syntax sugar.

use std::rc::Rc;

use crate::Name;

pub const TRUE: &str = "True";
pub const FALSE: &str = "False";
pub const NIL: &str = "Nil";
pub const CONS: &str = "Cons";
pub const UNIT: &str = "()";

/// The name of the tuple constructor of the given arity: `(,)`, `(,,)`, ...
pub fn tuple(arity: usize) -> Name {
    let commas = ",".repeat(arity.saturating_sub(1));
    Rc::from(format!("({commas})"))
}

/// Returns true for tuple constructor names.
pub fn is_tuple(name: &str) -> bool {
    name.len() > 2 && name.starts_with('(') && name.ends_with(')') && name[1..name.len() - 1].chars().all(|c| c == ',')
}

/// Returns true if `name` is written with symbol characters, e.g. `+`.
pub fn is_operator(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !(c.is_alphanumeric() || matches!(c, '_' | '\'' | '(' | ')' | ',')))
}

/// Prefix for names the parser invents; they can never clash with user names.
pub const FRESH_PREFIX: char = '$';

pub fn bool_name(value: bool) -> &'static str {
    if value { TRUE } else { FALSE }
}
