//! Suspended computations with call-by-need memoisation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mhs_common::Span;
use mhs_syntax::{Expr, Name};

use crate::env::Env;
use crate::value::Value;

/// The state of a thunk. Transitions only go forward:
/// `Delayed -> Forcing -> Forced`. A failed computation returns the thunk to
/// `Delayed` so forcing it again reports the same error. `Ready` holds values
/// that never needed computing, such as literals and primitives.
pub(crate) enum ThunkState {
    Delayed {
        expr: Rc<Expr>,
        env: Env,
        /// Binding that owns this thunk, for blackhole reports.
        name: Option<Name>,
    },
    /// Being evaluated right now. Forcing it again is a self-dependency.
    Forcing { name: Option<Name>, span: Span },
    Forced(Value),
    Ready(Value),
}

/// A shared, lazily evaluated value.
///
/// Cloning a thunk shares it: forcing any clone memoises the result for all.
#[derive(Clone)]
pub struct Thunk {
    pub(crate) state: Rc<RefCell<ThunkState>>,
}

impl Thunk {
    /// A computation that has not run yet.
    pub(crate) fn delayed(expr: Rc<Expr>, env: Env, name: Option<Name>) -> Self {
        Self::from_state(ThunkState::Delayed { expr, env, name })
    }

    /// An already evaluated value.
    pub fn ready(value: Value) -> Self {
        Self::from_state(ThunkState::Ready(value))
    }

    fn from_state(state: ThunkState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(*self.state.borrow(), ThunkState::Forced(_) | ThunkState::Ready(_))
    }

    /// The memoised value, if the thunk has been forced.
    pub fn value(&self) -> Option<Value> {
        match &*self.state.borrow() {
            ThunkState::Forced(value) | ThunkState::Ready(value) => Some(value.clone()),
            ThunkState::Delayed { .. } | ThunkState::Forcing { .. } => None,
        }
    }

    /// True if both handles share one cell.
    pub fn ptr_eq(&self, other: &Thunk) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            ThunkState::Delayed { expr, .. } => write!(f, "<thunk {expr}>"),
            ThunkState::Forcing { .. } => f.write_str("<forcing>"),
            ThunkState::Forced(value) | ThunkState::Ready(value) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_thunk_is_forced() {
        let thunk = Thunk::ready(Value::Int(3));
        assert!(thunk.is_forced());
        assert!(matches!(thunk.value(), Some(Value::Int(3))));
    }

    #[test]
    fn test_delayed_thunk_has_no_value() {
        let thunk = Thunk::delayed(Expr::int(1, Span::DUMMY), Env::root(), None);
        assert!(!thunk.is_forced());
        assert!(thunk.value().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let a = Thunk::delayed(Expr::int(1, Span::DUMMY), Env::root(), None);
        let b = a.clone();
        *a.state.borrow_mut() = ThunkState::Forced(Value::Int(1));
        assert!(b.is_forced());
        assert!(a.ptr_eq(&b));
    }
}
