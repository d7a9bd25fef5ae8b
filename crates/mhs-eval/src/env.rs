//! Evaluation environment.
//!
//! An environment is a chain of immutable frames. Extending it creates a new
//! frame and leaves the parent untouched, so closures can capture any frame
//! and share it freely.

use std::cell::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use mhs_syntax::Name;

use crate::thunk::Thunk;

enum Bindings {
    /// The frame created for a single function application.
    Single(Name, Thunk),
    Table(HashMap<Name, Thunk>),
}

impl Bindings {
    fn get(&self, name: &str) -> Option<&Thunk> {
        match self {
            Bindings::Single(bound, thunk) => (&**bound == name).then_some(thunk),
            Bindings::Table(table) => table.get(name),
        }
    }

    fn names(&self) -> Vec<&Name> {
        match self {
            Bindings::Single(name, _) => vec![name],
            Bindings::Table(table) => table.keys().collect(),
        }
    }
}

struct Frame {
    /// Set exactly once. A recursive frame is allocated empty and sealed
    /// after the thunks that capture it have been created.
    bindings: OnceCell<Bindings>,
    parent: Option<Env>,
}

/// A scope mapping names to thunks.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl Env {
    /// The empty environment.
    pub fn root() -> Self {
        Self::sealed(Bindings::Table(HashMap::new()), None)
    }

    fn sealed(bindings: Bindings, parent: Option<Env>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(bindings);
        Env(Rc::new(Frame {
            bindings: cell,
            parent,
        }))
    }

    /// A child scope with one binding.
    pub fn bind(&self, name: Name, thunk: Thunk) -> Env {
        Self::sealed(Bindings::Single(name, thunk), Some(self.clone()))
    }

    /// A child scope with the given bindings. Later duplicates win.
    pub fn extend(&self, bindings: impl IntoIterator<Item = (Name, Thunk)>) -> Env {
        Self::sealed(
            Bindings::Table(bindings.into_iter().collect()),
            Some(self.clone()),
        )
    }

    /// A child scope whose bindings may refer to the scope itself.
    ///
    /// `build` receives the new (still empty) scope and returns the bindings
    /// to seal it with. The thunks it creates must not be forced before
    /// `build` returns.
    pub fn recursive(&self, build: impl FnOnce(&Env) -> Vec<(Name, Thunk)>) -> Env {
        let env = Env(Rc::new(Frame {
            bindings: OnceCell::new(),
            parent: Some(self.clone()),
        }));
        let bindings = build(&env);
        let _ = env.0.bindings.set(Bindings::Table(bindings.into_iter().collect()));
        env
    }

    /// Find the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Thunk> {
        let mut frame = &self.0;
        loop {
            if let Some(thunk) = frame.bindings.get().and_then(|b| b.get(name)) {
                return Some(thunk.clone());
            }
            frame = &frame.parent.as_ref()?.0;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every visible name, sorted.
    pub fn names(&self) -> Vec<Name> {
        let mut names = BTreeSet::new();
        let mut frame = Some(self);
        while let Some(env) = frame {
            if let Some(bindings) = env.0.bindings.get() {
                names.extend(bindings.names().into_iter().cloned());
            }
            frame = env.0.parent.as_ref();
        }
        names.into_iter().collect()
    }

    /// Names bound directly in this frame, sorted.
    pub fn local_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self
            .0
            .bindings
            .get()
            .map(|b| b.names().into_iter().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.0.parent.as_ref();
        while let Some(env) = frame {
            depth += 1;
            frame = env.0.parent.as_ref();
        }
        depth
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn int(n: i64) -> Thunk {
        Thunk::ready(Value::Int(n))
    }

    fn int_of(thunk: Option<Thunk>) -> Option<i64> {
        match thunk?.value()? {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    #[test]
    fn test_inner_frames_shadow_outer() {
        let outer = Env::root().bind("x".into(), int(1));
        let inner = outer.bind("x".into(), int(2));
        assert_eq!(int_of(inner.lookup("x")), Some(2));
        assert_eq!(int_of(outer.lookup("x")), Some(1));
    }

    #[test]
    fn test_extend_does_not_mutate_parent() {
        let parent = Env::root().extend([("a".into(), int(1))]);
        let child = parent.extend([("b".into(), int(2))]);
        assert!(child.contains("a"));
        assert!(child.contains("b"));
        assert!(!parent.contains("b"));
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_recursive_frame_sees_itself() {
        let env = Env::root().recursive(|frame| {
            assert!(frame.lookup("self").is_none());
            vec![("self".into(), int(0))]
        });
        assert!(env.contains("self"));
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let env = Env::root()
            .extend([("b".into(), int(1)), ("a".into(), int(1))])
            .bind("b".into(), int(2));
        let names: Vec<String> = env.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(env.local_names().len(), 1);
    }
}
