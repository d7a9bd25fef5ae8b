//! Runtime values.
//!
//! A value is the weak head normal form of an expression: its outermost
//! shape is known, everything below it may still be a thunk.

use std::fmt;
use std::rc::Rc;

use mhs_common::Span;
use mhs_syntax::{Expr, Literal, Name, names};

use crate::env::Env;
use crate::error::EvalResult;
use crate::eval::Evaluator;
use crate::thunk::{Thunk, ThunkState};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// String value
    Str(Rc<str>),
    /// A lambda together with the scope it was created in
    Closure(Rc<Closure>),
    /// Constructor applied to zero or more lazy fields
    Con(Rc<ConValue>),
    /// Built-in function, possibly partially applied
    Prim(Rc<PartialPrim>),
}

/// `\param -> body` closed over `env`.
pub struct Closure {
    pub param: Name,
    pub body: Rc<Expr>,
    pub env: Env,
}

pub struct ConValue {
    pub name: Name,
    pub fields: Vec<Thunk>,
}

/// A built-in function.
///
/// Primitives receive their arguments unevaluated and force only what they
/// need, so `&&` and `seq` can be lazy in their second operand.
pub struct Primitive {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&Evaluator, &[Thunk], Span) -> EvalResult<Value>,
}

/// A primitive waiting for the rest of its arguments.
pub struct PartialPrim {
    pub prim: &'static Primitive,
    pub args: Vec<Thunk>,
}

impl Value {
    pub fn from_literal(lit: &Literal) -> Self {
        match lit {
            Literal::Int(n) => Value::Int(*n),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }

    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn con(name: impl Into<Name>, fields: Vec<Thunk>) -> Self {
        Value::Con(Rc::new(ConValue {
            name: name.into(),
            fields,
        }))
    }

    pub fn bool(b: bool) -> Self {
        Value::con(names::bool_name(b), Vec::new())
    }

    pub fn nil() -> Self {
        Value::con(names::NIL, Vec::new())
    }

    pub fn cons(head: Thunk, tail: Thunk) -> Self {
        Value::con(names::CONS, vec![head, tail])
    }

    pub fn prim(prim: &'static Primitive) -> Self {
        Value::Prim(Rc::new(PartialPrim {
            prim,
            args: Vec::new(),
        }))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    /// `True` and `False` with no fields.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Con(con) if con.fields.is_empty() => match &*con.name {
                names::TRUE => Some(true),
                names::FALSE => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_con(&self) -> Option<&ConValue> {
        match self {
            Value::Con(con) => Some(con),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Prim(_))
    }

    /// A short description for error messages, e.g. `integer 3` or
    /// `constructor Cons`.
    pub fn describe(&self) -> String {
        match self {
            Value::Int(n) => format!("integer {n}"),
            Value::Str(s) => format!("string {:?}", &**s),
            Value::Closure(_) => "a function".to_string(),
            Value::Prim(p) => format!("the built-in `{}`", p.prim.name),
            Value::Con(con) => format!("constructor {}", con.name),
        }
    }

    /// The kind of value, as used in "expected ..." messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Closure(_) | Value::Prim(_) => "function",
            Value::Con(_) => "constructor",
        }
    }
}

/// Shallow: fields that are still thunks print as `_`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Closure(c) => write!(f, "<function \\{}>", c.param),
            Value::Prim(p) => write!(f, "<built-in {}/{}>", p.prim.name, p.args.len()),
            Value::Con(con) => {
                write!(f, "{}", con.name)?;
                for field in &con.fields {
                    match field.value().as_ref() {
                        Some(value @ Value::Con(inner)) if !inner.fields.is_empty() => {
                            write!(f, " ({value:?})")?
                        }
                        Some(value) => write!(f, " {value:?}")?,
                        None => write!(f, " _")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Unlinks chains of uniquely owned, forced fields iteratively so dropping a
/// long list does not recurse once per cell.
impl Drop for ConValue {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.fields);
        while let Some(thunk) = pending.pop() {
            let Ok(cell) = Rc::try_unwrap(thunk.state) else {
                continue;
            };
            if let ThunkState::Forced(Value::Con(con)) | ThunkState::Ready(Value::Con(con)) =
                cell.into_inner()
                && let Ok(mut con) = Rc::try_unwrap(con)
            {
                pending.append(&mut con.fields);
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}
