//! Lazy evaluator for micro-Haskell.
//!
//! This crate implements a call-by-need tree-walking interpreter over the
//! AST of `mhs-syntax`:
//! - `Thunk`: a suspended computation, evaluated at most once
//! - `Env`: immutable chains of scopes, with recursive `let` frames
//! - `Evaluator`: `evaluate` (lazy), `force` and `whnf` (strict)
//! - `Interpreter`: parse, evaluate and render with a prelude loaded
//!
//! 惰性求值解释器。

mod builtin;
mod check;
mod config;
mod env;
mod error;
mod eval;
mod interpreter;
mod pattern;
mod prelude;
mod render;
mod thunk;
mod value;

pub use builtin::{PRIMITIVES, primitive, root_env};
pub use check::check_program;
pub use config::{DEFAULT_ENTRY, InterpreterConfig};
pub use env::Env;
pub use error::{EvalResult, InterpreterError};
pub use eval::{EvalStats, Evaluator};
pub use interpreter::{Interpreter, LineResult, run, run_to_string};
pub use prelude::{PRELUDE_SOURCE, Prelude};
pub use render::{ELIDED, RenderOptions, RenderedValue, render, rendered};
pub use thunk::Thunk;
pub use value::{Closure, ConValue, PartialPrim, Primitive, Value};
