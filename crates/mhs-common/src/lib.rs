//! Common utilities and data structures for micro-Haskell.
//!
//! This crate provides the foundational types used across the interpreter:
//! - `Span`: byte ranges in source text
//! - `Position`: 1-based line/column pairs for human-facing messages
//! - `LineIndex`: conversion from byte offsets to positions
//! - `ensure_sufficient_stack`: on-demand stack growth for deep recursion

mod line_index;
mod span;
mod stack;

pub use line_index::{LineIndex, Position};
pub use stack::ensure_sufficient_stack;
pub use span::{BytePos, Span};
