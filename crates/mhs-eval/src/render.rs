//! Printing of final values.
//!
//! Rendering forces a value completely: integers in decimal, strings quoted,
//! functions as `<function>`, constructors as `Name field ...` with nested
//! applied constructors in parentheses and tuples as `(a, b)`.

use std::fmt::{self, Write};

use mhs_common::ensure_sufficient_stack;
use mhs_syntax::names;
use serde::Serialize;

use crate::error::EvalResult;
use crate::eval::Evaluator;
use crate::value::Value;

/// Placeholder for parts of a value deeper than [`RenderOptions::max_depth`].
pub const ELIDED: &str = "…";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    /// Constructor nesting beyond this depth is printed as `…` and never
    /// forced. `None` renders everything, which diverges on infinite values.
    pub max_depth: Option<usize>,
}

impl RenderOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

/// A fully evaluated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedValue {
    Int { value: i64 },
    Str { value: String },
    Function,
    Constructor { name: String, fields: Vec<RenderedValue> },
    Elided,
}

impl RenderedValue {
    /// True for values that need parentheses when they appear as a field.
    fn is_compound(&self) -> bool {
        match self {
            RenderedValue::Int { value } => *value < 0,
            RenderedValue::Constructor { name, fields } => !fields.is_empty() && !names::is_tuple(name),
            RenderedValue::Str { .. } | RenderedValue::Function | RenderedValue::Elided => false,
        }
    }
}

/// Nested fields are unlinked iteratively so long lists drop in constant
/// stack.
impl Drop for RenderedValue {
    fn drop(&mut self) {
        let RenderedValue::Constructor { fields, .. } = self else {
            return;
        };
        let mut pending = std::mem::take(fields);
        while let Some(mut value) = pending.pop() {
            if let RenderedValue::Constructor { fields, .. } = &mut value {
                pending.append(fields);
            }
        }
    }
}

impl fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedValue::Int { value } => write!(f, "{value}"),
            RenderedValue::Str { value } => write_quoted(f, value),
            RenderedValue::Function => f.write_str("<function>"),
            RenderedValue::Elided => f.write_str(ELIDED),
            RenderedValue::Constructor { name, fields } if names::is_tuple(name) => {
                f.write_char('(')?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    ensure_sufficient_stack(|| write!(f, "{field}"))?;
                }
                f.write_char(')')
            }
            RenderedValue::Constructor { name, fields } => {
                f.write_str(name)?;
                for field in fields {
                    if field.is_compound() {
                        ensure_sufficient_stack(|| write!(f, " ({field})"))?;
                    } else {
                        ensure_sufficient_stack(|| write!(f, " {field}"))?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            _ => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

/// Force `value` completely and return it as a tree.
pub fn rendered(eval: &Evaluator, value: &Value, options: &RenderOptions) -> EvalResult<RenderedValue> {
    build(eval, value, 0, options)
}

/// Force `value` completely and print it.
pub fn render(eval: &Evaluator, value: &Value, options: &RenderOptions) -> EvalResult<String> {
    Ok(rendered(eval, value, options)?.to_string())
}

fn build(eval: &Evaluator, value: &Value, depth: usize, options: &RenderOptions) -> EvalResult<RenderedValue> {
    Ok(match value {
        Value::Int(n) => RenderedValue::Int { value: *n },
        Value::Str(s) => RenderedValue::Str { value: s.to_string() },
        Value::Closure(_) | Value::Prim(_) => RenderedValue::Function,
        Value::Con(con) => {
            let mut fields = Vec::with_capacity(con.fields.len());
            for field in &con.fields {
                if options.max_depth.is_some_and(|max| depth + 1 > max) {
                    fields.push(RenderedValue::Elided);
                    continue;
                }
                let field = eval.force(field)?;
                fields.push(ensure_sufficient_stack(|| build(eval, &field, depth + 1, options))?);
            }
            RenderedValue::Constructor {
                name: con.name.to_string(),
                fields,
            }
        }
    })
}
