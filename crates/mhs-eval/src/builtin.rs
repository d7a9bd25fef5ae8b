//! Built-in functions.
//!
//! Every primitive is pre-bound in the root environment under its name.
//! Arguments arrive as thunks; each primitive forces exactly the operands it
//! needs.

use std::cmp::Ordering;

use mhs_common::{Span, ensure_sufficient_stack};
use mhs_syntax::names;

use crate::env::Env;
use crate::error::{EvalResult, InterpreterError};
use crate::eval::Evaluator;
use crate::render::{self, RenderOptions};
use crate::thunk::Thunk;
use crate::value::{Primitive, Value};

/// All built-in functions.
pub static PRIMITIVES: &[Primitive] = &[
    // === Arithmetic ===
    Primitive { name: "+", arity: 2, func: add },
    Primitive { name: "-", arity: 2, func: sub },
    Primitive { name: "*", arity: 2, func: mul },
    Primitive { name: "/", arity: 2, func: quot },
    Primitive { name: "%", arity: 2, func: rem },
    Primitive { name: "div", arity: 2, func: div },
    Primitive { name: "mod", arity: 2, func: modulo },
    Primitive { name: "negate", arity: 1, func: negate },
    // === Comparison ===
    Primitive { name: "==", arity: 2, func: eq },
    Primitive { name: "/=", arity: 2, func: ne },
    Primitive { name: "!=", arity: 2, func: ne },
    Primitive { name: "<", arity: 2, func: lt },
    Primitive { name: "<=", arity: 2, func: le },
    Primitive { name: ">", arity: 2, func: gt },
    Primitive { name: ">=", arity: 2, func: ge },
    // === Booleans ===
    Primitive { name: "&&", arity: 2, func: and },
    Primitive { name: "||", arity: 2, func: or },
    Primitive { name: "not", arity: 1, func: not },
    // === Lists ===
    Primitive { name: "null", arity: 1, func: null },
    Primitive { name: "head", arity: 1, func: head },
    Primitive { name: "tail", arity: 1, func: tail },
    // === Strings ===
    Primitive { name: "<>", arity: 2, func: append },
    Primitive { name: "show", arity: 1, func: show },
    Primitive { name: "strLength", arity: 1, func: str_length },
    // === Control ===
    Primitive { name: "seq", arity: 2, func: seq },
    Primitive { name: "error", arity: 1, func: error },
    Primitive { name: "trace", arity: 2, func: trace },
];

/// Look up a primitive by name.
pub fn primitive(name: &str) -> Option<&'static Primitive> {
    PRIMITIVES.iter().find(|p| p.name == name)
}

/// The environment holding every primitive and nothing else.
pub fn root_env() -> Env {
    Env::root().extend(
        PRIMITIVES
            .iter()
            .map(|prim| (prim.name.into(), Thunk::ready(Value::prim(prim)))),
    )
}

// ========== Arithmetic ==========

fn ints(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<(i64, i64)> {
    Ok((eval.force_int(&args[0], span)?, eval.force_int(&args[1], span)?))
}

fn overflow(span: Span) -> InterpreterError {
    InterpreterError::arithmetic("integer overflow", span)
}

/// Divisor check shared by `/`, `%`, `div` and `mod`.
fn divisor(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<(i64, i64)> {
    let (a, b) = ints(eval, args, span)?;
    if b == 0 {
        return Err(InterpreterError::arithmetic("division by zero", span));
    }
    Ok((a, b))
}

fn add(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = ints(eval, args, span)?;
    a.checked_add(b).map(Value::Int).ok_or_else(|| overflow(span))
}

fn sub(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = ints(eval, args, span)?;
    a.checked_sub(b).map(Value::Int).ok_or_else(|| overflow(span))
}

fn mul(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = ints(eval, args, span)?;
    a.checked_mul(b).map(Value::Int).ok_or_else(|| overflow(span))
}

/// Truncating division.
fn quot(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = divisor(eval, args, span)?;
    a.checked_div(b).map(Value::Int).ok_or_else(|| overflow(span))
}

/// Remainder of truncating division; takes the sign of the dividend.
fn rem(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = divisor(eval, args, span)?;
    a.checked_rem(b).map(Value::Int).ok_or_else(|| overflow(span))
}

/// Division rounding towards negative infinity.
fn div(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = divisor(eval, args, span)?;
    let q = a.checked_div(b).ok_or_else(|| overflow(span))?;
    let r = a.checked_rem(b).ok_or_else(|| overflow(span))?;
    Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }))
}

/// Modulus; takes the sign of the divisor.
fn modulo(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let (a, b) = divisor(eval, args, span)?;
    let r = a.checked_rem(b).ok_or_else(|| overflow(span))?;
    Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
}

fn negate(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let n = eval.force_int(&args[0], span)?;
    n.checked_neg().map(Value::Int).ok_or_else(|| overflow(span))
}

// ========== Comparison ==========

fn eq(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let a = eval.force(&args[0])?;
    let b = eval.force(&args[1])?;
    Ok(Value::bool(values_equal(eval, a, b, span)?))
}

fn ne(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let a = eval.force(&args[0])?;
    let b = eval.force(&args[1])?;
    Ok(Value::bool(!values_equal(eval, a, b, span)?))
}

/// Structural equality. Constructor fields are forced pairwise, left to
/// right, stopping at the first difference. The last field is followed in a
/// loop so long lists compare in constant stack.
fn values_equal(eval: &Evaluator, mut a: Value, mut b: Value, span: Span) -> EvalResult<bool> {
    loop {
        let (next_a, next_b) = match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => return Ok(x == y),
            (Value::Str(x), Value::Str(y)) => return Ok(x == y),
            (Value::Con(x), Value::Con(y)) => {
                if x.name != y.name || x.fields.len() != y.fields.len() {
                    return Ok(false);
                }
                let Some((last_x, init_x)) = x.fields.split_last() else {
                    return Ok(true);
                };
                for (fx, fy) in init_x.iter().zip(&y.fields) {
                    let (vx, vy) = (eval.force(fx)?, eval.force(fy)?);
                    if !ensure_sufficient_stack(|| values_equal(eval, vx, vy, span))? {
                        return Ok(false);
                    }
                }
                (eval.force(last_x)?, eval.force(&y.fields[init_x.len()])?)
            }
            (Value::Closure(_) | Value::Prim(_), _) | (_, Value::Closure(_) | Value::Prim(_)) => {
                return Err(InterpreterError::type_error(
                    "a value that can be compared",
                    "a function",
                    span,
                ));
            }
            (x, y) => return Err(InterpreterError::type_error(x.kind_name(), y.describe(), span)),
        };
        a = next_a;
        b = next_b;
    }
}

fn compare(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Ordering> {
    let a = eval.force(&args[0])?;
    let b = eval.force(&args[1])?;
    match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        (Value::Int(_) | Value::Str(_), other) => {
            Err(InterpreterError::type_error(a.kind_name(), other.describe(), span))
        }
        (other, _) => Err(InterpreterError::type_error(
            "an integer or a string",
            other.describe(),
            span,
        )),
    }
}

fn lt(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(compare(eval, args, span)?.is_lt()))
}

fn le(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(compare(eval, args, span)?.is_le()))
}

fn gt(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(compare(eval, args, span)?.is_gt()))
}

fn ge(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(compare(eval, args, span)?.is_ge()))
}

// ========== Booleans ==========

fn and(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    if !eval.force_bool(&args[0], span)? {
        return Ok(Value::bool(false));
    }
    Ok(Value::bool(eval.force_bool(&args[1], span)?))
}

fn or(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    if eval.force_bool(&args[0], span)? {
        return Ok(Value::bool(true));
    }
    Ok(Value::bool(eval.force_bool(&args[1], span)?))
}

fn not(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(!eval.force_bool(&args[0], span)?))
}

// ========== Lists ==========

/// `Ok(None)` for `Nil`, `Ok(Some((head, tail)))` for `Cons`.
fn uncons(eval: &Evaluator, thunk: &Thunk, span: Span) -> EvalResult<Option<(Thunk, Thunk)>> {
    let value = eval.force(thunk)?;
    match value.as_con() {
        Some(con) if &*con.name == names::NIL && con.fields.is_empty() => Ok(None),
        Some(con) if &*con.name == names::CONS && con.fields.len() == 2 => {
            Ok(Some((con.fields[0].clone(), con.fields[1].clone())))
        }
        _ => Err(InterpreterError::type_error("a list", value.describe(), span)),
    }
}

fn empty_list(name: &str, span: Span) -> InterpreterError {
    InterpreterError::NonExhaustiveMatch {
        value: format!("{} (`{name}` of an empty list)", names::NIL),
        span,
    }
}

fn null(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    Ok(Value::bool(uncons(eval, &args[0], span)?.is_none()))
}

fn head(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    match uncons(eval, &args[0], span)? {
        Some((head, _)) => eval.force(&head),
        None => Err(empty_list("head", span)),
    }
}

fn tail(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    match uncons(eval, &args[0], span)? {
        Some((_, tail)) => eval.force(&tail),
        None => Err(empty_list("tail", span)),
    }
}

// ========== Strings ==========

fn append(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let a = eval.force_str(&args[0], span)?;
    let b = eval.force_str(&args[1], span)?;
    Ok(Value::str(format!("{a}{b}")))
}

/// Render any value the way the top level prints it; strings come back
/// quoted.
fn show(eval: &Evaluator, args: &[Thunk], _span: Span) -> EvalResult<Value> {
    let value = eval.force(&args[0])?;
    Ok(Value::str(render::render(eval, &value, &RenderOptions::default())?))
}

fn str_length(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let s = eval.force_str(&args[0], span)?;
    i64::try_from(s.chars().count())
        .map(Value::Int)
        .map_err(|_| overflow(span))
}

// ========== Control ==========

fn seq(eval: &Evaluator, args: &[Thunk], _span: Span) -> EvalResult<Value> {
    eval.force(&args[0])?;
    eval.force(&args[1])
}

fn error(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let message = eval.force_str(&args[0], span)?;
    Err(InterpreterError::User {
        message: message.to_string(),
        span,
    })
}

fn trace(eval: &Evaluator, args: &[Thunk], span: Span) -> EvalResult<Value> {
    let message = eval.force_str(&args[0], span)?;
    eval.record_trace(message.to_string());
    eval.force(&args[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> EvalResult<Value> {
        let prim = primitive(name).unwrap();
        let args: Vec<Thunk> = args.into_iter().map(Thunk::ready).collect();
        (prim.func)(&Evaluator::new(), &args, Span::DUMMY)
    }

    fn int(name: &str, a: i64, b: i64) -> EvalResult<Option<i64>> {
        call(name, vec![Value::Int(a), Value::Int(b)]).map(|v| v.as_int())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(int("+", 2, 3).unwrap(), Some(5));
        assert_eq!(int("-", 2, 3).unwrap(), Some(-1));
        assert_eq!(int("*", 4, 3).unwrap(), Some(12));
        assert_eq!(int("/", 7, 2).unwrap(), Some(3));
        assert_eq!(int("/", -7, 2).unwrap(), Some(-3));
        assert_eq!(int("%", -7, 2).unwrap(), Some(-1));
    }

    #[test]
    fn test_div_mod_round_down() {
        assert_eq!(int("div", -7, 2).unwrap(), Some(-4));
        assert_eq!(int("mod", -7, 2).unwrap(), Some(1));
        assert_eq!(int("div", 7, -2).unwrap(), Some(-4));
        assert_eq!(int("mod", 7, -2).unwrap(), Some(-1));
        assert_eq!(int("mod", 6, 3).unwrap(), Some(0));
    }

    #[test]
    fn test_division_by_zero() {
        for op in ["/", "%", "div", "mod"] {
            let err = int(op, 1, 0).unwrap_err();
            assert!(matches!(err, InterpreterError::Arithmetic { .. }), "{op}");
        }
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            int("+", i64::MAX, 1),
            Err(InterpreterError::Arithmetic { .. })
        ));
        assert!(matches!(
            int("/", i64::MIN, -1),
            Err(InterpreterError::Arithmetic { .. })
        ));
    }

    #[test]
    fn test_type_error() {
        let err = call("+", vec![Value::Int(1), Value::str("a")]).unwrap_err();
        assert!(matches!(err, InterpreterError::Type { .. }));
    }

    #[test]
    fn test_comparisons() {
        let lt = call("<", vec![Value::str("a"), Value::str("b")]).unwrap();
        assert_eq!(lt.as_bool(), Some(true));
        let ne = call("/=", vec![Value::Int(1), Value::Int(1)]).unwrap();
        assert_eq!(ne.as_bool(), Some(false));
    }

    #[test]
    fn test_structural_equality() {
        let pair = |a, b| {
            Value::con(
                names::tuple(2),
                vec![Thunk::ready(Value::Int(a)), Thunk::ready(Value::Int(b))],
            )
        };
        assert_eq!(call("==", vec![pair(1, 2), pair(1, 2)]).unwrap().as_bool(), Some(true));
        assert_eq!(call("==", vec![pair(1, 2), pair(1, 3)]).unwrap().as_bool(), Some(false));
        assert_eq!(call("==", vec![Value::nil(), pair(1, 3)]).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_head_of_nil() {
        let err = call("head", vec![Value::nil()]).unwrap_err();
        assert!(matches!(err, InterpreterError::NonExhaustiveMatch { .. }));
    }

    #[test]
    fn test_error_primitive() {
        let err = call("error", vec![Value::str("boom")]).unwrap_err();
        assert_eq!(err.to_string(), "error: boom");
    }

    #[test]
    fn test_every_primitive_is_bound() {
        let env = root_env();
        for prim in PRIMITIVES {
            assert!(env.contains(prim.name), "{} missing", prim.name);
        }
    }
}
