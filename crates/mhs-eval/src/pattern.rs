//! Pattern matching for `case` alternatives.
//!
//! Matching forces only what a pattern inspects: variables and wildcards
//! leave constructor fields unevaluated, literal and constructor patterns
//! force the field they are matched against.

use std::rc::Rc;

use mhs_common::Span;
use mhs_syntax::{Alt, Expr, Literal, Name, Pattern, PatternKind};

use crate::error::{EvalResult, InterpreterError};
use crate::eval::Evaluator;
use crate::thunk::Thunk;
use crate::value::Value;

type Bindings = Vec<(Name, Thunk)>;

/// Pick the first alternative whose pattern matches `value`.
pub(crate) fn select(
    eval: &Evaluator,
    value: &Value,
    alts: &[Alt],
    span: Span,
) -> EvalResult<(Rc<Expr>, Bindings)> {
    for alt in alts {
        let mut bindings = Vec::new();
        if match_value(eval, &alt.pattern, value, &mut bindings)? {
            return Ok((alt.body.clone(), bindings));
        }
    }
    Err(InterpreterError::NonExhaustiveMatch {
        value: format!("{value:?}"),
        span,
    })
}

fn match_value(eval: &Evaluator, pattern: &Pattern, value: &Value, out: &mut Bindings) -> EvalResult<bool> {
    match &pattern.kind {
        PatternKind::Wildcard => Ok(true),
        PatternKind::Var(name) => {
            out.push((name.clone(), Thunk::ready(value.clone())));
            Ok(true)
        }
        PatternKind::Lit(lit) => match_literal(lit, value, pattern.span),
        PatternKind::Con { name, args } => match value {
            Value::Con(con) => {
                if con.name != *name || con.fields.len() != args.len() {
                    return Ok(false);
                }
                for (pattern, field) in args.iter().zip(&con.fields) {
                    if !match_thunk(eval, pattern, field, out)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            other => Err(InterpreterError::type_error(
                format!("constructor {name}"),
                other.describe(),
                pattern.span,
            )),
        },
    }
}

fn match_thunk(eval: &Evaluator, pattern: &Pattern, thunk: &Thunk, out: &mut Bindings) -> EvalResult<bool> {
    match &pattern.kind {
        PatternKind::Wildcard => Ok(true),
        PatternKind::Var(name) => {
            out.push((name.clone(), thunk.clone()));
            Ok(true)
        }
        PatternKind::Lit(_) | PatternKind::Con { .. } => {
            let value = eval.force(thunk)?;
            match_value(eval, pattern, &value, out)
        }
    }
}

/// A literal never matches a constructor, so later alternatives still get a
/// chance. Other mismatches are type errors.
fn match_literal(lit: &Literal, value: &Value, span: Span) -> EvalResult<bool> {
    match (lit, value) {
        (Literal::Int(expected), Value::Int(found)) => Ok(expected == found),
        (Literal::Str(expected), Value::Str(found)) => Ok(expected == found),
        (_, Value::Con(_)) => Ok(false),
        (Literal::Int(_), other) => Err(InterpreterError::type_error("an integer", other.describe(), span)),
        (Literal::Str(_), other) => Err(InterpreterError::type_error("a string", other.describe(), span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use mhs_syntax::names;

    fn list(items: &[i64]) -> Value {
        items.iter().rev().fold(Value::nil(), |tail, &n| {
            Value::cons(Thunk::ready(Value::Int(n)), Thunk::ready(tail))
        })
    }

    fn cons(head: Pattern, tail: Pattern) -> Pattern {
        Pattern::con(names::CONS, vec![head, tail], Span::DUMMY)
    }

    fn wildcard() -> Pattern {
        Pattern::new(PatternKind::Wildcard, Span::DUMMY)
    }

    fn matches(pattern: &Pattern, value: &Value) -> EvalResult<Option<Bindings>> {
        let mut out = Vec::new();
        let matched = match_value(&Evaluator::new(), pattern, value, &mut out)?;
        Ok(matched.then_some(out))
    }

    #[test]
    fn test_cons_pattern_binds_fields() {
        let pattern = cons(Pattern::var("x", Span::DUMMY), Pattern::var("xs", Span::DUMMY));
        let bindings = matches(&pattern, &list(&[1, 2])).unwrap().unwrap();
        let names: Vec<&str> = bindings.iter().map(|(n, _)| &**n).collect();
        assert_eq!(names, ["x", "xs"]);
    }

    #[test]
    fn test_constructor_mismatch() {
        let pattern = cons(wildcard(), wildcard());
        assert!(matches(&pattern, &Value::nil()).unwrap().is_none());
    }

    #[test]
    fn test_literal_pattern_forces_field() {
        let one = Pattern::new(PatternKind::Lit(Literal::Int(1)), Span::DUMMY);
        let pattern = cons(one, wildcard());
        assert!(matches(&pattern, &list(&[1])).unwrap().is_some());
        assert!(matches(&pattern, &list(&[2])).unwrap().is_none());
    }

    #[test]
    fn test_variable_does_not_force() {
        let eval = Evaluator::new();
        let pending = eval.evaluate(&Expr::var("missing", Span::DUMMY), &Env::root());
        let value = Value::cons(pending.clone(), Thunk::ready(Value::nil()));
        let pattern = cons(Pattern::var("x", Span::DUMMY), wildcard());
        assert!(matches(&pattern, &value).unwrap().is_some());
        assert!(!pending.is_forced());
    }

    #[test]
    fn test_literal_does_not_match_constructor() {
        let pattern = Pattern::new(PatternKind::Lit(Literal::Int(0)), Span::DUMMY);
        assert!(matches(&pattern, &Value::con("Nothing", vec![])).unwrap().is_none());
        let pattern = Pattern::new(PatternKind::Lit(Literal::Str("a".into())), Span::DUMMY);
        assert!(matches(&pattern, &Value::nil()).unwrap().is_none());
    }

    #[test]
    fn test_literal_against_wrong_kind_is_type_error() {
        let pattern = Pattern::new(PatternKind::Lit(Literal::Int(1)), Span::DUMMY);
        let err = matches(&pattern, &Value::str("1")).unwrap_err();
        assert!(matches!(err, InterpreterError::Type { .. }));
    }
}
