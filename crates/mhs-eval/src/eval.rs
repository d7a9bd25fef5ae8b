//! The call-by-need evaluator.
//!
//! `evaluate` suspends an expression as a thunk, `force` runs a thunk at most
//! once and `whnf` reduces an expression to weak head normal form. Tail
//! positions (the body of an applied closure, a `let` body, the chosen `case`
//! alternative) are handled by looping in `whnf`, so tail-recursive programs
//! run in constant host stack.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use mhs_common::{Span, ensure_sufficient_stack};
use mhs_syntax::{Binding, Expr, ExprKind, Name};
use serde::Serialize;

use crate::env::Env;
use crate::error::{EvalResult, InterpreterError};
use crate::pattern;
use crate::thunk::{Thunk, ThunkState};
use crate::value::{Closure, PartialPrim, Value};

/// Counters describing the work done by an [`Evaluator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalStats {
    /// Suspended computations allocated.
    pub thunks_created: u64,
    /// Suspended computations actually run.
    pub thunks_forced: u64,
    /// Forces answered from the memo without recomputation.
    pub memo_hits: u64,
    /// Closure applications.
    pub applications: u64,
    /// Saturated primitive calls.
    pub primitive_calls: u64,
}

impl fmt::Display for EvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "thunks created:  {}", self.thunks_created)?;
        writeln!(f, "thunks forced:   {}", self.thunks_forced)?;
        writeln!(f, "memo hits:       {}", self.memo_hits)?;
        writeln!(f, "applications:    {}", self.applications)?;
        write!(f, "primitive calls: {}", self.primitive_calls)
    }
}

/// Result of applying a function to its arguments.
enum TcoResult {
    /// Normal value result
    Value(Value),
    /// The last argument went to a closure: continue with its body.
    TailCall { body: Rc<Expr>, env: Env },
}

/// The evaluator.
///
/// Evaluation state lives in thunks and environments; the evaluator itself
/// only keeps statistics and the `trace` log, so one evaluator can force
/// values produced by another.
#[derive(Debug, Default)]
pub struct Evaluator {
    stats: Cell<EvalStats>,
    trace_log: RefCell<Vec<String>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend `expr` in `env` without evaluating it.
    ///
    /// Literals and lambdas are already values, and a variable shares the
    /// thunk it is bound to.
    pub fn evaluate(&self, expr: &Rc<Expr>, env: &Env) -> Thunk {
        match &expr.kind {
            ExprKind::Var(name) => match env.lookup(name) {
                Some(thunk) => thunk,
                None => self.delay(expr, env, None),
            },
            _ => self.suspend(expr, env, None),
        }
    }

    /// Like [`evaluate`](Self::evaluate) but never looks anything up, so it
    /// is safe while `env` is still being built.
    fn suspend(&self, expr: &Rc<Expr>, env: &Env, name: Option<Name>) -> Thunk {
        match &expr.kind {
            ExprKind::Lit(lit) => Thunk::ready(Value::from_literal(lit)),
            ExprKind::Lambda { param, body } => Thunk::ready(Value::Closure(Rc::new(Closure {
                param: param.clone(),
                body: body.clone(),
                env: env.clone(),
            }))),
            _ => self.delay(expr, env, name),
        }
    }

    fn delay(&self, expr: &Rc<Expr>, env: &Env, name: Option<Name>) -> Thunk {
        self.bump(|s| s.thunks_created += 1);
        Thunk::delayed(expr.clone(), env.clone(), name)
    }

    /// Bind a group of mutually recursive definitions in a new scope.
    pub fn bind_recursive(&self, bindings: &[Binding], env: &Env) -> Env {
        env.recursive(|frame| {
            bindings
                .iter()
                .map(|b| (b.name.clone(), self.suspend(&b.expr, frame, Some(b.name.clone()))))
                .collect()
        })
    }

    /// Reduce a thunk to weak head normal form, at most once.
    pub fn force(&self, thunk: &Thunk) -> EvalResult<Value> {
        match &*thunk.state.borrow() {
            ThunkState::Ready(value) => return Ok(value.clone()),
            ThunkState::Forced(value) => {
                self.bump(|s| s.memo_hits += 1);
                return Ok(value.clone());
            }
            ThunkState::Delayed { .. } | ThunkState::Forcing { .. } => {}
        }

        let (expr, env, name) = {
            let mut state = thunk.state.borrow_mut();
            let previous = std::mem::replace(
                &mut *state,
                ThunkState::Forcing {
                    name: None,
                    span: Span::DUMMY,
                },
            );
            match previous {
                ThunkState::Delayed { expr, env, name } => {
                    *state = ThunkState::Forcing {
                        name: name.clone(),
                        span: expr.span,
                    };
                    (expr, env, name)
                }
                ThunkState::Forcing { name, span } => {
                    *state = ThunkState::Forcing {
                        name: name.clone(),
                        span,
                    };
                    let name = name.map_or_else(|| "<expression>".to_string(), |n| n.to_string());
                    tracing::debug!(%name, "blackhole: thunk re-entered while being forced");
                    return Err(InterpreterError::DivergingReference { name, span });
                }
                ThunkState::Ready(value) => {
                    *state = ThunkState::Ready(value.clone());
                    return Ok(value);
                }
                ThunkState::Forced(value) => {
                    *state = ThunkState::Forced(value.clone());
                    return Ok(value);
                }
            }
        };

        self.bump(|s| s.thunks_forced += 1);
        tracing::trace!(name = ?name, span = ?expr.span, "forcing thunk");
        let result = ensure_sufficient_stack(|| self.whnf(&expr, &env));

        let mut state = thunk.state.borrow_mut();
        match result {
            Ok(value) => {
                *state = ThunkState::Forced(value.clone());
                Ok(value)
            }
            Err(err) => {
                *state = ThunkState::Delayed { expr, env, name };
                Err(err)
            }
        }
    }

    /// Evaluate `expr` in `env` to weak head normal form.
    pub fn whnf(&self, expr: &Rc<Expr>, env: &Env) -> EvalResult<Value> {
        let mut expr = expr.clone();
        let mut env = env.clone();

        loop {
            let node = expr.clone();
            match &node.kind {
                ExprKind::Lit(lit) => return Ok(Value::from_literal(lit)),

                ExprKind::Var(name) => {
                    let thunk = env.lookup(name).ok_or_else(|| InterpreterError::UnboundVariable {
                        name: name.to_string(),
                        span: node.span,
                    })?;
                    return self.force(&thunk);
                }

                ExprKind::Lambda { param, body } => {
                    return Ok(Value::Closure(Rc::new(Closure {
                        param: param.clone(),
                        body: body.clone(),
                        env,
                    })));
                }

                ExprKind::Con { name, args } => {
                    let fields = args.iter().map(|arg| self.evaluate(arg, &env)).collect();
                    return Ok(Value::con(name.clone(), fields));
                }

                ExprKind::App { func, arg } => {
                    let mut head = func;
                    let mut args = vec![arg];
                    while let ExprKind::App { func, arg } = &head.kind {
                        args.push(arg);
                        head = func;
                    }
                    args.reverse();

                    let func = self.whnf(head, &env)?;
                    let args = args.into_iter().map(|arg| self.evaluate(arg, &env)).collect();
                    match self.call(func, args, node.span)? {
                        TcoResult::Value(value) => return Ok(value),
                        TcoResult::TailCall { body, env: callee } => {
                            expr = body;
                            env = callee;
                        }
                    }
                }

                ExprKind::Let { bindings, body } => {
                    env = self.bind_recursive(bindings, &env);
                    expr = body.clone();
                }

                ExprKind::Case { scrutinee, alts } => {
                    let value = ensure_sufficient_stack(|| self.whnf(scrutinee, &env))?;
                    let (body, bound) = pattern::select(self, &value, alts, node.span)?;
                    if !bound.is_empty() {
                        env = env.extend(bound);
                    }
                    expr = body;
                }
            }
        }
    }

    /// Apply `func` to `args` and evaluate the result to weak head normal form.
    pub fn apply(&self, func: Value, args: Vec<Thunk>, span: Span) -> EvalResult<Value> {
        match self.call(func, args, span)? {
            TcoResult::Value(value) => Ok(value),
            TcoResult::TailCall { body, env } => self.whnf(&body, &env),
        }
    }

    /// Apply `func` to each argument in turn. The application of the last
    /// argument to a closure is handed back to the caller as a tail call.
    fn call(&self, mut func: Value, args: Vec<Thunk>, span: Span) -> EvalResult<TcoResult> {
        let mut args = args.into_iter().peekable();
        while let Some(arg) = args.next() {
            func = match func {
                Value::Closure(closure) => {
                    self.bump(|s| s.applications += 1);
                    let env = closure.env.bind(closure.param.clone(), arg);
                    if args.peek().is_none() {
                        return Ok(TcoResult::TailCall {
                            body: closure.body.clone(),
                            env,
                        });
                    }
                    ensure_sufficient_stack(|| self.whnf(&closure.body, &env))?
                }
                Value::Prim(partial) => self.call_prim(&partial, arg, span)?,
                Value::Con(con) => {
                    let mut fields = con.fields.clone();
                    fields.push(arg);
                    Value::con(con.name.clone(), fields)
                }
                other @ (Value::Int(_) | Value::Str(_)) => {
                    return Err(InterpreterError::NotAFunction {
                        found: other.describe(),
                        span,
                    });
                }
            };
        }
        Ok(TcoResult::Value(func))
    }

    fn call_prim(&self, partial: &PartialPrim, arg: Thunk, span: Span) -> EvalResult<Value> {
        let mut args = partial.args.clone();
        args.push(arg);
        if args.len() < partial.prim.arity {
            return Ok(Value::Prim(Rc::new(PartialPrim {
                prim: partial.prim,
                args,
            })));
        }
        self.bump(|s| s.primitive_calls += 1);
        ensure_sufficient_stack(|| (partial.prim.func)(self, &args, span))
    }

    // ========== Forcing helpers for primitives ==========

    pub fn force_int(&self, thunk: &Thunk, span: Span) -> EvalResult<i64> {
        match self.force(thunk)? {
            Value::Int(n) => Ok(n),
            other => Err(InterpreterError::type_error("an integer", other.describe(), span)),
        }
    }

    pub fn force_str(&self, thunk: &Thunk, span: Span) -> EvalResult<Rc<str>> {
        match self.force(thunk)? {
            Value::Str(s) => Ok(s),
            other => Err(InterpreterError::type_error("a string", other.describe(), span)),
        }
    }

    pub fn force_bool(&self, thunk: &Thunk, span: Span) -> EvalResult<bool> {
        let value = self.force(thunk)?;
        value
            .as_bool()
            .ok_or_else(|| InterpreterError::type_error("True or False", value.describe(), span))
    }

    // ========== Statistics and trace log ==========

    pub fn stats(&self) -> EvalStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(EvalStats::default());
    }

    fn bump(&self, update: impl FnOnce(&mut EvalStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Messages recorded by `trace`, oldest first.
    pub fn trace_log(&self) -> Vec<String> {
        self.trace_log.borrow().clone()
    }

    pub fn take_trace_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.trace_log.borrow_mut())
    }

    pub(crate) fn record_trace(&self, message: String) {
        tracing::info!(target: "mhs::trace", "{message}");
        self.trace_log.borrow_mut().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use mhs_parser::parse_expr;

    fn whnf(source: &str) -> EvalResult<Value> {
        let expr = parse_expr(source).expect("parse failed");
        Evaluator::new().whnf(&expr, &builtin::root_env())
    }

    #[test]
    fn test_literal() {
        assert_eq!(whnf("42").unwrap().as_int(), Some(42));
    }

    #[test]
    fn test_application() {
        assert_eq!(whnf("(\\a b -> a - b) 10 4").unwrap().as_int(), Some(6));
    }

    #[test]
    fn test_partial_application_is_a_function() {
        assert!(whnf("(\\a b -> a) 1").unwrap().is_function());
        assert!(whnf("(+) 1").unwrap().is_function());
    }

    #[test]
    fn test_constructor_application_adds_fields() {
        let value = whnf("(\\f -> f 1 2) Pair").unwrap();
        let con = value.as_con().unwrap();
        assert_eq!(&*con.name, "Pair");
        assert_eq!(con.fields.len(), 2);
    }

    #[test]
    fn test_unforced_argument_is_never_evaluated() {
        assert_eq!(whnf("(\\x -> 1) (1 / 0)").unwrap().as_int(), Some(1));
    }

    #[test]
    fn test_not_a_function() {
        let err = whnf("1 2").unwrap_err();
        assert!(matches!(err, InterpreterError::NotAFunction { .. }));
    }

    #[test]
    fn test_blackhole() {
        let err = whnf("let x = x + 1 in x").unwrap_err();
        assert!(matches!(err, InterpreterError::DivergingReference { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_sharing_counts() {
        let expr = parse_expr("let x = 1 + 2 in x * x").unwrap();
        let eval = Evaluator::new();
        let value = eval.whnf(&expr, &builtin::root_env()).unwrap();
        assert_eq!(value.as_int(), Some(9));
        let stats = eval.stats();
        assert_eq!(stats.thunks_created, 1);
        assert_eq!(stats.thunks_forced, 1);
        assert_eq!(stats.memo_hits, 1);
        assert_eq!(stats.primitive_calls, 2);
    }

    #[test]
    fn test_failed_thunk_can_be_forced_again() {
        let expr = parse_expr("1 `div` 0").unwrap();
        let eval = Evaluator::new();
        let thunk = eval.evaluate(&expr, &builtin::root_env());
        assert!(eval.force(&thunk).is_err());
        assert!(matches!(
            eval.force(&thunk),
            Err(InterpreterError::Arithmetic { .. })
        ));
        assert!(!thunk.is_forced());
    }

    #[test]
    fn test_tail_calls_run_in_constant_stack() {
        let source = "let count n = if n == 0 then 0 else count (n - 1) in count 100000";
        assert_eq!(whnf(source).unwrap().as_int(), Some(0));
    }
}
