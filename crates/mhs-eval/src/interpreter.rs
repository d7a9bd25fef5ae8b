//! The interpreter façade: parse, evaluate and render in one place.

use std::collections::HashSet;

use mhs_diagnostic::Diagnostic;
use mhs_parser::{FixityTable, parse_program};
use mhs_syntax::{Name, Program};

use crate::builtin;
use crate::check::check_program;
use crate::config::InterpreterConfig;
use crate::env::Env;
use crate::error::{EvalResult, InterpreterError};
use crate::eval::{EvalStats, Evaluator};
use crate::prelude::Prelude;
use crate::render::{self, RenderedValue};
use crate::value::Value;

/// Evaluate `source` with the default configuration.
pub fn run(source: &str) -> EvalResult<Value> {
    Interpreter::new(InterpreterConfig::default())?.run(source)
}

/// Evaluate `source` with the default configuration and print the result.
pub fn run_to_string(source: &str) -> EvalResult<String> {
    let interpreter = Interpreter::new(InterpreterConfig::default())?;
    let value = interpreter.run(source)?;
    interpreter.render(&value)
}

/// What a REPL line produced.
#[derive(Debug)]
pub enum LineResult {
    /// An expression was evaluated.
    Value(Value),
    /// Declarations were added to the session.
    Defined(Vec<Name>),
}

/// An interpreter session.
///
/// The root scope holds the primitives and, unless disabled, the prelude.
/// Declarations entered through [`eval_line`](Self::eval_line) are layered
/// on top; a later definition shadows an earlier one.
pub struct Interpreter {
    config: InterpreterConfig,
    evaluator: Evaluator,
    session: Env,
    fixities: FixityTable,
    session_names: Vec<Name>,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> EvalResult<Self> {
        let evaluator = Evaluator::new();
        let mut session = builtin::root_env();
        let mut fixities = FixityTable::default();
        if config.prelude {
            let prelude = Prelude::load(&evaluator, &session)?;
            session = prelude.env;
            fixities = prelude.fixities;
        }
        evaluator.reset_stats();

        Ok(Self {
            config,
            evaluator,
            session,
            fixities,
            session_names: Vec::new(),
        })
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn fixities(&self) -> &FixityTable {
        &self.fixities
    }

    /// Evaluate a whole program to weak head normal form. A module evaluates
    /// to its entry binding. The session is left unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run(&self, source: &str) -> EvalResult<Value> {
        let parsed = parse_program(source, &self.fixities)?;
        let value = self.evaluate_program(&parsed.program);
        tracing::debug!(stats = ?self.evaluator.stats(), ok = value.is_ok(), "evaluation finished");
        value
    }

    pub fn evaluate_program(&self, program: &Program) -> EvalResult<Value> {
        match program {
            Program::Expr(expr) => self.evaluator.whnf(expr, &self.session),
            Program::Module(module) => {
                let entry = self.config.entry.as_str();
                let missing = || InterpreterError::UnboundVariable {
                    name: entry.to_string(),
                    span: module.span,
                };
                if module.binding(entry).is_none() {
                    return Err(missing());
                }
                let env = self.evaluator.bind_recursive(&module.bindings, &self.session);
                let thunk = env.lookup(entry).ok_or_else(missing)?;
                self.evaluator.force(&thunk)
            }
        }
    }

    /// Evaluate one REPL line: declarations extend the session, an
    /// expression is evaluated in it.
    pub fn eval_line(&mut self, source: &str) -> EvalResult<LineResult> {
        let parsed = parse_program(source, &self.fixities)?;
        match parsed.program {
            Program::Expr(expr) => Ok(LineResult::Value(self.evaluator.whnf(&expr, &self.session)?)),
            Program::Module(module) => {
                self.session = self.evaluator.bind_recursive(&module.bindings, &self.session);
                self.fixities = parsed.fixities;
                let names: Vec<Name> = module.bindings.iter().map(|b| b.name.clone()).collect();
                for name in &names {
                    if !self.session_names.contains(name) {
                        self.session_names.push(name.clone());
                    }
                }
                tracing::debug!(count = names.len(), "session extended");
                Ok(LineResult::Defined(names))
            }
        }
    }

    /// Static diagnostics for `source`. Syntax errors come back as a single
    /// diagnostic.
    pub fn check(&self, source: &str) -> Vec<Diagnostic> {
        match parse_program(source, &self.fixities) {
            Ok(parsed) => {
                let known: HashSet<Name> = self.session.names().into_iter().collect();
                check_program(&parsed.program, &known, Some(&self.config.entry))
            }
            Err(err) => vec![InterpreterError::from(err).to_diagnostic()],
        }
    }

    /// Force `value` completely and print it.
    pub fn render(&self, value: &Value) -> EvalResult<String> {
        render::render(&self.evaluator, value, &self.config.render)
    }

    pub fn rendered(&self, value: &Value) -> EvalResult<RenderedValue> {
        render::rendered(&self.evaluator, value, &self.config.render)
    }

    pub fn stats(&self) -> EvalStats {
        self.evaluator.stats()
    }

    pub fn reset_stats(&self) {
        self.evaluator.reset_stats();
    }

    pub fn trace_log(&self) -> Vec<String> {
        self.evaluator.trace_log()
    }

    /// Names defined in this session, in order of first definition.
    pub fn session_names(&self) -> &[Name] {
        &self.session_names
    }

    /// Every name in scope, including primitives and the prelude.
    pub fn visible_names(&self) -> Vec<Name> {
        self.session.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::new(InterpreterConfig::default()).unwrap()
    }

    #[test]
    fn test_run_expression() {
        assert_eq!(interpreter().run("1 + 2 * 3").unwrap().as_int(), Some(7));
    }

    #[test]
    fn test_run_module_uses_entry() {
        let source = "double x = x * 2; main = double 21;";
        assert_eq!(interpreter().run(source).unwrap().as_int(), Some(42));

        let config = InterpreterConfig::default().with_entry("start");
        let interpreter = Interpreter::new(config).unwrap();
        assert_eq!(interpreter.run("start = 5;").unwrap().as_int(), Some(5));
    }

    #[test]
    fn test_missing_entry() {
        let err = interpreter().run("f x = x;").unwrap_err();
        assert!(matches!(err, InterpreterError::UnboundVariable { ref name, .. } if name == "main"));
    }

    #[test]
    fn test_session_accumulates() {
        let mut interpreter = interpreter();
        let defined = interpreter.eval_line("sq x = x * x;").unwrap();
        assert!(matches!(defined, LineResult::Defined(ref names) if names.len() == 1));
        let LineResult::Value(value) = interpreter.eval_line("sq 7").unwrap() else {
            panic!("expected a value");
        };
        assert_eq!(value.as_int(), Some(49));
        assert_eq!(interpreter.session_names().len(), 1);
    }

    #[test]
    fn test_session_fixities_persist() {
        let mut interpreter = interpreter();
        interpreter.eval_line("infixr 2 <+>; a <+> b = a - b;").unwrap();
        let LineResult::Value(value) = interpreter.eval_line("10 <+> 4 <+> 1").unwrap() else {
            panic!("expected a value");
        };
        assert_eq!(value.as_int(), Some(7));
    }

    #[test]
    fn test_without_prelude() {
        let interpreter = Interpreter::new(InterpreterConfig::default().with_prelude(false)).unwrap();
        assert!(interpreter.run("map").is_err());
        assert_eq!(interpreter.run("2 + 2").unwrap().as_int(), Some(4));
    }
}
