//! CLI command implementations.

pub mod check;
pub mod eval;
pub mod repl;
pub mod run;
pub mod tokens;

use std::fs;

use mhs_diagnostic::emit;
use mhs_eval::{EvalStats, Interpreter, InterpreterConfig, InterpreterError, RenderedValue};
use serde::Serialize;

use crate::EvalArgs;
use crate::output;

/// Global flags every command sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub verbose: bool,
    pub quiet: bool,
    pub max_depth: Option<usize>,
}

impl Settings {
    pub fn config(&self, no_prelude: bool) -> InterpreterConfig {
        InterpreterConfig::default()
            .with_prelude(!no_prelude)
            .with_max_depth(self.max_depth)
    }
}

/// `--json` output of `run` and `eval`.
#[derive(Serialize)]
struct JsonReport<'a> {
    value: &'a RenderedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<EvalStats>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    trace: &'a [String],
}

pub(crate) fn read_source(file: &str) -> Result<String, String> {
    fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file, e))
}

pub(crate) fn new_interpreter(config: InterpreterConfig) -> Result<Interpreter, String> {
    Interpreter::new(config).map_err(|e| format!("cannot load the prelude: {e}"))
}

/// Print an interpreter error against the source it came from.
pub(crate) fn report(source: &str, filename: &str, err: &InterpreterError, settings: &Settings) {
    if !settings.quiet {
        emit(source, filename, &err.to_diagnostic());
    }
}

/// Evaluate `source`, print the rendered value and, when asked, the
/// statistics. Trace messages are printed even when evaluation fails.
pub(crate) fn execute(
    interpreter: &Interpreter,
    source: &str,
    filename: &str,
    args: &EvalArgs,
    settings: &Settings,
) -> Result<(), String> {
    let result = interpreter
        .run(source)
        .and_then(|value| interpreter.rendered(&value));
    let trace = interpreter.evaluator().take_trace_log();

    let value = match result {
        Ok(value) => value,
        Err(err) => {
            print_trace(&trace, settings);
            report(source, filename, &err, settings);
            return Err(if err.is_syntax() {
                "syntax error".to_string()
            } else {
                "evaluation failed".to_string()
            });
        }
    };

    let stats = interpreter.stats();
    if args.json {
        let report = JsonReport {
            value: &value,
            stats: args.stats.then_some(stats),
            trace: &trace,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    print_trace(&trace, settings);
    println!("{value}");
    if args.stats && !settings.quiet {
        eprintln!("{stats}");
    }
    if settings.verbose {
        output::info(&format!("{} thunks forced", stats.thunks_forced));
    }
    Ok(())
}

fn print_trace(trace: &[String], settings: &Settings) {
    if settings.quiet {
        return;
    }
    for msg in trace {
        output::trace(msg);
    }
}
