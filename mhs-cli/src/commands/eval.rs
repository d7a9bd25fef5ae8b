//! The `mhs eval` command.

use crate::EvalArgs;

use super::{Settings, execute, new_interpreter};

pub fn run(expr: &str, args: &EvalArgs, settings: &Settings) -> Result<(), String> {
    let interpreter = new_interpreter(settings.config(args.no_prelude))?;
    execute(&interpreter, expr, "<eval>", args, settings)
}
