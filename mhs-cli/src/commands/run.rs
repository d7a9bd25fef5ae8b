//! The `mhs run` command.

use crate::EvalArgs;
use crate::output;

use super::{Settings, execute, new_interpreter, read_source};

pub fn run(file: &str, entry: &str, args: &EvalArgs, settings: &Settings) -> Result<(), String> {
    let source = read_source(file)?;
    let config = settings.config(args.no_prelude).with_entry(entry);
    let interpreter = new_interpreter(config)?;

    if settings.verbose {
        output::info(&format!("running {file} (entry `{entry}`)"));
    }

    execute(&interpreter, &source, file, args, settings)
}
