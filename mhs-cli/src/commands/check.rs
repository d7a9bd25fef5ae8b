//! The `mhs check` command.

use mhs_diagnostic::emit;

use crate::output;

use super::{Settings, new_interpreter, read_source};

pub fn run(file: &str, settings: &Settings) -> Result<(), String> {
    let source = read_source(file)?;
    let interpreter = new_interpreter(settings.config(false))?;

    let diagnostics = interpreter.check(&source);
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();

    if !settings.quiet {
        for diag in &diagnostics {
            emit(&source, file, diag);
        }
    }

    if errors > 0 {
        return Err(format!("{errors} error(s) found"));
    }

    if !settings.quiet {
        output::success("OK - no errors found");
    }
    Ok(())
}
