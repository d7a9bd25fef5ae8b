//! The `mhs repl` command.

use mhs_eval::{Interpreter, LineResult};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::output;

use super::{Settings, new_interpreter, read_source, report};

pub fn run(no_prelude: bool, settings: &Settings) -> Result<(), String> {
    let mut interpreter = new_interpreter(settings.config(no_prelude))?;

    println!("mhs REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;

    loop {
        let readline = rl.readline("mhs> ");
        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match command(&mut interpreter, line, settings) {
                        Flow::Continue => continue,
                        Flow::Quit => break,
                    }
                }

                eval_line(&mut interpreter, line, "<repl>", settings);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                output::error(&err.to_string());
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn command(interpreter: &mut Interpreter, line: &str, settings: &Settings) -> Flow {
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    match name {
        ":quit" | ":q" => return Flow::Quit,
        ":help" | ":h" => {
            println!("Commands:");
            println!("  :help, :h         Show this help");
            println!("  :quit, :q         Exit the REPL");
            println!("  :env              Show names defined in this session");
            println!("  :load, :l <file>  Add the declarations of a file to the session");
            println!("  :stats            Show evaluation statistics and reset them");
            println!();
            println!("Enter an expression to evaluate it, or `name args = expr;` to define.");
        }
        ":env" => {
            let names = interpreter.session_names();
            if names.is_empty() {
                println!("(no definitions)");
            } else {
                for name in names {
                    println!("  {name}");
                }
            }
        }
        ":load" | ":l" if !arg.is_empty() => match read_source(arg) {
            Ok(source) => eval_line(interpreter, &source, arg, settings),
            Err(e) => output::error(&e),
        },
        ":load" | ":l" => output::error("usage: :load <file>"),
        ":stats" => {
            println!("{}", interpreter.stats());
            interpreter.reset_stats();
        }
        _ => println!("Unknown command: {line}"),
    }
    Flow::Continue
}

fn eval_line(interpreter: &mut Interpreter, source: &str, filename: &str, settings: &Settings) {
    let result = interpreter.eval_line(source).and_then(|line| match line {
        LineResult::Value(value) => interpreter.render(&value).map(Some),
        LineResult::Defined(names) => {
            if settings.verbose {
                let names: Vec<&str> = names.iter().map(|n| &**n).collect();
                output::info(&format!("defined {}", names.join(", ")));
            }
            Ok(None)
        }
    });

    for msg in interpreter.evaluator().take_trace_log() {
        output::trace(&msg);
    }

    match result {
        Ok(Some(text)) => println!("{text}"),
        Ok(None) => {}
        Err(err) => report(source, filename, &err, settings),
    }
}
