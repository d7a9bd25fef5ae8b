//! The `mhs tokens` command.

use mhs_lexer::tokenize;

use super::{Settings, read_source};

pub fn run(file: &str, json: bool, settings: &Settings) -> Result<(), String> {
    let source = read_source(file)?;

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(err) => {
            if !settings.quiet {
                mhs_diagnostic::emit(&source, file, &err.to_diagnostic());
            }
            return Err("lexical error".to_string());
        }
    };

    if json {
        let json = serde_json::to_string_pretty(&tokens).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    for token in &tokens {
        let text = token.span.snippet(&source).unwrap_or("");
        println!("{:<8} {:<20} {}", token.pos.to_string(), token.kind.to_string(), text);
    }
    Ok(())
}
