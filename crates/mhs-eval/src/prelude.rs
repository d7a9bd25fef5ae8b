//! The standard prelude, written in micro-Haskell itself.

use mhs_parser::{FixityTable, parse_program};
use mhs_syntax::{Name, Program};

use crate::env::Env;
use crate::error::EvalResult;
use crate::eval::Evaluator;

/// Source of the prelude, embedded at build time.
pub const PRELUDE_SOURCE: &str = include_str!("prelude.mhs");

/// The prelude's bindings layered over `base`.
pub struct Prelude {
    pub env: Env,
    /// Operator table after the prelude's own fixity declarations.
    pub fixities: FixityTable,
    pub names: Vec<Name>,
}

impl Prelude {
    /// Parse the prelude and bind its definitions on top of `base`.
    pub fn load(eval: &Evaluator, base: &Env) -> EvalResult<Self> {
        let parsed = parse_program(PRELUDE_SOURCE, &FixityTable::default())?;
        let bindings = match &parsed.program {
            Program::Module(module) => module.bindings.as_slice(),
            Program::Expr(_) => &[],
        };
        let env = eval.bind_recursive(bindings, base);
        tracing::debug!(bindings = bindings.len(), "loaded prelude");
        Ok(Self {
            env,
            fixities: parsed.fixities,
            names: bindings.iter().map(|b| b.name.clone()).collect(),
        })
    }
}
