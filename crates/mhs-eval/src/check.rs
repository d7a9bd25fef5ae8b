//! Static checks run before evaluation.
//!
//! The checker never changes how a program runs; it only reports problems
//! that would otherwise surface late, or not at all when the faulty code is
//! never forced.

use std::collections::HashSet;

use mhs_common::{Span, ensure_sufficient_stack};
use mhs_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use mhs_syntax::{Expr, ExprKind, Name, Program};

/// Collect every unbound variable in `program`, plus a missing `entry`
/// binding when the program is a module.
///
/// `known` holds the names already in scope (primitives, prelude, session).
pub fn check_program(program: &Program, known: &HashSet<Name>, entry: Option<&str>) -> Vec<Diagnostic> {
    let mut checker = Checker {
        known,
        scopes: Vec::new(),
        diagnostics: Vec::new(),
    };

    match program {
        Program::Expr(expr) => checker.expr(expr),
        Program::Module(module) => {
            for binding in &module.bindings {
                if known.contains(&binding.name) {
                    checker.diagnostics.push(shadowed(&binding.name, binding.span));
                }
            }
            checker
                .scopes
                .extend(module.bindings.iter().map(|b| b.name.clone()));
            for binding in &module.bindings {
                checker.expr(&binding.expr);
            }
            if let Some(entry) = entry
                && module.binding(entry).is_none()
            {
                checker.diagnostics.push(missing_entry(entry, module.span));
            }
        }
    }

    checker.diagnostics
}

struct Checker<'a> {
    known: &'a HashSet<Name>,
    /// Names bound by enclosing lambdas, lets and patterns, innermost last.
    scopes: Vec<Name>,
    diagnostics: Vec<Diagnostic>,
}

impl Checker<'_> {
    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|n| &**n == name) || self.known.contains(name)
    }

    fn expr(&mut self, expr: &Expr) {
        ensure_sufficient_stack(|| self.expr_inner(expr));
    }

    fn expr_inner(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Lit(_) => {}
            ExprKind::Var(name) => {
                if !self.is_bound(name) {
                    self.diagnostics.push(unbound(name, expr.span));
                }
            }
            ExprKind::Lambda { param, body } => {
                self.scopes.push(param.clone());
                self.expr(body);
                self.scopes.pop();
            }
            ExprKind::App { func, arg } => {
                self.expr(func);
                self.expr(arg);
            }
            ExprKind::Let { bindings, body } => {
                let mark = self.scopes.len();
                self.scopes.extend(bindings.iter().map(|b| b.name.clone()));
                for binding in bindings {
                    self.expr(&binding.expr);
                }
                self.expr(body);
                self.scopes.truncate(mark);
            }
            ExprKind::Case { scrutinee, alts } => {
                self.expr(scrutinee);
                for alt in alts {
                    let mark = self.scopes.len();
                    self.scopes.extend(alt.pattern.bound_names());
                    self.expr(&alt.body);
                    self.scopes.truncate(mark);
                }
            }
            ExprKind::Con { args, .. } => {
                for arg in args {
                    self.expr(arg);
                }
            }
        }
    }
}

fn unbound(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::Check,
        span,
        format!("variable `{name}` is not in scope"),
    )
    .with_code(ErrorCode::UnboundVariable)
    .with_label(Label::new(span, "not found in this scope"))
}

fn shadowed(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticKind::Check,
        span,
        format!("`{name}` shadows a definition that is already in scope"),
    )
    .with_code(ErrorCode::ShadowedName)
    .with_label(Label::new(span, "defined again here"))
    .with_note("uses in this program refer to the new definition")
}

fn missing_entry(entry: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        DiagnosticKind::Check,
        span,
        format!("the program does not define `{entry}`"),
    )
    .with_code(ErrorCode::MissingEntryPoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhs_parser::parse;

    fn check(source: &str) -> Vec<Diagnostic> {
        let known: HashSet<Name> = ["+".into()].into_iter().collect();
        check_program(&parse(source).unwrap(), &known, Some("main"))
    }

    #[test]
    fn test_clean_program() {
        assert!(check("main = let f x = x + 1 in f 2;").is_empty());
    }

    #[test]
    fn test_reports_every_unbound_variable() {
        let diagnostics = check("y + z");
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.code == Some(ErrorCode::UnboundVariable)));
    }

    #[test]
    fn test_pattern_variables_are_in_scope() {
        assert!(check("main = case Just 1 of { Just x -> x + 1; Nothing -> 0 };").is_empty());
    }

    #[test]
    fn test_missing_main() {
        let diagnostics = check("f x = x;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::MissingEntryPoint));
    }

    #[test]
    fn test_shadowing_a_known_name_warns() {
        let diagnostics = check("x + y = 0; main = 1;");
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        assert_eq!(diagnostics[0].code, Some(ErrorCode::ShadowedName));
        assert_eq!(diagnostics[0].notes.len(), 1);
    }

    #[test]
    fn test_scope_ends_with_let() {
        let diagnostics = check("(let a = 1 in a) + a");
        assert_eq!(diagnostics.len(), 1);
    }
}
