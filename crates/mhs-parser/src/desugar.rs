//! Lowering of function clauses into lambdas and `case`.
//!
//! `f p1 .. pn = e` clauses with the same name are grouped and turned into
//! `\$a1 .. $an -> case ($a1, .., $an) of { (p1, .., pn) -> e; .. }`.
//! A single clause whose parameters are all variables becomes plain
//! nested lambdas.

use std::collections::HashSet;
use std::rc::Rc;

use mhs_common::Span;
use mhs_diagnostic::ErrorCode;
use mhs_lexer::Token;
use mhs_syntax::{Alt, Binding, Expr, ExprKind, Name, Pattern, PatternKind, names};

use crate::ParseError;

/// Generator of names that cannot collide with user identifiers.
#[derive(Debug, Default)]
pub(crate) struct Fresh {
    counter: u32,
}

impl Fresh {
    pub(crate) fn name(&mut self, hint: &str) -> Name {
        self.counter += 1;
        Rc::from(format!("{}{hint}{}", names::FRESH_PREFIX, self.counter))
    }
}

/// One equation: parameters and right-hand side.
#[derive(Debug, Clone)]
pub(crate) struct Equation {
    /// First token of the equation, used for error locations.
    pub head: Token,
    pub params: Vec<Pattern>,
    pub body: Rc<Expr>,
    pub span: Span,
}

/// A named equation, `name p1 .. pn = body`.
#[derive(Debug, Clone)]
pub(crate) struct Clause {
    pub name: Name,
    pub equation: Equation,
}

/// Group adjacent clauses by name and lower each group to one binding.
pub(crate) fn group_clauses(clauses: Vec<Clause>, fresh: &mut Fresh) -> Result<Vec<Binding>, ParseError> {
    let mut groups: Vec<(Name, Vec<Equation>)> = Vec::new();
    let mut seen: HashSet<Name> = HashSet::new();

    for Clause { name, equation } in clauses {
        if let Some((last_name, equations)) = groups.last_mut()
            && *last_name == name
        {
            let arity = equations[0].params.len();
            if arity == 0 {
                return Err(duplicate(&name, &equation.head));
            }
            if equation.params.len() != arity {
                return Err(ParseError::at(
                    ErrorCode::ClauseArityMismatch,
                    format!(
                        "equations for `{name}` have different numbers of arguments ({arity} and {})",
                        equation.params.len()
                    ),
                    &equation.head,
                ));
            }
            equations.push(equation);
            continue;
        }

        if !seen.insert(name.clone()) {
            return Err(duplicate(&name, &equation.head));
        }
        groups.push((name, vec![equation]));
    }

    groups
        .into_iter()
        .map(|(name, equations)| {
            let span = equations
                .iter()
                .fold(Span::DUMMY, |span, eq| span.merge(eq.span));
            let expr = lower_equations(equations, span, fresh)?;
            Ok(Binding::new(name, expr, span))
        })
        .collect()
}

fn duplicate(name: &str, token: &Token) -> ParseError {
    ParseError::at(
        ErrorCode::DuplicateDefinition,
        format!("`{name}` is defined more than once"),
        token,
    )
}

/// Lower one or more equations of equal arity into a single expression.
pub(crate) fn lower_equations(
    mut equations: Vec<Equation>,
    span: Span,
    fresh: &mut Fresh,
) -> Result<Rc<Expr>, ParseError> {
    for equation in &equations {
        check_linear(equation)?;
    }

    let arity = equations.first().map_or(0, |eq| eq.params.len());
    if arity == 0 {
        return Ok(equations.remove(0).body);
    }

    if equations.len() == 1 && equations[0].params.iter().all(Pattern::is_irrefutable) {
        let equation = equations.remove(0);
        let params: Vec<Name> = equation
            .params
            .iter()
            .map(|p| match &p.kind {
                PatternKind::Var(name) => name.clone(),
                _ => fresh.name("_"),
            })
            .collect();
        return Ok(curry(params, equation.body, span));
    }

    let args: Vec<Name> = (0..arity).map(|_| fresh.name("arg")).collect();
    let scrutinee = if arity == 1 {
        Expr::var(args[0].clone(), span)
    } else {
        Expr::con(
            names::tuple(arity),
            args.iter().map(|a| Expr::var(a.clone(), span)).collect(),
            span,
        )
    };

    let alts = equations
        .into_iter()
        .map(|mut equation| {
            let pattern = if arity == 1 {
                equation.params.remove(0)
            } else {
                let pattern_span = equation
                    .params
                    .iter()
                    .fold(Span::DUMMY, |s, p| s.merge(p.span));
                Pattern::con(names::tuple(arity), equation.params, pattern_span)
            };
            Alt::new(pattern, equation.body, equation.span)
        })
        .collect();

    let case = Rc::new(Expr::new(ExprKind::Case { scrutinee, alts }, span));
    Ok(curry(args, case, span))
}

/// `\a -> \b -> body`
fn curry(params: Vec<Name>, body: Rc<Expr>, span: Span) -> Rc<Expr> {
    params
        .into_iter()
        .rev()
        .fold(body, |body, param| Expr::lambda(param, body, span))
}

/// A variable may be bound only once across an equation's parameters.
fn check_linear(equation: &Equation) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for name in equation.params.iter().flat_map(Pattern::bound_names) {
        if !seen.insert(name.clone()) {
            return Err(ParseError::at(
                ErrorCode::DuplicateDefinition,
                format!("conflicting definitions for `{name}` in the same equation"),
                &equation.head,
            ));
        }
    }
    Ok(())
}
