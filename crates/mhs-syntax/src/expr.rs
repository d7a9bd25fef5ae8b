//! Expression AST nodes.
//! 表达式 AST 节点。

use std::fmt;
use std::rc::Rc;

use crate::{Binding, Pattern, names};
use mhs_common::Span;

/// An identifier, shared between the AST, environments and closures.
pub type Name = Rc<str>;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(Rc<str>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// An expression.
/// 表达式。
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn int(value: i64, span: Span) -> Rc<Expr> {
        Rc::new(Expr::new(ExprKind::Lit(Literal::Int(value)), span))
    }

    pub fn var(name: impl Into<Name>, span: Span) -> Rc<Expr> {
        Rc::new(Expr::new(ExprKind::Var(name.into()), span))
    }

    pub fn lambda(param: Name, body: Rc<Expr>, span: Span) -> Rc<Expr> {
        Rc::new(Expr::new(ExprKind::Lambda { param, body }, span))
    }

    pub fn app(func: Rc<Expr>, arg: Rc<Expr>) -> Rc<Expr> {
        let span = func.span.merge(arg.span);
        Rc::new(Expr::new(ExprKind::App { func, arg }, span))
    }

    /// Apply a binary operator by name: `App(App(Var op, lhs), rhs)`.
    pub fn binary(op: Name, op_span: Span, lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Expr> {
        Expr::app(Expr::app(Expr::var(op, op_span), lhs), rhs)
    }

    pub fn con(name: impl Into<Name>, args: Vec<Rc<Expr>>, span: Span) -> Rc<Expr> {
        Rc::new(Expr::new(
            ExprKind::Con {
                name: name.into(),
                args,
            },
            span,
        ))
    }

    /// Returns the variable name if this expression is a bare variable.
    pub fn as_var(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Var(name) => Some(name),
            _ => None,
        }
    }
}

/// Expression kind.
/// 表达式类型。
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal `42`, `"hi"` / 字面量
    Lit(Literal),

    /// Variable reference, including operators like `+` / 变量引用
    Var(Name),

    /// Single-parameter lambda `\x -> e` / Lambda 表达式
    Lambda { param: Name, body: Rc<Expr> },

    /// Single-argument application `f x` / 函数应用
    App { func: Rc<Expr>, arg: Rc<Expr> },

    /// Mutually recursive bindings scoped over a body / 递归 let 绑定
    Let { bindings: Vec<Binding>, body: Rc<Expr> },

    /// `case e of { p -> e; ... }`, first matching alternative wins
    Case { scrutinee: Rc<Expr>, alts: Vec<Alt> },

    /// Saturated or partial constructor `Cons x xs`, `Nil` / 数据构造器
    Con { name: Name, args: Vec<Rc<Expr>> },
}

/// One alternative of a `case` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Alt {
    pub pattern: Pattern,
    pub body: Rc<Expr>,
    pub span: Span,
}

impl Alt {
    pub fn new(pattern: Pattern, body: Rc<Expr>, span: Span) -> Self {
        Self {
            pattern,
            body,
            span,
        }
    }
}

fn fmt_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if names::is_operator(name) {
        write!(f, "({name})")
    } else {
        f.write_str(name)
    }
}

/// A fully parenthesised rendering that makes the tree structure visible.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Lit(lit) => write!(f, "{lit}"),
            ExprKind::Var(name) => fmt_name(f, name),
            ExprKind::Lambda { param, body } => write!(f, "(\\{param} -> {body})"),
            ExprKind::App { func, arg } => write!(f, "({func} {arg})"),
            ExprKind::Let { bindings, body } => {
                f.write_str("(let ")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    fmt_name(f, &binding.name)?;
                    write!(f, " = {}", binding.expr)?;
                }
                write!(f, " in {body})")
            }
            ExprKind::Case { scrutinee, alts } => {
                write!(f, "(case {scrutinee} of {{ ")?;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} -> {}", alt.pattern, alt.body)?;
                }
                f.write_str(" })")
            }
            ExprKind::Con { name, args } if args.is_empty() => f.write_str(name),
            ExprKind::Con { name, args } => {
                write!(f, "({name}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
