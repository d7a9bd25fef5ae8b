//! The micro-Haskell parser.
//!
//! Recursive descent for declarations, patterns and the keyword forms, with
//! operator expressions first collected flat and then resolved against the
//! fixity table.

use std::collections::HashSet;
use std::iter::Peekable;
use std::rc::Rc;
use std::vec;

use mhs_common::{Position, Span, ensure_sufficient_stack};
use mhs_diagnostic::ErrorCode;
use mhs_lexer::{Token, TokenKind};
use mhs_syntax::*;

use crate::desugar::{self, Clause, Equation, Fresh};
use crate::{FixityTable, ParseError};

type PResult<T> = Result<T, ParseError>;

/// Name of the function prefix minus desugars to.
const NEGATE: &str = "negate";

/// A binary operator occurrence: `+`, `:`, or a backquoted name.
#[derive(Debug, Clone)]
struct Operator {
    name: Name,
    token: Token,
    span: Span,
    fixity: Fixity,
    /// `:` and backquoted constructors build data instead of calling.
    constructor: bool,
    /// Tokens occupied: 1, or 3 when backquoted.
    width: usize,
}

impl Operator {
    fn constructor_name(&self) -> Name {
        if &*self.name == ":" {
            Rc::from(names::CONS)
        } else {
            self.name.clone()
        }
    }

    /// `op` used as a value: `(+)`, `(:)`.
    fn as_value(&self, span: Span) -> Rc<Expr> {
        if self.constructor {
            Expr::con(self.constructor_name(), vec![], span)
        } else {
            Expr::var(self.name.clone(), span)
        }
    }

    fn apply(&self, lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Expr> {
        if self.constructor {
            let span = lhs.span.merge(rhs.span);
            Expr::con(self.constructor_name(), vec![lhs, rhs], span)
        } else {
            Expr::binary(self.name.clone(), self.span, lhs, rhs)
        }
    }
}

/// One element of a flat infix expression.
enum OpItem {
    Operand(Rc<Expr>),
    Op(Operator),
    Negate(Token),
}

/// A declaration inside a module or `let` block.
enum Decl {
    /// Fixity signatures with the `infix*` keyword that introduced them.
    Fixity(Token, Vec<FixityDecl>),
    Clause(Clause),
}

/// The declarations of one module or `let` block.
#[derive(Default)]
struct DeclGroup {
    clauses: Vec<Clause>,
    signatures: Vec<(Token, FixityDecl)>,
}

impl DeclGroup {
    /// Lower the clauses to bindings. Every fixity signature must name an
    /// operator bound in the same group.
    fn into_bindings(self, fresh: &mut Fresh) -> PResult<Vec<Binding>> {
        let bindings = desugar::group_clauses(self.clauses, fresh)?;
        for (keyword, decl) in &self.signatures {
            if !bindings.iter().any(|b| b.name == decl.operator) {
                let mut err = ParseError::at(
                    ErrorCode::FixityWithoutBinding,
                    format!("fixity declaration for `{}` lacks an accompanying binding", decl.operator),
                    keyword,
                );
                err.span = decl.span;
                return Err(err);
            }
        }
        Ok(bindings)
    }
}

fn starts_apat(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Underscore
            | TokenKind::Ident(_)
            | TokenKind::ConIdent(_)
            | TokenKind::Int(_)
            | TokenKind::Str(_)
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}

/// The micro-Haskell parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    fixities: FixityTable,
    fresh: Fresh,
}

impl Parser {
    /// Create a parser over `tokens`. A trailing `Eof` is added if missing.
    pub fn new(mut tokens: Vec<Token>, fixities: FixityTable) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (span, pos) = tokens.last().map_or((Span::DUMMY, Position::START), |t| {
                (Span::new(t.span.end, t.span.end), t.pos)
            });
            tokens.push(Token::new(TokenKind::Eof, span, pos));
        }
        Self {
            tokens,
            pos: 0,
            fixities,
            fresh: Fresh::default(),
        }
    }

    /// The fixity table, including declarations collected while parsing.
    pub fn fixities(&self) -> &FixityTable {
        &self.fixities
    }

    pub fn into_fixities(self) -> FixityTable {
        self.fixities
    }

    /// Parse a complete program: a module of declarations or one expression.
    pub fn parse_program(&mut self) -> PResult<Program> {
        let declared = self.collect_fixities()?;

        if self.looks_like_module() {
            let module = self.parse_module(declared)?;
            tracing::debug!(
                bindings = module.bindings.len(),
                fixities = module.fixities.len(),
                "parsed module"
            );
            Ok(Program::Module(module))
        } else {
            let expr = self.parse_expr()?;
            self.eat(&TokenKind::Semicolon);
            self.expect_eof()?;
            tracing::debug!("parsed expression program");
            Ok(Program::Expr(expr))
        }
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse_standalone_expr(&mut self) -> PResult<Rc<Expr>> {
        self.collect_fixities()?;
        let expr = self.parse_expr()?;
        self.expect_eof()?;
        Ok(expr)
    }

    // ========== Declarations ==========

    /// Find every fixity declaration up front so operators can be used
    /// before they are declared.
    fn collect_fixities(&mut self) -> PResult<Vec<FixityDecl>> {
        let saved = self.pos;
        let starts: Vec<usize> = self
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t.kind, TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr))
            .map(|(i, _)| i)
            .collect();

        let mut decls = Vec::new();
        let mut seen = HashSet::new();
        for start in starts {
            self.pos = start;
            for decl in self.parse_fixity_decl()? {
                if !seen.insert(decl.operator.clone()) {
                    return Err(ParseError::at(
                        ErrorCode::DuplicateFixity,
                        format!("duplicate fixity declaration for `{}`", decl.operator),
                        &self.tokens[start],
                    ));
                }
                tracing::debug!(decl = %decl, "fixity declaration");
                decls.push(decl);
            }
        }
        self.pos = saved;

        self.fixities.extend(&decls);
        Ok(decls)
    }

    /// `infixl 6 +, -`
    fn parse_fixity_decl(&mut self) -> PResult<Vec<FixityDecl>> {
        let keyword = self.advance();
        let assoc = match keyword.kind {
            TokenKind::Infixl => Assoc::Left,
            TokenKind::Infixr => Assoc::Right,
            _ => Assoc::None,
        };

        let precedence = match self.current_kind().clone() {
            TokenKind::Int(n) => {
                let token = self.advance();
                if !(0..=i64::from(Fixity::MAX_PRECEDENCE)).contains(&n) {
                    return Err(ParseError::at(
                        ErrorCode::InvalidFixity,
                        format!("precedence {n} is out of range 0..=9"),
                        &token,
                    ));
                }
                n as u8
            }
            _ => Fixity::MAX_PRECEDENCE,
        };

        let mut decls = Vec::new();
        loop {
            let token = self.current().clone();
            let Some(op) = self.operator_at(self.pos) else {
                return Err(ParseError::expected(ErrorCode::InvalidFixity, "an operator", &token));
            };
            self.pos += op.width;
            decls.push(FixityDecl {
                operator: op.name,
                fixity: Fixity::new(assoc, precedence),
                span: keyword.span.merge(op.span),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(decls)
    }

    /// Scan the head of the input: a module starts with a fixity
    /// declaration or with a function head followed by `=`.
    fn looks_like_module(&self) -> bool {
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr | TokenKind::Equals => return true,
                TokenKind::Ident(_)
                | TokenKind::ConIdent(_)
                | TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::Underscore
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::Operator(_)
                | TokenKind::Backtick => continue,
                _ => return false,
            }
        }
        false
    }

    fn parse_module(&mut self, fixities: Vec<FixityDecl>) -> PResult<Module> {
        let start = self.current_span();
        let group = self.parse_decls(|kind| matches!(kind, TokenKind::Eof), "`;` or end of input")?;
        self.expect_eof()?;
        let bindings = group.into_bindings(&mut self.fresh)?;
        Ok(Module {
            bindings,
            fixities,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse `;`-separated declarations up to (not including) a token for
    /// which `is_end` holds.
    fn parse_decls(&mut self, is_end: impl Fn(&TokenKind) -> bool, terminator: &str) -> PResult<DeclGroup> {
        let mut group = DeclGroup::default();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if is_end(self.current_kind()) {
                break;
            }
            match self.parse_decl()? {
                Decl::Fixity(keyword, decls) => group
                    .signatures
                    .extend(decls.into_iter().map(|decl| (keyword.clone(), decl))),
                Decl::Clause(clause) => group.clauses.push(clause),
            }
            if !self.eat(&TokenKind::Semicolon) {
                if is_end(self.current_kind()) {
                    break;
                }
                return Err(ParseError::expected(ErrorCode::UnexpectedToken, terminator, self.current()));
            }
        }
        Ok(group)
    }

    fn parse_decl(&mut self) -> PResult<Decl> {
        match self.current_kind() {
            TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr => {
                // Already registered by `collect_fixities`.
                let keyword = self.current().clone();
                Ok(Decl::Fixity(keyword, self.parse_fixity_decl()?))
            }
            _ => Ok(Decl::Clause(self.parse_clause()?)),
        }
    }

    /// `f p1 .. pn = e`, `(op) p1 .. pn = e` or `p1 op p2 = e`
    fn parse_clause(&mut self) -> PResult<Clause> {
        let head = self.current().clone();
        let (name, params) = self.parse_clause_head()?;
        self.expect(&TokenKind::Equals, "`=`")?;
        let body = self.parse_expr()?;
        let span = head.span.merge(body.span);
        Ok(Clause {
            name,
            equation: Equation {
                head,
                params,
                body,
                span,
            },
        })
    }

    fn parse_clause_head(&mut self) -> PResult<(Name, Vec<Pattern>)> {
        // `(op) p1 .. pn`
        if self.check(&TokenKind::LParen)
            && let Some(op) = self.operator_at(self.pos + 1)
            && matches!(self.peek_kind(1 + op.width), TokenKind::RParen)
        {
            if op.constructor {
                return Err(Self::constructor_definition(&op));
            }
            self.pos += op.width + 2;
            let params = self.parse_apats()?;
            return Ok((op.name, params));
        }

        // `name p1 .. pn`
        if let TokenKind::Ident(name) = self.current_kind()
            && self.operator_at(self.pos + 1).is_none()
        {
            let name: Name = Rc::from(name.as_str());
            self.advance();
            let params = self.parse_apats()?;
            return Ok((name, params));
        }

        // `p1 op p2`
        let lhs = self.parse_pattern_app()?;
        let Some(op) = self.operator_at(self.pos) else {
            return Err(ParseError::expected(
                ErrorCode::UnexpectedToken,
                "`=` or an operator",
                self.current(),
            ));
        };
        if op.constructor {
            return Err(Self::constructor_definition(&op));
        }
        self.pos += op.width;
        let rhs = self.parse_pattern_app()?;
        Ok((op.name, vec![lhs, rhs]))
    }

    fn constructor_definition(op: &Operator) -> ParseError {
        ParseError::at(
            ErrorCode::UnexpectedToken,
            format!("cannot define constructor operator `{}`", op.name),
            &op.token,
        )
    }

    // ========== Expressions ==========

    /// Parse an expression, including infix operators.
    pub fn parse_expr(&mut self) -> PResult<Rc<Expr>> {
        ensure_sufficient_stack(|| {
            let (items, _) = self.parse_op_items(false)?;
            self.resolve(items)
        })
    }

    /// Collect `operand (op operand)*`. With `allow_left_section`, an
    /// operator directly followed by `)` ends the sequence and is returned.
    fn parse_op_items(&mut self, allow_left_section: bool) -> PResult<(Vec<OpItem>, Option<Operator>)> {
        let mut items = Vec::new();
        loop {
            if matches!(self.current_kind(), TokenKind::Operator(op) if op == "-") {
                items.push(OpItem::Negate(self.advance()));
            }

            let (operand, greedy) = self.parse_operand()?;
            items.push(OpItem::Operand(operand));
            if greedy {
                break;
            }

            let Some(op) = self.operator_at(self.pos) else {
                break;
            };
            self.pos += op.width;
            if allow_left_section && self.check(&TokenKind::RParen) {
                return Ok((items, Some(op)));
            }
            items.push(OpItem::Op(op));
        }
        Ok((items, None))
    }

    fn resolve(&self, items: Vec<OpItem>) -> PResult<Rc<Expr>> {
        let mut resolver = Resolver {
            items: items.into_iter().peekable(),
            end: self.current().clone(),
        };
        resolver.parse_neg(None)
    }

    /// One operand. Lambda, `let` and `if` extend as far right as possible,
    /// so nothing may follow them in the same infix expression.
    fn parse_operand(&mut self) -> PResult<(Rc<Expr>, bool)> {
        let expr = match self.current_kind() {
            TokenKind::Backslash => self.parse_lambda()?,
            TokenKind::Let => self.parse_let()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::Case => return Ok((self.parse_case()?, false)),
            _ => return Ok((self.parse_application()?, false)),
        };
        Ok((expr, true))
    }

    /// `f a b`; a constructor head collects its arguments as fields.
    fn parse_application(&mut self) -> PResult<Rc<Expr>> {
        let head = self.parse_atom()?;
        let mut args = Vec::new();
        while self.current_kind().starts_atom() {
            args.push(self.parse_atom()?);
        }
        if args.is_empty() {
            return Ok(head);
        }

        if let ExprKind::Con { name, args: fields } = &head.kind
            && fields.is_empty()
            && !names::is_tuple(name)
            && &**name != names::UNIT
        {
            let span = args.iter().fold(head.span, |span, arg| span.merge(arg.span));
            return Ok(Expr::con(name.clone(), args, span));
        }

        Ok(args.into_iter().fold(head, Expr::app))
    }

    fn parse_atom(&mut self) -> PResult<Rc<Expr>> {
        let token = self.current().clone();
        let expr = match &token.kind {
            TokenKind::Int(n) => Expr::int(*n, token.span),
            TokenKind::Str(s) => Rc::new(Expr::new(
                ExprKind::Lit(Literal::Str(Rc::from(s.as_str()))),
                token.span,
            )),
            TokenKind::Ident(name) => Expr::var(name.as_str(), token.span),
            TokenKind::ConIdent(name) => Expr::con(name.as_str(), vec![], token.span),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => return self.parse_list(),
            _ => {
                return Err(ParseError::expected(
                    ErrorCode::ExpectedExpression,
                    "an expression",
                    &token,
                ));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// `()`, `(e)`, `(a, b)`, `(op)`, `(e op)`, `(op e)`
    fn parse_paren(&mut self) -> PResult<Rc<Expr>> {
        let open = self.advance();

        if self.check(&TokenKind::RParen) {
            let close = self.advance();
            return Ok(Expr::con(names::UNIT, vec![], open.span.merge(close.span)));
        }

        if let Some(op) = self.operator_at(self.pos) {
            if matches!(self.peek_kind(op.width), TokenKind::RParen) {
                self.pos += op.width;
                let close = self.advance();
                return Ok(op.as_value(open.span.merge(close.span)));
            }
            // `(- e)` is negation, not a section.
            if !(op.width == 1 && &*op.name == "-") {
                self.pos += op.width;
                let rhs = self.parse_expr()?;
                let close = self.expect_closing(&TokenKind::RParen, "`)`")?;
                let span = open.span.merge(close.span);
                let param = self.fresh.name("sec");
                let body = op.apply(Expr::var(param.clone(), span), rhs);
                return Ok(Expr::lambda(param, body, span));
            }
        }

        let (items, section) = self.parse_op_items(true)?;
        if let Some(op) = section {
            let lhs = self.resolve(items)?;
            let close = self.advance();
            let span = open.span.merge(close.span);
            return Ok(if op.constructor {
                Expr::con(op.constructor_name(), vec![lhs], span)
            } else {
                Expr::app(op.as_value(op.span), lhs)
            });
        }

        let first = self.resolve(items)?;
        if self.check(&TokenKind::Comma) {
            let mut elems = vec![first];
            while self.eat(&TokenKind::Comma) {
                elems.push(self.parse_expr()?);
            }
            let close = self.expect_closing(&TokenKind::RParen, "`)`")?;
            let arity = elems.len();
            return Ok(Expr::con(names::tuple(arity), elems, open.span.merge(close.span)));
        }

        self.expect_closing(&TokenKind::RParen, "`)`")?;
        Ok(first)
    }

    /// `[]`, `[a, b, c]`, `[a..]`, `[a..b]`
    fn parse_list(&mut self) -> PResult<Rc<Expr>> {
        let open = self.advance();

        if self.check(&TokenKind::RBracket) {
            let close = self.advance();
            return Ok(Expr::con(names::NIL, vec![], open.span.merge(close.span)));
        }

        let first = self.parse_expr()?;

        if self.eat(&TokenKind::DotDot) {
            if self.check(&TokenKind::RBracket) {
                let close = self.advance();
                let span = open.span.merge(close.span);
                return Ok(Expr::app(Expr::var("enumFrom", span), first));
            }
            let last = self.parse_expr()?;
            let close = self.expect_closing(&TokenKind::RBracket, "`]`")?;
            let span = open.span.merge(close.span);
            return Ok(Expr::app(Expr::app(Expr::var("enumFromTo", span), first), last));
        }

        let mut elems = vec![first];
        while self.eat(&TokenKind::Comma) {
            elems.push(self.parse_expr()?);
        }
        let close = self.expect_closing(&TokenKind::RBracket, "`]`")?;
        let span = open.span.merge(close.span);

        Ok(elems
            .into_iter()
            .rev()
            .fold(Expr::con(names::NIL, vec![], span), |tail, head| {
                Expr::con(names::CONS, vec![head, tail], span)
            }))
    }

    /// `\p1 .. pn -> e`
    fn parse_lambda(&mut self) -> PResult<Rc<Expr>> {
        let backslash = self.advance();
        let params = self.parse_apats()?;
        if params.is_empty() {
            return Err(ParseError::expected(
                ErrorCode::ExpectedPattern,
                "a lambda parameter",
                self.current(),
            ));
        }
        self.expect(&TokenKind::Arrow, "`->`")?;
        let body = self.parse_expr()?;
        let span = backslash.span.merge(body.span);
        desugar::lower_equations(
            vec![Equation {
                head: backslash,
                params,
                body,
                span,
            }],
            span,
            &mut self.fresh,
        )
    }

    /// `let a = 1; b = 2 in e` or `let { a = 1; b = 2 } in e`
    fn parse_let(&mut self) -> PResult<Rc<Expr>> {
        let keyword = self.advance();

        let group = if self.eat(&TokenKind::LBrace) {
            let group = self.parse_decls(|kind| matches!(kind, TokenKind::RBrace), "`;` or `}`")?;
            self.expect_closing(&TokenKind::RBrace, "`}`")?;
            group
        } else {
            self.parse_decls(|kind| matches!(kind, TokenKind::In), "`;` or `in`")?
        };
        self.expect(&TokenKind::In, "`in`")?;

        let bindings = group.into_bindings(&mut self.fresh)?;
        let body = self.parse_expr()?;
        let span = keyword.span.merge(body.span);
        Ok(Rc::new(Expr::new(ExprKind::Let { bindings, body }, span)))
    }

    /// `if c then a else b`, lowered to a `case` on `True`/`False`.
    fn parse_if(&mut self) -> PResult<Rc<Expr>> {
        let keyword = self.advance();
        let scrutinee = self.parse_expr()?;
        self.expect(&TokenKind::Then, "`then`")?;
        let then_branch = self.parse_expr()?;
        self.expect(&TokenKind::Else, "`else`")?;
        let else_branch = self.parse_expr()?;
        let span = keyword.span.merge(else_branch.span);

        let alts = vec![
            Alt::new(
                Pattern::con(names::TRUE, vec![], then_branch.span),
                then_branch.clone(),
                then_branch.span,
            ),
            Alt::new(
                Pattern::con(names::FALSE, vec![], else_branch.span),
                else_branch.clone(),
                else_branch.span,
            ),
        ];
        Ok(Rc::new(Expr::new(ExprKind::Case { scrutinee, alts }, span)))
    }

    /// `case e of { p -> e; ... }`
    fn parse_case(&mut self) -> PResult<Rc<Expr>> {
        let keyword = self.advance();
        let scrutinee = self.parse_expr()?;
        self.expect(&TokenKind::Of, "`of`")?;
        self.expect(&TokenKind::LBrace, "`{`")?;

        let mut alts = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.check(&TokenKind::RBrace) {
                break;
            }
            let pattern = self.parse_pattern()?;
            self.expect(&TokenKind::Arrow, "`->`")?;
            let body = self.parse_expr()?;
            let span = pattern.span.merge(body.span);
            alts.push(Alt::new(pattern, body, span));
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
        }

        if alts.is_empty() {
            return Err(ParseError::expected(
                ErrorCode::ExpectedPattern,
                "a case alternative",
                self.current(),
            ));
        }
        let close = self.expect_closing(&TokenKind::RBrace, "`}`")?;
        let span = keyword.span.merge(close.span);
        Ok(Rc::new(Expr::new(ExprKind::Case { scrutinee, alts }, span)))
    }

    // ========== Patterns ==========

    /// A full pattern: `p : ps`, `Con p1 .. pn`, `-1`, or an atomic pattern.
    fn parse_pattern(&mut self) -> PResult<Pattern> {
        ensure_sufficient_stack(|| {
            let lhs = self.parse_pattern_app()?;
            if matches!(self.current_kind(), TokenKind::Operator(op) if op == ":") {
                self.advance();
                let rhs = self.parse_pattern()?;
                let span = lhs.span.merge(rhs.span);
                return Ok(Pattern::con(names::CONS, vec![lhs, rhs], span));
            }
            Ok(lhs)
        })
    }

    fn parse_pattern_app(&mut self) -> PResult<Pattern> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::ConIdent(name) => {
                self.advance();
                let args = self.parse_apats()?;
                let span = args.iter().fold(token.span, |span, arg| span.merge(arg.span));
                Ok(Pattern::con(name.as_str(), args, span))
            }
            TokenKind::Operator(op) if op == "-" => {
                self.advance();
                let literal = self.current().clone();
                let TokenKind::Int(n) = literal.kind else {
                    return Err(ParseError::expected(
                        ErrorCode::ExpectedPattern,
                        "an integer literal after `-`",
                        &literal,
                    ));
                };
                self.advance();
                Ok(Pattern::new(
                    PatternKind::Lit(Literal::Int(-n)),
                    token.span.merge(literal.span),
                ))
            }
            _ => self.parse_apat(),
        }
    }

    fn parse_apats(&mut self) -> PResult<Vec<Pattern>> {
        let mut patterns = Vec::new();
        while starts_apat(self.current_kind()) {
            patterns.push(self.parse_apat()?);
        }
        Ok(patterns)
    }

    /// An atomic pattern, usable as a function parameter.
    fn parse_apat(&mut self) -> PResult<Pattern> {
        let token = self.current().clone();
        let kind = match &token.kind {
            TokenKind::Underscore => PatternKind::Wildcard,
            TokenKind::Ident(name) => PatternKind::Var(Rc::from(name.as_str())),
            TokenKind::ConIdent(name) => PatternKind::Con {
                name: Rc::from(name.as_str()),
                args: vec![],
            },
            TokenKind::Int(n) => PatternKind::Lit(Literal::Int(*n)),
            TokenKind::Str(s) => PatternKind::Lit(Literal::Str(Rc::from(s.as_str()))),
            TokenKind::LParen => return self.parse_paren_pattern(),
            TokenKind::LBracket => return self.parse_list_pattern(),
            _ => {
                return Err(ParseError::expected(
                    ErrorCode::ExpectedPattern,
                    "a pattern",
                    &token,
                ));
            }
        };
        self.advance();
        Ok(Pattern::new(kind, token.span))
    }

    /// `()`, `(p)`, `(p, q)`
    fn parse_paren_pattern(&mut self) -> PResult<Pattern> {
        let open = self.advance();
        if self.check(&TokenKind::RParen) {
            let close = self.advance();
            return Ok(Pattern::con(names::UNIT, vec![], open.span.merge(close.span)));
        }

        let first = self.parse_pattern()?;
        if !self.check(&TokenKind::Comma) {
            self.expect_closing(&TokenKind::RParen, "`)`")?;
            return Ok(first);
        }

        let mut elems = vec![first];
        while self.eat(&TokenKind::Comma) {
            elems.push(self.parse_pattern()?);
        }
        let close = self.expect_closing(&TokenKind::RParen, "`)`")?;
        let arity = elems.len();
        Ok(Pattern::con(names::tuple(arity), elems, open.span.merge(close.span)))
    }

    /// `[]`, `[p, q]`
    fn parse_list_pattern(&mut self) -> PResult<Pattern> {
        let open = self.advance();
        let mut elems = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            elems.push(self.parse_pattern()?);
            while self.eat(&TokenKind::Comma) {
                elems.push(self.parse_pattern()?);
            }
        }
        let close = self.expect_closing(&TokenKind::RBracket, "`]`")?;
        let span = open.span.merge(close.span);

        Ok(elems
            .into_iter()
            .rev()
            .fold(Pattern::con(names::NIL, vec![], span), |tail, head| {
                Pattern::con(names::CONS, vec![head, tail], span)
            }))
    }

    // ========== Token Helpers ==========

    /// The operator starting at token index `index`, if any.
    fn operator_at(&self, index: usize) -> Option<Operator> {
        let token = self.tokens.get(index)?;
        let (name, span, constructor, width) = match &token.kind {
            TokenKind::Operator(op) => (op.as_str(), token.span, op == ":", 1),
            TokenKind::Backtick => {
                let close = self.tokens.get(index + 2)?;
                if close.kind != TokenKind::Backtick {
                    return None;
                }
                match &self.tokens.get(index + 1)?.kind {
                    TokenKind::Ident(name) => (name.as_str(), token.span.merge(close.span), false, 3),
                    TokenKind::ConIdent(name) => (name.as_str(), token.span.merge(close.span), true, 3),
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(Operator {
            name: Rc::from(name),
            token: token.clone(),
            span,
            fixity: self.fixities.get(name),
            constructor,
            width,
        })
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)].kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    /// Consume the current token and return it.
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(ErrorCode::UnexpectedToken, what, self.current()))
        }
    }

    fn expect_closing(&mut self, kind: &TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(ErrorCode::UnclosedDelimiter, what, self.current()))
        }
    }

    fn expect_eof(&self) -> PResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError::expected(
                ErrorCode::UnexpectedToken,
                "end of input",
                self.current(),
            ))
        }
    }
}

/// Fixity resolution over a flat operator sequence, following the
/// algorithm of the Haskell 2010 report (section 10.6).
struct Resolver {
    items: Peekable<vec::IntoIter<OpItem>>,
    /// Token reported if the sequence ends where an operand is required.
    end: Token,
}

impl Resolver {
    fn parse_neg(&mut self, op1: Option<&Operator>) -> PResult<Rc<Expr>> {
        match self.items.next() {
            Some(OpItem::Operand(expr)) => self.parse2(op1, expr),
            Some(OpItem::Negate(token)) => {
                if let Some(op1) = op1
                    && op1.fixity.precedence >= 6
                {
                    return Err(ParseError::at(
                        ErrorCode::NonAssociativeChain,
                        format!(
                            "cannot mix `{}` [{} {}] and prefix `-` [infixl 6] in the same infix expression",
                            op1.name, op1.fixity.assoc, op1.fixity.precedence
                        ),
                        &token,
                    ));
                }
                let minus = Operator {
                    name: Rc::from("-"),
                    token: token.clone(),
                    span: token.span,
                    fixity: Fixity::new(Assoc::Left, 6),
                    constructor: false,
                    width: 1,
                };
                let operand = self.parse_neg(Some(&minus))?;
                self.parse2(op1, negate(operand, token.span))
            }
            Some(OpItem::Op(op)) => Err(ParseError::expected(
                ErrorCode::ExpectedExpression,
                "an expression",
                &op.token,
            )),
            None => Err(ParseError::expected(
                ErrorCode::ExpectedExpression,
                "an expression",
                &self.end,
            )),
        }
    }

    fn parse2(&mut self, op1: Option<&Operator>, mut lhs: Rc<Expr>) -> PResult<Rc<Expr>> {
        let (prec1, assoc1) = op1.map_or((-1, Assoc::None), |op| (op.fixity.precedence as i8, op.fixity.assoc));

        loop {
            let Some(OpItem::Op(op2)) = self.items.peek() else {
                return Ok(lhs);
            };
            let (prec2, assoc2) = (op2.fixity.precedence as i8, op2.fixity.assoc);

            if prec1 == prec2 && (assoc1 != assoc2 || assoc1 == Assoc::None) {
                let (name1, fixity1) = op1.map_or((Rc::from(""), Fixity::DEFAULT), |op| (op.name.clone(), op.fixity));
                return Err(ParseError::at(
                    ErrorCode::NonAssociativeChain,
                    format!(
                        "cannot mix `{}` [{} {}] and `{}` [{} {}] in the same infix expression",
                        name1, fixity1.assoc, fixity1.precedence, op2.name, op2.fixity.assoc, op2.fixity.precedence
                    ),
                    &op2.token,
                ));
            }
            if prec1 > prec2 || (prec1 == prec2 && assoc1 == Assoc::Left) {
                return Ok(lhs);
            }

            let Some(OpItem::Op(op2)) = self.items.next() else {
                return Ok(lhs);
            };
            let rhs = self.parse_neg(Some(&op2))?;
            lhs = op2.apply(lhs, rhs);
        }
    }
}

/// `-e`; negative integer literals fold directly.
fn negate(operand: Rc<Expr>, minus: Span) -> Rc<Expr> {
    let span = minus.merge(operand.span);
    if let ExprKind::Lit(Literal::Int(n)) = operand.kind {
        return Expr::int(-n, span);
    }
    Expr::app(Expr::var(NEGATE, minus), operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mhs_lexer::Lexer;

    fn parse(source: &str) -> PResult<Program> {
        let tokens = Lexer::new(source).tokenize().unwrap_or_default();
        Parser::new(tokens, FixityTable::default()).parse_program()
    }

    fn expr(source: &str) -> String {
        match parse(source) {
            Ok(Program::Expr(e)) => e.to_string(),
            other => panic!("expected expression program, got {other:?}"),
        }
    }

    #[test]
    fn test_application_binds_tighter_than_operators() {
        assert_eq!(expr("f x + g y"), "(((+) (f x)) (g y))");
    }

    #[test]
    fn test_negation_literal_folds() {
        assert_eq!(expr("-5"), "-5");
        assert_eq!(expr("- x"), "(negate x)");
    }

    #[test]
    fn test_negation_after_high_precedence_operator_is_rejected() {
        let err = parse("a * -b").unwrap_err();
        assert_eq!(err.code, ErrorCode::NonAssociativeChain);
    }

    #[test]
    fn test_looks_like_module() {
        assert!(matches!(parse("main = 1"), Ok(Program::Module(_))));
        assert!(matches!(parse("f (x:xs) = x; main = 1"), Ok(Program::Module(_))));
        assert!(matches!(parse("1 == 2"), Ok(Program::Expr(_))));
        assert!(matches!(parse("let x = 1 in x"), Ok(Program::Expr(_))));
    }

    #[test]
    fn test_empty_tokens_get_eof() {
        let mut parser = Parser::new(Vec::new(), FixityTable::default());
        assert!(parser.parse_program().is_err());
    }
}
