//! Recursive-descent parser for Rill.
//!
//! Consumes the token stream from `rill-lexer` and builds the owned AST in
//! [`crate::ast`]. Operator precedence, lowest to highest: assignment, `or`,
//! `and`, match (`=~` / `!~`), comparison, additive, multiplicative, unary,
//! index postfix.

use rill_common::span::Span;
use rill_common::token::{Token, TokenKind};
use rill_lexer::Lexer;

use crate::ast::{
    ArithOp, AttributeOp, CompareOp, Expr, Param, Program, ResourceBody, TypeArg, TypeExpr,
};
use crate::error::ParseError;

type PResult<T> = Result<T, ParseError>;

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Lexer::tokenize(source),
            pos: 0,
        }
    }

    /// Parse the whole source as a program.
    pub fn parse_program(&mut self) -> PResult<Program> {
        let start = self.peek().span;
        let body = self.parse_statements_until(TokenKind::Eof)?;
        let end = self.peek().span;
        Ok(Program {
            body,
            span: start.merge(end),
        })
    }

    // ── Token access ─────────────────────────────────────────────────────

    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            let tok = self.peek();
            Err(ParseError::new(
                format!("expected {what}, found {:?}", tok.kind),
                tok.span,
            ))
        }
    }

    fn text(&self, tok: Token) -> &'src str {
        &self.source[tok.span.start as usize..tok.span.end as usize]
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn parse_statements_until(&mut self, end: TokenKind) -> PResult<Vec<Expr>> {
        let mut statements = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.at(end) || self.at(TokenKind::Eof) {
                break;
            }
            statements.push(self.parse_expression()?);
        }
        Ok(statements)
    }

    /// `{ statements }`. Returns the body and the span of the closing brace.
    fn parse_block(&mut self) -> PResult<(Vec<Expr>, Span)> {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        let body = self.parse_statements_until(TokenKind::RBrace)?;
        if self.at(TokenKind::RBrace) {
            let close = self.bump();
            Ok((body, close.span))
        } else {
            Err(ParseError::with_related(
                "expected `}` to close block",
                self.peek().span,
                "block started here",
                open.span,
            ))
        }
    }

    // ── Expressions, by precedence ───────────────────────────────────────

    pub fn parse_expression(&mut self) -> PResult<Expr> {
        let lhs = self.parse_or()?;
        if self.at(TokenKind::Eq) {
            let eq = self.bump();
            let Expr::Var { name, span } = lhs else {
                return Err(ParseError::new(
                    "only variables can be assigned to",
                    eq.span,
                ));
            };
            let value = self.parse_expression()?;
            let span = span.merge(value.span());
            return Ok(Expr::Assign {
                name,
                value: Box::new(value),
                span,
            });
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let rhs = self.parse_and()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Or {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_match()?;
        while self.eat(TokenKind::And) {
            let rhs = self.parse_match()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::And {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_match(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_compare()?;
        loop {
            let negated = match self.peek_kind() {
                TokenKind::MatchOp => false,
                TokenKind::NotMatchOp => true,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_compare()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Match {
                negated,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_compare(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => CompareOp::Eq,
                TokenKind::NotEq => CompareOp::NotEq,
                TokenKind::Lt => CompareOp::Lt,
                TokenKind::Gt => CompareOp::Gt,
                TokenKind::LtEq => CompareOp::LtEq,
                TokenKind::GtEq => CompareOp::GtEq,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_additive()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Compare {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        match self.peek_kind() {
            TokenKind::Minus => {
                let tok = self.bump();
                let operand = self.parse_unary()?;
                let span = tok.span.merge(operand.span());
                Ok(Expr::Neg {
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Bang => {
                let tok = self.bump();
                let operand = self.parse_unary()?;
                let span = tok.span.merge(operand.span());
                Ok(Expr::Not {
                    operand: Box::new(operand),
                    span,
                })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(TokenKind::LBracket) {
            let key = self.parse_expression()?;
            let close = self.expect(TokenKind::RBracket, "`]`")?;
            let span = expr.span().merge(close.span);
            expr = Expr::Index {
                base: Box::new(expr),
                key: Box::new(key),
                span,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.peek_kind() {
            TokenKind::Undef => {
                let tok = self.bump();
                Ok(Expr::Undef { span: tok.span })
            }
            TokenKind::Int => self.parse_int(),
            TokenKind::Float => self.parse_float(),
            TokenKind::SingleString => {
                let tok = self.bump();
                let raw = self.text(tok);
                let value = unescape_single(&raw[1..raw.len() - 1]);
                Ok(Expr::Str {
                    value,
                    span: tok.span,
                })
            }
            TokenKind::StringStart => self.parse_double_string(),
            TokenKind::Regex => {
                let tok = self.bump();
                let raw = self.text(tok);
                Ok(Expr::Regexp {
                    pattern: raw[1..raw.len() - 1].to_string(),
                    span: tok.span,
                })
            }
            TokenKind::Var => {
                let tok = self.bump();
                Ok(Expr::Var {
                    name: self.text(tok)[1..].to_string(),
                    span: tok.span,
                })
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_map(),
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::If => self.parse_if(),
            TokenKind::Define => self.parse_define(),
            TokenKind::Class => self.parse_class(),
            TokenKind::Word => {
                if self.peek_next_kind() == TokenKind::LBrace {
                    let tok = self.bump();
                    let type_name = self.text(tok).to_string();
                    self.parse_resource(type_name, tok.span)
                } else {
                    let tok = self.bump();
                    Ok(Expr::Word {
                        name: self.text(tok).to_string(),
                        span: tok.span,
                    })
                }
            }
            _ => {
                let tok = self.peek();
                Err(ParseError::new(
                    format!("expected expression, found {:?}", tok.kind),
                    tok.span,
                ))
            }
        }
    }

    fn parse_int(&mut self) -> PResult<Expr> {
        let tok = self.bump();
        let raw = self.text(tok);
        let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
        } else {
            raw.parse::<i64>()
        };
        match parsed {
            Ok(value) => Ok(Expr::Int {
                value,
                span: tok.span,
            }),
            Err(_) => Err(ParseError::new(
                format!("integer literal out of range: {raw}"),
                tok.span,
            )),
        }
    }

    fn parse_float(&mut self) -> PResult<Expr> {
        let tok = self.bump();
        let raw = self.text(tok);
        match raw.parse::<f64>() {
            Ok(value) => Ok(Expr::Float {
                value,
                span: tok.span,
            }),
            Err(_) => Err(ParseError::new(
                format!("invalid float literal: {raw}"),
                tok.span,
            )),
        }
    }

    /// Double-quoted string. Collapses to a plain `Str` when no segment
    /// interpolates an expression or variable.
    fn parse_double_string(&mut self) -> PResult<Expr> {
        let open = self.expect(TokenKind::StringStart, "`\"`")?;
        let mut segments: Vec<Expr> = Vec::new();
        let close;
        loop {
            match self.peek_kind() {
                TokenKind::StringText => {
                    let tok = self.bump();
                    segments.push(Expr::Str {
                        value: unescape_double(self.text(tok)),
                        span: tok.span,
                    });
                }
                TokenKind::Var => {
                    let tok = self.bump();
                    segments.push(Expr::Var {
                        name: self.text(tok)[1..].to_string(),
                        span: tok.span,
                    });
                }
                TokenKind::InterpStart => {
                    self.bump();
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::InterpEnd, "`}` to close interpolation")?;
                    segments.push(expr);
                }
                TokenKind::StringEnd => {
                    close = self.bump();
                    break;
                }
                _ => {
                    return Err(ParseError::with_related(
                        "unterminated double-quoted string",
                        self.peek().span,
                        "string started here",
                        open.span,
                    ));
                }
            }
        }
        let span = open.span.merge(close.span);
        let interpolates = segments.iter().any(|s| !matches!(s, Expr::Str { .. }));
        if interpolates {
            Ok(Expr::Interp { segments, span })
        } else {
            let value = segments
                .iter()
                .map(|s| match s {
                    Expr::Str { value, .. } => value.as_str(),
                    _ => unreachable!(),
                })
                .collect::<String>();
            Ok(Expr::Str { value, span })
        }
    }

    fn parse_list(&mut self) -> PResult<Expr> {
        let open = self.expect(TokenKind::LBracket, "`[`")?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RBracket, "`]` to close list")?;
        Ok(Expr::List {
            elements,
            span: open.span.merge(close.span),
        })
    }

    fn parse_map(&mut self) -> PResult<Expr> {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        let mut entries = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let key = self.parse_expression()?;
            self.expect(TokenKind::FatArrow, "`=>`")?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RBrace, "`}` to close hash")?;
        Ok(Expr::Map {
            entries,
            span: open.span.merge(close.span),
        })
    }

    /// `if` / `elsif` expression. The current token must be `if` or `elsif`.
    fn parse_if(&mut self) -> PResult<Expr> {
        let kw = self.bump();
        let cond = self.parse_expression()?;
        let (then_body, mut end) = self.parse_block()?;
        let else_body = match self.peek_kind() {
            TokenKind::Elsif => {
                let nested = self.parse_if()?;
                end = nested.span();
                Some(vec![nested])
            }
            TokenKind::Else => {
                self.bump();
                let (body, close) = self.parse_block()?;
                end = close;
                Some(body)
            }
            _ => None,
        };
        Ok(Expr::If {
            cond: Box::new(cond),
            then_body,
            else_body,
            span: kw.span.merge(end),
        })
    }

    fn parse_define(&mut self) -> PResult<Expr> {
        let kw = self.bump();
        let name_tok = self.expect(TokenKind::Word, "definition name")?;
        let name = self.text(name_tok).to_string();
        let params = if self.at(TokenKind::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        let (body, close) = self.parse_block()?;
        Ok(Expr::Define {
            name,
            params,
            body,
            span: kw.span.merge(close),
        })
    }

    /// `class` -- either a class definition (`class a(...) { ... }`) or a
    /// class instantiation (`class { a: ... }`).
    fn parse_class(&mut self) -> PResult<Expr> {
        let kw = self.bump();
        if self.at(TokenKind::LBrace) {
            return self.parse_resource("class".to_string(), kw.span);
        }
        let name_tok = self.expect(TokenKind::Word, "class name")?;
        let name = self.text(name_tok).to_string();
        let params = if self.at(TokenKind::LParen) {
            self.parse_params()?
        } else {
            Vec::new()
        };
        let (body, close) = self.parse_block()?;
        Ok(Expr::ClassDef {
            name,
            params,
            body,
            span: kw.span.merge(close),
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) {
            let type_expr = if self.at(TokenKind::TypeName) {
                Some(self.parse_type_expr()?)
            } else {
                None
            };
            let var_tok = self.expect(TokenKind::Var, "parameter variable")?;
            let name = self.text(var_tok)[1..].to_string();
            let default = if self.eat(TokenKind::Eq) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            let start = type_expr
                .as_ref()
                .map(|t| t.span())
                .unwrap_or(var_tok.span);
            let end = default.as_ref().map(|d| d.span()).unwrap_or(var_tok.span);
            params.push(Param {
                name,
                type_expr,
                default,
                span: start.merge(end),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close parameter list")?;
        Ok(params)
    }

    fn parse_type_expr(&mut self) -> PResult<TypeExpr> {
        let name_tok = self.expect(TokenKind::TypeName, "type name")?;
        let name = self.text(name_tok).to_string();
        if !self.eat(TokenKind::LBracket) {
            return Ok(TypeExpr::Name {
                name,
                span: name_tok.span,
            });
        }
        let mut args = Vec::new();
        while !self.at(TokenKind::RBracket) {
            args.push(self.parse_type_arg()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RBracket, "`]` to close type parameters")?;
        Ok(TypeExpr::Parameterized {
            name,
            args,
            span: name_tok.span.merge(close.span),
        })
    }

    fn parse_type_arg(&mut self) -> PResult<TypeArg> {
        match self.peek_kind() {
            TokenKind::TypeName => Ok(TypeArg::Type(self.parse_type_expr()?)),
            TokenKind::Int => match self.parse_int()? {
                Expr::Int { value, span } => Ok(TypeArg::Int(value, span)),
                _ => unreachable!(),
            },
            TokenKind::Float => match self.parse_float()? {
                Expr::Float { value, span } => Ok(TypeArg::Float(value, span)),
                _ => unreachable!(),
            },
            TokenKind::SingleString => {
                let tok = self.bump();
                let raw = self.text(tok);
                Ok(TypeArg::Str(
                    unescape_single(&raw[1..raw.len() - 1]),
                    tok.span,
                ))
            }
            _ => {
                let tok = self.peek();
                Err(ParseError::new(
                    format!("expected type parameter, found {:?}", tok.kind),
                    tok.span,
                ))
            }
        }
    }

    /// Resource instantiation bodies: `{ title: attr => value, ...; ... }`.
    fn parse_resource(&mut self, type_name: String, start: Span) -> PResult<Expr> {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        let mut bodies = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let title = self.parse_expression()?;
            self.expect(TokenKind::Colon, "`:` after resource title")?;
            let mut operations = Vec::new();
            while self.at(TokenKind::Word) {
                let attr_tok = self.bump();
                self.expect(TokenKind::FatArrow, "`=>`")?;
                let value = self.parse_expression()?;
                let span = attr_tok.span.merge(value.span());
                operations.push(AttributeOp {
                    name: self.text(attr_tok).to_string(),
                    value,
                    span,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            let body_span = title.span().merge(
                operations
                    .last()
                    .map(|op| op.span)
                    .unwrap_or_else(|| title.span()),
            );
            bodies.push(ResourceBody {
                title,
                operations,
                span: body_span,
            });
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        if !self.at(TokenKind::RBrace) {
            return Err(ParseError::with_related(
                "expected `}` to close resource body",
                self.peek().span,
                "body started here",
                open.span,
            ));
        }
        let close = self.bump();
        Ok(Expr::Resource {
            type_name,
            bodies,
            span: start.merge(close.span),
        })
    }
}

// ── String unescaping ────────────────────────────────────────────────────

fn unescape_single(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\'') => out.push('\''),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn unescape_double(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('$') => out.push('$'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
