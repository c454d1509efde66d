//! Owned AST for the Rill language.
//!
//! The node inventory is a closed set: everything the type inference engine
//! has a rule for, plus comparisons (which parse but are rejected during
//! inference). Nodes are immutable once built; the parser owns construction
//! and the inference engine only borrows.

use rill_common::span::Span;

/// A parsed compilation unit: the top-level statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Expr>,
    pub span: Span,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison operators. Parsed, but not supported by inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

/// Any Rill expression. Statements are expressions; a program is a list
/// of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The `undef` literal.
    Undef { span: Span },
    /// An integer literal (decimal or hexadecimal source form).
    Int { value: i64, span: Span },
    /// A float literal.
    Float { value: f64, span: Span },
    /// A single-quoted string or a double-quoted string without
    /// interpolation.
    Str { value: String, span: Span },
    /// A bare word (`notify`, `a::b`). Behaves as a string value.
    Word { name: String, span: Span },
    /// A double-quoted string with interpolated segments. Text runs appear
    /// as `Str` segments, interpolations as arbitrary expressions.
    Interp { segments: Vec<Expr>, span: Span },
    /// A `/regex/` literal.
    Regexp { pattern: String, span: Span },
    /// A list literal `[a, b, c]`.
    List { elements: Vec<Expr>, span: Span },
    /// A hash literal `{ k => v, ... }`.
    Map { entries: Vec<(Expr, Expr)>, span: Span },
    /// Unary minus.
    Neg { operand: Box<Expr>, span: Span },
    /// `lhs + rhs` and friends.
    Arith {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `lhs == rhs` and friends. No inference rule exists for these.
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `$name = value`.
    Assign {
        name: String,
        value: Box<Expr>,
        span: Span,
    },
    /// `if cond { ... } else { ... }`. `elsif` chains are desugared into
    /// nested ifs by the parser.
    If {
        cond: Box<Expr>,
        then_body: Vec<Expr>,
        else_body: Option<Vec<Expr>>,
        span: Span,
    },
    /// `$name` variable reference.
    Var { name: String, span: Span },
    /// `lhs =~ rhs` / `lhs !~ rhs`.
    Match {
        negated: bool,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `lhs or rhs`.
    Or {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `lhs and rhs`.
    And {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `! operand`.
    Not { operand: Box<Expr>, span: Span },
    /// `base[key]` index access.
    Index {
        base: Box<Expr>,
        key: Box<Expr>,
        span: Span,
    },
    /// `name { title: attr => value, ... }` resource instantiation.
    /// `class { name: ... }` uses the type name `"class"`.
    Resource {
        type_name: String,
        bodies: Vec<ResourceBody>,
        span: Span,
    },
    /// `define name(params) { ... }` resource type definition.
    Define {
        name: String,
        params: Vec<Param>,
        body: Vec<Expr>,
        span: Span,
    },
    /// `class name(params) { ... }` class definition.
    ClassDef {
        name: String,
        params: Vec<Param>,
        body: Vec<Expr>,
        span: Span,
    },
    /// An empty statement.
    Nop { span: Span },
}

impl Expr {
    /// The source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Undef { span }
            | Expr::Int { span, .. }
            | Expr::Float { span, .. }
            | Expr::Str { span, .. }
            | Expr::Word { span, .. }
            | Expr::Interp { span, .. }
            | Expr::Regexp { span, .. }
            | Expr::List { span, .. }
            | Expr::Map { span, .. }
            | Expr::Neg { span, .. }
            | Expr::Arith { span, .. }
            | Expr::Compare { span, .. }
            | Expr::Assign { span, .. }
            | Expr::If { span, .. }
            | Expr::Var { span, .. }
            | Expr::Match { span, .. }
            | Expr::Or { span, .. }
            | Expr::And { span, .. }
            | Expr::Not { span, .. }
            | Expr::Index { span, .. }
            | Expr::Resource { span, .. }
            | Expr::Define { span, .. }
            | Expr::ClassDef { span, .. }
            | Expr::Nop { span } => *span,
        }
    }
}

/// One body of a resource instantiation: `title: attr => value, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBody {
    pub title: Expr,
    pub operations: Vec<AttributeOp>,
    pub span: Span,
}

/// A single `attr => value` operation inside a resource body.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOp {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// A declared parameter of a `define` or `class`: `Type $name = default`.
/// The type annotation and default are both optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_expr: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub span: Span,
}

/// A type-annotation expression: a capitalised type name, optionally
/// parameterised (`Integer[1, 10]`, `Hash[String, Integer]`).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Name {
        name: String,
        span: Span,
    },
    Parameterized {
        name: String,
        args: Vec<TypeArg>,
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Name { span, .. } | TypeExpr::Parameterized { span, .. } => *span,
        }
    }
}

/// An argument inside a parameterised type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Type(TypeExpr),
    Int(i64, Span),
    Float(f64, Span),
    Str(String, Span),
}

impl TypeArg {
    pub fn span(&self) -> Span {
        match self {
            TypeArg::Type(t) => t.span(),
            TypeArg::Int(_, span) | TypeArg::Float(_, span) | TypeArg::Str(_, span) => *span,
        }
    }
}
