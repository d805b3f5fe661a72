//! Expression nodes.
//!
//! Small leaf variants are stored inline; anything with sub-expressions is
//! allocated in the arena and referenced, so `Expr` stays `Copy` and every
//! `&'ast Expr` has a stable [`NodeId`](crate::NodeId).

use ic_core::Span;

use crate::{BinaryOp, Ident, TypeExpr, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer, string, boolean or null literal
    Literal(LiteralExpr<'ast>),
    /// Variable or field reference, optionally through a location
    Var(VarExpr<'ast>),
    /// Array element `a[i]`
    Index(&'ast IndexExpr<'ast>),
    /// `Class.method(args)`
    StaticCall(&'ast StaticCallExpr<'ast>),
    /// `method(args)` or `receiver.method(args)`
    VirtualCall(&'ast VirtualCallExpr<'ast>),
    /// `this`
    This(ThisExpr),
    /// `new Class()`
    NewClass(NewClassExpr<'ast>),
    /// `new T[size]`
    NewArray(&'ast NewArrayExpr<'ast>),
    /// `a.length`
    Length(&'ast LengthExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Parenthesized expression
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Var(e) => e.span,
            Self::Index(e) => e.span,
            Self::StaticCall(e) => e.span,
            Self::VirtualCall(e) => e.span,
            Self::This(e) => e.span,
            Self::NewClass(e) => e.span,
            Self::NewArray(e) => e.span,
            Self::Length(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::StaticCall(_) | Self::VirtualCall(_))
    }

    /// Whether this expression can appear on the left of an assignment.
    pub fn is_location(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Index(_))
    }

    /// Short source-like text used as the offending token in diagnostics.
    pub fn token(&self) -> String {
        match self {
            Self::Literal(e) => e.kind.to_string(),
            Self::Var(e) => e.name.name.to_string(),
            Self::Index(_) => "[]".to_string(),
            Self::StaticCall(e) => e.method.name.to_string(),
            Self::VirtualCall(e) => e.method.name.to_string(),
            Self::This(_) => "this".to_string(),
            Self::NewClass(e) => e.class_name.name.to_string(),
            Self::NewArray(e) => e.element_type.name(),
            Self::Length(_) => "length".to_string(),
            Self::Binary(e) => e.op.to_string(),
            Self::Unary(e) => e.op.to_string(),
            Self::Paren(e) => e.expr.token(),
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind<'ast> {
    Int(i64),
    /// String contents with escapes already decoded
    String(&'ast str),
    Bool(bool),
    Null,
}

impl std::fmt::Display for LiteralKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralKind::Int(value) => write!(f, "{}", value),
            LiteralKind::String(text) => write!(f, "\"{}\"", text),
            LiteralKind::Bool(value) => write!(f, "{}", value),
            LiteralKind::Null => write!(f, "null"),
        }
    }
}

/// A variable or field reference.
///
/// Without a `location` the name resolves through the scope chain, falling
/// back to a field of the current receiver. With one, it names a field of the
/// object the location evaluates to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarExpr<'ast> {
    pub location: Option<&'ast Expr<'ast>>,
    pub name: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub array: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCallExpr<'ast> {
    pub class_name: Ident<'ast>,
    pub method: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualCallExpr<'ast> {
    /// `None` for an unqualified call on the current receiver.
    pub receiver: Option<&'ast Expr<'ast>>,
    pub method: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThisExpr {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewClassExpr<'ast> {
    pub class_name: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewArrayExpr<'ast> {
    pub element_type: TypeExpr<'ast>,
    pub size: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthExpr<'ast> {
    pub array: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}
