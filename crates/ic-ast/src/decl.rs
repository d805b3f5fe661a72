//! Program, class and member declarations.

use ic_core::Span;

use crate::{Ident, Stmt, TypeExpr};

/// The root of a parsed program.
///
/// Classes appear in source order. The class describing natively implemented
/// routines is an ordinary entry whose methods are all [`MethodKind::Library`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub classes: &'ast [ClassDecl<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    pub name: Ident<'ast>,
    pub superclass: Option<Ident<'ast>>,
    pub fields: &'ast [FieldDecl<'ast>],
    pub methods: &'ast [MethodDecl<'ast>],
    pub span: Span,
}

impl ClassDecl<'_> {
    /// Whether every method is a native routine declaration.
    pub fn is_library(&self) -> bool {
        !self.methods.is_empty()
            && self
                .methods
                .iter()
                .all(|method| method.kind == MethodKind::Library)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}

/// How a method is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Dispatched through the receiver's dispatch table.
    Virtual,
    /// Called by class-qualified label, no receiver.
    Static,
    /// Static routine implemented by the runtime; declared without a body.
    Library,
}

impl MethodKind {
    pub fn is_static(&self) -> bool {
        matches!(self, MethodKind::Static | MethodKind::Library)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    pub kind: MethodKind,
    pub return_type: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

impl MethodDecl<'_> {
    pub fn is_static(&self) -> bool {
        self.kind.is_static()
    }

    /// Whether the body ends in an explicit `return`.
    pub fn ends_with_return(&self) -> bool {
        self.body.last().is_some_and(Stmt::is_return)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}
