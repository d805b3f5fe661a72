//! Arena-backed constructors for tree nodes.
//!
//! A front end (or a test) builds a [`Program`] through an [`AstBuilder`]
//! bound to a `bumpalo::Bump`. Every node gets the builder's current line;
//! use [`AstBuilder::at`] to place nodes on a different line.
//!
//! ```
//! use bumpalo::Bump;
//! use ic_ast::{AstBuilder, BinaryOp};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(1), BinaryOp::Add, b.int(2));
//! let body = [b.local(b.int_type(), "x", None), b.assign(b.var("x"), sum)];
//! let program = b.program(&[b.class("Main", None, &[], &[b.entry_method(&body)])]);
//! assert_eq!(program.classes.len(), 1);
//! ```

use bumpalo::Bump;
use ic_core::Span;

use crate::*;

#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    line: u32,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena, line: 1 }
    }

    /// A builder that stamps nodes with `line`.
    pub fn at(self, line: u32) -> Self {
        Self { line, ..self }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn span(&self) -> Span {
        Span::line(self.line)
    }

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span())
    }

    fn expr(&self, expr: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(expr)
    }

    fn args(&self, args: &[&'ast Expr<'ast>]) -> &'ast [&'ast Expr<'ast>] {
        self.arena.alloc_slice_copy(args)
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub fn int_type(&self) -> TypeExpr<'ast> {
        TypeExpr::new(BaseType::Int, self.span())
    }

    pub fn bool_type(&self) -> TypeExpr<'ast> {
        TypeExpr::new(BaseType::Boolean, self.span())
    }

    pub fn string_type(&self) -> TypeExpr<'ast> {
        TypeExpr::new(BaseType::String, self.span())
    }

    pub fn void_type(&self) -> TypeExpr<'ast> {
        TypeExpr::new(BaseType::Void, self.span())
    }

    pub fn class_type(&self, name: &str) -> TypeExpr<'ast> {
        TypeExpr::new(BaseType::Class(self.arena.alloc_str(name)), self.span())
    }

    pub fn array_type(&self, element: TypeExpr<'ast>) -> TypeExpr<'ast> {
        element.array()
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn int(&self, value: i64) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    pub fn string(&self, text: &str) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::String(self.arena.alloc_str(text)))
    }

    pub fn boolean(&self, value: bool) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Bool(value))
    }

    pub fn null(&self) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Null)
    }

    fn literal(&self, kind: LiteralKind<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Literal(LiteralExpr {
            kind,
            span: self.span(),
        }))
    }

    /// Unqualified variable (or implicit field) reference.
    pub fn var(&self, name: &str) -> &'ast Expr<'ast> {
        self.expr(Expr::Var(VarExpr {
            location: None,
            name: self.ident(name),
            span: self.span(),
        }))
    }

    /// `location.name`
    pub fn field(&self, location: &'ast Expr<'ast>, name: &str) -> &'ast Expr<'ast> {
        self.expr(Expr::Var(VarExpr {
            location: Some(location),
            name: self.ident(name),
            span: self.span(),
        }))
    }

    pub fn index(&self, array: &'ast Expr<'ast>, index: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Index(self.arena.alloc(IndexExpr {
            array,
            index,
            span: self.span(),
        })))
    }

    pub fn static_call(
        &self,
        class_name: &str,
        method: &str,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::StaticCall(self.arena.alloc(StaticCallExpr {
            class_name: self.ident(class_name),
            method: self.ident(method),
            args: self.args(args),
            span: self.span(),
        })))
    }

    /// Unqualified call on the current receiver.
    pub fn call(&self, method: &str, args: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        self.virtual_call(None, method, args)
    }

    /// `receiver.method(args)`
    pub fn call_on(
        &self,
        receiver: &'ast Expr<'ast>,
        method: &str,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.virtual_call(Some(receiver), method, args)
    }

    fn virtual_call(
        &self,
        receiver: Option<&'ast Expr<'ast>>,
        method: &str,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::VirtualCall(self.arena.alloc(VirtualCallExpr {
            receiver,
            method: self.ident(method),
            args: self.args(args),
            span: self.span(),
        })))
    }

    pub fn this(&self) -> &'ast Expr<'ast> {
        self.expr(Expr::This(ThisExpr { span: self.span() }))
    }

    pub fn new_object(&self, class_name: &str) -> &'ast Expr<'ast> {
        self.expr(Expr::NewClass(NewClassExpr {
            class_name: self.ident(class_name),
            span: self.span(),
        }))
    }

    pub fn new_array(
        &self,
        element_type: TypeExpr<'ast>,
        size: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::NewArray(self.arena.alloc(NewArrayExpr {
            element_type,
            size,
            span: self.span(),
        })))
    }

    pub fn length(&self, array: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Length(self.arena.alloc(LengthExpr {
            array,
            span: self.span(),
        })))
    }

    pub fn binary(
        &self,
        left: &'ast Expr<'ast>,
        op: BinaryOp,
        right: &'ast Expr<'ast>,
    ) -> &'ast Expr<'ast> {
        self.expr(Expr::Binary(self.arena.alloc(BinaryExpr {
            left,
            op,
            right,
            span: self.span(),
        })))
    }

    pub fn unary(&self, op: UnaryOp, operand: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Unary(self.arena.alloc(UnaryExpr {
            op,
            operand,
            span: self.span(),
        })))
    }

    pub fn paren(&self, expr: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        self.expr(Expr::Paren(self.arena.alloc(ParenExpr {
            expr,
            span: self.span(),
        })))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn assign(&self, target: &'ast Expr<'ast>, value: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target,
            value,
            span: self.span(),
        })
    }

    pub fn call_stmt(&self, call: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Call(CallStmt {
            call,
            span: self.span(),
        })
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value,
            span: self.span(),
        })
    }

    pub fn if_stmt(
        &self,
        condition: &'ast Expr<'ast>,
        then_branch: Stmt<'ast>,
        else_branch: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        let arena = self.arena;
        Stmt::If(IfStmt {
            condition,
            then_branch: arena.alloc(then_branch),
            else_branch: else_branch.map(|stmt| &*arena.alloc(stmt)),
            span: self.span(),
        })
    }

    pub fn while_stmt(&self, condition: &'ast Expr<'ast>, body: Stmt<'ast>) -> Stmt<'ast> {
        Stmt::While(WhileStmt {
            condition,
            body: self.arena.alloc(body),
            span: self.span(),
        })
    }

    pub fn break_stmt(&self) -> Stmt<'ast> {
        Stmt::Break(BreakStmt { span: self.span() })
    }

    pub fn continue_stmt(&self) -> Stmt<'ast> {
        Stmt::Continue(ContinueStmt { span: self.span() })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(Block {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: self.span(),
        })
    }

    pub fn local(
        &self,
        ty: TypeExpr<'ast>,
        name: &str,
        init: Option<&'ast Expr<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::LocalVar(LocalVarStmt {
            ty,
            name: self.ident(name),
            init,
            span: self.span(),
        })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn field_decl(&self, ty: TypeExpr<'ast>, name: &str) -> FieldDecl<'ast> {
        FieldDecl {
            ty,
            name: self.ident(name),
            span: self.span(),
        }
    }

    pub fn param(&self, ty: TypeExpr<'ast>, name: &str) -> Param<'ast> {
        Param {
            ty,
            name: self.ident(name),
            span: self.span(),
        }
    }

    pub fn method(
        &self,
        kind: MethodKind,
        return_type: TypeExpr<'ast>,
        name: &str,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
    ) -> MethodDecl<'ast> {
        MethodDecl {
            kind,
            return_type,
            name: self.ident(name),
            params: self.arena.alloc_slice_copy(params),
            body: self.arena.alloc_slice_copy(body),
            span: self.span(),
        }
    }

    /// `static void main(string[] args) { body }`
    pub fn entry_method(&self, body: &[Stmt<'ast>]) -> MethodDecl<'ast> {
        let args = self.param(self.array_type(self.string_type()), "args");
        self.method(MethodKind::Static, self.void_type(), "main", &[args], body)
    }

    pub fn class(
        &self,
        name: &str,
        superclass: Option<&str>,
        fields: &[FieldDecl<'ast>],
        methods: &[MethodDecl<'ast>],
    ) -> ClassDecl<'ast> {
        ClassDecl {
            name: self.ident(name),
            superclass: superclass.map(|name| self.ident(name)),
            fields: self.arena.alloc_slice_copy(fields),
            methods: self.arena.alloc_slice_copy(methods),
            span: self.span(),
        }
    }

    pub fn program(&self, classes: &[ClassDecl<'ast>]) -> Program<'ast> {
        Program {
            classes: self.arena.alloc_slice_copy(classes),
        }
    }
}
