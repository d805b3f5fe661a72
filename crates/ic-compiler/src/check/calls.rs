//! Call checking.

use ic_ast::{Expr, Ident, MethodKind, StaticCallExpr, VirtualCallExpr};
use ic_core::{CompilationError, Result, Span};
use ic_registry::{ScopeId, SymbolKind, TypeId};

use super::MethodChecker;

impl<'ast> MethodChecker<'_, 'ast> {
    /// `Class.method(args)`: the class must declare a static method.
    pub(super) fn check_static_call(
        &mut self,
        scope: ScopeId,
        call: &StaticCallExpr<'ast>,
    ) -> Result<TypeId> {
        let class_name = call.class_name.name;
        let class = self.ctx.types.class(class_name).ok_or_else(|| {
            CompilationError::definition("Class does not exist", class_name, call.class_name.span)
        })?;
        let class_scope = self.ctx.class_scope(class)?;
        let (kind, signature) = self.find_method(class_scope, &call.method)?;
        if !kind.is_static() {
            return Err(CompilationError::scope(
                "Method is not static",
                call.method.name,
                call.span,
            ));
        }
        self.check_args(scope, &call.method, signature, call.args, call.span)
    }

    /// `method(args)` on the current receiver, or `receiver.method(args)`.
    pub(super) fn check_virtual_call(
        &mut self,
        scope: ScopeId,
        call: &VirtualCallExpr<'ast>,
    ) -> Result<TypeId> {
        let signature = match call.receiver {
            None => {
                let (kind, signature) = self.find_method(self.env.class_scope, &call.method)?;
                if self.env.is_static && !kind.is_static() {
                    return Err(CompilationError::scope(
                        "Calling virtual method from static scope",
                        call.method.name,
                        call.span,
                    ));
                }
                signature
            }
            Some(receiver) => {
                let receiver_ty = self.check_expr(scope, receiver)?;
                if !self.ctx.types.is_class(receiver_ty) {
                    return Err(CompilationError::definition(
                        "Location is not of user defined type",
                        receiver.token(),
                        receiver.span(),
                    ));
                }
                let class_scope = self.ctx.class_scope(receiver_ty)?;
                let (kind, signature) = self.find_method(class_scope, &call.method)?;
                if kind.is_static() {
                    return Err(CompilationError::scope(
                        "External call to static method",
                        call.method.name,
                        call.span,
                    ));
                }
                signature
            }
        };
        self.check_args(scope, &call.method, signature, call.args, call.span)
    }

    /// The kind and signature type of method `name` visible from `class_scope`.
    fn find_method(&self, class_scope: ScopeId, name: &Ident<'_>) -> Result<(MethodKind, TypeId)> {
        match self.ctx.scopes.lookup_member(class_scope, name.name) {
            Some(symbol) => match symbol.kind {
                SymbolKind::Method(kind) => Ok((kind, symbol.ty)),
                _ => Err(CompilationError::definition(
                    "Symbol is not a method",
                    name.name,
                    name.span,
                )),
            },
            None => Err(CompilationError::definition("Method not found", name.name, name.span)),
        }
    }

    /// Match `args` against the parameters of `signature`; yields the
    /// return type.
    fn check_args(
        &mut self,
        scope: ScopeId,
        method: &Ident<'_>,
        signature: TypeId,
        args: &'ast [&'ast Expr<'ast>],
        span: Span,
    ) -> Result<TypeId> {
        let signature = self.ctx.types.signature(signature).cloned().ok_or_else(|| {
            CompilationError::internal(format!("'{}' has no method signature", method))
        })?;
        if args.len() != signature.params.len() {
            return Err(CompilationError::arity(
                "Wrong number of arguments passed to method",
                method.name,
                span,
            ));
        }
        for (&arg, &param) in args.iter().zip(&signature.params) {
            let actual = self.check_expr(scope, arg)?;
            self.expect_subtype(
                actual,
                param,
                "Wrong argument type passed to method",
                arg.token(),
                arg.span(),
            )?;
        }
        Ok(signature.return_type)
    }
}
