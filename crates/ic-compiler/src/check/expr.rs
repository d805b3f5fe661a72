//! Expression checking: references, arrays, allocation and operators.

use ic_ast::{BinaryExpr, BinaryOp, Expr, LiteralKind, NodeId, UnaryOp, VarExpr};
use ic_core::{CompilationError, Result};
use ic_registry::{Resolution, ScopeId, SymbolKind, TypeId};

use super::MethodChecker;

impl<'ast> MethodChecker<'_, 'ast> {
    /// Check `expr` and record its type.
    pub(super) fn check_expr(&mut self, scope: ScopeId, expr: &'ast Expr<'ast>) -> Result<TypeId> {
        let ty = self.infer(scope, expr)?;
        self.ctx.expr_types.insert(NodeId::of(expr), ty);
        Ok(ty)
    }

    fn infer(&mut self, scope: ScopeId, expr: &'ast Expr<'ast>) -> Result<TypeId> {
        match expr {
            Expr::Literal(literal) => Ok(match literal.kind {
                LiteralKind::Int(_) => TypeId::INT,
                LiteralKind::String(_) => TypeId::STRING,
                LiteralKind::Bool(_) => TypeId::BOOLEAN,
                LiteralKind::Null => TypeId::NULL,
            }),
            Expr::Var(var) => match var.location {
                Some(location) => self.check_field_access(scope, var, location),
                None => self.check_name(scope, expr, var),
            },
            Expr::Index(index) => {
                let array = self.check_expr(scope, index.array)?;
                let element = self.ctx.types.element_type(array).ok_or_else(|| {
                    CompilationError::type_mismatch(
                        "Using [n] syntax on non-array type",
                        self.type_name(array),
                        index.span,
                    )
                })?;
                let subscript = self.check_expr(scope, index.index)?;
                if subscript != TypeId::INT {
                    return Err(CompilationError::type_mismatch(
                        "The index of array must be of type int",
                        index.index.token(),
                        index.index.span(),
                    ));
                }
                Ok(element)
            }
            Expr::StaticCall(call) => self.check_static_call(scope, call),
            Expr::VirtualCall(call) => self.check_virtual_call(scope, call),
            Expr::This(this) => {
                if self.env.is_static {
                    return Err(CompilationError::scope(
                        "Cannot use 'this' in a static method",
                        "this",
                        this.span,
                    ));
                }
                Ok(self.env.class)
            }
            Expr::NewClass(new) => self.ctx.types.class(new.class_name.name).ok_or_else(|| {
                CompilationError::definition("Class is undefined", new.class_name.name, new.span)
            }),
            Expr::NewArray(new) => {
                let element = self
                    .ctx
                    .types
                    .resolve(&new.element_type)
                    .map_err(|e| e.at(new.element_type.span))?;
                if element == TypeId::VOID {
                    return Err(CompilationError::type_mismatch(
                        "Array elements cannot be of type void",
                        new.element_type.name(),
                        new.element_type.span,
                    ));
                }
                let size = self.check_expr(scope, new.size)?;
                if size != TypeId::INT {
                    return Err(CompilationError::type_mismatch(
                        "The size of array is not an integer",
                        new.size.token(),
                        new.size.span(),
                    ));
                }
                Ok(self.ctx.types.array_of(element))
            }
            Expr::Length(length) => {
                let array = self.check_expr(scope, length.array)?;
                if !self.ctx.types.is_array(array) {
                    return Err(CompilationError::type_mismatch(
                        "Length requested not on array type",
                        "length",
                        length.span,
                    ));
                }
                Ok(TypeId::INT)
            }
            Expr::Binary(binary) => self.check_binary(scope, binary),
            Expr::Unary(unary) => {
                let operand = self.check_expr(scope, unary.operand)?;
                let (expected, message) = match unary.op {
                    UnaryOp::Neg => (TypeId::INT, "Math unary operation on a non-int type"),
                    UnaryOp::Not => (TypeId::BOOLEAN, "Logical unary operation on a non boolean type"),
                };
                if operand != expected {
                    return Err(CompilationError::type_mismatch(
                        message,
                        unary.op.to_string(),
                        unary.span,
                    ));
                }
                Ok(operand)
            }
            Expr::Paren(paren) => self.check_expr(scope, paren.expr),
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    /// An unqualified name: a local, a formal, or a field of `this`.
    fn check_name(&mut self, scope: ScopeId, expr: &'ast Expr<'ast>, var: &VarExpr<'ast>) -> Result<TypeId> {
        let name = var.name.name;
        let found = self
            .ctx
            .scopes
            .lookup_visible(scope, name, self.env.visible)
            .map(|symbol| (symbol.kind, symbol.ty, symbol.scope));

        let resolution = match found {
            Some((kind, ty, declared_in)) if kind.is_variable() => {
                Some((Resolution::Local { scope: declared_in }, ty))
            }
            Some((SymbolKind::Field, ty, declared_in)) => {
                Some((Resolution::Field { scope: declared_in }, ty))
            }
            _ => None,
        };
        if let Some((resolution, ty)) = resolution {
            self.ctx.scopes.record_reference(NodeId::of(expr), resolution);
            return Ok(ty);
        }

        let is_field = self
            .ctx
            .scopes
            .lookup_member(self.env.class_scope, name)
            .is_some_and(|symbol| symbol.kind == SymbolKind::Field);
        if self.env.is_static && is_field {
            return Err(CompilationError::scope(
                "Cannot reference field from static method",
                name,
                var.span,
            ));
        }
        Err(CompilationError::definition("Symbol cannot be resolved", name, var.span))
    }

    /// `location.name`: the location must be an object declaring the field.
    fn check_field_access(
        &mut self,
        scope: ScopeId,
        var: &VarExpr<'ast>,
        location: &'ast Expr<'ast>,
    ) -> Result<TypeId> {
        let location_ty = self.check_expr(scope, location)?;
        let not_found = || {
            CompilationError::definition(
                format!("Location of type {} does not have a field", self.type_name(location_ty)),
                var.name.name,
                var.span,
            )
        };
        if !self.ctx.types.is_class(location_ty) {
            return Err(not_found());
        }
        let class_scope = self.ctx.class_scope(location_ty)?;
        self.ctx
            .scopes
            .lookup_member(class_scope, var.name.name)
            .filter(|symbol| symbol.kind == SymbolKind::Field)
            .map(|symbol| symbol.ty)
            .ok_or_else(not_found)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn check_binary(&mut self, scope: ScopeId, binary: &BinaryExpr<'ast>) -> Result<TypeId> {
        let left = self.check_expr(scope, binary.left)?;
        let right = self.check_expr(scope, binary.right)?;
        let op = binary.op;
        let fail = |message: &str| {
            Err(CompilationError::type_mismatch(message, op.to_string(), binary.span))
        };

        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                if left != right {
                    return fail("Different operand types");
                }
                match op {
                    BinaryOp::Add if left == TypeId::INT || left == TypeId::STRING => Ok(left),
                    BinaryOp::Add => fail("Plus operation on illegal types"),
                    _ if left == TypeId::INT => Ok(TypeId::INT),
                    _ => fail("Math operation on non-int type"),
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if left != TypeId::BOOLEAN || right != TypeId::BOOLEAN {
                    return fail("Logical operation on non boolean values");
                }
                Ok(TypeId::BOOLEAN)
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                if left == TypeId::VOID || right == TypeId::VOID {
                    return fail("Cannot compare void values");
                }
                if !self.is_subtype(left, right) && !self.is_subtype(right, left) {
                    return fail("Comparing types that are not subtypes of one another");
                }
                Ok(TypeId::BOOLEAN)
            }
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                if left != TypeId::INT || right != TypeId::INT {
                    return fail("Comparing non-int values");
                }
                Ok(TypeId::BOOLEAN)
            }
        }
    }
}
