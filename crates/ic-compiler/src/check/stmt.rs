//! Statement checking.

use ic_ast::{LocalVarStmt, NodeId, Stmt};
use ic_core::{CompilationError, Result};
use ic_registry::{ScopeId, SymbolKind, TypeId};

use super::MethodChecker;

impl<'ast> MethodChecker<'_, 'ast> {
    pub(super) fn check_stmt(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Assign(assign) => {
                if !assign.target.is_location() {
                    return Err(CompilationError::type_mismatch(
                        "Assignment target is not a variable, field or array element",
                        assign.target.token(),
                        assign.span,
                    ));
                }
                let target = self.check_expr(scope, assign.target)?;
                let value = self.check_expr(scope, assign.value)?;
                let message = format!("Types mismatch, not of type {}", self.type_name(target));
                self.expect_subtype(value, target, &message, assign.value.token(), assign.span)
            }
            Stmt::Call(call) if !call.call.is_call() => Err(CompilationError::type_mismatch(
                "Only method calls can be used as statements",
                call.call.token(),
                call.span,
            )),
            Stmt::Call(call) => self.check_expr(scope, call.call).map(|_| ()),
            Stmt::Return(ret) => {
                let value = match ret.value {
                    Some(value) => self.check_expr(scope, value)?,
                    None => TypeId::VOID,
                };
                let expected = self.env.return_type;
                let message = format!("Types mismatch, not of type {}", self.type_name(expected));
                self.expect_subtype(value, expected, &message, "return", ret.span)
            }
            Stmt::If(if_stmt) => {
                let condition = self.check_expr(scope, if_stmt.condition)?;
                self.expect_subtype(
                    condition,
                    TypeId::BOOLEAN,
                    "Condition in if statement is not of type boolean",
                    if_stmt.condition.token(),
                    if_stmt.condition.span(),
                )?;
                self.check_branch(scope, if_stmt.then_branch)?;
                match if_stmt.else_branch {
                    Some(else_branch) => self.check_branch(scope, else_branch),
                    None => Ok(()),
                }
            }
            Stmt::While(while_stmt) => {
                let condition = self.check_expr(scope, while_stmt.condition)?;
                self.expect_subtype(
                    condition,
                    TypeId::BOOLEAN,
                    "Condition in while statement is not of type boolean",
                    while_stmt.condition.token(),
                    while_stmt.condition.span(),
                )?;
                self.env.loop_depth += 1;
                let body = self.check_branch(scope, while_stmt.body);
                self.env.loop_depth -= 1;
                body
            }
            Stmt::Break(brk) if self.env.loop_depth == 0 => Err(CompilationError::scope(
                "Break statement outside of a loop",
                "break",
                brk.span,
            )),
            Stmt::Continue(cont) if self.env.loop_depth == 0 => Err(CompilationError::scope(
                "Continue statement outside of a loop",
                "continue",
                cont.span,
            )),
            Stmt::Break(_) | Stmt::Continue(_) => Ok(()),
            Stmt::Block(block) => {
                let inner = self.ctx.block_scope(NodeId::of(stmt))?;
                for stmt in block.stmts {
                    self.check_stmt(inner, stmt)?;
                }
                Ok(())
            }
            Stmt::LocalVar(local) => self.check_local(scope, local),
        }
    }

    /// If/while bodies; a lone declaration runs in the block scope opened
    /// for it during definition.
    fn check_branch(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        let scope = match stmt {
            Stmt::LocalVar(_) => self.ctx.block_scope(NodeId::of(stmt))?,
            _ => scope,
        };
        self.check_stmt(scope, stmt)
    }

    fn check_local(&mut self, scope: ScopeId, local: &LocalVarStmt<'ast>) -> Result<()> {
        let symbol = self.ctx.scopes.scope(scope).get(local.name.name);
        let (ordinal, ty) = match symbol {
            Some(symbol) => match symbol.kind {
                SymbolKind::Local { ordinal } => (ordinal, symbol.ty),
                _ => {
                    return Err(CompilationError::internal(format!(
                        "'{}' is not a local variable",
                        local.name
                    )));
                }
            },
            None => {
                return Err(CompilationError::internal(format!(
                    "local '{}' was never defined",
                    local.name
                )));
            }
        };
        self.env.visible = self.env.visible.max(ordinal + 1);

        let Some(init) = local.init else {
            return Ok(());
        };
        let value = self.check_expr(scope, init)?;
        let message = format!("Types mismatch, not of type {}", self.type_name(ty));
        self.expect_subtype(value, ty, &message, init.token(), local.span)
    }
}
