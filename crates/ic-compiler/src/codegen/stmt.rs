//! Statement lowering.

use ic_ast::{IfStmt, LocalVarStmt, NodeId, Stmt, WhileStmt};
use ic_core::{CompilationError, Result};
use ic_registry::ScopeId;

use super::CodeGenerator;
use crate::lir::{Op, Operand};

impl<'ast> CodeGenerator<'_, 'ast> {
    /// Lower one statement. Statements always start from `R0`.
    pub(super) fn stmt(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Assign(assign) => {
                let value = self.expr(assign.value, 0)?;
                let value = self.store_source(value, 0);
                let target = self.expr(assign.target, 1)?;
                self.out.move_to(&value, &target);
            }
            Stmt::Call(call) => {
                self.expr(call.call, 0)?;
            }
            Stmt::Return(ret) => match ret.value {
                Some(value) => {
                    let mut value = self.expr(value, 0)?;
                    if value.is_slot() {
                        value = self.out.materialize(&value, 0);
                    }
                    self.out.emit(Op::Return, value);
                }
                None => self.out.emit(Op::Return, 9999),
            },
            Stmt::If(if_stmt) => self.if_stmt(scope, if_stmt)?,
            Stmt::While(while_stmt) => self.while_stmt(scope, while_stmt)?,
            Stmt::Break(_) => {
                let target = self
                    .loops
                    .break_target()
                    .ok_or_else(|| CompilationError::internal("break outside of a loop"))?;
                self.out.emit(Op::Jump, target);
            }
            Stmt::Continue(_) => {
                let target = self
                    .loops
                    .continue_target()
                    .ok_or_else(|| CompilationError::internal("continue outside of a loop"))?;
                self.out.emit(Op::Jump, target);
            }
            Stmt::Block(block) => {
                let inner = self.ctx.block_scope(NodeId::of(stmt))?;
                for stmt in block.stmts {
                    self.stmt(inner, stmt)?;
                }
            }
            Stmt::LocalVar(local) => self.local(scope, local)?,
        }
        Ok(())
    }

    /// An if/while body; a lone declaration has its own block scope.
    fn branch(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        let scope = match stmt {
            Stmt::LocalVar(_) => self.ctx.block_scope(NodeId::of(stmt))?,
            _ => scope,
        };
        self.stmt(scope, stmt)
    }

    /// Evaluate a condition into `R0` and compare it with false.
    fn condition(&mut self, condition: &'ast ic_ast::Expr<'ast>) -> Result<()> {
        let value = self.expr(condition, 0)?;
        self.out.materialize(&value, 0);
        self.out.emit(Op::Compare, "0,R0");
        Ok(())
    }

    fn if_stmt(&mut self, scope: ScopeId, if_stmt: &IfStmt<'ast>) -> Result<()> {
        let labels = self.labels.fresh();
        self.condition(if_stmt.condition)?;
        match if_stmt.else_branch {
            Some(else_branch) => {
                self.out.emit(Op::JumpTrue, labels.false_label());
                self.branch(scope, if_stmt.then_branch)?;
                self.out.emit(Op::Jump, labels.end_label());
                self.out.label(&labels.false_label());
                self.branch(scope, else_branch)?;
            }
            None => {
                self.out.emit(Op::JumpTrue, labels.end_label());
                self.branch(scope, if_stmt.then_branch)?;
            }
        }
        self.out.label(&labels.end_label());
        Ok(())
    }

    fn while_stmt(&mut self, scope: ScopeId, while_stmt: &WhileStmt<'ast>) -> Result<()> {
        let labels = self.labels.fresh();
        self.out.label(&labels.while_label());
        self.condition(while_stmt.condition)?;
        self.out.emit(Op::JumpTrue, labels.end_label());

        self.loops.enter_loop(labels);
        let body = self.branch(scope, while_stmt.body);
        self.loops.exit_loop();
        body?;

        self.out.emit(Op::Jump, labels.while_label());
        self.out.label(&labels.end_label());
        Ok(())
    }

    /// `T x = init;` stores into the local's slot; a bare declaration emits
    /// nothing.
    fn local(&mut self, scope: ScopeId, local: &LocalVarStmt<'ast>) -> Result<()> {
        let Some(init) = local.init else {
            return Ok(());
        };
        let value = self.expr(init, 0)?;
        let value = self.store_source(value, 0);
        let slot = Operand::Local(format!("{}{}", local.name, self.ctx.scopes.depth(scope)));
        self.out.move_to(&value, &slot);
        Ok(())
    }
}
