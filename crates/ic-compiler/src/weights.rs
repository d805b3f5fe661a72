//! Register-pressure weights.
//!
//! Bottom-up estimate of how many registers an expression needs beyond its
//! base register. The pressure-aware generator evaluates the heavier operand
//! of a binary node first.
//!
//! | node | weight |
//! |------|--------|
//! | literal, `this`, `new C()`, bare name | 0 |
//! | unary-like (operand, location, size) | operand's weight |
//! | binary, index with `(a, b)` | `a + 1` if `a == b`, else `max(a, b)` |
//! | any call | unbounded |
//!
//! Calls are pinned to unbounded so operands are never reordered around
//! them; argument evaluation order is observable.

use ic_ast::{Expr, NodeId, Program, Stmt};
use rustc_hash::FxHashMap;

/// Registers needed to evaluate an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegisterWeight {
    Bounded(u32),
    Unbounded,
}

impl RegisterWeight {
    pub const ZERO: RegisterWeight = RegisterWeight::Bounded(0);

    /// Weight of a binary node with operand weights `self` and `other`.
    pub fn combine(self, other: RegisterWeight) -> RegisterWeight {
        match (self, other) {
            (RegisterWeight::Bounded(a), RegisterWeight::Bounded(b)) if a == b => {
                RegisterWeight::Bounded(a + 1)
            }
            _ => self.max(other),
        }
    }
}

/// Weights of every expression in a program, keyed by node.
#[derive(Debug, Default)]
pub struct WeightTable {
    weights: FxHashMap<NodeId, RegisterWeight>,
}

impl WeightTable {
    #[tracing::instrument(level = "debug", skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn estimate(program: &Program<'_>) -> Self {
        let mut table = Self::default();
        for class in program.classes {
            for method in class.methods {
                for stmt in method.body {
                    table.visit_stmt(stmt);
                }
            }
        }
        tracing::debug!(expressions = table.weights.len(), "register weights estimated");
        table
    }

    /// Weight of `expr`; unvisited nodes count as unbounded.
    pub fn weight(&self, expr: &Expr<'_>) -> RegisterWeight {
        self.weights
            .get(&NodeId::of(expr))
            .copied()
            .unwrap_or(RegisterWeight::Unbounded)
    }

    /// Whether the right operand should be evaluated first.
    ///
    /// Only when both sides are bounded and the right one is strictly
    /// heavier; an operand containing a call never moves.
    pub fn prefers_right(&self, left: &Expr<'_>, right: &Expr<'_>) -> bool {
        match (self.weight(left), self.weight(right)) {
            (RegisterWeight::Bounded(l), RegisterWeight::Bounded(r)) => l < r,
            _ => false,
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'_>) {
        match stmt {
            Stmt::Assign(assign) => {
                self.visit(assign.target);
                self.visit(assign.value);
            }
            Stmt::Call(call) => {
                self.visit(call.call);
            }
            Stmt::Return(ret) => {
                if let Some(value) = ret.value {
                    self.visit(value);
                }
            }
            Stmt::If(if_stmt) => {
                self.visit(if_stmt.condition);
                self.visit_stmt(if_stmt.then_branch);
                if let Some(else_branch) = if_stmt.else_branch {
                    self.visit_stmt(else_branch);
                }
            }
            Stmt::While(while_stmt) => {
                self.visit(while_stmt.condition);
                self.visit_stmt(while_stmt.body);
            }
            Stmt::Block(block) => block.stmts.iter().for_each(|stmt| self.visit_stmt(stmt)),
            Stmt::LocalVar(local) => {
                if let Some(init) = local.init {
                    self.visit(init);
                }
            }
            Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn visit(&mut self, expr: &Expr<'_>) -> RegisterWeight {
        let weight = match expr {
            Expr::Literal(_) | Expr::This(_) | Expr::NewClass(_) => RegisterWeight::ZERO,
            Expr::Var(var) => match var.location {
                Some(location) => self.visit(location),
                None => RegisterWeight::ZERO,
            },
            Expr::Length(length) => self.visit(length.array),
            Expr::NewArray(new) => self.visit(new.size),
            Expr::Unary(unary) => self.visit(unary.operand),
            Expr::Paren(paren) => self.visit(paren.expr),
            Expr::Index(index) => {
                let array = self.visit(index.array);
                array.combine(self.visit(index.index))
            }
            Expr::Binary(binary) => {
                let left = self.visit(binary.left);
                left.combine(self.visit(binary.right))
            }
            Expr::StaticCall(call) => {
                call.args.iter().for_each(|arg| {
                    self.visit(arg);
                });
                RegisterWeight::Unbounded
            }
            Expr::VirtualCall(call) => {
                if let Some(receiver) = call.receiver {
                    self.visit(receiver);
                }
                call.args.iter().for_each(|arg| {
                    self.visit(arg);
                });
                RegisterWeight::Unbounded
            }
        };
        self.weights.insert(NodeId::of(expr), weight);
        weight
    }
}
