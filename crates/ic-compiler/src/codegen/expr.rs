//! Expression lowering.
//!
//! `expr(e, d)` may clobber `Rd` and above and returns where the value
//! ended up. Callers load slot results into a register before reusing the
//! registers those slots are addressed through.

use ic_ast::{BinaryExpr, BinaryOp, Expr, LiteralKind, NodeId, UnaryOp, VarExpr};
use ic_core::{CompilationError, Result};
use ic_registry::{Resolution, TypeId};

use super::{CodeGenerator, Strategy};
use crate::lir::{Op, Operand, RuntimeCheck, reg};

impl<'ast> CodeGenerator<'_, 'ast> {
    pub(super) fn expr(&mut self, expr: &'ast Expr<'ast>, d: u32) -> Result<Operand> {
        match expr {
            Expr::Literal(literal) => Ok(Operand::Literal(match literal.kind {
                LiteralKind::Int(value) => value.to_string(),
                LiteralKind::String(text) => self.strings.intern(text),
                LiteralKind::Bool(true) => "1".to_string(),
                LiteralKind::Bool(false) | LiteralKind::Null => "0".to_string(),
            })),
            Expr::Var(var) => match var.location {
                Some(location) => self.field_access(var, location, d),
                None => self.name(expr, var, d),
            },
            Expr::Index(index) => {
                let index_first = self.strategy == Strategy::PressureAware
                    && self.weights.prefers_right(index.array, index.index);
                let (base, subscript) = if index_first { (d + 1, d) } else { (d, d + 1) };
                if index_first {
                    let value = self.expr(index.index, subscript)?;
                    self.out.materialize(&value, subscript);
                }
                let array = self.expr(index.array, base)?;
                self.out.materialize(&array, base);
                self.runtime_check(RuntimeCheck::NullRef, &[base]);
                if !index_first {
                    let value = self.expr(index.index, subscript)?;
                    self.out.materialize(&value, subscript);
                }
                self.runtime_check(RuntimeCheck::ArrayAccess, &[base, subscript]);
                Ok(Operand::Element { base, index: subscript })
            }
            Expr::StaticCall(call) => self.static_call(call, d),
            Expr::VirtualCall(call) => self.virtual_call(call, d),
            Expr::This(_) => Ok(Operand::Local("this".to_string())),
            Expr::NewClass(new) => {
                let class = self.ctx.types.class(new.class_name.name).ok_or_else(|| {
                    CompilationError::internal(format!("class '{}' was not registered", new.class_name))
                })?;
                let layout = self.ctx.layouts.require(class)?;
                let size = layout.allocation_size();
                let dispatch = layout.dispatch_label();
                self.out
                    .emit(Op::Library, format_args!("__allocateObject({}),R{}", size, d));
                self.out
                    .emit(Op::MoveField, format_args!("{},R{}.0", dispatch, d));
                Ok(reg(d))
            }
            Expr::NewArray(new) => {
                let size = self.expr(new.size, d)?;
                self.out.materialize(&size, d);
                self.out.emit(Op::Mul, format_args!("4,R{}", d));
                self.runtime_check(RuntimeCheck::Size, &[d]);
                self.out
                    .emit(Op::Library, format_args!("__allocateArray(R{}),R{}", d, d));
                Ok(reg(d))
            }
            Expr::Length(length) => {
                let array = self.expr(length.array, d)?;
                self.out.materialize(&array, d);
                self.runtime_check(RuntimeCheck::NullRef, &[d]);
                self.out.emit(Op::ArrayLength, format_args!("R{},R{}", d, d));
                Ok(reg(d))
            }
            Expr::Binary(binary) => self.binary(binary, d),
            Expr::Unary(unary) => {
                let operand = self.expr(unary.operand, d)?;
                self.out.materialize(&operand, d);
                match unary.op {
                    UnaryOp::Neg => self.out.emit(Op::Neg, reg(d)),
                    UnaryOp::Not => self.out.emit(Op::Xor, format_args!("1,R{}", d)),
                }
                Ok(reg(d))
            }
            Expr::Paren(paren) => self.expr(paren.expr, d),
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    /// A bare name: a local slot, or a field of `this`.
    fn name(&mut self, expr: &'ast Expr<'ast>, var: &VarExpr<'ast>, d: u32) -> Result<Operand> {
        let resolution = self.ctx.scopes.resolution(NodeId::of(expr)).ok_or_else(|| {
            CompilationError::internal(format!(
                "reference '{}' at line {} was never resolved",
                var.name, var.span.line
            ))
        })?;
        match resolution {
            Resolution::Local { scope } => Ok(Operand::Local(format!(
                "{}{}",
                var.name,
                self.ctx.scopes.depth(scope)
            ))),
            Resolution::Field { .. } => {
                let offset = self.field_offset(self.class, var.name.name)?;
                self.out.emit(Op::Move, format_args!("this,R{}", d));
                Ok(Operand::Field { base: d, offset })
            }
        }
    }

    /// `location.name`
    fn field_access(
        &mut self,
        var: &VarExpr<'ast>,
        location: &'ast Expr<'ast>,
        d: u32,
    ) -> Result<Operand> {
        let object = self.expr(location, d)?;
        self.out.materialize(&object, d);
        self.runtime_check(RuntimeCheck::NullRef, &[d]);
        let class = self.ctx.type_of(location)?;
        let offset = self.field_offset(class, var.name.name)?;
        Ok(Operand::Field { base: d, offset })
    }

    fn field_offset(&self, class: TypeId, name: &str) -> Result<u32> {
        let layout = self.ctx.layouts.require(class)?;
        layout.field_offset(name).ok_or_else(|| {
            CompilationError::internal(format!("class '{}' has no field '{}'", layout.name, name))
        })
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn binary(&mut self, binary: &BinaryExpr<'ast>, d: u32) -> Result<Operand> {
        let op = binary.op;
        if op.is_logical() {
            return self.short_circuit(binary, d);
        }
        if op.is_comparison() {
            return self.comparison(binary, d);
        }

        if op == BinaryOp::Add && self.ctx.type_of(binary.left)? == TypeId::STRING {
            let (left, right) = self.operands(binary, d, false)?;
            self.out.emit(
                Op::Library,
                format_args!("__stringCat({},{}),R{}", left, right, d),
            );
            return Ok(reg(d));
        }

        let divides = matches!(op, BinaryOp::Div | BinaryOp::Mod);
        let (left, right) = self.operands(binary, d, !divides)?;
        if divides {
            let Operand::Register(divisor) = right else {
                return Err(CompilationError::internal("divisor was not loaded into a register"));
            };
            self.runtime_check(RuntimeCheck::Zero, &[divisor]);
        }
        let instr = Op::arithmetic(op)
            .ok_or_else(|| CompilationError::internal(format!("'{}' is not arithmetic", op)))?;
        self.out.emit(instr, format_args!("{},{}", right, left));
        Ok(self.out.materialize(&left, d))
    }

    /// Evaluate both operands of a non-logical binary node.
    ///
    /// Returns the left operand loaded into a register and the right operand,
    /// which stays a literal or local when `keep_right` is set and the
    /// pressure-aware strategy is active. The first operand evaluated gets
    /// `Rd`, the second `R(d+1)`.
    fn operands(
        &mut self,
        binary: &BinaryExpr<'ast>,
        d: u32,
        keep_right: bool,
    ) -> Result<(Operand, Operand)> {
        let right_first = self.strategy == Strategy::PressureAware
            && self.weights.prefers_right(binary.left, binary.right);
        if right_first {
            let right = self.expr(binary.right, d)?;
            let right = self.right_operand(right, d, keep_right);
            let left = self.expr(binary.left, d + 1)?;
            let left = self.out.materialize(&left, d + 1);
            Ok((left, right))
        } else {
            let left = self.expr(binary.left, d)?;
            let left = self.out.materialize(&left, d);
            let right = self.expr(binary.right, d + 1)?;
            let right = self.right_operand(right, d + 1, keep_right);
            Ok((left, right))
        }
    }

    fn right_operand(&mut self, right: Operand, target: u32, keep: bool) -> Operand {
        let in_place = matches!(right, Operand::Literal(_) | Operand::Local(_));
        if keep && in_place && self.strategy == Strategy::PressureAware {
            right
        } else {
            self.out.materialize(&right, target)
        }
    }

    /// `Compare right,left`, then a 0/1 result in `Rd`.
    fn comparison(&mut self, binary: &BinaryExpr<'ast>, d: u32) -> Result<Operand> {
        let labels = self.labels.fresh();
        let (left, right) = self.operands(binary, d, true)?;
        let jump = Op::jump_if(binary.op).ok_or_else(|| {
            CompilationError::internal(format!("'{}' is not a comparison", binary.op))
        })?;
        self.out.emit(Op::Compare, format_args!("{},{}", right, left));
        self.out.emit(jump, labels.true_label());
        self.out.emit(Op::Move, format_args!("0,R{}", d));
        self.out.emit(Op::Jump, labels.end_label());
        self.out.label(&labels.true_label());
        self.out.emit(Op::Move, format_args!("1,R{}", d));
        self.out.label(&labels.end_label());
        Ok(reg(d))
    }

    /// `&&` and `||`; the right operand is skipped once the result is known.
    fn short_circuit(&mut self, binary: &BinaryExpr<'ast>, d: u32) -> Result<Operand> {
        let labels = self.labels.fresh();
        let is_and = binary.op == BinaryOp::And;
        let (exit_jump, exit_label, fallthrough, exit_value) = if is_and {
            (Op::JumpTrue, labels.false_label(), 1, 0)
        } else {
            (Op::JumpFalse, labels.true_label(), 0, 1)
        };

        for operand in [binary.left, binary.right] {
            let value = self.expr(operand, d)?;
            self.out.materialize(&value, d);
            self.out.emit(Op::Compare, format_args!("0,R{}", d));
            self.out.emit(exit_jump, &exit_label);
        }
        self.out.emit(Op::Move, format_args!("{},R{}", fallthrough, d));
        self.out.emit(Op::Jump, labels.end_label());
        self.out.label(&exit_label);
        self.out.emit(Op::Move, format_args!("{},R{}", exit_value, d));
        self.out.label(&labels.end_label());
        Ok(reg(d))
    }
}
