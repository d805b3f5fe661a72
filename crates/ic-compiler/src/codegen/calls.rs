//! Call lowering.
//!
//! ```text
//! StaticCall _A_f(x2=R0,y2=R1),R0        user static method
//! Library __println(R0),Rdummy           runtime routine
//! VirtualCall R0.1(x2=R1),R0             slot 1 of the receiver's table
//! ```
//!
//! Arguments are bound by formal name, so the callee's formals are looked up
//! on the declaring class. Calls whose result is void write to `Rdummy`.

use ic_ast::{Expr, MethodDecl, MethodKind, StaticCallExpr, VirtualCallExpr};
use ic_core::{CompilationError, Result};
use ic_registry::{SymbolKind, TypeId};

use super::CodeGenerator;
use crate::lir::{DISCARD, Op, Operand, RuntimeCheck, reg};

/// A resolved call target.
struct Callee<'ast> {
    decl: &'ast MethodDecl<'ast>,
    kind: MethodKind,
    returns_value: bool,
    /// Label of the implementation reached from the static class.
    label: String,
    slot: Option<u32>,
}

impl<'ast> CodeGenerator<'_, 'ast> {
    pub(super) fn static_call(&mut self, call: &StaticCallExpr<'ast>, d: u32) -> Result<Operand> {
        let class = self.ctx.types.class(call.class_name.name).ok_or_else(|| {
            CompilationError::internal(format!("class '{}' was not registered", call.class_name))
        })?;
        let callee = self.callee(class, call.method.name)?;
        self.arguments(call.args, d)?;
        self.emit_static(&callee, call.method.name, d)
    }

    pub(super) fn virtual_call(&mut self, call: &VirtualCallExpr<'ast>, d: u32) -> Result<Operand> {
        let class = match call.receiver {
            Some(receiver) => self.ctx.type_of(receiver)?,
            None => self.class,
        };
        let callee = self.callee(class, call.method.name)?;

        // An unqualified call may name a static method of the current class.
        if call.receiver.is_none() && callee.kind.is_static() {
            self.arguments(call.args, d)?;
            return self.emit_static(&callee, call.method.name, d);
        }

        match call.receiver {
            Some(receiver) => {
                let object = self.expr(receiver, d)?;
                self.out.materialize(&object, d);
                self.runtime_check(RuntimeCheck::NullRef, &[d]);
            }
            None => self.out.emit(Op::Move, format_args!("this,R{}", d)),
        }
        self.arguments(call.args, d + 1)?;

        let slot = callee.slot.ok_or_else(|| {
            CompilationError::internal(format!("no dispatch slot for '{}'", callee.label))
        })?;
        let bindings = self.bindings(callee.decl, d + 1)?;
        let result = self.result_register(callee.returns_value, d);
        self.out.emit(
            Op::VirtualCall,
            format_args!("R{}.{}({}),{}", d, slot, bindings, result),
        );
        Ok(reg(d))
    }

    fn emit_static(&mut self, callee: &Callee<'ast>, name: &str, d: u32) -> Result<Operand> {
        let result = self.result_register(callee.returns_value, d);
        if callee.kind == MethodKind::Library {
            let registers: Vec<String> = (0..callee.decl.params.len() as u32)
                .map(|i| format!("R{}", d + i))
                .collect();
            self.out.emit(
                Op::Library,
                format_args!("__{}({}),{}", name, registers.join(","), result),
            );
        } else {
            let bindings = self.bindings(callee.decl, d)?;
            self.out.emit(
                Op::StaticCall,
                format_args!("{}({}),{}", callee.label, bindings, result),
            );
        }
        Ok(reg(d))
    }

    /// Evaluate `args` into consecutive registers from `base`.
    fn arguments(&mut self, args: &'ast [&'ast Expr<'ast>], base: u32) -> Result<()> {
        for (i, &arg) in args.iter().enumerate() {
            let target = base + i as u32;
            let value = self.expr(arg, target)?;
            self.out.materialize(&value, target);
        }
        Ok(())
    }

    /// `x2=R1,y2=R2`
    fn bindings(&self, method: &MethodDecl<'_>, base: u32) -> Result<String> {
        let depth = self.ctx.scopes.depth(self.ctx.method_scope(method)?);
        let bindings: Vec<String> = method
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| format!("{}{}=R{}", param.name, depth, base + i as u32))
            .collect();
        Ok(bindings.join(","))
    }

    fn result_register(&self, returns_value: bool, d: u32) -> String {
        if returns_value {
            format!("R{}", d)
        } else {
            DISCARD.to_string()
        }
    }

    /// Resolve `name` as seen from `class`.
    fn callee(&self, class: TypeId, name: &str) -> Result<Callee<'ast>> {
        let missing = || CompilationError::internal(format!("method '{}' was not resolved", name));
        let class_scope = self.ctx.class_scope(class)?;
        let symbol = self.ctx.scopes.lookup_member(class_scope, name).ok_or_else(missing)?;
        let SymbolKind::Method(kind) = symbol.kind else {
            return Err(missing());
        };
        let returns_value = self
            .ctx
            .types
            .signature(symbol.ty)
            .is_some_and(|signature| signature.return_type != TypeId::VOID);

        let declaring = self
            .ctx
            .scopes
            .class_of(symbol.scope)
            .and_then(|owner| self.ctx.types.class_type(owner))
            .ok_or_else(missing)?;
        let decl = declaring
            .decl
            .methods
            .iter()
            .find(|method| method.name.name == name)
            .ok_or_else(missing)?;

        let entry = self.ctx.layouts.require(class)?.method(name).ok_or_else(missing)?;
        Ok(Callee {
            decl,
            kind,
            returns_value,
            label: entry.label(),
            slot: entry.slot,
        })
    }
}
