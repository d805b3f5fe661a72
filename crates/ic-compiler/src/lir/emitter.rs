//! Text buffer for LIR instructions.

use std::fmt::{self, Write};

use super::{Op, Operand};

/// Accumulates the LIR text of one method body.
#[derive(Debug, Default)]
pub struct LirEmitter {
    text: String,
    instructions: usize,
}

impl LirEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `<op> <operands>`.
    pub fn emit(&mut self, op: Op, operands: impl fmt::Display) {
        let _ = writeln!(self.text, "{} {}", op, operands);
        self.instructions += 1;
    }

    /// Emit `<label>:`.
    pub fn label(&mut self, label: &str) {
        self.text.push_str(label);
        self.text.push_str(":\n");
    }

    /// Move `src` into `dst`, picking the instruction from whichever side
    /// is an object slot.
    pub fn move_to(&mut self, src: &Operand, dst: &Operand) {
        let op = if src.is_slot() {
            src.move_instr()
        } else {
            dst.move_instr()
        };
        self.emit(op, format_args!("{},{}", src, dst));
    }

    /// Load `src` into register `reg` unless it is already there.
    pub fn materialize(&mut self, src: &Operand, reg: u32) -> Operand {
        let target = Operand::Register(reg);
        if !src.is_register(reg) {
            self.move_to(src, &target);
        }
        target
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn finish(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lir::reg;

    #[test]
    fn emits_instructions_and_labels() {
        let mut emitter = LirEmitter::new();
        emitter.label("_A_f");
        emitter.emit(Op::Add, format_args!("{},{}", reg(1), reg(0)));
        emitter.emit(Op::Return, 9999);
        assert_eq!(emitter.text(), "_A_f:\nAdd R1,R0\nReturn 9999\n");
        assert_eq!(emitter.instruction_count(), 2);
    }

    #[test]
    fn materialize_picks_the_move_form() {
        let mut emitter = LirEmitter::new();
        emitter.materialize(&Operand::Field { base: 0, offset: 2 }, 0);
        emitter.materialize(&Operand::Element { base: 1, index: 2 }, 1);
        emitter.materialize(&Operand::Local("x2".into()), 2);
        emitter.materialize(&reg(3), 3);
        assert_eq!(
            emitter.finish(),
            "MoveField R0.2,R0\nMoveArray R1[R2],R1\nMove x2,R2\n"
        );
    }

    #[test]
    fn stores_use_the_target_slot_form() {
        let mut emitter = LirEmitter::new();
        emitter.move_to(&reg(0), &Operand::Field { base: 1, offset: 1 });
        emitter.move_to(&Operand::Literal("7".into()), &Operand::Local("x2".into()));
        assert_eq!(emitter.finish(), "MoveField R0,R1.1\nMove 7,x2\n");
    }
}
