//! LIR: the register-based textual IR.
//!
//! - [`opcode`]: instruction mnemonics
//! - [`emitter`]: text buffer for one method body
//! - [`jumps`]: loop label stack for `break`/`continue`
//! - [`strings`]: string literal table
//! - [`runtime`]: the shared runtime-check routines and error strings

pub mod emitter;
pub mod jumps;
pub mod opcode;
pub mod runtime;
pub mod strings;

use std::fmt;

pub use emitter::LirEmitter;
pub use jumps::{LabelCounter, LabelSet, LoopStack};
pub use opcode::Op;
pub use runtime::RuntimeCheck;
pub use strings::StringTable;

/// Register receiving results nobody reads.
pub const DISCARD: &str = "Rdummy";

/// Where an evaluated expression's value lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `R<n>`
    Register(u32),
    /// Immediate or string label: `5`, `str0`, `_DV_A`.
    Literal(String),
    /// A named memory slot: `x2`, `this`.
    Local(String),
    /// `R<base>.<offset>`
    Field { base: u32, offset: u32 },
    /// `R<base>[R<index>]`
    Element { base: u32, index: u32 },
}

impl Operand {
    /// The instruction that moves this operand to or from a register.
    pub fn move_instr(&self) -> Op {
        match self {
            Operand::Register(_) | Operand::Literal(_) | Operand::Local(_) => Op::Move,
            Operand::Field { .. } => Op::MoveField,
            Operand::Element { .. } => Op::MoveArray,
        }
    }

    pub fn is_register(&self, reg: u32) -> bool {
        *self == Operand::Register(reg)
    }

    /// Whether the operand names an object slot rather than a value.
    pub fn is_slot(&self) -> bool {
        matches!(self, Operand::Field { .. } | Operand::Element { .. })
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "R{}", reg),
            Operand::Literal(text) | Operand::Local(text) => f.write_str(text),
            Operand::Field { base, offset } => write!(f, "R{}.{}", base, offset),
            Operand::Element { base, index } => write!(f, "R{}[R{}]", base, index),
        }
    }
}

/// A register name, `R<n>`.
pub fn reg(n: u32) -> Operand {
    Operand::Register(n)
}
