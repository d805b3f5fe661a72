//! LIR instruction mnemonics.

use std::fmt;

use ic_ast::BinaryOp;

/// LIR instruction mnemonics.
///
/// Two-operand instructions read their first operand and update the
/// second, which must be a register (`Add R1,R0` is `R0 := R0 + R1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // =========================================================================
    // Data movement
    // =========================================================================
    /// Register, immediate or local to register; register or immediate to local.
    Move,
    /// Object field load or store, `R1.2`.
    MoveField,
    /// Array element load or store, `R1[R2]`.
    MoveArray,
    ArrayLength,

    // =========================================================================
    // Arithmetic and logic
    // =========================================================================
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Xor,

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Sets the condition flags from `second - first`.
    Compare,
    Jump,
    /// Jump if the last comparison was equal.
    JumpTrue,
    /// Jump if the last comparison was not equal.
    JumpFalse,
    JumpG,
    JumpGE,
    JumpL,
    JumpLE,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Call into the runtime library.
    Library,
    StaticCall,
    VirtualCall,
    Return,
}

impl Op {
    /// The arithmetic instruction for `op`, if it has one.
    pub fn arithmetic(op: BinaryOp) -> Option<Op> {
        match op {
            BinaryOp::Add => Some(Op::Add),
            BinaryOp::Sub => Some(Op::Sub),
            BinaryOp::Mul => Some(Op::Mul),
            BinaryOp::Div => Some(Op::Div),
            BinaryOp::Mod => Some(Op::Mod),
            _ => None,
        }
    }

    /// The jump taken when comparison `op` holds after `Compare right,left`.
    pub fn jump_if(op: BinaryOp) -> Option<Op> {
        match op {
            BinaryOp::Equal => Some(Op::JumpTrue),
            BinaryOp::NotEqual => Some(Op::JumpFalse),
            BinaryOp::Less => Some(Op::JumpL),
            BinaryOp::LessEqual => Some(Op::JumpLE),
            BinaryOp::Greater => Some(Op::JumpG),
            BinaryOp::GreaterEqual => Some(Op::JumpGE),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Move => "Move",
            Op::MoveField => "MoveField",
            Op::MoveArray => "MoveArray",
            Op::ArrayLength => "ArrayLength",
            Op::Add => "Add",
            Op::Sub => "Sub",
            Op::Mul => "Mul",
            Op::Div => "Div",
            Op::Mod => "Mod",
            Op::Neg => "Neg",
            Op::Xor => "Xor",
            Op::Compare => "Compare",
            Op::Jump => "Jump",
            Op::JumpTrue => "JumpTrue",
            Op::JumpFalse => "JumpFalse",
            Op::JumpG => "JumpG",
            Op::JumpGE => "JumpGE",
            Op::JumpL => "JumpL",
            Op::JumpLE => "JumpLE",
            Op::Library => "Library",
            Op::StaticCall => "StaticCall",
            Op::VirtualCall => "VirtualCall",
            Op::Return => "Return",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
