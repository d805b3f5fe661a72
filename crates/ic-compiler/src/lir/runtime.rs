//! Runtime checks shared by every program.
//!
//! Each check is a small routine called as `StaticCall __check...(...),Rdummy`
//! before the guarded operation. On failure it prints one of the fixed error
//! strings and jumps to the program's exit label.

use std::fmt::Write;

/// Label at the very end of the program text.
pub const ERROR_EXIT: &str = "_error_exit";

/// One runtime guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeCheck {
    /// Object or array reference is not null.
    NullRef,
    /// Index is within `[0, length)`.
    ArrayAccess,
    /// Allocation size is not negative.
    Size,
    /// Divisor is not zero.
    Zero,
}

impl RuntimeCheck {
    pub const ALL: [RuntimeCheck; 4] = [
        RuntimeCheck::NullRef,
        RuntimeCheck::ArrayAccess,
        RuntimeCheck::Size,
        RuntimeCheck::Zero,
    ];

    pub fn routine(&self) -> &'static str {
        match self {
            RuntimeCheck::NullRef => "__checkNullRef",
            RuntimeCheck::ArrayAccess => "__checkArrayAccess",
            RuntimeCheck::Size => "__checkSize",
            RuntimeCheck::Zero => "__checkZero",
        }
    }

    /// Label of the error string printed on failure.
    pub fn message_label(&self) -> &'static str {
        match self {
            RuntimeCheck::NullRef => "str_null_ref",
            RuntimeCheck::ArrayAccess => "str_array_access",
            RuntimeCheck::Size => "str_size",
            RuntimeCheck::Zero => "str_zero",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RuntimeCheck::NullRef => "Runtime Error: Null pointer dereference!",
            RuntimeCheck::ArrayAccess => "Runtime Error: Array index out of bounds!",
            RuntimeCheck::Size => "Runtime Error: Array allocation with negative array size!",
            RuntimeCheck::Zero => "Runtime Error: Division by zero!",
        }
    }

    /// Formal parameter names, in call order.
    pub fn formals(&self) -> &'static [&'static str] {
        match self {
            RuntimeCheck::NullRef => &["a"],
            RuntimeCheck::ArrayAccess => &["a", "i"],
            RuntimeCheck::Size => &["n"],
            RuntimeCheck::Zero => &["b"],
        }
    }

    /// The body between the routine label and its error label.
    fn body(&self) -> &'static [&'static str] {
        match self {
            RuntimeCheck::NullRef => &[
                "Move a,Rc1",
                "Compare 0,Rc1",
                "JumpTrue __checkNullRef_err",
            ],
            RuntimeCheck::ArrayAccess => &[
                "Move a,Rc1",
                "Move i,Rc2",
                "ArrayLength Rc1,Rc1",
                "Compare Rc1,Rc2",
                "JumpGE __checkArrayAccess_err",
                "Compare 0,Rc2",
                "JumpL __checkArrayAccess_err",
            ],
            RuntimeCheck::Size => &["Move n,Rc1", "Compare 0,Rc1", "JumpL __checkSize_err"],
            RuntimeCheck::Zero => &["Move b,Rc1", "Compare 0,Rc1", "JumpTrue __checkZero_err"],
        }
    }

    /// The full routine text, followed by a blank line.
    pub fn render(&self, out: &mut String) {
        let name = self.routine();
        let _ = writeln!(out, "{}:", name);
        for line in self.body() {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, "Return 9999");
        let _ = writeln!(out, "{}_err:", name);
        let _ = writeln!(out, "Library __println({}),Rdummy", self.message_label());
        let _ = writeln!(out, "Jump {}", ERROR_EXIT);
        out.push('\n');
    }

    /// `<label>: "<message>"`
    pub fn render_message(&self, out: &mut String) {
        let _ = writeln!(out, "{}: \"{}\"", self.message_label(), self.message());
    }
}
