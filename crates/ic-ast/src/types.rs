//! Type expressions as written in declarations.

use std::fmt;

use ic_core::Span;

/// The non-array part of a written type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType<'ast> {
    Int,
    Boolean,
    String,
    Void,
    /// A user class, by name.
    Class(&'ast str),
}

impl BaseType<'_> {
    pub fn name(&self) -> &str {
        match self {
            BaseType::Int => "int",
            BaseType::Boolean => "boolean",
            BaseType::String => "string",
            BaseType::Void => "void",
            BaseType::Class(name) => name,
        }
    }
}

/// A written type: a base type followed by `dims` pairs of brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExpr<'ast> {
    pub base: BaseType<'ast>,
    pub dims: u32,
    pub span: Span,
}

impl<'ast> TypeExpr<'ast> {
    pub fn new(base: BaseType<'ast>, span: Span) -> Self {
        Self { base, dims: 0, span }
    }

    /// This type with one more array dimension.
    pub fn array(self) -> Self {
        Self {
            dims: self.dims + 1,
            ..self
        }
    }

    pub fn is_array(&self) -> bool {
        self.dims > 0
    }

    /// Spelled-out name, e.g. `int[][]`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.name())?;
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
