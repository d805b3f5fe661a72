//! Interned type representations.

use std::fmt;

use ic_ast::ClassDecl;

/// Handle to an interned type.
///
/// Structurally identical types share one `TypeId`, so type equality is id
/// equality. The five primitives have fixed ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub const INT: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const STRING: TypeId = TypeId(3);
    pub const VOID: TypeId = TypeId(4);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// The built-in types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Boolean,
    Null,
    String,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Int,
        Primitive::Boolean,
        Primitive::Null,
        Primitive::String,
        Primitive::Void,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::String => "string",
            Primitive::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn id(&self) -> TypeId {
        match self {
            Primitive::Int => TypeId::INT,
            Primitive::Boolean => TypeId::BOOLEAN,
            Primitive::Null => TypeId::NULL,
            Primitive::String => TypeId::STRING,
            Primitive::Void => TypeId::VOID,
        }
    }
}

/// A declared class.
#[derive(Debug, Clone, Copy)]
pub struct ClassType<'ast> {
    pub name: &'ast str,
    pub decl: &'ast ClassDecl<'ast>,
    pub superclass: Option<TypeId>,
}

/// A method's return and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub return_type: TypeId,
    pub params: Vec<TypeId>,
}

#[derive(Debug, Clone)]
pub enum TypeKind<'ast> {
    Primitive(Primitive),
    Class(ClassType<'ast>),
    Array { element: TypeId },
    Method(MethodSignature),
}
