//! Type Registry - interning and subtyping for every type in a program.
//!
//! ## Architecture
//!
//! Types live in one append-only vector indexed by [`TypeId`]. Side indexes
//! make interning O(1):
//!
//! - classes by name (insertion ordered, so dumps follow declaration order)
//! - arrays by element type
//! - method signatures by `(return, params)`
//!
//! The registry starts with the five primitives, grows while declarations
//! are registered, and only gains array types afterwards (when a `new T[n]`
//! names an array type nothing declared).

use std::fmt;

use ic_ast::{BaseType, ClassDecl, TypeExpr};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::error::RegistryError;
use crate::types::{ClassType, MethodSignature, Primitive, TypeId, TypeKind};

type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug)]
pub struct TypeRegistry<'ast> {
    types: Vec<TypeKind<'ast>>,
    classes: IndexMap<&'ast str, TypeId, FxBuildHasher>,
    arrays: FxHashMap<TypeId, TypeId>,
    signatures: FxHashMap<MethodSignature, TypeId>,
}

impl Default for TypeRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'ast> TypeRegistry<'ast> {
    /// A registry holding only the primitives.
    pub fn new() -> Self {
        let types = Primitive::ALL.into_iter().map(TypeKind::Primitive).collect();
        Self {
            types,
            classes: IndexMap::default(),
            arrays: FxHashMap::default(),
            signatures: FxHashMap::default(),
        }
    }

    fn push(&mut self, kind: TypeKind<'ast>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(kind);
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind<'ast> {
        &self.types[id.index()]
    }

    // ========================================================================
    // Lookup and interning
    // ========================================================================

    /// Resolve a type by its spelled-out name.
    ///
    /// Primitive names map to their singletons, a trailing `[]` resolves the
    /// element type and interns the array, anything else must be a
    /// registered class.
    pub fn get_type(&mut self, name: &str) -> Result<TypeId> {
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(primitive.id());
        }
        if let Some(element) = name.strip_suffix("[]") {
            let element = self.get_type(element)?;
            return Ok(self.array_of(element));
        }
        self.class(name)
            .ok_or_else(|| RegistryError::UndefinedType(name.to_string()))
    }

    /// Resolve a written type expression.
    pub fn resolve(&mut self, ty: &TypeExpr<'_>) -> Result<TypeId> {
        let mut id = match ty.base {
            BaseType::Int => TypeId::INT,
            BaseType::Boolean => TypeId::BOOLEAN,
            BaseType::String => TypeId::STRING,
            BaseType::Void => TypeId::VOID,
            BaseType::Class(name) => self
                .class(name)
                .ok_or_else(|| RegistryError::UndefinedType(ty.name()))?,
        };
        for _ in 0..ty.dims {
            id = self.array_of(id);
        }
        Ok(id)
    }

    /// The interned array type with the given element type.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.arrays.get(&element) {
            return id;
        }
        let id = self.push(TypeKind::Array { element });
        self.arrays.insert(element, id);
        id
    }

    /// The interned signature type for `(params) -> return_type`.
    pub fn method_signature(&mut self, return_type: TypeId, params: Vec<TypeId>) -> TypeId {
        let signature = MethodSignature {
            return_type,
            params,
        };
        if let Some(&id) = self.signatures.get(&signature) {
            return id;
        }
        let id = self.push(TypeKind::Method(signature.clone()));
        self.signatures.insert(signature, id);
        id
    }

    /// Register a declared class.
    ///
    /// The superclass, if any, must already be registered.
    pub fn add_class(&mut self, decl: &'ast ClassDecl<'ast>) -> Result<TypeId> {
        let name = decl.name.name;
        if self.classes.contains_key(name) || Primitive::from_name(name).is_some() {
            return Err(RegistryError::DuplicateClass(name.to_string()));
        }
        let superclass = match decl.superclass {
            Some(superclass) => Some(self.class(superclass.name).ok_or_else(|| {
                RegistryError::UndefinedSuperclass {
                    class: name.to_string(),
                    superclass: superclass.name.to_string(),
                }
            })?),
            None => None,
        };
        let id = self.push(TypeKind::Class(ClassType {
            name,
            decl,
            superclass,
        }));
        self.classes.insert(name, id);
        Ok(id)
    }

    pub fn class(&self, name: &str) -> Option<TypeId> {
        self.classes.get(name).copied()
    }

    /// Registered classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (TypeId, &ClassType<'ast>)> + '_ {
        self.classes
            .values()
            .filter_map(|&id| self.class_type(id).map(|class| (id, class)))
    }

    pub fn class_type(&self, id: TypeId) -> Option<&ClassType<'ast>> {
        match self.kind(id) {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Array { element } => Some(*element),
            _ => None,
        }
    }

    pub fn signature(&self, id: TypeId) -> Option<&MethodSignature> {
        match self.kind(id) {
            TypeKind::Method(signature) => Some(signature),
            _ => None,
        }
    }

    pub fn is_class(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Class(_))
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Array { .. })
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// Whether a value of type `sub` can be used where `sup` is expected.
    ///
    /// Classes follow the superclass chain. `null` converts to anything but
    /// `int`, `boolean` and `void`. Everything else is a subtype only of
    /// itself; arrays are not covariant.
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if sub == TypeId::NULL {
            return !matches!(sup, TypeId::INT | TypeId::BOOLEAN | TypeId::VOID);
        }
        let mut current = self.class_type(sub).and_then(|class| class.superclass);
        while let Some(id) = current {
            if id == sup {
                return true;
            }
            current = self.class_type(id).and_then(|class| class.superclass);
        }
        false
    }

    /// Whether each type is a subtype of the other.
    pub fn mutually_compatible(&self, a: TypeId, b: TypeId) -> bool {
        self.is_subtype(a, b) && self.is_subtype(b, a)
    }

    /// Whether two signature types may stand for the same method.
    ///
    /// Requires equal arity, mutually compatible return types and mutually
    /// substitutable parameters.
    pub fn signatures_match(&self, a: TypeId, b: TypeId) -> bool {
        let (Some(a), Some(b)) = (self.signature(a), self.signature(b)) else {
            return false;
        };
        a.params.len() == b.params.len()
            && self.mutually_compatible(a.return_type, b.return_type)
            && a.params
                .iter()
                .zip(&b.params)
                .all(|(&x, &y)| self.mutually_compatible(x, y))
    }

    /// Source-style name of a type, e.g. `int[]` or `{int, string -> void}`.
    pub fn name(&self, id: TypeId) -> String {
        match self.kind(id) {
            TypeKind::Primitive(primitive) => primitive.name().to_string(),
            TypeKind::Class(class) => class.name.to_string(),
            TypeKind::Array { element } => format!("{}[]", self.name(*element)),
            TypeKind::Method(signature) => {
                let params: Vec<String> = signature.params.iter().map(|&p| self.name(p)).collect();
                format!(
                    "{{{} -> {}}}",
                    params.join(", "),
                    self.name(signature.return_type)
                )
            }
        }
    }
}

impl fmt::Display for TypeRegistry<'_> {
    /// The numbered type table.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type Table")?;
        for (index, kind) in self.types.iter().enumerate() {
            let id = TypeId(index as u32);
            match kind {
                TypeKind::Primitive(primitive) => {
                    writeln!(f, "    {}: Primitive type: {}", id, primitive.name())?
                }
                TypeKind::Class(class) => match class.superclass {
                    Some(superclass) => writeln!(
                        f,
                        "    {}: Class: {}, Superclass ID: {}",
                        id, class.name, superclass
                    )?,
                    None => writeln!(f, "    {}: Class: {}", id, class.name)?,
                },
                TypeKind::Array { .. } => writeln!(f, "    {}: Array type: {}", id, self.name(id))?,
                TypeKind::Method(_) => writeln!(f, "    {}: Method type: {}", id, self.name(id))?,
            }
        }
        Ok(())
    }
}
