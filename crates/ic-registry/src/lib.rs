//! Type and symbol model for the IC compiler.
//!
//! - [`TypeRegistry`]: interned types and the subtype relation
//! - [`ScopeTree`]: global/class/method/block symbol tables
//!
//! Both are built by the definition pass and then consulted by every later
//! stage.

pub mod error;
pub mod registry;
pub mod scope;
pub mod types;

pub use error::RegistryError;
pub use registry::TypeRegistry;
pub use scope::{Resolution, Scope, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolKind};
pub use types::{ClassType, MethodSignature, Primitive, TypeId, TypeKind};
