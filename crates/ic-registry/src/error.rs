//! Failures raised by the type registry and scope tree.

use ic_core::{CompilationError, Span};
use thiserror::Error;

/// Registry-level error, without a source position.
///
/// The caller knows which node triggered the lookup and attaches its span
/// with [`RegistryError::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type '{0}' is undefined")]
    UndefinedType(String),

    #[error("class '{0}' is defined more than once")]
    DuplicateClass(String),

    #[error("class '{class}' extends undefined class '{superclass}'")]
    UndefinedSuperclass { class: String, superclass: String },

    #[error("symbol '{0}' is already defined in this scope")]
    DuplicateSymbol(String),
}

impl RegistryError {
    /// Convert into a user-facing `DefinitionError` located at `span`.
    pub fn at(self, span: Span) -> CompilationError {
        match self {
            RegistryError::UndefinedType(name) => {
                CompilationError::definition("Type is undefined", name, span)
            }
            RegistryError::DuplicateClass(name) => {
                CompilationError::definition("Multiple definitions for class", name, span)
            }
            RegistryError::UndefinedSuperclass { superclass, .. } => CompilationError::definition(
                "Class inherits from undefined class",
                superclass,
                span,
            ),
            RegistryError::DuplicateSymbol(name) => CompilationError::definition(
                "Multiple definitions for symbol in scope",
                name,
                span,
            ),
        }
    }
}
