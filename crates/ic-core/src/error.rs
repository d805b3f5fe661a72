//! Diagnostics produced by semantic analysis and code generation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! CompilationError
//! ├── Definition     - duplicate/undefined symbol or type, bad inheritance reference
//! ├── Signature      - overloading, static/instance override mismatch
//! ├── Scope          - this/break/continue misuse, static-context violations
//! ├── TypeMismatch   - assignment, return, condition and operator violations
//! ├── Arity          - argument-count mismatch
//! └── Internal       - layout invariant violated after analysis succeeded
//! ```
//!
//! Every user-facing variant carries the offending token and its span and
//! renders as `semantic error at line N: <message>: <token>`. Analysis is
//! fail-fast: the first error aborts the run and is the only one reported.

use thiserror::Error;

use crate::Span;

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, CompilationError>;

/// Coarse category of a [`CompilationError`], for matching without
/// destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Definition,
    Signature,
    Scope,
    TypeMismatch,
    Arity,
    Internal,
}

/// The single diagnostic a rejected program produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// A symbol or type is duplicated or cannot be found.
    #[error("semantic error at line {}: {message}: {token}", .span.line)]
    Definition {
        message: String,
        token: String,
        span: Span,
    },

    /// A method redeclaration that is not a legal override.
    #[error("semantic error at line {}: {message}: {token}", .span.line)]
    Signature {
        message: String,
        token: String,
        span: Span,
    },

    /// A construct used outside the context that permits it.
    #[error("semantic error at line {}: {message}: {token}", .span.line)]
    Scope {
        message: String,
        token: String,
        span: Span,
    },

    /// An operand, value or condition of the wrong type.
    #[error("semantic error at line {}: {message}: {token}", .span.line)]
    TypeMismatch {
        message: String,
        token: String,
        span: Span,
    },

    /// A call with the wrong number of arguments.
    #[error("semantic error at line {}: {message}: {token}", .span.line)]
    Arity {
        message: String,
        token: String,
        span: Span,
    },

    /// A defect in the compiler itself; input that passed analysis can never
    /// trigger this.
    #[error("internal consistency error: {message}")]
    Internal { message: String },
}

impl CompilationError {
    pub fn definition(message: impl Into<String>, token: impl Into<String>, span: Span) -> Self {
        Self::Definition {
            message: message.into(),
            token: token.into(),
            span,
        }
    }

    pub fn signature(message: impl Into<String>, token: impl Into<String>, span: Span) -> Self {
        Self::Signature {
            message: message.into(),
            token: token.into(),
            span,
        }
    }

    pub fn scope(message: impl Into<String>, token: impl Into<String>, span: Span) -> Self {
        Self::Scope {
            message: message.into(),
            token: token.into(),
            span,
        }
    }

    pub fn type_mismatch(
        message: impl Into<String>,
        token: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::TypeMismatch {
            message: message.into(),
            token: token.into(),
            span,
        }
    }

    pub fn arity(message: impl Into<String>, token: impl Into<String>, span: Span) -> Self {
        Self::Arity {
            message: message.into(),
            token: token.into(),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilationError::Definition { .. } => ErrorKind::Definition,
            CompilationError::Signature { .. } => ErrorKind::Signature,
            CompilationError::Scope { .. } => ErrorKind::Scope,
            CompilationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CompilationError::Arity { .. } => ErrorKind::Arity,
            CompilationError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Where the error occurred, if it refers to user input.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::Definition { span, .. }
            | CompilationError::Signature { span, .. }
            | CompilationError::Scope { span, .. }
            | CompilationError::TypeMismatch { span, .. }
            | CompilationError::Arity { span, .. } => Some(*span),
            CompilationError::Internal { .. } => None,
        }
    }

    /// Source line of the offending token (0 for internal errors).
    pub fn line(&self) -> u32 {
        self.span().map_or(0, |span| span.line)
    }

    pub fn message(&self) -> &str {
        match self {
            CompilationError::Definition { message, .. }
            | CompilationError::Signature { message, .. }
            | CompilationError::Scope { message, .. }
            | CompilationError::TypeMismatch { message, .. }
            | CompilationError::Arity { message, .. }
            | CompilationError::Internal { message } => message,
        }
    }

    /// The offending token text (empty for internal errors).
    pub fn token(&self) -> &str {
        match self {
            CompilationError::Definition { token, .. }
            | CompilationError::Signature { token, .. }
            | CompilationError::Scope { token, .. }
            | CompilationError::TypeMismatch { token, .. }
            | CompilationError::Arity { token, .. } => token,
            CompilationError::Internal { .. } => "",
        }
    }
}
