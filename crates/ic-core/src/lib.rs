//! Shared foundation types for the IC compiler crates.
//!
//! - [`Span`]: source positions carried by every tree node
//! - [`CompilationError`]: the diagnostic taxonomy and `Result` alias

pub mod error;
pub mod span;

pub use error::{CompilationError, ErrorKind, Result};
pub use span::Span;
