//! Analysis passes.
//!
//! - [`definition`]: Pass A - register classes, build every scope, find the entry method
//!
//! Pass B (type checking) lives in [`crate::check`].

pub mod definition;

pub use definition::{DefinitionOutput, DefinitionPass};
