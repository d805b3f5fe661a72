//! Program tree for the IC language.
//!
//! The tree is produced by an external parser and is assumed well-formed.
//! All nodes are allocated in a `bumpalo` arena and borrowed for `'ast`;
//! composite nodes reference their children, so every node is `Copy` and
//! has a stable [`NodeId`].
//!
//! ## Modules
//!
//! - [`decl`]: program, classes, fields, methods, parameters
//! - [`stmt`]: statements
//! - [`expr`]: expressions
//! - [`types`]: written type expressions
//! - [`ops`]: binary and unary operators
//! - [`builder`]: [`AstBuilder`] for constructing trees

pub mod builder;
pub mod decl;
pub mod expr;
pub mod node;
pub mod ops;
pub mod stmt;
pub mod types;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use stmt::*;
pub use types::*;
