//! Identifiers and node identity.

use std::fmt;

use ic_core::Span;

/// A name as it appears in source, with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Stable identity of an arena-allocated node.
///
/// Nodes live in a `bumpalo` arena for the whole compilation and are never
/// moved, so a node's address identifies it. Passes use `NodeId` to key side
/// tables (expression types, reference resolutions, block scopes, register
/// weights) instead of writing into the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Identity of the node behind `node`.
    ///
    /// Only meaningful for references into the arena: a node copied onto the
    /// stack gets a different id.
    #[inline]
    pub fn of<T>(node: &T) -> Self {
        Self(node as *const T as usize)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:#x})", self.0)
    }
}
