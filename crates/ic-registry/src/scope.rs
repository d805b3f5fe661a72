//! Scope Tree - lexical symbol tables with inheritance-aware lookup.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: [`Scope`] (kind, depth, static flag, ordered symbols)
//! - Edges: parent → child
//!
//! ## Shape
//!
//! ```text
//! Global (depth 0)
//! ├── class A (1)
//! │   ├── method A.f (2)
//! │   │   └── block (3)
//! │   └── class B extends A (1)
//! │       └── method B.g (2)
//! └── class C (1)
//! ```
//!
//! A class scope's parent is its superclass's scope, so an unqualified lookup
//! inside a method naturally walks locals, then the class hierarchy, then
//! globals. Static method scopes skip the class part of that walk.
//!
//! Every class scope sits at depth 1 whatever its inheritance depth, so an
//! override's formals carry the same depth suffix as the method it replaces.
//!
//! Side tables map tree nodes to the scopes built for them (methods, blocks)
//! and record which declaration each variable reference resolved to.

use std::fmt;

use ic_ast::{MethodKind, NodeId};
use ic_core::Span;
use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::error::RegistryError;
use crate::registry::TypeRegistry;
use crate::types::TypeId;

/// Handle to a scope in the tree.
pub type ScopeId = NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Class { class: TypeId },
    Method { is_static: bool, return_type: TypeId },
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Field,
    Method(MethodKind),
    /// A formal parameter, visible throughout its method.
    Parameter,
    /// A local variable; `ordinal` is its position among the method's locals
    /// in source order.
    Local { ordinal: u32 },
}

impl SymbolKind {
    pub fn is_variable(&self) -> bool {
        matches!(self, SymbolKind::Parameter | SymbolKind::Local { .. })
    }

    pub fn is_member(&self) -> bool {
        matches!(self, SymbolKind::Field | SymbolKind::Method(_))
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
    /// The scope that declares this symbol.
    pub scope: ScopeId,
    pub span: Span,
}

/// What an unqualified variable reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A parameter or local declared in `scope`.
    Local { scope: ScopeId },
    /// A field of the current receiver, declared in class scope `scope`.
    Field { scope: ScopeId },
}

/// One node of the tree.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    pub depth: u32,
    /// Whether code in this scope runs without a receiver.
    pub is_static: bool,
    symbols: IndexMap<String, Symbol, FxBuildHasher>,
}

impl Scope {
    fn new(kind: ScopeKind, name: String, depth: u32, is_static: bool) -> Self {
        Self {
            kind,
            name,
            depth,
            is_static,
            symbols: IndexMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, ScopeKind::Class { .. })
    }
}

#[derive(Debug)]
pub struct ScopeTree {
    graph: DiGraph<Scope, ()>,
    global: ScopeId,
    class_scopes: FxHashMap<TypeId, ScopeId>,
    method_scopes: FxHashMap<NodeId, ScopeId>,
    block_scopes: FxHashMap<NodeId, ScopeId>,
    references: FxHashMap<NodeId, Resolution>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the empty global scope.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let global = graph.add_node(Scope::new(ScopeKind::Global, "Global".into(), 0, false));
        Self {
            graph,
            global,
            class_scopes: FxHashMap::default(),
            method_scopes: FxHashMap::default(),
            block_scopes: FxHashMap::default(),
            references: FxHashMap::default(),
        }
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.graph[id]
    }

    pub fn depth(&self, id: ScopeId) -> u32 {
        self.graph[id].depth
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .next()
    }

    /// Child scopes in creation order.
    pub fn children(&self, id: ScopeId) -> Vec<ScopeId> {
        let mut children: Vec<_> = self.graph.neighbors_directed(id, Direction::Outgoing).collect();
        // petgraph yields the most recently added edge first
        children.reverse();
        children
    }

    fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind, name: String) -> ScopeId {
        let parent_scope = &self.graph[parent];
        let depth = match kind {
            ScopeKind::Class { .. } => 1,
            _ => parent_scope.depth + 1,
        };
        let is_static = match kind {
            ScopeKind::Method { is_static, .. } => is_static,
            ScopeKind::Global | ScopeKind::Class { .. } => false,
            ScopeKind::Block => parent_scope.is_static,
        };
        let child = self.graph.add_node(Scope::new(kind, name, depth, is_static));
        self.graph.add_edge(parent, child, ());
        child
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Open the scope of `class`, nested in its superclass's scope (or the
    /// global scope).
    pub fn add_class_scope(&mut self, class: TypeId, name: &str, superclass: Option<TypeId>) -> ScopeId {
        let parent = superclass
            .and_then(|superclass| self.class_scope(superclass))
            .unwrap_or(self.global);
        let scope = self.add_scope(parent, ScopeKind::Class { class }, name.to_string());
        self.class_scopes.insert(class, scope);
        scope
    }

    /// Open the scope of the method declared by `node`.
    pub fn add_method_scope(
        &mut self,
        class_scope: ScopeId,
        node: NodeId,
        name: &str,
        is_static: bool,
        return_type: TypeId,
    ) -> ScopeId {
        let kind = ScopeKind::Method {
            is_static,
            return_type,
        };
        let scope = self.add_scope(class_scope, kind, name.to_string());
        self.method_scopes.insert(node, scope);
        scope
    }

    /// Open a block scope for the statement `node`.
    pub fn add_block_scope(&mut self, parent: ScopeId, node: NodeId) -> ScopeId {
        let name = format!("statement block in {}", self.graph[parent].name);
        let scope = self.add_scope(parent, ScopeKind::Block, name);
        self.block_scopes.insert(node, scope);
        scope
    }

    /// Declare a symbol in `scope`.
    ///
    /// Fails if the name is already declared in this exact scope; shadowing
    /// an outer declaration is allowed.
    pub fn insert(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        ty: TypeId,
        span: Span,
    ) -> Result<(), RegistryError> {
        let symbols = &mut self.graph[scope].symbols;
        if symbols.contains_key(name) {
            return Err(RegistryError::DuplicateSymbol(name.to_string()));
        }
        symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                ty,
                scope,
                span,
            },
        );
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn class_scope(&self, class: TypeId) -> Option<ScopeId> {
        self.class_scopes.get(&class).copied()
    }

    pub fn method_scope(&self, node: NodeId) -> Option<ScopeId> {
        self.method_scopes.get(&node).copied()
    }

    pub fn block_scope(&self, node: NodeId) -> Option<ScopeId> {
        self.block_scopes.get(&node).copied()
    }

    /// The scope the walk continues in after `id`.
    ///
    /// A static method's walk jumps straight to the global scope, past the
    /// class hierarchy and its fields.
    fn next_outward(&self, id: ScopeId) -> Option<ScopeId> {
        match self.graph[id].kind {
            ScopeKind::Method {
                is_static: true, ..
            } => Some(self.global),
            ScopeKind::Global => None,
            _ => self.parent(id),
        }
    }

    /// Resolve `name` from `scope` outward.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.lookup_visible(scope, name, u32::MAX)
    }

    /// Resolve `name` from `scope` outward, seeing only the first `visible`
    /// locals of the enclosing method.
    ///
    /// Locals declared later in the source are skipped, so a reference binds
    /// to an outer declaration until the inner one is reached.
    pub fn lookup_visible(&self, scope: ScopeId, name: &str, visible: u32) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(symbol) = self.graph[id].get(name) {
                match symbol.kind {
                    SymbolKind::Local { ordinal } if ordinal >= visible => {}
                    _ => return Some(symbol),
                }
            }
            current = self.next_outward(id);
        }
        None
    }

    /// Find a field or method named `name` in `class_scope` or any
    /// superclass scope.
    pub fn lookup_member(&self, class_scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(class_scope);
        while let Some(id) = current {
            let scope = &self.graph[id];
            if !scope.is_class() {
                return None;
            }
            if let Some(symbol) = scope.get(name).filter(|symbol| symbol.kind.is_member()) {
                return Some(symbol);
            }
            current = self.parent(id);
        }
        None
    }

    /// The innermost class scope enclosing `scope` (inclusive).
    pub fn enclosing_class(&self, scope: ScopeId) -> Option<ScopeId> {
        self.enclosing(scope, |kind| matches!(kind, ScopeKind::Class { .. }))
    }

    /// The innermost method scope enclosing `scope` (inclusive).
    pub fn enclosing_method(&self, scope: ScopeId) -> Option<ScopeId> {
        self.enclosing(scope, |kind| matches!(kind, ScopeKind::Method { .. }))
    }

    fn enclosing(&self, scope: ScopeId, pred: impl Fn(&ScopeKind) -> bool) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if pred(&self.graph[id].kind) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// The class type a class scope belongs to.
    pub fn class_of(&self, scope: ScopeId) -> Option<TypeId> {
        match self.graph[scope].kind {
            ScopeKind::Class { class } => Some(class),
            _ => None,
        }
    }

    // ========================================================================
    // Reference metadata
    // ========================================================================

    /// Record what the variable reference `node` resolved to.
    pub fn record_reference(&mut self, node: NodeId, resolution: Resolution) {
        self.references.insert(node, resolution);
    }

    pub fn resolution(&self, node: NodeId) -> Option<Resolution> {
        self.references.get(&node).copied()
    }

    // ========================================================================
    // Dump
    // ========================================================================

    /// Render every scope and its symbols, parents before children.
    pub fn dump(&self, types: &TypeRegistry<'_>) -> String {
        ScopeDump { tree: self, types }.to_string()
    }

    fn write_scope(
        &self,
        id: ScopeId,
        types: &TypeRegistry<'_>,
        out: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let scope = &self.graph[id];
        match scope.kind {
            ScopeKind::Global => writeln!(out, "Global Symbol Table")?,
            ScopeKind::Class { .. } => writeln!(out, "Class Symbol Table: {}", scope.name)?,
            ScopeKind::Method { .. } => writeln!(out, "Method Symbol Table: {}", scope.name)?,
            ScopeKind::Block => writeln!(out, "Statement Block Symbol Table ( {} )", scope.name)?,
        }
        for symbol in scope.symbols() {
            let ty = types.name(symbol.ty);
            match symbol.kind {
                SymbolKind::Class => writeln!(out, "    Class: {}", symbol.name)?,
                SymbolKind::Field => writeln!(out, "    Field: {} {}", ty, symbol.name)?,
                SymbolKind::Method(MethodKind::Virtual) => {
                    writeln!(out, "    Virtual method: {} {}", symbol.name, ty)?
                }
                SymbolKind::Method(_) => writeln!(out, "    Static method: {} {}", symbol.name, ty)?,
                SymbolKind::Parameter => writeln!(out, "    Parameter: {} {}", ty, symbol.name)?,
                SymbolKind::Local { .. } => {
                    writeln!(out, "    Local variable: {} {}", ty, symbol.name)?
                }
            }
        }

        let children = self.children(id);
        if children.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = children
            .iter()
            .map(|&child| self.graph[child].name.as_str())
            .collect();
        writeln!(out, "Children tables: {}", names.join(", "))?;
        for child in children {
            writeln!(out)?;
            self.write_scope(child, types, out)?;
        }
        Ok(())
    }
}

/// `Display` adapter pairing the tree with the registry that names its types.
struct ScopeDump<'a, 'ast> {
    tree: &'a ScopeTree,
    types: &'a TypeRegistry<'ast>,
}

impl fmt::Display for ScopeDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.write_scope(self.tree.global, self.types, f)
    }
}
