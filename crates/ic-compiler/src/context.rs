//! Compilation context - the per-run state every pass reads and extends.
//!
//! ## Architecture
//!
//! One `CompilationContext` is created per compilation and threaded by
//! reference through the passes, in order:
//!
//! 1. [`DefinitionPass`](crate::passes::DefinitionPass) fills `types` and
//!    `scopes` and records the entry method
//! 2. [`TypeChecker`](crate::check::TypeChecker) records `expr_types` and the
//!    scope tree's reference resolutions
//! 3. [`LayoutTable::build`] fills `layouts`
//!
//! Nothing here is global; two compilations never share a context.

use ic_ast::{Expr, MethodDecl, NodeId};
use ic_core::{CompilationError, Result};
use ic_registry::{ScopeId, ScopeTree, TypeId, TypeRegistry};
use rustc_hash::FxHashMap;

use crate::layout::LayoutTable;
use crate::options::CompilerOptions;

/// The program's designated entry method.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoint<'ast> {
    pub class: TypeId,
    pub method: &'ast MethodDecl<'ast>,
}

#[derive(Debug)]
pub struct CompilationContext<'ast> {
    pub options: CompilerOptions,
    pub types: TypeRegistry<'ast>,
    pub scopes: ScopeTree,
    pub entry: Option<EntryPoint<'ast>>,
    /// Type of every checked expression.
    pub expr_types: FxHashMap<NodeId, TypeId>,
    pub layouts: LayoutTable,
}

impl<'ast> CompilationContext<'ast> {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            types: TypeRegistry::new(),
            scopes: ScopeTree::new(),
            entry: None,
            expr_types: FxHashMap::default(),
            layouts: LayoutTable::default(),
        }
    }

    /// Whether `method` is the designated entry method.
    pub fn is_entry(&self, method: &MethodDecl<'_>) -> bool {
        self.entry
            .is_some_and(|entry| NodeId::of(entry.method) == NodeId::of(method))
    }

    /// The checked type of `expr`.
    pub fn type_of(&self, expr: &Expr<'_>) -> Result<TypeId> {
        self.expr_types
            .get(&NodeId::of(expr))
            .copied()
            .ok_or_else(|| {
                CompilationError::internal(format!(
                    "expression '{}' at line {} was never type-checked",
                    expr.token(),
                    expr.span().line
                ))
            })
    }

    /// The scope of the class with type `class`.
    pub fn class_scope(&self, class: TypeId) -> Result<ScopeId> {
        self.scopes.class_scope(class).ok_or_else(|| {
            CompilationError::internal(format!("no scope for class '{}'", self.types.name(class)))
        })
    }

    /// The scope built for the method declared by `method`.
    pub fn method_scope(&self, method: &MethodDecl<'_>) -> Result<ScopeId> {
        self.scopes.method_scope(NodeId::of(method)).ok_or_else(|| {
            CompilationError::internal(format!("no scope for method '{}'", method.name))
        })
    }

    /// The block scope opened for statement `node`.
    pub fn block_scope(&self, node: NodeId) -> Result<ScopeId> {
        self.scopes
            .block_scope(node)
            .ok_or_else(|| CompilationError::internal(format!("no block scope for {:?}", node)))
    }
}
