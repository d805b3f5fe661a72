//! Definition Pass (Pass A) - register types and build the scope tree.
//!
//! ## Responsibilities
//!
//! - Register every class type, superclass before subclass
//! - Build each class scope: fields, then methods, rejecting hierarchy
//!   collisions, overloading and static/instance override mixing
//! - Build each method scope: formals, locals and nested blocks
//! - Check that exactly one method is the designated entry method
//!
//! ## Architecture
//!
//! ```text
//! Program
//!   │  1. add_class() for every class        (types resolvable everywhere)
//!   │  2. define_class() in declaration order
//!   │       ├── fields / method signatures   (class scope)
//!   │       └── define_method()
//!   │             ├── formals                (method scope)
//!   │             └── define_stmt()          (block scopes, locals)
//!   └─ 3. check_entry()
//! ```
//!
//! Locals are numbered in source order within their method. The type checker
//! uses these ordinals to hide declarations that come after a reference.

use ic_ast::{ClassDecl, MethodDecl, MethodKind, NodeId, Program, Stmt, TypeExpr};
use ic_core::{CompilationError, Result, Span};
use ic_registry::{ScopeId, SymbolKind, TypeId};

use crate::context::{CompilationContext, EntryPoint};

/// Output of the definition pass.
#[derive(Debug, Default)]
pub struct DefinitionOutput {
    pub classes_defined: usize,
    pub methods_defined: usize,
    pub locals_defined: usize,
}

/// Pass A: register classes and build every scope.
pub struct DefinitionPass<'a, 'ast> {
    ctx: &'a mut CompilationContext<'ast>,
    entry_candidates: Vec<EntryPoint<'ast>>,
    /// Ordinal the next local of the current method receives.
    next_ordinal: u32,
    output: DefinitionOutput,
}

impl<'a, 'ast> DefinitionPass<'a, 'ast> {
    pub fn new(ctx: &'a mut CompilationContext<'ast>) -> Self {
        Self {
            ctx,
            entry_candidates: Vec::new(),
            next_ordinal: 0,
            output: DefinitionOutput::default(),
        }
    }

    /// Run the pass over `program`.
    #[tracing::instrument(level = "debug", skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, program: &'ast Program<'ast>) -> Result<DefinitionOutput> {
        for class in program.classes {
            self.register_class(class)?;
        }
        for class in program.classes {
            self.define_class(class)?;
        }
        self.check_entry()?;

        tracing::debug!(
            classes = self.output.classes_defined,
            methods = self.output.methods_defined,
            scopes = self.ctx.scopes.len(),
            "definition pass complete"
        );
        Ok(self.output)
    }

    fn register_class(&mut self, class: &'ast ClassDecl<'ast>) -> Result<()> {
        let span = match class.superclass {
            Some(superclass) if self.ctx.types.class(superclass.name).is_none() => superclass.span,
            _ => class.name.span,
        };
        let id = self.ctx.types.add_class(class).map_err(|e| e.at(span))?;
        let global = self.ctx.scopes.global();
        self.ctx
            .scopes
            .insert(global, class.name.name, SymbolKind::Class, id, class.name.span)
            .map_err(|e| e.at(class.name.span))
    }

    fn resolve(&mut self, ty: &TypeExpr<'_>) -> Result<TypeId> {
        self.ctx.types.resolve(ty).map_err(|e| e.at(ty.span))
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn define_class(&mut self, class: &'ast ClassDecl<'ast>) -> Result<()> {
        let name = class.name.name;
        let class_ty = self.ctx.types.class(name).ok_or_else(|| {
            CompilationError::internal(format!("class '{}' was not registered", name))
        })?;
        let superclass = self
            .ctx
            .types
            .class_type(class_ty)
            .and_then(|class| class.superclass);
        let scope = self.ctx.scopes.add_class_scope(class_ty, name, superclass);

        for field in class.fields {
            let ty = self.resolve(&field.ty)?;
            if self.ctx.scopes.lookup_member(scope, field.name.name).is_some() {
                return Err(CompilationError::definition(
                    "Multiple definitions of symbol in class hierarchy",
                    field.name.name,
                    field.name.span,
                ));
            }
            self.ctx
                .scopes
                .insert(scope, field.name.name, SymbolKind::Field, ty, field.name.span)
                .map_err(|e| e.at(field.name.span))?;
        }

        for method in class.methods {
            self.declare_method(scope, class_ty, method)?;
        }
        for method in class.methods {
            self.define_method(scope, method)?;
        }

        self.output.classes_defined += 1;
        Ok(())
    }

    /// Add `method`'s symbol to its class scope.
    fn declare_method(
        &mut self,
        scope: ScopeId,
        class: TypeId,
        method: &'ast MethodDecl<'ast>,
    ) -> Result<()> {
        let name = method.name.name;
        let return_type = self.resolve(&method.return_type)?;
        let params = method
            .params
            .iter()
            .map(|param| self.resolve(&param.ty))
            .collect::<Result<Vec<_>>>()?;
        let signature = self.ctx.types.method_signature(return_type, params);

        if let Some(existing) = self.ctx.scopes.lookup_member(scope, name) {
            if existing.scope == scope {
                return Err(CompilationError::definition(
                    "Multiple definitions for symbol in scope",
                    name,
                    method.name.span,
                ));
            }
            let SymbolKind::Method(existing_kind) = existing.kind else {
                return Err(CompilationError::definition(
                    "Multiple definitions of symbol in class hierarchy",
                    name,
                    method.name.span,
                ));
            };
            if !self.ctx.types.signatures_match(existing.ty, signature) {
                return Err(CompilationError::signature(
                    "Overloading is not supported",
                    name,
                    method.name.span,
                ));
            }
            if existing_kind.is_static() != method.is_static() {
                return Err(CompilationError::signature(
                    "Overriding mix of static and dynamic methods is not supported",
                    name,
                    method.name.span,
                ));
            }
            // Virtual calls bind arguments by the statically known formal names.
            let base_scope = existing.scope;
            if !method.is_static() && !self.keeps_formal_names(base_scope, method) {
                return Err(CompilationError::signature(
                    "Overriding method must keep the parameter names",
                    name,
                    method.name.span,
                ));
            }
        }

        self.ctx
            .scopes
            .insert(scope, name, SymbolKind::Method(method.kind), signature, method.name.span)
            .map_err(|e| e.at(method.name.span))?;

        if self.is_entry_signature(method, signature) {
            self.entry_candidates.push(EntryPoint { class, method });
        }
        Ok(())
    }

    /// Whether `method` names its formals like the method it overrides,
    /// declared in class scope `base_scope`.
    fn keeps_formal_names(&self, base_scope: ScopeId, method: &MethodDecl<'_>) -> bool {
        let base = self
            .ctx
            .scopes
            .class_of(base_scope)
            .and_then(|class| self.ctx.types.class_type(class))
            .and_then(|class| {
                class
                    .decl
                    .methods
                    .iter()
                    .find(|base| base.name.name == method.name.name)
            });
        base.is_none_or(|base| {
            base.params
                .iter()
                .map(|param| param.name.name)
                .eq(method.params.iter().map(|param| param.name.name))
        })
    }

    /// `static void <entry>(string[] args)` with a body.
    fn is_entry_signature(&mut self, method: &MethodDecl<'_>, signature: TypeId) -> bool {
        if method.kind != MethodKind::Static || method.name.name != self.ctx.options.entry_method {
            return false;
        }
        let string_array = self.ctx.types.array_of(TypeId::STRING);
        self.ctx.types.signature(signature).is_some_and(|signature| {
            signature.return_type == TypeId::VOID && signature.params == [string_array]
        })
    }

    // ========================================================================
    // Methods and statements
    // ========================================================================

    fn define_method(&mut self, class_scope: ScopeId, method: &'ast MethodDecl<'ast>) -> Result<()> {
        let return_type = self.resolve(&method.return_type)?;
        let scope = self.ctx.scopes.add_method_scope(
            class_scope,
            NodeId::of(method),
            method.name.name,
            method.is_static(),
            return_type,
        );

        for param in method.params {
            let ty = self.resolve(&param.ty)?;
            self.ctx
                .scopes
                .insert(scope, param.name.name, SymbolKind::Parameter, ty, param.name.span)
                .map_err(|e| e.at(param.name.span))?;
        }

        self.next_ordinal = 0;
        for stmt in method.body {
            self.define_stmt(scope, stmt)?;
        }
        self.output.methods_defined += 1;
        Ok(())
    }

    fn define_stmt(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::LocalVar(local) => {
                let ty = self.resolve(&local.ty)?;
                let kind = SymbolKind::Local {
                    ordinal: self.next_ordinal,
                };
                self.ctx
                    .scopes
                    .insert(scope, local.name.name, kind, ty, local.name.span)
                    .map_err(|e| e.at(local.name.span))?;
                self.next_ordinal += 1;
                self.output.locals_defined += 1;
            }
            Stmt::Block(block) => {
                let inner = self.ctx.scopes.add_block_scope(scope, NodeId::of(stmt));
                for stmt in block.stmts {
                    self.define_stmt(inner, stmt)?;
                }
            }
            Stmt::If(if_stmt) => {
                self.define_branch(scope, if_stmt.then_branch)?;
                if let Some(else_branch) = if_stmt.else_branch {
                    self.define_branch(scope, else_branch)?;
                }
            }
            Stmt::While(while_stmt) => self.define_branch(scope, while_stmt.body)?,
            Stmt::Assign(_)
            | Stmt::Call(_)
            | Stmt::Return(_)
            | Stmt::Break(_)
            | Stmt::Continue(_) => {}
        }
        Ok(())
    }

    /// A lone declaration as an if/while body gets its own block scope.
    fn define_branch(&mut self, scope: ScopeId, stmt: &'ast Stmt<'ast>) -> Result<()> {
        if matches!(stmt, Stmt::LocalVar(_)) {
            let inner = self.ctx.scopes.add_block_scope(scope, NodeId::of(stmt));
            self.define_stmt(inner, stmt)
        } else {
            self.define_stmt(scope, stmt)
        }
    }

    fn check_entry(&mut self) -> Result<()> {
        let entry_name = &self.ctx.options.entry_method;
        match self.entry_candidates.as_slice() {
            [] => Err(CompilationError::definition(
                "Class hierarchy doesn't have main method",
                entry_name.as_str(),
                Span::line(1),
            )),
            [entry] => {
                self.ctx.entry = Some(*entry);
                Ok(())
            }
            [_, second, ..] => Err(CompilationError::definition(
                "More than one main method",
                entry_name.as_str(),
                second.method.name.span,
            )),
        }
    }
}
