//! Class layouts: field offsets and dispatch-table slots.
//!
//! ## Architecture
//!
//! Layouts are built in declaration order, which always places a superclass
//! before its subclasses. A root class starts with field offset 1 (offset 0
//! holds the dispatch-table pointer) and slot 0. A subclass starts from a
//! copy of its superclass's layout, so the parent's table is never touched:
//!
//! ```text
//! A { x; f(); g(); }          B extends A { y; g(); h(); }
//!   fields  x:1                 fields  x:1  y:2
//!   slots   0:_A_f 1:_A_g       slots   0:_A_f 1:_B_g 2:_B_h
//! ```
//!
//! An override keeps its inherited slot and only changes the owning class
//! in the label. Static methods never get a slot.

use ic_ast::MethodKind;
use ic_core::{CompilationError, Result};
use ic_registry::{ScopeTree, SymbolKind, TypeId, TypeRegistry};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// A method as seen from one class's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    /// The class whose declaration is dispatched to.
    pub owner: String,
    /// Dispatch slot; `None` for static methods.
    pub slot: Option<u32>,
    pub kind: MethodKind,
}

impl MethodEntry {
    /// The code label, `_<Owner>_<name>`.
    pub fn label(&self) -> String {
        format!("_{}_{}", self.owner, self.name)
    }
}

/// Field offsets and dispatch slots of one class.
#[derive(Debug, Clone)]
pub struct ClassLayout {
    pub class: TypeId,
    pub name: String,
    fields: IndexMap<String, u32, FxBuildHasher>,
    methods: IndexMap<String, MethodEntry, FxBuildHasher>,
    next_slot: u32,
}

impl ClassLayout {
    /// Layout of a class without a superclass.
    pub fn root(class: TypeId, name: &str) -> Self {
        Self {
            class,
            name: name.to_string(),
            fields: IndexMap::default(),
            methods: IndexMap::default(),
            next_slot: 0,
        }
    }

    /// A new layout for subclass `name`, starting from this one.
    pub fn derive(&self, class: TypeId, name: &str) -> Self {
        Self {
            class,
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Append a field; returns its offset.
    pub fn add_field(&mut self, name: &str) -> u32 {
        let offset = self.fields.len() as u32 + 1;
        self.fields.insert(name.to_string(), offset);
        offset
    }

    /// Declare a method of this class, overriding any inherited one.
    pub fn add_method(&mut self, name: &str, kind: MethodKind) {
        let owner = self.name.clone();
        if let Some(entry) = self.methods.get_mut(name) {
            entry.owner = owner;
            entry.kind = kind;
            return;
        }
        let slot = match kind {
            MethodKind::Virtual => {
                let slot = self.next_slot;
                self.next_slot += 1;
                Some(slot)
            }
            MethodKind::Static | MethodKind::Library => None,
        };
        self.methods.insert(
            name.to_string(),
            MethodEntry {
                name: name.to_string(),
                owner,
                slot,
                kind,
            },
        );
    }

    pub fn field_offset(&self, name: &str) -> Option<u32> {
        self.fields.get(name).copied()
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(name)
    }

    /// Field names and offsets in offset order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, u32)> {
        self.fields.iter().map(|(name, &offset)| (name.as_str(), offset))
    }

    /// Method labels ordered by slot.
    pub fn dispatch_table(&self) -> Vec<String> {
        let mut slotted: Vec<(u32, String)> = self
            .methods
            .values()
            .filter_map(|entry| entry.slot.map(|slot| (slot, entry.label())))
            .collect();
        slotted.sort_by_key(|(slot, _)| *slot);
        slotted.into_iter().map(|(_, label)| label).collect()
    }

    /// `_DV_<Class>`
    pub fn dispatch_label(&self) -> String {
        format!("_DV_{}", self.name)
    }

    /// Bytes to allocate for an instance: one word per field plus the
    /// dispatch pointer.
    pub fn allocation_size(&self) -> u32 {
        4 * (self.fields.len() as u32 + 1)
    }
}

/// Layouts of every class, in declaration order.
#[derive(Debug, Default)]
pub struct LayoutTable {
    layouts: IndexMap<TypeId, ClassLayout, FxBuildHasher>,
}

impl LayoutTable {
    /// Build layouts from the class scopes filled by the definition pass.
    #[tracing::instrument(level = "debug", skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(types: &TypeRegistry<'_>, scopes: &ScopeTree) -> Result<Self> {
        let mut table = Self::default();
        for (id, class) in types.classes() {
            let mut layout = match class.superclass {
                Some(superclass) => table
                    .get(superclass)
                    .ok_or_else(|| {
                        CompilationError::internal(format!(
                            "superclass of '{}' has no layout",
                            class.name
                        ))
                    })?
                    .derive(id, class.name),
                None => ClassLayout::root(id, class.name),
            };

            let scope = scopes.class_scope(id).ok_or_else(|| {
                CompilationError::internal(format!("class '{}' has no scope", class.name))
            })?;
            for symbol in scopes.scope(scope).symbols() {
                match symbol.kind {
                    SymbolKind::Field => {
                        layout.add_field(&symbol.name);
                    }
                    SymbolKind::Method(kind) => layout.add_method(&symbol.name, kind),
                    _ => {}
                }
            }
            table.layouts.insert(id, layout);
        }

        tracing::debug!(classes = table.layouts.len(), "layouts built");
        Ok(table)
    }

    pub fn get(&self, class: TypeId) -> Option<&ClassLayout> {
        self.layouts.get(&class)
    }

    /// The layout of `class`, as an internal error if it is missing.
    pub fn require(&self, class: TypeId) -> Result<&ClassLayout> {
        self.get(class)
            .ok_or_else(|| CompilationError::internal(format!("no layout for type {}", class)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassLayout> {
        self.layouts.values()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
