//! Per-class property schema registry.
//!
//! This module provides the [`SchemaRegistry`], the per-class multi-index table describing
//! a container class's statically declared properties. It serves as the central hub for
//! property lookup, enumeration and inheritance-aware metadata composition.
//!
//! # Key Components
//!
//! - [`SchemaRegistry`] - Multi-index table of [`PropertySpec`] entries for one class
//! - [`SchemaBuilder`] - Declaration collector used while building a registry
//! - [`PropertyDecl`] - One pending declaration, with chainable metadata setters
//!
//! # Registry Architecture
//!
//! The registry keeps three views over the same spec set:
//!
//! - **Declaration order**: a sequence preserving the order properties were declared,
//!   which pins UI and serialization ordering
//! - **Name index**: unique hash index for O(1) name lookup
//! - **Slot index**: unique hash index for O(1) lookup by [`SlotIndex`]
//!
//! Because the registry stores slots rather than live references, one registry is shared
//! by every instance of the class; enumeration re-derives each live property from the
//! queried instance's [`SlotTable`].
//!
//! # Inheritance
//!
//! A registry optionally links to its parent class's registry. [`SchemaRegistry::merge`]
//! inserts the whole ancestor chain into the local indices (nearest ancestor wins on
//! collision, local declarations win over all ancestors), guarded by a merge flag so the
//! operation is idempotent and lazy. [`SchemaRegistry::split`] is the exact inverse and
//! restores the local-only state. The effective, post-merge sequence is ancestor-first:
//! the root-most ancestor's block comes first and local declarations come last.
//!
//! # Thread Safety
//!
//! Registries are read-mostly: they are populated once at class initialization and then
//! only queried. Concurrent reads are safe; merge/split must not run concurrently with
//! readers on other threads (callers needing that impose their own exclusion).
//!
//! # Examples
//!
//! ```rust
//! use propscope::{PropertyKind, SchemaRegistry};
//!
//! let shape = SchemaRegistry::build("Shape", None, |b| {
//!     b.property("Length", 8, PropertyKind::Float).group("Shape");
//!     b.property("Width", 12, PropertyKind::Float).group("Shape");
//! })?;
//!
//! let spec = shape.find_property("Length").unwrap();
//! assert_eq!(spec.slot.value(), 8);
//! # Ok::<(), propscope::Error>(())
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
};

use tracing::debug;

use crate::{
    properties::{PropertyKind, PropertyList, PropertyMap, PropertyNamedList, PropertyRc, SlotTable},
    schema::{PropertySpec, PropertySpecRc, PropertyType, SlotIndex},
    Error, Result,
};

/// A reference to a `SchemaRegistry`
pub type SchemaRegistryRc = Arc<SchemaRegistry>;

/// One sequence entry, tagging whether the spec was merged in from an ancestor.
struct SchemaEntry {
    spec: PropertySpecRc,
    inherited: bool,
}

/// The mutable multi-index core, guarded by one lock.
struct SchemaCore {
    /// Declaration-order sequence; after merge, ancestor blocks precede local entries
    sequence: Vec<SchemaEntry>,
    /// Unique index on property name
    by_name: HashMap<String, PropertySpecRc>,
    /// Unique index on slot
    by_slot: HashMap<SlotIndex, PropertySpecRc>,
}

impl SchemaCore {
    fn insert(&mut self, spec: PropertySpecRc, inherited: bool) {
        self.by_name.insert(spec.name.clone(), spec.clone());
        self.by_slot.insert(spec.slot, spec.clone());
        self.sequence.push(SchemaEntry { spec, inherited });
    }
}

/// One pending property declaration inside a [`SchemaBuilder`].
///
/// Returned by [`SchemaBuilder::property`]; group, documentation and flags can be
/// chained onto it. Validation happens when [`SchemaRegistry::build`] finishes.
pub struct PropertyDecl {
    name: String,
    slot: i32,
    kind: PropertyKind,
    group: String,
    doc: String,
    flags: PropertyType,
}

impl PropertyDecl {
    /// Sets the editor group of this property.
    pub fn group(&mut self, group: &str) -> &mut Self {
        self.group = group.to_string();
        self
    }

    /// Sets the documentation string of this property.
    pub fn doc(&mut self, doc: &str) -> &mut Self {
        self.doc = doc.to_string();
        self
    }

    /// Sets the declared type flags of this property.
    pub fn flags(&mut self, flags: PropertyType) -> &mut Self {
        self.flags = flags;
        self
    }
}

/// Collects property declarations while a class registry is being built.
///
/// Declaration call order is preserved and becomes the registry's sequence order.
pub struct SchemaBuilder {
    decls: Vec<PropertyDecl>,
}

impl SchemaBuilder {
    fn new() -> Self {
        SchemaBuilder { decls: Vec::new() }
    }

    /// Declares a property with default (empty) group, documentation and flags.
    ///
    /// # Arguments
    /// * `name` - The property name, unique within the class
    /// * `slot` - The raw slot index; validated against the signed 16-bit range on build
    /// * `kind` - The kind of value the property holds
    pub fn property(&mut self, name: &str, slot: i32, kind: PropertyKind) -> &mut PropertyDecl {
        self.decls.push(PropertyDecl {
            name: name.to_string(),
            slot,
            kind,
            group: String::new(),
            doc: String::new(),
            flags: PropertyType::empty(),
        });
        let last = self.decls.len() - 1;
        &mut self.decls[last]
    }
}

/// Per-class multi-index table of statically declared properties.
///
/// One `SchemaRegistry` exists per container class (not per instance). It holds the
/// class's [`PropertySpec`] entries indexed by declaration order, name and slot, an
/// optional link to the parent class's registry, and the merge guard realizing lazy,
/// idempotent inheritance composition.
///
/// # Identity Model
///
/// The registry never stores live property references. Specs carry slots, and every
/// enumeration method takes the queried instance's [`SlotTable`] to re-derive the live
/// [`PropertyRc`] for each spec. This is what lets a single registry serve every
/// instance of the class with zero per-instance metadata overhead.
///
/// # Examples
///
/// ```rust
/// use propscope::{PropertyKind, SchemaRegistry};
///
/// let shape = SchemaRegistry::build("Shape", None, |b| {
///     b.property("Length", 8, PropertyKind::Float);
/// })?;
/// let solid = SchemaRegistry::build("Solid", Some(shape), |b| {
///     b.property("Height", 16, PropertyKind::Float);
/// })?;
///
/// // Lookups transparently cover the ancestor chain.
/// assert!(solid.find_property("Length").is_some());
/// assert_eq!(solid.spec_count(), 2);
/// # Ok::<(), propscope::Error>(())
/// ```
pub struct SchemaRegistry {
    /// Name of the class this registry describes
    class_name: String,
    /// The parent class's registry, if any
    parent: Option<SchemaRegistryRc>,
    /// Guard flag: true once the ancestor chain has been merged in
    parent_merged: AtomicBool,
    /// The multi-index core
    core: RwLock<SchemaCore>,
}

impl SchemaRegistry {
    /// Builds a class registry from the declarations recorded by `declare`.
    ///
    /// This is the class-initialization entry point: each concrete container class calls
    /// it exactly once (typically from a guarded one-time initializer) to populate its
    /// schema and link it to its parent class's registry.
    ///
    /// # Arguments
    /// * `class_name` - Name of the class being described
    /// * `parent` - The parent class's registry, or `None` for root classes
    /// * `declare` - Closure declaring the class's properties on the builder
    ///
    /// # Errors
    /// * [`Error::SlotOutOfRange`] - A declared slot is negative or exceeds `i16::MAX`
    /// * [`Error::DuplicatePropertyName`] - Two declarations share a name
    /// * [`Error::DuplicatePropertySlot`] - Two declarations share a slot
    ///
    /// Registration failures are programmer errors; they are reported at
    /// class-initialization time and callers may legitimately abort on them.
    pub fn build(
        class_name: &str,
        parent: Option<SchemaRegistryRc>,
        declare: impl FnOnce(&mut SchemaBuilder),
    ) -> Result<SchemaRegistryRc> {
        let mut builder = SchemaBuilder::new();
        declare(&mut builder);

        let mut core = SchemaCore {
            sequence: Vec::with_capacity(builder.decls.len()),
            by_name: HashMap::with_capacity(builder.decls.len()),
            by_slot: HashMap::with_capacity(builder.decls.len()),
        };

        for decl in builder.decls {
            let slot = SlotIndex::new(decl.slot).map_err(|_| Error::SlotOutOfRange {
                name: decl.name.clone(),
                slot: decl.slot,
            })?;

            if core.by_name.contains_key(&decl.name) {
                return Err(Error::DuplicatePropertyName {
                    class: class_name.to_string(),
                    name: decl.name,
                });
            }
            if core.by_slot.contains_key(&slot) {
                return Err(Error::DuplicatePropertySlot {
                    class: class_name.to_string(),
                    name: decl.name,
                    slot: slot.value(),
                });
            }

            core.insert(
                Arc::new(PropertySpec {
                    name: decl.name,
                    group: decl.group,
                    doc: decl.doc,
                    slot,
                    kind: decl.kind,
                    flags: decl.flags,
                }),
                false,
            );
        }

        debug!(
            class = class_name,
            properties = core.sequence.len(),
            "schema registry built"
        );

        Ok(Arc::new(SchemaRegistry {
            class_name: class_name.to_string(),
            parent,
            parent_merged: AtomicBool::new(false),
            core: RwLock::new(core),
        }))
    }

    /// Returns the name of the class this registry describes.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the parent class's registry, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&SchemaRegistryRc> {
        self.parent.as_ref()
    }

    /// Returns true once the ancestor chain has been merged into this registry.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.parent_merged.load(Ordering::Acquire)
    }

    /// Merges the whole ancestor chain into this registry's indices.
    ///
    /// Every ancestor spec is inserted unless its name or slot is already present:
    /// local declarations shadow ancestors, and nearer ancestors shadow farther ones.
    /// The effective sequence becomes ancestor-first (root-most block first, local
    /// declarations last). The operation is idempotent; repeated calls are no-ops.
    ///
    /// All lookup and enumeration methods merge lazily on first use, so calling this
    /// explicitly is only needed to control *when* the composition happens.
    pub fn merge(&self) {
        if self.parent_merged.load(Ordering::Acquire) {
            return;
        }

        let mut core = write_lock!(self.core);
        if self.parent_merged.load(Ordering::Acquire) {
            return;
        }

        let mut seen_names: HashSet<String> =
            core.by_name.keys().cloned().collect();
        let mut seen_slots: HashSet<SlotIndex> =
            core.by_slot.keys().copied().collect();

        // Walk nearest-first so closer ancestors win collisions among themselves.
        let mut blocks: Vec<Vec<PropertySpecRc>> = Vec::new();
        let mut ancestor = self.parent.clone();
        while let Some(current) = ancestor {
            let mut block = Vec::new();
            for spec in current.local_specs() {
                if seen_names.contains(&spec.name) || seen_slots.contains(&spec.slot) {
                    continue;
                }
                seen_names.insert(spec.name.clone());
                seen_slots.insert(spec.slot);
                block.push(spec);
            }
            blocks.push(block);
            ancestor = current.parent.clone();
        }

        // Materialize root-first: farthest ancestor's block leads the sequence.
        let mut merged: Vec<SchemaEntry> = Vec::new();
        for block in blocks.into_iter().rev() {
            for spec in block {
                core.by_name.insert(spec.name.clone(), spec.clone());
                core.by_slot.insert(spec.slot, spec.clone());
                merged.push(SchemaEntry {
                    spec,
                    inherited: true,
                });
            }
        }
        let inherited = merged.len();
        merged.append(&mut core.sequence);
        core.sequence = merged;

        self.parent_merged.store(true, Ordering::Release);
        debug!(
            class = self.class_name.as_str(),
            inherited, "schema registry merged ancestor chain"
        );
    }

    /// Removes every entry that originated from [`SchemaRegistry::merge`].
    ///
    /// This is the exact inverse of merge: afterwards the sequence, name index and slot
    /// index are bit-for-bit identical to the pre-merge, local-only state. No-op if the
    /// registry is not currently merged.
    pub fn split(&self) {
        if !self.parent_merged.load(Ordering::Acquire) {
            return;
        }

        let mut guard = write_lock!(self.core);
        if !self.parent_merged.load(Ordering::Acquire) {
            return;
        }

        let core = &mut *guard;
        let mut local = Vec::with_capacity(core.sequence.len());
        let mut removed = 0usize;
        for entry in core.sequence.drain(..) {
            if entry.inherited {
                core.by_name.remove(&entry.spec.name);
                core.by_slot.remove(&entry.spec.slot);
                removed += 1;
            } else {
                local.push(entry);
            }
        }
        core.sequence = local;

        self.parent_merged.store(false, Ordering::Release);
        debug!(
            class = self.class_name.as_str(),
            removed, "schema registry split from ancestor chain"
        );
    }

    fn ensure_merged(&self) {
        if !self.parent_merged.load(Ordering::Acquire) {
            self.merge();
        }
    }

    /// Finds a property spec by name, covering the whole ancestor chain.
    ///
    /// O(1) average. Returns `None` if no property of that name is declared.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<PropertySpecRc> {
        self.ensure_merged();
        read_lock!(self.core).by_name.get(name).cloned()
    }

    /// Finds a property spec by slot, covering the whole ancestor chain.
    ///
    /// O(1) average. Returns `None` if no property occupies that slot.
    #[must_use]
    pub fn find_property_by_slot(&self, slot: SlotIndex) -> Option<PropertySpecRc> {
        self.ensure_merged();
        read_lock!(self.core).by_slot.get(&slot).cloned()
    }

    /// Returns the declared kind of the named property.
    #[must_use]
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.find_property(name).map(|spec| spec.kind)
    }

    /// Returns the declared type flags of the named property.
    #[must_use]
    pub fn property_flags(&self, name: &str) -> Option<PropertyType> {
        self.find_property(name).map(|spec| spec.flags)
    }

    /// Returns the editor group of the named property.
    #[must_use]
    pub fn property_group(&self, name: &str) -> Option<String> {
        self.find_property(name).map(|spec| spec.group.clone())
    }

    /// Returns the documentation string of the named property.
    #[must_use]
    pub fn property_documentation(&self, name: &str) -> Option<String> {
        self.find_property(name).map(|spec| spec.doc.clone())
    }

    /// Returns the effective spec sequence (ancestors merged, declaration order).
    #[must_use]
    pub fn specs(&self) -> Vec<PropertySpecRc> {
        self.ensure_merged();
        read_lock!(self.core)
            .sequence
            .iter()
            .map(|entry| entry.spec.clone())
            .collect()
    }

    /// Returns only this class's own declarations, in declaration order.
    ///
    /// Unlike [`SchemaRegistry::specs`] this never triggers a merge and never
    /// includes ancestor entries.
    #[must_use]
    pub fn local_specs(&self) -> Vec<PropertySpecRc> {
        read_lock!(self.core)
            .sequence
            .iter()
            .filter(|entry| !entry.inherited)
            .map(|entry| entry.spec.clone())
            .collect()
    }

    /// Number of effective properties (ancestors included).
    #[must_use]
    pub fn spec_count(&self) -> usize {
        self.ensure_merged();
        read_lock!(self.core).sequence.len()
    }

    /// Number of properties declared by this class itself.
    #[must_use]
    pub fn local_count(&self) -> usize {
        read_lock!(self.core)
            .sequence
            .iter()
            .filter(|entry| !entry.inherited)
            .count()
    }

    /// Produces the live static properties of `slots` in registry sequence order.
    ///
    /// The registry stores slots, not live references; each entry is re-derived from
    /// the queried instance's [`SlotTable`], which is why the same registry can serve
    /// every instance of the class.
    #[must_use]
    pub fn property_list(&self, slots: &SlotTable) -> PropertyList {
        self.specs()
            .iter()
            .filter_map(|spec| slots.property_at(spec.slot).cloned())
            .collect()
    }

    /// Produces the `(name, live property)` map for `slots`, sorted by name.
    #[must_use]
    pub fn property_map(&self, slots: &SlotTable) -> PropertyMap {
        self.specs()
            .iter()
            .filter_map(|spec| {
                slots
                    .property_at(spec.slot)
                    .map(|prop| (spec.name.clone(), prop.clone()))
            })
            .collect()
    }

    /// Produces `(name, live property)` pairs for `slots` in registry sequence order.
    #[must_use]
    pub fn property_named_list(&self, slots: &SlotTable) -> PropertyNamedList {
        self.specs()
            .iter()
            .filter_map(|spec| {
                slots
                    .property_at(spec.slot)
                    .map(|prop| (spec.name.clone(), prop.clone()))
            })
            .collect()
    }

    /// Calls `visitor` once per static property of `slots`.
    ///
    /// The visiting order is unspecified. What gets visited is undefined if the
    /// property set is mutated during this call.
    pub fn visit_properties(&self, slots: &SlotTable, visitor: &mut dyn FnMut(&PropertyRc)) {
        for prop in self.property_list(slots) {
            visitor(&prop);
        }
    }
}
