//! Class schema definitions and registries.
//!
//! This module implements the static half of the property system: the immutable
//! per-class description of which properties a container class declares, and the
//! process-wide table those descriptions are registered into.
//!
//! # Key Components
//!
//! - [`SlotIndex`] - Validated 16-bit logical slot identifier of a static property
//! - [`PropertySpec`] / [`PropertyType`] - Immutable property descriptor and its
//!   declared type flags
//! - [`SchemaRegistry`] - Per-class multi-index spec table with inheritance-aware
//!   merge/split
//! - [`ClassRegistry`] - Process-wide class table realizing the one-time
//!   class-initialization contract
//!
//! # Design
//!
//! Schemas describe classes, not instances. A spec records a slot, never a live
//! reference, so a single registry serves every instance of its class; the live
//! property behind a spec is re-derived per instance through the container's
//! slot table.

mod classes;
mod registry;
mod slot;
mod spec;

pub use classes::{ClassEntry, ClassEntryRc, ClassRegistry};
pub use registry::{PropertyDecl, SchemaBuilder, SchemaRegistry, SchemaRegistryRc};
pub use slot::SlotIndex;
pub use spec::{PropertySpec, PropertySpecRc, PropertyType};
