//! Convenient re-exports of the most commonly used types and traits.
//!
//! Importing the prelude brings the whole day-to-day surface of the property system
//! into scope: the container trait, the live property types, the schema registries
//! and the persistence pair.
//!
//! # Example
//!
//! ```rust
//! use propscope::prelude::*;
//!
//! let schema = SchemaRegistry::build("Shape", None, |b| {
//!     b.property("Length", 8, PropertyKind::Float).group("Shape");
//! })?;
//!
//! let slots = SlotTable::instantiate(&schema);
//! assert_eq!(slots.len(), 1);
//! # Ok::<(), propscope::Error>(())
//! ```

pub use crate::{
    persist::{DocumentReader, DocumentWriter, DynamicMeta, SavedProperty},
    properties::{
        DynamicPropData, DynamicPropertyStore, Property, PropertyContainer, PropertyKind,
        PropertyList, PropertyMap, PropertyNamedList, PropertyRc, PropertyStatus, PropertyValue,
        SlotTable, Vector3,
    },
    schema::{
        ClassEntry, ClassEntryRc, ClassRegistry, PropertySpec, PropertySpecRc, PropertyType,
        SchemaBuilder, SchemaRegistry, SchemaRegistryRc, SlotIndex,
    },
    Error, Result,
};
