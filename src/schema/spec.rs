use std::sync::Arc;

use bitflags::bitflags;

use crate::{properties::PropertyKind, schema::SlotIndex};

/// A reference to a `PropertySpec`
pub type PropertySpecRc = Arc<PropertySpec>;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    /// Declared type flags of a static property.
    ///
    /// These are the compile-time defaults recorded in the class schema.
    /// Runtime behavior can additionally be adjusted per instance through
    /// [`crate::PropertyStatus`] bits, which overlay these flags.
    pub struct PropertyType: u16 {
        /// Property is read-only in the editor
        const READ_ONLY = 0x0001;
        /// Property content won't be saved to file, but still saves name, type and status
        const TRANSIENT = 0x0002;
        /// Property won't appear in the editor
        const HIDDEN = 0x0004;
        /// Modified property doesn't touch its parent container
        const OUTPUT = 0x0008;
        /// Modified property doesn't touch its container for recompute
        const NO_RECOMPUTE = 0x0010;
        /// Property won't be saved to file at all
        const NO_PERSIST = 0x0020;
    }
}

/// Immutable descriptor of one statically declared property.
///
/// One `PropertySpec` is created per declaration when a class builds its
/// [`crate::SchemaRegistry`], and is never mutated afterwards. The spec records
/// everything needed to materialize and describe the live property on any
/// instance of the class: the value kind to construct, the slot the instance
/// stores it under, and the editor-facing metadata.
#[derive(Clone, PartialEq, Debug)]
pub struct PropertySpec {
    /// The property name, unique within the registry (including merged ancestors)
    pub name: String,
    /// The editor group this property is presented under
    pub group: String,
    /// Documentation string for tooltips and generated docs
    pub doc: String,
    /// The slot the property occupies on every instance of the class
    pub slot: SlotIndex,
    /// The kind of value the property holds
    pub kind: PropertyKind,
    /// Declared type flags
    pub flags: PropertyType,
}

impl PropertySpec {
    /// Creates a new spec with empty group and documentation and no flags.
    #[must_use]
    pub fn new(name: &str, slot: SlotIndex, kind: PropertyKind) -> Self {
        PropertySpec {
            name: name.to_string(),
            group: String::new(),
            doc: String::new(),
            slot,
            kind,
            flags: PropertyType::empty(),
        }
    }

    /// Returns the persistence type name of this spec's kind, e.g. `PropertyFloat`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}
