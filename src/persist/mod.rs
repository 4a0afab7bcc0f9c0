//! Structured persistence of property streams.
//!
//! This module implements the save/restore contract of the property system: a
//! container's properties are emitted as one XML `<Properties>` element holding one
//! `<Property>` element per persisted property, registry order first, then dynamic
//! insertion order.
//!
//! # Key Components
//!
//! - [`DocumentWriter`] - Streams [`SavedProperty`] records out as XML
//! - [`DocumentReader`] - Parses a property stream back into [`SavedProperty`] records
//! - [`SavedProperty`] / [`DynamicMeta`] - The exchange records, also handed to the
//!   schema-migration hooks on [`crate::PropertyContainer`]
//!
//! # Format
//!
//! ```xml
//! <Properties Count="3">
//!   <Property name="Length" type="PropertyFloat" status="0">
//!     <Float value="4.5"/>
//!   </Property>
//!   <Property name="Note" type="PropertyString" status="0"
//!             dynamic="1" group="User" doc="annotation" attr="0">
//!     <String value="hello"/>
//!   </Property>
//!   <Property name="Cache" type="PropertyInteger" status="16"/>
//! </Properties>
//! ```
//!
//! A `<Property>` element without a value child is a transient property: its name,
//! type and status round-trip while the value stays at the kind's default. Properties
//! flagged no-persist never appear in the stream at all. Dynamic properties carry the
//! metadata needed to recreate them on a fresh container.

mod reader;
mod writer;

pub use reader::DocumentReader;
pub use writer::DocumentWriter;

use crate::{
    properties::{PropertyStatus, PropertyValue},
    schema::PropertyType,
};

/// Creation metadata of a persisted dynamic property.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DynamicMeta {
    /// The editor group
    pub group: String,
    /// Documentation string
    pub doc: String,
    /// Declared attribute flags
    pub attrs: PropertyType,
}

/// One persisted property as read from or written to a stream.
///
/// This record is also what the migration hooks receive when a saved property no
/// longer matches the live schema, so custom containers can salvage renamed or
/// retyped values during restore.
#[derive(Clone, PartialEq, Debug)]
pub struct SavedProperty {
    /// The property name
    pub name: String,
    /// The persisted type name, e.g. `PropertyFloat`
    pub type_name: String,
    /// Persisted status bits
    pub status: PropertyStatus,
    /// Dynamic-property metadata; `None` for static properties
    pub dynamic: Option<DynamicMeta>,
    /// The persisted value; `None` for transient properties
    pub value: Option<PropertyValue>,
}
