//! Live properties and their containers.
//!
//! This module implements the runtime half of the property system: the typed,
//! status-carrying value slots ([`Property`]), the per-instance stores they live in,
//! and the [`PropertyContainer`] trait exposing the unified introspection API.
//!
//! # Key Components
//!
//! - [`PropertyKind`] / [`PropertyValue`] - The closed kind set and its payloads
//! - [`Property`] / [`PropertyStatus`] - A live value slot with runtime status bits
//! - [`SlotTable`] - Per-instance table of static properties, materialized from the
//!   class schema
//! - [`DynamicPropertyStore`] - Per-instance store of runtime-attached properties
//! - [`PropertyContainer`] - The object-facing API unifying both

use std::collections::BTreeMap;

mod container;
mod dynamic;
mod kind;
mod property;
mod value;

pub use container::{PropertyContainer, SlotTable};
pub use dynamic::{DynamicPropData, DynamicPropertyStore};
pub use kind::PropertyKind;
pub use property::{Property, PropertyRc, PropertyStatus};
pub use value::{PropertyValue, Vector3};

/// A map that holds the mapping of property name to live `Property`
pub type PropertyMap = BTreeMap<String, PropertyRc>;
/// A vector that holds a list of `Property`
pub type PropertyList = Vec<PropertyRc>;
/// A vector of `(name, Property)` pairs; may contain repeats and aliases
pub type PropertyNamedList = Vec<(String, PropertyRc)>;
