// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # propscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/propscope.svg)](https://crates.io/crates/propscope)
//! [![Documentation](https://docs.rs/propscope/badge.svg)](https://docs.rs/propscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/propscope/blob/main/LICENSE-APACHE)
//!
//! A property introspection and schema registry framework for CAD-style document object
//! models. Built in pure Rust, `propscope` lets any class expose named, typed, ordered,
//! live attributes without runtime string-keyed dictionaries polluting every object,
//! while supporting class-hierarchy-aware metadata merging, slot-based lookup, dynamic
//! runtime-attached properties and versioned save/restore.
//!
//! ## Features
//!
//! - **📋 Per-class schemas** - One shared, multi-index registry per class; zero
//!   per-instance metadata overhead
//! - **🧬 Inheritance-aware** - Lazy, idempotent merge of the whole ancestor chain,
//!   with local declarations shadowing ancestors
//! - **🔍 Fast lookup** - O(1) average access by name or slot, plus declaration-order
//!   enumeration for stable UI and serialization ordering
//! - **🧩 Dynamic properties** - Attach and detach typed properties on single
//!   instances at runtime, looked up by name
//! - **🚦 Status bits** - Per-instance runtime flags overlaying the declared
//!   compile-time type flags
//! - **💾 Versioned persistence** - XML property streams with migration hooks for
//!   renamed or retyped properties
//!
//! ## Quick Start
//!
//! Add `propscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! propscope = "0.2"
//! ```
//!
//! ### Declaring a class schema
//!
//! ```rust
//! use propscope::{PropertyKind, SchemaRegistry};
//!
//! let shape = SchemaRegistry::build("Shape", None, |b| {
//!     b.property("Length", 8, PropertyKind::Float)
//!         .group("Shape")
//!         .doc("Overall length");
//!     b.property("Width", 12, PropertyKind::Float).group("Shape");
//! })?;
//!
//! let solid = SchemaRegistry::build("Solid", Some(shape), |b| {
//!     b.property("Height", 16, PropertyKind::Float).group("Solid");
//! })?;
//!
//! // Lookups cover the whole ancestor chain.
//! let spec = solid.find_property("Length").unwrap();
//! assert_eq!(spec.group, "Shape");
//! # Ok::<(), propscope::Error>(())
//! ```
//!
//! ### Containers
//!
//! Document-model objects implement [`PropertyContainer`] by handing out their class
//! schema, their per-instance [`SlotTable`] and their [`DynamicPropertyStore`];
//! lookup, enumeration, status flags, change notification and save/restore come as
//! provided methods. See the trait documentation for a complete example.
//!
//! ## Architecture
//!
//! `propscope` is organized into three modules:
//!
//! - [`schema`] - Per-class property schemas: [`SchemaRegistry`], [`ClassRegistry`],
//!   [`PropertySpec`], [`SlotIndex`]
//! - [`properties`] - Live properties and containers: [`Property`],
//!   [`PropertyContainer`], [`DynamicPropertyStore`], [`SlotTable`]
//! - [`persist`] - Structured save/restore: [`persist::DocumentWriter`],
//!   [`persist::DocumentReader`], [`persist::SavedProperty`]
//!
//! ### Identity Model
//!
//! Static properties are identified by validated 16-bit slots, not by memory layout:
//! the class registry records one [`SlotIndex`] per declaration, and each instance
//! materializes a [`SlotTable`] mapping those slots to its own live properties. One
//! registry therefore serves every instance of its class, and converting a live
//! property back to its registry entry only resolves against the instance that
//! actually owns it.
//!
//! ## Concurrency Model
//!
//! The property system follows a single-threaded, cooperative model: registration,
//! merge/split, dynamic attachment and save/restore belong on one logical document
//! thread. The internal structures (lock-free maps, read-write locks, atomics) make
//! concurrent *reads* safe as long as no thread is concurrently mutating; callers
//! needing full multi-threaded access impose their own exclusion.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with comprehensive error
//! information:
//!
//! ```rust
//! use propscope::{Error, PropertyKind, SchemaRegistry};
//!
//! match SchemaRegistry::build("Part", None, |b| {
//!     b.property("Far", 40000, PropertyKind::Float);
//! }) {
//!     Err(Error::SlotOutOfRange { name, slot }) => {
//!         eprintln!("'{}' declared outside the slot range: {}", name, slot);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! Absence is routine, not exceptional: plain lookups return `Option`, and restore
//! routes schema mismatches through migration hooks instead of failing the whole
//! document.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the propscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use propscope::prelude::*;
///
/// let schema = SchemaRegistry::build("Shape", None, |b| {
///     b.property("Length", 8, PropertyKind::Float);
/// })?;
/// assert_eq!(schema.spec_count(), 1);
/// # Ok::<(), propscope::Error>(())
/// ```
pub mod prelude;

/// Structured persistence of property streams.
///
/// Property documents are XML: one `<Properties>` element holding one `<Property>`
/// element per persisted property, in registry order followed by dynamic insertion
/// order. The [`persist::DocumentWriter`] / [`persist::DocumentReader`] pair streams
/// [`persist::SavedProperty`] records, which are also what the migration hooks on
/// [`PropertyContainer`] receive when a saved property no longer matches the live
/// schema.
pub mod persist;

/// Live properties and their containers.
///
/// This module implements the runtime half of the property system:
///
/// - [`Property`] - A typed, status-carrying live value slot, shared as
///   [`PropertyRc`]
/// - [`PropertyKind`] / [`PropertyValue`] - The closed kind set and its payloads
/// - [`SlotTable`] - Per-instance table materializing the class schema
/// - [`DynamicPropertyStore`] - Per-instance store of runtime-attached properties
/// - [`PropertyContainer`] - The trait unifying static and dynamic access behind
///   one name-based API
pub mod properties;

/// Class schema definitions and registries.
///
/// This module implements the static half of the property system:
///
/// - [`PropertySpec`] - Immutable descriptor of one declared property
/// - [`SlotIndex`] - Validated 16-bit logical slot identifier
/// - [`SchemaRegistry`] - Per-class multi-index spec table with inheritance-aware
///   merge/split
/// - [`ClassRegistry`] - Process-wide class table realizing the one-time
///   class-initialization contract
pub mod schema;

/// `propscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `propscope` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for schema registration, property access and persistence.
pub use error::Error;

/// The core container surface: live properties and the trait exposing them.
///
/// - [`PropertyContainer`] is implemented by every document-model object
/// - [`Property`] values are shared as [`PropertyRc`]; identity is `Arc::ptr_eq`
/// - [`PropertyStatus`] bits overlay the declared [`PropertyType`] flags
pub use properties::{
    DynamicPropData, DynamicPropertyStore, Property, PropertyContainer, PropertyKind,
    PropertyList, PropertyMap, PropertyNamedList, PropertyRc, PropertyStatus, PropertyValue,
    SlotTable, Vector3,
};

/// The schema surface: per-class property metadata and the class table.
pub use schema::{
    ClassEntry, ClassEntryRc, ClassRegistry, PropertySpec, PropertySpecRc, PropertyType,
    SchemaBuilder, SchemaRegistry, SchemaRegistryRc, SlotIndex,
};
