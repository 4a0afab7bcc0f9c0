//! Property containers: the unified static + dynamic property API.
//!
//! This module provides the per-instance [`SlotTable`] materializing a class schema
//! into live properties, and the [`PropertyContainer`] trait every document-model
//! object implements to expose the introspection surface: name-based lookup, bulk
//! enumeration, status flags, dynamic attachment and save/restore.
//!
//! # Lookup Model
//!
//! A container resolves a name against its class's [`SchemaRegistry`] first and its
//! [`DynamicPropertyStore`] second. Static lookups go spec → slot → live property
//! through the instance's slot table; the registry itself never holds live
//! references, which is what lets one registry serve every instance of the class.
//!
//! # Change Notification
//!
//! Every user-facing mutation runs the three-phase contract, in order:
//! [`PropertyContainer::on_early_change`] → [`PropertyContainer::on_before_change`] →
//! value swap → [`PropertyContainer::on_changed`], so implementors can log, cache or
//! react before and after the change. `on_changed` must not re-enter a mutation of
//! the same property.
//!
//! # Lifecycle
//!
//! Constructed → Populated (static slots materialized, dynamics attached) →
//! [Saving|Restoring] → Dropped. Save and restore are synchronous; cancelling one
//! means erroring out of the whole operation.

use std::collections::HashMap;

use tracing::warn;

use crate::{
    persist::{DocumentReader, DocumentWriter, DynamicMeta, SavedProperty},
    properties::{
        DynamicPropData, DynamicPropertyStore, Property, PropertyKind, PropertyList, PropertyMap,
        PropertyNamedList, PropertyRc, PropertyStatus, PropertyValue,
    },
    schema::{PropertyType, SchemaRegistry, SchemaRegistryRc, SlotIndex},
    Error, Result,
};

/// Per-instance table of live static properties, keyed by slot.
///
/// A `SlotTable` is materialized once from the owning class's (merged) schema: one
/// [`Property`] per effective spec, constructed at the declared kind's default value
/// and carrying the declared flags. The table is the instance-side half of the
/// slot-based identity model: the registry knows slots, the table knows which live
/// property this instance stores under each slot.
pub struct SlotTable {
    /// Live properties in effective schema order
    slots: Vec<(SlotIndex, PropertyRc)>,
    /// Index on slot for O(1) resolution
    index: HashMap<SlotIndex, usize>,
}

impl SlotTable {
    /// Materializes the table for one new instance of `schema`'s class.
    ///
    /// Triggers the schema's lazy ancestor merge, so the table covers inherited
    /// properties as well.
    #[must_use]
    pub fn instantiate(schema: &SchemaRegistry) -> Self {
        let specs = schema.specs();
        let mut slots = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            index.insert(spec.slot, slots.len());
            slots.push((spec.slot, PropertyRc::new(Property::from_spec(&spec))));
        }
        SlotTable { slots, index }
    }

    /// Returns the live property this instance stores under `slot`.
    #[must_use]
    pub fn property_at(&self, slot: SlotIndex) -> Option<&PropertyRc> {
        self.index
            .get(&slot)
            .map(|&position| &self.slots[position].1)
    }

    /// Returns the slot a live property is stored under.
    ///
    /// Identity is reference identity: only properties owned by *this* table
    /// resolve; a property of another instance yields `None`, mirroring the
    /// out-of-range check of address-based offset computation.
    #[must_use]
    pub fn slot_of(&self, property: &Property) -> Option<SlotIndex> {
        self.slots
            .iter()
            .find(|(_, candidate)| std::ptr::eq(PropertyRc::as_ptr(candidate), property))
            .map(|(slot, _)| *slot)
    }

    /// Number of static properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the class declares no static properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates `(slot, live property)` pairs in effective schema order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &PropertyRc)> {
        self.slots.iter().map(|(slot, prop)| (*slot, prop))
    }
}

/// Base trait of all document-model objects with properties.
///
/// Implementors provide access to their class schema, their slot table and their
/// dynamic store; everything else (lookup, enumeration, status flags, the
/// three-phase change notification, dynamic attachment and persistence) is
/// provided. The trait is object-safe, so heterogeneous document objects can be
/// handled through `&dyn PropertyContainer`.
///
/// # Examples
///
/// ```rust
/// use std::sync::OnceLock;
/// use propscope::{
///     DynamicPropertyStore, PropertyContainer, PropertyKind, PropertyValue,
///     SchemaRegistry, SchemaRegistryRc, SlotTable,
/// };
///
/// struct ShapeFeature {
///     slots: SlotTable,
///     dynamics: DynamicPropertyStore,
/// }
///
/// impl ShapeFeature {
///     fn class_schema() -> &'static SchemaRegistryRc {
///         static SCHEMA: OnceLock<SchemaRegistryRc> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             SchemaRegistry::build("ShapeFeature", None, |b| {
///                 b.property("Length", 8, PropertyKind::Float).group("Shape");
///             })
///             .expect("ShapeFeature schema is statically valid")
///         })
///     }
///
///     fn new() -> Self {
///         ShapeFeature {
///             slots: SlotTable::instantiate(Self::class_schema()),
///             dynamics: DynamicPropertyStore::new(),
///         }
///     }
/// }
///
/// impl PropertyContainer for ShapeFeature {
///     fn schema(&self) -> &SchemaRegistryRc {
///         Self::class_schema()
///     }
///     fn slot_table(&self) -> &SlotTable {
///         &self.slots
///     }
///     fn dynamic_store(&self) -> &DynamicPropertyStore {
///         &self.dynamics
///     }
/// }
///
/// let shape = ShapeFeature::new();
/// shape.set_property_value("Length", PropertyValue::Float(4.5))?;
/// let prop = shape.get_property_by_name("Length").unwrap();
/// assert_eq!(prop.value(), PropertyValue::Float(4.5));
/// # Ok::<(), propscope::Error>(())
/// ```
pub trait PropertyContainer {
    /// The shared schema of this object's class.
    fn schema(&self) -> &SchemaRegistryRc;

    /// This instance's static slot table.
    fn slot_table(&self) -> &SlotTable;

    /// This instance's dynamic property store.
    fn dynamic_store(&self) -> &DynamicPropertyStore;

    /// A human-readable name of this object for diagnostics. Empty by default.
    fn full_name(&self) -> String {
        String::new()
    }

    /// Called first on every property mutation, before `on_before_change`.
    fn on_early_change(&self, _prop: &PropertyRc) {}

    /// Called immediately before a property's value changes.
    fn on_before_change(&self, _prop: &PropertyRc) {}

    /// Called after a property's value changed.
    ///
    /// Must not re-enter a mutation of the same property; doing so is a
    /// precondition violation with undefined results.
    fn on_changed(&self, _prop: &PropertyRc) {}

    /// Called whenever [`PropertyContainer::set_property_status`] changed a
    /// property's status bits, with the status before the change.
    fn on_property_status_changed(&self, _prop: &PropertyRc, _old: PropertyStatus) {}

    /// Called at the start of [`PropertyContainer::save`].
    fn before_save(&self) {}

    /// Version-migration hook: a saved property's name no longer exists.
    ///
    /// The default drops the saved value with a warning; the rest of the
    /// container still restores.
    fn handle_changed_property_name(&self, saved: &SavedProperty) {
        warn!(
            container = %self.full_name(),
            property = saved.name.as_str(),
            saved_type = saved.type_name.as_str(),
            "dropping saved property with no matching declaration"
        );
    }

    /// Version-migration hook: a saved property's type no longer matches.
    ///
    /// The default drops the saved value with a warning; the rest of the
    /// container still restores.
    fn handle_changed_property_type(&self, saved: &SavedProperty, prop: &PropertyRc) {
        warn!(
            container = %self.full_name(),
            property = saved.name.as_str(),
            saved_type = saved.type_name.as_str(),
            live_type = prop.type_name(),
            "dropping saved property value of changed type"
        );
    }

    /// Finds a property by name: class schema first, dynamic store second.
    fn get_property_by_name(&self, name: &str) -> Option<PropertyRc> {
        if let Some(spec) = self.schema().find_property(name) {
            if let Some(prop) = self.slot_table().property_at(spec.slot) {
                return Some(prop.clone());
            }
        }
        self.dynamic_store().get(name)
    }

    /// Returns the name of a live property owned by this container.
    fn property_name_of(&self, prop: &Property) -> Option<String> {
        if let Some(slot) = self.slot_table().slot_of(prop) {
            return self
                .schema()
                .find_property_by_slot(slot)
                .map(|spec| spec.name.clone());
        }
        self.dynamic_store().name_of(prop)
    }

    /// All properties: statics in registry order, then dynamics in insertion order.
    fn get_property_list(&self) -> PropertyList {
        let mut list = self.schema().property_list(self.slot_table());
        for data in self.dynamic_store().snapshot() {
            list.push(data.property);
        }
        list
    }

    /// All properties keyed by name.
    fn get_property_map(&self) -> PropertyMap {
        let mut map = self.schema().property_map(self.slot_table());
        for data in self.dynamic_store().snapshot() {
            map.insert(data.name, data.property);
        }
        map
    }

    /// All `(name, property)` pairs; may contain repeats and aliases, callers
    /// must tolerate duplicates.
    fn get_property_named_list(&self) -> PropertyNamedList {
        let mut list = self.schema().property_named_list(self.slot_table());
        for data in self.dynamic_store().snapshot() {
            list.push((data.name, data.property));
        }
        list
    }

    /// Calls `visitor` once per property, static and dynamic.
    ///
    /// The visiting order is unspecified. What gets visited is undefined if the
    /// property set is mutated during this call.
    fn visit_properties(&self, visitor: &mut dyn FnMut(&PropertyRc)) {
        for prop in self.get_property_list() {
            visitor(&prop);
        }
    }

    /// Sets or clears status bits on every property at once.
    ///
    /// Fires [`PropertyContainer::on_property_status_changed`] for every property
    /// whose status actually changed.
    fn set_property_status(&self, bits: PropertyStatus, on: bool) {
        for prop in self.get_property_list() {
            let old = prop.set_status(bits, on);
            if old != prop.status() {
                self.on_property_status_changed(&prop, old);
            }
        }
    }

    /// Returns the declared type flags of the named property.
    ///
    /// For dynamic properties these are the attribute flags recorded at creation.
    fn property_type(&self, name: &str) -> Option<PropertyType> {
        if let Some(spec) = self.schema().find_property(name) {
            return Some(spec.flags);
        }
        self.dynamic_store().data(name).map(|data| data.attrs)
    }

    /// Returns the editor group of the named property.
    fn property_group(&self, name: &str) -> Option<String> {
        if let Some(spec) = self.schema().find_property(name) {
            return Some(spec.group.clone());
        }
        self.dynamic_store().data(name).map(|data| data.group)
    }

    /// Returns the documentation string of the named property.
    fn property_documentation(&self, name: &str) -> Option<String> {
        if let Some(spec) = self.schema().find_property(name) {
            return Some(spec.doc.clone());
        }
        self.dynamic_store().data(name).map(|data| data.doc)
    }

    /// Returns true if the named property exists and is read-only.
    ///
    /// The result is the OR of the declared type flag and the runtime status bit.
    fn is_read_only(&self, name: &str) -> bool {
        self.get_property_by_name(name)
            .is_some_and(|prop| prop.is_read_only())
    }

    /// Returns true if the named property exists and is hidden.
    fn is_hidden(&self, name: &str) -> bool {
        self.get_property_by_name(name)
            .is_some_and(|prop| prop.is_hidden())
    }

    /// Assigns a property value through the three-phase change notification.
    ///
    /// Runs [`PropertyContainer::on_early_change`], then
    /// [`PropertyContainer::on_before_change`], then the kind-checked value swap,
    /// then [`PropertyContainer::on_changed`].
    ///
    /// # Errors
    /// * [`Error::PropertyNotFound`] - No property of that name exists
    /// * [`Error::TypeMismatch`] - The value's kind differs from the property's
    fn set_property_value(&self, name: &str, value: PropertyValue) -> Result<()> {
        let prop = self
            .get_property_by_name(name)
            .ok_or_else(|| Error::PropertyNotFound(name.to_string()))?;

        self.on_early_change(&prop);
        self.on_before_change(&prop);
        prop.set_value(value)?;
        self.on_changed(&prop);
        Ok(())
    }

    /// Attaches a dynamic property to this instance.
    ///
    /// # Arguments
    /// * `type_name` - Persistence type name of the kind, e.g. `PropertyString`
    /// * `name` - The property name; a unique one is generated when `None`
    /// * `group` - The editor group
    /// * `doc` - Documentation string
    /// * `attrs` - Declared attribute flags for the new property
    /// * `read_only` - Convenience for including [`PropertyType::READ_ONLY`]
    /// * `hidden` - Convenience for including [`PropertyType::HIDDEN`]
    ///
    /// # Errors
    /// * [`Error::UnknownPropertyType`] - `type_name` names no known kind
    /// * [`Error::DuplicatePropertyName`] - `name` collides with a static or
    ///   dynamic property of this container
    fn add_dynamic_property(
        &self,
        type_name: &str,
        name: Option<&str>,
        group: Option<&str>,
        doc: Option<&str>,
        attrs: PropertyType,
        read_only: bool,
        hidden: bool,
    ) -> Result<PropertyRc> {
        let kind = PropertyKind::from_type_name(type_name)
            .ok_or_else(|| Error::UnknownPropertyType(type_name.to_string()))?;

        if let Some(given) = name {
            if self.schema().find_property(given).is_some() {
                return Err(Error::DuplicatePropertyName {
                    class: self.schema().class_name().to_string(),
                    name: given.to_string(),
                });
            }
        }

        let mut attrs = attrs;
        if read_only {
            attrs |= PropertyType::READ_ONLY;
        }
        if hidden {
            attrs |= PropertyType::HIDDEN;
        }

        self.dynamic_store().add(
            self.schema().class_name(),
            kind,
            name,
            group.unwrap_or(""),
            doc.unwrap_or(""),
            attrs,
        )
    }

    /// Detaches and drops the named dynamic property.
    ///
    /// Returns false if the name is not found or the property is locked.
    fn remove_dynamic_property(&self, name: &str) -> bool {
        self.dynamic_store().remove(name)
    }

    /// All dynamic property names in insertion order.
    fn get_dynamic_property_names(&self) -> Vec<String> {
        self.dynamic_store().names()
    }

    /// Looks up a dynamic property by name.
    fn get_dynamic_property_by_name(&self, name: &str) -> Option<PropertyRc> {
        self.dynamic_store().get(name)
    }

    /// Updates group and documentation of the named dynamic property.
    fn change_dynamic_property(&self, name: &str, group: &str, doc: &str) -> bool {
        self.dynamic_store().change(name, group, doc)
    }

    /// Returns the metadata record of the named dynamic property.
    fn get_dynamic_property_data(&self, name: &str) -> Option<DynamicPropData> {
        self.dynamic_store().data(name)
    }

    /// Serializes every persisted property into `writer`.
    ///
    /// Statics are emitted in registry order, dynamics in insertion order.
    /// No-persist properties are skipped entirely; transient properties save
    /// name, type and status but no value.
    ///
    /// # Errors
    /// Propagates any underlying write error.
    fn save(&self, writer: &mut DocumentWriter) -> Result<()> {
        self.before_save();

        let mut entries = Vec::new();
        for spec in self.schema().specs() {
            let Some(prop) = self.slot_table().property_at(spec.slot) else {
                continue;
            };
            if prop.is_no_persist() {
                continue;
            }
            entries.push(SavedProperty {
                name: spec.name.clone(),
                type_name: prop.type_name().to_string(),
                status: prop.status().persistent(),
                dynamic: None,
                value: (!prop.is_transient()).then(|| prop.value()),
            });
        }
        for data in self.dynamic_store().snapshot() {
            if data.property.is_no_persist() {
                continue;
            }
            entries.push(SavedProperty {
                name: data.name.clone(),
                type_name: data.property.type_name().to_string(),
                status: data.property.status().persistent(),
                dynamic: Some(DynamicMeta {
                    group: data.group.clone(),
                    doc: data.doc.clone(),
                    attrs: data.attrs,
                }),
                value: (!data.property.is_transient()).then(|| data.property.value()),
            });
        }

        writer.write_properties(&entries)
    }

    /// Restores properties from `reader`.
    ///
    /// Each saved record is routed: static schema hit first, live dynamic hit
    /// second, recreation of persisted dynamic properties third, and the
    /// [`PropertyContainer::handle_changed_property_name`] migration hook last.
    /// Saved values whose type no longer matches go through
    /// [`PropertyContainer::handle_changed_property_type`]. A failed record never
    /// aborts the surrounding restore; only structural stream damage does.
    ///
    /// Value application bypasses the three-phase change notification: restore is
    /// bulk state reconstruction, not a user mutation.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] (or an XML error) on structural stream damage.
    fn restore(&self, reader: &mut DocumentReader<'_>) -> Result<()> {
        while let Some(saved) = reader.next_property()? {
            if let Some(spec) = self.schema().find_property(&saved.name) {
                if let Some(prop) = self.slot_table().property_at(spec.slot) {
                    let prop = prop.clone();
                    self.restore_property(&saved, &prop);
                }
                continue;
            }
            if let Some(prop) = self.dynamic_store().get(&saved.name) {
                self.restore_property(&saved, &prop);
                continue;
            }
            if let Some(meta) = &saved.dynamic {
                match self.add_dynamic_property(
                    &saved.type_name,
                    Some(&saved.name),
                    Some(&meta.group),
                    Some(&meta.doc),
                    meta.attrs,
                    false,
                    false,
                ) {
                    Ok(prop) => self.restore_property(&saved, &prop),
                    Err(err) => {
                        warn!(
                            container = %self.full_name(),
                            property = saved.name.as_str(),
                            error = %err,
                            "dropping saved dynamic property that could not be recreated"
                        );
                    }
                }
                continue;
            }
            self.handle_changed_property_name(&saved);
        }
        Ok(())
    }

    /// Applies one saved record to a live property.
    ///
    /// Part of the restore routing; exposed so migration hooks can reuse it after
    /// salvaging a renamed property.
    fn restore_property(&self, saved: &SavedProperty, prop: &PropertyRc) {
        if saved.type_name != prop.type_name() {
            self.handle_changed_property_type(saved, prop);
            return;
        }

        if let Some(value) = &saved.value {
            if !prop.is_transient() {
                if let Err(err) = prop.set_value(value.clone()) {
                    warn!(
                        container = %self.full_name(),
                        property = saved.name.as_str(),
                        error = %err,
                        "dropping saved property value"
                    );
                }
            }
        }
        prop.replace_status(saved.status.persistent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::{BoxFeature, RecordingContainer};
    use std::sync::Arc;

    #[test]
    fn test_static_lookup_matches_slot_traversal() {
        let feature = BoxFeature::new();
        let by_name = feature.get_property_by_name("Length").unwrap();
        let by_slot = feature
            .slot_table()
            .property_at(SlotIndex::from_raw(8))
            .unwrap();
        assert!(Arc::ptr_eq(&by_name, by_slot));
    }

    #[test]
    fn test_dynamic_lookup_when_not_shadowed() {
        let feature = BoxFeature::new();
        let added = feature
            .add_dynamic_property("PropertyString", Some("Note"), None, None,
                PropertyType::empty(), false, false)
            .unwrap();
        let found = feature.get_property_by_name("Note").unwrap();
        assert!(Arc::ptr_eq(&added, &found));
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let feature = BoxFeature::new();
        assert!(feature.get_property_by_name("Radius").is_none());
    }

    #[test]
    fn test_property_name_of() {
        let feature = BoxFeature::new();
        let prop = feature.get_property_by_name("Height").unwrap();
        assert_eq!(feature.property_name_of(&prop).as_deref(), Some("Height"));

        let note = feature
            .add_dynamic_property("PropertyString", Some("Note"), None, None,
                PropertyType::empty(), false, false)
            .unwrap();
        assert_eq!(feature.property_name_of(&note).as_deref(), Some("Note"));

        let other = BoxFeature::new();
        let foreign = other.get_property_by_name("Height").unwrap();
        assert_eq!(feature.property_name_of(&foreign), None);
    }

    #[test]
    fn test_property_list_order_statics_then_dynamics() {
        let feature = BoxFeature::new();
        feature
            .add_dynamic_property("PropertyString", Some("Note"), None, None,
                PropertyType::empty(), false, false)
            .unwrap();

        let named = feature.get_property_named_list();
        let names: Vec<&str> = named.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            ["Length", "Width", "Height", "CachedVolume", "Scratch", "Note"]
        );
    }

    #[test]
    fn test_property_map_covers_all() {
        let feature = BoxFeature::new();
        feature
            .add_dynamic_property("PropertyString", Some("Note"), None, None,
                PropertyType::empty(), false, false)
            .unwrap();
        let map = feature.get_property_map();
        assert_eq!(map.len(), 6);
        assert!(map.contains_key("Length"));
        assert!(map.contains_key("Note"));
    }

    #[test]
    fn test_visit_properties_counts() {
        let feature = BoxFeature::new();
        let mut count = 0usize;
        feature.visit_properties(&mut |_| count += 1);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_set_property_status_applies_to_all() {
        let feature = BoxFeature::new();
        feature.set_property_status(PropertyStatus::HIDDEN, true);
        let mut hidden = 0usize;
        feature.visit_properties(&mut |prop| {
            if prop.test_status(PropertyStatus::HIDDEN) {
                hidden += 1;
            }
        });
        assert_eq!(hidden, 5);

        feature.set_property_status(PropertyStatus::HIDDEN, false);
        assert!(!feature.is_hidden("Length"));
    }

    #[test]
    fn test_read_only_or_of_flag_and_status() {
        let feature = BoxFeature::new();
        assert!(!feature.is_read_only("Length"));

        let prop = feature.get_property_by_name("Length").unwrap();
        prop.set_status(PropertyStatus::READ_ONLY, true);
        assert!(feature.is_read_only("Length"));
    }

    #[test]
    fn test_metadata_projections() {
        let feature = BoxFeature::new();
        assert_eq!(feature.property_group("Length").as_deref(), Some("Shape"));
        assert_eq!(
            feature.property_type("CachedVolume"),
            Some(PropertyType::TRANSIENT)
        );

        feature
            .add_dynamic_property(
                "PropertyString",
                Some("Note"),
                Some("User"),
                Some("annotation"),
                PropertyType::empty(),
                false,
                true,
            )
            .unwrap();
        assert_eq!(feature.property_group("Note").as_deref(), Some("User"));
        assert_eq!(
            feature.property_documentation("Note").as_deref(),
            Some("annotation")
        );
        assert_eq!(feature.property_type("Note"), Some(PropertyType::HIDDEN));
        assert!(feature.is_hidden("Note"));
    }

    #[test]
    fn test_set_property_value_notification_order() {
        let feature = RecordingContainer::new();
        feature
            .set_property_value("Length", PropertyValue::Float(4.5))
            .unwrap();

        assert_eq!(
            feature.events(),
            ["early:Length", "before:Length", "changed:Length"]
        );
        let prop = feature.get_property_by_name("Length").unwrap();
        assert_eq!(prop.value(), PropertyValue::Float(4.5));
    }

    #[test]
    fn test_set_property_value_missing() {
        let feature = BoxFeature::new();
        let result = feature.set_property_value("Radius", PropertyValue::Float(1.0));
        assert!(matches!(result, Err(Error::PropertyNotFound(name)) if name == "Radius"));
    }

    #[test]
    fn test_set_property_value_wrong_kind() {
        let feature = BoxFeature::new();
        let result = feature.set_property_value("Length", PropertyValue::Integer(4));
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_add_dynamic_rejects_static_collision() {
        let feature = BoxFeature::new();
        let result = feature.add_dynamic_property(
            "PropertyFloat",
            Some("Length"),
            None,
            None,
            PropertyType::empty(),
            false,
            false,
        );
        assert!(matches!(
            result,
            Err(Error::DuplicatePropertyName { name, .. }) if name == "Length"
        ));
    }

    #[test]
    fn test_add_dynamic_unknown_type() {
        let feature = BoxFeature::new();
        let result = feature.add_dynamic_property(
            "PropertyMatrix",
            Some("Placement"),
            None,
            None,
            PropertyType::empty(),
            false,
            false,
        );
        assert!(matches!(result, Err(Error::UnknownPropertyType(_))));
    }

    #[test]
    fn test_dynamic_lifecycle() {
        let feature = BoxFeature::new();
        feature
            .add_dynamic_property("PropertyString", Some("Note"), None, None,
                PropertyType::empty(), false, false)
            .unwrap();
        assert_eq!(feature.get_dynamic_property_names(), ["Note"]);

        assert!(feature.remove_dynamic_property("Note"));
        assert!(feature.get_dynamic_property_names().is_empty());
        assert!(feature.get_property_by_name("Note").is_none());
        assert!(!feature.remove_dynamic_property("Note"));
    }
}
