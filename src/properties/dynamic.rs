//! Per-instance store of dynamically attached properties.
//!
//! Static properties are declared once per class in its [`crate::SchemaRegistry`];
//! dynamic properties are attached at runtime to one specific container instance.
//! This module provides the [`DynamicPropertyStore`] owning those properties and
//! their metadata, in insertion order, looked up by name only.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::warn;

use crate::{
    properties::{Property, PropertyKind, PropertyRc, PropertyStatus},
    schema::PropertyType,
    Error, Result,
};

/// Metadata and live reference of one dynamic property.
#[derive(Clone)]
pub struct DynamicPropData {
    /// The property name, unique across the owning container
    pub name: String,
    /// The editor group this property is presented under
    pub group: String,
    /// Documentation string
    pub doc: String,
    /// Declared attribute flags, recorded at creation time
    pub attrs: PropertyType,
    /// The live property
    pub property: PropertyRc,
}

/// The insertion-ordered entry list plus its name index.
struct DynamicCore {
    entries: Vec<DynamicPropData>,
    by_name: HashMap<String, usize>,
}

impl DynamicCore {
    fn reindex(&mut self) {
        self.by_name.clear();
        for (position, data) in self.entries.iter().enumerate() {
            self.by_name.insert(data.name.clone(), position);
        }
    }
}

/// Per-instance store of runtime-attached properties.
///
/// The store exclusively owns every dynamic property's storage: dropping the store
/// (i.e. dropping its owning container) drops all dynamic properties. Insertion
/// order is preserved and defines the persistence order of dynamic entries.
///
/// Name uniqueness against the *static* schema is enforced one level up, by
/// [`crate::PropertyContainer::add_dynamic_property`]; the store itself only
/// guards against collisions among its own entries.
pub struct DynamicPropertyStore {
    core: RwLock<DynamicCore>,
}

impl DynamicPropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        DynamicPropertyStore {
            core: RwLock::new(DynamicCore {
                entries: Vec::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Attaches a new dynamic property.
    ///
    /// # Arguments
    /// * `class` - The owning container's class name, used in error reports
    /// * `kind` - The kind of value the property holds
    /// * `name` - The property name; a unique one is generated when `None`
    /// * `group` - The editor group
    /// * `doc` - Documentation string
    /// * `attrs` - Declared attribute flags recorded for the property
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePropertyName`] if `name` collides with an
    /// existing dynamic property on the same store.
    pub fn add(
        &self,
        class: &str,
        kind: PropertyKind,
        name: Option<&str>,
        group: &str,
        doc: &str,
        attrs: PropertyType,
    ) -> Result<PropertyRc> {
        let mut core = write_lock!(self.core);

        let name = match name {
            Some(given) => {
                if core.by_name.contains_key(given) {
                    return Err(Error::DuplicatePropertyName {
                        class: class.to_string(),
                        name: given.to_string(),
                    });
                }
                given.to_string()
            }
            None => {
                // Kind short name, then the smallest free numeric suffix.
                let base = kind.short_name();
                if core.by_name.contains_key(base) {
                    let mut counter = 2usize;
                    while core.by_name.contains_key(&format!("{base}{counter}")) {
                        counter += 1;
                    }
                    format!("{base}{counter}")
                } else {
                    base.to_string()
                }
            }
        };

        let property = Arc::new(Property::new(kind, attrs));
        let position = core.entries.len();
        core.entries.push(DynamicPropData {
            name: name.clone(),
            group: group.to_string(),
            doc: doc.to_string(),
            attrs,
            property: property.clone(),
        });
        core.by_name.insert(name, position);
        Ok(property)
    }

    /// Detaches and drops the named dynamic property.
    ///
    /// Returns false if the name is not found. Removal is refused (with a warning)
    /// while the property carries [`PropertyStatus::LOCK_DYNAMIC`].
    pub fn remove(&self, name: &str) -> bool {
        let mut core = write_lock!(self.core);
        let Some(&position) = core.by_name.get(name) else {
            return false;
        };

        if core.entries[position]
            .property
            .test_status(PropertyStatus::LOCK_DYNAMIC)
        {
            warn!(property = name, "refusing to remove locked dynamic property");
            return false;
        }

        core.entries.remove(position);
        core.reindex();
        true
    }

    /// Looks up a dynamic property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<PropertyRc> {
        let core = read_lock!(self.core);
        core.by_name
            .get(name)
            .map(|&position| core.entries[position].property.clone())
    }

    /// Returns all dynamic property names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        read_lock!(self.core)
            .entries
            .iter()
            .map(|data| data.name.clone())
            .collect()
    }

    /// Updates group and documentation of the named dynamic property.
    ///
    /// Returns false if the name is not found.
    pub fn change(&self, name: &str, group: &str, doc: &str) -> bool {
        let mut core = write_lock!(self.core);
        let Some(&position) = core.by_name.get(name) else {
            return false;
        };
        core.entries[position].group = group.to_string();
        core.entries[position].doc = doc.to_string();
        true
    }

    /// Returns the metadata record of the named dynamic property.
    #[must_use]
    pub fn data(&self, name: &str) -> Option<DynamicPropData> {
        let core = read_lock!(self.core);
        core.by_name
            .get(name)
            .map(|&position| core.entries[position].clone())
    }

    /// Returns the name a live property is stored under, if it is dynamic here.
    ///
    /// Identity is reference identity: the property must be the very instance
    /// owned by this store.
    #[must_use]
    pub fn name_of(&self, property: &Property) -> Option<String> {
        read_lock!(self.core)
            .entries
            .iter()
            .find(|data| std::ptr::eq(Arc::as_ptr(&data.property), property))
            .map(|data| data.name.clone())
    }

    /// Returns an insertion-ordered copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DynamicPropData> {
        read_lock!(self.core).entries.clone()
    }

    /// Number of dynamic properties.
    #[must_use]
    pub fn len(&self) -> usize {
        read_lock!(self.core).entries.len()
    }

    /// Returns true if the store holds no dynamic properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        read_lock!(self.core).entries.is_empty()
    }
}

impl Default for DynamicPropertyStore {
    fn default() -> Self {
        DynamicPropertyStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let store = DynamicPropertyStore::new();
        let prop = store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "User",
                "annotation",
                PropertyType::empty(),
            )
            .unwrap();

        let found = store.get("Note").unwrap();
        assert!(Arc::ptr_eq(&prop, &found));
        assert_eq!(store.len(), 1);
        assert_eq!(store.names(), ["Note"]);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let store = DynamicPropertyStore::new();
        store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "",
                "",
                PropertyType::empty(),
            )
            .unwrap();
        let result = store.add(
            "Box",
            PropertyKind::Integer,
            Some("Note"),
            "",
            "",
            PropertyType::empty(),
        );
        assert!(matches!(
            result,
            Err(Error::DuplicatePropertyName { class, name }) if class == "Box" && name == "Note"
        ));
    }

    #[test]
    fn test_generated_names() {
        let store = DynamicPropertyStore::new();
        for _ in 0..3 {
            store
                .add(
                    "Box",
                    PropertyKind::Float,
                    None,
                    "",
                    "",
                    PropertyType::empty(),
                )
                .unwrap();
        }
        assert_eq!(store.names(), ["Float", "Float2", "Float3"]);
    }

    #[test]
    fn test_remove() {
        let store = DynamicPropertyStore::new();
        store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "",
                "",
                PropertyType::empty(),
            )
            .unwrap();

        assert!(store.remove("Note"));
        assert!(!store.remove("Note"));
        assert!(store.get("Note").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_reindexes() {
        let store = DynamicPropertyStore::new();
        for name in ["A", "B", "C"] {
            store
                .add(
                    "Box",
                    PropertyKind::Integer,
                    Some(name),
                    "",
                    "",
                    PropertyType::empty(),
                )
                .unwrap();
        }
        assert!(store.remove("B"));
        assert_eq!(store.names(), ["A", "C"]);
        assert!(store.get("C").is_some());
    }

    #[test]
    fn test_remove_locked_refused() {
        let store = DynamicPropertyStore::new();
        let prop = store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "",
                "",
                PropertyType::empty(),
            )
            .unwrap();
        prop.set_status(PropertyStatus::LOCK_DYNAMIC, true);

        assert!(!store.remove("Note"));
        assert_eq!(store.len(), 1);

        prop.set_status(PropertyStatus::LOCK_DYNAMIC, false);
        assert!(store.remove("Note"));
    }

    #[test]
    fn test_change_metadata() {
        let store = DynamicPropertyStore::new();
        store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "User",
                "old",
                PropertyType::empty(),
            )
            .unwrap();

        assert!(store.change("Note", "Annotations", "new"));
        let data = store.data("Note").unwrap();
        assert_eq!(data.group, "Annotations");
        assert_eq!(data.doc, "new");
        assert!(!store.change("Missing", "", ""));
    }

    #[test]
    fn test_name_of() {
        let store = DynamicPropertyStore::new();
        let prop = store
            .add(
                "Box",
                PropertyKind::String,
                Some("Note"),
                "",
                "",
                PropertyType::empty(),
            )
            .unwrap();

        assert_eq!(store.name_of(&prop).as_deref(), Some("Note"));

        let foreign = Property::new(PropertyKind::String, PropertyType::empty());
        assert_eq!(store.name_of(&foreign), None);
    }
}
