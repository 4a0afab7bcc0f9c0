//! Process-wide registry of container classes.
//!
//! This module provides the [`ClassRegistry`], the lookup table realizing the
//! class-initialization contract: each concrete container class registers its
//! [`SchemaRegistry`] exactly once, keyed by class name, and links it to its parent
//! class's registry so the schema chain can later be merged.
//!
//! # Registry Architecture
//!
//! - **Primary storage**: class entries in a skip list keyed by class name, giving
//!   ordered, lock-free iteration over all registered classes
//! - **Secondary index**: parent name to subclass names, for hierarchy queries
//!
//! # One-Time Initialization
//!
//! [`ClassRegistry::register`] is guarded: registering an already-known class name does
//! not rebuild anything and simply returns the existing schema. This is the disciplined
//! one-time-initialization contract: no macros or reflection tricks, just a guarded
//! call performed once per concrete type at process or module initialization.
//!
//! # Thread Safety
//!
//! Storage is lock-free for reads. Registration is expected to run on one logical
//! thread during initialization; afterwards the registry is read-only.
//!
//! # Examples
//!
//! ```rust
//! use propscope::{ClassRegistry, PropertyKind};
//!
//! let registry = ClassRegistry::new();
//! registry.register("Shape", None, |b| {
//!     b.property("Length", 8, PropertyKind::Float);
//! })?;
//! registry.register("Box", Some("Shape"), |b| {
//!     b.property("Height", 16, PropertyKind::Float);
//! })?;
//!
//! assert!(registry.is_subclass_of("Box", "Shape"));
//! # Ok::<(), propscope::Error>(())
//! ```

use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use tracing::debug;

use crate::{
    schema::{SchemaBuilder, SchemaRegistry, SchemaRegistryRc},
    Error, Result,
};

/// A reference to a `ClassEntry`
pub type ClassEntryRc = Arc<ClassEntry>;

/// One registered container class: its name, parent link and schema.
pub struct ClassEntry {
    /// The registered class name
    pub name: String,
    /// Name of the parent class, if any
    pub parent: Option<String>,
    /// The class's property schema
    pub schema: SchemaRegistryRc,
}

/// Process-wide table of registered container classes.
///
/// One entry exists per registered class. The table owns nothing beyond the shared
/// schema references; container instances obtain their class's schema from here (or
/// from their own guarded static) and share it.
///
/// A global instance is available through [`ClassRegistry::global`]; independent
/// instances can be constructed for tests or embedded tooling.
pub struct ClassRegistry {
    /// Class entries keyed by class name - ordered, lock-free iteration
    classes: SkipMap<String, ClassEntryRc>,
    /// Secondary index: parent class name to subclass names
    subclasses: DashMap<String, Vec<String>>,
}

impl ClassRegistry {
    /// Creates an empty class registry.
    #[must_use]
    pub fn new() -> Self {
        ClassRegistry {
            classes: SkipMap::new(),
            subclasses: DashMap::new(),
        }
    }

    /// Returns the process-wide class registry.
    pub fn global() -> &'static ClassRegistry {
        static GLOBAL: OnceLock<ClassRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ClassRegistry::new)
    }

    /// Registers a container class and builds its schema, exactly once.
    ///
    /// If `class_name` is already registered the call is a guarded no-op returning the
    /// existing schema, which makes the one-time-initialization contract safe to invoke
    /// from every instance constructor.
    ///
    /// # Arguments
    /// * `class_name` - Unique name of the class being registered
    /// * `parent` - Name of the previously registered parent class, if any
    /// * `declare` - Closure declaring the class's properties on the builder
    ///
    /// # Errors
    /// * [`Error::ClassNotRegistered`] - `parent` names a class that is not registered
    /// * Any schema-build error from [`SchemaRegistry::build`]
    pub fn register(
        &self,
        class_name: &str,
        parent: Option<&str>,
        declare: impl FnOnce(&mut SchemaBuilder),
    ) -> Result<SchemaRegistryRc> {
        if let Some(existing) = self.classes.get(class_name) {
            debug!(class = class_name, "class already registered, skipping");
            return Ok(existing.value().schema.clone());
        }

        let parent_schema = match parent {
            Some(parent_name) => Some(
                self.classes
                    .get(parent_name)
                    .map(|entry| entry.value().schema.clone())
                    .ok_or_else(|| Error::ClassNotRegistered(parent_name.to_string()))?,
            ),
            None => None,
        };

        let schema = SchemaRegistry::build(class_name, parent_schema, declare)?;
        let entry = self
            .classes
            .get_or_insert(
                class_name.to_string(),
                Arc::new(ClassEntry {
                    name: class_name.to_string(),
                    parent: parent.map(str::to_string),
                    schema,
                }),
            )
            .value()
            .clone();

        if let Some(parent_name) = parent {
            self.subclasses
                .entry(parent_name.to_string())
                .or_default()
                .push(class_name.to_string());
        }

        debug!(class = class_name, parent = ?parent, "class registered");
        Ok(entry.schema.clone())
    }

    /// Looks up a registered class by name.
    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<ClassEntryRc> {
        self.classes
            .get(class_name)
            .map(|entry| entry.value().clone())
    }

    /// Looks up a registered class's schema by name.
    #[must_use]
    pub fn schema(&self, class_name: &str) -> Option<SchemaRegistryRc> {
        self.get(class_name).map(|entry| entry.schema.clone())
    }

    /// Returns true if the class name is registered.
    #[must_use]
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns all registered class names, ordered by name.
    #[must_use]
    pub fn class_names(&self) -> Vec<String> {
        self.classes
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Returns the names of the direct subclasses of `class_name`.
    #[must_use]
    pub fn subclasses_of(&self, class_name: &str) -> Vec<String> {
        self.subclasses
            .get(class_name)
            .map(|names| names.clone())
            .unwrap_or_default()
    }

    /// Returns true if `class_name` equals `ancestor` or derives from it.
    ///
    /// Walks the parent chain recorded at registration time.
    #[must_use]
    pub fn is_subclass_of(&self, class_name: &str, ancestor: &str) -> bool {
        let mut current = Some(class_name.to_string());
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.get(&name).and_then(|entry| entry.parent.clone());
        }
        false
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        ClassRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyKind;

    fn sample() -> ClassRegistry {
        let registry = ClassRegistry::new();
        registry
            .register("Shape", None, |b| {
                b.property("Length", 8, PropertyKind::Float);
            })
            .unwrap();
        registry
            .register("Box", Some("Shape"), |b| {
                b.property("Height", 16, PropertyKind::Float);
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = sample();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Shape"));
        assert!(registry.contains("Box"));
        assert!(registry.get("Cylinder").is_none());

        let entry = registry.get("Box").unwrap();
        assert_eq!(entry.parent.as_deref(), Some("Shape"));
        assert_eq!(entry.schema.class_name(), "Box");
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = sample();
        let first = registry.schema("Shape").unwrap();
        let second = registry
            .register("Shape", None, |b| {
                b.property("Ignored", 99, PropertyKind::Bool);
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.find_property("Ignored").is_none());
    }

    #[test]
    fn test_register_unknown_parent_fails() {
        let registry = ClassRegistry::new();
        let result = registry.register("Box", Some("Shape"), |b| {
            b.property("Height", 16, PropertyKind::Float);
        });
        assert!(matches!(result, Err(Error::ClassNotRegistered(name)) if name == "Shape"));
    }

    #[test]
    fn test_schema_chain_is_linked() {
        let registry = sample();
        let schema = registry.schema("Box").unwrap();
        assert!(schema.find_property("Length").is_some());
        assert!(schema.find_property("Height").is_some());
    }

    #[test]
    fn test_hierarchy_queries() {
        let registry = sample();
        assert_eq!(registry.subclasses_of("Shape"), ["Box"]);
        assert!(registry.is_subclass_of("Box", "Shape"));
        assert!(registry.is_subclass_of("Box", "Box"));
        assert!(!registry.is_subclass_of("Shape", "Box"));
    }

    #[test]
    fn test_class_names_ordered() {
        let registry = sample();
        assert_eq!(registry.class_names(), ["Box", "Shape"]);
    }
}
