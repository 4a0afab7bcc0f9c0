//! Integration tests for save/restore: full round-trips over mixed static,
//! dynamic, transient and no-persist properties, plus schema migration.

use std::sync::Mutex;

use propscope::prelude::*;

fn part_schema() -> Result<SchemaRegistryRc> {
    SchemaRegistry::build("Part", None, |b| {
        b.property("Length", 8, PropertyKind::Float).group("Dimensions");
        b.property("Label", 12, PropertyKind::String).group("Base");
        b.property("Origin", 16, PropertyKind::Vector).group("Placement");
        b.property("Tags", 20, PropertyKind::StringList).group("Base");
        b.property("Base", 24, PropertyKind::Link).group("Placement");
        b.property("CachedArea", 28, PropertyKind::Float)
            .group("Internal")
            .flags(PropertyType::TRANSIENT);
        b.property("Scratch", 32, PropertyKind::Integer)
            .group("Internal")
            .flags(PropertyType::NO_PERSIST);
    })
}

struct PartFeature {
    schema: SchemaRegistryRc,
    slots: SlotTable,
    dynamics: DynamicPropertyStore,
}

impl PartFeature {
    fn new() -> Result<Self> {
        let schema = part_schema()?;
        let slots = SlotTable::instantiate(&schema);
        Ok(PartFeature {
            schema,
            slots,
            dynamics: DynamicPropertyStore::new(),
        })
    }
}

impl PropertyContainer for PartFeature {
    fn schema(&self) -> &SchemaRegistryRc {
        &self.schema
    }

    fn slot_table(&self) -> &SlotTable {
        &self.slots
    }

    fn dynamic_store(&self) -> &DynamicPropertyStore {
        &self.dynamics
    }

    fn full_name(&self) -> String {
        "Document#Part".to_string()
    }
}

fn populate(feature: &PartFeature) -> Result<()> {
    feature.set_property_value("Length", PropertyValue::Float(4.5))?;
    feature.set_property_value("Label", PropertyValue::String("Bracket".to_string()))?;
    feature.set_property_value("Origin", PropertyValue::Vector(Vector3::new(1.0, 2.0, 3.0)))?;
    feature.set_property_value(
        "Tags",
        PropertyValue::StringList(vec!["steel".to_string(), "frame".to_string()]),
    )?;
    feature.set_property_value("Base", PropertyValue::Link(Some("Sketch001".to_string())))?;
    feature.set_property_value("CachedArea", PropertyValue::Float(9.0))?;
    feature.set_property_value("Scratch", PropertyValue::Integer(77))?;

    feature.add_dynamic_property(
        "PropertyString",
        Some("Note"),
        Some("User"),
        Some("annotation"),
        PropertyType::empty(),
        false,
        false,
    )?;
    feature.set_property_value("Note", PropertyValue::String("check tolerances".to_string()))?;
    Ok(())
}

fn save_to_string(feature: &PartFeature) -> Result<String> {
    let mut writer = DocumentWriter::new();
    feature.save(&mut writer)?;
    writer.into_string()
}

#[test]
fn test_roundtrip_reproduces_values() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    let restored = PartFeature::new()?;
    restored.restore(&mut DocumentReader::from_str(&xml))?;

    for name in ["Length", "Label", "Origin", "Tags", "Base"] {
        assert_eq!(
            restored.get_property_by_name(name).unwrap().value(),
            original.get_property_by_name(name).unwrap().value(),
            "value mismatch for {name}"
        );
    }

    // The dynamic property is recreated with its metadata.
    assert_eq!(restored.get_dynamic_property_names(), ["Note"]);
    assert_eq!(
        restored.get_property_by_name("Note").unwrap().value(),
        PropertyValue::String("check tolerances".to_string())
    );
    assert_eq!(restored.property_group("Note").as_deref(), Some("User"));
    assert_eq!(
        restored.property_documentation("Note").as_deref(),
        Some("annotation")
    );

    Ok(())
}

#[test]
fn test_transient_saves_metadata_but_not_value() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    // Name, type and status are in the stream; the value is not.
    assert!(xml.contains(r#"name="CachedArea" type="PropertyFloat""#));
    assert!(!xml.contains("9"));

    let restored = PartFeature::new()?;
    restored.restore(&mut DocumentReader::from_str(&xml))?;
    assert_eq!(
        restored.get_property_by_name("CachedArea").unwrap().value(),
        PropertyValue::Float(0.0)
    );

    Ok(())
}

#[test]
fn test_no_persist_is_absent_from_stream() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    assert!(!xml.contains("Scratch"));

    let restored = PartFeature::new()?;
    restored.restore(&mut DocumentReader::from_str(&xml))?;
    assert_eq!(
        restored.get_property_by_name("Scratch").unwrap().value(),
        PropertyValue::Integer(0)
    );

    Ok(())
}

#[test]
fn test_status_bits_roundtrip_without_session_bits() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;

    let label = original.get_property_by_name("Label").unwrap();
    label.set_status(PropertyStatus::HIDDEN | PropertyStatus::BUSY, true);
    // TOUCHED is already set by populate(); neither it nor BUSY may survive.

    let xml = save_to_string(&original)?;
    let restored = PartFeature::new()?;
    restored.restore(&mut DocumentReader::from_str(&xml))?;

    let label = restored.get_property_by_name("Label").unwrap();
    assert!(label.test_status(PropertyStatus::HIDDEN));
    assert!(!label.test_status(PropertyStatus::BUSY));
    assert!(!label.test_status(PropertyStatus::TOUCHED));

    Ok(())
}

#[test]
fn test_restore_into_populated_container_overwrites() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    let restored = PartFeature::new()?;
    restored.set_property_value("Length", PropertyValue::Float(99.0))?;
    restored.restore(&mut DocumentReader::from_str(&xml))?;

    assert_eq!(
        restored.get_property_by_name("Length").unwrap().value(),
        PropertyValue::Float(4.5)
    );

    Ok(())
}

/// A later schema revision: `Label` was renamed to `Title` and `Length` was
/// retyped to an integer. Restoring a stream from the old revision must keep
/// everything else intact and route the mismatches through the hooks.
fn migrated_schema() -> Result<SchemaRegistryRc> {
    SchemaRegistry::build("Part", None, |b| {
        b.property("Length", 8, PropertyKind::Integer).group("Dimensions");
        b.property("Title", 12, PropertyKind::String).group("Base");
        b.property("Origin", 16, PropertyKind::Vector).group("Placement");
    })
}

struct MigratedPart {
    schema: SchemaRegistryRc,
    slots: SlotTable,
    dynamics: DynamicPropertyStore,
    dropped: Mutex<Vec<String>>,
}

impl MigratedPart {
    fn new() -> Result<Self> {
        let schema = migrated_schema()?;
        let slots = SlotTable::instantiate(&schema);
        Ok(MigratedPart {
            schema,
            slots,
            dynamics: DynamicPropertyStore::new(),
            dropped: Mutex::new(Vec::new()),
        })
    }
}

impl PropertyContainer for MigratedPart {
    fn schema(&self) -> &SchemaRegistryRc {
        &self.schema
    }

    fn slot_table(&self) -> &SlotTable {
        &self.slots
    }

    fn dynamic_store(&self) -> &DynamicPropertyStore {
        &self.dynamics
    }

    fn handle_changed_property_name(&self, saved: &SavedProperty) {
        // Salvage the rename; anything else is recorded as dropped.
        if saved.name == "Label" {
            if let Some(prop) = self.get_property_by_name("Title") {
                self.restore_property(saved, &prop);
                return;
            }
        }
        self.dropped.lock().unwrap().push(saved.name.clone());
    }

    fn handle_changed_property_type(&self, saved: &SavedProperty, _prop: &PropertyRc) {
        self.dropped.lock().unwrap().push(saved.name.clone());
    }
}

#[test]
fn test_migration_hooks_route_renames_and_retypes() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    let migrated = MigratedPart::new()?;
    migrated.restore(&mut DocumentReader::from_str(&xml))?;

    // The rename hook salvaged Label into Title.
    assert_eq!(
        migrated.get_property_by_name("Title").unwrap().value(),
        PropertyValue::String("Bracket".to_string())
    );

    // The retyped Length kept its default; the unknown Tags/Base were dropped.
    assert_eq!(
        migrated.get_property_by_name("Length").unwrap().value(),
        PropertyValue::Integer(0)
    );
    let dropped = migrated.dropped.lock().unwrap().clone();
    assert!(dropped.contains(&"Length".to_string()));
    assert!(dropped.contains(&"Tags".to_string()));
    assert!(dropped.contains(&"Base".to_string()));

    // The surviving static property still restored.
    assert_eq!(
        migrated.get_property_by_name("Origin").unwrap().value(),
        PropertyValue::Vector(Vector3::new(1.0, 2.0, 3.0))
    );
    // The dynamic property is recreated even under the new schema.
    assert_eq!(migrated.get_dynamic_property_names(), ["Note"]);

    Ok(())
}

#[test]
fn test_restore_of_damaged_stream_fails() -> Result<()> {
    let feature = PartFeature::new()?;

    let truncated = r#"<Properties Count="1"><Property name="Length" type="PropertyFloat""#;
    assert!(feature
        .restore(&mut DocumentReader::from_str(truncated))
        .is_err());

    let headerless = "<Other/>";
    assert!(feature
        .restore(&mut DocumentReader::from_str(headerless))
        .is_err());

    Ok(())
}

#[test]
fn test_save_order_is_registry_then_dynamic() -> Result<()> {
    let original = PartFeature::new()?;
    populate(&original)?;
    let xml = save_to_string(&original)?;

    let length = xml.find(r#"name="Length""#).unwrap();
    let label = xml.find(r#"name="Label""#).unwrap();
    let note = xml.find(r#"name="Note""#).unwrap();
    assert!(length < label);
    assert!(label < note);

    Ok(())
}
