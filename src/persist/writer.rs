use quick_xml::{
    events::{BytesEnd, BytesStart, Event},
    Writer,
};

use crate::{persist::SavedProperty, properties::PropertyValue, Result};

/// Streams property records out as an XML property document.
///
/// The writer accumulates into an internal buffer; [`DocumentWriter::into_bytes`]
/// or [`DocumentWriter::into_string`] hand the finished document back. Typical use
/// goes through [`crate::PropertyContainer::save`], which collects the container's
/// persisted properties and drives this writer.
///
/// # Examples
///
/// ```rust
/// use propscope::persist::{DocumentWriter, SavedProperty};
/// use propscope::{PropertyStatus, PropertyValue};
///
/// let mut writer = DocumentWriter::new();
/// writer.write_properties(&[SavedProperty {
///     name: "Length".to_string(),
///     type_name: "PropertyFloat".to_string(),
///     status: PropertyStatus::empty(),
///     dynamic: None,
///     value: Some(PropertyValue::Float(4.5)),
/// }])?;
/// let xml = writer.into_string()?;
/// assert!(xml.contains("PropertyFloat"));
/// # Ok::<(), propscope::Error>(())
/// ```
pub struct DocumentWriter {
    xml: Writer<Vec<u8>>,
}

impl DocumentWriter {
    /// Creates a writer producing indented output.
    #[must_use]
    pub fn new() -> Self {
        DocumentWriter {
            xml: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// Writes a complete property document: header, every record, footer.
    ///
    /// # Errors
    /// Propagates any underlying write error.
    pub fn write_properties(&mut self, entries: &[SavedProperty]) -> Result<()> {
        self.start_properties(entries.len())?;
        for entry in entries {
            self.write_property(entry)?;
        }
        self.end_properties()
    }

    /// Opens the `<Properties>` element.
    ///
    /// # Errors
    /// Propagates any underlying write error.
    pub fn start_properties(&mut self, count: usize) -> Result<()> {
        let count = count.to_string();
        let mut elem = BytesStart::new("Properties");
        elem.push_attribute(("Count", count.as_str()));
        self.xml.write_event(Event::Start(elem))?;
        Ok(())
    }

    /// Closes the `<Properties>` element.
    ///
    /// # Errors
    /// Propagates any underlying write error.
    pub fn end_properties(&mut self) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new("Properties")))?;
        Ok(())
    }

    /// Writes one `<Property>` element.
    ///
    /// Transient records (no value) become empty elements; dynamic records carry
    /// their recreation metadata as attributes.
    ///
    /// # Errors
    /// Propagates any underlying write error.
    pub fn write_property(&mut self, saved: &SavedProperty) -> Result<()> {
        let status = saved.status.bits().to_string();
        let mut elem = BytesStart::new("Property");
        elem.push_attribute(("name", saved.name.as_str()));
        elem.push_attribute(("type", saved.type_name.as_str()));
        elem.push_attribute(("status", status.as_str()));
        let attr_bits;
        if let Some(meta) = &saved.dynamic {
            attr_bits = meta.attrs.bits().to_string();
            elem.push_attribute(("dynamic", "1"));
            elem.push_attribute(("group", meta.group.as_str()));
            elem.push_attribute(("doc", meta.doc.as_str()));
            elem.push_attribute(("attr", attr_bits.as_str()));
        }

        match &saved.value {
            Some(value) => {
                self.xml.write_event(Event::Start(elem))?;
                self.write_value(value)?;
                self.xml.write_event(Event::End(BytesEnd::new("Property")))?;
            }
            None => {
                self.xml.write_event(Event::Empty(elem))?;
            }
        }
        Ok(())
    }

    fn write_value(&mut self, value: &PropertyValue) -> Result<()> {
        let tag = value.kind().short_name();
        match value {
            PropertyValue::Bool(flag) => self.write_leaf(tag, "value", &flag.to_string()),
            PropertyValue::Integer(number) => self.write_leaf(tag, "value", &number.to_string()),
            PropertyValue::Float(number) => self.write_leaf(tag, "value", &number.to_string()),
            PropertyValue::String(text) => self.write_leaf(tag, "value", text),
            PropertyValue::Vector(vector) => {
                let (x, y, z) = (
                    vector.x.to_string(),
                    vector.y.to_string(),
                    vector.z.to_string(),
                );
                let mut elem = BytesStart::new(tag);
                elem.push_attribute(("x", x.as_str()));
                elem.push_attribute(("y", y.as_str()));
                elem.push_attribute(("z", z.as_str()));
                self.xml.write_event(Event::Empty(elem))?;
                Ok(())
            }
            PropertyValue::IntegerList(items) => {
                self.start_list(tag, items.len())?;
                for item in items {
                    self.write_leaf("I", "v", &item.to_string())?;
                }
                self.end_list(tag)
            }
            PropertyValue::FloatList(items) => {
                self.start_list(tag, items.len())?;
                for item in items {
                    self.write_leaf("F", "v", &item.to_string())?;
                }
                self.end_list(tag)
            }
            PropertyValue::StringList(items) => {
                self.start_list(tag, items.len())?;
                for item in items {
                    self.write_leaf("String", "value", item)?;
                }
                self.end_list(tag)
            }
            PropertyValue::Link(target) => {
                let mut elem = BytesStart::new(tag);
                if let Some(target) = target {
                    elem.push_attribute(("value", target.as_str()));
                }
                self.xml.write_event(Event::Empty(elem))?;
                Ok(())
            }
        }
    }

    fn write_leaf(&mut self, tag: &str, key: &str, value: &str) -> Result<()> {
        let mut elem = BytesStart::new(tag);
        elem.push_attribute((key, value));
        self.xml.write_event(Event::Empty(elem))?;
        Ok(())
    }

    fn start_list(&mut self, tag: &str, count: usize) -> Result<()> {
        let count = count.to_string();
        let mut elem = BytesStart::new(tag);
        elem.push_attribute(("count", count.as_str()));
        self.xml.write_event(Event::Start(elem))?;
        Ok(())
    }

    fn end_list(&mut self, tag: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Returns the finished document as raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.xml.into_inner()
    }

    /// Returns the finished document as a string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the buffer is not valid UTF-8,
    /// which would indicate an internal encoding fault.
    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.xml.into_inner())
            .map_err(|e| malformed_error!("Property document is not valid UTF-8: {}", e))
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        DocumentWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        persist::DynamicMeta,
        properties::{PropertyStatus, Vector3},
        schema::PropertyType,
    };

    fn saved(name: &str, type_name: &str, value: Option<PropertyValue>) -> SavedProperty {
        SavedProperty {
            name: name.to_string(),
            type_name: type_name.to_string(),
            status: PropertyStatus::empty(),
            dynamic: None,
            value,
        }
    }

    #[test]
    fn test_write_scalar_property() {
        let mut writer = DocumentWriter::new();
        writer
            .write_properties(&[saved(
                "Length",
                "PropertyFloat",
                Some(PropertyValue::Float(4.5)),
            )])
            .unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains(r#"<Properties Count="1">"#));
        assert!(xml.contains(r#"<Property name="Length" type="PropertyFloat" status="0">"#));
        assert!(xml.contains(r#"<Float value="4.5"/>"#));
        assert!(xml.contains("</Properties>"));
    }

    #[test]
    fn test_write_transient_property_is_empty_element() {
        let mut writer = DocumentWriter::new();
        writer
            .write_properties(&[saved("Cache", "PropertyInteger", None)])
            .unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains(r#"<Property name="Cache" type="PropertyInteger" status="0"/>"#));
        assert!(!xml.contains("<Integer"));
    }

    #[test]
    fn test_write_dynamic_metadata() {
        let mut writer = DocumentWriter::new();
        let mut entry = saved(
            "Note",
            "PropertyString",
            Some(PropertyValue::String("hello".to_string())),
        );
        entry.dynamic = Some(DynamicMeta {
            group: "User".to_string(),
            doc: "annotation".to_string(),
            attrs: PropertyType::HIDDEN,
        });
        writer.write_properties(&[entry]).unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains(r#"dynamic="1""#));
        assert!(xml.contains(r#"group="User""#));
        assert!(xml.contains(r#"doc="annotation""#));
        assert!(xml.contains(r#"attr="4""#));
    }

    #[test]
    fn test_write_vector_and_lists() {
        let mut writer = DocumentWriter::new();
        writer
            .write_properties(&[
                saved(
                    "Origin",
                    "PropertyVector",
                    Some(PropertyValue::Vector(Vector3::new(1.0, 2.0, 3.0))),
                ),
                saved(
                    "Counts",
                    "PropertyIntegerList",
                    Some(PropertyValue::IntegerList(vec![1, 2, 3])),
                ),
                saved(
                    "Tags",
                    "PropertyStringList",
                    Some(PropertyValue::StringList(vec!["a".to_string()])),
                ),
            ])
            .unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains(r#"<Vector x="1" y="2" z="3"/>"#));
        assert!(xml.contains(r#"<IntegerList count="3">"#));
        assert!(xml.contains(r#"<I v="2"/>"#));
        assert!(xml.contains(r#"<String value="a"/>"#));
    }

    #[test]
    fn test_write_escapes_attribute_values() {
        let mut writer = DocumentWriter::new();
        writer
            .write_properties(&[saved(
                "Note",
                "PropertyString",
                Some(PropertyValue::String("a<b&\"c\"".to_string())),
            )])
            .unwrap();

        let xml = writer.into_string().unwrap();
        assert!(!xml.contains("a<b"));
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&amp;"));
    }

    #[test]
    fn test_write_unset_link_has_no_value() {
        let mut writer = DocumentWriter::new();
        writer
            .write_properties(&[saved("Base", "PropertyLink", Some(PropertyValue::Link(None)))])
            .unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains("<Link/>"));
    }
}
