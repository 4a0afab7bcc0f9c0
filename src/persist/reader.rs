use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    persist::{DynamicMeta, SavedProperty},
    properties::{PropertyStatus, PropertyValue, Vector3},
    schema::PropertyType,
    Result,
};

/// Parses an XML property document back into [`SavedProperty`] records.
///
/// The reader is pull-based: [`DocumentReader::next_property`] yields one record per
/// `<Property>` element until the closing `</Properties>` tag. Unknown value elements
/// are skipped rather than rejected, so streams written by newer schema revisions
/// still restore everything the current schema understands; routing of records whose
/// name or type no longer matches happens one level up, in
/// [`crate::PropertyContainer::restore`].
///
/// # Examples
///
/// ```rust
/// use propscope::persist::DocumentReader;
/// use propscope::PropertyValue;
///
/// let xml = r#"<Properties Count="1">
///   <Property name="Length" type="PropertyFloat" status="0">
///     <Float value="4.5"/>
///   </Property>
/// </Properties>"#;
///
/// let mut reader = DocumentReader::from_str(xml);
/// let saved = reader.next_property()?.unwrap();
/// assert_eq!(saved.name, "Length");
/// assert_eq!(saved.value, Some(PropertyValue::Float(4.5)));
/// assert!(reader.next_property()?.is_none());
/// # Ok::<(), propscope::Error>(())
/// ```
pub struct DocumentReader<'a> {
    xml: Reader<&'a [u8]>,
    started: bool,
    done: bool,
}

impl<'a> DocumentReader<'a> {
    /// Creates a reader over raw document bytes.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        let mut xml = Reader::from_reader(data);
        xml.config_mut().trim_text(true);
        DocumentReader {
            xml,
            started: false,
            done: false,
        }
    }

    /// Creates a reader over a document string.
    #[must_use]
    pub fn from_str(text: &'a str) -> Self {
        DocumentReader::new(text.as_bytes())
    }

    /// Scans to the `<Properties>` element and returns its declared count.
    ///
    /// The count is advisory; [`DocumentReader::next_property`] is the source of
    /// truth for how many records the stream actually holds.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the stream holds no `<Properties>`
    /// element or its `Count` attribute is missing or unreadable.
    pub fn read_properties_header(&mut self) -> Result<usize> {
        loop {
            match self.xml.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"Properties" => {
                    self.started = true;
                    return Self::parse_count(&e);
                }
                Event::Empty(e) if e.name().as_ref() == b"Properties" => {
                    self.started = true;
                    self.done = true;
                    return Self::parse_count(&e);
                }
                Event::Eof => {
                    return Err(malformed_error!(
                        "Property stream holds no '<Properties>' element"
                    ));
                }
                _ => {}
            }
        }
    }

    /// Yields the next persisted property, or `None` past the end of the stream.
    ///
    /// Reads the header first if [`DocumentReader::read_properties_header`] was not
    /// called explicitly.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on structural damage (truncated stream,
    /// missing mandatory attributes, unreadable values).
    pub fn next_property(&mut self) -> Result<Option<SavedProperty>> {
        if !self.started {
            self.read_properties_header()?;
        }
        if self.done {
            return Ok(None);
        }

        loop {
            match self.xml.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"Property" => {
                    let mut saved = Self::parse_property_attrs(&e)?;
                    self.read_property_children(&mut saved)?;
                    return Ok(Some(saved));
                }
                Event::Empty(e) if e.name().as_ref() == b"Property" => {
                    return Ok(Some(Self::parse_property_attrs(&e)?));
                }
                Event::End(e) if e.name().as_ref() == b"Properties" => {
                    self.done = true;
                    return Ok(None);
                }
                Event::Eof => {
                    self.done = true;
                    return Err(malformed_error!(
                        "Property stream ended without closing '</Properties>'"
                    ));
                }
                _ => {}
            }
        }
    }

    fn read_property_children(&mut self, saved: &mut SavedProperty) -> Result<()> {
        loop {
            match self.xml.read_event()? {
                Event::Empty(e) => {
                    if let Some(value) = Self::parse_leaf_value(&e)? {
                        saved.value = Some(value);
                    }
                }
                Event::Start(e) => {
                    let name = e.name();
                    if let Some(value) = self.parse_list_value(&e)? {
                        saved.value = Some(value);
                    } else {
                        // Unknown element; skip its whole subtree.
                        self.xml.read_to_end(name)?;
                    }
                }
                Event::End(e) if e.name().as_ref() == b"Property" => return Ok(()),
                Event::Eof => {
                    return Err(malformed_error!(
                        "Property stream ended inside a '<Property>' element"
                    ));
                }
                _ => {}
            }
        }
    }

    fn parse_count(e: &BytesStart<'_>) -> Result<usize> {
        let count = Self::find_attr(e, b"Count")?
            .ok_or_else(|| malformed_error!("'<Properties>' element without 'Count' attribute"))?;
        count
            .parse::<usize>()
            .map_err(|err| malformed_error!("Unreadable property count '{}': {}", count, err))
    }

    fn parse_property_attrs(e: &BytesStart<'_>) -> Result<SavedProperty> {
        let name = Self::find_attr(e, b"name")?
            .ok_or_else(|| malformed_error!("'<Property>' element without 'name' attribute"))?;
        let type_name = Self::find_attr(e, b"type")?.ok_or_else(|| {
            malformed_error!("'<Property>' element '{}' without 'type' attribute", name)
        })?;

        let status = match Self::find_attr(e, b"status")? {
            Some(text) => {
                let bits = text.parse::<u32>().map_err(|err| {
                    malformed_error!("Unreadable status bits '{}' on '{}': {}", text, name, err)
                })?;
                PropertyStatus::from_bits_truncate(bits)
            }
            None => PropertyStatus::empty(),
        };

        let dynamic = if Self::find_attr(e, b"dynamic")?.as_deref() == Some("1") {
            let attrs = match Self::find_attr(e, b"attr")? {
                Some(text) => {
                    let bits = text.parse::<u16>().map_err(|err| {
                        malformed_error!(
                            "Unreadable attribute bits '{}' on '{}': {}",
                            text,
                            name,
                            err
                        )
                    })?;
                    PropertyType::from_bits_truncate(bits)
                }
                None => PropertyType::empty(),
            };
            Some(DynamicMeta {
                group: Self::find_attr(e, b"group")?.unwrap_or_default(),
                doc: Self::find_attr(e, b"doc")?.unwrap_or_default(),
                attrs,
            })
        } else {
            None
        };

        Ok(SavedProperty {
            name,
            type_name,
            status,
            dynamic,
            value: None,
        })
    }

    /// Parses a childless value element; `None` for unknown tags.
    fn parse_leaf_value(e: &BytesStart<'_>) -> Result<Option<PropertyValue>> {
        let value = match e.name().as_ref() {
            b"Bool" => {
                let text = Self::required_attr(e, b"value")?;
                PropertyValue::Bool(text.parse::<bool>().map_err(|err| {
                    malformed_error!("Unreadable boolean '{}': {}", text, err)
                })?)
            }
            b"Integer" => PropertyValue::Integer(Self::parse_number(e, b"value")?),
            b"Float" => PropertyValue::Float(Self::parse_number(e, b"value")?),
            b"String" => PropertyValue::String(Self::required_attr(e, b"value")?),
            b"Vector" => PropertyValue::Vector(Vector3::new(
                Self::parse_number(e, b"x")?,
                Self::parse_number(e, b"y")?,
                Self::parse_number(e, b"z")?,
            )),
            b"Link" => PropertyValue::Link(Self::find_attr(e, b"value")?),
            // An empty list element is a present, zero-length list.
            b"IntegerList" => PropertyValue::IntegerList(Vec::new()),
            b"FloatList" => PropertyValue::FloatList(Vec::new()),
            b"StringList" => PropertyValue::StringList(Vec::new()),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Parses a list value element and its items; `None` for unknown tags.
    fn parse_list_value(&mut self, e: &BytesStart<'_>) -> Result<Option<PropertyValue>> {
        enum ListKind {
            Integer(Vec<i64>),
            Float(Vec<f64>),
            String(Vec<String>),
        }

        let tag = e.name().as_ref().to_vec();
        let mut list = match tag.as_slice() {
            b"IntegerList" => ListKind::Integer(Vec::new()),
            b"FloatList" => ListKind::Float(Vec::new()),
            b"StringList" => ListKind::String(Vec::new()),
            _ => return Ok(None),
        };

        loop {
            match self.xml.read_event()? {
                Event::Empty(item) => match (&mut list, item.name().as_ref()) {
                    (ListKind::Integer(items), b"I") => {
                        items.push(Self::parse_number(&item, b"v")?);
                    }
                    (ListKind::Float(items), b"F") => {
                        items.push(Self::parse_number(&item, b"v")?);
                    }
                    (ListKind::String(items), b"String") => {
                        items.push(Self::required_attr(&item, b"value")?);
                    }
                    _ => {}
                },
                Event::Start(unknown) => {
                    let name = unknown.name();
                    self.xml.read_to_end(name)?;
                }
                Event::End(end) if end.name().as_ref() == tag.as_slice() => break,
                Event::Eof => {
                    return Err(malformed_error!("Property stream ended inside a list value"));
                }
                _ => {}
            }
        }

        Ok(Some(match list {
            ListKind::Integer(items) => PropertyValue::IntegerList(items),
            ListKind::Float(items) => PropertyValue::FloatList(items),
            ListKind::String(items) => PropertyValue::StringList(items),
        }))
    }

    fn parse_number<T: std::str::FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        let text = Self::required_attr(e, key)?;
        text.parse::<T>()
            .map_err(|err| malformed_error!("Unreadable number '{}': {}", text, err))
    }

    fn required_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<String> {
        Self::find_attr(e, key)?.ok_or_else(|| {
            malformed_error!(
                "Element '{}' without '{}' attribute",
                String::from_utf8_lossy(e.name().as_ref()),
                String::from_utf8_lossy(key)
            )
        })
    }

    fn find_attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr =
                attr.map_err(|err| malformed_error!("Invalid attribute in stream: {}", err))?;
            if attr.key.as_ref() == key {
                let value = attr
                    .unescape_value()
                    .map_err(|err| malformed_error!("Invalid attribute value: {}", err))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }
}
