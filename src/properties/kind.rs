use std::fmt;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::properties::{PropertyValue, Vector3};

/// The closed set of value kinds a property can hold.
///
/// Every property, static or dynamic, is strictly typed by one kind. Kinds carry
/// the `Property<Kind>` type names used by the persistence format and by the
/// dynamic-creation API, and provide the default value a freshly constructed
/// property starts at.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum PropertyKind {
    /// Boolean flag
    Bool,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    String,
    /// 3D vector
    Vector,
    /// List of 64-bit signed integers
    IntegerList,
    /// List of 64-bit floating point values
    FloatList,
    /// List of UTF-8 strings
    StringList,
    /// Named reference to another document object, possibly unset
    Link,
}

impl PropertyKind {
    /// Returns the persistence type name of this kind, e.g. `PropertyFloat`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Bool => "PropertyBool",
            PropertyKind::Integer => "PropertyInteger",
            PropertyKind::Float => "PropertyFloat",
            PropertyKind::String => "PropertyString",
            PropertyKind::Vector => "PropertyVector",
            PropertyKind::IntegerList => "PropertyIntegerList",
            PropertyKind::FloatList => "PropertyFloatList",
            PropertyKind::StringList => "PropertyStringList",
            PropertyKind::Link => "PropertyLink",
        }
    }

    /// Returns the short name of this kind, e.g. `Float`.
    ///
    /// Short names double as the value element tags in the persistence format and
    /// as the base for generated dynamic property names.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            PropertyKind::Bool => "Bool",
            PropertyKind::Integer => "Integer",
            PropertyKind::Float => "Float",
            PropertyKind::String => "String",
            PropertyKind::Vector => "Vector",
            PropertyKind::IntegerList => "IntegerList",
            PropertyKind::FloatList => "FloatList",
            PropertyKind::StringList => "StringList",
            PropertyKind::Link => "Link",
        }
    }

    /// Resolves a kind from its persistence type name.
    ///
    /// Returns `None` for names outside the `Property<Kind>` set.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.type_name() == name)
    }

    /// Resolves a kind from its short name, e.g. `Float`.
    #[must_use]
    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.short_name() == name)
    }

    /// Returns the default value a property of this kind starts at.
    #[must_use]
    pub fn default_value(&self) -> PropertyValue {
        match self {
            PropertyKind::Bool => PropertyValue::Bool(false),
            PropertyKind::Integer => PropertyValue::Integer(0),
            PropertyKind::Float => PropertyValue::Float(0.0),
            PropertyKind::String => PropertyValue::String(String::new()),
            PropertyKind::Vector => PropertyValue::Vector(Vector3::default()),
            PropertyKind::IntegerList => PropertyValue::IntegerList(Vec::new()),
            PropertyKind::FloatList => PropertyValue::FloatList(Vec::new()),
            PropertyKind::StringList => PropertyValue::StringList(Vec::new()),
            PropertyKind::Link => PropertyValue::Link(None),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
