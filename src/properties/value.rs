use std::fmt;

use crate::properties::PropertyKind;

/// A 3D vector value.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The payload of a property: one value of its declared kind.
///
/// Assignment never coerces between kinds; the `as_*` projections below offer the
/// conversions that are safe to perform on read.
#[derive(Clone, PartialEq, Debug)]
pub enum PropertyValue {
    /// Boolean flag
    Bool(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// 3D vector
    Vector(Vector3),
    /// List of 64-bit signed integers
    IntegerList(Vec<i64>),
    /// List of 64-bit floating point values
    FloatList(Vec<f64>),
    /// List of UTF-8 strings
    StringList(Vec<String>),
    /// Named reference to another document object; `None` while unlinked
    Link(Option<String>),
}

impl PropertyValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Vector(_) => PropertyKind::Vector,
            PropertyValue::IntegerList(_) => PropertyKind::IntegerList,
            PropertyValue::FloatList(_) => PropertyKind::FloatList,
            PropertyValue::StringList(_) => PropertyKind::StringList,
            PropertyValue::Link(_) => PropertyKind::Link,
        }
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            PropertyValue::Integer(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Bool(value) => Some(i64::from(*value)),
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(value) => {
                #[allow(clippy::cast_precision_loss)]
                Some(*value as f64)
            }
            PropertyValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to view as a string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            PropertyValue::Link(Some(target)) => Some(target),
            _ => None,
        }
    }

    /// Try to convert to a vector value
    #[must_use]
    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            PropertyValue::Vector(value) => Some(*value),
            _ => None,
        }
    }
}
