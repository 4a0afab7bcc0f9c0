use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, RwLock,
};

use bitflags::bitflags;

use crate::{
    properties::{PropertyKind, PropertyValue},
    schema::{PropertySpec, PropertyType},
    Error, Result,
};

/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    /// Runtime status bits of one property instance.
    ///
    /// Status bits are settable per instance, per property, independent of the
    /// declared [`PropertyType`] flags: the declared flags are compile-time defaults,
    /// status bits are the runtime override layer on top of them.
    pub struct PropertyStatus: u32 {
        /// Property value has been modified since construction or the last purge
        const TOUCHED = 0x0001;
        /// Property must not be modified at all
        const IMMUTABLE = 0x0002;
        /// Property is read-only in the editor
        const READ_ONLY = 0x0004;
        /// Property won't appear in the editor
        const HIDDEN = 0x0008;
        /// Property content won't be saved to file, but still saves name, type and status
        const TRANSIENT = 0x0010;
        /// Modified property doesn't touch its parent container
        const OUTPUT = 0x0020;
        /// Modified property doesn't touch its container for recompute
        const NO_RECOMPUTE = 0x0040;
        /// Property won't be saved to file at all
        const NO_PERSIST = 0x0080;
        /// Dynamic property may not be removed from its container
        const LOCK_DYNAMIC = 0x0100;
        /// Property is part of an ongoing bulk operation
        const BUSY = 0x0200;
        /// Property value is copied before an in-place modification
        const COPY_ON_CHANGE = 0x0400;
    }
}

impl PropertyStatus {
    /// Returns the bits that survive a save/restore round-trip.
    ///
    /// [`PropertyStatus::TOUCHED`] and [`PropertyStatus::BUSY`] are session state
    /// and are never persisted.
    #[must_use]
    pub fn persistent(self) -> Self {
        self & !(PropertyStatus::TOUCHED | PropertyStatus::BUSY)
    }
}

/// A live, typed value slot on a container.
///
/// One `Property` exists per container instance and declared (or dynamically
/// attached) attribute. Properties are shared as [`PropertyRc`], so identity
/// comparisons between "the same property" are `Arc::ptr_eq`.
///
/// # Mutation Contract
///
/// [`Property::set_value`] is the low-level assignment; it type-checks but fires
/// no notifications. User-facing mutation should go through
/// [`crate::PropertyContainer::set_property_value`], which wraps the assignment in
/// the three-phase change notification.
pub struct Property {
    /// The kind of value this property holds
    kind: PropertyKind,
    /// Declared type flags, the compile-time defaults for this property
    declared: PropertyType,
    /// The current value
    value: RwLock<PropertyValue>,
    /// Runtime status bits
    status: AtomicU32,
}

impl Property {
    /// Creates a property of the given kind at the kind's default value.
    #[must_use]
    pub fn new(kind: PropertyKind, declared: PropertyType) -> Self {
        Property {
            kind,
            declared,
            value: RwLock::new(kind.default_value()),
            status: AtomicU32::new(0),
        }
    }

    /// Creates a property materializing a schema spec.
    #[must_use]
    pub fn from_spec(spec: &PropertySpec) -> Self {
        Property::new(spec.kind, spec.flags)
    }

    /// Returns the kind of value this property holds.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns the persistence type name of this property's kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Returns the declared type flags of this property.
    #[must_use]
    pub fn declared_type(&self) -> PropertyType {
        self.declared
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn value(&self) -> PropertyValue {
        read_lock!(self.value).clone()
    }

    /// Assigns a new value, returning the previous one.
    ///
    /// Marks the property [`PropertyStatus::TOUCHED`] on success.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if the value's kind differs from the
    /// property's declared kind; assignment never coerces.
    pub fn set_value(&self, value: PropertyValue) -> Result<PropertyValue> {
        if value.kind() != self.kind {
            return Err(Error::TypeMismatch {
                expected: self.kind.type_name(),
                actual: value.kind().type_name(),
            });
        }

        let old = std::mem::replace(&mut *write_lock!(self.value), value);
        self.status
            .fetch_or(PropertyStatus::TOUCHED.bits(), Ordering::Relaxed);
        Ok(old)
    }

    /// Resets the value to the kind's default, without touching status bits.
    pub fn reset_value(&self) {
        *write_lock!(self.value) = self.kind.default_value();
    }

    /// Returns the current status bits.
    #[must_use]
    pub fn status(&self) -> PropertyStatus {
        PropertyStatus::from_bits_truncate(self.status.load(Ordering::Relaxed))
    }

    /// Returns true if the given status bit(s) are all set.
    #[must_use]
    pub fn test_status(&self, bits: PropertyStatus) -> bool {
        self.status().contains(bits)
    }

    /// Sets or clears status bits, returning the previous status.
    pub fn set_status(&self, bits: PropertyStatus, on: bool) -> PropertyStatus {
        let old = if on {
            self.status.fetch_or(bits.bits(), Ordering::Relaxed)
        } else {
            self.status.fetch_and(!bits.bits(), Ordering::Relaxed)
        };
        PropertyStatus::from_bits_truncate(old)
    }

    /// Replaces the whole status word, returning the previous status.
    pub(crate) fn replace_status(&self, bits: PropertyStatus) -> PropertyStatus {
        PropertyStatus::from_bits_truncate(self.status.swap(bits.bits(), Ordering::Relaxed))
    }

    /// Clears the [`PropertyStatus::TOUCHED`] bit.
    pub fn purge_touched(&self) {
        self.set_status(PropertyStatus::TOUCHED, false);
    }

    /// Returns true if this property is read-only.
    ///
    /// The result is the OR of the declared [`PropertyType::READ_ONLY`] flag and
    /// the runtime [`PropertyStatus::READ_ONLY`] bit.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.declared.contains(PropertyType::READ_ONLY)
            || self.test_status(PropertyStatus::READ_ONLY)
    }

    /// Returns true if this property is hidden in the editor.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.declared.contains(PropertyType::HIDDEN) || self.test_status(PropertyStatus::HIDDEN)
    }

    /// Returns true if this property's content is excluded from persistence.
    ///
    /// Transient properties still save their name, type and status.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.declared.contains(PropertyType::TRANSIENT)
            || self.test_status(PropertyStatus::TRANSIENT)
    }

    /// Returns true if this property is skipped entirely by persistence.
    #[must_use]
    pub fn is_no_persist(&self) -> bool {
        self.declared.contains(PropertyType::NO_PERSIST)
            || self.test_status(PropertyStatus::NO_PERSIST)
    }
}
