use std::fmt;

use crate::{Error, Result};

/// A validated logical slot index identifying a static property within its class.
///
/// Slots replace physical member offsets: each statically declared property reports
/// its slot at registration time, and the same slot is valid for every instance of
/// the class. Values are stored as 16-bit signed integers, so a declaration outside
/// `0..=i16::MAX` cannot be registered.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(i16);

impl SlotIndex {
    /// Creates a slot index from a raw value, validating the 16-bit signed range.
    ///
    /// # Arguments
    /// * `raw` - The raw slot value as declared by the class
    ///
    /// # Errors
    /// Returns [`Error::SlotOutOfRange`] if `raw` is negative or exceeds `i16::MAX`.
    pub fn new(raw: i32) -> Result<Self> {
        if raw < 0 || raw > i32::from(i16::MAX) {
            return Err(Error::SlotOutOfRange {
                name: String::new(),
                slot: raw,
            });
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(SlotIndex(raw as i16))
    }

    /// Creates a slot index from an already-validated 16-bit value.
    #[must_use]
    pub const fn from_raw(raw: i16) -> Self {
        SlotIndex(raw)
    }

    /// Returns the raw slot value
    #[must_use]
    pub const fn value(&self) -> i16 {
        self.0
    }
}

impl TryFrom<i32> for SlotIndex {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        SlotIndex::new(raw)
    }
}

impl From<SlotIndex> for i16 {
    fn from(slot: SlotIndex) -> Self {
        slot.0
    }
}

impl fmt::Debug for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotIndex({})", self.0)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
