//! Identifiers for detector elements, stored collections and their members.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw identifier of a detector element (a chamber, a crystal, ...).
///
/// Ordering follows the raw value, which is also the iteration order of
/// collections grouped by detector element.
///
/// # Example
///
/// ```
/// use event_types::DetId;
///
/// let id = DetId::new(0x2000_1234);
/// assert_eq!(id.raw(), 0x2000_1234);
/// assert!(DetId::new(1) < DetId::new(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DetId(u32);

impl DetId {
    /// Wraps a raw detector id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DetId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identity of a stored collection: the producing process and the product
/// index within it.
///
/// The all-zero value is the null sentinel carried by objects that were
/// built standalone instead of being read from a stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductId {
    /// Index of the process that produced the collection (1-based).
    pub process_index: u16,
    /// Index of the collection within that process (1-based).
    pub product_index: u16,
}

impl ProductId {
    /// The unset sentinel.
    pub const NULL: Self = Self {
        process_index: 0,
        product_index: 0,
    };

    /// Creates a product id.
    #[must_use]
    pub const fn new(process_index: u16, product_index: u16) -> Self {
        Self {
            process_index,
            product_index,
        }
    }

    /// Returns true for the unset sentinel.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.process_index == 0 && self.product_index == 0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.process_index, self.product_index)
    }
}

/// Reference to one object: the collection it lives in and its offset.
///
/// # Example
///
/// ```
/// use event_types::{CandidateRef, ProductId};
///
/// let stored = CandidateRef::new(ProductId::new(1, 4), 2);
/// assert!(!stored.is_standalone());
///
/// let spoofed = CandidateRef::standalone(2);
/// assert!(spoofed.id.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateRef {
    /// Collection the object belongs to.
    pub id: ProductId,
    /// Offset of the object within the collection.
    pub key: usize,
}

impl CandidateRef {
    /// Creates a reference into a stored collection.
    #[must_use]
    pub const fn new(id: ProductId, key: usize) -> Self {
        Self { id, key }
    }

    /// Creates a reference for an object not backed by a stored collection.
    #[must_use]
    pub const fn standalone(key: usize) -> Self {
        Self {
            id: ProductId::NULL,
            key,
        }
    }

    /// Returns true when the collection id is the null sentinel.
    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        self.id.is_null()
    }
}

impl fmt::Display for CandidateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.id, self.key)
    }
}

/// Run / luminosity-block / event triple identifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventId {
    /// Run number.
    pub run: u32,
    /// Luminosity block.
    pub lumi: u32,
    /// Event number.
    pub event: u64,
}

impl EventId {
    /// Creates an event id.
    #[must_use]
    pub const fn new(run: u32, lumi: u32, event: u64) -> Self {
        Self { run, lumi, event }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.run, self.lumi, self.event)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn null_product_id() {
        assert!(ProductId::NULL.is_null());
        assert!(ProductId::default().is_null());
        assert!(!ProductId::new(0, 1).is_null());
        assert!(!ProductId::new(1, 0).is_null());
    }

    #[test]
    fn det_id_ordering() {
        let mut ids = vec![DetId::new(30), DetId::new(2), DetId::new(11)];
        ids.sort();
        assert_eq!(ids, vec![DetId::new(2), DetId::new(11), DetId::new(30)]);
    }

    #[test]
    fn candidate_ref_display() {
        let r = CandidateRef::new(ProductId::new(3, 9), 5);
        assert_eq!(r.to_string(), "3:9#5");
        assert!(CandidateRef::standalone(0).is_standalone());
    }

    #[test]
    fn event_id_display() {
        assert_eq!(EventId::new(1, 2, 3).to_string(), "1:2:3");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn det_id_is_transparent() {
        let json = serde_json::to_string(&DetId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
