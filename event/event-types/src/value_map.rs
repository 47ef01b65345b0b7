//! Per-object values keyed by the identity of the object they describe.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EventError, EventResult};
use crate::{CandidateRef, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct ProductRange {
    product: ProductId,
    offset: usize,
    len: usize,
}

/// Values associated with the members of zero, one or many collections.
///
/// Values are stored in one flat vector; an index sorted by [`ProductId`]
/// records where each source collection's block starts. A map built for a
/// single collection is therefore also a plain array indexed by key.
///
/// # Example
///
/// ```
/// use event_types::{CandidateRef, ProductId, ValueMap};
///
/// let photons = ProductId::new(1, 3);
/// let mut map = ValueMap::new();
/// map.insert(photons, [0.4_f32, 1.2, 0.9]).unwrap();
///
/// assert!(map.contains(photons));
/// assert_eq!(map.id_size(), 1);
/// assert_eq!(*map.get(&CandidateRef::new(photons, 1)).unwrap(), 1.2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValueMap<T> {
    values: Vec<T>,
    ranges: Vec<ProductRange>,
}

/// Wire form of [`ValueMap`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawValueMap<T> {
    values: Vec<T>,
    ranges: Vec<ProductRange>,
}

#[cfg(feature = "serde")]
impl<'de, T> Deserialize<'de> for ValueMap<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawValueMap::deserialize(deserializer)?;
        validate_ranges(&raw.ranges, raw.values.len()).map_err(serde::de::Error::custom)?;
        Ok(Self {
            values: raw.values,
            ranges: raw.ranges,
        })
    }
}

/// Checks that `ranges` is strictly ordered by product and that every block
/// lies inside the `len` stored values.
#[cfg_attr(not(feature = "serde"), allow(dead_code))]
fn validate_ranges(ranges: &[ProductRange], len: usize) -> EventResult<()> {
    if let Some(pair) = ranges.windows(2).find(|w| w[0].product >= w[1].product) {
        return Err(EventError::InvalidValueMap(format!(
            "product {} listed after {}",
            pair[1].product, pair[0].product
        )));
    }
    for range in ranges {
        if !range.offset.checked_add(range.len).is_some_and(|end| end <= len) {
            return Err(EventError::InvalidValueMap(format!(
                "product {} spans {}+{} but only {len} values are stored",
                range.product, range.offset, range.len
            )));
        }
    }
    Ok(())
}

impl<T> Default for ValueMap<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            ranges: Vec::new(),
        }
    }
}

impl<T> ValueMap<T> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the values for every member of one collection, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::DuplicateProduct`] if values for `product` were
    /// already inserted.
    pub fn insert<I>(&mut self, product: ProductId, values: I) -> EventResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let pos = match self.ranges.binary_search_by(|r| r.product.cmp(&product)) {
            Ok(_) => return Err(EventError::DuplicateProduct(product)),
            Err(pos) => pos,
        };
        let offset = self.values.len();
        self.values.extend(values);
        let len = self.values.len() - offset;
        self.ranges.insert(
            pos,
            ProductRange {
                product,
                offset,
                len,
            },
        );
        Ok(())
    }

    fn range(&self, product: ProductId) -> Option<&ProductRange> {
        self.ranges
            .binary_search_by(|r| r.product.cmp(&product))
            .ok()
            .map(|idx| &self.ranges[idx])
    }

    /// Returns true if values were inserted for `product`.
    #[must_use]
    pub fn contains(&self, product: ProductId) -> bool {
        self.range(product).is_some()
    }

    /// Number of source collections backing the map.
    #[must_use]
    pub fn id_size(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the map holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values as one flat slice, in insertion order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Values of one source collection.
    #[must_use]
    pub fn product_values(&self, product: ProductId) -> Option<&[T]> {
        self.range(product)
            .map(|r| &self.values[r.offset..r.offset + r.len])
    }

    /// Source collections in id order.
    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.ranges.iter().map(|r| r.product)
    }

    /// Looks up the value for one object.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NoAssociation`] if the object's collection is not
    /// in the map, and [`EventError::KeyOutOfRange`] if its key exceeds the
    /// collection's size.
    pub fn get(&self, candidate: &CandidateRef) -> EventResult<&T> {
        let range = self
            .range(candidate.id)
            .ok_or_else(|| EventError::no_association(candidate.id, candidate.key))?;
        if candidate.key >= range.len {
            return Err(EventError::key_out_of_range(candidate.key, range.len));
        }
        Ok(&self.values[range.offset + candidate.key])
    }
}
