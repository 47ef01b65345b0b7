//! Objects grouped by an ordered key.

use std::collections::BTreeMap;

/// Collection of objects grouped by an ordered id, such as reconstructed hits
/// grouped by the detector element they were found in.
///
/// Groups iterate in ascending id order. Putting values for an id that is
/// already present appends to its group.
///
/// # Example
///
/// ```
/// use event_types::{DetId, RangeMap};
///
/// let mut map = RangeMap::new();
/// map.put(DetId::new(7), ["b"]);
/// map.put(DetId::new(3), ["a", "c"]);
///
/// let ids: Vec<_> = map.ids().collect();
/// assert_eq!(ids, vec![DetId::new(3), DetId::new(7)]);
/// assert_eq!(map.get(DetId::new(3)), &["a", "c"]);
/// assert_eq!(map.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMap<K, V> {
    groups: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> Default for RangeMap<K, V> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy, V> RangeMap<K, V> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends values to the group of `id`.
    pub fn put<I>(&mut self, id: K, values: I)
    where
        I: IntoIterator<Item = V>,
    {
        self.groups.entry(id).or_default().extend(values);
    }

    /// Ids with at least one stored group, ascending.
    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.groups.keys().copied()
    }

    /// Values stored under `id`; empty when the id is unknown.
    #[must_use]
    pub fn get(&self, id: K) -> &[V] {
        self.groups.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates `(id, values)` groups in id order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &[V])> + '_ {
        self.groups.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn id_size(&self) -> usize {
        self.groups.len()
    }

    /// Total number of values across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}

impl<K: Ord + Copy, V> FromIterator<(K, V)> for RangeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, value) in iter {
            map.put(id, [value]);
        }
        map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::DetId;

    #[test]
    fn empty_collection() {
        let map: RangeMap<DetId, u8> = RangeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.id_size(), 0);
        assert!(map.get(DetId::new(1)).is_empty());
    }

    #[test]
    fn put_appends_to_existing_group() {
        let mut map = RangeMap::new();
        map.put(DetId::new(5), [1, 2]);
        map.put(DetId::new(5), [3]);
        assert_eq!(map.get(DetId::new(5)), &[1, 2, 3]);
        assert_eq!(map.id_size(), 1);
    }

    #[test]
    fn from_iter_groups_by_id() {
        let map: RangeMap<DetId, char> = [
            (DetId::new(9), 'x'),
            (DetId::new(1), 'y'),
            (DetId::new(9), 'z'),
        ]
        .into_iter()
        .collect();
        let groups: Vec<_> = map.iter().map(|(id, v)| (id.raw(), v.len())).collect();
        assert_eq!(groups, vec![(1, 1), (9, 2)]);
    }
}
