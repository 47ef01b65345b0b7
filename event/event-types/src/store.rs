//! Per-event product store.

use std::any::Any;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use crate::{EventId, InputTag};

type Product = Arc<dyn Any + Send + Sync>;

/// Products of one event, keyed by the tag that names them.
///
/// Products are frozen once put: readers receive shared handles and the
/// store never hands out mutable access. A missing product, or one of a
/// different type than requested, reads as `None`.
///
/// # Example
///
/// ```
/// use event_types::{EventId, EventStore, InputTag, ValueMap};
///
/// let tag = InputTag::label_only("isolation");
/// let mut event = EventStore::new(EventId::new(1, 1, 42));
/// event.put(tag.clone(), ValueMap::<f32>::new());
///
/// assert!(event.get::<ValueMap<f32>>(&tag).is_some());
/// assert!(event.get::<Vec<u8>>(&tag).is_none());
/// ```
#[derive(Debug, Default)]
pub struct EventStore {
    id: EventId,
    products: HashMap<InputTag, Product>,
}

impl EventStore {
    /// Creates an empty store for one event.
    #[must_use]
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            products: HashMap::new(),
        }
    }

    /// The event this store belongs to.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Stores a product, replacing any previous product with the same tag.
    pub fn put<T: Any + Send + Sync>(&mut self, tag: InputTag, product: T) {
        self.put_shared(tag, Arc::new(product));
    }

    /// Stores an already shared product.
    pub fn put_shared<T: Any + Send + Sync>(&mut self, tag: InputTag, product: Arc<T>) {
        self.products.insert(tag, product);
    }

    /// Returns the product named by `tag` if it exists and has type `T`.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, tag: &InputTag) -> Option<Arc<T>> {
        let Some(product) = self.products.get(tag) else {
            debug!(event = %self.id, %tag, "product not found");
            return None;
        };
        let typed = Arc::clone(product).downcast::<T>().ok();
        if typed.is_none() {
            debug!(event = %self.id, %tag, "product has a different type");
        }
        typed
    }

    /// Returns true if a product named by `tag` exists.
    #[must_use]
    pub fn contains(&self, tag: &InputTag) -> bool {
        self.products.contains_key(tag)
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if no products are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{ProductId, ValueMap};

    #[test]
    fn put_and_get_typed() {
        let tag = InputTag::parse("producer:values").unwrap();
        let mut map = ValueMap::new();
        map.insert(ProductId::new(1, 1), [0.5_f32]).unwrap();

        let mut event = EventStore::new(EventId::new(1, 2, 3));
        event.put(tag.clone(), map);

        let read = event.get::<ValueMap<f32>>(&tag).unwrap();
        assert_eq!(read.values(), &[0.5]);
        assert_eq!(event.len(), 1);
        assert_eq!(event.id(), EventId::new(1, 2, 3));
    }

    #[test]
    fn missing_product_is_none() {
        let event = EventStore::default();
        assert!(event.is_empty());
        assert!(event.get::<u32>(&InputTag::label_only("nothing")).is_none());
    }

    #[test]
    fn wrong_type_is_none() {
        let tag = InputTag::label_only("counts");
        let mut event = EventStore::default();
        event.put(tag.clone(), 7_u32);
        assert!(event.contains(&tag));
        assert!(event.get::<u64>(&tag).is_none());
        assert_eq!(*event.get::<u32>(&tag).unwrap(), 7);
    }

    #[test]
    fn put_replaces() {
        let tag = InputTag::label_only("x");
        let mut event = EventStore::default();
        event.put(tag.clone(), 1_i32);
        event.put(tag.clone(), 2_i32);
        assert_eq!(event.len(), 1);
        assert_eq!(*event.get::<i32>(&tag).unwrap(), 2);
    }
}
