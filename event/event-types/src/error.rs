//! Error types for event-data access.

use thiserror::Error;

use crate::ProductId;

/// Result type for event-data operations.
pub type EventResult<T> = Result<T, EventError>;

/// Errors that can occur while reading or building event products.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The value map holds no values for the referenced collection.
    #[error("value map has no association for product {product} (key {key})")]
    NoAssociation {
        /// Collection the candidate points into.
        product: ProductId,
        /// Offset of the candidate within that collection.
        key: usize,
    },

    /// The key points past the end of the associated values.
    #[error("key {key} out of range for {len} associated values")]
    KeyOutOfRange {
        /// Requested offset.
        key: usize,
        /// Number of values available.
        len: usize,
    },

    /// Values for this collection were already inserted.
    #[error("duplicate product {0} in value map")]
    DuplicateProduct(ProductId),

    /// A deserialized value map carries an inconsistent collection index.
    #[error("invalid value map index: {0}")]
    InvalidValueMap(String),

    /// An input tag string could not be parsed.
    #[error("invalid input tag: {0:?}")]
    InvalidInputTag(String),
}

impl EventError {
    /// Creates a missing-association error.
    #[must_use]
    pub const fn no_association(product: ProductId, key: usize) -> Self {
        Self::NoAssociation { product, key }
    }

    /// Creates a key-out-of-range error.
    #[must_use]
    pub const fn key_out_of_range(key: usize, len: usize) -> Self {
        Self::KeyOutOfRange { key, len }
    }

    /// Returns true for errors raised by a failed map lookup.
    #[must_use]
    pub const fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::NoAssociation { .. } | Self::KeyOutOfRange { .. })
    }
}
