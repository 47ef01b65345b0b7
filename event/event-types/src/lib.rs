//! Event-data vocabulary shared by the display and selection crates.
//!
//! This crate provides the read-only shapes that reconstructed event data is
//! handed over in:
//!
//! - [`DetId`] - Raw detector-element identifier
//! - [`ProductId`] / [`CandidateRef`] - Identity of a stored object
//! - [`InputTag`] - Name of an event product
//! - [`ValueMap`] - Precomputed per-object values
//! - [`RangeMap`] - Objects grouped by detector element
//! - [`EventStore`] - Typed products of one event
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero display or framework dependencies**.
//! Products are produced upstream and frozen before anything in this
//! workspace reads them.
//!
//! # Example
//!
//! ```
//! use event_types::{CandidateRef, EventId, EventStore, InputTag, ProductId, ValueMap};
//!
//! let photons = ProductId::new(1, 2);
//! let mut shower_shape = ValueMap::new();
//! shower_shape.insert(photons, [0.7_f32, 1.9]).unwrap();
//!
//! let tag = InputTag::parse("photonIDValueMapProducer:phoSMajor").unwrap();
//! let mut event = EventStore::new(EventId::new(1, 1, 1));
//! event.put(tag.clone(), shower_shape);
//!
//! let map = event.get::<ValueMap<f32>>(&tag).unwrap();
//! assert_eq!(*map.get(&CandidateRef::new(photons, 1)).unwrap(), 1.9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod id;
mod range_map;
mod store;
mod tag;
mod value_map;

pub use error::{EventError, EventResult};
pub use id::{CandidateRef, DetId, EventId, ProductId};
pub use range_map::RangeMap;
pub use store::EventStore;
pub use tag::InputTag;
pub use value_map::ValueMap;
