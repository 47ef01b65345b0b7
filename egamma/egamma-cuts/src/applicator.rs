//! The interface every cut implements, and its event-content helper.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use event_types::{EventStore, InputTag};

use crate::candidate::{CandidateType, PhotonCandidate};
use crate::error::CutResult;

/// A configured cut applied to photon candidates.
///
/// The event loop calls [`get_event_content`](Self::get_event_content) once
/// per event, then [`evaluate`](Self::evaluate) and [`value`](Self::value)
/// any number of times, possibly from several threads.
pub trait CutApplicator: Send + Sync + fmt::Debug {
    /// Registered name of the cut, as it appears in `cutName`.
    fn name(&self) -> &str;

    /// Kind of candidate the cut applies to.
    fn candidate_type(&self) -> CandidateType;

    /// Event products the cut reads.
    fn consumes(&self) -> Vec<&InputTag>;

    /// Fetches this event's products; missing products are recorded as
    /// absent, never as an error.
    fn get_event_content(&mut self, event: &EventStore);

    /// Returns true if the candidate passes.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate's value cannot be resolved.
    fn evaluate(&self, candidate: &dyn PhotonCandidate) -> CutResult<bool>;

    /// The quantity the cut is applied to, without thresholding.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate's value cannot be resolved.
    fn value(&self, candidate: &dyn PhotonCandidate) -> CutResult<f64>;
}

/// Event products a cut reads, keyed by a short content name.
///
/// # Example
///
/// ```
/// use event_types::{EventId, EventStore, InputTag, ValueMap};
/// use egamma_cuts::EventContent;
///
/// let tag = InputTag::parse("photonIDValueMapProducer:phoSMajor").unwrap();
/// let mut content = EventContent::new();
/// content.insert("sMaj", tag.clone());
///
/// let mut event = EventStore::new(EventId::new(1, 1, 1));
/// event.put(tag, ValueMap::<f32>::new());
/// assert!(content.fetch::<ValueMap<f32>>(&event, "sMaj").is_some());
/// assert!(content.fetch::<ValueMap<f32>>(&event, "sMin").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContent {
    tags: BTreeMap<String, InputTag>,
}

impl EventContent {
    /// Creates an empty content table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a content name with the tag it is read from.
    pub fn insert(&mut self, key: impl Into<String>, tag: InputTag) -> Option<InputTag> {
        self.tags.insert(key.into(), tag)
    }

    /// Tag registered under `key`.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&InputTag> {
        self.tags.get(key)
    }

    /// All registered tags, ordered by content name.
    pub fn tags(&self) -> impl Iterator<Item = &InputTag> + '_ {
        self.tags.values()
    }

    /// Number of registered content names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Reads the product registered under `key` from `event`.
    ///
    /// Returns `None` if `key` is unknown or the event has no product of type
    /// `T` under its tag.
    #[must_use]
    pub fn fetch<T: Any + Send + Sync>(&self, event: &EventStore, key: &str) -> Option<Arc<T>> {
        self.tag(key).and_then(|tag| event.get::<T>(tag))
    }
}
