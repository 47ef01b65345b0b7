//! Reconstructed muon-chamber segments.

use event_types::{DetId, RangeMap};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Straight track fragment reconstructed inside one cathode strip chamber.
///
/// Position and direction are in the chamber's local frame, where `z` is
/// normal to the chamber layers. The direction need not be normalized; only
/// the ratios of its components are used.
///
/// # Example
///
/// ```
/// use muon_display::CscSegment;
///
/// let seg = CscSegment::new([1.0, 2.0, 0.0], [0.0, 0.0, 1.0]);
/// assert!((seg.local_position.y - 2.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CscSegment {
    /// Segment position in chamber-local coordinates.
    pub local_position: Point3<f64>,
    /// Segment direction in chamber-local coordinates.
    pub local_direction: Vector3<f64>,
}

impl CscSegment {
    /// Creates a segment from local position and direction components.
    #[must_use]
    pub fn new(position: [f64; 3], direction: [f64; 3]) -> Self {
        Self {
            local_position: Point3::from(position),
            local_direction: Vector3::from(direction),
        }
    }
}

/// Segments of one event grouped by chamber, iterated in chamber id order.
pub type CscSegmentCollection = RangeMap<DetId, CscSegment>;
