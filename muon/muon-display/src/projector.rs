//! Projection of local segments to finite global line primitives.
//!
//! A segment is drawn as a straight line through its local position, spanning
//! `[-length, +length]` along the chamber normal (local `z`). The transverse
//! offsets follow the segment's slopes `dx/dz` and `dy/dz`. When the segment
//! is nearly parallel to the chamber plane (`|dz| <= 0.001`) the slopes are
//! replaced by the fixed value `0.001` so the line stays finite; the
//! constant is part of the rendered output and must not be changed.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::ChamberTransform;
use crate::segment::CscSegment;

/// Half-length of a drawn segment along the chamber normal.
pub const DEFAULT_SEGMENT_LENGTH: f64 = 15.0;

/// Minimum `|dz|` for which the true slopes are used.
pub const MIN_DIRECTION_Z: f64 = 0.001;

/// Slope substituted on both transverse axes when `|dz|` is too small.
pub const FALLBACK_SLOPE: f64 = 0.001;

/// A drawn line between two global points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// End at local `z = -length`.
    pub inner: Point3<f64>,
    /// End at local `z = +length`.
    pub outer: Point3<f64>,
}

impl LineSegment {
    /// Creates a line from its two ends.
    #[must_use]
    pub const fn new(inner: Point3<f64>, outer: Point3<f64>) -> Self {
        Self { inner, outer }
    }

    /// Euclidean length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.outer - self.inner).norm()
    }
}

/// Transverse slopes `(dx/dz, dy/dz)` of a local direction.
///
/// # Example
///
/// ```
/// use muon_display::{local_slopes, FALLBACK_SLOPE};
/// use nalgebra::Vector3;
///
/// assert_eq!(local_slopes(&Vector3::new(0.5, 0.25, 1.0)), (0.5, 0.25));
/// assert_eq!(
///     local_slopes(&Vector3::new(0.5, 0.0, 0.0005)),
///     (FALLBACK_SLOPE, FALLBACK_SLOPE)
/// );
/// ```
#[must_use]
pub fn local_slopes(direction: &Vector3<f64>) -> (f64, f64) {
    if direction.z.abs() > MIN_DIRECTION_Z {
        (direction.x / direction.z, direction.y / direction.z)
    } else {
        (FALLBACK_SLOPE, FALLBACK_SLOPE)
    }
}

/// Local `(inner, outer)` end points of a segment drawn with half-length
/// `length`.
#[must_use]
pub fn local_endpoints(segment: &CscSegment, length: f64) -> (Point3<f64>, Point3<f64>) {
    let (slope_x, slope_y) = local_slopes(&segment.local_direction);
    let pos = &segment.local_position;
    let outer = Point3::new(pos.x + length * slope_x, pos.y + length * slope_y, length);
    let inner = Point3::new(pos.x - length * slope_x, pos.y - length * slope_y, -length);
    (inner, outer)
}

/// Global `(inner, outer)` end points of a segment.
///
/// # Example
///
/// ```
/// use muon_display::{project_segment, ChamberTransform, CscSegment};
/// use nalgebra::Point3;
///
/// let seg = CscSegment::new([1.0, 2.0, 0.0], [0.0, 0.0, 1.0]);
/// let (inner, outer) = project_segment(&seg, &ChamberTransform::identity(), 15.0);
/// assert_eq!(outer, Point3::new(1.0, 2.0, 15.0));
/// assert_eq!(inner, Point3::new(1.0, 2.0, -15.0));
/// ```
#[must_use]
pub fn project_segment(
    segment: &CscSegment,
    transform: &ChamberTransform,
    length: f64,
) -> (Point3<f64>, Point3<f64>) {
    let (inner, outer) = local_endpoints(segment, length);
    (transform.local_to_global(&inner), transform.local_to_global(&outer))
}

/// Projects segments with a fixed half-length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjector {
    length: f64,
}

impl Default for SegmentProjector {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_LENGTH)
    }
}

impl SegmentProjector {
    /// Creates a projector drawing segments with half-length `length`.
    #[must_use]
    pub const fn new(length: f64) -> Self {
        Self { length }
    }

    /// Configured half-length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Projects one segment into a global line.
    #[must_use]
    pub fn project(&self, segment: &CscSegment, transform: &ChamberTransform) -> LineSegment {
        let (inner, outer) = project_segment(segment, transform, self.length);
        LineSegment::new(inner, outer)
    }

    /// Projects every segment of one chamber, preserving order.
    #[must_use]
    pub fn project_all(&self, segments: &[CscSegment], transform: &ChamberTransform) -> Vec<LineSegment> {
        segments
            .iter()
            .map(|segment| self.project(segment, transform))
            .collect()
    }
}
