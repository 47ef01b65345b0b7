//! Event-display proxies for cathode strip chamber (CSC) segments.
//!
//! This crate turns reconstructed muon-chamber segments into finite line
//! primitives placed in the global detector frame, and groups them into the
//! containers an event display draws.
//!
//! # Projection
//!
//! - [`CscSegment`] - Local position and direction of one segment
//! - [`SegmentProjector`] - Maps a segment to a global [`LineSegment`]
//! - [`local_slopes`] / [`project_segment`] - The underlying free functions
//!
//! # Geometry
//!
//! - [`ChamberTransform`] - Local-to-global affine map of one chamber
//! - [`GeometryProvider`] - Lookup of chamber transforms by detector id
//! - [`GeometryTable`] - In-memory provider, loadable from JSON
//!
//! # Proxy Building
//!
//! - [`CscSegmentProxyBuilder`] - Builds one container per view and item
//! - [`DisplayContext`] - Owns the containers of a display session
//! - [`ElementList`] / [`StraightLineSet`] - The container tree
//!
//! # Example
//!
//! ```
//! use muon_display::{ChamberTransform, CscSegment, SegmentProjector};
//! use nalgebra::{Point3, Vector3};
//!
//! let chamber = ChamberTransform::from_translation(Vector3::new(0.0, 0.0, 700.0));
//! let segment = CscSegment::new([1.0, 2.0, 0.0], [0.0, 0.0, 1.0]);
//!
//! let line = SegmentProjector::default().project(&segment, &chamber);
//! assert_eq!(line.outer, Point3::new(1.0, 2.0, 715.0));
//! assert_eq!(line.inner, Point3::new(1.0, 2.0, 685.0));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod builder;
mod display;
mod error;
mod geometry;
mod params;
mod projector;
mod segment;

// Re-export projection types
pub use projector::{
    DEFAULT_SEGMENT_LENGTH, FALLBACK_SLOPE, LineSegment, MIN_DIRECTION_Z, SegmentProjector,
    local_endpoints, local_slopes, project_segment,
};
pub use segment::{CscSegment, CscSegmentCollection};

// Re-export geometry types
pub use geometry::{ChamberTransform, GeometryProvider, GeometryTable};

// Re-export builder and display types
pub use builder::{
    BuildReport, BuildStatus, CscSegmentProxyBuilder, DisplayProperties, EventItem, LIST_TITLE,
    PURPOSE, Projection,
};
pub use display::{Color, DisplayContext, ElementList, ElementListId, StraightLineSet};
pub use params::ProxyParams;

// Re-export error types
pub use error::{DisplayError, DisplayResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ChamberTransform, CscSegment, CscSegmentCollection, CscSegmentProxyBuilder,
        DisplayContext, DisplayProperties, EventItem, GeometryProvider, GeometryTable,
        Projection, ProxyParams, SegmentProjector,
    };
}
