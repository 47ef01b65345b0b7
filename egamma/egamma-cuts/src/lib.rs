//! Photon identification cuts on precomputed shower-shape values.
//!
//! Cuts read per-candidate quantities from value maps produced upstream. When
//! a map is missing from the event, the value embedded in the candidate is
//! used instead; when a map is present but cannot serve the candidate, the
//! lookup fails loudly.
//!
//! # Value Resolution
//!
//! - [`resolve`] / [`resolve_tiered`] - Tiered lookup of a candidate's value
//! - [`CutThresholds`] - Barrel/endcap thresholds and the `value < T` rule
//!
//! # Cuts
//!
//! - [`CutApplicator`] - Interface every cut implements
//! - [`SMajorCut`] - Upper bound on the shower major-axis spread
//! - [`CutRegistry`] - Builds cuts from parameter sets by `cutName`
//!
//! # Selections
//!
//! - [`IdSelection`] - Named cut flow evaluated per candidate
//! - [`WorkingPoint`] - Out-of-time photon presets
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use egamma_cuts::{CutApplicator, Photon, SMajorCut, WorkingPoint};
//! use event_types::{CandidateRef, ProductId, ValueMap};
//!
//! let photons = ProductId::new(1, 1);
//! let mut smajor = ValueMap::new();
//! smajor.insert(photons, [1.1_f32, 1.6]).unwrap();
//!
//! let mut cut = SMajorCut::new(&WorkingPoint::Medium.smajor_config().unwrap()).unwrap();
//! cut.set_value_map(Some(Arc::new(smajor)));
//!
//! assert!(cut.evaluate(&Photon::new(CandidateRef::new(photons, 0), 0.5)).unwrap());
//! assert!(!cut.evaluate(&Photon::new(CandidateRef::new(photons, 1), 2.0)).unwrap());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod applicator;
mod candidate;
mod error;
mod registry;
mod resolver;
mod selection;
mod smajor;
mod threshold;
mod working_point;

// Re-export resolution types
pub use resolver::{ResolutionTier, Resolved, resolve, resolve_tiered};
pub use threshold::{CutThresholds, EtaRegion};

// Re-export cut types
pub use applicator::{CutApplicator, EventContent};
pub use candidate::{CandidateType, Photon, PhotonCandidate};
pub use registry::{CutFactory, CutRegistry};
pub use smajor::{SMajorCut, SMajorCutConfig};

// Re-export selection types
pub use selection::{CutFlowResult, CutOutcome, IdSelection, IdSelectionConfig, MAX_CUTS};
pub use working_point::{BARREL_CUT_OFF, SMAJOR_MAP, WorkingPoint};

// Re-export error types
pub use error::{CutError, CutResult};
