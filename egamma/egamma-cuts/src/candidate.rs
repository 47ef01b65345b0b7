//! Candidates that cuts are evaluated on.

use std::fmt;

use event_types::CandidateRef;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Kind of physics object a cut applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateType {
    /// Reconstructed electrons.
    Electron,
    /// Reconstructed muons.
    Muon,
    /// Reconstructed photons.
    Photon,
}

impl fmt::Display for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Electron => "electron",
            Self::Muon => "muon",
            Self::Photon => "photon",
        };
        f.write_str(name)
    }
}

/// Read-only view of a photon candidate.
///
/// Implemented by the reconstruction's photon type; [`Photon`] is a plain
/// in-memory implementation.
pub trait PhotonCandidate {
    /// Identity of the candidate within its source collection.
    ///
    /// Standalone candidates carry the null product id.
    fn candidate_ref(&self) -> CandidateRef;

    /// Pseudorapidity of the candidate's supercluster.
    fn super_cluster_eta(&self) -> f64;

    /// Value embedded in the candidate under `name`, if any.
    fn user_float(&self, name: &str) -> Option<f32>;
}

/// A photon candidate with its supercluster position and embedded values.
///
/// # Example
///
/// ```
/// use egamma_cuts::{Photon, PhotonCandidate};
/// use event_types::CandidateRef;
///
/// let photon = Photon::new(CandidateRef::standalone(0), -1.1).with_user_float("phoSMajor", 0.9);
/// assert_eq!(photon.user_float("phoSMajor"), Some(0.9));
/// assert_eq!(photon.user_float("phoSMinor"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Photon {
    reference: CandidateRef,
    super_cluster_eta: f64,
    user_floats: HashMap<String, f32>,
}

impl Photon {
    /// Creates a photon with no embedded values.
    #[must_use]
    pub fn new(reference: CandidateRef, super_cluster_eta: f64) -> Self {
        Self {
            reference,
            super_cluster_eta,
            user_floats: HashMap::new(),
        }
    }

    /// Returns this photon with one more embedded value.
    #[must_use]
    pub fn with_user_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.set_user_float(name, value);
        self
    }

    /// Embeds a value, replacing any previous value of the same name.
    pub fn set_user_float(&mut self, name: impl Into<String>, value: f32) {
        self.user_floats.insert(name.into(), value);
    }
}

impl PhotonCandidate for Photon {
    fn candidate_ref(&self) -> CandidateRef {
        self.reference
    }

    fn super_cluster_eta(&self) -> f64 {
        self.super_cluster_eta
    }

    fn user_float(&self, name: &str) -> Option<f32> {
        self.user_floats.get(name).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use event_types::ProductId;

    #[test]
    fn photon_accessors() {
        let reference = CandidateRef::new(ProductId::new(1, 5), 3);
        let photon = Photon::new(reference, 2.1);
        assert_eq!(photon.candidate_ref(), reference);
        assert_eq!(photon.super_cluster_eta(), 2.1);
        assert!(photon.user_float("anything").is_none());
    }

    #[test]
    fn user_float_is_replaced() {
        let mut photon = Photon::default().with_user_float("x", 1.0);
        photon.set_user_float("x", 2.0);
        assert_eq!(photon.user_float("x"), Some(2.0));
    }

    #[test]
    fn candidate_type_display() {
        assert_eq!(CandidateType::Photon.to_string(), "photon");
    }
}
