//! Eta-dependent cut thresholds.

use serde::{Deserialize, Serialize};

/// Calorimeter region a candidate falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtaRegion {
    /// `|eta| < boundary`.
    Barrel,
    /// `|eta| >= boundary`, including the boundary itself.
    Endcap,
}

/// Upper bounds for the barrel and the endcaps, and where they meet.
///
/// Thresholds are single precision; comparisons against the boundary are done
/// in double precision after widening it.
///
/// # Example
///
/// ```
/// use egamma_cuts::{CutThresholds, EtaRegion};
///
/// let thresholds = CutThresholds::new(0.8, 0.5, 1.5);
/// assert_eq!(thresholds.region(-1.0), EtaRegion::Barrel);
/// assert_eq!(thresholds.region(1.5), EtaRegion::Endcap);
/// assert!(thresholds.passes(0.7, 1.0));
/// assert!(!thresholds.passes(0.7, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutThresholds {
    /// Threshold applied in the barrel.
    pub barrel: f32,
    /// Threshold applied in the endcaps.
    pub endcap: f32,
    /// `|eta|` at which the endcap threshold takes over.
    pub barrel_cut_off: f32,
}

impl CutThresholds {
    /// Creates a threshold pair.
    #[must_use]
    pub const fn new(barrel: f32, endcap: f32, barrel_cut_off: f32) -> Self {
        Self {
            barrel,
            endcap,
            barrel_cut_off,
        }
    }

    /// Region of a candidate with supercluster pseudorapidity `eta`.
    ///
    /// A NaN `eta` is never inside the barrel.
    #[must_use]
    pub fn region(&self, eta: f64) -> EtaRegion {
        if eta.abs() < f64::from(self.barrel_cut_off) {
            EtaRegion::Barrel
        } else {
            EtaRegion::Endcap
        }
    }

    /// Threshold applying at `eta`.
    #[must_use]
    pub fn threshold(&self, eta: f64) -> f32 {
        match self.region(eta) {
            EtaRegion::Barrel => self.barrel,
            EtaRegion::Endcap => self.endcap,
        }
    }

    /// Returns true if `value` is strictly below the threshold at `eta`.
    ///
    /// A NaN `value` never passes.
    #[must_use]
    pub fn passes(&self, value: f32, eta: f64) -> bool {
        value < self.threshold(eta)
    }
}
