//! Cut on the major axis of the photon shower (`sMajor`).
//!
//! Out-of-time photons deposit elongated showers; an upper bound on the
//! shower's major-axis spread rejects them. The per-candidate value comes
//! from a precomputed value map, or from the candidate itself when the map
//! is not in the event.

use std::sync::Arc;

use event_types::{EventStore, InputTag, ValueMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::applicator::{CutApplicator, EventContent};
use crate::candidate::{CandidateType, PhotonCandidate};
use crate::error::{CutError, CutResult};
use crate::resolver::resolve;
use crate::threshold::CutThresholds;

/// Content name of the shower-shape value map.
const SMAJ: &str = "sMaj";

/// Parameter set of an [`SMajorCut`].
///
/// Field names follow the configuration files the cut is read from.
///
/// # Example
///
/// ```
/// use egamma_cuts::SMajorCutConfig;
///
/// let config: SMajorCutConfig = serde_json::from_str(r#"{
///     "cutName": "PhoSMajCut",
///     "C1_EB": 1.3,
///     "C1_EE": 1.3,
///     "barrelCutOff": 1.479,
///     "sMajMap": "photonIDValueMapProducer:phoSMajor"
/// }"#).unwrap();
/// assert_eq!(config.smaj_map.instance(), "phoSMajor");
/// assert!(!config.is_ignored);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SMajorCutConfig {
    /// Registered cut name.
    #[serde(rename = "cutName", default = "default_cut_name")]
    pub cut_name: String,

    /// Barrel threshold.
    #[serde(rename = "C1_EB")]
    pub c1_eb: f64,

    /// Endcap threshold.
    #[serde(rename = "C1_EE")]
    pub c1_ee: f64,

    /// `|eta|` separating barrel from endcap.
    #[serde(rename = "barrelCutOff")]
    pub barrel_cut_off: f64,

    /// Tag of the precomputed value map. Its instance label doubles as the
    /// name of the value embedded in candidates.
    #[serde(rename = "sMajMap")]
    pub smaj_map: InputTag,

    /// Whether a cut flow should count this cut as passed regardless.
    #[serde(rename = "isIgnored", default)]
    pub is_ignored: bool,
}

fn default_cut_name() -> String {
    SMajorCut::NAME.to_string()
}

/// Upper bound on a photon's shower major-axis spread.
#[derive(Debug, Clone)]
pub struct SMajorCut {
    thresholds: CutThresholds,
    content: EventContent,
    fallback_name: String,
    smaj_map: Option<Arc<ValueMap<f32>>>,
}

impl SMajorCut {
    /// Name the cut is registered under.
    pub const NAME: &'static str = "PhoSMajCut";

    /// Creates the cut from its parameter set.
    ///
    /// Thresholds are narrowed to single precision once, here.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::InvalidConfig`] if a threshold or the boundary is
    /// NaN, or if `cutName` is not [`NAME`](Self::NAME).
    pub fn new(config: &SMajorCutConfig) -> CutResult<Self> {
        if config.cut_name != Self::NAME {
            return Err(CutError::invalid_config(format!(
                "expected cutName {:?}, got {:?}",
                Self::NAME,
                config.cut_name
            )));
        }
        if config.c1_eb.is_nan() || config.c1_ee.is_nan() || config.barrel_cut_off.is_nan() {
            return Err(CutError::invalid_config("sMajor thresholds must not be NaN"));
        }

        #[allow(clippy::cast_possible_truncation)]
        let thresholds = CutThresholds::new(
            config.c1_eb as f32,
            config.c1_ee as f32,
            config.barrel_cut_off as f32,
        );
        let mut content = EventContent::new();
        content.insert(SMAJ, config.smaj_map.clone());

        Ok(Self {
            thresholds,
            content,
            fallback_name: config.smaj_map.instance().to_string(),
            smaj_map: None,
        })
    }

    /// Creates the cut from a JSON parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::Config`] if the parameter set does not
    /// deserialize, or any error of [`new`](Self::new).
    pub fn from_value(config: &serde_json::Value) -> CutResult<Self> {
        let config = SMajorCutConfig::deserialize(config)?;
        Self::new(&config)
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &CutThresholds {
        &self.thresholds
    }

    /// Name of the value read from candidates when the map is absent.
    #[must_use]
    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }

    /// The value map for the current event, if it was found.
    #[must_use]
    pub fn value_map(&self) -> Option<&ValueMap<f32>> {
        self.smaj_map.as_deref()
    }

    /// Sets the value map directly, bypassing the event store.
    pub fn set_value_map(&mut self, map: Option<Arc<ValueMap<f32>>>) {
        self.smaj_map = map;
    }

    fn resolve(&self, candidate: &dyn PhotonCandidate) -> CutResult<f32> {
        resolve(&candidate.candidate_ref(), self.value_map(), || {
            candidate
                .user_float(&self.fallback_name)
                .ok_or_else(|| CutError::missing_user_float(&self.fallback_name))
        })
    }
}

impl CutApplicator for SMajorCut {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn candidate_type(&self) -> CandidateType {
        CandidateType::Photon
    }

    fn consumes(&self) -> Vec<&InputTag> {
        self.content.tags().collect()
    }

    fn get_event_content(&mut self, event: &EventStore) {
        self.smaj_map = self.content.fetch::<ValueMap<f32>>(event, SMAJ);
        debug!(
            event = %event.id(),
            found = self.smaj_map.is_some(),
            "sMajor value map"
        );
    }

    fn evaluate(&self, candidate: &dyn PhotonCandidate) -> CutResult<bool> {
        let value = self.resolve(candidate)?;
        Ok(self.thresholds.passes(value, candidate.super_cluster_eta()))
    }

    fn value(&self, candidate: &dyn PhotonCandidate) -> CutResult<f64> {
        self.resolve(candidate).map(f64::from)
    }
}
