//! Identification selections: ordered cut flows with a name.

use event_types::{EventStore, InputTag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::applicator::CutApplicator;
use crate::candidate::{CandidateType, PhotonCandidate};
use crate::error::{CutError, CutResult};
use crate::registry::CutRegistry;

/// Largest cut flow whose outcome fits the result bitmap.
pub const MAX_CUTS: usize = 64;

/// Configuration of an identification selection.
///
/// Each entry of `cutFlow` is a cut parameter set, dispatched on its
/// `cutName` through a [`CutRegistry`]. An entry with `"isIgnored": true`
/// is still evaluated but never fails the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdSelectionConfig {
    /// Versioned name of the selection.
    #[serde(rename = "idName")]
    pub id_name: String,

    /// Cut parameter sets, in evaluation order.
    #[serde(rename = "cutFlow")]
    pub cut_flow: Vec<Value>,

    /// Whether the selection is officially approved.
    #[serde(rename = "isPOGApproved", default)]
    pub is_pog_approved: bool,
}

#[derive(Debug)]
struct FlowEntry {
    cut: Box<dyn CutApplicator>,
    ignored: bool,
}

/// A named, ordered flow of photon cuts.
///
/// # Example
///
/// ```
/// use egamma_cuts::{CutRegistry, IdSelection, Photon};
/// use event_types::CandidateRef;
///
/// let json = r#"{
///     "idName": "demo",
///     "cutFlow": [{
///         "cutName": "PhoSMajCut",
///         "C1_EB": 1.3, "C1_EE": 1.3, "barrelCutOff": 1.479,
///         "sMajMap": "photonIDValueMapProducer:phoSMajor"
///     }]
/// }"#;
/// let selection = IdSelection::from_json(json, &CutRegistry::with_builtin()).unwrap();
///
/// let photon = Photon::new(CandidateRef::standalone(0), 0.4).with_user_float("phoSMajor", 0.9);
/// let result = selection.evaluate(&photon).unwrap();
/// assert!(result.passed());
/// assert_eq!(result.bitmap(), 0b1);
/// ```
#[derive(Debug)]
pub struct IdSelection {
    name: String,
    is_pog_approved: bool,
    cuts: Vec<FlowEntry>,
}

impl IdSelection {
    /// Builds every cut of the flow.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::InvalidConfig`] if the flow is longer than
    /// [`MAX_CUTS`] or contains a cut that does not apply to photons, and any
    /// error the registry returns for an entry.
    pub fn from_config(config: &IdSelectionConfig, registry: &CutRegistry) -> CutResult<Self> {
        if config.cut_flow.len() > MAX_CUTS {
            return Err(CutError::invalid_config(format!(
                "{} has {} cuts, at most {MAX_CUTS} are supported",
                config.id_name,
                config.cut_flow.len()
            )));
        }

        let cuts = config
            .cut_flow
            .iter()
            .map(|params| {
                let cut = registry.create(params)?;
                if cut.candidate_type() != CandidateType::Photon {
                    return Err(CutError::invalid_config(format!(
                        "cut {} applies to {}, not photons",
                        cut.name(),
                        cut.candidate_type()
                    )));
                }
                let ignored = params
                    .get("isIgnored")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Ok(FlowEntry { cut, ignored })
            })
            .collect::<CutResult<Vec<_>>>()?;

        info!(
            id = %config.id_name,
            cuts = cuts.len(),
            approved = config.is_pog_approved,
            "configured photon selection"
        );
        Ok(Self {
            name: config.id_name.clone(),
            is_pog_approved: config.is_pog_approved,
            cuts,
        })
    }

    /// Parses a configuration and builds the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::Config`] for malformed JSON, or any error of
    /// [`from_config`](Self::from_config).
    pub fn from_json(json: &str, registry: &CutRegistry) -> CutResult<Self> {
        let config: IdSelectionConfig = serde_json::from_str(json)?;
        Self::from_config(&config, registry)
    }

    /// Versioned name of the selection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the selection is officially approved.
    #[must_use]
    pub const fn is_pog_approved(&self) -> bool {
        self.is_pog_approved
    }

    /// Number of cuts in the flow.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Returns true if the flow has no cuts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Cut names in flow order.
    pub fn cut_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cuts.iter().map(|entry| entry.cut.name())
    }

    /// Every event product the flow reads.
    #[must_use]
    pub fn consumes(&self) -> Vec<&InputTag> {
        let mut tags: Vec<&InputTag> = self.cuts.iter().flat_map(|entry| entry.cut.consumes()).collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    /// Refreshes every cut's view of the current event.
    pub fn get_event_content(&mut self, event: &EventStore) {
        for entry in &mut self.cuts {
            entry.cut.get_event_content(event);
        }
        debug!(id = %self.name, event = %event.id(), "loaded event content");
    }

    /// Evaluates every cut on a candidate.
    ///
    /// # Errors
    ///
    /// Returns the first error any cut raises; later cuts are not evaluated.
    pub fn evaluate(&self, candidate: &dyn PhotonCandidate) -> CutResult<CutFlowResult> {
        let outcomes = self
            .cuts
            .iter()
            .map(|entry| {
                Ok(CutOutcome {
                    name: entry.cut.name().to_string(),
                    passed: entry.cut.evaluate(candidate)?,
                    value: entry.cut.value(candidate)?,
                    ignored: entry.ignored,
                })
            })
            .collect::<CutResult<Vec<_>>>()?;
        Ok(CutFlowResult {
            id_name: self.name.clone(),
            outcomes,
        })
    }
}

/// Outcome of one cut on one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutOutcome {
    /// Cut name.
    pub name: String,
    /// Whether the candidate passed the cut itself.
    pub passed: bool,
    /// The quantity the cut was applied to.
    pub value: f64,
    /// Whether the cut is ignored by the flow.
    pub ignored: bool,
}

/// Outcomes of a whole cut flow on one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutFlowResult {
    /// Name of the selection that produced the result.
    pub id_name: String,
    /// Per-cut outcomes, in flow order.
    pub outcomes: Vec<CutOutcome>,
}

impl CutFlowResult {
    /// Returns true if every cut that is not ignored passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed || o.ignored)
    }

    /// Bit `i` is set if cut `i` passed, ignoring the ignore flags.
    ///
    /// Outcomes past the first [`MAX_CUTS`] have no bit and are left out.
    #[must_use]
    pub fn bitmap(&self) -> u64 {
        self.outcomes
            .iter()
            .take(MAX_CUTS)
            .enumerate()
            .filter(|(_, o)| o.passed)
            .filter_map(|(i, _)| u32::try_from(i).ok().and_then(|i| 1_u64.checked_shl(i)))
            .fold(0, |bits, bit| bits | bit)
    }

    /// Number of cuts passed.
    #[must_use]
    pub fn count_passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Outcome of the cut named `name`, if it is part of the flow.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&CutOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::candidate::Photon;
    use approx::assert_relative_eq;
    use event_types::{CandidateRef, EventId, ProductId, ValueMap};
    use serde_json::json;

    fn smajor(threshold: f64, map: &str, ignored: bool) -> Value {
        json!({
            "cutName": "PhoSMajCut",
            "C1_EB": threshold,
            "C1_EE": threshold,
            "barrelCutOff": 1.479,
            "sMajMap": map,
            "isIgnored": ignored,
        })
    }

    fn selection(cut_flow: Vec<Value>) -> IdSelection {
        let config = IdSelectionConfig {
            id_name: "test-id".into(),
            cut_flow,
            is_pog_approved: false,
        };
        IdSelection::from_config(&config, &CutRegistry::with_builtin()).unwrap()
    }

    #[test]
    fn per_cut_outcomes() {
        let sel = selection(vec![
            smajor(1.0, "p:phoSMajor", false),
            smajor(0.5, "p:phoSMajor", false),
        ]);
        let photon = Photon::new(CandidateRef::standalone(0), 0.0).with_user_float("phoSMajor", 0.75);
        let result = sel.evaluate(&photon).unwrap();

        assert!(!result.passed());
        assert_eq!(result.bitmap(), 0b01);
        assert_eq!(result.count_passed(), 1);
        assert_relative_eq!(result.outcomes[1].value, 0.75, epsilon = 1e-6);
        assert_eq!(result.id_name, "test-id");
        assert!(result.outcome("PhoSMajCut").unwrap().passed);
    }

    #[test]
    fn ignored_cut_does_not_fail_flow() {
        let sel = selection(vec![
            smajor(1.0, "p:phoSMajor", false),
            smajor(0.5, "p:phoSMajor", true),
        ]);
        let photon = Photon::new(CandidateRef::standalone(0), 0.0).with_user_float("phoSMajor", 0.75);
        let result = sel.evaluate(&photon).unwrap();
        assert!(result.passed());
        assert_eq!(result.bitmap(), 0b01);
    }

    #[test]
    fn consumes_deduplicates_tags() {
        let sel = selection(vec![
            smajor(1.0, "p:phoSMajor", false),
            smajor(0.5, "p:phoSMajor", false),
            smajor(0.5, "q:phoSMajor", false),
        ]);
        let labels: Vec<_> = sel.consumes().into_iter().map(InputTag::label).collect();
        assert_eq!(labels, vec!["p", "q"]);
    }

    #[test]
    fn event_content_reaches_every_cut() {
        let photons = ProductId::new(1, 1);
        let mut map = ValueMap::new();
        map.insert(photons, [0.2_f32]).unwrap();
        let mut event = EventStore::new(EventId::new(1, 1, 1));
        event.put(InputTag::parse("p:phoSMajor").unwrap(), map);

        let mut sel = selection(vec![smajor(1.0, "p:phoSMajor", false), smajor(0.1, "p:phoSMajor", false)]);
        sel.get_event_content(&event);

        // No user float: values must come from the map.
        let photon = Photon::new(CandidateRef::new(photons, 0), 0.0);
        let result = sel.evaluate(&photon).unwrap();
        assert_eq!(result.bitmap(), 0b01);
    }

    #[test]
    fn first_error_aborts_evaluation() {
        let sel = selection(vec![smajor(1.0, "p:phoSMajor", false)]);
        let photon = Photon::new(CandidateRef::standalone(0), 0.0);
        assert!(matches!(sel.evaluate(&photon), Err(CutError::MissingUserFloat { .. })));
    }

    #[test]
    fn empty_flow_passes() {
        let sel = selection(Vec::new());
        assert!(sel.is_empty());
        let result = sel.evaluate(&Photon::default()).unwrap();
        assert!(result.passed());
        assert_eq!(result.bitmap(), 0);
    }

    #[test]
    fn bitmap_drops_outcomes_past_last_bit() {
        let passing = CutOutcome {
            name: "PhoSMajCut".into(),
            passed: true,
            value: 0.5,
            ignored: false,
        };
        let mut result = CutFlowResult {
            id_name: "wide".into(),
            outcomes: vec![passing; MAX_CUTS + 1],
        };
        assert_eq!(result.bitmap(), u64::MAX);
        assert_eq!(result.count_passed(), MAX_CUTS + 1);

        result.outcomes[MAX_CUTS - 1].passed = false;
        assert_eq!(result.bitmap(), u64::MAX >> 1);
    }

    #[test]
    fn too_many_cuts_rejected() {
        let config = IdSelectionConfig {
            id_name: "long".into(),
            cut_flow: vec![smajor(1.0, "p:x", false); MAX_CUTS + 1],
            is_pog_approved: false,
        };
        let err = IdSelection::from_config(&config, &CutRegistry::with_builtin()).unwrap_err();
        assert!(matches!(err, CutError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_cut_in_flow_rejected() {
        let config = IdSelectionConfig {
            id_name: "x".into(),
            cut_flow: vec![json!({"cutName": "NoSuchCut"})],
            is_pog_approved: true,
        };
        let err = IdSelection::from_config(&config, &CutRegistry::with_builtin()).unwrap_err();
        assert!(matches!(err, CutError::UnknownCut(_)));
    }
}
