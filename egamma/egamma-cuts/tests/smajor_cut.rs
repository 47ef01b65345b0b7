//! End-to-end tests of the sMajor cut against event products.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::sync::Arc;

use approx::assert_relative_eq;
use egamma_cuts::{
    CutApplicator, CutError, CutRegistry, IdSelection, Photon, PhotonCandidate, ResolutionTier,
    SMajorCut, WorkingPoint, resolve_tiered,
};
use event_types::{CandidateRef, EventError, EventId, EventStore, InputTag, ProductId, ValueMap};
use serde_json::json;

const PHOTONS: ProductId = ProductId::new(2, 5);
const SMAJOR_TAG: &str = "photonIDValueMapProducer:phoSMajor";

/// Photon that counts how often its embedded value is read.
struct CountingPhoton {
    reference: CandidateRef,
    eta: f64,
    value: f32,
    reads: Cell<usize>,
}

impl CountingPhoton {
    fn new(reference: CandidateRef, eta: f64, value: f32) -> Self {
        Self {
            reference,
            eta,
            value,
            reads: Cell::new(0),
        }
    }
}

impl PhotonCandidate for CountingPhoton {
    fn candidate_ref(&self) -> CandidateRef {
        self.reference
    }

    fn super_cluster_eta(&self) -> f64 {
        self.eta
    }

    fn user_float(&self, name: &str) -> Option<f32> {
        self.reads.set(self.reads.get() + 1);
        (name == "phoSMajor").then_some(self.value)
    }
}

fn cut(barrel: f64, endcap: f64, boundary: f64) -> SMajorCut {
    SMajorCut::from_value(&json!({
        "cutName": "PhoSMajCut",
        "C1_EB": barrel,
        "C1_EE": endcap,
        "barrelCutOff": boundary,
        "sMajMap": SMAJOR_TAG,
    }))
    .unwrap()
}

fn event_with(map: ValueMap<f32>) -> EventStore {
    let mut event = EventStore::new(EventId::new(1, 1, 1));
    event.put(InputTag::parse(SMAJOR_TAG).unwrap(), map);
    event
}

fn photon_map(values: &[f32]) -> ValueMap<f32> {
    let mut map = ValueMap::new();
    map.insert(PHOTONS, values.iter().copied()).unwrap();
    map
}

mod resolution {
    use super::*;

    #[test]
    fn exact_match_in_barrel_passes() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.7])));

        let photon = Photon::new(CandidateRef::new(PHOTONS, 0), 1.0);
        assert!(cut.evaluate(&photon).unwrap());
        assert_relative_eq!(cut.value(&photon).unwrap(), 0.7, epsilon = 1e-6);
    }

    #[test]
    fn absent_map_reads_candidate_once() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&EventStore::new(EventId::new(1, 1, 2)));

        let photon = CountingPhoton::new(CandidateRef::new(PHOTONS, 3), 0.2, 0.123_4);
        assert_relative_eq!(cut.value(&photon).unwrap(), 0.123_4, epsilon = 1e-6);
        assert_eq!(photon.reads.get(), 1);

        assert!(cut.evaluate(&photon).unwrap());
        assert_eq!(photon.reads.get(), 2);
    }

    #[test]
    fn present_map_never_reads_candidate() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.7])));
        let photon = CountingPhoton::new(CandidateRef::new(PHOTONS, 0), 0.2, 100.0);
        assert!(cut.evaluate(&photon).unwrap());
        assert_eq!(photon.reads.get(), 0);
    }

    #[test]
    fn standalone_candidate_uses_position_in_single_map() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.9, 0.1])));
        let photon = Photon::new(CandidateRef::standalone(1), 0.0);
        assert!(cut.evaluate(&photon).unwrap());
        assert_relative_eq!(cut.value(&photon).unwrap(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn exact_match_wins_over_position() {
        let mut map = ValueMap::new();
        map.insert(ProductId::NULL, [0.25_f32, 0.75]).unwrap();
        let resolved = resolve_tiered(&CandidateRef::standalone(0), Some(&map), || Ok(9.0)).unwrap();
        assert_eq!(resolved.tier, ResolutionTier::ByProduct);
        assert_eq!(resolved.value, 0.25);
    }

    #[test]
    fn foreign_candidate_is_fatal() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.7])));
        let stranger = Photon::new(CandidateRef::new(ProductId::new(9, 9), 0), 0.0)
            .with_user_float("phoSMajor", 0.0);

        let err = cut.evaluate(&stranger).unwrap_err();
        assert!(matches!(err, CutError::Lookup(EventError::NoAssociation { .. })));
        assert!(matches!(cut.value(&stranger), Err(CutError::Lookup(_))));
    }

    #[test]
    fn standalone_candidate_with_two_collections_is_fatal() {
        let mut map = photon_map(&[0.7]);
        map.insert(ProductId::new(3, 1), [0.2]).unwrap();
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(map));
        let photon = Photon::new(CandidateRef::standalone(0), 0.0);
        assert!(matches!(cut.evaluate(&photon), Err(CutError::Lookup(_))));
    }
}

mod thresholds {
    use super::*;

    #[test]
    fn boundary_tie_uses_endcap() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.6, 0.6])));
        let on_boundary = Photon::new(CandidateRef::new(PHOTONS, 0), 1.5);
        let negative = Photon::new(CandidateRef::new(PHOTONS, 1), -1.5);
        assert!(!cut.evaluate(&on_boundary).unwrap());
        assert!(!cut.evaluate(&negative).unwrap());
    }

    #[test]
    fn value_equal_to_threshold_fails() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.8])));
        let photon = Photon::new(CandidateRef::new(PHOTONS, 0), 0.0);
        assert!(!cut.evaluate(&photon).unwrap());
    }

    #[test]
    fn nan_value_fails() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[f32::NAN])));
        let photon = Photon::new(CandidateRef::new(PHOTONS, 0), 0.0);
        assert!(!cut.evaluate(&photon).unwrap());
        assert!(cut.value(&photon).unwrap().is_nan());
    }

    #[test]
    fn working_points_nest() {
        let values = [1.2_f32, 1.4, 1.6, 1.8];
        let event = event_with(photon_map(&values));
        let passing: Vec<usize> = WorkingPoint::ALL
            .iter()
            .map(|wp| {
                let mut selection = wp.selection().unwrap();
                selection.get_event_content(&event);
                (0..values.len())
                    .filter(|&key| {
                        let photon = Photon::new(CandidateRef::new(PHOTONS, key), 0.8);
                        selection.evaluate(&photon).unwrap().passed()
                    })
                    .count()
            })
            .collect();
        assert_eq!(passing, vec![3, 2, 1]);
    }
}

mod configuration {
    use super::*;

    #[test]
    fn selection_from_json() {
        let json = r#"{
            "idName": "cutBasedPhotonID-Spring16-V2p2-delayedphotonOOT-tight",
            "isPOGApproved": true,
            "cutFlow": [
                {"cutName": "PhoSMajCut", "C1_EB": 1.3, "C1_EE": 1.3, "barrelCutOff": 1.479,
                 "sMajMap": "photonIDValueMapProducer:phoSMajor", "isIgnored": false}
            ]
        }"#;
        let mut selection = IdSelection::from_json(json, &CutRegistry::with_builtin()).unwrap();
        assert_eq!(selection.name(), WorkingPoint::Tight.id_name());
        assert_eq!(selection.consumes()[0].to_string(), SMAJOR_TAG);

        selection.get_event_content(&event_with(photon_map(&[1.0])));
        let result = selection
            .evaluate(&Photon::new(CandidateRef::new(PHOTONS, 0), 2.0))
            .unwrap();
        assert!(result.passed());
        assert_eq!(result.outcome("PhoSMajCut").unwrap().value, 1.0);
    }

    #[test]
    fn malformed_selection_rejected() {
        let err = IdSelection::from_json(r#"{"idName": 3}"#, &CutRegistry::with_builtin()).unwrap_err();
        assert!(matches!(err, CutError::Config(_)));
    }

    #[test]
    fn invalid_map_tag_rejected() {
        let err = SMajorCut::from_value(&json!({
            "cutName": "PhoSMajCut",
            "C1_EB": 1.0,
            "C1_EE": 1.0,
            "barrelCutOff": 1.479,
            "sMajMap": "",
        }))
        .unwrap_err();
        assert!(matches!(err, CutError::Config(_)));
    }

    #[test]
    fn cuts_are_shareable_across_threads() {
        let mut cut = cut(0.8, 0.5, 1.5);
        cut.get_event_content(&event_with(photon_map(&[0.1, 0.9, 0.3, 0.6])));
        let cut: Arc<dyn CutApplicator> = Arc::new(cut);

        let handles: Vec<_> = (0..4)
            .map(|key| {
                let cut = Arc::clone(&cut);
                std::thread::spawn(move || {
                    cut.evaluate(&Photon::new(CandidateRef::new(PHOTONS, key), 0.0))
                        .unwrap()
                })
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, false, true, true]);
    }
}
