//! Preset working points of the out-of-time photon identification.

use std::fmt;
use std::str::FromStr;

use event_types::InputTag;

use crate::error::{CutError, CutResult};
use crate::registry::CutRegistry;
use crate::selection::{IdSelection, IdSelectionConfig};
use crate::smajor::{SMajorCut, SMajorCutConfig};

/// `|eta|` separating the barrel from the endcaps.
pub const BARREL_CUT_OFF: f64 = 1.479;

/// Producer and instance of the standard `sMajor` value map.
pub const SMAJOR_MAP: &str = "photonIDValueMapProducer:phoSMajor";

const ID_PREFIX: &str = "cutBasedPhotonID-Spring16-V2p2-delayedphotonOOT";

/// Tightness of the selection.
///
/// # Example
///
/// ```
/// use egamma_cuts::WorkingPoint;
///
/// let wp: WorkingPoint = "medium".parse().unwrap();
/// assert_eq!(wp.smajor_cut(), 1.5);
/// assert_eq!(wp.id_name(), "cutBasedPhotonID-Spring16-V2p2-delayedphotonOOT-medium");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkingPoint {
    /// Highest efficiency.
    Loose,
    /// Intermediate.
    Medium,
    /// Highest purity.
    Tight,
}

impl WorkingPoint {
    /// Every working point, loosest first.
    pub const ALL: [Self; 3] = [Self::Loose, Self::Medium, Self::Tight];

    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Medium => "medium",
            Self::Tight => "tight",
        }
    }

    /// `sMajor` upper bound, identical in barrel and endcap.
    #[must_use]
    pub const fn smajor_cut(self) -> f64 {
        match self {
            Self::Loose => 1.7,
            Self::Medium => 1.5,
            Self::Tight => 1.3,
        }
    }

    /// Versioned selection name.
    #[must_use]
    pub fn id_name(self) -> String {
        format!("{ID_PREFIX}-{self}")
    }

    /// Parameter set of this working point's `sMajor` cut.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::InvalidConfig`] if [`SMAJOR_MAP`] is not a valid
    /// input tag.
    pub fn smajor_config(self) -> CutResult<SMajorCutConfig> {
        let smaj_map =
            InputTag::parse(SMAJOR_MAP).map_err(|err| CutError::invalid_config(err.to_string()))?;
        Ok(SMajorCutConfig {
            cut_name: SMajorCut::NAME.to_string(),
            c1_eb: self.smajor_cut(),
            c1_ee: self.smajor_cut(),
            barrel_cut_off: BARREL_CUT_OFF,
            smaj_map,
            is_ignored: false,
        })
    }

    /// Selection configuration holding this working point's shower-shape cut.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::Config`] if the cut parameters cannot be encoded.
    pub fn selection_config(self) -> CutResult<IdSelectionConfig> {
        Ok(IdSelectionConfig {
            id_name: self.id_name(),
            cut_flow: vec![serde_json::to_value(self.smajor_config()?)?],
            is_pog_approved: true,
        })
    }

    /// Builds the selection with the built-in cuts.
    ///
    /// # Errors
    ///
    /// See [`selection_config`](Self::selection_config) and
    /// [`IdSelection::from_config`].
    pub fn selection(self) -> CutResult<IdSelection> {
        IdSelection::from_config(&self.selection_config()?, &CutRegistry::with_builtin())
    }
}

impl fmt::Display for WorkingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkingPoint {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|wp| wp.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CutError::invalid_config(format!("unknown working point {s:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::applicator::CutApplicator;
    use crate::threshold::CutThresholds;

    #[test]
    fn thresholds_tighten() {
        let cuts: Vec<f64> = WorkingPoint::ALL.iter().map(|wp| wp.smajor_cut()).collect();
        assert_eq!(cuts, vec![1.7, 1.5, 1.3]);
    }

    #[test]
    fn id_names() {
        assert_eq!(
            WorkingPoint::Loose.id_name(),
            "cutBasedPhotonID-Spring16-V2p2-delayedphotonOOT-loose"
        );
        assert_eq!(
            WorkingPoint::Tight.id_name(),
            "cutBasedPhotonID-Spring16-V2p2-delayedphotonOOT-tight"
        );
    }

    #[test]
    fn parse_names() {
        assert_eq!("Tight".parse::<WorkingPoint>().unwrap(), WorkingPoint::Tight);
        assert!(matches!(
            "superloose".parse::<WorkingPoint>(),
            Err(CutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn preset_builds_cut() {
        let cut = SMajorCut::new(&WorkingPoint::Medium.smajor_config().unwrap()).unwrap();
        assert_eq!(*cut.thresholds(), CutThresholds::new(1.5, 1.5, 1.479));
        assert_eq!(cut.consumes()[0].to_string(), SMAJOR_MAP);
        assert_eq!(cut.fallback_name(), "phoSMajor");
    }

    #[test]
    fn preset_selection() {
        let selection = WorkingPoint::Loose.selection().unwrap();
        assert_eq!(selection.name(), WorkingPoint::Loose.id_name());
        assert!(selection.is_pog_approved());
        assert_eq!(selection.cut_names().collect::<Vec<_>>(), vec!["PhoSMajCut"]);
    }
}
