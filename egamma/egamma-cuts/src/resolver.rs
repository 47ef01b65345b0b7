//! Resolution of a candidate's precomputed value.
//!
//! A value is looked up in tiers:
//!
//! 1. The map holds values for the candidate's collection: direct lookup.
//! 2. The map was built from exactly one collection and the candidate is
//!    standalone (null product id): the key indexes the flat values.
//! 3. The map is present but neither applies: the direct lookup is retried
//!    and its failure is returned. A value map that cannot serve a candidate
//!    means the configuration and the data disagree, so this is an error and
//!    never a silent default.
//! 4. The map is absent: the fallback accessor supplies the value, usually an
//!    attribute embedded in the candidate.

use event_types::{CandidateRef, EventError, ValueMap};
use tracing::{debug, error};

use crate::error::{CutError, CutResult};

/// Which tier produced a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    /// Lookup by the candidate's product id and key.
    ByProduct,
    /// Positional lookup in a single-collection map.
    ByPosition,
    /// Fallback accessor, used when no map is available.
    Fallback,
}

/// A resolved value and where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    /// The value, unmodified from its source.
    pub value: f32,
    /// Tier that produced it.
    pub tier: ResolutionTier,
}

/// Resolves a candidate's value, reporting the tier used.
///
/// `fallback` is invoked at most once, and only when `map` is `None`.
///
/// # Errors
///
/// Returns [`CutError::Lookup`](crate::CutError::Lookup) when a present map
/// cannot serve the candidate, and propagates any error from `fallback`.
///
/// # Example
///
/// ```
/// use egamma_cuts::{resolve_tiered, ResolutionTier};
/// use event_types::{CandidateRef, ProductId, ValueMap};
///
/// let photons = ProductId::new(1, 2);
/// let mut map = ValueMap::new();
/// map.insert(photons, [0.7_f32, 1.4]).unwrap();
///
/// let by_product = resolve_tiered(&CandidateRef::new(photons, 1), Some(&map), || Ok(0.0)).unwrap();
/// assert_eq!(by_product.value, 1.4);
/// assert_eq!(by_product.tier, ResolutionTier::ByProduct);
///
/// let by_position = resolve_tiered(&CandidateRef::standalone(0), Some(&map), || Ok(0.0)).unwrap();
/// assert_eq!(by_position.tier, ResolutionTier::ByPosition);
///
/// let fallback = resolve_tiered(&CandidateRef::standalone(0), None, || Ok(2.5)).unwrap();
/// assert_eq!(fallback.value, 2.5);
/// assert_eq!(fallback.tier, ResolutionTier::Fallback);
/// ```
pub fn resolve_tiered<F>(
    candidate: &CandidateRef,
    map: Option<&ValueMap<f32>>,
    fallback: F,
) -> CutResult<Resolved>
where
    F: FnOnce() -> CutResult<f32>,
{
    let Some(map) = map else {
        debug!(candidate = %candidate, "value map absent, using fallback accessor");
        let value = fallback()?;
        return Ok(Resolved {
            value,
            tier: ResolutionTier::Fallback,
        });
    };

    if map.contains(candidate.id) {
        return Ok(Resolved {
            value: *map.get(candidate)?,
            tier: ResolutionTier::ByProduct,
        });
    }

    if map.id_size() == 1 && candidate.is_standalone() {
        let value = map
            .values()
            .get(candidate.key)
            .copied()
            .ok_or_else(|| {
                lookup_failure(candidate, map, EventError::key_out_of_range(candidate.key, map.len()))
            })?;
        return Ok(Resolved {
            value,
            tier: ResolutionTier::ByPosition,
        });
    }

    match map.get(candidate) {
        Ok(value) => Ok(Resolved {
            value: *value,
            tier: ResolutionTier::ByProduct,
        }),
        Err(err) => Err(lookup_failure(candidate, map, err)),
    }
}

fn lookup_failure(candidate: &CandidateRef, map: &ValueMap<f32>, err: EventError) -> CutError {
    error!(
        candidate = %candidate,
        collections = map.id_size(),
        error = %err,
        "value map cannot serve candidate"
    );
    err.into()
}

/// Resolves a candidate's value.
///
/// Same as [`resolve_tiered`] without the tier.
///
/// # Errors
///
/// See [`resolve_tiered`].
pub fn resolve<F>(candidate: &CandidateRef, map: Option<&ValueMap<f32>>, fallback: F) -> CutResult<f32>
where
    F: FnOnce() -> CutResult<f32>,
{
    resolve_tiered(candidate, map, fallback).map(|resolved| resolved.value)
}
