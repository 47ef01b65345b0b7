//! Name-keyed construction of cuts from parameter sets.

use hashbrown::HashMap;
use serde_json::Value;
use tracing::debug;

use crate::applicator::CutApplicator;
use crate::error::{CutError, CutResult};
use crate::smajor::SMajorCut;

/// Builds a cut from its JSON parameter set.
pub type CutFactory = fn(&Value) -> CutResult<Box<dyn CutApplicator>>;

/// Table of cut factories keyed by `cutName`.
///
/// # Example
///
/// ```
/// use egamma_cuts::CutRegistry;
/// use serde_json::json;
///
/// let registry = CutRegistry::with_builtin();
/// let cut = registry.create(&json!({
///     "cutName": "PhoSMajCut",
///     "C1_EB": 1.5,
///     "C1_EE": 1.5,
///     "barrelCutOff": 1.479,
///     "sMajMap": "photonIDValueMapProducer:phoSMajor",
/// })).unwrap();
/// assert_eq!(cut.name(), "PhoSMajCut");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CutRegistry {
    factories: HashMap<String, CutFactory>,
}

fn smajor_factory(config: &Value) -> CutResult<Box<dyn CutApplicator>> {
    Ok(Box::new(SMajorCut::from_value(config)?))
}

impl CutRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every cut this crate provides.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(SMajorCut::NAME, smajor_factory);
        registry
    }

    /// Registers a factory, returning the one it replaces.
    pub fn register(&mut self, name: impl Into<String>, factory: CutFactory) -> Option<CutFactory> {
        self.factories.insert(name.into(), factory)
    }

    /// Returns true if a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds the cut named by the parameter set's `cutName`.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::InvalidConfig`] if `cutName` is missing or not a
    /// string, [`CutError::UnknownCut`] if no factory is registered under it,
    /// and any error the factory returns.
    pub fn create(&self, config: &Value) -> CutResult<Box<dyn CutApplicator>> {
        let name = config
            .get("cutName")
            .and_then(Value::as_str)
            .ok_or_else(|| CutError::invalid_config("parameter set has no string cutName"))?;
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| CutError::UnknownCut(name.to_string()))?;
        let cut = factory(config)?;
        debug!(cut = name, "created cut");
        Ok(cut)
    }
}
