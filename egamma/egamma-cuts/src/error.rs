//! Error types for cut evaluation.

use event_types::EventError;
use thiserror::Error;

/// Result type for cut operations.
pub type CutResult<T> = Result<T, CutError>;

/// Errors that can occur while configuring or evaluating cuts.
#[derive(Debug, Error)]
pub enum CutError {
    /// A value map was present but could not serve the candidate.
    ///
    /// This is fatal for the candidate: it signals a mismatch between the
    /// map and the collection the candidate was read from.
    #[error("value map lookup failed: {0}")]
    Lookup(#[from] EventError),

    /// The value map was absent and the candidate carries no embedded value.
    #[error("candidate has no user float {name:?}")]
    MissingUserFloat {
        /// Attribute name that was looked up.
        name: String,
    },

    /// No factory is registered under this cut name.
    #[error("unknown cut {0:?}")]
    UnknownCut(String),

    /// A parameter set is well-formed JSON but not a valid cut configuration.
    #[error("invalid cut configuration: {0}")]
    InvalidConfig(String),

    /// A parameter set could not be deserialized.
    #[error("failed to parse cut configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl CutError {
    /// Creates a missing-user-float error.
    #[must_use]
    pub fn missing_user_float(name: impl Into<String>) -> Self {
        Self::MissingUserFloat { name: name.into() }
    }

    /// Creates an invalid-configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use event_types::ProductId;

    #[test]
    fn lookup_wraps_event_error() {
        let err: CutError = EventError::no_association(ProductId::new(3, 4), 1).into();
        assert!(matches!(err, CutError::Lookup(ref e) if e.is_lookup_failure()));
        assert!(err.to_string().contains("3:4"));
    }

    #[test]
    fn missing_user_float_names_attribute() {
        let err = CutError::missing_user_float("phoSMajor");
        assert!(err.to_string().contains("phoSMajor"));
    }

    #[test]
    fn config_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: CutError = parse.into();
        assert!(matches!(err, CutError::Config(_)));
    }
}
