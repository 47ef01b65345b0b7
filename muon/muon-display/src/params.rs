//! Parameters for segment proxy building.

use serde::{Deserialize, Serialize};

use crate::projector::DEFAULT_SEGMENT_LENGTH;

/// Parameters for the CSC segment proxy builder.
///
/// # Example
///
/// ```
/// use muon_display::ProxyParams;
///
/// let params = ProxyParams::default();
/// assert!((params.segment_length - 15.0).abs() < f64::EPSILON);
/// assert_eq!(params.line_width, 3);
///
/// let thin = ProxyParams::default().line_width(1);
/// assert_eq!(thin.line_width, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyParams {
    /// Half-length of each drawn segment along the chamber normal.
    pub segment_length: f64,

    /// Line width of every chamber set, in pixels.
    pub line_width: u8,
}

impl Default for ProxyParams {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_SEGMENT_LENGTH,
            line_width: 3,
        }
    }
}

impl ProxyParams {
    /// Set the segment half-length.
    #[must_use]
    pub const fn segment_length(mut self, length: f64) -> Self {
        self.segment_length = length;
        self
    }

    /// Set the line width.
    #[must_use]
    pub const fn line_width(mut self, width: u8) -> Self {
        self.line_width = width;
        self
    }

    /// Returns true if the parameters can produce a drawable line.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.segment_length.is_finite() && self.segment_length > 0.0 && self.line_width > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = ProxyParams::default();
        assert_eq!(params.segment_length, 15.0);
        assert!(params.is_valid());
    }

    #[test]
    fn builder_pattern() {
        let params = ProxyParams::default().segment_length(30.0).line_width(2);
        assert_eq!(params.segment_length, 30.0);
        assert_eq!(params.line_width, 2);
    }

    #[test]
    fn invalid_params() {
        assert!(!ProxyParams::default().segment_length(0.0).is_valid());
        assert!(!ProxyParams::default().segment_length(f64::NAN).is_valid());
        assert!(!ProxyParams::default().line_width(0).is_valid());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let params: ProxyParams = serde_json::from_str(r#"{"line_width": 5}"#).unwrap();
        assert_eq!(params.line_width, 5);
        assert_eq!(params.segment_length, 15.0);
    }
}
