//! Error types for display proxy building.

use thiserror::Error;

use crate::display::ElementListId;

/// Result type for display operations.
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Errors that can occur while building display proxies.
///
/// Missing geometry and missing input collections are not errors: the
/// builder recovers from both and records them in its
/// [`BuildReport`](crate::BuildReport).
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The element list was removed from the display context.
    #[error("element list {0} is not registered in the display context")]
    UnknownElementList(ElementListId),

    /// The transform's linear part is singular.
    #[error("chamber transform is not invertible")]
    NotInvertible,

    /// Builder parameters cannot produce a drawable line.
    #[error("invalid proxy parameters: {0}")]
    InvalidParams(String),

    /// A geometry table entry is malformed.
    #[error("invalid geometry table: {0}")]
    GeometryFormat(String),

    /// Geometry JSON could not be parsed.
    #[error("failed to parse geometry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DisplayError {
    /// Creates a geometry format error.
    #[must_use]
    pub fn geometry_format(reason: impl Into<String>) -> Self {
        Self::GeometryFormat(reason.into())
    }
}
