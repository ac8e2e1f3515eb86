use serde::Serialize;
use thiserror::Error;

use crate::domain::GridType;

/// Result type alias for pack layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Validation failures raised before any cell is placed.
///
/// Layer numbers are 1-based, matching `PlacedCell::layer_index`.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LayoutError {
    #[error("Invalid cell dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid layer {layer}: {reason}")]
    InvalidLayer { layer: usize, reason: String },

    #[error("Layer {layer} uses index pitch but no positive z pitch was supplied")]
    MissingZPitch { layer: usize },

    #[error(
        "Layer {layer} ({grid}): nearest cell spacing {nearest_m:.4}m is below the required {required_m:.4}m"
    )]
    OverlapDetected {
        layer: usize,
        grid: GridType,
        nearest_m: f64,
        required_m: f64,
    },

    #[error("Pack needs at least one layer")]
    NoLayers,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Layer {layer} cannot be connected: {reason}")]
    IncompatibleLayers { layer: usize, reason: String },
}

impl LayoutError {
    /// Stable kind string for UI display and JSON error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::InvalidDimensions(_) => "InvalidDimensions",
            LayoutError::InvalidLayer { .. } => "InvalidLayer",
            LayoutError::MissingZPitch { .. } => "MissingZPitch",
            LayoutError::OverlapDetected { .. } => "OverlapDetected",
            LayoutError::NoLayers => "NoLayers",
            LayoutError::InvalidOptions(_) => "InvalidOptions",
            LayoutError::IncompatibleLayers { .. } => "IncompatibleLayers",
        }
    }

    /// Layer the failure belongs to, if it is layer-specific
    pub fn layer(&self) -> Option<usize> {
        match self {
            LayoutError::InvalidLayer { layer, .. }
            | LayoutError::MissingZPitch { layer }
            | LayoutError::OverlapDetected { layer, .. }
            | LayoutError::IncompatibleLayers { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    pub(crate) fn layer_err(layer: usize, reason: impl Into<String>) -> Self {
        LayoutError::InvalidLayer {
            layer,
            reason: reason.into(),
        }
    }
}

impl From<validator::ValidationErrors> for LayoutError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LayoutError::InvalidOptions(errors.to_string())
    }
}
