//! Error taxonomy shared by the adjustment library, the filter library and the
//! editing session.

use thiserror::Error;

/// Errors produced while building images, applying transforms or driving a session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The image is empty or its buffer does not match its declared layout.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A transform parameter cannot be used with the given image.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The adjustment key is not one of the fixed adjustment keys.
    #[error("Unsupported adjustment key: {0}")]
    UnsupportedAdjustmentKey(String),

    /// The filter name does not match any catalog entry.
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// A single stage failed while the display image was being recomputed.
    #[error("Failed to apply {stage}: {source}")]
    RecomputeFailure {
        /// Key of the adjustment or name of the filter that failed.
        stage: String,
        /// The underlying failure.
        #[source]
        source: Box<EditError>,
    },

    /// The session has no source image yet.
    #[error("No image loaded")]
    NoImageLoaded,
}

impl EditError {
    /// Wrap a stage failure raised during recompute.
    pub fn recompute(stage: impl Into<String>, source: EditError) -> Self {
        EditError::RecomputeFailure {
            stage: stage.into(),
            source: Box::new(source),
        }
    }
}

/// Reject NaN and infinite parameters.
///
/// Finite values outside the documented range are accepted and clipped by the
/// transforms themselves.
pub(crate) fn ensure_finite(name: &str, value: f32) -> Result<f32, EditError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::InvalidParameter(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}
