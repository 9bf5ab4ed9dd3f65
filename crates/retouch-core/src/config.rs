//! Session configuration.
//!
//! Hosts usually deserialize this from a JSON/JS object. Every field has a
//! default, so partial objects are accepted.

use serde::{Deserialize, Serialize};

use crate::transform::InterpolationFilter;

/// Default number of history snapshots kept for undo.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Relative zoom change per zoom step (10%).
pub const ZOOM_STEP: f64 = 0.1;

/// Tunables for an [`EditSession`](crate::session::EditSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of (filter, adjustments) snapshots kept for undo.
    pub history_depth: usize,
    /// Seed for the noise and glitch random source.
    ///
    /// With a seed every recompute draws the same random sequence, so the
    /// display image is reproducible. Without one, fresh entropy is used.
    pub seed: Option<u64>,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Multiplicative zoom step (0.1 = +10% in, -10% out).
    pub zoom_step: f64,
    /// Resampling used for rotations that are not quarter turns.
    pub interpolation: InterpolationFilter,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            seed: None,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            interpolation: InterpolationFilter::Lanczos3,
        }
    }
}

impl SessionConfig {
    /// Default configuration with a fixed random seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.history_depth, 20);
        assert_eq!(config.seed, None);
        assert_eq!(config.min_zoom, 0.1);
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.interpolation, InterpolationFilter::Lanczos3);
    }

    #[test]
    fn test_partial_object() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"seed": 3, "interpolation": "bilinear"}"#).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.interpolation, InterpolationFilter::Bilinear);
        assert_eq!(config.history_depth, DEFAULT_HISTORY_DEPTH);
    }

    #[test]
    fn test_seeded() {
        let config = SessionConfig::seeded(7);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.history_depth, DEFAULT_HISTORY_DEPTH);
    }
}
