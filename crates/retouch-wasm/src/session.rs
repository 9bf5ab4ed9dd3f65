//! Editing session WASM bindings.
//!
//! `JsEditSession` wraps the core `EditSession`. Every command recomputes the
//! display image synchronously and returns it, so a host can paint the result
//! straight onto a canvas.

use crate::types::JsImage;
use retouch_core::{EditError, EditSession, FilterKind, SessionConfig, SessionState, ViewRect};
use wasm_bindgen::prelude::*;

/// Convert a core error into a JS exception value.
fn to_js_error(err: EditError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser entropy for unseeded sessions; wasm32 has no OS source.
fn js_entropy() -> u64 {
    (js_sys::Math::random() * 2f64.powi(53)) as u64
}

/// An image editing session for JavaScript.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new JsEditSession({ history_depth: 30 });
/// session.load(new JsImage(width, height, 4, imageData.data));
/// session.apply_filter("Sepia");
/// const display = session.apply_adjustment("contrast", 1.3);
/// ```
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Create a session. `config` is an optional object with any of
    /// `history_depth`, `seed`, `min_zoom`, `max_zoom`, `zoom_step` and
    /// `interpolation` (`"lanczos3"` or `"bilinear"`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };
        Ok(Self::with_config(config))
    }

    /// Load a new source image, discarding all edits and history.
    pub fn load(&mut self, image: &JsImage) -> Result<JsImage, JsValue> {
        let image = image.to_image().map_err(to_js_error)?;
        self.inner.load(image).map(JsImage::from_image).map_err(to_js_error)
    }

    /// Select a filter by display name ("Original" clears it).
    ///
    /// `parameter` overrides the filter's default where it takes one.
    pub fn apply_filter(&mut self, name: &str, parameter: Option<f32>) -> Result<JsImage, JsValue> {
        let kind = name.parse::<FilterKind>().map_err(to_js_error)?;
        let result = match parameter {
            Some(value) => self.inner.apply_filter_with(kind, value),
            None => self.inner.apply_filter(kind),
        };
        result.map(JsImage::from_image).map_err(to_js_error)
    }

    /// Set one adjustment by key and recompute.
    pub fn apply_adjustment(&mut self, name: &str, value: f32) -> Result<JsImage, JsValue> {
        self.inner
            .apply_adjustment(name, value)
            .map(JsImage::from_image)
            .map_err(to_js_error)
    }

    /// Turn the image counter-clockwise by `degrees`, keeping the canvas size.
    pub fn rotate(&mut self, degrees: f32) -> Result<JsImage, JsValue> {
        self.inner.rotate(degrees).map(JsImage::from_image).map_err(to_js_error)
    }

    /// Mirror the image: `"horizontal"` or `"vertical"`.
    pub fn flip(&mut self, direction: &str) -> Result<JsImage, JsValue> {
        self.inner
            .flip_named(direction)
            .map(JsImage::from_image)
            .map_err(to_js_error)
    }

    /// Drop any rotation and mirroring.
    pub fn reset_geometry(&mut self) -> Result<JsImage, JsValue> {
        self.inner.reset_geometry().map(JsImage::from_image).map_err(to_js_error)
    }

    /// Accumulated counter-clockwise rotation in degrees.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f32 {
        self.inner.geometry().rotation
    }

    /// Recompute the display image from the source.
    pub fn recompute(&mut self) -> Result<JsImage, JsValue> {
        self.inner.recompute().map(JsImage::from_image).map_err(to_js_error)
    }

    /// Clear the filter, rotation, flips and every adjustment.
    pub fn reset_all(&mut self) -> Result<JsImage, JsValue> {
        self.inner.reset_all().map(JsImage::from_image).map_err(to_js_error)
    }

    /// Step back one edit.
    pub fn undo(&mut self) -> Result<JsImage, JsValue> {
        self.inner.undo().map(JsImage::from_image).map_err(to_js_error)
    }

    /// Current display image.
    pub fn display_image(&self) -> Result<JsImage, JsValue> {
        self.inner
            .display_image()
            .map(JsImage::from_image)
            .map_err(to_js_error)
    }

    /// Unmodified source image.
    pub fn source_image(&self) -> Result<JsImage, JsValue> {
        self.inner
            .source_image()
            .map(JsImage::from_image)
            .map_err(to_js_error)
    }

    /// "empty", "loaded" or "modified".
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.state() {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Modified => "modified",
        }
        .to_string()
    }

    /// Number of snapshots in the undo history.
    #[wasm_bindgen(getter)]
    pub fn history_depth(&self) -> usize {
        self.inner.history_depth()
    }

    /// Display name of the active filter.
    #[wasm_bindgen(getter)]
    pub fn filter_name(&self) -> String {
        self.inner.filter().kind.to_string()
    }

    /// Current adjustment values as a `{ key: value }` object.
    pub fn adjustments(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.adjustments())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Messages for adjustments skipped during the last recompute.
    pub fn skipped_adjustments(&self) -> Vec<String> {
        self.inner
            .skipped_adjustments()
            .iter()
            .map(|err| err.to_string())
            .collect()
    }

    // ===== Viewport =====

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.viewport().zoom()
    }

    /// Set the zoom factor (clamped). Returns the applied zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.inner.viewport_mut().set_zoom(zoom)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.inner.viewport_mut().zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.inner.viewport_mut().zoom_out()
    }

    pub fn set_offset(&mut self, x: f64, y: f64) {
        self.inner.viewport_mut().set_offset(x, y);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.viewport_mut().pan_by(dx, dy);
    }

    /// Map a canvas selection to `{ x, y, width, height }` in image pixels,
    /// or `undefined` when it misses the image.
    pub fn crop_rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<JsValue, JsValue> {
        let rect = self.inner.crop_rect(&ViewRect::new(x0, y0, x1, y1));
        serde_wasm_bindgen::to_value(&rect).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Cut a canvas selection out of the display image.
    pub fn crop_display(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<JsImage, JsValue> {
        self.inner
            .crop_display(&ViewRect::new(x0, y0, x1, y1))
            .map(|img| JsImage::from_image(&img))
            .map_err(to_js_error)
    }

    /// Copy of the display image scaled to exactly `width` x `height`.
    pub fn resized_display(&self, width: u32, height: u32) -> Result<JsImage, JsValue> {
        self.inner
            .resized_display(width, height)
            .map(|img| JsImage::from_image(&img))
            .map_err(to_js_error)
    }
}

impl JsEditSession {
    /// Build a session from an already parsed config.
    pub(crate) fn with_config(config: SessionConfig) -> Self {
        Self {
            inner: EditSession::with_entropy(config, js_entropy),
        }
    }
}
