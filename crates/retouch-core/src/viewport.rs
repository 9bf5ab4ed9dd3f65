//! Viewport state and view-to-image coordinate mapping.
//!
//! # Coordinate System
//!
//! - View coordinates are what the host UI reports (pointer positions on the
//!   canvas), in device-independent pixels
//! - Image coordinates are source pixels, origin at the top-left corner
//! - `image = (view - offset) / zoom`

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// A rectangle drawn in view coordinates, given by two opposite corners.
///
/// The corners may be in any order; mapping normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl ViewRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build from a top-left corner and a size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Corners reordered so that `x0 <= x1` and `y0 <= y1`.
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    fn is_finite(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// A non-empty rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the rectangle lies entirely inside a `width`×`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// Map a view-space selection onto image pixels.
///
/// The near edges are floored and the far edges ceiled so every pixel the
/// selection touches is included, then both are clamped to the image.
/// Returns `None` when the selection misses the image, has no area, or the
/// inputs are not finite.
pub fn map_view_rect(
    view: &ViewRect,
    zoom: f64,
    offset: (f64, f64),
    width: u32,
    height: u32,
) -> Option<PixelRect> {
    if !view.is_finite() || !zoom.is_finite() || zoom <= 0.0 {
        return None;
    }
    if !offset.0.is_finite() || !offset.1.is_finite() {
        return None;
    }
    let rect = view.normalized();

    let to_image = |v: f64, off: f64| (v - off) / zoom;
    let left = to_image(rect.x0, offset.0).floor().clamp(0.0, width as f64);
    let top = to_image(rect.y0, offset.1).floor().clamp(0.0, height as f64);
    let right = to_image(rect.x1, offset.0).ceil().clamp(0.0, width as f64);
    let bottom = to_image(rect.y1, offset.1).ceil().clamp(0.0, height as f64);

    if right <= left || bottom <= top {
        return None;
    }
    Some(PixelRect::new(
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

/// Zoom level and pan offset of the canvas showing the display image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    offset: (f64, f64),
    min_zoom: f64,
    max_zoom: f64,
    step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl Viewport {
    /// Viewport at 100% zoom with the config's bounds and step.
    pub fn from_config(config: &SessionConfig) -> Self {
        let min_zoom = config.min_zoom.min(config.max_zoom);
        let max_zoom = config.max_zoom.max(config.min_zoom);
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            offset: (0.0, 0.0),
            min_zoom,
            max_zoom,
            step: config.zoom_step,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a percentage (100 = actual size).
    pub fn zoom_percent(&self) -> f64 {
        self.zoom * 100.0
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Grow the zoom by one step, up to the maximum. Returns the new zoom.
    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * (1.0 + self.step))
    }

    /// Shrink the zoom by one step, down to the minimum. Returns the new zoom.
    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom * (1.0 - self.step))
    }

    /// Set the zoom, clamped to the configured bounds. Non-finite values are
    /// ignored.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    /// Place the image's top-left corner at `(x, y)` in view space.
    pub fn set_offset(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.offset = (x, y);
        }
    }

    /// Move the image by `(dx, dy)` view pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_offset(self.offset.0 + dx, self.offset.1 + dy);
    }

    /// Back to 100% zoom and no offset.
    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
        self.offset = (0.0, 0.0);
    }

    /// Size of a `width`×`height` image on screen at the current zoom.
    pub fn scaled_size(&self, width: u32, height: u32) -> (f64, f64) {
        (width as f64 * self.zoom, height as f64 * self.zoom)
    }

    /// Map a view-space selection with this viewport's zoom and offset.
    pub fn map(&self, view: &ViewRect, width: u32, height: u32) -> Option<PixelRect> {
        map_view_rect(view, self.zoom, self.offset, width, height)
    }
}
