//! Adjustment library.
//!
//! Every adjustment is a pure `image × parameter → image` transform. The set
//! of adjustments is closed: [`AdjustmentKind`] enumerates them and
//! [`ADJUSTMENTS`] maps each kind to its key, neutral default and transform.
//!
//! ## Application Order
//! 1. Hue
//! 2. Saturation
//! 3. Temperature
//! 4. Sharpness
//! 5. Blur
//! 6. Noise
//! 7. Brightness
//! 8. Contrast
//! 9. Exposure
//! 10. Shadows
//! 11. Highlights
//! 12. Vignette
//! 13. Gamma
//! 14. Red
//! 15. Green
//! 16. Blue

pub mod color;
pub mod detail;
pub mod tone;

use std::fmt;
use std::str::FromStr;

use nanorand::WyRand;
use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::raster::Image;

/// One of the sixteen fixed adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Hue,
    Saturation,
    Temperature,
    Sharpness,
    Blur,
    Noise,
    Brightness,
    Contrast,
    Exposure,
    Shadows,
    Highlights,
    Vignette,
    Gamma,
    Red,
    Green,
    Blue,
}

/// Number of adjustments.
pub const ADJUSTMENT_COUNT: usize = 16;

/// How a transform is invoked.
#[derive(Clone, Copy)]
pub enum Transform {
    /// Deterministic transform.
    Pure(fn(&Image, f32) -> Result<Image, EditError>),
    /// Transform that draws from a random source.
    Random(fn(&Image, f32, &mut WyRand) -> Result<Image, EditError>),
}

impl Transform {
    /// Run the transform.
    pub fn run(&self, image: &Image, value: f32, rng: &mut WyRand) -> Result<Image, EditError> {
        match self {
            Transform::Pure(f) => f(image, value),
            Transform::Random(f) => f(image, value, rng),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Pure(_) => f.write_str("Transform::Pure"),
            Transform::Random(_) => f.write_str("Transform::Random"),
        }
    }
}

/// Table row describing one adjustment.
#[derive(Debug, Clone, Copy)]
pub struct AdjustmentEntry {
    pub kind: AdjustmentKind,
    pub key: &'static str,
    /// Neutral value. The session skips adjustments left at it.
    pub default: f32,
    pub transform: Transform,
}

/// All adjustments, in application order.
pub static ADJUSTMENTS: [AdjustmentEntry; ADJUSTMENT_COUNT] = [
    AdjustmentEntry {
        kind: AdjustmentKind::Hue,
        key: "hue",
        default: 0.0,
        transform: Transform::Pure(color::hue),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Saturation,
        key: "saturation",
        default: 1.0,
        transform: Transform::Pure(color::saturation),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Temperature,
        key: "temperature",
        default: 0.0,
        transform: Transform::Pure(color::temperature),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Sharpness,
        key: "sharpness",
        default: 1.0,
        transform: Transform::Pure(detail::sharpness),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Blur,
        key: "blur",
        default: 0.0,
        transform: Transform::Pure(detail::blur),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Noise,
        key: "noise",
        default: 0.0,
        transform: Transform::Random(detail::noise),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Brightness,
        key: "brightness",
        default: 1.0,
        transform: Transform::Pure(tone::brightness),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Contrast,
        key: "contrast",
        default: 1.0,
        transform: Transform::Pure(tone::contrast),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Exposure,
        key: "exposure",
        default: 1.0,
        transform: Transform::Pure(tone::exposure),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Shadows,
        key: "shadows",
        default: 0.0,
        transform: Transform::Pure(tone::shadows),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Highlights,
        key: "highlights",
        default: 0.0,
        transform: Transform::Pure(tone::highlights),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Vignette,
        key: "vignette",
        default: 0.0,
        transform: Transform::Pure(tone::vignette),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Gamma,
        key: "gamma",
        default: 1.0,
        transform: Transform::Pure(tone::gamma),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Red,
        key: "red",
        default: 0.0,
        transform: Transform::Pure(color::red),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Green,
        key: "green",
        default: 0.0,
        transform: Transform::Pure(color::green),
    },
    AdjustmentEntry {
        kind: AdjustmentKind::Blue,
        key: "blue",
        default: 0.0,
        transform: Transform::Pure(color::blue),
    },
];

impl AdjustmentKind {
    /// All kinds in application order.
    pub const ORDER: [AdjustmentKind; ADJUSTMENT_COUNT] = [
        AdjustmentKind::Hue,
        AdjustmentKind::Saturation,
        AdjustmentKind::Temperature,
        AdjustmentKind::Sharpness,
        AdjustmentKind::Blur,
        AdjustmentKind::Noise,
        AdjustmentKind::Brightness,
        AdjustmentKind::Contrast,
        AdjustmentKind::Exposure,
        AdjustmentKind::Shadows,
        AdjustmentKind::Highlights,
        AdjustmentKind::Vignette,
        AdjustmentKind::Gamma,
        AdjustmentKind::Red,
        AdjustmentKind::Green,
        AdjustmentKind::Blue,
    ];

    /// Position in the application order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Table row for this kind.
    pub fn entry(self) -> &'static AdjustmentEntry {
        &ADJUSTMENTS[self.index()]
    }

    /// Lowercase key used by hosts.
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    /// Neutral value.
    pub fn default_value(self) -> f32 {
        self.entry().default
    }

    /// Apply this adjustment to `image`.
    pub fn apply(self, image: &Image, value: f32, rng: &mut WyRand) -> Result<Image, EditError> {
        self.entry().transform.run(image, value, rng)
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AdjustmentKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ADJUSTMENTS
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(wanted))
            .map(|entry| entry.kind)
            .ok_or_else(|| EditError::UnsupportedAdjustmentKey(s.to_string()))
    }
}

/// Keys of every adjustment in application order.
pub fn adjustment_keys() -> impl Iterator<Item = &'static str> {
    ADJUSTMENTS.iter().map(|entry| entry.key)
}

/// Map every color sample through a 256-entry lookup table. Alpha is copied.
pub(crate) fn map_color_samples(image: &Image, lut: &[u8; 256]) -> Image {
    let source = image.color_view();
    let step = source.channels as usize;
    let colors = source.color_channels();
    let pixels = source
        .pixels
        .iter()
        .enumerate()
        .map(|(i, &v)| if i % step < colors { lut[v as usize] } else { v })
        .collect();
    source.with_pixels(pixels)
}

/// Build a lookup table from a per-sample function.
pub(crate) fn build_lut<F: Fn(f32) -> f32>(f: F) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = crate::raster::clamp_u8(f(i as f32));
    }
    lut
}
