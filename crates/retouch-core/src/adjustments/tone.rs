//! Tone adjustments: brightness, contrast, exposure, gamma, shadows,
//! highlights and vignette.
//!
//! These act uniformly on every color channel and keep the input layout
//! (grayscale stays grayscale, alpha is copied through).

use super::{build_lut, map_color_samples};
use crate::error::{ensure_finite, EditError};
use crate::raster::{clamp_u8, Image};

/// Midpoint used as the contrast pivot.
const CONTRAST_PIVOT: f32 = 128.0;

/// Scale every color sample by `factor`.
///
/// Formula: `output = input * factor`
pub fn brightness(image: &Image, factor: f32) -> Result<Image, EditError> {
    image.validate()?;
    let factor = ensure_finite("brightness", factor)?;
    Ok(scale(image, factor))
}

/// Stretch or flatten values around mid-gray.
///
/// Formula: `output = (input - 128) * factor + 128`
pub fn contrast(image: &Image, factor: f32) -> Result<Image, EditError> {
    image.validate()?;
    let factor = ensure_finite("contrast", factor)?;
    let lut = build_lut(|v| (v - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT);
    Ok(map_color_samples(image, &lut))
}

/// Exposure as a linear gain.
///
/// Numerically identical to [`brightness`]; kept separate so both sliders
/// can be combined.
pub fn exposure(image: &Image, factor: f32) -> Result<Image, EditError> {
    image.validate()?;
    let factor = ensure_finite("exposure", factor)?;
    Ok(scale(image, factor))
}

/// Power-law transform on normalized values.
///
/// Formula: `output = 255 * (input / 255)^gamma`
pub fn gamma(image: &Image, gamma: f32) -> Result<Image, EditError> {
    image.validate()?;
    let gamma = ensure_finite("gamma", gamma)?;
    let lut = build_lut(|v| 255.0 * (v / 255.0).powf(gamma));
    Ok(map_color_samples(image, &lut))
}

/// Uniformly darken by `intensity` (0 = unchanged, 1 = black).
pub fn shadows(image: &Image, intensity: f32) -> Result<Image, EditError> {
    image.validate()?;
    let intensity = ensure_finite("shadows", intensity)?;
    Ok(scale(image, 1.0 - intensity))
}

/// Pull values toward white by `intensity` (0 = unchanged, 1 = white).
///
/// Formula: `output = input + (255 - input) * intensity`
pub fn highlights(image: &Image, intensity: f32) -> Result<Image, EditError> {
    image.validate()?;
    let intensity = ensure_finite("highlights", intensity)?;
    let lut = build_lut(|v| v + (255.0 - v) * intensity);
    Ok(map_color_samples(image, &lut))
}

/// Darken toward the edges.
///
/// Each pixel is multiplied by `clamp(1 - strength * r, 0, 1)` where `r` is
/// the distance from the center in coordinates normalized to [-1, 1] on both
/// axes. An axis with a single sample sits at 0.
pub fn vignette(image: &Image, strength: f32) -> Result<Image, EditError> {
    image.validate()?;
    let strength = ensure_finite("vignette", strength)?;
    let source = image.color_view();
    if strength == 0.0 {
        return Ok(source.into_owned());
    }

    let (w, h) = (source.width as usize, source.height as usize);
    let step = source.channels as usize;
    let colors = source.color_channels();
    let mut pixels = source.pixels.clone();

    for y in 0..h {
        let ny = normalized_coord(y, h);
        for x in 0..w {
            let nx = normalized_coord(x, w);
            let mask = (1.0 - strength * (nx * nx + ny * ny).sqrt()).clamp(0.0, 1.0);
            let base = (y * w + x) * step;
            for sample in &mut pixels[base..base + colors] {
                *sample = clamp_u8(*sample as f32 * mask);
            }
        }
    }
    Ok(source.with_pixels(pixels))
}

/// Map `i` in `0..len` onto [-1, 1].
fn normalized_coord(i: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        2.0 * i as f32 / (len - 1) as f32 - 1.0
    }
}

fn scale(image: &Image, factor: f32) -> Image {
    let lut = build_lut(|v| v * factor);
    map_color_samples(image, &lut)
}
