//! Color adjustments: per-channel shifts, temperature, hue and saturation.
//!
//! All of these address individual channels, so grayscale input is promoted
//! to RGB before the transform runs.

use crate::error::{ensure_finite, EditError};
use crate::raster::{clamp_u8, Image, HUE_RANGE};

/// Add integer offsets to the red, green and blue channels.
///
/// Offsets are rounded to the nearest integer and every result is clipped to
/// [0, 255]. Alpha is copied through.
pub fn shift_channels(image: &Image, offsets: [f32; 3]) -> Result<Image, EditError> {
    image.validate()?;
    for (name, value) in ["red", "green", "blue"].iter().zip(offsets) {
        ensure_finite(name, value)?;
    }
    let rgb = image.to_rgb();
    let offsets = offsets.map(f32::round);
    if offsets == [0.0; 3] {
        return Ok(rgb);
    }

    let step = rgb.channels as usize;
    let mut pixels = rgb.pixels.clone();
    for px in pixels.chunks_exact_mut(step) {
        for (sample, offset) in px.iter_mut().zip(offsets) {
            *sample = clamp_u8(*sample as f32 + offset);
        }
    }
    Ok(rgb.with_pixels(pixels))
}

/// Shift the red channel.
pub fn red(image: &Image, offset: f32) -> Result<Image, EditError> {
    shift_channels(image, [offset, 0.0, 0.0])
}

/// Shift the green channel.
pub fn green(image: &Image, offset: f32) -> Result<Image, EditError> {
    shift_channels(image, [0.0, offset, 0.0])
}

/// Shift the blue channel.
pub fn blue(image: &Image, offset: f32) -> Result<Image, EditError> {
    shift_channels(image, [0.0, 0.0, offset])
}

/// Warm (positive) or cool (negative) the image.
///
/// Red gains `shift` and blue loses it.
pub fn temperature(image: &Image, shift: f32) -> Result<Image, EditError> {
    let shift = ensure_finite("temperature", shift)?;
    shift_channels(image, [shift, 0.0, -shift])
}

/// Rotate hue by `shift` units of the 0-179 hue scale.
///
/// Formula: `H' = (H + shift) mod 180`, saturation and value unchanged.
pub fn hue(image: &Image, shift: f32) -> Result<Image, EditError> {
    image.validate()?;
    let shift = ensure_finite("hue", shift)?;
    let shift = shift.round().rem_euclid(HUE_RANGE) as u16;
    if shift == 0 {
        return Ok(image.to_rgb());
    }
    Ok(image.map_hsv(|[h, s, v]| {
        let h = (h as u16 + shift) % HUE_RANGE as u16;
        [h as u8, s, v]
    }))
}

/// Scale saturation by `factor` (0 = gray, 1 = unchanged).
///
/// Formula: `S' = clamp(S * factor, 0, 255)`, hue and value unchanged.
pub fn saturation(image: &Image, factor: f32) -> Result<Image, EditError> {
    image.validate()?;
    let factor = ensure_finite("saturation", factor)?;
    if factor == 1.0 {
        return Ok(image.to_rgb());
    }
    Ok(image.map_hsv(|[h, s, v]| [h, clamp_u8(s as f32 * factor), v]))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Shifting a channel never touches the other two.
        #[test]
        fn prop_red_shift_isolated(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            offset in -300.0f32..300.0,
        ) {
            let img = Image::rgb(1, 1, vec![r, g, b]).unwrap();
            let out = red(&img, offset).unwrap();
            prop_assert_eq!(out.pixels[1], g);
            prop_assert_eq!(out.pixels[2], b);
        }

        /// Property: Desaturating fully always yields neutral pixels.
        #[test]
        fn prop_zero_saturation_is_neutral(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let img = Image::rgb(1, 1, vec![r, g, b]).unwrap();
            let out = saturation(&img, 0.0).unwrap();
            prop_assert_eq!(out.pixels[0], out.pixels[1]);
            prop_assert_eq!(out.pixels[1], out.pixels[2]);
        }
    }
}
