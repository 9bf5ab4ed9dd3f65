//! Detail adjustments: sharpness, blur and noise.

use nanorand::{Rng, WyRand};

use crate::error::{ensure_finite, EditError};
use crate::raster::kernel::{self, Border, Kernel};
use crate::raster::{clamp_u8, Image};

/// 3×3 smoothing kernel used as the "degenerate" image for sharpening.
pub const SMOOTH: Kernel = Kernel {
    size: 3,
    weights: &[1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
    scale: 13.0,
    offset: 0.0,
};

/// Blend the image away from (or toward) its smoothed version.
///
/// Formula: `output = smooth + factor * (input - smooth)`
///
/// A factor of 1 returns the input, 0 returns the smoothed image and values
/// above 1 sharpen.
pub fn sharpness(image: &Image, factor: f32) -> Result<Image, EditError> {
    image.validate()?;
    let factor = ensure_finite("sharpness", factor)?;
    let source = image.color_view();
    if factor == 1.0 {
        return Ok(source.into_owned());
    }

    let smooth = kernel::convolve(&source, &SMOOTH, Border::Clamp);
    let step = source.channels as usize;
    let colors = source.color_channels();
    let pixels = source
        .pixels
        .iter()
        .zip(&smooth.pixels)
        .enumerate()
        .map(|(i, (&orig, &soft))| {
            if i % step < colors {
                let soft = soft as f32;
                clamp_u8(soft + factor * (orig as f32 - soft))
            } else {
                orig
            }
        })
        .collect();
    Ok(source.with_pixels(pixels))
}

/// Gaussian blur with a fixed 3×3 kernel and the given sigma.
///
/// A sigma of zero or less uses the fixed (1, 2, 1) / 4 taps.
pub fn blur(image: &Image, sigma: f32) -> Result<Image, EditError> {
    image.validate()?;
    let sigma = ensure_finite("blur", sigma)?;
    let source = image.color_view();
    Ok(kernel::gaussian_blur_3x3(&source, sigma))
}

/// Add zero-mean Gaussian noise with standard deviation `stddev` to every
/// color sample.
pub fn noise(image: &Image, stddev: f32, rng: &mut WyRand) -> Result<Image, EditError> {
    image.validate()?;
    let stddev = ensure_finite("noise", stddev)?;
    let source = image.color_view();
    if stddev == 0.0 {
        return Ok(source.into_owned());
    }

    let step = source.channels as usize;
    let colors = source.color_channels();
    let mut pixels = source.pixels.clone();
    for px in pixels.chunks_exact_mut(step) {
        for sample in &mut px[..colors] {
            let delta = standard_normal(rng) * stddev as f64;
            *sample = clamp_u8((*sample as f64 + delta) as f32);
        }
    }
    Ok(source.with_pixels(pixels))
}

/// One draw from N(0, 1) via the Box-Muller transform.
fn standard_normal(rng: &mut WyRand) -> f64 {
    let u1 = unit_open(rng.generate::<u64>());
    let u2 = unit_open(rng.generate::<u64>());
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Map 53 random bits onto (0, 1].
fn unit_open(bits: u64) -> f64 {
    ((bits >> 11) as f64 + 1.0) / (1u64 << 53) as f64
}
