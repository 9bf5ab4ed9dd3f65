//! Stylizing filters: pixelate, glitch, invert, sepia, grayscale and cartoon.

use image::imageops::FilterType;
use nanorand::{Rng, WyRand};

use crate::error::{ensure_finite, EditError};
use crate::raster::kernel::{bilateral, box_mean_plane, median_plane};
use crate::raster::{clamp_u8, Image};

/// Sepia color-mixing matrix, one row per output channel.
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Median window radius used to denoise the cartoon edge mask (5×5).
const CARTOON_MEDIAN_RADIUS: usize = 2;
/// Adaptive threshold neighborhood radius (9×9).
const CARTOON_BLOCK_RADIUS: usize = 4;
/// Constant subtracted from the neighborhood mean.
const CARTOON_THRESHOLD_C: f32 = 9.0;
/// Bilateral filter radius (diameter 9).
const CARTOON_BILATERAL_RADIUS: usize = 4;
const CARTOON_SIGMA_COLOR: f32 = 300.0;
const CARTOON_SIGMA_SPACE: f32 = 300.0;

/// Mosaic the image into square blocks of `block` pixels.
///
/// The image is shrunk by the block factor with linear interpolation and
/// scaled back with nearest-neighbor sampling. The block size must be at
/// least 1 and strictly smaller than both dimensions.
pub fn pixelate(image: &Image, block: f32) -> Result<Image, EditError> {
    image.validate()?;
    let block = ensure_finite("pixelate block size", block)?.round();
    let (w, h) = (image.width, image.height);
    if block < 1.0 || block >= w.min(h) as f32 {
        return Err(EditError::InvalidParameter(format!(
            "pixelate block size {block} must be between 1 and {} for a {w}x{h} image",
            w.min(h).saturating_sub(1)
        )));
    }
    let block = block as u32;

    let source = image.color_view();
    let small = source
        .to_dynamic()?
        .resize_exact(w / block, h / block, FilterType::Triangle);
    let restored = small.resize_exact(w, h, FilterType::Nearest);
    Image::from_dynamic(restored)
}

/// Shift each color channel horizontally by its own random offset.
///
/// Offsets are drawn from `[floor(-w/10), floor(w/10))` and rows wrap
/// around, so images narrower than ten pixels always shift by -1.
pub fn glitch(image: &Image, rng: &mut WyRand) -> Result<Image, EditError> {
    image.validate()?;
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width as usize, rgb.height as usize);
    let step = rgb.channels as usize;
    let low = -(w.div_ceil(10) as i64);
    let high = (w / 10) as i64;

    let mut pixels = rgb.pixels.clone();
    for c in 0..rgb.color_channels() {
        let shift = rng.generate_range(0..(high - low) as u64) as i64 + low;
        if shift == 0 {
            continue;
        }
        for y in 0..h {
            for x in 0..w {
                let from = (x as i64 - shift).rem_euclid(w as i64) as usize;
                pixels[(y * w + x) * step + c] = rgb.pixels[(y * w + from) * step + c];
            }
        }
    }
    Ok(rgb.with_pixels(pixels))
}

/// Photographic negative of the color channels.
pub fn invert(image: &Image) -> Result<Image, EditError> {
    image.validate()?;
    let source = image.color_view();
    let step = source.channels as usize;
    let colors = source.color_channels();
    let pixels = source
        .pixels
        .iter()
        .enumerate()
        .map(|(i, &v)| if i % step < colors { 255 - v } else { v })
        .collect();
    Ok(source.with_pixels(pixels))
}

/// Warm brown tint via [`SEPIA_MATRIX`].
pub fn sepia(image: &Image) -> Result<Image, EditError> {
    image.validate()?;
    let rgb = image.to_rgb();
    let step = rgb.channels as usize;
    let mut pixels = rgb.pixels.clone();
    for px in pixels.chunks_exact_mut(step) {
        let input = [px[0] as f32, px[1] as f32, px[2] as f32];
        for (out, row) in px.iter_mut().zip(SEPIA_MATRIX.iter()) {
            *out = clamp_u8(row[0] * input[0] + row[1] * input[1] + row[2] * input[2]);
        }
    }
    Ok(rgb.with_pixels(pixels))
}

/// Luma replicated into three channels. Alpha is dropped.
pub fn grayscale(image: &Image) -> Result<Image, EditError> {
    image.validate()?;
    let gray = image.to_luma();
    let pixels = gray.pixels.iter().flat_map(|&v| [v, v, v]).collect();
    Image::rgb(gray.width, gray.height, pixels)
}

/// Flat color regions outlined by dark edges.
///
/// The edge mask comes from a median-blurred luma plane passed through an
/// adaptive mean threshold; the color base is bilateral-filtered. Pixels
/// outside the mask become black. The result is RGB without alpha.
pub fn cartoon(image: &Image) -> Result<Image, EditError> {
    image.validate()?;
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width as usize, rgb.height as usize);
    let color = if rgb.has_alpha() {
        strip_alpha(&rgb)?
    } else {
        rgb
    };

    let gray = color.to_luma();
    let blurred = median_plane(&gray.pixels, w, h, CARTOON_MEDIAN_RADIUS);
    let means = box_mean_plane(&blurred, w, h, CARTOON_BLOCK_RADIUS);

    let base = bilateral(
        &color,
        CARTOON_BILATERAL_RADIUS,
        CARTOON_SIGMA_COLOR,
        CARTOON_SIGMA_SPACE,
    );
    let mut pixels = base.pixels;
    for (i, px) in pixels.chunks_exact_mut(3).enumerate() {
        let is_edge = blurred[i] as f32 <= means[i] - CARTOON_THRESHOLD_C;
        if is_edge {
            px.fill(0);
        }
    }
    Image::rgb(color.width, color.height, pixels)
}

fn strip_alpha(image: &Image) -> Result<Image, EditError> {
    let pixels = image
        .pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    Image::rgb(image.width, image.height, pixels)
}
