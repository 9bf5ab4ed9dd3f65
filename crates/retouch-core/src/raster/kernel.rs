//! Neighborhood operations shared by adjustments and filters.
//!
//! All functions read from the input image and write a new buffer. Color
//! channels are processed, alpha is carried over unchanged.

use super::types::{clamp_u8, Image};

/// A square convolution kernel with a divisor and a bias.
///
/// `output = sum(weight * sample) / scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Side length (3 or 5).
    pub size: usize,
    /// Row-major weights, `size * size` entries.
    pub weights: &'static [f32],
    /// Divisor applied to the weighted sum.
    pub scale: f32,
    /// Bias added after scaling.
    pub offset: f32,
}

/// Border handling for samples that fall outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Repeat the edge pixel (`aaa|abcd|ddd`).
    Clamp,
    /// Mirror without repeating the edge (`cb|abcd|cb`).
    Reflect101,
}

impl Border {
    #[inline]
    fn index(self, i: isize, len: usize) -> usize {
        let last = len as isize - 1;
        if last == 0 {
            return 0;
        }
        match self {
            Border::Clamp => i.clamp(0, last) as usize,
            Border::Reflect101 => {
                let mut i = i;
                while i < 0 || i > last {
                    if i < 0 {
                        i = -i;
                    }
                    if i > last {
                        i = 2 * last - i;
                    }
                }
                i as usize
            }
        }
    }
}

/// Convolve the color channels of an image with `kernel`.
pub fn convolve(image: &Image, kernel: &Kernel, border: Border) -> Image {
    debug_assert_eq!(kernel.weights.len(), kernel.size * kernel.size);
    let (w, h) = (image.width as usize, image.height as usize);
    let step = image.channels as usize;
    let colors = image.color_channels();
    let radius = (kernel.size / 2) as isize;
    let mut out = image.pixels.clone();

    for y in 0..h {
        for x in 0..w {
            let dst = (y * w + x) * step;
            for c in 0..colors {
                let mut acc = 0.0f32;
                for ky in 0..kernel.size {
                    let sy = border.index(y as isize + ky as isize - radius, h);
                    for kx in 0..kernel.size {
                        let sx = border.index(x as isize + kx as isize - radius, w);
                        let weight = kernel.weights[ky * kernel.size + kx];
                        acc += weight * image.pixels[(sy * w + sx) * step + c] as f32;
                    }
                }
                out[dst + c] = clamp_u8(acc / kernel.scale + kernel.offset);
            }
        }
    }
    image.with_pixels(out)
}

/// Fixed binomial taps used when no sigma is given.
pub const GAUSSIAN_3_FIXED: [f32; 3] = [0.25, 0.5, 0.25];

/// Normalized 3-tap Gaussian weights for `sigma`.
///
/// A non-positive sigma selects [`GAUSSIAN_3_FIXED`].
pub fn gaussian_weights_3(sigma: f32) -> [f32; 3] {
    if sigma <= 0.0 {
        return GAUSSIAN_3_FIXED;
    }
    let side = (-1.0 / (2.0 * sigma * sigma)).exp();
    let sum = 1.0 + 2.0 * side;
    [side / sum, 1.0 / sum, side / sum]
}

/// Separable 3×3 Gaussian blur with mirrored borders.
pub fn gaussian_blur_3x3(image: &Image, sigma: f32) -> Image {
    let weights = gaussian_weights_3(sigma);
    let (w, h) = (image.width as usize, image.height as usize);
    let step = image.channels as usize;
    let colors = image.color_channels();
    let border = Border::Reflect101;

    // Horizontal pass into f32 to avoid rounding twice
    let mut horizontal = vec![0.0f32; image.pixels.len()];
    for y in 0..h {
        for x in 0..w {
            for c in 0..colors {
                let mut acc = 0.0;
                for (k, weight) in weights.iter().enumerate() {
                    let sx = border.index(x as isize + k as isize - 1, w);
                    acc += weight * image.pixels[(y * w + sx) * step + c] as f32;
                }
                horizontal[(y * w + x) * step + c] = acc;
            }
        }
    }

    let mut out = image.pixels.clone();
    for y in 0..h {
        for x in 0..w {
            for c in 0..colors {
                let mut acc = 0.0;
                for (k, weight) in weights.iter().enumerate() {
                    let sy = border.index(y as isize + k as isize - 1, h);
                    acc += weight * horizontal[(sy * w + x) * step + c];
                }
                out[(y * w + x) * step + c] = clamp_u8(acc);
            }
        }
    }
    image.with_pixels(out)
}

/// Median of the `(2 * radius + 1)²` neighborhood of every sample in a plane.
pub fn median_plane(plane: &[u8], width: usize, height: usize, radius: usize) -> Vec<u8> {
    let side = 2 * radius + 1;
    let mut window = Vec::with_capacity(side * side);
    let mut out = vec![0u8; plane.len()];
    let r = radius as isize;

    for y in 0..height {
        for x in 0..width {
            window.clear();
            for dy in -r..=r {
                let sy = Border::Clamp.index(y as isize + dy, height);
                for dx in -r..=r {
                    let sx = Border::Clamp.index(x as isize + dx, width);
                    window.push(plane[sy * width + sx]);
                }
            }
            window.sort_unstable();
            out[y * width + x] = window[window.len() / 2];
        }
    }
    out
}

/// Mean of the `(2 * radius + 1)²` neighborhood of every sample in a plane.
///
/// Uses a summed-area table over the edge-padded plane.
pub fn box_mean_plane(plane: &[u8], width: usize, height: usize, radius: usize) -> Vec<f32> {
    let r = radius as isize;
    let (pw, ph) = (width + 2 * radius, height + 2 * radius);

    // integral has one leading row/column of zeros
    let mut integral = vec![0u64; (pw + 1) * (ph + 1)];
    for py in 0..ph {
        let sy = Border::Clamp.index(py as isize - r, height);
        let mut row_sum = 0u64;
        for px in 0..pw {
            let sx = Border::Clamp.index(px as isize - r, width);
            row_sum += plane[sy * width + sx] as u64;
            integral[(py + 1) * (pw + 1) + px + 1] = integral[py * (pw + 1) + px + 1] + row_sum;
        }
    }

    let side = 2 * radius + 1;
    let area = (side * side) as f32;
    let mut out = vec![0.0f32; plane.len()];
    for y in 0..height {
        for x in 0..width {
            // window [x, x + side) in padded coordinates
            let (x0, y0, x1, y1) = (x, y, x + side, y + side);
            let sum = integral[y1 * (pw + 1) + x1] + integral[y0 * (pw + 1) + x0]
                - integral[y0 * (pw + 1) + x1]
                - integral[y1 * (pw + 1) + x0];
            out[y * width + x] = sum as f32 / area;
        }
    }
    out
}

/// Edge-preserving bilateral smoothing of the color channels.
///
/// Neighbors within a circle of `radius` contribute with a spatial Gaussian
/// weight times a range weight based on the summed absolute color difference.
pub fn bilateral(image: &Image, radius: usize, sigma_color: f32, sigma_space: f32) -> Image {
    let (w, h) = (image.width as usize, image.height as usize);
    let step = image.channels as usize;
    let colors = image.color_channels();
    let r = radius as isize;

    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let dist_sq = (dx * dx + dy * dy) as f32;
            if dist_sq <= (r * r) as f32 {
                offsets.push((dx, dy, (dist_sq * space_coeff).exp()));
            }
        }
    }

    // one weight per possible L1 distance between two pixels
    let max_diff = 255 * colors;
    let color_lut: Vec<f32> = (0..=max_diff)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut out = image.pixels.clone();
    let mut acc = [0.0f32; 3];
    for y in 0..h {
        for x in 0..w {
            let center = (y * w + x) * step;
            acc[..colors].fill(0.0);
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_weight) in &offsets {
                let sy = Border::Reflect101.index(y as isize + dy, h);
                let sx = Border::Reflect101.index(x as isize + dx, w);
                let idx = (sy * w + sx) * step;

                let diff: usize = (0..colors)
                    .map(|c| image.pixels[idx + c].abs_diff(image.pixels[center + c]) as usize)
                    .sum();
                let weight = space_weight * color_lut[diff];
                for (c, value) in acc[..colors].iter_mut().enumerate() {
                    *value += weight * image.pixels[idx + c] as f32;
                }
                weight_sum += weight;
            }

            for c in 0..colors {
                out[center + c] = clamp_u8(acc[c] / weight_sum);
            }
        }
    }
    image.with_pixels(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: Kernel = Kernel {
        size: 3,
        weights: &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        scale: 1.0,
        offset: 0.0,
    };

    fn gradient(width: u32, height: u32) -> Image {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 37 + y * 11) % 256) as u8;
                pixels.extend_from_slice(&[v, 255 - v, v / 2]);
            }
        }
        Image::rgb(width, height, pixels).unwrap()
    }

    #[test]
    fn test_border_index() {
        assert_eq!(Border::Clamp.index(-2, 5), 0);
        assert_eq!(Border::Clamp.index(7, 5), 4);
        assert_eq!(Border::Reflect101.index(-1, 5), 1);
        assert_eq!(Border::Reflect101.index(5, 5), 3);
        assert_eq!(Border::Reflect101.index(-1, 1), 0);
        assert_eq!(Border::Reflect101.index(2, 2), 0);
    }

    #[test]
    fn test_identity_kernel() {
        let img = gradient(5, 4);
        assert_eq!(convolve(&img, &IDENTITY, Border::Clamp), img);
    }

    #[test]
    fn test_convolve_keeps_alpha() {
        const DARKEN: Kernel = Kernel {
            size: 3,
            weights: &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            scale: 2.0,
            offset: 0.0,
        };
        let img = Image::rgba(1, 1, vec![200, 100, 50, 99]).unwrap();
        let out = convolve(&img, &DARKEN, Border::Clamp);
        assert_eq!(out.pixels, vec![100, 50, 25, 99]);
    }

    #[test]
    fn test_gaussian_weights_sum_to_one() {
        for sigma in [0.0, 0.5, 1.0, 3.0, 50.0] {
            let w = gaussian_weights_3(sigma);
            assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-6);
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_gaussian_weights_fixed_without_sigma() {
        assert_eq!(gaussian_weights_3(0.0), [0.25, 0.5, 0.25]);
        assert_eq!(gaussian_weights_3(-2.0), GAUSSIAN_3_FIXED);
        assert_ne!(gaussian_weights_3(0.8), GAUSSIAN_3_FIXED);
    }

    #[test]
    fn test_gaussian_blur_fixed_taps_on_spike() {
        let mut pixels = vec![0u8; 5 * 5];
        pixels[12] = 255;
        let img = Image::gray(5, 5, pixels).unwrap();
        let out = gaussian_blur_3x3(&img, 0.0);
        // Outer product of (1, 2, 1) / 4
        assert_eq!(out.pixels[12], 64);
        assert_eq!(out.pixels[7], 32);
        assert_eq!(out.pixels[6], 16);
        assert_eq!(out.pixels[0], 0);
    }

    #[test]
    fn test_gaussian_blur_uniform_is_stable() {
        let img = Image::filled_rgb(6, 5, [90, 120, 240]).unwrap();
        assert_eq!(gaussian_blur_3x3(&img, 1.5), img);
    }

    #[test]
    fn test_gaussian_blur_spreads_a_spike() {
        let mut pixels = vec![0u8; 3 * 3 * 3];
        pixels[4 * 3] = 255;
        let img = Image::rgb(3, 3, pixels).unwrap();
        let out = gaussian_blur_3x3(&img, 1.0);
        assert!(out.pixels[4 * 3] < 255);
        assert!(out.pixels[0] > 0);
    }

    #[test]
    fn test_median_removes_impulse() {
        let mut plane = vec![10u8; 25];
        plane[12] = 250;
        let out = median_plane(&plane, 5, 5, 1);
        assert_eq!(out[12], 10);
    }

    #[test]
    fn test_box_mean() {
        let plane = vec![0, 0, 0, 0, 90, 0, 0, 0, 0];
        let out = box_mean_plane(&plane, 3, 3, 1);
        assert!((out[4] - 10.0).abs() < 1e-5);

        let flat = vec![42u8; 12];
        let out = box_mean_plane(&flat, 4, 3, 4);
        assert!(out.iter().all(|&v| (v - 42.0).abs() < 1e-4));
    }

    #[test]
    fn test_bilateral_uniform_is_stable() {
        let img = Image::filled_rgb(5, 5, [33, 66, 99]).unwrap();
        assert_eq!(bilateral(&img, 4, 300.0, 300.0), img);
    }
}
