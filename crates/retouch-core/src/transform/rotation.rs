//! Image rotation with bilinear and Lanczos3 interpolation.
//!
//! Angles are in degrees, positive = counter-clockwise. Exact quarter turns
//! are lossless pixel moves; any other angle is resampled.
//!
//! # Algorithm
//!
//! Arbitrary angles use inverse mapping: for each output pixel center we
//! find the source position it came from and interpolate there.
//!
//! ```text
//! src_x = dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y = dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! where `(dx, dy)` is the output pixel center relative to the output
//! center. Output pixels that map outside the source are zero in every
//! channel (black, and transparent when there is alpha).

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, EditError};
use crate::raster::{clamp_u8, Image};

/// Angles closer than this to a quarter turn are treated as exact.
const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    Bilinear,
    /// Lanczos3 interpolation over a 6×6 window.
    #[default]
    Lanczos3,
}

/// Size of the output canvas of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationCanvas {
    /// Keep the source dimensions; rotated corners are cut off.
    #[default]
    Keep,
    /// Grow the canvas to the bounding box of the rotated image.
    Expand,
}

/// Angle folded into `[0, 360)`.
fn normalize_degrees(angle_degrees: f64) -> f64 {
    let angle = angle_degrees.rem_euclid(360.0);
    if (360.0 - angle) < ANGLE_EPSILON {
        0.0
    } else {
        angle
    }
}

/// Number of counter-clockwise quarter turns, if the angle is one.
fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let angle = normalize_degrees(angle_degrees);
    (0..4u8).find(|&turns| (angle - turns as f64 * 90.0).abs() < ANGLE_EPSILON)
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// Returns `(new_width, new_height)`, never zero.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image around its center.
///
/// Quarter turns move pixels without interpolation. On a [`RotationCanvas::Keep`]
/// canvas this only applies to 180° or to square images; a 90° turn of a
/// non-square image is resampled like any other angle so the dimensions
/// stay put. HSV input comes back as RGB. Layout is otherwise kept.
///
/// Non-finite angles are rejected with `InvalidParameter`.
pub fn apply_rotation(
    image: &Image,
    angle_degrees: f32,
    filter: InterpolationFilter,
    canvas: RotationCanvas,
) -> Result<Image, EditError> {
    image.validate()?;
    let angle = ensure_finite("rotation angle", angle_degrees)? as f64;
    let source = image.color_view();

    match quarter_turns(angle) {
        Some(0) => return Ok(source.into_owned()),
        Some(2) => return rotate_quarter_turns(&source, 2),
        Some(turns) if canvas == RotationCanvas::Expand || source.width == source.height => {
            return rotate_quarter_turns(&source, turns);
        }
        _ => {}
    }

    let (dst_w, dst_h) = match canvas {
        RotationCanvas::Keep => (source.width, source.height),
        RotationCanvas::Expand => compute_rotated_bounds(source.width, source.height, angle),
    };
    Ok(resample_rotated(&source, angle, filter, dst_w, dst_h))
}

/// Lossless counter-clockwise rotation by `turns` quarter turns.
fn rotate_quarter_turns(image: &Image, turns: u8) -> Result<Image, EditError> {
    let dynamic = image.to_dynamic()?;
    // `image` turns clockwise
    let rotated = match turns % 4 {
        1 => dynamic.rotate270(),
        2 => dynamic.rotate180(),
        3 => dynamic.rotate90(),
        _ => dynamic,
    };
    Image::from_dynamic(rotated)
}

fn resample_rotated(
    image: &Image,
    angle_degrees: f64,
    filter: InterpolationFilter,
    dst_w: u32,
    dst_h: u32,
) -> Image {
    let step = image.channels as usize;
    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Centers in pixel-center coordinates
    let src_cx = image.width as f64 / 2.0 - 0.5;
    let src_cy = image.height as f64 / 2.0 - 0.5;
    let dst_cx = dst_w as f64 / 2.0 - 0.5;
    let dst_cy = dst_h as f64 / 2.0 - 0.5;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * step];
    let mut sample = vec![0.0f64; step];

    for dst_y in 0..dst_h as usize {
        for dst_x in 0..dst_w as usize {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            let inside = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y, &mut sample),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y, &mut sample),
            };
            if !inside {
                continue;
            }

            let dst_idx = (dst_y * dst_w as usize + dst_x) * step;
            for (out, &value) in output[dst_idx..dst_idx + step].iter_mut().zip(&sample) {
                *out = clamp_u8(value as f32);
            }
        }
    }

    Image {
        width: dst_w,
        height: dst_h,
        channels: image.channels,
        color_space: image.color_space,
        pixels: output,
    }
}

/// Whether `(x, y)` lies on the source image, counting the half pixel
/// around each edge center.
#[inline]
fn covers(image: &Image, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x <= image.width as f64 - 0.5 && y <= image.height as f64 - 0.5
}

#[inline]
fn sample_at(image: &Image, px: usize, py: usize, channel: usize) -> f64 {
    let step = image.channels as usize;
    image.pixels[(py * image.width as usize + px) * step + channel] as f64
}

/// Sample a pixel using bilinear interpolation.
///
/// Writes every channel into `out` and returns whether the point is on the
/// image. Neighbors past the edge repeat the edge pixel.
fn sample_bilinear(image: &Image, x: f64, y: f64, out: &mut [f64]) -> bool {
    if !covers(image, x, y) {
        return false;
    }
    let (max_x, max_y) = (image.width as i64 - 1, image.height as i64 - 1);

    let x_floor = x.floor();
    let y_floor = y.floor();
    let fx = x - x_floor;
    let fy = y - y_floor;

    let x0 = (x_floor as i64).clamp(0, max_x) as usize;
    let y0 = (y_floor as i64).clamp(0, max_y) as usize;
    let x1 = (x_floor as i64 + 1).clamp(0, max_x) as usize;
    let y1 = (y_floor as i64 + 1).clamp(0, max_y) as usize;

    for (c, slot) in out.iter_mut().enumerate() {
        *slot = sample_at(image, x0, y0, c) * (1.0 - fx) * (1.0 - fy)
            + sample_at(image, x1, y0, c) * fx * (1.0 - fy)
            + sample_at(image, x0, y1, c) * (1.0 - fx) * fy
            + sample_at(image, x1, y1, c) * fx * fy;
    }
    true
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Falls back to bilinear within three pixels of an edge, where the 6×6
/// window would leave the image.
fn sample_lanczos3(image: &Image, x: f64, y: f64, out: &mut [f64]) -> bool {
    let (w, h) = (image.width as i64, image.height as i64);
    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y, out);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    out.fill(0.0);
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = (x0 + kx) as usize;
            let py = (y0 + ky) as usize;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            for (c, slot) in out.iter_mut().enumerate() {
                *slot += sample_at(image, px, py, c) * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum > 0.0 {
        for slot in out.iter_mut() {
            *slot /= weight_sum;
        }
    }
    true
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ColorSpace;

    /// Gray gradient, one value per pixel.
    fn test_image(width: u32, height: u32) -> Image {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        Image::rgb(width, height, pixels).unwrap()
    }

    /// Grayscale image numbered 10, 20, 30, ... in row-major order.
    fn numbered(width: u32, height: u32) -> Image {
        let pixels = (1..=width * height).map(|i| (i * 10) as u8).collect();
        Image::gray(width, height, pixels).unwrap()
    }

    // ===== Bounds Tests =====

    #[test]
    fn test_quarter_turn_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -90.0), (50, 100));
    }

    #[test]
    fn test_large_rotation_angles() {
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 359.9999), (100, 50));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert!(w > 140 && w < 143, "width was {}", w);
        assert!(h > 140 && h < 143, "height was {}", h);
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = compute_rotated_bounds(1, 1, angle);
            assert!(w > 0 && h > 0, "angle {}", angle);
        }
    }

    // ===== Quarter Turn Tests =====

    #[test]
    fn test_no_rotation() {
        let img = test_image(10, 5);
        assert_eq!(
            apply_rotation(&img, 0.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap(),
            img
        );
        assert_eq!(
            apply_rotation(&img, 360.0, InterpolationFilter::Lanczos3, RotationCanvas::Keep)
                .unwrap(),
            img
        );
    }

    #[test]
    fn test_quarter_turn_counter_clockwise() {
        // 10 20 30
        // 40 50 60
        let img = numbered(3, 2);
        let out = apply_rotation(&img, 90.0, InterpolationFilter::Bilinear, RotationCanvas::Expand)
            .unwrap();
        assert_eq!((out.width, out.height), (2, 3));
        // The right column ends up on top
        assert_eq!(out.pixels, vec![30, 60, 20, 50, 10, 40]);
        assert_eq!(out.color_space, ColorSpace::Grayscale);
    }

    #[test]
    fn test_negative_quarter_turn_is_clockwise() {
        let img = numbered(3, 2);
        let out = apply_rotation(&img, -90.0, InterpolationFilter::Bilinear, RotationCanvas::Expand)
            .unwrap();
        assert_eq!(out.pixels, vec![40, 10, 50, 20, 60, 30]);
    }

    #[test]
    fn test_half_turn_keeps_canvas() {
        let img = numbered(3, 2);
        let out =
            apply_rotation(&img, 180.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap();
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.pixels, vec![60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_square_quarter_turn_on_kept_canvas_is_lossless() {
        let img = numbered(2, 2);
        let out =
            apply_rotation(&img, 90.0, InterpolationFilter::Lanczos3, RotationCanvas::Keep).unwrap();
        assert_eq!(out.pixels, vec![20, 40, 10, 30]);
    }

    #[test]
    fn test_non_square_quarter_turn_on_kept_canvas() {
        // 10 20 30 40
        // 50 60 70 80
        let img = numbered(4, 2);
        let out =
            apply_rotation(&img, 90.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap();
        assert_eq!((out.width, out.height), (4, 2));
        // Middle columns of the source, turned; the sides fall off the source
        assert_eq!(out.pixels, vec![0, 30, 70, 0, 0, 20, 60, 0]);
    }

    // ===== Resampling Tests =====

    #[test]
    fn test_rotation_expands_canvas() {
        let img = test_image(100, 100);
        let result =
            apply_rotation(&img, 45.0, InterpolationFilter::Bilinear, RotationCanvas::Expand)
                .unwrap();
        assert!(result.width > img.width);
        assert!(result.height > img.height);
        // Corners of the expanded canvas lie outside the source
        assert_eq!(&result.pixels[..3], &[0, 0, 0]);
    }

    #[test]
    fn test_kept_canvas_keeps_dimensions() {
        let img = test_image(30, 20);
        for angle in [1.0, 15.0, -45.0, 89.0, 135.0] {
            let result =
                apply_rotation(&img, angle, InterpolationFilter::Bilinear, RotationCanvas::Keep)
                    .unwrap();
            assert_eq!((result.width, result.height), (30, 20), "angle {}", angle);
            assert_eq!(result.pixels.len(), img.pixels.len());
        }
    }

    #[test]
    fn test_uniform_center_survives_lanczos() {
        let img = Image::filled_rgb(20, 20, [100, 150, 200]).unwrap();
        let out =
            apply_rotation(&img, 10.0, InterpolationFilter::Lanczos3, RotationCanvas::Keep).unwrap();
        let idx = (10 * 20 + 10) * 3;
        assert_eq!(&out.pixels[idx..idx + 3], &[100, 150, 200]);
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear =
            apply_rotation(&img, 15.0, InterpolationFilter::Bilinear, RotationCanvas::Expand)
                .unwrap();
        let lanczos =
            apply_rotation(&img, 15.0, InterpolationFilter::Lanczos3, RotationCanvas::Expand)
                .unwrap();
        assert_eq!((bilinear.width, bilinear.height), (lanczos.width, lanczos.height));
    }

    #[test]
    fn test_alpha_outside_is_transparent() {
        let img = Image::rgba(8, 8, vec![200; 8 * 8 * 4]).unwrap();
        let out =
            apply_rotation(&img, 45.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap();
        assert_eq!(out.channels, 4);
        assert_eq!(&out.pixels[..4], &[0, 0, 0, 0]);
        let idx = (4 * 8 + 4) * 4;
        assert_eq!(&out.pixels[idx..idx + 4], &[200, 200, 200, 200]);
    }

    #[test]
    fn test_tiny_images() {
        let one = Image::filled_rgb(1, 1, [128, 128, 128]).unwrap();
        let out =
            apply_rotation(&one, 45.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap();
        assert_eq!(out.pixels, vec![128, 128, 128]);

        for (w, h) in [(100, 1), (1, 100), (8, 8)] {
            let img = test_image(w, h);
            let out =
                apply_rotation(&img, 37.0, InterpolationFilter::Lanczos3, RotationCanvas::Expand)
                    .unwrap();
            assert!(out.width > 0 && out.height > 0);
        }
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let img = test_image(4, 4);
        for angle in [f32::NAN, f32::INFINITY] {
            let err = apply_rotation(&img, angle, InterpolationFilter::Bilinear, RotationCanvas::Keep)
                .unwrap_err();
            assert!(matches!(err, EditError::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_hsv_comes_back_as_rgb() {
        let img = Image::filled_rgb(2, 2, [255, 0, 0]).unwrap().to_hsv();
        let out =
            apply_rotation(&img, 180.0, InterpolationFilter::Bilinear, RotationCanvas::Keep).unwrap();
        assert_eq!(out.color_space, ColorSpace::Rgb);
        assert_eq!(&out.pixels[..3], &[255, 0, 0]);
    }

    // ===== Lanczos Weight Tests =====

    #[test]
    fn test_lanczos_weight_at_zero() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = Image> {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |pixels| Image::rgb(w, h, pixels).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_four_quarter_turns_round_trip(img in image_strategy()) {
            let mut out = img.clone();
            for _ in 0..4 {
                out = apply_rotation(&out, 90.0, InterpolationFilter::Bilinear, RotationCanvas::Expand)
                    .unwrap();
            }
            prop_assert_eq!(out, img);
        }

        #[test]
        fn prop_kept_canvas_keeps_layout(
            img in image_strategy(),
            angle in -720.0f32..720.0,
            lanczos in any::<bool>(),
        ) {
            let filter = if lanczos {
                InterpolationFilter::Lanczos3
            } else {
                InterpolationFilter::Bilinear
            };
            let out = apply_rotation(&img, angle, filter, RotationCanvas::Keep).unwrap();
            prop_assert_eq!((out.width, out.height, out.channels), (img.width, img.height, 3));
            prop_assert_eq!(out.pixels.len(), img.pixels.len());
        }

        #[test]
        fn prop_expanded_canvas_matches_bounds(img in image_strategy(), angle in -360.0f32..360.0) {
            let out = apply_rotation(&img, angle, InterpolationFilter::Bilinear, RotationCanvas::Expand)
                .unwrap();
            let bounds = compute_rotated_bounds(img.width, img.height, angle as f64);
            prop_assert_eq!((out.width, out.height), bounds);
        }
    }
}
