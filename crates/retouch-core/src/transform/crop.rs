//! Image cropping.
//!
//! Crops are expressed as [`PixelRect`]s in image coordinates, usually
//! produced by [`map_view_rect`](crate::viewport::map_view_rect) from a
//! selection the user drew on the canvas.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - `x + width` and `y + height` are exclusive edges

use crate::error::EditError;
use crate::raster::Image;
use crate::viewport::PixelRect;

/// Copy the pixels inside `rect` into a new image.
///
/// The rectangle must be non-empty and lie inside the image, otherwise
/// `InvalidParameter` is returned. Layout (channels, color space) is kept.
///
/// A rectangle covering the whole image returns a copy of it.
pub fn apply_crop(image: &Image, rect: &PixelRect) -> Result<Image, EditError> {
    image.validate()?;
    if !rect.fits_within(image.width, image.height) {
        return Err(EditError::InvalidParameter(format!(
            "crop {}x{} at ({}, {}) does not fit a {}x{} image",
            rect.width, rect.height, rect.x, rect.y, image.width, image.height
        )));
    }

    // Fast path: full crop returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let step = image.channels as usize;
    let src_stride = image.width as usize * step;
    let row_len = rect.width as usize * step;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.y..rect.bottom() {
        let start = y as usize * src_stride + rect.x as usize * step;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Image::new(
        rect.width,
        rect.height,
        image.channels,
        image.color_space,
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> Image {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        Image::rgb(width, height, pixels).unwrap()
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = apply_crop(&img, &PixelRect::new(0, 0, 100, 100)).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_center_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &PixelRect::new(2, 2, 6, 6)).unwrap();

        assert_eq!(result.width, 6);
        assert_eq!(result.height, 6);
        // Value at (2, 2) = 2 * 10 + 2
        assert_eq!(result.pixels[0], 22);
        // Last pixel is (7, 7)
        assert_eq!(result.pixels[result.pixels.len() - 1], 77);
    }

    #[test]
    fn test_crop_rectangular() {
        let img = test_image(200, 100);
        let result = apply_crop(&img, &PixelRect::new(0, 0, 50, 100)).unwrap();
        assert_eq!(result.width, 50);
        assert_eq!(result.height, 100);
    }

    #[test]
    fn test_single_pixel_crop() {
        let img = test_image(10, 10);
        let result = apply_crop(&img, &PixelRect::new(9, 9, 1, 1)).unwrap();
        assert_eq!(result.pixels, vec![99, 99, 99]);
    }

    #[test]
    fn test_crop_keeps_layout() {
        let img = Image::rgba(2, 2, (0u8..16).collect()).unwrap();
        let result = apply_crop(&img, &PixelRect::new(1, 0, 1, 2)).unwrap();
        assert_eq!(result.channels, 4);
        assert_eq!(result.pixels, vec![4, 5, 6, 7, 12, 13, 14, 15]);

        let gray = Image::gray(3, 1, vec![1, 2, 3]).unwrap();
        let result = apply_crop(&gray, &PixelRect::new(1, 0, 2, 1)).unwrap();
        assert_eq!(result.pixels, vec![2, 3]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let img = test_image(10, 10);
        for rect in [
            PixelRect::new(8, 8, 5, 5),
            PixelRect::new(0, 0, 0, 4),
            PixelRect::new(10, 0, 1, 1),
        ] {
            let err = apply_crop(&img, &rect).unwrap_err();
            assert!(matches!(err, EditError::InvalidParameter(_)), "{rect:?}");
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
