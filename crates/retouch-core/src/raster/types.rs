//! Core pixel buffer types.

use crate::error::EditError;
use serde::{Deserialize, Serialize};

/// Color space tag carried by every [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Red, green, blue (optionally followed by alpha).
    #[default]
    Rgb,
    /// Hue (0-179), saturation (0-255), value (0-255).
    Hsv,
    /// Single luma channel.
    Grayscale,
}

/// An 8-bit raster image.
///
/// Pixels are stored interleaved in row-major order with `channels` bytes per
/// pixel: 1 for grayscale, 3 for RGB/HSV, 4 for RGBA. Transforms never modify
/// an image in place; they always return a freshly allocated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Bytes per pixel (1, 3 or 4).
    pub channels: u8,
    /// How the channel values are to be interpreted.
    pub color_space: ColorSpace,
    /// Interleaved pixel data, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
}

impl Image {
    /// Create an image after checking that the buffer matches the layout.
    pub fn new(
        width: u32,
        height: u32,
        channels: u8,
        color_space: ColorSpace,
        pixels: Vec<u8>,
    ) -> Result<Self, EditError> {
        let image = Self {
            width,
            height,
            channels,
            color_space,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Create an RGB image (3 bytes per pixel).
    pub fn rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditError> {
        Self::new(width, height, 3, ColorSpace::Rgb, pixels)
    }

    /// Create an RGBA image (4 bytes per pixel).
    pub fn rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditError> {
        Self::new(width, height, 4, ColorSpace::Rgb, pixels)
    }

    /// Create a single-channel grayscale image.
    pub fn gray(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditError> {
        Self::new(width, height, 1, ColorSpace::Grayscale, pixels)
    }

    /// An RGB image where every pixel has the same color.
    pub fn filled_rgb(width: u32, height: u32, color: [u8; 3]) -> Result<Self, EditError> {
        let count = width as usize * height as usize;
        let pixels = color.iter().copied().cycle().take(count * 3).collect();
        Self::rgb(width, height, pixels)
    }

    /// Check the invariants every transform relies on.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.width == 0 || self.height == 0 {
            return Err(EditError::InvalidImage(format!(
                "zero-size image ({}x{})",
                self.width, self.height
            )));
        }
        match (self.color_space, self.channels) {
            (ColorSpace::Grayscale, 1) | (ColorSpace::Hsv, 3) | (ColorSpace::Rgb, 3 | 4) => {}
            (space, channels) => {
                return Err(EditError::InvalidImage(format!(
                    "{channels} channel(s) cannot hold {space:?} data"
                )));
            }
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.channels as usize))
            .ok_or_else(|| {
                EditError::InvalidImage(format!(
                    "dimensions overflow ({}x{}x{})",
                    self.width, self.height, self.channels
                ))
            })?;
        if self.pixels.len() != expected {
            return Err(EditError::InvalidImage(format!(
                "pixel buffer has {} bytes, expected {}",
                self.pixels.len(),
                expected
            )));
        }
        Ok(())
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Number of bytes the buffer must hold. Saturates for layouts that
    /// [`validate`](Self::validate) rejects as overflowing.
    pub fn sample_count(&self) -> usize {
        self.pixel_count().saturating_mul(self.channels as usize)
    }

    /// Number of color (non-alpha) channels.
    pub fn color_channels(&self) -> usize {
        match self.channels {
            4 => 3,
            n => n as usize,
        }
    }

    /// Whether the last channel is alpha.
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Same layout and dimensions, new pixel data.
    pub(crate) fn with_pixels(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), self.sample_count(), "Pixel buffer size mismatch");
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            color_space: self.color_space,
            pixels,
        }
    }

    /// Create an image from an `image::DynamicImage`.
    ///
    /// 8-bit gray, RGB and RGBA buffers are taken as-is; anything else
    /// (16-bit, float, gray+alpha) is converted to 8-bit RGB or RGBA first.
    pub fn from_dynamic(img: image::DynamicImage) -> Result<Self, EditError> {
        match img {
            image::DynamicImage::ImageLuma8(buf) => Self::from_gray_image(buf),
            image::DynamicImage::ImageRgb8(buf) => Self::from_rgb_image(buf),
            image::DynamicImage::ImageRgba8(buf) => Self::from_rgba_image(buf),
            other if other.color().has_alpha() => Self::from_rgba_image(other.to_rgba8()),
            other => Self::from_rgb_image(other.to_rgb8()),
        }
    }

    /// Create an image from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self, EditError> {
        let (width, height) = img.dimensions();
        Self::rgb(width, height, img.into_raw())
    }

    /// Create an image from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, EditError> {
        let (width, height) = img.dimensions();
        Self::rgba(width, height, img.into_raw())
    }

    /// Create an image from an `image::GrayImage`.
    pub fn from_gray_image(img: image::GrayImage) -> Result<Self, EditError> {
        let (width, height) = img.dimensions();
        Self::gray(width, height, img.into_raw())
    }

    /// Convert to an `image::DynamicImage` for use with `image::imageops`.
    ///
    /// HSV data is converted back to RGB on the way out.
    pub fn to_dynamic(&self) -> Result<image::DynamicImage, EditError> {
        let mismatch = || EditError::InvalidImage("pixel buffer does not match dimensions".into());
        let rgb;
        let source = if self.color_space == ColorSpace::Hsv {
            rgb = self.to_rgb();
            &rgb
        } else {
            self
        };
        let (w, h, pixels) = (source.width, source.height, source.pixels.clone());
        let dynamic = match source.channels {
            1 => image::DynamicImage::ImageLuma8(
                image::GrayImage::from_raw(w, h, pixels).ok_or_else(mismatch)?,
            ),
            3 => image::DynamicImage::ImageRgb8(
                image::RgbImage::from_raw(w, h, pixels).ok_or_else(mismatch)?,
            ),
            4 => image::DynamicImage::ImageRgba8(
                image::RgbaImage::from_raw(w, h, pixels).ok_or_else(mismatch)?,
            ),
            n => {
                return Err(EditError::InvalidImage(format!(
                    "unsupported channel count {n}"
                )))
            }
        };
        Ok(dynamic)
    }
}

/// Round half away from zero and clamp into the 8-bit range.
///
/// This is the single rounding rule used by every transform, so a value of
/// 127.5 always lands on 128.
#[inline]
pub fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
