//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Retouch types,
//! handling the conversion between Rust and JavaScript data representations.

use retouch_core::{ColorSpace, EditError, Image};
use wasm_bindgen::prelude::*;

/// A raw image wrapper for JavaScript.
///
/// Pixels are interleaved, row-major, with `channels` bytes per pixel:
/// 1 (grayscale), 3 (RGB) or 4 (RGBA). RGBA buffers match the layout of
/// `ImageData.data` from a canvas.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and pixel data.
    ///
    /// The buffer is checked when the image is handed to a session, not here.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - Bytes per pixel (1, 3 or 4)
    /// * `pixels` - Interleaved pixel data, row-major order
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes per pixel
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsImage {
    /// Wrap a core image. HSV data is converted to RGB first.
    pub(crate) fn from_image(img: &Image) -> Self {
        let img = if img.color_space == ColorSpace::Hsv {
            img.to_rgb()
        } else {
            img.clone()
        };
        Self {
            width: img.width,
            height: img.height,
            channels: img.channels,
            pixels: img.pixels,
        }
    }

    /// Convert to a core image, validating the buffer.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_image(&self) -> Result<Image, EditError> {
        let color_space = if self.channels == 1 {
            ColorSpace::Grayscale
        } else {
            ColorSpace::Rgb
        };
        Image::new(
            self.width,
            self.height,
            self.channels,
            color_space,
            self.pixels.clone(),
        )
    }
}
