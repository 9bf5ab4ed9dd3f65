//! Color space conversions.
//!
//! RGB↔HSV uses the 8-bit convention: hue is stored as degrees / 2 so it fits
//! in 0..=179, saturation and value span 0..=255. Every quantization step goes
//! through [`clamp_u8`], so repeated round trips use one fixed formula.
//!
//! Luma uses the ITU-R BT.601 weights in 16-bit fixed point.

use std::borrow::Cow;

use super::types::{clamp_u8, ColorSpace, Image};

/// Number of distinct hue values in the 8-bit HSV encoding.
pub const HUE_RANGE: f32 = 180.0;

/// BT.601 red weight scaled by 65536.
pub const LUMA_R: u32 = 19595;

/// BT.601 green weight scaled by 65536.
pub const LUMA_G: u32 = 38470;

/// BT.601 blue weight scaled by 65536.
pub const LUMA_B: u32 = 7471;

/// BT.601 luma of an 8-bit RGB triple, rounded to nearest.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 0x8000) >> 16) as u8
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let saturation = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let degrees = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    // 359.x degrees rounds up to 180, which wraps back to red
    let hue = clamp_u8(degrees / 2.0) % HUE_RANGE as u8;
    [hue, clamp_u8(saturation), max as u8]
}

/// Convert one 8-bit HSV pixel back to RGB.
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> [u8; 3] {
    if s == 0 {
        return [v, v, v];
    }
    let degrees = (h as f32 % HUE_RANGE) * 2.0;
    let s = s as f32 / 255.0;
    let v = v as f32;

    let sector = degrees / 60.0;
    let index = sector.floor();
    let fraction = sector - index;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * fraction);
    let t = v * (1.0 - s * (1.0 - fraction));

    let (r, g, b) = match index as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

impl Image {
    /// Return the image as RGB (or RGBA when it carries alpha).
    ///
    /// Grayscale is replicated into three channels and HSV is converted back.
    /// RGB input is returned as a copy.
    pub fn to_rgb(&self) -> Image {
        match self.color_space {
            ColorSpace::Rgb => self.clone(),
            ColorSpace::Grayscale => {
                let pixels = self.pixels.iter().flat_map(|&v| [v, v, v]).collect();
                Image {
                    width: self.width,
                    height: self.height,
                    channels: 3,
                    color_space: ColorSpace::Rgb,
                    pixels,
                }
            }
            ColorSpace::Hsv => {
                let pixels = self
                    .pixels
                    .chunks_exact(3)
                    .flat_map(|px| hsv_to_rgb(px[0], px[1], px[2]))
                    .collect();
                Image {
                    color_space: ColorSpace::Rgb,
                    ..self.with_pixels(pixels)
                }
            }
        }
    }

    /// Borrow RGB and grayscale images as they are; HSV data is converted
    /// back to RGB so per-sample math sees real color values.
    pub(crate) fn color_view(&self) -> Cow<'_, Image> {
        if self.color_space == ColorSpace::Hsv {
            Cow::Owned(self.to_rgb())
        } else {
            Cow::Borrowed(self)
        }
    }

    /// Convert to 3-channel HSV. Alpha, if any, is dropped.
    pub fn to_hsv(&self) -> Image {
        if self.color_space == ColorSpace::Hsv {
            return self.clone();
        }
        let rgb = self.to_rgb();
        let step = rgb.channels as usize;
        let pixels = rgb
            .pixels
            .chunks_exact(step)
            .flat_map(|px| rgb_to_hsv(px[0], px[1], px[2]))
            .collect();
        Image {
            width: self.width,
            height: self.height,
            channels: 3,
            color_space: ColorSpace::Hsv,
            pixels,
        }
    }

    /// Single-channel BT.601 luma plane.
    pub fn to_luma(&self) -> Image {
        if self.color_space == ColorSpace::Grayscale {
            return self.clone();
        }
        let rgb = self.to_rgb();
        let step = rgb.channels as usize;
        let pixels = rgb
            .pixels
            .chunks_exact(step)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect();
        Image {
            width: self.width,
            height: self.height,
            channels: 1,
            color_space: ColorSpace::Grayscale,
            pixels,
        }
    }

    /// Map HSV pixels through `f`, keeping alpha from the original image.
    ///
    /// The result is RGB (or RGBA) again.
    pub(crate) fn map_hsv<F>(&self, mut f: F) -> Image
    where
        F: FnMut([u8; 3]) -> [u8; 3],
    {
        let rgb = self.to_rgb();
        let step = rgb.channels as usize;
        let mut pixels = Vec::with_capacity(rgb.pixels.len());
        for px in rgb.pixels.chunks_exact(step) {
            let [h, s, v] = f(rgb_to_hsv(px[0], px[1], px[2]));
            pixels.extend_from_slice(&hsv_to_rgb(h, s, v));
            if step == 4 {
                pixels.push(px[3]);
            }
        }
        rgb.with_pixels(pixels)
    }
}
