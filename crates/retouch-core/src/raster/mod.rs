//! Raster buffers, color conversions and neighborhood kernels.
//!
//! Everything above this module (adjustments, filters, the session) works on
//! [`Image`] values and never touches raw layout rules directly.

mod color;
pub mod kernel;
mod types;

pub use color::{hsv_to_rgb, luma, rgb_to_hsv, HUE_RANGE};
pub use types::{clamp_u8, ColorSpace, Image};
