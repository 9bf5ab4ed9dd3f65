//! Mirroring across the vertical or horizontal center line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::raster::Image;

/// Axis to mirror an image along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDirection {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

impl FlipDirection {
    pub fn name(self) -> &'static str {
        match self {
            FlipDirection::Horizontal => "horizontal",
            FlipDirection::Vertical => "vertical",
        }
    }
}

impl fmt::Display for FlipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlipDirection {
    type Err = EditError;

    /// Accepts `horizontal` or `vertical`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(FlipDirection::Horizontal),
            "vertical" => Ok(FlipDirection::Vertical),
            _ => Err(EditError::InvalidParameter(format!(
                "flip direction must be 'horizontal' or 'vertical', got '{s}'"
            ))),
        }
    }
}

/// Mirror the image. Dimensions, channels and color space are kept.
pub fn apply_flip(image: &Image, direction: FlipDirection) -> Result<Image, EditError> {
    image.validate()?;
    let step = image.channels as usize;
    let stride = image.width as usize * step;
    let mut output = Vec::with_capacity(image.pixels.len());

    match direction {
        FlipDirection::Horizontal => {
            for row in image.pixels.chunks_exact(stride) {
                for px in row.chunks_exact(step).rev() {
                    output.extend_from_slice(px);
                }
            }
        }
        FlipDirection::Vertical => {
            for row in image.pixels.chunks_exact(stride).rev() {
                output.extend_from_slice(row);
            }
        }
    }
    Ok(image.with_pixels(output))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = Image> {
        (1u32..10, 1u32..10).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |pixels| Image::rgb(w, h, pixels).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_flip_twice_is_identity(img in image_strategy(), vertical in any::<bool>()) {
            let direction = if vertical { FlipDirection::Vertical } else { FlipDirection::Horizontal };
            let once = apply_flip(&img, direction).unwrap();
            prop_assert_eq!(apply_flip(&once, direction).unwrap(), img);
        }
    }
}
