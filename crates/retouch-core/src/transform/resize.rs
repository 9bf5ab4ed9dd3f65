//! Resizing to exact dimensions with Lanczos3 resampling.

use image::imageops::FilterType;

use crate::error::EditError;
use crate::raster::Image;

/// Resize an image to exact dimensions.
///
/// Aspect ratio is not preserved. A zero width or height is rejected with
/// `InvalidParameter`; matching dimensions return a copy.
pub fn apply_resize(image: &Image, width: u32, height: u32) -> Result<Image, EditError> {
    image.validate()?;
    if width == 0 || height == 0 {
        return Err(EditError::InvalidParameter(format!(
            "resize target must be non-empty, got {width}x{height}"
        )));
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.color_view().into_owned());
    }

    let resized = image
        .to_dynamic()?
        .resize_exact(width, height, FilterType::Lanczos3);
    Image::from_dynamic(resized)
}
