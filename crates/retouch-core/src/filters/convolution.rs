//! Classic convolution presets and the Gaussian blur filter.

use crate::adjustments::detail::SMOOTH;
use crate::error::{ensure_finite, EditError};
use crate::raster::kernel::{convolve, Border, Kernel};
use crate::raster::Image;

pub const CONTOUR: Kernel = Kernel {
    size: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 255.0,
};

pub const DETAIL: Kernel = Kernel {
    size: 3,
    weights: &[0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0],
    scale: 6.0,
    offset: 0.0,
};

pub const EDGE_ENHANCE: Kernel = Kernel {
    size: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
    scale: 2.0,
    offset: 0.0,
};

pub const EDGE_ENHANCE_MORE: Kernel = Kernel {
    size: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

pub const EMBOSS: Kernel = Kernel {
    size: 3,
    weights: &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    scale: 1.0,
    offset: 128.0,
};

pub const FIND_EDGES: Kernel = Kernel {
    size: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const SMOOTH_MORE: Kernel = Kernel {
    size: 5,
    weights: &[
        1.0, 1.0,  1.0, 1.0, 1.0,
        1.0, 5.0,  5.0, 5.0, 1.0,
        1.0, 5.0, 44.0, 5.0, 1.0,
        1.0, 5.0,  5.0, 5.0, 1.0,
        1.0, 1.0,  1.0, 1.0, 1.0,
    ],
    scale: 100.0,
    offset: 0.0,
};

fn apply_kernel(image: &Image, kernel: &Kernel) -> Result<Image, EditError> {
    image.validate()?;
    Ok(convolve(&image.color_view(), kernel, Border::Clamp))
}

/// Trace edges as dark lines on white.
pub fn contour(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &CONTOUR)
}

pub fn detail(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &DETAIL)
}

pub fn edge_enhance(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &EDGE_ENHANCE)
}

pub fn edge_enhance_more(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &EDGE_ENHANCE_MORE)
}

/// Relief effect around mid-gray.
pub fn emboss(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &EMBOSS)
}

/// Edges on black.
pub fn find_edges(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &FIND_EDGES)
}

pub fn smooth(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &SMOOTH)
}

pub fn smooth_more(image: &Image) -> Result<Image, EditError> {
    apply_kernel(image, &SMOOTH_MORE)
}

/// Gaussian blur with standard deviation `sigma`, computed by `image::imageops`.
///
/// A non-positive sigma leaves the image unchanged.
pub fn gaussian_blur(image: &Image, sigma: f32) -> Result<Image, EditError> {
    image.validate()?;
    let sigma = ensure_finite("blur radius", sigma)?;
    let source = image.color_view();
    if sigma <= 0.0 {
        return Ok(source.into_owned());
    }
    let blurred = source.to_dynamic()?.blur(sigma);
    Image::from_dynamic(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> Image {
        Image::filled_rgb(5, 4, [90, 150, 210]).unwrap()
    }

    fn spike() -> Image {
        let mut pixels = vec![100u8; 5 * 5 * 3];
        for c in 0..3 {
            pixels[12 * 3 + c] = 200;
        }
        Image::rgb(5, 5, pixels).unwrap()
    }

    #[test]
    fn test_kernel_weights_match_size() {
        for kernel in [
            CONTOUR,
            DETAIL,
            EDGE_ENHANCE,
            EDGE_ENHANCE_MORE,
            EMBOSS,
            FIND_EDGES,
            SMOOTH,
            SMOOTH_MORE,
        ] {
            assert_eq!(kernel.weights.len(), kernel.size * kernel.size);
        }
        assert_eq!(SMOOTH_MORE.weights.iter().sum::<f32>(), SMOOTH_MORE.scale);
    }

    // ===== Uniform Image Tests =====

    #[test]
    fn test_contour_uniform_is_white() {
        let out = contour(&uniform()).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_emboss_uniform_is_mid_gray() {
        let out = emboss(&uniform()).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_find_edges_uniform_is_black() {
        let out = find_edges(&uniform()).unwrap();
        assert!(out.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_balanced_kernels_keep_uniform() {
        let img = uniform();
        for filter in [detail, edge_enhance, edge_enhance_more, smooth, smooth_more] {
            assert_eq!(filter(&img).unwrap(), img);
        }
    }

    // ===== Response Tests =====

    #[test]
    fn test_find_edges_responds_to_spike() {
        let out = find_edges(&spike()).unwrap();
        // center: 8 * 200 - 8 * 100
        assert_eq!(out.pixels[12 * 3], 255);
        // direct neighbor: 8 * 100 - (7 * 100 + 200)
        assert_eq!(out.pixels[11 * 3], 0);
    }

    #[test]
    fn test_smooth_spreads_spike() {
        let out = smooth(&spike()).unwrap();
        // (5 * 200 + 8 * 100) / 13
        assert_eq!(out.pixels[12 * 3], 138);
        // (200 + 12 * 100) / 13
        assert_eq!(out.pixels[11 * 3], 108);
    }

    #[test]
    fn test_kernels_keep_alpha() {
        let img = Image::rgba(2, 2, vec![10, 20, 30, 1, 40, 50, 60, 2, 70, 80, 90, 3, 5, 5, 5, 4])
            .unwrap();
        let out = emboss(&img).unwrap();
        let alpha: Vec<u8> = out.pixels.iter().skip(3).step_by(4).copied().collect();
        assert_eq!(alpha, vec![1, 2, 3, 4]);
    }

    // ===== Gaussian Blur Tests =====

    #[test]
    fn test_gaussian_blur_softens_spike() {
        let img = spike();
        let out = gaussian_blur(&img, 1.0).unwrap();
        assert_eq!((out.width, out.height), (5, 5));
        assert!(out.pixels[12 * 3] < 200);
        assert!(out.pixels[11 * 3] > 100);
    }

    #[test]
    fn test_gaussian_blur_zero_sigma_is_identity() {
        let img = spike();
        assert_eq!(gaussian_blur(&img, 0.0).unwrap(), img);
    }
}
