//! Accumulated rotation and mirroring of a session.

use serde::{Deserialize, Serialize};

use super::flip::{apply_flip, FlipDirection};
use super::rotation::{apply_rotation, InterpolationFilter, RotationCanvas};
use crate::error::{ensure_finite, EditError};
use crate::raster::Image;

/// Orientation applied to the finished image: rotate first, then mirror.
///
/// Rotations and flips are folded into this one value as they arrive, so
/// the output is always a single resampling of its input no matter how many
/// steps led here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Counter-clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Geometry {
    /// Whether applying this geometry leaves images untouched.
    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && !self.flip_horizontal && !self.flip_vertical
    }

    /// This geometry followed by a counter-clockwise turn of `degrees`.
    ///
    /// Turning a mirrored image is the same as mirroring an image turned the
    /// other way, so the angle is subtracted while exactly one flip is set.
    pub fn rotated(self, degrees: f32) -> Result<Self, EditError> {
        let degrees = ensure_finite("rotation angle", degrees)?;
        let degrees = if self.flip_horizontal != self.flip_vertical {
            -degrees
        } else {
            degrees
        };
        let mut rotation = (self.rotation + degrees).rem_euclid(360.0);
        if rotation >= 360.0 {
            rotation = 0.0;
        }
        Ok(Self { rotation, ..self })
    }

    /// This geometry followed by a mirror along `direction`.
    pub fn flipped(self, direction: FlipDirection) -> Self {
        match direction {
            FlipDirection::Horizontal => Self {
                flip_horizontal: !self.flip_horizontal,
                ..self
            },
            FlipDirection::Vertical => Self {
                flip_vertical: !self.flip_vertical,
                ..self
            },
        }
    }

    /// Rotate on a kept canvas, then mirror.
    pub fn apply(&self, image: &Image, filter: InterpolationFilter) -> Result<Image, EditError> {
        let mut out = apply_rotation(image, self.rotation, filter, RotationCanvas::Keep)?;
        if self.flip_horizontal {
            out = apply_flip(&out, FlipDirection::Horizontal)?;
        }
        if self.flip_vertical {
            out = apply_flip(&out, FlipDirection::Vertical)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10 20
    // 30 40
    fn square() -> Image {
        Image::gray(2, 2, vec![10, 20, 30, 40]).unwrap()
    }

    fn step_by_step(image: &Image, steps: &[Step]) -> Image {
        let mut out = image.clone();
        for step in steps {
            out = match *step {
                Step::Turn(degrees) => apply_rotation(
                    &out,
                    degrees,
                    InterpolationFilter::Bilinear,
                    RotationCanvas::Keep,
                )
                .unwrap(),
                Step::Flip(direction) => apply_flip(&out, direction).unwrap(),
            };
        }
        out
    }

    fn folded(steps: &[Step]) -> Geometry {
        steps.iter().fold(Geometry::default(), |geometry, step| match *step {
            Step::Turn(degrees) => geometry.rotated(degrees).unwrap(),
            Step::Flip(direction) => geometry.flipped(direction),
        })
    }

    #[derive(Clone, Copy)]
    enum Step {
        Turn(f32),
        Flip(FlipDirection),
    }

    #[test]
    fn test_default_is_identity() {
        let geometry = Geometry::default();
        assert!(geometry.is_identity());
        assert_eq!(
            geometry.apply(&square(), InterpolationFilter::Bilinear).unwrap(),
            square()
        );
    }

    #[test]
    fn test_rotation_wraps() {
        let geometry = Geometry::default().rotated(270.0).unwrap().rotated(180.0).unwrap();
        assert_eq!(geometry.rotation, 90.0);
        let geometry = Geometry::default().rotated(-90.0).unwrap();
        assert_eq!(geometry.rotation, 270.0);
        let geometry = geometry.rotated(90.0).unwrap();
        assert!(geometry.is_identity());
    }

    #[test]
    fn test_double_flip_is_identity() {
        let geometry = Geometry::default()
            .flipped(FlipDirection::Vertical)
            .flipped(FlipDirection::Vertical);
        assert!(geometry.is_identity());
    }

    #[test]
    fn test_non_finite_rotation_rejected() {
        let err = Geometry::default().rotated(f32::NAN).unwrap_err();
        assert!(matches!(err, EditError::InvalidParameter(_)));
    }

    #[test]
    fn test_folded_matches_step_by_step() {
        use FlipDirection::*;
        let sequences: [&[Step]; 5] = [
            &[Step::Turn(90.0)],
            &[Step::Flip(Horizontal), Step::Turn(90.0)],
            &[Step::Turn(90.0), Step::Flip(Vertical), Step::Turn(180.0)],
            &[Step::Flip(Vertical), Step::Turn(-90.0), Step::Flip(Horizontal)],
            &[Step::Flip(Horizontal), Step::Flip(Vertical), Step::Turn(270.0)],
        ];
        for steps in sequences {
            let expected = step_by_step(&square(), steps);
            let actual = folded(steps)
                .apply(&square(), InterpolationFilter::Bilinear)
                .unwrap();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let geometry: Geometry = serde_json::from_str(r#"{"flip_vertical": true}"#).unwrap();
        assert_eq!(geometry.rotation, 0.0);
        assert!(geometry.flip_vertical);
        assert!(!geometry.flip_horizontal);
    }
}
