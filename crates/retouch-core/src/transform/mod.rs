//! Geometric transforms applied to finished images.
//!
//! Orientation and cropping run after the filter and adjustment chain, so
//! they never change what the adjustments see. The session applies its
//! [`Geometry`] (rotation, then mirroring) to the adjusted image, and crops
//! are cut from that result.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Origin is the top-left corner

mod crop;
mod flip;
mod geometry;
mod resize;
mod rotation;

pub use crop::apply_crop;
pub use flip::{apply_flip, FlipDirection};
pub use geometry::Geometry;
pub use resize::apply_resize;
pub use rotation::{apply_rotation, compute_rotated_bounds, InterpolationFilter, RotationCanvas};
