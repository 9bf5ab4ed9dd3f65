//! Retouch Core - non-destructive image adjustment engine
//!
//! This crate turns a source image plus a set of edit parameters into a
//! display image. Nothing here decodes or encodes files; hosts hand in raw
//! pixel buffers and get raw pixel buffers back.
//!
//! - [`adjustments`]: the sixteen numeric tone and color adjustments
//! - [`filters`]: the mutually exclusive preset filters
//! - [`session`]: the editing session with recompute and undo
//! - [`viewport`]: zoom, pan and canvas-to-image mapping
//! - [`transform`]: rotation, mirroring, resizing and cropping
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod adjustments;
pub mod config;
pub mod error;
pub mod filters;
pub mod raster;
pub mod session;
pub mod transform;
pub mod viewport;

pub use adjustments::{adjustment_keys, AdjustmentKind};
pub use config::SessionConfig;
pub use error::EditError;
pub use filters::{catalog, CatalogEntry, FilterKind, FilterSelection};
pub use raster::{ColorSpace, Image};
pub use session::{AdjustmentSet, AdjustmentSpec, EditSession, SessionState, Snapshot};
pub use transform::{
    apply_crop, apply_flip, apply_resize, apply_rotation, FlipDirection, Geometry,
    InterpolationFilter, RotationCanvas,
};
pub use viewport::{map_view_rect, PixelRect, ViewRect, Viewport};
