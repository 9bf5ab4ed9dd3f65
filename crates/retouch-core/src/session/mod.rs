//! Editing session.
//!
//! An [`EditSession`] owns the source image and derives the display image
//! from it on every change:
//!
//! 1. Apply the active filter, if any
//! 2. Apply every adjustment that differs from its default, in fixed order
//! 3. Rotate and mirror by the accumulated [`Geometry`]
//!
//! The source is never modified. Each recompute records a [`Snapshot`] of
//! the filter, adjustment values and geometry so [`EditSession::undo`] can
//! step back without storing pixels.

mod adjustment_set;
mod history;

pub use adjustment_set::{AdjustmentSet, AdjustmentSpec};
pub use history::{History, Snapshot};

use nanorand::{Rng, WyRand};
use serde::{Deserialize, Serialize};

use crate::adjustments::AdjustmentKind;
use crate::config::SessionConfig;
use crate::error::EditError;
use crate::filters::{FilterKind, FilterSelection};
use crate::raster::Image;
use crate::transform::{apply_crop, apply_resize, FlipDirection, Geometry};
use crate::viewport::{PixelRect, ViewRect, Viewport};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No image loaded yet.
    #[default]
    Empty,
    /// Image loaded, no filter and every adjustment at its default.
    Loaded,
    /// A filter, an adjustment or an orientation change is active.
    Modified,
}

/// Source of entropy for unseeded sessions.
pub type EntropyFn = fn() -> u64;

fn system_entropy() -> u64 {
    WyRand::new().generate::<u64>()
}

/// Stateful editor for a single image.
#[derive(Debug, Clone)]
pub struct EditSession {
    config: SessionConfig,
    source: Option<Image>,
    display: Option<Image>,
    filter: FilterSelection,
    adjustments: AdjustmentSet,
    geometry: Geometry,
    history: History,
    viewport: Viewport,
    skipped: Vec<EditError>,
    state: SessionState,
    entropy: EntropyFn,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_entropy(config, system_entropy)
    }

    /// Session drawing unseeded randomness from `entropy`.
    ///
    /// Hosts without OS entropy (wasm32) supply their own source here.
    pub fn with_entropy(config: SessionConfig, entropy: EntropyFn) -> Self {
        Self {
            history: History::new(config.history_depth),
            viewport: Viewport::from_config(&config),
            config,
            source: None,
            display: None,
            filter: FilterSelection::none(),
            adjustments: AdjustmentSet::new(),
            geometry: Geometry::default(),
            skipped: Vec::new(),
            state: SessionState::Empty,
            entropy,
        }
    }

    // ===== Commands =====

    /// Replace the source image and start over from a clean state.
    ///
    /// Filter, adjustments, geometry, viewport and history are all reset. On
    /// error the session is left untouched.
    pub fn load(&mut self, image: Image) -> Result<&Image, EditError> {
        image.validate()?;
        tracing::info!(
            "Loading {}x{} image ({} channels)",
            image.width,
            image.height,
            image.channels
        );

        self.source = Some(image);
        self.filter = FilterSelection::none();
        self.adjustments.reset();
        self.geometry = Geometry::default();
        self.viewport.reset();
        self.history.clear();
        self.refresh()
    }

    /// Select a filter with its default parameter.
    pub fn apply_filter(&mut self, kind: FilterKind) -> Result<&Image, EditError> {
        self.set_filter(FilterSelection::new(kind))
    }

    /// Select a filter with an explicit parameter.
    pub fn apply_filter_with(
        &mut self,
        kind: FilterKind,
        parameter: f32,
    ) -> Result<&Image, EditError> {
        self.set_filter(FilterSelection::with_parameter(kind, parameter))
    }

    /// Select a filter by its display name.
    pub fn apply_filter_named(&mut self, name: &str) -> Result<&Image, EditError> {
        let kind = name.parse::<FilterKind>()?;
        self.apply_filter(kind)
    }

    /// Swap in `selection`. If the filter fails, the previous one is kept and
    /// the error is returned.
    fn set_filter(&mut self, selection: FilterSelection) -> Result<&Image, EditError> {
        self.require_source()?;
        let selection = if selection.is_active() {
            selection
        } else {
            FilterSelection::none()
        };

        let previous = std::mem::replace(&mut self.filter, selection);
        tracing::debug!("Filter changed: {} -> {}", previous.kind, selection.kind);
        if let Err(err) = self.refresh_in_place() {
            self.filter = previous;
            return Err(err);
        }
        self.display()
    }

    /// Set one adjustment by key and recompute.
    pub fn apply_adjustment(&mut self, name: &str, value: f32) -> Result<&Image, EditError> {
        let kind = name.parse::<AdjustmentKind>()?;
        self.require_source()?;

        let previous = self.adjustments.value(kind);
        self.adjustments.set(kind, value);
        tracing::debug!("Adjustment {} changed: {} -> {}", kind, previous, value);
        if let Err(err) = self.refresh_in_place() {
            self.adjustments.set(kind, previous);
            return Err(err);
        }
        self.display()
    }

    /// Turn the image counter-clockwise by `degrees` on top of any earlier
    /// rotation. The canvas keeps its size.
    pub fn rotate(&mut self, degrees: f32) -> Result<&Image, EditError> {
        self.require_source()?;
        let geometry = self.geometry.rotated(degrees)?;
        tracing::debug!("Rotation changed: {} -> {}", self.geometry.rotation, geometry.rotation);
        self.set_geometry(geometry)
    }

    /// Mirror the image along `direction`. Flipping twice cancels out.
    pub fn flip(&mut self, direction: FlipDirection) -> Result<&Image, EditError> {
        self.require_source()?;
        tracing::debug!("Flip {}", direction);
        let geometry = self.geometry.flipped(direction);
        self.set_geometry(geometry)
    }

    /// Mirror by direction name (`horizontal` or `vertical`).
    pub fn flip_named(&mut self, name: &str) -> Result<&Image, EditError> {
        let direction = name.parse::<FlipDirection>()?;
        self.flip(direction)
    }

    /// Drop any rotation and mirroring.
    pub fn reset_geometry(&mut self) -> Result<&Image, EditError> {
        self.require_source()?;
        tracing::info!("Resetting rotation and flips");
        self.set_geometry(Geometry::default())
    }

    fn set_geometry(&mut self, geometry: Geometry) -> Result<&Image, EditError> {
        let previous = std::mem::replace(&mut self.geometry, geometry);
        if let Err(err) = self.refresh_in_place() {
            self.geometry = previous;
            return Err(err);
        }
        self.display()
    }

    /// Re-derive the display image from the source and record a snapshot.
    pub fn recompute(&mut self) -> Result<&Image, EditError> {
        self.require_source()?;
        self.refresh()
    }

    /// Clear the filter and geometry and put every adjustment back to its
    /// default.
    pub fn reset_all(&mut self) -> Result<&Image, EditError> {
        self.require_source()?;
        tracing::info!("Resetting all edits");
        self.filter = FilterSelection::none();
        self.adjustments.reset();
        self.geometry = Geometry::default();
        self.refresh()
    }

    /// Step back to the previous snapshot.
    ///
    /// With only the initial snapshot left this does nothing and returns the
    /// current display image.
    pub fn undo(&mut self) -> Result<&Image, EditError> {
        self.require_source()?;
        if self.history.len() <= 1 {
            tracing::debug!("Nothing to undo");
            return self.display();
        }

        self.history.pop();
        let Some(snapshot) = self.history.current().cloned() else {
            return self.display();
        };
        tracing::info!("Undo, {} snapshots left", self.history.len());

        self.filter = snapshot.filter;
        self.adjustments = snapshot.adjustments;
        self.geometry = snapshot.geometry;
        self.render_and_commit()?;
        self.display()
    }

    // ===== Queries =====

    /// Current display image.
    pub fn display_image(&self) -> Result<&Image, EditError> {
        self.display()
    }

    /// Unmodified source image.
    pub fn source_image(&self) -> Result<&Image, EditError> {
        self.source.as_ref().ok_or(EditError::NoImageLoaded)
    }

    pub fn adjustments(&self) -> &AdjustmentSet {
        &self.adjustments
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of snapshots available to undo through, including the current one.
    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Adjustments that failed and were skipped during the last recompute.
    pub fn skipped_adjustments(&self) -> &[EditError] {
        &self.skipped
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Map a canvas selection onto the display image with the session viewport.
    pub fn crop_rect(&self, view: &ViewRect) -> Option<PixelRect> {
        let display = self.display.as_ref()?;
        self.viewport.map(view, display.width, display.height)
    }

    /// Cut a canvas selection out of the display image.
    pub fn crop_display(&self, view: &ViewRect) -> Result<Image, EditError> {
        let display = self.display()?;
        let rect = self.crop_rect(view).ok_or_else(|| {
            EditError::InvalidParameter("crop selection does not overlap the image".to_string())
        })?;
        apply_crop(display, &rect)
    }

    /// Copy of the display image scaled to exactly `width` x `height`.
    ///
    /// The session itself is unchanged.
    pub fn resized_display(&self, width: u32, height: u32) -> Result<Image, EditError> {
        apply_resize(self.display()?, width, height)
    }

    // ===== Internals =====

    fn require_source(&self) -> Result<&Image, EditError> {
        self.source_image()
    }

    fn display(&self) -> Result<&Image, EditError> {
        self.display.as_ref().ok_or(EditError::NoImageLoaded)
    }

    fn rng(&self) -> WyRand {
        let seed = self.config.seed.unwrap_or_else(self.entropy);
        WyRand::new_seed(seed)
    }

    /// Filter first, then dirty adjustments in order, then geometry.
    ///
    /// A failing filter or geometry aborts the render. A failing adjustment is
    /// skipped and returned alongside the image.
    fn render(&self) -> Result<(Image, Vec<EditError>), EditError> {
        let source = self.require_source()?;
        let mut rng = self.rng();

        let mut image = if self.filter.is_active() {
            tracing::debug!("Applying filter {}", self.filter.kind);
            self.filter.apply(source, &mut rng)?
        } else {
            source.clone()
        };

        let mut skipped = Vec::new();
        for spec in self.adjustments.dirty() {
            tracing::debug!("Applying {} = {}", spec.key(), spec.current);
            match spec.transform().run(&image, spec.current, &mut rng) {
                Ok(next) => image = next,
                Err(err) => {
                    tracing::warn!("Skipping adjustment {}: {}", spec.key(), err);
                    skipped.push(EditError::recompute(spec.key(), err));
                }
            }
        }

        if !self.geometry.is_identity() {
            tracing::debug!(
                "Applying rotation {} (flip h: {}, v: {})",
                self.geometry.rotation,
                self.geometry.flip_horizontal,
                self.geometry.flip_vertical
            );
            image = self.geometry.apply(&image, self.config.interpolation)?;
        }
        Ok((image, skipped))
    }

    /// Render and store the result without touching history.
    fn render_and_commit(&mut self) -> Result<(), EditError> {
        let (image, skipped) = self.render()?;
        self.display = Some(image);
        self.skipped = skipped;
        self.state = if self.filter.is_active()
            || !self.adjustments.is_default()
            || !self.geometry.is_identity()
        {
            SessionState::Modified
        } else {
            SessionState::Loaded
        };
        Ok(())
    }

    /// Render, store and record a snapshot.
    fn refresh_in_place(&mut self) -> Result<(), EditError> {
        self.render_and_commit()?;
        self.history.push(Snapshot {
            filter: self.filter,
            adjustments: self.adjustments.clone(),
            geometry: self.geometry,
        });
        Ok(())
    }

    fn refresh(&mut self) -> Result<&Image, EditError> {
        self.refresh_in_place()?;
        self.display()
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = Image> {
        (1u32..=6, 1u32..=6).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |pixels| Image::rgb(w, h, pixels).unwrap())
        })
    }

    fn edit_strategy() -> impl Strategy<Value = (usize, f32)> {
        (0..AdjustmentKind::ORDER.len(), -50.0f32..50.0)
    }

    proptest! {
        /// Property: reset after any edits gives back the source exactly.
        #[test]
        fn prop_reset_round_trip(
            img in image_strategy(),
            edits in prop::collection::vec(edit_strategy(), 0..6),
        ) {
            let mut session = EditSession::new(SessionConfig::seeded(5));
            session.load(img.clone()).unwrap();
            for (index, value) in edits {
                let key = AdjustmentKind::ORDER[index].key();
                session.apply_adjustment(key, value).unwrap();
            }
            prop_assert_eq!(session.reset_all().unwrap(), &img);
            prop_assert_eq!(session.state(), SessionState::Loaded);
        }

        /// Property: N edits followed by N undos return to the loaded state.
        #[test]
        fn prop_undo_bound(
            img in image_strategy(),
            edits in prop::collection::vec(edit_strategy(), 1..8),
        ) {
            let mut session = EditSession::new(SessionConfig::seeded(9));
            session.load(img.clone()).unwrap();
            for &(index, value) in &edits {
                let key = AdjustmentKind::ORDER[index].key();
                session.apply_adjustment(key, value).unwrap();
            }
            for _ in 0..edits.len() {
                session.undo().unwrap();
            }
            prop_assert_eq!(session.state(), SessionState::Loaded);
            prop_assert_eq!(session.display_image().unwrap(), &img);
            prop_assert_eq!(session.history_depth(), 1);
        }

        /// Property: flipping twice along either axis is undone exactly.
        #[test]
        fn prop_double_flip_round_trip(img in image_strategy(), vertical in any::<bool>()) {
            let direction = if vertical {
                FlipDirection::Vertical
            } else {
                FlipDirection::Horizontal
            };
            let mut session = EditSession::new(SessionConfig::seeded(2));
            session.load(img.clone()).unwrap();
            session.flip(direction).unwrap();
            prop_assert_eq!(session.flip(direction).unwrap(), &img);
            prop_assert_eq!(session.state(), SessionState::Loaded);
        }

        /// Property: the display layout matches the source for color edits.
        #[test]
        fn prop_display_keeps_size(
            img in image_strategy(),
            (index, value) in edit_strategy(),
        ) {
            let mut session = EditSession::new(SessionConfig::seeded(3));
            session.load(img.clone()).unwrap();
            let key = AdjustmentKind::ORDER[index].key();
            let display = session.apply_adjustment(key, value).unwrap();
            prop_assert_eq!((display.width, display.height), (img.width, img.height));
        }
    }
}
