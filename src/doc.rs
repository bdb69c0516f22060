//! Document model: overlay placements and the ordered in-memory store.
//!
//! Placements live in a `Vec` whose order is insertion order. That order is the
//! draw order on export; on screen the selected placement is lifted above its
//! siblings with a higher z-index instead of being moved in the sequence.
//!
//! Indices handed to the store always come from the current sequence (hit
//! tests, the selection, an active gesture). An out-of-range index is a caller
//! bug; the store treats it as a no-op rather than panicking.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::asset::AssetResolver;
use crate::consts::MIN_SIZE_RATIO;
use crate::geometry::DisplayGeometry;

/// One overlay instance on the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Center x as a fraction of display width. Not clamped to `[0, 1]`.
    pub x_ratio: f64,
    /// Center y as a fraction of display height. Not clamped to `[0, 1]`.
    pub y_ratio: f64,
    /// Edge length as a fraction of the shorter display edge. Always positive.
    pub size_ratio: f64,
    /// Reserved multiplier; always `1.0`.
    pub scale: f64,
    /// Identifier the user entered.
    pub monke_number: String,
    /// URL of the transparent-background overlay image.
    pub monke_image_no_bg: String,
}

/// Ordered store of placements plus the current selection.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    placements: Vec<Placement>,
    selected: Option<usize>,
    min_size_ratio: f64,
}

impl PlacementStore {
    /// Create an empty store with the default resize floor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_size_ratio(MIN_SIZE_RATIO)
    }

    /// Create an empty store with a custom resize floor.
    #[must_use]
    pub fn with_min_size_ratio(min_size_ratio: f64) -> Self {
        Self { placements: Vec::new(), selected: None, min_size_ratio }
    }

    /// Append a placement centered at the given ratios.
    ///
    /// The size is derived from the display geometry so a new overlay covers
    /// a fixed share of the photo regardless of its shape. Selection is left
    /// untouched.
    pub fn add_placement(
        &mut self,
        x_ratio: f64,
        y_ratio: f64,
        monke_number: &str,
        geometry: &DisplayGeometry,
        area_divisor: f64,
        resolver: &AssetResolver,
    ) -> Placement {
        let monke_number = monke_number.trim();
        let placement = Placement {
            x_ratio,
            y_ratio,
            size_ratio: self.floored(geometry.default_size_ratio(area_divisor)),
            scale: 1.0,
            monke_number: monke_number.to_string(),
            monke_image_no_bg: resolver.overlay_url(monke_number),
        };
        self.placements.push(placement.clone());
        placement
    }

    /// Set a placement's center. No bounds checking.
    pub fn move_placement(&mut self, index: usize, x_ratio: f64, y_ratio: f64) -> bool {
        let Some(p) = self.placements.get_mut(index) else {
            return false;
        };
        p.x_ratio = x_ratio;
        p.y_ratio = y_ratio;
        true
    }

    /// Set a placement's size, floored at the store's minimum.
    pub fn resize_placement(&mut self, index: usize, size_ratio: f64) -> bool {
        let size_ratio = self.floored(size_ratio);
        let Some(p) = self.placements.get_mut(index) else {
            return false;
        };
        p.size_ratio = size_ratio;
        true
    }

    /// Clamp a size to the store's floor. Non-finite sizes collapse to the floor.
    fn floored(&self, size_ratio: f64) -> f64 {
        if size_ratio.is_finite() && size_ratio > self.min_size_ratio { size_ratio } else { self.min_size_ratio }
    }

    /// Remove a placement, keeping the selection on the same logical item.
    ///
    /// Deleting the selected placement clears the selection; deleting one
    /// below it shifts the selection down by one.
    pub fn delete_placement(&mut self, index: usize) -> Option<Placement> {
        if index >= self.placements.len() {
            return None;
        }
        let removed = self.placements.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(removed)
    }

    /// Select a placement, or clear the selection with `None`.
    ///
    /// Selecting an index past the end clears the selection.
    pub fn select_placement(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.placements.len());
    }

    /// The selected index, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.selected
    }

    /// Drop every placement and the selection.
    pub fn reset(&mut self) {
        self.placements.clear();
        self.selected = None;
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Placement> {
        self.placements.get(index)
    }

    /// All placements in sequence order.
    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self::new()
    }
}
