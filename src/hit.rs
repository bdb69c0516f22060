//! Hit-testing in screen space.
//!
//! Each placement occupies an axis-aligned square centered on its ratio
//! position. The selected placement additionally shows two round affordances:
//! a delete button on its top-right corner and a resize handle on its
//! bottom-right corner. Tests follow on-screen stacking: the selected
//! placement's affordances first, then its body, then the remaining bodies
//! from the end of the sequence backwards.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Placement, PlacementStore};
use crate::geometry::{DisplayGeometry, Point};

/// Which part of a placement was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle,
    DeleteButton,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub part: HitPart,
}

/// Screen-space radii of the selection affordances.
#[derive(Debug, Clone, Copy)]
pub struct HandleRadii {
    pub resize_px: f64,
    pub delete_px: f64,
}

/// A placement's on-screen square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSquare {
    pub center: Point,
    pub size: f64,
}

impl ScreenSquare {
    /// Project a placement onto the current display.
    #[must_use]
    pub fn of(placement: &Placement, geometry: &DisplayGeometry) -> Self {
        let center = geometry.ratio_to_screen(Point::new(placement.x_ratio, placement.y_ratio));
        Self { center, size: geometry.size_to_screen(placement.size_ratio) }
    }

    #[must_use]
    pub fn half(&self) -> f64 {
        self.size / 2.0
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let h = self.half();
        pt.x >= self.center.x - h && pt.x <= self.center.x + h && pt.y >= self.center.y - h && pt.y <= self.center.y + h
    }

    #[must_use]
    pub fn top_right(&self) -> Point {
        Point::new(self.center.x + self.half(), self.center.y - self.half())
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.center.x + self.half(), self.center.y + self.half())
    }
}

fn within(pt: Point, center: Point, radius: f64) -> bool {
    let dx = pt.x - center.x;
    let dy = pt.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Test the selected placement's delete button and resize handle.
#[must_use]
pub fn hit_affordance(
    screen_pt: Point,
    store: &PlacementStore,
    geometry: &DisplayGeometry,
    radii: HandleRadii,
) -> Option<Hit> {
    let index = store.selection()?;
    let square = ScreenSquare::of(store.get(index)?, geometry);
    if within(screen_pt, square.top_right(), radii.delete_px) {
        return Some(Hit { index, part: HitPart::DeleteButton });
    }
    if within(screen_pt, square.bottom_right(), radii.resize_px) {
        return Some(Hit { index, part: HitPart::ResizeHandle });
    }
    None
}

/// Topmost placement body under `screen_pt` by sequence order, ignoring selection.
#[must_use]
pub fn hit_body(screen_pt: Point, store: &PlacementStore, geometry: &DisplayGeometry) -> Option<usize> {
    store
        .placements()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, p)| ScreenSquare::of(p, geometry).contains(screen_pt))
        .map(|(i, _)| i)
}

/// Full hit test in on-screen stacking order.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    store: &PlacementStore,
    geometry: &DisplayGeometry,
    radii: HandleRadii,
) -> Option<Hit> {
    if !geometry.is_ready() {
        return None;
    }
    if let Some(hit) = hit_affordance(screen_pt, store, geometry, radii) {
        return Some(hit);
    }
    if let Some(index) = store.selection()
        && let Some(p) = store.get(index)
        && ScreenSquare::of(p, geometry).contains(screen_pt)
    {
        return Some(Hit { index, part: HitPart::Body });
    }
    hit_body(screen_pt, store, geometry).map(|index| Hit { index, part: HitPart::Body })
}
