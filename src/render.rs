//! Overlay layer projection: what the host draws on top of the photo.
//!
//! This module is a read-only consumer of the placement store. It turns ratio
//! coordinates into pixel boxes for the current display geometry and assigns
//! stacking order. On screen the selected overlay is lifted above the others
//! by z-index; the sequence itself is never reordered, so export order stays
//! insertion order.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{OVERLAY_Z_INDEX, SELECTED_OVERLAY_Z_INDEX};
use crate::doc::PlacementStore;
use crate::geometry::{DisplayGeometry, Point};
use crate::hit::ScreenSquare;

/// One overlay as the host should draw it, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView {
    pub index: usize,
    /// Left edge of the overlay box.
    pub left: f64,
    /// Top edge of the overlay box.
    pub top: f64,
    /// Edge length of the square box; the image is fit inside it.
    pub size: f64,
    pub z_index: i32,
    pub selected: bool,
    pub src: String,
    pub alt: String,
    /// Delete button center, present only on the selected overlay.
    pub delete_button: Option<Point>,
    /// Resize handle center, present only on the selected overlay.
    pub resize_handle: Option<Point>,
}

/// Project every placement for the current geometry, in sequence order.
///
/// Returns nothing until the geometry is known.
#[must_use]
pub fn overlay_views(store: &PlacementStore, geometry: &DisplayGeometry) -> Vec<OverlayView> {
    if !geometry.is_ready() {
        return Vec::new();
    }
    let selected_index = store.selection();
    store
        .placements()
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let square = ScreenSquare::of(p, geometry);
            let selected = selected_index == Some(index);
            OverlayView {
                index,
                left: square.center.x - square.half(),
                top: square.center.y - square.half(),
                size: square.size,
                z_index: if selected { SELECTED_OVERLAY_Z_INDEX } else { OVERLAY_Z_INDEX },
                selected,
                src: p.monke_image_no_bg.clone(),
                alt: format!("Monke {}", p.monke_number),
                delete_button: selected.then(|| square.top_right()),
                resize_handle: selected.then(|| square.bottom_right()),
            }
        })
        .collect()
}

/// Indices in on-screen paint order: unselected overlays in sequence order,
/// then the selected one last.
#[must_use]
pub fn paint_order(store: &PlacementStore) -> Vec<usize> {
    let selected = store.selection();
    let mut order: Vec<usize> = (0..store.len()).filter(|&i| Some(i) != selected).collect();
    order.extend(selected);
    order
}
