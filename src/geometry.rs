//! Display geometry: where the photo sits on screen and how pixels map to ratios.
//!
//! Placements are stored in ratio space so they survive viewport resizes and
//! can be replayed at native resolution on export. Everything that converts
//! between screen pixels and ratios goes through [`DisplayGeometry`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::Serialize;

/// A point in screen pixels, relative to the photo's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The fitted on-screen size of the source photo.
///
/// `width` / `height` are in CSS pixels. `aspect_ratio` is the photo's native
/// `width / height` and does not change on viewport resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    #[serde(rename = "calculatedWidth")]
    pub width: f64,
    #[serde(rename = "calculatedHeight")]
    pub height: f64,
    pub aspect_ratio: f64,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, aspect_ratio: 0.0 }
    }
}

impl DisplayGeometry {
    /// Fit a photo with the given aspect ratio into `fit_fraction` of the viewport.
    ///
    /// Width-limited first; if the resulting height overflows the available
    /// height, the photo is height-limited instead.
    #[must_use]
    pub fn fit(aspect_ratio: f64, viewport_width: f64, viewport_height: f64, fit_fraction: f64) -> Self {
        if aspect_ratio <= 0.0 || !aspect_ratio.is_finite() {
            return Self::default();
        }
        let available_width = viewport_width * fit_fraction;
        let available_height = viewport_height * fit_fraction;
        let mut width = available_width;
        let mut height = available_width / aspect_ratio;
        if height > available_height {
            height = available_height;
            width = available_height * aspect_ratio;
        }
        Self { width, height, aspect_ratio }
    }

    /// Fit a photo of native size `native_width` × `native_height`.
    #[must_use]
    pub fn fit_native(
        native_width: u32,
        native_height: u32,
        viewport_width: f64,
        viewport_height: f64,
        fit_fraction: f64,
    ) -> Self {
        if native_height == 0 {
            return Self::default();
        }
        let aspect_ratio = f64::from(native_width) / f64::from(native_height);
        Self::fit(aspect_ratio, viewport_width, viewport_height, fit_fraction)
    }

    /// Whether the geometry can be divided by. Input is ignored until it is.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// The shorter display edge; placement sizes are fractions of it.
    #[must_use]
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Convert a screen point to ratio coordinates.
    #[must_use]
    pub fn screen_to_ratio(&self, screen: Point) -> Point {
        Point { x: screen.x / self.width, y: screen.y / self.height }
    }

    /// Convert ratio coordinates to a screen point.
    #[must_use]
    pub fn ratio_to_screen(&self, ratio: Point) -> Point {
        Point { x: ratio.x * self.width, y: ratio.y * self.height }
    }

    /// Convert a size ratio to an edge length in screen pixels.
    #[must_use]
    pub fn size_to_screen(&self, size_ratio: f64) -> f64 {
        size_ratio * self.min_dimension()
    }

    /// Default size ratio for a new placement.
    ///
    /// The overlay's area is `width * height / area_divisor`; its edge is the
    /// square root of that, expressed as a fraction of the shorter edge.
    #[must_use]
    pub fn default_size_ratio(&self, area_divisor: f64) -> f64 {
        let area = self.width * self.height / area_divisor;
        area.sqrt() / self.min_dimension()
    }
}

/// Debounces viewport resize events.
///
/// Only the most recent request within the quiet window takes effect. Time is
/// supplied by the caller in milliseconds so the debouncer stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct ResizeDebouncer {
    quiet_ms: f64,
    pending: Option<PendingResize>,
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    due_ms: f64,
    width: f64,
    height: f64,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(quiet_ms: f64) -> Self {
        Self { quiet_ms, pending: None }
    }

    /// Record a resize, replacing any pending one and restarting the quiet window.
    pub fn schedule(&mut self, now_ms: f64, width: f64, height: f64) {
        self.pending = Some(PendingResize { due_ms: now_ms + self.quiet_ms, width, height });
    }

    /// Release the pending viewport size once its quiet window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<(f64, f64)> {
        let pending = self.pending?;
        if now_ms < pending.due_ms {
            return None;
        }
        self.pending = None;
        Some((pending.width, pending.height))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending resize.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
