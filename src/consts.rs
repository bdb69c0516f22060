//! Shared numeric constants for the editor crate.

// ── Layout ──────────────────────────────────────────────────────

/// Fraction of the viewport the fitted photo may occupy in each dimension.
pub const VIEWPORT_FIT_FRACTION: f64 = 0.8;

/// Divisor applied to the display area when sizing a new placement.
///
/// A new overlay covers roughly `1 / DEFAULT_AREA_DIVISOR` of the photo.
pub const DEFAULT_AREA_DIVISOR: f64 = 100.0;

// ── Placement ───────────────────────────────────────────────────

/// Smallest `size_ratio` a resize may produce.
pub const MIN_SIZE_RATIO: f64 = 0.01;

// ── Hit-testing ─────────────────────────────────────────────────

/// Radius of the resize handle at the bottom-right corner, in screen pixels.
pub const RESIZE_HANDLE_RADIUS_PX: f64 = 10.0;

/// Radius of the delete button at the top-right corner, in screen pixels.
pub const DELETE_BUTTON_RADIUS_PX: f64 = 12.0;

// ── Stacking ────────────────────────────────────────────────────

/// CSS z-index for unselected overlays.
pub const OVERLAY_Z_INDEX: i32 = 10;

/// CSS z-index for the selected overlay; keeps it above its siblings.
pub const SELECTED_OVERLAY_Z_INDEX: i32 = 20;

// ── Timing ──────────────────────────────────────────────────────

/// Quiet period before a viewport resize is applied, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;
