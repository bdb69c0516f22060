//! Gesture controller.
//!
//! `EngineCore` turns pointer, click and keyboard events into placement store
//! mutations and returns the [`Action`]s the host needs to react to. The
//! platform delivers press/move/release and click as separate event streams,
//! so a gesture release arms a latch that swallows the click that follows it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::asset::AssetResolver;
use crate::compositor::{ExportError, ExportRequest, ExportedImage};
use crate::config::EditorConfig;
use crate::doc::{Placement, PlacementStore};
use crate::geometry::{DisplayGeometry, Point, ResizeDebouncer};
use crate::hit::{self, HandleRadii, HitPart};
use crate::input::{Button, InputState, Key, UiState};

/// Alert text shown when an export fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to download image. Please try again.";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Open the identifier prompt for a click at the given ratios.
    PromptOverlayIdentifier { x_ratio: f64, y_ratio: f64 },
    PlacementCreated { index: usize, placement: Placement },
    PlacementUpdated { index: usize },
    PlacementDeleted { index: usize },
    SelectionChanged { selected: Option<usize> },
    GeometryChanged { geometry: DisplayGeometry },
    SetCursor { cursor: &'static str },
    RenderNeeded,
    ExportSucceeded { filename: String, skipped: Vec<usize> },
    ExportFailed { message: &'static str, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("overlay identifier is empty")]
    EmptyIdentifier,
    #[error("no pending placement to confirm")]
    NoPendingPlacement,
    #[error("an export is already in progress")]
    ExportInProgress,
    #[error("nothing to export: no placements")]
    NothingToExport,
}

/// Core engine state. Everything here is plain data so it can be tested
/// without a browser.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub store: PlacementStore,
    pub geometry: DisplayGeometry,
    pub ui: UiState,
    pub input: InputState,
    config: EditorConfig,
    resolver: AssetResolver,
    debouncer: ResizeDebouncer,
    last_cursor: Option<&'static str>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: PlacementStore::with_min_size_ratio(config.min_size_ratio),
            geometry: DisplayGeometry::default(),
            ui: UiState::default(),
            input: InputState::Idle,
            resolver: AssetResolver::new(config.asset_collection.clone(), config.generation),
            debouncer: ResizeDebouncer::new(config.resize_debounce_ms),
            config,
            last_cursor: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Geometry ---

    /// Fit a freshly loaded photo into the viewport.
    pub fn set_source_dimensions(
        &mut self,
        native_width: u32,
        native_height: u32,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Vec<Action> {
        self.debouncer.cancel();
        let geometry = DisplayGeometry::fit_native(
            native_width,
            native_height,
            viewport_width,
            viewport_height,
            self.config.fit_fraction,
        );
        self.apply_geometry(geometry)
    }

    /// Record a viewport resize. It takes effect on the first [`Self::tick`]
    /// after the quiet period, and only the most recent one counts.
    pub fn on_viewport_resize(&mut self, viewport_width: f64, viewport_height: f64, now_ms: f64) {
        if self.geometry.aspect_ratio <= 0.0 {
            return;
        }
        self.debouncer.schedule(now_ms, viewport_width, viewport_height);
    }

    /// Apply a debounced viewport resize if one is due.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let Some((width, height)) = self.debouncer.poll(now_ms) else {
            return Vec::new();
        };
        let geometry = DisplayGeometry::fit(self.geometry.aspect_ratio, width, height, self.config.fit_fraction);
        self.apply_geometry(geometry)
    }

    /// Whether a debounced resize is waiting for its quiet period.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn apply_geometry(&mut self, geometry: DisplayGeometry) -> Vec<Action> {
        if geometry == self.geometry {
            return Vec::new();
        }
        log::debug!("display geometry {}x{}", geometry.width, geometry.height);
        self.geometry = geometry;
        vec![Action::GeometryChanged { geometry }, Action::RenderNeeded]
    }

    // --- Input events ---

    /// Handle a pointer press on the photo or one of its overlays.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if !self.geometry.is_ready() {
            return Vec::new();
        }
        match button {
            Button::Secondary => self.delete_under_pointer(screen_pt),
            Button::Primary => self.begin_gesture(screen_pt),
            Button::Middle | Button::Auxiliary(_) => Vec::new(),
        }
    }

    /// Handle pointer motion. Only does work while a gesture is active.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        if !self.geometry.is_ready() {
            return Vec::new();
        }
        match self.input {
            InputState::Dragging { index, start_screen, start_x_ratio, start_y_ratio } => {
                let dx = screen_pt.x - start_screen.x;
                let dy = screen_pt.y - start_screen.y;
                let x_ratio = start_x_ratio + dx / self.geometry.width;
                let y_ratio = start_y_ratio + dy / self.geometry.height;
                if !self.store.move_placement(index, x_ratio, y_ratio) {
                    return Vec::new();
                }
                vec![Action::PlacementUpdated { index }, Action::RenderNeeded]
            }
            InputState::Resizing { index, start_screen, start_size_ratio } => {
                let dx = screen_pt.x - start_screen.x;
                let dy = screen_pt.y - start_screen.y;
                // Isotropic: the diagonal drag drives both edges.
                let delta_ratio = ((dx + dy) / 2.0) / self.geometry.min_dimension();
                if !self.store.resize_placement(index, start_size_ratio + delta_ratio) {
                    return Vec::new();
                }
                vec![Action::PlacementUpdated { index }, Action::RenderNeeded]
            }
            InputState::Idle | InputState::AwaitingOverlaySelection { .. } => Vec::new(),
        }
    }

    /// Handle a pointer release. Ends any gesture and arms the click latch.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button) -> Vec<Action> {
        let Some(index) = self.input.gesture_index() else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        self.ui.ignore_next_click = true;
        log::debug!("gesture ended on placement {index}");
        let mut actions = self.select(Some(index));
        actions.push(Action::RenderNeeded);
        self.with_cursor(actions)
    }

    /// Handle a click on the photo area.
    ///
    /// Clicking a placement selects it. Clicking empty canvas first clears an
    /// existing selection; only a click with nothing selected opens the prompt.
    pub fn on_click(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.ui.ignore_next_click {
            self.ui.ignore_next_click = false;
            return Vec::new();
        }
        if self.input != InputState::Idle || self.ui.exporting || !self.geometry.is_ready() {
            return Vec::new();
        }
        match hit::hit_test(screen_pt, &self.store, &self.geometry, self.radii()) {
            Some(hit) if hit.part == HitPart::DeleteButton => self.delete_placement(hit.index),
            Some(hit) => {
                let actions = self.select(Some(hit.index));
                self.with_cursor(actions)
            }
            None if self.store.selection().is_some() => {
                let actions = self.select(None);
                self.with_cursor(actions)
            }
            None => {
                let pending = self.geometry.screen_to_ratio(screen_pt);
                self.input = InputState::AwaitingOverlaySelection { pending };
                log::debug!("awaiting overlay for click at ({}, {})", pending.x, pending.y);
                vec![Action::PromptOverlayIdentifier { x_ratio: pending.x, y_ratio: pending.y }]
            }
        }
    }

    /// Handle a key press. `Delete`/`Backspace` removes the selection;
    /// `Escape` cancels an open identifier prompt.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() && matches!(self.input, InputState::AwaitingOverlaySelection { .. }) {
            return self.cancel_overlay();
        }
        if key.is_delete()
            && let Some(index) = self.store.selection()
        {
            return self.delete_placement(index);
        }
        Vec::new()
    }

    // --- Identifier prompt ---

    /// Whether the prompt's submit button should be enabled for this input.
    #[must_use]
    pub fn can_submit(identifier: &str) -> bool {
        !identifier.trim().is_empty()
    }

    /// Create a placement at the pending click position.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingPlacement` when the prompt is not open and
    /// `EmptyIdentifier` for blank input; the prompt stays open in that case.
    pub fn confirm_overlay(&mut self, identifier: &str) -> Result<Vec<Action>, EditorError> {
        let InputState::AwaitingOverlaySelection { pending } = self.input else {
            return Err(EditorError::NoPendingPlacement);
        };
        if !Self::can_submit(identifier) {
            return Err(EditorError::EmptyIdentifier);
        }
        let placement = self.store.add_placement(
            pending.x,
            pending.y,
            identifier,
            &self.geometry,
            self.config.default_area_divisor,
            &self.resolver,
        );
        self.input = InputState::Idle;
        let index = self.store.len() - 1;
        log::debug!("placed overlay {} at index {index}", placement.monke_number);
        let mut actions = vec![Action::PlacementCreated { index, placement }];
        actions.extend(self.select(None));
        actions.push(Action::RenderNeeded);
        Ok(self.with_cursor(actions))
    }

    /// Close the prompt and forget the pending click.
    pub fn cancel_overlay(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::AwaitingOverlaySelection { .. }) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        Vec::new()
    }

    // --- Mutations ---

    /// Delete a placement (delete button, right-click, or keyboard).
    pub fn delete_placement(&mut self, index: usize) -> Vec<Action> {
        let before = self.store.selection();
        if self.store.delete_placement(index).is_none() {
            return Vec::new();
        }
        if !self.input.shift_after_delete(index) {
            self.input = InputState::Idle;
        }
        log::debug!("deleted placement {index}");
        let mut actions = vec![Action::PlacementDeleted { index }];
        let after = self.store.selection();
        if before != after {
            actions.push(Action::SelectionChanged { selected: after });
        }
        actions.push(Action::RenderNeeded);
        self.with_cursor(actions)
    }

    /// Clear all placements and gesture state.
    pub fn reset(&mut self) -> Vec<Action> {
        self.store.reset();
        self.input = InputState::Idle;
        // An export in flight still owns the busy flag.
        self.ui = UiState { exporting: self.ui.exporting, ..UiState::default() };
        self.debouncer.cancel();
        self.with_cursor(vec![Action::SelectionChanged { selected: None }, Action::RenderNeeded])
    }

    // --- Export ---

    /// Snapshot the placements for export and mark the editor busy.
    ///
    /// # Errors
    ///
    /// Returns `ExportInProgress` while a previous export is running and
    /// `NothingToExport` when there are no placements.
    pub fn begin_export(&mut self) -> Result<ExportRequest, EditorError> {
        if self.ui.exporting {
            return Err(EditorError::ExportInProgress);
        }
        if self.store.is_empty() {
            return Err(EditorError::NothingToExport);
        }
        self.ui.exporting = true;
        Ok(ExportRequest {
            placements: self.store.placements().to_vec(),
            display: self.geometry,
            filename: self.config.export_filename.clone(),
        })
    }

    /// Clear the busy flag and report the export outcome.
    pub fn finish_export(&mut self, outcome: &Result<ExportedImage, ExportError>) -> Vec<Action> {
        self.ui.exporting = false;
        let action = match outcome {
            Ok(image) => Action::ExportSucceeded { filename: image.filename.clone(), skipped: image.skipped.clone() },
            Err(err) => {
                log::error!("export failed: {err}");
                Action::ExportFailed { message: EXPORT_FAILED_MESSAGE, detail: err.to_string() }
            }
        };
        self.with_cursor(vec![action])
    }

    // --- Queries ---

    /// The currently selected placement, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.store.selection()
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        self.store.placements()
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        self.ui.exporting
    }

    /// CSS cursor for the photo area.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        if self.ui.exporting {
            return "wait";
        }
        match self.input {
            InputState::Dragging { .. } => "move",
            InputState::Resizing { .. } => "nwse-resize",
            InputState::Idle | InputState::AwaitingOverlaySelection { .. } => {
                if self.store.selection().is_some() {
                    "default"
                } else {
                    "crosshair"
                }
            }
        }
    }

    // --- Internals ---

    fn radii(&self) -> HandleRadii {
        HandleRadii { resize_px: self.config.resize_handle_radius_px, delete_px: self.config.delete_button_radius_px }
    }

    fn begin_gesture(&mut self, screen_pt: Point) -> Vec<Action> {
        self.ui.ignore_next_click = false;
        if self.input != InputState::Idle || self.ui.exporting {
            return Vec::new();
        }
        let Some(hit) = hit::hit_test(screen_pt, &self.store, &self.geometry, self.radii()) else {
            return Vec::new();
        };
        // Only the selected placement exposes drag and resize affordances.
        if self.store.selection() != Some(hit.index) {
            return Vec::new();
        }
        let Some(p) = self.store.get(hit.index) else {
            return Vec::new();
        };
        self.input = match hit.part {
            HitPart::Body => InputState::Dragging {
                index: hit.index,
                start_screen: screen_pt,
                start_x_ratio: p.x_ratio,
                start_y_ratio: p.y_ratio,
            },
            HitPart::ResizeHandle => InputState::Resizing {
                index: hit.index,
                start_screen: screen_pt,
                start_size_ratio: p.size_ratio,
            },
            HitPart::DeleteButton => return Vec::new(),
        };
        self.with_cursor(Vec::new())
    }

    fn delete_under_pointer(&mut self, screen_pt: Point) -> Vec<Action> {
        match hit::hit_test(screen_pt, &self.store, &self.geometry, self.radii()) {
            Some(hit) => self.delete_placement(hit.index),
            None => Vec::new(),
        }
    }

    fn select(&mut self, index: Option<usize>) -> Vec<Action> {
        if self.store.selection() == index {
            return Vec::new();
        }
        self.store.select_placement(index);
        vec![Action::SelectionChanged { selected: self.store.selection() }]
    }

    fn with_cursor(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        let cursor = self.cursor();
        if self.last_cursor != Some(cursor) {
            self.last_cursor = Some(cursor);
            actions.push(Action::SetCursor { cursor });
        }
        actions
    }
}
