//! Input model: mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, or the pending click waiting on the identifier prompt. It
//! carries everything needed to recompute a placement from the pointer's total
//! displacement, so pointer-move handling is plain arithmetic.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
    /// Back, forward and any other auxiliary buttons.
    Auxiliary(i16),
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Auxiliary(other),
        }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// `Delete` or `Backspace`.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Set on gesture release; swallows the click the platform delivers right after it.
    pub ignore_next_click: bool,
    /// An export is in flight.
    pub exporting: bool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The user clicked empty canvas; the identifier prompt is open.
    AwaitingOverlaySelection {
        /// Click position in ratio space, consumed when the prompt is confirmed.
        pending: Point,
    },
    /// The user is moving the selected placement.
    Dragging {
        /// Index of the placement being moved.
        index: usize,
        /// Screen-space pointer position at press.
        start_screen: Point,
        /// Placement x ratio at press.
        start_x_ratio: f64,
        /// Placement y ratio at press.
        start_y_ratio: f64,
    },
    /// The user is resizing the selected placement by its corner handle.
    Resizing {
        /// Index of the placement being resized.
        index: usize,
        /// Screen-space pointer position at press.
        start_screen: Point,
        /// Placement size ratio at press.
        start_size_ratio: f64,
    },
}

impl InputState {
    /// Placement index of the active drag or resize.
    #[must_use]
    pub fn gesture_index(&self) -> Option<usize> {
        match self {
            Self::Dragging { index, .. } | Self::Resizing { index, .. } => Some(*index),
            Self::Idle | Self::AwaitingOverlaySelection { .. } => None,
        }
    }

    /// Keep a gesture pointing at the same logical placement after `deleted` is removed.
    ///
    /// Returns `false` when the gesture's own placement was deleted; the caller
    /// abandons the gesture in that case.
    pub fn shift_after_delete(&mut self, deleted: usize) -> bool {
        match self {
            Self::Dragging { index, .. } | Self::Resizing { index, .. } => {
                if *index == deleted {
                    return false;
                }
                if *index > deleted {
                    *index -= 1;
                }
                true
            }
            Self::Idle | Self::AwaitingOverlaySelection { .. } => true,
        }
    }
}
