use super::*;

fn dragging(index: usize) -> InputState {
    InputState::Dragging { index, start_screen: Point::new(0.0, 0.0), start_x_ratio: 0.5, start_y_ratio: 0.5 }
}

fn resizing(index: usize) -> InputState {
    InputState::Resizing { index, start_screen: Point::new(0.0, 0.0), start_size_ratio: 0.1 }
}

// --- Button ---

#[test]
fn button_from_dom_codes() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
}

#[test]
fn button_from_dom_auxiliary_codes() {
    assert_eq!(Button::from_dom(3), Button::Auxiliary(3));
    assert_eq!(Button::from_dom(4), Button::Auxiliary(4));
    assert_eq!(Button::from_dom(-1), Button::Auxiliary(-1));
}

// --- Key ---

#[test]
fn delete_keys() {
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(!Key("d".into()).is_delete());
    assert!(!Key("Escape".into()).is_delete());
}

#[test]
fn escape_key() {
    assert!(Key("Escape".into()).is_escape());
    assert!(!Key("Enter".into()).is_escape());
}

// --- InputState ---

#[test]
fn default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn gesture_index_only_for_gestures() {
    assert_eq!(dragging(3).gesture_index(), Some(3));
    assert_eq!(resizing(1).gesture_index(), Some(1));
    assert_eq!(InputState::Idle.gesture_index(), None);
    let awaiting = InputState::AwaitingOverlaySelection { pending: Point::new(0.5, 0.5) };
    assert_eq!(awaiting.gesture_index(), None);
}

#[test]
fn shift_after_delete_below_decrements() {
    let mut state = dragging(2);
    assert!(state.shift_after_delete(0));
    assert_eq!(state.gesture_index(), Some(1));
}

#[test]
fn shift_after_delete_above_keeps_index() {
    let mut state = resizing(1);
    assert!(state.shift_after_delete(4));
    assert_eq!(state.gesture_index(), Some(1));
}

#[test]
fn shift_after_delete_own_index_abandons() {
    let mut state = dragging(1);
    assert!(!state.shift_after_delete(1));
}

#[test]
fn shift_after_delete_idle_is_noop() {
    let mut state = InputState::Idle;
    assert!(state.shift_after_delete(0));
    assert_eq!(state, InputState::Idle);
}

// --- UiState ---

#[test]
fn ui_state_default_is_quiet() {
    let ui = UiState::default();
    assert!(!ui.ignore_next_click);
    assert!(!ui.exporting);
}
