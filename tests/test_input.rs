use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use star_shooter::input::*;

fn mouse(kind: MouseEventKind, column: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row: 10,
        modifiers: KeyModifiers::NONE,
    })
}

fn key(code: KeyCode, kind: KeyEventKind) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
}

// 100 columns over an 800-unit window: 8 units per column.
fn tracker() -> InputTracker {
    InputTracker::new(100, 30, 800.0)
}

// ── Pointer ───────────────────────────────────────────────────────────────────

#[test]
fn pointer_starts_at_window_centre() {
    let t = tracker();
    assert_eq!(t.pointer_x(), 400.0);
}

#[test]
fn pointer_maps_column_centre() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Moved, 10));
    assert_eq!(t.pointer_x(), 84.0);
    t.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 0));
    assert_eq!(t.pointer_x(), 4.0);
}

#[test]
fn pointer_delta_is_zero_on_first_frame() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Moved, 10));
    assert_eq!(t.frame_input(0.016).pointer_dx, 0.0);
}

#[test]
fn pointer_delta_tracks_movement_between_frames() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Moved, 10));
    t.frame_input(0.016);
    t.handle_event(&mouse(MouseEventKind::Moved, 15));
    let f = t.frame_input(0.016);
    assert_eq!(f.pointer_x, 124.0);
    assert_eq!(f.pointer_dx, 40.0);
    assert_eq!(t.frame_input(0.016).pointer_dx, 0.0);
}

#[test]
fn first_mouse_report_does_not_jump() {
    let mut t = tracker();
    assert_eq!(t.frame_input(0.016).pointer_dx, 0.0);
    t.handle_event(&mouse(MouseEventKind::Moved, 0));
    let f = t.frame_input(0.016);
    assert_eq!(f.pointer_x, 4.0);
    assert_eq!(f.pointer_dx, 0.0);
    t.handle_event(&mouse(MouseEventKind::Moved, 1));
    assert_eq!(t.frame_input(0.016).pointer_dx, 8.0);
}

#[test]
fn resize_remaps_pointer() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Moved, 10));
    t.handle_event(&Event::Resize(200, 50));
    assert_eq!(t.terminal_size(), (200, 50));
    assert_eq!(t.pointer_x(), 42.0);
}

#[test]
fn pointer_column_past_edge_is_clamped_to_last_column() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Moved, 150));
    assert_eq!(t.pointer_x(), 796.0);
}

// ── Fire ──────────────────────────────────────────────────────────────────────

#[test]
fn left_button_holds_fire_until_release() {
    let mut t = tracker();
    assert!(!t.frame_input(0.016).fire_held);
    t.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 20));
    assert!(t.frame_input(0.016).fire_held);
    assert!(t.frame_input(0.016).fire_held);
    t.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 20));
    assert!(!t.frame_input(0.016).fire_held);
}

#[test]
fn right_button_does_not_fire() {
    let mut t = tracker();
    t.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right), 20));
    assert!(!t.frame_input(0.016).fire_held);
}

#[test]
fn space_press_expires_after_hold_window() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
    for _ in 0..HOLD_WINDOW {
        assert!(t.frame_input(0.016).fire_held);
    }
    assert!(!t.frame_input(0.016).fire_held);
}

#[test]
fn space_release_stops_fire_immediately() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
    assert!(t.frame_input(0.016).fire_held);
    t.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Release));
    assert!(!t.frame_input(0.016).fire_held);
}

#[test]
fn space_repeat_keeps_fire_held() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));
    for _ in 0..10 {
        t.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert!(t.frame_input(0.016).fire_held);
    }
}

// ── Restart & quit ────────────────────────────────────────────────────────────

#[test]
fn restart_is_delivered_to_one_frame() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char('r'), KeyEventKind::Press));
    assert!(t.frame_input(0.016).restart);
    assert!(!t.frame_input(0.016).restart);
}

#[test]
fn restart_ignores_key_repeat() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char('R'), KeyEventKind::Repeat));
    assert!(!t.frame_input(0.016).restart);
}

#[test]
fn quit_keys() {
    for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
        let mut t = tracker();
        t.handle_event(&key(code, KeyEventKind::Press));
        assert!(t.quit_requested());
    }

    let mut t = tracker();
    t.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(t.quit_requested());
}

#[test]
fn plain_c_does_not_quit() {
    let mut t = tracker();
    t.handle_event(&key(KeyCode::Char('c'), KeyEventKind::Press));
    assert!(!t.quit_requested());
}

#[test]
fn frame_input_carries_dt() {
    let mut t = tracker();
    assert_eq!(t.frame_input(0.25).dt, 0.25);
}
