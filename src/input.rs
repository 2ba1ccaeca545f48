//! Turns raw terminal events into one `FrameInput` per frame.
//!
//! Pointer: terminal mouse reporting (move / drag / left button).  The
//! pointer column is mapped to the centre of that column in window units.
//!
//! Keys: instead of acting on each key event individually, we record the
//! frame number of the last press/repeat event for every key.  A key counts
//! as held while that record is fresh (within `HOLD_WINDOW` frames), or until
//! its release on terminals that report releases.  Space is the keyboard
//! alternative to the mouse button for firing.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::entities::FrameInput;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
pub const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

#[derive(Debug)]
pub struct InputTracker {
    cols: u16,
    rows: u16,
    world_width: f32,
    pointer_col: Option<u16>,
    last_pointer_x: Option<f32>,
    mouse_down: bool,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    restart_pending: bool,
    quit: bool,
}

impl InputTracker {
    pub fn new(cols: u16, rows: u16, world_width: f32) -> Self {
        Self {
            cols,
            rows,
            world_width,
            pointer_col: None,
            last_pointer_x: None,
            mouse_down: false,
            key_frame: HashMap::new(),
            frame: 0,
            restart_pending: false,
            quit: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Pointer X in window units.  Before the terminal reports any mouse
    /// position the pointer rests at the window centre.
    pub fn pointer_x(&self) -> f32 {
        match self.pointer_col {
            Some(col) if self.cols > 0 => {
                (col.min(self.cols - 1) as f32 + 0.5) * self.world_width / self.cols as f32
            }
            _ => self.world_width / 2.0,
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(key) => self.handle_key(key),
            Event::Resize(cols, rows) => {
                self.cols = *cols;
                self.rows = *rows;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer_col = Some(mouse.column);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_col = Some(mouse.column);
                self.mouse_down = true;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_down = false;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        let KeyEvent {
            code,
            kind,
            modifiers,
            ..
        } = key;
        match kind {
            // Press: record key + handle one-shot actions
            KeyEventKind::Press => {
                self.key_frame.insert(*code, self.frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.quit = true;
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true;
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.restart_pending = true;
                    }
                    _ => {}
                }
            }
            // Repeat: refresh timestamp so key stays "held"
            KeyEventKind::Repeat => {
                self.key_frame.insert(*code, self.frame);
            }
            // Release: remove key immediately (keyboard-enhancement path)
            KeyEventKind::Release => {
                self.key_frame.remove(code);
            }
        }
    }

    /// Snapshot the input for the next frame.  The restart trigger is
    /// consumed, so it reaches exactly one frame.
    pub fn frame_input(&mut self, dt: f32) -> FrameInput {
        self.frame += 1;
        let pointer_x = self.pointer_x();
        // The resting centre is not a real position, so the first report
        // carries no motion.
        let pointer_dx = match (self.pointer_col, self.last_pointer_x) {
            (Some(_), Some(last)) => pointer_x - last,
            _ => 0.0,
        };
        self.last_pointer_x = self.pointer_col.map(|_| pointer_x);

        let fire_held = self.mouse_down || is_held(&self.key_frame, &KeyCode::Char(' '), self.frame);

        FrameInput {
            dt,
            pointer_x,
            pointer_dx,
            fire_held,
            restart: std::mem::take(&mut self.restart_pending),
        }
    }
}
