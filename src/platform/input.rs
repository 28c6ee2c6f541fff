//! Keyboard input
//!
//! Classic terminals only report key presses (auto-repeat shows up as more
//! presses), never releases. `KeyTracker` treats a key as held while its
//! last press is at most `HOLD_WINDOW` frames old, and drops it at once
//! when a release does arrive on terminals that report one.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::settings::DEFAULT_PLAYER_NAME;
use crate::sim::HeldKeys;

/// Frames a press keeps a key held without a repeat
pub const HOLD_WINDOW: u64 = 4;

/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 16;

/// Tracks which keys count as held this frame
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; stale keys expire
    pub fn next_frame(&mut self) {
        self.frame += 1;
        let frame = self.frame;
        self.last_seen
            .retain(|_, last| frame.saturating_sub(*last) <= HOLD_WINDOW);
    }

    /// Feed one key event
    pub fn handle(&mut self, event: &KeyEvent) {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_seen
            .get(&normalize(code))
            .is_some_and(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Movement keys (arrows or WASD)
    pub fn held_keys(&self) -> HeldKeys {
        HeldKeys {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w')]),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s')]),
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')]),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')]),
        }
    }

    pub fn fire_held(&self) -> bool {
        self.is_held(KeyCode::Char(' '))
    }

    /// Forget everything (screen changes)
    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

/// Letters are tracked case-insensitively so Shift does not drop a key
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Outcome of feeding a key to the name prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameInput {
    /// Still typing
    Editing,
    /// Enter pressed, with the final name
    Confirmed(String),
    /// Esc pressed
    Cancelled,
}

/// Player name text buffer
#[derive(Debug, Clone, Default)]
pub struct NameEntry {
    text: String,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefilled buffer (last used name)
    pub fn with_text(initial: &str) -> Self {
        let mut entry = Self::new();
        initial.chars().for_each(|c| entry.push(c));
        entry
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append a printable character; ignored once the name is full
    pub fn push(&mut self, ch: char) {
        if !ch.is_control() && self.text.chars().count() < MAX_NAME_LEN {
            self.text.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Final name: trimmed, or the default when blank
    pub fn confirm(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Apply a key press
    pub fn handle(&mut self, code: KeyCode) -> NameInput {
        match code {
            KeyCode::Enter => NameInput::Confirmed(self.confirm()),
            KeyCode::Esc => NameInput::Cancelled,
            KeyCode::Backspace => {
                self.backspace();
                NameInput::Editing
            }
            KeyCode::Char(c) => {
                self.push(c);
                NameInput::Editing
            }
            _ => NameInput::Editing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_press_holds_for_window() {
        let mut keys = KeyTracker::new();
        keys.handle(&press(KeyCode::Up));
        for _ in 0..HOLD_WINDOW {
            assert!(keys.held_keys().up);
            keys.next_frame();
        }
        assert!(keys.held_keys().up);
        keys.next_frame();
        assert!(!keys.held_keys().up);
    }

    #[test]
    fn test_repeat_keeps_key_alive() {
        let mut keys = KeyTracker::new();
        for _ in 0..20 {
            keys.handle(&press(KeyCode::Char(' ')));
            keys.next_frame();
            keys.next_frame();
            assert!(keys.fire_held());
        }
    }

    #[test]
    fn test_release_drops_immediately() {
        let mut keys = KeyTracker::new();
        keys.handle(&press(KeyCode::Right));
        keys.handle(&release(KeyCode::Right));
        assert!(!keys.held_keys().right);
    }

    #[test]
    fn test_wasd_case_insensitive() {
        let mut keys = KeyTracker::new();
        keys.handle(&press(KeyCode::Char('W')));
        keys.handle(&press(KeyCode::Char('a')));
        let held = keys.held_keys();
        assert!(held.up && held.left);
        assert!(!held.down && !held.right);
    }

    #[test]
    fn test_name_entry_limits() {
        let mut name = NameEntry::new();
        for c in "abcdefghijklmnopqrstuvwxyz".chars() {
            name.push(c);
        }
        assert_eq!(name.text().chars().count(), MAX_NAME_LEN);
        name.backspace();
        assert_eq!(name.text(), "abcdefghijklmno");
        name.push('\u{7}');
        assert_eq!(name.text().len(), 15);
    }

    #[test]
    fn test_name_entry_confirm() {
        let mut name = NameEntry::new();
        assert_eq!(
            name.handle(KeyCode::Enter),
            NameInput::Confirmed(DEFAULT_PLAYER_NAME.to_string())
        );
        for c in "  Ana ".chars() {
            name.handle(KeyCode::Char(c));
        }
        assert_eq!(name.handle(KeyCode::Enter), NameInput::Confirmed("Ana".into()));
        assert_eq!(name.handle(KeyCode::Esc), NameInput::Cancelled);
    }
}
