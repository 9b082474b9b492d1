//! Keyboard state as the controller sees it.
//!
//! Hosts record key presses by lower-cased key name. The controller only reads
//! this map; a key that was never recorded reads as released.

use std::collections::HashMap;

pub const KEY_FORWARD: &str = "w";
pub const KEY_LEFT: &str = "a";
pub const KEY_BACK: &str = "s";
pub const KEY_RIGHT: &str = "d";
pub const KEY_SHIFT: &str = "shift";
pub const KEY_SPACE: &str = "space";

/// Keys that count as movement input.
pub const DIRECTIONS: [&str; 4] = [KEY_FORWARD, KEY_LEFT, KEY_BACK, KEY_RIGHT];

/// What a key-down event turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDown {
    /// The key was recorded as pressed.
    Recorded,
    /// The run modifier was held; the caller should flip the run toggle.
    ToggleRun,
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    pressed: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is `key` held? Unknown keys are not.
    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, pressed: bool) {
        self.pressed.insert(key.to_lowercase(), pressed);
    }

    /// Handle a key-down event from the host.
    ///
    /// While the run modifier is held the event is not recorded as a key press.
    pub fn key_down(&mut self, key: &str, run_modifier_held: bool) -> KeyDown {
        if run_modifier_held {
            return KeyDown::ToggleRun;
        }
        self.set(key, true);
        KeyDown::Recorded
    }

    pub fn key_up(&mut self, key: &str) {
        self.set(key, false);
    }

    /// True when any of W/A/S/D is held.
    pub fn any_direction_pressed(&self) -> bool {
        DIRECTIONS.iter().any(|key| self.is_pressed(key))
    }
}

impl<const N: usize> From<[(&str, bool); N]> for InputState {
    fn from(entries: [(&str, bool); N]) -> Self {
        let mut input = Self::new();
        for (key, pressed) in entries {
            input.set(key, pressed);
        }
        input
    }
}
