//! Player intent and the keyboard source.
//!
//! Every device is an [`InputSource`] producing one [`InputIntent`] per tick.
//! Sources own their jump edge: `jump_pressed` is raised once per physical
//! press and cleared by the read that reports it.

use serde::{Deserialize, Serialize};

/// Merged player intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    /// One-shot: true for exactly one tick per press.
    pub jump_pressed: bool,
}

impl InputIntent {
    /// Horizontal direction: -1, 0 or +1. Opposite keys cancel out.
    pub fn horizontal(&self) -> i8 {
        i8::from(self.right) - i8::from(self.left)
    }
}

/// A device producing player intent.
pub trait InputSource {
    /// Returns this tick's intent and consumes any pending jump edge.
    fn read(&mut self) -> InputIntent;
}

/// Field-wise OR of two intents. An absent secondary source passes the
/// primary through unchanged.
pub fn merge(primary: InputIntent, secondary: Option<InputIntent>) -> InputIntent {
    let Some(secondary) = secondary else {
        return primary;
    };
    InputIntent {
        left: primary.left || secondary.left,
        right: primary.right || secondary.right,
        jump_held: primary.jump_held || secondary.jump_held,
        jump_pressed: primary.jump_pressed || secondary.jump_pressed,
    }
}

/// Reads both sources and merges them.
pub fn read_merged(
    primary: &mut dyn InputSource,
    secondary: Option<&mut dyn InputSource>,
) -> InputIntent {
    let a = primary.read();
    let b = secondary.map(InputSource::read);
    merge(a, b)
}

/// The three mapped keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
}

/// Keyboard state fed by key level changes.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSource {
    left: bool,
    right: bool,
    jump: bool,
    jump_edge: bool,
}

impl KeyboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current level of `key`. Repeated "down" reports while the
    /// key is already held do not raise another jump edge.
    pub fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Jump => {
                if down && !self.jump {
                    self.jump_edge = true;
                }
                self.jump = down;
            }
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Jump => self.jump,
        }
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for KeyboardSource {
    fn read(&mut self) -> InputIntent {
        let edge = std::mem::take(&mut self.jump_edge);
        InputIntent {
            left: self.left,
            right: self.right,
            jump_held: self.jump,
            jump_pressed: edge,
        }
    }
}
