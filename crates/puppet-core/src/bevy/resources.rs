//! ECS Resources for the puppet session.

use bevy::prelude::*;

use crate::input::Key;
use crate::session::Session;

/// The character session driven by [`tick_session`](crate::bevy::systems::tick_session).
#[derive(Resource)]
pub struct PuppetSession(pub Session);

impl std::ops::Deref for PuppetSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for PuppetSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Keyboard mapping for the three session keys.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
}

impl KeyBindings {
    /// Pairs of session key and bound key code.
    pub fn pairs(&self) -> [(Key, KeyCode); 3] {
        [
            (Key::Left, self.left),
            (Key::Right, self.right),
            (Key::Jump, self.jump),
        ]
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::KeyW,
        }
    }
}
