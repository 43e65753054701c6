//! The UI collaborator.
//!
//! Status text, the mode banner, action buttons and touch-control visibility
//! are pushed to a [`StatusSink`]. Button clicks come back to the session as
//! [`SessionCommand::Button`](crate::command::SessionCommand::Button).

use std::sync::Arc;

use parking_lot::RwLock;

/// Mode banner shown while no sequence is running.
pub const IDLE_MODE_TEXT: &str = "Enter prompt and click Play to begin";

pub trait StatusSink {
    fn set_status(&mut self, text: &str);
    fn set_mode_text(&mut self, text: &str);
    /// Replaces the offered action buttons. Empty hides them.
    fn set_action_buttons(&mut self, labels: &[String]);
    fn set_touch_controls_visible(&mut self, visible: bool);
}

/// Mode banner for an active sequence.
pub fn sequence_mode_text(index: usize, total: usize, name: &str, controls_enabled: bool) -> String {
    let controls = if controls_enabled {
        "ENABLED"
    } else {
        "DISABLED (Auto-play)"
    };
    format!("Sequence ({}/{total}): {name} | Controls: {controls}", index + 1)
}

#[derive(Debug, Default)]
struct Slots {
    status: RwLock<String>,
    mode_text: RwLock<String>,
    action_buttons: RwLock<Vec<String>>,
    touch_controls_visible: RwLock<bool>,
}

/// [`StatusSink`] that keeps the latest values for a UI to poll. Clones
/// share the same slots.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct StatusBoard {
    slots: Arc<Slots>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> String {
        self.slots.status.read().clone()
    }

    pub fn mode_text(&self) -> String {
        self.slots.mode_text.read().clone()
    }

    pub fn action_buttons(&self) -> Vec<String> {
        self.slots.action_buttons.read().clone()
    }

    pub fn touch_controls_visible(&self) -> bool {
        *self.slots.touch_controls_visible.read()
    }
}

impl StatusSink for StatusBoard {
    fn set_status(&mut self, text: &str) {
        *self.slots.status.write() = text.to_string();
    }

    fn set_mode_text(&mut self, text: &str) {
        *self.slots.mode_text.write() = text.to_string();
    }

    fn set_action_buttons(&mut self, labels: &[String]) {
        *self.slots.action_buttons.write() = labels.to_vec();
    }

    fn set_touch_controls_visible(&mut self, visible: bool) {
        *self.slots.touch_controls_visible.write() = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_text() {
        assert_eq!(
            sequence_mode_text(0, 3, "walk", true),
            "Sequence (1/3): walk | Controls: ENABLED"
        );
        assert_eq!(
            sequence_mode_text(1, 3, "general/twerk", false),
            "Sequence (2/3): general/twerk | Controls: DISABLED (Auto-play)"
        );
    }

    #[test]
    fn test_board_clones_share_slots() {
        let board = StatusBoard::new();
        let mut sink = board.clone();
        sink.set_status("Playing: twerk");
        sink.set_action_buttons(&["twerk".to_string()]);
        sink.set_touch_controls_visible(true);

        assert_eq!(board.status(), "Playing: twerk");
        assert_eq!(board.action_buttons(), vec!["twerk".to_string()]);
        assert!(board.touch_controls_visible());
    }
}
