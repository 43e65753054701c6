//! Control mode derivation and the one-shot button override.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Who drives the character this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    /// No sequence running. Idle loops and the player has no control.
    #[default]
    Idle,
    /// The current item is locomotion. Player input drives the character.
    Movement,
    /// The current item plays on its own. Input is ignored.
    AutoPlay,
    /// A button-triggered animation is playing once. Everything else waits.
    ButtonOverride,
}

impl ControlMode {
    /// Picks the mode for this tick. The override always wins.
    pub fn derive(override_active: bool, sequence_active: bool, current_is_movement: bool) -> Self {
        if override_active {
            Self::ButtonOverride
        } else if !sequence_active {
            Self::Idle
        } else if current_is_movement {
            Self::Movement
        } else {
            Self::AutoPlay
        }
    }

    /// Whether player input moves the character.
    pub fn controls_enabled(self) -> bool {
        self == Self::Movement
    }

    /// Whether the sequencer may advance.
    pub fn sequence_runs(self) -> bool {
        matches!(self, Self::Movement | Self::AutoPlay)
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Movement => "movement",
            Self::AutoPlay => "auto-play",
            Self::ButtonOverride => "button-override",
        };
        f.write_str(s)
    }
}

/// Extra time after the override animation's own length before it clears.
pub const OVERRIDE_GRACE: Duration = Duration::from_millis(100);

/// A running button override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonOverride {
    /// The label as shown on the button.
    pub label: String,
    /// The catalog name being played.
    pub name: String,
    pub deadline: Duration,
}

impl ButtonOverride {
    /// Starts at `now`, clearing after `duration_secs` plus `grace`.
    pub fn new(
        label: impl Into<String>,
        name: impl Into<String>,
        duration_secs: f32,
        grace: Duration,
        now: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            deadline: now + Duration::from_secs_f32(duration_secs.max(0.0)) + grace,
        }
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_takes_precedence() {
        for seq in [false, true] {
            for movement in [false, true] {
                assert_eq!(
                    ControlMode::derive(true, seq, movement),
                    ControlMode::ButtonOverride
                );
            }
        }
    }

    #[test]
    fn test_mode_derivation() {
        assert_eq!(ControlMode::derive(false, false, true), ControlMode::Idle);
        assert_eq!(ControlMode::derive(false, true, true), ControlMode::Movement);
        assert_eq!(ControlMode::derive(false, true, false), ControlMode::AutoPlay);
        assert!(ControlMode::Movement.controls_enabled());
        assert!(!ControlMode::AutoPlay.controls_enabled());
        assert!(!ControlMode::ButtonOverride.sequence_runs());
    }

    #[test]
    fn test_override_deadline() {
        let o = ButtonOverride::new(
            "twerk",
            "general/twerk",
            3.0,
            OVERRIDE_GRACE,
            Duration::from_secs(1),
        );
        assert_eq!(o.deadline, Duration::from_millis(4100));
        assert!(!o.is_expired(Duration::from_millis(4099)));
        assert!(o.is_expired(Duration::from_millis(4100)));
    }
}
