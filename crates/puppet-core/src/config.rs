//! Session configuration.
//!
//! Every field has a default, so `{}` is a valid config.

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_ANIMATION_SECS;
use crate::locomotion::PhysicsConfig;
use crate::touch::{TouchLayout, TouchSettings};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Logical view size. Pointer coordinates use this space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
        }
    }
}

/// Fallback lists; the first name present in the catalog is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationLists {
    pub idle: Vec<String>,
    pub jump: Vec<String>,
    pub fall: Vec<String>,
}

impl Default for AnimationLists {
    fn default() -> Self {
        let list = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect();
        Self {
            idle: list(&["idle", "sleepStanding"]),
            jump: list(&["jumpInplace", "backFlip2"]),
            fall: list(&["fallPose", "backFlip2"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed for movement-hold jitter.
    pub seed: u64,
    /// Nominal hold of a movement item (s).
    pub per_action_secs: f32,
    /// Longest tick the session will integrate (s).
    pub max_tick_secs: f32,
    /// Crossfade between animations (s).
    pub crossfade_secs: f32,
    /// Time after a button animation ends before control returns (s).
    pub override_grace_secs: f32,
    /// Length assumed for animations with no usable catalog duration (s).
    pub default_animation_secs: f32,
    pub physics: PhysicsConfig,
    pub view: ViewConfig,
    pub touch: TouchSettings,
    pub animations: AnimationLists,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            per_action_secs: 20.0,
            max_tick_secs: 0.05,
            crossfade_secs: 0.1,
            override_grace_secs: 0.1,
            default_animation_secs: DEFAULT_ANIMATION_SECS,
            physics: PhysicsConfig::default(),
            view: ViewConfig::default(),
            touch: TouchSettings::default(),
            animations: AnimationLists::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be zero or more, got {value}"),
        })
    }
}

impl SessionConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("per_action_secs", self.per_action_secs)?;
        positive("max_tick_secs", self.max_tick_secs)?;
        positive("default_animation_secs", self.default_animation_secs)?;
        non_negative("crossfade_secs", self.crossfade_secs)?;
        non_negative("override_grace_secs", self.override_grace_secs)?;
        positive("view.width", self.view.width)?;
        positive("view.height", self.view.height)?;
        positive("physics.gravity", self.physics.gravity)?;
        positive("physics.max_fall_speed", self.physics.max_fall_speed)?;

        let deadzone = self.touch.deadzone;
        if !(0.0..1.0).contains(&deadzone) {
            return Err(ConfigError::Invalid {
                field: "touch.deadzone",
                reason: format!("must be in [0, 1), got {deadzone}"),
            });
        }
        if !(0.0..1.0).contains(&self.touch.input_zone_ratio) {
            return Err(ConfigError::Invalid {
                field: "touch.input_zone_ratio",
                reason: format!("must be in [0, 1), got {}", self.touch.input_zone_ratio),
            });
        }
        Ok(())
    }

    pub fn touch_layout(&self) -> TouchLayout {
        TouchLayout::from_view(self.view.width, self.view.height, &self.touch)
    }

    /// Horizontal position of the character: centered in the view.
    pub fn character_x(&self) -> f32 {
        self.view.width / 2.0
    }
}
