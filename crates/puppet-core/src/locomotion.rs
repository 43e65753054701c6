//! Grounded/airborne locomotion for the character.
//!
//! Horizontal motion is virtual: the character stays put on screen and the
//! background scrolls by [`LocomotionState::vx`]. Only the vertical axis is
//! integrated.

use serde::{Deserialize, Serialize};

use crate::input::InputIntent;

/// Physics tunables in view pixels and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s^2).
    pub gravity: f32,
    /// Vertical velocity applied at launch. Negative is up.
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    /// Magnitude of the virtual horizontal velocity (px/s).
    pub move_speed: f32,
    /// Y coordinate of the ground line.
    pub ground_y: f32,
    /// Downward speed above which the fall animation plays.
    pub fall_anim_threshold: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            jump_velocity: -850.0,
            max_fall_speed: 1500.0,
            move_speed: 480.0,
            ground_y: 1862.0,
            fall_anim_threshold: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocomotionPhase {
    #[default]
    Grounded,
    Airborne,
}

/// What happened during one [`LocomotionState::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub launched: bool,
    pub landed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub on_ground: bool,
    pub facing: Facing,
    config: PhysicsConfig,
}

impl LocomotionState {
    /// Grounded at `x`, facing right.
    pub fn new(x: f32, config: PhysicsConfig) -> Self {
        Self {
            x,
            y: config.ground_y,
            vx: 0.0,
            vy: 0.0,
            on_ground: true,
            facing: Facing::Right,
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn phase(&self) -> LocomotionPhase {
        if self.on_ground {
            LocomotionPhase::Grounded
        } else {
            LocomotionPhase::Airborne
        }
    }

    /// Falling fast enough to show the fall animation.
    pub fn is_falling(&self) -> bool {
        !self.on_ground && self.vy > self.config.fall_anim_threshold
    }

    /// Advances one tick under player control.
    pub fn step(&mut self, intent: &InputIntent, dt: f32) -> StepReport {
        let mut report = StepReport::default();

        match intent.horizontal() {
            d if d < 0 => {
                self.facing = Facing::Left;
                self.vx = -self.config.move_speed;
            }
            d if d > 0 => {
                self.facing = Facing::Right;
                self.vx = self.config.move_speed;
            }
            _ => self.vx = 0.0,
        }

        if intent.jump_pressed && self.on_ground {
            self.vy = self.config.jump_velocity;
            self.on_ground = false;
            report.launched = true;
        }

        if !self.on_ground {
            self.vy = (self.vy + self.config.gravity * dt).min(self.config.max_fall_speed);
            self.y += self.vy * dt;
            if self.y >= self.config.ground_y {
                self.y = self.config.ground_y;
                self.vy = 0.0;
                self.on_ground = true;
                report.landed = true;
            }
        }

        report
    }

    /// Pins the character to the ground with no velocity. Facing is kept.
    pub fn freeze(&mut self) {
        self.y = self.config.ground_y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.on_ground = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn state() -> LocomotionState {
        LocomotionState::new(540.0, PhysicsConfig::default())
    }

    fn jump() -> InputIntent {
        InputIntent {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_jump_launches_and_lands() {
        let mut s = state();
        let report = s.step(&jump(), DT);
        assert!(report.launched);
        assert_eq!(s.phase(), LocomotionPhase::Airborne);
        assert!(s.y < s.config().ground_y);

        let mut landed = false;
        for _ in 0..300 {
            if s.step(&InputIntent::default(), DT).landed {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(s.phase(), LocomotionPhase::Grounded);
        assert!((s.y - s.config().ground_y).abs() < f32::EPSILON);
        assert!(s.vy.abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_double_jump_while_airborne() {
        let mut s = state();
        s.step(&jump(), DT);
        let vy_before = s.vy;
        let report = s.step(&jump(), DT);
        assert!(!report.launched);
        assert!(s.vy > vy_before);
    }

    #[test]
    fn test_fall_speed_is_clamped() {
        let mut s = state();
        s.on_ground = false;
        s.y = -100_000.0;
        for _ in 0..120 {
            s.step(&InputIntent::default(), DT);
        }
        assert!(s.vy <= s.config().max_fall_speed);
        assert!(s.is_falling());
    }

    #[test]
    fn test_facing_and_virtual_velocity() {
        let mut s = state();
        let x = s.x;
        let left = InputIntent {
            left: true,
            ..Default::default()
        };
        s.step(&left, DT);
        assert_eq!(s.facing, Facing::Left);
        assert!((s.vx + 480.0).abs() < f32::EPSILON);
        // Horizontal velocity never moves the character.
        assert!((s.x - x).abs() < f32::EPSILON);

        s.step(&InputIntent::default(), DT);
        assert_eq!(s.facing, Facing::Left);
        assert!(s.vx.abs() < f32::EPSILON);
    }

    #[test]
    fn test_freeze_grounds_the_character() {
        let mut s = state();
        s.step(&jump(), DT);
        s.freeze();
        assert!(s.on_ground);
        assert!(s.vy.abs() < f32::EPSILON);
        assert!((s.y - s.config().ground_y).abs() < f32::EPSILON);
    }
}
