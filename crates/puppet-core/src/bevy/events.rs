//! ECS Events (Messages) for the puppet session.
//!
//! Written by the session tick so other systems (renderer glue, audio, UI)
//! can react without polling the session.
//! Note: In Bevy 0.18+, buffered events use Message trait instead of Event.

use bevy::prelude::*;

use crate::arbiter::ControlMode;

/// Message fired when the session switches the rig to another animation.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequestedEvent {
    /// Catalog name of the animation.
    pub name: String,
    /// Whether it loops or plays once.
    pub looping: bool,
}

/// Message fired when the control mode differs from the previous tick.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChangedEvent {
    pub from: ControlMode,
    pub to: ControlMode,
}
