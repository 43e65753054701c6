//! Prompt-Puppet Core Library
//!
//! Control-mode arbitration, animation sequencing and locomotion for a
//! prompt-driven animated character.
//!
//! This library provides two ways to drive a character:
//! - Plain mode: own a [`Session`] and call [`Session::tick`] from any loop
//! - Bevy mode: add [`bevy::PuppetHeadlessPlugin`] to an app (feature-gated)

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod arbiter;
pub mod catalog;
pub mod classify;
pub mod command;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod prompt;
pub mod rig;
pub mod sequencer;
pub mod session;
pub mod status;
pub mod touch;

// Bevy integration
#[cfg(feature = "bevy")]
pub mod bevy;

pub use arbiter::{ButtonOverride, ControlMode};
pub use catalog::{AnimationCatalogEntry, Catalog};
pub use classify::is_movement_animation;
pub use command::{CommandQueue, SessionCommand};
pub use config::{ConfigError, SessionConfig};
pub use input::{InputIntent, InputSource, Key, KeyboardSource};
pub use locomotion::{Facing, LocomotionPhase, LocomotionState, PhysicsConfig};
pub use prompt::{
    ControlSuggestion, PromptError, PromptOutcome, SequenceRequest, SequenceResponse,
};
pub use rig::{AnimationRequest, HeadlessRig, Rig};
pub use sequencer::{Sequence, Sequencer};
pub use session::{Frame, Session};
pub use status::{StatusBoard, StatusSink};
pub use touch::{PointerEvent, TouchControls, TouchLayout};
