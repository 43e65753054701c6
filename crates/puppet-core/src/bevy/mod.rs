//! Bevy integration for the puppet session.
//!
//! This module wraps a [`Session`](crate::session::Session) in a headless
//! plugin: keyboard and touch input flow in through systems, the session
//! ticks once per `Update`, and animation and mode changes flow out as
//! messages and shared stores.

pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use events::*;
pub use plugin::{PuppetHeadlessPlugin, PuppetMode, PuppetSet};
pub use resources::*;
pub use systems::*;

pub use crate::command::CommandQueue;
pub use crate::rig::HeadlessRig;
pub use crate::status::StatusBoard;
