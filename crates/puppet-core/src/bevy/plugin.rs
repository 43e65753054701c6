//! Bevy plugin for the puppet session.
//!
//! Provides:
//! - `PuppetHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies)
//! - `PuppetMode`: Bevy state mirroring the session's control mode

use bevy::prelude::*;

use crate::arbiter::ControlMode;
use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::catalog::Catalog;
use crate::command::CommandQueue;
use crate::config::SessionConfig;
use crate::rig::HeadlessRig;
use crate::session::Session;
use crate::status::StatusBoard;

/// Control mode as a Bevy state, for `run_if(in_state(..))` gating.
///
/// Follows the session one frame behind: the tick requests the transition
/// and `StateTransition` applies it on the next update.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PuppetMode {
    #[default]
    Idle,
    Movement,
    AutoPlay,
    ButtonOverride,
}

impl From<ControlMode> for PuppetMode {
    fn from(mode: ControlMode) -> Self {
        match mode {
            ControlMode::Idle => Self::Idle,
            ControlMode::Movement => Self::Movement,
            ControlMode::AutoPlay => Self::AutoPlay,
            ControlMode::ButtonOverride => Self::ButtonOverride,
        }
    }
}

/// System sets for ordering host systems around the session tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PuppetSet {
    /// Device input copied into the session.
    Input,
    /// The session tick itself.
    Tick,
}

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin running a [`Session`] against a [`HeadlessRig`].
///
/// Use this plugin with `MinimalPlugins` + `InputPlugin` + `StatesPlugin`.
/// A renderer reads [`HeadlessRig`] (or listens to
/// [`AnimationRequestedEvent`]) and applies the playback to its skeleton.
pub struct PuppetHeadlessPlugin {
    pub config: SessionConfig,
    pub catalog: Catalog,
    pub command_queue: Option<CommandQueue>,
    pub status_board: Option<StatusBoard>,
}

impl Default for PuppetHeadlessPlugin {
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
            catalog: Catalog::default(),
            command_queue: None,
            status_board: None,
        }
    }
}

impl PuppetHeadlessPlugin {
    pub fn new(config: SessionConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            ..Self::default()
        }
    }
}

impl Plugin for PuppetHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // States
        // ====================================================================
        app.init_state::<PuppetMode>();

        // ====================================================================
        // Resources
        // ====================================================================
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                tracing::error!("[session] {e}, falling back to default config");
                SessionConfig::default()
            }
        };
        let rig = HeadlessRig::new(self.catalog.clone());
        let board = self.status_board.clone().unwrap_or_default();
        let queue = self.command_queue.clone().unwrap_or_default();
        let session = Session::from_validated(config, Box::new(rig.clone()), Box::new(board.clone()))
            .with_command_queue(queue.clone());

        app.insert_resource(PuppetSession(session))
            .insert_resource(queue)
            .insert_resource(board)
            .insert_resource(rig)
            .init_resource::<KeyBindings>();

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<AnimationRequestedEvent>()
            .add_message::<ModeChangedEvent>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.configure_sets(Update, (PuppetSet::Input, PuppetSet::Tick).chain());

        app.add_systems(
            Update,
            (systems::sync_keyboard, systems::sync_touches)
                .chain()
                .in_set(PuppetSet::Input),
        );
        app.add_systems(Update, systems::tick_session.in_set(PuppetSet::Tick));
    }
}
