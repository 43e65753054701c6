//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `PuppetHeadlessPlugin` for testing the session
//! without a rendering or windowing backend.

use std::time::Duration;

use bevy::ecs::message::Messages;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput, NativeKey};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::bevy::plugin::PuppetHeadlessPlugin;
use crate::bevy::resources::PuppetSession;
use crate::catalog::{AnimationCatalogEntry, Catalog};
use crate::command::{CommandQueue, SessionCommand};
use crate::config::SessionConfig;
use crate::prompt::{ControlSuggestion, PromptOutcome};
use crate::rig::HeadlessRig;
use crate::status::StatusBoard;

/// Simulated frame length.
pub const FRAME: Duration = Duration::from_millis(16);

/// Catalog used by the Bevy tests.
pub fn test_catalog() -> Catalog {
    Catalog::new([
        AnimationCatalogEntry::new("idle", 1.0),
        AnimationCatalogEntry::new("walk", 1.0),
        AnimationCatalogEntry::new("jumpInplace", 0.8),
        AnimationCatalogEntry::new("fallPose", 1.0),
        AnimationCatalogEntry::new("general/twerk", 3.0),
    ])
}

/// A headless Bevy app wrapper for testing.
///
/// Every update advances time by a fixed [`FRAME`], so runs are
/// deterministic.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app with default seed.
    pub fn new() -> Self {
        Self::with_seed(12345)
    }

    /// Create a new test app with a specific RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::state::app::StatesPlugin);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(PuppetHeadlessPlugin::new(
            SessionConfig {
                seed,
                ..SessionConfig::default()
            },
            test_catalog(),
        ));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        // Run one update to initialize all resources and state
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, cmd: SessionCommand) {
        self.app.world().resource::<CommandQueue>().push(cmd);
    }

    /// Deliver a prompt outcome and run an update to apply it.
    pub fn prompt(&mut self, sequence: &[&str], control: ControlSuggestion) {
        self.push_command(SessionCommand::PromptResolved(PromptOutcome {
            sequence: sequence.iter().map(|s| (*s).to_string()).collect(),
            vibe: "neutral".into(),
            control,
            error: None,
        }));
        self.update();
    }

    /// Queue a key transition for the next update, as a window would.
    pub fn key_event(&mut self, code: KeyCode, state: ButtonState) {
        self.app
            .world_mut()
            .resource_mut::<Messages<KeyboardInput>>()
            .write(KeyboardInput {
                key_code: code,
                logical_key: Key::Unidentified(NativeKey::Unidentified),
                state,
                text: None,
                repeat: false,
                window: Entity::PLACEHOLDER,
            });
    }

    pub fn press(&mut self, code: KeyCode) {
        self.key_event(code, ButtonState::Pressed);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.key_event(code, ButtonState::Released);
    }

    /// Queue a touch event for the next update, in view coordinates.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) {
        self.app
            .world_mut()
            .resource_mut::<Messages<TouchInput>>()
            .write(TouchInput {
                phase,
                position: Vec2::new(x, y),
                window: Entity::PLACEHOLDER,
                force: None,
                id,
            });
    }

    pub fn session(&self) -> &PuppetSession {
        self.app.world().resource::<PuppetSession>()
    }

    pub fn rig(&self) -> &HeadlessRig {
        self.app.world().resource::<HeadlessRig>()
    }

    pub fn board(&self) -> &StatusBoard {
        self.app.world().resource::<StatusBoard>()
    }

    /// Drain every pending message of type `M`.
    pub fn drain_messages<M: Message>(&mut self) -> Vec<M> {
        self.app
            .world_mut()
            .resource_mut::<Messages<M>>()
            .drain()
            .collect()
    }
}
