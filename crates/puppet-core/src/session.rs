//! Per-character session: ties input, sequencing, locomotion and the
//! collaborators together on every tick.
//!
//! The host owns the loop. It calls [`Session::tick`] once per frame and
//! feeds external events through the [`CommandQueue`] (or the direct
//! methods when it already runs on the tick's thread).

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::arbiter::{ButtonOverride, ControlMode};
use crate::catalog::Catalog;
use crate::classify::{is_movement_animation, scroll_base_speed};
use crate::command::{CommandQueue, SessionCommand};
use crate::config::{ConfigError, SessionConfig};
use crate::input::{InputSource, Key, KeyboardSource, merge};
use crate::locomotion::{Facing, LocomotionPhase, LocomotionState};
use crate::prompt::{PromptError, PromptOutcome};
use crate::rig::{AnimationRequest, HISTORY_LIMIT, Rig, push_bounded};
use crate::sequencer::{Sequence, SequenceStep, Sequencer};
use crate::status::{IDLE_MODE_TEXT, StatusSink, sequence_mode_text};
use crate::touch::{PointerEvent, TouchControls};

/// What the renderer needs after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub mode: ControlMode,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub phase: LocomotionPhase,
    /// Animation the rig is playing, as far as the session knows.
    pub animation: Option<String>,
    pub virtual_vx: f32,
    /// Background scroll speed (px/s). Sign follows the virtual velocity.
    pub scroll_speed: f32,
    /// Accumulated background scroll (px).
    pub scroll_offset: f32,
    pub controls_enabled: bool,
}

pub struct Session {
    config: SessionConfig,
    catalog: Catalog,
    sequencer: Sequencer,
    locomotion: LocomotionState,
    keyboard: KeyboardSource,
    touch: TouchControls,
    button_override: Option<ButtonOverride>,
    buttons: Vec<String>,
    queue: CommandQueue,
    clock: Duration,
    frame: Frame,
    animation: Option<String>,
    animation_changes: VecDeque<AnimationRequest>,
    mode_text: String,
    touch_visible: bool,
    rig: Box<dyn Rig + Send + Sync>,
    status: Box<dyn StatusSink + Send + Sync>,
}

impl Session {
    /// Validates `config`, reads the rig's catalog and starts idling.
    pub fn init(
        config: SessionConfig,
        rig: Box<dyn Rig + Send + Sync>,
        status: Box<dyn StatusSink + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, rig, status))
    }

    /// [`init`](Self::init) for a config that already passed
    /// [`SessionConfig::validate`].
    pub(crate) fn from_validated(
        config: SessionConfig,
        rig: Box<dyn Rig + Send + Sync>,
        status: Box<dyn StatusSink + Send + Sync>,
    ) -> Self {
        let catalog = rig.catalog();
        let sequencer = Sequencer::new(config.seed, config.per_action_secs)
            .with_default_animation_secs(config.default_animation_secs);
        let locomotion = LocomotionState::new(config.character_x(), config.physics);
        let touch = TouchControls::new(config.touch_layout());

        let mut session = Self {
            catalog,
            sequencer,
            locomotion,
            keyboard: KeyboardSource::new(),
            touch,
            button_override: None,
            buttons: Vec::new(),
            queue: CommandQueue::new(),
            clock: Duration::ZERO,
            frame: Frame::default(),
            animation: None,
            animation_changes: VecDeque::with_capacity(HISTORY_LIMIT),
            mode_text: String::new(),
            touch_visible: true,
            rig,
            status,
            config,
        };

        tracing::info!(
            "[session] init with {} animations (seed={})",
            session.catalog.len(),
            session.config.seed
        );

        session.rig.set_crossfade(session.config.crossfade_secs);
        session.play_idle();
        session.sync_transform();
        session.update_mode_ui(ControlMode::Idle);
        session.frame = session.snapshot(ControlMode::Idle, 0.0);
        session
    }

    /// Reads commands from `queue` instead of a private one.
    #[must_use]
    pub fn with_command_queue(mut self, queue: CommandQueue) -> Self {
        self.queue = queue;
        self
    }

    /// A handle producers can push commands through.
    pub fn command_queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    pub fn push(&self, command: SessionCommand) {
        self.queue.push(command);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sequence(&self) -> &Sequence {
        self.sequencer.sequence()
    }

    pub fn current_item(&self) -> Option<&str> {
        self.sequencer.current_item()
    }

    pub fn locomotion(&self) -> &LocomotionState {
        &self.locomotion
    }

    pub fn button_override(&self) -> Option<&ButtonOverride> {
        self.button_override.as_ref()
    }

    /// Buttons currently offered to the player.
    pub fn action_buttons(&self) -> &[String] {
        &self.buttons
    }

    /// Time since [`init`](Self::init), advanced only by ticks.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn mode(&self) -> ControlMode {
        self.frame.mode
    }

    /// The last tick's output.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Animation switches since the last call, oldest first. Only the
    /// latest [`HISTORY_LIMIT`] are kept between calls.
    pub fn take_animation_changes(&mut self) -> Vec<AnimationRequest> {
        self.animation_changes.drain(..).collect()
    }

    pub fn key(&mut self, key: Key, down: bool) {
        self.keyboard.set_key(key, down);
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        self.touch.handle(event);
    }

    /// Applies a finished prompt round trip. Replaces whatever was running.
    pub fn apply_prompt(&mut self, outcome: PromptOutcome) {
        let now = self.clock;

        if let Some(cleared) = self.button_override.take() {
            tracing::info!("[override] {} cancelled by new prompt", cleared.label);
        }

        if let Some(error) = &outcome.error {
            tracing::warn!("[session] prompt failed: {error}");
            self.status.set_status(&format!("Error: {error}"));
        }

        if outcome.sequence.is_empty() {
            self.sequencer.stop();
            self.set_buttons(Vec::new());
            if outcome.error.is_none() {
                self.status.set_status("No animations found for prompt");
            }
            self.play_idle();
            return;
        }

        tracing::info!(
            "[session] prompt: vibe={} control={} sequence={:?}",
            outcome.vibe,
            outcome.control,
            outcome.sequence
        );
        self.status.set_status(&outcome.status_line());
        self.set_buttons(outcome.action_buttons());

        let playable = outcome.playable_sequence();
        if playable.is_empty() {
            tracing::info!("[session] no auto-play animations, waiting for button");
            self.sequencer.stop();
            self.play_idle();
        } else if !self.sequencer.start(&playable, &self.catalog, now) {
            self.play_idle();
        }
    }

    /// Reports a prompt that never produced a usable response.
    pub fn prompt_failed(&mut self, error: &PromptError) {
        if matches!(error, PromptError::Empty) {
            self.status.set_status(&error.to_string());
            return;
        }
        self.apply_prompt(PromptOutcome::from_error(error));
    }

    /// Plays `label` once, suspending the sequence until it finishes.
    /// Labels the catalog cannot resolve are ignored.
    pub fn trigger_button(&mut self, label: &str) {
        let now = self.clock;
        let Some(name) = self.catalog.resolve(label).map(str::to_owned) else {
            tracing::info!("[override] {label} is not in the catalog, ignoring");
            return;
        };

        self.sequencer.suspend(now);
        self.locomotion.freeze();
        self.play(&name, false);

        let secs = self
            .catalog
            .duration_of(&name)
            .unwrap_or(self.config.default_animation_secs);
        let grace = Duration::from_secs_f32(self.config.override_grace_secs);
        let button_override = ButtonOverride::new(label, name, secs, grace, now);
        tracing::info!(
            "[override] {} playing once as {} until {:?}",
            button_override.label,
            button_override.name,
            button_override.deadline
        );
        self.button_override = Some(button_override);
        self.status.set_status(&format!("Playing: {label}"));
    }

    /// Advances the session by `dt` seconds (clamped to the configured
    /// maximum) and pushes the result to the collaborators.
    pub fn tick(&mut self, dt: f32) -> &Frame {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_tick_secs)
        } else {
            0.0
        };
        self.clock += Duration::from_secs_f32(dt);
        let now = self.clock;

        for command in self.queue.drain() {
            self.apply_command(command);
        }

        if self
            .button_override
            .as_ref()
            .is_some_and(|o| o.is_expired(now))
            && let Some(finished) = self.button_override.take()
        {
            tracing::info!("[override] {} finished", finished.label);
            if self.sequencer.is_suspended() {
                self.sequencer.resume(now);
            }
            self.play_idle();
            self.status.set_status(&format!("Finished: {}", finished.label));
        }

        if self.button_override.is_none()
            && let SequenceStep::Advanced { index } = self.sequencer.advance(now)
        {
            tracing::debug!("[session] sequence advanced to {index}");
        }

        // Always read, so one-shot edges never outlive their tick.
        let keyboard = self.keyboard.read();
        let touch = self.touch.read();
        let intent = merge(keyboard, Some(touch));

        let current = self.sequencer.current_item().map(str::to_owned);
        let mode = ControlMode::derive(
            self.button_override.is_some(),
            self.sequencer.is_active(),
            current.as_deref().is_some_and(is_movement_animation),
        );

        match mode {
            ControlMode::ButtonOverride => self.locomotion.freeze(),
            ControlMode::Idle => {
                self.locomotion.freeze();
                self.play_idle();
            }
            ControlMode::AutoPlay => {
                self.locomotion.freeze();
                if let Some(name) = &current {
                    self.play(name, true);
                }
            }
            ControlMode::Movement => {
                let report = self.locomotion.step(&intent, dt);
                if report.launched {
                    let jump = self.config.animations.jump.clone();
                    self.play_first(&jump, false);
                }
                if self.locomotion.on_ground {
                    match &current {
                        Some(name) if self.locomotion.vx != 0.0 => self.play(name, true),
                        _ => self.play_idle(),
                    }
                } else if self.locomotion.is_falling() {
                    let fall = self.config.animations.fall.clone();
                    self.play_first(&fall, true);
                }
            }
        }

        let scroll_speed = match &current {
            Some(name) if self.sequencer.is_active() && self.locomotion.vx != 0.0 => {
                scroll_base_speed(name) * self.locomotion.vx.signum()
            }
            _ => 0.0,
        };
        let scroll_offset = self.frame.scroll_offset + scroll_speed * dt;

        self.rig.update(dt);
        self.sync_transform();
        if self.frame.mode != mode {
            tracing::debug!("[session] mode {} -> {}", self.frame.mode, mode);
        }
        self.update_mode_ui(mode);

        self.frame = Frame {
            scroll_speed,
            scroll_offset,
            ..self.snapshot(mode, scroll_offset)
        };
        &self.frame
    }

    /// Stops everything and clears the UI. The session stays usable.
    pub fn teardown(&mut self) {
        tracing::info!("[session] teardown at {:?}", self.clock);
        self.sequencer.stop();
        self.button_override = None;
        self.keyboard.release_all();
        self.touch.handle(PointerEvent::Cancel);
        self.queue.drain();
        self.set_buttons(Vec::new());
        self.locomotion.freeze();
        self.play_idle();
        self.update_mode_ui(ControlMode::Idle);
        self.frame = self.snapshot(ControlMode::Idle, self.frame.scroll_offset);
    }

    fn apply_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Key { key, down } => self.key(key, down),
            SessionCommand::Pointer(event) => self.pointer(event),
            SessionCommand::EmptyPrompt => self.prompt_failed(&PromptError::Empty),
            SessionCommand::PromptResolved(outcome) => self.apply_prompt(outcome),
            SessionCommand::Button { label } => self.trigger_button(&label),
        }
    }

    fn play(&mut self, name: &str, looping: bool) {
        if !self.rig.play(name, looping, 0.0) {
            return;
        }
        if self.animation.as_deref() != Some(name) {
            self.animation = Some(name.to_string());
            push_bounded(
                &mut self.animation_changes,
                AnimationRequest {
                    name: name.to_string(),
                    looping,
                },
            );
        }
    }

    fn play_first(&mut self, names: &[String], looping: bool) {
        if let Some(name) = self.catalog.first_available(names).map(str::to_owned) {
            self.play(&name, looping);
        }
    }

    fn play_idle(&mut self) {
        let idle = self.config.animations.idle.clone();
        self.play_first(&idle, true);
    }

    fn set_buttons(&mut self, buttons: Vec<String>) {
        self.status.set_action_buttons(&buttons);
        self.buttons = buttons;
    }

    fn sync_transform(&mut self) {
        self.rig
            .set_transform(self.locomotion.x, self.locomotion.y, self.locomotion.facing);
    }

    /// Pushes mode text and touch visibility when they change. Both are left
    /// alone while a button override plays.
    fn update_mode_ui(&mut self, mode: ControlMode) {
        if mode == ControlMode::ButtonOverride {
            self.set_touch_visible(false);
            return;
        }
        let text = match self.sequencer.current_item() {
            Some(name) => sequence_mode_text(
                self.sequencer.sequence().index(),
                self.sequencer.sequence().len(),
                name,
                mode.controls_enabled(),
            ),
            None => IDLE_MODE_TEXT.to_string(),
        };
        if text != self.mode_text {
            self.status.set_mode_text(&text);
            self.mode_text = text;
        }
        self.set_touch_visible(mode.controls_enabled());
    }

    fn set_touch_visible(&mut self, visible: bool) {
        if visible != self.touch_visible {
            self.status.set_touch_controls_visible(visible);
            self.touch_visible = visible;
        }
    }

    fn snapshot(&self, mode: ControlMode, scroll_offset: f32) -> Frame {
        Frame {
            mode,
            x: self.locomotion.x,
            y: self.locomotion.y,
            facing: self.locomotion.facing,
            phase: self.locomotion.phase(),
            animation: self.animation.clone(),
            virtual_vx: self.locomotion.vx,
            scroll_speed: 0.0,
            scroll_offset,
            controls_enabled: mode.controls_enabled(),
        }
    }
}
