//! The rendering collaborator.
//!
//! Skeletal playback, crossfade mixing and sprite transforms live in the host
//! renderer. The session only talks to it through [`Rig`].

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::locomotion::Facing;

pub trait Rig {
    /// Animations this rig can play. Read once at session start.
    fn catalog(&self) -> Catalog;

    /// Switches the single playback track to `name`.
    ///
    /// Returns `false` without changing anything when the name is unknown, or
    /// when a different animation is playing and has run for less than
    /// `min_played_secs`. Asking for the animation already playing is a
    /// successful no-op.
    fn play(&mut self, name: &str, looping: bool, min_played_secs: f32) -> bool;

    /// Crossfade duration used between any two animations.
    fn set_crossfade(&mut self, mix_secs: f32);

    fn set_transform(&mut self, x: f32, y: f32, facing: Facing);

    /// Advances playback by `dt` seconds. Engines that run their own clock
    /// can ignore this.
    fn update(&mut self, _dt: f32) {}
}

/// How many animation switches a change log keeps.
pub const HISTORY_LIMIT: usize = 64;

/// Appends to a change log, dropping the oldest entry once it is full.
pub fn push_bounded(log: &mut VecDeque<AnimationRequest>, request: AnimationRequest) {
    if log.len() >= HISTORY_LIMIT {
        log.pop_front();
    }
    log.push_back(request);
}

/// An animation switch the session asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub name: String,
    pub looping: bool,
}

/// Playback state of a [`HeadlessRig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigPlayback {
    pub current: Option<String>,
    pub looping: bool,
    /// Seconds the current animation has been playing.
    pub track_time: f32,
    pub crossfade: f32,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    /// The latest [`HISTORY_LIMIT`] switches that took effect, oldest first.
    pub history: VecDeque<AnimationRequest>,
}

/// A rig that only records what it was told. Clones share state, so a
/// handle kept outside the session can observe playback.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct HeadlessRig {
    catalog: Catalog,
    playback: Arc<RwLock<RigPlayback>>,
}

impl HeadlessRig {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            playback: Arc::new(RwLock::new(RigPlayback::default())),
        }
    }

    pub fn playback(&self) -> RigPlayback {
        self.playback.read().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.playback.read().current.clone()
    }

    pub fn history(&self) -> Vec<AnimationRequest> {
        self.playback.read().history.iter().cloned().collect()
    }
}

impl Rig for HeadlessRig {
    fn catalog(&self) -> Catalog {
        self.catalog.clone()
    }

    fn play(&mut self, name: &str, looping: bool, min_played_secs: f32) -> bool {
        if !self.catalog.contains(name) {
            return false;
        }
        let mut playback = self.playback.write();
        match playback.current.as_deref() {
            Some(current) if current == name => return true,
            Some(_) if playback.track_time < min_played_secs => return false,
            _ => {}
        }
        playback.current = Some(name.to_string());
        playback.looping = looping;
        playback.track_time = 0.0;
        push_bounded(
            &mut playback.history,
            AnimationRequest {
                name: name.to_string(),
                looping,
            },
        );
        true
    }

    fn set_crossfade(&mut self, mix_secs: f32) {
        self.playback.write().crossfade = mix_secs;
    }

    fn set_transform(&mut self, x: f32, y: f32, facing: Facing) {
        let mut playback = self.playback.write();
        playback.x = x;
        playback.y = y;
        playback.facing = facing;
    }

    fn update(&mut self, dt: f32) {
        let mut playback = self.playback.write();
        if playback.current.is_some() {
            playback.track_time += dt;
        }
    }
}
