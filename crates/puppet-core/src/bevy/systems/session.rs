//! Session tick system.

use bevy::prelude::*;

use crate::bevy::{AnimationRequestedEvent, ModeChangedEvent, PuppetMode, PuppetSession};

/// System to advance the session by the frame's delta time.
///
/// Writes an [`AnimationRequestedEvent`] per animation switch and a
/// [`ModeChangedEvent`] when the control mode changes.
pub fn tick_session(
    time: Res<Time>,
    mut session: ResMut<PuppetSession>,
    mut next_mode: ResMut<NextState<PuppetMode>>,
    mut animation_events: MessageWriter<AnimationRequestedEvent>,
    mut mode_events: MessageWriter<ModeChangedEvent>,
) {
    let before = session.mode();
    let after = session.tick(time.delta_secs()).mode;

    for change in session.take_animation_changes() {
        animation_events.write(AnimationRequestedEvent {
            name: change.name,
            looping: change.looping,
        });
    }

    if before != after {
        tracing::info!("[session] mode {before} -> {after}");
        mode_events.write(ModeChangedEvent {
            from: before,
            to: after,
        });
        next_mode.set(after.into());
    }
}
