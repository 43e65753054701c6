//! Input systems.
//!
//! Copies Bevy's keyboard and touch state into the session's input sources.

use bevy::input::touch::Touches;
use bevy::prelude::*;

use crate::bevy::{KeyBindings, PuppetSession};
use crate::touch::PointerEvent;

/// System to mirror bound key levels into the session keyboard.
///
/// A key pressed since the last frame is replayed as a fresh up→down
/// transition first, so a tap that starts and ends within one frame, or a
/// release and re-press between frames, still raises the jump edge.
pub fn sync_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut session: ResMut<PuppetSession>,
) {
    for (key, code) in bindings.pairs() {
        if keys.just_pressed(code) {
            session.key(key, false);
            session.key(key, true);
        }
        session.key(key, keys.pressed(code));
    }
}

/// System to forward touch changes as pointer events.
///
/// Touch positions are used as view coordinates, so the window's logical
/// size should match the configured view.
pub fn sync_touches(touches: Res<Touches>, mut session: ResMut<PuppetSession>) {
    for touch in touches.iter_just_pressed() {
        let pos = touch.position();
        session.pointer(PointerEvent::Down {
            id: touch.id(),
            x: pos.x,
            y: pos.y,
        });
    }
    for touch in touches.iter() {
        if touch.delta() == Vec2::ZERO {
            continue;
        }
        let pos = touch.position();
        session.pointer(PointerEvent::Move {
            id: touch.id(),
            x: pos.x,
            y: pos.y,
            down: true,
        });
    }
    for touch in touches.iter_just_released() {
        let pos = touch.position();
        session.pointer(PointerEvent::Up {
            id: touch.id(),
            x: pos.x,
            y: pos.y,
        });
    }
    if touches.iter_just_canceled().next().is_some() {
        tracing::debug!("[input] touch canceled");
        session.pointer(PointerEvent::Cancel);
    }
}
