//! Movement vs. auto-play classification of animation names.

/// Keywords naming basic locomotion. Only these hand control to the player.
pub const MOVEMENT_KEYWORDS: [&str; 4] = ["walk", "run", "jump", "fall"];

/// Whether `name` is a locomotion animation.
///
/// A keyword matches at the start of the name or right after a `/` or a
/// space, so `general/walk`, `walkBackwards` and `fast run` are movement while
/// `catchRun` and `scaredRun` are not. Case-insensitive.
pub fn is_movement_animation(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    MOVEMENT_KEYWORDS.iter().any(|keyword| {
        name.starts_with(keyword)
            || name.contains(&format!("/{keyword}"))
            || name.contains(&format!(" {keyword}"))
    })
}

/// Background scroll speed (px/s) for a locomotion animation, before the sign
/// of the virtual velocity is applied.
pub fn scroll_base_speed(name: &str) -> f32 {
    let name = name.to_lowercase();
    if name.contains("run") {
        140.0
    } else if name.contains("walk") {
        60.0
    } else if name.contains("fly") {
        100.0
    } else {
        20.0
    }
}
