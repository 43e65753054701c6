//! Virtual touch controls: a joystick on the left, a jump button on the right.
//!
//! Coordinates are in the logical view space (1080x1920 by default). The
//! layout mirrors what the UI draws so hit regions line up with the widgets.

use serde::{Deserialize, Serialize};

use crate::input::{InputIntent, InputSource};

/// Axis-aligned rectangle. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Tunables for deriving the control layout from the view size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchSettings {
    /// Fraction of the view height, from the bottom, reserved for controls.
    pub input_zone_ratio: f32,
    /// Horizontal distance of each control from the view center, as a
    /// fraction of the view width.
    pub control_spacing: f32,
    /// Vertical nudge applied to both controls (px).
    pub y_adjust: f32,
    /// Normalized joystick offset below which no direction registers.
    pub deadzone: f32,
    /// Bottom padding of the controls (px).
    pub pad: f32,
    /// Button size as a fraction of the view width.
    pub button_ratio: f32,
}

impl Default for TouchSettings {
    fn default() -> Self {
        Self {
            input_zone_ratio: 0.3,
            control_spacing: 0.3,
            y_adjust: 0.0,
            deadzone: 0.3,
            pad: 24.0,
            button_ratio: 0.12,
        }
    }
}

/// Resolved positions and hit regions of the touch controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchLayout {
    pub joystick_center: (f32, f32),
    pub joystick_max_radius: f32,
    pub jump_center: (f32, f32),
    pub joystick_area: Rect,
    pub jump_area: Rect,
    pub deadzone: f32,
}

impl TouchLayout {
    /// Lays out the controls for a `view_w` x `view_h` view.
    ///
    /// Computed in f64 so the floored region edges land on whole pixels
    /// (`1080 * 0.65` is 701.99997 in f32).
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_view(view_w: f32, view_h: f32, settings: &TouchSettings) -> Self {
        let w = f64::from(view_w);
        let h = f64::from(view_h);
        let zone_top = (h * (1.0 - f64::from(settings.input_zone_ratio))).round();
        let zone_h = h - zone_top;
        let button = (w * f64::from(settings.button_ratio)).round();
        let base_y = (zone_top + zone_h - f64::from(settings.pad) - button
            + f64::from(settings.y_adjust))
        .round();

        let center_x = w / 2.0;
        let spacing = (w * f64::from(settings.control_spacing)).round();

        Self {
            joystick_center: ((center_x - spacing).round() as f32, base_y as f32),
            joystick_max_radius: (button * 0.7).round() as f32,
            jump_center: ((center_x + spacing).round() as f32, base_y as f32),
            joystick_area: Rect::new(0.0, zone_top as f32, (w * 0.6).floor() as f32, zone_h as f32),
            jump_area: Rect::new(
                (w * 0.65).floor() as f32,
                zone_top as f32,
                (w * 0.35).floor() as f32,
                zone_h as f32,
            ),
            deadzone: settings.deadzone,
        }
    }
}

impl Default for TouchLayout {
    fn default() -> Self {
        Self::from_view(1080.0, 1920.0, &TouchSettings::default())
    }
}

/// Pointer identifier as reported by the host.
pub type PointerId = u64;

/// Pointer input, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { id: PointerId, x: f32, y: f32 },
    Move { id: PointerId, x: f32, y: f32, down: bool },
    Up { id: PointerId, x: f32, y: f32 },
    /// Global cancel, e.g. the page lost focus. Clears everything.
    Cancel,
}

/// Horizontal direction from a normalized joystick offset. The deadzone
/// boundary itself registers nothing.
pub fn classify_horizontal(normalized_x: f32, deadzone: f32) -> (bool, bool) {
    if normalized_x > deadzone {
        (false, true)
    } else if normalized_x < -deadzone {
        (true, false)
    } else {
        (false, false)
    }
}

/// Clamps an offset to `max_radius`, keeping its direction.
pub fn clamp_offset(dx: f32, dy: f32, max_radius: f32) -> (f32, f32) {
    let distance = dx.hypot(dy);
    if distance > max_radius && distance > 0.0 {
        let ratio = max_radius / distance;
        (dx * ratio, dy * ratio)
    } else {
        (dx, dy)
    }
}

/// Touch input source.
#[derive(Debug, Clone)]
pub struct TouchControls {
    layout: TouchLayout,
    joystick_pointer: Option<PointerId>,
    jump_pointer: Option<PointerId>,
    knob: (f32, f32),
    left: bool,
    right: bool,
    jump_held: bool,
    jump_edge: bool,
}

impl TouchControls {
    pub fn new(layout: TouchLayout) -> Self {
        Self {
            layout,
            joystick_pointer: None,
            jump_pointer: None,
            knob: (0.0, 0.0),
            left: false,
            right: false,
            jump_held: false,
            jump_edge: false,
        }
    }

    pub fn layout(&self) -> &TouchLayout {
        &self.layout
    }

    /// Knob offset from the joystick center, for drawing.
    pub fn knob(&self) -> (f32, f32) {
        self.knob
    }

    pub fn joystick_active(&self) -> bool {
        self.joystick_pointer.is_some()
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { id, x, y } => self.on_down(id, x, y),
            PointerEvent::Move { id, x, y, down } => self.on_move(id, x, y, down),
            PointerEvent::Up { id, x, y } => self.on_up(id, x, y),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    fn on_down(&mut self, id: PointerId, x: f32, y: f32) {
        if self.layout.jump_area.contains(x, y) {
            self.jump_edge = true;
            self.jump_held = true;
            self.jump_pointer = Some(id);
            return;
        }
        if self.joystick_pointer.is_none() && self.layout.joystick_area.contains(x, y) {
            self.joystick_pointer = Some(id);
            self.left = false;
            self.right = false;
            self.knob = (0.0, 0.0);
        }
    }

    fn on_move(&mut self, id: PointerId, x: f32, y: f32, down: bool) {
        if self.joystick_pointer != Some(id) || !down {
            return;
        }
        let (cx, cy) = self.layout.joystick_center;
        let radius = self.layout.joystick_max_radius;
        self.knob = clamp_offset(x - cx, y - cy, radius);

        let normalized_x = if radius > 0.0 { self.knob.0 / radius } else { 0.0 };
        (self.left, self.right) = classify_horizontal(normalized_x, self.layout.deadzone);
    }

    fn on_up(&mut self, id: PointerId, x: f32, y: f32) {
        if self.joystick_pointer == Some(id) {
            self.joystick_pointer = None;
            self.left = false;
            self.right = false;
            self.knob = (0.0, 0.0);
        }
        if self.jump_pointer == Some(id) || self.layout.jump_area.contains(x, y) {
            self.jump_pointer = None;
            self.jump_held = false;
        }
    }

    fn cancel(&mut self) {
        *self = Self::new(self.layout);
    }
}

impl Default for TouchControls {
    fn default() -> Self {
        Self::new(TouchLayout::default())
    }
}

impl InputSource for TouchControls {
    fn read(&mut self) -> InputIntent {
        let edge = std::mem::take(&mut self.jump_edge);
        InputIntent {
            left: self.left,
            right: self.right,
            jump_held: self.jump_held,
            jump_pressed: edge,
        }
    }
}
