// src/overlay/panel.rs
//! Sliding tools panel: a per-frame interpolation of the panel's horizontal offset.

use bevy::prelude::*;

/// Panel width as a fraction of the screen width.
pub const WINDOW_WIDTH: f32 = 0.34;
/// Screen widths per second.
pub const ANIMATION_SPEED: f32 = 1.0;

/// Eased 0..1 curve: `a0 v^3 + a1 v^2 + a2 v` with `a0 = t2 - t1 - 1`, `a1 = 1 - a0`, `a2 = t1 - 1`.
/// `t1`/`t2` are the start/end slopes.
pub fn cubic_interpolate01(t1: f32, t2: f32, v: f32) -> f32 {
    let vv = v * v;
    let a0 = t2 - t1 - 1.0;
    let a1 = 1.0 - a0;
    let a2 = t1 - 1.0;
    a0 * v * vv + a1 * vv + a2 * v
}

/// One slide from `start` to `end` offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelSlide {
    /// Interpolation parameter, 0..=1.
    pub elapsed: f32,
    /// Seconds for a full slide.
    pub duration: f32,
    pub start: f32,
    pub end: f32,
}

impl PanelSlide {
    pub fn new(start: f32, end: f32) -> Self {
        Self { elapsed: 0.0, duration: WINDOW_WIDTH / ANIMATION_SPEED, start, end }
    }

    /// Advance by `dt` seconds; returns the new offset.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = if self.duration > 0.0 {
            (self.elapsed + dt / self.duration).min(1.0)
        } else {
            1.0
        };
        self.offset()
    }

    pub fn offset(&self) -> f32 {
        let t = cubic_interpolate01(1.0, 3.0, self.elapsed);
        self.start + (self.end - self.start) * t
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= 1.0
    }
}

/// Panel visibility plus the slide in flight, if any.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PanelState {
    /// Whether the panel contents are drawn.
    pub visible: bool,
    /// 0 = fully shown, `WINDOW_WIDTH` = fully hidden (fraction of screen width).
    pub offset: f32,
    pub slide: Option<PanelSlide>,
    /// Visibility once the current slide ends.
    pub target_visible: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { visible: true, offset: 0.0, slide: None, target_visible: true }
    }
}

impl PanelState {
    /// Start sliding in (`show`) or out. Showing draws the panel right away.
    pub fn toggle(&mut self) {
        let show = !self.target_visible;
        let target = if show { 0.0 } else { WINDOW_WIDTH };
        if show {
            self.visible = true;
        }
        self.target_visible = show;
        self.slide = Some(PanelSlide::new(self.offset, target));
    }

    /// One frame step. Returns true while a slide is running.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(slide) = self.slide.as_mut() else { return false };
        self.offset = slide.advance(dt);
        if slide.finished() {
            self.slide = None;
            self.visible = self.target_visible;
        }
        true
    }
}

#[derive(Event, Clone, Copy, Debug)]
pub struct TogglePanel;

pub fn toggle_panel(mut events: EventReader<TogglePanel>, mut panel: ResMut<PanelState>) {
    // Two toggles in one frame cancel out, same as two clicks would.
    for _ in events.read() {
        panel.toggle();
    }
}

pub fn animate_panel(time: Res<Time<Real>>, mut panel: ResMut<PanelState>) {
    panel.tick(time.delta_secs());
}
