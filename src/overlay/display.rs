// src/overlay/display.rs
//! Resolution scaling, GUI scaling and frame-rate limiting.

use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy::ui::UiScale;
use bevy::window::{PrimaryWindow, WindowMode, WindowResized};

pub const RESOLUTION_SCALES: [f32; 3] = [1.0, 0.7, 0.5];
pub const FRAME_LIMITS: [Option<u32>; 4] = [None, Some(60), Some(30), Some(20)];
/// The overlay is laid out for this window width; wider windows scale it up.
pub const REFERENCE_WIDTH: f32 = 800.0;

/// Physical surface size reported by the first resize after the window exists.
/// Scaling is always relative to it.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialResolution(pub Option<UVec2>);

/// Target frame rate; `None` leaves pacing to the present mode.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameLimit(pub Option<u32>);

impl FrameLimit {
    pub fn frame_duration(&self) -> Option<Duration> {
        match self.0 {
            Some(fps) if fps > 0 => Some(Duration::from_nanos(1_000_000_000 / fps as u64)),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self.0 {
            Some(fps) => format!("FPS Limit: {fps}"),
            None => "FPS Limit: -1".to_string(),
        }
    }
}

#[derive(Event, Clone, Copy, Debug)]
pub struct ScaleResolution(pub f32);

#[derive(Event, Clone, Copy, Debug)]
pub struct SetFrameLimit(pub Option<u32>);

/// `initial * scale`, never smaller than one pixel per axis.
pub fn scaled_resolution(initial: UVec2, scale: f32) -> UVec2 {
    let w = (initial.x as f32 * scale).round() as u32;
    let h = (initial.y as f32 * scale).round() as u32;
    UVec2::new(w.max(1), h.max(1))
}

/// GUI scale for a logical window width.
pub fn ui_scale_for_width(width: f32) -> f32 {
    if width > 0.0 {
        width / REFERENCE_WIDTH
    } else {
        1.0
    }
}

/// Update: remember the primary window's physical size once winit has reported it.
pub fn capture_initial_resolution(
    mut resized: EventReader<WindowResized>,
    mut initial: ResMut<InitialResolution>,
    q_window: Query<(Entity, &Window), With<PrimaryWindow>>,
) {
    if initial.0.is_some() {
        resized.clear();
        return;
    }
    let Ok((primary, window)) = q_window.single() else { return };
    if !resized.read().any(|ev| ev.window == primary) {
        return;
    }
    let size = UVec2::new(window.resolution.physical_width(), window.resolution.physical_height());
    info!("Display: initial resolution {}x{}", size.x, size.y);
    initial.0 = Some(size);
}

/// Update: resize the primary window to `initial * scale`.
pub fn apply_resolution_scale(
    mut events: EventReader<ScaleResolution>,
    initial: Res<InitialResolution>,
    mut q_window: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(ScaleResolution(scale)) = events.read().last().copied() else { return };
    let Some(base) = initial.0 else {
        warn!("Display: window size not known yet, ignoring x{scale:.1}");
        return;
    };
    let Ok(mut window) = q_window.single_mut() else { return };
    let size = scaled_resolution(base, scale);
    // Fullscreen modes pin the surface to the monitor size.
    window.mode = WindowMode::Windowed;
    window.resolution.set_physical_resolution(size.x, size.y);
    info!("Display: resolution set to {}x{} (x{scale:.1})", size.x, size.y);
}

/// Update: keep `UiScale` proportional to the window width.
pub fn sync_ui_scale(
    q_window: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut ui_scale: ResMut<UiScale>,
) {
    let Ok(window) = q_window.single() else { return };
    let scale = ui_scale_for_width(window.width());
    if (ui_scale.0 - scale).abs() > f32::EPSILON {
        ui_scale.0 = scale;
    }
}

pub fn apply_frame_limit(mut events: EventReader<SetFrameLimit>, mut limit: ResMut<FrameLimit>) {
    for SetFrameLimit(fps) in events.read() {
        limit.0 = *fps;
        info!("Display: {}", limit.label());
    }
}

/// Last: sleep out the remainder of the target frame time.
pub fn pace_frame(limit: Res<FrameLimit>, mut last: Local<Option<Instant>>) {
    if let (Some(target), Some(prev)) = (limit.frame_duration(), *last) {
        let elapsed = prev.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
    *last = Some(Instant::now());
}
