// src/overlay/stats.rs
use bevy::prelude::*;

/// Smoothing factor for the running frame-time average.
pub const AVG_SMOOTHING: f32 = 0.03;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Instantaneous rate from the last frame.
    pub fps: u32,
    pub avg_fps: u32,
    /// Exponential moving average of the frame time (seconds).
    pub avg_frame_time: f32,
}

impl FrameStats {
    /// Fold in one unscaled frame delta; non-positive deltas are ignored.
    pub fn record(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.fps = (1.0 / dt) as u32;
        self.avg_frame_time += (dt - self.avg_frame_time) * AVG_SMOOTHING;
        if self.avg_frame_time > 0.0 {
            self.avg_fps = (1.0 / self.avg_frame_time) as u32;
        }
    }

    pub fn label(&self) -> String {
        format!(" fps: {} avg fps: {}", self.fps, self.avg_fps)
    }
}

/// Update: sample real (unscaled) time so pausing virtual time does not skew the counter.
pub fn update_frame_stats(time: Res<Time<Real>>, mut stats: ResMut<FrameStats>) {
    stats.record(time.delta_secs());
}
