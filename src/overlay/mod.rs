//! Developer overlay: FPS box, log banner and the sliding tools panel.

pub mod components;
pub mod display;
pub mod log_capture;
pub mod panel;
pub mod plugin;
pub mod spawn;
pub mod stats;
pub mod systems;
pub mod widgets;

pub use plugin::OverlayPlugin;
