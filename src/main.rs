use bevy::prelude::*;

mod setup;
mod input;
mod bench;
mod overlay;

// re-export the bits we actually need in main
use input::{camera_controller, panel_hotkey_system};
use bench::BenchPlugin;
use overlay::OverlayPlugin;
use overlay::log_capture::capture_layer;
use bevy::log::LogPlugin;
use bevy::window::PresentMode;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "gridbench".into(),
                        // vsync would cap the numbers we are trying to measure
                        present_mode: PresentMode::AutoNoVsync,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    // feeds the overlay's warning/error banner
                    custom_layer: capture_layer,
                    ..default()
                }),
        )
        // bench core: config, shapes, materials, generation
        .add_plugins(BenchPlugin)
        // fps box, log banner, tools panel, resolution / frame limit
        .add_plugins(OverlayPlugin)
        // camera, light
        .add_systems(Startup, setup::setup)
        // input + camera each frame
        .add_systems(
            Update,
            (panel_hotkey_system, camera_controller),
        )
        .run();
}
