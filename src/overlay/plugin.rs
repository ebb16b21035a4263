//! Overlay plugin wiring (glue).
//! - Frame stats + FPS box
//! - Log banner (the capture layer itself is installed through `LogPlugin::custom_layer`)
//! - Sliding tools panel + button dispatch
//! - Text fields and sliders
//! - Resolution scale / frame limit / GUI scale

use bevy::prelude::*;

use super::display::{
    apply_frame_limit, apply_resolution_scale, capture_initial_resolution, pace_frame, sync_ui_scale,
    FrameLimit, InitialResolution, ScaleResolution, SetFrameLimit,
};
use super::log_capture::LastLog;
use super::panel::{animate_panel, toggle_panel, PanelState, TogglePanel};
use super::spawn::spawn_overlay;
use super::stats::{update_frame_stats, FrameStats};
use super::systems::{
    color_buttons, handle_button_presses, layout_panel, rebuild_parameter_rows, refresh_dynamic_texts,
    refresh_fps_label, refresh_log_banner, refresh_parameter_values, scroll_panel, PointerOverPanel,
};
use super::widgets::{drag_sliders, edit_text_fields, refresh_slider_fills, refresh_text_fields, FieldEditor};
use crate::bench::session::{handle_generate_requests, handle_parameter_edits, init_session};

pub struct OverlayPlugin;
impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameStats>()
            .init_resource::<FrameLimit>()
            .init_resource::<InitialResolution>()
            .init_resource::<PanelState>()
            .init_resource::<PointerOverPanel>()
            .init_resource::<FieldEditor>()
            // Normally added by the capture layer; kept here so the overlay works without it.
            .init_resource::<LastLog>()
            .add_event::<TogglePanel>()
            .add_event::<ScaleResolution>()
            .add_event::<SetFrameLimit>()
            .add_systems(Startup, spawn_overlay.after(init_session))
            // 1. input -> events
            .add_systems(
                Update,
                (
                    update_frame_stats,
                    capture_initial_resolution,
                    // a field pending commit must land before Generate reads the settings
                    edit_text_fields
                        .before(handle_button_presses)
                        .before(handle_generate_requests)
                        .before(handle_parameter_edits),
                    drag_sliders.before(handle_parameter_edits),
                    handle_button_presses,
                    scroll_panel,
                ),
            )
            // 2. events -> state
            .add_systems(
                Update,
                (
                    toggle_panel.after(handle_button_presses),
                    animate_panel.after(toggle_panel),
                    apply_resolution_scale.after(handle_button_presses).after(capture_initial_resolution),
                    sync_ui_scale.after(apply_resolution_scale),
                    apply_frame_limit.after(handle_button_presses),
                ),
            )
            // 3. state -> UI
            .add_systems(
                Update,
                (
                    refresh_fps_label.after(update_frame_stats),
                    refresh_log_banner,
                    refresh_dynamic_texts.after(apply_frame_limit),
                    rebuild_parameter_rows,
                    refresh_parameter_values.after(handle_parameter_edits),
                    refresh_text_fields.after(edit_text_fields),
                    refresh_slider_fills.after(drag_sliders).after(handle_parameter_edits),
                    color_buttons.after(handle_button_presses),
                    layout_panel.after(animate_panel),
                ),
            )
            .add_systems(Last, pace_frame);
    }
}
