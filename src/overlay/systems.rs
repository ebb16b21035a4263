// src/overlay/systems.rs

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::ui::{BackgroundColor, RelativeCursorPosition};
use bevy::window::PrimaryWindow;

use crate::bench::session::{BenchMaterials, CreatedInfo, GenerateRequest, SelectMaterial};
use crate::bench::settings::GeometrySettings;
use crate::overlay::components::*;
use crate::overlay::display::{FrameLimit, ScaleResolution, SetFrameLimit};
use crate::overlay::log_capture::{BannerKind, LastLog};
use crate::overlay::panel::{PanelState, TogglePanel, WINDOW_WIDTH};
use crate::overlay::spawn::{
    spawn_parameter_rows, BUTTON_ACTIVE, BUTTON_HOVER, BUTTON_NORMAL, ERROR_COLOR, WARNING_COLOR,
};
use crate::overlay::stats::FrameStats;
use crate::overlay::widgets::{FieldEditor, FieldTarget};

/// Pixels scrolled per wheel line.
const SCROLL_LINE: f32 = 24.0;

/// True while the cursor is over the tools panel; the camera ignores the wheel then.
#[derive(Resource, Default)]
pub struct PointerOverPanel(pub bool);

/// Update: turn button presses into events / settings toggles.
pub fn handle_button_presses(
    q_buttons: Query<(&Interaction, &BenchButton), (Changed<Interaction>, With<Button>)>,
    mut geometry: ResMut<GeometrySettings>,
    mut toggle: EventWriter<TogglePanel>,
    mut scale: EventWriter<ScaleResolution>,
    mut limit: EventWriter<SetFrameLimit>,
    mut generate: EventWriter<GenerateRequest>,
    mut select: EventWriter<SelectMaterial>,
) {
    for (interaction, action) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *action {
            BenchButton::TogglePanel => {
                toggle.write(TogglePanel);
            }
            BenchButton::ScaleResolution(s) => {
                scale.write(ScaleResolution(s));
            }
            BenchButton::FrameLimit(fps) => {
                limit.write(SetFrameLimit(fps));
            }
            BenchButton::ToggleStaticBatching => geometry.static_batching = !geometry.static_batching,
            BenchButton::ToggleCombineMeshes => geometry.combine_meshes = !geometry.combine_meshes,
            BenchButton::Generate(shape) => {
                generate.write(GenerateRequest { shape });
            }
            BenchButton::SelectMaterial(i) => {
                select.write(SelectMaterial(i));
            }
        }
    }
}

/// Update: hover/pressed colours; toggles and the active material stay highlighted.
pub fn color_buttons(
    geometry: Res<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut q_buttons: Query<(&Interaction, &BenchButton, &mut BackgroundColor), With<Button>>,
) {
    for (interaction, action, mut bg) in &mut q_buttons {
        let selected = match *action {
            BenchButton::ToggleStaticBatching => geometry.static_batching,
            BenchButton::ToggleCombineMeshes => geometry.combine_meshes,
            BenchButton::SelectMaterial(i) => bench_materials.active == Some(i),
            _ => false,
        };
        let color = match (interaction, selected) {
            (Interaction::Pressed, _) | (_, true) => BUTTON_ACTIVE,
            (Interaction::Hovered, false) => BUTTON_HOVER,
            (Interaction::None, false) => BUTTON_NORMAL,
        };
        if bg.0 != color {
            bg.0 = color;
        }
    }
}

pub fn refresh_fps_label(stats: Res<FrameStats>, mut q: Query<&mut Text, With<FpsLabel>>) {
    for mut text in &mut q {
        text.0 = stats.label();
    }
}

pub fn refresh_log_banner(
    last: Res<LastLog>,
    mut q_banner: Query<(&mut Node, &mut BackgroundColor), With<LogBanner>>,
    mut q_text: Query<&mut Text, With<LogBannerText>>,
) {
    if !last.is_changed() {
        return;
    }
    let banner = last.banner();
    for (mut node, mut bg) in &mut q_banner {
        match banner {
            Some((kind, _)) => {
                node.display = Display::Flex;
                bg.0 = match kind {
                    BannerKind::Warning => WARNING_COLOR,
                    BannerKind::Error => ERROR_COLOR,
                };
            }
            None => node.display = Display::None,
        }
    }
    if let Some((_, message)) = banner {
        for mut text in &mut q_text {
            text.0 = message.to_string();
        }
    }
}

/// Update: derive every dynamic label from its resource.
pub fn refresh_dynamic_texts(
    geometry: Res<GeometrySettings>,
    created: Res<CreatedInfo>,
    limit: Res<FrameLimit>,
    bench_materials: Res<BenchMaterials>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_texts: Query<(&mut Text, &DynamicText)>,
) {
    let resolution = q_window
        .single()
        .map(|w| format!("Resolution: {}x{}", w.resolution.physical_width(), w.resolution.physical_height()))
        .unwrap_or_else(|_| "Resolution: ?".to_string());

    for (mut text, kind) in &mut q_texts {
        let next = match *kind {
            DynamicText::Resolution => resolution.clone(),
            DynamicText::FrameLimit => limit.label(),
            DynamicText::Spacing => format!("{:.2}", geometry.spacing),
            DynamicText::CreatedInfo => created.to_string(),
            DynamicText::ActiveMaterial => match bench_materials.active_panel() {
                Some(p) => format!("Active Material: {}", p.name),
                None => "Active Material: <None>".to_string(),
            },
        };
        if text.0 != next {
            text.0 = next;
        }
    }
}

/// Update: respawn parameter rows when the active material changes.
pub fn rebuild_parameter_rows(
    mut commands: Commands,
    bench_materials: Res<BenchMaterials>,
    mut editor: ResMut<FieldEditor>,
    q_list: Query<Entity, With<ParameterList>>,
    mut shown: Local<Option<usize>>,
) {
    if q_list.is_empty() || (shown.is_some() && *shown == bench_materials.active) {
        return;
    }
    let Some(panel) = bench_materials.active_panel() else { return };
    // The focused field is about to be despawned.
    if matches!(editor.focused_target(), Some(FieldTarget::Parameter(_))) {
        editor.take();
    }
    for list in &q_list {
        commands.entity(list).despawn_related::<Children>();
        commands.entity(list).with_children(|l| spawn_parameter_rows(l, panel));
    }
    *shown = bench_materials.active;
}

pub fn refresh_parameter_values(
    bench_materials: Res<BenchMaterials>,
    mut q_values: Query<(&mut Text, &ParameterValue)>,
) {
    if !bench_materials.is_changed() {
        return;
    }
    let Some(panel) = bench_materials.active_panel() else { return };
    for (mut text, ParameterValue(index)) in &mut q_values {
        if let Some(control) = panel.controls.get(*index) {
            text.0 = format!("{:.2}", control.value());
        }
    }
}

/// Update: place the panel and side button from the slide offset.
pub fn layout_panel(
    panel: Res<PanelState>,
    mut q_panel: Query<&mut Node, With<ToolsPanel>>,
    mut q_toggle: Query<(&mut Node, &BenchButton), Without<ToolsPanel>>,
    mut q_toggle_text: Query<&mut Text, With<PanelToggleText>>,
) {
    if !panel.is_changed() {
        return;
    }
    for mut node in &mut q_panel {
        node.right = Val::Percent(-panel.offset * 100.0);
        node.display = if panel.visible { Display::Flex } else { Display::None };
    }
    for (mut node, action) in &mut q_toggle {
        if *action == BenchButton::TogglePanel {
            node.right = Val::Percent((WINDOW_WIDTH - panel.offset) * 100.0);
        }
    }
    for mut text in &mut q_toggle_text {
        text.0 = if panel.visible { ">" } else { "<" }.to_string();
    }
}

/// Update: wheel scrolls the panel while hovered.
pub fn scroll_panel(
    mut wheel: EventReader<MouseWheel>,
    mut over: ResMut<PointerOverPanel>,
    mut q_panel: Query<(&RelativeCursorPosition, &mut ScrollPosition, &Node), With<ToolsPanel>>,
) {
    let Ok((cursor, mut scroll, node)) = q_panel.single_mut() else {
        wheel.clear();
        return;
    };
    over.0 = node.display != Display::None && cursor.mouse_over();
    if !over.0 {
        wheel.clear();
        return;
    }
    for ev in wheel.read() {
        let dy = match ev.unit {
            MouseScrollUnit::Line => ev.y * SCROLL_LINE,
            MouseScrollUnit::Pixel => ev.y,
        };
        scroll.offset_y = (scroll.offset_y - dy).max(0.0);
    }
}
