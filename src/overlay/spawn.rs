// src/overlay/spawn.rs
//! Builds the overlay node tree: FPS box, log banner, side toggle and the tools panel.

use bevy::prelude::*;
use bevy::ui::{BackgroundColor, RelativeCursorPosition};

use crate::bench::material::{MaterialPanel, ParameterControl};
use crate::bench::session::{BenchMaterials, BenchShapes};
use crate::overlay::components::*;
use crate::overlay::display::{FRAME_LIMITS, RESOLUTION_SCALES};
use crate::overlay::panel::WINDOW_WIDTH;
use crate::overlay::widgets::{
    FieldTarget, Slider, SliderFill, SliderTarget, TextField, FIELD_NORMAL, SLIDER_FILL, SLIDER_TRACK,
};

pub const FONT_SIZE: f32 = 12.0;
pub const BUTTON_NORMAL: Color = Color::srgba(0.22, 0.22, 0.25, 0.9);
pub const BUTTON_HOVER: Color = Color::srgba(0.32, 0.32, 0.38, 0.95);
pub const BUTTON_ACTIVE: Color = Color::srgba(0.25, 0.45, 0.75, 0.95);
pub const BOX_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.85);
pub const FPS_BOX: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
pub const WARNING_COLOR: Color = Color::srgba(0.8, 0.6, 0.2, 0.8);
pub const ERROR_COLOR: Color = Color::srgba(0.8, 0.2, 0.2, 0.8);
/// Height of the log banner as a fraction of the screen.
const LOG_HEIGHT: f32 = 0.06;

fn text(s: impl Into<String>) -> impl Bundle {
    (Text::new(s), TextFont { font_size: FONT_SIZE, ..default() }, TextColor(Color::WHITE))
}

fn row() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        column_gap: Val::Px(4.0),
        ..default()
    }
}

fn section() -> impl Bundle {
    (
        Node {
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(Val::Px(6.0)),
            row_gap: Val::Px(4.0),
            ..default()
        },
        BackgroundColor(BOX_COLOR),
    )
}

fn button(parent: &mut ChildSpawnerCommands, label: impl Into<String>, action: BenchButton) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(BUTTON_NORMAL),
            action,
        ))
        .with_children(|b| {
            b.spawn(text(label));
        });
}

/// Click to focus, type, Enter to commit.
fn text_field(parent: &mut ChildSpawnerCommands, target: FieldTarget) {
    parent.spawn((
        Button,
        Node {
            min_width: Val::Px(48.0),
            padding: UiRect::axes(Val::Px(4.0), Val::Px(2.0)),
            ..default()
        },
        BackgroundColor(FIELD_NORMAL),
        text(""),
        TextField(target),
    ));
}

/// Track with a fill child whose width shows the value.
fn slider(parent: &mut ChildSpawnerCommands, target: SliderTarget) {
    parent
        .spawn((
            Button,
            Node { width: Val::Px(110.0), height: Val::Px(12.0), ..default() },
            BackgroundColor(SLIDER_TRACK),
            RelativeCursorPosition::default(),
            Slider(target),
        ))
        .with_children(|t| {
            t.spawn((
                Node { width: Val::Percent(0.0), height: Val::Percent(100.0), ..default() },
                BackgroundColor(SLIDER_FILL),
                SliderFill(target),
            ));
        });
}

/// Startup: spawn the whole overlay.
pub fn spawn_overlay(mut commands: Commands, shapes: Res<BenchShapes>, bench_materials: Res<BenchMaterials>) {
    // FPS box, top-left.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(60.0),
                top: Val::Px(0.0),
                padding: UiRect::all(Val::Px(5.0)),
                ..default()
            },
            BackgroundColor(FPS_BOX),
        ))
        .with_children(|p| {
            p.spawn((text(""), FpsLabel));
        });

    // Log banner along the bottom edge, hidden until a warning or error arrives.
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                bottom: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Percent(LOG_HEIGHT * 100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                display: Display::None,
                ..default()
            },
            BackgroundColor(ERROR_COLOR),
            LogBanner,
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(""),
                TextFont { font_size: FONT_SIZE + 2.0, ..default() },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(JustifyText::Center),
                LogBannerText,
            ));
        });

    // Side toggle; its `right` follows the panel edge.
    commands
        .spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Percent(WINDOW_WIDTH * 100.0),
                top: Val::Percent(20.0),
                width: Val::Percent(2.5),
                height: Val::Percent(60.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_NORMAL),
            BenchButton::TogglePanel,
        ))
        .with_children(|b| {
            b.spawn((text(">"), PanelToggleText));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(WINDOW_WIDTH * 100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(6.0)),
                row_gap: Val::Px(6.0),
                overflow: Overflow::scroll_y(),
                ..default()
            },
            BackgroundColor(BOX_COLOR),
            ScrollPosition::default(),
            RelativeCursorPosition::default(),
            ToolsPanel,
        ))
        .with_children(|panel| {
            panel.spawn(text("Benchmark Tool"));
            general_section(panel);
            geometry_section(panel, &shapes);
            materials_section(panel, &bench_materials);
        });
}

fn general_section(panel: &mut ChildSpawnerCommands) {
    panel.spawn(section()).with_children(|s| {
        s.spawn(text("General"));
        s.spawn((text(""), DynamicText::Resolution));
        s.spawn(row()).with_children(|r| {
            r.spawn(text("Set Scale"));
            for scale in RESOLUTION_SCALES {
                button(r, format!("x{scale:.1}"), BenchButton::ScaleResolution(scale));
            }
        });
        s.spawn(row()).with_children(|r| {
            r.spawn((text(""), DynamicText::FrameLimit));
            for limit in FRAME_LIMITS {
                let label = match limit {
                    Some(fps) => fps.to_string(),
                    None => "Default".to_string(),
                };
                button(r, label, BenchButton::FrameLimit(limit));
            }
        });
    });
}

fn geometry_section(panel: &mut ChildSpawnerCommands, shapes: &BenchShapes) {
    panel.spawn(section()).with_children(|s| {
        s.spawn(text("Generate Geometry"));
        button(s, "Static Batching", BenchButton::ToggleStaticBatching);
        button(s, "Combine Meshes", BenchButton::ToggleCombineMeshes);
        s.spawn(row()).with_children(|r| {
            r.spawn(text("Count"));
            for axis in 0..3 {
                text_field(r, FieldTarget::Count(axis));
            }
        });
        s.spawn(row()).with_children(|r| {
            r.spawn(text("Spacing"));
            slider(r, SliderTarget::Spacing);
            r.spawn((text(""), DynamicText::Spacing));
        });
        s.spawn(row()).with_children(|r| {
            r.spawn(text("Scale"));
            text_field(r, FieldTarget::Scale);
        });

        s.spawn(text("Create:"));
        for (i, entry) in shapes.entries.iter().enumerate() {
            button(s, entry.name.clone(), BenchButton::Generate(i));
        }

        s.spawn(text("Created Info:"));
        s.spawn((text(""), DynamicText::CreatedInfo));
    });
}

fn materials_section(panel: &mut ChildSpawnerCommands, bench_materials: &BenchMaterials) {
    if bench_materials.panels.is_empty() {
        return;
    }
    panel.spawn(section()).with_children(|s| {
        s.spawn(text("Materials"));
        for (i, m) in bench_materials.panels.iter().enumerate() {
            button(s, m.name.clone(), BenchButton::SelectMaterial(i));
        }
        s.spawn((text(""), DynamicText::ActiveMaterial));
        s.spawn((
            Node { flex_direction: FlexDirection::Column, row_gap: Val::Px(2.0), ..default() },
            ParameterList,
        ));
    });
}

/// One row per parameter of `panel`: a slider for bounded values, a text field otherwise.
pub fn spawn_parameter_rows(list: &mut ChildSpawnerCommands, panel: &MaterialPanel) {
    for (index, control) in panel.controls.iter().enumerate() {
        list.spawn(row()).with_children(|r| match control {
            ParameterControl::BoundedFloat { name, .. } => {
                r.spawn(text(name.clone()));
                slider(r, SliderTarget::Parameter(index));
                r.spawn((text(format!("{:.2}", control.value())), ParameterValue(index)));
            }
            ParameterControl::Float { name, .. } => {
                r.spawn(text(name.clone()));
                text_field(r, FieldTarget::Parameter(index));
            }
        });
    }
}
