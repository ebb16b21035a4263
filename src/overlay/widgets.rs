// src/overlay/widgets.rs
//! Editable text fields and horizontal sliders for the tools panel.
//!
//! Fields keep a private edit buffer while focused; the value is parsed and
//! written back when Enter is pressed, another field is clicked, or any
//! panel button is pressed. Escape drops the edit.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::ui::{BackgroundColor, RelativeCursorPosition};

use crate::bench::session::{BenchMaterials, SetParameter};
use crate::bench::settings::{parse_count_or_one, parse_float_or_one, GeometrySettings};

pub const FIELD_NORMAL: Color = Color::srgba(0.12, 0.12, 0.14, 0.95);
pub const FIELD_FOCUSED: Color = Color::srgba(0.18, 0.2, 0.28, 1.0);
pub const SLIDER_TRACK: Color = Color::srgba(0.16, 0.16, 0.18, 0.95);
pub const SLIDER_FILL: Color = Color::srgba(0.25, 0.45, 0.75, 0.95);

/// Value a text field edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldTarget {
    Count(usize),
    Scale,
    Parameter(usize),
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextField(pub FieldTarget);

/// Value a slider edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderTarget {
    Spacing,
    Parameter(usize),
}

/// Slider track; clicking or dragging sets the value from the cursor.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slider(pub SliderTarget);

/// Filled part of a slider track.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliderFill(pub SliderTarget);

/// Outcome of one key press on the focused field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKey {
    Edited,
    Commit,
    Cancel,
    Ignored,
}

/// The focused field and its uncommitted text.
#[derive(Resource, Default, Debug)]
pub struct FieldEditor {
    focused: Option<(Entity, FieldTarget)>,
    buffer: String,
}

impl FieldEditor {
    pub fn is_editing(&self) -> bool {
        self.focused.is_some()
    }

    pub fn focused_entity(&self) -> Option<Entity> {
        self.focused.map(|(e, _)| e)
    }

    pub fn focused_target(&self) -> Option<FieldTarget> {
        self.focused.map(|(_, t)| t)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Starts editing `entity` with `text` as the initial buffer.
    pub fn focus(&mut self, entity: Entity, target: FieldTarget, text: String) {
        self.focused = Some((entity, target));
        self.buffer = text;
    }

    /// Ends the edit, handing back the target and its text.
    pub fn take(&mut self) -> Option<(FieldTarget, String)> {
        let (_, target) = self.focused.take()?;
        Some((target, std::mem::take(&mut self.buffer)))
    }

    pub fn key(&mut self, key: &Key) -> FieldKey {
        if self.focused.is_none() {
            return FieldKey::Ignored;
        }
        match key {
            Key::Enter => FieldKey::Commit,
            Key::Escape => FieldKey::Cancel,
            Key::Backspace => {
                self.buffer.pop();
                FieldKey::Edited
            }
            Key::Character(chars) => {
                self.buffer.extend(chars.chars().filter(|c| !c.is_control()));
                FieldKey::Edited
            }
            _ => FieldKey::Ignored,
        }
    }
}

/// Current value of `target` as the field shows it when not focused.
pub fn field_text(target: FieldTarget, geometry: &GeometrySettings, bench_materials: &BenchMaterials) -> String {
    match target {
        FieldTarget::Count(axis) => geometry.count.to_array().get(axis).map(u32::to_string).unwrap_or_default(),
        FieldTarget::Scale => format!("{:.2}", geometry.scale),
        FieldTarget::Parameter(index) => bench_materials
            .active_panel()
            .and_then(|p| p.controls.get(index))
            .map(|c| format!("{:.2}", c.value()))
            .unwrap_or_default(),
    }
}

/// Writes `text` to `target`. Geometry is edited in place; a material edit
/// comes back as an event. Unparseable text counts as 1.
pub fn commit_field(target: FieldTarget, text: &str, geometry: &mut GeometrySettings) -> Option<SetParameter> {
    match target {
        FieldTarget::Count(axis) => {
            geometry.set_count(axis, parse_count_or_one(text));
            None
        }
        FieldTarget::Scale => {
            geometry.scale = parse_float_or_one(text);
            None
        }
        FieldTarget::Parameter(index) => Some(SetParameter { index, value: parse_float_or_one(text) }),
    }
}

/// Maps a centered cursor x (`-0.5..0.5` across the node) to `0..1`.
pub fn cursor_fraction(x: f32) -> f32 {
    (x + 0.5).clamp(0.0, 1.0)
}

pub fn slider_value((min, max): (f32, f32), fraction: f32) -> f32 {
    min + (max - min) * fraction.clamp(0.0, 1.0)
}

pub fn slider_fraction((min, max): (f32, f32), value: f32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Range and current value behind a slider, if it still has one.
pub fn slider_state(
    target: SliderTarget,
    geometry: &GeometrySettings,
    bench_materials: &BenchMaterials,
) -> Option<((f32, f32), f32)> {
    match target {
        SliderTarget::Spacing => Some((GeometrySettings::SPACING_RANGE, geometry.spacing)),
        SliderTarget::Parameter(index) => {
            let control = bench_materials.active_panel()?.controls.get(index)?;
            Some((control.range()?, control.value()))
        }
    }
}

fn commit_focused(editor: &mut FieldEditor, geometry: &mut GeometrySettings, edits: &mut EventWriter<SetParameter>) {
    if let Some((target, text)) = editor.take() {
        if let Some(ev) = commit_field(target, &text, geometry) {
            edits.write(ev);
        }
    }
}

/// Update: focus on click, type into the buffer, commit on Enter or when focus moves.
#[allow(clippy::too_many_arguments)]
pub fn edit_text_fields(
    mut editor: ResMut<FieldEditor>,
    mut keys: EventReader<KeyboardInput>,
    mut geometry: ResMut<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut edits: EventWriter<SetParameter>,
    q_fields: Query<(Entity, &Interaction, &TextField), Changed<Interaction>>,
    q_buttons: Query<&Interaction, (Changed<Interaction>, With<Button>, Without<TextField>)>,
) {
    for (entity, interaction, TextField(target)) in &q_fields {
        if *interaction != Interaction::Pressed || editor.focused_entity() == Some(entity) {
            continue;
        }
        commit_focused(&mut editor, &mut geometry, &mut edits);
        let text = field_text(*target, &geometry, &bench_materials);
        editor.focus(entity, *target, text);
    }

    if editor.is_editing() && q_buttons.iter().any(|i| *i == Interaction::Pressed) {
        commit_focused(&mut editor, &mut geometry, &mut edits);
    }

    for ev in keys.read() {
        if ev.state != ButtonState::Pressed {
            continue;
        }
        match editor.key(&ev.logical_key) {
            FieldKey::Commit => commit_focused(&mut editor, &mut geometry, &mut edits),
            FieldKey::Cancel => {
                editor.take();
            }
            FieldKey::Edited | FieldKey::Ignored => {}
        }
    }
}

/// Update: while a slider is held, set its value from the cursor.
pub fn drag_sliders(
    q_sliders: Query<(&Interaction, &RelativeCursorPosition, &Slider)>,
    mut geometry: ResMut<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut edits: EventWriter<SetParameter>,
) {
    for (interaction, cursor, Slider(target)) in &q_sliders {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let Some(pos) = cursor.normalized else { continue };
        let Some((range, current)) = slider_state(*target, &geometry, &bench_materials) else { continue };
        let value = slider_value(range, cursor_fraction(pos.x));
        if (value - current).abs() <= f32::EPSILON {
            continue;
        }
        match *target {
            SliderTarget::Spacing => geometry.set_spacing(value),
            SliderTarget::Parameter(index) => {
                edits.write(SetParameter { index, value });
            }
        }
    }
}

/// Update: show the buffer with a caret while focused, the live value otherwise.
pub fn refresh_text_fields(
    editor: Res<FieldEditor>,
    geometry: Res<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut q_fields: Query<(Entity, &TextField, &mut Text, &mut BackgroundColor)>,
) {
    for (entity, TextField(target), mut text, mut bg) in &mut q_fields {
        let focused = editor.focused_entity() == Some(entity);
        let next = if focused {
            format!("{}|", editor.buffer())
        } else {
            field_text(*target, &geometry, &bench_materials)
        };
        if text.0 != next {
            text.0 = next;
        }
        let color = if focused { FIELD_FOCUSED } else { FIELD_NORMAL };
        if bg.0 != color {
            bg.0 = color;
        }
    }
}

pub fn refresh_slider_fills(
    geometry: Res<GeometrySettings>,
    bench_materials: Res<BenchMaterials>,
    mut q_fills: Query<(&SliderFill, &mut Node)>,
) {
    for (SliderFill(target), mut node) in &mut q_fills {
        let Some((range, value)) = slider_state(*target, &geometry, &bench_materials) else { continue };
        let width = Val::Percent(slider_fraction(range, value) * 100.0);
        if node.width != width {
            node.width = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::material::MaterialPanel;

    fn editing() -> FieldEditor {
        let mut editor = FieldEditor::default();
        editor.focus(Entity::PLACEHOLDER, FieldTarget::Count(0), "10".into());
        editor
    }

    fn materials() -> BenchMaterials {
        let mat = StandardMaterial::default();
        BenchMaterials { panels: vec![MaterialPanel::new("Default", Handle::default(), &mat)], active: Some(0) }
    }

    #[test]
    fn typing_edits_the_buffer() {
        let mut editor = editing();
        assert_eq!(editor.key(&Key::Backspace), FieldKey::Edited);
        assert_eq!(editor.key(&Key::Character("5".into())), FieldKey::Edited);
        assert_eq!(editor.key(&Key::Character("\u{7f}".into())), FieldKey::Edited);
        assert_eq!(editor.buffer(), "15");
        assert_eq!(editor.key(&Key::Enter), FieldKey::Commit);
        assert_eq!(editor.take(), Some((FieldTarget::Count(0), "15".to_string())));
        assert!(!editor.is_editing());
    }

    #[test]
    fn keys_without_focus_are_ignored() {
        let mut editor = FieldEditor::default();
        assert_eq!(editor.key(&Key::Character("7".into())), FieldKey::Ignored);
        assert_eq!(editor.key(&Key::Enter), FieldKey::Ignored);
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.take(), None);
    }

    #[test]
    fn count_field_falls_back_to_one() {
        let mut geometry = GeometrySettings::default();
        assert_eq!(commit_field(FieldTarget::Count(1), "abc", &mut geometry), None);
        assert_eq!(geometry.count.y, 1);
        commit_field(FieldTarget::Count(2), " 25 ", &mut geometry);
        assert_eq!(geometry.count.z, 25);
    }

    #[test]
    fn scale_field_parses_floats() {
        let mut geometry = GeometrySettings::default();
        commit_field(FieldTarget::Scale, "2.5", &mut geometry);
        assert_eq!(geometry.scale, 2.5);
        commit_field(FieldTarget::Scale, "", &mut geometry);
        assert_eq!(geometry.scale, 1.0);
    }

    #[test]
    fn parameter_field_becomes_an_event() {
        let mut geometry = GeometrySettings::default();
        let before = geometry.clone();
        let ev = commit_field(FieldTarget::Parameter(3), "0.4", &mut geometry);
        assert_eq!(ev, Some(SetParameter { index: 3, value: 0.4 }));
        assert_eq!(geometry, before);
    }

    #[test]
    fn field_text_reads_live_values() {
        let geometry = GeometrySettings { count: UVec3::new(4, 5, 6), scale: 1.5, ..default() };
        let mats = materials();
        assert_eq!(field_text(FieldTarget::Count(1), &geometry, &mats), "5");
        assert_eq!(field_text(FieldTarget::Count(3), &geometry, &mats), "");
        assert_eq!(field_text(FieldTarget::Scale, &geometry, &mats), "1.50");
        let index = mats.panels[0].controls.iter().position(|c| c.name() == "metallic").unwrap();
        assert_eq!(field_text(FieldTarget::Parameter(index), &geometry, &mats), "0.00");
    }

    #[test]
    fn slider_maps_cursor_onto_range() {
        let range = GeometrySettings::SPACING_RANGE;
        assert_eq!(cursor_fraction(-0.5), 0.0);
        assert_eq!(cursor_fraction(0.0), 0.5);
        assert_eq!(cursor_fraction(0.9), 1.0);
        assert_eq!(slider_value(range, 0.0), 1.0);
        assert_eq!(slider_value(range, 1.0), 10.0);
        assert_eq!(slider_value(range, 0.5), 5.5);
        assert_eq!(slider_fraction(range, 5.5), 0.5);
        assert_eq!(slider_fraction(range, 20.0), 1.0);
        assert_eq!(slider_fraction((1.0, 1.0), 1.0), 0.0);
    }

    #[test]
    fn only_bounded_parameters_have_sliders() {
        let geometry = GeometrySettings::default();
        let mats = materials();
        let controls = &mats.panels[0].controls;
        let bounded = controls.iter().position(|c| c.range().is_some()).unwrap();
        let plain = controls.iter().position(|c| c.range().is_none()).unwrap();
        assert!(slider_state(SliderTarget::Parameter(bounded), &geometry, &mats).is_some());
        assert!(slider_state(SliderTarget::Parameter(plain), &geometry, &mats).is_none());
        assert!(slider_state(SliderTarget::Parameter(999), &geometry, &mats).is_none());
        assert_eq!(
            slider_state(SliderTarget::Spacing, &geometry, &mats),
            Some((GeometrySettings::SPACING_RANGE, geometry.spacing))
        );
    }
}
