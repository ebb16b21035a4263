use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::input::{keyboard::KeyCode, ButtonInput};
use bevy::prelude::*;

use crate::overlay::panel::TogglePanel;
use crate::overlay::systems::PointerOverPanel;
use crate::overlay::widgets::FieldEditor;
use crate::setup::MainCamera;

pub const PAN_SPEED: f32 = 30.0;
pub const ORBIT_SPEED: f32 = 0.2;
pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms
pub const ZOOM_RANGE: (f32, f32) = (2.0, 2000.0);
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit rig around a ground-level focus point.
#[derive(Component, Clone, Debug)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraOrbit {
    /// Unit ground-plane vectors (forward, right) for the current yaw.
    pub fn ground_axes(&self) -> (Vec2, Vec2) {
        let forward = Vec2::new(-self.yaw.cos(), -self.yaw.sin());
        (forward, Vec2::new(-forward.y, forward.x))
    }

    pub fn pan(&mut self, dir: Vec2, distance: f32) {
        if dir == Vec2::ZERO {
            return;
        }
        let delta = dir.normalize() * distance;
        self.focus.x += delta.x;
        self.focus.z += delta.y;
    }

    pub fn zoom(&mut self, amount: f32) {
        let (min, max) = ZOOM_RANGE;
        self.radius = (self.radius - amount).clamp(min, max);
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw += delta.x;
        self.pitch = (self.pitch + delta.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Camera position on the sphere around `focus`.
    pub fn eye(&self) -> Vec3 {
        let ground = self.radius * self.pitch.cos();
        self.focus
            + Vec3::new(
                ground * self.yaw.cos(),
                self.radius * self.pitch.sin(),
                ground * self.yaw.sin(),
            )
    }
}

/// Ground-plane pan direction from WASD, in (forward, right) units.
pub fn pan_intent(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let axis = |pos: KeyCode, neg: KeyCode| keys.pressed(pos) as i32 as f32 - keys.pressed(neg) as i32 as f32;
    Vec2::new(axis(KeyCode::KeyW, KeyCode::KeyS), axis(KeyCode::KeyD, KeyCode::KeyA))
}

pub fn panel_hotkey_system(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<FieldEditor>,
    mut toggle: EventWriter<TogglePanel>,
) {
    if !editor.is_editing() && keys.just_pressed(KeyCode::Tab) {
        toggle.write(TogglePanel);
    }
}

pub fn camera_controller(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<FieldEditor>,
    over_panel: Res<PointerOverPanel>,
    mut query: Query<(&mut Transform, &mut CameraOrbit), With<MainCamera>>,
) {
    let dt = time.delta_secs().min(MAX_CAMERA_DT);

    let Ok((mut tf, mut orbit)) = query.single_mut() else { return; };

    // 1) WASD pan on the ground plane; typed letters belong to the focused field
    if !editor.is_editing() {
        let intent = pan_intent(&keys);
        let (forward, right) = orbit.ground_axes();
        orbit.pan(forward * intent.x + right * intent.y, PAN_SPEED * dt);
    }

    // 2) Zoom; the panel owns the wheel while hovered
    for ev in scroll_evr.read() {
        if over_panel.0 {
            continue;
        }
        orbit.zoom(match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.02,
        });
    }

    // 3) Middle-mouse orbit
    if mouse_buttons.pressed(MouseButton::Middle) {
        let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
        orbit.rotate(drag * ORBIT_SPEED * dt);
    } else {
        motion_evr.clear();
    }

    tf.translation = orbit.eye();
    tf.look_at(orbit.focus, Vec3::Y);
}
