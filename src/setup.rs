use bevy::prelude::*;
use crate::input::CameraOrbit;

#[derive(Component)]
pub struct MainCamera;

pub fn setup(
    mut commands: Commands,
) {
    // 1) Light; directional so large grids are lit evenly
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // 2) Camera, looking at the middle of the default 10 x 1 x 10 grid
    let focus = Vec3::new(0.0, 0.0, 9.0);
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 20.0, -25.0).looking_at(focus, Vec3::Y),
        MainCamera,
        CameraOrbit {
            focus,
            radius: 40.0,
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.6,
        },
    ));
}
