use bevy::prelude::*;
use obby_shared::Rgb;

use crate::level::srgb;

/// Ambient fill, as a fraction of full brightness.
const AMBIENT_INTENSITY: f32 = 0.6;
/// Sun illuminance, as a fraction of daylight.
const SUN_INTENSITY: f32 = 0.8;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(srgb(Rgb::SKY)));
    app.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_INTENSITY * 1000.0,
        ..default()
    });
    app.add_systems(Startup, setup);
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: SUN_INTENSITY * light_consts::lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(50.0, 100.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
