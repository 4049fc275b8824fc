use bevy::{prelude::*, window::WindowResized};
use obby_shared::Rgb;

use crate::{
    level::srgb,
    session::{FrameSet, PlayerInput, Session, to_vec3},
};

const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const FOG_START: f32 = 50.0;
const FOG_END: f32 = 200.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, follow_player.in_set(FrameSet::Camera));
    app.add_systems(Update, log_resize);
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
            ..default()
        }),
        Transform::from_xyz(0.0, 15.0, 12.0).looking_at(Vec3::new(0.0, 12.0, 0.0), Vec3::Y),
        DistanceFog {
            color: srgb(Rgb::SKY),
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
    ));
}

fn follow_player(
    mut camera: Single<&mut Transform, With<Camera3d>>,
    session: Res<Session>,
    input: Res<PlayerInput>,
) {
    let rig = session.camera(input.look.yaw);
    **camera = Transform::from_translation(to_vec3(&rig.eye))
        .looking_at(to_vec3(&rig.target), Vec3::Y);
}

// Aspect ratio and render target follow the window automatically; this only records it.
fn log_resize(mut messages: MessageReader<WindowResized>) {
    for message in messages.read() {
        debug!("Window resized to {}x{}", message.width, message.height);
    }
}
