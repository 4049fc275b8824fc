use bevy::prelude::*;
use obby_shared::Rgb;

use crate::{
    level::srgb,
    session::{FrameSet, Session, start_session, to_transform, to_vec3},
};

#[derive(Component)]
pub struct PlayerVisual;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Startup,
        spawn_player
            .after(start_session)
            .run_if(resource_exists::<Session>),
    );
    app.add_systems(Update, sync_player.in_set(FrameSet::Sync));
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    let size = to_vec3(&session.config().player.half_extents) * 2.0;

    commands.spawn((
        Name::new("Player"),
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(materials.add(srgb(Rgb::PLAYER))),
        to_transform(&session.player_pose()),
        PlayerVisual,
    ));
}

fn sync_player(session: Res<Session>, mut player: Single<&mut Transform, With<PlayerVisual>>) {
    **player = to_transform(&session.player_pose());
}
