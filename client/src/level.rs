use bevy::prelude::*;
use obby_shared::{PlatformDef, Rgb};

use crate::session::{FrameSet, Session, start_session, to_transform, to_vec3};

/// Visual of the level platform at this index.
#[derive(Component, Debug)]
pub struct PlatformVisual(pub usize);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Startup,
        spawn_platforms
            .after(start_session)
            .run_if(resource_exists::<Session>),
    );
    app.add_systems(Update, sync_platforms.in_set(FrameSet::Sync));
}

pub fn srgb(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_u8();
    Color::srgb_u8(r, g, b)
}

fn platform_material(def: &PlatformDef) -> StandardMaterial {
    let emissive = if def.is_hazard() {
        srgb(Rgb::HAZARD_GLOW).into()
    } else {
        LinearRgba::BLACK
    };

    StandardMaterial {
        base_color: srgb(def.color),
        emissive,
        perceptual_roughness: 0.8,
        ..default()
    }
}

fn spawn_platforms(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    for (index, def) in session.level().platforms.iter().enumerate() {
        let Some(pose) = session.platform_pose(index) else {
            continue;
        };
        let size = to_vec3(&def.extents);

        commands.spawn((
            Name::new(if def.is_hazard() {
                format!("Hazard {index}")
            } else {
                format!("Platform {index}")
            }),
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(materials.add(platform_material(def))),
            to_transform(&pose),
            PlatformVisual(index),
        ));
    }
}

fn sync_platforms(session: Res<Session>, mut platforms: Query<(&PlatformVisual, &mut Transform)>) {
    for (visual, mut transform) in &mut platforms {
        if let Some(pose) = session.platform_pose(visual.0) {
            *transform = to_transform(&pose);
        }
    }
}
