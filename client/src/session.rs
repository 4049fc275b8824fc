use bevy::prelude::*;
use obby_shared::{GameSession, InputState, Level, Pose};

use crate::config::Settings;

/// The running play-through. Absent if the level failed to load.
#[derive(Resource, Deref, DerefMut)]
pub struct Session(pub GameSession);

/// Keys and look angles fed to the session each frame.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct PlayerInput(pub InputState);

/// Per-frame ordering inside `Update`.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Sample bindings and mouse look into [`PlayerInput`].
    Input,
    /// Step the session.
    Simulate,
    /// Copy body poses onto visuals.
    Sync,
    Camera,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>();

    app.add_systems(Startup, start_session);

    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Simulate,
            FrameSet::Sync,
            FrameSet::Camera,
        )
            .chain()
            .run_if(resource_exists::<Session>),
    );
    app.add_systems(Update, run_frame.in_set(FrameSet::Simulate));
}

pub(crate) fn start_session(
    mut commands: Commands,
    settings: Res<Settings>,
    mut exit: MessageWriter<AppExit>,
) {
    match GameSession::new(Level::course(), settings.0) {
        Ok(session) => {
            info!(
                "Course loaded: {} platforms, {} checkpoints.",
                session.level().platforms.len(),
                session.checkpoints().len()
            );
            commands.insert_resource(Session(session));
        }
        Err(err) => {
            error!("Failed to load course: {err}");
            exit.write(AppExit::error());
        }
    }
}

fn run_frame(time: Res<Time>, input: Res<PlayerInput>, mut session: ResMut<Session>) {
    let report = session.frame(time.delta_secs(), &input);
    if report.jumped {
        debug!("jump");
    }
}

pub fn to_vec3(v: &obby_shared::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_transform(pose: &Pose) -> Transform {
    let q = pose.rotation;
    Transform {
        translation: to_vec3(&pose.translation),
        rotation: Quat::from_xyzw(q.i, q.j, q.k, q.w),
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obby_shared::{Quat as SimQuat, Vec3 as SimVec3};

    #[test]
    fn pose_maps_onto_transform() {
        let pose = Pose::new(
            SimVec3::new(1.0, 2.0, 3.0),
            SimQuat::from_axis_angle(&SimVec3::y_axis(), 0.7),
        );
        let tf = to_transform(&pose);

        assert_eq!(tf.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(tf.rotation.angle_between(Quat::from_rotation_y(0.7)) < 1.0e-5);
        assert_eq!(tf.scale, Vec3::ONE);
    }
}
