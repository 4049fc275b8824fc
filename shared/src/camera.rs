use crate::{config::GameConfig, input::movement_basis, motion::Vec3};

/// Where the follow camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Third-person rig: behind the player along the view yaw, raised, looking slightly above the
/// player center.
pub fn follow_camera(player: Vec3, yaw: f32, config: &GameConfig) -> CameraRig {
    let forward = movement_basis(yaw).forward;
    let offset = Vec3::new(
        -forward.x * config.camera_distance,
        config.camera_height,
        -forward.z * config.camera_distance,
    );

    CameraRig {
        eye: player + offset,
        target: player + Vec3::new(0.0, config.camera_look_height, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_sits_behind_and_above() {
        let config = GameConfig::default();
        let rig = follow_camera(Vec3::new(0.0, 10.0, 0.0), 0.0, &config);

        assert!((rig.eye - Vec3::new(0.0, 15.0, 12.0)).norm() < 1.0e-5);
        assert_eq!(rig.target, Vec3::new(0.0, 12.0, 0.0));
    }
}
