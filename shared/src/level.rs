//! Course layout data.
//!
//! A [`Level`] is plain data: platforms, checkpoints and a spawn point. It knows nothing about
//! rapier or bevy; [`crate::GameSession`] turns it into physics bodies and the client turns it
//! into meshes.

use std::f32::consts::PI;

use crate::{
    error::LevelError,
    motion::{Axis, Motion, Pose, Quat, Vec3},
};

/// 24-bit `0xRRGGBB` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const HAZARD: Rgb = Rgb(0xFF0000);
    pub const HAZARD_GLOW: Rgb = Rgb(0x660000);
    pub const PLAYER: Rgb = Rgb(0x00A2FF);
    pub const SKY: Rgb = Rgb(0x87CEEB);

    #[inline]
    pub fn to_u8(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }
}

/// What a platform does when the player meets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlatformKind {
    /// Collidable, optionally animated.
    Solid(Motion),
    /// Visual-only trigger volume. Touching it respawns the player.
    Hazard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformDef {
    /// Center of the box at rest (world space).
    pub center: Vec3,
    /// Full width/height/depth.
    pub extents: Vec3,
    pub color: Rgb,
    /// Static tilt about the world Z axis (radians).
    pub tilt: f32,
    pub kind: PlatformKind,
}

impl PlatformDef {
    pub fn solid(center: Vec3, extents: Vec3, color: Rgb) -> Self {
        Self {
            center,
            extents,
            color,
            tilt: 0.0,
            kind: PlatformKind::Solid(Motion::Static),
        }
    }

    pub fn hazard(center: Vec3, extents: Vec3) -> Self {
        Self {
            center,
            extents,
            color: Rgb::HAZARD,
            tilt: 0.0,
            kind: PlatformKind::Hazard,
        }
    }

    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    /// Replace the motion law. Hazards stay hazards.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        if let PlatformKind::Solid(_) = self.kind {
            self.kind = PlatformKind::Solid(motion);
        }
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.extents * 0.5
    }

    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self.kind, PlatformKind::Hazard)
    }

    /// The motion law, `None` for hazards.
    #[inline]
    pub fn motion(&self) -> Option<&Motion> {
        match &self.kind {
            PlatformKind::Solid(motion) => Some(motion),
            PlatformKind::Hazard => None,
        }
    }

    /// Pose at rest: centered, tilted about Z.
    pub fn rest_pose(&self) -> Pose {
        Pose::new(self.center, Quat::from_axis_angle(&Vec3::z_axis(), self.tilt))
    }

    fn validate(&self, index: usize) -> Result<(), LevelError> {
        let e = self.extents;
        if !(e.iter().all(|v| v.is_finite() && *v > 0.0)) {
            return Err(LevelError::InvalidExtents {
                index,
                extents: [e.x, e.y, e.z],
            });
        }
        if !(is_finite(&self.center) && self.tilt.is_finite()) {
            return Err(LevelError::InvalidPlacement { index });
        }
        if let Some(motion) = self.motion() {
            if !motion.is_finite() {
                return Err(LevelError::InvalidMotion { index });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub platforms: Vec<PlatformDef>,
    /// Ordered checkpoint positions.
    pub checkpoints: Vec<Vec3>,
    /// Where the player starts, and respawns before reaching any checkpoint.
    pub spawn: Vec3,
}

impl Level {
    pub fn new(spawn: Vec3) -> Self {
        Self {
            platforms: Vec::new(),
            checkpoints: Vec::new(),
            spawn,
        }
    }

    pub fn push(&mut self, platform: PlatformDef) -> &mut Self {
        self.platforms.push(platform);
        self
    }

    pub fn hazards(&self) -> impl Iterator<Item = (usize, &PlatformDef)> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_hazard())
    }

    /// Check every number that will reach the physics engine.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !is_finite(&self.spawn) {
            return Err(LevelError::InvalidSpawn);
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            platform.validate(index)?;
        }
        for (index, checkpoint) in self.checkpoints.iter().enumerate() {
            if !is_finite(checkpoint) {
                return Err(LevelError::InvalidCheckpoint { index });
            }
        }
        Ok(())
    }

    /// The reference obstacle course.
    pub fn course() -> Self {
        let v = Vec3::new;
        let mut level = Level::new(v(0.0, 10.0, 0.0));

        // Start
        level.push(PlatformDef::solid(v(0.0, 0.0, 0.0), v(15.0, 2.0, 15.0), Rgb(0x7CFC00)));

        // Basic jumps
        level
            .push(PlatformDef::solid(v(0.0, 2.0, -20.0), v(10.0, 2.0, 10.0), Rgb(0x32CD32)))
            .push(PlatformDef::solid(v(0.0, 4.0, -35.0), v(8.0, 2.0, 8.0), Rgb(0x228B22)))
            .push(PlatformDef::solid(v(0.0, 6.0, -50.0), v(10.0, 2.0, 10.0), Rgb(0x006400)));

        // Gap jumps
        level
            .push(PlatformDef::solid(v(-15.0, 8.0, -60.0), v(6.0, 2.0, 6.0), Rgb(0xFFD700)))
            .push(PlatformDef::solid(v(-15.0, 10.0, -75.0), v(6.0, 2.0, 6.0), Rgb(0xFFA500)));

        // Narrow path
        level.push(PlatformDef::solid(v(-15.0, 12.0, -90.0), v(3.0, 2.0, 15.0), Rgb(0xFF8C00)));

        // Moving platforms
        level
            .push(
                PlatformDef::solid(v(-15.0, 14.0, -110.0), v(8.0, 2.0, 8.0), Rgb(0x4169E1))
                    .with_motion(Motion::translating(Axis::X, 10.0, 1.5)),
            )
            .push(
                PlatformDef::solid(v(0.0, 16.0, -125.0), v(8.0, 2.0, 8.0), Rgb(0x1E90FF))
                    .with_motion(Motion::translating(Axis::X, -12.0, 1.8)),
            );

        // Tilted platforms
        level
            .push(
                PlatformDef::solid(v(-15.0, 18.0, -140.0), v(12.0, 2.0, 8.0), Rgb(0x9370DB))
                    .with_tilt(PI / 12.0),
            )
            .push(
                PlatformDef::solid(v(-15.0, 20.0, -155.0), v(10.0, 2.0, 10.0), Rgb(0x8A2BE2))
                    .with_tilt(-PI / 10.0),
            );

        // Rotating platform
        level.push(
            PlatformDef::solid(v(-15.0, 22.0, -175.0), v(15.0, 2.0, 15.0), Rgb(0xFF1493))
                .with_motion(Motion::rotating(0.5)),
        );

        // Hazard between two stepping stones
        level
            .push(PlatformDef::solid(v(-15.0, 24.0, -195.0), v(4.0, 2.0, 4.0), Rgb(0x00CED1)))
            .push(PlatformDef::hazard(v(-15.0, 26.0, -202.0), v(8.0, 4.0, 2.0)))
            .push(PlatformDef::solid(v(-15.0, 24.0, -210.0), v(6.0, 2.0, 6.0), Rgb(0x00CED1)));

        // Zigzag
        level
            .push(PlatformDef::solid(v(-10.0, 26.0, -225.0), v(6.0, 2.0, 8.0), Rgb(0xDC143C)))
            .push(PlatformDef::solid(v(-20.0, 28.0, -238.0), v(6.0, 2.0, 8.0), Rgb(0xB22222)))
            .push(PlatformDef::solid(v(-10.0, 30.0, -251.0), v(6.0, 2.0, 8.0), Rgb(0x8B0000)));

        // Long jump
        level
            .push(PlatformDef::solid(v(-10.0, 32.0, -270.0), v(8.0, 2.0, 8.0), Rgb(0xFFFF00)))
            .push(PlatformDef::solid(v(-10.0, 34.0, -295.0), v(10.0, 2.0, 10.0), Rgb(0xFFD700)));

        // Goal
        level.push(PlatformDef::solid(v(-10.0, 36.0, -315.0), v(20.0, 2.0, 20.0), Rgb(0x00FF00)));

        level.checkpoints = vec![
            v(0.0, 8.0, -50.0),
            v(-15.0, 18.0, -140.0),
            v(-10.0, 32.0, -270.0),
        ];

        level
    }
}

#[inline]
fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_layout_matches_reference() {
        let level = Level::course();

        assert_eq!(level.platforms.len(), 21);
        assert_eq!(level.checkpoints.len(), 3);
        assert_eq!(level.spawn, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(level.checkpoints[0], Vec3::new(0.0, 8.0, -50.0));

        let hazards: Vec<_> = level.hazards().collect();
        assert_eq!(hazards.len(), 1);
        assert_eq!(hazards[0].1.center, Vec3::new(-15.0, 26.0, -202.0));

        let translating = level
            .platforms
            .iter()
            .filter(|p| matches!(p.motion(), Some(Motion::Translating { .. })))
            .count();
        let rotating = level
            .platforms
            .iter()
            .filter(|p| matches!(p.motion(), Some(Motion::Rotating { .. })))
            .count();
        assert_eq!(translating, 2);
        assert_eq!(rotating, 1);

        assert_eq!(level.validate(), Ok(()));
    }

    #[test]
    fn hazards_ignore_motion() {
        let hazard = PlatformDef::hazard(Vec3::zeros(), Vec3::repeat(1.0))
            .with_motion(Motion::rotating(1.0));
        assert_eq!(hazard.kind, PlatformKind::Hazard);
        assert!(hazard.motion().is_none());
    }

    #[test]
    fn rest_pose_applies_tilt_about_z() {
        let p = PlatformDef::solid(Vec3::zeros(), Vec3::repeat(2.0), Rgb(0)).with_tilt(PI / 2.0);
        let up = p.rest_pose().rotation * Vec3::y();
        assert!((up - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn rgb_splits_channels() {
        assert_eq!(Rgb(0x87CEEB).to_u8(), [0x87, 0xCE, 0xEB]);
        assert_eq!(Rgb::HAZARD_GLOW.to_u8(), [0x66, 0, 0]);
    }

    #[test]
    fn validate_rejects_zero_extent() {
        let mut level = Level::new(Vec3::zeros());
        level.push(PlatformDef::solid(Vec3::zeros(), Vec3::repeat(1.0), Rgb(0)));
        level.push(PlatformDef::solid(Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0), Rgb(0)));

        assert_eq!(
            level.validate(),
            Err(LevelError::InvalidExtents {
                index: 1,
                extents: [1.0, 0.0, 1.0]
            })
        );
    }

    #[test]
    fn validate_rejects_non_finite_motion_and_checkpoints() {
        let mut level = Level::new(Vec3::zeros());
        level.push(
            PlatformDef::solid(Vec3::zeros(), Vec3::repeat(1.0), Rgb(0))
                .with_motion(Motion::rotating(f32::NAN)),
        );
        assert_eq!(level.validate(), Err(LevelError::InvalidMotion { index: 0 }));

        let mut level = Level::new(Vec3::zeros());
        level.checkpoints = vec![Vec3::zeros(), Vec3::new(0.0, f32::INFINITY, 0.0)];
        assert_eq!(
            level.validate(),
            Err(LevelError::InvalidCheckpoint { index: 1 })
        );

        let level = Level::new(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(level.validate(), Err(LevelError::InvalidSpawn));
    }
}
