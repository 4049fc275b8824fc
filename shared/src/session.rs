//! One play-through of a course.
//!
//! [`GameSession`] owns the physics world, the progression state and the player's grounded
//! flag. The client drives it with [`GameSession::frame`] once per display frame and then
//! reads poses back for rendering.
//!
//! Frame order
//! 1. Advance physics by the capped wall-clock delta (fixed sub-steps).
//! 2. Reduce this frame's contacts to the grounded flag, then apply input (velocity, jump).
//! 3. Author kinematic targets for animated platforms.
//! 4. Poses are projected from bodies on demand (`player_pose`, `platform_pose`).
//! 5. Fall / hazard checks, then checkpoint checks.

use log::{debug, info};
use rapier3d::prelude::RigidBodyHandle;

use crate::{
    camera::{CameraRig, follow_camera},
    checkpoint::CheckpointTracker,
    config::GameConfig,
    error::LevelError,
    input::{InputState, Key},
    level::{Level, PlatformKind},
    motion::{Motion, Pose, Vec3},
    rapier_world::{BodyHandles, PhysicsWorld},
};

/// Why the player was sent back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespawnCause {
    /// Dropped below the death floor.
    Fell,
    /// Came within reach of the hazard at this platform index.
    Hazard { platform: usize },
}

/// Something the client may want to react to (HUD, sound, logs).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// `reached` checkpoints are now behind the player.
    CheckpointReached { reached: usize },
    /// Every checkpoint has been passed.
    CourseCompleted,
    Respawned { cause: RespawnCause, position: Vec3 },
}

/// Outcome of one [`GameSession::frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Physics steps taken this frame.
    pub substeps: u32,
    pub grounded: bool,
    /// A jump impulse was applied this frame.
    pub jumped: bool,
    pub events: Vec<GameEvent>,
}

/// A solid platform whose pose is authored every frame.
#[derive(Clone, Copy, Debug)]
struct AnimatedPlatform {
    body: RigidBodyHandle,
    motion: Motion,
    rest: Pose,
}

pub struct GameSession {
    config: GameConfig,
    level: Level,
    physics: PhysicsWorld,
    player: BodyHandles,
    /// Body per level platform, `None` for hazards.
    platform_bodies: Vec<Option<RigidBodyHandle>>,
    animated: Vec<AnimatedPlatform>,
    checkpoints: CheckpointTracker,
    grounded: bool,
    /// Session time used by platform motion laws (seconds).
    clock: f32,
}

impl GameSession {
    /// Validate `level`, build its bodies and place the player at the spawn point.
    pub fn new(level: Level, config: GameConfig) -> Result<Self, LevelError> {
        level.validate()?;

        let mut physics =
            PhysicsWorld::new(config.gravity, config.fixed_timestep, config.max_substeps);

        let mut platform_bodies = Vec::with_capacity(level.platforms.len());
        let mut animated = Vec::new();

        for def in &level.platforms {
            let rest = def.rest_pose();
            let body = match def.kind {
                PlatformKind::Hazard => None,
                PlatformKind::Solid(motion) if motion.is_animated() => {
                    let body = physics.insert_kinematic_box(&rest, def.half_extents()).body;
                    animated.push(AnimatedPlatform { body, motion, rest });
                    Some(body)
                }
                PlatformKind::Solid(_) => {
                    Some(physics.insert_fixed_box(&rest, def.half_extents()).body)
                }
            };
            platform_bodies.push(body);
        }

        let player = physics.insert_player(level.spawn, &config.player);
        let checkpoints = CheckpointTracker::new(level.checkpoints.clone());

        debug!(
            "session ready: {} platforms ({} animated), {} checkpoints",
            level.platforms.len(),
            animated.len(),
            checkpoints.len()
        );

        Ok(Self {
            config,
            level,
            physics,
            player,
            platform_bodies,
            animated,
            checkpoints,
            grounded: false,
            clock: 0.0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn checkpoints(&self) -> &CheckpointTracker {
        &self.checkpoints
    }

    /// Number of checkpoints reached, in `[0, checkpoint count]`.
    pub fn current_checkpoint(&self) -> usize {
        self.checkpoints.current()
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Run one display frame. `wall_delta` is the real time since the previous frame.
    pub fn frame(&mut self, wall_delta: f32, input: &InputState) -> FrameReport {
        let delta = if wall_delta.is_finite() {
            wall_delta.clamp(0.0, self.config.max_frame_delta)
        } else {
            0.0
        };

        let mut report = FrameReport::default();

        // 1) Physics.
        let step = self.physics.advance(delta, self.player.collider);
        report.substeps = step.substeps;
        if step.substeps > 0 {
            let min_y = self.config.ground_normal_min_y;
            self.grounded = step.contacts.iter().any(|c| c.is_ground(min_y));
        }

        // 2) Input.
        report.jumped = self.apply_input(input);

        // 3) Platform animation.
        self.clock += delta;
        for platform in &self.animated {
            let pose = platform.motion.pose_at(&platform.rest, self.clock);
            self.physics.set_kinematic_target(platform.body, &pose);
        }

        // 5) Failure, then progression.
        if let Some(cause) = self.failure() {
            let position = self.respawn();
            info!("respawned at {position:?} ({cause:?})");
            report
                .events
                .push(GameEvent::Respawned { cause, position });
        }

        let position = self.player_pose().translation;
        if let Some(reached) = self
            .checkpoints
            .update(&position, self.config.checkpoint_radius)
        {
            info!("checkpoint {reached}/{} reached", self.checkpoints.len());
            report.events.push(GameEvent::CheckpointReached { reached });
            if self.checkpoints.is_complete() {
                info!("course completed in {:.1}s", self.clock);
                report.events.push(GameEvent::CourseCompleted);
            }
        }

        report.grounded = self.grounded;
        report
    }

    /// Write the requested horizontal velocity and, if allowed, the jump impulse.
    ///
    /// Returns true when a jump was applied.
    fn apply_input(&mut self, input: &InputState) -> bool {
        let planar = input.desired_velocity(self.config.move_speed);
        let Some(body) = self.physics.bodies.get_mut(self.player.body) else {
            return false;
        };

        let mut velocity = *body.linvel();
        velocity.x = planar.x;
        velocity.z = planar.y;

        let jumped = self.grounded && input.is_pressed(Key::Jump);
        if jumped {
            velocity.y = self.config.jump_speed;
            self.grounded = false;
        }

        body.set_linvel(velocity, true);
        jumped
    }

    fn failure(&self) -> Option<RespawnCause> {
        let position = self.player_pose().translation;
        if position.y < self.config.death_floor {
            return Some(RespawnCause::Fell);
        }

        self.level
            .hazards()
            .find(|(_, hazard)| (hazard.center - position).norm() < self.config.hazard_radius)
            .map(|(platform, _)| RespawnCause::Hazard { platform })
    }

    /// Put the player above the last reached checkpoint (or the spawn) with zero velocity.
    ///
    /// Returns the new position.
    pub fn respawn(&mut self) -> Vec3 {
        let anchor = self.checkpoints.respawn_anchor(self.level.spawn);
        let position = anchor + Vec3::new(0.0, self.config.respawn_height, 0.0);

        if let Some(body) = self.physics.bodies.get_mut(self.player.body) {
            body.set_translation(position, true);
            body.set_linvel(Vec3::zeros(), true);
            body.set_angvel(Vec3::zeros(), true);
        }
        self.grounded = false;

        position
    }

    /// Move the player without touching its velocity.
    #[cfg(test)]
    pub(crate) fn place_player(&mut self, position: Vec3) {
        if let Some(body) = self.physics.bodies.get_mut(self.player.body) {
            body.set_translation(position, true);
        }
    }

    pub fn player_pose(&self) -> Pose {
        self.physics
            .pose(self.player.body)
            .unwrap_or_else(|| Pose::from_translation(self.level.spawn))
    }

    /// Linear and angular velocity of the player body.
    pub fn player_velocity(&self) -> (Vec3, Vec3) {
        self.physics
            .bodies
            .get(self.player.body)
            .map(|b| (*b.linvel(), *b.angvel()))
            .unwrap_or_else(|| (Vec3::zeros(), Vec3::zeros()))
    }

    /// Render pose of level platform `index`: its body's pose, or the rest pose for hazards.
    pub fn platform_pose(&self, index: usize) -> Option<Pose> {
        let def = self.level.platforms.get(index)?;
        match self.platform_bodies.get(index).copied().flatten() {
            Some(body) => self.physics.pose(body),
            None => Some(def.rest_pose()),
        }
    }

    /// Follow-camera placement for the current player pose and view yaw.
    pub fn camera(&self, yaw: f32) -> CameraRig {
        follow_camera(self.player_pose().translation, yaw, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{PlatformDef, Rgb};

    const DT: f32 = 1.0 / 60.0;

    fn course() -> GameSession {
        GameSession::new(Level::course(), GameConfig::default()).expect("reference course")
    }

    /// A single huge floor with its top at y = 1.
    fn flat_floor() -> GameSession {
        let mut level = Level::new(Vec3::new(0.0, 10.0, 0.0));
        level.push(PlatformDef::solid(
            Vec3::zeros(),
            Vec3::new(400.0, 2.0, 400.0),
            Rgb(0x7CFC00),
        ));
        GameSession::new(level, GameConfig::default()).expect("flat floor")
    }

    fn run(session: &mut GameSession, frames: usize, input: &InputState) -> FrameReport {
        let mut last = FrameReport::default();
        for _ in 0..frames {
            last = session.frame(DT, input);
        }
        last
    }

    fn respawns(report: &FrameReport) -> Vec<RespawnCause> {
        report
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Respawned { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn invalid_level_is_rejected() {
        let mut level = Level::new(Vec3::zeros());
        level.push(PlatformDef::solid(
            Vec3::zeros(),
            Vec3::new(-1.0, 1.0, 1.0),
            Rgb(0),
        ));
        assert!(matches!(
            GameSession::new(level, GameConfig::default()),
            Err(LevelError::InvalidExtents { index: 0, .. })
        ));
    }

    #[test]
    fn player_starts_at_spawn() {
        let session = course();
        assert_eq!(session.player_pose().translation, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(session.current_checkpoint(), 0);
        assert!(!session.is_grounded());
    }

    #[test]
    fn holding_forward_for_one_second_covers_move_speed() {
        let mut session = flat_floor();
        let start = session.player_pose().translation;

        let mut input = InputState::default();
        input.set(Key::Forward, true);
        run(&mut session, 60, &input);

        let end = session.player_pose().translation;
        let dx = end.x - start.x;
        let dz = end.z - start.z;
        let speed = session.config().move_speed;

        assert!(dx.abs() < 0.1, "drifted sideways by {dx}");
        assert!(dz < -0.8 * speed && dz > -1.02 * speed, "moved {dz}");
    }

    #[test]
    fn releasing_keys_stops_horizontal_motion() {
        let mut session = flat_floor();
        let mut input = InputState::default();
        input.set(Key::Right, true);
        run(&mut session, 30, &input);

        input.release_all();
        session.frame(DT, &input);

        let (linvel, _) = session.player_velocity();
        assert_eq!(linvel.x, 0.0);
        assert_eq!(linvel.z, 0.0);
    }

    #[test]
    fn jump_requires_ground_and_clears_it() {
        let mut session = flat_floor();
        let idle = InputState::default();
        let mut jump = InputState::default();
        jump.set(Key::Jump, true);

        // Airborne at spawn: pressing jump does nothing.
        let report = session.frame(DT, &jump);
        assert!(!report.jumped);
        assert!(session.player_velocity().0.y <= 0.0);

        // Settle on the floor.
        let report = run(&mut session, 120, &idle);
        assert!(report.grounded);

        let report = session.frame(DT, &jump);
        assert!(report.jumped);
        assert!(!report.grounded);
        assert!(!session.is_grounded());
        assert_eq!(session.player_velocity().0.y, session.config().jump_speed);

        // Still holding jump while rising: no second impulse, no grounding.
        for _ in 0..5 {
            let report = session.frame(DT, &jump);
            assert!(!report.jumped);
            assert!(!report.grounded);
        }
        assert!(session.player_velocity().0.y < session.config().jump_speed - 0.1);

        // Eventually lands again.
        let report = run(&mut session, 120, &idle);
        assert!(report.grounded);
    }

    #[test]
    fn nearby_checkpoint_advances_on_next_frame() {
        let mut session = course();
        session.place_player(Vec3::new(0.0, 9.5, -50.0));

        let report = session.frame(DT, &InputState::default());
        assert_eq!(session.current_checkpoint(), 1);
        assert!(
            report
                .events
                .contains(&GameEvent::CheckpointReached { reached: 1 })
        );
    }

    #[test]
    fn falling_respawns_at_last_checkpoint_with_zero_velocity() {
        let mut session = course();
        session.place_player(Vec3::new(0.0, 9.5, -50.0));
        session.frame(DT, &InputState::default());
        assert_eq!(session.current_checkpoint(), 1);

        session.place_player(Vec3::new(0.0, -25.0, 0.0));
        let mut input = InputState::default();
        input.set(Key::Forward, true);
        let report = session.frame(DT, &input);

        assert_eq!(respawns(&report), vec![RespawnCause::Fell]);
        assert_eq!(
            session.player_pose().translation,
            Vec3::new(0.0, 8.0 + 5.0, -50.0)
        );
        let (linvel, angvel) = session.player_velocity();
        assert_eq!(linvel, Vec3::zeros());
        assert_eq!(angvel, Vec3::zeros());
        assert_eq!(session.current_checkpoint(), 1);
    }

    #[test]
    fn falling_before_any_checkpoint_returns_to_spawn() {
        let mut session = course();
        session.place_player(Vec3::new(40.0, -30.0, 40.0));
        let report = session.frame(DT, &InputState::default());

        assert_eq!(respawns(&report), vec![RespawnCause::Fell]);
        assert_eq!(session.player_pose().translation, Vec3::new(0.0, 15.0, 0.0));
    }

    #[test]
    fn hazard_respawns_from_every_direction() {
        let level = Level::course();
        let (hazard_index, hazard) = level.hazards().next().expect("course has a hazard");
        let center = hazard.center;

        let offsets = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(2.0, 2.0, 2.0),
        ];

        for offset in offsets {
            let mut session = course();
            session.place_player(center + offset);
            let report = session.frame(DT, &InputState::default());

            assert_eq!(
                respawns(&report),
                vec![RespawnCause::Hazard {
                    platform: hazard_index
                }],
                "offset {offset:?}"
            );
            assert_eq!(session.player_pose().translation, Vec3::new(0.0, 15.0, 0.0));
            assert_eq!(session.player_velocity().0, Vec3::zeros());
        }
    }

    #[test]
    fn repeated_failures_reset_every_time() {
        let mut session = course();
        let idle = InputState::default();
        let anchor = Vec3::new(0.0, 15.0, 0.0);
        let hazard = session.level().hazards().next().expect("hazard");
        let hazard_spot = hazard.1.center + Vec3::new(3.0, 0.0, 0.0);
        let hazard_cause = RespawnCause::Hazard { platform: hazard.0 };

        // Stand on the start platform first so respawn has a grounded flag to clear.
        let report = run(&mut session, 120, &idle);
        assert!(report.grounded);

        let falls = [
            (Vec3::new(0.0, -25.0, 0.0), RespawnCause::Fell),
            (Vec3::new(5.0, -30.0, 5.0), RespawnCause::Fell),
            (hazard_spot, hazard_cause),
            (Vec3::new(0.0, -25.0, 0.0), RespawnCause::Fell),
        ];

        for (spot, cause) in falls {
            session.place_player(spot);
            let report = session.frame(DT, &idle);

            assert_eq!(
                report.events,
                vec![GameEvent::Respawned {
                    cause,
                    position: anchor
                }]
            );
            assert!(!report.grounded);
            assert!(!session.is_grounded());
            assert_eq!(session.player_pose().translation, anchor);
            let (linvel, angvel) = session.player_velocity();
            assert_eq!(linvel, Vec3::zeros());
            assert_eq!(angvel, Vec3::zeros());
        }
        assert_eq!(session.current_checkpoint(), 0);
    }

    #[test]
    fn hazard_outside_radius_is_harmless() {
        let mut session = course();
        let center = session.level().hazards().next().expect("hazard").1.center;
        session.place_player(center + Vec3::new(6.0, 0.0, 0.0));

        let report = session.frame(DT, &InputState::default());
        assert!(respawns(&report).is_empty());
    }

    #[test]
    fn checkpoint_index_is_monotonic_across_a_run() {
        let mut session = course();
        let idle = InputState::default();
        let stops = [
            Vec3::new(0.0, 9.5, -50.0),
            Vec3::new(-15.0, 21.5, -140.0),
            Vec3::new(0.0, -40.0, 0.0),
            Vec3::new(0.0, 9.5, -50.0),
            Vec3::new(-10.0, 35.5, -270.0),
            Vec3::new(-10.0, 35.5, -270.0),
        ];

        let mut previous = 0;
        let mut completed = false;
        for stop in stops {
            session.place_player(stop);
            let report = session.frame(DT, &idle);
            completed |= report.events.contains(&GameEvent::CourseCompleted);

            let current = session.current_checkpoint();
            assert!(current >= previous);
            assert!(current <= session.checkpoints().len());
            previous = current;
        }

        assert_eq!(session.current_checkpoint(), 3);
        assert!(completed);
    }

    #[test]
    fn moving_platform_tracks_its_motion_law() {
        let mut session = course();
        let index = session
            .level()
            .platforms
            .iter()
            .position(|p| matches!(p.motion(), Some(Motion::Translating { .. })))
            .expect("moving platform");
        let def = session.level().platforms[index].clone();
        let motion = *def.motion().expect("solid");

        let idle = InputState::default();
        run(&mut session, 30, &idle);
        // The target authored last frame is reached during this frame's step.
        let authored = motion.pose_at(&def.rest_pose(), session.clock());
        session.frame(DT, &idle);

        let pose = session.platform_pose(index).expect("pose");
        assert!((pose.translation - authored.translation).norm() < 1.0e-3);
    }

    #[test]
    fn rotating_platform_spins_its_body() {
        let mut session = course();
        let index = session
            .level()
            .platforms
            .iter()
            .position(|p| matches!(p.motion(), Some(Motion::Rotating { .. })))
            .expect("rotating platform");
        let def = session.level().platforms[index].clone();
        let motion = *def.motion().expect("solid");

        let idle = InputState::default();
        run(&mut session, 30, &idle);
        let authored = motion.pose_at(&def.rest_pose(), session.clock());
        session.frame(DT, &idle);

        let pose = session.platform_pose(index).expect("pose");
        assert!(pose.rotation.angle_to(&authored.rotation) < 1.0e-3);
        assert!((pose.translation - def.center).norm() < 1.0e-4);
        // Half a second at 0.5 rad/s: visibly turned away from rest.
        assert!(pose.rotation.angle_to(&def.rest_pose().rotation) > 0.2);
    }

    #[test]
    fn hazard_pose_is_its_rest_pose() {
        let session = course();
        let (index, hazard) = session.level().hazards().next().expect("hazard");
        assert_eq!(session.platform_pose(index), Some(hazard.rest_pose()));
        assert_eq!(session.platform_pose(999), None);
    }

    #[test]
    fn oversized_deltas_are_capped() {
        let mut session = course();
        let report = session.frame(5.0, &InputState::default());
        assert_eq!(report.substeps, session.config().max_substeps);
        assert!((session.clock() - session.config().max_frame_delta).abs() < 1.0e-6);

        let report = session.frame(f32::NAN, &InputState::default());
        assert_eq!(report.substeps, 0);
    }
}
