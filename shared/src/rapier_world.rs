//! Rapier-backed simulation world for the course.
//!
//! Owns every rapier set and pipeline needed to step dynamics, and exposes the small surface
//! the session needs:
//! - insert fixed / kinematic platform boxes and the dynamic player box,
//! - advance by a wall-clock delta using a fixed-step accumulator,
//! - report the player's contacts after each internal step.
//!
//! Conventions
//! - Units are meters and seconds.
//! - Gravity points along -Y.
//! - Rotations are unit quaternions.

// Re-export Rapier so the client can name handles and sets without depending on `rapier3d`
// directly.
pub use rapier3d;

use log::debug;
use rapier3d::prelude::*;

use crate::{
    config::{PlayerSpec, damping_coefficient},
    constants::{
        CONTACT_TOLERANCE, GROUND_MAX_SEPARATING_SPEED, SURFACE_FRICTION, SURFACE_RESTITUTION,
    },
    motion::{Pose, Vec3},
};

/// A contact observed on the watched collider during one internal step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerContact {
    /// The collider touching the player.
    pub other: ColliderHandle,
    /// World-space contact normal pointing from `other` toward the player.
    pub normal: Vec3,
    /// Relative linear velocity along `normal`; positive when the player is moving away.
    pub separating_speed: f32,
}

impl PlayerContact {
    /// Is this contact something the player can stand on?
    ///
    /// Contacts are detected at the start of a step, so the ground the player just jumped off
    /// still shows up once; its separating speed rules it out.
    #[inline]
    pub fn is_ground(&self, min_normal_y: f32) -> bool {
        self.normal.y > min_normal_y && self.separating_speed < GROUND_MAX_SEPARATING_SPEED
    }
}

/// What happened during one call to [`PhysicsWorld::advance`].
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Internal fixed steps actually taken (0 when the delta was below one step).
    pub substeps: u32,
    /// Contacts on the watched collider, in step order.
    pub contacts: Vec<PlayerContact>,
}

/// Handles of a body and its single collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub islands: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    max_substeps: u32,
    accumulator: f32,
}

impl PhysicsWorld {
    /// Empty world with `gravity` (positive magnitude) and a fixed step of `fixed_dt`.
    pub fn new(gravity: f32, fixed_dt: f32, max_substeps: u32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: fixed_dt,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![0.0, -gravity, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            max_substeps,
            accumulator: 0.0,
        }
    }

    #[inline]
    pub fn fixed_dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Insert an immovable box (zero mass).
    pub fn insert_fixed_box(&mut self, pose: &Pose, half_extents: Vec3) -> BodyHandles {
        let rb = RigidBodyBuilder::fixed().pose(pose.iso()).build();
        self.insert_box(rb, half_extents)
    }

    /// Insert a box whose pose is authored every frame via [`Self::set_kinematic_target`].
    pub fn insert_kinematic_box(&mut self, pose: &Pose, half_extents: Vec3) -> BodyHandles {
        let rb = RigidBodyBuilder::kinematic_position_based()
            .pose(pose.iso())
            .build();
        self.insert_box(rb, half_extents)
    }

    fn insert_box(&mut self, rb: RigidBody, half_extents: Vec3) -> BodyHandles {
        let body = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(SURFACE_FRICTION)
            .restitution(SURFACE_RESTITUTION)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        BodyHandles { body, collider }
    }

    /// Insert the player: a dynamic box with locked rotation.
    pub fn insert_player(&mut self, position: Vec3, spec: &PlayerSpec) -> BodyHandles {
        let dt = self.fixed_dt();
        let rb = RigidBodyBuilder::dynamic()
            .pose(Pose::from_translation(position).iso())
            .linear_damping(damping_coefficient(spec.linear_damping, dt))
            .angular_damping(damping_coefficient(spec.angular_damping, dt))
            .lock_rotations()
            .build();
        let body = self.bodies.insert(rb);

        let he = spec.half_extents;
        let collider = ColliderBuilder::cuboid(he.x, he.y, he.z)
            .mass(spec.mass)
            .friction(spec.friction)
            .restitution(spec.restitution)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyHandles { body, collider }
    }

    /// Queue the next pose of a kinematic body. Takes effect during the next internal step.
    pub fn set_kinematic_target(&mut self, body: RigidBodyHandle, pose: &Pose) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_next_kinematic_translation(pose.translation);
            rb.set_next_kinematic_rotation(pose.rotation);
        }
    }

    /// Current world pose of a body, `None` if the handle is stale.
    #[inline]
    pub fn pose(&self, body: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(body).map(pose_of)
    }

    /// Advance the simulation by a wall-clock `delta`.
    ///
    /// Runs whole fixed steps out of an accumulator, at most `max_substeps` of them. Time left
    /// over below one step carries to the next call; anything beyond the sub-step cap is
    /// dropped so a slow frame never snowballs.
    ///
    /// Contacts on `watch` are sampled after every internal step.
    pub fn advance(&mut self, delta: f32, watch: ColliderHandle) -> StepReport {
        let dt = self.fixed_dt();
        let mut report = StepReport::default();

        if dt <= 0.0 {
            return report;
        }

        self.accumulator += delta.max(0.0);

        while self.accumulator >= dt && report.substeps < self.max_substeps {
            self.step_once();
            self.collect_contacts(watch, &mut report.contacts);
            self.accumulator -= dt;
            report.substeps += 1;
        }

        if self.accumulator >= dt {
            debug!(
                "dropping {:.4}s of simulation after {} substeps",
                self.accumulator - self.accumulator % dt,
                report.substeps
            );
            self.accumulator %= dt;
        }

        report
    }

    fn step_once(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Append every touching manifold on `watch`, with the normal oriented toward `watch`.
    fn collect_contacts(&self, watch: ColliderHandle, out: &mut Vec<PlayerContact>) {
        let watch_vel = self.collider_linvel(watch);

        for pair in self.narrow_phase.contact_pairs_with(watch) {
            let (other, flip) = if pair.collider1 == watch {
                (pair.collider2, true)
            } else {
                (pair.collider1, false)
            };

            for manifold in &pair.manifolds {
                let touching = manifold
                    .points
                    .iter()
                    .any(|pt| pt.dist <= CONTACT_TOLERANCE);
                if !touching {
                    continue;
                }

                // Manifold normals point out of collider1.
                let normal = if flip {
                    -manifold.data.normal
                } else {
                    manifold.data.normal
                };
                let separating_speed = (watch_vel - self.collider_linvel(other)).dot(&normal);
                out.push(PlayerContact {
                    other,
                    normal,
                    separating_speed,
                });
            }
        }
    }

    /// Linear velocity of the body carrying `collider`; zero for parentless colliders.
    fn collider_linvel(&self, collider: ColliderHandle) -> Vec3 {
        self.colliders
            .get(collider)
            .and_then(|c| c.parent())
            .and_then(|b| self.bodies.get(b))
            .map(|b| *b.linvel())
            .unwrap_or_else(Vec3::zeros)
    }
}

/// Project a body's simulated state into a render pose.
#[inline]
pub fn pose_of(body: &RigidBody) -> Pose {
    Pose::new(*body.translation(), *body.rotation())
}
