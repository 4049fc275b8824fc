//! Session tuning.
//!
//! [`GameConfig`] gathers every knob the simulation reads so a session can be built with
//! non-default values (tests use this to isolate behavior). Defaults come from
//! [`crate::constants`].

use crate::constants::*;
use crate::motion::Vec3;

/// Player rigid-body parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSpec {
    /// Collider half extents (meters).
    pub half_extents: Vec3,
    pub mass: f32,
    /// Fraction of linear velocity lost per second (0 = none, 1 = all).
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second (0 = none, 1 = all).
    pub angular_damping: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PlayerSpec {
    fn default() -> Self {
        let [x, y, z] = PLAYER_HALF_EXTENTS;
        Self {
            half_extents: Vec3::new(x, y, z),
            mass: PLAYER_MASS_KG,
            linear_damping: PLAYER_LINEAR_DAMPING,
            angular_damping: PLAYER_ANGULAR_DAMPING,
            friction: SURFACE_FRICTION,
            restitution: SURFACE_RESTITUTION,
        }
    }
}

/// Everything a [`crate::GameSession`] needs besides the level itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    /// Gravity magnitude (positive, applied along -Y).
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub fixed_timestep: f32,
    pub max_substeps: u32,
    pub max_frame_delta: f32,
    pub death_floor: f32,
    pub checkpoint_radius: f32,
    pub hazard_radius: f32,
    pub respawn_height: f32,
    pub ground_normal_min_y: f32,
    pub mouse_sensitivity: f32,
    pub camera_distance: f32,
    pub camera_height: f32,
    pub camera_look_height: f32,
    pub player: PlayerSpec,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_MPS2,
            move_speed: MOVE_SPEED_MPS,
            jump_speed: JUMP_SPEED_MPS,
            fixed_timestep: FIXED_TIMESTEP_S,
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta: MAX_FRAME_DELTA_S,
            death_floor: DEATH_FLOOR_Y,
            checkpoint_radius: CHECKPOINT_RADIUS,
            hazard_radius: HAZARD_RADIUS,
            respawn_height: RESPAWN_HEIGHT,
            ground_normal_min_y: GROUND_NORMAL_MIN_Y,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            camera_distance: CAMERA_DISTANCE,
            camera_height: CAMERA_HEIGHT,
            camera_look_height: CAMERA_LOOK_HEIGHT,
            player: PlayerSpec::default(),
        }
    }
}

/// Convert a "fraction of velocity lost per second" into a rapier damping coefficient.
///
/// Rapier scales velocity by `1 / (1 + dt * c)` each step, so we pick `c` such that one
/// step retains exactly `(1 - fraction)^dt`. A fraction of 1 (or more) would need an infinite
/// coefficient and is clamped just below.
#[inline]
pub fn damping_coefficient(fraction_lost_per_second: f32, dt: f32) -> f32 {
    if dt <= 0.0 || fraction_lost_per_second <= 0.0 {
        return 0.0;
    }
    let retained = (1.0 - fraction_lost_per_second).max(1.0e-6);
    let per_step = retained.powf(dt);
    (1.0 / per_step - 1.0) / dt
}
