use std::f32::consts::FRAC_PI_2;

/// Downward gravity magnitude (meters per second squared).
///
/// Much stronger than Earth gravity; the course is tuned for snappy, short jumps.
pub const GRAVITY_MPS2: f32 = 35.0;

/// Planar movement speed while a direction key is held (meters per second).
pub const MOVE_SPEED_MPS: f32 = 15.0;

/// Vertical velocity written into the player body on jump (meters per second).
pub const JUMP_SPEED_MPS: f32 = 15.0;

/// Length of one physics step in seconds.
pub const FIXED_TIMESTEP_S: f32 = 1.0 / 60.0;

/// Maximum number of physics steps taken in a single frame.
pub const MAX_SUBSTEPS: u32 = 3;

/// Wall-clock frame delta is clamped to this before it is fed to the simulation.
///
/// Avoids large catch-up jumps after a stall (window drag, breakpoint, tab switch).
pub const MAX_FRAME_DELTA_S: f32 = 0.1;

/// Falling below this height respawns the player.
pub const DEATH_FLOOR_Y: f32 = -20.0;

/// A checkpoint is reached once the player center is closer than this (meters).
pub const CHECKPOINT_RADIUS: f32 = 15.0;

/// Touching distance for hazard volumes, measured center to center (meters).
pub const HAZARD_RADIUS: f32 = 5.0;

/// Respawns place the player this far above the checkpoint.
pub const RESPAWN_HEIGHT: f32 = 5.0;

/// A contact counts as ground when the normal's Y component is above this.
///
/// 0.5 corresponds to surfaces sloped less than ~60 degrees from horizontal.
pub const GROUND_NORMAL_MIN_Y: f32 = 0.5;

/// Contact points further apart than this are ignored for grounding (meters).
pub const CONTACT_TOLERANCE: f32 = 0.05;

/// Radians of view rotation per pixel of mouse motion.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Pitch is clamped to straight up/down.
pub const MAX_PITCH: f32 = FRAC_PI_2;

/// Follow camera distance behind the player (meters).
pub const CAMERA_DISTANCE: f32 = 12.0;

/// Follow camera height above the player center (meters).
pub const CAMERA_HEIGHT: f32 = 5.0;

/// The camera looks at the player center raised by this much (meters).
pub const CAMERA_LOOK_HEIGHT: f32 = 2.0;

/// Player collider half extents (meters). The visual box is twice this.
pub const PLAYER_HALF_EXTENTS: [f32; 3] = [1.0, 2.5, 0.75];

pub const PLAYER_MASS_KG: f32 = 5.0;

/// Fraction of linear velocity lost per second of free flight.
pub const PLAYER_LINEAR_DAMPING: f32 = 0.9;

/// Fraction of angular velocity lost per second.
pub const PLAYER_ANGULAR_DAMPING: f32 = 0.99;

/// Friction used for both the player and platforms; rapier averages the pair.
pub const SURFACE_FRICTION: f32 = 0.4;

pub const SURFACE_RESTITUTION: f32 = 0.0;

/// Contacts the player is leaving faster than this never count as ground (meters per second).
pub const GROUND_MAX_SEPARATING_SPEED: f32 = 1.0;
