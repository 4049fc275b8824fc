pub mod camera;
pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod level;
pub mod motion;
pub mod rapier_world;
pub mod session;

pub use camera::{CameraRig, follow_camera};
pub use checkpoint::CheckpointTracker;
pub use config::{GameConfig, PlayerSpec};
pub use error::LevelError;
pub use input::{InputState, Key, Look, movement_basis};
pub use level::{Level, PlatformDef, PlatformKind, Rgb};
pub use motion::{Axis, Motion, Pose, Quat, Vec3};
pub use rapier_world::{PhysicsWorld, rapier3d};
pub use session::{FrameReport, GameEvent, GameSession, RespawnCause};
