use thiserror::Error;

/// Reasons a [`crate::Level`] cannot be turned into a session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LevelError {
    #[error("platform {index} has non-positive or non-finite extents {extents:?}")]
    InvalidExtents { index: usize, extents: [f32; 3] },

    #[error("platform {index} has a non-finite position or tilt")]
    InvalidPlacement { index: usize },

    #[error("platform {index} has a non-finite motion parameter")]
    InvalidMotion { index: usize },

    #[error("checkpoint {index} is not a finite position")]
    InvalidCheckpoint { index: usize },

    #[error("spawn point is not a finite position")]
    InvalidSpawn,
}
