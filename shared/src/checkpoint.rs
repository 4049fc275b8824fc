//! Course progression.
//!
//! The tracker index only ever moves forward. `index == len` means every checkpoint has been
//! passed.

use crate::motion::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointTracker {
    checkpoints: Vec<Vec3>,
    current: usize,
}

impl CheckpointTracker {
    pub fn new(checkpoints: Vec<Vec3>) -> Self {
        Self {
            checkpoints,
            current: 0,
        }
    }

    /// Number of checkpoints reached so far, in `[0, len]`.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current == self.checkpoints.len()
    }

    pub fn checkpoints(&self) -> &[Vec3] {
        &self.checkpoints
    }

    /// The most recently reached checkpoint, if any.
    #[inline]
    pub fn last_reached(&self) -> Option<Vec3> {
        self.current
            .checked_sub(1)
            .map(|i| self.checkpoints[i])
    }

    /// Scan checkpoints from the current index and advance past every one within `radius`.
    ///
    /// The scan keeps overwriting, so if several are in range the furthest along wins.
    /// Returns the new index when it changed.
    pub fn update(&mut self, position: &Vec3, radius: f32) -> Option<usize> {
        let mut next = self.current;
        for (i, checkpoint) in self.checkpoints.iter().enumerate().skip(self.current) {
            if (checkpoint - position).norm() < radius {
                next = i + 1;
            }
        }

        if next > self.current {
            self.current = next;
            Some(next)
        } else {
            None
        }
    }

    /// Where a respawn should place the player, before the height offset.
    #[inline]
    pub fn respawn_anchor(&self, spawn: Vec3) -> Vec3 {
        self.last_reached().unwrap_or(spawn)
    }
}
