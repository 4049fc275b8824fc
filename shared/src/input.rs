//! Keyboard and mouse-look state, and its mapping to player velocity.
//!
//! The client writes into [`InputState`] from its input systems; the session reads it once
//! per frame.

use std::collections::HashSet;

use nalgebra as na;

use crate::{
    constants::MAX_PITCH,
    motion::{Quat, Vec3},
};

/// Logical keys, independent of the physical binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

/// Accumulated mouse-look angles (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Look {
    pub yaw: f32,
    /// Always within `[-MAX_PITCH, MAX_PITCH]`.
    pub pitch: f32,
}

impl Look {
    /// Apply a mouse delta in pixels.
    pub fn apply_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pressed: HashSet<Key>,
    pub look: Look,
}

impl InputState {
    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    /// Horizontal velocity (x, z) requested by the held direction keys.
    pub fn desired_velocity(&self, move_speed: f32) -> na::Vector2<f32> {
        desired_velocity(
            movement_basis(self.look.yaw),
            self.axis(Key::Forward, Key::Back),
            self.axis(Key::Right, Key::Left),
            move_speed,
        )
    }

    fn axis(&self, positive: Key, negative: Key) -> f32 {
        let mut value = 0.0;
        if self.is_pressed(positive) {
            value += 1.0;
        }
        if self.is_pressed(negative) {
            value -= 1.0;
        }
        value
    }
}

/// Yaw-only movement frame: where "forward" and "right" point on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

/// Rotate the rest frame (forward = -Z, right = +X) about +Y by `yaw`.
pub fn movement_basis(yaw: f32) -> MovementBasis {
    let q = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
    MovementBasis {
        forward: q * Vec3::new(0.0, 0.0, -1.0),
        right: q * Vec3::new(1.0, 0.0, 0.0),
    }
}

/// Sum the forward and strafe contributions and cap the result at `move_speed`.
///
/// `forward_axis` and `right_axis` are in `[-1, 1]`. Diagonals are scaled back so they are no
/// faster than a single direction.
pub fn desired_velocity(
    basis: MovementBasis,
    forward_axis: f32,
    right_axis: f32,
    move_speed: f32,
) -> na::Vector2<f32> {
    let v = (basis.forward * forward_axis + basis.right * right_axis) * move_speed;
    let planar = na::Vector2::new(v.x, v.z);

    let len = planar.norm();
    if len > move_speed && len > 0.0 {
        planar * (move_speed / len)
    } else {
        planar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MOUSE_SENSITIVITY, MOVE_SPEED_MPS};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: na::Vector2<f32>, b: na::Vector2<f32>) -> bool {
        (a - b).norm() < 1.0e-4
    }

    #[test]
    fn rest_basis_faces_negative_z() {
        let basis = movement_basis(0.0);
        assert!((basis.forward - Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-6);
        assert!((basis.right - Vec3::new(1.0, 0.0, 0.0)).norm() < 1.0e-6);
    }

    #[test]
    fn basis_is_yaw_only() {
        let mut input = InputState::default();
        input.look.pitch = 1.2;
        input.look.yaw = 0.7;
        let basis = movement_basis(input.look.yaw);
        assert!(basis.forward.y.abs() < 1.0e-6);
        assert!(basis.right.y.abs() < 1.0e-6);
        assert!(basis.forward.dot(&basis.right).abs() < 1.0e-6);
    }

    #[test]
    fn no_keys_means_no_velocity() {
        let input = InputState::default();
        assert_eq!(input.desired_velocity(MOVE_SPEED_MPS), na::Vector2::zeros());
    }

    #[test]
    fn forward_moves_along_view() {
        let mut input = InputState::default();
        input.set(Key::Forward, true);
        assert!(close(
            input.desired_velocity(MOVE_SPEED_MPS),
            na::Vector2::new(0.0, -MOVE_SPEED_MPS)
        ));

        input.look.yaw = FRAC_PI_2;
        assert!(close(
            input.desired_velocity(MOVE_SPEED_MPS),
            na::Vector2::new(-MOVE_SPEED_MPS, 0.0)
        ));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::default();
        input.set(Key::Forward, true);
        input.set(Key::Back, true);
        input.set(Key::Left, true);
        input.set(Key::Right, true);
        assert!(close(input.desired_velocity(10.0), na::Vector2::zeros()));
    }

    #[test]
    fn diagonal_is_capped_at_move_speed() {
        let mut input = InputState::default();
        input.set(Key::Forward, true);
        input.set(Key::Left, true);

        let v = input.desired_velocity(MOVE_SPEED_MPS);
        assert!((v.norm() - MOVE_SPEED_MPS).abs() < 1.0e-4);
        assert!(v.x < 0.0 && v.y < 0.0);
    }

    #[test]
    fn releasing_keys_stops_movement() {
        let mut input = InputState::default();
        input.set(Key::Right, true);
        input.set(Key::Right, false);
        assert!(!input.is_pressed(Key::Right));

        input.set(Key::Jump, true);
        input.release_all();
        assert!(!input.is_pressed(Key::Jump));
    }

    #[test]
    fn pitch_is_clamped_yaw_is_not() {
        let mut look = Look::default();
        look.apply_delta(0.0, -10_000.0, MOUSE_SENSITIVITY);
        assert_eq!(look.pitch, MAX_PITCH);

        look.apply_delta(0.0, 50_000.0, MOUSE_SENSITIVITY);
        assert_eq!(look.pitch, -MAX_PITCH);

        look.apply_delta(10_000.0, 0.0, MOUSE_SENSITIVITY);
        assert!(look.yaw > 2.0 * PI);
    }
}
