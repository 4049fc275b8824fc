//! Poses and platform motion laws.
//!
//! A [`Motion`] describes how a solid platform animates. It is evaluated as a pure function
//! of the platform's resting pose and the session clock, so the same inputs always produce
//! the same kinematic target.

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Convert to nalgebra `Isometry3` for rapier body placement.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.translation), self.rotation)
    }
}

/// World axis a translating platform oscillates along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }
}

/// Animation law of a solid platform.
///
/// Translation and rotation are mutually exclusive; each variant carries only what its law
/// needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Never moves. Backed by a fixed body.
    Static,
    /// `rest + axis * amplitude * sin(speed * t + phase)`.
    ///
    /// A negative amplitude starts the swing in the opposite direction.
    Translating {
        axis: Axis,
        amplitude: f32,
        /// Angular speed of the oscillation (radians per second).
        speed: f32,
        /// Phase offset (radians).
        phase: f32,
    },
    /// Constant spin about +Y at `speed` radians per second, applied on top of the rest tilt.
    Rotating { speed: f32 },
}

impl Motion {
    /// Moving along `axis` with no phase offset.
    pub fn translating(axis: Axis, amplitude: f32, speed: f32) -> Self {
        Motion::Translating {
            axis,
            amplitude,
            speed,
            phase: 0.0,
        }
    }

    pub fn rotating(speed: f32) -> Self {
        Motion::Rotating { speed }
    }

    /// True when the platform needs a kinematic body.
    #[inline]
    pub fn is_animated(&self) -> bool {
        !matches!(self, Motion::Static)
    }

    /// Pose of a platform resting at `rest` after `t` seconds of session time.
    pub fn pose_at(&self, rest: &Pose, t: f32) -> Pose {
        match *self {
            Motion::Static => *rest,
            Motion::Translating {
                axis,
                amplitude,
                speed,
                phase,
            } => {
                let offset = amplitude * (speed * t + phase).sin();
                Pose::new(rest.translation + axis.unit() * offset, rest.rotation)
            }
            Motion::Rotating { speed } => {
                let spin = Quat::from_axis_angle(&Vec3::y_axis(), speed * t);
                Pose::new(rest.translation, spin * rest.rotation)
            }
        }
    }

    /// Every parameter is a finite number.
    pub(crate) fn is_finite(&self) -> bool {
        match *self {
            Motion::Static => true,
            Motion::Translating {
                amplitude,
                speed,
                phase,
                ..
            } => amplitude.is_finite() && speed.is_finite() && phase.is_finite(),
            Motion::Rotating { speed } => speed.is_finite(),
        }
    }
}
