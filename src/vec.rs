//! Vector types for the strap simulation.

use crate::float::Float;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// --------------------------------------------------------------------------
// Vec2<F>: pointer positions in normalized device coordinates
// --------------------------------------------------------------------------

/// 2D vector, used for pointer positions in normalized device coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    pub fn distance(self, other: Self) -> F {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// --------------------------------------------------------------------------
// Vec3<F>: world-space positions, offsets and angular velocities
// --------------------------------------------------------------------------

/// 3D vector for positions, offsets and angular velocities.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    pub fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }

    pub fn splat(value: F) -> Self { Vec3 { x: value, y: value, z: value } }

    pub fn unit_x() -> Self { Vec3::new(F::one(), F::zero(), F::zero()) }

    pub fn unit_y() -> Self { Vec3::new(F::zero(), F::one(), F::zero()) }

    pub fn unit_z() -> Self { Vec3::new(F::zero(), F::zero(), F::one()) }

    /// Build from an `[x, y, z]` array of `f32` literals.
    pub fn from_f32(v: [f32; 3]) -> Self {
        Vec3::new(F::from_f32(v[0]), F::from_f32(v[1]), F::from_f32(v[2]))
    }

    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. Returns the zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    pub fn distance_sq(self, other: Self) -> F {
        (self - other).length_sq()
    }

    /// Linear interpolation: self + (other - self) * t
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self).scale(t)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Any unit vector perpendicular to `self` (assumed non-zero).
    pub fn any_perpendicular(self) -> Self {
        // Cross with the axis the vector is least aligned with.
        let ax = self.x.abs();
        let ay = self.y.abs();
        let az = self.z.abs();
        let other = if ax <= ay && ax <= az {
            Vec3::unit_x()
        } else if ay <= az {
            Vec3::unit_y()
        } else {
            Vec3::unit_z()
        };
        self.cross(other).normalize()
    }

    pub fn to_array(self) -> [F; 3] {
        [self.x, self.y, self.z]
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec3 { x: -self.x, y: -self.y, z: -self.z } }
}

impl<F: Float> AddAssign for Vec3<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> SubAssign for Vec3<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}
