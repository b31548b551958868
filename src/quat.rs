//! Unit quaternions for body orientation.

use crate::float::Float;
use crate::vec::Vec3;
use core::ops::Mul;

/// Rotation quaternion `w + xi + yj + zk`.
///
/// Bodies keep this normalized; [`Quat::integrate`] renormalizes after every
/// update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quat<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
    pub w: F,
}

impl<F: Float> Default for Quat<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Quat<F> {
    pub fn new(x: F, y: F, z: F, w: F) -> Self {
        Quat { x, y, z, w }
    }

    pub fn identity() -> Self {
        Quat { x: F::zero(), y: F::zero(), z: F::zero(), w: F::one() }
    }

    /// Rotation of `angle` radians about `axis` (need not be normalized).
    pub fn from_axis_angle(axis: Vec3<F>, angle: F) -> Self {
        let axis = axis.normalize();
        let half = angle * F::half();
        let s = half.sin();
        Quat { x: axis.x * s, y: axis.y * s, z: axis.z * s, w: half.cos() }
    }

    /// Shortest rotation taking unit vector `from` onto unit vector `to`.
    /// Returns `None` when they point in opposite directions (no unique axis).
    pub fn from_rotation_arc(from: Vec3<F>, to: Vec3<F>) -> Option<Self> {
        let d = from.dot(to);
        if d < F::from_f32(-0.999_999) {
            return None;
        }
        let c = from.cross(to);
        Some(Quat::new(c.x, c.y, c.z, F::one() + d).normalize())
    }

    /// The vector part `(x, y, z)`.
    pub fn vector(self) -> Vec3<F> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Component of the vector part along `axis`. For a rotation of angle
    /// `θ` purely about `axis` this is `sin(θ / 2)`.
    pub fn axis_component(self, axis: Vec3<F>) -> F {
        self.vector().dot(axis)
    }

    pub fn conjugate(self) -> Self {
        Quat { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    pub fn length(self) -> F {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-12)) {
            return Self::identity();
        }
        let inv = F::one() / len;
        Quat { x: self.x * inv, y: self.y * inv, z: self.z * inv, w: self.w * inv }
    }

    /// Rotate a vector by this quaternion.
    pub fn rotate(self, v: Vec3<F>) -> Vec3<F> {
        // v' = v + 2w(u × v) + 2u × (u × v)
        let u = self.vector();
        let t = u.cross(v).scale(F::two());
        v + t.scale(self.w) + u.cross(t)
    }

    /// Advance the orientation by a world-space rotation vector
    /// (`angular velocity * dt`), first-order.
    pub fn integrate(self, rotation: Vec3<F>) -> Self {
        let half = F::half();
        let dq = Quat::new(rotation.x, rotation.y, rotation.z, F::zero()) * self;
        Quat {
            x: self.x + dq.x * half,
            y: self.y + dq.y * half,
            z: self.z + dq.z * half,
            w: self.w + dq.w * half,
        }
        .normalize()
    }

    /// World-space angular velocity that rotates `prev` into `self` in `dt`.
    pub fn angular_velocity_from(self, prev: Self, dt: F) -> Vec3<F> {
        if dt.is_near_zero(F::from_f32(1e-12)) {
            return Vec3::zero();
        }
        let mut dq = self * prev.conjugate();
        if dq.w < F::zero() {
            dq = Quat::new(-dq.x, -dq.y, -dq.z, -dq.w);
        }
        dq.vector().scale(F::two() / dt)
    }
}

impl<F: Float> Mul for Quat<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Quat {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}
