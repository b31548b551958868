//! Perspective camera: unproject pointer positions into world-space rays.

use crate::float::Float;
use crate::vec::{Vec2, Vec3};

/// Half-line from `origin` along unit `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<F: Float> {
    pub origin: Vec3<F>,
    pub direction: Vec3<F>,
}

/// Plane `{ p : normal · p = normal · point }`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<F: Float> {
    pub point: Vec3<F>,
    pub normal: Vec3<F>,
}

impl<F: Float> Ray<F> {
    pub fn new(origin: Vec3<F>, direction: Vec3<F>) -> Self {
        Ray { origin, direction: direction.normalize() }
    }

    pub fn at(&self, distance: F) -> Vec3<F> {
        self.origin + self.direction.scale(distance)
    }

    /// Forward intersection with `plane`. `None` if the ray is parallel to the
    /// plane, starts on it, or points away from it.
    pub fn intersect_plane(&self, plane: &Plane<F>) -> Option<Vec3<F>> {
        let eps = F::from_f32(1e-6);
        let denom = plane.normal.dot(self.direction);
        if denom.is_near_zero(eps) {
            return None;
        }
        let offset = plane.normal.dot(plane.point - self.origin);
        if offset.is_near_zero(eps) {
            return None;
        }
        let distance = offset / denom;
        if distance <= F::zero() || !distance.is_finite() {
            return None;
        }
        Some(self.at(distance))
    }

    /// Distance to the nearest hit on an oriented box, if any (slab test in
    /// the box's frame).
    pub fn intersect_box(
        &self,
        center: Vec3<F>,
        axes: [Vec3<F>; 3],
        half_extents: Vec3<F>,
    ) -> Option<F> {
        let delta = center - self.origin;
        let extents = half_extents.to_array();
        let mut t_min = F::zero();
        let mut t_max = F::from_f32(f32::MAX);
        for (axis, half) in axes.iter().zip(extents) {
            let e = axis.dot(delta);
            let f = axis.dot(self.direction);
            if f.is_near_zero(F::from_f32(1e-9)) {
                if -e - half > F::zero() || -e + half < F::zero() {
                    return None;
                }
                continue;
            }
            let mut t1 = (e + half) / f;
            let mut t2 = (e - half) / f;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Pinhole camera looking from `position` toward a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera<F: Float> {
    pub position: Vec3<F>,
    forward: Vec3<F>,
    right: Vec3<F>,
    up: Vec3<F>,
    /// tan(fov_y / 2)
    tan_half_fov: F,
    aspect: F,
}

impl<F: Float> Camera<F> {
    /// `fov_y_degrees` is the vertical field of view; `aspect` is width / height.
    pub fn look_at(position: Vec3<F>, target: Vec3<F>, up: Vec3<F>, fov_y_degrees: F, aspect: F) -> Self {
        let forward = (target - position).normalize();
        let mut right = forward.cross(up).normalize();
        if right == Vec3::zero() {
            right = forward.any_perpendicular();
        }
        let up = right.cross(forward).normalize();
        Camera {
            position,
            forward,
            right,
            up,
            tan_half_fov: (fov_y_degrees.to_radians() * F::half()).tan(),
            aspect,
        }
    }

    pub fn forward(&self) -> Vec3<F> {
        self.forward
    }

    pub fn set_aspect(&mut self, aspect: F) {
        self.aspect = aspect;
    }

    /// Ray from the camera through a pointer position in normalized device
    /// coordinates (x right, y up, both in [-1, 1]).
    pub fn ray(&self, ndc: Vec2<F>) -> Ray<F> {
        let dir = self.forward
            + self.right.scale(ndc.x * self.tan_half_fov * self.aspect)
            + self.up.scale(ndc.y * self.tan_half_fov);
        Ray::new(self.position, dir)
    }

    /// Project a world point to normalized device coordinates. `None` for
    /// points at or behind the camera plane.
    pub fn project(&self, world: Vec3<F>) -> Option<Vec2<F>> {
        let rel = world - self.position;
        let depth = rel.dot(self.forward);
        if depth <= F::from_f32(1e-6) {
            return None;
        }
        let x = rel.dot(self.right) / (depth * self.tan_half_fov * self.aspect);
        let y = rel.dot(self.up) / (depth * self.tan_half_fov);
        Some(Vec2::new(x, y))
    }

    /// Plane facing the camera through `point`; pointer drags move along it.
    pub fn facing_plane(&self, point: Vec3<F>) -> Plane<F> {
        Plane { point, normal: self.forward }
    }
}
