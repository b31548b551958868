//! Joints between bodies: rope (max distance) and spherical (ball-and-socket).
//!
//! Both are solved by the same position-based projection: the two anchor
//! points are pulled together along the line joining them, split by
//! generalized inverse mass so that an offset anchor also turns its body.

use crate::body::{Body, BodyHandle};
use crate::error::StrapError;
use crate::float::Float;
use crate::vec::Vec3;

/// Identifier of a joint inside a [`PhysicsWorld`](crate::world::PhysicsWorld).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct JointId(pub(crate) u32);

/// Keeps two anchor points no further apart than `max_length`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RopeJoint<F: Float> {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Anchor on `a`, in `a`'s local frame.
    pub anchor_a: Vec3<F>,
    /// Anchor on `b`, in `b`'s local frame.
    pub anchor_b: Vec3<F>,
    pub max_length: F,
}

/// Pins two anchor points together while leaving rotation free.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphericalJoint<F: Float> {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub anchor_a: Vec3<F>,
    pub anchor_b: Vec3<F>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Joint<F: Float> {
    Rope(RopeJoint<F>),
    Spherical(SphericalJoint<F>),
}

impl<F: Float> RopeJoint<F> {
    pub fn new(a: BodyHandle, b: BodyHandle, max_length: F) -> Self {
        RopeJoint { a, b, anchor_a: Vec3::zero(), anchor_b: Vec3::zero(), max_length }
    }

    pub fn with_anchors(mut self, anchor_a: Vec3<F>, anchor_b: Vec3<F>) -> Self {
        self.anchor_a = anchor_a;
        self.anchor_b = anchor_b;
        self
    }

    pub fn solve(&self, a: &mut Body<F>, b: &mut Body<F>) {
        project(a, b, self.anchor_a, self.anchor_b, Some(self.max_length));
    }
}

impl<F: Float> SphericalJoint<F> {
    pub fn new(a: BodyHandle, b: BodyHandle, anchor_a: Vec3<F>, anchor_b: Vec3<F>) -> Self {
        SphericalJoint { a, b, anchor_a, anchor_b }
    }

    pub fn solve(&self, a: &mut Body<F>, b: &mut Body<F>) {
        project(a, b, self.anchor_a, self.anchor_b, None);
    }
}

impl<F: Float> Joint<F> {
    pub fn bodies(&self) -> (BodyHandle, BodyHandle) {
        match self {
            Joint::Rope(j) => (j.a, j.b),
            Joint::Spherical(j) => (j.a, j.b),
        }
    }

    pub fn involves(&self, handle: BodyHandle) -> bool {
        let (a, b) = self.bodies();
        a == handle || b == handle
    }

    pub fn solve(&self, a: &mut Body<F>, b: &mut Body<F>) {
        match self {
            Joint::Rope(j) => j.solve(a, b),
            Joint::Spherical(j) => j.solve(a, b),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StrapError> {
        if let Joint::Rope(j) = self {
            if !(j.max_length.is_finite() && j.max_length > F::zero()) {
                return Err(StrapError::InvalidLength);
            }
        }
        Ok(())
    }

    /// World-space distance between the two anchors.
    pub fn separation(&self, a: &Body<F>, b: &Body<F>) -> F {
        let (anchor_a, anchor_b) = match self {
            Joint::Rope(j) => (j.anchor_a, j.anchor_b),
            Joint::Spherical(j) => (j.anchor_a, j.anchor_b),
        };
        let pa = a.pos + a.rotation.rotate(anchor_a);
        let pb = b.pos + b.rotation.rotate(anchor_b);
        pa.distance(pb)
    }
}

/// Pull the anchors together. With `max_length` the projection only acts
/// when the anchors are further apart than that; without it they are pinned.
fn project<F: Float>(
    a: &mut Body<F>,
    b: &mut Body<F>,
    anchor_a: Vec3<F>,
    anchor_b: Vec3<F>,
    max_length: Option<F>,
) {
    let ra = a.rotation.rotate(anchor_a);
    let rb = b.rotation.rotate(anchor_b);
    let delta = (b.pos + rb) - (a.pos + ra);
    let dist = delta.length();
    if dist.is_near_zero(F::from_f32(1e-9)) {
        return;
    }

    let error = match max_length {
        Some(max) if dist <= max => return,
        Some(max) => dist - max,
        None => dist,
    };

    let n = delta.scale(F::one() / dist);
    let inv_mass_a = a.effective_inv_mass();
    let inv_mass_b = b.effective_inv_mass();
    let inv_inertia_a = a.effective_inv_inertia();
    let inv_inertia_b = b.effective_inv_inertia();

    let w_a = inv_mass_a + inv_inertia_a * ra.cross(n).length_sq();
    let w_b = inv_mass_b + inv_inertia_b * rb.cross(n).length_sq();
    let w_total = w_a + w_b;
    if w_total.is_near_zero(F::from_f32(1e-10)) {
        return; // both immovable
    }

    let impulse = n.scale(error / w_total);

    if a.is_movable() {
        a.pos += impulse.scale(inv_mass_a);
        a.rotation = a.rotation.integrate(ra.cross(impulse).scale(inv_inertia_a));
    }
    if b.is_movable() {
        b.pos -= impulse.scale(inv_mass_b);
        b.rotation = b.rotation.integrate(-rb.cross(impulse).scale(inv_inertia_b));
    }
}
