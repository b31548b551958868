//! Rigid bodies integrated with position-based (Verlet) dynamics.

use crate::error::StrapError;
use crate::float::Float;
use crate::quat::Quat;
use crate::vec::Vec3;

/// How the solver treats a body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves; infinite mass.
    Fixed,
    /// Moved by gravity and joints.
    Dynamic,
    /// Moved only by [`Body::set_next_kinematic_position`]; infinite mass to joints.
    Kinematic,
}

/// Generational handle into a solver's body table.
///
/// A handle whose body has been removed is "expired": lookups return `None`
/// even if the slot has since been reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Parameters for creating a body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc<F: Float> {
    pub kind: BodyKind,
    pub position: Vec3<F>,
    pub rotation: Quat<F>,
    pub mass: F,
    /// Scalar moment of inertia (bodies are treated as rotationally isotropic).
    pub inertia: F,
    pub linear_damping: F,
    pub angular_damping: F,
}

impl<F: Float> BodyDesc<F> {
    pub fn fixed(position: Vec3<F>) -> Self {
        BodyDesc {
            kind: BodyKind::Fixed,
            position,
            rotation: Quat::identity(),
            mass: F::zero(),
            inertia: F::zero(),
            linear_damping: F::zero(),
            angular_damping: F::zero(),
        }
    }

    pub fn dynamic(position: Vec3<F>, mass: F) -> Self {
        BodyDesc {
            kind: BodyKind::Dynamic,
            position,
            rotation: Quat::identity(),
            mass,
            inertia: mass,
            linear_damping: F::zero(),
            angular_damping: F::zero(),
        }
    }

    pub fn with_inertia(mut self, inertia: F) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn with_damping(mut self, linear: F, angular: F) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat<F>) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StrapError> {
        let ok = |v: F| v.is_finite() && v >= F::zero();
        if !ok(self.linear_damping) || !ok(self.angular_damping) {
            return Err(StrapError::InvalidDamping);
        }
        Ok(())
    }
}

/// A rigid body: Verlet position pair plus orientation and angular velocity.
#[derive(Clone, Debug)]
pub struct Body<F: Float> {
    pub kind: BodyKind,
    pub pos: Vec3<F>,
    pub prev_pos: Vec3<F>,
    pub rotation: Quat<F>,
    pub prev_rotation: Quat<F>,
    pub angular_velocity: Vec3<F>,
    pub acceleration: Vec3<F>,
    pub mass: F,
    pub inertia: F,
    pub inv_mass: F,
    pub inv_inertia: F,
    pub linear_damping: F,
    pub angular_damping: F,
    pub sleeping: bool,
    pub(crate) still_steps: u32,
    pub(crate) kinematic_start: Vec3<F>,
    pub(crate) next_kinematic: Option<Vec3<F>>,
}

fn inverse<F: Float>(v: F) -> F {
    if v.is_near_zero(F::from_f32(1e-10)) {
        F::zero()
    } else {
        F::one() / v
    }
}

impl<F: Float> Body<F> {
    pub fn new(desc: &BodyDesc<F>) -> Self {
        let mut body = Body {
            kind: desc.kind,
            pos: desc.position,
            prev_pos: desc.position,
            rotation: desc.rotation.normalize(),
            prev_rotation: desc.rotation.normalize(),
            angular_velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            mass: desc.mass,
            inertia: desc.inertia,
            inv_mass: inverse(desc.mass),
            inv_inertia: inverse(desc.inertia),
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            sleeping: false,
            still_steps: 0,
            kinematic_start: desc.position,
            next_kinematic: None,
        };
        if desc.kind != BodyKind::Dynamic {
            body.inv_mass = F::zero();
            body.inv_inertia = F::zero();
        }
        body
    }

    /// Inverse mass as seen by joints: zero unless the body is awake and dynamic.
    pub fn effective_inv_mass(&self) -> F {
        if self.is_movable() { self.inv_mass } else { F::zero() }
    }

    pub fn effective_inv_inertia(&self) -> F {
        if self.is_movable() { self.inv_inertia } else { F::zero() }
    }

    pub fn is_movable(&self) -> bool {
        self.kind == BodyKind::Dynamic && !self.sleeping
    }

    pub fn apply_acceleration(&mut self, accel: Vec3<F>) {
        if self.is_movable() {
            self.acceleration += accel;
        }
    }

    /// Switch the body kind, keeping its current pose.
    ///
    /// Leaving `Kinematic` drops any pending target; becoming `Dynamic`
    /// restores the mass the body was created with. Fixed and kinematic
    /// bodies hold their orientation, so their spin is cleared.
    pub fn set_kind(&mut self, kind: BodyKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.next_kinematic = None;
        self.kinematic_start = self.pos;
        match kind {
            BodyKind::Dynamic => {
                self.inv_mass = inverse(self.mass);
                self.inv_inertia = inverse(self.inertia);
                self.sleeping = false;
                self.still_steps = 0;
            }
            BodyKind::Fixed | BodyKind::Kinematic => {
                self.inv_mass = F::zero();
                self.inv_inertia = F::zero();
                self.acceleration = Vec3::zero();
                self.angular_velocity = Vec3::zero();
            }
        }
    }

    /// Queue the position a kinematic body must reach by the end of the next step.
    pub fn set_next_kinematic_position(&mut self, target: Vec3<F>) {
        if self.kind == BodyKind::Kinematic {
            self.next_kinematic = Some(target);
        }
    }

    /// Set the spin of a dynamic body. Ignored for fixed and kinematic bodies.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3<F>) {
        if self.kind == BodyKind::Dynamic {
            self.angular_velocity = angular_velocity;
        }
    }

    pub fn next_kinematic_position(&self) -> Option<Vec3<F>> {
        self.next_kinematic
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
        self.still_steps = 0;
    }

    /// Called once per step before sub-stepping.
    pub(crate) fn begin_step(&mut self) {
        if self.kind == BodyKind::Kinematic {
            self.kinematic_start = self.pos;
        }
    }

    /// Called once per step after the last sub-step. A kinematic target is
    /// consumed by the step that reaches it.
    pub(crate) fn end_step(&mut self) {
        self.next_kinematic = None;
    }

    /// Advance one sub-step of length `dt`; `fraction` is how far through the
    /// step this sub-step ends (used to interpolate kinematic targets).
    pub fn integrate(&mut self, dt: F, fraction: F) {
        let last_pos = self.pos;
        let last_rotation = self.rotation;
        match self.kind {
            BodyKind::Fixed => {}
            BodyKind::Kinematic => {
                if let Some(target) = self.next_kinematic {
                    self.pos = self.kinematic_start.lerp(target, fraction);
                }
            }
            BodyKind::Dynamic if !self.sleeping => {
                // Damping is applied as v *= 1 / (1 + dt * c).
                let linear = F::one() / (F::one() + dt * self.linear_damping);
                let angular = F::one() / (F::one() + dt * self.angular_damping);
                let velocity = (self.pos - self.prev_pos).scale(linear);
                self.pos = self.pos + velocity + self.acceleration.scale(dt * dt);
                self.angular_velocity = self.angular_velocity.scale(angular);
                self.rotation = self.rotation.integrate(self.angular_velocity.scale(dt));
            }
            BodyKind::Dynamic => {}
        }
        self.prev_pos = last_pos;
        self.prev_rotation = last_rotation;
        self.acceleration = Vec3::zero();
    }

    /// Re-derive angular velocity from the rotation change after joints moved
    /// the body.
    pub(crate) fn finish_substep(&mut self, dt: F) {
        if self.is_movable() {
            self.angular_velocity = self.rotation.angular_velocity_from(self.prev_rotation, dt);
        }
    }

    /// Velocity over the last sub-step of length `dt`.
    pub fn velocity(&self, dt: F) -> Vec3<F> {
        if dt.is_near_zero(F::from_f32(1e-30)) {
            return Vec3::zero();
        }
        (self.pos - self.prev_pos).scale(F::one() / dt)
    }

    pub fn velocity_raw(&self) -> Vec3<F> {
        self.pos - self.prev_pos
    }
}
