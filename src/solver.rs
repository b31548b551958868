//! The rigid-body solver interface the strap drives.
//!
//! [`Strap`](crate::strap::Strap) only ever talks to a solver through this
//! trait, so the chain can run on [`PhysicsWorld`](crate::world::PhysicsWorld)
//! or on any engine wrapped to fit it.

use crate::body::{BodyDesc, BodyHandle, BodyKind};
use crate::error::StrapError;
use crate::float::Float;
use crate::joint::JointId;
use crate::quat::Quat;
use crate::vec::Vec3;

pub trait RigidBodySolver<F: Float> {
    fn create_body(&mut self, desc: BodyDesc<F>) -> Result<BodyHandle, StrapError>;

    /// Remove a body and every joint attached to it. Returns `false` if the
    /// handle had already expired.
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    fn create_rope_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchor_a: Vec3<F>,
        anchor_b: Vec3<F>,
        max_length: F,
    ) -> Result<JointId, StrapError>;

    fn create_spherical_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchor_a: Vec3<F>,
        anchor_b: Vec3<F>,
    ) -> Result<JointId, StrapError>;

    // Reads return `None` while a handle is not live.

    fn position(&self, body: BodyHandle) -> Option<Vec3<F>>;

    fn rotation(&self, body: BodyHandle) -> Option<Quat<F>>;

    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3<F>>;

    fn kind(&self, body: BodyHandle) -> Option<BodyKind>;

    fn is_sleeping(&self, body: BodyHandle) -> Option<bool>;

    // Writes are ignored for expired handles.

    fn set_kind(&mut self, body: BodyHandle, kind: BodyKind);

    fn set_next_kinematic_position(&mut self, body: BodyHandle, target: Vec3<F>);

    /// Has no effect on fixed or kinematic bodies.
    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: Vec3<F>, wake: bool);

    fn wake(&mut self, body: BodyHandle);
}
