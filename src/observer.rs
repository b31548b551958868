//! Step observer trait for monitoring the physics world.

use crate::body::BodyHandle;

/// Hooks called by [`PhysicsWorld::step`](crate::world::PhysicsWorld::step).
///
/// Useful for debugging overlays and tests that need to see inside a step.
/// All methods default to no-ops.
pub trait StepObserver {
    /// Called after all bodies have been integrated for a sub-step.
    fn on_integrate(&mut self, _sub_step: usize) {}

    /// Called after each joint projection pass.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when a body falls asleep at the end of a step.
    fn on_sleep(&mut self, _body: BodyHandle) {}

    /// Called when the world wakes a sleeping body because a joint partner moved.
    fn on_wake(&mut self, _body: BodyHandle) {}

    /// Called when a step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// Observer that ignores everything.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
