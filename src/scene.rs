//! Frame driver: runs the strap update, then advances the world on a fixed
//! timestep.

use crate::body::BodyKind;
use crate::camera::Ray;
use crate::config::SolverConfig;
use crate::drag::PointerId;
use crate::error::StrapError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::preset::Preset;
use crate::quat::Quat;
use crate::solver::RigidBodySolver;
use crate::strap::{FrameInput, FrameReport, Strap};
use crate::vec::Vec3;
use crate::world::PhysicsWorld;

/// Turns variable frame deltas into a whole number of fixed steps.
///
/// Leftover time carries over to the next frame. When a frame would need more
/// than `max_steps`, the backlog is dropped instead of growing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTimestep<F: Float> {
    step: F,
    max_steps: u32,
    accumulator: F,
}

impl<F: Float> FixedTimestep<F> {
    pub fn new(step: F) -> Self {
        FixedTimestep { step, max_steps: 8, accumulator: F::zero() }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn step(&self) -> F {
        self.step
    }

    pub fn accumulator(&self) -> F {
        self.accumulator
    }

    /// Add `delta` seconds and return how many steps to run now.
    pub fn advance(&mut self, delta: F) -> u32 {
        if !(delta.is_finite() && delta > F::zero()) || self.step <= F::zero() {
            return 0;
        }
        self.accumulator = self.accumulator + delta;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator = self.accumulator - self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            log::trace!("timestep backlog dropped: {:?}s", self.accumulator);
            self.accumulator = F::zero();
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = F::zero();
    }
}

impl<F: Float> Default for FixedTimestep<F> {
    fn default() -> Self {
        Self::new(F::one() / F::from_f32(60.0))
    }
}

/// A strap hanging in its own [`PhysicsWorld`].
pub struct Scene<F: Float> {
    world: PhysicsWorld<F>,
    strap: Strap<F>,
    solver: SolverConfig<F>,
    timestep: FixedTimestep<F>,
}

impl<F: Float> Scene<F> {
    /// Build a fresh world holding the preset's chain.
    pub fn new(preset: &Preset<F>) -> Result<Self, StrapError> {
        let mut world = PhysicsWorld::new();
        let strap = Strap::build(&preset.chain, preset.strap, &mut world)?;
        Ok(Self::from_parts(world, strap, preset.solver.clone()))
    }

    pub fn from_parts(world: PhysicsWorld<F>, strap: Strap<F>, solver: SolverConfig<F>) -> Self {
        Scene { world, strap, solver, timestep: FixedTimestep::default() }
    }

    pub fn with_timestep(mut self, timestep: FixedTimestep<F>) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn world(&self) -> &PhysicsWorld<F> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld<F> {
        &mut self.world
    }

    pub fn strap(&self) -> &Strap<F> {
        &self.strap
    }

    pub fn solver_config(&self) -> &SolverConfig<F> {
        &self.solver
    }

    pub fn timestep(&self) -> &FixedTimestep<F> {
        &self.timestep
    }

    pub fn pointer_down(&mut self, pointer: PointerId, hit_point: Vec3<F>) -> Result<(), StrapError> {
        self.strap.on_pointer_down(&mut self.world, pointer, hit_point)
    }

    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<PointerId> {
        self.strap.on_pointer_up(&mut self.world, pointer)
    }

    /// Strap update followed by however many fixed steps `input.delta` buys.
    pub fn frame(&mut self, input: &FrameInput<F>) -> FrameReport<F> {
        self.frame_observed(input, &mut NoOpStepObserver)
    }

    pub fn frame_observed<O: StepObserver>(&mut self, input: &FrameInput<F>, observer: &mut O) -> FrameReport<F> {
        let report = self.strap.on_frame(&mut self.world, input);
        let steps = self.timestep.advance(input.delta);
        for _ in 0..steps {
            self.world.step(self.timestep.step(), &self.solver, observer);
        }
        report
    }

    /// Where `ray` first hits the card's box, if it does.
    pub fn hit_card(&self, ray: &Ray<F>) -> Option<Vec3<F>> {
        let (center, rotation) = self.card_transform()?;
        let axes = [
            rotation.rotate(Vec3::unit_x()),
            rotation.rotate(Vec3::unit_y()),
            rotation.rotate(Vec3::unit_z()),
        ];
        let half = self.strap.chain().card_half_extents();
        ray.intersect_box(center, axes, half).map(|t| ray.at(t))
    }

    pub fn card_transform(&self) -> Option<(Vec3<F>, Quat<F>)> {
        let card = self.strap.chain().card();
        Some((self.world.position(card)?, self.world.rotation(card)?))
    }

    pub fn card_kind(&self) -> Option<BodyKind> {
        self.world.kind(self.strap.chain().card())
    }

    /// Remove the strap's bodies and hand the world back.
    pub fn teardown(self) -> PhysicsWorld<F> {
        let Scene { mut world, strap, .. } = self;
        strap.teardown(&mut world);
        world
    }
}
