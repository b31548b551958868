//! The strap controller: drag handling plus the per-frame strap rebuild.
//!
//! A [`Strap`] owns no bodies itself. It holds the [`Chain`]'s handles and
//! drives whatever [`RigidBodySolver`] the host passes in, so every read goes
//! back to the solver each frame.

use crate::body::{BodyHandle, BodyKind};
use crate::camera::Camera;
use crate::chain::{Chain, ChainSpec, MAX_LINKS};
use crate::config::StrapConfig;
use crate::curve::CatmullRomCurve;
use crate::drag::{DragState, PointerId};
use crate::error::StrapError;
use crate::float::Float;
use crate::geometry::StrapGeometry;
use crate::quat::Quat;
use crate::smoothing::LinkSmoother;
use crate::solver::RigidBodySolver;
use crate::vec::{Vec2, Vec3};
use alloc::vec::Vec as AllocVec;

/// What the frame scheduler hands [`Strap::on_frame`].
#[derive(Copy, Clone, Debug)]
pub struct FrameInput<F: Float> {
    /// Seconds since the scene started.
    pub elapsed: F,
    /// Seconds since the previous frame.
    pub delta: F,
    /// Pointer position in normalized device coordinates.
    pub pointer_ndc: Vec2<F>,
    pub camera: Camera<F>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Curve, geometry and card were updated.
    Updated,
    /// A chain handle was not live; nothing was touched this frame.
    NotReady,
}

/// Outcome of one [`Strap::on_frame`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameReport<F: Float> {
    pub status: FrameStatus,
    /// Card kind after the frame's mode synchronisation.
    pub card_kind: Option<BodyKind>,
    /// Kinematic target written this frame, if any.
    pub kinematic_target: Option<Vec3<F>>,
    /// A drag was in progress but the pointer ray missed the drag plane.
    pub drag_skipped: bool,
}

impl<F: Float> FrameReport<F> {
    fn not_ready() -> Self {
        FrameReport {
            status: FrameStatus::NotReady,
            card_kind: None,
            kinematic_target: None,
            drag_skipped: false,
        }
    }
}

/// Positions read back from the solver at the start of a frame.
struct ChainPose<F: Float> {
    anchor: Vec3<F>,
    links: [Vec3<F>; MAX_LINKS],
    link_count: usize,
    card: Vec3<F>,
    card_rotation: Quat<F>,
    card_angular_velocity: Vec3<F>,
}

#[derive(Clone, Debug)]
pub struct Strap<F: Float> {
    chain: Chain<F>,
    config: StrapConfig<F>,
    drag: DragState<F>,
    smoother: Option<LinkSmoother<F>>,
    curve: CatmullRomCurve<F>,
    geometry: StrapGeometry<F>,
    control: AllocVec<Vec3<F>>,
}

impl<F: Float> Strap<F> {
    /// Wrap an already-built chain.
    pub fn new(chain: Chain<F>, config: StrapConfig<F>) -> Self {
        let control_len = chain.links().len() + 1;
        Strap {
            smoother: config.smoothing.map(LinkSmoother::new),
            curve: CatmullRomCurve::new(AllocVec::with_capacity(control_len), config.curve),
            geometry: StrapGeometry::new(),
            control: AllocVec::with_capacity(control_len),
            drag: DragState::Idle,
            chain,
            config,
        }
    }

    /// Build the chain described by `spec` into `solver` and wrap it.
    pub fn build<S: RigidBodySolver<F>>(
        spec: &ChainSpec<F>,
        config: StrapConfig<F>,
        solver: &mut S,
    ) -> Result<Self, StrapError> {
        Ok(Self::new(Chain::build(spec, solver)?, config))
    }

    pub fn chain(&self) -> &Chain<F> {
        &self.chain
    }

    pub fn config(&self) -> &StrapConfig<F> {
        &self.config
    }

    pub fn drag_state(&self) -> DragState<F> {
        self.drag
    }

    pub fn smoother(&self) -> Option<&LinkSmoother<F>> {
        self.smoother.as_ref()
    }

    /// Curve fitted on the last updated frame. Its first control point is the
    /// card-side link, its last the anchor.
    pub fn curve(&self) -> &CatmullRomCurve<F> {
        &self.curve
    }

    /// Geometry rebuilt on the last updated frame.
    pub fn geometry(&self) -> &StrapGeometry<F> {
        &self.geometry
    }

    /// Grab the card at `hit_point` (world space, on the card's collider).
    ///
    /// The card becomes kinematic before this returns. Grabbing again while a
    /// drag is in progress replaces the pointer and offset.
    pub fn on_pointer_down<S: RigidBodySolver<F>>(
        &mut self,
        solver: &mut S,
        pointer: PointerId,
        hit_point: Vec3<F>,
    ) -> Result<(), StrapError> {
        let card = self.chain.card();
        let card_pos = solver.position(card).ok_or(StrapError::NotReady)?;
        if let Some(previous) = self.drag.captured_pointer() {
            log::debug!("pointer {:?} replaces drag held by {:?}", pointer, previous);
        }
        self.drag.grab(pointer, hit_point, card_pos);
        solver.set_kind(card, BodyKind::Kinematic);
        log::debug!("drag start: pointer {:?}", pointer);
        Ok(())
    }

    /// Let go of the card. Safe to call when no drag is in progress. Returns
    /// the pointer whose capture was released.
    pub fn on_pointer_up<S: RigidBodySolver<F>>(&mut self, solver: &mut S, pointer: PointerId) -> Option<PointerId> {
        let released = self.drag.release();
        match released {
            Some(held) if held != pointer => {
                log::debug!("drag stop: pointer {:?} released drag held by {:?}", pointer, held)
            }
            Some(_) => log::debug!("drag stop: pointer {:?}", pointer),
            None => {}
        }
        solver.set_kind(self.chain.card(), BodyKind::Dynamic);
        released
    }

    /// Per-frame update, run before the solver steps.
    pub fn on_frame<S: RigidBodySolver<F>>(&mut self, solver: &mut S, input: &FrameInput<F>) -> FrameReport<F> {
        let pose = match self.read_pose(solver) {
            Some(pose) => pose,
            None => {
                log::trace!("chain not ready, frame skipped");
                return FrameReport::not_ready();
            }
        };

        let card = self.chain.card();
        let wanted = if self.drag.is_dragging() { BodyKind::Kinematic } else { BodyKind::Dynamic };
        if solver.kind(card) != Some(wanted) {
            solver.set_kind(card, wanted);
        }

        let mut kinematic_target = None;
        let mut drag_skipped = false;
        if self.drag.is_dragging() {
            match self.drag_target(&input.camera, input.pointer_ndc, pose.anchor) {
                Ok(target) => {
                    for body in self.chain.bodies() {
                        solver.wake(body);
                    }
                    solver.set_next_kinematic_position(card, target);
                    kinematic_target = Some(target);
                }
                Err(e) => {
                    log::warn!("{}, kinematic target skipped", e);
                    drag_skipped = true;
                }
            }
        }

        self.rebuild_strap(&pose, input.delta);
        if !self.drag.is_dragging() {
            self.damp_spin(solver, card, &pose);
        }

        FrameReport {
            status: FrameStatus::Updated,
            card_kind: solver.kind(card),
            kinematic_target,
            drag_skipped,
        }
    }

    /// Release the drag and remove the chain from the solver.
    pub fn teardown<S: RigidBodySolver<F>>(mut self, solver: &mut S) {
        self.drag.release();
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.clear();
        }
        log::debug!("strap teardown: removing {} bodies", self.chain.links().len() + 2);
        self.chain.release(solver);
    }

    fn read_pose<S: RigidBodySolver<F>>(&self, solver: &S) -> Option<ChainPose<F>> {
        let card = self.chain.card();
        let mut links = [Vec3::zero(); MAX_LINKS];
        let handles = self.chain.links();
        for (slot, handle) in links.iter_mut().zip(handles) {
            *slot = solver.position(*handle)?;
        }
        Some(ChainPose {
            anchor: solver.position(self.chain.anchor())?,
            links,
            link_count: handles.len().min(MAX_LINKS),
            card: solver.position(card)?,
            card_rotation: solver.rotation(card)?,
            card_angular_velocity: solver.angular_velocity(card)?,
        })
    }

    /// Pointer ray hit on the camera-facing plane through the anchor, minus
    /// the grab offset.
    fn drag_target(&self, camera: &Camera<F>, ndc: Vec2<F>, anchor: Vec3<F>) -> Result<Vec3<F>, StrapError> {
        let hit = camera
            .ray(ndc)
            .intersect_plane(&camera.facing_plane(anchor))
            .ok_or(StrapError::DegenerateRay)?;
        self.drag.target(hit).ok_or(StrapError::NotReady)
    }

    fn rebuild_strap(&mut self, pose: &ChainPose<F>, dt: F) {
        let last = pose.link_count - 1;
        self.control.clear();
        self.control.push(pose.links[last]);
        // Interior links, card side first.
        for index in (0..last).rev() {
            let raw = pose.links[index];
            let point = match self.smoother.as_mut() {
                Some(smoother) => smoother.update(index, raw, dt),
                None => raw,
            };
            self.control.push(point);
        }
        self.control.push(pose.anchor);

        self.curve.set_points(&self.control);
        self.geometry.rebuild(&self.curve, &self.config.geometry);
        log::trace!("strap rebuilt, card at {:?}", pose.card);
    }

    /// Reduce the card's spin about the damping axis in proportion to how far
    /// it is already turned about that axis. Only a dynamic card spins, so this
    /// is skipped while dragging.
    fn damp_spin<S: RigidBodySolver<F>>(&self, solver: &mut S, card: BodyHandle, pose: &ChainPose<F>) {
        let spin = self.config.spin;
        let turned = pose.card_rotation.axis_component(spin.axis);
        let omega = pose.card_angular_velocity - spin.axis.scale(turned * spin.factor);
        solver.set_angular_velocity(card, omega, true);
    }
}
