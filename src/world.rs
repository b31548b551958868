//! Reference rigid-body solver: a generational body arena plus joints,
//! stepped with sub-stepped position-based dynamics.

use crate::body::{Body, BodyDesc, BodyHandle, BodyKind};
use crate::config::SolverConfig;
use crate::error::StrapError;
use crate::float::Float;
use crate::joint::{Joint, JointId, RopeJoint, SphericalJoint};
use crate::observer::StepObserver;
use crate::quat::Quat;
use crate::solver::RigidBodySolver;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

struct Slot<F: Float> {
    generation: u32,
    body: Option<Body<F>>,
}

/// Bodies and joints advanced together by [`PhysicsWorld::step`].
pub struct PhysicsWorld<F: Float> {
    slots: AllocVec<Slot<F>>,
    free: AllocVec<u32>,
    joints: AllocVec<(JointId, Joint<F>)>,
    next_joint: u32,
}

impl<F: Float> PhysicsWorld<F> {
    pub fn new() -> Self {
        PhysicsWorld {
            slots: AllocVec::new(),
            free: AllocVec::new(),
            joints: AllocVec::new(),
            next_joint: 0,
        }
    }

    pub fn add_body(&mut self, desc: BodyDesc<F>) -> Result<BodyHandle, StrapError> {
        desc.validate()?;
        let body = Body::new(&desc);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return Ok(BodyHandle { index, generation: slot.generation });
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, body: Some(body) });
        Ok(BodyHandle { index, generation: 0 })
    }

    pub fn remove(&mut self, handle: BodyHandle) -> bool {
        if self.body(handle).is_none() {
            return false;
        }
        let slot = &mut self.slots[handle.index()];
        slot.body = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.joints.retain(|(_, j)| !j.involves(handle));
        true
    }

    pub fn add_joint(&mut self, joint: Joint<F>) -> Result<JointId, StrapError> {
        joint.validate()?;
        let (a, b) = joint.bodies();
        for h in [a, b] {
            if self.body(h).is_none() {
                return Err(StrapError::InvalidBody { index: h.index() });
            }
        }
        if a == b {
            return Err(StrapError::InvalidBody { index: a.index() });
        }
        let id = JointId(self.next_joint);
        self.next_joint += 1;
        self.joints.push((id, joint));
        Ok(id)
    }

    pub fn remove_joint(&mut self, id: JointId) -> Option<Joint<F>> {
        let pos = self.joints.iter().position(|(jid, _)| *jid == id)?;
        Some(self.joints.remove(pos).1)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body<F>> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<F>> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint<F>> {
        self.joints.iter().find(|(jid, _)| *jid == id).map(|(_, j)| j)
    }

    pub fn body_count(&self) -> usize {
        self.slots.iter().filter(|s| s.body.is_some()).count()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Advance the world by `dt`.
    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SolverConfig<F>, observer: &mut O) {
        if dt <= F::zero() {
            observer.on_step_complete();
            return;
        }
        let islands = self.islands();
        self.wake_active_islands(&islands, observer);

        for body in self.live_bodies_mut() {
            body.begin_step();
        }

        let sub_steps = config.sub_steps.max(1);
        let sub_dt = dt / F::from_f32(sub_steps as f32);

        for sub in 0..sub_steps {
            let fraction = F::from_f32((sub + 1) as f32) / F::from_f32(sub_steps as f32);
            for body in self.live_bodies_mut() {
                body.apply_acceleration(config.gravity);
                body.integrate(sub_dt, fraction);
            }
            observer.on_integrate(sub);

            for i in 0..config.iterations {
                for (_, joint) in self.joints.iter() {
                    let (a, b) = joint.bodies();
                    if let Some((body_a, body_b)) = pair_mut(&mut self.slots, a, b) {
                        joint.solve(body_a, body_b);
                    }
                }
                observer.on_constraint_iteration(i);
            }

            for body in self.live_bodies_mut() {
                body.finish_substep(sub_dt);
            }
        }

        for body in self.live_bodies_mut() {
            body.end_step();
        }
        self.update_sleep(&islands, sub_dt, config, observer);
        observer.on_step_complete();
    }

    fn live_bodies_mut(&mut self) -> impl Iterator<Item = &mut Body<F>> {
        self.slots.iter_mut().filter_map(|s| s.body.as_mut())
    }

    /// Island id per slot: bodies joined by joints share an id. Fixed bodies
    /// never join islands, so everything hanging from one anchor is one island
    /// while two chains on two anchors are two.
    fn islands(&self) -> AllocVec<usize> {
        let mut parent: AllocVec<usize> = (0..self.slots.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for (_, joint) in &self.joints {
            let (a, b) = joint.bodies();
            let joins = |h: BodyHandle| {
                self.body(h).map(|b| b.kind != BodyKind::Fixed).unwrap_or(false)
            };
            if joins(a) && joins(b) {
                let ra = find(&mut parent, a.index());
                let rb = find(&mut parent, b.index());
                parent[ra] = rb;
            }
        }
        (0..self.slots.len()).map(|i| find(&mut parent, i)).collect()
    }

    fn wake_active_islands<O: StepObserver>(&mut self, islands: &[usize], observer: &mut O) {
        let mut active = alloc::vec![false; self.slots.len()];
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(body) = &slot.body {
                let driving = match body.kind {
                    BodyKind::Dynamic => !body.sleeping,
                    BodyKind::Kinematic => body.next_kinematic.is_some(),
                    BodyKind::Fixed => false,
                };
                if driving {
                    active[islands[i]] = true;
                }
            }
        }
        for i in 0..self.slots.len() {
            let generation = self.slots[i].generation;
            if let Some(body) = self.slots[i].body.as_mut() {
                if body.sleeping && active[islands[i]] {
                    body.wake();
                    observer.on_wake(BodyHandle { index: i as u32, generation });
                }
            }
        }
    }

    fn update_sleep<O: StepObserver>(
        &mut self,
        islands: &[usize],
        sub_dt: F,
        config: &SolverConfig<F>,
        observer: &mut O,
    ) {
        if config.sleep_after == 0 {
            return;
        }
        let linear_sq = config.sleep_linear_threshold * config.sleep_linear_threshold;
        let angular_sq = config.sleep_angular_threshold * config.sleep_angular_threshold;

        // An island may sleep only if every body in it is ready to.
        let mut restless = alloc::vec![false; self.slots.len()];
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(body) = slot.body.as_mut() else { continue };
            match body.kind {
                BodyKind::Fixed => {}
                BodyKind::Kinematic => {
                    if body.velocity_raw().length_sq() > F::zero() {
                        restless[islands[i]] = true;
                    }
                }
                BodyKind::Dynamic if body.sleeping => {}
                BodyKind::Dynamic => {
                    let v = body.velocity(sub_dt);
                    let still = v.length_sq() < linear_sq
                        && body.angular_velocity.length_sq() < angular_sq;
                    body.still_steps = if still { body.still_steps.saturating_add(1) } else { 0 };
                    if body.still_steps < config.sleep_after {
                        restless[islands[i]] = true;
                    }
                }
            }
        }

        for i in 0..self.slots.len() {
            let generation = self.slots[i].generation;
            let Some(body) = self.slots[i].body.as_mut() else { continue };
            if body.kind == BodyKind::Dynamic && !body.sleeping && !restless[islands[i]] {
                body.sleeping = true;
                body.prev_pos = body.pos;
                body.prev_rotation = body.rotation;
                body.angular_velocity = Vec3::zero();
                observer.on_sleep(BodyHandle { index: i as u32, generation });
            }
        }
    }
}

impl<F: Float> Default for PhysicsWorld<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn pair_mut<F: Float>(
    slots: &mut [Slot<F>],
    a: BodyHandle,
    b: BodyHandle,
) -> Option<(&mut Body<F>, &mut Body<F>)> {
    let (ia, ib) = (a.index(), b.index());
    if ia == ib || ia >= slots.len() || ib >= slots.len() {
        return None;
    }
    let (slot_a, slot_b) = if ia < ib {
        let (lo, hi) = slots.split_at_mut(ib);
        (&mut lo[ia], &mut hi[0])
    } else {
        let (lo, hi) = slots.split_at_mut(ia);
        (&mut hi[0], &mut lo[ib])
    };
    if slot_a.generation != a.generation || slot_b.generation != b.generation {
        return None;
    }
    match (slot_a.body.as_mut(), slot_b.body.as_mut()) {
        (Some(body_a), Some(body_b)) => Some((body_a, body_b)),
        _ => None,
    }
}

impl<F: Float> RigidBodySolver<F> for PhysicsWorld<F> {
    fn create_body(&mut self, desc: BodyDesc<F>) -> Result<BodyHandle, StrapError> {
        self.add_body(desc)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.remove(body)
    }

    fn create_rope_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchor_a: Vec3<F>,
        anchor_b: Vec3<F>,
        max_length: F,
    ) -> Result<JointId, StrapError> {
        let joint = RopeJoint::new(a, b, max_length).with_anchors(anchor_a, anchor_b);
        self.add_joint(Joint::Rope(joint))
    }

    fn create_spherical_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        anchor_a: Vec3<F>,
        anchor_b: Vec3<F>,
    ) -> Result<JointId, StrapError> {
        self.add_joint(Joint::Spherical(SphericalJoint::new(a, b, anchor_a, anchor_b)))
    }

    fn position(&self, body: BodyHandle) -> Option<Vec3<F>> {
        self.body(body).map(|b| b.pos)
    }

    fn rotation(&self, body: BodyHandle) -> Option<Quat<F>> {
        self.body(body).map(|b| b.rotation)
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3<F>> {
        self.body(body).map(|b| b.angular_velocity)
    }

    fn kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.body(body).map(|b| b.kind)
    }

    fn is_sleeping(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(|b| b.sleeping)
    }

    fn set_kind(&mut self, body: BodyHandle, kind: BodyKind) {
        if let Some(b) = self.body_mut(body) {
            b.set_kind(kind);
        }
    }

    fn set_next_kinematic_position(&mut self, body: BodyHandle, target: Vec3<F>) {
        if let Some(b) = self.body_mut(body) {
            b.set_next_kinematic_position(target);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: Vec3<F>, wake: bool) {
        if let Some(b) = self.body_mut(body) {
            if wake {
                b.wake();
            }
            b.set_angular_velocity(angular_velocity);
        }
    }

    fn wake(&mut self, body: BodyHandle) {
        if let Some(b) = self.body_mut(body) {
            b.wake();
        }
    }
}
