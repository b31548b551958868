use lanyard::{
    BodyDesc, BodyKind, Joint, NoOpStepObserver, PhysicsWorld, RigidBodySolver, RopeJoint,
    SolverConfig, StepObserver, StrapError, Vec3,
};

const DT: f32 = 1.0 / 60.0;

fn gravity() -> SolverConfig<f32> {
    SolverConfig::new().with_gravity(Vec3::new(0.0, -9.81, 0.0))
}

/// Fixed anchor at the origin with one body hanging off a rope, starting
/// level with the anchor.
fn pendulum(length: f32) -> (PhysicsWorld<f32>, lanyard::BodyHandle, lanyard::BodyHandle) {
    let mut world = PhysicsWorld::new();
    let anchor = world.add_body(BodyDesc::fixed(Vec3::zero())).unwrap();
    let bob = world
        .add_body(BodyDesc::dynamic(Vec3::new(length, 0.0, 0.0), 1.0).with_damping(4.0, 4.0))
        .unwrap();
    world.create_rope_joint(anchor, bob, Vec3::zero(), Vec3::zero(), length).unwrap();
    (world, anchor, bob)
}

#[test]
fn fixed_body_never_moves() {
    let (mut world, anchor, _) = pendulum(1.0);
    for _ in 0..200 {
        world.step(DT, &gravity(), &mut NoOpStepObserver);
    }
    assert_eq!(world.position(anchor), Some(Vec3::zero()));
}

#[test]
fn free_body_falls() {
    let mut world = PhysicsWorld::new();
    let h = world.add_body(BodyDesc::dynamic(Vec3::new(0.0, 10.0, 0.0), 1.0)).unwrap();
    for _ in 0..30 {
        world.step(DT, &gravity(), &mut NoOpStepObserver);
    }
    let y = world.position(h).unwrap().y;
    // Half a second of free fall: about 1.2 units.
    assert!(y < 9.0 && y > 8.5, "y = {}", y);
}

#[test]
fn rope_limits_distance() {
    let (mut world, anchor, bob) = pendulum(2.0);
    for i in 0..300 {
        world.step(DT, &gravity(), &mut NoOpStepObserver);
        let d = world.position(anchor).unwrap().distance(world.position(bob).unwrap());
        assert!(d < 2.0 + 0.02, "step {}: rope stretched to {}", i, d);
    }
    let bob_pos = world.position(bob).unwrap();
    assert!(bob_pos.y < -1.9, "bob should hang below the anchor, got {:?}", bob_pos);
}

#[test]
fn slack_rope_does_not_pull() {
    let mut world = PhysicsWorld::new();
    let anchor = world.add_body(BodyDesc::fixed(Vec3::zero())).unwrap();
    let bob = world.add_body(BodyDesc::dynamic(Vec3::new(0.5, 0.0, 0.0), 1.0)).unwrap();
    world.create_rope_joint(anchor, bob, Vec3::zero(), Vec3::zero(), 5.0).unwrap();
    let no_gravity = SolverConfig::new().with_gravity(Vec3::zero());
    for _ in 0..60 {
        world.step(DT, &no_gravity, &mut NoOpStepObserver);
    }
    assert_eq!(world.position(bob), Some(Vec3::new(0.5, 0.0, 0.0)));
}

#[test]
fn spherical_joint_pins_offset_anchor() {
    let mut world = PhysicsWorld::new();
    let anchor = world.add_body(BodyDesc::fixed(Vec3::zero())).unwrap();
    let card = world
        .add_body(BodyDesc::dynamic(Vec3::new(1.0, -1.0, 0.0), 1.0).with_damping(2.0, 2.0))
        .unwrap();
    let offset = Vec3::new(0.0, 1.45, 0.0);
    let id = world.create_spherical_joint(anchor, card, Vec3::zero(), offset).unwrap();

    for _ in 0..600 {
        world.step(DT, &gravity(), &mut NoOpStepObserver);
    }
    let joint = world.joint(id).unwrap();
    let gap = joint.separation(world.body(anchor).unwrap(), world.body(card).unwrap());
    assert!(gap < 0.02, "anchors {} apart", gap);
    let card_pos = world.position(card).unwrap();
    assert!((card_pos.y + 1.45).abs() < 0.1, "card should hang 1.45 below, got {:?}", card_pos);
}

#[test]
fn removed_handle_expires_even_when_slot_is_reused() {
    let (mut world, _, bob) = pendulum(1.0);
    assert!(world.remove_body(bob));
    assert!(!world.remove_body(bob), "second removal reports the handle as expired");
    assert_eq!(world.position(bob), None);
    assert_eq!(world.joint_count(), 0, "joints touching the body go with it");

    let reused = world.add_body(BodyDesc::dynamic(Vec3::zero(), 1.0)).unwrap();
    assert_eq!(reused.index(), bob.index());
    assert_eq!(world.position(bob), None);
    assert!(world.position(reused).is_some());
}

#[test]
fn joint_validation() {
    let (mut world, anchor, bob) = pendulum(1.0);
    let bad_length = world.create_rope_joint(anchor, bob, Vec3::zero(), Vec3::zero(), 0.0);
    assert_eq!(bad_length, Err(StrapError::InvalidLength));
    let self_joint = world.add_joint(Joint::Rope(RopeJoint::new(bob, bob, 1.0)));
    assert!(matches!(self_joint, Err(StrapError::InvalidBody { .. })));

    world.remove_body(bob);
    let dangling = world.create_spherical_joint(anchor, bob, Vec3::zero(), Vec3::zero());
    assert_eq!(dangling, Err(StrapError::InvalidBody { index: bob.index() }));
}

#[test]
fn negative_damping_rejected() {
    let mut world = PhysicsWorld::<f32>::new();
    let desc = BodyDesc::dynamic(Vec3::zero(), 1.0).with_damping(-1.0, 0.0);
    assert_eq!(world.add_body(desc), Err(StrapError::InvalidDamping));
}

#[test]
fn kinematic_body_reaches_target_then_holds() {
    let mut world = PhysicsWorld::new();
    let h = world.add_body(BodyDesc::dynamic(Vec3::zero(), 1.0)).unwrap();
    world.set_kind(h, BodyKind::Kinematic);
    let target = Vec3::new(1.0, 2.0, 0.0);
    world.set_next_kinematic_position(h, target);

    world.step(DT, &gravity(), &mut NoOpStepObserver);
    assert!(world.position(h).unwrap().distance(target) < 1e-5);
    assert_eq!(world.body(h).unwrap().next_kinematic_position(), None);

    world.step(DT, &gravity(), &mut NoOpStepObserver);
    assert!(world.position(h).unwrap().distance(target) < 1e-5, "gravity does not act on kinematic bodies");
}

#[test]
fn kinematic_body_holds_orientation() {
    let mut world = PhysicsWorld::new();
    let h = world.add_body(BodyDesc::dynamic(Vec3::zero(), 1.0)).unwrap();
    world.set_angular_velocity(h, Vec3::new(3.0, 0.0, 0.0), true);
    world.step(DT, &gravity(), &mut NoOpStepObserver);

    world.set_kind(h, BodyKind::Kinematic);
    assert_eq!(world.angular_velocity(h), Some(Vec3::zero()), "spin is cleared on becoming kinematic");
    world.set_angular_velocity(h, Vec3::new(0.0, 2.0, 0.0), true);
    assert_eq!(world.angular_velocity(h), Some(Vec3::zero()), "kinematic bodies ignore spin writes");

    let start = world.rotation(h).unwrap();
    for _ in 0..60 {
        world.step(DT, &gravity(), &mut NoOpStepObserver);
    }
    assert_eq!(world.rotation(h), Some(start));
}

#[test]
fn kinematic_target_ignored_for_dynamic_body() {
    let mut world = PhysicsWorld::<f32>::new();
    let h = world.add_body(BodyDesc::dynamic(Vec3::zero(), 1.0)).unwrap();
    world.set_next_kinematic_position(h, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(world.body(h).unwrap().next_kinematic_position(), None);
}

#[derive(Default)]
struct Counter {
    integrations: usize,
    iterations: usize,
    completes: usize,
    sleeps: usize,
    wakes: usize,
}

impl StepObserver for Counter {
    fn on_integrate(&mut self, _sub_step: usize) {
        self.integrations += 1;
    }
    fn on_constraint_iteration(&mut self, _iteration: usize) {
        self.iterations += 1;
    }
    fn on_sleep(&mut self, _body: lanyard::BodyHandle) {
        self.sleeps += 1;
    }
    fn on_wake(&mut self, _body: lanyard::BodyHandle) {
        self.wakes += 1;
    }
    fn on_step_complete(&mut self) {
        self.completes += 1;
    }
}

#[test]
fn observer_sees_sub_steps_and_iterations() {
    let (mut world, _, _) = pendulum(1.0);
    let config = gravity().with_sub_steps(3).with_iterations(5);
    let mut counter = Counter::default();
    world.step(DT, &config, &mut counter);
    assert_eq!(counter.integrations, 3);
    assert_eq!(counter.iterations, 15);
    assert_eq!(counter.completes, 1);
}

#[test]
fn settled_pendulum_sleeps_and_wakes() {
    let (mut world, _, bob) = pendulum(1.0);
    let config = gravity().with_sleep(0.05, 0.05, 30);
    let mut counter = Counter::default();
    for _ in 0..1200 {
        world.step(DT, &config, &mut counter);
        if world.is_sleeping(bob) == Some(true) {
            break;
        }
    }
    assert_eq!(world.is_sleeping(bob), Some(true), "pendulum never settled");
    assert_eq!(counter.sleeps, 1);

    let resting = world.position(bob).unwrap();
    world.step(DT, &config, &mut counter);
    assert_eq!(world.position(bob), Some(resting), "sleeping bodies are not integrated");

    world.set_angular_velocity(bob, Vec3::new(0.0, 0.0, 1.0), true);
    assert_eq!(world.is_sleeping(bob), Some(false));
}

#[test]
fn waking_one_body_wakes_its_island() {
    let mut world = PhysicsWorld::new();
    let anchor = world.add_body(BodyDesc::fixed(Vec3::zero())).unwrap();
    let a = world.add_body(BodyDesc::dynamic(Vec3::new(0.0, -1.0, 0.0), 1.0)).unwrap();
    let b = world.add_body(BodyDesc::dynamic(Vec3::new(0.0, -2.0, 0.0), 1.0)).unwrap();
    world.create_rope_joint(anchor, a, Vec3::zero(), Vec3::zero(), 1.0).unwrap();
    world.create_rope_joint(a, b, Vec3::zero(), Vec3::zero(), 1.0).unwrap();
    world.body_mut(a).unwrap().sleeping = true;
    world.body_mut(b).unwrap().sleeping = true;

    let config = gravity().without_sleep();
    let mut counter = Counter::default();
    world.step(DT, &config, &mut counter);
    assert_eq!(counter.wakes, 0, "a fully asleep island stays asleep");

    world.wake(a);
    world.step(DT, &config, &mut counter);
    assert_eq!(world.is_sleeping(b), Some(false));
    assert_eq!(counter.wakes, 1);
}

#[test]
fn separate_anchors_are_separate_islands() {
    let mut world = PhysicsWorld::new();
    let anchor_1 = world.add_body(BodyDesc::fixed(Vec3::zero())).unwrap();
    let anchor_2 = world.add_body(BodyDesc::fixed(Vec3::new(10.0, 0.0, 0.0))).unwrap();
    let a = world.add_body(BodyDesc::dynamic(Vec3::new(0.0, -1.0, 0.0), 1.0)).unwrap();
    let b = world.add_body(BodyDesc::dynamic(Vec3::new(10.0, -1.0, 0.0), 1.0)).unwrap();
    world.create_rope_joint(anchor_1, a, Vec3::zero(), Vec3::zero(), 1.0).unwrap();
    world.create_rope_joint(anchor_2, b, Vec3::zero(), Vec3::zero(), 1.0).unwrap();
    world.body_mut(b).unwrap().sleeping = true;

    world.step(DT, &gravity().without_sleep(), &mut NoOpStepObserver);
    assert_eq!(world.is_sleeping(b), Some(true), "motion on one anchor must not wake the other");
}
