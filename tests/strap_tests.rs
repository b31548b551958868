use lanyard::{
    preset, BodyKind, Camera, ChainSpec, FrameInput, FrameStatus, NoOpStepObserver, PhysicsWorld,
    PointerId, Quat, RigidBodySolver, SolverConfig, Strap, StrapConfig, Vec2, Vec3,
};

const DT: f32 = 1.0 / 60.0;

/// Camera looking straight down -Z at the anchor, so the drag plane is z = 0.
fn front_camera(anchor: Vec3<f32>) -> Camera<f32> {
    Camera::look_at(anchor + Vec3::new(0.0, 0.0, 30.0), anchor, Vec3::unit_y(), 25.0, 1.0)
}

fn input(camera: Camera<f32>, pointer_ndc: Vec2<f32>) -> FrameInput<f32> {
    FrameInput { elapsed: 0.0, delta: DT, pointer_ndc, camera }
}

fn lanyard_strap() -> (PhysicsWorld<f32>, Strap<f32>, SolverConfig<f32>) {
    let p = preset::lanyard::<f32>();
    let mut world = PhysicsWorld::new();
    let strap = Strap::build(&p.chain, p.strap, &mut world).unwrap();
    (world, strap, p.solver)
}

fn anchor_of(world: &PhysicsWorld<f32>, strap: &Strap<f32>) -> Vec3<f32> {
    world.position(strap.chain().anchor()).unwrap()
}

fn card_of(world: &PhysicsWorld<f32>, strap: &Strap<f32>) -> Vec3<f32> {
    world.position(strap.chain().card()).unwrap()
}

fn assert_mode_coupled(world: &PhysicsWorld<f32>, strap: &Strap<f32>) {
    let kind = world.kind(strap.chain().card()).unwrap();
    let dragging = strap.drag_state().is_dragging();
    assert_eq!(
        kind == BodyKind::Kinematic,
        dragging,
        "card kind {:?} does not match dragging = {}",
        kind,
        dragging
    );
}

#[test]
fn anchor_never_moves() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let anchor = anchor_of(&world, &strap);
    let camera = front_camera(anchor);

    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(1), hit).unwrap();
    for i in 0..300 {
        let ndc = Vec2::new((i as f32 * 0.05).sin() * 0.5, -0.3);
        strap.on_frame(&mut world, &input(camera, ndc));
        world.step(DT, &solver, &mut NoOpStepObserver);
        if i == 150 {
            strap.on_pointer_up(&mut world, PointerId(1));
        }
        assert_eq!(anchor_of(&world, &strap), anchor, "anchor moved on frame {}", i);
    }
}

#[test]
fn card_mode_follows_drag_state() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let frame = |world: &mut PhysicsWorld<f32>, strap: &mut Strap<f32>| {
        let report = strap.on_frame(world, &input(camera, Vec2::new(0.1, -0.2)));
        world.step(DT, &solver, &mut NoOpStepObserver);
        report
    };

    assert_mode_coupled(&world, &strap);
    frame(&mut world, &mut strap);
    assert_mode_coupled(&world, &strap);

    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(7), hit).unwrap();
    assert_mode_coupled(&world, &strap);
    for _ in 0..10 {
        let report = frame(&mut world, &mut strap);
        assert_eq!(report.card_kind, Some(BodyKind::Kinematic));
        assert_mode_coupled(&world, &strap);
    }

    strap.on_pointer_up(&mut world, PointerId(7));
    assert_mode_coupled(&world, &strap);
    for _ in 0..10 {
        let report = frame(&mut world, &mut strap);
        assert_eq!(report.card_kind, Some(BodyKind::Dynamic));
        assert_mode_coupled(&world, &strap);
    }
}

#[test]
fn pointer_up_twice_is_same_as_once() {
    let (mut world, mut strap, _) = lanyard_strap();
    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(2), hit).unwrap();

    assert_eq!(strap.on_pointer_up(&mut world, PointerId(2)), Some(PointerId(2)));
    let once = (strap.drag_state(), world.kind(strap.chain().card()));
    assert_eq!(strap.on_pointer_up(&mut world, PointerId(2)), None);
    let twice = (strap.drag_state(), world.kind(strap.chain().card()));

    assert_eq!(once, twice);
    assert!(!strap.drag_state().is_dragging());
    assert_eq!(twice.1, Some(BodyKind::Dynamic));
}

#[test]
fn curve_termini_are_card_side_link_then_anchor() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let card_side = strap.chain().card_side_link();

    for _ in 0..120 {
        let link = world.position(card_side).unwrap();
        let anchor = anchor_of(&world, &strap);
        let report = strap.on_frame(&mut world, &input(camera, Vec2::zero()));
        assert_eq!(report.status, FrameStatus::Updated);

        let points = strap.curve().points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], link);
        assert_eq!(points[3], anchor);
        world.step(DT, &solver, &mut NoOpStepObserver);
    }
}

#[test]
fn card_falls_under_gravity_from_origin_anchor() {
    let spec = ChainSpec::straight(Vec3::zero(), 3, 0.5f32);
    let mut world = PhysicsWorld::new();
    let mut strap = Strap::build(&spec, StrapConfig::new(), &mut world).unwrap();
    let solver = SolverConfig::new().with_gravity(Vec3::new(0.0, -40.0, 0.0));
    let camera = front_camera(Vec3::zero());

    let initial = card_of(&world, &strap).length();
    for _ in 0..240 {
        strap.on_frame(&mut world, &input(camera, Vec2::zero()));
        world.step(DT, &solver, &mut NoOpStepObserver);
    }
    strap.on_frame(&mut world, &input(camera, Vec2::zero()));

    let card = card_of(&world, &strap);
    assert!(card.length() > initial, "card at {:?} should hang further out than {}", card, initial);
    assert!(card.y < 0.0, "card should hang below the anchor, got {:?}", card);
    assert_eq!(strap.curve().points()[3], Vec3::zero());
}

#[test]
fn grab_without_pointer_motion_keeps_card_in_place() {
    let (mut world, mut strap, _) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let card = card_of(&world, &strap);
    let hit = card + Vec3::new(0.0, 0.1, 0.0);

    strap.on_pointer_down(&mut world, PointerId(1), hit).unwrap();
    let ndc = camera.project(hit).unwrap();
    let report = strap.on_frame(&mut world, &input(camera, ndc));

    let target = report.kinematic_target.expect("drag frame writes a target");
    assert!(target.distance(card) < 1e-3, "target {:?} vs card {:?}", target, card);
}

#[test]
fn pointer_moving_up_lifts_target_by_same_amount() {
    let (mut world, mut strap, _) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let card = card_of(&world, &strap);
    let lift = Vec3::new(0.0, 0.1, 0.0);

    strap.on_pointer_down(&mut world, PointerId(1), card).unwrap();
    let ndc = camera.project(card + lift).unwrap();
    let report = strap.on_frame(&mut world, &input(camera, ndc));

    let target = report.kinematic_target.unwrap();
    assert!(target.distance(card + lift) < 1e-3, "target {:?}", target);
}

#[test]
fn release_then_frame_is_dynamic_without_target() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let hit = card_of(&world, &strap);

    strap.on_pointer_down(&mut world, PointerId(3), hit).unwrap();
    for i in 0..20 {
        let ndc = Vec2::new(0.01 * i as f32, 0.0);
        strap.on_frame(&mut world, &input(camera, ndc));
        world.step(DT, &solver, &mut NoOpStepObserver);
    }
    strap.on_pointer_up(&mut world, PointerId(3));

    let report = strap.on_frame(&mut world, &input(camera, Vec2::new(0.3, 0.3)));
    assert_eq!(report.card_kind, Some(BodyKind::Dynamic));
    assert_eq!(report.kinematic_target, None);
    let pending = world.body(strap.chain().card()).unwrap().next_kinematic_position();
    assert_eq!(pending, None);
}

#[test]
fn expired_handle_skips_whole_frame() {
    let (mut world, mut strap, _) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    strap.on_frame(&mut world, &input(camera, Vec2::zero()));
    let points_before = strap.curve().points().to_vec();
    let vertices_before = strap.geometry().vertex_count();

    let link = strap.chain().links()[1];
    assert!(world.remove_body(link));

    let report = strap.on_frame(&mut world, &input(camera, Vec2::new(0.5, 0.5)));
    assert_eq!(report.status, FrameStatus::NotReady);
    assert_eq!(report.kinematic_target, None);
    assert_eq!(strap.curve().points(), &points_before[..]);
    assert_eq!(strap.geometry().vertex_count(), vertices_before);
}

#[test]
fn pointer_down_on_removed_card_is_not_ready() {
    let (mut world, mut strap, _) = lanyard_strap();
    world.remove_body(strap.chain().card());
    let result = strap.on_pointer_down(&mut world, PointerId(1), Vec3::zero());
    assert_eq!(result, Err(lanyard::StrapError::NotReady));
    assert!(!strap.drag_state().is_dragging());
}

#[test]
fn degenerate_ray_keeps_drag_and_skips_write() {
    let (mut world, mut strap, _) = lanyard_strap();
    let anchor = anchor_of(&world, &strap);
    // Camera level with the anchor's depth: its rays start on the drag plane.
    let camera = Camera::look_at(
        anchor + Vec3::new(5.0, 0.0, 0.0),
        anchor + Vec3::new(5.0, 0.0, -1.0),
        Vec3::unit_y(),
        25.0,
        1.0,
    );
    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(4), hit).unwrap();

    let report = strap.on_frame(&mut world, &input(camera, Vec2::zero()));
    assert_eq!(report.status, FrameStatus::Updated);
    assert!(report.drag_skipped);
    assert_eq!(report.kinematic_target, None);
    assert!(strap.drag_state().is_dragging());
    assert_eq!(report.card_kind, Some(BodyKind::Kinematic));
}

#[test]
fn second_pointer_down_replaces_first() {
    let (mut world, mut strap, _) = lanyard_strap();
    let card = card_of(&world, &strap);

    strap.on_pointer_down(&mut world, PointerId(1), card + Vec3::new(0.2, 0.0, 0.0)).unwrap();
    strap.on_pointer_down(&mut world, PointerId(2), card + Vec3::new(0.0, -0.3, 0.0)).unwrap();

    let state = strap.drag_state();
    assert_eq!(state.captured_pointer(), Some(PointerId(2)));
    let offset = state.offset().unwrap();
    assert!(offset.distance(Vec3::new(0.0, -0.3, 0.0)) < 1e-6, "offset {:?}", offset);
    assert_eq!(world.kind(strap.chain().card()), Some(BodyKind::Kinematic));
}

#[test]
fn drag_wakes_sleeping_chain() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    for h in strap.chain().links().to_vec() {
        world.body_mut(h).unwrap().sleeping = true;
    }

    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(1), hit).unwrap();
    strap.on_frame(&mut world, &input(camera, Vec2::new(0.2, 0.0)));
    for h in strap.chain().links() {
        assert_eq!(world.is_sleeping(*h), Some(false));
    }
    world.step(DT, &solver, &mut NoOpStepObserver);
}

#[test]
fn spin_about_strap_axis_is_damped_others_untouched() {
    let (mut world, mut strap, _) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let card = strap.chain().card();
    {
        let body = world.body_mut(card).unwrap();
        body.rotation = Quat::from_axis_angle(Vec3::unit_y(), 0.5);
        body.angular_velocity = Vec3::new(0.3, 1.0, -0.2);
        body.sleeping = true;
    }

    strap.on_frame(&mut world, &input(camera, Vec2::zero()));

    let omega = world.angular_velocity(card).unwrap();
    let expected_y = 1.0 - (0.25f32).sin() * 0.25;
    assert!((omega.y - expected_y).abs() < 1e-5, "omega.y = {}", omega.y);
    assert_eq!(omega.x, 0.3);
    assert_eq!(omega.z, -0.2);
    assert_eq!(world.is_sleeping(card), Some(false), "writing angular velocity wakes the card");
}

#[test]
fn held_card_does_not_tumble() {
    let (mut world, mut strap, solver) = lanyard_strap();
    let camera = front_camera(anchor_of(&world, &strap));
    let card = strap.chain().card();
    world.body_mut(card).unwrap().angular_velocity = Vec3::new(3.0, 0.0, 0.0);

    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(1), hit).unwrap();
    let ndc = camera.project(hit).unwrap();
    let start = world.rotation(card).unwrap();
    for i in 0..120 {
        strap.on_frame(&mut world, &input(camera, ndc));
        world.step(DT, &solver, &mut NoOpStepObserver);
        assert_eq!(world.rotation(card), Some(start), "card turned while held, frame {}", i);
    }
    assert_eq!(world.angular_velocity(card), Some(Vec3::zero()));

    strap.on_pointer_up(&mut world, PointerId(1));
    assert_eq!(world.angular_velocity(card), Some(Vec3::zero()), "no spin built up during the drag");
}

#[test]
fn teardown_mid_drag_removes_everything() {
    let (mut world, mut strap, _) = lanyard_strap();
    let hit = card_of(&world, &strap);
    strap.on_pointer_down(&mut world, PointerId(1), hit).unwrap();
    let card = strap.chain().card();

    strap.teardown(&mut world);

    assert_eq!(world.body_count(), 0);
    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.position(card), None);
}

#[test]
fn raw_links_feed_curve_when_smoothing_is_off() {
    let p = preset::badge::<f32>();
    let mut world = PhysicsWorld::new();
    let mut strap = Strap::build(&p.chain, p.strap, &mut world).unwrap();
    let camera = front_camera(anchor_of(&world, &strap));

    for _ in 0..30 {
        strap.on_frame(&mut world, &input(camera, Vec2::zero()));
        world.step(DT, &p.solver, &mut NoOpStepObserver);
    }
    let links: Vec<_> = strap.chain().links().iter().map(|h| world.position(*h).unwrap()).collect();
    strap.on_frame(&mut world, &input(camera, Vec2::zero()));

    let points = strap.curve().points();
    assert_eq!(points[1], links[1]);
    assert_eq!(points[2], links[0]);
    assert!(strap.smoother().is_none());
    assert_eq!(strap.geometry().vertex_count(), 101);
}
