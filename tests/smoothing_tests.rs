use lanyard::{LinkSmoother, SmoothingConfig, Vec3};

#[test]
fn held_raw_position_converges_in_bounded_frames() {
    for dt in [1.0 / 30.0f32, 1.0 / 60.0, 1.0 / 144.0] {
        let mut s = LinkSmoother::new(SmoothingConfig::new());
        s.update(0, Vec3::zero(), dt);
        let raw = Vec3::new(3.0, -2.0, 1.0);
        let mut frames = 0;
        while s.update(0, raw, dt).distance(raw) > 1e-3 {
            frames += 1;
            assert!(frames < 2000, "dt {}: still {} away", dt, s.get(0).unwrap().distance(raw));
        }
        assert!(frames > 1, "dt {}: smoothing should not be instantaneous", dt);
    }
}

#[test]
fn staleness_stays_bounded_for_moving_target() {
    let dt = 1.0 / 60.0f32;
    let mut s = LinkSmoother::new(SmoothingConfig::new());
    let mut worst = 0.0f32;
    for i in 0..600 {
        // Raw link moving at 30 units per second.
        let raw = Vec3::new(i as f32 * 0.5, 0.0, 0.0);
        let smoothed = s.update(0, raw, dt);
        worst = worst.max(smoothed.distance(raw));
    }
    assert!(worst < 3.0, "smoothed value fell {} behind", worst);
    let last = s.get(0).unwrap().distance(Vec3::new(599.0 * 0.5, 0.0, 0.0));
    assert!(last < 3.0);
}

#[test]
fn links_are_tracked_independently() {
    let mut s = LinkSmoother::new(SmoothingConfig::new());
    s.update(0, Vec3::new(1.0f32, 0.0, 0.0), 0.016);
    s.update(1, Vec3::new(0.0, 1.0, 0.0), 0.016);
    assert_eq!(s.len(), 2);
    assert_eq!(s.get(1), Some(Vec3::new(0.0, 1.0, 0.0)));
    s.clear();
    assert!(s.is_empty());
}

#[test]
fn factor_shape() {
    let c = SmoothingConfig::<f32>::new();
    let dt = 1.0 / 60.0;
    // Below the clamp floor the boost uses 0.05.
    assert!((c.factor(dt, 0.0) - dt * 5.5).abs() < 1e-6);
    // Distance boosts responsiveness up to the ceiling.
    assert!(c.factor(dt, 0.5) > c.factor(dt, 0.1));
    assert_eq!(c.factor(dt, 1.0), c.factor(dt, 50.0));
    assert_eq!(c.factor(1.0, 0.5), 1.0);
}
