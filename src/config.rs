//! Configuration for the physics world and the strap controller.

use crate::curve::CurveKind;
use crate::float::Float;
use crate::vec::Vec3;

/// Configuration for [`PhysicsWorld::step`](crate::world::PhysicsWorld::step).
///
/// # Builder Pattern
/// ```
/// use lanyard::config::SolverConfig;
/// use lanyard::vec::Vec3;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_iterations(8)
///     .with_gravity(Vec3::new(0.0, -40.0, 0.0))
///     .with_sub_steps(4);
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfig<F: Float> {
    /// Joint projection passes per sub-step. Default: 4.
    pub iterations: usize,
    /// Sub-steps per step. Default: 4.
    pub sub_steps: usize,
    /// Gravity acceleration. Default: (0, -9.81, 0).
    pub gravity: Vec3<F>,
    /// Linear speed below which a body counts as still. Default: 0.01.
    pub sleep_linear_threshold: F,
    /// Angular speed below which a body counts as still. Default: 0.01.
    pub sleep_angular_threshold: F,
    /// Consecutive still steps before a body sleeps. Default: 60. Zero disables sleeping.
    pub sleep_after: u32,
}

impl<F: Float> SolverConfig<F> {
    pub fn new() -> Self {
        SolverConfig {
            iterations: 4,
            sub_steps: 4,
            gravity: Vec3::new(F::zero(), F::from_f32(-9.81), F::zero()),
            sleep_linear_threshold: F::from_f32(0.01),
            sleep_angular_threshold: F::from_f32(0.01),
            sleep_after: 60,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_sleep(mut self, linear: F, angular: F, after_steps: u32) -> Self {
        self.sleep_linear_threshold = linear;
        self.sleep_angular_threshold = angular;
        self.sleep_after = after_steps;
        self
    }

    pub fn without_sleep(mut self) -> Self {
        self.sleep_after = 0;
        self
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Adaptive smoothing of the interior link positions.
///
/// Each frame the smoothed value moves toward the raw one by
/// `dt * (base + clamp(distance, min_distance, max_distance) * boost)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothingConfig<F: Float> {
    pub base: F,
    pub boost: F,
    pub min_distance: F,
    pub max_distance: F,
}

impl<F: Float> SmoothingConfig<F> {
    pub fn new() -> Self {
        SmoothingConfig {
            base: F::from_f32(5.0),
            boost: F::from_f32(10.0),
            min_distance: F::from_f32(0.05),
            max_distance: F::one(),
        }
    }

    pub fn with_rates(mut self, base: F, boost: F) -> Self {
        self.base = base;
        self.boost = boost;
        self
    }

    pub fn with_distance_clamp(mut self, min: F, max: F) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Blend factor for one frame, clamped to [0, 1].
    pub fn factor(&self, dt: F, distance: F) -> F {
        let d = distance.clamp(self.min_distance, self.max_distance);
        (dt * (self.base + d * self.boost)).clamp(F::zero(), F::one())
    }
}

impl<F: Float> Default for SmoothingConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Settles the card's spin about one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpinDamping<F: Float> {
    /// Unit axis the spin is damped around. Default: +Y (along the hanging strap).
    pub axis: Vec3<F>,
    /// Default: 0.25.
    pub factor: F,
}

impl<F: Float> Default for SpinDamping<F> {
    fn default() -> Self {
        SpinDamping { axis: Vec3::unit_y(), factor: F::from_f32(0.25) }
    }
}

/// Renderable form of the strap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GeometryKind<F: Float> {
    /// Closed-profile tube swept along the curve.
    Tube { tubular_segments: usize, radius: F, radial_segments: usize },
    /// Polyline of `divisions + 1` curve samples for a screen-space line renderer.
    Ribbon { divisions: usize },
}

/// Configuration for [`Strap`](crate::strap::Strap).
#[derive(Copy, Clone, Debug)]
pub struct StrapConfig<F: Float> {
    /// `None` feeds the raw link positions straight into the curve.
    pub smoothing: Option<SmoothingConfig<F>>,
    pub spin: SpinDamping<F>,
    pub curve: CurveKind<F>,
    pub geometry: GeometryKind<F>,
}

impl<F: Float> StrapConfig<F> {
    pub fn new() -> Self {
        StrapConfig {
            smoothing: Some(SmoothingConfig::new()),
            spin: SpinDamping::default(),
            curve: CurveKind::Centripetal,
            geometry: GeometryKind::Tube {
                tubular_segments: 64,
                radius: F::from_f32(0.1),
                radial_segments: 8,
            },
        }
    }

    pub fn with_smoothing(mut self, smoothing: Option<SmoothingConfig<F>>) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_spin_damping(mut self, axis: Vec3<F>, factor: F) -> Self {
        self.spin = SpinDamping { axis: axis.normalize(), factor };
        self
    }

    pub fn with_curve(mut self, curve: CurveKind<F>) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryKind<F>) -> Self {
        self.geometry = geometry;
        self
    }
}

impl<F: Float> Default for StrapConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
