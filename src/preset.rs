//! Ready-made strap setups: a tube-rendered lanyard and a ribbon-rendered badge.

use crate::camera::Camera;
use crate::chain::ChainSpec;
use crate::config::{GeometryKind, SolverConfig, StrapConfig};
use crate::curve::CurveKind;
use crate::float::Float;
use crate::vec::Vec3;
use alloc::vec;

/// Everything needed to stand up a [`Scene`](crate::scene::Scene).
#[derive(Clone, Debug)]
pub struct Preset<F: Float> {
    pub name: &'static str,
    pub chain: ChainSpec<F>,
    pub strap: StrapConfig<F>,
    pub solver: SolverConfig<F>,
    pub camera_position: Vec3<F>,
    pub camera_target: Vec3<F>,
    pub fov_y_degrees: F,
}

impl<F: Float> Preset<F> {
    pub fn camera(&self, aspect: F) -> Camera<F> {
        Camera::look_at(
            self.camera_position,
            self.camera_target,
            Vec3::unit_y(),
            self.fov_y_degrees,
            aspect,
        )
    }
}

fn card_half_extents<F: Float>() -> Vec3<F> {
    Vec3::from_f32([0.8, 1.125, 0.01])
}

fn strong_gravity<F: Float>() -> SolverConfig<F> {
    SolverConfig::new().with_gravity(Vec3::from_f32([0.0, -40.0, 0.0]))
}

/// Three short links bunched toward the card, smoothed tube strap.
pub fn lanyard<F: Float>() -> Preset<F> {
    let damping = F::from_f32(4.0);
    let chain = ChainSpec {
        origin: Vec3::from_f32([0.0, 6.0, 0.0]),
        anchor: Vec3::zero(),
        links: vec![
            Vec3::from_f32([0.8, 0.0, 0.0]),
            Vec3::from_f32([1.0, 0.0, 0.0]),
            Vec3::from_f32([1.2, 0.0, 0.0]),
        ],
        card: Vec3::from_f32([2.0, 0.0, 0.0]),
        rope_lengths: vec![F::one(), F::one(), F::half()],
        card_attachment: Vec3::from_f32([0.0, 1.8, 0.0]),
        card_half_extents: card_half_extents(),
        link_mass: F::one(),
        card_mass: F::one(),
        card_inertia: F::one(),
        linear_damping: damping,
        angular_damping: damping,
    };
    Preset {
        name: "lanyard",
        chain,
        strap: StrapConfig::new(),
        solver: strong_gravity(),
        camera_position: Vec3::from_f32([0.0, 4.0, 30.0]),
        camera_target: Vec3::zero(),
        fov_y_degrees: F::from_f32(25.0),
    }
}

/// Evenly spaced links, raw positions, chordal ribbon strap.
pub fn badge<F: Float>() -> Preset<F> {
    let chain = ChainSpec::straight(Vec3::from_f32([0.0, 4.0, 0.0]), 3, F::half())
        .with_card_attachment(Vec3::from_f32([0.0, 1.45, 0.0]))
        .with_damping(F::two(), F::two());
    let chain = ChainSpec { rope_lengths: vec![F::one(); 3], ..chain };
    let strap = StrapConfig::new()
        .with_smoothing(None)
        .with_curve(CurveKind::Chordal)
        .with_geometry(GeometryKind::Ribbon { divisions: 100 });
    Preset {
        name: "badge",
        chain,
        strap,
        solver: strong_gravity(),
        camera_position: Vec3::from_f32([0.0, 0.0, 13.0]),
        camera_target: Vec3::zero(),
        fov_y_degrees: F::from_f32(25.0),
    }
}

/// Look a preset up by its `name`.
pub fn by_name<F: Float>(name: &str) -> Option<Preset<F>> {
    match name {
        "lanyard" => Some(lanyard()),
        "badge" => Some(badge()),
        _ => None,
    }
}
