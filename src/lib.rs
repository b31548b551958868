//! A hanging lanyard: rope chain, dangling card, pointer drag, and a smoothed
//! strap mesh.
//!
//! `lanyard` simulates a short chain of bodies hanging from a fixed anchor
//! with a flat card pinned below the last link, lets a pointer pick the card
//! up and drag it around, and fits a Catmull-Rom curve through the chain each
//! frame to produce renderable strap geometry.
//!
//! # Features
//!
//! - **Solver seam**: the strap talks to physics only through [`RigidBodySolver`]
//! - **Reference solver**: [`PhysicsWorld`], sub-stepped Verlet with XPBD joint projection and island sleeping
//! - **Drag controller**: pointer capture, kinematic card while held, spin damping after release
//! - **Strap curve**: centripetal, chordal or uniform Catmull-Rom with arc-length sampling
//! - **Geometry**: tube mesh with parallel-transport frames, or a ribbon polyline
//! - **Observable**: monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: works in embedded and WASM environments
//!
//! # Example
//! ```
//! use lanyard::{preset, FrameInput, PointerId, Scene, Vec2};
//!
//! let preset = preset::lanyard::<f32>();
//! let camera = preset.camera(16.0 / 9.0);
//! let mut scene = Scene::new(&preset).unwrap();
//!
//! let input = FrameInput { elapsed: 0.0, delta: 1.0 / 60.0, pointer_ndc: Vec2::zero(), camera };
//! for _ in 0..30 {
//!     scene.frame(&input);
//! }
//! assert!(!scene.strap().geometry().is_empty());
//!
//! if let Some(hit) = scene.hit_card(&camera.ray(Vec2::zero())) {
//!     scene.pointer_down(PointerId(0), hit).unwrap();
//! }
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod quat;
pub mod body;
pub mod joint;
pub mod solver;
pub mod world;
pub mod chain;
pub mod smoothing;
pub mod curve;
pub mod geometry;
pub mod camera;
pub mod drag;
pub mod strap;
pub mod scene;
pub mod preset;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec2, Vec3};
pub use quat::Quat;
pub use body::{Body, BodyDesc, BodyHandle, BodyKind};
pub use joint::{Joint, JointId, RopeJoint, SphericalJoint};
pub use solver::RigidBodySolver;
pub use world::PhysicsWorld;
pub use chain::{Chain, ChainSpec};
pub use smoothing::LinkSmoother;
pub use curve::{CatmullRomCurve, CurveKind};
pub use geometry::StrapGeometry;
pub use camera::{Camera, Plane, Ray};
pub use drag::{DragState, PointerId};
pub use strap::{FrameInput, FrameReport, FrameStatus, Strap};
pub use scene::{FixedTimestep, Scene};
pub use preset::Preset;
pub use config::{GeometryKind, SmoothingConfig, SolverConfig, SpinDamping, StrapConfig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::StrapError;
