//! Renderable strap geometry regenerated from the curve every frame.

use crate::config::GeometryKind;
use crate::curve::{CatmullRomCurve, ARC_DIVISIONS};
use crate::float::Float;
use crate::quat::Quat;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Vertex and index buffers for the strap.
///
/// Buffers are rewritten in place so a presentation layer can keep one handle
/// to this struct and re-read it each frame.
#[derive(Clone, Debug, Default)]
pub struct StrapGeometry<F: Float> {
    pub positions: AllocVec<Vec3<F>>,
    /// Empty for ribbons.
    pub normals: AllocVec<Vec3<F>>,
    pub uvs: AllocVec<[F; 2]>,
    /// Triangle list for tubes; empty for ribbons (draw `positions` as a strip).
    pub indices: AllocVec<u32>,
    /// Arc length of the curve the geometry was built from.
    pub length: F,
    arc_lengths: AllocVec<F>,
    frames: AllocVec<Frame<F>>,
}

/// Per-sample frame along the curve: tangent plus two perpendicular axes.
#[derive(Copy, Clone, Debug)]
struct Frame<F: Float> {
    tangent: Vec3<F>,
    normal: Vec3<F>,
    binormal: Vec3<F>,
}

impl<F: Float> StrapGeometry<F> {
    pub fn new() -> Self {
        StrapGeometry {
            positions: AllocVec::new(),
            normals: AllocVec::new(),
            uvs: AllocVec::new(),
            indices: AllocVec::new(),
            length: F::zero(),
            arc_lengths: AllocVec::new(),
            frames: AllocVec::new(),
        }
    }

    pub fn rebuild(&mut self, curve: &CatmullRomCurve<F>, kind: &GeometryKind<F>) {
        match *kind {
            GeometryKind::Tube { tubular_segments, radius, radial_segments } => {
                self.rebuild_tube(curve, tubular_segments, radius, radial_segments)
            }
            GeometryKind::Ribbon { divisions } => self.rebuild_ribbon(curve, divisions),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    fn rebuild_ribbon(&mut self, curve: &CatmullRomCurve<F>, divisions: usize) {
        self.clear();
        let divisions = divisions.max(1);
        curve.sample_into(divisions, &mut self.positions);
        let mut length = F::zero();
        for (i, p) in self.positions.iter().enumerate() {
            if i > 0 {
                length = length + p.distance(self.positions[i - 1]);
            }
            let u = F::from_f32(i as f32) / F::from_f32(divisions as f32);
            self.uvs.push([u, F::zero()]);
        }
        self.length = length;
    }

    fn rebuild_tube(
        &mut self,
        curve: &CatmullRomCurve<F>,
        tubular_segments: usize,
        radius: F,
        radial_segments: usize,
    ) {
        self.clear();
        let tubular = tubular_segments.max(1);
        let radial = radial_segments.max(3);
        curve.arc_lengths_into(ARC_DIVISIONS, &mut self.arc_lengths);
        self.length = self.arc_lengths.last().copied().unwrap_or_else(F::zero);

        transport_frames(curve, &self.arc_lengths, tubular, &mut self.frames);
        let two_pi = F::two() * F::pi();

        for (i, frame) in self.frames.iter().enumerate() {
            let u = F::from_f32(i as f32) / F::from_f32(tubular as f32);
            let center = curve.point_at(u, &self.arc_lengths);
            for j in 0..=radial {
                let v = F::from_f32(j as f32) / F::from_f32(radial as f32);
                let angle = v * two_pi;
                let normal = frame.normal.scale(-angle.cos()) + frame.binormal.scale(angle.sin());
                let normal = normal.normalize();
                self.positions.push(center + normal.scale(radius));
                self.normals.push(normal);
                self.uvs.push([u, v]);
            }
        }

        let ring = (radial + 1) as u32;
        for j in 1..=tubular as u32 {
            for i in 1..=radial as u32 {
                let a = ring * (j - 1) + (i - 1);
                let b = ring * j + (i - 1);
                let c = ring * j + i;
                let d = ring * (j - 1) + i;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }
}

/// Parallel-transport frames at `segments + 1` arc-length samples. The first
/// normal is chosen perpendicular to the tangent; every later one is the
/// previous normal carried along by the rotation between consecutive tangents,
/// so the tube does not twist.
fn transport_frames<F: Float>(
    curve: &CatmullRomCurve<F>,
    lengths: &[F],
    segments: usize,
    out: &mut AllocVec<Frame<F>>,
) {
    out.clear();
    for i in 0..=segments {
        let u = F::from_f32(i as f32) / F::from_f32(segments as f32);
        let mut tangent = curve.tangent_at(u, lengths);
        if tangent == Vec3::zero() {
            tangent = out.last().map(|f| f.tangent).unwrap_or_else(Vec3::unit_y);
        }

        let frame = match out.last() {
            None => {
                let binormal = tangent.any_perpendicular();
                let normal = binormal.cross(tangent).normalize();
                Frame { tangent, normal, binormal }
            }
            Some(prev) => {
                let normal = match Quat::from_rotation_arc(prev.tangent, tangent) {
                    Some(q) => q.rotate(prev.normal).normalize(),
                    None => prev.normal,
                };
                let binormal = tangent.cross(normal).normalize();
                Frame { tangent, normal, binormal }
            }
        };
        out.push(frame);
    }
}
