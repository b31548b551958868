//! Catmull-Rom spline through the strap's control points.

use crate::float::Float;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Parameterization of the spline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CurveKind<F: Float> {
    /// Knot spacing by the square root of chord length (alpha = 0.5). No
    /// cusps or self-intersections within a segment.
    Centripetal,
    /// Knot spacing by chord length (alpha = 1).
    Chordal,
    /// Uniform knots with explicit tangent scale.
    Uniform { tension: F },
}

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` for one coordinate of one segment.
#[derive(Copy, Clone, Debug)]
struct Cubic<F: Float> {
    c0: F,
    c1: F,
    c2: F,
    c3: F,
}

impl<F: Float> Cubic<F> {
    /// Hermite form from endpoint values and tangents.
    fn hermite(x0: F, x1: F, t0: F, t1: F) -> Self {
        let two = F::two();
        let three = F::from_f32(3.0);
        Cubic {
            c0: x0,
            c1: t0,
            c2: -three * x0 + three * x1 - two * t0 - t1,
            c3: two * x0 - two * x1 + t0 + t1,
        }
    }

    fn uniform(x0: F, x1: F, x2: F, x3: F, tension: F) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    fn non_uniform(x0: F, x1: F, x2: F, x3: F, dt0: F, dt1: F, dt2: F) -> Self {
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: F) -> F {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// Open Catmull-Rom spline. The curve passes through every control point;
/// the first and last points are its termini.
#[derive(Clone, Debug)]
pub struct CatmullRomCurve<F: Float> {
    points: AllocVec<Vec3<F>>,
    kind: CurveKind<F>,
}

impl<F: Float> CatmullRomCurve<F> {
    pub fn new(points: AllocVec<Vec3<F>>, kind: CurveKind<F>) -> Self {
        CatmullRomCurve { points, kind }
    }

    pub fn points(&self) -> &[Vec3<F>] {
        &self.points
    }

    /// Overwrite the control points in place, keeping the allocation.
    pub fn set_points(&mut self, points: &[Vec3<F>]) {
        self.points.clear();
        self.points.extend_from_slice(points);
    }

    pub fn kind(&self) -> CurveKind<F> {
        self.kind
    }

    /// Point at curve parameter `t` in [0, 1] (uniform in segments, not in length).
    pub fn point(&self, t: F) -> Vec3<F> {
        let n = self.points.len();
        match n {
            0 => return Vec3::zero(),
            1 => return self.points[0],
            _ => {}
        }

        let t = t.clamp(F::zero(), F::one());
        let p = F::from_f32((n - 1) as f32) * t;
        let mut segment = floor_index(p, n - 1);
        let mut weight = p - F::from_f32(segment as f32);
        if segment >= n - 1 {
            segment = n - 2;
            weight = F::one();
        }

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        // Missing neighbours at the ends are mirrored through the endpoint.
        let p0 = if segment > 0 {
            self.points[segment - 1]
        } else {
            p1 + (p1 - p2)
        };
        let p3 = if segment + 2 < n {
            self.points[segment + 2]
        } else {
            p2 + (p2 - p1)
        };

        let (cx, cy, cz) = match self.kind {
            CurveKind::Uniform { tension } => (
                Cubic::uniform(p0.x, p1.x, p2.x, p3.x, tension),
                Cubic::uniform(p0.y, p1.y, p2.y, p3.y, tension),
                Cubic::uniform(p0.z, p1.z, p2.z, p3.z, tension),
            ),
            CurveKind::Centripetal | CurveKind::Chordal => {
                // Knot intervals are |d|^alpha = (|d|^2)^(alpha / 2).
                let exponent = if self.kind == CurveKind::Chordal {
                    F::half()
                } else {
                    F::from_f32(0.25)
                };
                let eps = F::from_f32(1e-4);
                let mut dt1 = p1.distance_sq(p2).powf(exponent);
                if dt1 < eps {
                    dt1 = F::one();
                }
                let mut dt0 = p0.distance_sq(p1).powf(exponent);
                if dt0 < eps {
                    dt0 = dt1;
                }
                let mut dt2 = p2.distance_sq(p3).powf(exponent);
                if dt2 < eps {
                    dt2 = dt1;
                }
                (
                    Cubic::non_uniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2),
                    Cubic::non_uniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2),
                    Cubic::non_uniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2),
                )
            }
        };

        Vec3::new(cx.eval(weight), cy.eval(weight), cz.eval(weight))
    }

    /// `divisions + 1` points at evenly spaced parameters, both termini included.
    pub fn sample(&self, divisions: usize) -> AllocVec<Vec3<F>> {
        let mut out = AllocVec::with_capacity(divisions.max(1) + 1);
        self.sample_into(divisions, &mut out);
        out
    }

    /// Like [`sample`](Self::sample), writing into `out` (cleared first).
    pub fn sample_into(&self, divisions: usize, out: &mut AllocVec<Vec3<F>>) {
        let divisions = divisions.max(1);
        out.clear();
        out.extend((0..=divisions).map(|i| self.point(F::from_f32(i as f32) / F::from_f32(divisions as f32))));
    }

    /// Cumulative arc lengths at `divisions + 1` evenly spaced parameters.
    pub fn arc_lengths(&self, divisions: usize) -> AllocVec<F> {
        let mut lengths = AllocVec::with_capacity(divisions.max(1) + 1);
        self.arc_lengths_into(divisions, &mut lengths);
        lengths
    }

    /// Like [`arc_lengths`](Self::arc_lengths), writing into `out` (cleared first).
    pub fn arc_lengths_into(&self, divisions: usize, out: &mut AllocVec<F>) {
        let divisions = divisions.max(1);
        out.clear();
        let mut total = F::zero();
        let mut last = self.point(F::zero());
        out.push(total);
        for i in 1..=divisions {
            let p = self.point(F::from_f32(i as f32) / F::from_f32(divisions as f32));
            total = total + p.distance(last);
            out.push(total);
            last = p;
        }
    }

    /// Approximate length of the curve.
    pub fn length(&self) -> F {
        self.arc_lengths(ARC_DIVISIONS).last().copied().unwrap_or_else(F::zero)
    }

    /// Point at fraction `u` of the arc length.
    pub fn point_at(&self, u: F, arc_lengths: &[F]) -> Vec3<F> {
        self.point(self.u_to_t(u, arc_lengths))
    }

    /// Unit tangent at fraction `u` of the arc length (finite difference).
    pub fn tangent_at(&self, u: F, arc_lengths: &[F]) -> Vec3<F> {
        let t = self.u_to_t(u, arc_lengths);
        let delta = F::from_f32(1e-4);
        let t1 = (t - delta).max(F::zero());
        let t2 = (t + delta).min(F::one());
        (self.point(t2) - self.point(t1)).normalize()
    }

    /// Map an arc-length fraction to the curve parameter by binary search in
    /// the cumulative length table.
    fn u_to_t(&self, u: F, arc_lengths: &[F]) -> F {
        let n = arc_lengths.len();
        if n < 2 {
            return u;
        }
        let total = arc_lengths[n - 1];
        if total.is_near_zero(F::from_f32(1e-12)) {
            return u;
        }
        let target = u.clamp(F::zero(), F::one()) * total;

        let (mut low, mut high) = (0usize, n - 1);
        while low < high {
            let mid = (low + high) / 2;
            if arc_lengths[mid] < target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        let i = if low == 0 { 0 } else { low - 1 };
        if i >= n - 1 {
            return F::one();
        }
        let before = arc_lengths[i];
        let segment = arc_lengths[i + 1] - before;
        let fraction = if segment.is_near_zero(F::from_f32(1e-12)) {
            F::zero()
        } else {
            (target - before) / segment
        };
        (F::from_f32(i as f32) + fraction) / F::from_f32((n - 1) as f32)
    }
}

/// Divisions used for arc-length tables.
pub const ARC_DIVISIONS: usize = 200;

fn floor_index<F: Float>(p: F, max: usize) -> usize {
    let mut i = 0;
    while i < max && F::from_f32((i + 1) as f32) <= p {
        i += 1;
    }
    i
}
