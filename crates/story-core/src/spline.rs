//! Open Catmull-Rom curve with arc-length parameterized sampling.

use glam::Vec3;

use crate::constants::SPLINE_ARC_DIVISIONS;
use crate::easing::clamp01;
use crate::error::{Result, StoryError};

const TANGENT_DELTA: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveKind {
    /// Uniform parameterization with tangents scaled by `tension`.
    CatmullRom { tension: f32 },
    Centripetal,
    Chordal,
}

/// Cubic Hermite coefficients for one axis-independent segment.
#[derive(Clone, Copy, Debug)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32) -> Self {
        Self::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    fn nonuniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        Self::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

#[derive(Clone, Debug)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    pub fn new(points: Vec<Vec3>, kind: CurveKind) -> Result<Self> {
        if points.len() < 4 {
            return Err(StoryError::TooFewControlPoints { len: points.len() });
        }
        let mut curve = Self {
            points,
            kind,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.measure(SPLINE_ARC_DIVISIONS);
        Ok(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` (not arc-length uniform).
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let t = clamp01(t);
        if t <= 0.0 {
            return self.points[0];
        }
        if t >= 1.0 {
            return self.points[n - 1];
        }
        let p = (n - 1) as f32 * t;
        let mut i = p.floor() as usize;
        let mut w = p - i as f32;
        if i >= n - 1 {
            i = n - 2;
            w = 1.0;
        }

        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        // Open ends are extended by reflecting the neighbouring point.
        let p0 = if i > 0 {
            self.points[i - 1]
        } else {
            2.0 * self.points[0] - self.points[1]
        };
        let p3 = if i + 2 < n {
            self.points[i + 2]
        } else {
            2.0 * self.points[n - 1] - self.points[n - 2]
        };

        let cubic = match self.kind {
            CurveKind::CatmullRom { tension } => Cubic::uniform(p0, p1, p2, p3, tension),
            CurveKind::Centripetal | CurveKind::Chordal => {
                let pow = if self.kind == CurveKind::Chordal { 0.5 } else { 0.25 };
                let mut dt0 = p0.distance_squared(p1).powf(pow);
                let mut dt1 = p1.distance_squared(p2).powf(pow);
                let mut dt2 = p2.distance_squared(p3).powf(pow);
                // Guard against repeated points.
                if dt1 < 1e-4 {
                    dt1 = 1.0;
                }
                if dt0 < 1e-4 {
                    dt0 = dt1;
                }
                if dt2 < 1e-4 {
                    dt2 = dt1;
                }
                Cubic::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2)
            }
        };
        cubic.eval(w)
    }

    /// Point at fraction `u` of the arc length. Exactly the first control
    /// point at 0 and the last at 1.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`, by central difference.
    /// Returns zero for a degenerate curve.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    fn measure(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for d in 1..=divisions {
            let current = self.point(d as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    fn u_to_t(&self, u: f32) -> f32 {
        let u = clamp01(u);
        let total = self.length();
        if u <= 0.0 || u >= 1.0 || !(total > 0.0) {
            return u;
        }
        let target = u * total;
        let last = self.arc_lengths.len() - 1;
        // Largest sample index whose cumulative length does not exceed target.
        let i = self
            .arc_lengths
            .partition_point(|&l| l <= target)
            .saturating_sub(1)
            .min(last - 1);
        let before = self.arc_lengths[i];
        let after = self.arc_lengths[i + 1];
        let span = after - before;
        let frac = if span > 0.0 { (target - before) / span } else { 0.0 };
        (i as f32 + frac) / last as f32
    }
}
