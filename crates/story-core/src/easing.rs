//! Easing, interpolation and frame-rate independent damping helpers.

use glam::Vec3;

use crate::constants::REFERENCE_FPS;

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Cubic ease with zero slope at both ends: `f*f*(3 - 2f)`.
#[inline]
pub fn smoothstep(f: f32) -> f32 {
    f * f * (3.0 - 2.0 * f)
}

/// Values that can be blended linearly.
///
/// Implementations use the `a*(1-f) + b*f` form so that `f = 0` and `f = 1`
/// return the endpoints bit-exactly.
pub trait Mix: Copy {
    fn mix(self, other: Self, f: f32) -> Self;
}

impl Mix for f32 {
    #[inline]
    fn mix(self, other: Self, f: f32) -> Self {
        self * (1.0 - f) + other * f
    }
}

impl Mix for Vec3 {
    #[inline]
    fn mix(self, other: Self, f: f32) -> Self {
        self * (1.0 - f) + other * f
    }
}

/// Exponential approach of a current value toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Damping {
    /// Blend factor per frame at [`REFERENCE_FPS`]; rescaled for other frame times.
    PerFrame(f32),
    /// Time constant in seconds.
    TimeConstant(f32),
}

impl Damping {
    /// Blend factor to apply for a frame lasting `dt_sec`.
    ///
    /// `PerFrame(k)` yields exactly `k` when `dt_sec == 1 / REFERENCE_FPS`.
    pub fn factor(&self, dt_sec: f32) -> f32 {
        if !(dt_sec > 0.0) {
            return 0.0;
        }
        match *self {
            Damping::PerFrame(k) if k >= 1.0 => 1.0,
            Damping::PerFrame(k) if k <= 0.0 => 0.0,
            Damping::PerFrame(k) => {
                let rate = -(1.0 - k).ln() * REFERENCE_FPS;
                1.0 - (-rate * dt_sec).exp()
            }
            Damping::TimeConstant(tau) if tau <= 0.0 => 1.0,
            Damping::TimeConstant(tau) => 1.0 - (-dt_sec / tau).exp(),
        }
    }

    /// Frames needed at the reference rate to close half the gap.
    pub fn half_life_frames(&self) -> f32 {
        match *self {
            Damping::PerFrame(k) => 0.5f32.ln() / (1.0 - k).ln(),
            Damping::TimeConstant(tau) => tau * 2.0f32.ln() * REFERENCE_FPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_frame_damping_matches_constant_at_reference_rate() {
        let d = Damping::PerFrame(0.12);
        assert!((d.factor(1.0 / REFERENCE_FPS) - 0.12).abs() < 1e-5);
        // Two half-length frames compound to one reference frame.
        let half = d.factor(0.5 / REFERENCE_FPS);
        assert!((1.0 - (1.0 - half) * (1.0 - half) - 0.12).abs() < 1e-5);
    }

    #[test]
    fn damping_half_life_matches_closed_form() {
        let hl = Damping::PerFrame(0.12).half_life_frames();
        assert!((hl - 0.5f32.ln() / 0.88f32.ln()).abs() < 1e-5);
        assert!(hl > 5.0 && hl < 6.0);
    }

    #[test]
    fn mix_hits_endpoints_exactly() {
        let a = Vec3::new(0.1, 1.7, -3.3);
        let b = Vec3::new(2.2, -0.3, 0.7);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(0.3f32.mix(0.1, 1.0), 0.1);
    }
}
