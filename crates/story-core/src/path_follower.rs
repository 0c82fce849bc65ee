use glam::{EulerRot, Quat, Vec3};

use crate::calibration::Calibration;
use crate::constants::{
    BOAT_BOB_AMPLITUDE, BOAT_BOB_SPEED, BOAT_FORWARD, BOAT_PATH_POINTS, BOAT_PATH_TENSION,
    BOAT_WATERLINE_OFFSET, FOLLOWER_SLERP, HULL_BOB, HULL_SCALE, HULL_SPEED, HULL_TILT,
    TANGENT_EPSILON,
};
use crate::easing::{clamp01, Damping};
use crate::error::Result;
use crate::spline::{CatmullRomCurve, CurveKind};
use crate::transform::Transform;

/// The boat's route across the pond at water height `surface_y`.
pub fn boat_path(surface_y: f32) -> Result<CatmullRomCurve> {
    let y = surface_y + BOAT_WATERLINE_OFFSET;
    let points = BOAT_PATH_POINTS
        .iter()
        .map(|[x, z]| Vec3::new(*x, y, *z))
        .collect();
    CatmullRomCurve::new(
        points,
        CurveKind::CatmullRom {
            tension: BOAT_PATH_TENSION,
        },
    )
}

/// Moves an object along the calibrated spline, facing its direction of travel.
#[derive(Clone, Debug)]
pub struct PathFollower {
    curve: Option<(f32, CatmullRomCurve)>,
    slerp: Damping,
    bob_amplitude: f32,
    bob_speed: f32,
    transform: Transform,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFollower {
    pub fn new() -> Self {
        Self {
            curve: None,
            slerp: Damping::PerFrame(FOLLOWER_SLERP),
            bob_amplitude: BOAT_BOB_AMPLITUDE,
            bob_speed: BOAT_BOB_SPEED,
            transform: Transform::default(),
        }
    }

    pub fn curve(&self) -> Option<&CatmullRomCurve> {
        self.curve.as_ref().map(|(_, c)| c)
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Advance one frame. Returns `None`, leaving the transform untouched,
    /// while the calibration is unset.
    pub fn update(
        &mut self,
        t: f32,
        elapsed_sec: f32,
        dt_sec: f32,
        calibration: Calibration,
    ) -> Option<&Transform> {
        let surface_y = calibration.value()?;
        let rebuild = match &self.curve {
            Some((built_for, _)) => built_for.to_bits() != surface_y.to_bits(),
            None => true,
        };
        if rebuild {
            match boat_path(surface_y) {
                Ok(curve) => {
                    log::debug!("[follower] path rebuilt for surface_y={surface_y:.4}");
                    self.curve = Some((surface_y, curve));
                }
                Err(e) => {
                    log::error!("[follower] path build failed: {e}");
                    return None;
                }
            }
        }
        let (_, curve) = self.curve.as_ref()?;

        let u = clamp01(t);
        let mut position = curve.point_at(u);
        let tangent = curve.tangent_at(u.clamp(TANGENT_EPSILON, 1.0 - TANGENT_EPSILON));
        position.y += self.bob_amplitude * (elapsed_sec * self.bob_speed).sin();
        self.transform.position = position;

        if tangent != Vec3::ZERO {
            let goal = Quat::from_rotation_arc(BOAT_FORWARD, tangent);
            let f = self.slerp.factor(dt_sec);
            self.transform.rotation = self.transform.rotation.slerp(goal, f).normalize();
        }
        Some(&self.transform)
    }
}

/// Local rocking of the hull around its parent's origin.
#[derive(Clone, Copy, Debug)]
pub struct HullRocking {
    pub scale: f32,
    pub bob: f32,
    pub speed: f32,
    pub tilt: f32,
    pub heading: f32,
}

impl Default for HullRocking {
    fn default() -> Self {
        Self {
            scale: HULL_SCALE,
            bob: HULL_BOB,
            speed: HULL_SPEED,
            tilt: HULL_TILT,
            heading: 0.0,
        }
    }
}

impl HullRocking {
    pub fn local_transform(&self, elapsed_sec: f32) -> Transform {
        let tau = elapsed_sec * self.speed;
        Transform {
            position: Vec3::new(0.0, tau.sin() * self.bob, 0.0),
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                (tau * 0.9).cos() * self.tilt * 0.5,
                self.heading,
                (tau * 1.1).sin() * self.tilt * 0.7,
            ),
            scale: Vec3::splat(self.scale),
            visible: true,
        }
    }
}
