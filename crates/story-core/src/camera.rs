//! Scene camera description and the scroll-driven camera rig.
//!
//! The rig interpolates two index-aligned keyframe tracks (eye and look-at)
//! and damps only the eye. The look-at target follows the keyframes directly,
//! which keeps the framing crisp while the eye glides.

use glam::{Vec2, Vec3};

use crate::constants::{CAMERA_DAMPING, CAMERA_FOV_DEG, CAMERA_POSITION_KEYS, CAMERA_TARGET_KEYS};
use crate::easing::{Damping, Mix};
use crate::error::{Result, StoryError};
use crate::keyframes::Keyframes;

/// The viewer as far as fitting is concerned: where it stands, what it looks
/// at, and how wide it sees.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
        }
    }

    /// World-space width and height of the visible frustum slice through `point`.
    pub fn viewport_size_at(&self, point: Vec3) -> Vec2 {
        let distance = self.eye.distance(point);
        let height = 2.0 * (self.fovy_radians * 0.5).tan() * distance;
        Vec2::new(height * self.aspect, height)
    }
}

/// Eye and look-at target for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.eye;
        camera.target = self.target;
    }
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    positions: Keyframes<Vec3>,
    targets: Keyframes<Vec3>,
    damping: Damping,
    current: Vec3,
}

impl CameraRig {
    pub fn new(
        positions: Keyframes<Vec3>,
        targets: Keyframes<Vec3>,
        damping: Damping,
    ) -> Result<Self> {
        if positions.len() != targets.len() {
            return Err(StoryError::MisalignedTracks {
                positions: positions.len(),
                targets: targets.len(),
            });
        }
        let current = positions.first();
        Ok(Self {
            positions,
            targets,
            damping,
            current,
        })
    }

    /// The story's five-step flight.
    pub fn story() -> Result<Self> {
        Self::new(
            Keyframes::new(CAMERA_POSITION_KEYS)?,
            Keyframes::new(CAMERA_TARGET_KEYS)?,
            Damping::PerFrame(CAMERA_DAMPING),
        )
    }

    /// Undamped pose the rig is heading for at progress `t`.
    pub fn target_pose(&self, t: f32) -> CameraPose {
        CameraPose {
            eye: self.positions.sample(t),
            target: self.targets.sample(t),
        }
    }

    pub fn update(&mut self, t: f32, dt_sec: f32) -> CameraPose {
        let goal = self.target_pose(t);
        self.current = self.current.mix(goal.eye, self.damping.factor(dt_sec));
        CameraPose {
            eye: self.current,
            target: goal.target,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.current
    }

    pub fn initial_camera(&self, aspect: f32) -> Camera {
        Camera::new(self.positions.first(), self.targets.first(), aspect)
    }
}
