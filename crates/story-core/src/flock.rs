//! Optional butterfly flock that lifts off over the final story step.

use glam::{Quat, Vec3};
use rand::prelude::*;

use crate::constants::{
    FLOCK_GATE_START, FLOCK_GATE_WIDTH, FLOCK_LIFT, FLOCK_SIZE, FLOCK_VISIBLE_THRESHOLD,
    FLOCK_WOBBLE, REFERENCE_FPS,
};
use crate::error::Result;
use crate::gate::ThresholdGate;
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlockConfig {
    pub count: usize,
    pub seed: u64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            count: FLOCK_SIZE,
            seed: 7,
        }
    }
}

#[derive(Clone, Debug)]
struct Member {
    base_y: f32,
    yaw: f32,
    transform: Transform,
}

#[derive(Clone, Debug)]
pub struct Flock {
    gate: ThresholdGate,
    members: Vec<Member>,
    visible: bool,
}

impl Flock {
    pub fn new(config: FlockConfig) -> Result<Self> {
        let gate = ThresholdGate::new(FLOCK_GATE_START, FLOCK_GATE_WIDTH)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let members = (0..config.count)
            .map(|_| {
                let position = Vec3::new(
                    2.0 + rng.gen::<f32>() * 0.7,
                    0.2 + rng.gen::<f32>() * 0.2,
                    -0.1 + rng.gen::<f32>() * 0.6,
                );
                let yaw = rng.gen::<f32>() * std::f32::consts::TAU;
                let scale = 0.15 + rng.gen::<f32>() * 0.12;
                Member {
                    base_y: position.y,
                    yaw,
                    transform: Transform {
                        position,
                        rotation: Quat::from_rotation_y(yaw),
                        scale: Vec3::splat(scale),
                        visible: true,
                    },
                }
            })
            .collect();
        Ok(Self {
            gate,
            members,
            visible: false,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn transforms(&self) -> impl Iterator<Item = &Transform> + '_ {
        self.members.iter().map(|m| &m.transform)
    }

    pub fn update(&mut self, t: f32, elapsed_sec: f32, dt_sec: f32) {
        let local = self.gate.local_t(t);
        self.visible = local > FLOCK_VISIBLE_THRESHOLD;
        let lift = local * FLOCK_LIFT;
        let frames = dt_sec.max(0.0) * REFERENCE_FPS;
        for (i, m) in self.members.iter_mut().enumerate() {
            let i = i as f32;
            let wobble = (elapsed_sec * (1.2 + i * 0.13)).sin() * FLOCK_WOBBLE;
            m.transform.position.y = m.base_y + lift + wobble;
            m.yaw = (m.yaw + (0.01 + i * 0.0008) * frames) % std::f32::consts::TAU;
            m.transform.rotation = Quat::from_rotation_y(m.yaw);
            m.transform.visible = self.visible;
        }
    }
}
