//! Progress windows that ramp a prop in and keep it inert outside.

use glam::{Quat, Vec3};

use crate::asset::SceneAsset;
use crate::calibration::Calibration;
use crate::constants::{
    GATE_MIN_SCALE, GATE_VISIBILITY_EPSILON, SCHOOL_BODY_COLOR, SCHOOL_DOOR_COLOR,
    SCHOOL_GATE_START, SCHOOL_GATE_WIDTH, SCHOOL_ROOF_COLOR, SCHOOL_X, SCHOOL_Z,
};
use crate::easing::{clamp01, smoothstep, Mix};
use crate::error::{Result, StoryError};
use crate::transform::{Transform, TransformRaw};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateSample {
    pub local_t: f32,
    pub scale: f32,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdGate {
    start: f32,
    width: f32,
    min_scale: f32,
    visibility_epsilon: f32,
}

impl ThresholdGate {
    pub fn new(start: f32, width: f32) -> Result<Self> {
        if !(width > 0.0) || !width.is_finite() {
            return Err(StoryError::EmptyGateWindow { width });
        }
        Ok(Self {
            start,
            width,
            min_scale: GATE_MIN_SCALE,
            visibility_epsilon: GATE_VISIBILITY_EPSILON,
        })
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.start + self.width
    }

    pub fn min_scale(&self) -> f32 {
        self.min_scale
    }

    /// Progress within the window, clamped to \[0, 1\].
    pub fn local_t(&self, t: f32) -> f32 {
        clamp01((t - self.start) / self.width)
    }

    pub fn sample(&self, t: f32) -> GateSample {
        let local_t = self.local_t(t);
        let scale = self.min_scale.mix(1.0, smoothstep(local_t));
        GateSample {
            local_t,
            scale,
            visible: scale > self.visibility_epsilon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Box { size: Vec3 },
    Cone { radius: f32, height: f32, segments: u32 },
}

/// One piece of generated placeholder geometry, placed in the prop's space.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderPart {
    pub name: &'static str,
    pub primitive: Primitive,
    pub color: [f32; 3],
    pub transform: Transform,
}

impl PlaceholderPart {
    /// Render form of this part placed under `parent`, the prop's transform.
    pub fn to_raw(&self, parent: &Transform) -> PlaceholderRaw {
        let shape = match self.primitive {
            Primitive::Box { size } => [PlaceholderRaw::BOX, size.x, size.y, size.z],
            Primitive::Cone {
                radius,
                height,
                segments,
            } => [PlaceholderRaw::CONE, radius, height, segments as f32],
        };
        let [r, g, b] = self.color;
        PlaceholderRaw {
            shape,
            color: [r, g, b, 1.0],
            transform: TransformRaw::new(
                parent.then(&self.transform),
                parent.visible && self.transform.visible,
            ),
        }
    }
}

/// Placeholder part as handed to the render surface: primitive tag and
/// dimensions, RGBA colour, then the world transform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaceholderRaw {
    pub shape: [f32; 4],
    pub color: [f32; 4],
    pub transform: TransformRaw,
}

impl PlaceholderRaw {
    pub const FLOATS: usize = 8 + TransformRaw::FLOATS;
    pub const BOX: f32 = 0.0;
    pub const CONE: f32 = 1.0;
}

pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Blocky school: body, pyramid roof and a door, resting on the water.
pub fn school_placeholder(surface_y: f32) -> Vec<PlaceholderPart> {
    let at = |y: f32, z: f32| Vec3::new(SCHOOL_X, surface_y + y, z);
    vec![
        PlaceholderPart {
            name: "body",
            primitive: Primitive::Box {
                size: Vec3::new(0.8, 0.35, 0.5),
            },
            color: rgb_from_hex(SCHOOL_BODY_COLOR),
            transform: Transform::from_position(at(0.2, SCHOOL_Z)),
        },
        PlaceholderPart {
            name: "roof",
            primitive: Primitive::Cone {
                radius: 0.56,
                height: 0.25,
                segments: 4,
            },
            color: rgb_from_hex(SCHOOL_ROOF_COLOR),
            transform: Transform {
                rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
                ..Transform::from_position(at(0.47, SCHOOL_Z))
            },
        },
        PlaceholderPart {
            name: "door",
            primitive: Primitive::Box {
                size: Vec3::new(0.12, 0.18, 0.04),
            },
            color: rgb_from_hex(SCHOOL_DOOR_COLOR),
            transform: Transform::from_position(at(0.12, 0.33)),
        },
    ]
}

/// Where a gated prop's geometry comes from; decided once at construction.
#[derive(Clone, Debug)]
pub enum PropSource {
    ExternalAsset(SceneAsset),
    GeneratedPlaceholder {
        surface_y: f32,
        parts: Vec<PlaceholderPart>,
    },
}

/// A prop shown only inside its gate window. Its geometry tolerates an unset
/// calibration by resting at height zero until the surface is known.
#[derive(Clone, Debug)]
pub struct GatedProp {
    gate: ThresholdGate,
    source: PropSource,
    transform: Transform,
}

impl GatedProp {
    pub fn new(gate: ThresholdGate, external: Option<SceneAsset>) -> Self {
        let source = match external {
            Some(asset) => PropSource::ExternalAsset(asset),
            None => PropSource::GeneratedPlaceholder {
                surface_y: 0.0,
                parts: school_placeholder(0.0),
            },
        };
        let mut transform = Transform::default();
        transform.set_uniform_scale(gate.min_scale());
        transform.visible = false;
        Self {
            gate,
            source,
            transform,
        }
    }

    pub fn school(external: Option<SceneAsset>) -> Result<Self> {
        Ok(Self::new(
            ThresholdGate::new(SCHOOL_GATE_START, SCHOOL_GATE_WIDTH)?,
            external,
        ))
    }

    pub fn gate(&self) -> &ThresholdGate {
        &self.gate
    }

    pub fn source(&self) -> &PropSource {
        &self.source
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Generated parts, or none when an external model is shown.
    pub fn placeholder_parts(&self) -> &[PlaceholderPart] {
        match &self.source {
            PropSource::GeneratedPlaceholder { parts, .. } => parts.as_slice(),
            PropSource::ExternalAsset(_) => &[],
        }
    }

    /// Render blocks for the generated parts under the current gate transform.
    pub fn placeholder_raw(&self) -> Vec<PlaceholderRaw> {
        self.placeholder_parts()
            .iter()
            .map(|p| p.to_raw(&self.transform))
            .collect()
    }

    /// Swap the generated placeholder for a model that finished loading.
    pub fn set_external(&mut self, asset: SceneAsset) {
        self.source = PropSource::ExternalAsset(asset);
    }

    pub fn update(&mut self, t: f32, calibration: Calibration) -> &Transform {
        if let PropSource::GeneratedPlaceholder { surface_y, parts } = &mut self.source {
            let wanted = calibration.value_or_zero();
            if surface_y.to_bits() != wanted.to_bits() {
                *surface_y = wanted;
                *parts = school_placeholder(wanted);
            }
        }
        let sample = self.gate.sample(t);
        self.transform.set_uniform_scale(sample.scale);
        self.transform.visible = sample.visible;
        &self.transform
    }
}
