use crate::constants::{
    AMBIENT_INITIAL, AMBIENT_INTENSITY, DIRECTIONAL_INITIAL, DIRECTIONAL_INTENSITY,
};
use crate::easing::{clamp01, smoothstep, Mix};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightLevels {
    pub ambient: f32,
    pub directional: f32,
}

/// Warms the ambient and key light as the story progresses.
#[derive(Clone, Debug)]
pub struct AmbientLightController {
    ambient: (f32, f32),
    directional: (f32, f32),
    levels: LightLevels,
}

impl Default for AmbientLightController {
    fn default() -> Self {
        Self {
            ambient: AMBIENT_INTENSITY,
            directional: DIRECTIONAL_INTENSITY,
            levels: LightLevels {
                ambient: AMBIENT_INITIAL,
                directional: DIRECTIONAL_INITIAL,
            },
        }
    }
}

impl AmbientLightController {
    pub fn levels(&self) -> LightLevels {
        self.levels
    }

    pub fn update(&mut self, t: f32) -> LightLevels {
        let warm = smoothstep(clamp01(t));
        self.levels = LightLevels {
            ambient: self.ambient.0.mix(self.ambient.1, warm),
            directional: self.directional.0.mix(self.directional.1, warm),
        };
        self.levels
    }
}
