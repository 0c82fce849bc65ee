//! Minimal view of a loaded 3D asset: enough to measure it, scale it and find
//! labelled sub-parts. Decoding and rendering stay with the host.

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Bounds after a uniform scale about the origin followed by a translation.
    pub fn scaled_translated(&self, scale: f32, offset: Vec3) -> Aabb {
        Aabb::new(self.min * scale + offset, self.max * scale + offset)
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// A named piece of an asset with its bounds in asset space.
#[derive(Clone, Debug)]
pub struct AssetPart {
    pub name: String,
    pub material: Option<String>,
    pub bounds: Option<Aabb>,
}

impl AssetPart {
    pub fn new(name: impl Into<String>, bounds: Option<Aabb>) -> Self {
        Self {
            name: name.into(),
            material: None,
            bounds,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Lower-cased "name material" label used for marker matching.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.material.as_deref().unwrap_or("")).to_lowercase()
    }

    pub fn matches_any(&self, markers: &[&str]) -> bool {
        let label = self.label();
        markers.iter().any(|m| label.contains(&m.to_lowercase()))
    }
}

/// What the surface calibrator needs from an asset.
pub trait CalibrationTarget {
    /// Bounds in the asset's own space, before placement and scale.
    fn native_bounds(&self) -> Option<Aabb>;
    fn apply_uniform_scale(&mut self, scale: f32);
    fn uniform_scale(&self) -> f32;
    /// World bounds of the first part with geometry whose label contains any
    /// marker.
    fn marked_part_bounds(&self, markers: &[&str]) -> Option<Aabb>;
    /// World position of the asset's placement origin.
    fn world_origin(&self) -> Vec3;
}

/// A placed asset: flat list of parts under one group transform
/// (translation + uniform scale).
#[derive(Clone, Debug)]
pub struct SceneAsset {
    parts: Vec<AssetPart>,
    position: Vec3,
    scale: f32,
}

impl SceneAsset {
    pub fn new(position: Vec3) -> Self {
        Self {
            parts: Vec::new(),
            position,
            scale: 1.0,
        }
    }

    pub fn with_part(mut self, part: AssetPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn push_part(&mut self, part: AssetPart) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[AssetPart] {
        &self.parts
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        self.native_bounds()
            .map(|b| b.scaled_translated(self.scale, self.position))
    }
}

impl CalibrationTarget for SceneAsset {
    fn native_bounds(&self) -> Option<Aabb> {
        self.parts
            .iter()
            .filter_map(|p| p.bounds)
            .filter(Aabb::is_finite)
            .reduce(|a, b| a.union(&b))
    }

    fn apply_uniform_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn uniform_scale(&self) -> f32 {
        self.scale
    }

    fn marked_part_bounds(&self, markers: &[&str]) -> Option<Aabb> {
        // Grouping nodes carry no geometry and never stand in for the surface.
        self.parts
            .iter()
            .filter_map(|p| p.bounds.filter(Aabb::is_finite).map(|b| (p, b)))
            .find(|(p, _)| p.matches_any(markers))
            .map(|(_, b)| b.scaled_translated(self.scale, self.position))
    }

    fn world_origin(&self) -> Vec3 {
        self.position
    }
}
