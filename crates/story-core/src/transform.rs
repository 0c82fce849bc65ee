use glam::{Mat4, Quat, Vec3};

/// Position, orientation, scale and visibility of one animated object.
///
/// Each animated component owns exactly one of these and is its only writer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Matrix of `child` expressed in this transform's parent space.
    pub fn then(&self, child: &Transform) -> Mat4 {
        self.matrix() * child.matrix()
    }

    pub fn to_raw(&self) -> TransformRaw {
        TransformRaw::new(self.matrix(), self.visible)
    }
}

/// GPU/JS friendly form handed to the render surface: column-major model
/// matrix followed by a visibility flag (1.0 or 0.0) and padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
    pub visible: f32,
    pub _pad: [f32; 3],
}

impl TransformRaw {
    pub const FLOATS: usize = 20;

    pub fn new(model: Mat4, visible: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            visible: if visible { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}
