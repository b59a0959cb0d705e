mod render;

pub use render::*;

use glam::{Mat4, Quat, Vec3};

/// Spatial transform with position, rotation, and scale (local space).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Translate, then rotate, then scale: `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Frame the LocalTransform is expressed in, e.g. a turn about the cake axis
/// for objects placed around the ring. Model matrix = pivot * local.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pivot(pub Mat4);

impl Pivot {
    /// Rotation of `degrees` about a vertical axis through `origin`.
    pub fn around_y(origin: Vec3, degrees: f32) -> Self {
        Self(Mat4::from_translation(origin) * Mat4::from_rotation_y(degrees.to_radians()))
    }
}
