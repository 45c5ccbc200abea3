//! Placement of the room inside the page's 3D canvas

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, rotation and scale handed to the room's render group.
///
/// The room does not interpret these; they are forwarded as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Euler angles in radians, XYZ order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation_euler: Vec3) -> Self {
        self.rotation = rotation_euler;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix for renderers that want one
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}
