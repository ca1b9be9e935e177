//! Math utilities
//!
//! Re-exports glam with the spatial state a pool restores on release.

pub use glam::*;

/// Position, rotation and scale of an instance or template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spatial {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Spatial {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
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
}

impl Default for Spatial {
    fn default() -> Self {
        Self::IDENTITY
    }
}
