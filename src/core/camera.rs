//! Scene camera
//!
//! A right-handed perspective camera parked on +Z. The per-frame sway moves
//! it around its resting position while it keeps looking at the origin.

use glam::{Mat4, Vec3};

use super::config::CameraConfig;

/// Perspective camera that always looks at the origin
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Resting position, the per-frame sway is applied around it
    home: Vec3,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let home = Vec3::new(0.0, 0.0, config.distance);
        Self {
            position: home,
            target: Vec3::ZERO,
            fov: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
            home,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Move the camera by `offset` from its resting position, keeping it aimed at the target
    pub fn set_offset(&mut self, offset: Vec3) {
        self.position = self.home + offset;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// OpenGL-style projection (clip z in [-w, w])
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }
}
