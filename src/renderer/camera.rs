//! Scene objects the director writes into

use glam::{Mat4, Vec3};

use crate::cinematic::{CameraRig, ConvoyNode};
use crate::consts::*;

/// Perspective camera aimed with a look-at target
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height
    pub aspect: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            position: Vec3::from_array(CAMERA_START),
            target: Vec3::new(CONVOY_X, CONVOY_Y + 0.4, -6.0),
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            aspect: 16.0 / 9.0,
        }
    }
}

impl SceneCamera {
    /// Update aspect ratio (call on canvas resize)
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = (self.target - self.position).normalize_or(Vec3::NEG_Z);
        // Straight-down shots need an up vector that is not parallel to the view
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.position + forward, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl CameraRig for SceneCamera {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}

/// Root transform of the convoy group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvoyTransform {
    pub translation: Vec3,
    /// Wheel rotation about the axle (radians)
    pub wheel_roll: f32,
}

impl ConvoyNode for ConvoyTransform {
    fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    fn set_wheel_roll(&mut self, radians: f32) {
        self.wheel_roll = radians;
    }
}
