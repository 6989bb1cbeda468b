//! Convoy motion model
//!
//! The convoy is a rigid group: its root translates along -Z at constant speed
//! and the cars keep fixed offsets inside the group. Position is a pure
//! function of loop seconds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// Convoy path parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Forward speed along -Z (units/s)
    pub convoy_speed: f32,
    /// Lateral position of the path
    pub convoy_x: f32,
    /// Height of the car bodies, used as the look-at height
    pub convoy_y: f32,
    /// Visual wheel spin rate (radians/s)
    pub wheel_spin_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            convoy_speed: CONVOY_SPEED,
            convoy_x: CONVOY_X,
            convoy_y: CONVOY_Y,
            wheel_spin_speed: WHEEL_SPIN_SPEED,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.convoy_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.convoy_speed));
        }
        Ok(())
    }

    /// Longitudinal offset of the convoy root after `s` loop seconds
    #[inline]
    pub fn origin_z(&self, s: f32) -> f32 {
        -s * self.convoy_speed
    }

    /// Wheel rotation about the axle after `s` loop seconds
    ///
    /// Driven by loop time, so the wheels snap back to their starting angle at
    /// each wrap and on restart, in step with the rest of the scene.
    #[inline]
    pub fn wheel_roll(&self, s: f32) -> f32 {
        -s * self.wheel_spin_speed
    }

    pub fn frame_at(&self, s: f32) -> ConvoyFrame {
        ConvoyFrame {
            origin_x: self.convoy_x,
            origin_z: self.origin_z(s),
        }
    }
}

/// Convoy offset at the default speed
#[inline]
pub fn origin_z(s: f32) -> f32 {
    -s * CONVOY_SPEED
}

/// The moving reference frame camera shots are authored against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvoyFrame {
    pub origin_x: f32,
    pub origin_z: f32,
}

impl ConvoyFrame {
    /// Ground-level origin of the frame in world space
    #[inline]
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.origin_x, 0.0, self.origin_z)
    }

    /// Convert a frame-local point to world space
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin() + local
    }
}

/// One car's placement inside the convoy group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarLayout {
    /// Offset from the convoy root
    pub offset: Vec3,
    /// Body colour (`0xRRGGBB`)
    pub color: u32,
}

/// Three off-road cars in a staggered column
pub const CONVOY_LAYOUT: [CarLayout; 3] = [
    CarLayout {
        offset: Vec3::new(0.0, 0.0, 0.0),
        color: 0xb23a48,
    },
    CarLayout {
        offset: Vec3::new(-2.6, 0.0, -6.0),
        color: 0x2b6cb0,
    },
    CarLayout {
        offset: Vec3::new(2.4, 0.0, -12.0),
        color: 0x2f855a,
    },
];

/// Car body proportions, relative to the car origin on the sand
pub mod car {
    use glam::Vec3;

    pub const BODY_SIZE: Vec3 = Vec3::new(1.8, 0.6, 4.0);
    pub const BODY_CENTER: Vec3 = Vec3::new(0.0, 0.9, 0.0);
    pub const CAB_SIZE: Vec3 = Vec3::new(1.5, 0.6, 1.6);
    pub const CAB_CENTER: Vec3 = Vec3::new(0.0, 1.2, -0.6);
    pub const WHEEL_RADIUS: f32 = 0.45;
    pub const WHEEL_WIDTH: f32 = 0.3;
    pub const WHEEL_SEGMENTS: u32 = 18;
    /// Axle centres of the four wheels
    pub const WHEEL_HUBS: [Vec3; 4] = [
        Vec3::new(-0.9, 0.45, -1.5),
        Vec3::new(-0.9, 0.45, 1.5),
        Vec3::new(0.9, 0.45, -1.5),
        Vec3::new(0.9, 0.45, 1.5),
    ];
    pub const TYRE_COLOR: u32 = 0x222222;
}
