//! Convoy Cinematic - a looping desert convoy fly-through
//!
//! Core modules:
//! - `cinematic`: Deterministic camera choreography (clock, convoy motion, timeline, director)
//! - `easing`: Normalized easing curves used by the timeline
//! - `terrain`: Analytic dune height field
//! - `player`: Scene root wiring the clock to the director
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Viewer preferences persisted in LocalStorage

pub mod cinematic;
pub mod easing;
pub mod error;
pub mod platform;
pub mod player;
pub mod renderer;
pub mod settings;
pub mod terrain;

pub use error::{ConfigError, ConfigResult};
pub use player::Player;
pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Cinematic configuration constants
pub mod consts {
    /// Length of one loop of the cinematic (seconds)
    pub const LOOP_DURATION: f64 = 15.0;

    /// Convoy forward speed along -Z (units/s)
    pub const CONVOY_SPEED: f32 = 8.0;
    /// Lateral position of the convoy path
    pub const CONVOY_X: f32 = 0.0;
    /// Height of the car bodies above the sand
    pub const CONVOY_Y: f32 = 0.9;
    /// Visual wheel spin rate (radians/s)
    pub const WHEEL_SPIN_SPEED: f32 = 6.0;

    /// Segment boundaries of the default shot list (seconds)
    pub const SHOT_BOUNDARIES: [f32; 7] = [0.0, 3.0, 6.0, 9.0, 11.0, 13.0, 15.0];
    /// Blend-out window at the end of each shot (seconds)
    pub const SHOT_BLEND: f32 = 0.4;

    /// Terrain plane edge length (world units)
    pub const TERRAIN_SIZE: f32 = 800.0;
    /// Terrain subdivisions per side
    pub const TERRAIN_SEGMENTS: u32 = 256;
    /// Horizontal scale of the dune wavelengths
    pub const DUNE_SCALE: f32 = 80.0;

    /// Camera lens defaults
    pub const CAMERA_FOV_DEGREES: f32 = 60.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 2000.0;
    pub const CAMERA_START: [f32; 3] = [0.0, 3.0, 10.0];

    /// Atmospheric fog range (world units from the camera)
    pub const FOG_NEAR: f32 = 10.0;
    pub const FOG_FAR: f32 = 400.0;
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Convert an sRGB hex colour (`0xRRGGBB`) to linear RGBA
pub fn hex_to_linear(hex: u32) -> [f32; 4] {
    fn channel(c: u32) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    [
        channel((hex >> 16) & 0xff),
        channel((hex >> 8) & 0xff),
        channel(hex & 0xff),
        1.0,
    ]
}
