//! Deterministic cinematic core
//!
//! Everything that decides where the camera is lives here. This module must be
//! pure and deterministic:
//! - Loop phase derived from an epoch, never accumulated
//! - Camera pose is a function of loop seconds only
//! - No rendering or platform dependencies

pub mod clock;
pub mod convoy;
pub mod director;
pub mod timeline;

pub use clock::{PauseMode, PlaybackClock, PlaybackSnapshot, loop_phase};
pub use convoy::{CONVOY_LAYOUT, CarLayout, ConvoyFrame, MotionConfig, origin_z};
pub use director::{CameraDirector, CameraRig, ConvoyNode, DirectorSample, FrameOutcome};
pub use timeline::{CameraPose, Progress, Shot, Timeline, TimelineSegment};
