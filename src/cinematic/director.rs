//! Camera director
//!
//! A pure function of loop seconds: pick the segment containing `s`, evaluate
//! its shot in the convoy frame, move the result into world space. No frame
//! history is kept, so any `s` can be replayed in isolation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::convoy::{ConvoyFrame, MotionConfig};
use super::timeline::{CameraPose, Timeline};
use crate::error::ConfigResult;

/// Camera object owned by the rendering host
pub trait CameraRig {
    fn set_position(&mut self, position: Vec3);
    fn look_at(&mut self, target: Vec3);
}

/// Convoy group node owned by the rendering host
pub trait ConvoyNode {
    fn set_translation(&mut self, translation: Vec3);
    fn set_wheel_roll(&mut self, radians: f32);
}

/// Everything the director derives for one loop time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectorSample {
    /// Loop seconds after clamping into `[0, duration)`
    pub loop_seconds: f32,
    pub segment_index: usize,
    pub convoy: ConvoyFrame,
    pub pose: CameraPose,
    pub wheel_roll: f32,
}

/// Result of driving one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Camera and convoy were updated
    Applied(DirectorSample),
    /// Playback is paused; the director was not invoked
    Paused,
    /// Camera or convoy is not mounted yet; nothing was touched
    MissingScene,
}

impl FrameOutcome {
    pub fn sample(&self) -> Option<&DirectorSample> {
        match self {
            FrameOutcome::Applied(sample) => Some(sample),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDirector {
    timeline: Timeline,
    motion: MotionConfig,
}

impl CameraDirector {
    pub fn new(timeline: Timeline, motion: MotionConfig) -> ConfigResult<Self> {
        motion.validate()?;
        Ok(Self { timeline, motion })
    }

    /// Director for the default desert convoy shot list
    pub fn desert_convoy() -> ConfigResult<Self> {
        let motion = MotionConfig::default();
        Self::new(Timeline::desert_convoy(&motion)?, motion)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// World-space camera pose at loop time `s`
    pub fn pose_at(&self, s: f32) -> CameraPose {
        self.sample(s).pose
    }

    pub fn sample(&self, s: f32) -> DirectorSample {
        let s = self.timeline.clamp_seconds(s);
        let convoy = self.motion.frame_at(s);
        DirectorSample {
            loop_seconds: s,
            segment_index: self.timeline.segment_index(s),
            convoy,
            pose: self.timeline.local_pose(s).to_world(&convoy),
            wheel_roll: self.motion.wheel_roll(s),
        }
    }

    /// Evaluate `s` and push the result into the host's scene objects
    ///
    /// Does nothing unless both the camera and the convoy node are available.
    pub fn drive(
        &self,
        s: f32,
        camera: Option<&mut dyn CameraRig>,
        convoy: Option<&mut dyn ConvoyNode>,
    ) -> FrameOutcome {
        let (Some(camera), Some(convoy)) = (camera, convoy) else {
            return FrameOutcome::MissingScene;
        };

        let sample = self.sample(s);
        convoy.set_translation(sample.convoy.origin());
        convoy.set_wheel_roll(sample.wheel_roll);
        camera.set_position(sample.pose.position);
        camera.look_at(sample.pose.target);
        FrameOutcome::Applied(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use proptest::prelude::*;

    #[derive(Default)]
    struct RecordingCamera {
        position: Option<Vec3>,
        target: Option<Vec3>,
    }

    impl CameraRig for RecordingCamera {
        fn set_position(&mut self, position: Vec3) {
            self.position = Some(position);
        }
        fn look_at(&mut self, target: Vec3) {
            self.target = Some(target);
        }
    }

    #[derive(Default)]
    struct RecordingConvoy {
        translation: Option<Vec3>,
        roll: f32,
    }

    impl ConvoyNode for RecordingConvoy {
        fn set_translation(&mut self, translation: Vec3) {
            self.translation = Some(translation);
        }
        fn set_wheel_roll(&mut self, radians: f32) {
            self.roll = radians;
        }
    }

    fn director() -> CameraDirector {
        CameraDirector::desert_convoy().unwrap()
    }

    fn assert_near(a: Vec3, b: Vec3, eps: f32) {
        assert!(a.distance(b) < eps, "{a} != {b}");
    }

    #[test]
    fn test_opening_orbit_pose() {
        let pose = director().pose_at(0.0);
        assert_near(pose.position, Vec3::new(12.0, 3.0, 3.0), 1e-5);
        assert_near(pose.target, Vec3::new(0.0, 0.7, 1.0), 1e-5);
    }

    #[test]
    fn test_mid_orbit_pose() {
        let d = director();
        let pose = d.pose_at(1.5);
        let cz = d.motion().origin_z(1.5);
        assert_eq!(cz, -12.0);
        assert_near(pose.position, Vec3::new(-8.0, 2.1, cz + 3.0), 1e-4);
    }

    #[test]
    fn test_orbit_closes_low_and_tight() {
        // Nearly a full sweep, before the blend window opens
        let d = director();
        let pose = d.pose_at(2.5);
        let local = pose.position - d.motion().frame_at(2.5).origin();
        assert!(local.y < 1.6);
        assert!(local.x > 0.0);
    }

    #[test]
    fn test_reveal_and_drift_targets_follow_convoy() {
        let d = director();
        let cy = d.motion().convoy_y;
        let pose = d.pose_at(10.0);
        assert_near(pose.target, Vec3::new(0.0, cy, -80.0 - 10.0), 1e-4);
        let pose = d.pose_at(14.0);
        assert_near(pose.target, Vec3::new(-10.0, cy, -112.0 - 40.0), 1e-4);
        assert!((pose.position.y - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_continuity_at_every_boundary() {
        let d = director();
        for boundary in [3.0f32, 6.0, 9.0, 11.0, 13.0] {
            let before = d.pose_at(boundary - 1e-4);
            let after = d.pose_at(boundary);
            // Convoy travels 8e-4 units in 1e-4s
            assert!(
                before.distance(&after) < 1e-2,
                "jump of {} at {boundary}s",
                before.distance(&after)
            );
        }
    }

    #[test]
    fn test_sample_clamps_wrap_boundary() {
        let d = director();
        let sample = d.sample(15.0);
        assert_eq!(sample.segment_index, 5);
        assert!(sample.loop_seconds < 15.0);
        assert!(sample.pose.position.is_finite());
    }

    #[test]
    fn test_drive_updates_scene() {
        let d = director();
        let mut camera = RecordingCamera::default();
        let mut convoy = RecordingConvoy::default();
        let outcome = d.drive(5.0, Some(&mut camera), Some(&mut convoy));
        let sample = outcome.sample().copied().unwrap();
        assert_eq!(convoy.translation, Some(Vec3::new(0.0, 0.0, -40.0)));
        assert_eq!(convoy.roll, -30.0);
        assert_eq!(camera.position, Some(sample.pose.position));
        assert_eq!(camera.target, Some(sample.pose.target));
    }

    #[test]
    fn test_drive_without_scene_is_noop() {
        let d = director();
        let mut camera = RecordingCamera::default();
        let mut convoy = RecordingConvoy::default();
        assert_eq!(d.drive(5.0, Some(&mut camera), None), FrameOutcome::MissingScene);
        assert_eq!(camera.position, None);
        assert_eq!(d.drive(5.0, None, Some(&mut convoy)), FrameOutcome::MissingScene);
        assert_eq!(convoy.translation, None);
    }

    #[test]
    fn test_rejects_invalid_motion() {
        let motion = MotionConfig {
            convoy_speed: -1.0,
            ..Default::default()
        };
        let timeline = Timeline::desert_convoy(&motion).unwrap();
        assert_eq!(
            CameraDirector::new(timeline, motion),
            Err(ConfigError::NonPositiveSpeed(-1.0))
        );
    }

    proptest! {
        #[test]
        fn replay_is_deterministic(s in 0.0f32..15.0) {
            let d = director();
            prop_assert_eq!(d.sample(s), d.sample(s));
        }

        #[test]
        fn pose_is_continuous_inside_segments(s in 0.0f32..14.99) {
            // Small steps never teleport the camera, even across boundaries
            let d = director();
            let a = d.pose_at(s);
            let b = d.pose_at(s + 1e-3);
            prop_assert!(a.distance(&b) < 2.0, "jump {} at {s}", a.distance(&b));
        }
    }
}
