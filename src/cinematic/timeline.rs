//! Shot timeline
//!
//! The choreography is data: an ordered list of segments that exactly tile
//! `[0, duration)`. Each segment names a [`Shot`] whose parameters are offsets
//! in the convoy frame (ground-level origin of the moving convoy), an easing
//! curve for its local progress, and an optional blend-out window that eases
//! the camera into the next segment's opening pose.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::convoy::{ConvoyFrame, MotionConfig};
use crate::consts::*;
use crate::easing::{Ease, cubic_in_out};
use crate::error::{ConfigError, ConfigResult};
use crate::{lerp, lerp_vec3};

/// How far before a boundary the left-hand pose is sampled (seconds)
const BOUNDARY_PROBE: f32 = 1e-3;

/// Camera position and look-at target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Blend two poses component-wise
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: lerp_vec3(self.position, other.position, t),
            target: lerp_vec3(self.target, other.target, t),
        }
    }

    /// Move both points out of a convoy frame into world space
    pub fn to_world(&self, frame: &ConvoyFrame) -> CameraPose {
        CameraPose {
            position: frame.to_world(self.position),
            target: frame.to_world(self.target),
        }
    }

    /// Largest displacement of either point
    pub fn distance(&self, other: &CameraPose) -> f32 {
        self.position
            .distance(other.position)
            .max(self.target.distance(other.target))
    }
}

/// Local progress through a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Linear progress `p` in `[0, 1]`
    pub linear: f32,
    /// `p` after the segment's easing curve
    pub eased: f32,
}

/// A parameterized camera move, authored in the convoy frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shot {
    /// Camera circles a pivot while pulling in and dropping
    Orbit {
        pivot: Vec3,
        radius: (f32, f32),
        height: (f32, f32),
        sweep_degrees: (f32, f32),
        target: (Vec3, Vec3),
    },
    /// Low skim across the side of the column while travelling backwards through it
    LateralSkim {
        x: (f32, f32),
        height: f32,
        lead: f32,
        travel: f32,
        target_lead: f32,
        target_height: f32,
    },
    /// Near-sand pass under the rear car; only the height is eased
    LowPass {
        height: (f32, f32),
        x: (f32, f32),
        lead: f32,
        travel: f32,
        target_gap: f32,
        target_height: f32,
    },
    /// Climb and pull back to reveal the plain
    VerticalReveal {
        height: (f32, f32),
        back: (f32, f32),
        x: f32,
        target: Vec3,
    },
    /// Settle into a high, slightly tilted overhead
    TopDown {
        height: (f32, f32),
        back: (f32, f32),
        x: f32,
        target: Vec3,
    },
    /// Slow sideways drift away from the convoy
    LateralDrift {
        x: (f32, f32),
        height: f32,
        back: f32,
        target: Vec3,
    },
}

impl Shot {
    pub fn name(&self) -> &'static str {
        match self {
            Shot::Orbit { .. } => "orbit",
            Shot::LateralSkim { .. } => "lateral-skim",
            Shot::LowPass { .. } => "low-pass",
            Shot::VerticalReveal { .. } => "vertical-reveal",
            Shot::TopDown { .. } => "top-down",
            Shot::LateralDrift { .. } => "lateral-drift",
        }
    }

    /// Pose in the convoy frame for the given progress
    pub fn local_pose(&self, progress: Progress) -> CameraPose {
        let r = progress.eased;
        match self {
            Shot::Orbit {
                pivot,
                radius,
                height,
                sweep_degrees,
                target,
            } => {
                let radius = lerp(radius.0, radius.1, r);
                let angle = lerp(sweep_degrees.0, sweep_degrees.1, r).to_radians();
                let position = Vec3::new(
                    pivot.x + angle.cos() * radius,
                    lerp(height.0, height.1, r),
                    pivot.z + angle.sin() * radius,
                );
                CameraPose::new(position, lerp_vec3(target.0, target.1, r))
            }
            Shot::LateralSkim {
                x,
                height,
                lead,
                travel,
                target_lead,
                target_height,
            } => CameraPose::new(
                Vec3::new(lerp(x.0, x.1, r), *height, lead - travel * r),
                Vec3::new(0.0, *target_height, target_lead - travel * r),
            ),
            Shot::LowPass {
                height,
                x,
                lead,
                travel,
                target_gap,
                target_height,
            } => {
                let p = progress.linear;
                let z = lead - travel * p;
                CameraPose::new(
                    Vec3::new(lerp(x.0, x.1, p), lerp(height.0, height.1, r), z),
                    Vec3::new(0.0, *target_height, z - target_gap),
                )
            }
            Shot::VerticalReveal {
                height,
                back,
                x,
                target,
            } => CameraPose::new(
                Vec3::new(x * (1.0 - r), lerp(height.0, height.1, r), lerp(back.0, back.1, r)),
                *target,
            ),
            Shot::TopDown {
                height,
                back,
                x,
                target,
            } => CameraPose::new(
                Vec3::new(*x, lerp(height.0, height.1, r), lerp(back.0, back.1, r)),
                *target,
            ),
            Shot::LateralDrift {
                x,
                height,
                back,
                target,
            } => CameraPose::new(Vec3::new(lerp(x.0, x.1, r), *height, *back), *target),
        }
    }
}

/// One contiguous window of the loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub ease: Ease,
    pub shot: Shot,
    /// Seconds at the end of the segment spent easing into the next segment's
    /// opening pose (0 = hard cut)
    #[serde(default)]
    pub blend_out: f32,
}

impl TimelineSegment {
    pub fn new(start_seconds: f32, end_seconds: f32, ease: Ease, shot: Shot) -> Self {
        Self {
            start_seconds,
            end_seconds,
            ease,
            shot,
            blend_out: 0.0,
        }
    }

    pub fn with_blend_out(mut self, seconds: f32) -> Self {
        self.blend_out = seconds;
        self
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.end_seconds - self.start_seconds
    }

    #[inline]
    pub fn contains(&self, s: f32) -> bool {
        self.start_seconds <= s && s < self.end_seconds
    }

    /// Local progress at loop time `s`, clamped into the segment
    pub fn progress(&self, s: f32) -> Progress {
        let linear = ((s - self.start_seconds) / self.length()).clamp(0.0, 1.0);
        Progress {
            linear,
            eased: self.ease.apply(linear),
        }
    }

    /// Convoy-frame pose at loop time `s`, ignoring any blend
    pub fn local_pose(&self, s: f32) -> CameraPose {
        self.shot.local_pose(self.progress(s))
    }

    /// Weight of the next segment's opening pose at `s` (0 outside the blend window)
    pub fn blend_weight(&self, s: f32) -> f32 {
        if self.blend_out <= 0.0 {
            return 0.0;
        }
        let blend_start = self.end_seconds - self.blend_out;
        if s <= blend_start {
            return 0.0;
        }
        cubic_in_out(((s - blend_start) / self.blend_out).clamp(0.0, 1.0))
    }
}

/// Validated, read-only shot list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    duration: f64,
    segments: Vec<TimelineSegment>,
}

impl Timeline {
    /// Validate that `segments` exactly tile `[0, duration)`
    pub fn new(duration: f64, segments: Vec<TimelineSegment>) -> ConfigResult<Self> {
        if !(duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration(duration));
        }
        let first = segments.first().ok_or(ConfigError::EmptyTimeline)?;
        if first.start_seconds != 0.0 {
            return Err(ConfigError::TimelineStart {
                start: first.start_seconds,
            });
        }

        let last_index = segments.len() - 1;
        let mut expected = 0.0f32;
        for (index, seg) in segments.iter().enumerate() {
            if seg.start_seconds > expected {
                return Err(ConfigError::TimelineGap {
                    index,
                    expected,
                    found: seg.start_seconds,
                });
            }
            if seg.start_seconds < expected {
                return Err(ConfigError::TimelineOverlap {
                    index,
                    expected,
                    found: seg.start_seconds,
                });
            }
            if !(seg.end_seconds > seg.start_seconds) {
                return Err(ConfigError::InvertedSegment { index });
            }
            let blend_ok = seg.blend_out >= 0.0
                && seg.blend_out <= seg.length()
                && (index < last_index || seg.blend_out == 0.0);
            if !blend_ok {
                return Err(ConfigError::InvalidBlend {
                    index,
                    seconds: seg.blend_out,
                });
            }
            expected = seg.end_seconds;
        }

        // Segment bounds are f32 seconds; compare at that precision
        if expected != duration as f32 {
            return Err(ConfigError::TimelineEnd {
                end: expected,
                duration,
            });
        }

        Ok(Self { duration, segments })
    }

    /// The six-shot desert convoy sequence
    pub fn desert_convoy(motion: &MotionConfig) -> ConfigResult<Self> {
        let cy = motion.convoy_y;
        let b = SHOT_BOUNDARIES;

        let segments = vec![
            TimelineSegment::new(
                b[0],
                b[1],
                Ease::CubicInOut,
                Shot::Orbit {
                    pivot: Vec3::new(0.0, cy + 0.8, 3.0),
                    radius: (12.0, 4.0),
                    height: (3.0, 1.2),
                    sweep_degrees: (0.0, 360.0),
                    target: (Vec3::new(0.0, 0.7, 1.0), Vec3::new(0.0, cy + 0.7, 1.0)),
                },
            ),
            TimelineSegment::new(
                b[1],
                b[2],
                Ease::CubicInOut,
                Shot::LateralSkim {
                    x: (2.8, -1.2),
                    height: 0.6,
                    lead: -3.0,
                    travel: 12.0,
                    target_lead: -6.0,
                    target_height: cy + 0.5,
                },
            ),
            TimelineSegment::new(
                b[2],
                b[3],
                Ease::ExpoOut,
                Shot::LowPass {
                    height: (0.35, 0.7),
                    x: (-0.8, 0.8),
                    lead: -10.0,
                    travel: 8.0,
                    target_gap: 2.0,
                    target_height: cy + 0.6,
                },
            ),
            TimelineSegment::new(
                b[3],
                b[4],
                Ease::ExpoOut,
                Shot::VerticalReveal {
                    height: (1.2, 60.0),
                    back: (6.0, 80.0),
                    x: 12.0,
                    target: Vec3::new(0.0, cy, -10.0),
                },
            ),
            TimelineSegment::new(
                b[4],
                b[5],
                Ease::CubicInOut,
                Shot::TopDown {
                    height: (60.0, 100.0),
                    back: (80.0, 120.0),
                    x: 10.0,
                    target: Vec3::new(0.0, cy, -20.0),
                },
            ),
            TimelineSegment::new(
                b[5],
                b[6],
                Ease::CubicInOut,
                Shot::LateralDrift {
                    x: (10.0, 40.0),
                    height: 110.0,
                    back: 140.0,
                    target: Vec3::new(-10.0, cy, -40.0),
                },
            ),
        ];

        let last = segments.len() - 1;
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(i, seg)| if i < last { seg.with_blend_out(SHOT_BLEND) } else { seg })
            .collect();

        Self::new(LOOP_DURATION, segments)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    /// Clamp `s` into `[0, duration)` so lookup always matches a segment
    pub fn clamp_seconds(&self, s: f32) -> f32 {
        let end = self.duration as f32;
        if !(s >= 0.0) {
            0.0
        } else if s >= end {
            end * (1.0 - f32::EPSILON)
        } else {
            s
        }
    }

    /// Index of the unique segment containing `s` (after clamping)
    pub fn segment_index(&self, s: f32) -> usize {
        let s = self.clamp_seconds(s);
        // Segments are sorted and contiguous: the match is the last one starting at or before s
        let idx = self.segments.partition_point(|seg| seg.start_seconds <= s);
        idx.saturating_sub(1)
    }

    pub fn segment_at(&self, s: f32) -> &TimelineSegment {
        &self.segments[self.segment_index(s)]
    }

    /// Convoy-frame pose at `s`, including any blend into the next segment
    pub fn local_pose(&self, s: f32) -> CameraPose {
        let s = self.clamp_seconds(s);
        let index = self.segment_index(s);
        let seg = &self.segments[index];
        let pose = seg.local_pose(s);

        let weight = seg.blend_weight(s);
        match self.segments.get(index + 1) {
            Some(next) if weight > 0.0 => {
                let opening = next.shot.local_pose(next.progress(next.start_seconds));
                pose.lerp(&opening, weight)
            }
            _ => pose,
        }
    }

    /// Pose displacement across each internal boundary, as `(seconds, jump)`
    ///
    /// Compares the pose just before each boundary with the pose at it. Poses
    /// are taken in the convoy frame so the convoy's own travel is excluded.
    pub fn boundary_jumps(&self) -> Vec<(f32, f32)> {
        self.segments
            .iter()
            .skip(1)
            .map(|seg| {
                let boundary = seg.start_seconds;
                let before = self.local_pose(boundary - BOUNDARY_PROBE);
                let after = self.local_pose(boundary);
                (boundary, before.distance(&after))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn timeline() -> Timeline {
        Timeline::desert_convoy(&MotionConfig::default()).unwrap()
    }

    fn still_shot() -> Shot {
        Shot::LateralDrift {
            x: (0.0, 1.0),
            height: 1.0,
            back: 1.0,
            target: Vec3::ZERO,
        }
    }

    #[test]
    fn test_default_timeline_has_six_shots() {
        let t = timeline();
        let names: Vec<_> = t.segments().iter().map(|s| s.shot.name()).collect();
        assert_eq!(
            names,
            [
                "orbit",
                "lateral-skim",
                "low-pass",
                "vertical-reveal",
                "top-down",
                "lateral-drift"
            ]
        );
        assert_eq!(t.duration(), 15.0);
    }

    #[test]
    fn test_segment_lookup_at_boundaries() {
        let t = timeline();
        assert_eq!(t.segment_index(0.0), 0);
        assert_eq!(t.segment_index(2.999), 0);
        assert_eq!(t.segment_index(3.0), 1);
        assert_eq!(t.segment_index(9.0), 3);
        assert_eq!(t.segment_index(13.0), 5);
        assert_eq!(t.segment_index(14.9999), 5);
    }

    #[test]
    fn test_out_of_range_seconds_are_clamped() {
        let t = timeline();
        assert_eq!(t.segment_index(15.0), 5);
        assert_eq!(t.segment_index(99.0), 5);
        assert_eq!(t.segment_index(-1.0), 0);
        assert_eq!(t.segment_index(f32::NAN), 0);
        assert!(t.clamp_seconds(15.0) < 15.0);
    }

    #[test]
    fn test_rejects_gap() {
        let segs = vec![
            TimelineSegment::new(0.0, 3.0, Ease::Linear, still_shot()),
            TimelineSegment::new(4.0, 15.0, Ease::Linear, still_shot()),
        ];
        assert_eq!(
            Timeline::new(15.0, segs),
            Err(ConfigError::TimelineGap {
                index: 1,
                expected: 3.0,
                found: 4.0
            })
        );
    }

    #[test]
    fn test_rejects_overlap() {
        let segs = vec![
            TimelineSegment::new(0.0, 3.0, Ease::Linear, still_shot()),
            TimelineSegment::new(2.0, 15.0, Ease::Linear, still_shot()),
        ];
        assert!(matches!(
            Timeline::new(15.0, segs),
            Err(ConfigError::TimelineOverlap { index: 1, .. })
        ));
    }

    #[test]
    fn test_accepts_duration_not_exact_in_f32() {
        let t = Timeline::new(
            15.1,
            vec![
                TimelineSegment::new(0.0, 7.3, Ease::Linear, still_shot()),
                TimelineSegment::new(7.3, 15.1, Ease::Linear, still_shot()),
            ],
        )
        .unwrap();
        assert_eq!(t.duration(), 15.1);
        assert_eq!(t.segment_index(15.0), 1);
    }

    #[test]
    fn test_rejects_bad_edges() {
        assert_eq!(Timeline::new(15.0, vec![]), Err(ConfigError::EmptyTimeline));
        assert!(matches!(
            Timeline::new(15.0, vec![TimelineSegment::new(1.0, 15.0, Ease::Linear, still_shot())]),
            Err(ConfigError::TimelineStart { .. })
        ));
        assert!(matches!(
            Timeline::new(15.0, vec![TimelineSegment::new(0.0, 14.0, Ease::Linear, still_shot())]),
            Err(ConfigError::TimelineEnd { .. })
        ));
        assert!(matches!(
            Timeline::new(
                15.0,
                vec![
                    TimelineSegment::new(0.0, 0.0, Ease::Linear, still_shot()),
                    TimelineSegment::new(0.0, 15.0, Ease::Linear, still_shot()),
                ]
            ),
            Err(ConfigError::InvertedSegment { index: 0 })
        ));
        assert!(matches!(
            Timeline::new(0.0, vec![TimelineSegment::new(0.0, 15.0, Ease::Linear, still_shot())]),
            Err(ConfigError::NonPositiveDuration(_))
        ));
    }

    #[test]
    fn test_rejects_bad_blend() {
        let trailing = vec![TimelineSegment::new(0.0, 15.0, Ease::Linear, still_shot()).with_blend_out(1.0)];
        assert!(matches!(
            Timeline::new(15.0, trailing),
            Err(ConfigError::InvalidBlend { index: 0, .. })
        ));
        let too_long = vec![
            TimelineSegment::new(0.0, 3.0, Ease::Linear, still_shot()).with_blend_out(4.0),
            TimelineSegment::new(3.0, 15.0, Ease::Linear, still_shot()),
        ];
        assert!(matches!(
            Timeline::new(15.0, too_long),
            Err(ConfigError::InvalidBlend { index: 0, .. })
        ));
    }

    #[test]
    fn test_low_pass_eases_height_only() {
        let t = timeline();
        let seg = &t.segments()[2];
        let pose = seg.local_pose(7.5);
        // x is linear: halfway from -0.8 to 0.8
        assert!(pose.position.x.abs() < 1e-6);
        // height is expo-out eased: well past halfway
        assert!(pose.position.y > 0.6);
        assert!((pose.position.z - (-14.0)).abs() < 1e-5);
        assert!((pose.target.z - (-16.0)).abs() < 1e-5);
    }

    #[test]
    fn test_blend_lands_on_next_opening_pose() {
        let t = timeline();
        for pair in t.segments().windows(2) {
            let boundary = pair[1].start_seconds;
            let opening = pair[1].local_pose(boundary);
            let before = t.local_pose(boundary - 1e-4);
            assert!(
                before.distance(&opening) < 1e-2,
                "boundary {boundary}: {}",
                before.distance(&opening)
            );
        }
    }

    #[test]
    fn test_hard_cuts_are_reported() {
        let motion = MotionConfig::default();
        let blended = Timeline::desert_convoy(&motion).unwrap();
        assert!(blended.boundary_jumps().iter().all(|(_, jump)| *jump < 1e-3));

        let cut: Vec<_> = blended
            .segments()
            .iter()
            .cloned()
            .map(|seg| seg.with_blend_out(0.0))
            .collect();
        let cut = Timeline::new(15.0, cut).unwrap();
        let jumps = cut.boundary_jumps();
        assert_eq!(jumps.len(), 5);
        assert!(jumps.iter().all(|(_, jump)| *jump > 1.0));
    }

    proptest! {
        #[test]
        fn exactly_one_segment_matches(s in 0.0f32..15.0) {
            let t = timeline();
            let matches = t.segments().iter().filter(|seg| seg.contains(s)).count();
            prop_assert_eq!(matches, 1);
            prop_assert!(t.segment_at(s).contains(s));
        }

        #[test]
        fn poses_are_finite(s in -5.0f32..20.0) {
            let pose = timeline().local_pose(s);
            prop_assert!(pose.position.is_finite() && pose.target.is_finite());
        }
    }
}
