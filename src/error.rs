//! Configuration errors
//!
//! Everything in the cinematic is fixed at build time, so every error here is
//! structural: it is raised while constructing the clock, timeline, director or
//! terrain, before the first frame is rendered.

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid cinematic configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Loop duration must be strictly positive
    #[error("loop duration must be positive, got {0}s")]
    NonPositiveDuration(f64),

    /// A timeline needs at least one segment
    #[error("timeline has no segments")]
    EmptyTimeline,

    /// First segment must start at zero
    #[error("timeline starts at {start}s instead of 0s")]
    TimelineStart { start: f32 },

    /// Segment does not begin where the previous one ended
    #[error("gap before segment {index}: expected start {expected}s, found {found}s")]
    TimelineGap { index: usize, expected: f32, found: f32 },

    /// Segment begins before the previous one ended
    #[error("segment {index} overlaps its predecessor: expected start {expected}s, found {found}s")]
    TimelineOverlap { index: usize, expected: f32, found: f32 },

    /// Segment ends at or before its start
    #[error("segment {index} is empty or inverted")]
    InvertedSegment { index: usize },

    /// Blend window is negative, longer than its segment, or on the final segment
    #[error("segment {index} has an invalid blend window of {seconds}s")]
    InvalidBlend { index: usize, seconds: f32 },

    /// Last segment does not end at the loop duration
    #[error("timeline ends at {end}s but the loop lasts {duration}s")]
    TimelineEnd { end: f32, duration: f64 },

    /// Convoy must move forward
    #[error("convoy speed must be positive, got {0}")]
    NonPositiveSpeed(f32),

    /// Terrain grid cannot be built
    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),
}

impl ConfigError {
    pub fn terrain(msg: impl Into<String>) -> Self {
        Self::InvalidTerrain(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        assert!(
            ConfigError::NonPositiveDuration(0.0)
                .to_string()
                .contains("must be positive")
        );
        assert!(
            ConfigError::TimelineGap { index: 2, expected: 6.0, found: 6.5 }
                .to_string()
                .contains("gap before segment 2")
        );
        assert!(ConfigError::terrain("zero segments").to_string().contains("zero segments"));
    }
}
