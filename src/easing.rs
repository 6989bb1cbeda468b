//! Easing curves
//!
//! Each curve maps normalized progress in `[0, 1]` to eased progress in `[0, 1]`.
//! The exponential curves pin their degenerate endpoint explicitly so segment
//! boundaries land on exact values instead of `2^-10` residue.

use serde::{Deserialize, Serialize};

/// Cubic ease-in/out: accelerate through the first half, decelerate through the second
#[inline]
pub fn cubic_in_out(x: f32) -> f32 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

/// Exponential ease-out: fast start, long settle
#[inline]
pub fn expo_out(x: f32) -> f32 {
    if x == 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * x)
    }
}

/// Exponential ease-in: long wind-up, fast finish
#[inline]
pub fn expo_in(x: f32) -> f32 {
    if x == 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * x - 10.0)
    }
}

/// Easing applied to a timeline segment's local progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
    ExpoOut,
    ExpoIn,
}

impl Ease {
    /// Apply this curve to progress `t`, clamped into `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => cubic_in_out(t),
            Ease::ExpoOut => expo_out(t),
            Ease::ExpoIn => expo_in(t),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::CubicInOut => "cubic-in-out",
            Ease::ExpoOut => "expo-out",
            Ease::ExpoIn => "expo-in",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cubic_in_out_boundaries() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(0.5), 0.5);
        assert_eq!(cubic_in_out(1.0), 1.0);
    }

    #[test]
    fn test_expo_boundaries_are_exact() {
        assert_eq!(expo_out(0.0), 0.0);
        assert_eq!(expo_out(1.0), 1.0);
        assert_eq!(expo_in(0.0), 0.0);
        assert_eq!(expo_in(1.0), 1.0);
    }

    #[test]
    fn test_apply_clamps_input() {
        assert_eq!(Ease::Linear.apply(-0.5), 0.0);
        assert_eq!(Ease::Linear.apply(1.5), 1.0);
        assert_eq!(Ease::ExpoOut.apply(2.0), 1.0);
        assert_eq!(Ease::CubicInOut.apply(-1.0), 0.0);
    }

    #[test]
    fn test_cubic_in_out_is_symmetric() {
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            let sum = cubic_in_out(x) + cubic_in_out(1.0 - x);
            assert!((sum - 1.0).abs() < 1e-5, "x={x} sum={sum}");
        }
    }

    proptest! {
        #[test]
        fn eased_progress_stays_in_unit_range(t in 0.0f32..=1.0) {
            for ease in [Ease::Linear, Ease::CubicInOut, Ease::ExpoOut, Ease::ExpoIn] {
                let v = ease.apply(t);
                prop_assert!((0.0..=1.0).contains(&v), "{} gave {v}", ease.as_str());
            }
        }

        #[test]
        fn easing_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for ease in [Ease::Linear, Ease::CubicInOut, Ease::ExpoOut, Ease::ExpoIn] {
                prop_assert!(ease.apply(lo) <= ease.apply(hi) + 1e-6);
            }
        }
    }
}
