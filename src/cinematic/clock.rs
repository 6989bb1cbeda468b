//! Loop-aware playback clock
//!
//! The clock never stores the loop phase. It stores the epoch of the current
//! loop iteration and derives the phase from `now` on every query, so every
//! reader that passes the same `now` sees the same phase.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// What pausing does to the loop phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PauseMode {
    /// Pausing only stops frame scheduling. The epoch stays fixed, so elapsed
    /// time keeps running and resuming jumps ahead by the paused duration.
    #[default]
    FreezeRendering,
    /// Pausing freezes the phase. Resuming rebases the epoch so playback
    /// continues from the paused frame.
    FreezePhase,
}

impl PauseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PauseMode::FreezeRendering => "freeze-rendering",
            PauseMode::FreezePhase => "freeze-phase",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "freeze-rendering" | "rendering" => Some(PauseMode::FreezeRendering),
            "freeze-phase" | "phase" => Some(PauseMode::FreezePhase),
            _ => None,
        }
    }
}

/// Normalized loop position for an epoch, duration and wall-clock time (all seconds)
///
/// Returns a value in `[0, 1)`. Times before the epoch wrap backwards into the
/// previous loop instead of going negative.
pub fn loop_phase(epoch: f64, duration: f64, now: f64) -> ConfigResult<f64> {
    if !(duration > 0.0) {
        return Err(ConfigError::NonPositiveDuration(duration));
    }
    Ok(wrap_phase(now - epoch, duration))
}

/// `frac(elapsed / duration)`, forced into `[0, 1)` for a validated duration
#[inline]
fn wrap_phase(elapsed: f64, duration: f64) -> f64 {
    let u = elapsed.rem_euclid(duration) / duration;
    // rem_euclid of a tiny negative value can round up to exactly `duration`
    if u >= 1.0 { 0.0 } else { u }
}

/// Read-only copy of the playback state
///
/// Taken once per frame by each consumer (director, progress bar) so both
/// derive their phase from the same epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub playing: bool,
    pub restart_epoch: f64,
    pub duration: f64,
    /// Loop-relative seconds held while paused in [`PauseMode::FreezePhase`]
    pub frozen_elapsed: Option<f64>,
}

impl PlaybackSnapshot {
    /// Loop phase `u` in `[0, 1)`
    pub fn phase(&self, now: f64) -> f64 {
        match self.frozen_elapsed {
            Some(elapsed) => wrap_phase(elapsed, self.duration),
            None => wrap_phase(now - self.restart_epoch, self.duration),
        }
    }

    /// Seconds into the current loop, `s = u * duration`, in `[0, duration)`
    pub fn loop_seconds(&self, now: f64) -> f64 {
        self.phase(now) * self.duration
    }
}

/// Playback state owned by the scene root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackClock {
    playing: bool,
    restart_epoch: f64,
    duration: f64,
    pause_mode: PauseMode,
    frozen_elapsed: Option<f64>,
}

impl PlaybackClock {
    /// Create a playing clock whose first loop starts at `now`
    pub fn new(duration: f64, now: f64, pause_mode: PauseMode) -> ConfigResult<Self> {
        if !(duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration(duration));
        }
        Ok(Self {
            playing: true,
            restart_epoch: now,
            duration,
            pause_mode,
            frozen_elapsed: None,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn restart_epoch(&self) -> f64 {
        self.restart_epoch
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pause_mode(&self) -> PauseMode {
        self.pause_mode
    }

    /// Start or stop playback (idempotent)
    pub fn set_playing(&mut self, playing: bool, now: f64) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;

        if self.pause_mode == PauseMode::FreezePhase {
            if playing {
                if let Some(elapsed) = self.frozen_elapsed.take() {
                    self.restart_epoch = now - elapsed;
                }
            } else {
                self.frozen_elapsed = Some((now - self.restart_epoch).rem_euclid(self.duration));
            }
        }

        log::info!(
            "Playback {} ({})",
            if playing { "resumed" } else { "paused" },
            self.pause_mode.as_str()
        );
    }

    pub fn play(&mut self, now: f64) {
        self.set_playing(true, now);
    }

    pub fn pause(&mut self, now: f64) {
        self.set_playing(false, now);
    }

    pub fn toggle(&mut self, now: f64) {
        self.set_playing(!self.playing, now);
    }

    /// Reset the loop to phase zero at `now`
    ///
    /// The epoch never moves backwards; a clock sample older than the current
    /// epoch restarts at the current epoch instead.
    pub fn restart(&mut self, now: f64) {
        if now < self.restart_epoch {
            log::warn!(
                "Restart sample {:.3}s is older than epoch {:.3}s, keeping epoch",
                now,
                self.restart_epoch
            );
        }
        self.restart_epoch = now.max(self.restart_epoch);
        if self.frozen_elapsed.is_some() {
            self.frozen_elapsed = Some(0.0);
        }
        log::info!("Playback restarted at {:.3}s", self.restart_epoch);
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            playing: self.playing,
            restart_epoch: self.restart_epoch,
            duration: self.duration,
            frozen_elapsed: self.frozen_elapsed,
        }
    }

    /// Loop phase `u` in `[0, 1)`
    pub fn phase(&self, now: f64) -> f64 {
        self.snapshot().phase(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const T: f64 = 100.0;

    #[test]
    fn test_loop_phase_examples() {
        let u = loop_phase(T, 15.0, T + 3.0).unwrap();
        assert!((u - 0.2).abs() < 1e-12);
        assert_eq!(loop_phase(T, 15.0, T + 15.0).unwrap(), 0.0);
        assert_eq!(loop_phase(T, 15.0, T).unwrap(), 0.0);
        let u = loop_phase(T, 15.0, T + 31.5).unwrap();
        assert!((u - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_loop_phase_rejects_bad_duration() {
        assert_eq!(
            loop_phase(T, 0.0, T + 1.0),
            Err(ConfigError::NonPositiveDuration(0.0))
        );
        assert!(loop_phase(T, -15.0, T + 1.0).is_err());
        assert!(loop_phase(T, f64::NAN, T + 1.0).is_err());
        assert!(PlaybackClock::new(0.0, T, PauseMode::default()).is_err());
    }

    #[test]
    fn test_time_before_epoch_wraps_backwards() {
        let u = loop_phase(T, 15.0, T - 3.0).unwrap();
        assert!((u - 0.8).abs() < 1e-12);
        let u = loop_phase(T, 15.0, T - 1e-18).unwrap();
        assert!((0.0..1.0).contains(&u));
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezeRendering).unwrap();
        assert!(clock.phase(T + 7.0) > 0.4);
        clock.restart(T + 7.0);
        assert_eq!(clock.phase(T + 7.0), 0.0);
        assert_eq!(clock.restart_epoch(), T + 7.0);
    }

    #[test]
    fn test_restart_epoch_never_moves_backwards() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezeRendering).unwrap();
        clock.restart(T + 5.0);
        clock.restart(T + 2.0);
        assert_eq!(clock.restart_epoch(), T + 5.0);
    }

    #[test]
    fn test_freeze_rendering_pause_keeps_epoch() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezeRendering).unwrap();
        clock.pause(T + 2.0);
        assert!(!clock.is_playing());
        assert_eq!(clock.restart_epoch(), T);
        // Elapsed time keeps running while paused
        clock.play(T + 6.0);
        assert!((clock.phase(T + 6.0) - 6.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_freeze_phase_pause_resumes_from_paused_frame() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezePhase).unwrap();
        clock.pause(T + 2.0);
        assert!((clock.phase(T + 9.0) - 2.0 / 15.0).abs() < 1e-12);
        clock.play(T + 10.0);
        assert_eq!(clock.restart_epoch(), T + 8.0);
        assert!((clock.phase(T + 10.0) - 2.0 / 15.0).abs() < 1e-12);
        assert!((clock.phase(T + 11.0) - 3.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_restart_while_frozen_holds_zero() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezePhase).unwrap();
        clock.pause(T + 4.0);
        clock.restart(T + 5.0);
        assert_eq!(clock.phase(T + 9.0), 0.0);
        clock.play(T + 9.0);
        assert_eq!(clock.phase(T + 9.0), 0.0);
    }

    #[test]
    fn test_set_playing_is_idempotent() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezePhase).unwrap();
        clock.pause(T + 1.0);
        clock.pause(T + 3.0);
        clock.play(T + 4.0);
        clock.play(T + 8.0);
        assert_eq!(clock.restart_epoch(), T + 3.0);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_snapshot_matches_clock() {
        let mut clock = PlaybackClock::new(15.0, T, PauseMode::FreezeRendering).unwrap();
        clock.restart(T + 1.25);
        let snap = clock.snapshot();
        assert_eq!(snap.phase(T + 4.0), clock.phase(T + 4.0));
        assert!((snap.loop_seconds(T + 4.0) - 2.75).abs() < 1e-9);
    }

    #[test]
    fn test_pause_mode_names() {
        for mode in [PauseMode::FreezeRendering, PauseMode::FreezePhase] {
            assert_eq!(PauseMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(PauseMode::from_str("bogus"), None);
    }

    proptest! {
        #[test]
        fn phase_is_always_in_unit_range(epoch in -1e6f64..1e6, offset in -1e5f64..1e5) {
            let u = loop_phase(epoch, 15.0, epoch + offset).unwrap();
            prop_assert!((0.0..1.0).contains(&u));
        }
    }
}
