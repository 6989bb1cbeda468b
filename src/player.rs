//! Scene root
//!
//! Owns the playback clock and the camera director. The UI and the render loop
//! both read the same clock snapshot, so a restart is seen by every consumer on
//! its next read.

use crate::cinematic::{CameraDirector, CameraRig, ConvoyNode, FrameOutcome, PauseMode, PlaybackClock};
use crate::consts::LOOP_DURATION;
use crate::error::{ConfigError, ConfigResult};

pub struct Player {
    clock: PlaybackClock,
    director: CameraDirector,
    /// Segment applied on the previous frame (for transition logging)
    last_segment: Option<usize>,
    /// Whether the last frame was skipped for a missing scene reference
    missing_scene: bool,
    /// Progress shown while paused, so the bar stays on the held frame
    held_progress: Option<f32>,
}

impl Player {
    /// Default desert convoy cinematic, starting playback at `now`
    pub fn new(now: f64, pause_mode: PauseMode) -> ConfigResult<Self> {
        let clock = PlaybackClock::new(LOOP_DURATION, now, pause_mode)?;
        let director = CameraDirector::desert_convoy()?;
        Self::with_parts(clock, director)
    }

    /// Assemble from a clock and director that must agree on the loop length
    pub fn with_parts(clock: PlaybackClock, director: CameraDirector) -> ConfigResult<Self> {
        let timeline_end = director.timeline().duration();
        if timeline_end != clock.duration() {
            return Err(ConfigError::TimelineEnd {
                end: timeline_end as f32,
                duration: clock.duration(),
            });
        }

        for (seconds, jump) in director.timeline().boundary_jumps() {
            if jump > 0.05 {
                log::warn!("Hard cut at {:.2}s moves the camera {:.2} units", seconds, jump);
            }
        }

        log::info!(
            "Cinematic mounted: {} shots over {}s",
            director.timeline().segments().len(),
            clock.duration()
        );

        Ok(Self {
            clock,
            director,
            last_segment: None,
            missing_scene: false,
            held_progress: None,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn play(&mut self, now: f64) {
        self.clock.play(now);
        self.held_progress = None;
    }

    pub fn pause(&mut self, now: f64) {
        if self.clock.is_playing() {
            self.held_progress = Some(self.live_progress(now));
        }
        self.clock.pause(now);
    }

    pub fn toggle(&mut self, now: f64) {
        if self.clock.is_playing() {
            self.pause(now);
        } else {
            self.play(now);
        }
    }

    pub fn restart(&mut self, now: f64) {
        self.clock.restart(now);
        self.last_segment = None;
        if self.held_progress.is_some() {
            self.held_progress = Some(0.0);
        }
    }

    /// Loop progress in `[0, 1)` for display
    ///
    /// Holds still while paused, matching the frame left on screen.
    pub fn progress(&self, now: f64) -> f32 {
        match self.held_progress {
            Some(u) if !self.clock.is_playing() => u,
            _ => self.live_progress(now),
        }
    }

    fn live_progress(&self, now: f64) -> f32 {
        // Narrowing can round 0.99999999 up to 1.0
        let u = self.clock.snapshot().phase(now) as f32;
        if u >= 1.0 { 0.0 } else { u }
    }

    /// Per-frame entry point for the render loop
    pub fn frame(
        &mut self,
        now: f64,
        camera: Option<&mut dyn CameraRig>,
        convoy: Option<&mut dyn ConvoyNode>,
    ) -> FrameOutcome {
        let snapshot = self.clock.snapshot();
        if !snapshot.playing {
            return FrameOutcome::Paused;
        }

        let s = snapshot.loop_seconds(now) as f32;
        let outcome = self.director.drive(s, camera, convoy);

        match &outcome {
            FrameOutcome::Applied(sample) => {
                self.missing_scene = false;
                if self.last_segment != Some(sample.segment_index) {
                    let shot = &self.director.timeline().segments()[sample.segment_index].shot;
                    log::debug!("Shot {} ({}) at {:.2}s", sample.segment_index, shot.name(), s);
                    self.last_segment = Some(sample.segment_index);
                }
            }
            FrameOutcome::MissingScene => {
                if !self.missing_scene {
                    log::warn!("Scene not mounted yet, skipping frame");
                    self.missing_scene = true;
                }
            }
            FrameOutcome::Paused => {}
        }

        outcome
    }
}
