//! Replay controller.
//!
//! Holds a cursor into a [`StepLog`] and a two-state play/pause machine:
//!
//! ```text
//!            toggle / start
//!   Paused ----------------> Playing
//!     ^  <----------------     |
//!     |       toggle           | tick reaches last index
//!     +------------------------+
//! ```
//!
//! The controller never looks at snapshot contents and never reads a
//! clock; front ends pass their frame timestamp to [`ReplayController::tick`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{StepLog, StepTimer};
use crate::error::{VizError, VizResult};

/// Play/pause flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Cursor only moves on explicit user action.
    #[default]
    Paused,
    /// Cursor advances on ticks.
    Playing,
}

impl PlaybackState {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::Playing => "PLAYING",
        }
    }

    /// True while playing.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Cursor, play flag and pacing for one step log.
#[derive(Debug, Clone)]
pub struct ReplayController<S> {
    log: StepLog<S>,
    cursor: usize,
    state: PlaybackState,
    timer: StepTimer,
    /// Incremented on every new run; lets callers drop stale work.
    run: u64,
}

impl<S> ReplayController<S> {
    /// Paused controller over `log`, paced by the speed slider.
    #[must_use]
    pub fn new(log: StepLog<S>, speed: f64) -> Self {
        Self {
            log,
            cursor: 0,
            state: PlaybackState::Paused,
            timer: StepTimer::from_speed(speed),
            run: 0,
        }
    }

    /// Paused controller over `log` with a constant step interval.
    #[must_use]
    pub const fn with_fixed_interval(log: StepLog<S>, interval_ms: u64) -> Self {
        Self {
            log,
            cursor: 0,
            state: PlaybackState::Paused,
            timer: StepTimer::fixed(interval_ms),
            run: 0,
        }
    }

    /// Replace the log with a fresh run and start playing from step 0.
    pub fn start(&mut self, log: StepLog<S>) {
        self.log = log;
        self.cursor = 0;
        self.state = PlaybackState::Playing;
        self.timer.reset();
        self.run += 1;
        debug!(run = self.run, steps = self.log.len(), "replay started");
    }

    /// Replace the log without playing (used when the primary state is
    /// rebuilt from input).
    pub fn load(&mut self, log: StepLog<S>) {
        self.log = log;
        self.cursor = 0;
        self.state = PlaybackState::Paused;
        self.timer.reset();
        self.run += 1;
    }

    /// Advance on an animation tick. Returns true if the cursor moved.
    ///
    /// Playing turns into Paused as soon as the cursor sits on the last
    /// step, including the tick that moves it there.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        if self.is_at_end() {
            self.state = PlaybackState::Paused;
            return false;
        }
        if !self.timer.due(now_ms) {
            return false;
        }
        self.cursor += 1;
        if self.is_at_end() {
            self.state = PlaybackState::Paused;
            debug!(run = self.run, "replay finished");
        }
        true
    }

    /// Move one step forward. Does nothing at the last step.
    ///
    /// # Errors
    ///
    /// Returns `StepWhilePlaying` while the tick owns the cursor.
    pub fn step_forward(&mut self) -> VizResult<bool> {
        if self.state.is_playing() {
            return Err(VizError::StepWhilePlaying);
        }
        if self.is_at_end() {
            return Ok(false);
        }
        self.cursor += 1;
        Ok(true)
    }

    /// Flip play/pause. At the last step, restart from 0 and play.
    pub fn toggle_play(&mut self) {
        match self.state {
            PlaybackState::Playing => self.state = PlaybackState::Paused,
            PlaybackState::Paused => {
                if self.is_at_end() {
                    self.cursor = 0;
                }
                self.state = PlaybackState::Playing;
                self.timer.reset();
            }
        }
    }

    /// Jump to `index`.
    ///
    /// # Errors
    ///
    /// Returns `CursorOutOfRange` if `index` is past the last step.
    pub fn seek(&mut self, index: usize) -> VizResult<()> {
        if index >= self.log.len() {
            return Err(VizError::CursorOutOfRange {
                index,
                len: self.log.len(),
            });
        }
        self.cursor = index;
        self.timer.reset();
        Ok(())
    }

    /// Cursor back to 0, paused.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = PlaybackState::Paused;
        self.timer.reset();
    }

    /// Change the speed slider.
    pub fn set_speed(&mut self, speed: f64) {
        self.timer.set_speed(speed);
    }

    /// Current speed, or `None` for fixed-interval replay.
    #[must_use]
    pub const fn speed(&self) -> Option<f64> {
        self.timer.speed()
    }

    /// Milliseconds per step.
    #[must_use]
    pub fn step_duration_ms(&self) -> u64 {
        self.timer.duration_ms()
    }

    /// Snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> &S {
        self.log.get(self.cursor).unwrap_or_else(|| self.log.last())
    }

    /// Cursor position.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Play/pause state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// True while playing.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// True when the cursor sits on the final step.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.log.last_index()
    }

    /// Fraction of the log already shown, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.log.len() <= 1 {
            1.0
        } else {
            self.cursor as f64 / self.log.last_index() as f64
        }
    }

    /// Number of runs started or loaded so far.
    #[must_use]
    pub const fn run(&self) -> u64 {
        self.run
    }

    /// The log being replayed.
    #[must_use]
    pub const fn log(&self) -> &StepLog<S> {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(n: usize) -> StepLog<usize> {
        let mut builder = StepLog::builder(0);
        for i in 1..n {
            builder.push(i);
        }
        builder.finish()
    }

    #[test]
    fn test_start_plays_from_zero() {
        let mut replay = ReplayController::new(StepLog::single(0), 100.0);
        replay.start(log_of(4));
        assert_eq!(replay.state(), PlaybackState::Playing);
        assert_eq!(replay.cursor(), 0);
        assert_eq!(replay.run(), 1);
    }

    #[test]
    fn test_tick_advances_after_interval() {
        let mut replay = ReplayController::new(StepLog::single(0), 100.0);
        replay.start(log_of(3));
        assert!(!replay.tick(0)); // baseline
        assert!(!replay.tick(100));
        assert!(replay.tick(101));
        assert_eq!(*replay.current(), 1);
        assert!(replay.tick(202));
        assert_eq!(replay.cursor(), 2);
        assert_eq!(replay.state(), PlaybackState::Paused);
        assert!(!replay.tick(10_000));
        assert_eq!(replay.cursor(), 2);
    }

    #[test]
    fn test_single_step_log_pauses_immediately() {
        let mut replay = ReplayController::new(StepLog::single(0), 50.0);
        replay.start(StepLog::single(9));
        assert!(!replay.tick(0));
        assert_eq!(replay.state(), PlaybackState::Paused);
        assert_eq!(*replay.current(), 9);
    }

    #[test]
    fn test_step_forward_rejected_while_playing() {
        let mut replay = ReplayController::new(log_of(3), 50.0);
        replay.toggle_play();
        let err = replay.step_forward().unwrap_err();
        assert!(matches!(err, VizError::StepWhilePlaying));
        assert_eq!(replay.cursor(), 0);
    }

    #[test]
    fn test_step_forward_stops_at_end() {
        let mut replay = ReplayController::new(log_of(2), 50.0);
        assert!(replay.step_forward().unwrap());
        assert!(!replay.step_forward().unwrap());
        assert_eq!(replay.cursor(), 1);
    }

    #[test]
    fn test_toggle_at_end_restarts() {
        let mut replay = ReplayController::new(log_of(3), 50.0);
        replay.seek(2).unwrap();
        replay.toggle_play();
        assert_eq!(replay.cursor(), 0);
        assert!(replay.is_playing());
        replay.toggle_play();
        assert!(!replay.is_playing());
    }

    #[test]
    fn test_seek_out_of_range() {
        let mut replay = ReplayController::new(log_of(3), 50.0);
        let err = replay.seek(3).unwrap_err();
        assert!(matches!(err, VizError::CursorOutOfRange { index: 3, len: 3 }));
        assert_eq!(replay.cursor(), 0);
    }

    #[test]
    fn test_reset_and_progress() {
        let mut replay = ReplayController::new(log_of(5), 50.0);
        replay.seek(2).unwrap();
        assert!((replay.progress() - 0.5).abs() < f64::EPSILON);
        replay.toggle_play();
        replay.reset();
        assert_eq!(replay.cursor(), 0);
        assert_eq!(replay.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_fixed_interval() {
        let mut replay = ReplayController::with_fixed_interval(log_of(2), 1000);
        replay.set_speed(100.0);
        assert_eq!(replay.step_duration_ms(), 1000);
        assert_eq!(replay.speed(), None);
    }

    #[test]
    fn test_playback_labels() {
        assert_eq!(PlaybackState::Paused.label(), "PAUSED");
        assert_eq!(PlaybackState::Playing.label(), "PLAYING");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The cursor stays in range and never moves backwards during playback.
        #[test]
        fn prop_cursor_monotonic(len in 1usize..40, speed in 0.0f64..100.0, gaps in proptest::collection::vec(0u64..1200, 1..200)) {
            let mut builder = StepLog::builder(0usize);
            for i in 1..len {
                builder.push(i);
            }
            let mut replay = ReplayController::new(StepLog::single(0), speed);
            replay.start(builder.finish());
            let mut now = 0;
            let mut last = 0;
            for gap in gaps {
                now += gap;
                replay.tick(now);
                prop_assert!(replay.cursor() < len);
                prop_assert!(replay.cursor() >= last);
                prop_assert!(replay.cursor() - last <= 1);
                last = replay.cursor();
                if replay.is_at_end() {
                    prop_assert!(!replay.is_playing());
                }
            }
        }
    }
}
