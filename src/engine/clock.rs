//! Replay pacing.
//!
//! Converts the 0-100 speed slider into a per-step interval and decides,
//! from monotonically increasing timestamps supplied by the caller, when
//! the next step is due. No wall clock is read here; the front end passes
//! its frame time in.

use serde::{Deserialize, Serialize};

/// Slowest slider position.
pub const MIN_SPEED: f64 = 0.0;
/// Fastest slider position.
pub const MAX_SPEED: f64 = 100.0;

/// Milliseconds per step for a slider position.
///
/// `speed = 0` gives 1000 ms, `speed = 100` gives 100 ms. Out-of-range and
/// non-finite input is clamped to the slider bounds.
#[must_use]
pub fn step_duration_ms(speed: f64) -> u64 {
    let speed = clamp_speed(speed);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ms = (1000.0 - speed * 9.0).round() as u64;
    ms
}

/// Clamp a slider value into `MIN_SPEED..=MAX_SPEED` (NaN maps to `MIN_SPEED`).
#[must_use]
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        MIN_SPEED
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

/// How the interval between steps is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepInterval {
    /// Derived from the speed slider.
    Speed(f64),
    /// Constant number of milliseconds.
    Fixed(u64),
}

/// Elapsed-time tracker for one replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTimer {
    interval: StepInterval,
    /// Timestamp of the last advance (or of the first observation).
    baseline: Option<u64>,
}

impl StepTimer {
    /// Timer paced by the speed slider.
    #[must_use]
    pub fn from_speed(speed: f64) -> Self {
        Self {
            interval: StepInterval::Speed(clamp_speed(speed)),
            baseline: None,
        }
    }

    /// Timer with a constant interval.
    #[must_use]
    pub const fn fixed(interval_ms: u64) -> Self {
        Self {
            interval: StepInterval::Fixed(interval_ms),
            baseline: None,
        }
    }

    /// Current interval mode.
    #[must_use]
    pub const fn interval(&self) -> StepInterval {
        self.interval
    }

    /// Milliseconds that must elapse before the next step.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match self.interval {
            StepInterval::Speed(speed) => step_duration_ms(speed),
            StepInterval::Fixed(ms) => ms,
        }
    }

    /// Current speed, if the timer follows the slider.
    #[must_use]
    pub const fn speed(&self) -> Option<f64> {
        match self.interval {
            StepInterval::Speed(speed) => Some(speed),
            StepInterval::Fixed(_) => None,
        }
    }

    /// Change the slider position. Ignored for fixed-interval timers.
    pub fn set_speed(&mut self, speed: f64) {
        if let StepInterval::Speed(_) = self.interval {
            self.interval = StepInterval::Speed(clamp_speed(speed));
        }
    }

    /// Forget the baseline; the next observation starts a fresh interval.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Report whether a step is due at `now_ms`.
    ///
    /// The first call after construction or [`reset`](Self::reset) only
    /// records the baseline. When a step is due the baseline moves to
    /// `now_ms`.
    pub fn due(&mut self, now_ms: u64) -> bool {
        match self.baseline {
            None => {
                self.baseline = Some(now_ms);
                false
            }
            Some(baseline) => {
                if now_ms.saturating_sub(baseline) > self.duration_ms() {
                    self.baseline = Some(now_ms);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::from_speed(50.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Step duration always lies within the slider bounds.
        #[test]
        fn prop_duration_bounded(speed in -1000.0f64..1000.0) {
            let ms = step_duration_ms(speed);
            prop_assert!((100..=1000).contains(&ms));
        }

        /// Faster slider positions never produce longer steps.
        #[test]
        fn prop_duration_monotonic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(step_duration_ms(fast) <= step_duration_ms(slow));
        }

        /// Two consecutive due ticks are always more than one interval apart.
        #[test]
        fn prop_due_spacing(speed in 0.0f64..100.0, gaps in proptest::collection::vec(1u64..400, 1..60)) {
            let mut timer = StepTimer::from_speed(speed);
            let mut now = 0u64;
            timer.due(now);
            let mut last_due = now;
            for gap in gaps {
                now += gap;
                if timer.due(now) {
                    prop_assert!(now - last_due > timer.duration_ms());
                    last_due = now;
                }
            }
        }
    }
}
