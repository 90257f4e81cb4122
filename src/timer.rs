//! Wall-clock interval timer producing normalised progress.
//!
//! A [`Timer`] measures how far through a fixed-length interval the current
//! instant is. Progress ("alpha") runs from `0.0` at [`Timer::start`] to
//! exactly `1.0` once the interval has elapsed.
//!
//! Every query has an `_at` variant taking an explicit [`Instant`], so callers
//! that already sampled the clock for the frame (and tests that simulate time)
//! see a consistent value.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use orient_lab::Timer;
//!
//! let mut timer = Timer::single(Duration::from_secs(2));
//! let t0 = Instant::now();
//! timer.start_at(t0);
//!
//! assert_eq!(timer.alpha_at(t0 + Duration::from_secs(1)), 0.5);
//! assert!(timer.is_elapsed_at(t0 + Duration::from_secs(2)));
//! assert_eq!(timer.alpha_at(t0 + Duration::from_secs(3)), 1.0);
//! ```

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// What happens once the interval runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerMode {
    /// Stays elapsed until started again.
    #[default]
    Single,
    /// [`Timer::poll`] restarts the interval each time it reports elapsed.
    Repeating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerState {
    NotStarted,
    Running { start: Instant },
}

/// Interval timer with an explicit not-started state.
///
/// Querying a timer that was never started is a caller bug. Debug builds
/// panic; release builds report no progress (`alpha` is `0.0`, never elapsed).
/// Use [`Timer::try_alpha_at`] to handle it as an error instead.
#[derive(Clone, Debug)]
pub struct Timer {
    mode: TimerMode,
    duration: Duration,
    state: TimerState,
}

impl Timer {
    pub fn new(mode: TimerMode, duration: Duration) -> Self {
        Self {
            mode,
            duration,
            state: TimerState::NotStarted,
        }
    }

    /// One-shot timer.
    pub fn single(duration: Duration) -> Self {
        Self::new(TimerMode::Single, duration)
    }

    /// Timer that rearms itself when polled after elapsing.
    pub fn repeating(duration: Duration) -> Self {
        Self::new(TimerMode::Repeating, duration)
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Start (or restart) the interval now.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start (or restart) the interval at `now`, discarding prior progress.
    pub fn start_at(&mut self, now: Instant) {
        self.state = TimerState::Running { start: now };
    }

    /// Time since the interval started, or `None` if never started.
    ///
    /// An instant earlier than the start counts as zero elapsed time.
    pub fn elapsed_at(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TimerState::NotStarted => None,
            TimerState::Running { start } => Some(now.saturating_duration_since(start)),
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.is_elapsed_at(Instant::now())
    }

    /// Pure query: has the interval run out at `now`?
    pub fn is_elapsed_at(&self, now: Instant) -> bool {
        debug_assert!(self.is_started(), "Timer::is_elapsed queried before start");
        self.elapsed_at(now).is_some_and(|elapsed| elapsed >= self.duration)
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Check for completion and rearm a repeating timer.
    ///
    /// Returns whether the interval had elapsed at `now`. A repeating timer
    /// that reports `true` starts a fresh interval at `now`.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let elapsed = self.is_elapsed_at(now);
        if elapsed && self.mode == TimerMode::Repeating {
            self.start_at(now);
        }
        elapsed
    }

    pub fn alpha(&self) -> f32 {
        self.alpha_at(Instant::now())
    }

    /// Normalised progress in `[0, 1]`; exactly `1.0` once elapsed.
    pub fn alpha_at(&self, now: Instant) -> f32 {
        debug_assert!(self.is_started(), "Timer::alpha queried before start");
        self.try_alpha_at(now).unwrap_or(0.0)
    }

    pub fn try_alpha(&self) -> Result<f32> {
        self.try_alpha_at(Instant::now())
    }

    /// Like [`Timer::alpha_at`], but reports a never-started timer as an error.
    pub fn try_alpha_at(&self, now: Instant) -> Result<f32> {
        let elapsed = self.elapsed_at(now).ok_or(Error::TimerNotStarted)?;
        if elapsed >= self.duration {
            return Ok(1.0);
        }
        let alpha = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        Ok(alpha.clamp(0.0, 1.0))
    }
}
