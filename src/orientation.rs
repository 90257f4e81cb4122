//! Orientation state machine: idle at a table entry, or animating to another.
//!
//! ```text
//!            animate_to(i), i != current
//!   Idle  ------------------------------->  Animating(to i)
//!    ^                                           |
//!    |   update_time() sees timer elapsed;       |
//!    +---------- current = i --------------------+
//! ```
//!
//! While animating, further [`Orientation::animate_to`] requests are dropped:
//! the running transition is never interrupted or retargeted.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use orient_lab::{Orientation, OrientationTable};
//!
//! let mut orientation = Orientation::new(OrientationTable::default());
//! let t0 = Instant::now();
//!
//! assert!(orientation.animate_to_at(2, t0).unwrap());
//! assert!(orientation.is_animating());
//!
//! let done = t0 + Duration::from_secs(5);
//! assert_eq!(orientation.update_time_at(done), Some(2));
//! assert_eq!(orientation.current_index(), 2);
//! ```

use std::time::{Duration, Instant};

use glam::Quat;

use crate::animation::{Animation, DEFAULT_ANIMATION_DURATION};
use crate::error::Result;
use crate::interpolation::Interpolation;
use crate::orientation_table::OrientationTable;

#[derive(Clone, Debug)]
enum State {
    Idle,
    Animating(Animation),
}

/// Current orientation of the displayed object.
#[derive(Clone, Debug)]
pub struct Orientation {
    table: OrientationTable,
    current: usize,
    state: State,
    interpolation: Interpolation,
    duration: Duration,
}

impl Orientation {
    /// Start idle at entry 0, interpolating with LERP over five seconds.
    pub fn new(table: OrientationTable) -> Self {
        Self {
            table,
            current: 0,
            state: State::Idle,
            interpolation: Interpolation::default(),
            duration: DEFAULT_ANIMATION_DURATION,
        }
    }

    /// Set how long each transition takes.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the initial interpolation mode.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn table(&self) -> &OrientationTable {
        &self.table
    }

    /// Index of the entry the object rests at (or is animating away from).
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Animating(_))
    }

    /// Destination of the running animation, if any.
    pub fn final_index(&self) -> Option<usize> {
        match &self.state {
            State::Idle => None,
            State::Animating(animation) => Some(animation.final_index()),
        }
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn animate_to(&mut self, index: usize) -> Result<bool> {
        self.animate_to_at(index, Instant::now())
    }

    /// Request a transition to `index`, starting at `now`.
    ///
    /// Returns `Ok(true)` if a new animation started and `Ok(false)` if the
    /// request was ignored (already there, or already animating).
    pub fn animate_to_at(&mut self, index: usize, now: Instant) -> Result<bool> {
        self.table.check_index(index)?;

        if let State::Animating(animation) = &self.state {
            log::debug!(
                "ignoring request for orientation {index}: already animating to {}",
                animation.final_index()
            );
            return Ok(false);
        }
        if index == self.current {
            return Ok(false);
        }

        log::debug!(
            "animating {} -> {} over {:?} ({})",
            self.current,
            index,
            self.duration,
            self.interpolation
        );
        self.state = State::Animating(Animation::start(index, self.duration, now));
        Ok(true)
    }

    pub fn update_time(&mut self) -> Option<usize> {
        self.update_time_at(Instant::now())
    }

    /// Advance the state machine to `now`.
    ///
    /// Returns the newly committed index on the tick an animation completes.
    pub fn update_time_at(&mut self, now: Instant) -> Option<usize> {
        let State::Animating(animation) = &mut self.state else {
            return None;
        };
        if !animation.update_time_at(now) {
            return None;
        }

        self.current = animation.final_index();
        self.state = State::Idle;
        log::debug!("arrived at orientation {}", self.current);
        Some(self.current)
    }

    pub fn orient(&self) -> Quat {
        self.orient_at(Instant::now())
    }

    /// Orientation to render at `now`.
    pub fn orient_at(&self, now: Instant) -> Quat {
        let initial = self.table.rotation(self.current);
        match &self.state {
            State::Idle => initial,
            State::Animating(animation) => {
                animation.orient_at(&self.table, initial, self.interpolation, now)
            }
        }
    }

    /// Progress of the running animation in `[0, 1]`, if any.
    pub fn progress_at(&self, now: Instant) -> Option<f32> {
        match &self.state {
            State::Idle => None,
            State::Animating(animation) => Some(animation.alpha_at(now)),
        }
    }

    /// Switch between LERP and SLERP. Applies to a running animation too.
    pub fn toggle_slerp(&mut self) -> Interpolation {
        self.interpolation = self.interpolation.toggled();
        log::info!("interpolation: {}", self.interpolation);
        self.interpolation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::interpolation::{lerp, slerp};

    const SECOND: Duration = Duration::from_secs(1);

    fn orientation() -> Orientation {
        Orientation::new(OrientationTable::default())
    }

    #[test]
    fn starts_idle_at_first_entry() {
        let o = orientation();
        assert_eq!(o.current_index(), 0);
        assert!(!o.is_animating());
        assert_eq!(o.final_index(), None);
        assert_eq!(o.orient_at(Instant::now()), o.table().rotation(0));
    }

    #[test]
    fn animates_and_commits_destination() {
        let mut o = orientation();
        let t0 = Instant::now();

        assert!(o.animate_to_at(2, t0).unwrap());
        assert!(o.is_animating());
        assert_eq!(o.final_index(), Some(2));
        assert_eq!(o.current_index(), 0);

        assert_eq!(o.update_time_at(t0 + 4 * SECOND), None);
        assert!(o.is_animating());

        assert_eq!(o.update_time_at(t0 + 5 * SECOND), Some(2));
        assert!(!o.is_animating());
        assert_eq!(o.current_index(), 2);
        assert_eq!(o.orient_at(t0 + 6 * SECOND), o.table().rotation(2));
    }

    #[test]
    fn animating_to_current_index_is_a_no_op() {
        let mut o = orientation();
        let t0 = Instant::now();

        assert!(!o.animate_to_at(0, t0).unwrap());
        assert!(!o.is_animating());
        assert_eq!(o.orient_at(t0 + SECOND), o.table().rotation(0));
    }

    #[test]
    fn requests_while_animating_are_dropped() {
        let mut o = orientation();
        let t0 = Instant::now();

        assert!(o.animate_to_at(1, t0).unwrap());
        assert!(!o.animate_to_at(3, t0 + SECOND).unwrap());
        assert_eq!(o.final_index(), Some(1));

        // The first timer keeps running; the dropped request did not restart it.
        assert_eq!(o.update_time_at(t0 + 5 * SECOND), Some(1));
        assert_eq!(o.current_index(), 1);
    }

    #[test]
    fn out_of_range_request_is_an_error_and_leaves_state_alone() {
        let mut o = orientation();
        let result = o.animate_to_at(7, Instant::now());
        assert!(matches!(result, Err(Error::IndexOutOfRange { index: 7, len: 7 })));
        assert!(!o.is_animating());
    }

    #[test]
    fn orient_follows_the_animation() {
        let mut o = orientation();
        let t0 = Instant::now();
        o.animate_to_at(5, t0).unwrap();

        let start = o.table().rotation(0);
        let end = o.table().rotation(5);
        let mid = o.orient_at(t0 + 2 * SECOND);
        assert_eq!(o.progress_at(t0 + 2 * SECOND), Some(0.4));
        assert_eq!(mid, lerp(start, end, 0.4));
    }

    #[test]
    fn toggling_mid_flight_switches_interpolation_at_same_alpha() {
        let mut o = orientation();
        let t0 = Instant::now();
        o.animate_to_at(4, t0).unwrap();
        let now = t0 + SECOND;

        let start = o.table().rotation(0);
        let end = o.table().rotation(4);
        assert_eq!(o.orient_at(now), lerp(start, end, 0.2));

        assert_eq!(o.toggle_slerp(), Interpolation::Slerp);
        assert!(o.is_animating());
        assert_eq!(o.orient_at(now), slerp(start, end, 0.2));

        assert_eq!(o.toggle_slerp(), Interpolation::Lerp);
    }

    #[test]
    fn builder_settings_apply() {
        let t0 = Instant::now();
        let mut o = orientation()
            .with_duration(2 * SECOND)
            .with_interpolation(Interpolation::Slerp);
        assert_eq!(o.duration(), 2 * SECOND);
        assert_eq!(o.interpolation(), Interpolation::Slerp);

        o.animate_to_at(6, t0).unwrap();
        assert_eq!(o.update_time_at(t0 + 2 * SECOND), Some(6));
    }

    #[test]
    fn chained_animations_start_from_committed_index() {
        let mut o = orientation().with_duration(SECOND);
        let t0 = Instant::now();

        o.animate_to_at(1, t0).unwrap();
        o.update_time_at(t0 + SECOND);
        assert!(o.animate_to_at(0, t0 + SECOND).unwrap());

        let start = o.table().rotation(1);
        let end = o.table().rotation(0);
        let now = t0 + Duration::from_millis(1500);
        assert_eq!(o.orient_at(now), lerp(start, end, 0.5));
    }
}
