//! A single timed transition towards one table entry.

use std::time::{Duration, Instant};

use glam::Quat;

use crate::interpolation::Interpolation;
use crate::orientation_table::OrientationTable;
use crate::timer::Timer;

/// How long a transition takes unless configured otherwise.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_secs(5);

/// Transition from whatever orientation the owner was at to
/// `table[destination]`, driven by a one-shot [`Timer`].
///
/// The animation does not remember where it started; the owner passes the
/// initial orientation on every query so the interpolation mode can be
/// swapped mid-flight.
#[derive(Clone, Debug)]
pub struct Animation {
    destination: usize,
    timer: Timer,
}

impl Animation {
    /// Begin animating towards `destination` at `now`.
    pub fn start(destination: usize, duration: Duration, now: Instant) -> Self {
        let mut timer = Timer::single(duration);
        timer.start_at(now);
        Self { destination, timer }
    }

    /// Interpolated orientation at `now`.
    pub fn orient_at(
        &self,
        table: &OrientationTable,
        initial: Quat,
        interpolation: Interpolation,
        now: Instant,
    ) -> Quat {
        let alpha = self.timer.alpha_at(now);
        interpolation.apply(initial, table.rotation(self.destination), alpha)
    }

    /// Returns `true` once the transition is complete.
    pub fn update_time_at(&mut self, now: Instant) -> bool {
        self.timer.poll_at(now)
    }

    pub fn final_index(&self) -> usize {
        self.destination
    }

    pub fn alpha_at(&self, now: Instant) -> f32 {
        self.timer.alpha_at(now)
    }

    pub fn duration(&self) -> Duration {
        self.timer.duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{lerp, slerp};

    #[test]
    fn starts_at_initial_and_ends_at_destination() {
        let table = OrientationTable::default();
        let t0 = Instant::now();
        let anim = Animation::start(4, DEFAULT_ANIMATION_DURATION, t0);
        let initial = table.rotation(0);

        let first = anim.orient_at(&table, initial, Interpolation::Slerp, t0);
        assert!(first.abs_diff_eq(initial, 1e-5));

        let last = anim.orient_at(&table, initial, Interpolation::Lerp, t0 + Duration::from_secs(5));
        assert!(last.abs_diff_eq(table.rotation(4), 1e-5));
    }

    #[test]
    fn uses_timer_alpha_for_the_requested_interpolation() {
        let table = OrientationTable::default();
        let t0 = Instant::now();
        let anim = Animation::start(1, Duration::from_secs(4), t0);
        let initial = table.rotation(6);
        let now = t0 + Duration::from_secs(1);

        assert_eq!(anim.alpha_at(now), 0.25);
        assert_eq!(
            anim.orient_at(&table, initial, Interpolation::Lerp, now),
            lerp(initial, table.rotation(1), 0.25)
        );
        assert_eq!(
            anim.orient_at(&table, initial, Interpolation::Slerp, now),
            slerp(initial, table.rotation(1), 0.25)
        );
    }

    #[test]
    fn completes_after_duration() {
        let t0 = Instant::now();
        let mut anim = Animation::start(2, DEFAULT_ANIMATION_DURATION, t0);

        assert!(!anim.update_time_at(t0 + Duration::from_millis(4999)));
        assert!(anim.update_time_at(t0 + DEFAULT_ANIMATION_DURATION));
        assert_eq!(anim.final_index(), 2);
        assert_eq!(anim.duration(), DEFAULT_ANIMATION_DURATION);
    }
}
