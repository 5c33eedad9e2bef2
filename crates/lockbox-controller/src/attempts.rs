//! Sliding-window failed-attempt tracking.
//!
//! Each wrong PIN is stamped with the time it was entered. The alarm arms when
//! `limit` stamps are younger than `window`. Stamps are never pruned on their
//! own: old ones simply stop counting, and the whole record is dropped when
//! the lock leaves the Locked state.

use std::time::Duration;

use tokio::time::Instant;

/// Outcome of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptVerdict {
    /// Attempts left before the alarm arms.
    pub remaining: u32,
    /// The limit was reached inside the window.
    pub trigger_alarm: bool,
}

/// Time-ordered record of failed unlock attempts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lockbox_controller::attempts::FailedAttemptTracker;
/// use tokio::time::Instant;
///
/// let mut tracker = FailedAttemptTracker::new(3, Duration::from_secs(60));
/// let now = Instant::now();
///
/// assert_eq!(tracker.record_failure(now).remaining, 2);
/// assert_eq!(tracker.record_failure(now).remaining, 1);
/// assert!(tracker.record_failure(now).trigger_alarm);
/// ```
#[derive(Debug, Clone)]
pub struct FailedAttemptTracker {
    limit: u32,
    window: Duration,
    failures: Vec<Instant>,
}

impl FailedAttemptTracker {
    /// Create an empty tracker.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            failures: Vec::new(),
        }
    }

    /// Record a mismatch at `now` and decide whether the alarm arms.
    pub fn record_failure(&mut self, now: Instant) -> AttemptVerdict {
        self.failures.push(now);
        let remaining = self.remaining(now);

        AttemptVerdict {
            remaining,
            trigger_alarm: remaining == 0,
        }
    }

    /// Number of recorded failures younger than the window.
    ///
    /// Stamps are chronological, so the scan stops at the oldest one still
    /// inside the window and counts everything after it.
    pub fn count_within_window(&self, now: Instant) -> usize {
        self.failures
            .iter()
            .position(|&stamp| now.saturating_duration_since(stamp) < self.window)
            .map_or(0, |first| self.failures.len() - first)
    }

    /// Attempts left before the alarm arms, as seen at `now`.
    pub fn remaining(&self, now: Instant) -> u32 {
        let counted = u32::try_from(self.count_within_window(now)).unwrap_or(u32::MAX);
        self.limit.saturating_sub(counted)
    }

    /// Forget every recorded failure.
    pub fn reset(&mut self) {
        self.failures.clear();
    }

    /// Total failures recorded since the last reset, stale ones included.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_fresh_tracker_has_full_budget() {
        let tracker = FailedAttemptTracker::new(3, WINDOW);

        assert!(tracker.is_empty());
        assert_eq!(tracker.remaining(Instant::now()), 3);
    }

    #[test]
    fn test_limit_reached_inside_window() {
        let mut tracker = FailedAttemptTracker::new(3, WINDOW);
        let start = Instant::now();

        let first = tracker.record_failure(start);
        let second = tracker.record_failure(start + Duration::from_secs(10));
        let third = tracker.record_failure(start + Duration::from_secs(59));

        assert_eq!(
            first,
            AttemptVerdict {
                remaining: 2,
                trigger_alarm: false
            }
        );
        assert_eq!(second.remaining, 1);
        assert_eq!(
            third,
            AttemptVerdict {
                remaining: 0,
                trigger_alarm: true
            }
        );
    }

    #[rstest]
    #[case::just_inside(Duration::from_millis(59_999), true)]
    #[case::exactly_window(Duration::from_secs(60), false)]
    #[case::well_outside(Duration::from_secs(90), false)]
    fn test_window_boundary_is_exclusive(#[case] age_of_first: Duration, #[case] armed: bool) {
        let mut tracker = FailedAttemptTracker::new(2, WINDOW);
        let start = Instant::now();

        tracker.record_failure(start);
        let verdict = tracker.record_failure(start + age_of_first);

        assert_eq!(verdict.trigger_alarm, armed);
    }

    #[test]
    fn test_stale_entries_stop_counting_but_are_kept() {
        let mut tracker = FailedAttemptTracker::new(3, WINDOW);
        let start = Instant::now();

        tracker.record_failure(start);
        tracker.record_failure(start + Duration::from_secs(61));
        let verdict = tracker.record_failure(start + Duration::from_secs(122));

        assert!(!verdict.trigger_alarm);
        assert_eq!(verdict.remaining, 2);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_remaining_recovers_as_time_passes() {
        let mut tracker = FailedAttemptTracker::new(3, WINDOW);
        let start = Instant::now();

        tracker.record_failure(start);
        tracker.record_failure(start + Duration::from_secs(30));

        assert_eq!(tracker.remaining(start + Duration::from_secs(31)), 1);
        assert_eq!(tracker.remaining(start + Duration::from_secs(61)), 2);
        assert_eq!(tracker.remaining(start + Duration::from_secs(91)), 3);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tracker = FailedAttemptTracker::new(3, WINDOW);
        let now = Instant::now();

        tracker.record_failure(now);
        tracker.record_failure(now);
        tracker.reset();

        assert!(tracker.is_empty());
        assert_eq!(tracker.remaining(now), 3);
    }

    #[test]
    fn test_limit_of_one_arms_immediately() {
        let mut tracker = FailedAttemptTracker::new(1, WINDOW);
        assert!(tracker.record_failure(Instant::now()).trigger_alarm);
    }
}
