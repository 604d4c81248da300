//! Time sources and day arithmetic
//!
//! Deadline evaluation never reads the wall clock directly; it asks a
//! [`ClockSource`] so tests can pin or advance time.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Supplies the current time
pub trait ClockSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually controlled clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Sets the current time
    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl ClockSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Whole days between two instants, rounded up; zero when `later` is not after `earlier`
pub fn ceil_days(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u32 {
    let elapsed = later - earlier;
    if elapsed <= Duration::zero() {
        return 0;
    }
    let day = Duration::days(1).num_seconds();
    let secs = elapsed.num_seconds();
    let days = secs / day + i64::from(secs % day != 0 || elapsed.subsec_nanos() > 0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), start + Duration::days(2));
    }

    #[test]
    fn test_ceil_days() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(ceil_days(t, t), 0);
        assert_eq!(ceil_days(t, t - Duration::hours(5)), 0);
        assert_eq!(ceil_days(t, t + Duration::seconds(1)), 1);
        assert_eq!(ceil_days(t, t + Duration::days(4)), 4);
        assert_eq!(ceil_days(t, t + Duration::days(4) + Duration::minutes(1)), 5);
    }
}
