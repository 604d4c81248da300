//! Tests for clocks and day arithmetic

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::temporal::{ceil_days, ClockSource, FixedClock, SystemClock};

#[test]
fn test_system_clock_is_close_to_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    let after = Utc::now();
    assert!(now >= before && now <= after);
}

#[test]
fn test_fixed_clock_set() {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    clock.set(later);
    assert_eq!(clock.now(), later);
}

#[test]
fn test_fixed_clock_is_shareable() {
    let clock: std::sync::Arc<dyn ClockSource> =
        std::sync::Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    let other = clock.clone();
    assert_eq!(clock.now(), other.now());
}

proptest! {
    #[test]
    fn prop_ceil_days_brackets_elapsed_time(secs in 1i64..(400 * 86_400)) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::seconds(secs);
        let days = i64::from(ceil_days(start, end));

        prop_assert!(days * 86_400 >= secs);
        prop_assert!((days - 1) * 86_400 < secs);
    }

    #[test]
    fn prop_ceil_days_zero_when_not_after(secs in 0i64..(400 * 86_400)) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prop_assert_eq!(ceil_days(start, start - Duration::seconds(secs)), 0);
    }
}
