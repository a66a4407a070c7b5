// Access-window expiry calculation
mod refresh;

pub use refresh::{CountdownSlot, CountdownTicker, REFRESH_INTERVAL};

use crate::clock::Clock;
use crate::models::{Enrollment, TimeRemaining, UrgencyTier};
use chrono::{DateTime, Utc};

/// Less than this many whole days left puts a card in the warning tier
pub const WARNING_THRESHOLD_DAYS: i64 = 7;

/// Project the remaining access time for a window `[start_date, expires_at)`.
///
/// `now == expires_at` counts as expired. A window with non-positive length is
/// expired regardless of `now`.
pub fn time_remaining(
    now: DateTime<Utc>,
    start_date: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> TimeRemaining {
    if now >= expires_at || expires_at <= start_date {
        return TimeRemaining::EXPIRED;
    }

    let remaining = expires_at - now;
    let total_ms = (expires_at - start_date).num_milliseconds() as f64;
    let elapsed_ms = (now - start_date).num_milliseconds() as f64;

    let percentage = if total_ms > 0.0 {
        (100.0 - (elapsed_ms / total_ms) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    TimeRemaining {
        days: remaining.num_days(),
        hours: remaining.num_hours() % 24,
        expired: false,
        percentage,
    }
}

/// Same as [`time_remaining`] for an enrollment whose timestamps may be missing.
pub fn time_remaining_for(enrollment: &Enrollment, now: DateTime<Utc>) -> TimeRemaining {
    match (enrollment.start_date, enrollment.expires_at) {
        (Some(start), Some(expires)) => time_remaining(now, start, expires),
        _ => {
            tracing::debug!(
                "Enrollment {} has no usable access window, treating as expired",
                enrollment.id.as_deref().unwrap_or("<no id>")
            );
            TimeRemaining::EXPIRED
        }
    }
}

/// Sample `clock` and project the enrollment's remaining time
pub fn time_remaining_at(clock: &dyn Clock, enrollment: &Enrollment) -> TimeRemaining {
    time_remaining_for(enrollment, clock.now())
}

impl Enrollment {
    pub fn time_remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        time_remaining_for(self, now)
    }
}

pub fn urgency_tier(remaining: &TimeRemaining) -> UrgencyTier {
    if remaining.expired {
        UrgencyTier::Alarmed
    } else if remaining.days < WARNING_THRESHOLD_DAYS {
        UrgencyTier::Warning
    } else {
        UrgencyTier::Normal
    }
}

pub fn format_time_remaining(remaining: &TimeRemaining) -> String {
    if remaining.expired {
        return "EXPIRED".to_string();
    }

    if remaining.days > 0 {
        format!("{}d {}h", remaining.days, remaining.hours)
    } else {
        format!("{}h", remaining.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::models::EnrollmentStatus;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn enrollment(start: Option<DateTime<Utc>>, expires: Option<DateTime<Utc>>) -> Enrollment {
        Enrollment {
            id: Some("enr_1".to_string()),
            student_id: None,
            course_id: Some("mechanics-101".to_string()),
            start_date: start,
            expires_at: expires,
            status: EnrollmentStatus::Active,
            duration_months: Some(3),
            overall_progress: 0.0,
            progress: Vec::new(),
        }
    }

    #[test]
    fn test_one_week_left() {
        let start = t0();
        let expires = start + Duration::days(90);
        let result = time_remaining(start + Duration::days(83), start, expires);

        assert_eq!(result.days, 7);
        assert_eq!(result.hours, 0);
        assert!(!result.expired);
        assert!((result.percentage - 7.78).abs() < 0.01);
        assert_eq!(urgency_tier(&result), UrgencyTier::Normal);
    }

    #[test]
    fn test_past_expiry() {
        let start = t0();
        let expires = start + Duration::days(90);
        let result = time_remaining(start + Duration::days(91), start, expires);
        assert_eq!(result, TimeRemaining::EXPIRED);
        assert_eq!(urgency_tier(&result), UrgencyTier::Alarmed);
    }

    #[test]
    fn test_last_day_hours() {
        let start = t0();
        let expires = start + Duration::days(90);
        let now = start + Duration::days(89) + Duration::hours(13);
        let result = time_remaining(now, start, expires);

        assert_eq!(result.days, 0);
        assert_eq!(result.hours, 11);
        assert!(!result.expired);
        assert_eq!(urgency_tier(&result), UrgencyTier::Warning);
        assert_eq!(format_time_remaining(&result), "11h");
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let start = t0();
        let expires = start + Duration::days(30);
        assert_eq!(time_remaining(expires, start, expires), TimeRemaining::EXPIRED);

        let just_before = time_remaining(expires - Duration::milliseconds(1), start, expires);
        assert!(!just_before.expired);
        assert_eq!(just_before.days, 0);
        assert_eq!(just_before.hours, 0);
    }

    #[test]
    fn test_zero_length_window() {
        let start = t0();
        for offset in [-10, 0, 10] {
            let now = start + Duration::days(offset);
            assert_eq!(time_remaining(now, start, start), TimeRemaining::EXPIRED);
        }
    }

    #[test]
    fn test_inverted_window() {
        let start = t0();
        let expires = start - Duration::days(5);
        let result = time_remaining(start - Duration::days(10), start, expires);
        assert_eq!(result, TimeRemaining::EXPIRED);
    }

    #[test]
    fn test_before_window_start_caps_at_full() {
        let start = t0();
        let expires = start + Duration::days(90);
        let result = time_remaining(start - Duration::days(3), start, expires);

        assert!(!result.expired);
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.days, 93);
    }

    #[test]
    fn test_open_window_bounds() {
        let start = t0();
        let expires = start + Duration::days(90);
        let mut now = start;
        while now < expires {
            let result = time_remaining(now, start, expires);
            assert!(!result.expired);
            assert!((0.0..=100.0).contains(&result.percentage));
            assert!((0..24).contains(&result.hours));
            now += Duration::hours(7);
        }
    }

    #[test]
    fn test_percentage_never_increases() {
        let start = t0();
        let expires = start + Duration::days(30);
        let mut previous = f64::INFINITY;
        let mut now = start - Duration::days(2);
        while now <= expires + Duration::days(2) {
            let result = time_remaining(now, start, expires);
            assert!(result.percentage <= previous);
            previous = result.percentage;
            now += Duration::minutes(517);
        }
    }

    #[test]
    fn test_same_inputs_same_output() {
        let start = t0();
        let expires = start + Duration::days(60);
        let now = start + Duration::days(12) + Duration::minutes(5);
        assert_eq!(
            time_remaining(now, start, expires),
            time_remaining(now, start, expires)
        );
    }

    #[test]
    fn test_missing_timestamps_are_expired() {
        let now = t0();
        assert_eq!(
            time_remaining_for(&enrollment(None, Some(now + Duration::days(1))), now),
            TimeRemaining::EXPIRED
        );
        assert_eq!(
            time_remaining_for(&enrollment(Some(now), None), now),
            TimeRemaining::EXPIRED
        );
        assert_eq!(
            enrollment(None, None).time_remaining(now),
            TimeRemaining::EXPIRED
        );
    }

    #[test]
    fn test_time_remaining_samples_clock() {
        let start = t0();
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .return_const(start + Duration::days(10));

        let enrollment = enrollment(Some(start), Some(start + Duration::days(20)));
        let result = time_remaining_at(&clock, &enrollment);
        assert_eq!(result.days, 10);
        assert!((result.percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_warning_threshold() {
        let start = t0();
        let expires = start + Duration::days(30);

        let seven = time_remaining(expires - Duration::days(7), start, expires);
        assert_eq!(urgency_tier(&seven), UrgencyTier::Normal);

        let almost_seven = time_remaining(
            expires - Duration::days(7) + Duration::minutes(1),
            start,
            expires,
        );
        assert_eq!(almost_seven.days, 6);
        assert_eq!(urgency_tier(&almost_seven), UrgencyTier::Warning);
    }

    #[test]
    fn test_format_time_remaining() {
        let start = t0();
        let expires = start + Duration::days(90);
        let result = time_remaining(start + Duration::hours(30), start, expires);
        assert_eq!(format_time_remaining(&result), "88d 18h");
        assert_eq!(format_time_remaining(&TimeRemaining::EXPIRED), "EXPIRED");
    }
}
