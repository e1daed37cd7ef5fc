//! Time breakdowns shown next to vessels and notifications.
//!
//! These return structured values; `Display` gives the short labels the
//! dashboard prints ("1h 45m", "5m ago").

use crate::constants::time::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};

/// Whole hours and minutes left until an ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
}

impl TimeRemaining {
    /// Floors to whole minutes. An ETA in the past yields `0h 0m`.
    pub fn until(arrival_ms: i64, now_ms: i64) -> Self {
        let diff = arrival_ms.saturating_sub(now_ms).max(0);
        Self {
            hours: diff / MS_PER_HOUR,
            minutes: (diff % MS_PER_HOUR) / MS_PER_MINUTE,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// How long ago something happened, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    /// Under one minute (including timestamps in the future).
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
}

impl Age {
    pub fn since(created_ms: i64, now_ms: i64) -> Self {
        let diff = now_ms.saturating_sub(created_ms);
        let minutes = diff / MS_PER_MINUTE;
        if minutes < 1 {
            Age::JustNow
        } else if minutes < 60 {
            Age::Minutes(minutes)
        } else if diff < MS_PER_DAY {
            Age::Hours(minutes / 60)
        } else {
            Age::Days(diff / MS_PER_DAY)
        }
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::JustNow => f.write_str("Just now"),
            Age::Minutes(m) => write!(f, "{}m ago", m),
            Age::Hours(h) => write!(f, "{}h ago", h),
            Age::Days(d) => write!(f, "{}d ago", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_remaining() {
        let t = TimeRemaining::until(MS_PER_HOUR + 45 * MS_PER_MINUTE + 59_000, 0);
        assert_eq!(t, TimeRemaining { hours: 1, minutes: 45 });
        assert_eq!(t.to_string(), "1h 45m");
    }

    #[test]
    fn test_time_remaining_overdue() {
        let t = TimeRemaining::until(0, 3 * MS_PER_HOUR);
        assert!(t.is_zero());
        assert_eq!(t.to_string(), "0h 0m");
    }

    #[test]
    fn test_age_buckets() {
        let now = 10 * MS_PER_DAY;
        assert_eq!(Age::since(now - 30_000, now), Age::JustNow);
        assert_eq!(Age::since(now + MS_PER_HOUR, now), Age::JustNow);
        assert_eq!(Age::since(now - 5 * MS_PER_MINUTE, now), Age::Minutes(5));
        assert_eq!(Age::since(now - 3 * MS_PER_HOUR, now), Age::Hours(3));
        assert_eq!(Age::since(now - 2 * MS_PER_DAY, now), Age::Days(2));
    }

    #[test]
    fn test_age_labels() {
        assert_eq!(Age::JustNow.to_string(), "Just now");
        assert_eq!(Age::Minutes(12).to_string(), "12m ago");
        assert_eq!(Age::Hours(4).to_string(), "4h ago");
        assert_eq!(Age::Days(1).to_string(), "1d ago");
    }
}
