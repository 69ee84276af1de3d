//! Relative "ready in / ready now / ready since" labels for batches.
//!
//! Labels are a pure function of `(ready_at, now)`; callers re-evaluate them
//! periodically (once a minute is enough) to keep them current.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Within this distance of `now`, either side, a batch is simply "ready now".
const NOW_WINDOW_MS: i64 = 60_000;
const MS_PER_MINUTE: u64 = 60_000;

/// Derived display state of a batch relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// `ready_at` could not be parsed.
    Unavailable,
    /// Ready in this many whole minutes (rounded up).
    ReadyIn(u64),
    ReadyNow,
    /// Ready this many whole minutes ago (rounded up).
    ReadySince(u64),
}

impl Readiness {
    pub fn at(ready_at: &str, now: DateTime<Utc>) -> Self {
        let Some(ready) = parse_timestamp(ready_at) else {
            return Self::Unavailable;
        };

        let diff = (ready - now).num_milliseconds();
        let minutes = diff.unsigned_abs().div_ceil(MS_PER_MINUTE);

        if diff > NOW_WINDOW_MS {
            Self::ReadyIn(minutes)
        } else if diff >= -NOW_WINDOW_MS {
            Self::ReadyNow
        } else {
            Self::ReadySince(minutes)
        }
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "time unavailable"),
            Self::ReadyIn(minutes) => write!(f, "ready in {}", hours_minutes(*minutes)),
            Self::ReadyNow => write!(f, "ready now"),
            Self::ReadySince(minutes) => write!(f, "ready since {}", hours_minutes(*minutes)),
        }
    }
}

/// Label for a batch ready at `ready_at`, as seen at `now`.
pub fn label(ready_at: &str, now: DateTime<Utc>) -> String {
    Readiness::at(ready_at, now).to_string()
}

/// Parse an RFC 3339 timestamp, or a zone-less ISO-8601 date-time taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn hours_minutes(total: u64) -> String {
    let (h, m) = (total / 60, total % 60);
    match (h, m) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn offset(secs: i64) -> String {
        (now() + Duration::seconds(secs)).to_rfc3339()
    }

    #[test]
    fn boundaries_around_now() {
        assert_eq!(label(&offset(30), now()), "ready now");
        assert_eq!(label(&offset(90), now()), "ready in 2 min");
        assert_eq!(label(&offset(-90), now()), "ready since 2 min");
    }

    #[test]
    fn one_minute_either_side_is_now() {
        assert_eq!(label(&offset(60), now()), "ready now");
        assert_eq!(label(&offset(-60), now()), "ready now");
        assert_eq!(label(&offset(0), now()), "ready now");
        assert_eq!(label(&offset(61), now()), "ready in 2 min");
        assert_eq!(label(&offset(-61), now()), "ready since 2 min");
    }

    #[test]
    fn hours_are_split_out() {
        assert_eq!(label(&offset(45 * 60), now()), "ready in 45 min");
        assert_eq!(label(&offset(120 * 60), now()), "ready in 2 h");
        assert_eq!(label(&offset(125 * 60), now()), "ready in 2 h 5 min");
        assert_eq!(label(&offset(-90 * 60), now()), "ready since 1 h 30 min");
    }

    #[test]
    fn unparseable_is_unavailable() {
        assert_eq!(label("", now()), "time unavailable");
        assert_eq!(label("soon", now()), "time unavailable");
        assert_eq!(Readiness::at("2025-13-40T99:00", now()), Readiness::Unavailable);
    }

    #[test]
    fn accepts_zone_less_service_timestamps() {
        assert_eq!(label("2025-03-01T12:30:00", now()), "ready in 30 min");
        assert_eq!(label("2025-03-01T12:30:00.123456", now()), "ready in 31 min");
        assert_eq!(label("2025-03-01T11:00", now()), "ready since 1 h");
    }

    #[test]
    fn offsets_are_normalized() {
        assert_eq!(label("2025-03-01T09:15:00-03:00", now()), "ready in 15 min");
    }

    #[test]
    fn label_is_idempotent() {
        let ready_at = offset(1234);
        let first = label(&ready_at, now());
        for _ in 0..5 {
            assert_eq!(label(&ready_at, now()), first);
        }
    }
}
