//! Maintainer-facing analytics over normalized documents.
//!
//! Three independent pure functions: the intake summary, pull-request
//! attention insights, and the issue triage snapshot. All consume document
//! slices and configs; none performs I/O.

pub mod attention;
pub mod intake;
pub mod triage;

pub use attention::{analyze_attention, AttentionConfig, AttentionInsights};
pub use intake::{summarize, IntakeSummary, SummaryConfig};
pub use triage::{triage, TriageConfig, TriageSnapshot};

use chrono::{DateTime, Utc};

/// Seconds per day, for whole-day deltas.
const SECONDS_PER_DAY: i64 = 86_400;

/// Parse an upstream RFC 3339 timestamp; absent or unparseable values
/// become `None`.
pub(crate) fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days from `earlier` to `reference`, floored. Negative when the
/// reference predates the activity; deliberately not clamped.
pub(crate) fn days_between(earlier: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    reference
        .signed_duration_since(earlier)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp(Some("2024-05-01T10:00:00Z")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());

        assert!(parse_timestamp(None).is_none());
        assert!(parse_timestamp(Some("")).is_none());
        assert!(parse_timestamp(Some("yesterday")).is_none());
    }

    #[test]
    fn test_days_between_floors() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let same_day = Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap();
        assert_eq!(days_between(earlier, same_day), 0);

        let ten_days = Utc.with_ymd_and_hms(2024, 5, 11, 12, 0, 0).unwrap();
        assert_eq!(days_between(earlier, ten_days), 10);

        // Reference twelve hours before the activity floors to -1, not 0.
        let before = Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap();
        assert_eq!(days_between(earlier, before), -1);
    }
}
