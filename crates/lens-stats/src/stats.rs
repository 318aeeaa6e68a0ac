//! Engagement statistics derived from a user's scan log.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

use lens_core::defaults::WEEK_DAYS;
use lens_core::ScanRecord;

use crate::streak::streak_days;
use crate::timestamps::parse_timestamp;

/// Derived stats, recomputed on every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Distinct non-empty landmark names, compared case-insensitively.
    pub places_visited: usize,
    /// Scans strictly newer than seven days before `now`.
    pub scans_this_week: usize,
    /// Consecutive 3-day windows with activity, ending today.
    pub streak_days: u32,
}

/// Compute [`UserStats`] as of `now`. Records with an unparseable
/// timestamp still count as places visited but not towards time-based
/// figures.
pub fn compute_stats(scans: &[ScanRecord], now: DateTime<Utc>) -> UserStats {
    let week_ago = now - Duration::days(WEEK_DAYS);

    let mut places = HashSet::new();
    let mut scan_dates = BTreeSet::new();
    let mut scans_this_week = 0;

    for scan in scans {
        if let Some(name) = scan.landmark_name.as_deref() {
            let name = name.trim().to_lowercase();
            if !name.is_empty() {
                places.insert(name);
            }
        }

        let Some(raw) = scan.timestamp.as_deref() else {
            continue;
        };
        match parse_timestamp(raw) {
            Some(at) => {
                if at > week_ago {
                    scans_this_week += 1;
                }
                scan_dates.insert(at.date_naive());
            }
            None => trace!(timestamp = raw, "Skipping unparseable scan timestamp"),
        }
    }

    UserStats {
        places_visited: places.len(),
        scans_this_week,
        streak_days: streak_days(&scan_dates, now.date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 0, 0).unwrap()
    }

    fn scan(name: Option<&str>, at: Option<String>) -> ScanRecord {
        ScanRecord {
            landmark_name: name.map(String::from),
            timestamp: at,
            ..Default::default()
        }
    }

    fn ago(d: Duration) -> Option<String> {
        Some((now() - d).to_rfc3339())
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(compute_stats(&[], now()), UserStats::default());
    }

    #[test]
    fn test_places_are_case_insensitive_and_skip_blanks() {
        let scans = vec![
            scan(Some("Eiffel Tower"), None),
            scan(Some("eiffel tower "), None),
            scan(Some("Louvre"), None),
            scan(Some("  "), None),
            scan(None, None),
        ];
        assert_eq!(compute_stats(&scans, now()).places_visited, 2);
    }

    #[test]
    fn test_week_boundary_is_exclusive() {
        let scans = vec![
            scan(Some("a"), ago(Duration::days(7))),
            scan(Some("b"), ago(Duration::days(7) - Duration::seconds(1))),
            scan(Some("c"), ago(Duration::days(1))),
        ];
        assert_eq!(compute_stats(&scans, now()).scans_this_week, 2);
    }

    #[test]
    fn test_unparseable_timestamps_are_skipped() {
        let scans = vec![
            scan(Some("a"), Some("not a time".to_string())),
            scan(Some("b"), ago(Duration::hours(1))),
        ];
        let stats = compute_stats(&scans, now());
        assert_eq!(stats.places_visited, 2);
        assert_eq!(stats.scans_this_week, 1);
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_streak_from_history() {
        let scans = vec![
            scan(Some("a"), ago(Duration::zero())),
            scan(Some("b"), ago(Duration::days(1))),
            scan(Some("c"), ago(Duration::days(4))),
        ];
        assert_eq!(compute_stats(&scans, now()).streak_days, 2);
    }
}
