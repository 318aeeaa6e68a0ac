//! Activity streaks over 3-day windows.
//!
//! Windows are laid back-to-back from today: `[today-2, today]`,
//! `[today-5, today-3]`, and so on. The streak is the number of consecutive
//! windows, starting with the current one, that contain at least one scan.
//! The walk stops at the first empty window or once it has gone back more
//! than a year.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use lens_core::defaults::{STREAK_MAX_LOOKBACK_DAYS, STREAK_WINDOW_DAYS};

/// Number of consecutive non-empty windows ending today.
pub fn streak_days(scan_dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut window_end = today;

    loop {
        let window_start = window_end - Duration::days(STREAK_WINDOW_DAYS - 1);
        if scan_dates.range(window_start..=window_end).next().is_none() {
            break;
        }
        streak += 1;
        window_end = window_start - Duration::days(1);

        if (today - window_end).num_days() > STREAK_MAX_LOOKBACK_DAYS {
            break;
        }
    }

    streak
}
