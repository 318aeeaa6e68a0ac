//! Store-backed stats and journey summaries.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use lens_core::defaults::INTERNAL_FETCH_LIMIT;
use lens_core::ScanHistoryStore;

use crate::stats::{compute_stats, UserStats};
use crate::wrapped::{summarize, WrappedSummary};

/// Reads scan history and derives stats from it. Store failures degrade
/// to empty results.
pub struct StatsService {
    scans: Arc<dyn ScanHistoryStore>,
}

impl StatsService {
    pub fn new(scans: Arc<dyn ScanHistoryStore>) -> Self {
        Self { scans }
    }

    /// Stats over the user's full history as of `now`.
    pub async fn user_stats(&self, user_id: &str, now: DateTime<Utc>) -> UserStats {
        let scans = match self
            .scans
            .get_scans_for_user(user_id, INTERNAL_FETCH_LIMIT)
            .await
        {
            Ok(scans) => scans,
            Err(e) => {
                warn!(
                    subsystem = "stats",
                    op = "user_stats",
                    user_id,
                    error = %e,
                    "Scan history unavailable, returning zero stats"
                );
                return UserStats::default();
            }
        };

        let stats = compute_stats(&scans, now);
        info!(
            subsystem = "stats",
            op = "user_stats",
            user_id,
            result_count = scans.len(),
            places_visited = stats.places_visited,
            streak_days = stats.streak_days,
            "User stats computed"
        );
        stats
    }

    /// Summary of the user's `limit` most recent scans.
    pub async fn build_wrapped(&self, user_id: &str, limit: usize) -> WrappedSummary {
        let (scans, top_city) = tokio::join!(
            self.scans.get_scans_for_user(user_id, limit),
            self.scans.get_top_city_for_user(user_id),
        );

        let scans = scans.unwrap_or_else(|e| {
            warn!(
                subsystem = "stats",
                op = "build_wrapped",
                user_id,
                error = %e,
                "Scan history unavailable"
            );
            Vec::new()
        });
        let top_city = top_city.unwrap_or_else(|e| {
            warn!(
                subsystem = "stats",
                op = "build_wrapped",
                user_id,
                error = %e,
                "Top city unavailable"
            );
            None
        });

        let summary = summarize(&scans, top_city);
        info!(
            subsystem = "stats",
            op = "build_wrapped",
            user_id,
            total_scans = summary.total_scans,
            unique_landmarks = summary.unique_landmarks,
            "Journey summary built"
        );
        summary
    }
}
