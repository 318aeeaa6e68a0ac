//! Stats service over an in-memory scan history.

mod helpers;

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use helpers::{scan, MemoryHistory};
use lens_stats::{StatsService, TagBucket, UserStats};

fn history() -> MemoryHistory {
    MemoryHistory::default().with_scans(
        "u1",
        vec![
            scan("Trevi Fountain", "2026-10-18T09:00:00Z", &["fountain", "baroque"], Some("Rome")),
            scan("Colosseum", "2026-10-17 18:30:00+00", &["history"], Some("Rome")),
            scan("colosseum", "2026-10-14T12:00:00", &["history", "ruins"], Some("Rome")),
            scan("Unknown", "garbage", &[], None),
            scan("Uffizi", "2026-10-11T08:00:00Z", &["museum"], Some("Florence")),
            scan("Duomo", "2026-10-03T08:00:00Z", &[], Some("Florence")),
        ],
    )
}

#[tokio::test]
async fn test_user_stats_over_history() {
    let store = Arc::new(history());
    let service = StatsService::new(store.clone());
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap();

    let stats = service.user_stats("u1", now).await;

    // trevi, colosseum, unknown, uffizi, duomo
    assert_eq!(stats.places_visited, 5);
    // Oct 18, 17, 14; Oct 11 20:00 would be the boundary, 08:00 is outside
    assert_eq!(stats.scans_this_week, 3);
    // [16..18] hit, [13..15] hit, [10..12] hit, [7..9] empty
    assert_eq!(stats.streak_days, 3);
    assert_eq!(store.limits(), vec![10_000]);
}

#[tokio::test]
async fn test_user_stats_store_failure_is_zero() {
    let service = StatsService::new(Arc::new(history().failing_scans()));
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap();
    assert_eq!(service.user_stats("u1", now).await, UserStats::default());
}

#[tokio::test]
async fn test_unknown_user_has_zero_stats() {
    let service = StatsService::new(Arc::new(history()));
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap();
    assert_eq!(service.user_stats("nobody", now).await, UserStats::default());
}

#[tokio::test]
async fn test_wrapped_summary() {
    let store = Arc::new(history());
    let service = StatsService::new(store.clone());

    let summary = service.build_wrapped("u1", 50).await;

    assert_eq!(summary.total_scans, 6);
    // trevi, colosseum, uffizi, duomo
    assert_eq!(summary.unique_landmarks, 4);
    assert_eq!(summary.top_city.as_deref(), Some("Rome"));
    assert_eq!(summary.items.len(), 6);
    assert_eq!(summary.items[3].landmark_name, "Unknown");
    assert_eq!(summary.items[3].timestamp.as_deref(), Some("garbage"));
    assert_eq!(
        summary.top_tags[0],
        TagBucket {
            tag: "history".to_string(),
            count: 2
        }
    );
    // history and Landmarks tie at 2; history was seen first.
    assert_eq!(
        summary.top_tags[1],
        TagBucket {
            tag: "Landmarks".to_string(),
            count: 2
        }
    );
    let rest: Vec<_> = summary.top_tags[2..].iter().map(|b| b.tag.as_str()).collect();
    assert_eq!(rest, vec!["fountain", "museum"]);
    assert_eq!(store.limits(), vec![50]);
}

#[tokio::test]
async fn test_wrapped_respects_limit() {
    let service = StatsService::new(Arc::new(history()));
    let summary = service.build_wrapped("u1", 2).await;
    assert_eq!(summary.total_scans, 2);
    assert_eq!(summary.unique_landmarks, 2);
}

#[tokio::test]
async fn test_wrapped_city_failure_degrades() {
    let service = StatsService::new(Arc::new(history().failing_city()));
    let summary = service.build_wrapped("u1", 50).await;
    assert_eq!(summary.top_city, None);
    assert_eq!(summary.total_scans, 6);
}

#[tokio::test]
async fn test_wrapped_history_failure_is_empty() {
    let service = StatsService::new(Arc::new(history().failing_scans()));
    let summary = service.build_wrapped("u1", 50).await;
    assert_eq!(summary.total_scans, 0);
    assert!(summary.items.is_empty());
    assert!(summary.top_tags.is_empty());
    assert_eq!(summary.top_city.as_deref(), Some("Rome"));
}

#[tokio::test]
async fn test_wrapped_serializes_for_clients() {
    let service = StatsService::new(Arc::new(history()));
    let summary = service.build_wrapped("u1", 1).await;
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total_scans"], 1);
    assert_eq!(json["items"][0]["landmark_name"], "Trevi Fountain");
    assert_eq!(json["top_tags"][0]["tag"], "fountain");
}
