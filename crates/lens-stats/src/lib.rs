//! # lens-stats
//!
//! Engagement statistics for landmark-lens, derived from a user's scan
//! history: places visited, weekly activity, 3-day-window streaks, and the
//! journey ("wrapped") summary.

pub mod service;
pub mod stats;
pub mod streak;
pub mod timestamps;
pub mod wrapped;

pub use service::StatsService;
pub use stats::{compute_stats, UserStats};
pub use streak::streak_days;
pub use timestamps::parse_timestamp;
pub use wrapped::{summarize, top_tags, TagBucket, WrappedItem, WrappedSummary};
