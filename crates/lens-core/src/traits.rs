//! Store traits consumed by the core.
//!
//! Persistence lives outside this workspace; these traits are the seams it
//! plugs into, and tests provide in-memory implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewScan, ScanRecord, UserProfile};

/// Read access to stored user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile, `Ok(None)` if the user has none.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}

/// Access to a user's scan history.
#[async_trait]
pub trait ScanHistoryStore: Send + Sync {
    /// Newest-first scans for a user, at most `limit`.
    async fn get_scans_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<ScanRecord>>;

    /// Most frequent non-empty city across the user's scans.
    async fn get_top_city_for_user(&self, user_id: &str) -> Result<Option<String>>;

    /// Persist a freshly identified scan.
    async fn save_scan(&self, scan: NewScan) -> Result<()>;
}
