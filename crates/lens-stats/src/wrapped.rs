//! Journey ("wrapped") summary of a user's recent scans.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use lens_core::defaults::{WRAPPED_TOP_TAGS, WRAPPED_UNTAGGED_BUCKET};
use lens_core::ScanRecord;

/// One scan as shown in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedItem {
    pub landmark_name: String,
    pub tags: Vec<String>,
    /// Raw stored timestamp.
    pub timestamp: Option<String>,
}

/// Number of scans whose first tag is `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBucket {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WrappedSummary {
    pub total_scans: usize,
    pub unique_landmarks: usize,
    pub top_city: Option<String>,
    pub items: Vec<WrappedItem>,
    pub top_tags: Vec<TagBucket>,
}

/// Uniqueness key for a landmark name; placeholders and blanks have none.
fn landmark_key(name: Option<&str>) -> Option<String> {
    let key = name?.trim().to_lowercase();
    match key.as_str() {
        "" | "unknown" | "uncertain" => None,
        _ => Some(key),
    }
}

/// Bucket scans by their first tag and keep the largest buckets. Ties
/// keep the order in which buckets were first seen.
///
/// The first tag is trimmed; a scan whose first tag is blank joins the
/// untagged bucket.
pub fn top_tags(scans: &[ScanRecord], limit: usize) -> Vec<TagBucket> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for scan in scans {
        let tag = scan
            .tags
            .first()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(WRAPPED_UNTAGGED_BUCKET)
            .to_string();
        let count = counts.entry(tag.clone()).or_insert(0);
        if *count == 0 {
            order.push(tag);
        }
        *count += 1;
    }

    let mut buckets: Vec<TagBucket> = order
        .into_iter()
        .map(|tag| {
            let count = counts.get(&tag).copied().unwrap_or_default();
            TagBucket { tag, count }
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(limit);
    buckets
}

/// Summarize scans already fetched newest-first.
pub fn summarize(scans: &[ScanRecord], top_city: Option<String>) -> WrappedSummary {
    let unique: HashSet<String> = scans
        .iter()
        .filter_map(|s| landmark_key(s.landmark_name.as_deref()))
        .collect();

    let items = scans
        .iter()
        .map(|s| WrappedItem {
            landmark_name: s
                .landmark_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            tags: s.tags.clone(),
            timestamp: s.timestamp.clone(),
        })
        .collect();

    WrappedSummary {
        total_scans: scans.len(),
        unique_landmarks: unique.len(),
        top_city,
        items,
        top_tags: top_tags(scans, WRAPPED_TOP_TAGS),
    }
}
