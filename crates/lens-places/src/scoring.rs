//! Place scoring and ranking.
//!
//! `score = 0.55 * distance_score + 0.35 * rating_score + open_bonus`
//!
//! - `distance_score = max(0, 1 - distance / radius)`
//! - `rating_score = rating / 5`, 0 without a rating
//! - `open_bonus = 0.15` when open now
//!
//! A candidate without a distance scores 0 outright, so it ranks below
//! every located candidate however well rated or open it is.
//!
//! Scores are not capped at 1.0; only relative order matters.

use tracing::debug;

use lens_core::defaults::{DISTANCE_WEIGHT, MAX_RATING, OPEN_NOW_BONUS, RATING_WEIGHT};
use lens_core::PlaceCandidate;

use crate::dedup::dedupe_places;

/// Weights for the three score components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub distance: f64,
    pub rating: f64,
    pub open_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: DISTANCE_WEIGHT,
            rating: RATING_WEIGHT,
            open_bonus: OPEN_NOW_BONUS,
        }
    }
}

/// Score one candidate against the search radius.
pub fn score_place(place: &PlaceCandidate, radius_m: u32, weights: &ScoreWeights) -> f64 {
    let Some(distance) = place.distance_m else {
        return 0.0;
    };
    let radius = f64::from(radius_m.max(1));
    let distance_score = (1.0 - f64::from(distance) / radius).max(0.0);
    let rating_score = place
        .rating
        .map(|r| r.clamp(0.0, MAX_RATING) / MAX_RATING)
        .unwrap_or(0.0);
    let open_bonus = if place.open_now == Some(true) {
        weights.open_bonus
    } else {
        0.0
    };

    weights.distance * distance_score + weights.rating * rating_score + open_bonus
}

/// Deduplicate, sort by score descending and truncate.
///
/// The sort is stable, so equally scored candidates keep their merge order.
pub fn rank_places(
    candidates: Vec<PlaceCandidate>,
    radius_m: u32,
    limit: usize,
) -> Vec<PlaceCandidate> {
    let weights = ScoreWeights::default();
    let input_count = candidates.len();

    let mut scored: Vec<(f64, PlaceCandidate)> = dedupe_places(candidates)
        .into_iter()
        .map(|p| (score_place(&p, radius_m, &weights), p))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    debug!(
        input_count,
        result_count = scored.len(),
        radius_m,
        "Place ranking complete"
    );

    scored.into_iter().map(|(_, p)| p).collect()
}
