//! Confidence rating from sample size.

use env_health_index_models::{ConfidenceLevel, ConfidenceRating};

/// Tiers as `(minimum postcode count, level, weight)`, largest first.
const TIERS: [(u64, ConfidenceLevel, f64); 4] = [
    (500, ConfidenceLevel::High, 1.0),
    (100, ConfidenceLevel::Medium, 0.7),
    (20, ConfidenceLevel::Low, 0.4),
    (0, ConfidenceLevel::VeryLow, 0.2),
];

/// Rates a district by its postcode count.
#[must_use]
pub fn confidence(postcode_count: u64) -> ConfidenceRating {
    let (level, weight) = TIERS
        .iter()
        .find(|(minimum, _, _)| postcode_count >= *minimum)
        .map_or((ConfidenceLevel::VeryLow, 0.2), |(_, level, weight)| {
            (*level, *weight)
        });

    ConfidenceRating {
        level,
        weight,
        postcode_count,
    }
}
