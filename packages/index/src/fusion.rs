//! Fusion of component scores into the overall index.
//!
//! Domain weights are renormalized over the domains that actually have a
//! score for the district, so a missing domain neither drags the overall
//! score down nor inflates it.

use env_health_index_models::{Domain, OverallBand};

use crate::band::OVERALL_BANDS;
use crate::config::DomainWeights;
use crate::risk::{known, round_to};

/// Weighted mean over the entries whose value is known.
///
/// Missing and NaN values are excluded from both the numerator and the
/// denominator. Returns `None` when no weight remains.
#[must_use]
pub fn weighted_mean<I>(entries: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, Option<f64>)>,
{
    let (weighted, total) = entries
        .into_iter()
        .filter_map(|(weight, value)| known(value).map(|v| (weight, v)))
        .fold((0.0, 0.0), |(weighted, total), (weight, value)| {
            (weight.mul_add(value, weighted), total + weight)
        });

    (total > 0.0).then(|| weighted / total)
}

/// Weights renormalized over `present`. Sums to 1.0 for any non-empty
/// subset with positive total weight; empty otherwise.
#[must_use]
pub fn effective_weights(weights: &DomainWeights, present: &[Domain]) -> Vec<(Domain, f64)> {
    let total: f64 = present.iter().map(|d| weights.weight(*d)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    present
        .iter()
        .map(|d| (*d, weights.weight(*d) / total))
        .collect()
}

/// Overall score from per-domain component scores, rounded to one decimal.
///
/// `None` when no domain has a score.
#[must_use]
pub fn fuse(weights: &DomainWeights, scores: &[(Domain, Option<f64>)]) -> Option<f64> {
    let scored: Vec<(Domain, f64)> = scores
        .iter()
        .filter_map(|(domain, score)| known(*score).map(|s| (*domain, s)))
        .collect();
    let present: Vec<Domain> = scored.iter().map(|(domain, _)| *domain).collect();

    let effective = effective_weights(weights, &present);
    if effective.is_empty() {
        return None;
    }

    let overall = effective
        .iter()
        .zip(&scored)
        .fold(0.0, |sum, ((_, weight), (_, score))| weight.mul_add(*score, sum));

    Some(round_to(overall, 1))
}

/// Public band for an overall score.
#[must_use]
pub fn overall_band(score: Option<f64>) -> OverallBand {
    OVERALL_BANDS.classify(score)
}
