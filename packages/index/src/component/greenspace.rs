//! Greenspace component.
//!
//! Two sub-risks are blended:
//!
//! * **Access**: a blend of the mean and 75th percentile distance to the
//!   nearest access point, normalized between 100 m and 1000 m.
//! * **Capacity**: `1 − percentile rank` of greenspace area per postcode,
//!   ranked across every district in the input. This is relative to the
//!   city, so the ranks must be computed once over the full district set
//!   ([`CapacityRanks`]) before any district is scored.
//!
//! When one sub-risk is unknown the other is used alone.

use std::collections::BTreeMap;

use env_health_index_models::{DistrictCode, GreenspaceComponent, GreenspaceRecord};

use crate::band::GREENSPACE_BANDS;
use crate::config::GreenspaceConfig;
use crate::risk::{Metric, known, risk, score_from_risk};

use super::report_risk;

/// Percentile rank of each district's area per postcode, computed over the
/// whole greenspace input in a pass that precedes scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityRanks {
    ranks: BTreeMap<DistrictCode, f64>,
}

impl CapacityRanks {
    /// Ranks every record that has a known area per postcode.
    ///
    /// Ties share the average of their ranks; records without a capacity
    /// figure are left out and have no rank. Each district must appear at
    /// most once in `records`.
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenspaceRecord>,
    {
        let values: Vec<(&DistrictCode, f64)> = records
            .into_iter()
            .filter_map(|r| r.area_per_postcode().map(|v| (&r.district, v)))
            .collect();

        let ranks = values
            .iter()
            .zip(percentile_ranks(
                &values.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            ))
            .map(|((district, _), rank)| ((*district).clone(), rank))
            .collect();

        Self { ranks }
    }

    /// Returns the percentile rank for `district`, if it was ranked.
    #[must_use]
    pub fn get(&self, district: &DistrictCode) -> Option<f64> {
        self.ranks.get(district).copied()
    }

    /// Number of ranked districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no district could be ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Percentile rank in `(0, 1]` of each value within `values`, using the
/// average rank for ties.
///
/// `[10, 20, 20, 40]` → `[0.25, 0.625, 0.625, 1.0]`.
#[must_use]
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;

    values
        .iter()
        .map(|&v| {
            let below = values.iter().filter(|&&o| o < v).count();
            let equal = values.iter().filter(|&&o| o == v).count();
            #[allow(clippy::cast_precision_loss)]
            let average_rank = below as f64 + (equal as f64 + 1.0) / 2.0;
            average_rank / n
        })
        .collect()
}

/// Blended access distance: `mean share × mean + p75 share × p75`.
///
/// Unknown unless both distances are known.
#[must_use]
pub fn blended_distance(record: &GreenspaceRecord, config: &GreenspaceConfig) -> Option<f64> {
    let mean = known(record.mean_distance_m)?;
    let p75 = known(record.p75_distance_m)?;
    Some(config.mean_distance_share.mul_add(mean, config.p75_distance_share * p75))
}

/// Combines the access and capacity sub-risks, falling back to whichever
/// one is known.
#[must_use]
pub fn combined_risk(
    access: Option<f64>,
    capacity: Option<f64>,
    config: &GreenspaceConfig,
) -> Option<f64> {
    match (known(access), known(capacity)) {
        (Some(a), Some(c)) => Some(config.access_share.mul_add(a, config.capacity_share * c)),
        (Some(a), None) => Some(a),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    }
}

/// Scores one district's greenspace record against the precomputed
/// capacity ranks.
#[must_use]
pub fn score_greenspace(
    record: &GreenspaceRecord,
    ranks: &CapacityRanks,
    config: &GreenspaceConfig,
) -> GreenspaceComponent {
    let access = risk(blended_distance(record, config), Metric::AccessDistance);
    let capacity = ranks.get(&record.district).map(|rank| 1.0 - rank);
    let risk = combined_risk(access, capacity, config);
    let score = score_from_risk(risk);

    log::debug!(
        "{}: greenspace access risk {access:?}, capacity risk {capacity:?}",
        record.district
    );

    GreenspaceComponent {
        score,
        band: GREENSPACE_BANDS.classify(score),
        risk: report_risk(risk),
        total_greenspace_m2: record.total_area_m2,
        mean_distance_m: record.mean_distance_m,
        p75_distance_m: record.p75_distance_m,
        per_postcode_m2: record.area_per_postcode(),
    }
}
