#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types for the district environmental health index.
//!
//! Covers the three input domains (air, noise, greenspace), the per-domain
//! component blocks and bands, the confidence rating, and the fused
//! per-district record that makes up the output document. These types carry
//! no scoring logic; that lives in `env_health_index`.

pub mod band;
pub mod district;
pub mod records;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use band::{AirBand, GreenspaceBand, NoiseBand, OverallBand, PollutantBand};
pub use district::{DistrictCode, InvalidDistrictCodeError};
pub use records::{AirRecord, DistrictRecord, GreenspaceRecord, NoiseRecord};

/// One of the three environmental signals fused into the index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    /// Background pollutant concentrations.
    Air,
    /// Road and rail noise levels.
    Noise,
    /// Greenspace access distance and capacity.
    Greenspace,
}

impl Domain {
    /// All domains, in the preference order used when picking a district's
    /// postcode count.
    pub const ALL: [Self; 3] = [Self::Air, Self::Noise, Self::Greenspace];
}

/// Confidence tier derived from a district's postcode count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Fewer than 20 postcodes.
    VeryLow,
    /// 20 to 99 postcodes.
    Low,
    /// 100 to 499 postcodes.
    Medium,
    /// 500 or more postcodes.
    High,
}

/// Statistical reliability of a district's figures.
///
/// Advisory only: carried to the output for display, never used in fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRating {
    /// Tier.
    pub level: ConfidenceLevel,
    /// Display weight in `(0, 1]`.
    pub weight: f64,
    /// Postcode count the tier was derived from.
    pub postcode_count: u64,
}

/// Air quality block of a fused record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirComponent {
    /// Composite 0–100 score.
    pub score: Option<f64>,
    /// Band for `score`.
    pub band: AirBand,
    /// Weighted pollutant risk the score was derived from.
    pub risk: Option<f64>,
    /// NO₂ annual mean (µg/m³).
    pub no2_ug_m3: Option<f64>,
    /// PM10 annual mean (µg/m³).
    pub pm10_ug_m3: Option<f64>,
    /// PM2.5 annual mean (µg/m³).
    pub pm25_ug_m3: Option<f64>,
    /// Guideline band for NO₂.
    pub no2_band: PollutantBand,
    /// Guideline band for PM10.
    pub pm10_band: PollutantBand,
    /// Guideline band for PM2.5.
    pub pm25_band: PollutantBand,
}

/// Noise block of a fused record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseComponent {
    /// 0–100 score.
    pub score: Option<f64>,
    /// Band for `risk`.
    pub band: NoiseBand,
    /// Lden risk.
    pub risk: Option<f64>,
    /// Mean Lden (dB).
    pub mean_lden_db: Option<f64>,
    /// Mean Lnight (dB).
    pub mean_lnight_db: Option<f64>,
}

/// Greenspace block of a fused record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenspaceComponent {
    /// 0–100 score.
    pub score: Option<f64>,
    /// Band for `score`.
    pub band: GreenspaceBand,
    /// Combined access/capacity risk.
    pub risk: Option<f64>,
    /// Total site area (m²).
    pub total_greenspace_m2: Option<f64>,
    /// Mean access distance (m).
    pub mean_distance_m: Option<f64>,
    /// 75th percentile access distance (m).
    pub p75_distance_m: Option<f64>,
    /// Site area per postcode (m²).
    pub per_postcode_m2: Option<f64>,
}

/// Per-domain blocks of a fused record. `None` serializes as `null` and
/// means the domain had no record for the district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Air quality.
    pub air: Option<AirComponent>,
    /// Noise.
    pub noise: Option<NoiseComponent>,
    /// Greenspace.
    pub greenspace: Option<GreenspaceComponent>,
}

/// The fused environmental health index for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedIndex {
    /// Postcode district.
    pub district: DistrictCode,
    /// Authoritative sample size.
    pub postcode_count: u64,
    /// Reliability of the figures.
    pub confidence: ConfidenceRating,
    /// Weighted mean of the present component scores.
    pub score_overall: Option<f64>,
    /// Band for `score_overall`.
    pub score_band: OverallBand,
    /// Per-domain detail.
    pub components: Components,
}
