//! Public-facing band labels.
//!
//! Each domain has its own label vocabulary. The serialized form of every
//! variant is the human-readable label that appears in the output document.
//! Which variant applies is decided by the threshold tables in the index
//! crate; these types only name the outcomes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Band for the composite air quality score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AirBand {
    /// Score of 85 or more.
    #[serde(rename = "Excellent environmental health")]
    #[strum(serialize = "Excellent environmental health")]
    Excellent,
    /// Score of 75 or more.
    #[serde(rename = "Very good environmental health")]
    #[strum(serialize = "Very good environmental health")]
    VeryGood,
    /// Score of 65 or more.
    #[serde(rename = "Good environmental health")]
    #[strum(serialize = "Good environmental health")]
    Good,
    /// Score of 50 or more.
    #[serde(rename = "Moderate environmental health")]
    #[strum(serialize = "Moderate environmental health")]
    Moderate,
    /// Score of 35 or more.
    #[serde(rename = "Poor environmental health")]
    #[strum(serialize = "Poor environmental health")]
    Poor,
    /// Score of 20 or more.
    #[serde(rename = "Very poor environmental health")]
    #[strum(serialize = "Very poor environmental health")]
    VeryPoor,
    /// Score below 20.
    #[serde(rename = "Hazardous environmental health")]
    #[strum(serialize = "Hazardous environmental health")]
    Hazardous,
    /// No pollutant had a usable measurement.
    Unknown,
}

/// Band for a single pollutant's annual mean concentration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum PollutantBand {
    /// At or below the WHO guideline.
    Excellent,
    /// Second tier.
    Good,
    /// Third tier.
    Moderate,
    /// At or below the legal limit.
    Poor,
    /// Above the legal limit.
    #[serde(rename = "Very poor")]
    #[strum(serialize = "Very poor")]
    VeryPoor,
    /// Concentration missing.
    Unknown,
}

/// Band for noise exposure. Keyed on risk, not score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum NoiseBand {
    /// Risk below 0.2.
    #[serde(rename = "Very low noise exposure")]
    #[strum(serialize = "Very low noise exposure")]
    VeryLow,
    /// Risk below 0.4.
    #[serde(rename = "Low noise exposure")]
    #[strum(serialize = "Low noise exposure")]
    Low,
    /// Risk below 0.6.
    #[serde(rename = "Moderate noise exposure")]
    #[strum(serialize = "Moderate noise exposure")]
    Moderate,
    /// Risk below 0.8.
    #[serde(rename = "High noise exposure")]
    #[strum(serialize = "High noise exposure")]
    High,
    /// Risk of 0.8 or more.
    #[serde(rename = "Very high noise exposure")]
    #[strum(serialize = "Very high noise exposure")]
    VeryHigh,
    /// No Lden measurement.
    Unknown,
}

/// Band for greenspace access.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GreenspaceBand {
    /// Score of 85 or more.
    #[serde(rename = "Excellent access to greenspace")]
    #[strum(serialize = "Excellent access to greenspace")]
    Excellent,
    /// Score of 70 or more.
    #[serde(rename = "Good access to greenspace")]
    #[strum(serialize = "Good access to greenspace")]
    Good,
    /// Score of 55 or more.
    #[serde(rename = "Moderate access to greenspace")]
    #[strum(serialize = "Moderate access to greenspace")]
    Moderate,
    /// Score of 40 or more.
    #[serde(rename = "Poor access to greenspace")]
    #[strum(serialize = "Poor access to greenspace")]
    Poor,
    /// Score below 40.
    #[serde(rename = "Very poor access to greenspace")]
    #[strum(serialize = "Very poor access to greenspace")]
    VeryPoor,
    /// Neither access nor capacity could be assessed.
    Unknown,
}

/// Band for the fused overall index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum OverallBand {
    /// Score of 85 or more.
    #[serde(rename = "Excellent environmental health")]
    #[strum(serialize = "Excellent environmental health")]
    Excellent,
    /// Score of 75 or more.
    #[serde(rename = "Very good environmental health")]
    #[strum(serialize = "Very good environmental health")]
    VeryGood,
    /// Score of 65 or more.
    #[serde(rename = "Good environmental health")]
    #[strum(serialize = "Good environmental health")]
    Good,
    /// Score of 50 or more.
    #[serde(rename = "Fair environmental health")]
    #[strum(serialize = "Fair environmental health")]
    Fair,
    /// Score below 50.
    #[serde(rename = "Poor environmental health")]
    #[strum(serialize = "Poor environmental health")]
    Poor,
    /// No component had a score.
    Unknown,
}
