//! Threshold tables that map scores, risks, and concentrations to bands.
//!
//! Each table is an ordered list of `(bound, band)` pairs evaluated top
//! down; the first tier whose bound matches wins. Tables differ in how the
//! bound is compared, see [`TierRule`].

use env_health_index_models::{AirBand, GreenspaceBand, NoiseBand, OverallBand, PollutantBand};

use crate::risk::{Metric, known};

/// How a tier bound is compared against the classified value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierRule {
    /// Tier applies when `value >= bound`. Bounds descend.
    AtLeast,
    /// Tier applies when `value < bound`. Bounds ascend.
    Below,
    /// Tier applies when `value <= bound`. Bounds ascend.
    AtMost,
}

impl TierRule {
    fn matches(self, value: f64, bound: f64) -> bool {
        match self {
            Self::AtLeast => value >= bound,
            Self::Below => value < bound,
            Self::AtMost => value <= bound,
        }
    }
}

/// An ordered band table.
#[derive(Debug, Clone, Copy)]
pub struct BandTable<B: 'static> {
    /// Comparison applied to every tier.
    pub rule: TierRule,
    /// Tiers in evaluation order.
    pub tiers: &'static [(f64, B)],
    /// Band when no tier matches.
    pub otherwise: B,
    /// Band when the value is unknown.
    pub unknown: B,
}

impl<B: Copy> BandTable<B> {
    /// Classifies `value`, mapping missing/NaN to the unknown band.
    #[must_use]
    pub fn classify(&self, value: Option<f64>) -> B {
        let Some(value) = known(value) else {
            return self.unknown;
        };

        self.tiers
            .iter()
            .find(|(bound, _)| self.rule.matches(value, *bound))
            .map_or(self.otherwise, |(_, band)| *band)
    }
}

/// Composite air quality score bands.
pub const AIR_BANDS: BandTable<AirBand> = BandTable {
    rule: TierRule::AtLeast,
    tiers: &[
        (85.0, AirBand::Excellent),
        (75.0, AirBand::VeryGood),
        (65.0, AirBand::Good),
        (50.0, AirBand::Moderate),
        (35.0, AirBand::Poor),
        (20.0, AirBand::VeryPoor),
    ],
    otherwise: AirBand::Hazardous,
    unknown: AirBand::Unknown,
};

/// Noise bands. Keyed on risk rather than score.
pub const NOISE_BANDS: BandTable<NoiseBand> = BandTable {
    rule: TierRule::Below,
    tiers: &[
        (0.2, NoiseBand::VeryLow),
        (0.4, NoiseBand::Low),
        (0.6, NoiseBand::Moderate),
        (0.8, NoiseBand::High),
    ],
    otherwise: NoiseBand::VeryHigh,
    unknown: NoiseBand::Unknown,
};

/// Greenspace score bands.
pub const GREENSPACE_BANDS: BandTable<GreenspaceBand> = BandTable {
    rule: TierRule::AtLeast,
    tiers: &[
        (85.0, GreenspaceBand::Excellent),
        (70.0, GreenspaceBand::Good),
        (55.0, GreenspaceBand::Moderate),
        (40.0, GreenspaceBand::Poor),
    ],
    otherwise: GreenspaceBand::VeryPoor,
    unknown: GreenspaceBand::Unknown,
};

/// Overall index bands.
pub const OVERALL_BANDS: BandTable<OverallBand> = BandTable {
    rule: TierRule::AtLeast,
    tiers: &[
        (85.0, OverallBand::Excellent),
        (75.0, OverallBand::VeryGood),
        (65.0, OverallBand::Good),
        (50.0, OverallBand::Fair),
    ],
    otherwise: OverallBand::Poor,
    unknown: OverallBand::Unknown,
};

/// NO₂ guideline bands (µg/m³, inclusive upper bounds).
const NO2_BANDS: BandTable<PollutantBand> = BandTable {
    rule: TierRule::AtMost,
    tiers: &[
        (10.0, PollutantBand::Excellent),
        (20.0, PollutantBand::Good),
        (30.0, PollutantBand::Moderate),
        (40.0, PollutantBand::Poor),
    ],
    otherwise: PollutantBand::VeryPoor,
    unknown: PollutantBand::Unknown,
};

/// PM2.5 guideline bands.
const PM25_BANDS: BandTable<PollutantBand> = BandTable {
    rule: TierRule::AtMost,
    tiers: &[
        (5.0, PollutantBand::Excellent),
        (10.0, PollutantBand::Good),
        (15.0, PollutantBand::Moderate),
        (25.0, PollutantBand::Poor),
    ],
    otherwise: PollutantBand::VeryPoor,
    unknown: PollutantBand::Unknown,
};

/// PM10 guideline bands.
const PM10_BANDS: BandTable<PollutantBand> = BandTable {
    rule: TierRule::AtMost,
    tiers: &[
        (15.0, PollutantBand::Excellent),
        (20.0, PollutantBand::Good),
        (30.0, PollutantBand::Moderate),
        (40.0, PollutantBand::Poor),
    ],
    otherwise: PollutantBand::VeryPoor,
    unknown: PollutantBand::Unknown,
};

/// Returns the guideline band table for a pollutant, or `None` for metrics
/// that are not pollutants.
#[must_use]
pub const fn pollutant_bands(metric: Metric) -> Option<&'static BandTable<PollutantBand>> {
    match metric {
        Metric::No2 => Some(&NO2_BANDS),
        Metric::Pm25 => Some(&PM25_BANDS),
        Metric::Pm10 => Some(&PM10_BANDS),
        Metric::NoiseLden | Metric::AccessDistance => None,
    }
}
