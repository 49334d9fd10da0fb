//! Air quality component.
//!
//! Each pollutant is normalized on its own threshold table, then the risks
//! are combined as a weighted mean over only the pollutants that have a
//! value. A district with no pollutant values has unknown air risk.

use env_health_index_models::{AirComponent, AirRecord, PollutantBand};

use crate::band::{AIR_BANDS, pollutant_bands};
use crate::config::PollutantWeights;
use crate::fusion::weighted_mean;
use crate::risk::{Metric, risk, score_from_risk};

use super::report_risk;

/// Weighted multi-pollutant risk for one district.
#[must_use]
pub fn air_risk(record: &AirRecord, weights: &PollutantWeights) -> Option<f64> {
    weighted_mean([
        (weights.no2, risk(record.no2, Metric::No2)),
        (weights.pm10, risk(record.pm10, Metric::Pm10)),
        (weights.pm25, risk(record.pm25, Metric::Pm25)),
    ])
}

/// Scores one district's air record.
#[must_use]
pub fn score_air(record: &AirRecord, weights: &PollutantWeights) -> AirComponent {
    let risk = air_risk(record, weights);
    let score = score_from_risk(risk);

    AirComponent {
        score,
        band: AIR_BANDS.classify(score),
        risk: report_risk(risk),
        no2_ug_m3: record.no2,
        pm10_ug_m3: record.pm10,
        pm25_ug_m3: record.pm25,
        no2_band: pollutant_band(record.no2, Metric::No2),
        pm10_band: pollutant_band(record.pm10, Metric::Pm10),
        pm25_band: pollutant_band(record.pm25, Metric::Pm25),
    }
}

fn pollutant_band(value: Option<f64>, metric: Metric) -> PollutantBand {
    pollutant_bands(metric).map_or(PollutantBand::Unknown, |table| table.classify(value))
}
