//! Noise component.
//!
//! Risk comes from the district's mean Lden alone. Bands are keyed on that
//! risk directly, unlike the score-keyed air and greenspace bands.

use env_health_index_models::{NoiseComponent, NoiseRecord};

use crate::band::NOISE_BANDS;
use crate::risk::{Metric, risk, score_from_risk};

use super::report_risk;

/// Level assumed where a postcode lies outside every mapped noise contour.
///
/// Equal to the Lden safe threshold, so "no measurable exposure" scores as
/// zero risk rather than as missing data.
pub const NOISE_FLOOR_DB: f64 = 45.0;

/// Mean of the rail and road levels at one postcode, flooring a missing
/// source to [`NOISE_FLOOR_DB`].
#[must_use]
pub fn combined_level(rail: Option<f64>, road: Option<f64>) -> f64 {
    let floor = |level: Option<f64>| level.filter(|l| !l.is_nan()).unwrap_or(NOISE_FLOOR_DB);
    f64::midpoint(floor(rail), floor(road))
}

/// Scores one district's noise record.
#[must_use]
pub fn score_noise(record: &NoiseRecord) -> NoiseComponent {
    let risk = risk(record.mean_lden_db, Metric::NoiseLden);

    NoiseComponent {
        score: score_from_risk(risk),
        band: NOISE_BANDS.classify(risk),
        risk: report_risk(risk),
        mean_lden_db: record.mean_lden_db,
        mean_lnight_db: record.mean_lnight_db,
    }
}

/// Whether the record's figures come entirely from the floor level, i.e.
/// none of its postcodes had a real sample.
#[must_use]
pub fn is_floor_only(record: &NoiseRecord) -> bool {
    record.measured_count == Some(0)
}

#[cfg(test)]
mod tests {
    use env_health_index_models::{DistrictCode, NoiseBand};

    use super::*;

    fn record(lden: Option<f64>) -> NoiseRecord {
        NoiseRecord {
            district: DistrictCode::parse("B5").unwrap(),
            postcode_count: Some(140),
            mean_lden_db: lden,
            mean_lnight_db: lden.map(|l| l - 8.0),
            measured_count: None,
        }
    }

    #[test]
    fn floors_missing_sources() {
        assert!((combined_level(None, None) - 45.0).abs() < f64::EPSILON);
        assert!((combined_level(Some(65.0), None) - 55.0).abs() < f64::EPSILON);
        assert!((combined_level(Some(60.0), Some(70.0)) - 65.0).abs() < f64::EPSILON);
        assert!((combined_level(Some(f64::NAN), Some(55.0)) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scores_from_lden() {
        let component = score_noise(&record(Some(62.5)));
        assert_eq!(component.risk, Some(0.5));
        assert_eq!(component.score, Some(50.0));
        assert_eq!(component.band, NoiseBand::Moderate);
    }

    #[test]
    fn floor_level_is_zero_risk() {
        let component = score_noise(&record(Some(NOISE_FLOOR_DB)));
        assert_eq!(component.risk, Some(0.0));
        assert_eq!(component.score, Some(100.0));
        assert_eq!(component.band, NoiseBand::VeryLow);
    }

    #[test]
    fn band_is_keyed_on_risk() {
        // Lden 52 → risk 0.2 → "Low", though the score is 80
        let component = score_noise(&record(Some(52.0)));
        assert_eq!(component.score, Some(80.0));
        assert_eq!(component.band, NoiseBand::Low);
    }

    #[test]
    fn missing_lden_is_unknown() {
        let component = score_noise(&record(None));
        assert_eq!(component.score, None);
        assert_eq!(component.risk, None);
        assert_eq!(component.band, NoiseBand::Unknown);
    }

    #[test]
    fn louder_never_scores_higher() {
        let mut previous = f64::INFINITY;
        for step in 0..50 {
            let score = score_noise(&record(Some(40.0 + f64::from(step))))
                .score
                .unwrap();
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn floor_only_detection() {
        let mut r = record(Some(45.0));
        assert!(!is_floor_only(&r));
        r.measured_count = Some(0);
        assert!(is_floor_only(&r));
        r.measured_count = Some(3);
        assert!(!is_floor_only(&r));
    }
}
