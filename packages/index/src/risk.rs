//! Risk normalization.
//!
//! Each metric has a `safe` threshold (risk 0) and an `upper` threshold
//! (risk 1). Risk is the linear interpolation between the two, clamped to
//! `[0, 1]`. Missing or NaN inputs stay unknown: they are never read as
//! zero risk.

/// A raw physical measurement with a threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Nitrogen dioxide annual mean (µg/m³).
    No2,
    /// PM2.5 annual mean (µg/m³).
    Pm25,
    /// PM10 annual mean (µg/m³).
    Pm10,
    /// Noise Lden, mean of rail and road (dB).
    NoiseLden,
    /// Blended distance to the nearest greenspace access point (m).
    AccessDistance,
}

/// Safe and upper thresholds for a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Value at or below which risk is 0 (WHO guideline for pollutants).
    pub safe: f64,
    /// Value at or above which risk is 1 (legal limit for pollutants).
    pub upper: f64,
}

impl Metric {
    /// Returns the threshold table entry for this metric.
    #[must_use]
    pub const fn thresholds(self) -> Thresholds {
        match self {
            Self::No2 => Thresholds {
                safe: 10.0,
                upper: 40.0,
            },
            Self::Pm25 => Thresholds {
                safe: 5.0,
                upper: 25.0,
            },
            Self::Pm10 => Thresholds {
                safe: 15.0,
                upper: 40.0,
            },
            Self::NoiseLden => Thresholds {
                safe: 45.0,
                upper: 80.0,
            },
            Self::AccessDistance => Thresholds {
                safe: 100.0,
                upper: 1000.0,
            },
        }
    }
}

/// Maps `value` onto `[0, 1]` for `metric`.
///
/// Returns `None` when the value is missing or NaN.
#[must_use]
pub fn risk(value: Option<f64>, metric: Metric) -> Option<f64> {
    let value = known(value)?;
    let Thresholds { safe, upper } = metric.thresholds();
    Some(((value - safe) / (upper - safe)).clamp(0.0, 1.0))
}

/// Converts a risk into a 0–100 score rounded to one decimal.
#[must_use]
pub fn score_from_risk(risk: Option<f64>) -> Option<f64> {
    known(risk).map(|r| round_to((100.0 * (1.0 - r)).clamp(0.0, 100.0), 1))
}

/// Filters out NaN so that it propagates as "unknown".
#[must_use]
pub fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Rounds half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Metric; 5] = [
        Metric::No2,
        Metric::Pm25,
        Metric::Pm10,
        Metric::NoiseLden,
        Metric::AccessDistance,
    ];

    #[test]
    fn thresholds_map_to_zero_and_one() {
        for metric in ALL {
            let Thresholds { safe, upper } = metric.thresholds();
            assert_eq!(risk(Some(safe), metric), Some(0.0), "{metric:?} at safe");
            assert_eq!(risk(Some(upper), metric), Some(1.0), "{metric:?} at upper");
        }
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(risk(Some(5.0), Metric::No2), Some(0.0));
        assert_eq!(risk(Some(100.0), Metric::No2), Some(1.0));
        assert_eq!(risk(Some(20.0), Metric::NoiseLden), Some(0.0));
        assert_eq!(risk(Some(5000.0), Metric::AccessDistance), Some(1.0));
    }

    #[test]
    fn interpolates_linearly() {
        let r = risk(Some(25.0), Metric::No2).unwrap();
        assert!((r - 0.5).abs() < 1e-12);

        let r = risk(Some(62.5), Metric::NoiseLden).unwrap();
        assert!((r - 0.5).abs() < 1e-12);

        let r = risk(Some(300.0), Metric::AccessDistance).unwrap();
        assert!((r - 200.0 / 900.0).abs() < 1e-12);
    }

    #[test]
    fn missing_and_nan_stay_unknown() {
        for metric in ALL {
            assert_eq!(risk(None, metric), None);
            assert_eq!(risk(Some(f64::NAN), metric), None);
        }
    }

    #[test]
    fn risk_is_monotone_in_value() {
        for metric in ALL {
            let mut previous = 0.0;
            for step in 0..200 {
                let value = f64::from(step) * 5.0;
                let r = risk(Some(value), metric).unwrap();
                assert!(r >= previous, "{metric:?} decreased at {value}");
                previous = r;
            }
        }
    }

    #[test]
    fn score_is_inverse_of_risk() {
        assert_eq!(score_from_risk(Some(0.0)), Some(100.0));
        assert_eq!(score_from_risk(Some(1.0)), Some(0.0));
        assert_eq!(score_from_risk(Some(0.149)), Some(85.1));
        assert_eq!(score_from_risk(None), None);
        assert_eq!(score_from_risk(Some(f64::NAN)), None);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_to(66.66666, 1) - 66.7).abs() < 1e-12);
        assert!((round_to(0.123_456, 4) - 0.1235).abs() < 1e-12);
        assert!((round_to(12.25, 1) - 12.3).abs() < 1e-12);
    }
}
