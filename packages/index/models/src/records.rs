//! District-level domain records, as handed over by the upstream spatial
//! aggregation steps (or produced by `env_health summarize`).
//!
//! Every numeric field is optional: `null` in the input document means the
//! value is missing for that district. Field aliases accept the names the
//! upstream scripts emit.

use serde::{Deserialize, Serialize};

use crate::district::DistrictCode;

/// Annual-mean pollutant concentrations for one district (µg/m³).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirRecord {
    /// Postcode district.
    pub district: DistrictCode,
    /// Number of postcodes backing the means.
    #[serde(default)]
    pub postcode_count: Option<u64>,
    /// Nitrogen dioxide.
    #[serde(default)]
    pub no2: Option<f64>,
    /// Coarse particulate matter.
    #[serde(default)]
    pub pm10: Option<f64>,
    /// Fine particulate matter.
    #[serde(default, alias = "pm2_5")]
    pub pm25: Option<f64>,
}

/// Mean environmental noise levels for one district (dB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseRecord {
    /// Postcode district.
    pub district: DistrictCode,
    /// Number of postcodes backing the means.
    #[serde(default)]
    pub postcode_count: Option<u64>,
    /// Day-evening-night level, mean of rail and road.
    #[serde(default, alias = "noise_mean_lden_db")]
    pub mean_lden_db: Option<f64>,
    /// Night level, mean of rail and road.
    #[serde(default, alias = "noise_mean_lnight_db")]
    pub mean_lnight_db: Option<f64>,
    /// Postcodes that had at least one real (non-floor) Lden sample.
    ///
    /// `None` when the producer did not track it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_count: Option<u64>,
}

/// Greenspace access and capacity figures for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenspaceRecord {
    /// Postcode district.
    pub district: DistrictCode,
    /// Number of postcodes backing the figures.
    #[serde(default)]
    pub postcode_count: Option<u64>,
    /// Total area of greenspace sites assigned to the district (m²).
    #[serde(default, alias = "total_greenspace_m2")]
    pub total_area_m2: Option<f64>,
    /// Mean distance from a postcode to its nearest access point (m).
    #[serde(default, alias = "greenspace_mean_dist_m")]
    pub mean_distance_m: Option<f64>,
    /// 75th percentile of the same distances (m).
    #[serde(default, alias = "greenspace_p75_dist_m")]
    pub p75_distance_m: Option<f64>,
}

impl GreenspaceRecord {
    /// Greenspace area per postcode, the capacity measure ranked across
    /// districts.
    ///
    /// `None` when the area or postcode count is missing, or the count is
    /// zero.
    #[must_use]
    pub fn area_per_postcode(&self) -> Option<f64> {
        let area = self.total_area_m2.filter(|a| !a.is_nan())?;
        let count = self.postcode_count.filter(|&c| c > 0)?;
        #[allow(clippy::cast_precision_loss)]
        let count = count as f64;
        Some(area / count)
    }
}

/// Common access to the fields every domain record carries.
pub trait DistrictRecord {
    /// The record's district.
    fn district(&self) -> &DistrictCode;

    /// The record's postcode count, if reported.
    fn postcode_count(&self) -> Option<u64>;
}

impl DistrictRecord for AirRecord {
    fn district(&self) -> &DistrictCode {
        &self.district
    }

    fn postcode_count(&self) -> Option<u64> {
        self.postcode_count
    }
}

impl DistrictRecord for NoiseRecord {
    fn district(&self) -> &DistrictCode {
        &self.district
    }

    fn postcode_count(&self) -> Option<u64> {
        self.postcode_count
    }
}

impl DistrictRecord for GreenspaceRecord {
    fn district(&self) -> &DistrictCode {
        &self.district
    }

    fn postcode_count(&self) -> Option<u64> {
        self.postcode_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_upstream_field_names() {
        let json = r#"{
            "district": "B15",
            "postcode_count": 812,
            "noise_mean_lden_db": 58.31,
            "noise_mean_lnight_db": null
        }"#;
        let record: NoiseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.district.as_str(), "B15");
        assert_eq!(record.mean_lden_db, Some(58.31));
        assert_eq!(record.mean_lnight_db, None);
        assert_eq!(record.measured_count, None);
    }

    #[test]
    fn missing_fields_default_to_none() {
        let record: AirRecord = serde_json::from_str(r#"{"district": "B1"}"#).unwrap();
        assert_eq!(record.postcode_count, None);
        assert_eq!(record.no2, None);
    }

    #[test]
    fn area_per_postcode_needs_positive_count() {
        let mut record = GreenspaceRecord {
            district: DistrictCode::parse("B2").unwrap(),
            postcode_count: Some(200),
            total_area_m2: Some(50_000.0),
            mean_distance_m: None,
            p75_distance_m: None,
        };
        assert_eq!(record.area_per_postcode(), Some(250.0));

        record.postcode_count = Some(0);
        assert_eq!(record.area_per_postcode(), None);

        record.postcode_count = Some(10);
        record.total_area_m2 = None;
        assert_eq!(record.area_per_postcode(), None);
    }
}
