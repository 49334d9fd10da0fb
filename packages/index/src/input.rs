//! Domain input loading.
//!
//! Each domain arrives as a JSON array of district records. Beyond plain
//! deserialization the loader enforces the fatal input checks: the file
//! must exist, it must hold at least one record, and every required field
//! must have a value in at least one record.

use std::path::Path;

use env_health_index_models::{AirRecord, DistrictRecord, Domain, GreenspaceRecord, NoiseRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::IndexError;
use crate::aggregate::DomainInputs;
use crate::pipeline::InputPaths;

/// A required field: canonical name and accepted aliases.
pub type FieldSpec = (&'static str, &'static [&'static str]);

/// A district record type loadable as one domain's input.
pub trait DomainInput: DeserializeOwned + DistrictRecord {
    /// Domain the record belongs to.
    const DOMAIN: Domain;

    /// Fields that must carry a value in at least one record.
    const REQUIRED: &'static [FieldSpec];
}

impl DomainInput for AirRecord {
    const DOMAIN: Domain = Domain::Air;
    const REQUIRED: &'static [FieldSpec] = &[
        ("postcode_count", &[]),
        ("no2", &[]),
        ("pm10", &[]),
        ("pm25", &["pm2_5"]),
    ];
}

impl DomainInput for NoiseRecord {
    const DOMAIN: Domain = Domain::Noise;
    const REQUIRED: &'static [FieldSpec] = &[
        ("postcode_count", &[]),
        ("mean_lden_db", &["noise_mean_lden_db"]),
        ("mean_lnight_db", &["noise_mean_lnight_db"]),
    ];
}

impl DomainInput for GreenspaceRecord {
    const DOMAIN: Domain = Domain::Greenspace;
    const REQUIRED: &'static [FieldSpec] = &[
        ("postcode_count", &[]),
        ("total_area_m2", &["total_greenspace_m2"]),
        ("mean_distance_m", &["greenspace_mean_dist_m"]),
        ("p75_distance_m", &["greenspace_p75_dist_m"]),
    ];
}

/// Parses one domain's JSON document.
///
/// # Errors
///
/// * [`IndexError::Json`] if the document is not valid JSON
/// * [`IndexError::InvalidRecord`] if it is not an array of objects, or a
///   record fails to decode
/// * [`IndexError::EmptyDomain`] if the array is empty
/// * [`IndexError::MissingField`] if a required field has no value in any
///   record
pub fn parse_domain<R: DomainInput>(json: &str) -> Result<Vec<R>, IndexError> {
    let Value::Array(items) = serde_json::from_str::<Value>(json)? else {
        return Err(invalid::<R>("expected a JSON array of district records".to_string()));
    };

    if items.is_empty() {
        return Err(IndexError::EmptyDomain { domain: R::DOMAIN });
    }

    if let Some(i) = items.iter().position(|item| !item.is_object()) {
        return Err(invalid::<R>(format!("record {i} is not a JSON object")));
    }

    for (field, aliases) in R::REQUIRED {
        let present = items
            .iter()
            .any(|item| has_value(item, field) || aliases.iter().any(|a| has_value(item, a)));
        if !present {
            return Err(IndexError::MissingField {
                domain: R::DOMAIN,
                field: (*field).to_string(),
            });
        }
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| invalid::<R>(format!("record {i}: {e}")))
        })
        .collect()
}

/// Reads and parses one domain's input file.
///
/// # Errors
///
/// Returns [`IndexError::MissingInput`] if `path` does not exist, otherwise
/// any error from reading the file or [`parse_domain`].
pub fn load_domain<R: DomainInput>(path: &Path) -> Result<Vec<R>, IndexError> {
    if !path.exists() {
        return Err(IndexError::MissingInput {
            domain: R::DOMAIN,
            path: path.to_path_buf(),
        });
    }

    let json = std::fs::read_to_string(path)?;
    let records = parse_domain::<R>(&json)?;
    log::info!(
        "Loaded {} {} records from {}",
        records.len(),
        R::DOMAIN,
        path.display()
    );
    Ok(records)
}

/// Loads all three domain inputs.
///
/// # Errors
///
/// Returns the first error from [`load_domain`].
pub fn load_inputs(paths: &InputPaths) -> Result<DomainInputs, IndexError> {
    Ok(DomainInputs {
        air: load_domain(&paths.air)?,
        noise: load_domain(&paths.noise)?,
        greenspace: load_domain(&paths.greenspace)?,
    })
}

fn has_value(item: &Value, field: &str) -> bool {
    item.get(field).is_some_and(|v| !v.is_null())
}

fn invalid<R: DomainInput>(message: String) -> IndexError {
    IndexError::InvalidRecord {
        domain: R::DOMAIN,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_air_records() {
        let json = r#"[
            {"district": "B1", "postcode_count": 600, "no2": 15.0, "pm10": 18.0, "pm25": 8.0},
            {"district": "b2", "postcode_count": 90, "no2": null, "pm10": 17.5, "pm2_5": 7.9}
        ]"#;
        let records = parse_domain::<AirRecord>(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].district.as_str(), "B2");
        assert_eq!(records[1].no2, None);
        assert_eq!(records[1].pm25, Some(7.9));
    }

    #[test]
    fn empty_domain_is_fatal() {
        let err = parse_domain::<NoiseRecord>("[]").unwrap_err();
        assert!(matches!(err, IndexError::EmptyDomain { domain: Domain::Noise }), "got {err}");
    }

    #[test]
    fn field_null_in_every_record_is_fatal() {
        let json = r#"[
            {"district": "B1", "postcode_count": 10, "mean_lden_db": 55.0, "mean_lnight_db": null},
            {"district": "B2", "postcode_count": 12, "mean_lden_db": 57.0}
        ]"#;
        let err = parse_domain::<NoiseRecord>(json).unwrap_err();
        match err {
            IndexError::MissingField { domain, field } => {
                assert_eq!(domain, Domain::Noise);
                assert_eq!(field, "mean_lnight_db");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn alias_satisfies_required_field() {
        let json = r#"[{
            "district": "B5",
            "postcode_count": 200,
            "total_greenspace_m2": 5000.0,
            "greenspace_mean_dist_m": 150.0,
            "greenspace_p75_dist_m": 240.0
        }]"#;
        let records = parse_domain::<GreenspaceRecord>(json).unwrap();
        assert_eq!(records[0].p75_distance_m, Some(240.0));
    }

    #[test]
    fn bad_district_code_names_the_record() {
        let json = r#"[
            {"district": "B1", "postcode_count": 1, "no2": 1.0, "pm10": 1.0, "pm25": 1.0},
            {"district": "15B?", "postcode_count": 1, "no2": 1.0, "pm10": 1.0, "pm25": 1.0}
        ]"#;
        let err = parse_domain::<AirRecord>(json).unwrap_err();
        assert!(err.to_string().contains("record 1"), "got {err}");
    }

    #[test]
    fn non_array_document_is_rejected() {
        let err = parse_domain::<AirRecord>(r#"{"district": "B1"}"#).unwrap_err();
        assert!(matches!(err, IndexError::InvalidRecord { .. }), "got {err}");

        let err = parse_domain::<AirRecord>("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("record 0"), "got {err}");
    }

    #[test]
    fn missing_file_is_fatal() {
        let path = std::env::temp_dir().join("env_health_no_such_input.json");
        let err = load_domain::<GreenspaceRecord>(&path).unwrap_err();
        assert!(
            matches!(err, IndexError::MissingInput { domain: Domain::Greenspace, .. }),
            "got {err}"
        );
    }
}
