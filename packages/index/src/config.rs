//! Index configuration.
//!
//! Defaults live in `config/default.toml` and are baked into the binary at
//! compile time via [`include_str!`]. A user file only needs the keys it
//! wants to change; it is deep-merged over the defaults before
//! deserialization, then validated.

use std::path::Path;

use env_health_index_models::Domain;
use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Default configuration, embedded at compile time.
const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Tolerance when checking that a set of shares sums to one.
const SUM_TOLERANCE: f64 = 1e-9;

/// Complete configuration for one index run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Domain weights for the overall score.
    pub fusion: DomainWeights,
    /// Pollutant weights for the air component.
    pub air: PollutantWeights,
    /// Greenspace blending shares.
    pub greenspace: GreenspaceConfig,
    /// Noise fusion policy.
    pub noise: NoiseConfig,
    /// Postcode sample summarization.
    #[serde(default)]
    pub samples: SamplesConfig,
    /// Output document formatting.
    pub output: OutputConfig,
}

/// Health-impact weight of each domain in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainWeights {
    /// Air quality weight.
    pub air: f64,
    /// Noise weight.
    pub noise: f64,
    /// Greenspace weight.
    pub greenspace: f64,
}

impl DomainWeights {
    /// Returns the weight configured for `domain`.
    #[must_use]
    pub const fn weight(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Air => self.air,
            Domain::Noise => self.noise,
            Domain::Greenspace => self.greenspace,
        }
    }
}

/// Weight of each pollutant in the composite air risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantWeights {
    /// Nitrogen dioxide.
    pub no2: f64,
    /// Coarse particulate matter.
    pub pm10: f64,
    /// Fine particulate matter.
    pub pm25: f64,
}

/// Blending shares for the greenspace component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreenspaceConfig {
    /// Share of the mean access distance in the blended distance.
    pub mean_distance_share: f64,
    /// Share of the 75th percentile access distance in the blended distance.
    pub p75_distance_share: f64,
    /// Share of access risk in the combined risk.
    pub access_share: f64,
    /// Share of capacity risk in the combined risk.
    pub capacity_share: f64,
}

/// Noise fusion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Whether a noise score built only from the 45 dB floor counts as
    /// present for fusion.
    pub floor_counts_as_present: bool,
}

/// Postcode sample summarization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesConfig {
    /// Local authority code to keep. `None` keeps every row.
    #[serde(default)]
    pub local_authority: Option<String>,
}

/// Output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON document.
    pub pretty: bool,
}

impl IndexConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the embedded defaults fail to parse or
    /// validate.
    pub fn embedded() -> Result<Self, IndexError> {
        Self::from_overrides("")
    }

    /// Loads the defaults, overlaid with the file at `path` when given.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the file cannot be read or parsed, or if
    /// the merged configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, IndexError> {
        let Some(path) = path else {
            return Self::embedded();
        };

        log::info!("Loading config overrides from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_overrides(&contents)
    }

    /// Parses `overrides` as TOML and deep-merges it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if either document fails to parse or the
    /// merged configuration is invalid.
    pub fn from_overrides(overrides: &str) -> Result<Self, IndexError> {
        let mut merged: toml::Table = toml::from_str(DEFAULT_TOML)?;
        let overrides: toml::Table = toml::from_str(overrides)?;
        merge_tables(&mut merged, overrides);

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks weight and share invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<(), IndexError> {
        let fusion = [
            ("fusion.air", self.fusion.air),
            ("fusion.noise", self.fusion.noise),
            ("fusion.greenspace", self.fusion.greenspace),
        ];
        check_non_negative(&fusion)?;
        check_sums_to_one("fusion", &fusion)?;

        let air = [
            ("air.no2", self.air.no2),
            ("air.pm10", self.air.pm10),
            ("air.pm25", self.air.pm25),
        ];
        for (name, value) in air {
            if !(value.is_finite() && value > 0.0) {
                return Err(config_error(format!("{name} must be positive, got {value}")));
            }
        }

        let distance = [
            ("greenspace.mean_distance_share", self.greenspace.mean_distance_share),
            ("greenspace.p75_distance_share", self.greenspace.p75_distance_share),
        ];
        check_non_negative(&distance)?;
        check_sums_to_one("greenspace distance shares", &distance)?;

        let risk = [
            ("greenspace.access_share", self.greenspace.access_share),
            ("greenspace.capacity_share", self.greenspace.capacity_share),
        ];
        check_non_negative(&risk)?;
        check_sums_to_one("greenspace risk shares", &risk)?;

        Ok(())
    }
}

/// Recursively overlays `overrides` onto `base`. Nested tables merge;
/// every other value replaces.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, toml::Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn check_non_negative(values: &[(&str, f64)]) -> Result<(), IndexError> {
    for (name, value) in values {
        if !(value.is_finite() && *value >= 0.0) {
            return Err(config_error(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

fn check_sums_to_one(group: &str, values: &[(&str, f64)]) -> Result<(), IndexError> {
    let sum: f64 = values.iter().map(|(_, v)| v).sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(config_error(format!("{group} must sum to 1.0, got {sum}")));
    }
    Ok(())
}

fn config_error(message: String) -> IndexError {
    IndexError::Config { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_published_weights() {
        let config = IndexConfig::embedded().unwrap();
        assert!((config.fusion.air - 0.4).abs() < f64::EPSILON);
        assert!((config.fusion.noise - 0.3).abs() < f64::EPSILON);
        assert!((config.fusion.greenspace - 0.3).abs() < f64::EPSILON);
        assert!((config.air.pm25 - 0.5).abs() < f64::EPSILON);
        assert!((config.greenspace.p75_distance_share - 0.6).abs() < f64::EPSILON);
        assert!(config.noise.floor_counts_as_present);
        assert_eq!(config.samples.local_authority, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let config = IndexConfig::from_overrides(
            "[noise]\nfloor_counts_as_present = false\n\n[samples]\nlocal_authority = \"E08000025\"\n",
        )
        .unwrap();
        assert!(!config.noise.floor_counts_as_present);
        assert_eq!(config.samples.local_authority.as_deref(), Some("E08000025"));
        // Untouched sections keep their defaults
        assert!((config.fusion.air - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_table_override_keeps_sibling_keys() {
        let config = IndexConfig::from_overrides(
            "[fusion]\nair = 0.5\nnoise = 0.2\n",
        )
        .unwrap();
        assert!((config.fusion.air - 0.5).abs() < f64::EPSILON);
        assert!((config.fusion.greenspace - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_fusion_weights_not_summing_to_one() {
        let err = IndexConfig::from_overrides("[fusion]\nair = 0.9\n").unwrap_err();
        assert!(matches!(err, IndexError::Config { .. }), "got {err}");
    }

    #[test]
    fn rejects_negative_weight() {
        let err = IndexConfig::from_overrides("[fusion]\nair = 1.2\nnoise = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("fusion.noise"), "got {err}");
    }

    #[test]
    fn rejects_zero_pollutant_weight() {
        let err = IndexConfig::from_overrides("[air]\npm10 = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("air.pm10"), "got {err}");
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = IndexConfig::from_overrides("[fusion\nair = ").unwrap_err();
        assert!(matches!(err, IndexError::Toml(_)), "got {err}");
    }

    #[test]
    fn domain_weight_lookup() {
        let config = IndexConfig::embedded().unwrap();
        let total: f64 = Domain::ALL.iter().map(|d| config.fusion.weight(*d)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
