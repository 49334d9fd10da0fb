#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District environmental health index.
//!
//! Fuses three independently measured signals (air pollutant
//! concentrations, road/rail noise, and greenspace access) into one
//! 0–100 score per postcode district:
//!
//! 1. [`risk`] maps each raw measurement onto a `[0, 1]` risk by linear
//!    interpolation between a safe and an upper threshold.
//! 2. [`component`] turns those risks into per-domain scores and bands.
//! 3. [`confidence`] rates each district by its postcode count.
//! 4. [`aggregate`] outer-joins the three domains by district.
//! 5. [`fusion`] combines the present component scores, renormalizing the
//!    domain weights over whatever is present.
//! 6. [`sanitize`] and [`output`] guarantee the emitted document carries no
//!    invalid numbers and is never half-written.
//!
//! [`pipeline`] wires the stages together. [`samples`] builds the
//! district-level domain records from per-postcode samples.

pub mod aggregate;
pub mod band;
pub mod component;
pub mod confidence;
pub mod config;
pub mod fusion;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod risk;
pub mod samples;
pub mod sanitize;

use std::path::PathBuf;

use env_health_index_models::Domain;
use thiserror::Error;

pub use config::IndexConfig;
pub use pipeline::{InputPaths, build_index};

/// Errors that can abort an index run.
#[derive(Debug, Error)]
pub enum IndexError {
    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML config could not be parsed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A domain's input file does not exist.
    #[error("Missing {domain} input: {} does not exist", path.display())]
    MissingInput {
        /// Domain whose input is missing.
        domain: Domain,
        /// Expected location.
        path: PathBuf,
    },

    /// A domain's input contains no records at all.
    #[error("No {domain} records found in input")]
    EmptyDomain {
        /// Domain with no records.
        domain: Domain,
    },

    /// A required field has no value in any record of a domain.
    #[error("Field '{field}' is missing from every {domain} record")]
    MissingField {
        /// Domain being loaded.
        domain: Domain,
        /// Field name.
        field: String,
    },

    /// A record could not be decoded.
    #[error("Invalid {domain} record: {message}")]
    InvalidRecord {
        /// Domain being loaded.
        domain: Domain,
        /// Description of what went wrong.
        message: String,
    },

    /// The configuration is internally inconsistent.
    #[error("Invalid config: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
