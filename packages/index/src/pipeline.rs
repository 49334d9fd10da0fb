//! End-to-end index build.
//!
//! Two passes over the aligned districts: the first ranks greenspace
//! capacity across the whole city, the second scores and fuses each
//! district independently against those read-only ranks.

use std::path::{Path, PathBuf};

use env_health_index_models::{Components, Domain, FusedIndex};

use crate::IndexError;
use crate::aggregate::{DistrictRecords, DomainInputs, align};
use crate::component::noise::is_floor_only;
use crate::component::{CapacityRanks, score_air, score_greenspace, score_noise};
use crate::confidence::confidence;
use crate::config::IndexConfig;
use crate::fusion::{fuse, overall_band};
use crate::input::load_inputs;
use crate::output::write_json;
use crate::sanitize::Sanitize as _;

/// Locations of the three domain input documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    /// Air records.
    pub air: PathBuf,
    /// Noise records.
    pub noise: PathBuf,
    /// Greenspace records.
    pub greenspace: PathBuf,
}

/// Scores and fuses every district in `inputs`.
///
/// The result is sorted by district and sanitized, ready to serialize.
#[must_use]
pub fn build_index(inputs: &DomainInputs, config: &IndexConfig) -> Vec<FusedIndex> {
    let districts = align(inputs);

    // Ranked over the deduplicated records so a repeated district holds one rank
    let greenspace: Vec<_> = districts.iter().filter_map(|d| d.greenspace).collect();
    let ranks = CapacityRanks::from_records(greenspace.iter().copied());
    log::info!(
        "Ranked greenspace capacity for {} of {} districts",
        ranks.len(),
        greenspace.len()
    );

    let mut fused: Vec<FusedIndex> = districts
        .iter()
        .map(|records| fuse_district(records, &ranks, config))
        .collect();
    fused.sanitize();

    let scored = fused.iter().filter(|f| f.score_overall.is_some()).count();
    log::info!(
        "Fused {} districts ({scored} with an overall score)",
        fused.len()
    );

    fused
}

fn fuse_district(
    records: &DistrictRecords<'_>,
    ranks: &CapacityRanks,
    config: &IndexConfig,
) -> FusedIndex {
    let air = records.air.map(|r| score_air(r, &config.air));
    let noise = records.noise.map(score_noise);
    let greenspace = records
        .greenspace
        .map(|r| score_greenspace(r, ranks, &config.greenspace));

    let noise_counts = config.noise.floor_counts_as_present
        || !records.noise.is_some_and(is_floor_only);
    if !noise_counts {
        log::debug!(
            "{}: noise is floor-only, leaving it out of the overall score",
            records.district
        );
    }

    let score_overall = fuse(
        &config.fusion,
        &[
            (Domain::Air, air.as_ref().and_then(|c| c.score)),
            (
                Domain::Noise,
                noise.as_ref().and_then(|c| c.score).filter(|_| noise_counts),
            ),
            (Domain::Greenspace, greenspace.as_ref().and_then(|c| c.score)),
        ],
    );

    let postcode_count = records.postcode_count();
    log::debug!(
        "{}: overall {score_overall:?} from {postcode_count} postcodes",
        records.district
    );

    FusedIndex {
        district: records.district.clone(),
        postcode_count,
        confidence: confidence(postcode_count),
        score_overall,
        score_band: overall_band(score_overall),
        components: Components {
            air,
            noise,
            greenspace,
        },
    }
}

/// Loads the inputs, builds the index, and writes it to `output`.
///
/// # Errors
///
/// Returns [`IndexError`] if any input fails to load or the document
/// cannot be written. Nothing is written on failure.
pub fn run(
    paths: &InputPaths,
    output: &Path,
    config: &IndexConfig,
) -> Result<Vec<FusedIndex>, IndexError> {
    let inputs = load_inputs(paths)?;
    let fused = build_index(&inputs, config);
    write_json(output, &fused, config.output.pretty)?;
    Ok(fused)
}
