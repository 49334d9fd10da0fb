//! District summarization from per-postcode samples.
//!
//! The upstream spatial joins produce one CSV row per postcode with the
//! measurements already attached. This module groups those rows by postcode
//! district and reduces them to the district records that `build` consumes.
//!
//! Rows that fail to parse, or whose postcode yields no district, are
//! skipped with a warning. When a local authority is configured, rows from
//! any other authority (or with none) are dropped before grouping.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use env_health_index_models::{AirRecord, DistrictCode, Domain, GreenspaceRecord, NoiseRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::IndexError;
use crate::component::noise::{NOISE_FLOOR_DB, combined_level};
use crate::config::SamplesConfig;
use crate::risk::round_to;

/// Decimal places kept on district noise means.
const NOISE_DECIMALS: i32 = 2;

#[derive(Debug, Deserialize)]
struct AirSampleRow {
    postcode: String,
    #[serde(default)]
    grid_x: Option<f64>,
    #[serde(default)]
    grid_y: Option<f64>,
    #[serde(default)]
    no2: Option<f64>,
    #[serde(default)]
    pm10: Option<f64>,
    #[serde(default, alias = "pm2_5")]
    pm25: Option<f64>,
    #[serde(default)]
    local_authority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NoiseSampleRow {
    postcode: String,
    #[serde(default)]
    rail_lden: Option<f64>,
    #[serde(default)]
    road_lden: Option<f64>,
    #[serde(default)]
    rail_lnight: Option<f64>,
    #[serde(default)]
    road_lnight: Option<f64>,
    #[serde(default)]
    local_authority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessSampleRow {
    postcode: String,
    #[serde(default, alias = "greenspace_dist_m")]
    access_distance_m: Option<f64>,
    #[serde(default)]
    local_authority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SiteRow {
    district: String,
    #[serde(default)]
    area_m2: Option<f64>,
}

/// Fields every postcode sample row carries.
trait PostcodeRow: DeserializeOwned {
    fn postcode(&self) -> &str;
    fn local_authority(&self) -> Option<&str>;
}

macro_rules! postcode_row {
    ($($row:ty),+) => {
        $(impl PostcodeRow for $row {
            fn postcode(&self) -> &str {
                &self.postcode
            }

            fn local_authority(&self) -> Option<&str> {
                self.local_authority.as_deref()
            }
        })+
    };
}

postcode_row!(AirSampleRow, NoiseSampleRow, AccessSampleRow);

/// Running mean that ignores missing values.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Linear-interpolated quantile `q` of an ascending slice.
///
/// `None` for an empty slice.
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    #[allow(clippy::cast_precision_loss)]
    let position = q.clamp(0.0, 1.0) * last as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    #[allow(clippy::cast_precision_loss)]
    let fraction = position - lower as f64;
    Some((sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower]))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Reads postcode rows, resolving each to its district.
fn read_postcode_rows<T: PostcodeRow, R: Read>(
    domain: Domain,
    reader: R,
    config: &SamplesConfig,
) -> Result<Vec<(DistrictCode, T)>, IndexError> {
    let mut reader = csv_reader(reader);
    let mut rows = Vec::new();
    let mut skipped = 0_usize;
    let mut filtered = 0_usize;

    for (line, result) in reader.deserialize::<T>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping malformed {domain} sample row {}: {e}", line + 1);
                skipped += 1;
                continue;
            }
        };

        if let Some(wanted) = config.local_authority.as_deref()
            && row.local_authority() != Some(wanted)
        {
            filtered += 1;
            continue;
        }

        match DistrictCode::from_postcode(row.postcode()) {
            Ok(district) => rows.push((district, row)),
            Err(e) => {
                log::warn!("Skipping {domain} sample row {}: {e}", line + 1);
                skipped += 1;
            }
        }
    }

    log::info!(
        "Read {} {domain} sample rows ({skipped} skipped, {filtered} outside local authority)",
        rows.len()
    );

    if rows.is_empty() {
        return Err(IndexError::EmptyDomain { domain });
    }
    Ok(rows)
}

fn require_column<T>(
    domain: Domain,
    field: &str,
    rows: &[(DistrictCode, T)],
    value: impl Fn(&T) -> Option<f64>,
) -> Result<(), IndexError> {
    if rows.iter().any(|(_, row)| value(row).is_some()) {
        Ok(())
    } else {
        Err(IndexError::MissingField {
            domain,
            field: field.to_string(),
        })
    }
}

fn postcode_count(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Summarizes air samples into one record per district.
///
/// Postcodes sharing a background grid cell are averaged once per cell, so
/// densely populated cells do not dominate the district mean. A cell is
/// consumed per pollutant by the first postcode that has a value for it.
///
/// # Errors
///
/// * [`IndexError::Csv`] if the header row cannot be read
/// * [`IndexError::EmptyDomain`] if no usable rows remain
/// * [`IndexError::MissingField`] if a pollutant has no value in any row
pub fn summarize_air<R: Read>(
    reader: R,
    config: &SamplesConfig,
) -> Result<Vec<AirRecord>, IndexError> {
    #[derive(Default)]
    struct Pollutant {
        cells: BTreeSet<(u64, u64)>,
        mean: Mean,
    }

    impl Pollutant {
        fn add(&mut self, value: Option<f64>, cell: Option<(u64, u64)>) {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                return;
            };
            // Rows without grid coordinates each count as their own cell
            if cell.is_some_and(|c| !self.cells.insert(c)) {
                return;
            }
            self.mean.add(Some(value));
        }
    }

    #[derive(Default)]
    struct District {
        postcodes: usize,
        no2: Pollutant,
        pm10: Pollutant,
        pm25: Pollutant,
    }

    let rows = read_postcode_rows::<AirSampleRow, _>(Domain::Air, reader, config)?;
    require_column(Domain::Air, "no2", &rows, |r| r.no2)?;
    require_column(Domain::Air, "pm10", &rows, |r| r.pm10)?;
    require_column(Domain::Air, "pm25", &rows, |r| r.pm25)?;

    let mut districts: BTreeMap<DistrictCode, District> = BTreeMap::new();
    for (district, row) in rows {
        let entry = districts.entry(district).or_default();
        entry.postcodes += 1;

        let cell = row.grid_x.zip(row.grid_y).map(|(x, y)| (x.to_bits(), y.to_bits()));
        entry.no2.add(row.no2, cell);
        entry.pm10.add(row.pm10, cell);
        entry.pm25.add(row.pm25, cell);
    }

    Ok(districts
        .into_iter()
        .map(|(district, d)| AirRecord {
            district,
            postcode_count: Some(postcode_count(d.postcodes)),
            no2: d.no2.mean.value(),
            pm10: d.pm10.mean.value(),
            pm25: d.pm25.mean.value(),
        })
        .collect())
}

/// Summarizes noise samples into one record per district.
///
/// A postcode outside every mapped contour has no value for that source;
/// it is floored to 45 dB before the rail and road levels are averaged.
///
/// # Errors
///
/// * [`IndexError::Csv`] if the header row cannot be read
/// * [`IndexError::EmptyDomain`] if no usable rows remain
pub fn summarize_noise<R: Read>(
    reader: R,
    config: &SamplesConfig,
) -> Result<Vec<NoiseRecord>, IndexError> {
    #[derive(Default)]
    struct District {
        postcodes: usize,
        measured: usize,
        lden: Mean,
        lnight: Mean,
    }

    let rows = read_postcode_rows::<NoiseSampleRow, _>(Domain::Noise, reader, config)?;

    let mut districts: BTreeMap<DistrictCode, District> = BTreeMap::new();
    for (district, row) in rows {
        let entry = districts.entry(district).or_default();
        entry.postcodes += 1;

        // Lnight contours alone do not make a postcode measured
        let measured = [row.rail_lden, row.road_lden]
            .into_iter()
            .any(|v| v.is_some_and(f64::is_finite));
        if measured {
            entry.measured += 1;
        }

        entry.lden.add(Some(combined_level(row.rail_lden, row.road_lden)));
        entry.lnight.add(Some(combined_level(row.rail_lnight, row.road_lnight)));
    }

    let floor_only = districts.values().filter(|d| d.measured == 0).count();
    if floor_only > 0 {
        log::info!("{floor_only} districts have only floor-level ({NOISE_FLOOR_DB} dB) noise");
    }

    Ok(districts
        .into_iter()
        .map(|(district, d)| NoiseRecord {
            district,
            postcode_count: Some(postcode_count(d.postcodes)),
            mean_lden_db: d.lden.value().map(|v| round_to(v, NOISE_DECIMALS)),
            mean_lnight_db: d.lnight.value().map(|v| round_to(v, NOISE_DECIMALS)),
            measured_count: Some(postcode_count(d.measured)),
        })
        .collect())
}

/// Summarizes greenspace access samples and site areas into one record per
/// district.
///
/// Districts come from the postcode rows; sites assigned to a district
/// with no postcodes are ignored.
///
/// # Errors
///
/// * [`IndexError::Csv`] if either header row cannot be read
/// * [`IndexError::EmptyDomain`] if no usable postcode rows remain
/// * [`IndexError::MissingField`] if no row has an access distance
pub fn summarize_greenspace<P: Read, S: Read>(
    postcodes: P,
    sites: S,
    config: &SamplesConfig,
) -> Result<Vec<GreenspaceRecord>, IndexError> {
    #[derive(Default)]
    struct District {
        postcodes: usize,
        distances: Vec<f64>,
        area: Option<f64>,
    }

    let rows = read_postcode_rows::<AccessSampleRow, _>(Domain::Greenspace, postcodes, config)?;
    require_column(Domain::Greenspace, "access_distance_m", &rows, |r| {
        r.access_distance_m
    })?;

    let mut districts: BTreeMap<DistrictCode, District> = BTreeMap::new();
    for (district, row) in rows {
        let entry = districts.entry(district).or_default();
        entry.postcodes += 1;
        if let Some(distance) = row.access_distance_m.filter(|d| d.is_finite()) {
            entry.distances.push(distance);
        }
    }

    let mut unassigned = 0_usize;
    for (line, result) in csv_reader(sites).deserialize::<SiteRow>().enumerate() {
        let site = match result {
            Ok(site) => site,
            Err(e) => {
                log::warn!("Skipping malformed greenspace site row {}: {e}", line + 1);
                continue;
            }
        };
        let Some(area) = site.area_m2.filter(|a| a.is_finite()) else {
            continue;
        };

        let entry = match DistrictCode::parse(&site.district) {
            Ok(code) => districts.get_mut(&code),
            Err(_) => None,
        };
        match entry {
            Some(entry) => *entry.area.get_or_insert(0.0) += area,
            None => unassigned += 1,
        }
    }
    if unassigned > 0 {
        log::debug!("{unassigned} greenspace sites fell outside the sampled districts");
    }

    Ok(districts
        .into_iter()
        .map(|(district, mut d)| {
            d.distances.sort_by(f64::total_cmp);
            let mut mean = Mean::default();
            for distance in &d.distances {
                mean.add(Some(*distance));
            }

            GreenspaceRecord {
                district,
                postcode_count: Some(postcode_count(d.postcodes)),
                total_area_m2: d.area,
                mean_distance_m: mean.value(),
                p75_distance_m: quantile(&d.distances, 0.75),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rows() -> SamplesConfig {
        SamplesConfig::default()
    }

    #[test]
    fn quantile_interpolates_linearly() {
        assert_eq!(quantile(&[], 0.75), None);
        assert_eq!(quantile(&[42.0], 0.75), Some(42.0));
        // position 0.75 × 3 = 2.25 → 30 + 0.25 × 10
        assert_eq!(quantile(&[10.0, 20.0, 30.0, 40.0], 0.75), Some(32.5));
        assert_eq!(quantile(&[1.0, 2.0, 3.0], 1.0), Some(3.0));
        assert_eq!(quantile(&[1.0, 2.0, 3.0], 0.0), Some(1.0));
    }

    #[test]
    fn air_averages_distinct_grid_cells() {
        let csv = "\
postcode,grid_x,grid_y,no2,pm10,pm25
B1 1AA,406500,286500,10,16,6
B1 1AB,406500,286500,10,16,6
B1 1AC,407500,286500,20,20,10
B10 0AA,410500,285500,30,,12
";
        let records = summarize_air(csv.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records.len(), 2);

        let b1 = &records[0];
        assert_eq!(b1.district.as_str(), "B1");
        assert_eq!(b1.postcode_count, Some(3));
        assert_eq!(b1.no2, Some(15.0));
        assert_eq!(b1.pm10, Some(18.0));
        assert_eq!(b1.pm25, Some(8.0));

        let b10 = &records[1];
        assert_eq!(b10.postcode_count, Some(1));
        assert_eq!(b10.pm10, None);
    }

    #[test]
    fn air_cell_is_kept_for_a_pollutant_the_first_postcode_lacks() {
        let csv = "\
postcode,grid_x,grid_y,no2,pm10,pm25
B1 1AA,1,1,,16,6
B1 1AB,1,1,20,16,6
";
        let records = summarize_air(csv.as_bytes(), &all_rows()).unwrap();
        let b1 = &records[0];
        assert_eq!(b1.no2, Some(20.0));
        assert_eq!(b1.pm10, Some(16.0));
        assert_eq!(b1.pm25, Some(6.0));
        assert_eq!(b1.postcode_count, Some(2));
    }

    #[test]
    fn air_pollutant_missing_everywhere_is_fatal() {
        let csv = "postcode,grid_x,grid_y,no2,pm10\nB1 1AA,1,1,10,16\n";
        let err = summarize_air(csv.as_bytes(), &all_rows()).unwrap_err();
        match err {
            IndexError::MissingField { domain, field } => {
                assert_eq!(domain, Domain::Air);
                assert_eq!(field, "pm25");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn local_authority_filter_drops_other_rows() {
        let csv = "\
postcode,grid_x,grid_y,no2,pm10,pm25,local_authority
B1 1AA,1,1,10,16,6,E08000025
WS1 1AA,2,2,30,30,20,E08000030
B2 4QA,3,3,12,17,7,
";
        let config = SamplesConfig {
            local_authority: Some("E08000025".to_string()),
        };
        let records = summarize_air(csv.as_bytes(), &config).unwrap();
        let districts: Vec<&str> = records.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(districts, ["B1"]);
    }

    #[test]
    fn bad_postcodes_are_skipped() {
        let csv = "postcode,grid_x,grid_y,no2,pm10,pm25\n???,1,1,10,16,6\nB3 2AA,1,1,10,16,6\n";
        let records = summarize_air(csv.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].district.as_str(), "B3");
    }

    #[test]
    fn no_usable_rows_is_empty_domain() {
        let csv = "postcode,no2,pm10,pm25\n";
        let err = summarize_air(csv.as_bytes(), &all_rows()).unwrap_err();
        assert!(matches!(err, IndexError::EmptyDomain { domain: Domain::Air }), "got {err}");
    }

    #[test]
    fn noise_floors_missing_sources_and_counts_measured() {
        let csv = "\
postcode,rail_lden,road_lden,rail_lnight,road_lnight
B5 4AA,,65,,50
B5 4AB,,,,
B6 7AA,,,,
";
        let records = summarize_noise(csv.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records.len(), 2);

        let b5 = &records[0];
        // (45 + 65) / 2 = 55 for the first postcode, 45 for the second
        assert_eq!(b5.mean_lden_db, Some(50.0));
        assert_eq!(b5.mean_lnight_db, Some(46.25));
        assert_eq!(b5.postcode_count, Some(2));
        assert_eq!(b5.measured_count, Some(1));

        let b6 = &records[1];
        assert_eq!(b6.mean_lden_db, Some(45.0));
        assert_eq!(b6.measured_count, Some(0));
    }

    #[test]
    fn lnight_only_postcode_is_not_measured() {
        let csv = "\
postcode,rail_lden,road_lden,rail_lnight,road_lnight
B8 1AA,,,,52
B8 1AB,,,,
";
        let records = summarize_noise(csv.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records[0].measured_count, Some(0));
        assert_eq!(records[0].mean_lden_db, Some(45.0));
        assert_eq!(records[0].mean_lnight_db, Some(46.75));
    }

    #[test]
    fn noise_means_round_to_two_decimals() {
        let csv = "postcode,rail_lden,road_lden\nB7 1AA,60.111,60.111\nB7 1AB,60.112,60.112\nB7 1AC,60.113,60.113\n";
        let records = summarize_noise(csv.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records[0].mean_lden_db, Some(60.11));
    }

    #[test]
    fn greenspace_distances_and_site_area() {
        let postcodes = "\
postcode,access_distance_m
B15 2TT,100
B15 2TU,200
B15 2TW,300
B15 2TX,400
B16 8AA,
";
        let sites = "\
district,area_m2
B15,12000
b15,8000
B16,500
B99,1000
";
        let records =
            summarize_greenspace(postcodes.as_bytes(), sites.as_bytes(), &all_rows()).unwrap();
        assert_eq!(records.len(), 2);

        let b15 = &records[0];
        assert_eq!(b15.postcode_count, Some(4));
        assert_eq!(b15.mean_distance_m, Some(250.0));
        assert_eq!(b15.p75_distance_m, Some(325.0));
        assert_eq!(b15.total_area_m2, Some(20_000.0));

        let b16 = &records[1];
        assert_eq!(b16.postcode_count, Some(1));
        assert_eq!(b16.mean_distance_m, None);
        assert_eq!(b16.p75_distance_m, None);
        assert_eq!(b16.total_area_m2, Some(500.0));
    }

    #[test]
    fn greenspace_without_sites_has_unknown_area() {
        let postcodes = "postcode,access_distance_m\nB20 1AA,150\n";
        let records =
            summarize_greenspace(postcodes.as_bytes(), "district,area_m2\n".as_bytes(), &all_rows())
                .unwrap();
        assert_eq!(records[0].total_area_m2, None);
        assert_eq!(records[0].p75_distance_m, Some(150.0));
    }

    #[test]
    fn greenspace_without_any_distance_is_fatal() {
        let postcodes = "postcode,access_distance_m\nB20 1AA,\n";
        let err = summarize_greenspace(postcodes.as_bytes(), "district,area_m2\n".as_bytes(), &all_rows())
            .unwrap_err();
        assert!(matches!(err, IndexError::MissingField { .. }), "got {err}");
    }
}
