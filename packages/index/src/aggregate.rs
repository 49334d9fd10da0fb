//! District aggregation.
//!
//! Outer-joins the three domain inputs by district. Every district that
//! appears in any domain gets exactly one entry; a domain with no record
//! for it contributes `None`.

use std::collections::{BTreeMap, BTreeSet};

use env_health_index_models::{
    AirRecord, DistrictCode, DistrictRecord, Domain, GreenspaceRecord, NoiseRecord,
};

/// The three domain inputs of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainInputs {
    /// Air records.
    pub air: Vec<AirRecord>,
    /// Noise records.
    pub noise: Vec<NoiseRecord>,
    /// Greenspace records.
    pub greenspace: Vec<GreenspaceRecord>,
}

/// One district's record from each domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistrictRecords<'a> {
    /// District.
    pub district: &'a DistrictCode,
    /// Air record, if any.
    pub air: Option<&'a AirRecord>,
    /// Noise record, if any.
    pub noise: Option<&'a NoiseRecord>,
    /// Greenspace record, if any.
    pub greenspace: Option<&'a GreenspaceRecord>,
}

impl DistrictRecords<'_> {
    /// Postcode count from the first domain (air, noise, greenspace) that
    /// reports one, else 0.
    #[must_use]
    pub fn postcode_count(&self) -> u64 {
        Domain::ALL
            .iter()
            .find_map(|domain| match domain {
                Domain::Air => self.air.and_then(DistrictRecord::postcode_count),
                Domain::Noise => self.noise.and_then(DistrictRecord::postcode_count),
                Domain::Greenspace => self.greenspace.and_then(DistrictRecord::postcode_count),
            })
            .unwrap_or(0)
    }
}

/// Indexes `records` by district.
///
/// A district listed twice keeps its last record; the duplicate is logged.
#[must_use]
pub fn index_by_district<R: DistrictRecord>(
    domain: Domain,
    records: &[R],
) -> BTreeMap<&DistrictCode, &R> {
    let mut indexed = BTreeMap::new();
    for record in records {
        if indexed.insert(record.district(), record).is_some() {
            log::warn!(
                "Duplicate {domain} record for {}, keeping the last one",
                record.district()
            );
        }
    }
    indexed
}

/// Outer-joins the domain inputs, returning one entry per district in
/// numeric-aware district order.
#[must_use]
pub fn align(inputs: &DomainInputs) -> Vec<DistrictRecords<'_>> {
    let air = index_by_district(Domain::Air, &inputs.air);
    let noise = index_by_district(Domain::Noise, &inputs.noise);
    let greenspace = index_by_district(Domain::Greenspace, &inputs.greenspace);

    let districts: BTreeSet<&DistrictCode> = air
        .keys()
        .chain(noise.keys())
        .chain(greenspace.keys())
        .copied()
        .collect();

    log::debug!(
        "Aligned {} districts ({} air, {} noise, {} greenspace)",
        districts.len(),
        air.len(),
        noise.len(),
        greenspace.len()
    );

    districts
        .into_iter()
        .map(|district| DistrictRecords {
            district,
            air: air.get(district).copied(),
            noise: noise.get(district).copied(),
            greenspace: greenspace.get(district).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> DistrictCode {
        DistrictCode::parse(s).unwrap()
    }

    fn air(district: &str, count: Option<u64>) -> AirRecord {
        AirRecord {
            district: code(district),
            postcode_count: count,
            no2: Some(20.0),
            pm10: None,
            pm25: None,
        }
    }

    fn noise(district: &str, count: Option<u64>) -> NoiseRecord {
        NoiseRecord {
            district: code(district),
            postcode_count: count,
            mean_lden_db: Some(55.0),
            mean_lnight_db: None,
            measured_count: None,
        }
    }

    fn greenspace(district: &str, count: Option<u64>) -> GreenspaceRecord {
        GreenspaceRecord {
            district: code(district),
            postcode_count: count,
            total_area_m2: None,
            mean_distance_m: None,
            p75_distance_m: None,
        }
    }

    #[test]
    fn union_of_all_domains_in_numeric_order() {
        let inputs = DomainInputs {
            air: vec![air("B10", Some(5)), air("B2", Some(5))],
            noise: vec![noise("B2", Some(5)), noise("B1", Some(5))],
            greenspace: vec![greenspace("B33", Some(5))],
        };
        let aligned = align(&inputs);
        let districts: Vec<&str> = aligned.iter().map(|d| d.district.as_str()).collect();
        assert_eq!(districts, ["B1", "B2", "B10", "B33"]);

        let b1 = &aligned[0];
        assert!(b1.air.is_none());
        assert!(b1.noise.is_some());
        assert!(b1.greenspace.is_none());

        let b2 = &aligned[1];
        assert!(b2.air.is_some() && b2.noise.is_some());
    }

    #[test]
    fn postcode_count_prefers_air_then_noise_then_greenspace() {
        let inputs = DomainInputs {
            air: vec![air("B1", None), air("B2", Some(600))],
            noise: vec![noise("B1", Some(140)), noise("B2", Some(30))],
            greenspace: vec![greenspace("B1", Some(7)), greenspace("B3", Some(9))],
        };
        let aligned = align(&inputs);
        assert_eq!(aligned[0].postcode_count(), 140);
        assert_eq!(aligned[1].postcode_count(), 600);
        assert_eq!(aligned[2].postcode_count(), 9);
    }

    #[test]
    fn reported_zero_count_is_kept() {
        let inputs = DomainInputs {
            air: vec![air("B1", Some(0))],
            noise: vec![noise("B1", Some(40))],
            greenspace: vec![],
        };
        assert_eq!(align(&inputs)[0].postcode_count(), 0);
    }

    #[test]
    fn no_count_anywhere_defaults_to_zero() {
        let inputs = DomainInputs {
            air: vec![],
            noise: vec![noise("B4", None)],
            greenspace: vec![greenspace("B4", None)],
        };
        assert_eq!(align(&inputs)[0].postcode_count(), 0);
    }

    #[test]
    fn duplicate_district_keeps_last_record() {
        let records = vec![air("B1", Some(1)), air("B1", Some(2))];
        let indexed = index_by_district(Domain::Air, &records);
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[&code("B1")].postcode_count, Some(2));
    }
}
