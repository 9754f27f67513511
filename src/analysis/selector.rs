//! Filter/Selector Module
//! Threshold predicates producing candidate-property subsets, plus the fixed
//! curated snapshot of row indices from the original analysis run.

use crate::data::PropertyRecord;
use std::collections::HashMap;
use tracing::warn;

/// Row indices of the 20 recommended houses. This is a verbatim snapshot of
/// one historical analysis run; it must never be re-derived from the live
/// predicate, which could select a different set on a resorted dataset.
pub const CURATED_ROW_INDICES: [usize; 20] = [
    8978, 9077, 7178, 16580, 18102, 434, 8846, 892, 19687, 1752, 1868, 11754, 2205, 8676, 3821,
    5598, 15579, 19367, 20631, 19757,
];

/// A candidate house with its regional mean joined on.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateHouse {
    pub row_index: usize,
    pub price: f64,
    pub avg_price_region: f64,
    pub zipcode: i32,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub condition: i64,
    pub grade: i64,
    pub view: i64,
    pub waterfront: i64,
    pub lat: f64,
    pub long: f64,
}

impl CandidateHouse {
    fn from_record(record: &PropertyRecord, avg_price_region: f64) -> Self {
        Self {
            row_index: record.row_index,
            price: record.price,
            avg_price_region,
            zipcode: record.zipcode,
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            condition: record.condition,
            grade: record.grade,
            view: record.view,
            waterfront: record.waterfront,
            lat: record.lat,
            long: record.long,
        }
    }
}

/// Buying-strategy predicate, evaluated in log space:
/// `log_price < regional log mean AND grade >= 7 AND condition >= 3 AND
/// bedrooms in {3,4} AND bathrooms >= 2`. Prices and regional means in the
/// result are mapped back to linear space with `expm1`, and rows are sorted
/// by (zipcode, price).
pub fn good_houses(
    records: &[PropertyRecord],
    regional_log_means: &HashMap<i32, f64>,
) -> Vec<CandidateHouse> {
    let mut houses: Vec<CandidateHouse> = records
        .iter()
        .filter_map(|record| {
            let log_mean = *regional_log_means.get(&record.zipcode)?;
            let below_avg = record.log_price() < log_mean;
            let keep = below_avg
                && record.grade >= 7
                && record.condition >= 3
                && (record.bedrooms == 3 || record.bedrooms == 4)
                && record.bathrooms >= 2.0;
            if !keep {
                return None;
            }
            let mut house = CandidateHouse::from_record(record, log_mean.exp_m1());
            house.price = record.log_price().exp_m1();
            Some(house)
        })
        .collect();

    houses.sort_by(|a, b| {
        a.zipcode.cmp(&b.zipcode).then(
            a.price
                .partial_cmp(&b.price)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    houses
}

/// Geographic candidates, evaluated on linear price:
/// `price < regional mean AND condition >= 3 AND grade >= 7`.
pub fn map_candidates(
    records: &[PropertyRecord],
    regional_means: &HashMap<i32, f64>,
) -> Vec<CandidateHouse> {
    records
        .iter()
        .filter_map(|record| {
            let mean = *regional_means.get(&record.zipcode)?;
            let keep = record.price < mean && record.condition >= 3 && record.grade >= 7;
            keep.then(|| CandidateHouse::from_record(record, mean))
        })
        .collect()
}

/// Narrow `houses` to the curated snapshot, preserving the snapshot order.
/// Indices absent from the loaded dataset are skipped with a warning (the
/// snapshot was taken against one specific file).
pub fn curated_selection(houses: &[CandidateHouse]) -> Vec<CandidateHouse> {
    let by_index: HashMap<usize, &CandidateHouse> =
        houses.iter().map(|h| (h.row_index, h)).collect();

    CURATED_ROW_INDICES
        .iter()
        .filter_map(|&row_index| {
            let house = by_index.get(&row_index);
            if house.is_none() {
                warn!(row_index, "curated row index not present in candidate set");
            }
            house.map(|&h| h.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::{regional_mean_log_price, regional_mean_price};
    use crate::data::test_support::record;
    use crate::data::PropertyRecord;

    fn candidate(row_index: usize, price: f64, zipcode: i32) -> CandidateHouse {
        CandidateHouse::from_record(&record(row_index, price, zipcode), price * 2.0)
    }

    /// Synthetic 5-row set where each row violates exactly one clause except
    /// row 0, which satisfies all five.
    fn predicate_fixture() -> Vec<PropertyRecord> {
        let mut rows = vec![
            record(0, 100_000.0, 98001), // passes everything
            record(1, 100_000.0, 98001),
            record(2, 100_000.0, 98001),
            record(3, 100_000.0, 98001),
            record(4, 900_000.0, 98001), // above the regional mean
        ];
        rows[1].grade = 6;
        rows[2].condition = 2;
        rows[3].bedrooms = 5;
        rows
    }

    #[test]
    fn predicate_selects_only_rows_satisfying_all_clauses() {
        let rows = predicate_fixture();
        let log_means = regional_mean_log_price(&rows);
        let selected = good_houses(&rows, &log_means);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].row_index, 0);
        // Log round trip brings the price back to linear space.
        assert!((selected[0].price - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn bathroom_clause_is_enforced() {
        let mut rows = predicate_fixture();
        rows[0].bathrooms = 1.5;
        let log_means = regional_mean_log_price(&rows);
        assert!(good_houses(&rows, &log_means).is_empty());
    }

    #[test]
    fn good_houses_are_sorted_by_zipcode_then_price() {
        let mut rows = vec![
            record(0, 150_000.0, 98002),
            record(1, 100_000.0, 98002),
            record(2, 100_000.0, 98001),
            record(3, 950_000.0, 98001),
            record(4, 950_000.0, 98002),
        ];
        // Keep the expensive rows out via the grade clause rather than price,
        // so both zipcodes retain two candidates each.
        rows[3].grade = 6;
        rows[4].grade = 6;
        rows.push(record(5, 300_000.0, 98001));

        let log_means = regional_mean_log_price(&rows);
        let selected = good_houses(&rows, &log_means);
        let order: Vec<(i32, usize)> = selected.iter().map(|h| (h.zipcode, h.row_index)).collect();
        assert_eq!(order, vec![(98001, 2), (98001, 5), (98002, 1), (98002, 0)]);
    }

    #[test]
    fn map_candidates_use_linear_price_and_relaxed_clauses() {
        let mut rows = vec![
            record(0, 100_000.0, 98001),
            record(1, 900_000.0, 98001),
        ];
        rows[0].bedrooms = 6; // bedroom count is irrelevant on the map
        let means = regional_mean_price(&rows);
        let candidates = map_candidates(&rows, &means);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].row_index, 0);
        assert_eq!(candidates[0].avg_price_region, 500_000.0);
    }

    #[test]
    fn curated_selection_preserves_snapshot_order_and_skips_missing() {
        let houses: Vec<CandidateHouse> = CURATED_ROW_INDICES
            .iter()
            .skip(1) // drop the first snapshot index to simulate a mismatch
            .map(|&idx| candidate(idx, 200_000.0, 98001))
            .collect();

        let curated = curated_selection(&houses);
        assert_eq!(curated.len(), CURATED_ROW_INDICES.len() - 1);
        let indices: Vec<usize> = curated.iter().map(|h| h.row_index).collect();
        assert_eq!(indices, CURATED_ROW_INDICES[1..].to_vec());
    }
}
