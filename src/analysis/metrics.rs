//! Metric Deriver Module
//! ROI, renovation price increments, and the fixed post-renovation snapshot.

use crate::data::PropertyRecord;
use std::collections::HashMap;

/// One row of the post-renovation snapshot: a literal capture of a prior
/// analysis run pairing each property's price with a hypothetical
/// post-renovation price. Preserved verbatim; never derived from the live
/// dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenovationSnapshotRow {
    pub row_index: usize,
    pub price: f64,
    pub post_renovation_price: f64,
    pub increment_condition: f64,
    pub increment_grade: f64,
}

pub const RENOVATION_SNAPSHOT: [RenovationSnapshotRow; 10] = [
    RenovationSnapshotRow {
        row_index: 3801,
        price: 7_062_500.0,
        post_renovation_price: 13_418_750.0,
        increment_condition: 1_412_500.0,
        increment_grade: 4_943_750.0,
    },
    RenovationSnapshotRow {
        row_index: 4280,
        price: 5_570_000.0,
        post_renovation_price: 11_697_000.0,
        increment_condition: 1_114_000.0,
        increment_grade: 5_013_000.0,
    },
    RenovationSnapshotRow {
        row_index: 1414,
        price: 5_350_000.0,
        post_renovation_price: 10_700_000.0,
        increment_condition: 1_070_000.0,
        increment_grade: 4_280_000.0,
    },
    RenovationSnapshotRow {
        row_index: 1139,
        price: 5_110_800.0,
        post_renovation_price: 10_221_600.0,
        increment_condition: 1_022_160.0,
        increment_grade: 4_088_640.0,
    },
    RenovationSnapshotRow {
        row_index: 7878,
        price: 4_668_000.0,
        post_renovation_price: 9_336_000.0,
        increment_condition: 933_600.0,
        increment_grade: 3_734_400.0,
    },
    RenovationSnapshotRow {
        row_index: 2556,
        price: 4_500_000.0,
        post_renovation_price: 9_000_000.0,
        increment_condition: 900_000.0,
        increment_grade: 3_600_000.0,
    },
    RenovationSnapshotRow {
        row_index: 8401,
        price: 4_489_000.0,
        post_renovation_price: 8_978_000.0,
        increment_condition: 897_800.0,
        increment_grade: 3_591_200.0,
    },
    RenovationSnapshotRow {
        row_index: 12031,
        price: 4_208_000.0,
        post_renovation_price: 8_416_000.0,
        increment_condition: 841_600.0,
        increment_grade: 3_366_400.0,
    },
    RenovationSnapshotRow {
        row_index: 6847,
        price: 3_800_000.0,
        post_renovation_price: 8_360_000.0,
        increment_condition: 1_140_000.0,
        increment_grade: 3_420_000.0,
    },
    RenovationSnapshotRow {
        row_index: 4025,
        price: 4_000_000.0,
        post_renovation_price: 8_000_000.0,
        increment_condition: 800_000.0,
        increment_grade: 3_200_000.0,
    },
];

/// Percentage gap between a property's price and its regional average,
/// relative to its price. A non-positive price has no defined ROI and yields
/// `None` (rendered "N/A"), never a division by zero.
pub fn roi_pct(price: f64, regional_mean: f64) -> Option<f64> {
    if price <= 0.0 {
        return None;
    }
    Some((regional_mean - price) / price * 100.0)
}

/// Percent uplift of a hypothetical post-renovation price over the current
/// price, guarded like [`roi_pct`].
pub fn uplift_pct(price: f64, post_renovation_price: f64) -> Option<f64> {
    if price <= 0.0 {
        return None;
    }
    Some((post_renovation_price - price) / price * 100.0)
}

/// Estimated price change from bringing a row up to its group's mean price,
/// for both the condition and the grade grouping. Negative increments are
/// valid (the row already beats its group) and are not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIncrement {
    pub row_index: usize,
    pub condition: i64,
    pub grade: i64,
    pub increment_condition: f64,
    pub increment_grade: f64,
}

/// Join each row against its own condition-mean and grade-mean, sorted by
/// (condition increment, grade increment) descending.
pub fn price_increments(
    records: &[PropertyRecord],
    condition_means: &HashMap<i64, f64>,
    grade_means: &HashMap<i64, f64>,
) -> Vec<PriceIncrement> {
    let mut increments: Vec<PriceIncrement> = records
        .iter()
        .filter_map(|record| {
            let condition_mean = *condition_means.get(&record.condition)?;
            let grade_mean = *grade_means.get(&record.grade)?;
            Some(PriceIncrement {
                row_index: record.row_index,
                condition: record.condition,
                grade: record.grade,
                increment_condition: condition_mean - record.price,
                increment_grade: grade_mean - record.price,
            })
        })
        .collect();

    increments.sort_by(|a, b| {
        b.increment_condition
            .partial_cmp(&a.increment_condition)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.increment_grade
                    .partial_cmp(&a.increment_grade)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    increments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;

    #[test]
    fn roi_for_price_100_and_mean_150_is_50_percent() {
        assert_eq!(roi_pct(100.0, 150.0), Some(50.0));
    }

    #[test]
    fn zero_price_yields_no_roi() {
        assert_eq!(roi_pct(0.0, 150.0), None);
        assert_eq!(uplift_pct(0.0, 150.0), None);
    }

    #[test]
    fn negative_increments_are_preserved() {
        let mut cheap = record(0, 100_000.0, 98001);
        cheap.condition = 3;
        cheap.grade = 7;
        let mut expensive = record(1, 500_000.0, 98001);
        expensive.condition = 3;
        expensive.grade = 7;

        let condition_means = HashMap::from([(3_i64, 300_000.0)]);
        let grade_means = HashMap::from([(7_i64, 300_000.0)]);
        let increments = price_increments(&[cheap, expensive], &condition_means, &grade_means);

        // Sorted descending: the cheap row gains, the expensive row loses.
        assert_eq!(increments[0].increment_condition, 200_000.0);
        assert_eq!(increments[1].increment_condition, -200_000.0);
        assert_eq!(increments[1].increment_grade, -200_000.0);
    }

    #[test]
    fn snapshot_uplift_matches_hand_computed_value() {
        let first = &RENOVATION_SNAPSHOT[0];
        let uplift = uplift_pct(first.price, first.post_renovation_price).unwrap();
        assert!((uplift - 90.0).abs() < 1e-9);
    }
}
