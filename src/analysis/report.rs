//! Analysis Report Module
//! One pure recompute step: dataset in, every derived table the tabs consume
//! out. UI interactions only filter these tables, they never re-aggregate.

use crate::analysis::aggregator::{
    self, MarketSummary, BENCHMARK_ZIPCODE,
};
use crate::analysis::metrics::{
    self, PriceIncrement, RenovationSnapshotRow, RENOVATION_SNAPSHOT,
};
use crate::analysis::selector::{self, CandidateHouse};
use crate::data::Dataset;
use std::collections::HashMap;
use tracing::info;

/// How many regions the price comparison chart shows before the benchmark
/// zipcode is force-included.
pub const TOP_REGION_COUNT: usize = 10;

/// How many rows the increment comparison chart shows.
pub const TOP_INCREMENT_COUNT: usize = 10;

/// A curated house with its derived ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedHouse {
    pub house: CandidateHouse,
    pub roi_pct: Option<f64>,
}

/// Snapshot row with its derived uplift percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct RenovationUplift {
    pub snapshot: RenovationSnapshotRow,
    pub uplift_pct: Option<f64>,
}

/// Renovation-potential row: a property's price next to the mean price of
/// its condition group.
#[derive(Debug, Clone, PartialEq)]
pub struct RenovationCandidate {
    pub row_index: usize,
    pub price: f64,
    pub condition_mean: f64,
    pub condition: i64,
    pub grade: i64,
}

/// Every derived table for the six tabs.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub market: MarketSummary,
    pub top_regions: Vec<(i32, f64)>,
    /// Mean yearly pct change per zipcode, descending (fractions).
    pub pct_change_ranking: Vec<(i32, f64)>,
    pub benchmark_pct_change: Option<f64>,
    pub recommended: Vec<RecommendedHouse>,
    pub years: Vec<i32>,
    pub monthly_by_year: HashMap<i32, Vec<(u32, f64)>>,
    pub condition_impact: Vec<(i64, f64)>,
    pub grade_impact: Vec<(i64, f64)>,
    pub top_increments: Vec<PriceIncrement>,
    pub renovation_candidates: Vec<RenovationCandidate>,
    pub renovation_uplifts: Vec<RenovationUplift>,
    pub map_candidates: Vec<CandidateHouse>,
}

impl AnalysisReport {
    pub fn compute(dataset: &Dataset) -> Self {
        let records = &dataset.records;

        let regional_means = aggregator::regional_mean_price(records);
        let regional_log_means = aggregator::regional_mean_log_price(records);

        let good = selector::good_houses(records, &regional_log_means);
        let recommended: Vec<RecommendedHouse> = selector::curated_selection(&good)
            .into_iter()
            .map(|house| {
                let roi_pct = metrics::roi_pct(house.price, house.avg_price_region);
                RecommendedHouse { house, roi_pct }
            })
            .collect();

        let pct_change_ranking = aggregator::mean_pct_change_ranking(records);
        let benchmark_pct_change = pct_change_ranking
            .iter()
            .find(|&&(zipcode, _)| zipcode == BENCHMARK_ZIPCODE)
            .map(|&(_, change)| change);

        let years = aggregator::available_years(records);
        let monthly_by_year: HashMap<i32, Vec<(u32, f64)>> = years
            .iter()
            .map(|&year| (year, aggregator::monthly_mean_price(records, year)))
            .collect();

        let condition_impact = aggregator::mean_price_by_condition(records);
        let grade_impact = aggregator::mean_price_by_grade(records);

        let condition_means: HashMap<i64, f64> = condition_impact.iter().copied().collect();
        let grade_means: HashMap<i64, f64> = grade_impact.iter().copied().collect();
        let mut top_increments = metrics::price_increments(records, &condition_means, &grade_means);
        top_increments.truncate(TOP_INCREMENT_COUNT);

        let mut renovation_candidates: Vec<RenovationCandidate> = records
            .iter()
            .filter_map(|record| {
                let condition_mean = *condition_means.get(&record.condition)?;
                Some(RenovationCandidate {
                    row_index: record.row_index,
                    price: record.price,
                    condition_mean,
                    condition: record.condition,
                    grade: record.grade,
                })
            })
            .collect();
        renovation_candidates.sort_by_key(|row| row.condition);

        let renovation_uplifts: Vec<RenovationUplift> = RENOVATION_SNAPSHOT
            .iter()
            .map(|&snapshot| RenovationUplift {
                snapshot,
                uplift_pct: metrics::uplift_pct(snapshot.price, snapshot.post_renovation_price),
            })
            .collect();

        let report = Self {
            market: aggregator::market_summary(records),
            top_regions: aggregator::top_regions_with_benchmark(
                &regional_means,
                TOP_REGION_COUNT,
                BENCHMARK_ZIPCODE,
            ),
            pct_change_ranking,
            benchmark_pct_change,
            recommended,
            years,
            monthly_by_year,
            condition_impact,
            grade_impact,
            top_increments,
            renovation_candidates,
            renovation_uplifts,
            map_candidates: selector::map_candidates(records, &regional_means),
        };

        info!(
            rows = records.len(),
            recommended = report.recommended.len(),
            map_candidates = report.map_candidates.len(),
            "analysis report recomputed"
        );
        report
    }

    /// Zipcodes appearing in the curated table, for the dropdown filter.
    pub fn recommended_zipcodes(&self) -> Vec<i32> {
        let mut zipcodes: Vec<i32> = self.recommended.iter().map(|r| r.house.zipcode).collect();
        zipcodes.sort_unstable();
        zipcodes.dedup();
        zipcodes
    }

    /// Largest ROI in the curated table, for the slider range.
    pub fn max_recommended_roi(&self) -> f64 {
        self.recommended
            .iter()
            .filter_map(|r| r.roi_pct)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;
    use crate::data::Dataset;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let mut records = vec![
            record(0, 100_000.0, 98001),
            record(1, 300_000.0, 98001),
            record(2, 500_000.0, 98002),
            record(3, 700_000.0, 98002),
        ];
        records[1].condition = 4;
        records[3].year = 2015;
        records[3].date = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();
        records[3].month = 3;
        Dataset {
            path: "test.csv".into(),
            records,
        }
    }

    #[test]
    fn report_assembles_consistent_tables() {
        let report = AnalysisReport::compute(&dataset());

        assert_eq!(report.market.count, 4);
        assert_eq!(report.years, vec![2014, 2015]);
        assert_eq!(report.monthly_by_year[&2015], vec![(3, 700_000.0)]);

        // None of the curated snapshot indices exist in this tiny dataset.
        assert!(report.recommended.is_empty());
        assert_eq!(report.max_recommended_roi(), 0.0);

        // Both conditions present, each with the mean of its own rows.
        assert_eq!(report.condition_impact.len(), 2);
        assert_eq!(report.condition_impact[0].0, 3);

        // Rows priced below their regional mean with condition >= 3.
        let map_rows: Vec<usize> = report
            .map_candidates
            .iter()
            .map(|c| c.row_index)
            .collect();
        assert_eq!(map_rows, vec![0, 2]);
    }

    #[test]
    fn renovation_candidates_are_sorted_by_condition() {
        let report = AnalysisReport::compute(&dataset());
        let conditions: Vec<i64> = report
            .renovation_candidates
            .iter()
            .map(|r| r.condition)
            .collect();
        let mut sorted = conditions.clone();
        sorted.sort_unstable();
        assert_eq!(conditions, sorted);
        assert_eq!(report.renovation_candidates.len(), 4);
    }

    #[test]
    fn uplift_table_comes_from_the_fixed_snapshot() {
        let report = AnalysisReport::compute(&dataset());
        assert_eq!(report.renovation_uplifts.len(), 10);
        let first = &report.renovation_uplifts[0];
        assert_eq!(first.snapshot.row_index, 3801);
        assert!((first.uplift_pct.unwrap() - 90.0).abs() < 1e-9);
    }
}
