//! Aggregator Module
//! Grouped descriptive statistics over the loaded dataset. All functions are
//! pure: records in, smaller tables out.

use crate::data::PropertyRecord;
use rayon::prelude::*;
use statrs::statistics::{Data, Distribution, Max, Median, Min};
use std::collections::HashMap;

/// Zipcode the investment analysis benchmarks against.
pub const BENCHMARK_ZIPCODE: i32 = 98001;

/// Market-wide descriptive statistics of the sale price.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

fn grouped_mean<K, KeyFn, ValFn>(
    records: &[PropertyRecord],
    key_fn: KeyFn,
    val_fn: ValFn,
) -> HashMap<K, f64>
where
    K: std::hash::Hash + Eq,
    KeyFn: Fn(&PropertyRecord) -> K,
    ValFn: Fn(&PropertyRecord) -> f64,
{
    let mut sums: HashMap<K, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = sums.entry(key_fn(record)).or_insert((0.0, 0));
        entry.0 += val_fn(record);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Mean sale price per zipcode (linear space).
pub fn regional_mean_price(records: &[PropertyRecord]) -> HashMap<i32, f64> {
    grouped_mean(records, |r| r.zipcode, |r| r.price)
}

/// Mean of `log1p(price)` per zipcode. The buying-strategy comparison runs
/// in log space to reduce skew, then maps back with `expm1` for display.
pub fn regional_mean_log_price(records: &[PropertyRecord]) -> HashMap<i32, f64> {
    grouped_mean(records, |r| r.zipcode, |r| r.log_price())
}

/// Mean price per month for one year, sorted by month. Empty when the year
/// has no sales.
pub fn monthly_mean_price(records: &[PropertyRecord], year: i32) -> Vec<(u32, f64)> {
    let in_year: Vec<PropertyRecord> = records
        .iter()
        .filter(|r| r.year == year)
        .cloned()
        .collect();
    let mut months: Vec<(u32, f64)> = grouped_mean(&in_year, |r| r.month, |r| r.price)
        .into_iter()
        .collect();
    months.sort_by_key(|&(month, _)| month);
    months
}

/// Mean price per condition score, sorted by condition.
pub fn mean_price_by_condition(records: &[PropertyRecord]) -> Vec<(i64, f64)> {
    let mut rows: Vec<(i64, f64)> = grouped_mean(records, |r| r.condition, |r| r.price)
        .into_iter()
        .collect();
    rows.sort_by_key(|&(condition, _)| condition);
    rows
}

/// Mean price per construction grade, sorted by grade.
pub fn mean_price_by_grade(records: &[PropertyRecord]) -> Vec<(i64, f64)> {
    let mut rows: Vec<(i64, f64)> = grouped_mean(records, |r| r.grade, |r| r.price)
        .into_iter()
        .collect();
    rows.sort_by_key(|&(grade, _)| grade);
    rows
}

/// Years present in the dataset, ascending.
pub fn available_years(records: &[PropertyRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Per-zipcode, year-ordered percent change of the yearly mean price, as a
/// fraction (0.05 = +5%). The first observed year per zipcode has no previous
/// value and yields no entry, so it never drags down an average. Years whose
/// previous mean is non-positive are skipped the same way, keeping every
/// change value finite.
pub fn yearly_pct_change_by_zipcode(records: &[PropertyRecord]) -> HashMap<i32, Vec<(i32, f64)>> {
    let mut by_zipcode: HashMap<i32, Vec<&PropertyRecord>> = HashMap::new();
    for record in records {
        by_zipcode.entry(record.zipcode).or_default().push(record);
    }

    by_zipcode
        .into_par_iter()
        .map(|(zipcode, rows)| {
            let mut sums: HashMap<i32, (f64, usize)> = HashMap::new();
            for row in rows {
                let entry = sums.entry(row.year).or_insert((0.0, 0));
                entry.0 += row.price;
                entry.1 += 1;
            }
            let mut yearly: Vec<(i32, f64)> = sums
                .into_iter()
                .map(|(year, (sum, count))| (year, sum / count as f64))
                .collect();
            yearly.sort_by_key(|&(year, _)| year);

            // A non-positive previous mean has no meaningful relative change;
            // such pairs are skipped like the first observed year.
            let changes: Vec<(i32, f64)> = yearly
                .windows(2)
                .filter(|pair| pair[0].1 > 0.0)
                .map(|pair| (pair[1].0, (pair[1].1 - pair[0].1) / pair[0].1))
                .collect();
            (zipcode, changes)
        })
        .collect()
}

/// Mean yearly percent change per zipcode, descending. Zipcodes with a
/// single observed year have no change values and are excluded (the mean is
/// over available changes, never over all years).
pub fn mean_pct_change_ranking(records: &[PropertyRecord]) -> Vec<(i32, f64)> {
    let mut ranking: Vec<(i32, f64)> = yearly_pct_change_by_zipcode(records)
        .into_iter()
        .filter(|(_, changes)| !changes.is_empty())
        .map(|(zipcode, changes)| {
            let mean = changes.iter().map(|&(_, c)| c).sum::<f64>() / changes.len() as f64;
            (zipcode, mean)
        })
        .collect();
    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranking
}

/// Top `n` zipcodes by mean price, descending, with the benchmark zipcode
/// appended when it does not make the cut.
pub fn top_regions_with_benchmark(
    regional_means: &HashMap<i32, f64>,
    n: usize,
    benchmark: i32,
) -> Vec<(i32, f64)> {
    let mut regions: Vec<(i32, f64)> = regional_means
        .iter()
        .map(|(&zipcode, &mean)| (zipcode, mean))
        .collect();
    regions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    regions.truncate(n);

    if !regions.iter().any(|&(zipcode, _)| zipcode == benchmark) {
        if let Some(&mean) = regional_means.get(&benchmark) {
            regions.push((benchmark, mean));
        }
    }
    regions
}

/// Count/mean/median/std of the sale price over the whole dataset.
pub fn market_summary(records: &[PropertyRecord]) -> MarketSummary {
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let count = prices.len();
    if count == 0 {
        return MarketSummary {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        };
    }

    let data = Data::new(prices);
    MarketSummary {
        count,
        mean: data.mean().unwrap_or(f64::NAN),
        median: data.median(),
        std: data.std_dev().unwrap_or(f64::NAN),
        min: data.min(),
        max: data.max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::record;
    use chrono::NaiveDate;

    fn record_in_year(row: usize, price: f64, zipcode: i32, year: i32) -> crate::data::PropertyRecord {
        let mut r = record(row, price, zipcode);
        r.year = year;
        r.date = NaiveDate::from_ymd_opt(year, 6, 15).unwrap();
        r
    }

    #[test]
    fn regional_mean_matches_mean_over_rows_sharing_the_zipcode() {
        let records = vec![
            record(0, 100_000.0, 98001),
            record(1, 300_000.0, 98001),
            record(2, 500_000.0, 98002),
        ];
        let means = regional_mean_price(&records);
        assert_eq!(means[&98001], 200_000.0);
        assert_eq!(means[&98002], 500_000.0);
    }

    #[test]
    fn log_means_round_trip_through_expm1() {
        let records = vec![record(0, 250_000.0, 98001)];
        let means = regional_mean_log_price(&records);
        let back = means[&98001].exp_m1();
        assert!((back - 250_000.0).abs() < 1e-6);
    }

    #[test]
    fn first_year_per_zipcode_is_excluded_from_pct_change() {
        let records = vec![
            record_in_year(0, 100_000.0, 98001, 2014),
            record_in_year(1, 110_000.0, 98001, 2015),
            // Single-year zipcode: no change values at all.
            record_in_year(2, 900_000.0, 98039, 2014),
        ];

        let changes = yearly_pct_change_by_zipcode(&records);
        assert_eq!(changes[&98001], vec![(2015, 0.1)]);
        assert!(changes[&98039].is_empty());

        let ranking = mean_pct_change_ranking(&records);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].0, 98001);
        assert!((ranking[0].1 - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_price_previous_year_yields_no_change_value() {
        let records = vec![
            record_in_year(0, 0.0, 98001, 2014),
            record_in_year(1, 100_000.0, 98001, 2015),
            record_in_year(2, 150_000.0, 98001, 2016),
        ];

        let changes = yearly_pct_change_by_zipcode(&records);
        // 2014 -> 2015 is skipped (zero base); 2015 -> 2016 survives.
        assert_eq!(changes[&98001], vec![(2016, 0.5)]);
        assert!(changes[&98001].iter().all(|&(_, c)| c.is_finite()));

        let ranking = mean_pct_change_ranking(&records);
        assert!(ranking.iter().all(|&(_, mean)| mean.is_finite()));
    }

    #[test]
    fn monthly_means_cover_only_the_selected_year() {
        let mut january = record_in_year(0, 200_000.0, 98001, 2014);
        january.month = 1;
        let mut april = record_in_year(1, 400_000.0, 98001, 2014);
        april.month = 4;
        let other_year = record_in_year(2, 900_000.0, 98001, 2015);

        let months = monthly_mean_price(&[january, april, other_year], 2014);
        assert_eq!(months, vec![(1, 200_000.0), (4, 400_000.0)]);

        assert!(monthly_mean_price(&[], 2014).is_empty());
    }

    #[test]
    fn top_regions_always_include_the_benchmark() {
        let records = vec![
            record(0, 900_000.0, 98039),
            record(1, 800_000.0, 98004),
            record(2, 100_000.0, BENCHMARK_ZIPCODE),
        ];
        let means = regional_mean_price(&records);
        let top = top_regions_with_benchmark(&means, 2, BENCHMARK_ZIPCODE);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, 98039);
        assert_eq!(top.last().unwrap().0, BENCHMARK_ZIPCODE);
    }

    #[test]
    fn market_summary_reports_median_and_mean() {
        let records = vec![
            record(0, 100.0, 98001),
            record(1, 200.0, 98001),
            record(2, 600.0, 98002),
        ];
        let summary = market_summary(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.median, 200.0);
        assert!((summary.mean - 300.0).abs() < 1e-12);
        assert_eq!(summary.min, 100.0);
        assert_eq!(summary.max, 600.0);
    }
}
