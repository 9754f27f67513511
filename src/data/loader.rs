//! Dataset Loader Module
//! Loads the housing-sales CSV with Polars and parses it into typed records.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{info, warn};

/// Date format used by the dataset's `date` column.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Row {row}: missing date value")]
    MissingDate { row: usize },
    #[error("Row {row}: date {value:?} does not match DD-MM-YYYY")]
    BadDate { row: usize, value: String },
    #[error("Dataset contains no usable rows")]
    Empty,
}

/// One housing-sales row. `row_index` is the 0-based position in the source
/// file and is the stable join key for the curated snapshot lists.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub row_index: usize,
    pub price: f64,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
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

impl PropertyRecord {
    /// Skew-reduced price used by the buying-strategy comparison.
    pub fn log_price(&self) -> f64 {
        self.price.ln_1p()
    }
}

/// Immutable in-memory dataset for one pipeline run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub records: Vec<PropertyRecord>,
}

fn float_values(df: &DataFrame, name: &str) -> Result<Float64Chunked, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

fn int_values(df: &DataFrame, name: &str) -> Result<Int64Chunked, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    let casted = column.cast(&DataType::Int64)?;
    Ok(casted.i64()?.clone())
}

/// Load the housing CSV from disk. A missing file or a date that does not
/// match [`DATE_FORMAT`] is fatal; rows with missing numeric values are
/// skipped with a warning.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let path_str = path.to_string_lossy().to_string();

    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let date_column = df
        .column("date")
        .map_err(|_| LoaderError::MissingColumn("date".to_string()))?
        .cast(&DataType::String)?;
    let dates = date_column.as_materialized_series().str()?.clone();

    let price = float_values(&df, "price")?;
    let zipcode = int_values(&df, "zipcode")?;
    let bedrooms = int_values(&df, "bedrooms")?;
    let bathrooms = float_values(&df, "bathrooms")?;
    let condition = int_values(&df, "condition")?;
    let grade = int_values(&df, "grade")?;
    let view = int_values(&df, "view")?;
    let waterfront = int_values(&df, "waterfront")?;
    let lat = float_values(&df, "lat")?;
    let long = float_values(&df, "long")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(date_str) = dates.get(i) else {
            return Err(LoaderError::MissingDate { row: i });
        };
        let date =
            NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| LoaderError::BadDate {
                row: i,
                value: date_str.to_string(),
            })?;

        let (
            Some(price),
            Some(zipcode),
            Some(bedrooms),
            Some(bathrooms),
            Some(condition),
            Some(grade),
            Some(view),
            Some(waterfront),
            Some(lat),
            Some(long),
        ) = (
            price.get(i),
            zipcode.get(i),
            bedrooms.get(i),
            bathrooms.get(i),
            condition.get(i),
            grade.get(i),
            view.get(i),
            waterfront.get(i),
            lat.get(i),
            long.get(i),
        )
        else {
            warn!(row = i, "skipping row with missing values");
            continue;
        };

        records.push(PropertyRecord {
            row_index: i,
            price,
            date,
            year: date.year(),
            month: date.month(),
            zipcode: zipcode as i32,
            bedrooms,
            bathrooms,
            condition,
            grade,
            view,
            waterfront,
            lat,
            long,
        });
    }

    if records.is_empty() {
        return Err(LoaderError::Empty);
    }

    info!(rows = records.len(), path = %path.display(), "dataset loaded");

    Ok(Dataset {
        path: path.to_path_buf(),
        records,
    })
}

/// Memoizes loaded datasets keyed by path plus file modification time, so
/// UI-triggered re-runs skip re-reading the file. A changed mtime invalidates
/// the entry; `invalidate` drops it manually.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, (SystemTime, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache hit only: the memoized dataset for `path` when the file on disk
    /// still has the modification time it was loaded with.
    pub fn get_fresh(&self, path: &Path) -> Option<Arc<Dataset>> {
        let modified = fs::metadata(path).ok()?.modified().ok()?;
        let (cached_mtime, dataset) = self.entries.get(path)?;
        (*cached_mtime == modified).then(|| Arc::clone(dataset))
    }

    /// Get the cached dataset for `path`, loading it if absent or stale.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoaderError> {
        let modified = fs::metadata(path)?.modified()?;

        if let Some((cached_mtime, dataset)) = self.entries.get(path) {
            if *cached_mtime == modified {
                return Ok(Arc::clone(dataset));
            }
            info!(path = %path.display(), "dataset changed on disk, reloading");
        }

        let dataset = Arc::new(load_dataset(path)?);
        self.entries
            .insert(path.to_path_buf(), (modified, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Store a dataset that was loaded elsewhere (e.g. a background thread).
    pub fn insert(&mut self, path: PathBuf, modified: SystemTime, dataset: Arc<Dataset>) {
        self.entries.insert(path, (modified, dataset));
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a record with sane defaults for the fields a test does not vary.
    pub fn record(row_index: usize, price: f64, zipcode: i32) -> PropertyRecord {
        PropertyRecord {
            row_index,
            price,
            date: NaiveDate::from_ymd_opt(2014, 6, 15).unwrap(),
            year: 2014,
            month: 6,
            zipcode,
            bedrooms: 3,
            bathrooms: 2.0,
            condition: 3,
            grade: 7,
            view: 0,
            waterfront: 0,
            lat: 47.5,
            long: -122.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
price,date,zipcode,bedrooms,bathrooms,condition,grade,view,waterfront,lat,long
221900.0,13-10-2014,98178,3,1.0,3,7,0,0,47.5112,-122.257
538000.0,09-12-2014,98125,3,2.25,3,7,0,0,47.721,-122.319
180000.0,25-02-2015,98028,2,1.0,4,6,0,0,47.7379,-122.233
";

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "housescope_{}_{}.csv",
            name,
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_rows_and_derives_year_and_month() {
        let path = write_temp_csv("load", SAMPLE_CSV);
        let dataset = load_dataset(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(dataset.records.len(), 3);
        let first = &dataset.records[0];
        assert_eq!(first.row_index, 0);
        assert_eq!(first.year, 2014);
        assert_eq!(first.month, 10);
        assert_eq!(first.zipcode, 98178);
        assert_eq!(dataset.records[2].year, 2015);
    }

    #[test]
    fn bad_date_format_is_fatal() {
        let csv = SAMPLE_CSV.replace("13-10-2014", "2014-10-13");
        let path = write_temp_csv("bad_date", &csv);
        let result = load_dataset(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(LoaderError::BadDate { row: 0, .. })));
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = load_dataset(Path::new("/nonexistent/housescope.csv"));
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn cache_memoizes_unchanged_file_and_invalidates_manually() {
        let path = write_temp_csv("cache", SAMPLE_CSV);
        let mut cache = DatasetCache::new();

        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate(&path);
        let third = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(first.records.len(), third.records.len());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn log_price_round_trips_within_tolerance() {
        let record = test_support::record(0, 450_000.0, 98001);
        let back = record.log_price().exp_m1();
        assert!((back - record.price).abs() < 1e-6);
    }
}
