//! Data module - CSV loading and the dataset cache

mod loader;

pub use loader::{load_dataset, Dataset, DatasetCache, LoaderError, PropertyRecord, DATE_FORMAT};

#[cfg(test)]
pub(crate) use loader::test_support;
