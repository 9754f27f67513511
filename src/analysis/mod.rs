//! Analysis module - aggregation, selection, and derived metrics

pub mod aggregator;
pub mod metrics;
pub mod report;
pub mod selector;

pub use aggregator::{MarketSummary, BENCHMARK_ZIPCODE};
pub use report::{AnalysisReport, RecommendedHouse, RenovationCandidate, RenovationUplift};
pub use selector::CandidateHouse;
