// src/pipeline/mod.rs
pub mod analyze;
pub mod clean;
pub mod filter;

pub use analyze::{analyze_records, AnalysisReport};
pub use clean::clean_records;
pub use filter::{filter_records, FieldCriteria, FilterSpec, FilterSpecError};
