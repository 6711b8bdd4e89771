// src/lib.rs
pub mod config;
pub mod crawler;
pub mod models;
pub mod pipeline;

pub use config::{Config, ScrapingConfig};
pub use crawler::{CrawlError, CrawlMode, CrawlOptions, CrawlOutcome, Crawler};
pub use models::ContactRecord;
pub use pipeline::{
    analyze_records, clean_records, filter_records, AnalysisReport, FilterSpec,
};
