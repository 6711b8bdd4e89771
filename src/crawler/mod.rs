// src/crawler/mod.rs
pub mod extractor;
pub mod fetcher;
pub mod orchestrator;
pub mod rate_limit;
pub mod robots;
pub mod types;

pub use extractor::{domain_from_url, FieldExtractor};
pub use fetcher::Fetcher;
pub use orchestrator::Crawler;
pub use rate_limit::RateLimiter;
pub use robots::PolicyGate;
pub use types::{CrawlError, CrawlMode, CrawlOptions, CrawlOutcome, FetchError, FetchedPage};
