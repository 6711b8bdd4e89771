// src/crawler/types.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::ContactRecord;

/// How per-page extraction results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Merge every page of the site into one record.
    Profile,
    /// Emit one record per page visited.
    List,
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_pages: usize,
    pub follow_links: bool,
    pub respect_robots: bool,
    pub mode: CrawlMode,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: 5,
            follow_links: true,
            respect_robots: true,
            mode: CrawlMode::Profile,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub seed_url: String,
    pub mode: CrawlMode,
    pub records: Vec<ContactRecord>,
    pub pages_crawled: usize,
    /// Empty when no contact-style link was discovered.
    pub contact_page_url: String,
    pub crawl_duration_ms: u64,
}

/// Crawl-level failures. Anything past the seed fetch is a silent per-page
/// skip, never an error.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL: {0}")]
    InvalidUrl(String),
    #[error("robots.txt denies access to {0}")]
    PolicyDenied(String),
    #[error("seed fetch failed: {0}")]
    FetchExhausted(String),
}

/// A successfully fetched document.
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after any redirects.
    pub final_url: Url,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("blocked by robots.txt: {0}")]
    Forbidden(String),
    #[error("HTTP {status} from {url}")]
    Permanent { url: String, status: u16 },
    #[error("{url} failed after {attempts} attempts: {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        reason: String,
    },
}
