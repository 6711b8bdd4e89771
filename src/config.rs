// src/config.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub scraping: ScrapingConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    /// Minimum spacing between requests to the same host. 0 disables pacing.
    pub rate_limit_delay_ms: u64,
    /// Total attempts per page, first try included.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    /// Non-contact links followed per page when no contact-style link exists.
    pub max_fallback_links: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraping: ScrapingConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; LeadgenCrawler/0.1)".to_string(),
            request_timeout_seconds: 12,
            rate_limit_delay_ms: 1000,
            max_attempts: 3,
            backoff_base_ms: 1000,
            max_fallback_links: 3,
        }
    }
}

pub async fn load_config(path: &str) -> crate::models::Result<Config> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
