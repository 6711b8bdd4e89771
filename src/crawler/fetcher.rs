// src/crawler/fetcher.rs
use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapingConfig;
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::robots::PolicyGate;
use crate::crawler::types::{FetchError, FetchedPage};

/// Issues one HTTP GET per page on behalf of a single crawl run. The policy
/// gate and rate limiter are consulted before every network call; transient
/// failures (timeouts, connect errors, 5xx, 429) are retried with
/// exponential backoff, other 4xx fail immediately.
pub struct Fetcher {
    client: Client,
    gate: PolicyGate,
    limiter: RateLimiter,
    max_attempts: u32,
    backoff_base: Duration,
}

impl Fetcher {
    pub fn new(client: Client, gate: PolicyGate, config: &ScrapingConfig) -> Self {
        Self {
            client,
            gate,
            limiter: RateLimiter::new(Duration::from_millis(config.rate_limit_delay_ms)),
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    pub async fn fetch(&mut self, url: &Url) -> Result<FetchedPage, FetchError> {
        if !self.gate.is_allowed(url).await {
            return Err(FetchError::Forbidden(url.to_string()));
        }
        let key = url.host_str().unwrap_or_default().to_string();
        self.limiter.throttle(&key).await;

        let mut last_reason = String::new();
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let wait = self.backoff_delay(attempt);
                debug!("Retry {}/{} for {} in {:?}", attempt, self.max_attempts, url, wait);
                sleep(wait).await;
            }
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let final_url = response.url().clone();
                        match response.text().await {
                            Ok(body) => {
                                debug!("Fetched {} bytes from {}", body.len(), final_url);
                                return Ok(FetchedPage { final_url, body });
                            }
                            Err(e) => {
                                last_reason = format!("body read failed: {}", e);
                                continue;
                            }
                        }
                    }
                    if status.is_server_error() || status.as_u16() == 429 {
                        last_reason = format!("HTTP {}", status.as_u16());
                        continue;
                    }
                    return Err(FetchError::Permanent {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Err(e) => {
                    if e.is_timeout() || e.is_connect() {
                        last_reason = e.to_string();
                        continue;
                    }
                    warn!("Request to {} failed: {}", url, e);
                    last_reason = e.to_string();
                    continue;
                }
            }
        }
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            reason: last_reason,
        })
    }

    /// 1x, 2x, 4x... the base delay, with up to 10% random jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.backoff_base * 2u32.saturating_pow(attempt.saturating_sub(2));
        let jitter_cap = (base.as_millis() as u64) / 10;
        base + Duration::from_millis(fastrand::u64(0..=jitter_cap))
    }
}
