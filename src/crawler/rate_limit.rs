// src/crawler/rate_limit.rs
use std::collections::HashMap;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

/// Cooperative pacing for sequential callers: remembers the last call per
/// key and sleeps out the remainder of the minimum interval. One crawl run
/// owns its limiter, so there is no locking here.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: HashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: HashMap::new(),
        }
    }

    pub async fn throttle(&mut self, key: &str) {
        if self.min_interval.is_zero() {
            return;
        }
        if let Some(last) = self.last_call.get(key) {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Throttling {} for {:?}", key, wait);
                sleep(wait).await;
            }
        }
        self.last_call.insert(key.to_string(), Instant::now());
    }
}
