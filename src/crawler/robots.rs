// src/crawler/robots.rs
use std::collections::HashMap;

use reqwest::Client;
use robotstxt::DefaultMatcher;
use tracing::{debug, warn};
use url::Url;

/// Per-origin robots.txt gate. The first query for an origin fetches and
/// caches `{origin}/robots.txt` for the rest of the run; any fetch problem
/// (transport error, non-200) caches a fail-open marker so robots
/// infrastructure failures never block a crawl.
pub struct PolicyGate {
    client: Client,
    user_agent: String,
    enabled: bool,
    /// origin -> robots body, or None when the fetch failed (fail-open).
    cache: HashMap<String, Option<String>>,
}

impl PolicyGate {
    pub fn new(client: Client, user_agent: &str, enabled: bool) -> Self {
        Self {
            client,
            user_agent: user_agent.to_string(),
            enabled,
            cache: HashMap::new(),
        }
    }

    pub async fn is_allowed(&mut self, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }
        let origin = url.origin().ascii_serialization();
        if !self.cache.contains_key(&origin) {
            let body = self.fetch_robots(&origin).await;
            self.cache.insert(origin.clone(), body);
        }
        match self.cache.get(&origin).and_then(|b| b.as_ref()) {
            Some(body) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, &self.user_agent, url.as_str())
            }
            None => true,
        }
    }

    async fn fetch_robots(&self, origin: &str) -> Option<String> {
        let robots_url = format!("{}/robots.txt", origin);
        debug!("Fetching {}", robots_url);
        match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => response.text().await.ok(),
            Ok(response) => {
                debug!(
                    "robots.txt at {} returned HTTP {}, allowing all",
                    robots_url,
                    response.status()
                );
                None
            }
            Err(e) => {
                warn!("Could not fetch {}: {}, allowing all", robots_url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_gate_allows_without_fetching() {
        // Unroutable host: a network call would fail, a disabled gate
        // must not even try.
        let client = Client::new();
        let mut gate = PolicyGate::new(client, "TestBot", false);
        let url = Url::parse("http://192.0.2.1/page").unwrap();
        assert!(gate.is_allowed(&url).await);
        assert!(gate.cache.is_empty());
    }
}
