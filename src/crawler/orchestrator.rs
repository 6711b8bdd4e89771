// src/crawler/orchestrator.rs
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapingConfig;
use crate::crawler::extractor::{domain_from_url, FieldExtractor};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::robots::PolicyGate;
use crate::crawler::types::{
    CrawlError, CrawlMode, CrawlOptions, CrawlOutcome, FetchError,
};
use crate::models::ContactRecord;

const CONTACT_KEYWORDS: [&str; 4] = ["contact", "about", "team", "people"];

/// Drives one bounded site traversal per `crawl` call. The crawler itself is
/// immutable; all per-run state (queue, visited set, robots cache, limiter
/// timestamps) lives in the run, so independent seeds can be crawled
/// concurrently from separate tasks.
pub struct Crawler {
    client: Client,
    config: ScrapingConfig,
    extractor: FieldExtractor,
}

/// Ephemeral traversal state, owned by exactly one run.
struct CrawlState {
    visited: HashSet<String>,
    queue: VecDeque<Url>,
    pages_crawled: usize,
    records: Vec<ContactRecord>,
    profile: ContactRecord,
    contact_page_url: String,
    seed_domain: String,
}

/// A same-domain link candidate discovered on a page.
struct DiscoveredLink {
    url: Url,
    is_contact: bool,
}

impl Crawler {
    pub fn new(config: ScrapingConfig) -> crate::models::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            extractor: FieldExtractor::new(),
        })
    }

    pub async fn crawl(
        &self,
        seed: &str,
        options: &CrawlOptions,
    ) -> Result<CrawlOutcome, CrawlError> {
        let start = Instant::now();
        let seed_url = parse_seed(seed)?;
        info!("🕷️  Starting {:?}-mode crawl of {}", options.mode, seed_url);

        let gate = PolicyGate::new(
            self.client.clone(),
            &self.config.user_agent,
            options.respect_robots,
        );
        let mut fetcher = Fetcher::new(self.client.clone(), gate, &self.config);
        let max_pages = options.max_pages.max(1);

        let mut state = CrawlState {
            visited: HashSet::from([seed_url.to_string()]),
            queue: VecDeque::new(),
            pages_crawled: 0,
            records: Vec::new(),
            profile: ContactRecord::default(),
            contact_page_url: String::new(),
            seed_domain: domain_from_url(&seed_url),
        };

        // The seed is the one page whose failure fails the whole run.
        let seed_page = match fetcher.fetch(&seed_url).await {
            Ok(page) => page,
            Err(FetchError::Forbidden(url)) => return Err(CrawlError::PolicyDenied(url)),
            Err(e) => return Err(CrawlError::FetchExhausted(e.to_string())),
        };
        state.pages_crawled += 1;
        self.ingest_page(&seed_page.body, &seed_page.final_url, options, &mut state);

        while state.pages_crawled < max_pages {
            let Some(next) = state.queue.pop_front() else {
                break;
            };
            match fetcher.fetch(&next).await {
                Ok(page) => {
                    state.pages_crawled += 1;
                    self.ingest_page(&page.body, &page.final_url, options, &mut state);
                }
                Err(e) => {
                    // Secondary pages are skipped silently; the run goes on
                    // with the remaining budget.
                    warn!("Skipping {}: {}", next, e);
                }
            }
        }

        let records = match options.mode {
            CrawlMode::Profile => {
                let mut profile = state.profile;
                profile.contact_page_url = state.contact_page_url.clone();
                vec![profile]
            }
            CrawlMode::List => state.records,
        };

        let outcome = CrawlOutcome {
            seed_url: seed_url.to_string(),
            mode: options.mode,
            records,
            pages_crawled: state.pages_crawled,
            contact_page_url: state.contact_page_url,
            crawl_duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "🎯 Crawl of {} done: {} pages, {} records in {}ms",
            seed_url,
            outcome.pages_crawled,
            outcome.records.len(),
            outcome.crawl_duration_ms
        );
        Ok(outcome)
    }

    /// Extract the page, fold the record into the run, and enqueue follow-up
    /// links. Parsing happens synchronously so no document survives an await.
    fn ingest_page(&self, html: &str, url: &Url, options: &CrawlOptions, state: &mut CrawlState) {
        let record = self.extractor.extract(html, url);
        match options.mode {
            CrawlMode::Profile => merge_into_profile(&mut state.profile, record),
            CrawlMode::List => state.records.push(record),
        }

        if !options.follow_links {
            return;
        }
        let discovered = discover_links(html, url, &state.seed_domain, &state.visited);
        if let Some(contact) = discovered.iter().find(|l| l.is_contact) {
            if state.contact_page_url.is_empty() {
                state.contact_page_url = contact.url.to_string();
            }
            // The contact-style page jumps the queue.
            state.visited.insert(contact.url.to_string());
            state.queue.push_front(contact.url.clone());
            return;
        }
        for link in discovered
            .iter()
            .filter(|l| !l.is_contact)
            .take(self.config.max_fallback_links)
        {
            state.visited.insert(link.url.to_string());
            state.queue.push_back(link.url.clone());
        }
    }
}

fn parse_seed(seed: &str) -> Result<Url, CrawlError> {
    let mut url =
        Url::parse(seed.trim()).map_err(|e| CrawlError::InvalidUrl(format!("{seed}: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::InvalidUrl(format!(
            "{seed}: unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(CrawlError::InvalidUrl(format!("{seed}: missing host")));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Same-registrable-domain candidates reachable from the page, excluding
/// fragment-only, script-protocol, and already-visited links.
fn discover_links(
    html: &str,
    base: &Url,
    seed_domain: &str,
    visited: &HashSet<String>,
) -> Vec<DiscoveredLink> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();
    let mut links: Vec<DiscoveredLink> = Vec::new();

    for element in document.select(&selector) {
        let href = element.value().attr("href").unwrap_or("");
        let href_lower = href.to_lowercase();
        if href.is_empty()
            || href_lower.starts_with('#')
            || href_lower.starts_with("javascript:")
            || href_lower.starts_with("mailto:")
        {
            continue;
        }
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        resolved.set_fragment(None);
        if domain_from_url(&resolved) != seed_domain {
            continue;
        }
        if visited.contains(resolved.as_str())
            || links.iter().any(|l| l.url.as_str() == resolved.as_str())
        {
            continue;
        }
        let anchor_text = element.text().collect::<String>().to_lowercase();
        let is_contact = CONTACT_KEYWORDS
            .iter()
            .any(|k| anchor_text.contains(k) || href_lower.contains(k));
        links.push(DiscoveredLink {
            url: resolved,
            is_contact,
        });
    }
    links
}

/// Profile aggregation: scalar fields fill in only when still empty (first
/// found wins), sequence fields accumulate without duplicates.
fn merge_into_profile(profile: &mut ContactRecord, page: ContactRecord) {
    fill_if_empty(&mut profile.company_name, page.company_name);
    fill_if_empty(&mut profile.website_url, page.website_url);
    fill_if_empty(&mut profile.domain, page.domain);
    fill_if_empty(&mut profile.description, page.description);
    fill_if_empty(&mut profile.contact_name, page.contact_name);
    fill_if_empty(&mut profile.job_title, page.job_title);
    fill_if_empty(&mut profile.email, page.email);
    fill_if_empty(&mut profile.phone, page.phone);
    fill_if_empty(&mut profile.address, page.address);
    fill_if_empty(&mut profile.meta_description, page.meta_description);
    fill_if_empty(&mut profile.meta_keywords, page.meta_keywords);
    for keyword in page.industry_keywords {
        if !profile.industry_keywords.contains(&keyword) {
            profile.industry_keywords.push(keyword);
        }
    }
    for link in page.social_links {
        if !profile.social_links.contains(&link) {
            profile.social_links.push(link);
        }
    }
}

fn fill_if_empty(target: &mut String, value: String) {
    if target.is_empty() && !value.is_empty() {
        *target = value;
    }
}
