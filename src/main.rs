// src/main.rs
use chrono::Utc;
use dialoguer::Input;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use leadgen_crawler::config::{load_config, Config};
use leadgen_crawler::models::Result;
use leadgen_crawler::pipeline::{analyze_records, clean_records, AnalysisReport};
use leadgen_crawler::{ContactRecord, CrawlMode, CrawlOptions, Crawler};

#[derive(Serialize)]
struct CrawlReport {
    seed_url: String,
    crawled_at: String,
    pages_crawled: usize,
    contact_page_url: String,
    records: Vec<ContactRecord>,
    analysis: AnalysisReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("leadgen_crawler={}", config.logging.level).parse()?),
        )
        .init();

    let (seed, options) = parse_args()?;

    tokio::fs::create_dir_all(&config.output.directory).await?;

    let crawler = Crawler::new(config.scraping.clone())?;
    let outcome = crawler.crawl(&seed, &options).await?;

    let records = clean_records(outcome.records);
    let analysis = analyze_records(&records);
    info!(
        "📊 {} records after cleaning ({} with email, {} with phone)",
        analysis.total, analysis.with_email, analysis.with_phone
    );

    let report = CrawlReport {
        seed_url: outcome.seed_url,
        crawled_at: Utc::now().to_rfc3339(),
        pages_crawled: outcome.pages_crawled,
        contact_page_url: outcome.contact_page_url,
        records,
        analysis,
    };

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = format!("{}/leads_{}.json", config.output.directory, timestamp);
    let json = if config.output.pretty_json {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    tokio::fs::write(&path, json).await?;
    info!("📤 Report written to {}", path);

    Ok(())
}

fn parse_args() -> Result<(String, CrawlOptions)> {
    let mut options = CrawlOptions::default();
    let mut seed = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pages" => {
                let value = args.next().ok_or("--pages requires a value")?;
                options.max_pages = value.parse()?;
            }
            "--list" => options.mode = CrawlMode::List,
            "--no-follow" => options.follow_links = false,
            "--no-robots" => {
                warn!("robots.txt checks disabled");
                options.respect_robots = false;
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown flag: {}", other).into());
            }
            other => seed = Some(other.to_string()),
        }
    }

    let seed = match seed {
        Some(seed) => seed,
        None => Input::<String>::new()
            .with_prompt("Seed URL")
            .interact_text()?,
    };
    Ok((seed, options))
}
