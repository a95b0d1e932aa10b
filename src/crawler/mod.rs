//! Crawler module for harvesting the results site into the local cache
//!
//! This module contains the crawl half of the pipeline:
//! - HTTP fetching of the root, event, and score pages
//! - event link discovery and change detection
//! - bounded-concurrency orchestration with pagination follow-through

pub mod discover;
mod fetcher;
mod fingerprint;
mod orchestrator;

pub use discover::HeatRef;
pub use fetcher::{build_http_client, Fetcher, SiteClient};
pub use fingerprint::{fingerprint, ChangeDetector};
pub use orchestrator::Orchestrator;

use crate::config::Config;
use crate::store::PageStore;
use crate::Result;
use std::time::Instant;

/// Outcome of one harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Count of pages written to the cache
    pub pages_written: usize,

    /// Number of event links discovered on the root page
    pub events_discovered: usize,

    /// True when the listing was unchanged and the crawl was skipped
    pub skipped: bool,
}

/// Runs a complete harvest against the configured site
///
/// Fetches the root listing, gates on the link-set fingerprint, and when a
/// crawl is needed fans out over events, heats, and pages, writing every
/// body to the cache. The fingerprint is committed only after the whole
/// fan-out has drained, so an aborted run is redone in full next time.
pub async fn run_harvest(config: &Config) -> Result<CrawlReport> {
    let fetcher = Fetcher::new(config)?;
    run_harvest_with(config, &fetcher).await
}

/// [`run_harvest`] with the site client passed in, for tests and reuse
pub async fn run_harvest_with<C: SiteClient>(config: &Config, client: &C) -> Result<CrawlReport> {
    let start = Instant::now();

    // Without the listing there is nothing to crawl; a root failure is the
    // one fetch error that ends the run.
    let root = client.root_page().await?;
    let links = discover::event_links(&root);
    tracing::info!(events = links.len(), "Discovered event links");

    let detector = ChangeDetector::new(&config.storage.hash_path);
    let (needed, current) = detector.should_crawl(&links);
    if !needed {
        tracing::info!("Event listing unchanged since last completed crawl");
        return Ok(CrawlReport {
            pages_written: 0,
            events_discovered: links.len(),
            skipped: true,
        });
    }

    let store = PageStore::new(&config.storage.cache_dir)?;
    let orchestrator = Orchestrator::new(
        client,
        &store,
        config.crawler.max_concurrent_events,
        config.crawler.max_concurrent_score_pages,
    );
    let pages_written = orchestrator.crawl(&links).await?;

    detector.commit(&current)?;
    tracing::info!(
        pages = pages_written,
        elapsed = ?start.elapsed(),
        "Crawl complete, fingerprint advanced"
    );

    Ok(CrawlReport {
        pages_written,
        events_discovered: links.len(),
        skipped: false,
    })
}
