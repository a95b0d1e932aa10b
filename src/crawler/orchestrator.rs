//! Crawl orchestration: nested bounded fan-out over events, heats, and pages
//!
//! The crawl is one logical pipeline with two independent politeness
//! ceilings, one for event-page fetches and one for score-page fetches.
//! Each ceiling is its own semaphore; the stages overlap in time, so a
//! shared pool would let one stage starve the other.
//!
//! A failed fetch is logged and contributes zero pages; sibling events,
//! heats, and pages are unaffected. A failed cache write is different: it
//! aborts the run so the fingerprint is never advanced past an incomplete
//! cache.

use crate::crawler::discover::{self, HeatRef};
use crate::crawler::fetcher::SiteClient;
use crate::store::{PageKey, PageStore};
use crate::Result;
use futures::future;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Drives the fan-out for one crawl run
pub struct Orchestrator<'a, C> {
    client: &'a C,
    store: &'a PageStore,
    event_permits: Semaphore,
    score_permits: Semaphore,
}

impl<'a, C: SiteClient> Orchestrator<'a, C> {
    /// Creates an orchestrator with the two concurrency ceilings
    pub fn new(client: &'a C, store: &'a PageStore, event_limit: usize, score_limit: usize) -> Self {
        Self {
            client,
            store,
            event_permits: Semaphore::new(event_limit),
            score_permits: Semaphore::new(score_limit),
        }
    }

    /// Crawls every discovered event link and returns the count of pages written
    pub async fn crawl(&self, links: &[String]) -> Result<usize> {
        let counts = future::join_all(links.iter().map(|link| self.harvest_event(link))).await;

        let mut written = 0;
        for count in counts {
            written += count?;
        }
        Ok(written)
    }

    /// Fetches one event page and fans out over the heats it references
    async fn harvest_event(&self, link: &str) -> Result<usize> {
        let Some(event) = discover::event_id(link) else {
            tracing::debug!(link, "Link carries no event id, skipping");
            return Ok(0);
        };

        tracing::info!(event = %event, "Fetching event page");
        let body = {
            let _permit = acquire(&self.event_permits).await;
            match self.client.event_page(&event).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(event = %event, error = %e, "Event page fetch failed");
                    return Ok(0);
                }
            }
        };

        let heats = discover::heat_refs(&body);
        tracing::debug!(event = %event, heats = heats.len(), "Discovered heats");

        let counts = future::join_all(heats.iter().map(|heat| self.harvest_heat(heat))).await;

        let mut written = 0;
        for count in counts {
            written += count?;
        }
        Ok(written)
    }

    /// Fetches a heat's first page, then the rest of its pagination set
    async fn harvest_heat(&self, heat: &HeatRef) -> Result<usize> {
        tracing::info!(event = %heat.event, heat = %heat.heat, "Fetching scoresheet");
        let first = {
            let _permit = acquire(&self.score_permits).await;
            match self.client.score_page(&heat.event, &heat.heat, "0").await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        event = %heat.event,
                        heat = %heat.heat,
                        error = %e,
                        "Scoresheet fetch failed"
                    );
                    return Ok(0);
                }
            }
        };

        let indices = discover::page_indices(&first);

        // The first page is already in hand; cache it without a second fetch.
        self.store
            .write(&PageKey::new(&heat.event, &heat.heat, "0"), &first)
            .await?;
        let mut written = 1;

        let counts = future::join_all(
            indices
                .iter()
                .skip(1)
                .map(|index| self.harvest_score_page(heat, index)),
        )
        .await;

        for count in counts {
            written += count?;
        }
        Ok(written)
    }

    /// Fetches and caches one follow-on page of a heat's scoresheet
    async fn harvest_score_page(&self, heat: &HeatRef, index: &str) -> Result<usize> {
        let body = {
            let _permit = acquire(&self.score_permits).await;
            match self.client.score_page(&heat.event, &heat.heat, index).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        event = %heat.event,
                        heat = %heat.heat,
                        page = index,
                        error = %e,
                        "Score page fetch failed"
                    );
                    return Ok(0);
                }
            }
        };

        self.store
            .write(&PageKey::new(&heat.event, &heat.heat, index), &body)
            .await?;
        Ok(1)
    }
}

/// Acquires a permit from a pool that lives as long as the orchestrator
async fn acquire(pool: &Semaphore) -> SemaphorePermit<'_> {
    match pool.acquire().await {
        Ok(permit) => permit,
        // The orchestrator never closes its own semaphores.
        Err(_) => unreachable!("crawl semaphore closed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;

    /// In-memory site that records fetch counts and in-flight concurrency
    #[derive(Default)]
    struct FakeSite {
        heats_per_event: usize,
        pages_per_heat: usize,
        /// Events whose event-page fetch fails with an HTTP 500
        broken_events: Vec<String>,
        events_in_flight: AtomicUsize,
        events_high_water: AtomicUsize,
        scores_in_flight: AtomicUsize,
        scores_high_water: AtomicUsize,
        score_fetches: AtomicUsize,
    }

    impl FakeSite {
        fn new(heats_per_event: usize, pages_per_heat: usize) -> Self {
            Self {
                heats_per_event,
                pages_per_heat,
                ..Self::default()
            }
        }

        fn page_zero_body(&self, event: &str, heat: &str) -> String {
            let options: String = (0..self.pages_per_heat)
                .map(|i| format!(r#"<option value="{i}">page {i}</option>"#))
                .collect();
            format!(
                r#"<html><body><select id="selCount">{options}</select>
                <p>scores {event} {heat} 0</p></body></html>"#
            )
        }
    }

    // Spelled out because the glob import above brings in the crate-level
    // single-parameter `Result` alias, which would shadow these signatures.
    impl SiteClient for FakeSite {
        async fn root_page(&self) -> std::result::Result<String, FetchError> {
            unimplemented!("orchestrator never fetches the root")
        }

        async fn event_page(&self, event: &str) -> std::result::Result<String, FetchError> {
            self.events_in_flight.fetch_add(1, Ordering::SeqCst);
            self.events_high_water
                .fetch_max(self.events_in_flight.load(Ordering::SeqCst), Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.events_in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.broken_events.iter().any(|e| e == event) {
                return Err(FetchError::Status {
                    status: 500,
                    host: "results.example.com".to_string(),
                    path: "/event3.asp".to_string(),
                });
            }

            let rows: String = (0..self.heats_per_event)
                .map(|i| {
                    format!(
                        r#"<tr><td><a href="scoresheet3.asp?event={event}&amp;heatid={event}-h{i}&amp;selCount=0">Heat</a></td></tr>"#
                    )
                })
                .collect();
            Ok(format!(
                r#"<html><body><div id="placement"><form>
                <table></table><table>{rows}</table>
                </form></div></body></html>"#
            ))
        }

        async fn score_page(
            &self,
            event: &str,
            heat: &str,
            page: &str,
        ) -> std::result::Result<String, FetchError> {
            self.score_fetches.fetch_add(1, Ordering::SeqCst);
            self.scores_in_flight.fetch_add(1, Ordering::SeqCst);
            self.scores_high_water
                .fetch_max(self.scores_in_flight.load(Ordering::SeqCst), Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.scores_in_flight.fetch_sub(1, Ordering::SeqCst);

            if page == "0" {
                Ok(self.page_zero_body(event, heat))
            } else {
                Ok(format!(
                    "<html><body><p>scores {event} {heat} {page}</p></body></html>"
                ))
            }
        }
    }

    fn event_links(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("event3.asp?event=e{i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_pool_never_exceeds_its_ceiling() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let site = FakeSite::new(1, 1);
        let orchestrator = Orchestrator::new(&site, &store, 10, 10);

        orchestrator.crawl(&event_links(30)).await.unwrap();

        assert_eq!(site.events_high_water.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_score_pool_never_exceeds_its_ceiling() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let site = FakeSite::new(4, 3);
        let orchestrator = Orchestrator::new(&site, &store, 10, 10);

        orchestrator.crawl(&event_links(8)).await.unwrap();

        assert_eq!(site.scores_high_water.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pools_are_independent() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let site = FakeSite::new(3, 2);
        let orchestrator = Orchestrator::new(&site, &store, 2, 10);

        orchestrator.crawl(&event_links(12)).await.unwrap();

        // Tightening the event ceiling must not cap score fetches at 2.
        assert!(site.events_high_water.load(Ordering::SeqCst) <= 2);
        assert!(site.scores_high_water.load(Ordering::SeqCst) > 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_writes_every_listed_page_once() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let site = FakeSite::new(1, 3);
        let orchestrator = Orchestrator::new(&site, &store, 10, 10);

        let written = orchestrator.crawl(&event_links(1)).await.unwrap();

        assert_eq!(written, 3);
        // Page 0 is cached from the discovery fetch, pages 1 and 2 are the
        // only extra score fetches.
        assert_eq!(site.score_fetches.load(Ordering::SeqCst), 3);

        let cached = store
            .read(&store.path_for(&PageKey::new("e0", "e0-h0", "0")))
            .unwrap();
        assert_eq!(cached, site.page_zero_body("e0", "e0-h0"));
        for index in ["1", "2"] {
            assert!(store.path_for(&PageKey::new("e0", "e0-h0", index)).is_file());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_event_does_not_affect_siblings() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let mut site = FakeSite::new(2, 2);
        site.broken_events = vec!["e1".to_string()];
        let orchestrator = Orchestrator::new(&site, &store, 10, 10);

        let written = orchestrator.crawl(&event_links(3)).await.unwrap();

        // Two healthy events, two heats each, two pages per heat.
        assert_eq!(written, 8);
        assert!(store.path_for(&PageKey::new("e0", "e0-h0", "0")).is_file());
        assert!(store.path_for(&PageKey::new("e2", "e2-h1", "1")).is_file());
        assert!(!store.path_for(&PageKey::new("e1", "e1-h0", "0")).is_file());
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_without_event_id_contributes_zero() {
        let dir = tempdir().unwrap();
        let store = PageStore::new(dir.path()).unwrap();
        let site = FakeSite::new(1, 1);
        let orchestrator = Orchestrator::new(&site, &store, 10, 10);

        let written = orchestrator
            .crawl(&["index.htm".to_string()])
            .await
            .unwrap();
        assert_eq!(written, 0);
    }
}
