//! HTTP fetcher implementation
//!
//! This module issues the three request shapes the results site understands:
//! - GET of the site root (the event listing)
//! - form-encoded POST of an event page with the fixed empty filter fields
//! - form-encoded POST of one page of a heat's scoresheet
//!
//! Every failure is collapsed into a [`FetchError`] carrying the status,
//! host, and path, so the orchestrator can log it and move on.

use crate::config::Config;
use crate::{FetchError, HarvestError};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// The HTTP surface the orchestrator depends on
///
/// The production implementation is [`Fetcher`]; tests substitute fakes to
/// observe in-flight concurrency and fetch counts without a network.
#[allow(async_fn_in_trait)]
pub trait SiteClient {
    /// Fetches the site root (the event listing)
    async fn root_page(&self) -> Result<String, FetchError>;

    /// Fetches an event's result page via the fixed empty-filter form POST
    async fn event_page(&self, event: &str) -> Result<String, FetchError>;

    /// Fetches one page of a heat's scoresheet
    async fn score_page(&self, event: &str, heat: &str, page: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with the crawl's per-request timeout
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("scorepull/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production [`SiteClient`] backed by reqwest
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    root_url: Url,
    event_url: Url,
    score_url: Url,
}

impl Fetcher {
    /// Creates a fetcher targeting the configured site
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(config.crawler.request_timeout_secs)?;
        let root_url = Url::parse(&config.site.base_url)?;
        let event_url = root_url.join("event3.asp")?;
        let score_url = root_url.join("scoresheet3.asp")?;

        Ok(Self {
            client,
            root_url,
            event_url,
            score_url,
        })
    }

    /// Resolves a reqwest outcome into a body or a typed failure
    async fn read_body(
        url: &Url,
        outcome: Result<Response, reqwest::Error>,
    ) -> Result<String, FetchError> {
        let response = outcome.map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                host: url.host_str().unwrap_or("").to_string(),
                path: url.path().to_string(),
            });
        }

        response.text().await.map_err(|e| Self::classify(url, e))
    }

    fn classify(url: &Url, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

impl SiteClient for Fetcher {
    async fn root_page(&self) -> Result<String, FetchError> {
        let outcome = self.client.get(self.root_url.clone()).send().await;
        Self::read_body(&self.root_url, outcome).await
    }

    async fn event_page(&self, event: &str) -> Result<String, FetchError> {
        let mut url = self.event_url.clone();
        url.query_pairs_mut().append_pair("event", event);

        // The site expects the filter fields present but empty.
        let form = [
            ("submit", "OK"),
            ("event", event),
            ("selDiv", ""),
            ("selAge", ""),
            ("selSkl", ""),
            ("selSty", ""),
            ("selEnt", ""),
        ];

        let outcome = self.client.post(url.clone()).form(&form).send().await;
        Self::read_body(&url, outcome).await
    }

    async fn score_page(&self, event: &str, heat: &str, page: &str) -> Result<String, FetchError> {
        let mut url = self.score_url.clone();
        url.query_pairs_mut()
            .append_pair("event", event)
            .append_pair("heatid", heat)
            .append_pair("selCount", page);

        let form = [("event", event), ("heatid", heat), ("selCount", page)];

        let outcome = self.client.post(url.clone()).form(&form).send().await;
        Self::read_body(&url, outcome).await
    }
}
