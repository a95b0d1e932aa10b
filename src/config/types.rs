use serde::Deserialize;

/// Main configuration structure for scorepull
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// The single results site this pipeline targets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the results site, with trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Ceiling on simultaneous in-flight event-page fetches
    #[serde(rename = "max-concurrent-events")]
    pub max_concurrent_events: usize,

    /// Ceiling on simultaneous in-flight score-page fetches
    ///
    /// Independent from the event ceiling; the two stages overlap in time.
    #[serde(rename = "max-concurrent-score-pages")]
    pub max_concurrent_score_pages: usize,

    /// Per-request timeout in seconds; a timeout is an ordinary fetch failure
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// Local cache and crawl-state configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory that raw page bodies are cached under
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// File holding the fingerprint of the last completed crawl
    #[serde(rename = "hash-path")]
    pub hash_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.o2cm.com/results/".to_string(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_events: 10,
            max_concurrent_score_pages: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: "./cache".to_string(),
            hash_path: "./.hash.txt".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            crawler: CrawlerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
