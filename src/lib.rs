//! Scorepull: an incremental harvester for o2cm-style competition results
//!
//! This crate crawls the paginated scoresheets of a single results website,
//! caches the raw pages locally, and converts the cached markup into
//! structured records (dances, competitors, marks, judges, couples) plus
//! idempotent upsert statements for a graph store.

pub mod config;
pub mod crawler;
pub mod parser;
pub mod query;
pub mod store;

use thiserror::Error;

/// Main error type for scorepull operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// A single failed HTTP exchange
///
/// Transport failures are recovered locally by the orchestrator: the unit
/// that failed contributes zero cached pages, siblings keep going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {host}{path}")]
    Status {
        status: u16,
        host: String,
        path: String,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
}

/// A cached page whose table layout violates an assumed invariant
///
/// These abort processing of the offending page only; the extract run
/// reports them and moves on to the next cached file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Page has {0} tables, expected at least a result table and the roster table")]
    TooFewTables(usize),

    #[error("Competitor {competitor} has a non-numeric mark {value:?}")]
    BadMark { competitor: String, value: String },

    #[error("Competitor row has {got} cells, expected at least {want}")]
    ShortRow { got: usize, want: usize },

    #[error("Roster table is missing the 'Judges' sentinel token")]
    MissingJudgesSentinel,

    #[error("Judges segment has odd length {0}, cannot pair ids with names")]
    OddJudgesSegment(usize),

    #[error("Couples segment reduces to {0} tokens, not a multiple of 3")]
    RaggedCouplesSegment(usize),
}

/// Cache read/write errors
///
/// These mark the crawl run as incomplete: the fingerprint is not advanced,
/// so the next run redoes the whole crawl.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write cached page {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read cached page {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to list cache directory {path}: {source}")]
    List {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for scorepull operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for parse operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

// Re-export commonly used types
pub use config::Config;
pub use parser::{CompetitorRow, Couple, Judge, ParsedPage, ResultTable};
pub use query::UpsertStatement;
pub use store::{PageKey, PageStore};
