//! Configuration module for scorepull
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The config file is optional; [`Config::default`] targets the real
//! results site with the stock politeness limits.
//!
//! # Example
//!
//! ```no_run
//! use scorepull::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scorepull.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, SiteConfig, StorageConfig};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
