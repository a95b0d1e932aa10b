use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that the base URL is a usable http(s) URL, that both concurrency
/// ceilings are non-zero, and that the storage paths are non-empty.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.site.base_url)?;

    if config.crawler.max_concurrent_events == 0 {
        return Err(ConfigError::Validation(
            "max-concurrent-events must be greater than 0".to_string(),
        ));
    }

    if config.crawler.max_concurrent_score_pages == 0 {
        return Err(ConfigError::Validation(
            "max-concurrent-score-pages must be greater than 0".to_string(),
        ));
    }

    if config.crawler.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.storage.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache-dir must not be empty".to_string(),
        ));
    }

    if config.storage.hash_path.is_empty() {
        return Err(ConfigError::Validation(
            "hash-path must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the base URL of the results site
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed =
        Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: scheme must be http or https",
            base_url
        )));
    }

    // Relative joins against the base silently drop the last path segment
    // unless the base ends with a slash.
    if !base_url.ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: base URL must end with a trailing slash",
            base_url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Config;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_event_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent_events = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_score_concurrency_rejected() {
        let mut config = Config::default();
        config.crawler.max_concurrent_score_pages = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = Config::default();
        config.site.base_url = "ftp://results.example.com/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_base_url_without_trailing_slash_rejected() {
        let mut config = Config::default();
        config.site.base_url = "http://results.example.com/results".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_cache_dir_rejected() {
        let mut config = Config::default();
        config.storage.cache_dir = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
