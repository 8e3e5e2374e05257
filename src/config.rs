// src/config.rs
// =============================================================================
// This module holds the crawl configuration.
//
// There are two types here:
// - CrawlOptions: plain values, straight from the command line (or a test)
// - CrawlConfig: the validated, immutable version the crawler actually uses
//
// The only way to get a CrawlConfig is CrawlConfig::new(), which checks every
// value. So once the crawler holds a CrawlConfig, it never has to worry about
// a zero budget, zero workers or a seed URL that isn't http(s).
//
// Rust concepts:
// - Private fields + getter methods: the config can't be changed after creation
// - thiserror: derive macro that implements std::error::Error for our enum
// - Default trait: gives CrawlOptions sensible starting values
// =============================================================================

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Everything that can be wrong with a crawl configuration.
///
/// All of these are fatal: the crawl never starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("seed URL '{0}' has no host")]
    MissingHost(String),

    #[error("maximum page count must be at least 1")]
    ZeroResults,

    #[error("concurrency must be at least 1")]
    ZeroWorkers,

    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
}

// Raw crawl settings, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// How many link hops to follow from the seed (0 = seed only)
    pub max_depth: usize,
    /// Maximum number of page records (fetched or failed)
    pub max_results: usize,
    /// Only follow links that stay on the seed's host
    pub same_host: bool,
    /// Time limit for a single page fetch
    pub fetch_timeout: Duration,
    /// Number of concurrent workers
    pub workers: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_results: 5,
            same_host: true,
            fetch_timeout: Duration::from_secs(10),
            workers: 5,
        }
    }
}

// Validated crawl configuration
//
// Clone is cheap enough: one Url plus a few numbers
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    seed: Url,
    max_depth: usize,
    max_results: usize,
    same_host: bool,
    fetch_timeout: Duration,
    workers: usize,
}

impl CrawlConfig {
    /// Validates `options` and the seed address.
    ///
    /// The seed is normalized the same way discovered links are (its fragment
    /// is dropped), so a link back to the seed is recognized as visited.
    pub fn new(seed: &str, options: CrawlOptions) -> Result<Self, ConfigError> {
        let mut seed_url = Url::parse(seed.trim()).map_err(|source| ConfigError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        if !matches!(seed_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(seed.to_string()));
        }
        if seed_url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost(seed.to_string()));
        }
        if options.max_results == 0 {
            return Err(ConfigError::ZeroResults);
        }
        if options.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if options.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        seed_url.set_fragment(None);

        Ok(Self {
            seed: seed_url,
            max_depth: options.max_depth,
            max_results: options.max_results,
            same_host: options.same_host,
            fetch_timeout: options.fetch_timeout,
            workers: options.workers,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn same_host(&self) -> bool {
        self.same_host
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new("https://example.com/docs#intro", CrawlOptions::default())
            .unwrap();
        assert_eq!(config.seed().as_str(), "https://example.com/docs");
        assert_eq!(config.max_depth(), 2);
        assert_eq!(config.max_results(), 5);
        assert!(config.same_host());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.workers(), 5);
    }

    #[test]
    fn test_invalid_seed() {
        let err = CrawlConfig::new("not a url", CrawlOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed { .. }));
    }

    #[test]
    fn test_non_http_seed() {
        let err = CrawlConfig::new("ftp://example.com", CrawlOptions::default()).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp://example.com".to_string()));
    }

    #[test]
    fn test_zero_budget() {
        let options = CrawlOptions {
            max_results: 0,
            ..CrawlOptions::default()
        };
        let err = CrawlConfig::new("https://example.com", options).unwrap_err();
        assert_eq!(err, ConfigError::ZeroResults);
    }

    #[test]
    fn test_zero_workers() {
        let options = CrawlOptions {
            workers: 0,
            ..CrawlOptions::default()
        };
        let err = CrawlConfig::new("https://example.com", options).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_zero_timeout() {
        let options = CrawlOptions {
            fetch_timeout: Duration::ZERO,
            ..CrawlOptions::default()
        };
        let err = CrawlConfig::new("https://example.com", options).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTimeout);
    }

    #[test]
    fn test_zero_depth_is_allowed() {
        let options = CrawlOptions {
            max_depth: 0,
            ..CrawlOptions::default()
        };
        assert!(CrawlConfig::new("http://localhost:8080/", options).is_ok());
    }
}
