// src/fetch/mock.rs
// =============================================================================
// An in-memory "web" for crawler tests.
//
// GraphFetcher maps URLs to canned pages (or canned errors), can slow down
// individual pages, and counts how many times each URL was fetched. That's
// enough to test dedup, depth limits, budgets and the drain barrier without
// touching the network.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use super::{FetchError, FetchedPage, PageFetcher};

#[derive(Default)]
pub struct GraphFetcher {
    pages: HashMap<String, Result<FetchedPage, FetchError>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    fetches: Mutex<HashMap<String, usize>>,
}

impl GraphFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page whose links are given exactly as they'd appear in hrefs.
    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        let page = FetchedPage {
            title: format!("Title of {url}"),
            links: links.iter().map(|link| link.to_string()).collect(),
        };
        self.pages.insert(url.to_string(), Ok(page));
        self
    }

    pub fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn fetch_counts(&self) -> HashMap<String, usize> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for GraphFetcher {
    async fn fetch_page(&self, url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchError> {
        let key = url.as_str();
        *self.fetches.lock().unwrap().entry(key.to_string()).or_default() += 1;

        let delay = self.delays.get(key).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .get(key)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}
