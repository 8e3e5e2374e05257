// src/fetch/mod.rs
// =============================================================================
// This module fetches pages for the crawler.
//
// Submodules:
// - http: Downloads a page with reqwest and sorts failures into FetchError
// - html: Pulls the <title> and every <a href> out of an HTML document
//
// The crawler itself never talks to reqwest directly. It only knows about the
// PageFetcher trait defined here, so tests can swap in an in-memory fake web.
//
// Rust concepts:
// - Traits: shared behaviour that different types can implement
// - Trait objects (Arc<dyn PageFetcher>): pick the implementation at runtime
// - async-trait: async methods on a trait that is used as a trait object
// =============================================================================

mod html;
mod http;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub use html::parse_page;
pub use http::{HttpFetcher, DEFAULT_USER_AGENT};

/// What a successful fetch hands back to the crawler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Text of the page's first <title> element (empty when missing)
    pub title: String,
    /// Raw href values in document order, not yet resolved
    pub links: Vec<String>,
}

// Why a page could not be fetched
//
// Every variant carries owned data so the error can be stored in a PageRecord
// and cloned or serialized later.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("could not resolve hostname: {0}")]
    Dns(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Fetches one page: a single GET, no retries, bounded by `timeout`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError>;
}
