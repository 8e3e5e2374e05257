// src/fetch/http.rs
// =============================================================================
// This module downloads pages over HTTP.
//
// Key functionality:
// - Makes exactly one GET request per page (no retries)
// - Applies the crawler's per-fetch timeout to the whole request, body included
// - Treats any non-2xx status as a failed fetch
// - Sorts reqwest failures into FetchError variants (timeout, DNS, TLS, ...)
//
// Rust concepts:
// - async/await: For non-blocking network I/O
// - Result<T, E> + map_err: Converting library errors into our own error type
// - Error::source(): Walking the chain of underlying causes
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::error::Error as _;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{parse_page, FetchError, FetchedPage, PageFetcher};

/// User agent sent when the command line doesn't override it.
pub const DEFAULT_USER_AGENT: &str = concat!("link-spider/", env!("CARGO_PKG_VERSION"));

// The production PageFetcher
//
// reqwest::Client keeps a connection pool inside, so one HttpFetcher is
// shared by every worker.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::limited(5)) // Follow up to 5 redirects
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(categorize_error)?;
        debug!(url = %url, bytes = body.len(), "page downloaded");

        Ok(parse_page(&body))
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout (while connecting or while reading the body)
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let detail = error_chain(&error);
    let lower = detail.to_lowercase();
    let looks_like_tls = lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl");

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(detail)
    } else if error.is_connect() {
        if lower.contains("dns") || lower.contains("failed to lookup address") {
            FetchError::Dns(detail)
        } else if looks_like_tls {
            FetchError::Tls(detail)
        } else {
            FetchError::Connect(detail)
        }
    } else if looks_like_tls {
        FetchError::Tls(detail)
    } else {
        FetchError::Request(detail)
    }
}

// reqwest's top-level message is usually just "error sending request";
// the useful part sits in the source chain
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
