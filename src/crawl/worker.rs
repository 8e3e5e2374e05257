// src/crawl/worker.rs
// =============================================================================
// One crawl worker. The coordinator spawns N of these as tokio tasks.
//
// Each loop iteration:
// 1. Pop an entry from the frontier (waits while other workers are busy)
// 2. Fetch it, racing the fetch against the frontier closing
// 3. Record the result, success or failure, in the collector
// 4. If the fetch worked and we're above max depth, queue the new links
// 5. Drop the lease, telling the frontier we're done with this entry
//
// A failed fetch is recorded but its links (there are none) aren't followed.
// Nothing is ever retried.
// =============================================================================

use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::collector::{Appended, PageRecord};
use super::coordinator::Shared;
use super::frontier::FrontierEntry;
use super::links::crawlable_links;
use crate::fetch::{FetchError, FetchedPage};

pub(super) async fn run(id: usize, shared: Arc<Shared>) {
    debug!(worker = id, "worker started");

    while let Some(lease) = shared.frontier.pop().await {
        let entry = lease.entry();

        let fetched = tokio::select! {
            biased;
            _ = shared.frontier.closed() => {
                debug!(worker = id, url = %entry.url, "fetch abandoned, crawl is stopping");
                break;
            }
            result = fetch(&shared, entry) => result,
        };

        let record = PageRecord::new(entry, &fetched);
        match shared.results.append(record) {
            Appended::Recorded { total } if total >= shared.results.budget() => {
                debug!(worker = id, total, "page budget reached");
                shared.frontier.close();
                break;
            }
            Appended::Recorded { .. } => {}
            // A cancelled crawl keeps nothing that finished after the signal
            Appended::Full | Appended::Cancelled => break,
        }

        if let Ok(page) = &fetched {
            if entry.depth < shared.config.max_depth() {
                enqueue_links(id, &shared, entry, page);
            }
        }

        // `lease` drops here, after its links are queued
    }

    debug!(worker = id, "worker finished");
}

// Fetches with the configured timeout, even if the fetcher ignores it
async fn fetch(shared: &Shared, entry: &FrontierEntry) -> Result<FetchedPage, FetchError> {
    let limit = shared.config.fetch_timeout();
    let result = match timeout(limit, shared.fetcher.fetch_page(&entry.url, limit)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };

    if let Err(error) = &result {
        warn!(url = %entry.url, depth = entry.depth, %error, "fetch failed");
    }
    result
}

fn enqueue_links(id: usize, shared: &Shared, entry: &FrontierEntry, page: &FetchedPage) {
    let config = &shared.config;
    let candidates = crawlable_links(&entry.url, config.seed(), config.same_host(), &page.links);

    for url in candidates {
        if !shared.visited.try_mark(url.as_str()) {
            continue;
        }

        trace!(worker = id, url = %url, depth = entry.depth + 1, "queued");
        let next = FrontierEntry {
            url,
            depth: entry.depth + 1,
        };
        if let Err(error) = shared.frontier.push(next) {
            debug!(worker = id, %error, "link dropped");
            break;
        }
    }
}
