// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a seed URL with a pool of concurrent workers
// - Depth limit and page budget
// - Optional same-host restriction (doesn't wander onto external sites)
// - Every URL is fetched at most once, even when many pages link to it
// - Cooperative cancellation (Ctrl-C, overall crawl timeout)
//
// Submodules:
// - visited: URLs already queued (test-and-set under one lock)
// - frontier: the shared queue plus the "is anyone still working?" count
// - collector: page records, capped at the budget
// - links: resolving and filtering hrefs
// - worker: the per-task fetch loop
// - coordinator: wires it all together and decides when we're done
//
// Rust concepts:
// - Arc: sharing one set of crawl state between many tokio tasks
// - Mutex: each shared component guards its own data, there's no global lock
// =============================================================================

mod collector;
mod coordinator;
mod frontier;
mod links;
mod visited;
mod worker;

pub use collector::{PageRecord, RecordSink};
pub use coordinator::{CrawlOutcome, CrawlReport, Crawler};
