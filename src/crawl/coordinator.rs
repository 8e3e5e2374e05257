// src/crawl/coordinator.rs
// =============================================================================
// The crawl coordinator: sets everything up, runs the workers, and reports.
//
// Phases:
//   Seeding  -> the seed URL is marked visited and queued at depth 0
//   Running  -> N workers pull from the frontier
//   Draining -> the frontier has closed; we wait for every worker to exit
//   Done     -> records are collected into a CrawlReport
//
// The frontier closes when:
// - the page budget is reached (a worker calls close()),
// - the queue is empty and no worker holds an entry (drain barrier), or
// - the caller cancels the token passed to run() (Ctrl-C, crawl timeout).
// =============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::collector::{PageRecord, RecordSink, ResultCollector};
use super::frontier::{Frontier, FrontierEntry};
use super::visited::VisitedSet;
use super::worker;
use crate::config::CrawlConfig;
use crate::fetch::PageFetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrawlPhase {
    Seeding,
    Running,
    Draining,
    Done,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlPhase::Seeding => "seeding",
            CrawlPhase::Running => "running",
            CrawlPhase::Draining => "draining",
            CrawlPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why the crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every reachable page within the limits was crawled
    Exhausted,
    /// The page budget was used up
    BudgetReached,
    /// The caller cancelled the crawl
    Cancelled,
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CrawlOutcome::Exhausted => "all reachable pages crawled",
            CrawlOutcome::BudgetReached => "page limit reached",
            CrawlOutcome::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// One record per fetch attempt, in completion order
    pub records: Vec<PageRecord>,
    pub outcome: CrawlOutcome,
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_ok()).count()
    }
}

// State shared by every worker for the duration of one crawl
pub(super) struct Shared {
    pub config: CrawlConfig,
    pub fetcher: Arc<dyn PageFetcher>,
    pub frontier: Frontier,
    pub visited: VisitedSet,
    pub results: ResultCollector,
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    sink: Option<Arc<dyn RecordSink>>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            sink: None,
        }
    }

    /// Sends every accepted record to `sink` while the crawl runs.
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Runs the crawl to completion.
    ///
    /// Cancelling `cancel` aborts in-flight fetches; pages that were still
    /// being fetched are left out of the report.
    pub async fn run(&self, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        let budget = self.config.max_results();

        let shared = Arc::new(Shared {
            config: self.config.clone(),
            fetcher: Arc::clone(&self.fetcher),
            frontier: Frontier::new(budget, cancel.child_token()),
            visited: VisitedSet::new(budget),
            results: ResultCollector::new(budget, cancel.clone(), self.sink.clone()),
        });

        debug!(phase = %CrawlPhase::Seeding, seed = %self.config.seed());
        let seed = FrontierEntry {
            url: self.config.seed().clone(),
            depth: 0,
        };
        shared.visited.try_mark(seed.url.as_str());
        if let Err(error) = shared.frontier.push(seed) {
            // Only possible if the caller cancelled before we started
            debug!(%error, "seed was not queued");
        }

        debug!(phase = %CrawlPhase::Running, workers = self.config.workers());
        let mut workers = JoinSet::new();
        for id in 0..self.config.workers() {
            workers.spawn(worker::run(id, Arc::clone(&shared)));
        }

        // Workers only return once the frontier is closed (or they panicked),
        // so the first exit marks the start of the drain
        let mut draining = false;
        while let Some(joined) = workers.join_next().await {
            if !draining {
                draining = true;
                debug!(phase = %CrawlPhase::Draining);
            }
            if let Err(e) = joined {
                error!(error = %e, "crawl worker panicked");
            }
        }
        shared.frontier.close();

        let records = shared.results.take();
        let outcome = if cancel.is_cancelled() {
            CrawlOutcome::Cancelled
        } else if records.len() >= budget {
            CrawlOutcome::BudgetReached
        } else {
            CrawlOutcome::Exhausted
        };
        let elapsed = started.elapsed();

        debug!(phase = %CrawlPhase::Done, visited = shared.visited.len());
        info!(
            pages = records.len(),
            %outcome,
            elapsed_ms = elapsed.as_millis() as u64,
            "crawl finished"
        );

        CrawlReport {
            records,
            outcome,
            elapsed,
        }
    }
}
