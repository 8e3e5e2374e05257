// src/crawl/collector.rs
// =============================================================================
// Collects one PageRecord per fetch attempt, up to the page budget.
//
// The record count here is the crawl's single source of truth for "how many
// pages have we done". When an append fills the budget the worker that made
// it closes the frontier; any append after that is rejected.
//
// Once the crawl's CancellationToken fires, appends are refused as well; the
// check happens under the same lock as the push.
//
// Every accepted record is also handed to an optional RecordSink, which is how
// the binary prints progress while the crawl is still running.
// =============================================================================

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

use super::frontier::FrontierEntry;
use crate::fetch::{FetchError, FetchedPage};

/// The outcome of fetching one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    /// Number of <a href> links on the page, before any filtering
    pub link_count: usize,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,
}

impl PageRecord {
    pub fn new(entry: &FrontierEntry, fetched: &Result<FetchedPage, FetchError>) -> Self {
        match fetched {
            Ok(page) => Self {
                url: entry.url.to_string(),
                title: page.title.clone(),
                link_count: page.links.len(),
                depth: entry.depth,
                error: None,
            },
            Err(error) => Self {
                url: entry.url.to_string(),
                title: String::new(),
                link_count: 0,
                depth: entry.depth,
                error: Some(error.clone()),
            },
        }
    }

    /// True if the page was fetched (even if it had no title or links)
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives each record as soon as it is accepted. Order across workers is
/// not guaranteed.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &PageRecord);
}

impl<F> RecordSink for F
where
    F: Fn(&PageRecord) + Send + Sync,
{
    fn emit(&self, record: &PageRecord) {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appended {
    /// Stored; `total` is the record count including this one
    Recorded { total: usize },
    /// The budget was already used up; the record was dropped
    Full,
    /// The crawl was cancelled; the record was dropped
    Cancelled,
}

pub struct ResultCollector {
    records: Mutex<Vec<PageRecord>>,
    budget: usize,
    cancel: CancellationToken,
    sink: Option<Arc<dyn RecordSink>>,
}

impl ResultCollector {
    pub fn new(
        budget: usize,
        cancel: CancellationToken,
        sink: Option<Arc<dyn RecordSink>>,
    ) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            budget,
            cancel,
            sink,
        }
    }

    pub fn append(&self, record: PageRecord) -> Appended {
        let total = {
            let mut records = self.lock();
            if self.cancel.is_cancelled() {
                return Appended::Cancelled;
            }
            if records.len() >= self.budget {
                return Appended::Full;
            }
            records.push(record.clone());
            records.len()
        };

        if let Some(sink) = &self.sink {
            sink.emit(&record);
        }

        Appended::Recorded { total }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Moves every record out, leaving the collector empty.
    pub fn take(&self) -> Vec<PageRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PageRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    fn entry(path: &str, depth: usize) -> FrontierEntry {
        FrontierEntry {
            url: Url::parse(&format!("https://example.com{path}")).unwrap(),
            depth,
        }
    }

    fn fetched(links: usize) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage {
            title: "Example".to_string(),
            links: vec!["/x".to_string(); links],
        })
    }

    #[test]
    fn test_record_from_success() {
        let record = PageRecord::new(&entry("/a", 1), &fetched(3));
        assert_eq!(record.url, "https://example.com/a");
        assert_eq!(record.title, "Example");
        assert_eq!(record.link_count, 3);
        assert_eq!(record.depth, 1);
        assert!(record.is_ok());
    }

    #[test]
    fn test_record_from_failure() {
        let record = PageRecord::new(&entry("/a", 2), &Err(FetchError::Timeout));
        assert_eq!(record.title, "");
        assert_eq!(record.link_count, 0);
        assert_eq!(record.error, Some(FetchError::Timeout));
        assert!(!record.is_ok());
    }

    #[test]
    fn test_empty_page_is_distinguishable_from_failure() {
        let empty = PageRecord::new(&entry("/empty", 0), &Ok(FetchedPage::default()));
        assert!(empty.is_ok());
        assert_eq!(empty.link_count, 0);
    }

    #[test]
    fn test_append_stops_at_budget() {
        let collector = ResultCollector::new(2, CancellationToken::new(), None);
        assert_eq!(
            collector.append(PageRecord::new(&entry("/a", 0), &fetched(0))),
            Appended::Recorded { total: 1 }
        );
        assert_eq!(
            collector.append(PageRecord::new(&entry("/b", 1), &fetched(0))),
            Appended::Recorded { total: 2 }
        );
        assert_eq!(
            collector.append(PageRecord::new(&entry("/c", 1), &fetched(0))),
            Appended::Full
        );
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.take().len(), 2);
        assert_eq!(collector.len(), 0);
    }

    #[test]
    fn test_sink_sees_accepted_records_only() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink: Arc<dyn RecordSink> = {
            let seen = Arc::clone(&seen);
            Arc::new(move |_: &PageRecord| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };

        let collector = ResultCollector::new(1, CancellationToken::new(), Some(sink));
        collector.append(PageRecord::new(&entry("/a", 0), &fetched(0)));
        collector.append(PageRecord::new(&entry("/b", 0), &fetched(0)));

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancelled_collector_refuses_records() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink: Arc<dyn RecordSink> = {
            let seen = Arc::clone(&seen);
            Arc::new(move |_: &PageRecord| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };
        let cancel = CancellationToken::new();
        let collector = ResultCollector::new(10, cancel.clone(), Some(sink));

        assert_eq!(
            collector.append(PageRecord::new(&entry("/a", 0), &fetched(0))),
            Appended::Recorded { total: 1 }
        );
        cancel.cancel();
        assert_eq!(
            collector.append(PageRecord::new(&entry("/b", 1), &fetched(0))),
            Appended::Cancelled
        );

        assert_eq!(collector.len(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_huge_budget_does_not_preallocate() {
        let collector = ResultCollector::new(usize::MAX, CancellationToken::new(), None);
        assert_eq!(
            collector.append(PageRecord::new(&entry("/a", 0), &fetched(0))),
            Appended::Recorded { total: 1 }
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = PageRecord::new(&entry("/a", 0), &Err(FetchError::Status(500)));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["url"], "https://example.com/a");
        assert_eq!(json["error"]["kind"], "status");
        assert_eq!(json["error"]["detail"], 500);

        let ok = PageRecord::new(&entry("/b", 0), &fetched(1));
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());
    }
}
