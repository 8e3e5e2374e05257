// src/report.rs
// =============================================================================
// Everything the user sees about crawl results.
//
// - ProgressReporter: logs one line per page while the crawl is running
// - print_listing: numbered, human-readable list of pages plus a summary
// - print_json: the records as a pretty JSON array (for scripts)
// - write_csv / save_csv: one CSV row per page
//
// Report output goes to stdout; progress and diagnostics go through tracing
// to stderr, so `link-spider ... --json | jq` keeps working.
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use crate::crawl::{CrawlReport, PageRecord, RecordSink};

// Logs progress as records arrive ("crawled 3/10")
pub struct ProgressReporter {
    done: AtomicUsize,
    budget: usize,
}

impl ProgressReporter {
    pub fn new(budget: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            budget,
        }
    }
}

impl RecordSink for ProgressReporter {
    fn emit(&self, record: &PageRecord) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        match &record.error {
            None => info!(
                depth = record.depth,
                links = record.link_count,
                "crawled {}/{} {}",
                done,
                self.budget,
                record.url
            ),
            Some(error) => warn!(
                depth = record.depth,
                %error,
                "failed {}/{} {}",
                done,
                self.budget,
                record.url
            ),
        }
    }
}

// Prints results as a numbered list in the terminal
pub fn print_listing(report: &CrawlReport) {
    println!("\n📋 Results:");
    for (i, page) in report.records.iter().enumerate() {
        println!("{}. {}", i + 1, page.url);
        println!("   Title: {}", page.title);
        println!("   Depth: {}", page.depth);
        match &page.error {
            Some(error) => println!("   Error: {}", error),
            None => println!("   Links: {}", page.link_count),
        }
        println!();
    }

    print_summary(report);
}

pub fn print_summary(report: &CrawlReport) {
    let failed = report.failed_count();

    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", report.records.len() - failed);
    println!("   ❌ Failed: {}", failed);
    println!("   📋 Total: {}", report.records.len());
    println!("   🏁 Stopped: {}", report.outcome);
    println!("   ⏱️  Time: {:.2?}", report.elapsed);
}

pub fn print_json(report: &CrawlReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&report.records)?;
    println!("{}", json_output);
    Ok(())
}

/// Writes a header row and one row per record.
pub fn write_csv<W: Write>(writer: W, records: &[PageRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["url", "title", "depth", "links", "error"])?;

    for page in records {
        let depth = page.depth.to_string();
        let links = page.link_count.to_string();
        let error = page.error.as_ref().map(ToString::to_string).unwrap_or_default();
        writer.write_record([
            page.url.as_str(),
            page.title.as_str(),
            depth.as_str(),
            links.as_str(),
            error.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, records: &[PageRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("failed to write {}", path.display()))
}
