// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Validate the crawl configuration
// 4. Run the crawl, stopping early on Ctrl-C or --crawl-timeout
// 5. Print or save the results
// 6. Exit with proper code (0 = all pages fetched, 1 = some failed, 2 = error)
//
// Rust concepts used:
// - async/await: Because we fetch many pages concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Arc: Sharing the HTTP fetcher and progress reporter with the crawler
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - validated crawl settings
mod crawl;    // src/crawl/ - the concurrent crawler
mod fetch;    // src/fetch/ - HTTP download + HTML parsing
mod report;   // src/report.rs - listing, JSON and CSV output

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use crawl::Crawler;
use fetch::HttpFetcher;
use report::ProgressReporter;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every page was fetched
//   Ok(1) = at least one page failed to fetch
//   Err = invalid configuration or output error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Invalid settings stop us here, before any request is made
    let config = CrawlConfig::new(&cli.url, cli.crawl_options())?;
    let fetcher = HttpFetcher::new(&cli.user_agent).context("failed to build HTTP client")?;

    println!(
        "🕷️  Crawling {} (max depth: {}, max pages: {}, concurrency: {})",
        config.seed(),
        config.max_depth(),
        config.max_results(),
        config.workers()
    );

    let cancel = CancellationToken::new();
    watch_for_shutdown(cancel.clone(), cli.crawl_timeout());

    let progress = Arc::new(ProgressReporter::new(config.max_results()));
    let report = Crawler::new(config, Arc::new(fetcher))
        .with_sink(progress)
        .run(cancel)
        .await;

    println!(
        "\n✅ Crawl finished: {} page(s) in {:.2?}",
        report.records.len(),
        report.elapsed
    );

    if let Some(path) = &cli.output {
        report::save_csv(path, &report.records)?;
        println!("💾 Results saved to: {}", path.display());
        report::print_summary(&report);
    } else if cli.json {
        report::print_json(&report)?;
    } else {
        report::print_listing(&report);
    }

    if report.failed_count() > 0 {
        Ok(1) // Exit code 1 = some pages could not be fetched
    } else {
        Ok(0)
    }
}

// Sends tracing output to stderr
//
// RUST_LOG wins if it is set; otherwise -v flags pick the level
fn init_tracing(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Progress lines ("crawled 3/10 ...") are info-level, so our own crate logs at
// info even without -v; dependencies stay at warn until -vvv
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,link_spider=info",
        1 => "warn,link_spider=debug",
        2 => "warn,link_spider=trace",
        _ => "trace",
    }
}

// Cancels the crawl on Ctrl-C or when the overall crawl timeout runs out
fn watch_for_shutdown(cancel: CancellationToken, crawl_timeout: Option<Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match crawl_timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => warn!("interrupted, stopping crawl"),
            _ = deadline => warn!("crawl timeout reached, stopping crawl"),
        }
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_visible_by_default() {
        let filter = log_filter(0);
        assert!(filter.contains("link_spider=info"));
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn test_verbose_flags_raise_level() {
        assert_eq!(log_filter(1), "warn,link_spider=debug");
        assert_eq!(log_filter(2), "warn,link_spider=trace");
        assert_eq!(log_filter(3), "trace");
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(log_filter(verbose)).is_ok());
        }
    }
}
