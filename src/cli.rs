// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Conversions: turning the parsed flags into CrawlOptions
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::CrawlOptions;
use crate::fetch::DEFAULT_USER_AGENT;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-spider",
    version,
    about = "Crawl a website breadth-first and list every page found",
    long_about = "link-spider starts from one URL, follows links up to a depth limit and a page \
                  budget, and reports each page's title, depth and link count (or why it failed). \
                  Pages are fetched concurrently and every URL is fetched at most once."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://go.dev/)
    ///
    /// This is a positional argument (required, no flag needed)
    pub url: String,

    /// Maximum crawl depth (link hops from the start URL)
    ///
    /// Depth 0 = just the starting page
    /// Depth 1 = starting page + all pages it links to
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Maximum number of pages to record, failed pages included
    #[arg(long = "max", default_value_t = 5)]
    pub max_pages: usize,

    /// Only follow links on the start URL's host
    ///
    /// On by default; pass --same-host false to follow external links too
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub same_host: bool,

    /// Timeout for each page request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = 5)]
    pub concurrent: usize,

    /// Stop the whole crawl after this many seconds
    #[arg(long, value_name = "SECS")]
    pub crawl_timeout: Option<u64>,

    /// Write the results to this CSV file instead of listing them
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the results as JSON instead of a listing
    #[arg(long)]
    pub json: bool,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// More log output on stderr (progress is always shown; -v = debug, -vv = trace, -vvv = trace for dependencies too)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The crawl settings carried by these flags (validated later).
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_depth: self.depth,
            max_results: self.max_pages,
            same_host: self.same_host,
            fetch_timeout: Duration::from_secs(self.timeout),
            workers: self.concurrent,
        }
    }

    pub fn crawl_timeout(&self) -> Option<Duration> {
        self.crawl_timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_crawl_options() {
        let cli = Cli::try_parse_from(["link-spider", "https://go.dev/"]).unwrap();
        assert_eq!(cli.url, "https://go.dev/");
        assert_eq!(cli.crawl_options(), CrawlOptions::default());
        assert_eq!(cli.crawl_timeout(), None);
        assert!(!cli.json);
        assert!(cli.output.is_none());
        assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "link-spider",
            "https://example.com",
            "--depth",
            "0",
            "--max",
            "50",
            "--same-host",
            "false",
            "--timeout",
            "3",
            "--concurrent",
            "8",
            "--crawl-timeout",
            "60",
            "--output",
            "pages.csv",
            "-vv",
        ])
        .unwrap();

        let options = cli.crawl_options();
        assert_eq!(options.max_depth, 0);
        assert_eq!(options.max_results, 50);
        assert!(!options.same_host);
        assert_eq!(options.fetch_timeout, Duration::from_secs(3));
        assert_eq!(options.workers, 8);
        assert_eq!(cli.crawl_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(cli.output, Some(PathBuf::from("pages.csv")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["link-spider"]).is_err());
    }
}
