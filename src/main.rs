//! # Job Scraper
//!
//! Scrapes job listings from job boards and aggregators and merges them into
//! a single JSON file that a personal job-board site reads.
//!
//! ## Features
//!
//! - RSS feeds from aggregators (WeWorkRemotely, RemoteOK)
//! - HTML scraping of hosted company boards (Greenhouse, Lever)
//! - Salary and employment-type extraction from free-form listing text
//! - Append-only merge into the existing store, deduplicated by
//!   source-qualified identifier
//!
//! ## Usage
//!
//! ```sh
//! job_scraper -o ./data/jobs.json -c ./scraper.yaml
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture, one source at a time:
//! 1. **Fetching**: Download feeds/pages with randomized delays and headers
//! 2. **Extraction**: Pull listing fields out with selectors and regexes
//! 3. **Merging**: Append listings whose identifier is not yet stored
//! 4. **Output**: Write the store with fresh run metadata

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod http;
mod merge;
mod models;
mod outputs;
mod parsing;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use models::JobStore;
use outputs::json;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("job_scraper starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = config::load_config(args.config.as_deref()).await?;
    if !args.keywords.is_empty() {
        config.keywords = args.keywords.clone();
    }

    let output = PathBuf::from(&args.output);

    // Early check: ensure the store's directory is writable
    if !args.dry_run {
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Load the existing store ----
    let mut store = if args.fresh {
        info!("Fresh run; existing store will be replaced");
        JobStore::default()
    } else {
        json::load_store(&output).await?
    };
    let existing = store.jobs.len();

    // ---- Scrape and merge ----
    let fetcher = http::build_fetcher(&config)?;
    let sources = args.selected_sources();
    let summary = pipeline::run(&fetcher, &config, &sources, args.limit, &mut store).await;

    info!(
        existing,
        fetched = summary.fetched,
        added = summary.added,
        duplicates = summary.duplicates,
        total = store.jobs.len(),
        completed = ?summary.completed,
        failed = ?summary.failed,
        "Scraping finished"
    );

    if summary.completed.is_empty() {
        error!("No source completed; leaving the store untouched");
        return Err("every source failed".into());
    }

    // ---- Output ----
    if args.dry_run {
        warn!(path = %output.display(), "Dry run; store not written");
    } else if let Err(e) = json::write_store(&output, &store).await {
        error!(path = %output.display(), error = %e, "Failed to write job store");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
