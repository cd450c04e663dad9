//! Command-line interface definitions for the job scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Paths can also come from environment variables.

use crate::scrapers::Source;
use clap::Parser;

/// Command-line arguments for a scraping run.
///
/// # Examples
///
/// ```sh
/// # Every source, merged into data/jobs.json
/// job_scraper
///
/// # Only the Lever boards from a config file, Rust jobs only
/// job_scraper -c scraper.yaml -s lever -k rust
///
/// # Start over instead of merging into the existing file
/// job_scraper --fresh -o public/data/jobs.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON file holding the job store
    #[arg(short, long, env = "JOBS_OUTPUT", default_value = "data/jobs.json")]
    pub output: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "JOB_SCRAPER_CONFIG")]
    pub config: Option<String>,

    /// Source to scrape; repeat for several (default: all)
    #[arg(short, long = "source", value_enum)]
    pub sources: Vec<Source>,

    /// Keep only listings mentioning this word; repeatable, overrides the config file
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Maximum number of listings kept per source
    #[arg(long)]
    pub limit: Option<usize>,

    /// Overwrite the store instead of merging into it
    #[arg(long)]
    pub fresh: bool,

    /// Scrape and report without writing the store
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Sources to run, in command-line order; every source when none was given.
    pub fn selected_sources(&self) -> Vec<Source> {
        if self.sources.is_empty() {
            Source::ALL.to_vec()
        } else {
            self.sources.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["job_scraper"]);

        assert_eq!(cli.output, "data/jobs.json");
        assert!(cli.config.is_none());
        assert!(!cli.fresh);
        assert!(!cli.dry_run);
        assert_eq!(cli.selected_sources(), Source::ALL.to_vec());
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "job_scraper",
            "--output",
            "/tmp/jobs.json",
            "--source",
            "lever",
            "--source",
            "remoteok",
            "--keyword",
            "rust",
            "--limit",
            "25",
            "--fresh",
            "--dry-run",
        ]);

        assert_eq!(cli.output, "/tmp/jobs.json");
        assert_eq!(cli.selected_sources(), vec![Source::Lever, Source::RemoteOk]);
        assert_eq!(cli.keywords, vec!["rust"]);
        assert_eq!(cli.limit, Some(25));
        assert!(cli.fresh);
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "job_scraper",
            "-o",
            "out.json",
            "-c",
            "scraper.yaml",
            "-s",
            "greenhouse",
            "-k",
            "backend",
        ]);

        assert_eq!(cli.output, "out.json");
        assert_eq!(cli.config.as_deref(), Some("scraper.yaml"));
        assert_eq!(cli.sources, vec![Source::Greenhouse]);
        assert_eq!(cli.keywords, vec!["backend"]);
    }

    #[test]
    fn test_cli_rejects_unknown_source() {
        assert!(Cli::try_parse_from(["job_scraper", "-s", "monster"]).is_err());
    }
}
