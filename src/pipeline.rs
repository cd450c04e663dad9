//! One scraping run: every selected source, one after another, merged into the store.

use crate::config::ScraperConfig;
use crate::http::Fetch;
use crate::merge::merge_jobs;
use crate::models::{JobStore, StoreMeta};
use crate::scrapers::{Source, apply_filters, scrape_source};
use chrono::{SecondsFormat, Utc};
use itertools::Itertools;
use tracing::{error, info, instrument};

/// Per-run counters, logged at the end and stored in the metadata.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Listings returned by the scrapers, before filtering and dedup.
    pub fetched: usize,
    /// Listings appended to the store.
    pub added: usize,
    /// Listings dropped because the store already had them.
    pub duplicates: usize,
    /// Tags of sources that completed.
    pub completed: Vec<String>,
    /// Tags of sources that failed as a whole.
    pub failed: Vec<String>,
}

/// Scrape `sources` in order and merge the results into `store`.
///
/// A source that fails is logged and skipped; the remaining sources still
/// run. The store's metadata is replaced with this run's counters.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn run<F: Fetch>(
    fetcher: &F,
    config: &ScraperConfig,
    sources: &[Source],
    limit: Option<usize>,
    store: &mut JobStore,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for source in sources.iter().copied().unique() {
        info!(%source, "Scraping source");
        match scrape_source(source, fetcher, config).await {
            Ok(listings) => {
                let fetched = listings.len();
                let kept = apply_filters(listings, &config.keywords, limit);
                let kept_count = kept.len();
                let report = merge_jobs(&mut store.jobs, kept);

                info!(
                    %source,
                    fetched,
                    kept = kept_count,
                    added = report.added,
                    duplicates = report.duplicates,
                    "Merged source listings"
                );
                summary.fetched += fetched;
                summary.added += report.added;
                summary.duplicates += report.duplicates;
                summary.completed.push(source.tag().to_string());
            }
            Err(e) => {
                error!(%source, error = %e, "Source failed; continuing with the rest");
                summary.failed.push(source.tag().to_string());
            }
        }
    }

    store.meta = StoreMeta {
        scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        total_fetched: summary.fetched,
        sources: summary.completed.clone(),
    };
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{lever, remoteok};
    use std::collections::HashMap;
    use std::error::Error;

    struct MapFetcher(HashMap<String, String>);

    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| format!("no fixture for {url}").into())
        }
    }

    const FEED: &str = r#"<rss><channel>
        <item><title>Rust Engineer</title><company>Globex</company>
            <link>https://remoteok.com/remote-jobs/1</link></item>
        <item><title>Go Engineer</title><company>Globex</company>
            <link>https://remoteok.com/remote-jobs/2</link></item>
    </channel></rss>"#;

    const BOARD: &str = r#"<div class="posting">
        <a class="posting-title" href="https://jobs.lever.co/initech/9"><h5>Rust Intern</h5></a>
    </div>"#;

    fn fetcher() -> MapFetcher {
        MapFetcher(HashMap::from([
            (remoteok::FEED_URL.to_string(), FEED.to_string()),
            (lever::board_url("initech"), BOARD.to_string()),
        ]))
    }

    fn config() -> ScraperConfig {
        ScraperConfig {
            lever_companies: vec!["initech".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_merges_sources_and_records_meta() {
        let mut store = JobStore::default();
        let summary = run(
            &fetcher(),
            &config(),
            &[Source::RemoteOk, Source::WeWorkRemotely, Source::Lever],
            None,
            &mut store,
        )
        .await;

        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.added, 3);
        assert_eq!(summary.completed, vec!["remoteok", "lever"]);
        assert_eq!(summary.failed, vec!["weworkremotely"]);
        assert_eq!(store.jobs.len(), 3);
        assert_eq!(store.meta.total_fetched, 3);
        assert_eq!(store.meta.sources, vec!["remoteok", "lever"]);
        assert!(!store.meta.scraped_at.is_empty());
    }

    #[tokio::test]
    async fn test_rerun_adds_nothing() {
        let mut store = JobStore::default();
        let sources = [Source::RemoteOk, Source::Lever];
        run(&fetcher(), &config(), &sources, None, &mut store).await;
        let second = run(&fetcher(), &config(), &sources, None, &mut store).await;

        assert_eq!(second.added, 0);
        assert_eq!(second.duplicates, 3);
        assert_eq!(store.jobs.len(), 3);
    }

    #[tokio::test]
    async fn test_keywords_limit_and_repeated_sources() {
        let mut store = JobStore::default();
        let mut config = config();
        config.keywords = vec!["rust".to_string()];

        let summary = run(
            &fetcher(),
            &config,
            &[Source::RemoteOk, Source::RemoteOk, Source::Lever],
            Some(1),
            &mut store,
        )
        .await;

        assert_eq!(summary.completed, vec!["remoteok", "lever"]);
        let titles: Vec<_> = store.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Rust Engineer", "Rust Intern"]);
    }
}
