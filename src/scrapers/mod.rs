//! Job source scrapers.
//!
//! Each submodule knows one site. They all follow the same shape:
//!
//! 1. **Fetching**: Download one page or feed per configured category/board
//! 2. **Parsing**: A pure `parse_*` function turns the body into [`JobListing`]s
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | WeWorkRemotely | [`weworkremotely`] | RSS | One feed per category |
//! | RemoteOK | [`remoteok`] | RSS | Single aggregate feed |
//! | Greenhouse | [`greenhouse`] | HTML scraping | One board per configured company |
//! | Lever | [`lever`] | HTML scraping | One board per configured company |
//!
//! Pages are fetched strictly one after another; the fetcher's randomized
//! delay is the only pacing. A page that fails to fetch or parse is logged
//! and skipped. A source only fails as a whole when every page failed.

pub mod feed;
pub mod greenhouse;
pub mod lever;
pub mod remoteok;
pub mod weworkremotely;

use crate::config::ScraperConfig;
use crate::http::Fetch;
use crate::models::JobListing;
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::fmt;
use tracing::{error, info, instrument, warn};

/// A scrapable job source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Source {
    #[value(name = "weworkremotely")]
    WeWorkRemotely,
    #[value(name = "remoteok")]
    RemoteOk,
    #[value(name = "greenhouse")]
    Greenhouse,
    #[value(name = "lever")]
    Lever,
}

impl Source {
    /// Every source, in the order a default run visits them.
    pub const ALL: [Source; 4] = [
        Source::WeWorkRemotely,
        Source::RemoteOk,
        Source::Greenhouse,
        Source::Lever,
    ];

    /// Tag stored on each listing and in the store metadata.
    pub fn tag(self) -> &'static str {
        match self {
            Source::WeWorkRemotely => weworkremotely::SOURCE,
            Source::RemoteOk => remoteok::SOURCE,
            Source::Greenhouse => greenhouse::SOURCE,
            Source::Lever => lever::SOURCE,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Run the scraper for `source`.
pub async fn scrape_source<F: Fetch>(
    source: Source,
    fetcher: &F,
    config: &ScraperConfig,
) -> Result<Vec<JobListing>, Box<dyn Error>> {
    match source {
        Source::WeWorkRemotely => {
            weworkremotely::scrape(fetcher, &config.weworkremotely_categories).await
        }
        Source::RemoteOk => remoteok::scrape(fetcher).await,
        Source::Greenhouse => greenhouse::scrape(fetcher, &config.greenhouse_boards).await,
        Source::Lever => lever::scrape(fetcher, &config.lever_companies).await,
    }
}

/// Fetch and parse `urls` sequentially, skipping pages that fail.
///
/// `parse` receives the page body and the URL it came from.
///
/// # Errors
///
/// Returns an error when at least one page was requested and none succeeded.
#[instrument(level = "info", skip(fetcher, urls, parse), fields(pages = urls.len()))]
pub(crate) async fn scrape_pages<F, P>(
    fetcher: &F,
    source: &str,
    urls: Vec<String>,
    parse: P,
) -> Result<Vec<JobListing>, Box<dyn Error>>
where
    F: Fetch,
    P: Fn(&str, &str) -> Result<Vec<JobListing>, Box<dyn Error>>,
{
    if urls.is_empty() {
        warn!(source, "No pages to scrape");
        return Ok(Vec::new());
    }

    let requested = urls.len();
    let parse = &parse;
    let pages: Vec<Option<Vec<JobListing>>> = stream::iter(urls)
        .then(|url: String| async move {
            let body = match fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    error!(source, %url, error = %e, "Fetch failed; skipping page");
                    return None;
                }
            };
            match parse(&body, &url) {
                Ok(listings) => {
                    info!(source, %url, count = listings.len(), "Parsed page");
                    Some(listings)
                }
                Err(e) => {
                    error!(
                        source,
                        %url,
                        error = %e,
                        body_preview = %truncate_for_log(&body, 300),
                        "Page did not parse; skipping"
                    );
                    None
                }
            }
        })
        .collect()
        .await;

    let succeeded = pages.iter().filter(|p| p.is_some()).count();
    if succeeded == 0 {
        return Err(format!("all {} {} page(s) failed", requested, source).into());
    }

    let listings: Vec<JobListing> = pages.into_iter().flatten().flatten().collect();
    info!(
        source,
        pages = requested,
        failed = requested - succeeded,
        count = listings.len(),
        "Scraped source"
    );
    Ok(listings)
}

/// Keep listings matching any keyword, then cap the count.
///
/// Keywords match case-insensitively against title, company and excerpt.
/// An empty keyword list keeps everything.
pub fn apply_filters(
    listings: Vec<JobListing>,
    keywords: &[String],
    limit: Option<usize>,
) -> Vec<JobListing> {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    listings
        .into_iter()
        .filter(|job| {
            if keywords.is_empty() {
                return true;
            }
            let haystack =
                format!("{} {} {}", job.title, job.company, job.excerpt).to_lowercase();
            keywords.iter().any(|k| haystack.contains(k.as_str()))
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingDraft;
    use std::collections::HashMap;

    /// Serves canned bodies by URL; unknown URLs fail like a 404 would.
    struct MapFetcher(HashMap<String, String>);

    impl Fetch for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| format!("404 for {url}").into())
        }
    }

    fn job(title: &str, excerpt: &str) -> JobListing {
        ListingDraft {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            ..Default::default()
        }
        .into_listing("test")
    }

    const LEVER_PAGE: &str = r#"<div class="posting">
        <a class="posting-title" href="https://jobs.lever.co/initech/1"><h5>Rust Developer</h5></a>
    </div>"#;

    #[tokio::test]
    async fn test_scrape_pages_skips_failed_pages() {
        let fetcher = MapFetcher(HashMap::from([(
            lever::board_url("initech"),
            LEVER_PAGE.to_string(),
        )]));
        let companies = vec!["initech".to_string(), "missing".to_string()];

        let jobs = lever::scrape(&fetcher, &companies).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Rust Developer");
    }

    #[tokio::test]
    async fn test_scrape_pages_fails_when_every_page_fails() {
        let fetcher = MapFetcher(HashMap::new());
        let config = ScraperConfig::default();
        let err = scrape_source(Source::WeWorkRemotely, &fetcher, &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("all 3 weworkremotely page(s) failed"));
    }

    #[tokio::test]
    async fn test_unconfigured_board_source_is_empty() {
        let fetcher = MapFetcher(HashMap::new());
        let config = ScraperConfig::default();
        let jobs = scrape_source(Source::Greenhouse, &fetcher, &config).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_apply_filters_keywords() {
        let jobs = vec![
            job("Senior Rust Engineer", ""),
            job("Designer", "Figma, some RUST welcome"),
            job("Accountant", ""),
        ];
        let kept = apply_filters(jobs, &["rust".to_string(), " ".to_string()], None);
        let titles: Vec<_> = kept.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Senior Rust Engineer", "Designer"]);
    }

    #[test]
    fn test_apply_filters_limit() {
        let jobs = vec![job("A", ""), job("B", ""), job("C", "")];
        assert_eq!(apply_filters(jobs.clone(), &[], Some(2)).len(), 2);
        assert_eq!(apply_filters(jobs, &[], None).len(), 3);
    }

    #[test]
    fn test_source_tags() {
        assert_eq!(Source::WeWorkRemotely.to_string(), "weworkremotely");
        assert_eq!(Source::ALL.map(Source::tag), ["weworkremotely", "remoteok", "greenhouse", "lever"]);
        assert_eq!(
            Source::from_str("remoteok", true).unwrap(),
            Source::RemoteOk
        );
    }
}
