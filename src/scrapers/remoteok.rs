//! RemoteOK feed scraper.
//!
//! [RemoteOK](https://remoteok.com) is an aggregator with a single RSS feed
//! of recent remote jobs. Items carry `<company>` and `<location>`
//! elements; salary, when present, lives in the description text.

use super::feed::{FeedItem, non_empty, parse_feed};
use super::scrape_pages;
use crate::http::Fetch;
use crate::models::{EXCERPT_CHARS, JobListing, ListingDraft};
use crate::parsing::text::{clean_text, excerpt, html_to_text, normalize_date};
use crate::parsing::{parse_employment_type, parse_salary};
use std::error::Error;
use tracing::instrument;

pub const SOURCE: &str = "remoteok";
pub const FEED_URL: &str = "https://remoteok.com/remote-jobs.rss";

/// Scrape the RemoteOK feed.
#[instrument(level = "info", skip_all)]
pub async fn scrape<F: Fetch>(fetcher: &F) -> Result<Vec<JobListing>, Box<dyn Error>> {
    scrape_pages(fetcher, SOURCE, vec![FEED_URL.to_string()], |body, _| {
        parse_listings(body)
    })
    .await
}

/// Parse a RemoteOK RSS document into listings.
pub fn parse_listings(xml: &str) -> Result<Vec<JobListing>, Box<dyn Error>> {
    Ok(parse_feed(xml)?
        .into_iter()
        .filter_map(listing_from_item)
        .collect())
}

fn listing_from_item(item: FeedItem) -> Option<JobListing> {
    let title = clean_text(&item.title);
    if title.is_empty() {
        return None;
    }

    let description_text = html_to_text(&item.description);
    let haystack = format!("{} {}", title, description_text);

    Some(
        ListingDraft {
            salary: parse_salary(&haystack),
            employment_type: parse_employment_type(&haystack),
            title,
            company: non_empty(item.company),
            location: non_empty(item.location),
            url: non_empty(Some(item.link)),
            posted_date: item.pub_date.as_deref().and_then(normalize_date),
            excerpt: excerpt(&item.description, EXCERPT_CHARS),
        }
        .into_listing(SOURCE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentType, SalaryType};
    use std::cell::RefCell;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Remote OK</title>
    <item>
      <title>Backend Engineer</title>
      <company>Globex</company>
      <location>Europe</location>
      <tags>rust,backend</tags>
      <link>https://remoteok.com/remote-jobs/remote-backend-engineer-globex-123?ref=rss</link>
      <description><![CDATA[<p>Part-time role, $45 - $60 per hour.</p>]]></description>
      <pubDate>2024-05-13T10:11:12+00:00</pubDate>
    </item>
    <item>
      <title>Data Engineer</title>
      <company></company>
      <link>https://remoteok.com/remote-jobs/remote-data-engineer-456</link>
      <description>Competitive pay</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_listings() {
        let jobs = parse_listings(FEED).unwrap();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.company, "Globex");
        assert_eq!(first.location, "Europe");
        assert_eq!(first.employment_type, Some(EmploymentType::PartTime));
        assert_eq!(first.posted_date.as_deref(), Some("2024-05-13"));
        assert_eq!(
            first.id,
            "remoteok:https://remoteok.com/remote-jobs/remote-backend-engineer-globex-123"
        );
        let salary = first.salary.as_ref().unwrap();
        assert_eq!((salary.min, salary.max, salary.kind), (45.0, 60.0, SalaryType::Hourly));

        let second = &jobs[1];
        assert_eq!(second.company, "Unknown");
        assert!(second.salary.is_none());
        assert!(second.employment_type.is_none());
        assert!(second.posted_date.is_none());
    }

    struct CannedFetcher {
        body: String,
        requested: RefCell<Vec<String>>,
    }

    impl Fetch for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.requested.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    #[tokio::test]
    async fn test_scrape_fetches_feed() {
        let fetcher = CannedFetcher {
            body: FEED.to_string(),
            requested: RefCell::new(Vec::new()),
        };
        let jobs = scrape(&fetcher).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(*fetcher.requested.borrow(), vec![FEED_URL.to_string()]);
    }
}
