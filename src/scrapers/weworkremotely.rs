//! WeWorkRemotely category feed scraper.
//!
//! [WeWorkRemotely](https://weworkremotely.com) publishes one RSS feed per
//! job category. Item titles read `Company: Job Title`, and the feed adds
//! `<region>` and `<type>` elements for location and employment type.
//!
//! # URL Pattern
//!
//! `https://weworkremotely.com/categories/<category>.rss`

use super::feed::{FeedItem, non_empty, parse_feed};
use super::scrape_pages;
use crate::http::Fetch;
use crate::models::{EXCERPT_CHARS, JobListing, ListingDraft};
use crate::parsing::text::{clean_text, excerpt, html_to_text, normalize_date};
use crate::parsing::{parse_employment_type, parse_salary};
use std::error::Error;
use tracing::instrument;

pub const SOURCE: &str = "weworkremotely";

/// Feed URL of a category slug.
pub fn feed_url(category: &str) -> String {
    format!(
        "https://weworkremotely.com/categories/{}.rss",
        urlencoding::encode(category)
    )
}

/// Scrape every configured category feed, one after another.
///
/// # Errors
///
/// Returns an error only when every feed failed.
#[instrument(level = "info", skip_all, fields(categories = categories.len()))]
pub async fn scrape<F: Fetch>(
    fetcher: &F,
    categories: &[String],
) -> Result<Vec<JobListing>, Box<dyn Error>> {
    let urls = categories.iter().map(|c| feed_url(c)).collect();
    scrape_pages(fetcher, SOURCE, urls, |body, _| parse_listings(body)).await
}

/// Parse a WeWorkRemotely RSS document into listings.
pub fn parse_listings(xml: &str) -> Result<Vec<JobListing>, Box<dyn Error>> {
    Ok(parse_feed(xml)?
        .into_iter()
        .filter_map(listing_from_item)
        .collect())
}

fn listing_from_item(item: FeedItem) -> Option<JobListing> {
    let raw_title = clean_text(&item.title);
    if raw_title.is_empty() {
        return None;
    }
    let (company, title) = split_company(&raw_title);

    let description_text = html_to_text(&item.description);
    let haystack = format!("{} {}", title, description_text);
    let employment_type = item
        .job_type
        .as_deref()
        .and_then(parse_employment_type)
        .or_else(|| parse_employment_type(&haystack));

    Some(
        ListingDraft {
            title,
            company,
            location: non_empty(item.region),
            url: non_empty(Some(item.link)),
            salary: parse_salary(&haystack),
            posted_date: item.pub_date.as_deref().and_then(normalize_date),
            employment_type,
            excerpt: excerpt(&item.description, EXCERPT_CHARS),
        }
        .into_listing(SOURCE),
    )
}

/// `"Acme Inc: Senior Engineer"` -> `(Some("Acme Inc"), "Senior Engineer")`.
fn split_company(raw_title: &str) -> (Option<String>, String) {
    match raw_title.split_once(':') {
        Some((company, title)) if !company.trim().is_empty() && !title.trim().is_empty() => {
            (Some(company.trim().to_string()), title.trim().to_string())
        }
        _ => (None, raw_title.to_string()),
    }
}
