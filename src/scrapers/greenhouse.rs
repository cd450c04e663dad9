//! Greenhouse job board scraper.
//!
//! Companies hosting their careers page on Greenhouse expose a public board
//! at `https://boards.greenhouse.io/<board>`. Two generations of markup are
//! in the wild and both are handled:
//!
//! - **Classic**: `div.opening` with an `a[href]` title and `span.location`,
//!   grouped under `section` elements headed by the department name
//! - **Current**: `tr.job-post` rows whose link wraps `p.body--medium`
//!   (title) and `p.body__secondary` (location), grouped under
//!   `div.job-posts--table--department`
//!
//! Board pages carry no salary or description, so listings get their
//! employment type from the title and their excerpt from department and
//! location.

use super::scrape_pages;
use crate::http::Fetch;
use crate::models::{EXCERPT_CHARS, JobListing, ListingDraft};
use crate::parsing::text::{clean_text, excerpt};
use crate::parsing::{parse_employment_type, parse_salary};
use crate::utils::title_from_slug;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, instrument, warn};
use url::Url;

pub const SOURCE: &str = "greenhouse";
const BOARD_BASE: &str = "https://boards.greenhouse.io";

/// Board URL of a Greenhouse board token.
pub fn board_url(board: &str) -> String {
    format!("{}/{}", BOARD_BASE, urlencoding::encode(board))
}

/// Scrape every configured board, one after another.
#[instrument(level = "info", skip_all, fields(boards = boards.len()))]
pub async fn scrape<F: Fetch>(
    fetcher: &F,
    boards: &[String],
) -> Result<Vec<JobListing>, Box<dyn Error>> {
    if boards.is_empty() {
        warn!("No Greenhouse boards configured; add greenhouse_boards to the config file");
        return Ok(Vec::new());
    }
    let urls = boards.iter().map(|b| board_url(b)).collect();
    scrape_pages(fetcher, SOURCE, urls, parse_board).await
}

/// Parse a Greenhouse board page fetched from `page_url`.
pub fn parse_board(html: &str, page_url: &str) -> Result<Vec<JobListing>, Box<dyn Error>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);

    let company = board_company(&document)?.unwrap_or_else(|| {
        let slug = base
            .path_segments()
            .and_then(|mut segments| segments.next())
            .unwrap_or_default();
        title_from_slug(slug)
    });

    let classic_selector = Selector::parse("div.opening")?;
    let current_selector = Selector::parse("tr.job-post")?;
    let link_selector = Selector::parse("a[href]")?;
    let classic_location_selector = Selector::parse("span.location")?;
    let current_title_selector = Selector::parse("p.body--medium")?;
    let current_location_selector = Selector::parse("p.body__secondary")?;
    let heading_selector = Selector::parse("h2, h3, h4")?;

    let mut listings = Vec::new();

    for opening in document.select(&classic_selector) {
        let Some(link) = opening.select(&link_selector).next() else {
            continue;
        };
        let title = clean_text(&link.text().collect::<String>());
        let location = opening
            .select(&classic_location_selector)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()));
        if let Some(listing) = build_listing(
            &base,
            &company,
            title,
            link.value().attr("href"),
            location,
            department(opening, &heading_selector),
        ) {
            listings.push(listing);
        }
    }

    for row in document.select(&current_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        // The title paragraph also holds a "New" badge; keep its first text node only.
        let title = row
            .select(&current_title_selector)
            .next()
            .and_then(|el| el.text().next())
            .map(clean_text)
            .unwrap_or_else(|| clean_text(&link.text().collect::<String>()));
        let location = row
            .select(&current_location_selector)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()));
        if let Some(listing) = build_listing(
            &base,
            &company,
            title,
            link.value().attr("href"),
            location,
            department(row, &heading_selector),
        ) {
            listings.push(listing);
        }
    }

    let listings: Vec<JobListing> = listings.into_iter().unique_by(|j| j.id.clone()).collect();
    debug!(count = listings.len(), %company, "Parsed Greenhouse board");
    Ok(listings)
}

fn build_listing(
    base: &Url,
    company: &str,
    title: String,
    href: Option<&str>,
    location: Option<String>,
    department: Option<String>,
) -> Option<JobListing> {
    if title.is_empty() {
        return None;
    }
    let url = href.and_then(|h| base.join(h).ok()).map(|u| u.to_string());
    let location = location.filter(|l| !l.is_empty());
    let summary = [department.as_deref(), location.as_deref()]
        .into_iter()
        .flatten()
        .join(" · ");
    let haystack = format!("{} {}", title, summary);

    Some(
        ListingDraft {
            salary: parse_salary(&title),
            employment_type: parse_employment_type(&haystack),
            excerpt: excerpt(&summary, EXCERPT_CHARS),
            title,
            company: Some(company.to_string()),
            location,
            url,
            posted_date: None,
        }
        .into_listing(SOURCE),
    )
}

/// Company name from the board header, e.g. `Current openings at Acme`.
fn board_company(document: &Html) -> Result<Option<String>, Box<dyn Error>> {
    let explicit = Selector::parse("#header .company-name, .company-name")?;
    if let Some(name) = document
        .select(&explicit)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .find(|name| !name.is_empty())
    {
        return Ok(Some(name));
    }

    let heading = Selector::parse("h1")?;
    Ok(document
        .select(&heading)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .find_map(|text| {
            text.rsplit_once(" at ")
                .map(|(_, name)| name.trim().to_string())
                .filter(|name| !name.is_empty())
        }))
}

/// Department heading of the nearest enclosing group, if any.
fn department(element: ElementRef<'_>, heading_selector: &Selector) -> Option<String> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            el.value().name() == "section"
                || el.value().classes().any(|c| c == "job-posts--table--department")
        })
        .find_map(|group| group.select(heading_selector).next())
        .map(|h| clean_text(&h.text().collect::<String>()))
        .filter(|name| !name.is_empty())
}
