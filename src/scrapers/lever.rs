//! Lever job board scraper.
//!
//! Lever hosts careers pages at `https://jobs.lever.co/<company>`. Each
//! posting is a `div.posting` whose `a.posting-title` links to the job and
//! holds the title (`h5`) plus category spans for location, team,
//! commitment (`Full-time`, `Contract`, ...) and workplace type.

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

pub const SOURCE: &str = "lever";
const BOARD_BASE: &str = "https://jobs.lever.co";

/// Board URL of a Lever company slug.
pub fn board_url(company: &str) -> String {
    format!("{}/{}", BOARD_BASE, urlencoding::encode(company))
}

/// Scrape every configured company board, one after another.
#[instrument(level = "info", skip_all, fields(companies = companies.len()))]
pub async fn scrape<F: Fetch>(
    fetcher: &F,
    companies: &[String],
) -> Result<Vec<JobListing>, Box<dyn Error>> {
    if companies.is_empty() {
        warn!("No Lever companies configured; add lever_companies to the config file");
        return Ok(Vec::new());
    }
    let urls = companies.iter().map(|c| board_url(c)).collect();
    scrape_pages(fetcher, SOURCE, urls, parse_board).await
}

/// Parse a Lever board page fetched from `page_url`.
pub fn parse_board(html: &str, page_url: &str) -> Result<Vec<JobListing>, Box<dyn Error>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let slug = base
        .path_segments()
        .and_then(|mut segments| segments.next())
        .unwrap_or_default();
    let company = title_from_slug(slug);

    let posting_selector = Selector::parse("div.posting")?;
    let link_selector = Selector::parse("a.posting-title[href]")?;
    let name_selector = Selector::parse("h5, [data-qa=posting-name]")?;
    let location_selector = Selector::parse(".sort-by-location, .location")?;
    let team_selector = Selector::parse(".sort-by-team, .department")?;
    let commitment_selector = Selector::parse(".sort-by-commitment, .commitment")?;
    let workplace_selector = Selector::parse(".workplaceTypes")?;

    let first_text = |el: ElementRef<'_>, selector: &Selector| -> Option<String> {
        el.select(selector)
            .next()
            .map(|found| clean_text(&found.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    };

    let listings: Vec<JobListing> = document
        .select(&posting_selector)
        .filter_map(|posting| {
            let link = posting.select(&link_selector).next()?;
            let title = first_text(link, &name_selector)?;
            let url = link
                .value()
                .attr("href")
                .and_then(|href| base.join(href).ok())
                .map(|u| u.to_string());

            let location = first_text(posting, &location_selector);
            let team = first_text(posting, &team_selector);
            let commitment = first_text(posting, &commitment_selector);
            let workplace = first_text(posting, &workplace_selector);

            let employment_type = commitment
                .as_deref()
                .and_then(parse_employment_type)
                .or_else(|| parse_employment_type(&title));
            let summary = [&team, &commitment, &workplace]
                .into_iter()
                .flatten()
                .join(" · ");

            Some(
                ListingDraft {
                    salary: parse_salary(&format!("{} {}", title, summary)),
                    excerpt: excerpt(&summary, EXCERPT_CHARS),
                    title,
                    company: Some(company.clone()),
                    location,
                    url,
                    posted_date: None,
                    employment_type,
                }
                .into_listing(SOURCE),
            )
        })
        .unique_by(|j| j.id.clone())
        .collect();

    debug!(count = listings.len(), %company, "Parsed Lever board");
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmploymentType;

    const BOARD: &str = r##"<html><body>
<div class="postings-group">
  <div class="posting-category-title large-category-label">Engineering</div>
  <div class="posting" data-qa-posting-id="abc-123">
    <div class="posting-apply" data-qa="btn-apply">
      <a href="https://jobs.lever.co/initech/abc-123/apply" class="posting-btn-submit">Apply</a>
    </div>
    <a class="posting-title" href="https://jobs.lever.co/initech/abc-123">
      <h5 data-qa="posting-name">Platform Engineer</h5>
      <div class="posting-categories">
        <span href="#" class="sort-by-location posting-category small-category-label location">Remote - Canada</span>
        <span href="#" class="sort-by-team posting-category small-category-label department">Engineering – Platform</span>
        <span href="#" class="sort-by-commitment posting-category small-category-label commitment">Contract</span>
        <span class="display-inline-block small-category-label workplaceTypes">Remote</span>
      </div>
    </a>
  </div>
  <div class="posting" data-qa-posting-id="def-456">
    <a class="posting-title" href="/initech/def-456">
      <h5 data-qa="posting-name">Office Manager</h5>
      <div class="posting-categories">
        <span class="sort-by-location posting-category">Toronto</span>
      </div>
    </a>
  </div>
  <div class="posting"><a class="posting-title" href="/initech/ghi"><h5> </h5></a></div>
</div>
</body></html>"##;

    #[test]
    fn test_parse_board() {
        let jobs = parse_board(BOARD, "https://jobs.lever.co/initech").unwrap();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.title, "Platform Engineer");
        assert_eq!(first.company, "Initech");
        assert_eq!(first.location, "Remote - Canada");
        assert_eq!(first.url, "https://jobs.lever.co/initech/abc-123");
        assert_eq!(first.employment_type, Some(EmploymentType::Contract));
        assert_eq!(first.excerpt, "Engineering – Platform · Contract · Remote");

        let second = &jobs[1];
        assert_eq!(second.url, "https://jobs.lever.co/initech/def-456");
        assert_eq!(second.location, "Toronto");
        assert!(second.employment_type.is_none());
        assert_eq!(second.excerpt, "");
    }

    #[test]
    fn test_board_url() {
        assert_eq!(board_url("initech"), "https://jobs.lever.co/initech");
    }
}
