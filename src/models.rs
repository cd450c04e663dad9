//! Data models for scraped job listings and the persisted job store.
//!
//! This module defines the core data structures used throughout the application:
//! - [`JobListing`]: A single scraped posting, normalized across sources
//! - [`Salary`] / [`SalaryType`]: Structured pay extracted from free-form text
//! - [`EmploymentType`]: Full-time, part-time, contract and friends
//! - [`JobStore`] / [`StoreMeta`]: The JSON file consumed by the job board front-end
//!
//! Field names are serialized in camelCase to match what the front-end reads.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Longest excerpt kept on a listing, in characters.
pub const EXCERPT_CHARS: usize = 200;

/// A single job posting as scraped from one source.
///
/// Listings are identified by [`JobListing::id`], a source-qualified key
/// built by [`listing_id`]. Two listings with the same id are the same
/// posting, no matter what the other fields say.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Source-qualified identifier, e.g. `lever:https://jobs.lever.co/acme/1234`.
    ///
    /// Stores written by older runs may lack it; [`JobListing::ensure_id`]
    /// rebuilds it on load.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Absolute URL of the posting. May be empty when a source gave no link.
    pub url: String,
    pub salary: Option<Salary>,
    /// Posting date normalized to `YYYY-MM-DD`.
    pub posted_date: Option<String>,
    pub employment_type: Option<EmploymentType>,
    /// Tag of the scraper that produced this listing.
    pub source: String,
    /// Plain-text teaser of the description.
    #[serde(default)]
    pub excerpt: String,
}

impl JobListing {
    /// Fill in a missing identifier from the listing's own fields.
    pub fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = listing_id(&self.source, &self.url, &self.title, &self.company, &self.location);
        }
    }
}

/// Fields gathered by a scraper before the listing gets its identifier.
#[derive(Debug, Default, Clone)]
pub struct ListingDraft {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub salary: Option<Salary>,
    pub posted_date: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub excerpt: String,
}

impl ListingDraft {
    /// Finish the draft into a [`JobListing`] tagged with `source`.
    ///
    /// Missing company falls back to `"Unknown"`, missing location to `"Remote"`.
    pub fn into_listing(self, source: &str) -> JobListing {
        let company = self
            .company
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let location = self
            .location
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "Remote".to_string());
        let url = self.url.unwrap_or_default();
        let id = listing_id(source, &url, &self.title, &company, &location);

        JobListing {
            id,
            title: self.title,
            company,
            location,
            url,
            salary: self.salary,
            posted_date: self.posted_date,
            employment_type: self.employment_type,
            source: source.to_string(),
            excerpt: self.excerpt,
        }
    }
}

/// Query parameters that only track where a click came from.
const TRACKING_PARAMS: [&str; 3] = ["gh_src", "ref", "lever-source"];

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Build the source-qualified identifier of a listing.
///
/// The key is the URL without tracking parameters (`utm_*`, `gh_src`, `ref`,
/// `lever-source`), fragment or trailing path slash. Other query parameters
/// stay, since boards such as `careers/?gh_jid=123` tell openings apart by
/// them. Listings without a URL fall back to the lowercased
/// `title|company|location` composite.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     listing_id("lever", "https://jobs.lever.co/acme/42?lever-source=x", "", "", ""),
///     "lever:https://jobs.lever.co/acme/42"
/// );
/// ```
pub fn listing_id(source: &str, url: &str, title: &str, company: &str, location: &str) -> String {
    let key = match Url::parse(url.trim()) {
        Ok(parsed) => url_key(parsed),
        Err(_) => format!("{}|{}|{}", title.trim(), company.trim(), location.trim()).to_lowercase(),
    };
    format!("{}:{}", source, key)
}

fn url_key(mut url: Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&kept);
    }
    url.set_fragment(None);

    let path = url.path().trim_end_matches('/').to_string();
    if !path.is_empty() {
        url.set_path(&path);
    }
    url.as_str().trim_end_matches('/').to_string()
}

/// Whether a salary figure is paid per hour or per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Annual,
}

/// A pay range extracted from listing text.
///
/// A single figure is stored with `min == max`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Salary {
    pub min: f64,
    pub max: f64,
    #[serde(rename = "type")]
    pub kind: SalaryType,
    /// Human-readable form, e.g. `$25 - $30/hr`.
    pub display: String,
}

impl Salary {
    /// Build a salary, ordering the bounds and rendering the display string.
    pub fn new(a: f64, b: f64, kind: SalaryType) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let unit = match kind {
            SalaryType::Hourly => "hr",
            SalaryType::Annual => "yr",
        };
        let display = if min == max {
            format!("{}/{}", format_dollars(min), unit)
        } else {
            format!("{} - {}/{}", format_dollars(min), format_dollars(max), unit)
        };
        Salary {
            min,
            max,
            kind,
            display,
        }
    }

    /// A single figure, not a range.
    pub fn single(value: f64, kind: SalaryType) -> Self {
        Self::new(value, value, kind)
    }
}

/// Render a dollar figure with thousands separators and cents only when needed.
fn format_dollars(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac == 0 {
        format!("${}", grouped)
    } else {
        format!("${}.{:02}", grouped, frac)
    }
}

/// Kind of employment advertised by a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Temporary => "Temporary",
            EmploymentType::Internship => "Internship",
        };
        f.write_str(label)
    }
}

/// Metadata describing the run that last wrote the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMeta {
    /// RFC 3339 UTC timestamp.
    pub scraped_at: String,
    /// Listings fetched by that run, before deduplication.
    pub total_fetched: usize,
    /// Tags of the sources that completed in that run.
    pub sources: Vec<String>,
}

/// The persisted collection read by the job board front-end.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct JobStore {
    pub meta: StoreMeta,
    pub jobs: Vec<JobListing>,
}
