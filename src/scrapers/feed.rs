//! RSS 2.0 feed deserialization shared by the aggregator scrapers.
//!
//! Only the fields the scrapers read are declared; everything else in a
//! feed (images, guids, namespaced extensions) is ignored. Job aggregators
//! extend the standard item with their own elements such as `company`,
//! `region` or `type`, which are declared here as optional.

use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

/// One `<item>` of a job feed.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// HTML fragment, already unescaped from the XML.
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

/// Parse an RSS document into its items.
///
/// # Errors
///
/// Returns an error when the document is not RSS with a `<channel>`.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let rss: Rss = quick_xml::de::from_str(xml.trim_start_matches('\u{feff}').trim_start())?;
    Ok(rss.channel.items)
}

/// Treat empty or whitespace-only optional text as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| crate::parsing::text::clean_text(&v))
        .filter(|v| !v.is_empty())
}
