//! Deduplicating merge of freshly scraped listings into the stored collection.
//!
//! The store is append-only: existing listings are never updated or
//! reordered, and a new listing only gets in when its source-qualified
//! identifier has not been seen yet.

use crate::models::JobListing;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Outcome of a [`merge_jobs`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Listings appended to the collection.
    pub added: usize,
    /// Incoming listings dropped because their id was already known.
    pub duplicates: usize,
}

/// Append `incoming` listings to `existing`, skipping known identifiers.
///
/// The identifier set starts from `existing` and grows as listings are
/// appended, so a duplicate later in the same batch is suppressed too.
/// Merging the same batch twice adds nothing the second time.
///
/// # Arguments
///
/// * `existing` - The stored collection, extended in place
/// * `incoming` - Listings from the current run, in scrape order
///
/// # Returns
///
/// A [`MergeReport`] with the number of added and skipped listings.
#[instrument(level = "debug", skip_all, fields(existing = existing.len(), incoming = incoming.len()))]
pub fn merge_jobs(existing: &mut Vec<JobListing>, incoming: Vec<JobListing>) -> MergeReport {
    let mut known: HashSet<String> = existing.iter().map(|job| job.id.clone()).collect();
    let mut report = MergeReport::default();

    for job in incoming {
        if known.insert(job.id.clone()) {
            existing.push(job);
            report.added += 1;
        } else {
            debug!(id = %job.id, "Skipping duplicate listing");
            report.duplicates += 1;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingDraft;

    fn job(source: &str, url: &str, title: &str) -> JobListing {
        ListingDraft {
            title: title.to_string(),
            url: Some(url.to_string()),
            ..Default::default()
        }
        .into_listing(source)
    }

    #[test]
    fn test_merge_appends_new_listings_in_order() {
        let mut existing = vec![job("lever", "https://jobs.lever.co/a/1", "One")];
        let report = merge_jobs(
            &mut existing,
            vec![
                job("lever", "https://jobs.lever.co/a/2", "Two"),
                job("lever", "https://jobs.lever.co/a/3", "Three"),
            ],
        );

        assert_eq!(report, MergeReport { added: 2, duplicates: 0 });
        let titles: Vec<_> = existing.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_merge_never_updates_existing() {
        let mut existing = vec![job("lever", "https://jobs.lever.co/a/1", "Original")];
        let report = merge_jobs(
            &mut existing,
            vec![job("lever", "https://jobs.lever.co/a/1?utm_source=x", "Renamed")],
        );

        assert_eq!(report, MergeReport { added: 0, duplicates: 1 });
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].title, "Original");
    }

    #[test]
    fn test_merge_suppresses_duplicates_within_batch() {
        let mut existing = Vec::new();
        let report = merge_jobs(
            &mut existing,
            vec![
                job("remoteok", "https://remoteok.com/remote-jobs/1", "A"),
                job("remoteok", "https://remoteok.com/remote-jobs/1/", "A again"),
                job("remoteok", "https://remoteok.com/remote-jobs/2", "B"),
            ],
        );

        assert_eq!(report, MergeReport { added: 2, duplicates: 1 });
        assert_eq!(existing[0].title, "A");
    }

    #[test]
    fn test_same_url_from_different_sources_is_kept() {
        let mut existing = vec![job("weworkremotely", "https://example.com/jobs/1", "A")];
        let report = merge_jobs(&mut existing, vec![job("remoteok", "https://example.com/jobs/1", "A")]);
        assert_eq!(report.added, 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let batch = vec![
            job("greenhouse", "https://boards.greenhouse.io/acme/jobs/1", "A"),
            job("greenhouse", "https://boards.greenhouse.io/acme/jobs/2", "B"),
        ];
        let mut existing = Vec::new();

        let first = merge_jobs(&mut existing, batch.clone());
        let snapshot = existing.clone();
        let second = merge_jobs(&mut existing, batch);

        assert_eq!(first.added, 2);
        assert_eq!(second, MergeReport { added: 0, duplicates: 2 });
        assert_eq!(existing, snapshot);

        let ids: HashSet<_> = existing.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), existing.len());
    }
}
