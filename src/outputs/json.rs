//! JSON persistence for the job store.
//!
//! The store is a single pretty-printed file:
//!
//! ```json
//! {
//!   "meta": { "scrapedAt": "2026-05-06T14:00:00Z", "totalFetched": 42, "sources": ["lever"] },
//!   "jobs": [ { "id": "lever:https://jobs.lever.co/acme/1", "title": "...", ... } ]
//! }
//! ```
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! crash mid-write never leaves the front-end with half a JSON document.

use crate::models::{JobListing, JobStore};
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Read the store at `path`.
///
/// A missing file is not an error: it yields an empty store, which is what
/// the very first run of a scraper starts from.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or does not
/// contain a valid store. Callers must not overwrite a store they failed to
/// read.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_store(path: &Path) -> Result<JobStore, Box<dyn Error>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("No existing job store; starting empty");
            return Ok(JobStore::default());
        }
        Err(e) => {
            error!(error = %e, "Failed to read job store");
            return Err(e.into());
        }
    };

    let mut store: JobStore = serde_json::from_str(&raw).map_err(|e| {
        error!(error = %e, "Job store is not valid JSON");
        e
    })?;
    store.jobs.iter_mut().for_each(JobListing::ensure_id);
    info!(jobs = store.jobs.len(), "Loaded job store");
    Ok(store)
}

/// Write `store` to `path` as pretty JSON, replacing any previous file.
///
/// The parent directory is created when missing.
#[instrument(level = "info", skip_all, fields(path = %path.display(), jobs = store.jobs.len()))]
pub async fn write_store(path: &Path, store: &JobStore) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(store)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create store directory");
            return Err(e.into());
        }
    }

    let tmp = temp_path(path);
    let replaced = async {
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await
    }
    .await;
    if let Err(e) = replaced {
        let _ = fs::remove_file(&tmp).await;
        error!(error = %e, "Failed to replace job store");
        return Err(e.into());
    }

    info!("Wrote job store");
    Ok(())
}

/// `data/jobs.json` -> `data/.jobs.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jobs.json".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
