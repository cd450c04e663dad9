//! Scraper configuration loaded from an optional YAML file.
//!
//! Every key has a default, so the file only needs the values a user wants
//! to change:
//!
//! ```yaml
//! greenhouse_boards: [acme, globex]
//! lever_companies: [initech]
//! min_delay_ms: 2000
//! max_delay_ms: 6000
//! keywords: [rust, backend]
//! ```

use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Runtime settings shared by the fetcher and the scrapers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// WeWorkRemotely category slugs, each served as `<slug>.rss`.
    pub weworkremotely_categories: Vec<String>,
    /// Greenhouse board tokens (`boards.greenhouse.io/<token>`).
    pub greenhouse_boards: Vec<String>,
    /// Lever company slugs (`jobs.lever.co/<slug>`).
    pub lever_companies: Vec<String>,
    /// User-Agent strings rotated across requests.
    pub user_agents: Vec<String>,
    /// Lower bound of the random pause before each request.
    pub min_delay_ms: u64,
    /// Upper bound of the random pause before each request.
    pub max_delay_ms: u64,
    /// Attempts per request, including the first one.
    pub max_attempts: usize,
    pub timeout_secs: u64,
    /// Keep only listings mentioning one of these words (case-insensitive).
    pub keywords: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            weworkremotely_categories: vec![
                "remote-back-end-programming-jobs".to_string(),
                "remote-full-stack-programming-jobs".to_string(),
                "remote-front-end-programming-jobs".to_string(),
            ],
            greenhouse_boards: Vec::new(),
            lever_companies: Vec::new(),
            user_agents: default_user_agents(),
            min_delay_ms: 1500,
            max_delay_ms: 4000,
            max_attempts: 3,
            timeout_secs: 30,
            keywords: Vec::new(),
        }
    }
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ScraperConfig {
    /// Parse a YAML document and repair values that would break a run.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: ScraperConfig = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.min_delay_ms > self.max_delay_ms {
            warn!(
                min = self.min_delay_ms,
                max = self.max_delay_ms,
                "min_delay_ms exceeds max_delay_ms; swapping"
            );
            std::mem::swap(&mut self.min_delay_ms, &mut self.max_delay_ms);
        }
        if self.max_attempts == 0 {
            warn!("max_attempts of 0 would never fetch anything; using 1");
            self.max_attempts = 1;
        }
        if self.timeout_secs == 0 {
            warn!("timeout_secs of 0 would fail every request; using 1");
            self.timeout_secs = 1;
        }
        self.user_agents.retain(|ua| !ua.trim().is_empty());
        if self.user_agents.is_empty() {
            self.user_agents = default_user_agents();
        }
        self
    }
}

/// Load the configuration, falling back to defaults when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<ScraperConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(ScraperConfig::default());
    };

    let yaml = fs::read_to_string(path).await?;
    let config = ScraperConfig::from_yaml(&yaml)?;
    info!(
        path,
        greenhouse_boards = config.greenhouse_boards.len(),
        lever_companies = config.lever_companies.len(),
        "Loaded configuration"
    );
    Ok(config)
}
