//! HTTP fetching with polite pacing and a fixed retry budget.
//!
//! # Architecture
//!
//! - [`Fetch`]: Core trait, "give me the body of this URL"
//! - [`HttpFetcher`]: reqwest-backed implementation that rotates request
//!   headers and sleeps a random delay before every request
//! - [`RetryFetch`]: Decorator that retries any [`Fetch`] a fixed number of
//!   times with exponential backoff and jitter
//!
//! Scrapers only see the trait, which lets tests feed them canned pages.
//!
//! # Retry Strategy
//!
//! - `max_attempts` from the config (3 by default), first try included
//! - Exponential backoff starting at 2 seconds, capped at 30 seconds
//! - Random jitter (0-250ms) on top

use crate::config::ScraperConfig;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/rss+xml;q=0.9,*/*;q=0.8";

/// Trait for fetching the body of a URL as text.
pub trait Fetch {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Network failures, timeouts and non-success HTTP statuses.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// reqwest-backed fetcher with randomized delays and rotating User-Agents.
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    min_delay: StdDuration,
    max_delay: StdDuration,
}

impl HttpFetcher {
    /// Build a fetcher from the scraper configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (e.g. TLS backend initialization failure).
    pub fn new(config: &ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            user_agents: config.user_agents.clone(),
            min_delay: StdDuration::from_millis(config.min_delay_ms),
            max_delay: StdDuration::from_millis(config.max_delay_ms),
        })
    }

    /// Pick this request's pause and User-Agent.
    fn plan_request(&self) -> (StdDuration, &str) {
        let mut r = rng();
        let delay = if self.max_delay > self.min_delay {
            r.random_range(self.min_delay..=self.max_delay)
        } else {
            self.min_delay
        };
        let user_agent = self
            .user_agents
            .choose(&mut r)
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0");
        (delay, user_agent)
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("user_agents", &self.user_agents.len())
            .field("min_delay", &self.min_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let (delay, user_agent) = self.plan_request();
        debug!(?delay, user_agent, "Pausing before request");
        sleep(delay).await;

        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that retries any [`Fetch`] implementation with exponential backoff.
///
/// The delay between attempts follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    /// Total attempts, first try included.
    max_attempts: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: Fetch,
{
    pub fn new(inner: T, max_attempts: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Fetch for RetryFetch<T>
where
    T: Fetch,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() exhausted attempts"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Build the fetcher used by a scraping run.
pub fn build_fetcher(config: &ScraperConfig) -> Result<RetryFetch<HttpFetcher>, Box<dyn Error>> {
    let http = HttpFetcher::new(config)?;
    Ok(RetryFetch::new(http, config.max_attempts, StdDuration::from_secs(2)))
}
