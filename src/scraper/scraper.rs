// scraper.rs
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const MAX_BACKOFF_SECS: u64 = 10;
const JITTER_MAX_SECS: u64 = 2;

/// Anything that can hand back the HTML of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, ScraperError>;
}

/// Fetches pages over HTTP with retries.
pub struct HttpPageSource {
    client: Client,
    max_attempts: u64,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, max_attempts: u64) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
        })
    }

    fn try_fetch(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text()?)
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            let start = Instant::now();

            match self.try_fetch(url) {
                Ok(html) => {
                    debug!(url, attempt, elapsed = ?start.elapsed(), "fetched page");
                    return Ok(html);
                }
                Err(e) => {
                    warn!(url, attempt, elapsed = ?start.elapsed(), "fetch failed: {e}");

                    // 404s won't get better by waiting
                    if matches!(e, ScraperError::HttpStatus { status: 404, .. }) {
                        return Err(e);
                    }

                    last_err = Some(e);

                    if attempt < self.max_attempts {
                        std::thread::sleep(backoff(attempt));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop failed".into())))
    }
}

fn backoff(attempt: u64) -> Duration {
    let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
    Duration::from_secs(base + jitter)
}
