//! Readiness polling ("wait-on")
//!
//! The deadline is measured from the first poll attempt. Every request is
//! bounded by the time left before the deadline and the pause between
//! attempts never sleeps past it, so a dead endpoint fails within the
//! timeout plus one retry interval.

use runway_core::{Error, Result};
use std::time::{Duration, Instant};
use url::Url;

/// Pause between failed attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

// Floor for a single request once the deadline is (almost) reached
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_millis(50);

/// Polls a URL until it answers or a timeout elapses
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    client: reqwest::Client,
    retry_interval: Duration,
}

impl ReadinessProbe {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("runway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network("http client", e.to_string()))?;
        Ok(Self {
            client,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        })
    }

    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Poll `url` until a 2xx/3xx response arrives.
    ///
    /// Connection errors, request timeouts and other statuses are retried
    /// until `timeout` has passed since the first attempt, after which
    /// [`Error::NetworkTimeout`] is returned. Returns the time waited.
    pub async fn wait_on(&self, url: &Url, timeout: Duration) -> Result<Duration> {
        tracing::info!(url = %url, timeout = ?timeout, "waiting for url to respond");
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let remaining = timeout.saturating_sub(started.elapsed());
            let request_timeout = remaining.max(MIN_REQUEST_TIMEOUT);

            let reason = match self
                .client
                .get(url.clone())
                .timeout(request_timeout)
                .send()
                .await
            {
                Ok(response)
                    if response.status().is_success() || response.status().is_redirection() =>
                {
                    let waited = started.elapsed();
                    tracing::info!(url = %url, attempt, waited = ?waited, "url responded");
                    return Ok(waited);
                }
                Ok(response) => format!("status {}", response.status()),
                Err(e) => e.to_string(),
            };

            let elapsed = started.elapsed();
            if elapsed > timeout {
                tracing::warn!(
                    url = %url,
                    attempt,
                    elapsed = ?elapsed,
                    reason = %reason,
                    "giving up waiting for url"
                );
                return Err(Error::network_timeout(url.as_str(), timeout));
            }

            tracing::debug!(url = %url, attempt, reason = %reason, "url not ready yet, retrying");
            let pause = self.retry_interval.min(timeout - elapsed);
            tokio::time::sleep(pause).await;
        }
    }
}
