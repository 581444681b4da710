//! Bounded-retry fetch with linear backoff.

use std::time::Duration;

use crate::error::LoadError;
use crate::fetch::Fetch;

/// Retry policy for transport failures: up to `max_attempts` fetches with
/// a delay of `attempt * base_delay` between them.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `completed_attempts` failures:
    /// 1s after the first, 2s after the second, and so on.
    pub fn delay_for(&self, completed_attempts: u32) -> Duration {
        self.base_delay * completed_attempts
    }
}

/// Fetch `url`, retrying transport failures per `policy`. A reachable
/// server answering with a non-2xx status fails immediately; only
/// timeouts and connection errors are worth retrying.
pub async fn fetch_with_retry(
    fetcher: &dyn Fetch,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, LoadError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        log::debug!("fetching {url} (attempt {attempt}/{})", policy.max_attempts);
        match fetcher.get(url).await {
            Ok(response) if response.is_success() => return Ok(response.body),
            Ok(response) => return Err(LoadError::HttpStatus(response.status)),
            Err(err) if err.is_transport() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                log::warn!("transport failure ({err}); retrying in {delay:?}");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
