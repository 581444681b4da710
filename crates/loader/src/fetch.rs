//! The network capability the loader runs against. Production code uses
//! [`HttpFetcher`]; tests inject scripted implementations.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::LoadError;

/// Fixed per-request timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw response: status code plus body text. The loader judges the status
/// itself rather than trusting the client's error mapping.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub type FetchFuture = Pin<Box<dyn Future<Output = Result<FetchResponse, LoadError>> + Send>>;

/// GET-style fetch capability. Implementations only report transport
/// failures as `Err`; an HTTP error status is a successful fetch.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> FetchFuture;
}

/// reqwest-backed fetcher with the fixed timeout baked in.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| LoadError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> FetchFuture {
        let client = self.client.clone();
        let url = url.to_owned();
        Box::pin(async move {
            let response = client.get(&url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(FetchResponse { status, body })
        })
    }
}
