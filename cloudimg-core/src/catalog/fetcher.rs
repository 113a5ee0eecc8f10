//! HTTP retrieval of the catalog document
//!
//! The fetcher issues a plain GET and treats "transfer completed" as
//! the sole success criterion: the HTTP status code is not inspected,
//! and a 4xx/5xx body is handed to the decoder like any other. Only
//! transport-level failures are retried, with a linear backoff.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::CatalogError;

/// Total attempts before a fetch is abandoned.
pub const DEFAULT_ATTEMPTS: u32 = 5;

/// Per-request transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the raw catalog text from a fixed URL.
pub struct Fetcher {
    url: String,
    attempts: u32,
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(url: impl Into<String>, timeout: Duration, attempts: u32) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cloudimg/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            url: url.into(),
            attempts,
            client,
        }
    }

    /// Fetch the catalog body as text.
    ///
    /// Transport failures are retried up to the configured attempt
    /// count; once exhausted, the last error surfaces as
    /// [`CatalogError::Fetch`].
    pub async fn fetch_text(&self) -> Result<String, CatalogError> {
        retry_with_backoff(self.attempts, || async {
            self.client.get(&self.url).send().await?.text().await
        })
        .await
        .map_err(|source| CatalogError::Fetch { source })
    }
}

/// Run `op` up to `attempts` times, sleeping `i` seconds after the
/// `i`-th failed attempt (1 s, 2 s, and so on). No sleep follows the final
/// failure; the last error is returned once attempts are exhausted.
async fn retry_with_backoff<T, E, F, Fut>(attempts: u32, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!("catalog fetch attempt {attempt}/{attempts} failed: {err}");
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
