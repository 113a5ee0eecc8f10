//! Public query surface over the remote catalog

use std::time::Duration;

use chrono::Local;
use tracing::debug;

use super::fetcher::{Fetcher, DEFAULT_ATTEMPTS, DEFAULT_TIMEOUT};
use super::release::{extract_releases, Release};
use super::stream::Catalog;
use crate::error::CatalogError;

/// Published Ubuntu released-download stream.
pub const DEFAULT_CATALOG_URL: &str =
    "https://cloud-images.ubuntu.com/releases/streams/v1/com.ubuntu.cloud:released:download.json";

/// Sentinel for the two expected "not found" outcomes: no current LTS
/// release, or no digest match for a requested date. A normal return
/// value, not an error; callers compare against the literal.
pub const UNKNOWN: &str = "unknown";

/// Client for the release catalog.
///
/// Each query performs its own fetch-decode-filter cycle; the client
/// holds configuration only, so it is cheap to construct and reuse.
pub struct CatalogClient {
    url: String,
    timeout: Duration,
    attempts: u32,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Client for the default published catalog URL.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Override the catalog URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the per-request transport timeout (default: 30 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the total fetch attempts (default: 5).
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let text = Fetcher::new(&self.url, self.timeout, self.attempts)
            .fetch_text()
            .await?;
        Catalog::parse(&text)
    }

    /// List supported releases as display rows, newest first.
    ///
    /// `max_count` truncates after sorting. A catalog with zero valid
    /// entries yields an empty list, not an error.
    pub async fn supported_releases(
        &self,
        max_count: Option<usize>,
    ) -> Result<Vec<String>, CatalogError> {
        let catalog = self.fetch_catalog().await?;
        let rows = render_releases(&catalog, Local::now().date_naive(), max_count);
        debug!("{} supported releases", rows.len());
        Ok(rows)
    }

    /// The newest supported release row marked LTS, or [`UNKNOWN`].
    pub async fn current_lts_version(&self) -> Result<String, CatalogError> {
        let rows = self.supported_releases(None).await?;
        Ok(find_lts_row(&rows))
    }

    /// SHA-256 digest of `disk1.img` for an exact release date, given
    /// as `YYYYMMDD` or `YYYY-MM-DD`, or [`UNKNOWN`] when no version
    /// carries that date (or the matching entry lacks the digest).
    ///
    /// A date that does not normalize to 8 characters short-circuits
    /// to [`UNKNOWN`] before any network traffic.
    pub async fn disk1_sha256(&self, date: &str) -> Result<String, CatalogError> {
        let Some(release) = normalize_release_date(date) else {
            return Ok(UNKNOWN.to_string());
        };
        let catalog = self.fetch_catalog().await?;
        Ok(find_disk1_sha256(&catalog, &release))
    }
}

/// Render, sort descending, truncate.
///
/// Descending text order is reverse-chronological because the rows are
/// fixed width with the date column first.
pub(super) fn render_releases(
    catalog: &Catalog,
    today: chrono::NaiveDate,
    max_count: Option<usize>,
) -> Vec<String> {
    let mut rows: Vec<String> = extract_releases(catalog, today)
        .iter()
        .map(Release::to_row)
        .collect();
    rows.sort_unstable_by(|a, b| b.cmp(a));
    if let Some(max) = max_count {
        rows.truncate(max);
    }
    rows
}

pub(super) fn find_lts_row(rows: &[String]) -> String {
    rows.iter()
        .find(|row| row.contains("LTS"))
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Accepts `YYYYMMDD` as-is; a 10-character `YYYY-MM-DD` has the two
/// hyphen positions removed. Anything that does not end up exactly
/// 8 characters long is rejected; there is no shape validation beyond
/// the length, so an 8-character non-date scans and simply misses.
pub(super) fn normalize_release_date(date: &str) -> Option<String> {
    let release: String = if date.len() == 10 {
        date.char_indices()
            .filter(|&(i, _)| i != 4 && i != 7)
            .map(|(_, c)| c)
            .collect()
    } else {
        date.to_string()
    };
    (release.len() == 8).then_some(release)
}

/// Exact-match scan for a version date key across every product.
pub(super) fn find_disk1_sha256(catalog: &Catalog, release: &str) -> String {
    for (_, product) in catalog.products.iter().flatten() {
        let Some(versions) = product.versions.as_ref() else {
            continue;
        };
        if let Some(entry) = versions.get(release) {
            // A matching date with a malformed entry still yields the
            // sentinel, not an error.
            return entry
                .disk_image()
                .and_then(|item| item.sha256.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());
        }
    }
    UNKNOWN.to_string()
}
