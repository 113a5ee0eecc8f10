//! Catalog error types

use thiserror::Error;

/// Fatal failures of a catalog query.
///
/// Only transport and document-level failures are errors. A missing or
/// malformed field on an individual product or version entry is never
/// fatal; that entry is silently skipped during extraction, and the two
/// expected "not found" outcomes (no current LTS, no digest for a date)
/// are reported through the [`UNKNOWN`](crate::catalog::UNKNOWN)
/// sentinel value instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failed on every retry attempt.
    #[error("failed to fetch catalog")]
    Fetch {
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not valid JSON.
    #[error("failed to parse catalog JSON")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but has no top-level `products` map.
    #[error("catalog is missing 'products'")]
    MissingProducts,
}
