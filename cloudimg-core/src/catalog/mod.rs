//! Ubuntu cloud-image release catalog access
//!
//! This module retrieves the published Simplestreams release catalog
//! and answers three queries over it: list supported releases, find
//! the current LTS release, and look up the SHA-256 digest of a
//! release's primary disk image.
//!
//! # Architecture
//!
//! ```text
//! cloud-images.ubuntu.com
//!     │
//!     └── released:download.json    ← Simplestreams product catalog
//!            │
//!            ▼
//!     Fetcher (GET + linear-backoff retry)
//!            │
//!            ▼
//!     Catalog (typed decode)
//!            │
//!            ▼
//!     Release extraction (expiry / arch / pubname filters)
//!            │
//!            ▼
//!     CatalogClient queries (rows, current LTS, disk1.img digest)
//! ```
//!
//! Every query fetches and decodes the document from scratch; nothing
//! is cached and nothing outlives a single query.

mod client;
mod fetcher;
mod release;
mod stream;

pub use client::{CatalogClient, DEFAULT_CATALOG_URL, UNKNOWN};
pub use fetcher::Fetcher;
pub use release::Release;
pub use stream::{Catalog, ImageItem, Product, VersionEntry};
