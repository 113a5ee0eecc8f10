//! Typed view of the Simplestreams released-download document
//!
//! Decode is permissive below the top-level `products` map: a field of
//! the wrong type reads as absent and a map entry of the wrong type is
//! dropped, so a defect stays local to the entry that carries it.
//! Whether a missing field disqualifies an individual entry is decided
//! during extraction (see [`release`](super::release)); only malformed
//! JSON or a missing `products` map fails the document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::CatalogError;

/// Item key of a release's primary disk image.
pub const DISK_IMAGE_KEY: &str = "disk1.img";

/// Architecture marker expected in the disk image path.
pub const ARCH_MARKER: &str = "amd64";

/// The root catalog document.
///
/// Maps are `BTreeMap` so scans over products are deterministic: the
/// published document keys amd64 products ahead of other arches
/// alphabetically, and digest lookups must not vary between runs when
/// several products publish the same build date.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Product entries keyed by product identifier.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub products: Option<BTreeMap<String, Product>>,
}

/// One product line (e.g. a single Ubuntu series).
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// End of support, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub support_eol: Option<String>,

    /// Human-readable title; an LTS series carries "LTS" in it.
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_title: Option<String>,

    /// Published builds keyed by 8-digit `YYYYMMDD` date.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub versions: Option<BTreeMap<String, VersionEntry>>,
}

/// One published build of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    /// Hyphen-delimited publication name,
    /// e.g. `ubuntu-oracular-24.10-amd64-server-20250305`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub pubname: Option<String>,

    /// Downloadable artifacts keyed by item name.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub items: Option<BTreeMap<String, ImageItem>>,
}

/// A downloadable artifact of a build.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageItem {
    /// Path of the artifact on the mirror.
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: Option<String>,

    /// SHA-256 digest of the artifact.
    #[serde(default, deserialize_with = "lenient_string")]
    pub sha256: Option<String>,
}

impl Catalog {
    /// Decode a catalog document.
    ///
    /// Malformed JSON and a missing (or non-object) top-level
    /// `products` map are both fatal; everything below that level
    /// decodes permissively.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(text)?;
        if catalog.products.is_none() {
            return Err(CatalogError::MissingProducts);
        }
        Ok(catalog)
    }
}

impl VersionEntry {
    /// The `disk1.img` item of this build, when present.
    pub fn disk_image(&self) -> Option<&ImageItem> {
        self.items.as_ref()?.get(DISK_IMAGE_KEY)
    }
}

/// A string field of the wrong type reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// A map field of the wrong type reads as absent; a map entry that
/// does not decode is dropped.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Option<BTreeMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let serde_json::Value::Object(map) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let mut entries = BTreeMap::new();
    for (key, value) in map {
        if let Ok(entry) = serde_json::from_value::<T>(value) {
            entries.insert(key, entry);
        }
    }
    Ok(Some(entries))
}
