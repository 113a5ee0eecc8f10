//! Release record extraction and row formatting
//!
//! Converts catalog entries into normalized [`Release`] records,
//! dropping expired products and any entry that does not look like an
//! amd64 server build. All filtering here is per-entry and silent: a
//! defective entry is skipped, never an error.

use chrono::NaiveDate;
use tracing::debug;

use super::stream::{Catalog, ARCH_MARKER};

/// Minimum hyphen-delimited tokens in a usable `pubname`,
/// e.g. `ubuntu-oracular-24.10-amd64-server-20250305`.
const MIN_PUBNAME_TOKENS: usize = 6;

/// A normalized release derived from one catalog version entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Build date, `YYYY-MM-DD`.
    pub date: String,
    /// Series version, e.g. `24.10`.
    pub version: String,
    /// Series codename, lower case as published.
    pub codename: String,
    /// Whether the product's title marks it as a long-term-support
    /// series.
    pub lts: bool,
}

impl Release {
    /// Render the fixed-width display row.
    ///
    /// Column widths are part of the output contract: the date column
    /// leads, so a plain lexicographic sort of rows doubles as a
    /// chronological sort.
    pub fn to_row(&self) -> String {
        format!(
            "{}     {}     {}  {}",
            size_to_col(&self.date, 10),
            size_to_col(&self.version, 5),
            size_to_col(&capitalize(&self.codename), 12),
            if self.lts { "LTS" } else { "" },
        )
    }
}

/// Extract every supported amd64 release from the catalog.
///
/// `today` is the expiry cutoff: a product whose `support_eol` falls
/// on `today` is still included, one dated earlier is not. Iteration
/// order is insignificant; callers sort the rendered rows.
pub fn extract_releases(catalog: &Catalog, today: NaiveDate) -> Vec<Release> {
    let mut releases = Vec::new();

    for (name, product) in catalog.products.iter().flatten() {
        let Some(support_eol) = product.support_eol.as_deref() else {
            continue;
        };
        if has_date_expired(support_eol, today) {
            debug!("skipping {name}: support ended {support_eol}");
            continue;
        }

        let Some(title) = product.release_title.as_deref() else {
            continue;
        };
        let lts = title.contains("LTS");

        for (date_key, entry) in product.versions.iter().flatten() {
            let Some(path) = entry.disk_image().and_then(|item| item.path.as_deref()) else {
                continue;
            };
            if !path.contains(ARCH_MARKER) {
                continue;
            }

            let Some(pubname) = entry.pubname.as_deref() else {
                continue;
            };
            let tokens: Vec<&str> = pubname.split('-').collect();
            if tokens.len() < MIN_PUBNAME_TOKENS {
                debug!("skipping {name}/{date_key}: unexpected pubname {pubname:?}");
                continue;
            }
            let codename = tokens[1];
            let version = tokens[2];
            if codename.is_empty() {
                continue;
            }

            releases.push(Release {
                date: format_date_key(date_key),
                version: version.to_string(),
                codename: codename.to_string(),
                lts,
            });
        }
    }

    releases
}

/// A product stays listed through its final support day. An
/// unparseable date counts as expired.
fn has_date_expired(support_eol: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(support_eol, "%Y-%m-%d") {
        Ok(eol) => eol < today,
        Err(_) => true,
    }
}

/// `20250305` → `2025-03-05`. A key that is not an 8-byte sliceable
/// string passes through unchanged rather than aborting the listing.
fn format_date_key(key: &str) -> String {
    match (key.len(), key.get(0..4), key.get(4..6), key.get(6..8)) {
        (8, Some(y), Some(m), Some(d)) => format!("{y}-{m}-{d}"),
        _ => key.to_string(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pad with spaces, or truncate, to exactly `width` characters.
fn size_to_col(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{truncated:<width$}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::stream::Catalog;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn single_product(support_eol: &str, title: &str, path: &str, pubname: &str) -> Catalog {
        Catalog::parse(&format!(
            r#"{{"products": {{"p": {{
                "support_eol": "{support_eol}",
                "release_title": "{title}",
                "versions": {{"20250305": {{
                    "pubname": "{pubname}",
                    "items": {{"disk1.img": {{"path": "{path}", "sha256": "aa"}}}}
                }}}}
            }}}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn support_eol_on_today_is_still_included() {
        let catalog = single_product(
            "2025-06-01",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu-oracular-24.10-amd64-server-20250305",
        );
        assert_eq!(extract_releases(&catalog, date(2025, 6, 1)).len(), 1);
    }

    #[test]
    fn support_eol_before_today_is_excluded() {
        let catalog = single_product(
            "2025-05-31",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu-oracular-24.10-amd64-server-20250305",
        );
        assert!(extract_releases(&catalog, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn unparseable_support_eol_counts_as_expired() {
        let catalog = single_product(
            "soonish",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu-oracular-24.10-amd64-server-20250305",
        );
        assert!(extract_releases(&catalog, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn non_amd64_path_is_excluded() {
        let catalog = single_product(
            "2099-01-01",
            "24.10",
            "server/disk-arm64.img",
            "ubuntu-oracular-24.10-amd64-server-20250305",
        );
        assert!(extract_releases(&catalog, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn short_pubname_is_excluded() {
        let catalog = single_product(
            "2099-01-01",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu-oracular",
        );
        assert!(extract_releases(&catalog, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn pubname_tokens_yield_codename_and_version() {
        let catalog = single_product(
            "2099-01-01",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu-oracular-24.10-amd64-server-20250305",
        );
        let releases = extract_releases(&catalog, date(2025, 6, 1));
        assert_eq!(
            releases,
            vec![Release {
                date: "2025-03-05".to_string(),
                version: "24.10".to_string(),
                codename: "oracular".to_string(),
                lts: false,
            }]
        );
    }

    #[test]
    fn empty_codename_is_excluded() {
        let catalog = single_product(
            "2099-01-01",
            "24.10",
            "server/disk-amd64.img",
            "ubuntu--24.10-amd64-server-20250305",
        );
        assert!(extract_releases(&catalog, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn lts_flag_follows_release_title() {
        let catalog = single_product(
            "2099-01-01",
            "24.04 LTS",
            "server/disk-amd64.img",
            "ubuntu-noble-24.04-amd64-server-20250305",
        );
        let releases = extract_releases(&catalog, date(2025, 6, 1));
        assert!(releases[0].lts);
    }

    #[test]
    fn format_date_key_round_trip() {
        assert_eq!(format_date_key("20250305"), "2025-03-05");
    }

    #[test]
    fn format_date_key_passes_odd_keys_through() {
        assert_eq!(format_date_key("2025"), "2025");
        assert_eq!(format_date_key("release-one"), "release-one");
        assert_eq!(format_date_key(""), "");
    }

    #[test]
    fn row_layout_is_fixed_width() {
        let release = Release {
            date: "2025-03-05".to_string(),
            version: "24.10".to_string(),
            codename: "oracular".to_string(),
            lts: false,
        };
        assert_eq!(release.to_row(), "2025-03-05     24.10     Oracular      ");

        let lts = Release {
            date: "2024-04-25".to_string(),
            version: "24.04".to_string(),
            codename: "noble".to_string(),
            lts: true,
        };
        assert_eq!(lts.to_row(), "2024-04-25     24.04     Noble         LTS");
    }

    #[test]
    fn size_to_col_truncates_overlong_values() {
        assert_eq!(size_to_col("extremely-long-codename", 12), "extremely-lo");
        assert_eq!(size_to_col("", 5), "     ");
    }

    #[test]
    fn capitalize_uppercases_first_letter_only() {
        assert_eq!(capitalize("oracular"), "Oracular");
        assert_eq!(capitalize("n"), "N");
    }
}
