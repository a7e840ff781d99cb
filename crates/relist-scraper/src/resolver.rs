//! Resolution of user-supplied storefront URLs into scrape targets.
//!
//! Users paste anything from a bare domain to a deep product link with
//! tracking parameters. The resolver coerces the input to an absolute
//! URL, then classifies it by path shape:
//!
//! - `/collections/<handle>/...` is a collection, even when a
//!   `/products/<handle>` suffix follows — the collection prefix is the
//!   more explicit statement of intent and wins the tie-break.
//! - `/products/<handle>` is a product.
//! - Any other non-empty path falls back to its last segment, classified
//!   by the caller-supplied default.

use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// Whether a scrape target is a single product or a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Product,
    Collection,
}

/// A parsed scrape target: which store, which handle, product or collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    /// Store host, e.g. `"drinkcann.com"`.
    pub store: String,
    /// URL slug of the product or collection.
    pub handle: String,
    pub kind: TargetKind,
}

/// Resolves a raw user-supplied URL into a [`ScrapeTarget`].
///
/// A missing scheme is tolerated: `"shop.com/products/x"` resolves the
/// same as `"https://shop.com/products/x"`.
///
/// # Errors
///
/// - [`ScraperError::InvalidUrl`] — the input cannot be parsed as an
///   absolute URL with a host, even after prepending `https://`.
/// - [`ScraperError::UnresolvableHandle`] — the URL parses but its path
///   has no segments to take a handle from.
pub fn resolve_url(raw: &str, default_kind: TargetKind) -> Result<ScrapeTarget, ScraperError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_string(),
            reason: "empty input".to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    let Some(host) = url.host_str() else {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL has no host".to_string(),
        });
    };

    // Keep a non-default port so targets resolved from local/staging
    // URLs stay reachable.
    let store = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let (handle, kind) = match segments.as_slice() {
        ["collections", handle, ..] => ((*handle).to_string(), TargetKind::Collection),
        ["products", handle, ..] => ((*handle).to_string(), TargetKind::Product),
        [.., last] => ((*last).to_string(), default_kind),
        [] => {
            return Err(ScraperError::UnresolvableHandle {
                url: raw.to_string(),
            })
        }
    };

    Ok(ScrapeTarget {
        store,
        handle,
        kind,
    })
}
