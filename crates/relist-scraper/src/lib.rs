//! Scraper for public storefront product JSON endpoints.
//!
//! Resolves user-supplied storefront URLs into scrape targets, fetches
//! product and collection payloads from the fixed `/products/{handle}.json`
//! and `/collections/{handle}/products.json` endpoints, normalizes the
//! loosely-typed responses into [`relist_core::ScrapedProduct`], and
//! deduplicates across sources.

pub mod client;
pub mod dedup;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod types;

mod rate_limit;

pub use client::StorefrontClient;
pub use dedup::deduplicate_products;
pub use error::ScraperError;
pub use normalize::normalize_product;
pub use resolver::{resolve_url, ScrapeTarget, TargetKind};
pub use types::{RawImage, RawOption, RawProduct, RawVariant};
