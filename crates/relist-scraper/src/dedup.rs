//! Deduplication of scraped products across sources.

use std::collections::HashSet;

use relist_core::ScrapedProduct;

/// Keeps the first occurrence per `(source_store, external_id)` key,
/// preserving encounter order otherwise.
///
/// The same product is routinely observed more than once in a scrape
/// batch — it may sit in several of the requested collections, or the
/// user may paste overlapping URLs. First-seen wins; later sightings
/// are dropped even when their field contents differ.
#[must_use]
pub fn deduplicate_products(products: Vec<ScrapedProduct>) -> Vec<ScrapedProduct> {
    let mut seen: HashSet<(String, i64)> = HashSet::new();
    products
        .into_iter()
        .filter(|product| {
            seen.insert((product.source_store.clone(), product.external_id))
        })
        .collect()
}
