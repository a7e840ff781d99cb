//! Normalization from raw storefront shapes to [`relist_core::ScrapedProduct`].
//!
//! Total by design: every optional raw field collapses to a concrete
//! default (empty string, zero, empty list) so downstream stages never
//! branch on missing data. Validation lives at this boundary; the
//! canonical types are trusted everywhere else.

use relist_core::{ProductImage, ProductOption, ProductVariant, ScrapedProduct};

use crate::types::{RawImage, RawOption, RawProduct, RawVariant};

/// Normalizes a raw storefront product into a [`ScrapedProduct`].
///
/// `store_base` is the scheme-qualified store base URL (as produced by
/// the client); the host becomes `source_store` and the product page URL
/// is derived from it.
#[must_use]
pub fn normalize_product(raw: RawProduct, store_base: &str) -> ScrapedProduct {
    let base = store_base.trim_end_matches('/');
    let source_store = host_of(base);
    let source_url = if raw.handle.is_empty() {
        String::new()
    } else {
        format!("{base}/products/{}", raw.handle)
    };

    let images = raw
        .images
        .into_iter()
        .enumerate()
        .map(|(idx, image)| normalize_image(image, idx))
        .collect();

    let variants = raw.variants.into_iter().map(normalize_variant).collect();

    let options = raw
        .options
        .into_iter()
        .map(normalize_option)
        .filter(|o: &ProductOption| !o.name.is_empty())
        .collect();

    ScrapedProduct {
        external_id: raw.id,
        title: raw.title,
        handle: raw.handle,
        description: raw.body_html.unwrap_or_default(),
        vendor: raw.vendor.unwrap_or_default(),
        product_type: raw.product_type.unwrap_or_default(),
        tags: raw.tags,
        images,
        variants,
        options,
        source_url,
        source_store,
    }
}

fn normalize_variant(raw: RawVariant) -> ProductVariant {
    // Prefer the explicit weight/unit pair; fall back to `grams`, which
    // most stores populate even when the theme strips `weight`.
    let (weight, weight_unit) = match (raw.weight, raw.grams) {
        (Some(w), _) => (w, raw.weight_unit.unwrap_or_else(|| "g".to_string())),
        (None, Some(grams)) => (grams, "g".to_string()),
        (None, None) => (0.0, raw.weight_unit.unwrap_or_else(|| "g".to_string())),
    };

    ProductVariant {
        title: raw.title.unwrap_or_default(),
        price: raw.price.unwrap_or_else(|| "0.00".to_string()),
        compare_at_price: raw.compare_at_price.filter(|p| !p.is_empty()),
        sku: raw.sku.unwrap_or_default(),
        weight,
        weight_unit,
        inventory_quantity: raw.inventory_quantity.unwrap_or(0),
        option1: raw.option1,
        option2: raw.option2,
        option3: raw.option3,
    }
}

fn normalize_image(raw: RawImage, index: usize) -> ProductImage {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let fallback_position = index as i32 + 1;
    ProductImage {
        src: raw.src.unwrap_or_default(),
        alt: raw.alt.unwrap_or_default(),
        position: raw.position.unwrap_or(fallback_position),
    }
}

fn normalize_option(raw: RawOption) -> ProductOption {
    ProductOption {
        name: raw.name.unwrap_or_default(),
        values: raw.values,
    }
}

fn host_of(base: &str) -> String {
    reqwest::Url::parse(base)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| base.trim_start_matches("https://").trim_start_matches("http://").to_string())
}
