use serde::{Deserialize, Serialize};

/// A product scraped from an external storefront, normalized for the
/// import pipeline.
///
/// Every field is materialized with a concrete default (empty string,
/// zero, empty list) at normalization time, so downstream stages never
/// branch on missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedProduct {
    /// Source-system numeric product ID. Together with [`Self::source_store`]
    /// this uniquely identifies a product within a scrape batch.
    pub external_id: i64,
    pub title: String,
    /// URL slug on the source store, e.g. `"hi-boy-blood-orange-5mg"`.
    pub handle: String,
    /// Raw HTML description from the source store. Empty when absent.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    /// Canonical product page URL on the source store.
    #[serde(default)]
    pub source_url: String,
    /// Host of the source store, e.g. `"drinkcann.com"`.
    #[serde(default)]
    pub source_store: String,
}

impl ScrapedProduct {
    /// Deduplication key: a product is the same product when it was
    /// scraped from the same store with the same source ID.
    #[must_use]
    pub fn dedup_key(&self) -> (&str, i64) {
        (self.source_store.as_str(), self.external_id)
    }

    /// Returns the first variant, the storefront default.
    #[must_use]
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }
}

/// A single purchasable variant of a [`ScrapedProduct`].
///
/// `price` and `compare_at_price` are decimal strings. After the pricing
/// engine has run they are always fixed two-decimal-place strings —
/// never raw floats — so rounding drift cannot re-enter downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    #[serde(default)]
    pub title: String,
    pub price: String,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub weight: f64,
    /// Source-store unit name, e.g. `"g"`, `"kg"`, `"oz"`, `"lb"`.
    #[serde(default)]
    pub weight_unit: String,
    #[serde(default)]
    pub inventory_quantity: i64,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
}

/// A product image from the source store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    /// Alt text; empty when the source store has none.
    #[serde(default)]
    pub alt: String,
    /// 1-based gallery position.
    #[serde(default)]
    pub position: i32,
}

/// A free-form product option, e.g. `{name: "Size", values: ["S", "M"]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A [`ScrapedProduct`] whose title/description (and optionally image
/// alt text) have been rewritten by the content optimizer.
///
/// Strict superset of the scraped product: the pre-rewrite title and
/// description are preserved verbatim so a merchant can audit or roll
/// back AI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedProduct {
    #[serde(flatten)]
    pub product: ScrapedProduct,
    pub original_title: String,
    pub original_description: String,
}

impl OptimizedProduct {
    /// Wraps a product without changing any content, recording the
    /// current title/description as the originals. Used as the fallback
    /// record when optimization fails.
    #[must_use]
    pub fn unchanged(product: ScrapedProduct) -> Self {
        let original_title = product.title.clone();
        let original_description = product.description.clone();
        Self {
            product,
            original_title,
            original_description,
        }
    }
}

/// An AI-enhanced replacement for one product image, held as decoded
/// bytes until the publisher stages it for upload.
#[derive(Debug, Clone)]
pub struct EnhancedImage {
    /// Gallery position of the image this replaces.
    pub position: i32,
    /// MIME type reported by the image service, e.g. `"image/png"`.
    pub mime_type: String,
    pub data: Vec<u8>,
}
