//! Raw response types for the public storefront product endpoints.
//!
//! Every field on these shapes is optional with a concrete default.
//! Storefront JSON is only loosely governed: themes and apps strip or
//! rename fields, and older stores serve shapes the current docs no
//! longer describe. Validation happens here at the boundary;
//! [`crate::normalize`] then maps into the canonical types that the
//! rest of the pipeline trusts.
//!
//! ## Observed quirks
//!
//! - `tags` arrives as a JSON array of strings on `products.json`, but
//!   as a single comma-separated string on some single-product
//!   endpoints. Both forms are accepted.
//! - `price`/`compare_at_price` are decimal strings on most stores but
//!   bare numbers on a few; both forms are accepted and kept as strings.
//! - `compare_at_price` is explicitly `null` (not omitted, not `"0.00"`)
//!   when a variant is not on sale.

use serde::{Deserialize, Deserializer};

/// Envelope of `GET /products/{handle}.json`.
#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: RawProduct,
}

/// One page of `GET /collections/{handle}/products.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductsPage {
    pub products: Vec<RawProduct>,
}

/// A single product as served by the storefront JSON endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    /// Source numeric product ID; `0` when the store omits it.
    pub id: i64,
    pub title: String,
    pub handle: String,
    /// Raw HTML description. May be `null` or absent.
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    #[serde(deserialize_with = "tags_array_or_csv")]
    pub tags: Vec<String>,
    pub images: Vec<RawImage>,
    pub options: Vec<RawOption>,
    pub variants: Vec<RawVariant>,
}

/// A purchasable variant of a [`RawProduct`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawVariant {
    pub id: i64,
    pub title: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub price: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub compare_at_price: Option<String>,
    pub sku: Option<String>,
    /// Weight in grams; present on most stores alongside `weight`.
    pub grams: Option<f64>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub inventory_quantity: Option<i64>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    /// 1-based position; `1` is the storefront default.
    pub position: Option<i32>,
}

/// A product image.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub id: Option<i64>,
    pub src: Option<String>,
    pub alt: Option<String>,
    pub position: Option<i32>,
}

/// A product option, e.g. `{name: "Size", values: ["S", "M", "L"]}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawOption {
    pub name: Option<String>,
    pub values: Vec<String>,
}

/// Accepts tags as either a JSON array or a comma-separated string.
fn tags_array_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Csv(String),
    }

    let tags = match Option::<Tags>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Tags::List(list)) => list,
        Some(Tags::Csv(csv)) => csv.split(',').map(str::to_owned).collect(),
    };

    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Accepts a price as either a decimal string or a bare JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Value>::deserialize(deserializer)?.map(|v| match v {
        Value::Text(s) => s,
        Value::Number(n) => format!("{n}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accept_json_array() {
        let product: RawProduct =
            serde_json::from_str(r#"{"id": 1, "tags": ["thc", "beverage"]}"#).unwrap();
        assert_eq!(product.tags, vec!["thc", "beverage"]);
    }

    #[test]
    fn tags_accept_comma_separated_string() {
        let product: RawProduct =
            serde_json::from_str(r#"{"id": 1, "tags": "thc, beverage , "}"#).unwrap();
        assert_eq!(product.tags, vec!["thc", "beverage"]);
    }

    #[test]
    fn tags_default_to_empty() {
        let product: RawProduct = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(product.tags.is_empty());
    }

    #[test]
    fn price_accepts_string() {
        let variant: RawVariant = serde_json::from_str(r#"{"price": "12.99"}"#).unwrap();
        assert_eq!(variant.price.as_deref(), Some("12.99"));
    }

    #[test]
    fn price_accepts_bare_number() {
        let variant: RawVariant = serde_json::from_str(r#"{"price": 12.99}"#).unwrap();
        assert_eq!(variant.price.as_deref(), Some("12.99"));
    }

    #[test]
    fn compare_at_price_null_stays_none() {
        let variant: RawVariant =
            serde_json::from_str(r#"{"price": "9.99", "compare_at_price": null}"#).unwrap();
        assert!(variant.compare_at_price.is_none());
    }

    #[test]
    fn missing_everything_still_parses() {
        let product: RawProduct = serde_json::from_str("{}").unwrap();
        assert_eq!(product.id, 0);
        assert!(product.variants.is_empty());
        assert!(product.images.is_empty());
    }
}
