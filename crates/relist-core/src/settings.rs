use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-shop configuration governing how imported products are priced
/// and published.
///
/// One record per shop, created lazily with these defaults on first
/// read and updated wholesale on save. The publish pipeline snapshots
/// the whole record into the import batch, so later edits never
/// retroactively change what a past batch reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Vendor name stamped on every imported product. `None` keeps the
    /// scraped vendor.
    pub vendor: Option<String>,
    /// Merchant region name, mapped to a target currency by the pricing
    /// engine (unrecognized regions fall back to USD).
    pub region: String,
    /// Multiplier applied to the scraped retail price.
    pub retail_price_multiplier: Decimal,
    /// When set, the scraped price is kept (currency conversion still
    /// applies) and the multiplier is ignored.
    pub retail_price_manual: bool,
    /// Compare-at price is recomputed as `price × this` unless manual
    /// mode is on or the multiplier is zero or negative.
    pub compare_at_price_multiplier: Decimal,
    pub compare_at_price_manual: bool,
    /// Rounding policy for published prices: `".99"`, `".95"`, `".90"`,
    /// `".50"`, `".49"`, `".00"`, or any literal fraction like `".79"`.
    pub rounding: String,
    /// Status for newly created products: `"ACTIVE"` or `"DRAFT"`.
    pub product_status: String,
    /// Inventory quantity assigned to imported variants when the source
    /// store exposes none.
    pub default_inventory_quantity: i32,
    /// `"deny"` or `"continue"` — whether to keep selling at zero stock.
    pub inventory_policy: String,
    pub charge_vat: bool,
    /// Rewrite image alt text during content optimization.
    pub optimize_alt_text: bool,
    /// Force every variant to the first variant's price after repricing.
    pub uniform_variant_pricing: bool,
    /// Let the AI propose tags for imported products.
    pub generate_tags: bool,
    /// Let the AI propose a product type for imported products.
    pub generate_product_type: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            vendor: None,
            region: "United States".to_string(),
            retail_price_multiplier: Decimal::ONE,
            retail_price_manual: false,
            compare_at_price_multiplier: Decimal::ZERO,
            compare_at_price_manual: false,
            rounding: ".99".to_string(),
            product_status: "DRAFT".to_string(),
            default_inventory_quantity: 100,
            inventory_policy: "deny".to_string(),
            charge_vat: false,
            optimize_alt_text: false,
            uniform_variant_pricing: false,
            generate_tags: false,
            generate_product_type: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_pricing_untouched() {
        let settings = StoreSettings::default();
        assert_eq!(settings.retail_price_multiplier, Decimal::ONE);
        assert_eq!(settings.compare_at_price_multiplier, Decimal::ZERO);
        assert!(!settings.retail_price_manual);
        assert_eq!(settings.rounding, ".99");
    }

    #[test]
    fn deserializes_partial_body_with_defaults() {
        let settings: StoreSettings =
            serde_json::from_str(r#"{"region": "Germany", "charge_vat": true}"#).unwrap();
        assert_eq!(settings.region, "Germany");
        assert!(settings.charge_vat);
        assert_eq!(settings.product_status, "DRAFT");
        assert_eq!(settings.default_inventory_quantity, 100);
    }

    #[test]
    fn round_trips_through_json() {
        let settings = StoreSettings {
            vendor: Some("My Brand".to_string()),
            uniform_variant_pricing: true,
            ..StoreSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: StoreSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vendor.as_deref(), Some("My Brand"));
        assert!(back.uniform_variant_pricing);
    }
}
