//! Pricing engine for imported products.
//!
//! Pure and total: every function in this crate returns a value for any
//! input — unparseable price strings are treated as zero, unknown
//! currencies convert 1:1, and a broken rounding policy degrades to
//! plain two-decimal rounding. The pipeline order is fixed: currency
//! conversion, retail multiplier, compare-at recomputation, rounding.
//!
//! Output prices are always materialized as two-decimal strings so
//! floating-point drift cannot re-enter downstream.

pub mod currency;
pub mod rounding;

pub use currency::{convert, region_currency, usd_rate};
pub use rounding::apply_rounding;

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use relist_core::{ProductVariant, ScrapedProduct, StoreSettings};

/// Applies the full pricing pipeline to one variant.
///
/// Steps, in order:
///
/// 1. Currency conversion when `source_currency != target_currency`,
///    through the static USD cross-rate table.
/// 2. Retail multiplier, skipped when `retail_price_manual` is set or
///    the multiplier is exactly 1.
/// 3. Compare-at price recomputed as `price × compare_at_price_multiplier`,
///    skipped when `compare_at_price_manual` is set or the multiplier is
///    zero or negative — manual mode carries the scraped compare-at
///    through currency conversion untouched.
/// 4. Rounding policy applied to the price and to a positive compare-at.
#[must_use]
pub fn apply_pricing(
    variant: &ProductVariant,
    settings: &StoreSettings,
    source_currency: &str,
    target_currency: &str,
) -> ProductVariant {
    let mut price = parse_price(&variant.price);
    let mut compare_at = variant.compare_at_price.as_deref().map(parse_price);

    if !source_currency.eq_ignore_ascii_case(target_currency) {
        price = convert(price, source_currency, target_currency);
        compare_at = compare_at.map(|c| convert(c, source_currency, target_currency));
    }

    if !settings.retail_price_manual && settings.retail_price_multiplier != Decimal::ONE {
        price *= settings.retail_price_multiplier;
    }

    if !settings.compare_at_price_manual && settings.compare_at_price_multiplier > Decimal::ZERO {
        compare_at = Some(price * settings.compare_at_price_multiplier);
    }

    price = apply_rounding(price, &settings.rounding);
    compare_at = compare_at.map(|c| {
        if c > Decimal::ZERO {
            apply_rounding(c, &settings.rounding)
        } else {
            c
        }
    });

    ProductVariant {
        price: format_price(price),
        compare_at_price: compare_at.map(format_price),
        ..variant.clone()
    }
}

/// Forces every variant's price and compare-at price to equal the first
/// variant's — the blanket simplification some merchants want for
/// single-price product lines. No-op on empty input.
pub fn apply_uniform_pricing(variants: &mut [ProductVariant]) {
    let Some(first) = variants.first() else {
        return;
    };
    let price = first.price.clone();
    let compare_at = first.compare_at_price.clone();
    for variant in &mut variants[1..] {
        variant.price.clone_from(&price);
        variant.compare_at_price.clone_from(&compare_at);
    }
}

/// Runs the pricing pipeline over every variant of a product, with the
/// target currency derived from the shop's region, then applies uniform
/// variant pricing when the shop has it enabled.
pub fn reprice_product(
    product: &mut ScrapedProduct,
    settings: &StoreSettings,
    source_currency: &str,
) {
    let target_currency = region_currency(&settings.region);
    for variant in &mut product.variants {
        *variant = apply_pricing(variant, settings, source_currency, target_currency);
    }
    if settings.uniform_variant_pricing {
        apply_uniform_pricing(&mut product.variants);
    }
}

/// Parses a scraped price string; anything unparseable is zero.
fn parse_price(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Materializes a price as a fixed two-decimal string.
fn format_price(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_variant(price: &str, compare_at: Option<&str>) -> ProductVariant {
        ProductVariant {
            title: "Default Title".to_string(),
            price: price.to_string(),
            compare_at_price: compare_at.map(str::to_owned),
            sku: "SKU-1".to_string(),
            weight: 340.0,
            weight_unit: "g".to_string(),
            inventory_quantity: 10,
            option1: None,
            option2: None,
            option3: None,
        }
    }

    fn manual_settings() -> StoreSettings {
        StoreSettings {
            retail_price_manual: true,
            compare_at_price_manual: true,
            ..StoreSettings::default()
        }
    }

    #[test]
    fn multiplier_then_rounding() {
        let settings = StoreSettings {
            retail_price_multiplier: Decimal::new(2, 0),
            rounding: ".99".to_string(),
            ..StoreSettings::default()
        };
        let variant = make_variant("10.00", None);
        let priced = apply_pricing(&variant, &settings, "USD", "USD");
        assert_eq!(priced.price, "20.99");
    }

    #[test]
    fn multiplier_of_one_leaves_price_at_rounding_only() {
        let settings = StoreSettings {
            rounding: ".95".to_string(),
            ..StoreSettings::default()
        };
        let variant = make_variant("10.00", None);
        let priced = apply_pricing(&variant, &settings, "USD", "USD");
        assert_eq!(priced.price, "10.95");
    }

    #[test]
    fn compare_at_recomputed_from_multiplier() {
        let settings = StoreSettings {
            compare_at_price_multiplier: Decimal::new(15, 1), // 1.5
            rounding: ".99".to_string(),
            ..StoreSettings::default()
        };
        let variant = make_variant("10.00", Some("11.00"));
        let priced = apply_pricing(&variant, &settings, "USD", "USD");
        // compare-at = 10.00 * 1.5 = 15.00 before rounding → .99 suffix
        assert_eq!(priced.compare_at_price.as_deref(), Some("15.99"));
        assert_eq!(priced.price, "10.99");
    }

    #[test]
    fn manual_compare_at_preserves_scraped_value_through_conversion_only() {
        let settings = StoreSettings {
            compare_at_price_manual: true,
            retail_price_manual: true,
            rounding: ".99".to_string(),
            ..StoreSettings::default()
        };
        let variant = make_variant("100.00", Some("109.00"));
        let priced = apply_pricing(&variant, &settings, "EUR", "USD");
        // 109 EUR → 118.81 USD → .99 rounding
        assert_eq!(priced.compare_at_price.as_deref(), Some("118.99"));
    }

    #[test]
    fn invalid_price_string_is_treated_as_zero() {
        let variant = make_variant("not-a-price", None);
        let priced = apply_pricing(&variant, &StoreSettings::default(), "USD", "USD");
        assert_eq!(priced.price, "0.00");
    }

    #[test]
    fn output_is_always_two_decimal_string() {
        let settings = StoreSettings {
            rounding: ".00".to_string(),
            ..StoreSettings::default()
        };
        let variant = make_variant("12.49", None);
        let priced = apply_pricing(&variant, &settings, "USD", "USD");
        assert_eq!(priced.price, "12.00");
    }

    #[test]
    fn pricing_is_idempotent_in_manual_same_currency_mode() {
        let settings = manual_settings();
        let variant = make_variant("17.49", Some("24.99"));
        let once = apply_pricing(&variant, &settings, "USD", "USD");
        let twice = apply_pricing(&once, &settings, "USD", "USD");
        assert_eq!(once.price, twice.price);
        assert_eq!(once.compare_at_price, twice.compare_at_price);
    }

    #[test]
    fn non_price_fields_pass_through_unchanged() {
        let variant = make_variant("10.00", None);
        let priced = apply_pricing(&variant, &StoreSettings::default(), "USD", "USD");
        assert_eq!(priced.sku, "SKU-1");
        assert_eq!(priced.inventory_quantity, 10);
        assert_eq!(priced.weight_unit, "g");
    }

    #[test]
    fn uniform_pricing_copies_first_variant_prices() {
        let mut variants = vec![
            make_variant("10.99", Some("15.99")),
            make_variant("12.99", None),
            make_variant("14.99", Some("19.99")),
        ];
        apply_uniform_pricing(&mut variants);
        for variant in &variants {
            assert_eq!(variant.price, "10.99");
            assert_eq!(variant.compare_at_price.as_deref(), Some("15.99"));
        }
    }

    #[test]
    fn uniform_pricing_on_empty_slice_is_a_no_op() {
        let mut variants: Vec<ProductVariant> = vec![];
        apply_uniform_pricing(&mut variants);
        assert!(variants.is_empty());
    }

    #[test]
    fn reprice_product_targets_region_currency() {
        let mut product = ScrapedProduct {
            external_id: 1,
            title: "T".to_string(),
            handle: "t".to_string(),
            description: String::new(),
            vendor: String::new(),
            product_type: String::new(),
            tags: vec![],
            images: vec![],
            variants: vec![make_variant("100.00", None)],
            options: vec![],
            source_url: String::new(),
            source_store: "a.com".to_string(),
        };
        let settings = StoreSettings {
            region: "United Kingdom".to_string(),
            retail_price_manual: true,
            rounding: ".99".to_string(),
            ..StoreSettings::default()
        };
        reprice_product(&mut product, &settings, "USD");
        // 100 USD → 78.74 GBP → .99 suffix
        assert_eq!(product.variants[0].price, "78.99");
    }
}
