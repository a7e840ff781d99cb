//! Static currency tables: USD cross rates and region→currency mapping.
//!
//! Rates are deliberately a fixed table, not a live feed — imported
//! prices get rounded to a policy suffix immediately afterwards, so
//! day-to-day rate drift washes out. The table states how many USD one
//! unit of each currency buys.

use rust_decimal::Decimal;

/// USD value of one unit of `code`. Unrecognized codes convert 1:1,
/// which leaves the amount untouched in a same-currency pipeline.
#[must_use]
pub fn usd_rate(code: &str) -> Decimal {
    match code.to_ascii_uppercase().as_str() {
        "EUR" => Decimal::new(1_09, 2),
        "GBP" => Decimal::new(1_27, 2),
        "CAD" => Decimal::new(74, 2),
        "AUD" => Decimal::new(66, 2),
        "NZD" => Decimal::new(61, 2),
        "CHF" => Decimal::new(1_13, 2),
        "JPY" => Decimal::new(67, 4),
        "SEK" => Decimal::new(96, 3),
        "NOK" => Decimal::new(95, 3),
        "DKK" => Decimal::new(146, 3),
        "INR" => Decimal::new(12, 3),
        _ => Decimal::ONE,
    }
}

/// Converts `amount` from one currency to another through USD.
///
/// Same-currency conversion is the identity.
#[must_use]
pub fn convert(amount: Decimal, from: &str, to: &str) -> Decimal {
    if from.eq_ignore_ascii_case(to) {
        return amount;
    }
    let usd = amount * usd_rate(from);
    usd / usd_rate(to)
}

/// Maps a merchant region name to its ISO currency code.
///
/// Case-insensitive over a small set of known variants; anything
/// unrecognized defaults to USD.
#[must_use]
pub fn region_currency(region: &str) -> &'static str {
    match region.trim().to_ascii_lowercase().as_str() {
        "united states" | "usa" | "us" => "USD",
        "united kingdom" | "uk" | "great britain" => "GBP",
        "germany" | "france" | "spain" | "italy" | "netherlands" | "ireland" | "austria"
        | "belgium" | "europe" | "european union" => "EUR",
        "canada" => "CAD",
        "australia" => "AUD",
        "new zealand" => "NZD",
        "switzerland" => "CHF",
        "japan" => "JPY",
        "sweden" => "SEK",
        "norway" => "NOK",
        "denmark" => "DKK",
        "india" => "INR",
        _ => "USD",
    }
}
