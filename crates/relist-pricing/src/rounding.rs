//! Price rounding to a configured suffix policy.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a price according to the shop's rounding policy.
///
/// The rule is uniform "floor plus fixed fractional part": for a policy
/// of `".95"` every published price ends in exactly `.95`, regardless of
/// the input's magnitude. `".00"` instead rounds to the nearest whole
/// number. Any other policy string is parsed as a literal fraction in
/// `[0,1)` and added to the floor; a policy that does not parse leaves
/// the price at its plain two-decimal rounding.
///
/// Prices at or below zero round to zero.
#[must_use]
pub fn apply_rounding(price: Decimal, policy: &str) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let suffix = match policy {
        ".99" => Some(Decimal::new(99, 2)),
        ".95" => Some(Decimal::new(95, 2)),
        ".90" => Some(Decimal::new(90, 2)),
        ".50" => Some(Decimal::new(50, 2)),
        ".49" => Some(Decimal::new(49, 2)),
        ".00" => {
            return price.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        }
        other => parse_fraction(other),
    };

    match suffix {
        Some(fraction) => price.floor() + fraction,
        None => price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    }
}

/// Parses a policy string like `".79"` or `"0.79"` as a fraction in `[0,1)`.
fn parse_fraction(policy: &str) -> Option<Decimal> {
    let normalized = if policy.starts_with('.') {
        format!("0{policy}")
    } else {
        policy.to_string()
    };
    let fraction = Decimal::from_str(&normalized).ok()?;
    (fraction >= Decimal::ZERO && fraction < Decimal::ONE).then_some(fraction)
}
