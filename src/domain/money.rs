//! Monetary conversions and the fixed consumption-tax rate.
//!
//! Amounts are decimal currency units (`BigDecimal`) everywhere except the
//! payment-provider boundary, which speaks integer minor units (paise).

use bigdecimal::{BigDecimal, RoundingMode};

/// Minor units per major currency unit (paise per rupee).
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// Fixed 18% GST applied to the cart subtotal.
pub fn tax_rate() -> BigDecimal {
    BigDecimal::new(18.into(), 2)
}

/// Convert a provider-reported minor-unit amount into decimal currency units.
pub fn from_minor_units(amount: i64) -> BigDecimal {
    BigDecimal::new(amount.into(), 2)
}

/// Convert a price into the provider's minor-unit representation, rounding to
/// the nearest integer. The provider rejects negative amounts, so the result
/// is floored at zero.
pub fn to_minor_units(price: f64) -> i64 {
    ((price * MINOR_UNITS_PER_UNIT as f64).round() as i64).max(0)
}

/// Round a decimal amount to two fractional digits, half-up.
pub fn round_currency(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn from_minor_units_scales_by_hundred() {
        assert_eq!(from_minor_units(11800), BigDecimal::from_str("118.00").unwrap());
        assert_eq!(from_minor_units(0), BigDecimal::from_str("0").unwrap());
        assert_eq!(from_minor_units(1), BigDecimal::from_str("0.01").unwrap());
    }

    #[test]
    fn to_minor_units_rounds_to_nearest() {
        assert_eq!(to_minor_units(9.99), 999);
        assert_eq!(to_minor_units(10.005), 1001);
        assert_eq!(to_minor_units(0.0), 0);
    }

    #[test]
    fn to_minor_units_never_negative() {
        assert_eq!(to_minor_units(-5.0), 0);
    }

    #[test]
    fn round_currency_half_up() {
        let amount = BigDecimal::from_str("5.9994").unwrap();
        assert_eq!(round_currency(&amount), BigDecimal::from_str("6.00").unwrap());
        let amount = BigDecimal::from_str("5.125").unwrap();
        assert_eq!(round_currency(&amount), BigDecimal::from_str("5.13").unwrap());
    }
}
