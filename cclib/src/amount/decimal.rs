//! Decimal-string rendering of a scaled integer amount (spec §4.2).
//!
//! The original routes this through a 50-digit decimal float (`amtfloat_t`); since the amounts
//! this crate ever renders are exact integers scaled by a power of ten (the asset's scale
//! factor), the decimal point can be placed by exact digit-shifting on [`BigInt::format_dec`]
//! instead — no float, no precision to lose, same trimming behavior.

use crate::numeric::BigInt;

/// Renders `value` (in the asset's base integer units) as a decimal string scaled by
/// `10^-scale_exponent`, trimming trailing fractional zeros. When `add_decimal` is set and the
/// value has no fractional part, a single trailing `.0` is kept (matching `amount_to_string`'s
/// `add_decimal` flag).
pub fn amount_to_decimal_string(value: &BigInt, scale_exponent: u32, add_decimal: bool) -> String {
    let digits = value.format_dec();
    let scale = scale_exponent as usize;

    let (int_part, frac_part) = if scale == 0 {
        (digits, String::new())
    } else if digits.len() > scale {
        let split = digits.len() - scale;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), "0".repeat(scale - digits.len()) + &digits)
    };

    let frac_trimmed = frac_part.trim_end_matches('0');

    let mut s = int_part;
    if !frac_trimmed.is_empty() {
        s.push('.');
        s.push_str(frac_trimmed);
    } else if add_decimal {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_number_has_no_fraction() {
        assert_eq!(amount_to_decimal_string(&BigInt::from_u64(100), 0, false), "100");
    }

    #[test]
    fn trims_trailing_fractional_zeros() {
        assert_eq!(amount_to_decimal_string(&BigInt::from_u64(12_340_000), 6, false), "12.34");
    }

    #[test]
    fn pads_with_leading_zero_when_value_is_smaller_than_the_scale() {
        assert_eq!(amount_to_decimal_string(&BigInt::from_u64(5), 3, false), "0.005");
    }

    #[test]
    fn add_decimal_keeps_a_single_trailing_zero() {
        assert_eq!(amount_to_decimal_string(&BigInt::from_u64(100), 0, true), "100.0");
        assert_eq!(amount_to_decimal_string(&BigInt::from_u64(1_000_000), 6, true), "1.0");
    }

    #[test]
    fn zero_renders_as_zero() {
        assert_eq!(amount_to_decimal_string(&BigInt::ZERO, 9, false), "0");
        assert_eq!(amount_to_decimal_string(&BigInt::ZERO, 9, true), "0.0");
    }
}
