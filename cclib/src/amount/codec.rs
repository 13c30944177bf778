//! Mantissa/exponent amount words (spec §4.2): `amount_encode`/`amount_decode`, asset scaling.

use super::ASSET_NO_SCALE;
use crate::error::{ErrorKind, Result, err};
use crate::numeric::BigInt;

/// The four rounding rules `amount_encode` can be asked to apply when a value has no exact
/// mantissa/exponent representation within the requested exponent range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to the nearest representable value, ties away from zero.
    Closest,
    /// Round up to the next representable value at or above the input.
    Up,
    /// Fail with `NoExactRepresentation` rather than round.
    NoRound,
    /// Round down to the next representable value at or below the input.
    Down,
}

/// The asset's scale exponent: `(asset_id - ASSET_NO_SCALE) mod 32` (spec §4.2).
pub fn asset_scale_exponent(asset_id: u64) -> u32 {
    (asset_id.wrapping_add((-ASSET_NO_SCALE) as u64) & 31) as u32
}

/// The asset's scale factor, `10^asset_scale_exponent(asset_id)`. Always fits in a `BigInt`
/// since the exponent never exceeds 31.
pub fn asset_scale_factor(asset_id: u64) -> BigInt {
    BigInt::pow10(asset_scale_exponent(asset_id)).expect("10^31 fits comfortably in 256 bits")
}

/// Encodes `value` as a single word `(mantissa << exponent_bits) | exponent`, searching
/// exponent values from `max_exp` downward for an exact representation with a minimal mantissa
/// (spec §4.2). When no exact representation exists, applies `rounding`; `Rounding::NoRound`
/// fails instead of rounding, everything else clamps to the representable endpoint nearest the
/// input.
pub fn amount_encode(
    value: &BigInt,
    amount_bits: u32,
    exponent_bits: u32,
    min_exp: u32,
    max_exp: u32,
    rounding: Rounding,
) -> Result<u64> {
    let mantissa_bits = amount_bits - exponent_bits;
    let mantissa_max: u64 = if mantissa_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << mantissa_bits) - 1
    };

    // Exact search: largest exponent first, so the first hit has the smallest mantissa (trailing
    // factors of ten pushed into the exponent).
    for exp in (min_exp..=max_exp).rev() {
        let base = BigInt::pow10(exp)?;
        let adjust = if exp > 0 { 1 } else { 0 };
        let (q, r) = value.divmod(&base)?;
        if !r.is_zero() {
            continue;
        }
        if let Ok(mantissa_big) = q.checked_sub(&BigInt::from_u64(adjust)) {
            if mantissa_big <= BigInt::from_u64(mantissa_max) {
                let mantissa = u64::try_from(&mantissa_big).unwrap_or(0);
                return Ok(word(mantissa, exp, exponent_bits));
            }
        }
    }

    if rounding == Rounding::NoRound {
        return Err(err!(
            ErrorKind::NoExactRepresentation,
            "value has no exact mantissa/exponent representation in this exponent range"
        ));
    }

    // Rounded search: finest exponent first, so the result keeps as much precision as the
    // mantissa width allows; if nothing fits even at max_exp, clamp to that exponent's largest
    // mantissa.
    for exp in min_exp..=max_exp {
        let base = BigInt::pow10(exp)?;
        let adjust = if exp > 0 { 1 } else { 0 };
        let (q, r) = value.divmod(&base)?;
        let rounded_q = match rounding {
            Rounding::Down => q,
            Rounding::Up => {
                if r.is_zero() {
                    q
                } else {
                    q.checked_add(&BigInt::from_u64(1))?
                }
            }
            Rounding::Closest => {
                let twice_r = r.checked_mul_u64(2)?;
                if twice_r >= base {
                    q.checked_add(&BigInt::from_u64(1))?
                } else {
                    q
                }
            }
            Rounding::NoRound => unreachable!("handled above"),
        };
        let mantissa_big = rounded_q
            .checked_sub(&BigInt::from_u64(adjust))
            .unwrap_or(BigInt::ZERO);
        if mantissa_big <= BigInt::from_u64(mantissa_max) {
            let mantissa = u64::try_from(&mantissa_big).unwrap_or(mantissa_max);
            return Ok(word(mantissa, exp, exponent_bits));
        }
        if exp == max_exp {
            // Nothing fit even at the coarsest granularity; clamp to this exponent's endpoint.
            return Ok(word(mantissa_max, exp, exponent_bits));
        }
    }

    unreachable!("min_exp..=max_exp always yields at least one iteration")
}

/// Decodes a mantissa/exponent word back to its exact integer value: `(mantissa + [exponent >
/// 0]) * 10^exponent`.
pub fn amount_decode(encoded: u64, exponent_bits: u32) -> Result<BigInt> {
    let exponent_mask = (1u64 << exponent_bits) - 1;
    let exponent = (encoded & exponent_mask) as u32;
    let mantissa = encoded >> exponent_bits;
    let adjust = if exponent > 0 { 1 } else { 0 };
    let base = BigInt::pow10(exponent)?;
    let scaled_mantissa = BigInt::from_u64(mantissa).checked_add(&BigInt::from_u64(adjust))?;
    scaled_mantissa.checked_mul(&base)
}

fn word(mantissa: u64, exponent: u32, exponent_bits: u32) -> u64 {
    (mantissa << exponent_bits) | exponent as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT_BITS: u32 = 40;
    const EXP_BITS: u32 = 5;

    #[test]
    fn round_trips_an_exact_value() {
        let value = BigInt::from_u64(123_450_000_000);
        let encoded = amount_encode(&value, AMOUNT_BITS, EXP_BITS, 0, 22, Rounding::NoRound).unwrap();
        let decoded = amount_decode(encoded, EXP_BITS).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn mantissa_is_minimized_by_pushing_trailing_zeros_into_the_exponent() {
        let value = BigInt::from_u64(5_000_000_000); // 5 * 10^9
        let encoded = amount_encode(&value, AMOUNT_BITS, EXP_BITS, 0, 22, Rounding::NoRound).unwrap();
        let exponent = encoded & 0b11111;
        let mantissa = encoded >> EXP_BITS;
        assert_eq!(exponent, 9);
        assert_eq!(mantissa, 4); // (4 + 1) * 10^9
    }

    #[test]
    fn no_round_rejects_inexact_values() {
        let value = BigInt::from_u64(123);
        let err = amount_encode(&value, AMOUNT_BITS, EXP_BITS, 5, 22, Rounding::NoRound).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoExactRepresentation);
    }

    #[test]
    fn rounding_modes_bracket_the_true_value() {
        let value = BigInt::from_u64(1_234_567);
        let down = amount_decode(
            amount_encode(&value, AMOUNT_BITS, EXP_BITS, 0, 22, Rounding::Down).unwrap(),
            EXP_BITS,
        )
        .unwrap();
        let up = amount_decode(
            amount_encode(&value, AMOUNT_BITS, EXP_BITS, 0, 22, Rounding::Up).unwrap(),
            EXP_BITS,
        )
        .unwrap();
        assert!(down <= value);
        assert!(up >= value);
    }

    #[test]
    fn donation_word_round_trips_within_its_narrower_mantissa() {
        let value = BigInt::from_u64(99);
        let encoded = amount_encode(&value, 16, EXP_BITS, 0, 11, Rounding::NoRound).unwrap();
        assert_eq!(amount_decode(encoded, EXP_BITS).unwrap(), value);
    }

    #[test]
    fn scale_exponent_wraps_mod_32() {
        assert_eq!(asset_scale_exponent(0), 27);
        assert_eq!(asset_scale_exponent(5), 0);
        assert_eq!(asset_scale_exponent(4), 31);
    }
}
