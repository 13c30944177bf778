//! `UniFloat` (spec §4.9, Glossary): a normalized fixed-layout floating value (sign + biased
//! exponent + mantissa, IEEE-like) with explicit rounding on every operation. Grounded on
//! `original_source/source/cclib/src/xtransaction.hpp`'s `UniFloat` (there called `uniflt_t`).

use crate::error::{ErrorKind, Result, err};

/// Rounding direction every [`UniFloat`] operation takes explicitly (spec §4.9): `-1` rounds
/// down, `0` rounds to nearest, `+1` rounds up. Downstream code picks the direction matching
/// which side of a trade the caller is on (round down crediting yourself, up debiting yourself).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Round {
    Down,
    Nearest,
    Up,
}

/// A packed 32-bit wire word: 1 sign bit, 8 biased-exponent bits (bias 127, matching IEEE-754
/// single precision layout so the bit pattern is familiar), 23 mantissa bits.
const EXP_BIAS: i32 = 127;
const MANTISSA_BITS: u32 = 23;

/// A reciprocal-safe floating-point value used for exchange rates (spec §4.9). Internally kept
/// as an `f64` for arithmetic headroom; the wire form is the packed 32-bit word above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniFloat(f64);

impl UniFloat {
    pub const ZERO: UniFloat = UniFloat(0.0);

    pub fn from_f64(v: f64) -> Self {
        UniFloat(v)
    }

    pub fn to_f64(self) -> f64 {
        self.0
    }

    /// Decodes a packed 32-bit wire word.
    pub fn from_wire(word: u32) -> Self {
        if word == 0 {
            return UniFloat::ZERO;
        }
        let sign = if word >> 31 == 1 { -1.0 } else { 1.0 };
        let biased_exp = ((word >> MANTISSA_BITS) & 0xFF) as i32;
        let mantissa = word & ((1 << MANTISSA_BITS) - 1);
        let exp = biased_exp - EXP_BIAS;
        let significand = 1.0 + (mantissa as f64) / (1u32 << MANTISSA_BITS) as f64;
        UniFloat(sign * significand * 2f64.powi(exp))
    }

    /// Encodes to a packed 32-bit wire word, rounding per `round` when the value needs more
    /// mantissa precision than the wire form carries.
    pub fn to_wire(self, round: Round) -> Result<u32> {
        if self.0 == 0.0 {
            return Ok(0);
        }
        if !self.0.is_finite() {
            return Err(err!(ErrorKind::ValueOverflow, "UniFloat value is not finite"));
        }
        let sign_bit: u32 = if self.0 < 0.0 { 1 } else { 0 };
        let magnitude = self.0.abs();
        let exp = magnitude.log2().floor() as i32;
        let significand = magnitude / 2f64.powi(exp);
        let scaled = (significand - 1.0) * (1u32 << MANTISSA_BITS) as f64;
        let mantissa = match round {
            Round::Down => scaled.floor(),
            Round::Nearest => scaled.round(),
            Round::Up => scaled.ceil(),
        };
        let (exp, mantissa) = if mantissa >= (1u32 << MANTISSA_BITS) as f64 {
            (exp + 1, 0.0)
        } else {
            (exp, mantissa)
        };
        let biased_exp = exp + EXP_BIAS;
        if !(0..=0xFF).contains(&biased_exp) {
            return Err(err!(ErrorKind::ValueOverflow, "UniFloat exponent out of range"));
        }
        Ok((sign_bit << 31) | ((biased_exp as u32) << MANTISSA_BITS) | (mantissa as u32))
    }

    pub fn add(self, other: UniFloat, round: Round) -> UniFloat {
        round_to_wire_precision(self.0 + other.0, round)
    }

    pub fn multiply(self, other: UniFloat, round: Round) -> UniFloat {
        round_to_wire_precision(self.0 * other.0, round)
    }

    pub fn divide(self, other: UniFloat, round: Round) -> Result<UniFloat> {
        if other.0 == 0.0 {
            return Err(err!(ErrorKind::InvalidValue, "division by zero UniFloat"));
        }
        Ok(round_to_wire_precision(self.0 / other.0, round))
    }

    pub fn power(self, exponent: f64, round: Round) -> UniFloat {
        round_to_wire_precision(self.0.powf(exponent), round)
    }

    pub fn average(self, other: UniFloat, round: Round) -> UniFloat {
        round_to_wire_precision((self.0 + other.0) / 2.0, round)
    }
}

fn round_to_wire_precision(v: f64, round: Round) -> UniFloat {
    if v == 0.0 || !v.is_finite() {
        return UniFloat(v);
    }
    let exp = v.abs().log2().floor() as i32;
    let scale = 2f64.powi(exp - MANTISSA_BITS as i32);
    let steps = v / scale;
    let rounded = match round {
        Round::Down => {
            if v >= 0.0 {
                steps.floor()
            } else {
                steps.ceil()
            }
        }
        Round::Up => {
            if v >= 0.0 {
                steps.ceil()
            } else {
                steps.floor()
            }
        }
        Round::Nearest => steps.round(),
    };
    UniFloat(rounded * scale)
}

/// `NetRate`: the net exchange rate a buyer receives after costs, relating `{amount, rate}` pairs
/// with the request's base/quote costs (spec §4.9).
pub fn net_rate(rate: UniFloat, base_costs: UniFloat, quote_costs: UniFloat, round: Round) -> UniFloat {
    let one_minus_base = UniFloat::from_f64(1.0).add(UniFloat::from_f64(-base_costs.to_f64()), round);
    let one_plus_quote = UniFloat::from_f64(1.0).add(quote_costs, round);
    rate.multiply(one_minus_base, round).divide(one_plus_quote, round).unwrap_or(UniFloat::ZERO)
}

/// `MatchRateRequired`: the inverse of [`net_rate`] — the gross rate that nets to
/// `required_net_rate` after the same costs.
pub fn match_rate_required(required_net_rate: UniFloat, base_costs: UniFloat, quote_costs: UniFloat, round: Round) -> UniFloat {
    let one_minus_base = UniFloat::from_f64(1.0).add(UniFloat::from_f64(-base_costs.to_f64()), round);
    let one_plus_quote = UniFloat::from_f64(1.0).add(quote_costs, round);
    if one_minus_base.to_f64() == 0.0 {
        return UniFloat::ZERO;
    }
    required_net_rate.multiply(one_plus_quote, round).divide(one_minus_base, round).unwrap_or(UniFloat::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip_preserves_common_values() {
        for v in [1.0, 0.5, 0.00001, 123.456, 2.0f64.powi(-10)] {
            let uf = UniFloat::from_f64(v);
            let word = uf.to_wire(Round::Nearest).unwrap();
            let back = UniFloat::from_wire(word);
            assert!((back.to_f64() - v).abs() / v < 1e-6, "{v} round-tripped to {}", back.to_f64());
        }
    }

    #[test]
    fn zero_round_trips_to_zero() {
        let word = UniFloat::ZERO.to_wire(Round::Nearest).unwrap();
        assert_eq!(word, 0);
        assert_eq!(UniFloat::from_wire(0).to_f64(), 0.0);
    }

    #[test]
    fn rounding_direction_brackets_the_exact_value() {
        let v = 1.0 + 2f64.powi(-30); // finer than the wire mantissa can hold exactly
        let down = round_to_wire_precision(v, Round::Down);
        let up = round_to_wire_precision(v, Round::Up);
        assert!(down.to_f64() <= v);
        assert!(up.to_f64() >= v);
    }

    #[test]
    fn net_rate_and_match_rate_required_are_approximate_inverses() {
        let rate = UniFloat::from_f64(0.00001);
        let base_costs = UniFloat::from_f64(0.001);
        let quote_costs = UniFloat::from_f64(0.002);
        let net = net_rate(rate, base_costs, quote_costs, Round::Nearest);
        let recovered = match_rate_required(net, base_costs, quote_costs, Round::Nearest);
        assert!((recovered.to_f64() - rate.to_f64()).abs() / rate.to_f64() < 1e-6);
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let err = UniFloat::from_f64(1.0).divide(UniFloat::ZERO, Round::Nearest).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
