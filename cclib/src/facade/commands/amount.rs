//! `encode-amount` / `decode-amount` (spec §4.11/§4.2): JSON-typed wrappers over
//! `cclib::amount::{amount_encode, amount_decode}` plus the asset-scale and decimal-string
//! helpers those two verbs expose for convenience.

use serde_json::{Value, json};

use crate::amount::{Rounding, amount_decode, amount_encode, amount_to_decimal_string, asset_scale_exponent, asset_scale_factor};
use crate::error::{ErrorKind, Result, err};
use crate::facade::helpers::*;

fn rounding_field(args: &Value) -> Result<Rounding> {
    match opt_field(args, "rounding") {
        Some(v) => serde_json::from_value(v.clone()).map_err(|_| err!(ErrorKind::InvalidValue, "rounding")),
        None => Ok(Rounding::Closest),
    }
}

/// `encode-amount`: `{value, amount_bits, exponent_bits, min_exponent, max_exponent, rounding?}`
/// -> `{word, exact}`, where `exact` reports whether the requested `value` had an exact
/// mantissa/exponent representation (spec §4.2).
pub fn encode(args: &Value) -> Result<Value> {
    let value = bigint_field(args, "value")?;
    let amount_bits = u64_field(args, "amount_bits")? as u32;
    let exponent_bits = u64_field(args, "exponent_bits")? as u32;
    let min_exp = u64_field_or(args, "min_exponent", 0)? as u32;
    let max_exp = u64_field_or(args, "max_exponent", 22)? as u32;
    let rounding = rounding_field(args)?;

    let word = amount_encode(&value, amount_bits, exponent_bits, min_exp, max_exp, rounding)?;
    let decoded = amount_decode(word, exponent_bits)?;
    Ok(json!({ "word": word, "exact": decoded == value }))
}

/// `decode-amount`: `{word, exponent_bits}` -> `{value, decimal}`.
pub fn decode(args: &Value) -> Result<Value> {
    let word = u64_field(args, "word")?;
    let exponent_bits = u64_field(args, "exponent_bits")? as u32;
    let value = amount_decode(word, exponent_bits)?;
    Ok(json!({ "value": bigint_to_hex(&value), "decimal": amount_to_decimal_string(&value, 0, false) }))
}

/// `asset-scale`: `{asset}` -> `{exponent, factor}` (spec §4.2's `ASSET_NO_SCALE`-relative
/// per-asset decimal scaling).
pub fn asset_scale(args: &Value) -> Result<Value> {
    let asset = u64_field(args, "asset")?;
    let exponent = asset_scale_exponent(asset);
    let factor = asset_scale_factor(asset);
    Ok(json!({ "exponent": exponent, "factor": bigint_to_hex(&factor) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_round_trips_an_exact_value() {
        let encoded = encode(&json!({
            "value": "0x2540BE400", // 10_000_000_000
            "amount_bits": 40u64, "exponent_bits": 5u64, "min_exponent": 0u64, "max_exponent": 22u64,
        }))
        .unwrap();
        assert_eq!(encoded["exact"], true);

        let decoded = decode(&json!({ "word": encoded["word"], "exponent_bits": 5u64 })).unwrap();
        assert_eq!(decoded["value"], "0x2540be400");
    }

    #[test]
    fn asset_scale_matches_the_documented_wraparound() {
        let v = asset_scale(&json!({ "asset": 0u64 })).unwrap();
        assert_eq!(v["exponent"], 27);
    }

    #[test]
    fn no_round_inexact_value_reports_no_exact_representation() {
        let err = encode(&json!({
            "value": "0x7B", // 123
            "amount_bits": 40u64, "exponent_bits": 5u64, "min_exponent": 5u64, "max_exponent": 22u64,
            "rounding": "no_round",
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoExactRepresentation);
    }
}
