//! JSON field extraction helpers shared by every verb handler (spec §4.11, §7): every facade
//! error "carries a string containing the offending key or value".

use crate::error::{ErrorKind, Result, err};
use crate::numeric::{BigInt, FieldElement};
use serde_json::Value;

pub fn field<'a>(args: &'a Value, key: &str) -> Result<&'a Value> {
    args.get(key).ok_or_else(|| err!(ErrorKind::MissingField, "{key}"))
}

pub fn opt_field<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key)
}

pub fn str_field<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    field(args, key)?.as_str().ok_or_else(|| err!(ErrorKind::InvalidValue, "{key}"))
}

pub fn u64_field(args: &Value, key: &str) -> Result<u64> {
    field(args, key)?.as_u64().ok_or_else(|| err!(ErrorKind::InvalidValue, "{key}"))
}

pub fn u64_field_or(args: &Value, key: &str, default: u64) -> Result<u64> {
    match opt_field(args, key) {
        Some(v) => v.as_u64().ok_or_else(|| err!(ErrorKind::InvalidValue, "{key}")),
        None => Ok(default),
    }
}

pub fn bool_field_or(args: &Value, key: &str, default: bool) -> Result<bool> {
    match opt_field(args, key) {
        Some(v) => v.as_bool().ok_or_else(|| err!(ErrorKind::InvalidValue, "{key}")),
        None => Ok(default),
    }
}

/// Parses a hex-string field (`0x`-prefixed or bare) into a [`BigInt`], bounded to 256 bits.
pub fn bigint_field(args: &Value, key: &str) -> Result<BigInt> {
    let s = str_field(args, key)?;
    BigInt::parse(s, 256).map_err(|e| err!(ErrorKind::InvalidNumericChar, "{key}: {e}"))
}

pub fn bigint_field_or(args: &Value, key: &str, default: BigInt) -> Result<BigInt> {
    match opt_field(args, key) {
        Some(_) => bigint_field(args, key),
        None => Ok(default),
    }
}

/// Parses a hex-string field into a [`FieldElement`] (reduced modulo the pairing-curve prime if
/// the raw value is out of range, matching how a circuit input would be bound).
pub fn field_element_field(args: &Value, key: &str) -> Result<FieldElement> {
    Ok(FieldElement::from_bigint(bigint_field(args, key)?))
}

pub fn field_element_field_or(args: &Value, key: &str, default: FieldElement) -> Result<FieldElement> {
    match opt_field(args, key) {
        Some(_) => field_element_field(args, key),
        None => Ok(default),
    }
}

pub fn bigint_to_hex(v: &BigInt) -> String {
    format!("0x{}", v.format_hex())
}

pub fn field_element_to_hex(v: &FieldElement) -> String {
    bigint_to_hex(v.as_bigint())
}

/// Decodes a `bytes` field given as a hex string, used by verbs that take or return raw byte
/// strings (wire frames, payspec bodies).
pub fn hex_bytes_field(args: &Value, key: &str) -> Result<Vec<u8>> {
    let s = str_field(args, key)?;
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    hex::decode(s).map_err(|e| err!(ErrorKind::NotHex, "{key}: {e}"))
}

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
