//! Packed binary amount forms (spec §4.2): big-endian so lexicographic byte order matches
//! numeric order, as `original_source/source/cclib/src/amounts.cpp`'s `pack_unsigned_amount`/
//! `pack_signed_amount` byte-swap their words for the same reason.

use crate::error::{ErrorKind, Result, err};
use crate::numeric::BigInt;

/// A signed integer amount, represented as a sign flag plus an unsigned magnitude. The original
/// carries a true signed 256-bit integer (`amtint_t`); this crate only needs a sign at the
/// packed-amount boundary, so a flag-plus-magnitude pair stands in for it rather than teaching
/// `BigInt` two's-complement semantics it has no other use for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedAmount {
    pub negative: bool,
    pub magnitude: BigInt,
}

impl SignedAmount {
    pub fn positive(magnitude: BigInt) -> Self {
        SignedAmount {
            negative: false,
            magnitude,
        }
    }

    pub fn negative(magnitude: BigInt) -> Self {
        SignedAmount {
            negative: true,
            magnitude,
        }
    }
}

/// `2^191`, the bias `pack_signed_amount` adds before splitting the value into three big-endian
/// words.
fn pack_offset() -> BigInt {
    let mut offset = BigInt::from_u64(1);
    offset.shift_up(191);
    offset
}

/// Packs an unsigned amount into a 128-bit big-endian byte sequence. Fails if `amount` does not
/// fit in 128 bits (the original detects this the same way: pack, unpack, and compare).
pub fn pack_unsigned_amount(amount: &BigInt) -> Result<[u8; 16]> {
    let limbs = amount.limbs();
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&limbs[1].to_be_bytes());
    bytes[8..16].copy_from_slice(&limbs[0].to_be_bytes());
    if unpack_unsigned_amount(&bytes) != *amount {
        return Err(err!(
            ErrorKind::ValueOverflow,
            "amount does not fit in a 128-bit packed unsigned amount"
        ));
    }
    Ok(bytes)
}

pub fn unpack_unsigned_amount(packed: &[u8; 16]) -> BigInt {
    let hi = u64::from_be_bytes(packed[0..8].try_into().unwrap());
    let lo = u64::from_be_bytes(packed[8..16].try_into().unwrap());
    BigInt::from_limbs([lo, hi, 0, 0])
}

/// Packs a signed amount into a 192-bit big-endian byte sequence, offset by `2^191` so binary
/// ascending order matches numeric ascending order.
pub fn pack_signed_amount(amount: &SignedAmount) -> Result<[u8; 24]> {
    let offset = pack_offset();
    let biased = if amount.negative {
        offset
            .checked_sub(&amount.magnitude)
            .map_err(|_| err!(ErrorKind::ValueOverflow, "amount does not fit in a 192-bit packed signed amount"))?
    } else {
        offset
            .checked_add(&amount.magnitude)
            .map_err(|_| err!(ErrorKind::ValueOverflow, "amount does not fit in a 192-bit packed signed amount"))?
    };
    if biased.limbs()[3] != 0 {
        return Err(err!(
            ErrorKind::ValueOverflow,
            "amount does not fit in a 192-bit packed signed amount"
        ));
    }
    let limbs = biased.limbs();
    let mut bytes = [0u8; 24];
    bytes[0..8].copy_from_slice(&limbs[2].to_be_bytes());
    bytes[8..16].copy_from_slice(&limbs[1].to_be_bytes());
    bytes[16..24].copy_from_slice(&limbs[0].to_be_bytes());
    Ok(bytes)
}

pub fn unpack_signed_amount(packed: &[u8; 24]) -> SignedAmount {
    let hi = u64::from_be_bytes(packed[0..8].try_into().unwrap());
    let mid = u64::from_be_bytes(packed[8..16].try_into().unwrap());
    let lo = u64::from_be_bytes(packed[16..24].try_into().unwrap());
    let biased = BigInt::from_limbs([lo, mid, hi, 0]);
    let offset = pack_offset();
    if biased >= offset {
        SignedAmount::positive(biased.checked_sub(&offset).unwrap())
    } else {
        SignedAmount::negative(offset.checked_sub(&biased).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_round_trips() {
        let v = BigInt::from_u64(0xDEAD_BEEF_CAFE);
        let packed = pack_unsigned_amount(&v).unwrap();
        assert_eq!(unpack_unsigned_amount(&packed), v);
    }

    #[test]
    fn unsigned_pack_rejects_values_above_128_bits() {
        let mut v = BigInt::from_u64(1);
        v.shift_up(128);
        assert_eq!(pack_unsigned_amount(&v).unwrap_err().kind(), ErrorKind::ValueOverflow);
    }

    #[test]
    fn unsigned_binary_order_matches_numeric_order() {
        let small = pack_unsigned_amount(&BigInt::from_u64(1)).unwrap();
        let large = pack_unsigned_amount(&BigInt::from_u64(2)).unwrap();
        assert!(small < large);
    }

    #[test]
    fn signed_round_trips_positive_and_negative() {
        let pos = SignedAmount::positive(BigInt::from_u64(12345));
        let neg = SignedAmount::negative(BigInt::from_u64(12345));
        assert_eq!(unpack_signed_amount(&pack_signed_amount(&pos).unwrap()), pos);
        assert_eq!(unpack_signed_amount(&pack_signed_amount(&neg).unwrap()), neg);
    }

    #[test]
    fn signed_binary_order_matches_numeric_order() {
        let neg = pack_signed_amount(&SignedAmount::negative(BigInt::from_u64(5))).unwrap();
        let zero = pack_signed_amount(&SignedAmount::positive(BigInt::ZERO)).unwrap();
        let pos = pack_signed_amount(&SignedAmount::positive(BigInt::from_u64(5))).unwrap();
        assert!(neg < zero);
        assert!(zero < pos);
    }

    #[test]
    fn zero_is_not_considered_negative_after_round_trip() {
        let zero = SignedAmount::negative(BigInt::ZERO);
        let packed = pack_signed_amount(&zero).unwrap();
        assert_eq!(unpack_signed_amount(&packed), SignedAmount::positive(BigInt::ZERO));
    }
}
