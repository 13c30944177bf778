//! `FieldElement`: a [`BigInt`] reduced modulo the pairing-curve scalar field prime (spec §3/§4.1).
//!
//! The prime is the BN254/BN128 scalar field modulus used by the original CredaCash circuit
//! (`original_source/source/cclib/src/CCbigint.hpp`'s `BN128_FR`). Multiplication here is a
//! straightforward schoolbook-then-reduce; this crate's contract with the actual proving engine
//! is abstract (spec §1, §4.5), so `FieldElement` only needs to be correct, not fast.

use super::BigInt;
use crate::error::{ErrorKind, Result, err};
use serde::Deserialize as _;
use std::fmt;

/// BN254 scalar field modulus, as 4 little-endian 64-bit limbs.
const MODULUS_LIMBS: [u64; 4] = [
    0x43e1_f593_f000_0001,
    0x2833_e848_79b9_7091,
    0xb850_45b6_8181_585d,
    0x3064_4e72_e131_a029,
];

/// Number of bits the field modulus occupies (`TX_FIELD_BITS` in spec §6).
pub const FIELD_BITS: usize = 254;

fn modulus() -> BigInt {
    BigInt::from_limbs(MODULUS_LIMBS)
}

/// An element of the pairing-curve scalar field, always kept fully reduced.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldElement(BigInt);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(BigInt::ZERO);

    /// Reduces an arbitrary [`BigInt`] modulo the field prime.
    pub fn from_bigint(v: BigInt) -> Self {
        FieldElement(reduce_256(&v))
    }

    pub fn from_u64(v: u64) -> Self {
        FieldElement(BigInt::from_u64(v))
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn bit(&self, i: usize) -> bool {
        self.0.bit(i)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &FieldElement) -> FieldElement {
        // Both operands are already reduced below a 254-bit modulus, so their sum is always
        // below 2^255 and never overflows 256 bits.
        let sum = self.0.checked_add(&other.0).expect("sum of two field elements fits in 256 bits");
        FieldElement(reduce_256(&sum))
    }

    pub fn sub(&self, other: &FieldElement) -> FieldElement {
        if self.0 >= other.0 {
            FieldElement(self.0.checked_sub(&other.0).unwrap())
        } else {
            let m = modulus();
            let diff = m.checked_sub(&other.0.checked_sub(&self.0).unwrap()).unwrap();
            FieldElement(diff)
        }
    }

    pub fn mul(&self, other: &FieldElement) -> FieldElement {
        let product = mul_wide(&self.0, &other.0);
        FieldElement(reduce_wide(&product))
    }

    pub fn square(&self) -> FieldElement {
        self.mul(self)
    }

    pub fn mask(&self, n: usize) -> FieldElement {
        let mut b = self.0;
        b.mask(n);
        FieldElement(b)
    }

    /// Truncates to the low `w` bits (used throughout §4.4 to trim hash output width).
    pub fn truncate(&self, w: usize) -> FieldElement {
        self.mask(w)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{})", self.0.format_hex())
    }
}

/// Delegates to [`BigInt`]'s hex-string representation, reduced on the way back in so a
/// deserialized value is always already a valid field element (spec §4.1's reduce-before-use
/// discipline).
impl serde::Serialize for FieldElement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for FieldElement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(FieldElement::from_bigint(BigInt::deserialize(deserializer)?))
    }
}

impl TryFrom<BigInt> for FieldElement {
    type Error = crate::error::Error;

    fn try_from(v: BigInt) -> Result<FieldElement> {
        if v >= modulus() {
            return Err(err!(ErrorKind::ValueOverflow, "value is not less than the field prime"));
        }
        Ok(FieldElement(v))
    }
}

fn reduce_256(v: &BigInt) -> BigInt {
    let m = modulus();
    let mut r = *v;
    // At most a couple of subtractions are ever needed since inputs are bounded by 2^256.
    while r >= m {
        r = r.checked_sub(&m).unwrap();
    }
    r
}

/// 512-bit product of two 256-bit values, as 8 little-endian 64-bit limbs.
fn mul_wide(a: &BigInt, b: &BigInt) -> [u64; 8] {
    let al = a.limbs();
    let bl = b.limbs();
    let mut acc = [0u128; 8];
    for i in 0..4 {
        let mut carry: u128 = 0;
        for j in 0..4 {
            let prod = al[i] as u128 * bl[j] as u128 + acc[i + j] + carry;
            acc[i + j] = prod & 0xFFFF_FFFF_FFFF_FFFF;
            carry = prod >> 64;
        }
        acc[i + 4] += carry;
    }
    let mut out = [0u64; 8];
    for i in 0..8 {
        out[i] = acc[i] as u64;
    }
    out
}

/// Reduces a 512-bit value modulo the field prime via binary long division.
fn reduce_wide(v: &[u64; 8]) -> BigInt {
    let m = modulus();
    let mut rem = BigInt::ZERO;
    for limb_idx in (0..8).rev() {
        let limb = v[limb_idx];
        for bit in (0..64).rev() {
            rem.shift_up(1);
            if (limb >> bit) & 1 != 0 {
                rem.set_bit(0, true);
            }
            if rem >= m {
                rem = rem.checked_sub(&m).unwrap();
            }
        }
    }
    rem
}
