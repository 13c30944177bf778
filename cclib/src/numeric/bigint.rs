//! `BigInt`: four 64-bit limbs, little-endian (spec §3, §4.1).
//!
//! Ported from `original_source/source/cclib/src/CCbigint.cpp`'s `bigint_*` free functions,
//! which operated on a `snarkfront::bigint_t`'s raw limb array; here they are methods on an
//! owned, zero-initialized value type.

use crate::error::{Error, ErrorKind, Result, err};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize as _;
use std::cmp::Ordering;
use std::fmt;

use super::LIMBS;

/// A 256-bit unsigned integer stored as four little-endian 64-bit limbs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigInt {
    limbs: [u64; LIMBS],
}

impl BigInt {
    pub const ZERO: BigInt = BigInt { limbs: [0; LIMBS] };

    pub fn from_u64(v: u64) -> Self {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = v;
        BigInt { limbs }
    }

    pub fn from_u128(v: u128) -> Self {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = v as u64;
        limbs[1] = (v >> 64) as u64;
        BigInt { limbs }
    }

    pub fn limbs(&self) -> &[u64; LIMBS] {
        &self.limbs
    }

    pub fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        BigInt { limbs }
    }

    /// Test bit `i` (0 = least significant). Bits beyond the limb array read as zero.
    pub fn bit(&self, i: usize) -> bool {
        let word = i / 64;
        let shift = i % 64;
        if word >= LIMBS {
            false
        } else {
            (self.limbs[word] >> shift) & 1 != 0
        }
    }

    pub fn set_bit(&mut self, i: usize, value: bool) {
        let word = i / 64;
        let shift = i % 64;
        if word >= LIMBS {
            return;
        }
        if value {
            self.limbs[word] |= 1u64 << shift;
        } else {
            self.limbs[word] &= !(1u64 << shift);
        }
    }

    /// Shift left by `nbits`, dropping bits that fall off the top.
    pub fn shift_up(&mut self, mut nbits: usize) {
        const BPL: usize = 64;
        while nbits >= BPL {
            for i in (1..LIMBS).rev() {
                self.limbs[i] = self.limbs[i - 1];
            }
            self.limbs[0] = 0;
            nbits -= BPL;
        }
        if nbits > 0 {
            for i in (0..LIMBS).rev() {
                self.limbs[i] <<= nbits;
                if i > 0 {
                    self.limbs[i] |= self.limbs[i - 1] >> (BPL - nbits);
                }
            }
        }
    }

    /// Shift right (logical) by `nbits`.
    pub fn shift_down(&mut self, mut nbits: usize) {
        const BPL: usize = 64;
        while nbits >= BPL {
            for i in 0..LIMBS - 1 {
                self.limbs[i] = self.limbs[i + 1];
            }
            self.limbs[LIMBS - 1] = 0;
            nbits -= BPL;
        }
        if nbits > 0 {
            for i in 0..LIMBS {
                self.limbs[i] >>= nbits;
                if i < LIMBS - 1 {
                    self.limbs[i] |= self.limbs[i + 1] << (BPL - nbits);
                }
            }
        }
    }

    /// Clear all bits at or above bit `nbits`.
    pub fn mask(&mut self, nbits: usize) {
        const BPL: usize = 64;
        for i in 0..LIMBS {
            if i * BPL >= nbits {
                self.limbs[i] = 0;
            } else if (i + 1) * BPL > nbits {
                let m = (1u64 << (nbits - i * BPL)) - 1;
                self.limbs[i] &= m;
            }
        }
    }

    /// Minimal number of little-endian bytes needed to represent this value.
    pub fn bytes_in_use(&self) -> usize {
        let bytes = self.to_le_bytes();
        for i in (0..bytes.len()).rev() {
            if bytes[i] != 0 {
                return i + 1;
            }
        }
        0
    }

    /// Reverses the 32-byte little-endian image to its big-endian counterpart, limb by limb
    /// (mirrors `bigint_byteswap`, which swaps limb order and byte-swaps each limb).
    pub fn byteswap(&self) -> BigInt {
        let mut limbs = [0u64; LIMBS];
        for i in 0..LIMBS {
            limbs[i] = self.limbs[LIMBS - 1 - i].swap_bytes();
        }
        BigInt { limbs }
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.limbs.iter().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
        }
        out
    }

    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for i in 0..LIMBS {
            limbs[i] = u64::from_le_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap());
        }
        BigInt { limbs }
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut le = self.to_le_bytes();
        le.reverse();
        le
    }

    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut le = *bytes;
        le.reverse();
        Self::from_le_bytes(&le)
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    /// Fills with cryptographically secure random bits, from OS randomness (spec §5: key
    /// material outside the circuit uses OS randomness, not the in-circuit keyed PRG).
    pub fn randomize(&mut self) {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        *self = Self::from_le_bytes(&bytes);
    }

    /// Checked addition; returns `ValueOverflow` if the result does not fit in 256 bits.
    pub fn checked_add(&self, other: &BigInt) -> Result<BigInt> {
        let mut limbs = [0u64; LIMBS];
        let mut carry = 0u128;
        for i in 0..LIMBS {
            let sum = self.limbs[i] as u128 + other.limbs[i] as u128 + carry;
            limbs[i] = sum as u64;
            carry = sum >> 64;
        }
        if carry != 0 {
            return Err(err!(ErrorKind::ValueOverflow, "bigint addition overflowed 256 bits"));
        }
        Ok(BigInt { limbs })
    }

    /// Checked subtraction (`self - other`); returns `ValueOverflow` on underflow.
    pub fn checked_sub(&self, other: &BigInt) -> Result<BigInt> {
        if *other > *self {
            return Err(err!(ErrorKind::ValueOverflow, "bigint subtraction underflowed"));
        }
        let mut limbs = [0u64; LIMBS];
        let mut borrow = 0i128;
        for i in 0..LIMBS {
            let diff = self.limbs[i] as i128 - other.limbs[i] as i128 - borrow;
            if diff < 0 {
                limbs[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                limbs[i] = diff as u64;
                borrow = 0;
            }
        }
        Ok(BigInt { limbs })
    }

    /// Checked multiplication, returning `ValueOverflow` if the product does not fit in 256 bits.
    pub fn checked_mul(&self, other: &BigInt) -> Result<BigInt> {
        mul_small(self, other)
    }

    /// Checked multiplication by a `u64` scalar (used by decimal parsing/formatting and by the
    /// amount codec's power-of-ten scaling).
    pub fn checked_mul_u64(&self, m: u64) -> Result<BigInt> {
        self.checked_mul(&BigInt::from_u64(m))
    }

    /// Checked division by a `u64` scalar, returning `(quotient, remainder)`.
    pub fn divmod_u64(&self, d: u64) -> (BigInt, u64) {
        let (q, r) = divmod_small(self, &BigInt::from_u64(d));
        (q, r.limbs[0])
    }

    /// General `(quotient, remainder)` division by an arbitrary nonzero divisor (used by the
    /// amount codec, whose power-of-ten divisors outgrow a single 64-bit limb at exponent 20+).
    pub fn divmod(&self, divisor: &BigInt) -> Result<(BigInt, BigInt)> {
        if divisor.is_zero() {
            return Err(err!(ErrorKind::InvalidValue, "division by zero"));
        }
        let mut rem = BigInt::ZERO;
        let mut quot = BigInt::ZERO;
        for bit in (0..256).rev() {
            rem.shift_up(1);
            if self.bit(bit) {
                rem.set_bit(0, true);
            }
            if rem >= *divisor {
                rem = rem.checked_sub(divisor).unwrap();
                quot.set_bit(bit, true);
            }
        }
        Ok((quot, rem))
    }

    /// `10^exp` as a `BigInt`, checked against 256-bit overflow.
    pub fn pow10(exp: u32) -> Result<BigInt> {
        let mut v = BigInt::from_u64(1);
        for _ in 0..exp {
            v = v.checked_mul_u64(10)?;
        }
        Ok(v)
    }

    /// Parses a decimal or hex integer, following spec §4.1's grammar: optional sign,
    /// `0x`/`0X`/`x`/`X` hex prefix, decimal point + `eN` exponent for decimals, trailing `L`.
    /// `max_bits` bounds the accepted magnitude; a negative input sign-extends all-ones above
    /// `max_bits` once the magnitude is computed (matching the original's two's-complement
    /// truncation behavior for bit-width-bounded targets).
    pub fn parse(s: &str, max_bits: usize) -> Result<BigInt> {
        let s = s.trim();
        let s = s.strip_suffix(['L', 'l']).unwrap_or(s);
        let (neg, rest) = match s.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        if rest.is_empty() {
            return Err(err!(ErrorKind::InputEnd, "empty numeric value"));
        }

        let is_hex = rest.starts_with("0x")
            || rest.starts_with("0X")
            || rest.starts_with('x')
            || rest.starts_with('X');

        let mut value = if is_hex {
            let digits = rest
                .trim_start_matches("0x")
                .trim_start_matches("0X")
                .trim_start_matches(['x', 'X']);
            Self::parse_hex_digits(digits)?
        } else if rest.contains('.') || rest.contains(['e', 'E']) {
            Self::parse_decimal_float(rest)?
        } else {
            Self::parse_decimal_digits(rest)?
        };

        if max_bits < 256 {
            let mut bound = BigInt::from_u64(1);
            bound.shift_up(max_bits);
            let max_unsigned = bound.checked_sub(&BigInt::from_u64(1)).unwrap_or(BigInt::ZERO);
            if !neg && value > max_unsigned {
                return Err(err!(
                    ErrorKind::ValueOverflow,
                    "value does not fit in {max_bits} bits"
                ));
            }
        }

        if neg {
            // Two's complement within max_bits: sign-extend all 1s above the width.
            let mut twos = BigInt::from_u64(0).checked_sub(&value).unwrap_or(BigInt::ZERO);
            if max_bits < 256 {
                let mut ones_above = BigInt::ZERO;
                for b in max_bits..256 {
                    ones_above.set_bit(b, true);
                }
                let mut low = twos;
                low.mask(max_bits);
                twos = low.checked_add(&ones_above).unwrap_or(low);
            }
            value = twos;
        }

        Ok(value)
    }

    fn parse_decimal_digits(s: &str) -> Result<BigInt> {
        let mut value = BigInt::ZERO;
        let ten = BigInt::from_u64(10);
        for c in s.chars() {
            if !c.is_ascii_digit() {
                return Err(err!(ErrorKind::InvalidNumericChar, "invalid decimal digit '{c}'"));
            }
            value = mul_small(&value, &ten)?;
            value = value
                .checked_add(&BigInt::from_u64(c as u64 - '0' as u64))
                .map_err(|_| err!(ErrorKind::ValueOverflow, "decimal value too large"))?;
        }
        Ok(value)
    }

    fn parse_hex_digits(s: &str) -> Result<BigInt> {
        if s.is_empty() {
            return Err(err!(ErrorKind::InputEnd, "empty hex value"));
        }
        if s.len() > 64 {
            return Err(err!(ErrorKind::ValueOverflow, "hex value too long"));
        }
        let mut padded = s.to_string();
        while padded.len() < 64 {
            padded.insert(0, '0');
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| err!(ErrorKind::NotHex, "invalid hex digit in '{s}'"))?;
        Ok(BigInt::from_be_bytes(&bytes))
    }

    fn parse_decimal_float(s: &str) -> Result<BigInt> {
        // Accepts `mantissa[.fraction][eN]`; used only for integer-valued decimals with a
        // positive exponent (spec §4.1's decimal-point + exponent grammar).
        let (mantissa_part, exp_part) = match s.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<i32>().map_err(|_| {
                err!(ErrorKind::InvalidNumericChar, "invalid exponent in '{s}'")
            })?),
            None => (s, 0),
        };
        let (int_part, frac_part) = match mantissa_part.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa_part, ""),
        };
        let digits: String = format!("{int_part}{frac_part}");
        let mut value = Self::parse_decimal_digits(&digits)?;
        let shift = exp_part - frac_part.len() as i32;
        if shift < 0 {
            return Err(err!(
                ErrorKind::InvalidValue,
                "fractional value '{s}' is not an integer"
            ));
        }
        for _ in 0..shift {
            value = mul_small(&value, &BigInt::from_u64(10))?;
        }
        Ok(value)
    }

    /// Formats as lowercase hex, no `0x` prefix, minimal digits (at least one).
    pub fn format_hex(&self) -> String {
        let bytes = self.to_be_bytes();
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(31);
        let mut s = hex::encode(&bytes[start..]);
        if s.len() % 1 == 0 && s.starts_with('0') && s.len() > 1 {
            // Keep a single leading zero nibble only if the first significant byte < 0x10.
            if bytes[start] >= 0x10 {
                s = s.trim_start_matches('0').to_string();
                if s.is_empty() {
                    s.push('0');
                }
            }
        }
        s
    }

    /// Formats as decimal.
    pub fn format_dec(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        let mut v = *self;
        let ten = BigInt::from_u64(10);
        while !v.is_zero() {
            let (q, r) = divmod_small(&v, &ten);
            digits.push((r.limbs[0] as u8) + b'0');
            v = q;
        }
        digits.reverse();
        String::from_utf8(digits).unwrap()
    }
}

fn mul_small(a: &BigInt, b: &BigInt) -> Result<BigInt> {
    // Schoolbook multiply, checked against 256-bit overflow. Used for decimal parsing/
    // formatting and the amount codec's scalar scaling, not general-purpose field multiplication
    // (see `field::mul_wide`, which never overflows since both factors are field-reduced).
    let mut acc = [0u128; LIMBS * 2];
    for i in 0..LIMBS {
        if a.limbs[i] == 0 {
            continue;
        }
        let mut carry = 0u128;
        for j in 0..LIMBS {
            let prod = a.limbs[i] as u128 * b.limbs[j] as u128 + acc[i + j] + carry;
            acc[i + j] = prod & 0xFFFF_FFFF_FFFF_FFFF;
            carry = prod >> 64;
        }
        acc[i + LIMBS] += carry;
    }
    for i in LIMBS..LIMBS * 2 {
        if acc[i] != 0 {
            return Err(err!(ErrorKind::ValueOverflow, "multiplication overflowed 256 bits"));
        }
    }
    let mut limbs = [0u64; LIMBS];
    for i in 0..LIMBS {
        limbs[i] = acc[i] as u64;
    }
    Ok(BigInt { limbs })
}

fn divmod_small(a: &BigInt, divisor: &BigInt) -> (BigInt, BigInt) {
    // Long division by a small divisor (only ever called with 10), most-significant bit first.
    let d = divisor.limbs[0] as u128;
    let mut rem: u128 = 0;
    let mut q = BigInt::ZERO;
    for bit in (0..256).rev() {
        rem <<= 1;
        if a.bit(bit) {
            rem |= 1;
        }
        if rem >= d {
            rem -= d;
            q.set_bit(bit, true);
        }
    }
    (q, BigInt::from_u64(rem as u64))
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt(0x{})", self.format_hex())
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_dec())
    }
}

/// Serializes as a `0x`-prefixed hex string, the same text shape the facade (§4.11) reads and
/// writes for every field-element-valued JSON argument.
impl serde::Serialize for BigInt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.format_hex()))
    }
}

impl<'de> serde::Deserialize<'de> for BigInt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigInt::parse(&s, 256).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&BigInt> for u64 {
    type Error = Error;

    fn try_from(v: &BigInt) -> Result<u64> {
        if v.limbs[1] != 0 || v.limbs[2] != 0 || v.limbs[3] != 0 {
            return Err(err!(ErrorKind::ValueOverflow, "value does not fit in 64 bits"));
        }
        Ok(v.limbs[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_ops_on_zero() {
        let v = BigInt::ZERO;
        for i in 0..300 {
            assert!(!v.bit(i));
        }
    }

    #[test]
    fn bit_ops_on_all_ones() {
        let mut v = BigInt::ZERO;
        for i in 0..256 {
            v.set_bit(i, true);
        }
        for i in 0..300 {
            assert_eq!(v.bit(i), i < 256);
        }
    }

    #[test]
    fn shift_up_places_single_bit() {
        for j in 0..300 {
            let mut v = BigInt::from_u64(1);
            v.shift_up(j);
            for i in 0..256 {
                assert_eq!(v.bit(i), i < 256 && i == j, "bit {i} after shift_up({j})");
            }
        }
    }

    #[test]
    fn shift_up_down_roundtrip() {
        let mut r = BigInt::ZERO;
        r.randomize();
        for j in 0..256 {
            let mut up = r;
            up.shift_up(j);
            for i in 0..256 {
                let expect = if i >= j { r.bit(i - j) } else { false };
                assert_eq!(up.bit(i), expect);
            }
        }
    }

    #[test]
    fn mask_clears_high_bits() {
        let mut r = BigInt::ZERO;
        r.randomize();
        for j in 0..256 {
            let mut m = r;
            m.mask(j);
            for i in 0..256 {
                assert_eq!(m.bit(i), r.bit(i) && i < j);
            }
        }
    }

    #[test]
    fn byteswap_reverses_bytes() {
        let v = BigInt::from_u64(0x0102030405060708);
        let s = v.byteswap();
        let le = v.to_le_bytes();
        let mut expected = le;
        expected.reverse();
        assert_eq!(s.to_le_bytes(), expected);
    }

    #[test]
    fn decimal_roundtrip() {
        let mut v = BigInt::ZERO;
        v.randomize();
        v.mask(255);
        let s = v.format_dec();
        let parsed = BigInt::parse(&s, 256).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn hex_roundtrip() {
        let mut v = BigInt::ZERO;
        v.randomize();
        let s = format!("0x{}", v.format_hex());
        let parsed = BigInt::parse(&s, 256).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn negative_sign_extends_above_width() {
        let v = BigInt::parse("-1", 8).unwrap();
        for i in 0..8 {
            assert!(v.bit(i));
        }
        for i in 8..256 {
            assert!(v.bit(i));
        }
    }

    #[test]
    fn overflow_is_rejected() {
        let err = BigInt::parse("256", 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueOverflow);
    }

    #[test]
    fn divmod_matches_divmod_u64_for_small_divisors() {
        let mut v = BigInt::ZERO;
        v.randomize();
        v.mask(200);
        let (q1, r1) = v.divmod_u64(7);
        let (q2, r2) = v.divmod(&BigInt::from_u64(7)).unwrap();
        assert_eq!(q1, q2);
        assert_eq!(BigInt::from_u64(r1), r2);
    }

    #[test]
    fn divmod_handles_divisors_wider_than_one_limb() {
        let big_divisor = BigInt::pow10(25).unwrap();
        let value = big_divisor.checked_mul_u64(3).unwrap().checked_add(&BigInt::from_u64(42)).unwrap();
        let (q, r) = value.divmod(&big_divisor).unwrap();
        assert_eq!(q, BigInt::from_u64(3));
        assert_eq!(r, BigInt::from_u64(42));
    }

    #[test]
    fn pow10_matches_repeated_multiplication() {
        assert_eq!(BigInt::pow10(0).unwrap(), BigInt::from_u64(1));
        assert_eq!(BigInt::pow10(3).unwrap(), BigInt::from_u64(1000));
    }

    #[test]
    fn bytes_in_use_reports_minimal_length() {
        assert_eq!(BigInt::ZERO.bytes_in_use(), 0);
        assert_eq!(BigInt::from_u64(0xFF).bytes_in_use(), 1);
        assert_eq!(BigInt::from_u64(0x100).bytes_in_use(), 2);
    }
}
