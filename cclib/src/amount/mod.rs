//! Amount codecs: mantissa/exponent floating amounts, packed binary forms, decimal strings
//! (spec §3, §4.2).
//!
//! Ground truth for bit layouts and rounding rules is
//! `original_source/source/cclib/src/amounts.{h,cpp}`. The original represents an integer
//! amount as a 256-bit *signed* checked integer (`amtint_t`) and converts through a 50-digit
//! decimal float (`amtfloat_t`) for human display; this module keeps the unsigned [`BigInt`] for
//! the integer side (amounts decoded from a mantissa/exponent word are never negative) and a
//! small [`packed::SignedAmount`] wrapper only where the wire format needs a sign, and produces
//! decimal strings by exact digit-shifting on the integer instead of routing through a
//! floating-point type — same rounding behavior, no precision loss to track.

mod codec;
mod decimal;
mod packed;

pub use codec::{Rounding, amount_decode, amount_encode, asset_scale_exponent, asset_scale_factor};
pub use decimal::amount_to_decimal_string;
pub use packed::{SignedAmount, pack_signed_amount, pack_unsigned_amount, unpack_signed_amount, unpack_unsigned_amount};

/// `ASSET_NO_SCALE` from spec §4.2: the asset id whose scale exponent is defined to be 0.
pub const ASSET_NO_SCALE: i64 = -27;

/// Bit width of a transaction amount word (`TX_AMOUNT_BITS`, spec §6): 5 exponent bits, 35
/// mantissa bits.
pub const TX_AMOUNT_BITS: u32 = 40;

/// Bit width of a donation word (`TX_DONATION_BITS`, spec §6): 5 exponent bits, 11 mantissa bits.
pub const TX_DONATION_BITS: u32 = 16;

/// Width of the asset-id field consumed by the output encryption pad (`TX_ASSET_BITS`, spec §4.4).
pub const TX_ASSET_BITS: usize = 64;

/// Exponent field width shared by both the amount and donation words.
pub const EXPONENT_BITS: u32 = 5;

/// Number of 64-bit words in a packed unsigned amount (spec §4.2).
pub const AMOUNT_UNSIGNED_PACKED_BYTES: usize = 16;

/// Number of bytes in a packed signed amount (spec §4.2).
pub const AMOUNT_SIGNED_PACKED_BYTES: usize = 24;
