//! Fixed-width big integers and the pairing-field element built on top of them (spec §4.1).

mod bigint;
mod field;

pub use bigint::BigInt;
pub use field::{FIELD_BITS, FieldElement};

/// Bit width of a [`BigInt`] (4 × 64-bit limbs).
pub const BIGINT_BITS: usize = 256;

/// Number of 64-bit limbs in a [`BigInt`].
pub const LIMBS: usize = 4;
