//! The public knapsack base table and the per-domain basis PRF keys (spec §4.4).
//!
//! The original (`original_source/source/cclib/src/zkhash.hpp`'s `HashBases`, backed by a
//! compiled-in `HashBases.h` table) ships a literal ≈25,000-entry table of field elements and a
//! matching `hash_bases_prfkeys` array; neither the table data nor the header are part of the
//! retrieved source. This module regenerates an equivalent table deterministically from a fixed
//! seed with a keyed BLAKE2b PRG, so the hash is internally self-consistent and reproducible
//! across processes — see `DESIGN.md` for why literal bit-compatibility with the live base table
//! isn't in scope (the ZK proof engine itself is abstracted per spec §1).

use crate::numeric::FieldElement;
use blake2::Blake2b512;
use blake2::digest::Digest;
use std::sync::OnceLock;

/// Index of the first "random" base; bases `0..RANDOM_START` are the powers of two `2^i`, used
/// to decompose a value into bits via a sequential knapsack over the `!prfkey` bases.
pub const RANDOM_START: usize = 256;

/// Number of random bases; must be a power of two (the non-sequential PRF selects a base by
/// masking a SipHash output to this range).
pub const NRANDOM: usize = 16384;

/// Total size of the compiled-in base table.
pub const TABLE_SIZE: usize = RANDOM_START + NRANDOM;

/// The public knapsack base table: `0..RANDOM_START` are powers of two, `RANDOM_START..` are
/// pseudorandom field elements derived from a fixed seed.
pub fn base_table() -> &'static [FieldElement] {
    static TABLE: OnceLock<Vec<FieldElement>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Vec::with_capacity(TABLE_SIZE);
        for i in 0..RANDOM_START {
            let mut v = crate::numeric::BigInt::from_u64(1);
            v.shift_up(i);
            table.push(FieldElement::from_bigint(v));
        }
        for i in 0..NRANDOM {
            table.push(FieldElement::from_bigint(prg_bigint(b"CredaCash/HashBases/random", i as u64)));
        }
        table
    })
}

/// One of the twelve domain-separation basis tags a hash call can use (spec §4.4): eleven named
/// derivations plus the unkeyed Merkle-node tag (`basis = -1` in the original, which skips the
/// PRF and uses sequential random bases directly).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    Root,
    Spend,
    Trust,
    Monitor,
    Recv,
    Dest,
    Addr,
    Enc,
    Commit,
    Serial,
    Leaf,
    MerkleNode,
}

impl Basis {
    /// The 128-bit PRF key compiled in for this domain, or `None` for [`Basis::MerkleNode`]
    /// (the original passes a null `prfkey` for `basis < 0`, which short-circuits both the
    /// sequential and PRF-selected base assignment to a single shared, domain-free sequence).
    fn prf_key(self) -> Option<[u64; 2]> {
        let label: &[u8] = match self {
            Basis::Root => b"CredaCash/HashBases/prf/root",
            Basis::Spend => b"CredaCash/HashBases/prf/spend",
            Basis::Trust => b"CredaCash/HashBases/prf/trust",
            Basis::Monitor => b"CredaCash/HashBases/prf/monitor",
            Basis::Recv => b"CredaCash/HashBases/prf/recv",
            Basis::Dest => b"CredaCash/HashBases/prf/dest",
            Basis::Addr => b"CredaCash/HashBases/prf/addr",
            Basis::Enc => b"CredaCash/HashBases/prf/enc",
            Basis::Commit => b"CredaCash/HashBases/prf/commit",
            Basis::Serial => b"CredaCash/HashBases/prf/serial",
            Basis::Leaf => b"CredaCash/HashBases/prf/leaf",
            Basis::MerkleNode => return None,
        };
        let mut hasher = Blake2b512::new();
        hasher.update(label);
        let digest = hasher.finalize();
        let lo = u64::from_le_bytes(digest[0..8].try_into().unwrap());
        let hi = u64::from_le_bytes(digest[8..16].try_into().unwrap());
        Some([lo, hi])
    }

    /// Picks the base-table index for bit `i` of a knapsack sum: `sequential` follows the
    /// PRF-seeded running counter `basisi`; non-sequential draws a SipHash-selected index from
    /// the same counter. Mirrors `Knapsack1`'s `bases[i]` assignment.
    pub(super) fn base_index(self, basisi: &mut u32, sequential: bool) -> usize {
        let Some(key) = self.prf_key() else {
            // basis < 0 in the original: both knapsacks walk the random region sequentially by
            // bit position, independent of `basisi`.
            let index = RANDOM_START + (*basisi as usize % NRANDOM);
            *basisi += 1;
            return index;
        };

        let raw: u64 = if sequential {
            key[0].wrapping_add(*basisi as u64)
        } else {
            siphash_keyed(key, *basisi)
        };
        *basisi += 1;

        RANDOM_START + (raw as usize & (NRANDOM - 1))
    }
}

/// SipHash-2-4 keyed by a 128-bit key over a `u32` counter, mirroring `siphash_keyed` in the
/// original's non-sequential basis selection.
fn siphash_keyed(key: [u64; 2], counter: u32) -> u64 {
    use siphasher::sip::SipHasher24;
    use std::hash::Hasher;
    let mut h = SipHasher24::new_with_keys(key[0], key[1]);
    h.write_u32(counter);
    h.finish()
}

/// Deterministic field-element PRG: `BLAKE2b(label || counter)`, reduced modulo the field prime.
fn prg_bigint(label: &[u8], counter: u64) -> crate::numeric::BigInt {
    let mut hasher = Blake2b512::new();
    hasher.update(label);
    hasher.update(counter.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest[0..32]);
    crate::numeric::BigInt::from_le_bytes(&bytes)
}
