//! Proof-of-work stamp (spec §4.10): a SipHash-2-4-keyed nonce search that drives a payload's
//! hash below a difficulty target.
//!
//! Grounded on `original_source/source/cclib/src/CCproof.cpp`'s PoW section and `CCdef.h`'s
//! `TX_POW_NPROOFS`/`TX_POW_NONCE_BITS` constants. `siphasher::sip::SipHasher24` provides
//! SipHash-2-4 rather than a hand-rolled implementation (the crate is attested across the
//! retrieval pack).

use siphasher::sip::SipHasher24;
use std::hash::Hasher;
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of independent nonces a frame's PoW stamp must satisfy (spec §4.10).
pub const TX_POW_NPROOFS: usize = 8;
/// Each nonce is a 5-byte (40-bit) field; the search exhausts `2^40 - 1` before giving up.
pub const TX_POW_NONCE_BITS: u32 = 40;
pub const TX_POW_NONCE_MASK: u64 = (1u64 << TX_POW_NONCE_BITS) - 1;

/// The 48-byte PoW region embedded at offset 8 of every frame (spec §4.8/§6): a timestamp plus
/// eight 5-byte nonces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowStamp {
    pub timestamp: u64,
    pub nonces: [u64; TX_POW_NPROOFS],
}

impl PowStamp {
    pub const ENCODED_LEN: usize = 8 + 5 * TX_POW_NPROOFS;

    pub fn zero(timestamp: u64) -> Self {
        PowStamp {
            timestamp,
            nonces: [0; TX_POW_NPROOFS],
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..8].copy_from_slice(&self.timestamp.to_le_bytes());
        for (i, &n) in self.nonces.iter().enumerate() {
            let b = n.to_le_bytes();
            out[8 + i * 5..8 + i * 5 + 5].copy_from_slice(&b[0..5]);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::ENCODED_LEN {
            return None;
        }
        let timestamp = u64::from_le_bytes(bytes[0..8].try_into().ok()?);
        let mut nonces = [0u64; TX_POW_NPROOFS];
        for (i, n) in nonces.iter_mut().enumerate() {
            let mut buf = [0u8; 8];
            buf[0..5].copy_from_slice(&bytes[8 + i * 5..8 + i * 5 + 5]);
            *n = u64::from_le_bytes(buf);
        }
        Some(PowStamp { timestamp, nonces })
    }
}

/// Result of a PoW search or check (spec §4.10): `0` success, `1` iteration budget exhausted,
/// `-3` cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowStatus {
    Success,
    Exhausted,
    Cancelled,
}

impl PowStatus {
    pub fn to_code(self) -> i32 {
        match self {
            PowStatus::Success => 0,
            PowStatus::Exhausted => 1,
            PowStatus::Cancelled => -3,
        }
    }
}

fn sip_key(timestamp: u64, prior_nonce: u64, idx: usize) -> (u64, u64) {
    (timestamp, prior_nonce | ((idx as u64) << 40))
}

fn below_difficulty(key: (u64, u64), data: &[u8], difficulty: u64) -> bool {
    let mut h = SipHasher24::new_with_keys(key.0, key.1);
    h.write(data);
    let digest = h.finish();
    digest < difficulty
}

/// Searches for a PoW stamp over `data` (typically `tx_hash = BLAKE2b(tag || body)`) satisfying
/// `difficulty` for each of the `TX_POW_NPROOFS` nonces, sequentially per index (spec §4.10). The
/// search polls `shutdown` between nonce attempts and aborts cooperatively.
pub fn search(data: &[u8], timestamp: u64, difficulty: u64, shutdown: &AtomicBool) -> (PowStamp, PowStatus) {
    let mut stamp = PowStamp::zero(timestamp);
    let mut prior_nonce: u64 = 0;

    for idx in 0..TX_POW_NPROOFS {
        let mut nonce: u64 = 0;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return (stamp, PowStatus::Cancelled);
            }
            let key = sip_key(timestamp, prior_nonce, idx);
            if below_difficulty(key, &with_nonce(data, nonce), difficulty) {
                stamp.nonces[idx] = nonce;
                prior_nonce = nonce;
                break;
            }
            if nonce >= TX_POW_NONCE_MASK {
                return (stamp, PowStatus::Exhausted);
            }
            nonce += 1;
        }
    }
    (stamp, PowStatus::Success)
}

fn with_nonce(data: &[u8], nonce: u64) -> Vec<u8> {
    let mut v = Vec::with_capacity(data.len() + 8);
    v.extend_from_slice(data);
    v.extend_from_slice(&nonce.to_le_bytes());
    v
}

/// Checks that every nonce in `stamp` satisfies `difficulty`, chained the same way [`search`]
/// constructs them (spec §4.10).
pub fn check(data: &[u8], stamp: &PowStamp, difficulty: u64) -> bool {
    let mut prior_nonce: u64 = 0;
    for (idx, &nonce) in stamp.nonces.iter().enumerate() {
        let key = sip_key(stamp.timestamp, prior_nonce, idx);
        if !below_difficulty(key, &with_nonce(data, nonce), difficulty) {
            return false;
        }
        prior_nonce = nonce;
    }
    true
}

/// Bounds a stamp's timestamp to `[now - past_secs, now + future_secs]` (spec §4.10's "timestamp
/// age is bounded by configurable past/future allowances").
pub fn timestamp_in_window(stamp_ts: u64, now: u64, past_secs: u64, future_secs: u64) -> bool {
    let lower = now.saturating_sub(past_secs);
    let upper = now.saturating_add(future_secs);
    stamp_ts >= lower && stamp_ts <= upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_then_check_round_trips_at_a_findable_difficulty() {
        let shutdown = AtomicBool::new(false);
        // A generous difficulty so the search completes quickly in a test.
        let difficulty = u64::MAX / 4;
        let (stamp, status) = search(b"example tx hash", 1_700_000_000, difficulty, &shutdown);
        assert_eq!(status, PowStatus::Success);
        assert!(check(b"example tx hash", &stamp, difficulty));
    }

    #[test]
    fn check_fails_under_a_stricter_difficulty() {
        let shutdown = AtomicBool::new(false);
        let difficulty = u64::MAX / 4;
        let (stamp, status) = search(b"example", 1_700_000_000, difficulty, &shutdown);
        assert_eq!(status, PowStatus::Success);
        assert!(!check(b"example", &stamp, difficulty / 1_000_000));
    }

    #[test]
    fn cancellation_is_cooperative() {
        let shutdown = AtomicBool::new(true);
        let (_stamp, status) = search(b"example", 0, 1, &shutdown);
        assert_eq!(status, PowStatus::Cancelled);
    }

    #[test]
    fn stamp_round_trips_through_bytes() {
        let stamp = PowStamp {
            timestamp: 1_700_000_000,
            nonces: [1, 2, 3, 4, 5, 6, 7, 0xFF_FFFF_FFFF],
        };
        let bytes = stamp.to_bytes();
        assert_eq!(bytes.len(), PowStamp::ENCODED_LEN);
        assert_eq!(PowStamp::from_bytes(&bytes).unwrap(), stamp);
    }

    #[test]
    fn timestamp_window_bounds_are_inclusive() {
        assert!(timestamp_in_window(100, 100, 10, 10));
        assert!(timestamp_in_window(90, 100, 10, 10));
        assert!(timestamp_in_window(110, 100, 10, 10));
        assert!(!timestamp_in_window(89, 100, 10, 10));
        assert!(!timestamp_in_window(111, 100, 10, 10));
    }
}
