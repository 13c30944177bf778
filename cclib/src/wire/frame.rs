//! The common frame header (spec §4.8/§6): `{u32 size, u32 tag, 48-byte PoW region}`, shared by
//! every wire object (transactions, exchange objects, queries).

use crate::error::{ErrorKind, Result, err};
use crate::pow::PowStamp;

/// `TX_MAX_SIZE = 512 KiB - 128` (spec §6): the largest a transaction frame may be.
pub const TX_MAX_SIZE: usize = 512 * 1024 - 128;
/// `CC_BLOCK_MAX_SIZE = 32 MiB - 128` (spec §6).
pub const CC_BLOCK_MAX_SIZE: usize = 32 * 1024 * 1024 - 128;
/// `CC_OID_SIZE = 16` (spec §6): the canonical object id is truncated to 128 bits.
pub const CC_OID_SIZE: usize = 16;

pub const HEADER_LEN: usize = 4 + 4 + PowStamp::ENCODED_LEN;

/// The header every frame begins with: total frame size, a `CC_TAG_*` type label, and the PoW
/// region (spec §6's frame layout diagram).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub size: u32,
    pub tag: u32,
    pub pow: PowStamp,
}

impl FrameHeader {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.tag.to_le_bytes());
        out.extend_from_slice(&self.pow.to_bytes());
    }

    /// Reads a header from the start of `bytes`. Fails with `BufferOverflow` if `bytes` is
    /// shorter than [`HEADER_LEN`], or if the embedded `size` disagrees with `bytes.len()`.
    pub fn read_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(err!(ErrorKind::BufferOverflow, "frame shorter than header ({} < {HEADER_LEN})", bytes.len()));
        }
        let size = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let tag = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        let pow = PowStamp::from_bytes(&bytes[8..HEADER_LEN]).ok_or_else(|| err!(ErrorKind::BufferOverflow, "truncated PoW region"))?;
        if size as usize != bytes.len() {
            return Err(err!(ErrorKind::BufferOverflow, "frame size field {size} does not match buffer length {}", bytes.len()));
        }
        Ok(FrameHeader { size, tag, pow })
    }

    /// Body bytes following the header.
    pub fn body(bytes: &[u8]) -> &[u8] {
        &bytes[HEADER_LEN..]
    }
}

/// Computes the PoW search preimage for a not-yet-stamped object: `BLAKE2b(tag || body,
/// key=tag_bytes)` (spec §4.10), distinct from [`object_id`] in that it hashes the body before
/// any PoW stamp is attached rather than the fully assembled frame.
pub fn tx_hash(tag: u32, body: &[u8]) -> [u8; 32] {
    use blake2::Blake2bMac;
    use blake2::digest::{Mac, consts::U32};

    let tag_bytes = tag.to_le_bytes();
    let mut mac = <Blake2bMac<U32> as Mac>::new_from_slice(&tag_bytes).expect("tag key is a valid BLAKE2b key length");
    mac.update(&tag_bytes);
    mac.update(body);
    let out = mac.finalize().into_bytes();
    let mut h = [0u8; 32];
    h.copy_from_slice(&out);
    h
}

/// Computes the canonical object id: `BLAKE2b(frame[tag..end], key=tag_bytes)` truncated to
/// `CC_OID_SIZE` bytes (spec §4.8). `frame` is the complete, already-assembled frame (size field
/// included, but the hash input deliberately starts at the tag, skipping the size).
pub fn object_id(frame: &[u8]) -> Result<[u8; CC_OID_SIZE]> {
    use blake2::Blake2bMac;
    use blake2::digest::{Mac, consts::U16};

    if frame.len() < HEADER_LEN {
        return Err(err!(ErrorKind::BufferOverflow, "frame shorter than header"));
    }
    let tag_bytes = &frame[4..8];
    let mut mac = <Blake2bMac<U16> as Mac>::new_from_slice(tag_bytes).expect("tag key is a valid BLAKE2b key length");
    mac.update(&frame[4..]);
    let out = mac.finalize().into_bytes();
    let mut oid = [0u8; CC_OID_SIZE];
    oid.copy_from_slice(&out[..CC_OID_SIZE]);
    Ok(oid)
}
