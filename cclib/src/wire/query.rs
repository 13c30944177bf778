//! Query body codecs (spec §4.11's `tx-query-create`), grounded on
//! `original_source/source/cclib/src/txquery.cpp`'s `tx_query_{parameters,address,serialnum}_create`.
//! Each query shares the common [`super::FrameHeader`] and carries its own flat body; `inputs`
//! queries exist in the original but have no `CC_TAG_QUERY_*` counterpart among the tags this
//! crate defines (§6's fixed tag table), so this module only covers the three tags it does.

use super::tags::{CC_TAG_QUERY_ADDRESS, CC_TAG_QUERY_PARAMETERS, CC_TAG_QUERY_SERIALNUM};
use crate::error::{ErrorKind, Result, err};
use crate::numeric::FieldElement;
use crate::tx::{TX_MAXIN, TX_MAXINPATH};

/// `tx-query-parameters`: an empty body, just the common header.
pub fn parameters_body() -> Vec<u8> {
    Vec::new()
}

pub const PARAMETERS_TAG: u32 = CC_TAG_QUERY_PARAMETERS;

/// `tx-query-address`: `{blockchain: u32, address: 128-bit field, commitstart: u48, maxret: u16}`.
pub fn address_body(blockchain: u32, address: FieldElement, commitstart: u64, maxret: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 16 + 6 + 2);
    out.extend_from_slice(&blockchain.to_le_bytes());
    out.extend_from_slice(&address.as_bigint().to_le_bytes()[0..16]);
    out.extend_from_slice(&commitstart.to_le_bytes()[0..6]);
    out.extend_from_slice(&maxret.to_le_bytes());
    out
}

pub const ADDRESS_TAG: u32 = CC_TAG_QUERY_ADDRESS;

/// `tx-query-serialnum`: `{blockchain: u32, serialnums: [254-bit field]}`, at most [`TX_MAXIN`]
/// entries (the original caps this query at the max input count of a single transaction).
pub fn serialnum_body(blockchain: u32, serialnums: &[FieldElement]) -> Result<Vec<u8>> {
    if serialnums.len() > TX_MAXIN {
        return Err(err!(ErrorKind::TooManyObjects, "serialnums"));
    }
    let mut out = Vec::with_capacity(4 + serialnums.len() * 32);
    out.extend_from_slice(&blockchain.to_le_bytes());
    for s in serialnums {
        out.extend_from_slice(&s.as_bigint().to_le_bytes());
    }
    Ok(out)
}

pub const SERIALNUM_TAG: u32 = CC_TAG_QUERY_SERIALNUM;

/// Caps an `address` query's commitment-number-start field at `TX_COMMITNUM_BITS`.
pub fn commitstart_in_range(commitstart: u64) -> bool {
    commitstart < (1u64 << crate::tx::TX_COMMITNUM_BITS)
}

/// Bounds check mirroring [`TX_MAXINPATH`] for callers that want to validate an `inputs`-style
/// commitment-number list before falling back to a supported query type.
pub fn max_inputs_query_size() -> usize {
    TX_MAXINPATH
}
