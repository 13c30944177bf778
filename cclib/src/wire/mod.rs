//! Wire codec (spec §4.8/§6): the common frame header, the transaction body codec, and the
//! canonical object id. Exchange objects (`cclib::exchange`) share [`frame::FrameHeader`] but
//! define their own body codecs in their own module.

mod frame;
mod query;
mod tags;
mod tx_body;

pub use frame::{CC_BLOCK_MAX_SIZE, CC_OID_SIZE, FrameHeader, HEADER_LEN, TX_MAX_SIZE, object_id, tx_hash};
pub use query::{ADDRESS_TAG, PARAMETERS_TAG, SERIALNUM_TAG, address_body, parameters_body, serialnum_body};
pub use tags::{
    CC_BLOCK_FLAG, CC_TAG_BLOCK, CC_TAG_MINT, CC_TAG_QUERY_ADDRESS, CC_TAG_QUERY_PARAMETERS, CC_TAG_QUERY_SERIALNUM, CC_TAG_TX,
    CC_TAG_TX_XDOMAIN, CC_TAG_XMATCH, CC_TAG_XPAY, CC_TAG_XREQ, CC_TYPE_MINT, CC_TYPE_TXPAY, CC_TYPE_XCX_MINING_BUY, CC_TYPE_XCX_MINING_SELL,
    CC_TYPE_XCX_MINING_TRADE, CC_TYPE_XCX_NAKED_BUY, CC_TYPE_XCX_NAKED_SELL, CC_TYPE_XCX_PAYMENT, CC_TYPE_XCX_REQ_BUY, CC_TYPE_XCX_REQ_SELL,
    CC_TYPE_XCX_SIMPLE_BUY, CC_TYPE_XCX_SIMPLE_SELL, carries_domain, is_tx_tag,
};
pub use tx_body::{ProofBytes, SignedTx, decode_tx_body, encode_tx_body};

use crate::error::{ErrorKind, Result, err};
use crate::pow::PowStamp;

/// Assembles a complete frame: header (with a placeholder/zero PoW stamp the caller fills in
/// separately via [`crate::pow`]) followed by the encoded body. Fails with `BufferOverflow` if
/// the assembled frame would exceed `max_size` (spec §4.8: "Size constraints are validated on
/// both directions").
pub fn assemble_frame(tag: u32, pow: PowStamp, body: &[u8], max_size: usize) -> Result<Vec<u8>> {
    let total = HEADER_LEN + body.len();
    if total > max_size {
        return Err(err!(ErrorKind::BufferOverflow, "frame of {total} bytes exceeds the {max_size}-byte limit"));
    }
    let header = FrameHeader {
        size: u32::try_from(total).map_err(|_| err!(ErrorKind::BufferOverflow, "frame too large to fit a u32 size field"))?,
        tag,
        pow,
    };
    let mut out = Vec::with_capacity(total);
    header.write_to(&mut out);
    out.extend_from_slice(body);
    Ok(out)
}

/// Serializes a signed transaction to a complete, framed wire payload (spec §4.8's forward flow:
/// "proof+witness -> wire codec writes the framed bytes with PoW").
pub fn tx_to_wire(tag: u32, signed: &SignedTx, pow: PowStamp) -> Result<Vec<u8>> {
    let body = encode_tx_body(tag, signed)?;
    assemble_frame(tag, pow, &body, TX_MAX_SIZE)
}

/// Parses a complete framed wire payload back into a [`FrameHeader`] and a decoded [`SignedTx`]
/// (spec §4.8's inverse flow).
pub fn tx_from_wire(bytes: &[u8]) -> Result<(FrameHeader, SignedTx)> {
    let header = FrameHeader::read_from(bytes)?;
    if !is_tx_tag(header.tag) {
        return Err(err!(ErrorKind::InvalidTxType, "tag {:#010x} is not a transaction tag", header.tag));
    }
    let body = FrameHeader::body(bytes);
    let tx_type = if header.tag == CC_TAG_MINT { CC_TYPE_MINT } else { CC_TYPE_TXPAY };
    let signed = decode_tx_body(header.tag, tx_type, body)?;
    Ok((header, signed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::FieldElement;
    use crate::tx::{TxHeader, TxModeFlags, TxOutput, TxPay};

    #[test]
    fn frame_round_trips_a_mint_transaction() {
        let header = TxHeader {
            source_chain: 1,
            param_level: 3,
            param_time: 0,
            revision: 0,
            expiration: 0,
            refhash: FieldElement::ZERO,
            donation_fp: 0,
            min_output_exponent: 0,
            max_output_exponent: 22,
            merkle_root: FieldElement::ZERO,
            commitment_iv: FieldElement::ZERO,
        };
        let mut tx = TxPay::new(TxModeFlags::default(), CC_TYPE_MINT, header);
        tx.outputs.push(TxOutput {
            dest: FieldElement::from_u64(1),
            dest_chain: 1,
            paynum: 0,
            no_address: false,
            address: FieldElement::from_u64(0xDEAD_BEEF),
            acceptance_required: false,
            repeat_count: 1,
            domain: 0,
            asset: 0,
            no_asset: false,
            asset_mask: 0,
            encrypted_asset: 0,
            amount_fp: 0,
            no_amount: false,
            amount_mask: 0,
            encrypted_amount: 0,
            commitment: FieldElement::from_u64(0x42),
        });
        let signed = SignedTx {
            tx,
            proof: ProofBytes::zero(),
            zkkeyid: 0,
        };

        let frame = tx_to_wire(CC_TAG_MINT, &signed, PowStamp::zero(1_700_000_000)).unwrap();
        let (read_header, decoded) = tx_from_wire(&frame).unwrap();
        assert_eq!(read_header.tag, CC_TAG_MINT);
        assert_eq!(decoded.tx.outputs[0].commitment, signed.tx.outputs[0].commitment);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let body = vec![0u8; TX_MAX_SIZE];
        let err = assemble_frame(CC_TAG_MINT, PowStamp::zero(0), &body, TX_MAX_SIZE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverflow);
    }
}
