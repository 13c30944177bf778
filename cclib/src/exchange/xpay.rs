//! `Xpay` (spec §3/§4.9): a claim that a foreign-chain payment satisfied a match. Grounded on
//! `original_source/source/cclib/src/xtransaction-xpay.{hpp,cpp}`.

use super::rangecoded::{decode_range_coded, encode_range_coded};
use super::unifloat::{Round, UniFloat};
use crate::basen::base16;
use crate::error::{ErrorKind, Result, err};

use blake2::Blake2s256;
use blake2::digest::Digest;

/// `Xpay`: `{xmatchnum, foreign_amount (UniFloat wire), range-coded foreign_txid, range-coded
/// foreign_block_id}` (spec §4.9). `foreign_block_id` is absent for chains whose payment proof
/// doesn't carry a block identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Xpay {
    pub xmatchnum: u64,
    pub foreign_amount: UniFloat,
    pub foreign_txid: String,
    pub foreign_block_id: Option<String>,
    pub foreign_address: String,
    pub foreign_blockchain: u16,
}

impl Xpay {
    pub fn to_wire(&self, round: Round) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.xmatchnum.to_le_bytes());
        out.extend_from_slice(&self.foreign_amount.to_wire(round)?.to_le_bytes());
        out.extend_from_slice(&self.foreign_blockchain.to_le_bytes());
        out.extend_from_slice(&encode_range_coded(base16(), self.foreign_txid.as_bytes())?);
        match &self.foreign_block_id {
            Some(id) => {
                out.push(1);
                out.extend_from_slice(&encode_range_coded(base16(), id.as_bytes())?);
            }
            None => out.push(0),
        }
        out.extend_from_slice(&encode_range_coded(base16(), self.foreign_address.as_bytes())?);
        Ok(out)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        let mut pos = 0usize;
        let take = |pos: &mut usize, n: usize| -> Result<std::ops::Range<usize>> {
            if *pos + n > bytes.len() {
                return Err(err!(ErrorKind::BufferOverflow, "truncated Xpay"));
            }
            let r = *pos..*pos + n;
            *pos += n;
            Ok(r)
        };

        let r = take(&mut pos, 8)?;
        let xmatchnum = u64::from_le_bytes(bytes[r].try_into().unwrap());
        let r = take(&mut pos, 4)?;
        let foreign_amount = UniFloat::from_wire(u32::from_le_bytes(bytes[r].try_into().unwrap()));
        let r = take(&mut pos, 2)?;
        let foreign_blockchain = u16::from_le_bytes(bytes[r].try_into().unwrap());
        let foreign_txid = decode_range_coded(base16(), bytes, &mut pos)?;

        let r = take(&mut pos, 1)?;
        let has_block_id = bytes[r][0] != 0;
        let foreign_block_id = if has_block_id { Some(decode_range_coded(base16(), bytes, &mut pos)?) } else { None };

        let foreign_address = decode_range_coded(base16(), bytes, &mut pos)?;

        Ok(Xpay {
            xmatchnum,
            foreign_amount,
            foreign_txid,
            foreign_block_id,
            foreign_address,
            foreign_blockchain,
        })
    }

    /// `payment_id_hash` (spec §4.9): `BLAKE2s(foreign_blockchain, [foreign_block_id,]
    /// foreign_txid, foreign_address)`, an on-chain anti-replay serial number for a foreign
    /// payment. `foreign_block_id` is folded into the preimage only when present, so chains that
    /// don't expose one don't silently hash a sentinel into every claim.
    pub fn payment_id_hash(&self) -> [u8; 32] {
        let mut hasher = Blake2s256::new();
        hasher.update(self.foreign_blockchain.to_le_bytes());
        if let Some(block_id) = &self.foreign_block_id {
            hasher.update(block_id.as_bytes());
        }
        hasher.update(self.foreign_txid.as_bytes());
        hasher.update(self.foreign_address.as_bytes());
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Xpay {
        Xpay {
            xmatchnum: 42,
            foreign_amount: UniFloat::from_f64(1.5),
            foreign_txid: "deadbeef".to_string(),
            foreign_block_id: Some("cafe".to_string()),
            foreign_address: "1a2b3c".to_string(),
            foreign_blockchain: 1,
        }
    }

    #[test]
    fn round_trips_with_block_id() {
        let xpay = sample();
        let wire = xpay.to_wire(Round::Nearest).unwrap();
        let decoded = Xpay::from_wire(&wire).unwrap();
        assert_eq!(decoded, xpay);
    }

    #[test]
    fn round_trips_without_block_id() {
        let mut xpay = sample();
        xpay.foreign_block_id = None;
        let wire = xpay.to_wire(Round::Nearest).unwrap();
        let decoded = Xpay::from_wire(&wire).unwrap();
        assert_eq!(decoded.foreign_block_id, None);
    }

    #[test]
    fn payment_id_hash_changes_when_block_id_is_omitted() {
        let with_block = sample();
        let mut without_block = sample();
        without_block.foreign_block_id = None;
        assert_ne!(with_block.payment_id_hash(), without_block.payment_id_hash());
    }

    #[test]
    fn payment_id_hash_is_deterministic() {
        let xpay = sample();
        assert_eq!(xpay.payment_id_hash(), xpay.payment_id_hash());
    }
}
