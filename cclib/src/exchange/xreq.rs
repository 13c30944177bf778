//! `Xreq` (spec §3/§4.9): a trade request. Grounded on
//! `original_source/source/cclib/src/xtransaction-xreq.{hpp,cpp}`.

use super::rangecoded::{decode_range_coded, encode_range_coded};
use super::unifloat::{Round, UniFloat};
use crate::amount::{Rounding, amount_decode, amount_encode};
use crate::basen::base32;
use crate::error::{ErrorKind, Result, err};
use crate::numeric::BigInt;

/// `XTX_TIME_DIVISOR`: exchange-object timestamps are Unix seconds divided down before wire
/// encoding (spec §4.9).
pub const XTX_TIME_DIVISOR: u32 = 4;

/// `Xreq` request type (spec §3): buy/sell crossed with naked/simple/req/mining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XreqType {
    NakedBuy,
    NakedSell,
    SimpleBuy,
    SimpleSell,
    ReqBuy,
    ReqSell,
    MiningBuy,
    MiningSell,
    MiningTrade,
}

impl XreqType {
    pub fn is_seller(self) -> bool {
        matches!(self, XreqType::NakedSell | XreqType::SimpleSell | XreqType::ReqSell | XreqType::MiningSell)
    }

    pub fn is_naked(self) -> bool {
        matches!(self, XreqType::NakedBuy | XreqType::NakedSell)
    }

    pub fn is_mining_trade(self) -> bool {
        matches!(self, XreqType::MiningTrade)
    }
}

/// The eight single-byte knobs spec §4.9 lists by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XreqConsideration {
    pub required: u8,
    pub offered: u8,
    pub pledge: u8,
    pub hold_time: u8,
    pub hold_time_required: u8,
    pub min_wait_time: u8,
    pub accept_time_required: u8,
    pub accept_time_offered: u8,
}

/// The flag byte packing six booleans (spec §4.9); which six is this crate's own naming choice
/// since the distilled spec only pins the byte's existence and width, not its bit layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XreqFlags {
    pub is_seller: bool,
    pub cross_chain: bool,
    pub has_signing_key: bool,
    pub testnet: bool,
    pub auto_accept: bool,
    pub no_min_wait: bool,
}

impl XreqFlags {
    fn to_byte(self) -> u8 {
        (self.is_seller as u8)
            | ((self.cross_chain as u8) << 1)
            | ((self.has_signing_key as u8) << 2)
            | ((self.testnet as u8) << 3)
            | ((self.auto_accept as u8) << 4)
            | ((self.no_min_wait as u8) << 5)
    }

    fn from_byte(b: u8) -> Self {
        XreqFlags {
            is_seller: b & 1 != 0,
            cross_chain: b & 2 != 0,
            has_signing_key: b & 4 != 0,
            testnet: b & 8 != 0,
            auto_accept: b & 16 != 0,
            no_min_wait: b & 32 != 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Xreq {
    pub xreq_type: XreqType,
    pub expire_time: u32,
    pub destination: [u8; 32],
    pub min_amount: BigInt,
    pub max_amount: Option<BigInt>,
    pub net_rate_required: UniFloat,
    pub wait_discount: UniFloat,
    pub quote_costs: UniFloat,
    pub quote_asset: u16,
    pub consideration: XreqConsideration,
    pub payment_time_code: u8,
    pub confirmations: u8,
    pub flags: XreqFlags,
    pub foreign_asset: String,
    pub foreign_address: Option<String>,
    pub signing_key: Option<[u8; 32]>,
    pub nonce: Option<u64>,
}

/// `quote_asset` values for which a cross-chain `foreign_asset` symbol is implied rather than
/// transmitted (spec §4.9: "omitted for BTC/BCH when implied by quote_asset").
const QUOTE_ASSET_BTC: u16 = 1;
const QUOTE_ASSET_BCH: u16 = 2;

/// Strips a BCH CashAddr URI prefix and enforces the base-32 alphabet before range-coding (spec
/// §4.9/SPEC_FULL §9: BCH foreign-address normalization).
fn normalize_bch_address(addr: &str) -> Result<String> {
    let stripped = addr
        .strip_prefix("bitcoincash:")
        .or_else(|| addr.strip_prefix("bchtest:"))
        .or_else(|| addr.strip_prefix("bchreg:"))
        .unwrap_or(addr);
    for b in stripped.bytes() {
        if base32().destringify_char(b) == 255 {
            return Err(err!(ErrorKind::InvalidChar, "foreign address byte {b:#04x} is not valid base-32"));
        }
    }
    Ok(stripped.to_string())
}

impl Xreq {
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.expire_time / XTX_TIME_DIVISOR).to_le_bytes());
        out.extend_from_slice(&self.destination);

        let min_word = amount_encode(&self.min_amount, 40, 5, 0, 22, Rounding::NoRound)?;
        out.extend_from_slice(&min_word.to_le_bytes()[0..5]);
        if !self.xreq_type.is_mining_trade() {
            let max = self.max_amount.as_ref().ok_or_else(|| err!(ErrorKind::MissingField, "max_amount"))?;
            let max_word = amount_encode(max, 40, 5, 0, 22, Rounding::NoRound)?;
            out.extend_from_slice(&max_word.to_le_bytes()[0..5]);
        }

        out.extend_from_slice(&self.net_rate_required.to_wire(Round::Nearest)?.to_le_bytes());
        out.extend_from_slice(&self.wait_discount.to_wire(Round::Nearest)?.to_le_bytes());
        out.extend_from_slice(&self.quote_costs.to_wire(Round::Nearest)?.to_le_bytes());
        out.extend_from_slice(&self.quote_asset.to_le_bytes());

        let c = &self.consideration;
        out.extend_from_slice(&[
            c.required,
            c.offered,
            c.pledge,
            c.hold_time,
            c.hold_time_required,
            c.min_wait_time,
            c.accept_time_required,
            c.accept_time_offered,
        ]);
        out.push(self.payment_time_code);
        out.push(self.confirmations);
        out.push(self.flags.to_byte());

        if self.flags.cross_chain {
            let implied = matches!((self.quote_asset, self.foreign_asset.as_str()), (QUOTE_ASSET_BTC, "BTC") | (QUOTE_ASSET_BCH, "BCH"));
            if !implied {
                out.extend_from_slice(&encode_range_coded(base32(), self.foreign_asset.as_bytes())?);
            }
            if self.xreq_type.is_seller() {
                let addr = self.foreign_address.as_deref().ok_or_else(|| err!(ErrorKind::MissingField, "foreign_address"))?;
                let normalized = normalize_bch_address(addr)?;
                out.extend_from_slice(&encode_range_coded(base32(), normalized.as_bytes())?);
            }
        }

        if self.flags.has_signing_key {
            let key = self.signing_key.ok_or_else(|| err!(ErrorKind::MissingField, "signing_key"))?;
            out.extend_from_slice(&key);
        }

        if self.xreq_type.is_naked() {
            let nonce = self.nonce.ok_or_else(|| err!(ErrorKind::MissingField, "nonce"))?;
            out.extend_from_slice(&nonce.to_le_bytes());
        }

        Ok(out)
    }

    pub fn from_wire(xreq_type: XreqType, bytes: &[u8]) -> Result<Self> {
        let mut pos = 0usize;
        let take = |pos: &mut usize, n: usize| -> Result<std::ops::Range<usize>> {
            if *pos + n > bytes.len() {
                return Err(err!(ErrorKind::BufferOverflow, "truncated Xreq"));
            }
            let r = *pos..*pos + n;
            *pos += n;
            Ok(r)
        };

        let r = take(&mut pos, 4)?;
        let expire_time = u32::from_le_bytes(bytes[r].try_into().unwrap()) * XTX_TIME_DIVISOR;

        let r = take(&mut pos, 32)?;
        let mut destination = [0u8; 32];
        destination.copy_from_slice(&bytes[r]);

        let r = take(&mut pos, 5)?;
        let mut buf = [0u8; 8];
        buf[0..5].copy_from_slice(&bytes[r]);
        let min_amount = amount_decode(u64::from_le_bytes(buf), 5)?;

        let max_amount = if !xreq_type.is_mining_trade() {
            let r = take(&mut pos, 5)?;
            let mut buf = [0u8; 8];
            buf[0..5].copy_from_slice(&bytes[r]);
            Some(amount_decode(u64::from_le_bytes(buf), 5)?)
        } else {
            None
        };

        let r = take(&mut pos, 4)?;
        let net_rate_required = UniFloat::from_wire(u32::from_le_bytes(bytes[r].try_into().unwrap()));
        let r = take(&mut pos, 4)?;
        let wait_discount = UniFloat::from_wire(u32::from_le_bytes(bytes[r].try_into().unwrap()));
        let r = take(&mut pos, 4)?;
        let quote_costs = UniFloat::from_wire(u32::from_le_bytes(bytes[r].try_into().unwrap()));
        let r = take(&mut pos, 2)?;
        let quote_asset = u16::from_le_bytes(bytes[r].try_into().unwrap());

        let r = take(&mut pos, 8)?;
        let c = &bytes[r];
        let consideration = XreqConsideration {
            required: c[0],
            offered: c[1],
            pledge: c[2],
            hold_time: c[3],
            hold_time_required: c[4],
            min_wait_time: c[5],
            accept_time_required: c[6],
            accept_time_offered: c[7],
        };

        let r = take(&mut pos, 1)?;
        let payment_time_code = bytes[r][0];
        let r = take(&mut pos, 1)?;
        let confirmations = bytes[r][0];
        let r = take(&mut pos, 1)?;
        let flags = XreqFlags::from_byte(bytes[r][0]);

        let mut foreign_asset = String::new();
        let mut foreign_address = None;
        if flags.cross_chain {
            let implied = matches!(quote_asset, QUOTE_ASSET_BTC | QUOTE_ASSET_BCH);
            if !implied {
                foreign_asset = decode_range_coded(base32(), bytes, &mut pos)?;
            } else {
                foreign_asset = if quote_asset == QUOTE_ASSET_BTC { "BTC".to_string() } else { "BCH".to_string() };
            }
            if xreq_type.is_seller() {
                foreign_address = Some(decode_range_coded(base32(), bytes, &mut pos)?);
            }
        }

        let signing_key = if flags.has_signing_key {
            let r = take(&mut pos, 32)?;
            let mut k = [0u8; 32];
            k.copy_from_slice(&bytes[r]);
            Some(k)
        } else {
            None
        };

        let nonce = if xreq_type.is_naked() {
            let r = take(&mut pos, 8)?;
            Some(u64::from_le_bytes(bytes[r].try_into().unwrap()))
        } else {
            None
        };

        Ok(Xreq {
            xreq_type,
            expire_time,
            destination,
            min_amount,
            max_amount,
            net_rate_required,
            wait_discount,
            quote_costs,
            quote_asset,
            consideration,
            payment_time_code,
            confirmations,
            flags,
            foreign_asset,
            foreign_address,
            signing_key,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Xreq {
        Xreq {
            xreq_type: XreqType::NakedBuy,
            expire_time: 1_700_000_000 - (1_700_000_000 % XTX_TIME_DIVISOR as u32),
            destination: [7u8; 32],
            min_amount: BigInt::from_u64(10),
            max_amount: Some(BigInt::from_u64(100)),
            net_rate_required: UniFloat::from_f64(0.00001),
            wait_discount: UniFloat::ZERO,
            quote_costs: UniFloat::ZERO,
            quote_asset: QUOTE_ASSET_BTC,
            consideration: XreqConsideration::default(),
            payment_time_code: 0,
            confirmations: 1,
            flags: XreqFlags::default(),
            foreign_asset: String::new(),
            foreign_address: None,
            signing_key: None,
            nonce: Some(0),
        }
    }

    #[test]
    fn naked_buy_round_trips() {
        let xreq = sample();
        let wire = xreq.to_wire().unwrap();
        let decoded = Xreq::from_wire(XreqType::NakedBuy, &wire).unwrap();
        assert_eq!(decoded.destination, xreq.destination);
        assert_eq!(decoded.min_amount, xreq.min_amount);
        assert_eq!(decoded.max_amount, xreq.max_amount);
        assert_eq!(decoded.quote_asset, xreq.quote_asset);
        assert_eq!(decoded.nonce, xreq.nonce);
    }

    #[test]
    fn mining_trade_omits_max_amount() {
        let mut xreq = sample();
        xreq.xreq_type = XreqType::MiningTrade;
        xreq.max_amount = None;
        xreq.nonce = None;
        let wire = xreq.to_wire().unwrap();
        let decoded = Xreq::from_wire(XreqType::MiningTrade, &wire).unwrap();
        assert_eq!(decoded.max_amount, None);
    }

    #[test]
    fn bch_address_prefix_is_stripped() {
        let normalized = normalize_bch_address("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a").unwrap();
        assert!(!normalized.starts_with("bitcoincash:"));
    }

    #[test]
    fn cross_chain_seller_round_trips_foreign_asset_and_address() {
        let mut xreq = sample();
        xreq.xreq_type = XreqType::NakedSell;
        xreq.quote_asset = 99;
        xreq.flags.cross_chain = true;
        xreq.foreign_asset = "ETH".to_string();
        xreq.foreign_address = Some("9ZPMNK9MNR72PJQ".to_string());

        let wire = xreq.to_wire().unwrap();
        let decoded = Xreq::from_wire(XreqType::NakedSell, &wire).unwrap();
        assert_eq!(decoded.foreign_asset, xreq.foreign_asset);
        assert_eq!(decoded.foreign_address, xreq.foreign_address);
    }

    #[test]
    fn cross_chain_implied_asset_is_not_wire_coded() {
        let mut xreq = sample();
        xreq.flags.cross_chain = true;
        xreq.quote_asset = QUOTE_ASSET_BTC;
        xreq.foreign_asset = "BTC".to_string();

        let wire = xreq.to_wire().unwrap();
        let decoded = Xreq::from_wire(XreqType::NakedBuy, &wire).unwrap();
        assert_eq!(decoded.foreign_asset, "BTC");
    }
}
