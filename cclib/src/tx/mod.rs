//! Transaction model and limits (spec §3/§4.7): `TxPay`'s mode flags, public header, output and
//! input vectors, Merkle paths, and the derived-during-build bookkeeping, plus `precheck`.

mod precheck;
mod spend_secret;

pub use precheck::precheck;
pub use spend_secret::{SpendSecret, SpendSecretParams};

use crate::numeric::{BigInt, FieldElement};
use serde::{Deserialize, Serialize};

/// `CC_TYPE_MINT`: a mint transaction with no inputs.
pub const CC_TYPE_MINT: u32 = 0;
/// `CC_TYPE_TXPAY`: an ordinary spend transaction.
pub const CC_TYPE_TXPAY: u32 = 1;

pub const TX_MAXIN: usize = 8;
pub const TX_MAXOUT: usize = 10;
pub const TX_MAXINPATH: usize = 8;
pub const TX_MERKLE_DEPTH: usize = 40;
pub const TX_MAX_SECRETS: usize = 7;
pub const TX_MAX_SECRET_SLOTS: usize = 8;
pub const TX_MAX_RESTRICTED_ADDRESSES: usize = 6;
pub const CC_OID_SIZE: usize = 16;

pub const TX_FIELD_BITS: usize = 254;
pub const TX_INPUT_BITS: usize = 256;
pub const TX_ADDRESS_BITS: usize = 128;
pub const TX_DONATION_BITS: u32 = 16;
pub const TX_COMMIT_IV_BITS: usize = 128;
pub const TX_ENC_IV_BITS: usize = 24;
pub const TX_COMMITNUM_BITS: u32 = 48;
pub const TX_SERIALNUM_BITS: usize = 254;
pub const TX_HASHKEY_WIRE_BITS: usize = 128;
pub const TX_PAYNUM_BITS: u32 = 20;
pub const TX_DESTNUM_BITS: u32 = 30;
pub const TX_TIME_BITS: u32 = 32;
pub const TX_BLOCKLEVEL_BITS: u32 = 40;
pub const TX_DELAYTIME_BITS: u32 = 8;

/// `TX_CC_MINT_AMOUNT`: the fixed mint amount for asset 0 (spec §8 scenario S1).
pub const TX_CC_MINT_AMOUNT: u128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Low bits of `dest` whose all-zero pattern forces `acceptance_required` (spec §4.5).
pub const TX_ACCEPT_REQ_DEST_MASK: u32 = 0x01F;
/// Middle bits of `dest` whose all-zero pattern forces `paynum == 0` (spec §4.5).
pub const TX_STATIC_ADDRESS_MASK: u32 = 0xFE0;

/// Mode flags controlling how a [`TxPay`] is built and checked (spec §3).
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TxModeFlags {
    pub no_precheck: bool,
    pub no_proof: bool,
    pub no_verify: bool,
    /// Nonzero selects which blessed variable `test_make_bad` corrupts; zero builds a valid tx.
    pub test_make_bad: u32,
    pub random_seed: u64,
}

/// The transaction's public header (spec §3): chain parameters, the commitment IV, and the
/// donation field shared by every output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxHeader {
    pub source_chain: u32,
    pub param_level: u32,
    pub param_time: u32,
    pub revision: u16,
    pub expiration: u32,
    pub refhash: FieldElement,
    pub donation_fp: u64,
    pub min_output_exponent: u8,
    pub max_output_exponent: u8,
    pub merkle_root: FieldElement,
    pub commitment_iv: FieldElement,
}

/// One entry of the output vector (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxOutput {
    pub dest: FieldElement,
    pub dest_chain: u32,
    pub paynum: u32,
    pub no_address: bool,
    pub address: FieldElement,
    pub acceptance_required: bool,
    pub repeat_count: u32,
    pub domain: u64,
    pub asset: u64,
    pub no_asset: bool,
    pub asset_mask: u64,
    pub encrypted_asset: u64,
    pub amount_fp: u64,
    pub no_amount: bool,
    pub amount_mask: u64,
    pub encrypted_amount: u64,
    pub commitment: FieldElement,
}

/// One entry of the input vector (spec §3). `enforce_*` flags select which verification clause
/// this input drives; at most one of `enforce_master_secret`/`enforce_spend_secrets`/
/// `enforce_trust_secrets`/`enforce_freeze`/`enforce_unfreeze` may be set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TxInputEnforce {
    pub enforce_master_secret: bool,
    pub enforce_spend_secrets: bool,
    pub enforce_trust_secrets: bool,
    pub enforce_freeze: bool,
    pub enforce_unfreeze: bool,
    pub enforce_address: bool,
    pub enforce_serialnum: bool,
    pub enforce_path: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxInput {
    pub enforce: TxInputEnforce,
    pub params: SpendSecretParams,
    pub secrets: SpendSecret,
    pub merkle_root: FieldElement,
    pub invalmax: u64,
    pub delaytime: u8,
    pub domain: u64,
    pub asset: u64,
    pub amount_fp: u64,
    pub commitment_iv: FieldElement,
    pub commitment: FieldElement,
    pub commitnum: u64,
    pub no_serialnum: bool,
    pub serialnum: FieldElement,
    pub hashkey: u128,
    pub spendspec_hashed: bool,
    pub pathnum: u32,
}

/// A full Merkle authentication path: `TX_MERKLE_DEPTH` sibling field elements.
pub type MerklePath = [FieldElement; TX_MERKLE_DEPTH];

/// The transaction model (spec §3): mode flags, type, public header, output/input vectors, Merkle
/// paths, and fields derived while building the transaction (the asset list, validity flags).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TxPay {
    pub mode: TxModeFlags,
    pub tx_type: u32,
    pub header: TxHeader,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default, with = "merkle_path_list_serde")]
    pub paths: Vec<MerklePath>,
    /// Recomputed by [`TxPay::set_dependents`]; a caller-supplied value is always ignored and
    /// overwritten, so deserializing one in facade requests is harmless rather than meaningful.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    asset_list: Vec<u64>,
    #[serde(default)]
    spend_secrets_valid: bool,
    /// Recomputed by [`TxPay::set_dependents`]: `CC_TYPE_MINT`'s implicit asset-0 input (spec §8
    /// S1), carried as a conservation-only quantity rather than a full [`TxInput`] (the original's
    /// `set_mint_inputs` synthesizes a whole `TxIn` with its own commitment and secret chain, but
    /// this crate has no prior UTXO for a mint to spend from — `None` for `CC_TYPE_TXPAY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    implicit_mint_amount: Option<BigInt>,
}

/// `serde(with = ...)` helper for `Vec<[FieldElement; TX_MERKLE_DEPTH]>`: serde's array impls
/// only go up to 32 elements, so a Merkle path (40 elements) is carried through JSON as a
/// `Vec<FieldElement>` of exactly that length instead.
mod merkle_path_list_serde {
    use super::{FieldElement, MerklePath, TX_MERKLE_DEPTH};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(paths: &[MerklePath], serializer: S) -> Result<S::Ok, S::Error> {
        let as_vecs: Vec<Vec<FieldElement>> = paths.iter().map(|p| p.to_vec()).collect();
        as_vecs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<MerklePath>, D::Error> {
        let as_vecs: Vec<Vec<FieldElement>> = Vec::deserialize(deserializer)?;
        as_vecs
            .into_iter()
            .map(|v| {
                <MerklePath>::try_from(v).map_err(|v| serde::de::Error::custom(format!("Merkle path has {} entries, expected {TX_MERKLE_DEPTH}", v.len())))
            })
            .collect()
    }
}

impl TxPay {
    pub fn new(mode: TxModeFlags, tx_type: u32, header: TxHeader) -> Self {
        TxPay {
            mode,
            tx_type,
            header,
            outputs: Vec::new(),
            inputs: Vec::new(),
            paths: Vec::new(),
            asset_list: Vec::new(),
            spend_secrets_valid: false,
            implicit_mint_amount: None,
        }
    }

    pub fn nout(&self) -> usize {
        self.outputs.len()
    }

    pub fn nin(&self) -> usize {
        self.inputs.len()
    }

    pub fn nin_with_path(&self) -> usize {
        self.inputs.iter().filter(|i| i.enforce.enforce_path).count()
    }

    /// Populates `__asset_list`, `____spend_secrets_valid`, each input's `commitment_iv`, and
    /// (where `require_public_hashkey` applies) each input's `hashkey`, from the current
    /// input/output vectors. Must run before [`precheck`].
    ///
    /// `commitment_iv` is the low `TX_COMMIT_IV_BITS` bits of `header.merkle_root` (grounded on
    /// `original_source/source/cclib/src/transaction.cpp`'s `tx_set_commit_iv`, which settled on
    /// truncating the Merkle root rather than giving the payor any control over the value). A
    /// caller-supplied `header.commitment_iv` is always overwritten.
    pub fn set_dependents(&mut self) {
        self.header.commitment_iv = self.header.merkle_root.mask(TX_COMMIT_IV_BITS);

        self.implicit_mint_amount = if self.tx_type == CC_TYPE_MINT { Some(BigInt::from_u128(TX_CC_MINT_AMOUNT)) } else { None };

        let mut assets: Vec<u64> = self.inputs.iter().map(|i| i.asset).chain(self.outputs.iter().map(|o| o.asset)).collect();
        if self.implicit_mint_amount.is_some() {
            assets.push(0);
        }
        assets.sort_unstable();
        assets.dedup();
        self.asset_list = assets;
        self.spend_secrets_valid = self.inputs.iter().all(|i| {
            i.enforce.enforce_master_secret
                || i.enforce.enforce_spend_secrets
                || i.enforce.enforce_trust_secrets
                || i.enforce.enforce_freeze
                || i.enforce.enforce_unfreeze
        });

        for input in &mut self.inputs {
            input.commitment_iv = self.header.commitment_iv;
            // RULE tx input: if require_public_hashkey and spend_secrets_valid, then hashkey
            // must equal the input's second spend secret (slot 1), which is then public.
            // Otherwise this crate defaults hashkey to zero rather than drawing fresh
            // randomness, since a facade caller that wants a random hashkey can request one
            // explicitly via `generate-random`.
            if input.params.receive.require_public_hashkey && self.spend_secrets_valid {
                let limbs = input.secrets.spend[1].as_bigint().limbs();
                input.hashkey = (limbs[0] as u128) | ((limbs[1] as u128) << 64);
            } else if !input.params.receive.require_public_hashkey {
                input.hashkey = 0;
            }
        }
    }

    pub fn asset_list(&self) -> &[u64] {
        &self.asset_list
    }

    pub fn spend_secrets_valid(&self) -> bool {
        self.spend_secrets_valid
    }

    /// `CC_TYPE_MINT`'s implicit asset-0 input amount (spec §8 S1), `None` for `CC_TYPE_TXPAY`.
    pub fn implicit_mint_amount(&self) -> Option<BigInt> {
        self.implicit_mint_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_header() -> TxHeader {
        TxHeader {
            source_chain: 1,
            param_level: 0,
            param_time: 0,
            revision: 0,
            expiration: 0,
            refhash: FieldElement::ZERO,
            donation_fp: 0,
            min_output_exponent: 0,
            max_output_exponent: 22,
            merkle_root: FieldElement::ZERO,
            commitment_iv: FieldElement::ZERO,
        }
    }

    #[test]
    fn nin_with_path_counts_only_enforced_path_inputs() {
        let mut tx = TxPay::new(TxModeFlags::default(), CC_TYPE_TXPAY, empty_header());
        let mut input = TxInput {
            enforce: TxInputEnforce::default(),
            params: SpendSecretParams::default(),
            secrets: SpendSecret::default(),
            merkle_root: FieldElement::ZERO,
            invalmax: 0,
            delaytime: 0,
            domain: 0,
            asset: 0,
            amount_fp: 0,
            commitment_iv: FieldElement::ZERO,
            commitment: FieldElement::ZERO,
            commitnum: 0,
            no_serialnum: false,
            serialnum: FieldElement::ZERO,
            hashkey: 0,
            spendspec_hashed: false,
            pathnum: 0,
        };
        tx.inputs.push(input.clone());
        input.enforce.enforce_path = true;
        tx.inputs.push(input);
        assert_eq!(tx.nin(), 2);
        assert_eq!(tx.nin_with_path(), 1);
    }

    #[test]
    fn set_dependents_dedups_asset_list() {
        let mut tx = TxPay::new(TxModeFlags::default(), CC_TYPE_MINT, empty_header());
        tx.outputs.push(TxOutput {
            dest: FieldElement::ZERO,
            dest_chain: 1,
            paynum: 0,
            no_address: false,
            address: FieldElement::ZERO,
            acceptance_required: false,
            repeat_count: 0,
            domain: 0,
            asset: 0,
            no_asset: false,
            asset_mask: 0,
            encrypted_asset: 0,
            amount_fp: 0,
            no_amount: false,
            amount_mask: 0,
            encrypted_amount: 0,
            commitment: FieldElement::ZERO,
        });
        tx.set_dependents();
        assert_eq!(tx.asset_list(), &[0]);
    }
}
