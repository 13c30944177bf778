//! Named derivations built on the parameterized hash (spec §4.4): the spend-secret chain,
//! destination/address derivation, output encryption pads, and the commitment/serial-number
//! hashes. Ported from `original_source/source/cclib/src/transaction.cpp`'s `ComputeSpendSecret`/
//! `ComputeDestination`/`ComputeAddress`/`ComputeCommitment`/`ComputeSerialnum` family.

use super::bases::Basis;
use super::knapsack::{HashInput, hash};
use crate::numeric::{FIELD_BITS, FieldElement};
use serde::{Deserialize, Serialize};

const fn input(value: FieldElement, bits: usize) -> HashInput {
    HashInput { value, bits }
}

/// `root_secret = H_ROOT(master_secret)`.
pub fn root_secret(master_secret: FieldElement) -> FieldElement {
    hash(&[input(master_secret, FIELD_BITS)], Basis::Root, FIELD_BITS, false)
}

/// `spend_secret[i] = H_SPEND(root_secret, i)`, with `i` only distinguished from the zeroth slot
/// when nonzero (spec §4.4: "`i = spend_secret_number` when `i=0`, else `0`" — i.e. only slot 0
/// carries a nonzero spend-secret-number argument; every other slot hashes with 0).
pub fn spend_secret(root_secret: FieldElement, slot: usize, spend_secret_number: u64) -> FieldElement {
    let number_arg = if slot == 0 { spend_secret_number } else { 0 };
    hash(
        &[input(root_secret, FIELD_BITS), input(FieldElement::from_u64(number_arg), 32)],
        Basis::Spend,
        FIELD_BITS,
        false,
    )
}

/// `trust_secret[i] = H_TRUST(spend_secret[i])`.
pub fn trust_secret(spend_secret: FieldElement) -> FieldElement {
    hash(&[input(spend_secret, FIELD_BITS)], Basis::Trust, FIELD_BITS, false)
}

/// `monitor_secret[i] = H_MONITOR(trust_secret[i])`.
pub fn monitor_secret(trust_secret: FieldElement) -> FieldElement {
    hash(&[input(trust_secret, FIELD_BITS)], Basis::Monitor, FIELD_BITS, false)
}

/// Gating parameters folded into [`receive_secret`] (spec §3's `SpendSecretParams`, minus the
/// per-slot `use_spend_secret`/`use_trust_secret` arrays which feed [`dest`] instead).
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiveSecretParams {
    pub allow_master_secret: bool,
    pub allow_freeze: bool,
    pub allow_trust_unfreeze: bool,
    pub require_public_hashkey: bool,
    pub restrict_addresses: bool,
    pub required_spendspec_hash: FieldElement,
    pub master_secret_locktime: u32,
    pub spend_locktime: u32,
    pub trust_locktime: u32,
    pub spend_delaytime: u8,
    pub trust_delaytime: u8,
}

fn gating_bits(p: &ReceiveSecretParams) -> u64 {
    (p.allow_master_secret as u64)
        | ((p.allow_freeze as u64) << 1)
        | ((p.allow_trust_unfreeze as u64) << 2)
        | ((p.require_public_hashkey as u64) << 3)
        | ((p.restrict_addresses as u64) << 4)
}

/// `receive_secret = H_RECV(monitor_secret[0]_lo, monitor_secret[0]_hi, gating-bits,
/// required_spendspec_hash, time-locks, delaytimes)`.
pub fn receive_secret(monitor_secret_0: FieldElement, params: &ReceiveSecretParams) -> FieldElement {
    let lo = monitor_secret_0.mask(128);
    let mut hi_bi = *monitor_secret_0.as_bigint();
    hi_bi.shift_down(128);
    let hi = FieldElement::from_bigint(hi_bi);

    hash(
        &[
            input(lo, 128),
            input(hi, FIELD_BITS - 128),
            input(FieldElement::from_u64(gating_bits(params)), 8),
            input(params.required_spendspec_hash, FIELD_BITS),
            input(FieldElement::from_u64(params.master_secret_locktime as u64), 32),
            input(FieldElement::from_u64(params.spend_locktime as u64), 32),
            input(FieldElement::from_u64(params.trust_locktime as u64), 32),
            input(FieldElement::from_u64(params.spend_delaytime as u64), 8),
            input(FieldElement::from_u64(params.trust_delaytime as u64), 8),
        ],
        Basis::Recv,
        FIELD_BITS,
        false,
    )
}

/// Per-slot gating the [`dest`] derivation folds in (spec §3's `use_spend_secret[i]` /
/// `use_trust_secret[i]` booleans, `required_spend_secrets`, `required_trust_secrets`).
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DestParams {
    pub use_spend_secret: [bool; crate::tx::TX_MAX_SECRET_SLOTS],
    pub use_trust_secret: [bool; crate::tx::TX_MAX_SECRET_SLOTS],
    pub required_spend_secrets: u8,
    pub required_trust_secrets: u8,
    pub destnum: u32,
}

fn bool_array_bits(flags: &[bool]) -> u64 {
    flags.iter().enumerate().fold(0u64, |acc, (i, &b)| acc | ((b as u64) << i))
}

/// `dest = H_DEST(receive_secret, monitor_secret[1..], use_spend[], use_trust[], req_spend,
/// req_trust, destnum)`.
pub fn dest(receive_secret: FieldElement, monitor_secrets_1_to_7: &[FieldElement], params: &DestParams) -> FieldElement {
    let mut inputs = vec![input(receive_secret, FIELD_BITS)];
    for &m in monitor_secrets_1_to_7 {
        inputs.push(input(m, FIELD_BITS));
    }
    inputs.push(input(FieldElement::from_u64(bool_array_bits(&params.use_spend_secret)), 8));
    inputs.push(input(FieldElement::from_u64(bool_array_bits(&params.use_trust_secret)), 8));
    inputs.push(input(FieldElement::from_u64(params.required_spend_secrets as u64), 8));
    inputs.push(input(FieldElement::from_u64(params.required_trust_secrets as u64), 8));
    inputs.push(input(FieldElement::from_u64(params.destnum as u64), crate::tx::TX_DESTNUM_BITS as usize));

    hash(&inputs, Basis::Dest, FIELD_BITS, false)
}

/// `address = H_ADDR(dest, dest_chain, paynum)`, truncated to `TX_ADDRESS_BITS`.
pub fn address(dest: FieldElement, dest_chain: u32, paynum: u32) -> FieldElement {
    hash(
        &[
            input(dest, FIELD_BITS),
            input(FieldElement::from_u64(dest_chain as u64), 32),
            input(FieldElement::from_u64(paynum as u64), crate::tx::TX_PAYNUM_BITS as usize),
        ],
        Basis::Addr,
        crate::tx::TX_ADDRESS_BITS,
        false,
    )
}

/// The one-time pad used to encrypt an output's asset and amount (spec §4.4): `H_ENC(commit_iv,
/// dest, paynum)`, split into an asset pad (low `TX_ASSET_BITS` bits) and an amount pad (the next
/// `TX_AMOUNT_BITS` bits).
pub struct EncryptionPad {
    pub asset_pad: u64,
    pub amount_pad: u64,
}

pub fn one_time_pad(commit_iv: FieldElement, dest: FieldElement, paynum: u32, asset_bits: usize, amount_bits: usize) -> EncryptionPad {
    let out_bits = asset_bits + amount_bits;
    let pad = hash(
        &[
            input(commit_iv, crate::tx::TX_COMMIT_IV_BITS),
            input(dest, FIELD_BITS),
            input(FieldElement::from_u64(paynum as u64), crate::tx::TX_PAYNUM_BITS as usize),
        ],
        Basis::Enc,
        out_bits,
        false,
    );
    let asset_pad = (0..asset_bits).fold(0u64, |acc, i| acc | ((pad.bit(i) as u64) << i));
    let amount_pad = (0..amount_bits).fold(0u64, |acc, i| acc | ((pad.bit(asset_bits + i) as u64) << i));
    EncryptionPad { asset_pad, amount_pad }
}

/// `M_commitment = H_COMMIT(commit_iv, dest, paynum, domain, asset, amount_fp)`.
pub fn commitment(commit_iv: FieldElement, dest: FieldElement, paynum: u32, domain: u64, asset: u64, amount_fp: u64) -> FieldElement {
    hash(
        &[
            input(commit_iv, crate::tx::TX_COMMIT_IV_BITS),
            input(dest, FIELD_BITS),
            input(FieldElement::from_u64(paynum as u64), crate::tx::TX_PAYNUM_BITS as usize),
            input(FieldElement::from_u64(domain), 64),
            input(FieldElement::from_u64(asset), 64),
            input(FieldElement::from_u64(amount_fp), crate::amount::TX_AMOUNT_BITS as usize),
        ],
        Basis::Commit,
        FIELD_BITS,
        false,
    )
}

/// `serialnum = H_SERIAL(monitor_secret[0]_lo, monitor_secret[0]_hi, M_commitment, M_commitnum)`.
pub fn serialnum(monitor_secret_0: FieldElement, commitment: FieldElement, commitnum: u64) -> FieldElement {
    let lo = monitor_secret_0.mask(128);
    let mut hi_bi = *monitor_secret_0.as_bigint();
    hi_bi.shift_down(128);
    let hi = FieldElement::from_bigint(hi_bi);

    hash(
        &[
            input(lo, 128),
            input(hi, FIELD_BITS - 128),
            input(commitment, FIELD_BITS),
            input(FieldElement::from_u64(commitnum), crate::tx::TX_COMMITNUM_BITS as usize),
        ],
        Basis::Serial,
        FIELD_BITS,
        false,
    )
}

/// The Merkle leaf value: `H_LEAF(M_commitment, M_commitnum)`.
pub fn merkle_leaf(commitment: FieldElement, commitnum: u64) -> FieldElement {
    hash(
        &[
            input(commitment, FIELD_BITS),
            input(FieldElement::from_u64(commitnum), crate::tx::TX_COMMITNUM_BITS as usize),
        ],
        Basis::Leaf,
        FIELD_BITS,
        false,
    )
}
