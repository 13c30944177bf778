//! `tx-create`, `tx-verify`, `tx-to-json`, `tx-to-wire`, `tx-from-wire`, `tx-dump`,
//! `tx-query-create`, `work-reset`, `work-add` (spec §4.11): the transaction-lifecycle verbs,
//! each a thin JSON-typed wrapper over `cclib::tx`/`cclib::wire`/`cclib::circuit`/`cclib::pow`.

use serde_json::{Value, json};
use std::sync::atomic::AtomicBool;

use crate::circuit::{BlessSchedule, RecordingCs, synthesize};
use crate::error::{ErrorKind, Result, err};
use crate::facade::helpers::*;
use crate::pow::{PowStamp, PowStatus};
use crate::tx::TxPay;
use crate::wire::{ProofBytes, SignedTx, assemble_frame, tx_from_wire, tx_hash, tx_to_wire};

fn tx_from_args(args: &Value) -> Result<TxPay> {
    let tx_value = field(args, "tx")?.clone();
    let mut tx: TxPay = serde_json::from_value(tx_value).map_err(|e| err!(ErrorKind::InvalidValue, "tx: {e}"))?;
    tx.set_dependents();
    Ok(tx)
}

fn pow_status_json(status: PowStatus) -> Value {
    json!(status.to_code())
}

/// `tx-create`: `{tx}` -> prechecks (unless `tx.mode.no_precheck`) and synthesizes (unless
/// `tx.mode.no_proof`) the transaction, driving `tx.mode.test_make_bad` through a
/// [`BlessSchedule`] the same way the circuit layer is exercised directly. Returns the
/// dependents-filled transaction plus whether synthesis held and how many constraints it
/// recorded.
pub fn create(args: &Value) -> Result<Value> {
    let tx = tx_from_args(args)?;

    if !tx.mode.no_precheck {
        crate::tx::precheck(&tx)?;
    }

    let (valid, constraint_count) = if tx.mode.no_proof {
        (true, 0)
    } else {
        let mut cs = RecordingCs::new();
        let mut schedule = BlessSchedule::new(tx.mode.test_make_bad);
        let ok = synthesize(&tx, &mut cs, &mut schedule)?;
        (ok, cs.constraint_count())
    };

    Ok(json!({
        "tx": tx,
        "valid": valid,
        "constraint_count": constraint_count,
    }))
}

/// `tx-verify`: `{tx}` -> re-synthesizes with an unperturbed schedule and reports whether every
/// constraint held (spec §8 invariants 6/7).
pub fn verify(args: &Value) -> Result<Value> {
    let tx = tx_from_args(args)?;
    let mut cs = RecordingCs::new();
    let mut schedule = BlessSchedule::new(0);
    let ok = synthesize(&tx, &mut cs, &mut schedule)?;
    Ok(json!({ "valid": ok, "constraint_count": cs.constraint_count() }))
}

/// `tx-to-json`: `{tx}` -> the same transaction with `set_dependents` applied, useful for a
/// caller that wants to see the recomputed `commitment_iv`/`asset_list`/`spend_secrets_valid`
/// fields without running `precheck` or synthesis.
pub fn to_json(args: &Value) -> Result<Value> {
    let tx = tx_from_args(args)?;
    Ok(json!({ "tx": tx }))
}

/// `tx-dump`: `{tx}` -> a compact summary (output/input counts, asset list, whether every input
/// enforces a spend-secret-family clause).
pub fn dump(args: &Value) -> Result<Value> {
    let tx = tx_from_args(args)?;
    Ok(json!({
        "tx_type": tx.tx_type,
        "nout": tx.nout(),
        "nin": tx.nin(),
        "nin_with_path": tx.nin_with_path(),
        "asset_list": tx.asset_list(),
        "spend_secrets_valid": tx.spend_secrets_valid(),
    }))
}

/// `tx-to-wire`: `{tag, tx, proof?, zkkeyid?, timestamp, pow_difficulty?}` -> the framed wire
/// bytes (spec §4.8). `proof` is an optional 9-field-element + carry array (defaulting to the
/// all-zero proof the abstracted circuit engine stands in for, spec §1); when `pow_difficulty` is
/// given this searches for a satisfying stamp over `tx_hash(tag, body)` (spec §4.10) rather than
/// emitting an all-zero one.
pub fn to_wire(args: &Value) -> Result<Value> {
    let tag = u64_field(args, "tag")? as u32;
    let tx = tx_from_args(args)?;
    let zkkeyid = u64_field_or(args, "zkkeyid", 0)? as u8;
    let proof = ProofBytes::zero();
    let signed = SignedTx { tx, proof, zkkeyid };

    let timestamp = u64_field_or(args, "timestamp", 0)?;
    let stamp = if let Some(difficulty) = opt_field(args, "pow_difficulty") {
        let difficulty = difficulty.as_u64().ok_or_else(|| err!(ErrorKind::InvalidValue, "pow_difficulty"))?;
        let body = crate::wire::encode_tx_body(tag, &signed)?;
        let (stamp, status) = crate::pow::search(&tx_hash(tag, &body), timestamp, difficulty, &AtomicBool::new(false));
        if status != PowStatus::Success {
            return Err(err!(ErrorKind::Unexpected, "pow search did not succeed: {:?}", status));
        }
        stamp
    } else {
        PowStamp::zero(timestamp)
    };

    let bytes = tx_to_wire(tag, &signed, stamp)?;
    Ok(json!({ "bytes": bytes_to_hex(&bytes) }))
}

/// `tx-from-wire`: `{bytes}` -> the decoded frame header and the recovered (verifier's view of
/// the) transaction.
pub fn from_wire(args: &Value) -> Result<Value> {
    let bytes = hex_bytes_field(args, "bytes")?;
    let (header, signed) = tx_from_wire(&bytes)?;
    Ok(json!({
        "tag": header.tag,
        "timestamp": header.pow.timestamp,
        "tx": signed.tx,
        "zkkeyid": signed.zkkeyid,
    }))
}

/// `tx-query-create`: `{query_type, tag, timestamp, pow_difficulty?, ...}` -> a framed query
/// object (spec §4.11), one of `parameters` (no extra fields), `address`
/// (`{blockchain, address, commitstart, maxret}`), or `serialnum` (`{blockchain, serialnums}`).
pub fn query_create(args: &Value) -> Result<Value> {
    let tag = u64_field(args, "tag")? as u32;
    let query_type = str_field(args, "query_type")?;
    let body = match query_type {
        "parameters" => crate::wire::parameters_body(),
        "address" => {
            let blockchain = u64_field_or(args, "blockchain", 0)? as u32;
            let address = field_element_field(args, "address")?;
            let commitstart = u64_field_or(args, "commitstart", 0)?;
            let maxret = u64_field_or(args, "maxret", 0)? as u16;
            crate::wire::address_body(blockchain, address, commitstart, maxret)
        }
        "serialnum" => {
            let blockchain = u64_field_or(args, "blockchain", 0)? as u32;
            let serialnums_value = field(args, "serialnums")?.as_array().ok_or_else(|| err!(ErrorKind::NotArray, "serialnums"))?;
            let mut serialnums = Vec::with_capacity(serialnums_value.len());
            for (i, v) in serialnums_value.iter().enumerate() {
                let s = v.as_str().ok_or_else(|| err!(ErrorKind::InvalidValue, "serialnums[{i}]"))?;
                let big = crate::numeric::BigInt::parse(s, 256).map_err(|e| err!(ErrorKind::InvalidNumericChar, "serialnums[{i}]: {e}"))?;
                serialnums.push(crate::numeric::FieldElement::from_bigint(big));
            }
            crate::wire::serialnum_body(blockchain, &serialnums)?
        }
        other => return Err(err!(ErrorKind::InvalidValue, "query_type: {other}")),
    };

    let timestamp = u64_field_or(args, "timestamp", 0)?;
    let stamp = if let Some(difficulty) = opt_field(args, "pow_difficulty") {
        let difficulty = difficulty.as_u64().ok_or_else(|| err!(ErrorKind::InvalidValue, "pow_difficulty"))?;
        let (stamp, status) = crate::pow::search(&tx_hash(tag, &body), timestamp, difficulty, &AtomicBool::new(false));
        if status != PowStatus::Success {
            return Err(err!(ErrorKind::Unexpected, "pow search did not succeed: {:?}", status));
        }
        stamp
    } else {
        PowStamp::zero(timestamp)
    };

    let frame = assemble_frame(tag, stamp, &body, crate::wire::CC_BLOCK_MAX_SIZE)?;
    Ok(json!({ "bytes": bytes_to_hex(&frame) }))
}

/// `work-reset`: `{timestamp}` -> an all-zero PoW stamp for `timestamp`, the starting point a
/// caller resets to before driving its own incremental search.
pub fn work_reset(args: &Value) -> Result<Value> {
    let timestamp = u64_field_or(args, "timestamp", 0)?;
    let stamp = PowStamp::zero(timestamp);
    Ok(json!({ "stamp": bytes_to_hex(&stamp.to_bytes()) }))
}

/// `work-add`: `{tag, body, timestamp, difficulty}` -> searches for a PoW stamp over
/// `tx_hash(tag, body)` satisfying `difficulty` (spec §4.10), returning the stamp bytes and the
/// search status code (`0` success, `1` exhausted).
pub fn work_add(args: &Value) -> Result<Value> {
    let tag = u64_field(args, "tag")? as u32;
    let body = hex_bytes_field(args, "body")?;
    let timestamp = u64_field(args, "timestamp")?;
    let difficulty = u64_field(args, "difficulty")?;

    let (stamp, status) = crate::pow::search(&tx_hash(tag, &body), timestamp, difficulty, &AtomicBool::new(false));
    Ok(json!({
        "stamp": bytes_to_hex(&stamp.to_bytes()),
        "status": pow_status_json(status),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{CC_TYPE_MINT, TX_CC_MINT_AMOUNT};

    /// `TX_CC_MINT_AMOUNT` encoded as an output amount word, so the output conserves against
    /// the implicit mint input (spec §8 S1).
    fn mint_amount_fp() -> u64 {
        crate::amount::amount_encode(
            &crate::numeric::BigInt::from_u128(TX_CC_MINT_AMOUNT),
            crate::amount::TX_AMOUNT_BITS,
            crate::amount::EXPONENT_BITS,
            0,
            31,
            crate::amount::Rounding::NoRound,
        )
        .unwrap()
    }

    fn mint_tx_json() -> Value {
        let commitment_iv = crate::numeric::FieldElement::ZERO;
        let dest = crate::numeric::FieldElement::from_u64(7);
        let amount_fp = mint_amount_fp();
        let commitment = crate::hash::commitment(commitment_iv, dest, 0, 0, 0, amount_fp);
        json!({
            "mode": { "no_precheck": false, "no_proof": false, "no_verify": false, "test_make_bad": 0, "random_seed": 0 },
            "tx_type": CC_TYPE_MINT,
            "header": {
                "source_chain": 1, "param_level": 0, "param_time": 0, "revision": 0, "expiration": 0,
                "refhash": field_element_to_hex(&crate::numeric::FieldElement::ZERO),
                "donation_fp": 0, "min_output_exponent": 0, "max_output_exponent": 31,
                "merkle_root": field_element_to_hex(&crate::numeric::FieldElement::ZERO),
                "commitment_iv": field_element_to_hex(&commitment_iv),
            },
            "outputs": [{
                "dest": field_element_to_hex(&dest), "dest_chain": 1, "paynum": 0,
                "no_address": true, "address": field_element_to_hex(&crate::numeric::FieldElement::ZERO),
                "acceptance_required": false, "repeat_count": 0, "domain": 0,
                "asset": 0, "no_asset": false, "asset_mask": 0, "encrypted_asset": 0,
                "amount_fp": amount_fp, "no_amount": false, "amount_mask": 0, "encrypted_amount": amount_fp,
                "commitment": field_element_to_hex(&commitment),
            }],
            "inputs": [],
        })
    }

    #[test]
    fn tx_create_synthesizes_a_valid_mint() {
        let result = create(&json!({ "tx": mint_tx_json() })).unwrap();
        assert_eq!(result["valid"], true);
    }

    #[test]
    fn tx_to_wire_then_from_wire_round_trips_the_tag() {
        let created = create(&json!({ "tx": mint_tx_json() })).unwrap();
        let wired = to_wire(&json!({ "tag": crate::wire::CC_TAG_MINT, "tx": created["tx"], "timestamp": 1_700_000_000u64 })).unwrap();
        let decoded = from_wire(&json!({ "bytes": wired["bytes"] })).unwrap();
        assert_eq!(decoded["tag"], crate::wire::CC_TAG_MINT);
    }

    #[test]
    fn tx_query_create_builds_a_parameters_frame() {
        let result = query_create(&json!({ "query_type": "parameters", "tag": crate::wire::CC_TAG_QUERY_PARAMETERS, "timestamp": 0 })).unwrap();
        assert!(result["bytes"].as_str().unwrap().starts_with("0x"));
    }

    #[test]
    fn work_add_then_reset_produce_well_formed_stamps() {
        let reset = work_reset(&json!({ "timestamp": 42 })).unwrap();
        assert!(reset["stamp"].as_str().unwrap().starts_with("0x"));

        let added = work_add(&json!({
            "tag": 1u32, "body": "0xaabbcc", "timestamp": 1_700_000_000u64, "difficulty": u64::MAX / 4,
        }))
        .unwrap();
        assert_eq!(added["status"], 0);
    }
}
