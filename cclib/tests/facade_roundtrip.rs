//! End-to-end exercises of `cclib::facade::dispatch` itself (as opposed to the per-verb unit
//! tests alongside each command), covering a transaction's full life cycle the way an external
//! caller would drive it: construct, verify, frame onto the wire, and recover it.

use cclib::facade::dispatch;
use serde_json::json;

/// `TX_CC_MINT_AMOUNT` encoded as an output amount word, so the output conserves against the
/// implicit mint input (spec §8 S1).
fn mint_amount_fp() -> u64 {
    cclib::amount::amount_encode(
        &cclib::numeric::BigInt::from_u128(cclib::tx::TX_CC_MINT_AMOUNT),
        cclib::amount::TX_AMOUNT_BITS,
        cclib::amount::EXPONENT_BITS,
        0,
        31,
        cclib::amount::Rounding::NoRound,
    )
    .unwrap()
}

fn mint_tx_json() -> serde_json::Value {
    let commitment_iv = cclib::numeric::FieldElement::ZERO;
    let dest = cclib::numeric::FieldElement::from_u64(7);
    let amount_fp = mint_amount_fp();
    let commitment = cclib::hash::commitment(commitment_iv, dest, 0, 0, 0, amount_fp);
    let hex = cclib::facade::helpers::field_element_to_hex;

    json!({
        "mode": { "no_precheck": false, "no_proof": false, "no_verify": false, "test_make_bad": 0, "random_seed": 0 },
        "tx_type": cclib::tx::CC_TYPE_MINT,
        "header": {
            "source_chain": 1, "param_level": 0, "param_time": 0, "revision": 0, "expiration": 0,
            "refhash": hex(&cclib::numeric::FieldElement::ZERO),
            "donation_fp": 0, "min_output_exponent": 0, "max_output_exponent": 31,
            "merkle_root": hex(&cclib::numeric::FieldElement::ZERO),
            "commitment_iv": hex(&commitment_iv),
        },
        "outputs": [{
            "dest": hex(&dest), "dest_chain": 1, "paynum": 0,
            "no_address": true, "address": hex(&cclib::numeric::FieldElement::ZERO),
            "acceptance_required": false, "repeat_count": 0, "domain": 0,
            "asset": 0, "no_asset": false, "asset_mask": 0, "encrypted_asset": 0,
            "amount_fp": amount_fp, "no_amount": false, "amount_mask": 0, "encrypted_amount": amount_fp,
            "commitment": hex(&commitment),
        }],
        "inputs": [],
    })
}

#[test]
fn unknown_verb_reports_an_error_object_not_a_panic() {
    let response = dispatch(json!({ "not-a-real-verb": {} }));
    assert!(response["error"].as_str().unwrap().contains("unknown verb"));
}

#[test]
fn malformed_request_shapes_never_panic() {
    for bad in [json!([1, 2, 3]), json!("a string"), json!(null), json!({}), json!({"a": 1, "b": 2})] {
        let response = dispatch(bad);
        assert!(response.get("error").is_some());
    }
}

#[test]
fn tx_create_then_verify_round_trips_through_the_facade() {
    let created = dispatch(json!({ "tx-create": { "tx": mint_tx_json() } }));
    assert!(created.get("error").is_none(), "tx-create failed: {created}");
    assert_eq!(created["valid"], true);

    let verified = dispatch(json!({ "tx-verify": { "tx": created["tx"] } }));
    assert!(verified.get("error").is_none(), "tx-verify failed: {verified}");
    assert_eq!(verified["valid"], true);
    assert_eq!(verified["constraint_count"], created["constraint_count"]);
}

#[test]
fn tx_create_to_wire_from_wire_round_trips_through_the_facade() {
    let created = dispatch(json!({ "tx-create": { "tx": mint_tx_json() } }));
    assert_eq!(created["valid"], true);

    let wired = dispatch(json!({
        "tx-to-wire": { "tag": cclib::wire::CC_TAG_MINT, "tx": created["tx"], "timestamp": 1_700_000_000u64 },
    }));
    assert!(wired.get("error").is_none(), "tx-to-wire failed: {wired}");

    let decoded = dispatch(json!({ "tx-from-wire": { "bytes": wired["bytes"] } }));
    assert!(decoded.get("error").is_none(), "tx-from-wire failed: {decoded}");
    assert_eq!(decoded["tag"], cclib::wire::CC_TAG_MINT);

    let reverified = dispatch(json!({ "tx-verify": { "tx": decoded["tx"] } }));
    assert_eq!(reverified["valid"], true);
}

#[test]
fn amount_encode_then_decode_round_trips_through_the_facade() {
    let encoded = dispatch(json!({
        "encode-amount": { "value": "0x2540BE400", "amount_bits": 40u64, "exponent_bits": 5u64, "min_exponent": 0u64, "max_exponent": 22u64 },
    }));
    assert!(encoded.get("error").is_none());
    assert_eq!(encoded["exact"], true);

    let decoded = dispatch(json!({ "decode-amount": { "word": encoded["word"], "exponent_bits": 5u64 } }));
    assert_eq!(decoded["value"], "0x2540be400");
}

#[test]
fn secret_chain_derivations_round_trip_through_the_facade() {
    let root = dispatch(json!({ "generate-random": {} }));
    let root_value = root["value"].as_str().unwrap();

    let spend = dispatch(json!({ "compute-spend-secret": { "root_secret": root_value, "index": 0u64 } }));
    assert!(spend.get("error").is_none(), "compute-spend-secret failed: {spend}");

    let trust = dispatch(json!({ "compute-trust-secret": { "spend_secret": spend["spend_secret"] } }));
    assert!(trust.get("error").is_none(), "compute-trust-secret failed: {trust}");

    let monitor = dispatch(json!({ "compute-monitor-secret": { "trust_secret": trust["trust_secret"] } }));
    assert!(monitor.get("error").is_none(), "compute-monitor-secret failed: {monitor}");
}
