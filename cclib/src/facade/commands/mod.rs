//! One module per verb family (spec §4.11), mirroring the teacher's
//! `components::json_rpc::methods` layout: a file per related group of verbs, re-exported here
//! for [`crate::facade::dispatch`] to match on.

mod amount;
mod payspec;
mod secrets;
mod tx;

pub use amount::{asset_scale, decode as decode_amount, encode as encode_amount};
pub use payspec::{decode as payspec_decode, encode as payspec_encode};
pub use secrets::{
    compute_address, compute_amount_encryption, compute_monitor_secret, compute_receive_secret, compute_root_secret, compute_serial_number,
    compute_spend_secret, compute_trust_secret, generate_random, master_secret_generate, master_secret_validate,
};
pub use tx::{create as tx_create, dump as tx_dump, from_wire as tx_from_wire, query_create as tx_query_create, to_json as tx_to_json, to_wire as tx_to_wire, verify as tx_verify, work_add, work_reset};
