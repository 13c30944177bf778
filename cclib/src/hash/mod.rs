//! Parameterized field-element hash (spec §4.4): the public base table, the knapsack +
//! Diophantine-rounds core, the Merkle-path variant, and the named derivations built on top.

mod bases;
mod derivations;
mod knapsack;

pub use bases::{Basis, base_table};
pub use derivations::{
    DestParams, EncryptionPad, ReceiveSecretParams, address, commitment, dest, merkle_leaf, monitor_secret, one_time_pad,
    receive_secret, root_secret, serialnum, spend_secret, trust_secret,
};
pub use knapsack::{HashInput, hash, merkle};
