//! CredaCash transaction-construction and verification core.
//!
//! `cclib` turns structured transaction data into a wire-format payload containing a zk-SNARK
//! proof, and conversely checks a wire payload's proof against its public inputs. It also covers
//! the subsystems the proof layer cannot exist without: the parameterized field-element hasher
//! used inside the circuit, the amount and base-N text codecs, the commitment/serial-number
//! derivations, the Merkle-path checker, and the exchange-request (Xreq/Xmatch/Xpay) objects.
//!
//! The library is synchronous and thread-safe: besides a handful of lazily-initialized,
//! read-only singletons (the hash base table, the proof-key store), it carries no ambient state.
//! Everything else is owned by the caller.

#![forbid(unsafe_code)]

pub mod amount;
pub mod basen;
pub mod circuit;
pub mod config;
pub mod error;
pub mod exchange;
pub mod facade;
pub mod hash;
pub mod keys;
pub mod numeric;
pub mod pow;
pub mod tx;
pub mod wire;

pub use error::{Error, ErrorKind, Result};
