//! `SpendSecret` and `SpendSecretParams` (spec §3): the per-input secret-derivation chain and its
//! gating parameters, grounded on `original_source/source/cclib/src/transaction.cpp`'s
//! `SpendSecretParams`/`ComputeSpendSecrets`.

use crate::hash::{DestParams, ReceiveSecretParams};
use crate::numeric::FieldElement;
use crate::tx::{TX_MAX_RESTRICTED_ADDRESSES, TX_MAX_SECRET_SLOTS};
use serde::{Deserialize, Serialize};

/// An 8-entry-per-input secret chain: `master`, `root`, and the per-slot `spend`/`trust`/
/// `monitor`/`receive` secrets. Slot 0's `monitor`/`receive` secrets gate `dest`; slots 1..7's
/// `monitor` secrets pack the restricted-address list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendSecret {
    pub master: Option<FieldElement>,
    pub root: FieldElement,
    pub spend: [FieldElement; TX_MAX_SECRET_SLOTS],
    pub trust: [FieldElement; TX_MAX_SECRET_SLOTS],
    pub monitor: [FieldElement; TX_MAX_SECRET_SLOTS],
    pub receive: FieldElement,
    pub dest: FieldElement,
}

impl SpendSecret {
    /// Derives the full chain from a `master_secret` (spec §4.4's root/spend/trust/monitor/
    /// receive/dest chain). `spend_secret_number` only affects slot 0.
    pub fn derive(
        master_secret: FieldElement,
        spend_secret_number: u64,
        receive_params: &ReceiveSecretParams,
        dest_params: &DestParams,
    ) -> Self {
        let root = crate::hash::root_secret(master_secret);
        let mut spend = [FieldElement::ZERO; TX_MAX_SECRET_SLOTS];
        let mut trust = [FieldElement::ZERO; TX_MAX_SECRET_SLOTS];
        let mut monitor = [FieldElement::ZERO; TX_MAX_SECRET_SLOTS];
        for i in 0..TX_MAX_SECRET_SLOTS {
            spend[i] = crate::hash::spend_secret(root, i, spend_secret_number);
            trust[i] = crate::hash::trust_secret(spend[i]);
            monitor[i] = crate::hash::monitor_secret(trust[i]);
        }
        let receive = crate::hash::receive_secret(monitor[0], receive_params);
        let dest = crate::hash::dest(receive, &monitor[1..TX_MAX_RESTRICTED_ADDRESSES + 1], dest_params);

        SpendSecret { master: Some(master_secret), root, spend, trust, monitor, receive, dest }
    }
}

/// Gating parameters for a [`SpendSecret`] chain (spec §3): the boolean flags, required-secret
/// counters, time locks/delays, per-slot usage flags, and the destination/pay numbers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendSecretParams {
    pub receive: ReceiveSecretParams,
    pub dest: DestParams,
    pub enforce_spendspec_with_spend_secret: bool,
    pub enforce_spendspec_with_trust_secret: bool,
}
