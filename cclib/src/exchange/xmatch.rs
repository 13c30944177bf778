//! `Xmatch`/`Xmatchreq` (spec §3/§4.9): the state of a matched buy/sell pair. Unlike [`super::Xreq`]
//! and [`super::Xpay`] this is not primarily a wire object — spec §4.9 describes it as "internal
//! state, persisted by the outside system but also transmitted as a query response" — so it keeps
//! a plain field-for-field layout rather than a packed binary codec.

use super::unifloat::UniFloat;
use crate::numeric::BigInt;

/// A snapshot of one side (buyer or seller) of a matched request, taken at match time so later
/// changes to the live `Xreq` don't retroactively alter an already-matched deal.
#[derive(Clone, Debug, PartialEq)]
pub struct Xmatchreq {
    pub destination: [u8; 32],
    pub min_amount: BigInt,
    pub max_amount: Option<BigInt>,
    pub pledge: u8,
}

/// Lifecycle status of a match (spec §4.9: "a status enum").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmatchStatus {
    Pending,
    Accepted,
    PaymentClaimed,
    Confirmed,
    Expired,
    Cancelled,
}

/// The matched state binding a buyer and seller snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Xmatch {
    pub xmatchnum: u64,
    pub buyer: Xmatchreq,
    pub seller: Xmatchreq,
    pub base_amount: BigInt,
    pub rate: UniFloat,
    pub amount_paid: BigInt,
    pub status: XmatchStatus,
    pub accept_deadline: u32,
    pub payment_deadline: u32,
    pub confirm_deadline: u32,
}

impl Xmatch {
    /// The quote-asset amount implied by `base_amount * rate` (spec §4.9's match accounting:
    /// what the buyer owes the seller in the quote asset).
    pub fn quote_amount(&self) -> f64 {
        let base: f64 = self.base_amount.format_dec().parse().unwrap_or(0.0);
        base * self.rate.to_f64()
    }

    /// Whether the claimed payment so far covers the matched base amount.
    pub fn is_fully_paid(&self) -> bool {
        self.amount_paid >= self.base_amount
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, XmatchStatus::Confirmed | XmatchStatus::Expired | XmatchStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Xmatchreq {
        Xmatchreq {
            destination: [1u8; 32],
            min_amount: BigInt::from_u64(10),
            max_amount: Some(BigInt::from_u64(100)),
            pledge: 0,
        }
    }

    fn sample() -> Xmatch {
        Xmatch {
            xmatchnum: 1,
            buyer: snapshot(),
            seller: snapshot(),
            base_amount: BigInt::from_u64(50),
            rate: UniFloat::from_f64(0.5),
            amount_paid: BigInt::ZERO,
            status: XmatchStatus::Pending,
            accept_deadline: 1_700_000_100,
            payment_deadline: 1_700_000_200,
            confirm_deadline: 1_700_000_300,
        }
    }

    #[test]
    fn unpaid_match_is_not_fully_paid() {
        let m = sample();
        assert!(!m.is_fully_paid());
        assert!(!m.is_terminal());
    }

    #[test]
    fn matching_the_base_amount_marks_fully_paid() {
        let mut m = sample();
        m.amount_paid = m.base_amount.clone();
        assert!(m.is_fully_paid());
    }

    #[test]
    fn confirmed_status_is_terminal() {
        let mut m = sample();
        m.status = XmatchStatus::Confirmed;
        assert!(m.is_terminal());
    }
}
