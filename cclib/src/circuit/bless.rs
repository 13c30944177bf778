//! `BlessSchedule` (spec §4.5): the sticky `badsel` counter that drives `test_make_bad`.
//!
//! Every call to [`BlessSchedule::bless`] during witness construction is one "blessing" — binding
//! a circuit variable to a concrete field value. When `test_make_bad` is nonzero, the schedule
//! counts down `badsel` across every bless call that isn't marked `nobad`, and perturbs exactly
//! the one that makes `badsel` reach zero, so the resulting witness must fail verification.

use crate::numeric::FieldElement;

pub struct BlessSchedule {
    test_make_bad: u32,
    badsel: u32,
    perturbed: bool,
}

impl BlessSchedule {
    /// `test_make_bad = 0` builds a valid witness; otherwise it selects the `test_make_bad`-th
    /// (1-indexed) bless call not marked `nobad` to perturb.
    pub fn new(test_make_bad: u32) -> Self {
        BlessSchedule {
            test_make_bad,
            badsel: test_make_bad,
            perturbed: false,
        }
    }

    /// Binds `value`, perturbing it if this call is the schedule's selected target. `nobad`
    /// variables are skipped entirely — perturbing them wouldn't be observable in any constraint.
    pub fn bless(&mut self, value: FieldElement, nobad: bool) -> FieldElement {
        if nobad || self.test_make_bad == 0 || self.perturbed {
            return value;
        }
        if self.badsel == 0 {
            self.perturbed = true;
            return value.add(&FieldElement::from_u64(1));
        }
        self.badsel -= 1;
        value
    }

    /// Whether a blessing has been perturbed this pass. A construction with `test_make_bad != 0`
    /// that never reaches `perturbed = true` indicates `test_make_bad` named an index past the
    /// end of this transaction shape's schedule.
    pub fn was_perturbed(&self) -> bool {
        self.perturbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_test_make_bad_never_perturbs() {
        let mut s = BlessSchedule::new(0);
        let v = FieldElement::from_u64(42);
        for _ in 0..10 {
            assert_eq!(s.bless(v, false), v);
        }
        assert!(!s.was_perturbed());
    }

    #[test]
    fn nonzero_test_make_bad_perturbs_exactly_one_call() {
        let mut s = BlessSchedule::new(2);
        let v = FieldElement::from_u64(42);
        let b0 = s.bless(v, false);
        let b1 = s.bless(v, false);
        let b2 = s.bless(v, false);
        let b3 = s.bless(v, false);
        assert_eq!(b0, v);
        assert_eq!(b1, v);
        assert_ne!(b2, v);
        assert_eq!(b3, v);
        assert!(s.was_perturbed());
    }

    #[test]
    fn nobad_calls_are_skipped_and_never_perturbed() {
        let mut s = BlessSchedule::new(0);
        // badsel starts at 0, but test_make_bad is also 0 so nothing perturbs regardless.
        let v = FieldElement::from_u64(7);
        assert_eq!(s.bless(v, true), v);
        assert!(!s.was_perturbed());

        let mut s = BlessSchedule::new(1);
        assert_eq!(s.bless(v, true), v);
        assert!(!s.was_perturbed());
        assert_ne!(s.bless(v, false), v);
    }
}
