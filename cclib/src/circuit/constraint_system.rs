//! The abstracted circuit backend (spec §1, §4.5): a `ConstraintSystem` trait standing in for the
//! production R1CS/Groth16 engine, and `RecordingCs`, the one concrete backend this crate ships.

use crate::numeric::FieldElement;

/// A circuit backend that can bind variables to field values and assert equalities between them.
/// The production CredaCash engine builds an R1CS and a Groth16 proof from this; this crate's
/// contract with that engine is abstract (spec §1), so the trait only records what a real
/// backend would need to reproduce: labeled bindings and labeled equality constraints.
pub trait ConstraintSystem {
    /// Records `value` as a witness-only (private) variable.
    fn witness(&mut self, label: &str, value: FieldElement);

    /// Records `value` as a public variable, visible to the verifier.
    fn public_input(&mut self, label: &str, value: FieldElement);

    /// Asserts `a == b`, tagging the constraint with `label` for diagnostics. Returns whether it
    /// held; a backend that aggregates into a single proof only needs the boolean AND of every
    /// call's result, but recording each one individually is what makes `test_make_bad` provable.
    fn enforce_equal(&mut self, label: &str, a: FieldElement, b: FieldElement) -> bool;

    /// Asserts `value` fits in `bits` bits (used for exponent-range and mask checks).
    fn enforce_bit_width(&mut self, label: &str, value: FieldElement, bits: usize) -> bool {
        let ok = value.mask(bits) == value;
        self.enforce_equal(label, value.mask(bits), value);
        ok
    }
}

/// A `ConstraintSystem` that just records every binding and constraint in memory, without
/// building an actual R1CS. Sufficient to exercise `precheck`, constraint-count invariance, and
/// the public/private blessing split end to end.
#[derive(Default)]
pub struct RecordingCs {
    public_inputs: Vec<(String, FieldElement)>,
    witnesses: Vec<(String, FieldElement)>,
    constraints: Vec<(String, bool)>,
}

impl RecordingCs {
    pub fn new() -> Self {
        RecordingCs::default()
    }

    pub fn public_inputs(&self) -> &[(String, FieldElement)] {
        &self.public_inputs
    }

    pub fn witnesses(&self) -> &[(String, FieldElement)] {
        &self.witnesses
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Whether every constraint recorded so far held.
    pub fn is_satisfied(&self) -> bool {
        self.constraints.iter().all(|(_, ok)| *ok)
    }

    /// Labels of constraints that failed, in recording order.
    pub fn failed_constraints(&self) -> Vec<&str> {
        self.constraints.iter().filter(|(_, ok)| !ok).map(|(label, _)| label.as_str()).collect()
    }
}

impl ConstraintSystem for RecordingCs {
    fn witness(&mut self, label: &str, value: FieldElement) {
        self.witnesses.push((label.to_string(), value));
    }

    fn public_input(&mut self, label: &str, value: FieldElement) {
        self.public_inputs.push((label.to_string(), value));
    }

    fn enforce_equal(&mut self, label: &str, a: FieldElement, b: FieldElement) -> bool {
        let ok = a == b;
        self.constraints.push((label.to_string(), ok));
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_cs_tracks_satisfaction() {
        let mut cs = RecordingCs::new();
        cs.enforce_equal("a==a", FieldElement::from_u64(1), FieldElement::from_u64(1));
        assert!(cs.is_satisfied());
        cs.enforce_equal("a==b", FieldElement::from_u64(1), FieldElement::from_u64(2));
        assert!(!cs.is_satisfied());
        assert_eq!(cs.failed_constraints(), vec!["a==b"]);
        assert_eq!(cs.constraint_count(), 2);
    }
}
