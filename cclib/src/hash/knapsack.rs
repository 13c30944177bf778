//! The parameterized knapsack + Diophantine-rounds hash (spec §4.4), ported from
//! `zkhash.hpp`'s `ZKHasher::Hash`/`HashFinish`/`Knapsack1`/`Knapsack2`/`Merkle`.

use super::bases::{Basis, base_table};
use crate::numeric::FieldElement;

/// One input to a hash call: a value together with the bit width it should be decomposed to
/// (spec §4.4 step 1).
#[derive(Clone, Copy)]
pub struct HashInput {
    pub value: FieldElement,
    pub bits: usize,
}

impl HashInput {
    pub fn new(value: FieldElement, bits: usize) -> Self {
        HashInput { value, bits }
    }
}

/// Bit-decomposes `value`'s low `bits` bits, least-significant first.
fn extract_bits(value: &FieldElement, bits: usize) -> Vec<bool> {
    (0..bits).map(|i| value.bit(i)).collect()
}

/// `Knapsack1`: `Σ bit_i · base[index(i)]`, picking each bit's base index either sequentially or
/// via the domain's PRF, continuing a shared running counter `basisi` across the whole hash call.
fn knapsack1(bits: &[bool], basis: Basis, basisi: &mut u32, sequential: bool) -> FieldElement {
    let table = base_table();
    let mut sum = FieldElement::ZERO;
    for &bit in bits {
        let idx = basis.base_index(basisi, sequential);
        if bit {
            sum = sum.add(&table[idx]);
        }
    }
    sum
}

/// `Knapsack2`: the sequential/PRF-selected knapsack pair `(K0, K1)` for one hash input.
fn knapsack2(bits: &[bool], basis: Basis, basisi: &mut u32) -> (FieldElement, FieldElement) {
    let k0 = knapsack1(bits, basis, basisi, true);
    let k1 = knapsack1(bits, basis, basisi, false);
    (k0, k1)
}

/// Eight Diophantine rounds plus the optional closing knapsack (spec §4.4 steps 3-5).
fn hash_finish(
    mut acc: FieldElement,
    mut ks0: FieldElement,
    mut ks1: FieldElement,
    basis: Basis,
    basisi: &mut u32,
    out_bits: usize,
    skip_final_knapsack: bool,
) -> FieldElement {
    let one = FieldElement::from_u64(1);
    for _ in 0..8 {
        ks0 = ks0.mul(&ks0).add(&ks0).add(&one);
        ks1 = ks1.mul(&ks1).sub(&ks1).add(&one);
    }
    acc = acc.add(&ks0).add(&ks1);

    if !skip_final_knapsack {
        let in_bits = (out_bits * 2).min(crate::numeric::FIELD_BITS);
        let bits = extract_bits(&acc, in_bits);
        acc = knapsack1(&bits, basis, basisi, true);
    }

    if out_bits >= crate::numeric::FIELD_BITS {
        acc
    } else {
        acc.truncate(out_bits)
    }
}

/// The parameterized hash (spec §4.4): consumes a sequence of [`HashInput`]s under domain tag
/// `basis`, producing a field element truncated to `out_bits`. `skip_final_knapsack` suppresses
/// step 4's closing knapsack (used by [`super::merkle`] on every Merkle step but the last).
pub fn hash(inputs: &[HashInput], basis: Basis, out_bits: usize, skip_final_knapsack: bool) -> FieldElement {
    let mut basisi: u32 = 0;
    let mut acc = FieldElement::ZERO;
    let mut ks0 = FieldElement::ZERO;
    let mut ks1 = FieldElement::ZERO;

    for (i, input) in inputs.iter().enumerate() {
        let bits = extract_bits(&input.value, input.bits);
        let (k0, k1) = knapsack2(&bits, basis, &mut basisi);
        if i == 0 {
            ks0 = k0;
            ks1 = k1;
            acc = k0.add(&k1);
        } else {
            ks0 = ks0.add(&k0);
            ks1 = ks1.add(&k1);
            acc = acc.add(&k0).add(&k1);
        }
    }

    hash_finish(acc, ks0, ks1, basis, &mut basisi, out_bits, skip_final_knapsack)
}

/// The Merkle-path variant (spec §4.4): repeatedly hashes `(running, path_i)` under
/// `Basis::MerkleNode`, skipping the closing knapsack on every step but the last.
pub fn merkle(leaf: FieldElement, leaf_bits: usize, path: &[FieldElement], path_bits: usize) -> FieldElement {
    assert!(!path.is_empty(), "merkle path must have at least one step");

    let mut running = HashInput::new(leaf, leaf_bits);
    for (i, &step) in path.iter().enumerate() {
        let inputs = [running, HashInput::new(step, path_bits)];
        let is_last = i == path.len() - 1;
        let out = hash(&inputs, Basis::MerkleNode, path_bits, !is_last);
        running = HashInput::new(out, path_bits);
    }
    running.value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = HashInput::new(FieldElement::from_u64(42), 64);
        let b = HashInput::new(FieldElement::from_u64(7), 32);
        let h1 = hash(&[a, b], Basis::Commit, 254, false);
        let h2 = hash(&[a, b], Basis::Commit, 254, false);
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_domains_give_different_outputs() {
        let a = HashInput::new(FieldElement::from_u64(42), 64);
        let h1 = hash(&[a], Basis::Root, 254, false);
        let h2 = hash(&[a], Basis::Spend, 254, false);
        assert_ne!(h1, h2);
    }

    #[test]
    fn different_inputs_give_different_outputs() {
        let a = HashInput::new(FieldElement::from_u64(42), 64);
        let b = HashInput::new(FieldElement::from_u64(43), 64);
        assert_ne!(hash(&[a], Basis::Root, 254, false), hash(&[b], Basis::Root, 254, false));
    }

    #[test]
    fn truncated_output_fits_requested_width() {
        let a = HashInput::new(FieldElement::from_u64(0xDEAD_BEEF), 64);
        let out = hash(&[a], Basis::Addr, 128, false);
        for i in 128..254 {
            assert!(!out.bit(i));
        }
    }

    #[test]
    fn merkle_path_is_deterministic_and_order_sensitive() {
        let leaf = FieldElement::from_u64(1);
        let path = [FieldElement::from_u64(2), FieldElement::from_u64(3)];
        let root1 = merkle(leaf, 254, &path, 254);
        let root2 = merkle(leaf, 254, &path, 254);
        assert_eq!(root1, root2);

        let reversed = [path[1], path[0]];
        assert_ne!(root1, merkle(leaf, 254, &reversed, 254));
    }
}
