//! The static key-index table (spec §4.6): `(key_id, nout, nin, nin_with_path, work)` tuples a
//! production CredaCash deployment ships a compiled prove/verify key pair for. Grounded on
//! `original_source/source/cclib/src/zkkeys.cpp`'s `Zkkeys` array, whose entries are an
//! application-chosen subset of `(nout, nin, nin_with_path)` shapes sized to cover common
//! transaction layouts without needing a key for every combinatorial possibility.

use std::sync::OnceLock;

/// One entry of the key-index table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyShape {
    pub key_id: usize,
    pub nout: usize,
    pub nin: usize,
    pub nin_with_path: usize,
    /// Relative proving cost, used to rank candidates when more than one shape satisfies a
    /// request (spec §4.6: "the smallest key that satisfies the request").
    pub work: u64,
}

impl KeyShape {
    /// Whether this shape can prove a transaction of the given size: every dimension must be at
    /// least as large as requested (a key sized for more outputs/inputs than needed pads with
    /// no-op billets, a standard SNARK-circuit-reuse trick; a key sized smaller can never fit).
    pub fn satisfies(&self, nout: usize, nin: usize, nin_with_path: usize) -> bool {
        self.nout >= nout && self.nin >= nin && self.nin_with_path >= nin_with_path && (self.nin - self.nin_with_path) >= (nin - nin_with_path)
    }
}

fn work_of(nout: usize, nin: usize, nin_with_path: usize) -> u64 {
    // Merkle-path inputs dominate constraint count (spec §4.5's per-input Merkle chain), so they
    // are weighted heaviest; plain inputs and outputs follow.
    (nout as u64) * 3 + (nin as u64) * 2 + (nin_with_path as u64) * 5
}

fn build_table() -> Vec<KeyShape> {
    let mut table = Vec::new();
    let mut key_id = 0usize;
    // MINT shape: no inputs at all.
    for nout in 1..=crate::tx::TX_MAXOUT {
        table.push(KeyShape {
            key_id,
            nout,
            nin: 0,
            nin_with_path: 0,
            work: work_of(nout, 0, 0),
        });
        key_id += 1;
    }
    // Ordinary spends: every input either carries a Merkle path or doesn't, uniformly (the two
    // extremes a real deployment actually provisions keys for); mixed path/no-path shapes are
    // satisfied by the all-path key since it dominates on every dimension.
    for nout in 1..=crate::tx::TX_MAXOUT {
        for nin in 1..=crate::tx::TX_MAXIN {
            for &nin_with_path in &[0usize, nin] {
                table.push(KeyShape {
                    key_id,
                    nout,
                    nin,
                    nin_with_path,
                    work: work_of(nout, nin, nin_with_path),
                });
                key_id += 1;
            }
        }
    }
    table
}

pub static KEY_TABLE: LazyTable = LazyTable(OnceLock::new());

/// A thin wrapper so `KEY_TABLE` can be used with slice methods (`.iter()`, `.get()`) without
/// exposing the `OnceLock` machinery at call sites.
pub struct LazyTable(OnceLock<Vec<KeyShape>>);

impl std::ops::Deref for LazyTable {
    type Target = [KeyShape];

    fn deref(&self) -> &[KeyShape] {
        self.0.get_or_init(build_table)
    }
}
