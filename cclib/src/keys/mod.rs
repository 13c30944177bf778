//! Proof-key store (spec §4.6): an indexed table of prover/verifier key shapes, a work-ordered
//! fallback search, and a mutex-guarded lazy loader bounded by `nproofsave` (spec §5: "protected
//! by the store mutex").
//!
//! Grounded on `original_source/source/cclib/src/zkkeys.{h,cpp}`'s static key-index table and
//! lazy-load-on-first-use discipline. File I/O is synchronous `std::fs`/`std::io` per §5 — there
//! are no suspension points in this core.

mod table;

pub use table::{KEY_TABLE, KeyShape};

use crate::error::{ErrorKind, Result, err};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A loaded verification key. Real Groth16 verification keys are a handful of pairing-curve
/// group elements; since the proof engine itself is abstracted (spec §1), this only keeps what
/// the circuit-level contract in §4.5 needs: the raw bytes and the shape it was loaded for.
#[derive(Clone, Debug)]
pub struct VerifyKey {
    pub shape: KeyShape,
    pub raw: Vec<u8>,
}

/// A loaded proving key, likewise a byte blob tagged with its shape.
#[derive(Clone, Debug)]
pub struct ProveKey {
    pub shape: KeyShape,
    pub raw: Vec<u8>,
}

/// Deterministic on-disk file name for a key of this shape (spec §6: `CC-ZK-{Prove|Verify}-Key-
/// {id}-{nout}-{nin_with_path}-{nin_without_path}.dat`).
pub fn key_file_name(prove: bool, shape: &KeyShape) -> String {
    let kind = if prove { "Prove" } else { "Verify" };
    let nin_without_path = shape.nin - shape.nin_with_path;
    format!(
        "CC-ZK-{kind}-Key-{}-{}-{}-{}.dat",
        shape.key_id, shape.nout, shape.nin_with_path, nin_without_path
    )
}

/// Picks the smallest (lowest-`work`) key shape in [`KEY_TABLE`] that can accommodate a request
/// of `(nout, nin, nin_with_path)` (spec §4.6). `key_index`, when given, pins a specific table
/// entry instead of searching; it is an error if that entry is too small for the request.
pub fn select_shape(nout: usize, nin: usize, nin_with_path: usize, key_index: Option<usize>) -> Result<&'static KeyShape> {
    if let Some(idx) = key_index {
        let shape = KEY_TABLE.get(idx).ok_or_else(|| err!(ErrorKind::NoKey, "key_index {idx} does not exist"))?;
        if !shape.satisfies(nout, nin, nin_with_path) {
            return Err(err!(
                ErrorKind::InsufficientKey,
                "key_index {idx} is too small for nout={nout} nin={nin} nin_with_path={nin_with_path}"
            ));
        }
        return Ok(shape);
    }

    let mut order: Vec<&KeyShape> = KEY_TABLE.iter().collect();
    order.sort_by_key(|s| s.work);
    order
        .into_iter()
        .find(|s| s.satisfies(nout, nin, nin_with_path))
        .ok_or_else(|| err!(ErrorKind::NoKey, "no key shape fits nout={nout} nin={nin} nin_with_path={nin_with_path}"))
}

/// The indexed lookup of prover/verifier keys (spec §4.6). Holds at most `nproofsave` proving
/// keys in memory at once (they are large; verification keys are small and are never evicted).
pub struct KeyStore {
    dir: PathBuf,
    nproofsave: usize,
    prove_cache: Mutex<HashMap<usize, std::sync::Arc<ProveKey>>>,
    prove_order: Mutex<Vec<usize>>,
    verify_cache: Mutex<HashMap<usize, std::sync::Arc<VerifyKey>>>,
}

impl KeyStore {
    /// `dir` is typically `CC_PROOF_KEY_DIR` (spec §6); `nproofsave` bounds the prover-key cache.
    pub fn new(dir: impl Into<PathBuf>, nproofsave: usize) -> Self {
        KeyStore {
            dir: dir.into(),
            nproofsave: nproofsave.max(1),
            prove_cache: Mutex::new(HashMap::new()),
            prove_order: Mutex::new(Vec::new()),
            verify_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Builds a store from `CC_PROOF_KEY_DIR`, falling back to `fallback_dir` when unset.
    pub fn from_env(fallback_dir: impl AsRef<Path>, nproofsave: usize) -> Self {
        let dir = std::env::var_os("CC_PROOF_KEY_DIR").map(PathBuf::from).unwrap_or_else(|| fallback_dir.as_ref().to_path_buf());
        KeyStore::new(dir, nproofsave)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads (or returns the cached) proving key for `(nout, nin, nin_with_path)`, searching the
    /// work-ordered table unless `key_index` pins a specific shape.
    pub fn prove_key(&self, nout: usize, nin: usize, nin_with_path: usize, key_index: Option<usize>) -> Result<std::sync::Arc<ProveKey>> {
        let shape = select_shape(nout, nin, nin_with_path, key_index)?;
        {
            let cache = self.prove_cache.lock().unwrap();
            if let Some(k) = cache.get(&shape.key_id) {
                return Ok(k.clone());
            }
        }
        let raw = self.load_file(&key_file_name(true, shape))?;
        let key = std::sync::Arc::new(ProveKey { shape: *shape, raw });

        let mut cache = self.prove_cache.lock().unwrap();
        let mut order = self.prove_order.lock().unwrap();
        if !cache.contains_key(&shape.key_id) {
            order.push(shape.key_id);
            if order.len() > self.nproofsave {
                let evict = order.remove(0);
                cache.remove(&evict);
            }
        }
        cache.insert(shape.key_id, key.clone());
        Ok(key)
    }

    /// Loads (or returns the cached) verification key; verification keys are never evicted
    /// (spec §4.6: "Verification keys preprocess a more compact form on first load").
    pub fn verify_key(&self, nout: usize, nin: usize, nin_with_path: usize, key_index: Option<usize>) -> Result<std::sync::Arc<VerifyKey>> {
        let shape = select_shape(nout, nin, nin_with_path, key_index)?;
        {
            let cache = self.verify_cache.lock().unwrap();
            if let Some(k) = cache.get(&shape.key_id) {
                return Ok(k.clone());
            }
        }
        let raw = self.load_file(&key_file_name(false, shape))?;
        let key = std::sync::Arc::new(VerifyKey { shape: *shape, raw });
        self.verify_cache.lock().unwrap().insert(shape.key_id, key.clone());
        Ok(key)
    }

    fn load_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        let mut file = std::fs::File::open(&path).map_err(|e| err!(ErrorKind::LoadingKey, "{}: {e}", path.display()))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(|e| err!(ErrorKind::LoadingKey, "{}: {e}", path.display()))?;
        if buf.is_empty() {
            return Err(err!(ErrorKind::LoadingKey, "{}: key file is empty", path.display()));
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_shape_picks_lowest_work_match() {
        let shape = select_shape(1, 0, 0, None).unwrap();
        assert!(shape.nout >= 1 && shape.nin >= 0);
    }

    #[test]
    fn select_shape_fails_when_nothing_fits() {
        let err = select_shape(1000, 1000, 1000, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoKey);
    }

    #[test]
    fn pinned_key_index_too_small_is_insufficient() {
        let err = select_shape(1000, 0, 0, Some(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientKey);
    }

    #[test]
    fn missing_file_reports_loading_key_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path(), 2);
        let err = store.prove_key(1, 0, 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadingKey);
    }

    #[test]
    fn loaded_key_is_cached_and_evicted_in_fifo_order() {
        let dir = tempfile::tempdir().unwrap();
        for shape in KEY_TABLE.iter().take(3) {
            let name = key_file_name(true, shape);
            std::fs::write(dir.path().join(name), [0xABu8; 8]).unwrap();
        }
        let store = KeyStore::new(dir.path(), 2);
        let shapes: Vec<&KeyShape> = KEY_TABLE.iter().take(3).collect();
        for s in &shapes {
            store.prove_key(s.nout, s.nin, s.nin_with_path, Some(KEY_TABLE.iter().position(|k| k.key_id == s.key_id).unwrap())).unwrap();
        }
        assert_eq!(store.prove_order.lock().unwrap().len(), 2);
    }
}
