//! Fitness memo owned by a problem.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Memoizes fitness values by genotype identity key.
///
/// Evaluations can be expensive (a full clustering run per genotype) and
/// the GA revisits the same genotypes often. The cache belongs to the
/// problem that owns it; the engine never sees it. The lock is not held
/// while a value is computed, so concurrent misses on the same key may
/// compute it twice.
#[derive(Debug, Default)]
pub struct FitnessCache {
    values: Mutex<HashMap<String, f64>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or computes and stores it.
    ///
    /// Failed computations are not cached.
    pub fn get_or_try_insert_with<F>(&self, key: &str, compute: F) -> anyhow::Result<f64>
    where
        F: FnOnce() -> anyhow::Result<f64>,
    {
        if let Some(&v) = self.values.lock().get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(v);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let v = compute()?;
        self.values.lock().insert(key.to_owned(), v);
        Ok(v)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.lock().get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}
