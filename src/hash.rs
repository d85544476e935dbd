// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! Hash families for the Bloom filter.
//!
//! A filter derives its k probe positions through the [`IndexHasher`]
//! capability, so alternative hash families can be substituted without
//! touching the filter logic. The default family combines two independent
//! 64-bit hashes via double hashing, which avoids computing k distinct
//! hashes while preserving a near-uniform probe distribution.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::Serialize;

use crate::error::{BloomFilterError, Result};

/// Seed mixed into both base hashes. Fixed so that probe positions are
/// reproducible across filter instances with the same parameters.
pub const DEFAULT_SEED: u64 = 89_478_583;

/// A capability for deriving k probe positions from an element.
///
/// Implementations must be deterministic for a given `(value, seed)` pair
/// and distribute probes uniformly enough that the false-positive formula
/// holds in practice.
pub trait IndexHasher<T: ?Sized> {
    /// Compute `hash_count` probe positions, each in `[0, slots)`.
    ///
    /// # Errors
    ///
    /// Returns [`BloomFilterError::Serialization`] if the element cannot be
    /// turned into bytes. The default [`DoubleHasher`] family never fails.
    fn probes(&self, value: &T, hash_count: usize, slots: usize) -> Result<Vec<usize>>;
}

/// Expand two base hashes into probe positions: (h1 + i*h2) mod m.
fn expand_probes(h1: u64, h2: u64, hash_count: usize, slots: usize) -> Vec<usize> {
    let m = slots as u64;
    let mut positions = Vec::with_capacity(hash_count);
    for i in 0..hash_count {
        let combined = h1.wrapping_add((i as u64).wrapping_mul(h2));
        positions.push((combined % m) as usize);
    }
    positions
}

/// The default hash family: double hashing over two independent algorithms.
///
/// The first base hash uses FNV-1a, the second SipHash, both mixed with the
/// family seed. The two algorithms are unrelated, which keeps the derived
/// probe positions independent enough for the standard filter analysis.
pub struct DoubleHasher<T: ?Sized> {
    seed: u64,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> DoubleHasher<T> {
    /// Create a hasher with the default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a hasher with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for DoubleHasher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + ?Sized> IndexHasher<T> for DoubleHasher<T> {
    fn probes(&self, value: &T, hash_count: usize, slots: usize) -> Result<Vec<usize>> {
        let mut fnv = fnv::FnvHasher::default();
        self.seed.hash(&mut fnv);
        value.hash(&mut fnv);
        let h1 = fnv.finish();

        let mut sip = DefaultHasher::new();
        self.seed.hash(&mut sip);
        value.hash(&mut sip);
        let h2 = sip.finish();

        Ok(expand_probes(h1, h2, hash_count, slots))
    }
}

/// A hash family over the serde_json encoding of the element.
///
/// Useful when the element type carries structure (or floating-point
/// fields) that has no `Hash` implementation. Encoding failures surface as
/// [`BloomFilterError::Serialization`].
pub struct SerdeJsonHasher<T: ?Sized> {
    seed: u64,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> SerdeJsonHasher<T> {
    /// Create a hasher with the default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a hasher with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for SerdeJsonHasher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + ?Sized> IndexHasher<T> for SerdeJsonHasher<T> {
    fn probes(&self, value: &T, hash_count: usize, slots: usize) -> Result<Vec<usize>> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| BloomFilterError::Serialization(e.to_string()))?;

        let mut fnv = fnv::FnvHasher::default();
        self.seed.hash(&mut fnv);
        bytes.hash(&mut fnv);
        let h1 = fnv.finish();

        let mut sip = DefaultHasher::new();
        self.seed.hash(&mut sip);
        bytes.hash(&mut sip);
        let h2 = sip.finish();

        Ok(expand_probes(h1, h2, hash_count, slots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_probes_within_range() {
        let hasher = DoubleHasher::<String>::new();
        let value = "test_string".to_string();

        let probes = hasher.probes(&value, 10, 1000).unwrap();

        assert_eq!(probes.len(), 10);
        for p in &probes {
            assert!(*p < 1000);
        }
    }

    #[test]
    fn test_probe_diversity() {
        let hasher = DoubleHasher::<String>::new();
        let probes = hasher.probes(&"diverse".to_string(), 10, 1024).unwrap();

        // Double hashing should spread probes; expect at least half unique.
        let unique = probes.iter().collect::<HashSet<_>>();
        assert!(unique.len() >= 5);
    }

    #[test]
    fn test_probe_stability() {
        let hasher = DoubleHasher::<String>::new();
        let value = "stable_hash_test".to_string();

        let first_run = hasher.probes(&value, 5, 1023).unwrap();
        let second_run = hasher.probes(&value, 5, 1023).unwrap();

        assert_eq!(first_run, second_run);
    }

    #[test]
    fn test_different_inputs_produce_different_probes() {
        let hasher = DoubleHasher::<String>::new();

        let probes1 = hasher.probes(&"input1".to_string(), 5, 1023).unwrap();
        let probes2 = hasher.probes(&"input2".to_string(), 5, 1023).unwrap();

        assert_ne!(probes1, probes2);
    }

    #[test]
    fn test_seed_changes_probes() {
        let a = DoubleHasher::<str>::with_seed(1);
        let b = DoubleHasher::<str>::with_seed(2);

        assert_ne!(
            a.probes("seeded", 5, 100_000).unwrap(),
            b.probes("seeded", 5, 100_000).unwrap()
        );
    }

    #[test]
    fn test_serde_hasher_deterministic() {
        #[derive(Serialize)]
        struct Point {
            x: f64,
            y: f64,
        }

        let hasher = SerdeJsonHasher::<Point>::new();
        let p = Point { x: 1.5, y: -2.25 };

        let first = hasher.probes(&p, 7, 4096).unwrap();
        let second = hasher.probes(&p, 7, 4096).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|&i| i < 4096));
    }

    #[test]
    fn test_serde_hasher_reports_encoding_failure() {
        struct Opaque;

        impl Serialize for Opaque {
            fn serialize<S: serde::Serializer>(
                &self,
                _serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let hasher = SerdeJsonHasher::<Opaque>::new();
        let err = hasher.probes(&Opaque, 3, 100).unwrap_err();
        assert!(matches!(err, BloomFilterError::Serialization(_)));
    }
}
