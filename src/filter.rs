// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! The standard append-only Bloom filter and the capability traits shared
//! with the counting variant.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::bits::BitArray;
use crate::config::{BloomFilterConfig, DEFAULT_EXPECTED_ITEMS, DEFAULT_FALSE_POSITIVE_RATE};
use crate::error::Result;
use crate::hash::{DoubleHasher, IndexHasher};
use crate::params::{self, optimal_k, optimal_m, FilterParams};

/// Read and insert capability shared by every filter variant.
///
/// `m` and `k` are fixed at construction; the probability surface is the
/// inverse of the sizing formulas in [`crate::params`] and is derived from
/// them by default.
pub trait MembershipFilter<T: ?Sized> {
    /// Record an element in the filter.
    fn add(&self, value: &T) -> Result<()>;

    /// Returns true if the filter might contain the element.
    ///
    /// False positives are possible, but false negatives are not.
    fn contains(&self, value: &T) -> Result<bool>;

    /// Exact number of `add` calls recorded (not distinct elements).
    fn count(&self) -> u64;

    /// True iff no net insertions have been recorded.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Reset the filter to the empty state.
    fn clear(&self);

    /// Number of slots (m) in the storage array.
    fn m(&self) -> usize;

    /// Number of hash probes (k) per operation.
    fn k(&self) -> usize;

    /// Probability that a given slot is untouched after `inserted` items.
    fn bit_zero_probability(&self, inserted: usize) -> f64 {
        params::bit_zero_probability(self.m(), self.k(), inserted)
    }

    /// Expected false-positive probability after `inserted` items.
    fn false_positive_probability(&self, inserted: usize) -> f64 {
        params::false_positive_probability(self.m(), self.k(), inserted)
    }

    /// Slots spent per inserted element.
    fn bits_per_element(&self, inserted: usize) -> f64 {
        params::bits_per_element(self.m(), inserted)
    }
}

/// Removal capability of the counting variant.
pub trait MutableMembershipFilter<T: ?Sized>: MembershipFilter<T> {
    /// Remove one occurrence of an element.
    ///
    /// Removing an element that was never added is a defined no-op.
    fn remove(&self, value: &T) -> Result<()>;

    /// Estimate how many times an element was added. Shared slots mean the
    /// estimate can overestimate, never underestimate.
    fn approximate_count(&self, value: &T) -> Result<u64>;
}

/// A thread-safe, lock-free Bloom filter.
///
/// The filter tracks set membership approximately: `contains` can report a
/// false positive with tunable probability, but never a false negative.
/// Slot updates use atomic operations, so concurrent `add` and `contains`
/// calls from many threads are safe without external locking; `clear` takes
/// the storage exclusively so observers never see a partial reset.
///
/// # Type Parameters
///
/// * `T` - The element type. The default hash family requires `T: Hash`.
/// * `H` - The hash family deriving probe positions; see [`IndexHasher`].
///
/// # Examples
///
/// ```
/// use kona_bloom::BloomFilter;
///
/// let filter = BloomFilter::<str>::new();
///
/// filter.add("hello_world").unwrap();
///
/// assert!(filter.contains("hello_world").unwrap());
/// assert!(!filter.contains("not_inserted").unwrap());
///
/// // Size for a known load and target false-positive rate instead:
/// use kona_bloom::BloomFilterConfig;
///
/// let config = BloomFilterConfig::new()
///     .with_expected_items(100_000)
///     .with_false_positive_rate(0.001);
///
/// let custom = BloomFilter::<str>::with_config(config).unwrap();
/// assert!(custom.is_empty());
/// ```
pub struct BloomFilter<T: ?Sized, H = DoubleHasher<T>> {
    /// Validated (m, k) pair, immutable for the filter's lifetime.
    params: FilterParams,

    /// Atomic bit storage. The shared side of the lock covers all slot
    /// reads and lock-free updates; the exclusive side covers `clear`.
    bits: RwLock<BitArray>,

    /// Number of `add` calls, tracked independently of storage.
    inserted: AtomicU64,

    /// Hash family computing probe positions.
    hasher: H,

    /// Marker for the element type this filter works with.
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> BloomFilter<T, DoubleHasher<T>> {
    /// Create a filter sized for the default load (100,000 items at a 1%
    /// false-positive rate).
    pub fn new() -> Self {
        let slots = optimal_m(DEFAULT_EXPECTED_ITEMS, DEFAULT_FALSE_POSITIVE_RATE);
        let hashes = optimal_k(DEFAULT_EXPECTED_ITEMS, slots);
        Self::from_parts(FilterParams::new_unchecked(slots, hashes), DoubleHasher::new())
    }

    /// Create a filter from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration resolves to a zero
    /// slot or probe count, zero expected items, or an out-of-range
    /// false-positive rate.
    pub fn with_config(config: BloomFilterConfig) -> Result<Self> {
        Ok(Self::from_parts(config.resolve()?, DoubleHasher::new()))
    }

    /// Create a filter with an explicit `(m, k)` pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either value is zero.
    pub fn with_params(slots: usize, hashes: usize) -> Result<Self> {
        Ok(Self::from_parts(
            FilterParams::explicit(slots, hashes)?,
            DoubleHasher::new(),
        ))
    }
}

impl<T: ?Sized, H> BloomFilter<T, H> {
    /// Create a filter from a configuration and a custom hash family.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` under the same conditions as
    /// [`BloomFilter::with_config`].
    pub fn with_config_and_hasher(config: BloomFilterConfig, hasher: H) -> Result<Self> {
        Ok(Self::from_parts(config.resolve()?, hasher))
    }

    fn from_parts(params: FilterParams, hasher: H) -> Self {
        debug!(m = params.m(), k = params.k(), "created bloom filter");
        Self {
            bits: RwLock::new(BitArray::new(params.m())),
            inserted: AtomicU64::new(0),
            params,
            hasher,
            _marker: PhantomData,
        }
    }

    /// Exact number of `add` calls recorded. Duplicate inserts count each
    /// time; this is not an estimate of distinct elements.
    pub fn count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    /// True iff no insertions have been recorded.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Reset every slot and the insert count.
    ///
    /// The reset is atomic to observers: concurrent operations either see
    /// the filter before the reset or fully emptied, never in between.
    pub fn clear(&self) {
        let mut bits = self.bits.write();
        bits.zero_all();
        self.inserted.store(0, Ordering::Relaxed);
        debug!(m = self.params.m(), "bloom filter cleared");
    }

    /// Number of slots (m) in the storage array.
    pub fn m(&self) -> usize {
        self.params.m()
    }

    /// Number of hash probes (k) per operation.
    pub fn k(&self) -> usize {
        self.params.k()
    }

    /// Fraction of slots currently set, between 0.0 and 1.0.
    pub fn fill_ratio(&self) -> f64 {
        let bits = self.bits.read();
        bits.count_ones() as f64 / bits.len() as f64
    }

    /// Probability that a given slot is untouched after `inserted` items:
    /// (1 - 1/m)^(k*n).
    pub fn bit_zero_probability(&self, inserted: usize) -> f64 {
        params::bit_zero_probability(self.m(), self.k(), inserted)
    }

    /// Expected false-positive probability after `inserted` items:
    /// (1 - (1 - 1/m)^(k*n))^k.
    pub fn false_positive_probability(&self, inserted: usize) -> f64 {
        params::false_positive_probability(self.m(), self.k(), inserted)
    }

    /// Slots spent per inserted element: m / n.
    pub fn bits_per_element(&self, inserted: usize) -> f64 {
        params::bits_per_element(self.m(), inserted)
    }
}

impl<T: ?Sized, H: IndexHasher<T>> BloomFilter<T, H> {
    /// Record an element in the filter.
    ///
    /// Sets the k probe bits for the element (setting an already-set bit is
    /// a no-op) and increments the insert count.
    ///
    /// # Errors
    ///
    /// Propagates a [`crate::BloomFilterError::Serialization`] failure from
    /// the hash family. The default family never fails.
    pub fn add(&self, value: &T) -> Result<()> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let bits = self.bits.read();
        for index in probes {
            bits.set(index);
        }
        self.inserted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns true if the filter might contain the element.
    ///
    /// False positives occur with probability given by
    /// [`false_positive_probability`](Self::false_positive_probability);
    /// false negatives do not occur.
    pub fn contains(&self, value: &T) -> Result<bool> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let bits = self.bits.read();
        Ok(probes.into_iter().all(|index| bits.get(index)))
    }
}

impl<T: ?Sized, H: IndexHasher<T>> MembershipFilter<T> for BloomFilter<T, H> {
    fn add(&self, value: &T) -> Result<()> {
        BloomFilter::add(self, value)
    }

    fn contains(&self, value: &T) -> Result<bool> {
        BloomFilter::contains(self, value)
    }

    fn count(&self) -> u64 {
        BloomFilter::count(self)
    }

    fn clear(&self) {
        BloomFilter::clear(self)
    }

    fn m(&self) -> usize {
        BloomFilter::m(self)
    }

    fn k(&self) -> usize {
        BloomFilter::k(self)
    }
}

impl<T: ?Sized, H> fmt::Debug for BloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("m", &self.params.m())
            .field("k", &self.params.k())
            .field("count", &self.count())
            .finish()
    }
}
