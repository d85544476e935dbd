// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! The counting Bloom filter: removal and approximate frequency on top of
//! the standard membership contract.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use crate::config::{BloomFilterConfig, DEFAULT_EXPECTED_ITEMS, DEFAULT_FALSE_POSITIVE_RATE};
use crate::counters::CounterArray;
use crate::error::Result;
use crate::filter::{MembershipFilter, MutableMembershipFilter};
use crate::hash::{DoubleHasher, IndexHasher};
use crate::params::{self, optimal_k, optimal_m, FilterParams};

/// A thread-safe counting Bloom filter.
///
/// Replaces the standard filter's bits with 4-bit saturating counters
/// (clamped at [`crate::COUNTER_MAX`]), which buys two extra operations: `remove`,
/// and an `approximate_count` frequency estimate. Removal is safe-ish: a
/// counter shared with colliding elements can keep an absent element
/// "present", but a decrement can never drive a counter negative and an
/// element added more times than removed is never reported absent.
///
/// # Examples
///
/// ```
/// use kona_bloom::CountingBloomFilter;
///
/// let filter = CountingBloomFilter::<str>::new();
///
/// filter.add("x").unwrap();
/// filter.add("x").unwrap();
/// filter.remove("x").unwrap();
/// assert!(filter.contains("x").unwrap());    // one occurrence left
///
/// filter.remove("x").unwrap();
/// assert!(!filter.contains("x").unwrap());
/// ```
pub struct CountingBloomFilter<T: ?Sized, H = DoubleHasher<T>> {
    /// Validated (m, k) pair, immutable for the filter's lifetime.
    params: FilterParams,

    /// Saturating counter storage. Shared lock side covers lock-free slot
    /// updates; exclusive side covers `clear`.
    counters: RwLock<CounterArray>,

    /// Net insert count: `add` calls minus effective `remove` calls.
    inserted: AtomicU64,

    /// Hash family computing probe positions.
    hasher: H,

    /// Marker for the element type this filter works with.
    _marker: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> CountingBloomFilter<T, DoubleHasher<T>> {
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
    /// Returns `InvalidParameter` under the same conditions as
    /// [`crate::BloomFilter::with_config`].
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

impl<T: ?Sized, H> CountingBloomFilter<T, H> {
    /// Create a filter from a configuration and a custom hash family.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` under the same conditions as
    /// [`crate::BloomFilter::with_config`].
    pub fn with_config_and_hasher(config: BloomFilterConfig, hasher: H) -> Result<Self> {
        Ok(Self::from_parts(config.resolve()?, hasher))
    }

    fn from_parts(params: FilterParams, hasher: H) -> Self {
        debug!(m = params.m(), k = params.k(), "created counting bloom filter");
        Self {
            counters: RwLock::new(CounterArray::new(params.m())),
            inserted: AtomicU64::new(0),
            params,
            hasher,
            _marker: PhantomData,
        }
    }

    /// Net number of recorded insertions.
    pub fn count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    /// True iff no net insertions are recorded.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Reset every counter and the insert count.
    ///
    /// Atomic to observers, as in the standard filter.
    pub fn clear(&self) {
        let mut counters = self.counters.write();
        counters.zero_all();
        self.inserted.store(0, Ordering::Relaxed);
        debug!(m = self.params.m(), "counting bloom filter cleared");
    }

    /// Number of slots (m) in the storage array.
    pub fn m(&self) -> usize {
        self.params.m()
    }

    /// Number of hash probes (k) per operation.
    pub fn k(&self) -> usize {
        self.params.k()
    }

    /// Fraction of slots currently positive, between 0.0 and 1.0.
    pub fn fill_ratio(&self) -> f64 {
        let counters = self.counters.read();
        let occupied = (0..counters.len()).filter(|&i| counters.get(i) > 0).count();
        occupied as f64 / counters.len() as f64
    }

    /// Probability that a given slot is untouched after `inserted` items.
    pub fn bit_zero_probability(&self, inserted: usize) -> f64 {
        params::bit_zero_probability(self.m(), self.k(), inserted)
    }

    /// Expected false-positive probability after `inserted` items.
    pub fn false_positive_probability(&self, inserted: usize) -> f64 {
        params::false_positive_probability(self.m(), self.k(), inserted)
    }

    /// Slots spent per inserted element.
    pub fn bits_per_element(&self, inserted: usize) -> f64 {
        params::bits_per_element(self.m(), inserted)
    }
}

impl<T: ?Sized, H: IndexHasher<T>> CountingBloomFilter<T, H> {
    /// Record an element, incrementing each of its probe counters.
    ///
    /// Counters clamp at [`crate::COUNTER_MAX`] instead of wrapping.
    ///
    /// # Errors
    ///
    /// Propagates a [`crate::BloomFilterError::Serialization`] failure from
    /// the hash family.
    pub fn add(&self, value: &T) -> Result<()> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let counters = self.counters.read();
        for index in probes {
            counters.increment(index);
        }
        self.inserted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Remove one occurrence of an element.
    ///
    /// Probe counters are decremented only while positive; when the element
    /// is not present at entry the call is a no-op. Never fails on an
    /// absent element and never drives a counter negative.
    pub fn remove(&self, value: &T) -> Result<()> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let counters = self.counters.read();
        if !probes.iter().all(|&index| counters.get(index) > 0) {
            return Ok(());
        }

        for &index in &probes {
            counters.decrement(index);
        }
        let _ = self
            .inserted
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
        Ok(())
    }

    /// Returns true if the filter might contain the element: every probe
    /// counter is positive.
    pub fn contains(&self, value: &T) -> Result<bool> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let counters = self.counters.read();
        Ok(probes.into_iter().all(|index| counters.get(index) > 0))
    }

    /// Estimate how many times an element was added: the minimum across its
    /// probe counters. Collision-shared counters mean the estimate can only
    /// overestimate the true insert count.
    pub fn approximate_count(&self, value: &T) -> Result<u64> {
        let probes = self.hasher.probes(value, self.params.k(), self.params.m())?;

        let counters = self.counters.read();
        Ok(probes
            .into_iter()
            .map(|index| u64::from(counters.get(index)))
            .min()
            .unwrap_or(0))
    }
}

impl<T: ?Sized, H: IndexHasher<T>> MembershipFilter<T> for CountingBloomFilter<T, H> {
    fn add(&self, value: &T) -> Result<()> {
        CountingBloomFilter::add(self, value)
    }

    fn contains(&self, value: &T) -> Result<bool> {
        CountingBloomFilter::contains(self, value)
    }

    fn count(&self) -> u64 {
        CountingBloomFilter::count(self)
    }

    fn clear(&self) {
        CountingBloomFilter::clear(self)
    }

    fn m(&self) -> usize {
        CountingBloomFilter::m(self)
    }

    fn k(&self) -> usize {
        CountingBloomFilter::k(self)
    }
}

impl<T: ?Sized, H: IndexHasher<T>> MutableMembershipFilter<T> for CountingBloomFilter<T, H> {
    fn remove(&self, value: &T) -> Result<()> {
        CountingBloomFilter::remove(self, value)
    }

    fn approximate_count(&self, value: &T) -> Result<u64> {
        CountingBloomFilter::approximate_count(self, value)
    }
}

impl<T: ?Sized, H> fmt::Debug for CountingBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingBloomFilter")
            .field("m", &self.params.m())
            .field("k", &self.params.k())
            .field("count", &self.count())
            .finish()
    }
}
