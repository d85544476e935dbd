// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! Asynchronous facades over the filter family.
//!
//! The facades expose the same operations with a non-blocking contract so
//! the filters compose into pipelines built from asynchronous stages. For
//! the in-memory engine the operations are CPU-bound and complete
//! immediately once polled; concurrency correctness is identical to the
//! synchronous API. Handles are cheap to clone and share one underlying
//! filter.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BloomFilterConfig;
use crate::counting::CountingBloomFilter;
use crate::error::Result;
use crate::filter::BloomFilter;
use crate::hash::{DoubleHasher, IndexHasher};

/// Non-blocking membership capability.
///
/// Object-safe so pipeline stages can hold `Box<dyn AsyncMembershipFilter<T>>`
/// regardless of the underlying variant.
#[async_trait]
pub trait AsyncMembershipFilter<T: ?Sized + Sync>: Send + Sync {
    /// Record an element in the filter.
    async fn add(&self, value: &T) -> Result<()>;

    /// Returns true if the filter might contain the element.
    async fn contains(&self, value: &T) -> Result<bool>;

    /// Exact number of recorded insertions.
    async fn count(&self) -> u64;

    /// True iff no net insertions have been recorded.
    async fn is_empty(&self) -> bool;

    /// Reset the filter to the empty state.
    async fn clear(&self);
}

/// Non-blocking removal capability of the counting variant.
#[async_trait]
pub trait AsyncMutableMembershipFilter<T: ?Sized + Sync>: AsyncMembershipFilter<T> {
    /// Remove one occurrence of an element.
    async fn remove(&self, value: &T) -> Result<()>;

    /// Estimate how many times an element was added.
    async fn approximate_count(&self, value: &T) -> Result<u64>;
}

/// Asynchronous handle to a standard [`BloomFilter`].
///
/// # Examples
///
/// ```
/// use kona_bloom::AsyncBloomFilter;
///
/// tokio_test::block_on(async {
///     let filter = AsyncBloomFilter::<str>::new();
///
///     filter.add("hello").await.unwrap();
///
///     assert!(filter.contains("hello").await.unwrap());
///     assert!(!filter.contains("world").await.unwrap());
/// });
/// ```
pub struct AsyncBloomFilter<T: ?Sized, H = DoubleHasher<T>> {
    inner: Arc<BloomFilter<T, H>>,
}

impl<T: Hash + ?Sized> AsyncBloomFilter<T, DoubleHasher<T>> {
    /// Create a facade over a filter sized for the default load.
    pub fn new() -> Self {
        Self::from_filter(BloomFilter::new())
    }

    /// Create a facade over a filter built from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` under the same conditions as
    /// [`BloomFilter::with_config`].
    pub fn with_config(config: BloomFilterConfig) -> Result<Self> {
        Ok(Self::from_filter(BloomFilter::with_config(config)?))
    }

    /// Create a facade over a filter with an explicit `(m, k)` pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either value is zero.
    pub fn with_params(slots: usize, hashes: usize) -> Result<Self> {
        Ok(Self::from_filter(BloomFilter::with_params(slots, hashes)?))
    }
}

impl<T: ?Sized, H: IndexHasher<T>> AsyncBloomFilter<T, H> {
    /// Wrap an existing filter in an asynchronous handle.
    pub fn from_filter(filter: BloomFilter<T, H>) -> Self {
        Self {
            inner: Arc::new(filter),
        }
    }

    /// Record an element in the filter.
    pub async fn add(&self, value: &T) -> Result<()> {
        self.inner.add(value)
    }

    /// Returns true if the filter might contain the element.
    pub async fn contains(&self, value: &T) -> Result<bool> {
        self.inner.contains(value)
    }

    /// Exact number of recorded insertions.
    pub async fn count(&self) -> u64 {
        self.inner.count()
    }

    /// True iff no insertions have been recorded.
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Reset every slot and the insert count.
    pub async fn clear(&self) {
        self.inner.clear()
    }

    /// Number of slots (m) in the storage array.
    pub fn m(&self) -> usize {
        self.inner.m()
    }

    /// Number of hash probes (k) per operation.
    pub fn k(&self) -> usize {
        self.inner.k()
    }
}

impl<T: ?Sized, H> Clone for AsyncBloomFilter<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized, H> fmt::Debug for AsyncBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBloomFilter")
            .field("count", &self.inner.count())
            .finish()
    }
}

#[async_trait]
impl<T, H> AsyncMembershipFilter<T> for AsyncBloomFilter<T, H>
where
    T: ?Sized + Sync,
    H: IndexHasher<T> + Send + Sync,
{
    async fn add(&self, value: &T) -> Result<()> {
        self.inner.add(value)
    }

    async fn contains(&self, value: &T) -> Result<bool> {
        self.inner.contains(value)
    }

    async fn count(&self) -> u64 {
        self.inner.count()
    }

    async fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    async fn clear(&self) {
        self.inner.clear()
    }
}

/// Asynchronous handle to a [`CountingBloomFilter`].
///
/// Adds the non-blocking `remove` and `approximate_count` operations on top
/// of the membership surface.
pub struct AsyncCountingBloomFilter<T: ?Sized, H = DoubleHasher<T>> {
    inner: Arc<CountingBloomFilter<T, H>>,
}

impl<T: Hash + ?Sized> AsyncCountingBloomFilter<T, DoubleHasher<T>> {
    /// Create a facade over a filter sized for the default load.
    pub fn new() -> Self {
        Self::from_filter(CountingBloomFilter::new())
    }

    /// Create a facade over a filter built from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` under the same conditions as
    /// [`BloomFilter::with_config`].
    pub fn with_config(config: BloomFilterConfig) -> Result<Self> {
        Ok(Self::from_filter(CountingBloomFilter::with_config(config)?))
    }

    /// Create a facade over a filter with an explicit `(m, k)` pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if either value is zero.
    pub fn with_params(slots: usize, hashes: usize) -> Result<Self> {
        Ok(Self::from_filter(CountingBloomFilter::with_params(
            slots, hashes,
        )?))
    }
}

impl<T: ?Sized, H: IndexHasher<T>> AsyncCountingBloomFilter<T, H> {
    /// Wrap an existing counting filter in an asynchronous handle.
    pub fn from_filter(filter: CountingBloomFilter<T, H>) -> Self {
        Self {
            inner: Arc::new(filter),
        }
    }

    /// Record an element, incrementing each of its probe counters.
    pub async fn add(&self, value: &T) -> Result<()> {
        self.inner.add(value)
    }

    /// Remove one occurrence of an element.
    pub async fn remove(&self, value: &T) -> Result<()> {
        self.inner.remove(value)
    }

    /// Returns true if the filter might contain the element.
    pub async fn contains(&self, value: &T) -> Result<bool> {
        self.inner.contains(value)
    }

    /// Estimate how many times an element was added.
    pub async fn approximate_count(&self, value: &T) -> Result<u64> {
        self.inner.approximate_count(value)
    }

    /// Net number of recorded insertions.
    pub async fn count(&self) -> u64 {
        self.inner.count()
    }

    /// True iff no net insertions are recorded.
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Reset every counter and the insert count.
    pub async fn clear(&self) {
        self.inner.clear()
    }

    /// Number of slots (m) in the storage array.
    pub fn m(&self) -> usize {
        self.inner.m()
    }

    /// Number of hash probes (k) per operation.
    pub fn k(&self) -> usize {
        self.inner.k()
    }
}

impl<T: ?Sized, H> Clone for AsyncCountingBloomFilter<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized, H> fmt::Debug for AsyncCountingBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncCountingBloomFilter")
            .field("count", &self.inner.count())
            .finish()
    }
}

#[async_trait]
impl<T, H> AsyncMembershipFilter<T> for AsyncCountingBloomFilter<T, H>
where
    T: ?Sized + Sync,
    H: IndexHasher<T> + Send + Sync,
{
    async fn add(&self, value: &T) -> Result<()> {
        self.inner.add(value)
    }

    async fn contains(&self, value: &T) -> Result<bool> {
        self.inner.contains(value)
    }

    async fn count(&self) -> u64 {
        self.inner.count()
    }

    async fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    async fn clear(&self) {
        self.inner.clear()
    }
}

#[async_trait]
impl<T, H> AsyncMutableMembershipFilter<T> for AsyncCountingBloomFilter<T, H>
where
    T: ?Sized + Sync,
    H: IndexHasher<T> + Send + Sync,
{
    async fn remove(&self, value: &T) -> Result<()> {
        self.inner.remove(value)
    }

    async fn approximate_count(&self, value: &T) -> Result<u64> {
        self.inner.approximate_count(value)
    }
}
