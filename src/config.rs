// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! Configuration for the Bloom filter family.

use crate::error::{BloomFilterError, Result};
use crate::params::{optimal_k, FilterParams};

/// Default expected number of items.
pub const DEFAULT_EXPECTED_ITEMS: usize = 100_000;

/// Default target false-positive rate (1%).
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Configuration for a Bloom filter.
///
/// Filters are sized either from an expected load and target false-positive
/// rate (routed through the sizing formulas in [`crate::params`]) or from an
/// explicit `(m, k)` pair. The builder itself never fails; values are
/// validated when the filter is constructed.
///
/// # Examples
///
/// ```
/// use kona_bloom::BloomFilterConfig;
///
/// let config = BloomFilterConfig::new()
///     .with_expected_items(50_000)
///     .with_false_positive_rate(0.001);
///
/// let params = config.resolve().unwrap();
/// assert!(params.m() > 0 && params.k() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilterConfig {
    /// Expected number of items that will be inserted into the filter.
    /// Used to calculate the optimal slot count.
    expected_items: usize,

    /// Desired probability of false positives, in (0.0, 1.0) exclusive.
    /// Lower values increase accuracy but require more memory.
    false_positive_rate: f64,

    /// Explicit slot count (m). If set, overrides the sizing formula.
    slots: Option<usize>,

    /// Explicit number of hash probes (k). If set, overrides the optimal
    /// count calculated from the other parameters.
    hash_functions: Option<usize>,
}

impl BloomFilterConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - expected_items: 100,000
    /// - false_positive_rate: 0.01 (1%)
    /// - slots: None (auto-calculated)
    /// - hash_functions: None (auto-calculated)
    pub fn new() -> Self {
        Self {
            expected_items: DEFAULT_EXPECTED_ITEMS,
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            slots: None,
            hash_functions: None,
        }
    }

    /// Set the expected number of items to be inserted into the filter.
    ///
    /// An accurate value lets the sizing formula hit the target
    /// false-positive rate without wasting memory.
    pub fn with_expected_items(mut self, expected_items: usize) -> Self {
        self.expected_items = expected_items;
        self
    }

    /// Set the desired false-positive rate (between 0.0 and 1.0 exclusive).
    ///
    /// Typical values range from 0.01 (1%) to 0.001 (0.1%). Out-of-range
    /// values are rejected with `InvalidParameter` when the filter is built.
    pub fn with_false_positive_rate(mut self, false_positive_rate: f64) -> Self {
        self.false_positive_rate = false_positive_rate;
        self
    }

    /// Explicitly set the slot count (m), bypassing the sizing formula.
    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Explicitly set the number of hash probes (k).
    ///
    /// By default the optimal count is calculated from the other parameters.
    pub fn with_hash_functions(mut self, hash_functions: usize) -> Self {
        self.hash_functions = Some(hash_functions);
        self
    }

    /// Get the expected number of items.
    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    /// Get the target false-positive rate.
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Resolve this configuration into a validated `(m, k)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`BloomFilterError::InvalidParameter`] if the resolved slot
    /// or probe count is zero, or if the sizing formula is consulted with
    /// zero expected items or an out-of-range false-positive rate.
    pub fn resolve(&self) -> Result<FilterParams> {
        match (self.slots, self.hash_functions) {
            (Some(m), Some(k)) => FilterParams::explicit(m, k),
            (Some(m), None) => {
                self.check_expected_items()?;
                FilterParams::explicit(m, optimal_k(self.expected_items, m))
            }
            (None, Some(k)) => {
                let sized = FilterParams::optimal(self.expected_items, self.false_positive_rate)?;
                FilterParams::explicit(sized.m(), k)
            }
            (None, None) => FilterParams::optimal(self.expected_items, self.false_positive_rate),
        }
    }

    fn check_expected_items(&self) -> Result<()> {
        if self.expected_items == 0 {
            return Err(BloomFilterError::InvalidParameter(
                "expected_items must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BloomFilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
