//! Kona Bloom
//!
//! A probabilistic set-membership engine: a standard append-only Bloom
//! filter, a counting variant supporting removal and approximate frequency,
//! and asynchronous facades for non-blocking call sites. The library is
//! designed to be embedded in dedup pipelines, cache-admission filters, and
//! search-index pruning layers.
//!
//! # Architecture
//!
//! The crate is designed with the following principles in mind:
//! - Lock-free slot updates for high-concurrency workloads
//! - Strategy abstraction at the hashing seam
//! - Explicit, validated construction parameters
//! - No false negatives, ever; false positives at a tunable rate
//!
//! # Example
//!
//! ```
//! use kona_bloom::{BloomFilter, BloomFilterConfig};
//!
//! // Size the filter for the expected load.
//! let config = BloomFilterConfig::new()
//!     .with_expected_items(10_000)
//!     .with_false_positive_rate(0.01);
//!
//! let filter = BloomFilter::<str>::with_config(config).unwrap();
//!
//! filter.add("apple").unwrap();
//! filter.add("banana").unwrap();
//!
//! assert!(filter.contains("apple").unwrap());
//! assert!(filter.contains("banana").unwrap());
//! ```

// Re-export public modules
pub mod config;
pub mod counting;
pub mod error;
pub mod filter;
pub mod hash;
pub mod nonblocking;
pub mod params;

// Internal storage modules
mod bits;
mod counters;

// Re-export the primary API at the crate root
pub use config::BloomFilterConfig;
pub use counters::COUNTER_MAX;
pub use counting::CountingBloomFilter;
pub use error::{BloomFilterError, Result};
pub use filter::{BloomFilter, MembershipFilter, MutableMembershipFilter};
pub use hash::{DoubleHasher, IndexHasher, SerdeJsonHasher};
pub use nonblocking::{
    AsyncBloomFilter, AsyncCountingBloomFilter, AsyncMembershipFilter,
    AsyncMutableMembershipFilter,
};
pub use params::FilterParams;

/// Version information for the Kona Bloom library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
