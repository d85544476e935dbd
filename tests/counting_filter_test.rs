// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! Integration tests for the counting Bloom filter and the async facades.

use std::sync::{Arc, Barrier};
use std::thread;

use proptest::prelude::*;

use kona_bloom::{
    AsyncCountingBloomFilter, BloomFilterConfig, CountingBloomFilter, COUNTER_MAX,
};

const EXPECTED_ITEMS: usize = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.01;
const THREAD_COUNT: usize = 8;
const ITEMS_PER_THREAD: usize = 500;

fn setup_test_filter() -> CountingBloomFilter<u64> {
    let config = BloomFilterConfig::new()
        .with_expected_items(EXPECTED_ITEMS)
        .with_false_positive_rate(FALSE_POSITIVE_RATE);

    CountingBloomFilter::with_config(config).unwrap()
}

#[test]
fn test_remove_restores_absence() {
    let filter = CountingBloomFilter::<str>::with_params(10_000, 5).unwrap();

    filter.add("x").unwrap();
    filter.add("x").unwrap();

    filter.remove("x").unwrap();
    assert!(filter.contains("x").unwrap(), "residual count must remain");

    filter.remove("x").unwrap();
    assert!(!filter.contains("x").unwrap());
}

#[test]
fn test_removal_does_not_disturb_other_elements() {
    let filter = setup_test_filter();

    for i in 0..1000u64 {
        filter.add(&i).unwrap();
    }

    // Remove the even elements; every odd element keeps its guarantee.
    for i in (0..1000u64).step_by(2) {
        filter.remove(&i).unwrap();
    }

    for i in (1..1000u64).step_by(2) {
        assert!(filter.contains(&i).unwrap(), "false negative for {i}");
    }
}

#[test]
fn test_frequency_estimate_never_underestimates() {
    let filter = setup_test_filter();

    for round in 1..=5u64 {
        filter.add(&42).unwrap();
        let estimate = filter.approximate_count(&42).unwrap();
        assert!(
            estimate >= round,
            "estimate {estimate} underestimates true count {round}"
        );
    }
}

#[test]
fn test_clear_after_bulk_insert() {
    let filter = setup_test_filter();

    for i in 0..100u64 {
        filter.add(&i).unwrap();
        filter.add(&i).unwrap();
    }

    filter.clear();

    assert!(filter.is_empty());
    assert_eq!(filter.count(), 0);
    for i in 0..100u64 {
        assert!(!filter.contains(&i).unwrap());
        assert_eq!(filter.approximate_count(&i).unwrap(), 0);
    }
}

#[test]
fn test_concurrency() {
    let filter = Arc::new(setup_test_filter());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT + 1));
    let mut handles = Vec::with_capacity(THREAD_COUNT);

    for t in 0..THREAD_COUNT {
        let filter = Arc::clone(&filter);
        let barrier = Arc::clone(&barrier);

        let handle = thread::spawn(move || {
            let start = (t * ITEMS_PER_THREAD) as u64;
            let end = start + ITEMS_PER_THREAD as u64;

            // Wait for all threads to be ready
            barrier.wait();

            for i in start..end {
                filter.add(&i).unwrap();
            }
        });

        handles.push(handle);
    }

    // Start all threads at once
    barrier.wait();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..(THREAD_COUNT * ITEMS_PER_THREAD) as u64 {
        assert!(filter.contains(&i).unwrap());
    }
    assert_eq!(filter.count(), (THREAD_COUNT * ITEMS_PER_THREAD) as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_facade_pipeline() {
    let filter = AsyncCountingBloomFilter::<u64>::with_params(100_000, 5).unwrap();
    let task_count = 4;
    let items_per_task = 250u64;

    let mut tasks = Vec::with_capacity(task_count);
    for t in 0..task_count as u64 {
        let handle = filter.clone();
        tasks.push(tokio::spawn(async move {
            let start = t * items_per_task;
            for i in start..start + items_per_task {
                handle.add(&i).await.unwrap();
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    for i in 0..(task_count as u64 * items_per_task) {
        assert!(filter.contains(&i).await.unwrap());
    }

    filter.clear().await;
    assert!(filter.is_empty().await);
}

// Property-based tests
proptest! {
    /// Adding then removing a batch leaves none of it behind when every
    /// element is distinct.
    #[test]
    fn proptest_add_remove_roundtrip(values in prop::collection::hash_set(any::<u64>(), 1..50)) {
        let filter = setup_test_filter();

        for val in &values {
            filter.add(val).unwrap();
        }
        for val in &values {
            filter.remove(val).unwrap();
        }

        prop_assert_eq!(filter.count(), 0);
    }

    /// The frequency estimate is bounded by the clamp and never negative.
    #[test]
    fn proptest_estimate_within_counter_bounds(
        adds in 0usize..40,
        removes in 0usize..40,
    ) {
        let filter = CountingBloomFilter::<str>::with_params(10_000, 5).unwrap();

        for _ in 0..adds {
            filter.add("key").unwrap();
        }
        for _ in 0..removes {
            filter.remove("key").unwrap();
        }

        let estimate = filter.approximate_count("key").unwrap();
        prop_assert!(estimate <= u64::from(COUNTER_MAX));
    }
}
