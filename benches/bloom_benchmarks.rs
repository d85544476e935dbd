//! Kona Bloom benchmarks
//!
//! Benchmarks for the filter family, implemented with the Criterion
//! framework for statistical analysis and regression detection.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput,
};
use std::time::Duration;

use kona_bloom::{BloomFilter, CountingBloomFilter};

/// Benchmark the standard Bloom filter
fn bench_bloom_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom_filter");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(100);

    // Insert performance at different sizes
    for size in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("add", size), size, |b, &size| {
            b.iter(|| {
                let filter = BloomFilter::<u64>::new();
                for i in 0..size {
                    filter.add(black_box(&i)).unwrap();
                }
            });
        });
    }

    // Lookup performance against a populated filter
    for size in [100u64, 1_000, 10_000].iter() {
        let filter = BloomFilter::<u64>::new();
        for i in 0..*size {
            filter.add(&i).unwrap();
        }

        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("contains", size), size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(filter.contains(black_box(&i)).unwrap());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark the counting Bloom filter
fn bench_counting_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("counting_filter");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(100);

    for size in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("add", size), size, |b, &size| {
            b.iter(|| {
                let filter = CountingBloomFilter::<u64>::new();
                for i in 0..size {
                    filter.add(black_box(&i)).unwrap();
                }
            });
        });
    }

    for size in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("add_remove", size), size, |b, &size| {
            b.iter(|| {
                let filter = CountingBloomFilter::<u64>::new();
                for i in 0..size {
                    filter.add(black_box(&i)).unwrap();
                }
                for i in 0..size {
                    filter.remove(black_box(&i)).unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bloom_filter, bench_counting_filter);
criterion_main!(benches);
