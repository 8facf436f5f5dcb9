//! Criterion benchmarks for the SPSC ring.
//!
//! Compares nexus-ring against rtrb and crossbeam-queue's ArrayQueue.

use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use crossbeam_queue::ArrayQueue;
use nexus_ring::{RingBuffer, owned};

#[allow(unused)]
#[derive(Debug, Clone, Copy)]
struct Medium([u64; 16]); // 128 bytes

// ============================================================================
// Single-threaded latency benchmarks
// ============================================================================

fn bench_single_thread_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_thread_latency");

    group.bench_function("nexus_ring/u64", |b| {
        let mut ring = RingBuffer::<u64, 1024>::new();
        let (mut tx, mut rx) = ring.split();
        b.iter(|| {
            tx.push(black_box(42)).unwrap();
            black_box(rx.pop().unwrap())
        });
    });

    group.bench_function("rtrb/u64", |b| {
        let (mut tx, mut rx) = rtrb::RingBuffer::<u64>::new(1023);
        b.iter(|| {
            tx.push(black_box(42)).unwrap();
            black_box(rx.pop().unwrap())
        });
    });

    group.bench_function("crossbeam_array/u64", |b| {
        let q = ArrayQueue::<u64>::new(1023);
        b.iter(|| {
            q.push(black_box(42)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.bench_function("nexus_ring/128b", |b| {
        let (mut tx, mut rx) = owned::ring_buffer::<Medium, 1024>();
        let msg = Medium([0; 16]);
        b.iter(|| {
            tx.push(black_box(msg)).unwrap();
            black_box(rx.pop().unwrap())
        });
    });

    group.bench_function("crossbeam_array/128b", |b| {
        let q = ArrayQueue::<Medium>::new(1023);
        let msg = Medium([0; 16]);
        b.iter(|| {
            q.push(black_box(msg)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Throughput benchmarks (burst send then receive)
// ============================================================================

fn bench_burst_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst_throughput");

    for batch_size in [100u64, 1000] {
        group.throughput(Throughput::Elements(batch_size));

        group.bench_with_input(
            BenchmarkId::new("nexus_ring", batch_size),
            &batch_size,
            |b, &n| {
                let (mut tx, mut rx) = owned::ring_buffer::<u64, 2048>();
                b.iter(|| {
                    for i in 0..n {
                        tx.push(black_box(i)).unwrap();
                    }
                    for _ in 0..n {
                        black_box(rx.pop().unwrap());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("rtrb", batch_size),
            &batch_size,
            |b, &n| {
                let (mut tx, mut rx) = rtrb::RingBuffer::<u64>::new(2047);
                b.iter(|| {
                    for i in 0..n {
                        tx.push(black_box(i)).unwrap();
                    }
                    for _ in 0..n {
                        black_box(rx.pop().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Unidirectional producer-consumer throughput
// ============================================================================

fn bench_cross_thread_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_thread_throughput");

    const MESSAGE_COUNT: u64 = 100_000;
    group.throughput(Throughput::Elements(MESSAGE_COUNT));

    group.bench_function("nexus_ring/u64", |b| {
        b.iter(|| {
            let (mut tx, mut rx) = owned::ring_buffer::<u64, 1024>();

            let producer = thread::spawn(move || {
                for i in 0..MESSAGE_COUNT {
                    while tx.push(i).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            for _ in 0..MESSAGE_COUNT {
                loop {
                    if let Some(v) = rx.pop() {
                        black_box(v);
                        break;
                    }
                    std::hint::spin_loop();
                }
            }

            producer.join().unwrap();
        });
    });

    group.bench_function("crossbeam_array/u64", |b| {
        b.iter(|| {
            let q = Arc::new(ArrayQueue::<u64>::new(1023));
            let q_producer = Arc::clone(&q);

            let producer = thread::spawn(move || {
                for i in 0..MESSAGE_COUNT {
                    while q_producer.push(i).is_err() {
                        std::hint::spin_loop();
                    }
                }
            });

            for _ in 0..MESSAGE_COUNT {
                loop {
                    if let Some(v) = q.pop() {
                        black_box(v);
                        break;
                    }
                    std::hint::spin_loop();
                }
            }

            producer.join().unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_thread_latency,
    bench_burst_throughput,
    bench_cross_thread_throughput
);
criterion_main!(benches);
