//! Ping-pong latency: nexus-ring vs rtrb.
//!
//! Exactly one message in flight; the reported figure is RTT/2.
//!
//! Run: cargo bench --bench perf_latency
//! Pin: sudo taskset -c 0,2 ./target/release/deps/perf_latency-*

use std::hint::black_box;
use std::thread;

use hdrhistogram::Histogram;

const WARMUP: u64 = 10_000;
const SAMPLES: u64 = 100_000;
const CAPACITY: usize = 64;

fn bench_nexus_ring() -> Histogram<u64> {
    use nexus_ring::owned;

    let (mut tx_fwd, mut rx_fwd) = owned::ring_buffer::<u64, CAPACITY>();
    let (mut tx_ret, mut rx_ret) = owned::ring_buffer::<u64, CAPACITY>();

    let total = WARMUP + SAMPLES;

    // Echo thread
    let echo = thread::spawn(move || {
        for _ in 0..total {
            let val = loop {
                if let Some(v) = rx_fwd.pop() {
                    break v;
                }
                std::hint::spin_loop();
            };
            while tx_ret.push(val).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let mut hist = Histogram::<u64>::new_with_max(1_000_000, 3).unwrap();

    for i in 0..total {
        let start = rdtsc();

        while tx_fwd.push(i).is_err() {
            std::hint::spin_loop();
        }
        let echoed = loop {
            if let Some(v) = rx_ret.pop() {
                break v;
            }
            std::hint::spin_loop();
        };
        black_box(echoed);

        let elapsed = rdtsc().wrapping_sub(start) / 2;
        if i >= WARMUP {
            let _ = hist.record(elapsed.min(1_000_000));
        }
    }

    echo.join().unwrap();
    hist
}

fn bench_rtrb() -> Histogram<u64> {
    let (mut tx_fwd, mut rx_fwd) = rtrb::RingBuffer::<u64>::new(CAPACITY - 1);
    let (mut tx_ret, mut rx_ret) = rtrb::RingBuffer::<u64>::new(CAPACITY - 1);

    let total = WARMUP + SAMPLES;

    let echo = thread::spawn(move || {
        for _ in 0..total {
            let val = loop {
                if let Ok(v) = rx_fwd.pop() {
                    break v;
                }
                std::hint::spin_loop();
            };
            while tx_ret.push(val).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let mut hist = Histogram::<u64>::new_with_max(1_000_000, 3).unwrap();

    for i in 0..total {
        let start = rdtsc();

        while tx_fwd.push(i).is_err() {
            std::hint::spin_loop();
        }
        let echoed = loop {
            if let Ok(v) = rx_ret.pop() {
                break v;
            }
            std::hint::spin_loop();
        };
        black_box(echoed);

        let elapsed = rdtsc().wrapping_sub(start) / 2;
        if i >= WARMUP {
            let _ = hist.record(elapsed.min(1_000_000));
        }
    }

    echo.join().unwrap();
    hist
}

fn print_latency(name: &str, hist: &Histogram<u64>) {
    println!("{name} one-way latency (cycles):");
    println!("  min:   {:>7}", hist.min());
    println!("  mean:  {:>7.0}", hist.mean());
    println!("  p50:   {:>7}", hist.value_at_quantile(0.50));
    println!("  p90:   {:>7}", hist.value_at_quantile(0.90));
    println!("  p99:   {:>7}", hist.value_at_quantile(0.99));
    println!("  p999:  {:>7}", hist.value_at_quantile(0.999));
    println!("  max:   {:>7}", hist.max());
    println!();
}

fn main() {
    // Same usable capacity for both: 63 values.
    print_latency("nexus-ring", &bench_nexus_ring());
    print_latency("rtrb", &bench_rtrb());
}

#[inline]
fn rdtsc() -> u64 {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        core::arch::x86_64::_rdtsc()
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        use std::time::Instant;
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}
