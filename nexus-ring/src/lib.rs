//! # nexus-ring
//!
//! Fixed-capacity single-producer single-consumer ring buffer for hard
//! real-time and latency-sensitive code: audio callbacks, control loops,
//! interrupt-driven pipelines, market data handoff.
//!
//! ## Design Goals
//!
//! - Wait-free: every operation finishes in a bounded number of steps
//! - No locks, no blocking, no allocation after construction
//! - Capacity is a const generic power of two, checked at compile time
//! - Producer and consumer counters live on separate cache lines
//!
//! ## Capacity
//!
//! A `RingBuffer<T, N>` has `N` slots but holds at most `N - 1` values. One
//! slot is kept empty so that "full" and "empty" can be told apart from the
//! two counters alone.
//!
//! ## Example
//!
//! ```
//! use nexus_ring::RingBuffer;
//!
//! let mut ring = RingBuffer::<u64, 4>::new();
//! let (mut tx, mut rx) = ring.split();
//!
//! assert_eq!(tx.capacity(), 3);
//!
//! tx.push(1).unwrap();
//! tx.push(2).unwrap();
//! tx.push(3).unwrap();
//! assert!(tx.push(4).is_err()); // full
//!
//! assert_eq!(rx.pop(), Some(1));
//! tx.push(4).unwrap();
//! ```
//!
//! For handles that must be moved into `std::thread::spawn`, see
//! [`owned::ring_buffer`].
//!
//! ## Compile-Time Enforcement
//!
//! Capacities that are not a power of two, or smaller than 2, are rejected
//! during constant evaluation:
//!
//! ```compile_fail
//! use nexus_ring::RingBuffer;
//! let ring = RingBuffer::<u64, 3>::new(); // ERROR: 3 is not a power of two
//! ```
//!
//! ```compile_fail
//! use nexus_ring::RingBuffer;
//! let ring = RingBuffer::<u64, 1>::new(); // ERROR: fewer than 2 slots
//! ```
//!
//! ```compile_fail
//! use nexus_ring::RingBuffer;
//! let ring = RingBuffer::<u64, 0>::new(); // ERROR: fewer than 2 slots
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

#[cfg(not(target_has_atomic = "ptr"))]
compile_error!("nexus-ring requires lock-free pointer-width atomics on the target platform");

mod cursor;
mod handle;
pub mod owned;
mod ring;
mod trace;

use std::fmt;

pub use handle::{Consumer, Producer};
pub use ring::RingBuffer;
pub use trace::init_tracing;

/// Error returned when the ring buffer is full.
///
/// Contains the value that could not be pushed, unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ring buffer is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}
