//! Heap-shared producer and consumer halves.
//!
//! Use these when the halves must outlive the current scope, e.g. when they
//! are moved into `std::thread::spawn`. The ring is allocated once, inside
//! [`ring_buffer`]; after that, push and pop never touch the allocator.
//!
//! # Example
//!
//! ```
//! use nexus_ring::owned;
//!
//! let (mut tx, mut rx) = owned::ring_buffer::<u64, 1024>();
//!
//! let producer = std::thread::spawn(move || {
//!     for i in 0..10_000 {
//!         while tx.push(i).is_err() {
//!             std::thread::yield_now();
//!         }
//!     }
//! });
//!
//! let mut expected = 0;
//! while expected < 10_000 {
//!     if let Some(v) = rx.pop() {
//!         assert_eq!(v, expected);
//!         expected += 1;
//!     } else {
//!         std::thread::yield_now();
//!     }
//! }
//!
//! producer.join().unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

use crate::Full;
use crate::cursor::{ConsumerCursor, ProducerCursor};
use crate::ring::RingBuffer;
use crate::trace::debug;

/// Allocates a shared ring buffer with `N` slots, returning
/// `(Producer, Consumer)`.
///
/// `N` must be a power of two and at least 2 (enforced at compile time).
/// The ring holds at most `N - 1` values. Values still in the ring are
/// dropped together with the last of the two halves.
#[must_use]
pub fn ring_buffer<T, const N: usize>() -> (Producer<T, N>, Consumer<T, N>) {
    let ring = RingBuffer::<T, N>::new_shared();
    debug!(
        capacity = RingBuffer::<T, N>::CAPACITY,
        slot_size = std::mem::size_of::<T>(),
        "allocated shared ring buffer"
    );

    (
        Producer {
            cursor: ProducerCursor::new(&ring),
            ring: Arc::clone(&ring),
        },
        Consumer {
            cursor: ConsumerCursor::new(&ring),
            ring,
        },
    )
}

/// The producer half of a shared ring buffer.
pub struct Producer<T, const N: usize> {
    ring: Arc<RingBuffer<T, N>>,
    cursor: ProducerCursor,
}

impl<T, const N: usize> Producer<T, N> {
    /// Pushes a value into the ring.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the ring already holds `capacity()`
    /// values. The ring is left untouched.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        // Safety: `ring_buffer` creates exactly one producer per ring.
        unsafe { self.cursor.push(&self.ring, value) }
    }

    /// Returns the maximum number of values the ring can hold (`N - 1`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        RingBuffer::<T, N>::CAPACITY
    }

    /// Returns the number of values currently held (snapshot).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` if the ring is empty (snapshot).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns `true` if the ring is full (snapshot).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns `true` if the consumer has been dropped.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.ring) == 1
    }
}

impl<T, const N: usize> fmt::Debug for Producer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// The consumer half of a shared ring buffer.
pub struct Consumer<T, const N: usize> {
    ring: Arc<RingBuffer<T, N>>,
    cursor: ConsumerCursor,
}

impl<T, const N: usize> Consumer<T, N> {
    /// Pops the oldest value. Returns `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // Safety: `ring_buffer` creates exactly one consumer per ring.
        unsafe { self.cursor.pop(&self.ring) }
    }

    /// Pops the oldest value into `out`.
    ///
    /// Returns `true` and overwrites `out` on success. Returns `false` and
    /// leaves `out` untouched if the ring is empty.
    #[inline]
    pub fn pop_into(&mut self, out: &mut T) -> bool {
        match self.pop() {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Borrows the oldest value without removing it.
    #[inline]
    pub fn peek(&mut self) -> Option<&T> {
        // Safety: as for `pop`; the borrow holds `&mut self`.
        unsafe { self.cursor.peek(&self.ring) }
    }

    /// Returns the maximum number of values the ring can hold (`N - 1`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        RingBuffer::<T, N>::CAPACITY
    }

    /// Returns the number of values currently held (snapshot).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` if the ring is empty (snapshot).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns `true` if the ring is full (snapshot).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns `true` if the producer has been dropped.
    ///
    /// Values pushed before the producer went away can still be popped.
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        Arc::strong_count(&self.ring) == 1
    }
}

impl<T, const N: usize> fmt::Debug for Consumer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
