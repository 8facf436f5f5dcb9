//! Borrowed producer and consumer halves of a [`RingBuffer`].
//!
//! Obtained from [`RingBuffer::split`]. Neither half is `Clone`, and both
//! take `&mut self` to move values, so two threads can never push (or pop)
//! concurrently. Each half is `Send`, so the usual pattern is to hand one
//! of them to a scoped thread:
//!
//! ```
//! use nexus_ring::RingBuffer;
//!
//! let mut ring = RingBuffer::<u32, 64>::new();
//! let (mut tx, mut rx) = ring.split();
//!
//! std::thread::scope(|s| {
//!     s.spawn(move || {
//!         for i in 0..1000 {
//!             while tx.push(i).is_err() {
//!                 std::thread::yield_now();
//!             }
//!         }
//!     });
//!
//!     let mut expected = 0;
//!     while expected < 1000 {
//!         if let Some(v) = rx.pop() {
//!             assert_eq!(v, expected);
//!             expected += 1;
//!         } else {
//!             std::thread::yield_now();
//!         }
//!     }
//! });
//! ```

use std::fmt;

use crate::Full;
use crate::cursor::{ConsumerCursor, ProducerCursor};
use crate::ring::RingBuffer;

/// The producer half of a split [`RingBuffer`].
pub struct Producer<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
    cursor: ProducerCursor,
}

impl<'a, T, const N: usize> Producer<'a, T, N> {
    pub(crate) const fn new(ring: &'a RingBuffer<T, N>, cursor: ProducerCursor) -> Self {
        Self { ring, cursor }
    }

    /// Pushes a value into the ring.
    ///
    /// Never blocks, allocates, or retries.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the ring already holds `capacity()`
    /// values. The ring is left untouched.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        // Safety: `split` hands out one producer per exclusive borrow, and
        // the cursor was seeded from this ring.
        unsafe { self.cursor.push(self.ring, value) }
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
    ///
    /// From the producer side a `false` stays valid until our next push:
    /// the consumer can only free slots.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<T, const N: usize> fmt::Debug for Producer<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// The consumer half of a split [`RingBuffer`].
pub struct Consumer<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
    cursor: ConsumerCursor,
}

impl<'a, T, const N: usize> Consumer<'a, T, N> {
    pub(crate) const fn new(ring: &'a RingBuffer<T, N>, cursor: ConsumerCursor) -> Self {
        Self { ring, cursor }
    }

    /// Pops the oldest value. Returns `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // Safety: `split` hands out one consumer per exclusive borrow, and
        // the cursor was seeded from this ring.
        unsafe { self.cursor.pop(self.ring) }
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
    ///
    /// The producer cannot overwrite the value while the borrow is alive:
    /// its slot is only released by the next `pop`.
    #[inline]
    pub fn peek(&mut self) -> Option<&T> {
        // Safety: as for `pop`; the returned borrow holds `&mut self`, so no
        // pop can release the slot while it is alive.
        unsafe { self.cursor.peek(self.ring) }
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
    ///
    /// From the consumer side a `false` stays valid until our next pop:
    /// the producer can only add values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns `true` if the ring is full (snapshot).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<T, const N: usize> fmt::Debug for Consumer<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
