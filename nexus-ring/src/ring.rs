//! Inline ring buffer storage.
//!
//! Memory layout:
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ write_pos (cache-line padded) - producer owned        │
//! ├───────────────────────────────────────────────────────┤
//! │ read_pos (cache-line padded) - consumer owned         │
//! ├───────────────────────────────────────────────────────┤
//! │ slots: [T; N]                                         │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Both counters are slot indices in `[0, N)`. Values occupy
//! `[read_pos, write_pos)` modulo `N`, so at most `N - 1` slots are in use
//! and `write_pos == read_pos` always means empty.
//!
//! Ownership of a slot alternates strictly between the two sides: the
//! producer owns every slot outside the occupied range, the consumer owns
//! every slot inside it. A slot changes hands only through a release store
//! of the owning side's counter, observed by an acquire load on the other
//! side, so the slots themselves need no atomics.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::cursor::{ConsumerCursor, ProducerCursor};
use crate::handle::{Consumer, Producer};
use crate::trace::{debug, trace};

/// A fixed-capacity SPSC ring buffer with `N` inline slots.
///
/// `N` must be a power of two and at least 2 (enforced at compile time).
/// At most `N - 1` values are held at once.
///
/// The buffer itself only offers read-only introspection. Values go in and
/// out through the [`Producer`] and [`Consumer`] returned by
/// [`split`](Self::split), which guarantees there is exactly one of each.
///
/// Construction is `const`, so a ring can live on the stack or in a
/// `static` without touching the allocator.
#[repr(C)]
pub struct RingBuffer<T, const N: usize> {
    /// Producer's write position. Stored by the producer, loaded by both.
    write_pos: CachePadded<AtomicUsize>,
    /// Consumer's read position. Stored by the consumer, loaded by both.
    read_pos: CachePadded<AtomicUsize>,
    slots: [UnsafeCell<MaybeUninit<T>>; N],
}

// Safety: slot access is partitioned between exactly one producer and one
// consumer by the counter protocol above, so sharing `&RingBuffer` across
// threads only ever moves `T` from one thread to another.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Maximum number of values held at once.
    pub const CAPACITY: usize = N.wrapping_sub(1);

    /// Mask for index wrapping.
    pub(crate) const MASK: usize = N.wrapping_sub(1);

    const VALID: () = {
        assert!(N >= 2, "ring buffer needs at least 2 slots");
        assert!(N.is_power_of_two(), "ring buffer slot count must be a power of two");
    };

    /// Creates an empty ring buffer.
    ///
    /// Fails to compile if `N` is not a power of two or is less than 2.
    #[must_use]
    pub const fn new() -> Self {
        // Force the compile-time assertion to be evaluated
        let () = Self::VALID;

        Self {
            write_pos: CachePadded::new(AtomicUsize::new(0)),
            read_pos: CachePadded::new(AtomicUsize::new(0)),
            slots: [const { UnsafeCell::new(MaybeUninit::uninit()) }; N],
        }
    }

    /// Allocates an empty ring buffer directly on the heap.
    ///
    /// Only the two counters are written; the slots are left uninitialized
    /// in place, so the `N`-slot array never passes through the stack.
    pub(crate) fn new_shared() -> Arc<Self> {
        let () = Self::VALID;

        let mut ring = Arc::<Self>::new_uninit();
        let Some(uninit) = Arc::get_mut(&mut ring) else {
            unreachable!("freshly allocated Arc is unique");
        };
        let ptr = uninit.as_mut_ptr();

        // Safety: `ptr` points to a unique, properly aligned allocation. The
        // counters are initialized here; `UnsafeCell<MaybeUninit<T>>` slots
        // are valid uninitialized.
        unsafe {
            (&raw mut (*ptr).write_pos).write(CachePadded::new(AtomicUsize::new(0)));
            (&raw mut (*ptr).read_pos).write(CachePadded::new(AtomicUsize::new(0)));
            ring.assume_init()
        }
    }

    /// Splits the ring into its producer and consumer halves.
    ///
    /// The exclusive borrow guarantees a single producer and a single
    /// consumer for as long as the halves are alive. Values left in the ring
    /// when the halves are dropped stay there and are delivered by the next
    /// split.
    pub fn split(&mut self) -> (Producer<'_, T, N>, Consumer<'_, T, N>) {
        let ring: &Self = self;
        trace!(capacity = Self::CAPACITY, len = ring.len(), "split ring buffer");

        (
            Producer::new(ring, ProducerCursor::new(ring)),
            Consumer::new(ring, ConsumerCursor::new(ring)),
        )
    }

    /// Returns the maximum number of values the ring can hold (`N - 1`).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    /// Returns the number of values currently held.
    ///
    /// Under concurrent use this is a snapshot that may be stale by the time
    /// it is read, but it is always within `0..=capacity()`.
    #[inline]
    pub fn len(&self) -> usize {
        let write = self.load_write();
        let read = self.load_read();
        write.wrapping_sub(read) & Self::MASK
    }

    /// Returns `true` if the ring holds no values (snapshot).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.load_write() == self.load_read()
    }

    /// Returns `true` if the ring holds `capacity()` values (snapshot).
    #[inline]
    pub fn is_full(&self) -> bool {
        let write = self.load_write();
        (write.wrapping_add(1) & Self::MASK) == self.load_read()
    }

    // === Counter operations ===

    /// Loads the producer's write position.
    #[inline(always)]
    pub(crate) fn load_write(&self) -> usize {
        self.write_pos.load(Ordering::Acquire)
    }

    /// Loads the consumer's read position.
    #[inline(always)]
    pub(crate) fn load_read(&self) -> usize {
        self.read_pos.load(Ordering::Acquire)
    }

    /// Loads the write position without synchronizing.
    ///
    /// Only meaningful on the producer side (or while no producer exists),
    /// where it returns our own last store.
    #[inline(always)]
    pub(crate) fn load_write_relaxed(&self) -> usize {
        self.write_pos.load(Ordering::Relaxed)
    }

    /// Loads the read position without synchronizing. Consumer side only.
    #[inline(always)]
    pub(crate) fn load_read_relaxed(&self) -> usize {
        self.read_pos.load(Ordering::Relaxed)
    }

    /// Publishes a new write position, handing the slot just written to the
    /// consumer.
    #[inline(always)]
    pub(crate) fn publish_write(&self, next: usize) {
        debug_assert!(next < N);
        self.write_pos.store(next, Ordering::Release);
    }

    /// Publishes a new read position, handing the slot just read back to the
    /// producer.
    #[inline(always)]
    pub(crate) fn publish_read(&self, next: usize) {
        debug_assert!(next < N);
        self.read_pos.store(next, Ordering::Release);
    }

    // === Slot access ===

    /// Moves `value` into the slot at `index`.
    ///
    /// # Safety
    ///
    /// `index < N`, the caller is the sole producer, and the slot is outside
    /// the occupied range (so it is vacant and unobserved by the consumer).
    #[inline(always)]
    pub(crate) unsafe fn write_slot(&self, index: usize, value: T) {
        debug_assert!(index < N);
        unsafe { (*self.slots.get_unchecked(index).get()).write(value) };
    }

    /// Moves the value out of the slot at `index`, leaving it vacant.
    ///
    /// # Safety
    ///
    /// `index < N`, the caller is the sole consumer, and the slot is inside
    /// the occupied range as observed through an acquire load of the write
    /// position.
    #[inline(always)]
    pub(crate) unsafe fn read_slot(&self, index: usize) -> T {
        debug_assert!(index < N);
        unsafe { (*self.slots.get_unchecked(index).get()).assume_init_read() }
    }

    /// Borrows the value in the slot at `index`.
    ///
    /// # Safety
    ///
    /// Same as [`read_slot`](Self::read_slot), and the slot must not be
    /// released to the producer while the reference is alive.
    #[inline(always)]
    pub(crate) unsafe fn slot_ref(&self, index: usize) -> &T {
        debug_assert!(index < N);
        unsafe { (*self.slots.get_unchecked(index).get()).assume_init_ref() }
    }
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        // Exclusive access: neither side can be running
        let write = *self.write_pos.get_mut();
        let read = *self.read_pos.get_mut();
        let remaining = write.wrapping_sub(read) & Self::MASK;

        if remaining == 0 {
            return;
        }
        debug!(remaining, "dropping ring buffer with undelivered values");

        let mut i = read;
        for _ in 0..remaining {
            // Safety: `[read, write)` is exactly the initialized range, and
            // `&mut self` means no producer or consumer half is alive.
            unsafe { self.slots[i].get_mut().assume_init_drop() };
            i = (i + 1) & Self::MASK;
        }
    }
}

impl<T, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
