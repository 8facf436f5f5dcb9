//! Per-side hot-path state.
//!
//! Each side keeps its own counter locally (it is the only writer, so the
//! local copy is always current) plus a snapshot of the other side's
//! counter. The snapshot can only lag: the consumer never moves `read_pos`
//! backwards and neither does the producer with `write_pos`. A stale
//! snapshot therefore under-reports free space (producer) or available
//! values (consumer), never over-reports, and the acquire load of the other
//! counter is only needed when the snapshot says full or empty.

use crate::Full;
use crate::ring::RingBuffer;

/// Producer-local view of the counters.
#[derive(Debug)]
pub(crate) struct ProducerCursor {
    /// Our write position (authoritative, only we update it).
    write: usize,
    /// Last observed consumer position.
    cached_read: usize,
}

impl ProducerCursor {
    /// Seeds the cursor from the ring's current counters.
    pub(crate) fn new<T, const N: usize>(ring: &RingBuffer<T, N>) -> Self {
        Self {
            write: ring.load_write_relaxed(),
            cached_read: ring.load_read(),
        }
    }

    /// Moves `value` into the next free slot and publishes it.
    ///
    /// # Safety
    ///
    /// The caller must be the only producer of `ring`, and this cursor must
    /// have been created from `ring`.
    #[inline]
    pub(crate) unsafe fn push<T, const N: usize>(
        &mut self,
        ring: &RingBuffer<T, N>,
        value: T,
    ) -> Result<(), Full<T>> {
        let write = self.write;
        let next = (write + 1) & RingBuffer::<T, N>::MASK;

        if next == self.cached_read && !self.refresh(ring, next) {
            return Err(Full(value));
        }

        // The slot at `write` is outside [read, write): vacant and ours.
        unsafe { ring.write_slot(write, value) };
        ring.publish_write(next);
        self.write = next;
        Ok(())
    }

    /// Reloads the consumer position. Returns `true` if `next` is now free.
    #[cold]
    fn refresh<T, const N: usize>(&mut self, ring: &RingBuffer<T, N>, next: usize) -> bool {
        self.cached_read = ring.load_read();
        next != self.cached_read
    }
}

/// Consumer-local view of the counters.
#[derive(Debug)]
pub(crate) struct ConsumerCursor {
    /// Our read position (authoritative, only we update it).
    read: usize,
    /// Last observed producer position.
    cached_write: usize,
}

impl ConsumerCursor {
    /// Seeds the cursor from the ring's current counters.
    pub(crate) fn new<T, const N: usize>(ring: &RingBuffer<T, N>) -> Self {
        Self {
            read: ring.load_read_relaxed(),
            cached_write: ring.load_write(),
        }
    }

    /// Moves the oldest value out of the ring and frees its slot.
    ///
    /// # Safety
    ///
    /// The caller must be the only consumer of `ring`, and this cursor must
    /// have been created from `ring`.
    #[inline]
    pub(crate) unsafe fn pop<T, const N: usize>(&mut self, ring: &RingBuffer<T, N>) -> Option<T> {
        let read = self.read;

        if read == self.cached_write && !self.refresh(ring) {
            return None;
        }

        let value = unsafe { ring.read_slot(read) };
        let next = (read + 1) & RingBuffer::<T, N>::MASK;
        ring.publish_read(next);
        self.read = next;
        Some(value)
    }

    /// Borrows the oldest value without consuming it.
    ///
    /// # Safety
    ///
    /// Same as [`pop`](Self::pop). The returned reference must be dropped
    /// before this cursor pops again.
    #[inline]
    pub(crate) unsafe fn peek<'r, T, const N: usize>(
        &mut self,
        ring: &'r RingBuffer<T, N>,
    ) -> Option<&'r T> {
        let read = self.read;

        if read == self.cached_write && !self.refresh(ring) {
            return None;
        }

        Some(unsafe { ring.slot_ref(read) })
    }

    /// Reloads the producer position. Returns `true` if a value is now
    /// available.
    #[cold]
    fn refresh<T, const N: usize>(&mut self, ring: &RingBuffer<T, N>) -> bool {
        self.cached_write = ring.load_write();
        self.read != self.cached_write
    }
}
