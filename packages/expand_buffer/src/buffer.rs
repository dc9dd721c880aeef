use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use bucket_pool::BucketPool;

use crate::{Error, Result};

/// The fixed ceiling on buffer capacity. Construction and growth past this limit fail with
/// [`Error::CapacityExceeded`].
pub const MAX_CAPACITY: usize = 64 * 1024 * 1024;

/// Capacity multiplier applied on growth (200%).
const GROWTH_FACTOR: usize = 2;

/// Floor on how much a single growth step adds, so a buffer starting at or near zero capacity
/// does not crawl upward one slot at a time.
const MINIMUM_GROW: usize = 4;

/// A growable buffer that rents its backing storage from a shared bucketed pool.
///
/// `ExpandBuffer` behaves like a dynamically sized array and stack, but its backing block comes
/// from a [`BucketPool`] rather than the general allocator. On a hot path that repeatedly fills
/// and discards small, variable-length sequences (a tokenizer stack, a parser scratch area),
/// this amortizes allocation cost across many buffer lifetimes: a dropped buffer's block is
/// reused by the next buffer of the same size.
///
/// The buffer tracks a logical length separate from the backing capacity. Only elements at
/// indices `[0, len())` are live; slots past the length exist in storage but have no meaning to
/// callers.
///
/// # Reference invalidation
///
/// [`get()`][1], [`peek()`][2], [`as_slice()`][3] and the indexing operators return references
/// directly into the backing storage. Growth replaces that storage, so such a reference must not
/// be held across any mutating call. All accessors borrow the buffer, which lets the borrow
/// checker enforce this statically - code that tries to hold a reference across a `push()` does
/// not compile.
///
/// # Thread safety
///
/// The buffer is single-owner and not meant for concurrent mutation; wrap it in a lock if you
/// need that. The pool behind it is fully thread-safe, so buffers on different threads happily
/// share one pool.
///
/// # Example
///
/// ```rust
/// use expand_buffer::ExpandBuffer;
///
/// let mut buffer = ExpandBuffer::<u32>::new(2)?;
///
/// buffer.push(1)?;
/// buffer.push(2)?;
/// buffer.push(3)?; // exceeds the initial capacity; the buffer grows transparently
///
/// assert_eq!(buffer.as_slice(), &[1, 2, 3]);
/// assert_eq!(buffer.pop()?, 3);
/// assert_eq!(buffer.len(), 2);
/// # Ok::<(), expand_buffer::Error>(())
/// ```
///
/// [1]: Self::get
/// [2]: Self::peek
/// [3]: Self::as_slice
pub struct ExpandBuffer<T: Default + 'static> {
    /// The pool all backing blocks are rented from and recycled to.
    pool: &'static BucketPool<T>,

    /// The rented backing block. `None` only after drop has handed the block back, so the
    /// block is recycled exactly once even if growth and drop interleave with panics.
    storage: Option<Box<[T]>>,

    /// The number of live elements. Always `<= capacity()`.
    length: usize,
}

impl<T> ExpandBuffer<T>
where
    T: Default + Send + 'static,
{
    /// Creates a buffer with at least `initial_capacity` slots, rented from the process-wide
    /// shared pool for `T`.
    ///
    /// The new buffer is logically empty regardless of the requested capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use expand_buffer::ExpandBuffer;
    ///
    /// let buffer = ExpandBuffer::<u32>::new(16)?;
    ///
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.capacity(), 16);
    /// # Ok::<(), expand_buffer::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `initial_capacity` is above [`MAX_CAPACITY`].
    pub fn new(initial_capacity: usize) -> Result<Self> {
        Self::with_pool(BucketPool::shared(), initial_capacity)
    }
}

impl<T: Default> ExpandBuffer<T> {
    /// Creates a buffer backed by an explicitly provided pool instead of the shared one.
    ///
    /// Useful when renting behavior needs to be observable, e.g. to verify in tests that a
    /// workload stopped allocating once the pool warmed up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `initial_capacity` is above [`MAX_CAPACITY`].
    pub fn with_pool(pool: &'static BucketPool<T>, initial_capacity: usize) -> Result<Self> {
        if initial_capacity > MAX_CAPACITY {
            return Err(Error::CapacityExceeded {
                requested: initial_capacity,
                maximum: MAX_CAPACITY,
            });
        }

        Ok(Self {
            pool,
            storage: Some(pool.rent(initial_capacity)),
            length: 0,
        })
    }

    /// The number of live elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the buffer holds no live elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of elements the backing block can hold before the buffer must grow.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage().len()
    }

    /// A shared reference to the live element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T> {
        if index >= self.length {
            return Err(Error::IndexOutOfRange {
                index,
                length: self.length,
            });
        }

        Ok(self
            .storage()
            .get(index)
            .expect("index was checked against length, which never exceeds capacity"))
    }

    /// An exclusive reference to the live element at `index`, for in-place mutation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use expand_buffer::ExpandBuffer;
    ///
    /// let mut buffer = ExpandBuffer::<u32>::new(4)?;
    /// buffer.push(10)?;
    ///
    /// *buffer.get_mut(0)? += 5;
    /// assert_eq!(buffer[0], 15);
    /// # Ok::<(), expand_buffer::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.length {
            return Err(Error::IndexOutOfRange {
                index,
                length: self.length,
            });
        }

        Ok(self
            .storage_mut()
            .get_mut(index)
            .expect("index was checked against length, which never exceeds capacity"))
    }

    /// The live elements as a slice, `[0, len())`.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.storage()
            .get(..self.length)
            .expect("length never exceeds capacity")
    }

    /// The live elements as a mutable slice, `[0, len())`.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let length = self.length;

        self.storage_mut()
            .get_mut(..length)
            .expect("length never exceeds capacity")
    }

    /// Ensures capacity for at least `capacity` elements and returns a mutable view over exactly
    /// that many slots, regardless of the current logical length.
    ///
    /// This is a capacity assurance operation, not a length mutation: "make room for N elements
    /// and let me fill them". Slots past the logical length hold default or stale values until
    /// written. Record the new logical length separately with [`set_len()`](Self::set_len) once
    /// the view has been filled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use expand_buffer::ExpandBuffer;
    ///
    /// let mut buffer = ExpandBuffer::<u8>::new(2)?;
    ///
    /// let room = buffer.make_room(10)?;
    /// assert_eq!(room.len(), 10);
    /// room.copy_from_slice(b"0123456789");
    ///
    /// // The view alone does not change the logical length.
    /// assert_eq!(buffer.len(), 0);
    /// buffer.set_len(10);
    /// assert_eq!(buffer.as_slice(), b"0123456789");
    /// # Ok::<(), expand_buffer::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `capacity` is above [`MAX_CAPACITY`], or if the
    /// growth step needed to reach it would pass the ceiling. The buffer is unchanged in that
    /// case.
    pub fn make_room(&mut self, capacity: usize) -> Result<&mut [T]> {
        self.ensure_capacity(capacity)?;

        Ok(self
            .storage_mut()
            .get_mut(..capacity)
            .expect("capacity was ensured just above"))
    }

    /// Sets the logical length directly.
    ///
    /// Intended as the companion of [`make_room()`](Self::make_room): fill the returned view,
    /// then record how many of its slots are now meaningful. Shrinking the length does not touch
    /// storage; the cut-off elements simply stop being live.
    ///
    /// # Panics
    ///
    /// Panics if `length` exceeds the current capacity.
    pub fn set_len(&mut self, length: usize) {
        assert!(
            length <= self.capacity(),
            "length {length} exceeds capacity {}",
            self.capacity()
        );

        self.length = length;
    }

    /// Resets the logical length to zero.
    ///
    /// O(1): storage contents are not touched, capacity is kept and nothing is returned to the
    /// pool. A subsequent [`push()`](Self::push) reuses the existing block.
    pub fn clear(&mut self) {
        self.length = 0;
    }

    /// A shared reference to the top element, the one most recently pushed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the buffer is empty.
    pub fn peek(&self) -> Result<&T> {
        let top = self.length.checked_sub(1).ok_or(Error::Underflow)?;

        Ok(self
            .storage()
            .get(top)
            .expect("top index is below length, which never exceeds capacity"))
    }

    /// An exclusive reference to the top element, for in-place mutation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the buffer is empty.
    pub fn peek_mut(&mut self) -> Result<&mut T> {
        let top = self.length.checked_sub(1).ok_or(Error::Underflow)?;

        Ok(self
            .storage_mut()
            .get_mut(top)
            .expect("top index is below length, which never exceeds capacity"))
    }

    /// Removes and returns the top element.
    ///
    /// The vacated slot is left holding `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the buffer is empty; the buffer is unchanged in that
    /// case.
    pub fn pop(&mut self) -> Result<T> {
        let top = self.length.checked_sub(1).ok_or(Error::Underflow)?;

        self.length = top;

        Ok(mem::take(self.storage_mut().get_mut(top).expect(
            "top index is below the old length, which never exceeds capacity",
        )))
    }

    /// Removes and returns the top element, or `None` if the buffer is empty.
    ///
    /// The non-failing variant of [`pop()`](Self::pop).
    ///
    /// # Example
    ///
    /// ```rust
    /// use expand_buffer::ExpandBuffer;
    ///
    /// let mut buffer = ExpandBuffer::<u32>::new(4)?;
    /// buffer.push(7)?;
    ///
    /// assert_eq!(buffer.try_pop(), Some(7));
    /// assert_eq!(buffer.try_pop(), None);
    /// # Ok::<(), expand_buffer::Error>(())
    /// ```
    pub fn try_pop(&mut self) -> Option<T> {
        self.pop().ok()
    }

    /// Appends an element, growing the backing block first if it is full.
    ///
    /// Amortized O(1) across the buffer's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the required growth would pass [`MAX_CAPACITY`].
    /// The buffer is unchanged in that case - length and existing elements are exactly as they
    /// were before the failed push.
    pub fn push(&mut self, item: T) -> Result<()> {
        if self.length == self.capacity() {
            let target = self
                .capacity()
                .checked_add(1)
                .expect("capacity is bounded by the ceiling, far below usize::MAX");

            self.ensure_capacity(target)?;
        }

        let slot = self.length;

        *self
            .storage_mut()
            .get_mut(slot)
            .expect("growth guarantees a vacant slot at the old length") = item;

        self.length = slot
            .checked_add(1)
            .expect("length is bounded by the capacity ceiling, far below usize::MAX");

        Ok(())
    }

    /// Grows the backing block until it holds at least `target` slots.
    ///
    /// The candidate capacity doubles per step with a floor of [`MINIMUM_GROW`] added slots.
    /// A candidate past [`MAX_CAPACITY`] fails the growth outright, even when `target` itself
    /// would still fit below the ceiling. On success the replacement block is fully populated
    /// with the live elements and adopted before the old block is recycled, so a mid-copy
    /// failure can never leave the buffer referencing a block the pool has already reclaimed.
    fn ensure_capacity(&mut self, target: usize) -> Result<()> {
        if target <= self.capacity() {
            return Ok(());
        }

        if target > MAX_CAPACITY {
            return Err(Error::CapacityExceeded {
                requested: target,
                maximum: MAX_CAPACITY,
            });
        }

        let mut candidate = self.capacity();
        while candidate < target {
            candidate = candidate
                .saturating_mul(GROWTH_FACTOR)
                .max(candidate.saturating_add(MINIMUM_GROW));

            if candidate > MAX_CAPACITY {
                return Err(Error::CapacityExceeded {
                    requested: candidate,
                    maximum: MAX_CAPACITY,
                });
            }
        }

        let mut replacement = self.pool.rent(candidate);

        let mut retired = self
            .storage
            .take()
            .expect("storage is only vacated on drop, so it is always present during use");

        // Move only the live elements; cost is proportional to the logical length, not the old
        // capacity. The vacated slots are left holding default values.
        for (vacant, live) in replacement
            .iter_mut()
            .zip(retired.iter_mut().take(self.length))
        {
            *vacant = mem::take(live);
        }

        self.storage = Some(replacement);
        self.pool.recycle(retired);

        Ok(())
    }

    fn storage(&self) -> &[T] {
        self.storage
            .as_deref()
            .expect("storage is only vacated on drop, so it is always present during use")
    }

    fn storage_mut(&mut self) -> &mut [T] {
        self.storage
            .as_deref_mut()
            .expect("storage is only vacated on drop, so it is always present during use")
    }
}

impl<T: Default> Drop for ExpandBuffer<T> {
    fn drop(&mut self) {
        // Take, so the block goes back to the pool exactly once.
        if let Some(block) = self.storage.take() {
            self.pool.recycle(block);
        }
    }
}

impl<T: Default> Index<usize> for ExpandBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
            .expect("indexed access outside the live range of the buffer")
    }
}

impl<T: Default> IndexMut<usize> for ExpandBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
            .expect("indexed access outside the live range of the buffer")
    }
}

impl<T: Default> fmt::Debug for ExpandBuffer<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only, mutation is meaningless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandBuffer")
            .field("length", &self.length)
            .field("capacity", &self.capacity())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        clippy::unwrap_used,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(ExpandBuffer<u32>: Send, Sync, Debug);
    assert_impl_all!(ExpandBuffer<String>: Send, Debug);

    /// A private pool per test, so rent/reuse counters are deterministic.
    fn isolated_pool<T: Default>() -> &'static BucketPool<T> {
        Box::leak(Box::new(BucketPool::new()))
    }

    #[test]
    fn pushes_preserve_order_and_count() {
        let mut buffer = ExpandBuffer::<u32>::new(8).unwrap();

        for value in 0..100 {
            buffer.push(value).unwrap();
        }

        assert_eq!(buffer.len(), 100);

        for index in 0..100 {
            assert_eq!(*buffer.get(index).unwrap(), index as u32);
            assert_eq!(buffer[index], index as u32);
        }
    }

    #[test]
    fn push_then_pop_is_lifo_identity() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        buffer.push(1).unwrap();
        let length_before = buffer.len();

        buffer.push(99).unwrap();
        assert_eq!(buffer.pop().unwrap(), 99);

        assert_eq!(buffer.len(), length_before);
    }

    #[test]
    fn growth_scenario_from_small_capacity() {
        let pool = isolated_pool::<i32>();
        let mut buffer = ExpandBuffer::with_pool(pool, 2).unwrap();

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        buffer.push(3).unwrap();

        // Growth from capacity 2: max(2 * 2, 2 + 4) = 6.
        assert_eq!(buffer.capacity(), 6);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer[0], 1);
        assert_eq!(buffer[1], 2);
        assert_eq!(buffer[2], 3);

        assert_eq!(buffer.pop().unwrap(), 3);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn growth_preserves_all_existing_elements() {
        let mut buffer = ExpandBuffer::<usize>::new(4).unwrap();

        for value in 0..1000 {
            buffer.push(value).unwrap();
        }

        assert_eq!(buffer.len(), 1000);
        assert!(buffer.capacity() >= 1000);

        for index in 0..1000 {
            assert_eq!(buffer[index], index);
        }
    }

    #[test]
    fn growth_moves_owned_elements() {
        let mut buffer = ExpandBuffer::<String>::new(1).unwrap();

        buffer.push("one".to_string()).unwrap();
        buffer.push("two".to_string()).unwrap();
        buffer.push("three".to_string()).unwrap();

        assert_eq!(buffer.as_slice(), ["one", "two", "three"]);
    }

    #[test]
    fn pop_and_peek_on_empty_underflow() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        assert!(matches!(buffer.pop(), Err(Error::Underflow)));
        assert!(matches!(buffer.peek(), Err(Error::Underflow)));
        assert!(matches!(buffer.peek_mut(), Err(Error::Underflow)));
        assert_eq!(buffer.try_pop(), None);

        // The failed operations left the buffer untouched and usable.
        buffer.push(5).unwrap();
        assert_eq!(*buffer.peek().unwrap(), 5);
    }

    #[test]
    fn peek_mut_mutates_in_place() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        buffer.push(10).unwrap();
        *buffer.peek_mut().unwrap() = 20;

        assert_eq!(buffer.pop().unwrap(), 20);
    }

    #[test]
    fn as_mut_slice_mutates_live_prefix_in_place() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        buffer.push(3).unwrap();

        for slot in buffer.as_mut_slice() {
            *slot *= 10;
        }

        // The view covers exactly the live prefix, not the full capacity.
        assert_eq!(buffer.as_mut_slice().len(), 3);
        assert_eq!(buffer.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn clear_keeps_capacity_and_storage() {
        let pool = isolated_pool::<u32>();
        let mut buffer = ExpandBuffer::with_pool(pool, 4).unwrap();

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();

        let allocations_before = pool.allocations();
        buffer.clear();

        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 4);

        // Pushing again reuses the same block; nothing new is rented.
        buffer.push(3).unwrap();
        assert_eq!(pool.allocations(), allocations_before);
        assert_eq!(buffer[0], 3);
    }

    #[test]
    fn construction_past_ceiling_is_rejected() {
        let result = ExpandBuffer::<u8>::new(MAX_CAPACITY + 1);

        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                requested,
                maximum: MAX_CAPACITY,
            }) if requested == MAX_CAPACITY + 1
        ));
    }

    #[test]
    fn construction_at_ceiling_is_allowed() {
        // The ceiling itself is a valid capacity; only values past it fail.
        let buffer = ExpandBuffer::<u8>::new(MAX_CAPACITY).unwrap();

        assert_eq!(buffer.capacity(), MAX_CAPACITY);
    }

    #[test]
    fn growth_past_ceiling_fails_and_preserves_state() {
        let mut buffer = ExpandBuffer::<u8>::new(MAX_CAPACITY).unwrap();

        let room = buffer.make_room(MAX_CAPACITY).unwrap();
        room.fill(7);
        buffer.set_len(MAX_CAPACITY);

        // The buffer is full at the ceiling; one more push must fail.
        let result = buffer.push(9);
        assert!(matches!(result, Err(Error::CapacityExceeded { .. })));

        // Prior state is unchanged after the failure.
        assert_eq!(buffer.len(), MAX_CAPACITY);
        assert_eq!(buffer.capacity(), MAX_CAPACITY);
        assert_eq!(buffer[0], 7);
        assert_eq!(buffer[MAX_CAPACITY - 1], 7);
    }

    #[test]
    fn overshooting_growth_candidate_fails_even_when_target_fits() {
        // Doubling from this capacity overshoots the ceiling. The target itself would fit, but
        // the growth step does not, so the request is refused.
        let mut buffer = ExpandBuffer::<u8>::new(MAX_CAPACITY - 1).unwrap();

        assert!(matches!(
            buffer.make_room(MAX_CAPACITY),
            Err(Error::CapacityExceeded { .. })
        ));

        // The failed growth left the buffer exactly as it was.
        assert_eq!(buffer.capacity(), MAX_CAPACITY - 1);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn growth_by_doubling_to_exactly_the_ceiling_is_allowed() {
        // From half the ceiling the doubling step lands exactly on the ceiling, which is a
        // valid capacity; only candidates past it fail.
        let mut buffer = ExpandBuffer::<u8>::new(MAX_CAPACITY / 2).unwrap();

        let room = buffer.make_room(MAX_CAPACITY).unwrap();
        assert_eq!(room.len(), MAX_CAPACITY);
        assert_eq!(buffer.capacity(), MAX_CAPACITY);
    }

    #[test]
    fn make_room_grows_without_touching_length() {
        let mut buffer = ExpandBuffer::<u32>::new(2).unwrap();

        let room = buffer.make_room(10).unwrap();
        assert_eq!(room.len(), 10);

        assert!(buffer.capacity() >= 10);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn make_room_within_capacity_does_not_grow() {
        let pool = isolated_pool::<u32>();
        let mut buffer = ExpandBuffer::with_pool(pool, 8).unwrap();

        let allocations_before = pool.allocations();
        let room = buffer.make_room(8).unwrap();

        assert_eq!(room.len(), 8);
        assert_eq!(pool.allocations(), allocations_before);
    }

    #[test]
    fn make_room_preserves_live_elements_across_growth() {
        let mut buffer = ExpandBuffer::<u32>::new(2).unwrap();

        buffer.push(11).unwrap();
        buffer.push(22).unwrap();

        _ = buffer.make_room(50).unwrap();

        buffer.set_len(2);
        assert_eq!(buffer.as_slice(), &[11, 22]);
    }

    #[test]
    fn set_len_shrinks_without_touching_storage() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        buffer.push(3).unwrap();

        buffer.set_len(1);
        assert_eq!(buffer.as_slice(), &[1]);
    }

    #[test]
    #[should_panic]
    fn set_len_past_capacity_panics() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();

        buffer.set_len(5);
    }

    #[test]
    fn checked_access_rejects_out_of_range() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();
        buffer.push(1).unwrap();

        assert!(matches!(
            buffer.get(1),
            Err(Error::IndexOutOfRange { index: 1, length: 1 })
        ));
        assert!(matches!(
            buffer.get_mut(3),
            Err(Error::IndexOutOfRange { index: 3, length: 1 })
        ));

        // Slots past the length exist in storage but are not live, so access is refused even
        // though the capacity would admit the index.
        assert!(buffer.capacity() > 1);
    }

    #[test]
    #[should_panic]
    fn index_past_length_panics() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();
        buffer.push(1).unwrap();

        _ = buffer[1];
    }

    #[test]
    fn drop_recycles_block_for_next_buffer() {
        let pool = isolated_pool::<u32>();

        {
            let mut buffer = ExpandBuffer::with_pool(pool, 8).unwrap();
            buffer.push(1).unwrap();
        }

        assert_eq!(pool.allocations(), 1);

        // The next buffer of the same capacity rents the recycled block.
        let _buffer = ExpandBuffer::with_pool(pool, 8).unwrap();
        assert_eq!(pool.allocations(), 1);
        assert_eq!(pool.reuses(), 1);
    }

    #[test]
    fn growth_recycles_the_outgrown_block() {
        let pool = isolated_pool::<u32>();

        let mut buffer = ExpandBuffer::with_pool(pool, 2).unwrap();
        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        buffer.push(3).unwrap();

        // The capacity-2 block went back to the pool during growth.
        let _other = ExpandBuffer::with_pool(pool, 2).unwrap();
        assert_eq!(pool.reuses(), 1);
    }

    #[test]
    fn dropped_owned_elements_do_not_leak_into_next_lease() {
        let pool = isolated_pool::<String>();

        {
            let mut buffer = ExpandBuffer::with_pool(pool, 4).unwrap();
            buffer.push("secret".to_string()).unwrap();
        }

        // The next buffer of the same capacity receives the recycled block.
        let mut probe = ExpandBuffer::with_pool(pool, 4).unwrap();
        assert_eq!(pool.reuses(), 1);

        // The block was wiped on recycle; nothing from the previous owner is observable.
        let room = probe.make_room(4).unwrap();
        assert!(room.iter().all(String::is_empty));
    }

    #[test]
    fn zero_capacity_buffer_grows_on_first_push() {
        let mut buffer = ExpandBuffer::<u32>::new(0).unwrap();

        assert_eq!(buffer.capacity(), 0);

        buffer.push(1).unwrap();

        // Growth from zero: max(0 * 2, 0 + 4) = 4.
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer[0], 1);
    }

    #[test]
    fn debug_output_reports_shape() {
        let mut buffer = ExpandBuffer::<u32>::new(4).unwrap();
        buffer.push(1).unwrap();

        let rendered = format!("{buffer:?}");
        assert!(rendered.contains("length: 1"));
        assert!(rendered.contains("capacity: 4"));
    }
}
