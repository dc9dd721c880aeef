use std::fmt;
use std::mem;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use foldhash::{HashMap, HashMapExt};

/// Largest block capacity the pool will retain for reuse. Larger blocks are still handed out on
/// demand but are dropped on recycle instead of being kept, so a single oversized lease does not
/// pin a large allocation for the rest of the process lifetime.
const MAX_POOLED_BLOCK_CAPACITY: usize = 1024 * 1024;

/// Upper bound on how many idle blocks one bucket retains. Recycled blocks beyond this are
/// dropped.
const MAX_BLOCKS_PER_BUCKET: usize = 16;

/// A thread-safe pool of contiguous storage blocks, bucketed by block capacity.
///
/// Blocks are `Box<[T]>` slices whose every slot holds a valid `T` (starting out as
/// [`Default::default()`]). A rented block has exactly the requested capacity. Ownership of a
/// block transfers fully to the renter on [`rent()`][1] and back to the pool on [`recycle()`][2];
/// the pool keeps no alias to blocks it has lent out.
///
/// # Recycling hygiene
///
/// If `T` owns resources (that is, [`mem::needs_drop`] reports `true`), every slot of a recycled
/// block is reset to its default value before the block is retained. Stale owned values from the
/// previous lease are dropped at recycle time and never become visible to a later renter. For
/// plain value types the wipe is skipped and slots retain arbitrary stale values, which the next
/// renter must treat as meaningless.
///
/// # Thread safety
///
/// The pool is fully thread-safe: any number of threads may rent and recycle concurrently. The
/// blocks themselves are single-owner; thread safety of a block's contents while rented is the
/// renter's concern.
///
/// # Example
///
/// ```rust
/// use bucket_pool::BucketPool;
///
/// let pool = BucketPool::<String>::new();
///
/// let mut block = pool.rent(4);
/// block[0] = "hello".to_string();
/// pool.recycle(block);
///
/// // The reused block comes back wiped because String owns heap memory.
/// let block = pool.rent(4);
/// assert!(block[0].is_empty());
/// ```
///
/// [1]: Self::rent
/// [2]: Self::recycle
pub struct BucketPool<T> {
    /// Idle blocks, keyed by exact block capacity.
    /// We use foldhash for better performance with small hash tables.
    buckets: Mutex<HashMap<usize, Vec<Box<[T]>>>>,

    /// How many blocks have been freshly allocated because no idle block of the right size
    /// was available.
    allocations: AtomicUsize,

    /// How many rents were served from an existing bucket without allocating.
    reuses: AtomicUsize,
}

impl<T> BucketPool<T> {
    /// Creates a new, empty pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::BucketPool;
    ///
    /// let pool = BucketPool::<u32>::new();
    /// assert_eq!(pool.allocations(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            allocations: AtomicUsize::new(0),
            reuses: AtomicUsize::new(0),
        }
    }

    /// The number of blocks that were freshly allocated because no idle block of the requested
    /// capacity was available.
    ///
    /// Monotonic over the pool's lifetime. Intended for tests and benchmarks that want to verify
    /// storage is actually being reused.
    #[must_use]
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// The number of rents that were served from an existing bucket without allocating.
    ///
    /// Monotonic over the pool's lifetime.
    #[must_use]
    pub fn reuses(&self) -> usize {
        self.reuses.load(Ordering::Relaxed)
    }
}

impl<T: Default> BucketPool<T> {
    /// Rents a block of exactly `capacity` elements from the pool.
    ///
    /// The block is served from the matching bucket when one is idle there, otherwise freshly
    /// allocated with every slot set to `T::default()`. Ownership of the block transfers to the
    /// caller; hand it back with [`recycle()`](Self::recycle) when done.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::BucketPool;
    ///
    /// let pool = BucketPool::<u8>::new();
    ///
    /// let block = pool.rent(64);
    /// assert_eq!(block.len(), 64);
    /// ```
    #[must_use]
    pub fn rent(&self, capacity: usize) -> Box<[T]> {
        let reused = self
            .buckets
            .lock()
            .expect("bucket map mutex is never poisoned because no pool code panics while holding it")
            .get_mut(&capacity)
            .and_then(Vec::pop);

        if let Some(block) = reused {
            self.reuses.fetch_add(1, Ordering::Relaxed);
            return block;
        }

        self.allocations.fetch_add(1, Ordering::Relaxed);
        (0..capacity).map(|_| T::default()).collect()
    }

    /// Returns a block to the pool for later reuse.
    ///
    /// If `T` owns resources, every slot is reset to its default value first, dropping any stale
    /// values from the lease that just ended. Blocks that are empty, oversized, or arrive at an
    /// already full bucket are dropped instead of retained.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::BucketPool;
    ///
    /// let pool = BucketPool::<u8>::new();
    ///
    /// let block = pool.rent(64);
    /// pool.recycle(block);
    ///
    /// // Same size again - this rent is a bucket hit.
    /// let _block = pool.rent(64);
    /// assert_eq!(pool.reuses(), 1);
    /// ```
    pub fn recycle(&self, mut block: Box<[T]>) {
        if block.is_empty() || block.len() > MAX_POOLED_BLOCK_CAPACITY {
            return;
        }

        if mem::needs_drop::<T>() {
            for slot in &mut block {
                *slot = T::default();
            }
        }

        let mut buckets = self
            .buckets
            .lock()
            .expect("bucket map mutex is never poisoned because no pool code panics while holding it");

        let bucket = buckets.entry(block.len()).or_default();

        if bucket.len() < MAX_BLOCKS_PER_BUCKET {
            bucket.push(block);
        }
    }
}

impl<T> Default for BucketPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BucketPool<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only, mutation is meaningless.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bucket_count = self
            .buckets
            .lock()
            .map(|buckets| buckets.len())
            .unwrap_or_default();

        f.debug_struct("BucketPool")
            .field("buckets", &bucket_count)
            .field("allocations", &self.allocations())
            .field("reuses", &self.reuses())
            .finish()
    }
}
