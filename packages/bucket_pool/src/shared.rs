use std::any::{Any, TypeId};
use std::sync::{Mutex, OnceLock};

use foldhash::{HashMap, HashMapExt};

use crate::BucketPool;

/// One pool per element type, created lazily on first use and leaked so it can serve the whole
/// process lifetime. The map only ever grows, by one entry per distinct element type.
static SHARED_POOLS: OnceLock<Mutex<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
    OnceLock::new();

impl<T> BucketPool<T>
where
    T: Default + Send + 'static,
{
    /// The process-wide shared pool for element type `T`.
    ///
    /// Every call with the same element type returns the same pool instance, so independent
    /// renters across the process share one set of buckets. The pool lives for the remainder of
    /// the process lifetime.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bucket_pool::BucketPool;
    ///
    /// let a = BucketPool::<u64>::shared();
    /// let b = BucketPool::<u64>::shared();
    ///
    /// assert!(std::ptr::eq(a, b));
    /// ```
    #[must_use]
    pub fn shared() -> &'static Self {
        let mut pools = SHARED_POOLS
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .expect("shared pool registry mutex is never poisoned because registration does not panic");

        let erased: &'static (dyn Any + Send + Sync) =
            *pools.entry(TypeId::of::<T>()).or_insert_with(|| {
                let pool: &'static (dyn Any + Send + Sync) = Box::leak(Box::new(Self::new()));
                pool
            });

        erased
            .downcast_ref::<Self>()
            .expect("registry entries are keyed by element type, so the stored pool always matches")
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;

    #[test]
    fn same_element_type_is_same_pool() {
        let a = BucketPool::<u64>::shared();
        let b = BucketPool::<u64>::shared();

        assert!(ptr::eq(a, b));
    }

    #[test]
    fn distinct_element_types_have_distinct_pools() {
        let ints = BucketPool::<u64>::shared();
        let strings = BucketPool::<String>::shared();

        assert!(!ptr::eq(ptr::from_ref(ints).cast::<()>(), ptr::from_ref(strings).cast()));
    }

    #[test]
    fn shared_pool_is_usable_from_many_threads() {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    let pool = BucketPool::<u128>::shared();
                    let block = pool.rent(16);
                    pool.recycle(block);
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("shared pool worker threads do not panic");
        }
    }
}
