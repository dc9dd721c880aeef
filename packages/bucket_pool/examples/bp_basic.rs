//! Basic usage of the `bucket_pool` crate:
//!
//! * Renting blocks of exact sizes.
//! * Recycling them for reuse.
//! * Observing reuse through the pool counters.

use bucket_pool::BucketPool;

fn main() {
    let pool = BucketPool::<u64>::new();

    // The first rent of any size allocates a fresh block.
    let mut block = pool.rent(256);
    assert_eq!(block.len(), 256);

    for (index, slot) in block.iter_mut().enumerate() {
        *slot = index as u64;
    }

    // Handing the block back makes it available to the next renter of the same size.
    pool.recycle(block);

    let _reused = pool.rent(256);

    println!(
        "pool served {} fresh allocations and {} reuses",
        pool.allocations(),
        pool.reuses()
    );

    // The process-wide pool is shared by element type; every caller sees the same instance.
    let shared = BucketPool::<u64>::shared();
    let scratch = shared.rent(64);
    shared.recycle(scratch);
}
