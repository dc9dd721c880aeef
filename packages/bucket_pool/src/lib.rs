//! A thread-safe pool of reusable storage blocks, bucketed by block capacity.
//!
//! This crate provides [`BucketPool`], a pool that lends out contiguous blocks of elements
//! (`Box<[T]>`) and reclaims them for reuse. It exists to amortize allocation cost across many
//! short-lived containers: a caller that repeatedly needs scratch storage of similar sizes rents
//! from the pool instead of hitting the general allocator on every use.
//!
//! # Key features
//!
//! - **Exact-size buckets**: a rented block has exactly the requested capacity, so callers can
//!   do deterministic capacity arithmetic on top of the pool.
//! - **Thread-safe**: many renters may call [`rent()`](BucketPool::rent) and
//!   [`recycle()`](BucketPool::recycle) concurrently on the same pool.
//! - **Process-wide sharing**: [`BucketPool::shared()`] returns one pool per element type for
//!   the whole process.
//! - **Safe element storage**: blocks are always fully initialized (`T: Default`), so renters
//!   can hand out plain `&T` / `&mut T` references into them without any `unsafe` code.
//! - **Stale value hygiene**: when `T` owns resources, recycled blocks are wiped back to
//!   default values before reuse, so a later renter can never observe a previous renter's data.
//!
//! # Example
//!
//! ```rust
//! use bucket_pool::BucketPool;
//!
//! let pool = BucketPool::<u64>::new();
//!
//! let block = pool.rent(128);
//! assert_eq!(block.len(), 128);
//!
//! // Hand the block back; the next rent of the same size reuses it.
//! pool.recycle(block);
//!
//! let again = pool.rent(128);
//! assert_eq!(again.len(), 128);
//! assert_eq!(pool.reuses(), 1);
//! ```

mod pool;
mod shared;

pub use pool::BucketPool;
