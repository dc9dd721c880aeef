//! A growable buffer that rents its backing storage from a shared bucketed pool.
//!
//! This crate provides [`ExpandBuffer`], a container that behaves like a dynamically sized
//! array and stack but obtains and returns its backing block through
//! [`bucket_pool::BucketPool`] instead of allocating on its own. Hot paths that repeatedly
//! build up and tear down small, variable-length sequences - a tokenizer's indent stack, a
//! parser's scratch area - pay for allocation once per block size instead of once per buffer.
//!
//! # Key features
//!
//! - **Stack and random access**: `push`/`pop`/`peek`/`try_pop` alongside checked and
//!   panicking indexed access and slice views over the live elements.
//! - **Pool-backed growth**: when full, the buffer rents a larger block, migrates the live
//!   elements and recycles the outgrown block, all in one order-safe step.
//! - **Capacity ceiling**: growth is bounded by [`MAX_CAPACITY`]; requests past it fail fast
//!   with [`Error::CapacityExceeded`] and leave the buffer untouched.
//! - **Exactly-once return**: the backing block goes back to the pool exactly once, on drop or
//!   when replaced during growth, never both.
//!
//! # Reference invalidation
//!
//! References returned by the accessors point directly into the backing block, and growth
//! replaces that block. Every accessor therefore borrows the buffer, letting the borrow checker
//! reject any attempt to hold a reference across a mutating call:
//!
//! ```compile_fail
//! use expand_buffer::ExpandBuffer;
//!
//! let mut buffer = ExpandBuffer::<u32>::new(2)?;
//! buffer.push(1)?;
//!
//! let first = buffer.get(0)?;
//! buffer.push(2)?; // mutating call while `first` is still alive
//! println!("{first}");
//! # Ok::<(), expand_buffer::Error>(())
//! ```
//!
//! # Example
//!
//! ```rust
//! use expand_buffer::ExpandBuffer;
//!
//! let mut stack = ExpandBuffer::<u32>::new(4)?;
//!
//! stack.push(1)?;
//! stack.push(2)?;
//! stack.push(3)?;
//!
//! assert_eq!(*stack.peek()?, 3);
//! assert_eq!(stack.pop()?, 3);
//! assert_eq!(stack.as_slice(), &[1, 2]);
//!
//! stack.clear();
//! assert!(stack.is_empty());
//! # Ok::<(), expand_buffer::Error>(())
//! ```

mod buffer;
mod error;

pub use buffer::{ExpandBuffer, MAX_CAPACITY};
pub use error::Error;
pub(crate) use error::Result;
