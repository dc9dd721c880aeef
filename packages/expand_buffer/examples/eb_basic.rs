//! Basic usage of the `expand_buffer` crate:
//!
//! * Creating a pool-backed buffer.
//! * Stack operations.
//! * Transparent growth.
//! * Filling reserved room in bulk.

use expand_buffer::{Error, ExpandBuffer};

fn main() -> Result<(), Error> {
    // A small initial capacity; the backing block is rented from the shared pool.
    let mut depths = ExpandBuffer::<u32>::new(2)?;

    // Something like a tokenizer tracking nesting depths.
    for depth in [0, 2, 4, 6, 8] {
        depths.push(depth)?;
    }

    println!(
        "tracking {} depths in a block of capacity {}",
        depths.len(),
        depths.capacity()
    );

    // Leaving a nesting level pops the stack.
    while let Some(depth) = depths.try_pop() {
        println!("closing scope at depth {depth}");
    }

    // Bulk fill: reserve room first, write into the view, then record the length.
    let mut line = ExpandBuffer::<u8>::new(0)?;
    let room = line.make_room(11)?;
    room.copy_from_slice(b"hello world");
    line.set_len(11);

    println!("line holds {:?}", std::str::from_utf8(line.as_slice()));

    // Dropping the buffers hands their blocks back to the pool; the next buffers of the same
    // sizes will reuse them instead of allocating.
    Ok(())
}
