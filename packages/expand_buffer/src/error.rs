use thiserror::Error;

/// Errors that can occur when operating on an [`ExpandBuffer`][crate::ExpandBuffer].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested or grown capacity would exceed the buffer's fixed ceiling.
    ///
    /// Raised at construction and during growth. Not recoverable by retrying the same
    /// operation - the caller must abandon the workload or split it into smaller pieces.
    #[error("requested capacity {requested} exceeds the maximum of {maximum}")]
    CapacityExceeded {
        /// The capacity that was asked for.
        requested: usize,

        /// The fixed ceiling the buffer may never grow past.
        maximum: usize,
    },

    /// A pop or peek was attempted on an empty buffer.
    ///
    /// Recoverable caller logic error; check [`len()`][crate::ExpandBuffer::len] first or use
    /// the non-failing [`try_pop()`][crate::ExpandBuffer::try_pop].
    #[error("cannot pop or peek an empty buffer")]
    Underflow,

    /// A checked index access referenced a position outside the live range.
    #[error("index {index} is out of range for a buffer of length {length}")]
    IndexOutOfRange {
        /// The index that was asked for.
        index: usize,

        /// The logical length of the buffer at the time of the access.
        length: usize,
    },
}

/// A specialized `Result` type for buffer operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn errors_render_their_context() {
        let error = Error::CapacityExceeded {
            requested: 100,
            maximum: 10,
        };
        assert!(error.to_string().contains("100"));
        assert!(error.to_string().contains("10"));

        let error = Error::IndexOutOfRange {
            index: 7,
            length: 3,
        };
        assert!(error.to_string().contains('7'));
        assert!(error.to_string().contains('3'));
    }
}
