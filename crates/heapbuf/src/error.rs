// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// A contract violation reported by a buffer operation.
///
/// Every fallible buffer operation validates its arguments in full before it touches the cursor
/// or the storage. When an error is returned, no cursor has moved and no element was copied.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The range `index..index + len` does not fit within `0..bound`.
    ///
    /// Single-element access reports `len == 1`, cursor repositioning reports `len == 0`.
    #[error("range of {len} elements starting at {index} is out of bounds for length {bound}")]
    IndexOutOfBounds {
        /// First index of the rejected range.
        index: usize,
        /// Number of elements in the rejected range.
        len: usize,
        /// Exclusive upper bound the range was checked against.
        bound: usize,
    },

    /// A read asked for more elements than remain between position and limit.
    #[error("buffer underflow: {requested} elements requested, {remaining} remaining")]
    BufferUnderflow {
        /// Number of elements the read needed.
        requested: usize,
        /// Number of elements that were available.
        remaining: usize,
    },

    /// A write asked for more space than remains between position and limit.
    #[error("buffer overflow: {requested} elements requested, {remaining} remaining")]
    BufferOverflow {
        /// Number of elements the write needed.
        requested: usize,
        /// Number of elements that were available.
        remaining: usize,
    },

    /// A mutating operation was attempted through a read-only view.
    #[error("buffer is read-only")]
    ReadOnlyBuffer,

    /// `reset()` was called while no mark was set.
    #[error("mark is not set")]
    InvalidMark,
}

/// A specialized `Result` for buffer operations.
pub type Result<T> = std::result::Result<T, Error>;
