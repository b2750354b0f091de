// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Fixed-capacity typed buffers with a cursor, for sequential and random access over shared
//! storage.
//!
//! A [`Buffer<T>`] is a view over a fixed-size block of elements. It pairs a window into some
//! storage with navigation state: a position, a limit and an optional mark. Sequential reads and
//! writes move the position, absolute reads and writes leave it alone.
//!
//! ```
//! use heapbuf::Buffer;
//!
//! let mut buf = Buffer::<char>::allocate(5);
//!
//! buf.put('a')?.put('b')?.put('c')?;
//! buf.flip();
//!
//! assert_eq!(buf.remaining(), 3);
//! assert_eq!(buf.get()?, 'a');
//!
//! let rest = buf.slice();
//! assert_eq!(rest.to_string(), "bc");
//! # Ok::<(), heapbuf::Error>(())
//! ```
//!
//! # Shared storage
//!
//! Several buffers may view the same storage. [`slice()`][Buffer::slice],
//! [`duplicate()`][Buffer::duplicate] and [`as_read_only()`][Buffer::as_read_only] never copy
//! elements: a write through any buffer is visible through every buffer whose window covers the
//! written element. Each buffer has its own cursor. The storage is released when the last buffer
//! referencing it is dropped.
//!
//! Buffers are neither `Send` nor `Sync`. Buffers that share storage stay on one thread.
//!
//! # Element types
//!
//! Any [`Element`] can be stored: the integer types up to 64 bits, `f32`, `f64` and `char`. The
//! [`ByteBuffer`], [`CharBuffer`], [`ShortBuffer`], [`IntBuffer`], [`LongBuffer`],
//! [`FloatBuffer`] and [`DoubleBuffer`] aliases name the common ones.
//!
//! Byte buffers additionally read and write multi-byte numbers in a configurable [`ByteOrder`]
//! via [`get_num()`][Buffer::get_num] and friends, and can be viewed as a sequence of numbers via
//! [`as_num_view()`][Buffer::as_num_view]:
//!
//! ```
//! use heapbuf::{Buffer, ByteOrder};
//!
//! let mut bytes = Buffer::<u8>::allocate(8);
//! bytes.put_num(0x0102_0304_u32)?;
//!
//! assert_eq!(bytes.get_at(0)?, 0x01);
//!
//! bytes.set_order(ByteOrder::LittleEndian);
//! bytes.put_num(0x0102_0304_u32)?;
//!
//! assert_eq!(bytes.get_at(4)?, 0x04);
//! # Ok::<(), heapbuf::Error>(())
//! ```
//!
//! Character buffers work as text: they implement [`Display`][std::fmt::Display] and
//! [`fmt::Write`][std::fmt::Write] and offer [`sub_sequence()`][Buffer::sub_sequence].
//!
//! # Errors
//!
//! Every operation that can fail returns [`Result`]. Arguments are validated in full before
//! anything is modified, so a failed operation leaves every cursor and every element as it was.
//!
//! # Compatibility with the `bytes` crate
//!
//! With the `bytes-compat` feature, byte buffers convert to and from `bytes::Bytes`.

mod buffer;
mod buffer_bulk;
mod byte_order;
#[cfg(any(test, feature = "bytes-compat"))]
mod bytes_compat;
mod codec;
mod cursor;
mod element;
mod error;
mod num_view;
mod storage;
mod text;

pub use buffer::{Buffer, Iter};
pub use byte_order::ByteOrder;
pub use codec::ByteCodec;
pub use element::Element;
pub use error::{Error, Result};
pub use num_view::NumView;
pub(crate) use storage::Storage;

/// A buffer of bytes.
pub type ByteBuffer = Buffer<u8>;

/// A buffer of characters.
pub type CharBuffer = Buffer<char>;

/// A buffer of 16-bit integers.
pub type ShortBuffer = Buffer<i16>;

/// A buffer of 32-bit integers.
pub type IntBuffer = Buffer<i32>;

/// A buffer of 64-bit integers.
pub type LongBuffer = Buffer<i64>;

/// A buffer of 32-bit floating point numbers.
pub type FloatBuffer = Buffer<f32>;

/// A buffer of 64-bit floating point numbers.
pub type DoubleBuffer = Buffer<f64>;
