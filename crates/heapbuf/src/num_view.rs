// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::codec::{decode, encode};
use crate::cursor::{Cursor, check_from_index_size};
use crate::{Buffer, ByteCodec, ByteOrder, Error, Result, Storage};

/// A view that reads and writes numbers of type `N` over byte storage.
///
/// Created by [`Buffer::as_num_view()`]. The view's cursor counts elements of `N`, not bytes:
/// element `i` of the view occupies the `N::WIDTH` bytes starting at byte `i * N::WIDTH` of its
/// window. Every element is decoded from and encoded into the shared byte storage on each access,
/// using the byte order the view was created with, so writes through the view are visible to
/// byte buffers over the same storage and vice versa.
///
/// ```
/// use heapbuf::{Buffer, ByteOrder};
///
/// let mut bytes = Buffer::<u8>::allocate(8);
/// bytes.set_order(ByteOrder::LittleEndian);
///
/// let mut words = bytes.as_num_view::<u32>();
/// words.put(1)?;
/// words.put(2)?;
///
/// assert_eq!(words.capacity(), 2);
/// assert_eq!(bytes.get_at(0)?, 1);
/// assert_eq!(bytes.get_at(4)?, 2);
/// # Ok::<(), heapbuf::Error>(())
/// ```
pub struct NumView<N: ByteCodec> {
    storage: Storage<u8>,

    /// Storage index of the first byte of element 0.
    offset: usize,

    cursor: Cursor,
    read_only: bool,
    order: ByteOrder,
    _element: PhantomData<N>,
}

impl Buffer<u8> {
    /// Creates a view that reads and writes numbers of type `N` over the remaining bytes.
    ///
    /// The view begins at the position of this buffer and covers as many whole `N` values as fit
    /// in [`remaining()`][Buffer::remaining]. Leftover bytes are not part of the view. The view
    /// inherits the read-only flag and byte order of this buffer. Its position is 0 and it has no
    /// mark. The storage is shared, not copied.
    #[must_use]
    pub fn as_num_view<N: ByteCodec>(&self) -> NumView<N> {
        NumView {
            storage: self.storage.clone(),
            offset: self.ix(self.position()),
            cursor: Cursor::new(self.remaining() / N::WIDTH),
            read_only: self.read_only,
            order: self.order,
            _element: PhantomData,
        }
    }
}

impl<N: ByteCodec> NumView<N> {
    /// The number of `N` values in this view's window.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// The index of the next value to be read or written.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Moves the position. A mark beyond the new position is discarded.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `position` is greater than the limit.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self> {
        self.cursor.set_position(position)?;
        Ok(self)
    }

    /// The index of the first value that must not be read or written.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Moves the limit, pulling back the position and discarding the mark as needed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `limit` is greater than the capacity.
    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self> {
        self.cursor.set_limit(limit)?;
        Ok(self)
    }

    /// Sets the mark at the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.cursor.mark();
        self
    }

    /// The current mark, if one is set.
    #[must_use]
    pub fn mark_value(&self) -> Option<usize> {
        self.cursor.mark_value()
    }

    /// Moves the position back to the mark.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMark`] if no mark is set.
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.cursor.reset()?;
        Ok(self)
    }

    /// Position 0, limit at capacity, no mark.
    pub fn clear(&mut self) -> &mut Self {
        self.cursor.clear();
        self
    }

    /// Limit at the position, position 0, no mark.
    pub fn flip(&mut self) -> &mut Self {
        self.cursor.flip();
        self
    }

    /// Position 0, no mark.
    pub fn rewind(&mut self) -> &mut Self {
        self.cursor.rewind();
        self
    }

    /// The number of values between position and limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Whether any values remain between position and limit.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    /// Whether this view rejects mutation.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The byte order used to encode and decode values. Fixed for the life of the view.
    #[must_use]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnlyBuffer);
        }

        Ok(())
    }

    /// Storage index of the first byte of the value at `index`.
    fn byte_ix(&self, index: usize) -> usize {
        self.offset + index * N::WIDTH
    }

    fn read(&self, index: usize) -> N {
        decode(&self.storage, self.byte_ix(index), self.order)
    }

    fn write(&self, index: usize, value: N) {
        encode(&self.storage, self.byte_ix(index), value, self.order);
    }

    /// Reads the value at the position and advances the position by one.
    ///
    /// # Errors
    ///
    /// [`Error::BufferUnderflow`] if no values remain.
    pub fn get(&mut self) -> Result<N> {
        let position = self.cursor.ensure_readable(1)?;
        let value = self.read(position);
        self.cursor.advance(1);
        Ok(value)
    }

    /// Writes a value at the position and advances the position by one.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the view is read-only, otherwise [`Error::BufferOverflow`]
    /// if no space remains.
    pub fn put(&mut self, value: N) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let position = self.cursor.ensure_writable(1)?;
        self.write(position, value);
        self.cursor.advance(1);
        Ok(self)
    }

    /// Reads the value at `index` without moving the position.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] unless `index < limit`.
    pub fn get_at(&self, index: usize) -> Result<N> {
        let index = self.cursor.check_index(index)?;
        Ok(self.read(index))
    }

    /// Writes a value at `index` without moving the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the view is read-only, otherwise
    /// [`Error::IndexOutOfBounds`] unless `index < limit`.
    pub fn put_at(&mut self, index: usize, value: N) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let index = self.cursor.check_index(index)?;
        self.write(index, value);
        Ok(self)
    }

    /// Fills all of `dst` from the position and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::BufferUnderflow`] if fewer than `dst.len()` values remain.
    pub fn get_slice(&mut self, dst: &mut [N]) -> Result<&mut Self> {
        let position = self.cursor.ensure_readable(dst.len())?;

        for (i, value) in dst.iter_mut().enumerate() {
            *value = self.read(position + i);
        }

        self.cursor.advance(dst.len());
        Ok(self)
    }

    /// Writes all of `src` at the position and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the view is read-only, otherwise [`Error::BufferOverflow`]
    /// if fewer than `src.len()` values of space remain.
    pub fn put_slice(&mut self, src: &[N]) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let position = self.cursor.ensure_writable(src.len())?;

        for (i, value) in src.iter().enumerate() {
            self.write(position + i, *value);
        }

        self.cursor.advance(src.len());
        Ok(self)
    }

    /// Reads `dst.len()` values starting at `index` into `dst`. The position does not move.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index..index + dst.len()` exceeds the limit.
    pub fn get_slice_at(&self, index: usize, dst: &mut [N]) -> Result<&Self> {
        self.cursor.check_range(index, dst.len())?;

        for (i, value) in dst.iter_mut().enumerate() {
            *value = self.read(index + i);
        }

        Ok(self)
    }

    /// Writes all of `src` starting at `index`. The position does not move.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the view is read-only, otherwise
    /// [`Error::IndexOutOfBounds`] if `index..index + src.len()` exceeds the limit.
    pub fn put_slice_at(&mut self, index: usize, src: &[N]) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.cursor.check_range(index, src.len())?;

        for (i, value) in src.iter().enumerate() {
            self.write(index + i, *value);
        }

        Ok(self)
    }

    /// Creates a view over the remaining values of this one, sharing storage.
    #[must_use]
    pub fn slice(&self) -> Self {
        self.window(self.position(), self.remaining())
    }

    /// Creates a view over `length` values of this one, starting at `index`, sharing storage.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index..index + length` exceeds the limit.
    pub fn slice_range(&self, index: usize, length: usize) -> Result<Self> {
        check_from_index_size(index, length, self.limit())?;
        Ok(self.window(index, length))
    }

    fn window(&self, index: usize, length: usize) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.byte_ix(index),
            cursor: Cursor::new(length),
            read_only: self.read_only,
            order: self.order,
            _element: PhantomData,
        }
    }

    /// Creates a view over the same window with a copy of this view's cursor and flags.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.offset,
            cursor: self.cursor,
            read_only: self.read_only,
            order: self.order,
            _element: PhantomData,
        }
    }

    /// Creates a read-only duplicate of this view.
    #[must_use]
    pub fn as_read_only(&self) -> Self {
        let mut duplicate = self.duplicate();
        duplicate.read_only = true;
        duplicate
    }

    /// Moves the remaining values to the start of the window, then sets the position to the
    /// number of values moved, the limit to the capacity and discards the mark.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the view is read-only.
    pub fn compact(&mut self) -> Result<&mut Self> {
        self.ensure_mutable()?;

        let remaining = self.remaining();
        self.storage
            .move_within(self.byte_ix(self.position()), self.byte_ix(0), remaining * N::WIDTH);
        self.cursor.compacted(remaining);
        Ok(self)
    }

    /// Decodes the remaining values into a new vector without moving the position.
    #[must_use]
    pub fn to_vec(&self) -> Vec<N> {
        (self.position()..self.limit()).map(|i| self.read(i)).collect()
    }
}

impl<N: ByteCodec> Clone for NumView<N> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

/// Two views are equal if their remaining values are equal, element by element.
impl<N: ByteCodec> PartialEq for NumView<N> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
            && (0..self.remaining()).all(|i| {
                self.read(self.position() + i)
                    .element_eq(other.read(other.position() + i))
            })
    }
}

impl<N: ByteCodec> Eq for NumView<N> {}

impl<N: ByteCodec> PartialOrd for NumView<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Views are ordered lexicographically by their remaining values, shorter first on a common
/// prefix.
impl<N: ByteCodec> Ord for NumView<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = self.remaining().min(other.remaining());

        for i in 0..common {
            let a = self.read(self.position() + i);
            let b = other.read(other.position() + i);

            match a.element_cmp(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        self.remaining().cmp(&other.remaining())
    }
}

/// Hashes the remaining values only, consistent with equality.
impl<N: ByteCodec> Hash for NumView<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.remaining());

        for i in self.position()..self.limit() {
            self.read(i).element_hash(state);
        }
    }
}

impl<N: ByteCodec> fmt::Debug for NumView<N> {
    #[cfg_attr(test, mutants::skip)] // There is no specific API contract here for us to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumView")
            .field("position", &self.position())
            .field("limit", &self.limit())
            .field("capacity", &self.capacity())
            .field("mark", &self.mark_value())
            .field("offset", &self.offset)
            .field("read_only", &self.read_only)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}
