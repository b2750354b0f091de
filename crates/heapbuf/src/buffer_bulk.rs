// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out all the bulk transfer methods for ease of maintenance.

use crate::cursor::check_from_index_size;
use crate::{Buffer, Element, Result};

impl<T: Element> Buffer<T> {
    /// Reads `len` elements from the position into `dst[off..off + len]` and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] if the range does not fit in
    /// `dst`, otherwise [`Error::BufferUnderflow`][crate::Error::BufferUnderflow] if fewer than
    /// `len` elements remain. Nothing is copied on error.
    pub fn get_into(&mut self, dst: &mut [T], off: usize, len: usize) -> Result<&mut Self> {
        check_from_index_size(off, len, dst.len())?;
        let position = self.cursor.ensure_readable(len)?;

        self.storage.read_into(self.ix(position), &mut dst[off..off + len]);
        self.cursor.advance(len);
        Ok(self)
    }

    /// Fills all of `dst` from the position and advances the position.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::wrap(vec![1, 2, 3, 4, 5]);
    /// let mut head = [0; 3];
    ///
    /// buf.get_slice(&mut head)?;
    ///
    /// assert_eq!(head, [1, 2, 3]);
    /// assert_eq!(buf.position(), 3);
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::BufferUnderflow`][crate::Error::BufferUnderflow] if fewer than `dst.len()`
    /// elements remain.
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<&mut Self> {
        let len = dst.len();
        self.get_into(dst, 0, len)
    }

    /// Reads `len` elements starting at `index` into `dst[off..off + len]`. The position does not
    /// move.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] if either range is out of
    /// bounds: `index..index + len` is checked against the limit.
    pub fn get_at_into(&self, index: usize, dst: &mut [T], off: usize, len: usize) -> Result<&Self> {
        self.cursor.check_range(index, len)?;
        check_from_index_size(off, len, dst.len())?;

        self.storage.read_into(self.ix(index), &mut dst[off..off + len]);
        Ok(self)
    }

    /// Writes `src[off..off + len]` at the position and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if the buffer is read-only,
    /// otherwise [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] if the range does not
    /// fit in `src`, otherwise [`Error::BufferOverflow`][crate::Error::BufferOverflow] if fewer
    /// than `len` elements of space remain. Nothing is copied on error.
    pub fn put_from(&mut self, src: &[T], off: usize, len: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        check_from_index_size(off, len, src.len())?;
        let position = self.cursor.ensure_writable(len)?;

        self.storage.write_from(self.ix(position), &src[off..off + len]);
        self.cursor.advance(len);
        Ok(self)
    }

    /// Writes all of `src` at the position and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if the buffer is read-only,
    /// otherwise [`Error::BufferOverflow`][crate::Error::BufferOverflow] if fewer than
    /// `src.len()` elements of space remain.
    pub fn put_slice(&mut self, src: &[T]) -> Result<&mut Self> {
        self.put_from(src, 0, src.len())
    }

    /// Writes `src[off..off + len]` starting at `index`. The position does not move.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if the buffer is read-only,
    /// otherwise [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] if either range is
    /// out of bounds.
    pub fn put_at_from(&mut self, index: usize, src: &[T], off: usize, len: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.cursor.check_range(index, len)?;
        check_from_index_size(off, len, src.len())?;

        self.storage.write_from(self.ix(index), &src[off..off + len]);
        Ok(self)
    }

    /// Transfers all remaining elements of `src` into this buffer at the position.
    ///
    /// Both positions advance by the number of elements transferred. The two buffers may share
    /// storage, even with overlapping windows: the result is as if the source elements had been
    /// copied to a temporary first.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::wrap(vec![1, 2, 3, 4, 5, 0]);
    /// let mut src = buf.slice_range(0, 5)?;
    /// buf.set_position(1)?;
    ///
    /// buf.put_buffer(&mut src)?;
    ///
    /// buf.clear();
    /// assert_eq!(buf.to_vec(), vec![1, 1, 2, 3, 4, 5]);
    /// assert!(!src.has_remaining());
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// A buffer cannot be transferred into itself:
    ///
    /// ```compile_fail
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::<u8>::allocate(4);
    /// buf.put_buffer(&mut buf);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if this buffer is read-only,
    /// otherwise [`Error::BufferOverflow`][crate::Error::BufferOverflow] if `src` has more
    /// remaining elements than this buffer has space. Neither buffer changes on error.
    pub fn put_buffer(&mut self, src: &mut Self) -> Result<&mut Self> {
        self.ensure_mutable()?;

        let len = src.remaining();
        let position = self.cursor.ensure_writable(len)?;

        self.storage
            .copy_from(self.ix(position), &src.storage, src.ix(src.position()), len);

        self.cursor.advance(len);
        src.cursor.advance(len);
        Ok(self)
    }

    /// Copies `len` elements of `src` starting at `src_index` into this buffer starting at
    /// `index`. Neither position moves.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if this buffer is read-only,
    /// otherwise [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] if either range
    /// exceeds the limit of its buffer.
    pub fn put_buffer_at(&mut self, index: usize, src: &Self, src_index: usize, len: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.cursor.check_range(index, len)?;
        src.cursor.check_range(src_index, len)?;

        self.storage.copy_from(self.ix(index), &src.storage, src.ix(src_index), len);
        Ok(self)
    }

    /// The index, relative to both positions, of the first remaining element that differs between
    /// the two buffers.
    ///
    /// If the remaining elements of one buffer are a proper prefix of the other's, the result is
    /// the length of the shorter one. Returns `None` if the buffers are equal.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let a = Buffer::wrap(vec![1, 2, 3]);
    ///
    /// assert_eq!(a.mismatch(&Buffer::wrap(vec![1, 9, 3])), Some(1));
    /// assert_eq!(a.mismatch(&Buffer::wrap(vec![1, 2])), Some(2));
    /// assert_eq!(a.mismatch(&a.duplicate()), None);
    /// ```
    #[must_use]
    pub fn mismatch(&self, other: &Self) -> Option<usize> {
        let common = self.remaining().min(other.remaining());

        self.iter()
            .zip(other.iter())
            .position(|(a, b)| !a.element_eq(b))
            .or_else(|| (self.remaining() != other.remaining()).then_some(common))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use crate::Error;

    use super::*;

    #[test]
    fn get_into_sub_range() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4]);
        let mut dst = [0; 5];

        buf.get_into(&mut dst, 1, 3).unwrap();

        assert_eq!(dst, [0, 1, 2, 3, 0]);
        assert_eq!(buf.position(), 3);
    }

    #[test]
    fn get_into_checks_array_before_remaining() {
        let mut buf = Buffer::<u8>::allocate(0);
        let mut dst = [0; 2];

        assert_eq!(
            buf.get_into(&mut dst, 1, 2).err(),
            Some(Error::IndexOutOfBounds { index: 1, len: 2, bound: 2 })
        );
        assert_eq!(
            buf.get_into(&mut dst, 0, 2).err(),
            Some(Error::BufferUnderflow { requested: 2, remaining: 0 })
        );
    }

    #[test]
    fn get_slice_underflow_copies_nothing() {
        let mut buf = Buffer::wrap(vec![1, 2]);
        let mut dst = [7; 3];

        assert!(buf.get_slice(&mut dst).is_err());

        assert_eq!(dst, [7, 7, 7]);
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn get_at_into_leaves_position() {
        let mut buf = Buffer::wrap(vec!['a', 'b', 'c', 'd']);
        buf.set_position(3).unwrap();
        let mut dst = ['-'; 2];

        buf.get_at_into(1, &mut dst, 0, 2).unwrap();

        assert_eq!(dst, ['b', 'c']);
        assert_eq!(buf.position(), 3);

        buf.set_limit(3).unwrap();
        assert_eq!(
            buf.get_at_into(2, &mut dst, 0, 2).err(),
            Some(Error::IndexOutOfBounds { index: 2, len: 2, bound: 3 })
        );
    }

    #[test]
    fn put_from_sub_range() {
        let mut buf = Buffer::<i16>::allocate(4);

        buf.put_from(&[5, 6, 7, 8], 1, 2).unwrap();

        assert_eq!(buf.position(), 2);
        buf.flip();
        assert_eq!(buf.to_vec(), vec![6, 7]);
    }

    #[test]
    fn put_from_error_order() {
        let buf = Buffer::<u8>::allocate(1);
        let mut read_only = buf.as_read_only();
        assert_eq!(read_only.put_from(&[1], 5, 5).err(), Some(Error::ReadOnlyBuffer));

        let mut buf = Buffer::<u8>::allocate(1);
        assert_eq!(
            buf.put_from(&[1], 1, 1).err(),
            Some(Error::IndexOutOfBounds { index: 1, len: 1, bound: 1 })
        );
        assert_eq!(
            buf.put_slice(&[1, 2]).err(),
            Some(Error::BufferOverflow { requested: 2, remaining: 1 })
        );
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.get_at(0).unwrap(), 0);
    }

    #[test]
    fn put_at_from_leaves_position() {
        let mut buf = Buffer::<u32>::allocate(5);
        buf.set_position(1).unwrap();

        buf.put_at_from(2, &[9, 8, 7], 0, 3).unwrap();

        assert_eq!(buf.position(), 1);
        buf.clear();
        assert_eq!(buf.to_vec(), vec![0, 0, 9, 8, 7]);

        assert!(buf.put_at_from(3, &[1, 2, 3], 0, 3).is_err());
    }

    #[test]
    fn put_buffer_advances_both() {
        let mut dst = Buffer::<u8>::allocate(6);
        let mut src = Buffer::wrap(vec![1, 2, 3, 4]);
        src.set_position(1).unwrap();

        dst.put_buffer(&mut src).unwrap();

        assert_eq!(dst.position(), 3);
        assert_eq!(src.position(), 4);
        dst.flip();
        assert_eq!(dst.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn put_buffer_overflow_changes_nothing() {
        let mut dst = Buffer::<u8>::allocate(2);
        let mut src = Buffer::wrap(vec![1, 2, 3]);

        assert_eq!(
            dst.put_buffer(&mut src).err(),
            Some(Error::BufferOverflow { requested: 3, remaining: 2 })
        );
        assert_eq!(dst.position(), 0);
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn put_buffer_into_read_only() {
        let mut dst = Buffer::<u8>::allocate(4).as_read_only();
        let mut src = Buffer::wrap(vec![1]);

        assert_eq!(dst.put_buffer(&mut src).err(), Some(Error::ReadOnlyBuffer));
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn put_buffer_from_overlapping_duplicate() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4, 5]);
        let mut src = buf.duplicate();
        src.set_limit(4).unwrap();
        src.set_position(1).unwrap();

        // Destination window [0, 3) overlaps source window [1, 4).
        buf.put_buffer(&mut src).unwrap();

        buf.clear();
        assert_eq!(buf.to_vec(), vec![2, 3, 4, 4, 5]);
    }

    #[test]
    fn put_buffer_at_absolute() {
        let mut dst = Buffer::<char>::allocate(4);
        let src = Buffer::wrap(vec!['w', 'x', 'y', 'z']);

        dst.put_buffer_at(1, &src, 2, 2).unwrap();

        assert_eq!(dst.position(), 0);
        assert_eq!(src.position(), 0);
        assert_eq!(dst.to_vec(), vec!['\0', 'y', 'z', '\0']);

        assert_eq!(
            dst.put_buffer_at(3, &src, 0, 2).err(),
            Some(Error::IndexOutOfBounds { index: 3, len: 2, bound: 4 })
        );
        assert_eq!(
            dst.put_buffer_at(0, &src, 3, 2).err(),
            Some(Error::IndexOutOfBounds { index: 3, len: 2, bound: 4 })
        );
    }

    #[test]
    fn mismatch_cases() {
        let mut a = Buffer::wrap(vec![0, 1, 2, 3]);
        a.set_position(1).unwrap();

        assert_eq!(a.mismatch(&Buffer::wrap(vec![1, 2, 3])), None);
        assert_eq!(a.mismatch(&Buffer::wrap(vec![1, 5, 3])), Some(1));
        assert_eq!(a.mismatch(&Buffer::wrap(vec![1, 2, 3, 4])), Some(3));
        assert_eq!(a.mismatch(&Buffer::wrap(vec![])), Some(0));
        assert_eq!(Buffer::<u8>::allocate(0).mismatch(&Buffer::allocate(0)), None);
    }
}
