// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;

use nm::{Event, Magnitude};
use tracing::{Level, event};

use crate::cursor::{Cursor, check_from_index_size};
use crate::{ByteOrder, Element, Error, Result, Storage};

/// A view over a fixed-size block of typed elements with its own cursor.
///
/// A buffer is a window of `capacity` elements into some storage, plus the navigation state for
/// reading and writing that window sequentially:
///
/// * `position` - the index of the next element to be read or written.
/// * `limit` - the index of the first element that must not be read or written.
/// * `mark` - an optional saved position to return to via [`reset()`][Self::reset].
///
/// At all times, `mark <= position <= limit <= capacity`.
///
/// The typical life of a buffer alternates between filling it and draining it:
///
/// ```
/// use heapbuf::Buffer;
///
/// let mut buf = Buffer::<u8>::allocate(8);
///
/// buf.put(1)?;
/// buf.put(2)?;
/// buf.put(3)?;
///
/// // Switch from writing to reading the elements just written.
/// buf.flip();
///
/// assert_eq!(buf.remaining(), 3);
/// assert_eq!(buf.get()?, 1);
/// assert_eq!(buf.get()?, 2);
/// assert_eq!(buf.get()?, 3);
/// assert!(!buf.has_remaining());
/// # Ok::<(), heapbuf::Error>(())
/// ```
///
/// # Views, not snapshots
///
/// [`slice()`][Self::slice], [`duplicate()`][Self::duplicate] and
/// [`as_read_only()`][Self::as_read_only] create new buffers over the same storage without copying.
/// A write through any of them is visible through every other buffer whose window covers the same
/// element. The navigation state is never shared: moving the position of one buffer has no effect
/// on any other buffer.
///
/// ```
/// use heapbuf::Buffer;
///
/// let mut original = Buffer::wrap(vec![10, 20, 30, 40]);
/// original.set_position(1)?;
///
/// let mut tail = original.slice();
/// tail.put_at(0, 99)?;
///
/// assert_eq!(original.get_at(1)?, 99);
/// assert_eq!(original.position(), 1);
/// # Ok::<(), heapbuf::Error>(())
/// ```
///
/// # Thread safety
///
/// Buffers that share storage may be mutated through any of them without synchronization, so
/// buffers are neither `Send` nor `Sync`. They stay on the thread that created their storage.
pub struct Buffer<T: Element> {
    pub(crate) storage: Storage<T>,

    /// Index of the first element of this buffer's window within the storage.
    pub(crate) offset: usize,

    pub(crate) cursor: Cursor,
    pub(crate) read_only: bool,
    pub(crate) order: ByteOrder,
}

impl<T: Element> Buffer<T> {
    /// Creates a buffer over freshly allocated storage of `capacity` default-valued elements.
    ///
    /// The buffer is writable, its position is 0 and its limit is its capacity.
    #[must_use]
    pub fn allocate(capacity: usize) -> Self {
        Self::over(Storage::allocate(capacity), 0, Cursor::new(capacity))
    }

    /// Creates a buffer that takes over `values` as its storage, without copying.
    ///
    /// The window covers the entire vector: position 0, limit and capacity equal to its length.
    #[must_use]
    pub fn wrap(values: Vec<T>) -> Self {
        let len = values.len();
        Self::over(Storage::adopt(values), 0, Cursor::new(len))
    }

    /// Creates a buffer over the `offset..offset + length` window of `values`, without copying.
    ///
    /// The window becomes the entire buffer: its capacity is `length`, its position 0 and its
    /// limit `length`. The elements outside the window stay in the storage. No buffer can reach
    /// them, but [`try_into_vec()`][Self::try_into_vec] returns them with the rest of the vector.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::wrap_range(vec!['x', 'y', 'z', 'w'], 1, 2)?;
    ///
    /// assert_eq!(buf.capacity(), 2);
    /// assert_eq!(buf.get()?, 'y');
    /// assert_eq!(buf.get()?, 'z');
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if the window does not fit in `values`.
    pub fn wrap_range(values: Vec<T>, offset: usize, length: usize) -> Result<Self> {
        check_from_index_size(offset, length, values.len())?;

        Ok(Self::over(Storage::adopt(values), offset, Cursor::new(length)))
    }

    /// Creates a buffer over all of `values` positioned at `offset` and limited to
    /// `offset + length`, without copying.
    ///
    /// Unlike [`wrap_range()`][Self::wrap_range], the capacity is the length of the vector, so
    /// [`clear()`][Self::clear] or [`rewind()`][Self::rewind] reach the elements before `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if the window does not fit in `values`.
    pub fn wrap_positioned(values: Vec<T>, offset: usize, length: usize) -> Result<Self> {
        check_from_index_size(offset, length, values.len())?;

        let capacity = values.len();
        let cursor = Cursor::with_bounds(offset, offset + length, capacity)?;

        Ok(Self::over(Storage::adopt(values), 0, cursor))
    }

    /// Creates a buffer over new storage holding a copy of `values`.
    #[must_use]
    pub fn copied_from_slice(values: &[T]) -> Self {
        Self::wrap(values.to_vec())
    }

    fn over(storage: Storage<T>, offset: usize, cursor: Cursor) -> Self {
        debug_assert!(offset + cursor.capacity() <= storage.len());

        Self {
            storage,
            offset,
            cursor,
            read_only: false,
            order: ByteOrder::default(),
        }
    }

    /// The number of elements in this buffer's window. Never changes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// The index of the next element to be read or written.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Moves the position. If the mark is beyond the new position, the mark is discarded.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `position` is greater than the limit.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self> {
        self.cursor.set_position(position)?;
        Ok(self)
    }

    /// The index of the first element that must not be read or written.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Moves the limit.
    ///
    /// A position beyond the new limit is pulled back to it and a mark beyond the new limit is
    /// discarded.
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

    /// Moves the position back to the mark. The mark stays set.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMark`] if no mark is set.
    pub fn reset(&mut self) -> Result<&mut Self> {
        self.cursor.reset()?;
        Ok(self)
    }

    /// Prepares the buffer for filling: position 0, limit at capacity, no mark.
    ///
    /// The elements themselves are left untouched.
    pub fn clear(&mut self) -> &mut Self {
        self.cursor.clear();
        self
    }

    /// Prepares a just-filled buffer for draining: the limit moves to the position, the position
    /// to 0 and the mark is discarded.
    pub fn flip(&mut self) -> &mut Self {
        self.cursor.flip();
        self
    }

    /// Prepares the buffer for reading its contents again: position 0, no mark, limit unchanged.
    pub fn rewind(&mut self) -> &mut Self {
        self.cursor.rewind();
        self
    }

    /// The number of elements between position and limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Whether any elements remain between position and limit.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    /// Whether this buffer rejects mutation.
    ///
    /// Read-only-ness belongs to the buffer, not to the storage: another buffer over the same
    /// storage may still be writable.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The index in the storage at which this buffer's window begins.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn ensure_mutable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnlyBuffer);
        }

        Ok(())
    }

    /// Storage index for an index relative to this buffer's window.
    pub(crate) fn ix(&self, index: usize) -> usize {
        self.offset + index
    }

    /// Reads the element at the position and advances the position by one.
    ///
    /// # Errors
    ///
    /// [`Error::BufferUnderflow`] if no elements remain.
    pub fn get(&mut self) -> Result<T> {
        let position = self.cursor.ensure_readable(1)?;
        let value = self.storage.get(self.ix(position));
        self.cursor.advance(1);
        Ok(value)
    }

    /// Writes an element at the position and advances the position by one.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the buffer is read-only, otherwise
    /// [`Error::BufferOverflow`] if no space remains.
    pub fn put(&mut self, value: T) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let position = self.cursor.ensure_writable(1)?;
        self.storage.set(self.ix(position), value);
        self.cursor.advance(1);
        Ok(self)
    }

    /// Reads the element at `index` without moving the position.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] unless `index < limit`.
    pub fn get_at(&self, index: usize) -> Result<T> {
        let index = self.cursor.check_index(index)?;
        Ok(self.storage.get(self.ix(index)))
    }

    /// Writes an element at `index` without moving the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the buffer is read-only, otherwise
    /// [`Error::IndexOutOfBounds`] unless `index < limit`.
    pub fn put_at(&mut self, index: usize, value: T) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let index = self.cursor.check_index(index)?;
        self.storage.set(self.ix(index), value);
        Ok(self)
    }

    /// Creates a buffer over the remaining elements of this one.
    ///
    /// The new buffer starts at this buffer's position and has a capacity and limit equal to
    /// [`remaining()`][Self::remaining]. Its position is 0, it has no mark and it inherits the
    /// read-only flag and byte order. The storage is shared, not copied.
    #[must_use]
    pub fn slice(&self) -> Self {
        self.window(self.position(), self.remaining())
    }

    /// Creates a buffer over `length` elements of this one, starting at `index`.
    ///
    /// Apart from the window, this is the same as [`slice()`][Self::slice]: the position of this
    /// buffer plays no role.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] if `index..index + length` exceeds the limit.
    pub fn slice_range(&self, index: usize, length: usize) -> Result<Self> {
        self.cursor.check_range(index, length)?;
        Ok(self.window(index, length))
    }

    fn window(&self, index: usize, length: usize) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.ix(index),
            cursor: Cursor::new(length),
            read_only: self.read_only,
            order: self.order,
        }
    }

    /// Creates a buffer over the same window of the same storage, with a copy of this buffer's
    /// position, limit, mark, read-only flag and byte order.
    ///
    /// This is what [`Clone`] does as well.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            offset: self.offset,
            cursor: self.cursor,
            read_only: self.read_only,
            order: self.order,
        }
    }

    /// Creates a read-only duplicate of this buffer.
    ///
    /// This buffer itself keeps its read-only flag.
    ///
    /// ```
    /// use heapbuf::{Buffer, Error};
    ///
    /// let mut buf = Buffer::<u8>::allocate(4);
    /// let mut view = buf.as_read_only();
    ///
    /// assert_eq!(view.put(1).err(), Some(Error::ReadOnlyBuffer));
    ///
    /// buf.put(1)?;
    /// assert_eq!(view.get()?, 1);
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    #[must_use]
    pub fn as_read_only(&self) -> Self {
        let mut duplicate = self.duplicate();
        duplicate.read_only = true;
        duplicate
    }

    /// Moves the remaining elements to the start of the window and prepares the buffer for
    /// writing after them.
    ///
    /// Afterwards the position is the old [`remaining()`][Self::remaining], the limit is the
    /// capacity and the mark is discarded. This is typically called after a partial drain, to keep
    /// the elements that were not consumed yet:
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::wrap(vec![1, 2, 3, 4, 5]);
    /// buf.set_position(2)?;
    ///
    /// buf.compact()?;
    ///
    /// assert_eq!(buf.position(), 3);
    /// assert_eq!(buf.limit(), 5);
    /// assert_eq!(&buf.to_vec()[..], &[4, 5]);
    ///
    /// buf.flip();
    /// assert_eq!(&buf.to_vec()[..], &[3, 4, 5]);
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the buffer is read-only.
    pub fn compact(&mut self) -> Result<&mut Self> {
        self.ensure_mutable()?;

        let remaining = self.remaining();
        self.storage.move_within(self.ix(self.position()), self.ix(0), remaining);
        self.cursor.compacted(remaining);

        COMPACTED_LEN.with(|e| e.observe(remaining));
        event!(Level::TRACE, remaining, capacity = self.capacity(), "compacted buffer");

        Ok(self)
    }

    /// Iterates over the remaining elements without moving the position.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: self.position(),
            back: self.limit(),
        }
    }

    /// Copies the remaining elements into a new vector without moving the position.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Returns the entire storage if this is the only buffer referencing it.
    ///
    /// This gives back the vector a buffer was created from via [`wrap()`][Self::wrap], including
    /// any elements outside this buffer's window.
    ///
    /// # Errors
    ///
    /// Returns the buffer unchanged if another buffer shares its storage.
    pub fn try_into_vec(self) -> std::result::Result<Vec<T>, Self> {
        let Self {
            storage,
            offset,
            cursor,
            read_only,
            order,
        } = self;

        storage.try_into_vec().map_err(|storage| Self {
            storage,
            offset,
            cursor,
            read_only,
            order,
        })
    }

    /// Whether this buffer and `other` share storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.same_storage(&other.storage)
    }
}

impl<T: Element> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<T: Element> From<Vec<T>> for Buffer<T> {
    fn from(values: Vec<T>) -> Self {
        Self::wrap(values)
    }
}

/// Two buffers are equal if their remaining elements are equal, element by element.
///
/// Capacity, position and everything outside the remaining elements are ignored.
impl<T: Element> PartialEq for Buffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining() && self.iter().zip(other.iter()).all(|(a, b)| a.element_eq(b))
    }
}

impl<T: Element> Eq for Buffer<T> {}

impl<T: Element> PartialEq<[T]> for Buffer<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.remaining() == other.len() && self.iter().zip(other).all(|(a, b)| a.element_eq(*b))
    }
}

impl<T: Element> PartialEq<&[T]> for Buffer<T> {
    fn eq(&self, other: &&[T]) -> bool {
        *self == **other
    }
}

impl<T: Element> PartialOrd for Buffer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Buffers are ordered lexicographically by their remaining elements.
///
/// If one buffer's remaining elements are a prefix of the other's, the shorter one sorts first.
impl<T: Element> Ord for Buffer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.element_cmp(b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        self.remaining().cmp(&other.remaining())
    }
}

/// Hashes the remaining elements only, consistent with equality.
impl<T: Element> Hash for Buffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.remaining());

        for element in self {
            element.element_hash(state);
        }
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    #[cfg_attr(test, mutants::skip)] // There is no specific API contract here for us to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("position", &self.position())
            .field("limit", &self.limit())
            .field("capacity", &self.capacity())
            .field("mark", &self.mark_value())
            .field("offset", &self.offset)
            .field("read_only", &self.read_only)
            .field("storage", &self.storage)
            .finish()
    }
}

impl<'a, T: Element> IntoIterator for &'a Buffer<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the remaining elements of a [`Buffer`], returned by [`Buffer::iter()`].
#[derive(Debug)]
pub struct Iter<'a, T: Element> {
    buffer: &'a Buffer<T>,
    front: usize,
    back: usize,
}

impl<T: Element> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let value = self.buffer.storage.get(self.buffer.ix(self.front));
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T: Element> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;
        Some(self.buffer.storage.get(self.buffer.ix(self.back)))
    }
}

impl<T: Element> ExactSizeIterator for Iter<'_, T> {}

impl<T: Element> FusedIterator for Iter<'_, T> {}

const COMPACTED_LEN_BUCKETS: &[Magnitude] = &[0, 1, 16, 256, 4096, 65_536];

thread_local! {
    static COMPACTED_LEN: Event = Event::builder()
        .name("heapbuf_compacted_len")
        .histogram(COMPACTED_LEN_BUCKETS)
        .build();
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
    #![allow(clippy::indexing_slicing, reason = "This is all fine in test code")]

    use std::collections::hash_map::DefaultHasher;

    use static_assertions::assert_not_impl_any;

    use super::*;

    assert_not_impl_any!(Buffer<u8>: Send, Sync);
    assert_not_impl_any!(Buffer<char>: Send, Sync);

    fn assert_invariant<T: Element>(buf: &Buffer<T>) {
        assert!(buf.mark_value().unwrap_or(0) <= buf.position());
        assert!(buf.position() <= buf.limit());
        assert!(buf.limit() <= buf.capacity());
        assert!(buf.offset() + buf.capacity() <= buf.storage.len());
    }

    fn hash_of<T: Element>(buf: &Buffer<T>) -> u64 {
        let mut hasher = DefaultHasher::new();
        buf.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn allocate_initial_state() {
        let buf = Buffer::<i64>::allocate(5);

        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 5);
        assert_eq!(buf.mark_value(), None);
        assert_eq!(buf.offset(), 0);
        assert!(!buf.is_read_only());
        assert_eq!(buf.to_vec(), vec![0; 5]);
    }

    #[test]
    fn allocate_zero_capacity() {
        let mut buf = Buffer::<u8>::allocate(0);

        assert!(!buf.has_remaining());
        assert_eq!(buf.get(), Err(Error::BufferUnderflow { requested: 1, remaining: 0 }));
        assert!(buf.compact().is_ok());
        assert_invariant(&buf);
    }

    #[test]
    fn fill_then_drain() {
        let mut buf = Buffer::<char>::allocate(5);

        buf.clear();
        buf.put('a').unwrap().put('b').unwrap().put('c').unwrap();
        buf.flip();

        assert_eq!(buf.remaining(), 3);
        assert_eq!(buf.get().unwrap(), 'a');
        assert_eq!(buf.get().unwrap(), 'b');
        assert_eq!(buf.get().unwrap(), 'c');
        assert_eq!(buf.remaining(), 0);
        assert_invariant(&buf);
    }

    #[test]
    fn put_past_limit_is_overflow() {
        let mut buf = Buffer::<u8>::allocate(2);
        buf.put(1).unwrap();
        buf.put(2).unwrap();

        assert_eq!(buf.put(3).err(), Some(Error::BufferOverflow { requested: 1, remaining: 0 }));
        assert_eq!(buf.position(), 2);
    }

    #[test]
    fn read_only_checked_before_overflow() {
        let buf = Buffer::<u8>::allocate(0);
        let mut view = buf.as_read_only();

        assert_eq!(view.put(1).err(), Some(Error::ReadOnlyBuffer));
        assert_eq!(view.put_at(0, 1).err(), Some(Error::ReadOnlyBuffer));
        assert_eq!(view.compact().err(), Some(Error::ReadOnlyBuffer));
    }

    #[test]
    fn absolute_access_bounded_by_limit() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4]);
        buf.set_limit(2).unwrap();

        assert_eq!(buf.get_at(1), Ok(2));
        assert_eq!(buf.get_at(2), Err(Error::IndexOutOfBounds { index: 2, len: 1, bound: 2 }));
        assert_eq!(
            buf.put_at(3, 9).err(),
            Some(Error::IndexOutOfBounds { index: 3, len: 1, bound: 2 })
        );

        buf.put_at(0, 10).unwrap();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.get().unwrap(), 10);
    }

    #[test]
    fn wrap_shares_contents() {
        let mut buf = Buffer::wrap(vec![5_u16, 6, 7]);

        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.get().unwrap(), 5);

        buf.put_at(2, 70).unwrap();
        assert_eq!(buf.try_into_vec().unwrap(), vec![5, 6, 70]);
    }

    #[test]
    fn wrap_range_window() {
        let mut buf = Buffer::wrap_range(vec!['x', 'y', 'z', 'w'], 1, 2).unwrap();

        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 2);
        assert_eq!(buf.offset(), 1);
        assert_eq!(buf.get().unwrap(), 'y');
        assert_eq!(buf.get().unwrap(), 'z');
        assert!(buf.get().is_err());

        assert_eq!(
            Buffer::wrap_range(vec![1, 2, 3], 2, 2).err(),
            Some(Error::IndexOutOfBounds { index: 2, len: 2, bound: 3 })
        );
    }

    #[test]
    fn wrap_positioned_keeps_full_capacity() {
        let mut buf = Buffer::wrap_positioned(vec!['x', 'y', 'z', 'w'], 1, 2).unwrap();

        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.position(), 1);
        assert_eq!(buf.limit(), 3);
        assert_eq!(buf.to_vec(), vec!['y', 'z']);

        buf.clear();
        assert_eq!(buf.get().unwrap(), 'x');

        assert!(Buffer::wrap_positioned(vec![1, 2, 3], 3, 1).is_err());
    }

    #[test]
    fn mark_and_reset() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4]);
        assert_eq!(buf.reset().err(), Some(Error::InvalidMark));

        buf.get().unwrap();
        buf.mark();
        buf.get().unwrap();
        buf.get().unwrap();
        buf.reset().unwrap();

        assert_eq!(buf.position(), 1);
        assert_eq!(buf.get().unwrap(), 2);

        buf.rewind();
        assert_eq!(buf.mark_value(), None);
        assert_invariant(&buf);
    }

    #[test]
    fn slice_covers_remaining() {
        let mut buf = Buffer::<char>::allocate(5);
        buf.put('a').unwrap().put('b').unwrap().put('c').unwrap();
        buf.flip();
        assert_eq!(buf.get().unwrap(), 'a');

        let mut slice = buf.slice();

        assert_eq!(slice.capacity(), 2);
        assert_eq!(slice.remaining(), 2);
        assert_eq!(slice.position(), 0);
        assert_eq!(slice.mark_value(), None);
        assert_eq!(slice.get().unwrap(), 'b');
        assert_eq!(slice.get().unwrap(), 'c');
        assert_invariant(&slice);

        // The source cursor did not move.
        assert_eq!(buf.position(), 1);
    }

    #[test]
    fn slice_inherits_flags() {
        let mut buf = Buffer::<u8>::allocate(4);
        buf.order = ByteOrder::LittleEndian;

        let view = buf.as_read_only();
        let slice = view.slice();

        assert!(slice.is_read_only());
        assert_eq!(slice.order, ByteOrder::LittleEndian);
    }

    #[test]
    fn slice_of_slice_offsets_accumulate() {
        let mut buf = Buffer::wrap((0..10).collect::<Vec<u32>>());
        buf.set_position(2).unwrap();

        let mut first = buf.slice();
        first.set_position(3).unwrap();
        let mut second = first.slice();

        assert_eq!(second.offset(), 5);
        assert_eq!(second.capacity(), 5);
        assert_eq!(second.get().unwrap(), 5);

        second.put_at(4, 99).unwrap();
        assert_eq!(buf.get_at(9).unwrap(), 99);
    }

    #[test]
    fn slice_range_validated_against_limit() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4, 5]);
        buf.set_limit(4).unwrap();

        let slice = buf.slice_range(1, 3).unwrap();
        assert_eq!(slice.to_vec(), vec![2, 3, 4]);

        assert_eq!(
            buf.slice_range(2, 3).err(),
            Some(Error::IndexOutOfBounds { index: 2, len: 3, bound: 4 })
        );
    }

    #[test]
    fn duplicate_has_independent_cursor() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4]);
        buf.set_position(1).unwrap();
        buf.mark();

        let mut dup = buf.duplicate();
        assert_eq!(dup.position(), 1);
        assert_eq!(dup.mark_value(), Some(1));
        assert_eq!(dup.limit(), 4);

        dup.get().unwrap();
        dup.get().unwrap();
        assert_eq!(dup.position(), 3);
        assert_eq!(buf.position(), 1);

        // Writes are shared.
        dup.put_at(0, 100).unwrap();
        assert_eq!(buf.get_at(0).unwrap(), 100);
        assert!(buf.shares_storage_with(&dup));
    }

    #[test]
    fn clone_is_duplicate() {
        let buf = Buffer::wrap(vec![1, 2, 3]);
        let clone = buf.clone();

        assert!(buf.shares_storage_with(&clone));
        assert_eq!(buf, clone);
    }

    #[test]
    fn read_only_does_not_propagate_back() {
        let mut buf = Buffer::wrap(vec![1, 2]);
        let view = buf.as_read_only();

        assert!(view.is_read_only());
        assert!(!buf.is_read_only());

        buf.put(7).unwrap();
        assert_eq!(view.get_at(0).unwrap(), 7);

        // A duplicate of a read-only view stays read-only.
        assert!(view.duplicate().is_read_only());
    }

    #[test]
    fn compact_moves_remaining_to_front() {
        let mut buf = Buffer::wrap(vec![10, 11, 12, 13, 14]);
        buf.set_position(2).unwrap();
        buf.mark();

        buf.compact().unwrap();

        assert_eq!(buf.position(), 3);
        assert_eq!(buf.limit(), 5);
        assert_eq!(buf.mark_value(), None);

        buf.flip();
        assert_eq!(buf.to_vec(), vec![12, 13, 14]);
    }

    #[test]
    fn compact_at_position_zero_is_noop() {
        let mut buf = Buffer::wrap(vec![1, 2, 3]);
        buf.set_limit(2).unwrap();

        buf.compact().unwrap();

        assert_eq!(buf.position(), 2);
        assert_eq!(buf.limit(), 3);
        assert_eq!(buf.try_into_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn compact_when_drained() {
        let mut buf = Buffer::wrap(vec![1, 2, 3]);
        buf.set_position(3).unwrap();

        buf.compact().unwrap();

        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 3);
        assert_eq!(buf.remaining(), 3);
    }

    #[test]
    fn compact_matches_save_clear_restore() {
        let values: Vec<i32> = (0..8).collect();

        for position in 0..=8 {
            let mut compacted = Buffer::wrap(values.clone());
            compacted.set_position(position).unwrap();
            compacted.compact().unwrap();

            let mut expected = Buffer::wrap(values.clone());
            expected.set_position(position).unwrap();
            let saved = expected.to_vec();
            expected.clear();
            for value in saved {
                expected.put(value).unwrap();
            }

            assert_eq!(compacted.position(), expected.position());
            assert_eq!(compacted.limit(), expected.limit());
            assert_eq!(compacted.try_into_vec().unwrap(), expected.try_into_vec().unwrap());
        }
    }

    #[test]
    fn compact_stays_within_slice_window() {
        let mut buf = Buffer::wrap(vec![0, 1, 2, 3, 4, 5]);
        buf.set_position(2).unwrap();
        buf.set_limit(5).unwrap();

        let mut slice = buf.slice();
        slice.set_position(1).unwrap();
        slice.compact().unwrap();

        // Only the slice window [2, 5) of the storage is rewritten.
        buf.clear();
        assert_eq!(buf.to_vec(), vec![0, 1, 3, 4, 4, 5]);
        assert_eq!(slice.position(), 2);
        assert_eq!(slice.limit(), 3);
    }

    #[test]
    fn equality_ignores_consumed_elements() {
        let mut a = Buffer::wrap(vec![9, 1, 2, 3]);
        a.set_position(1).unwrap();
        let b = Buffer::wrap(vec![1, 2, 3]);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(a == [1, 2, 3][..]);
        assert!(b == &[1, 2, 3][..]);

        let c = Buffer::wrap(vec![1, 2]);
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Buffer::wrap(vec![1, 2, 3]);
        let b = Buffer::wrap(vec![1, 3]);
        let prefix = Buffer::wrap(vec![1, 2]);

        assert!(a < b);
        assert!(prefix < a);
        assert_eq!(a.cmp(&a.duplicate()), Ordering::Equal);
    }

    #[test]
    fn float_buffers_compare_nan_equal() {
        let a = Buffer::wrap(vec![f64::NAN, 0.0]);
        let b = Buffer::wrap(vec![f64::NAN, -0.0]);

        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn iter_does_not_move_position() {
        let mut buf = Buffer::wrap(vec![1, 2, 3, 4]);
        buf.set_position(1).unwrap();

        let forward: Vec<_> = buf.iter().collect();
        let backward: Vec<_> = buf.iter().rev().collect();

        assert_eq!(forward, vec![2, 3, 4]);
        assert_eq!(backward, vec![4, 3, 2]);
        assert_eq!(buf.iter().len(), 3);
        assert_eq!(buf.position(), 1);
    }

    #[test]
    fn try_into_vec_fails_while_shared() {
        let buf = Buffer::wrap(vec![1, 2, 3]);
        let slice = buf.slice();

        let buf = buf.try_into_vec().unwrap_err();
        assert_eq!(buf.capacity(), 3);

        drop(slice);
        assert_eq!(buf.try_into_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn try_into_vec_returns_elements_outside_window() {
        let mut buf = Buffer::wrap_range(vec![1, 2, 3, 4], 1, 2).unwrap();
        buf.put(20).unwrap();

        buf.clear();
        assert_eq!(buf.to_vec(), vec![20, 3]);
        assert_eq!(buf.try_into_vec().unwrap(), vec![1, 20, 3, 4]);
    }

    #[test]
    fn copied_from_slice_is_independent() {
        let source = [1_u8, 2, 3];
        let mut buf = Buffer::copied_from_slice(&source);

        buf.put(9).unwrap();
        assert_eq!(source, [1, 2, 3]);
        assert_eq!(buf.get_at(0).unwrap(), 9);
    }

    #[test]
    fn debug_shows_cursor() {
        let buf = Buffer::<u8>::allocate(3);
        let debug = format!("{buf:?}");

        assert!(debug.contains("position: 0"));
        assert!(debug.contains("capacity: 3"));
    }
}
