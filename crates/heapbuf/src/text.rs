// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Character buffers as text: construction from strings, rendering and subsequences.

use std::fmt::{self, Write};

use crate::cursor::{Cursor, check_from_index_size, check_from_to_index};
use crate::{Buffer, Error, Result};

impl Buffer<char> {
    /// Creates a read-only buffer holding the characters of `text`.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::copied_from_str("héllo");
    ///
    /// assert_eq!(buf.remaining(), 5);
    /// assert_eq!(buf.get_at(1)?, 'é');
    /// assert!(buf.put('x').is_err());
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    #[must_use]
    pub fn copied_from_str(text: &str) -> Self {
        let mut buf = Self::wrap(text.chars().collect());
        buf.read_only = true;
        buf
    }

    /// Writes the characters of `text` at the position and advances the position.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the buffer is read-only, otherwise
    /// [`Error::BufferOverflow`] if `text` has more characters than there is space remaining.
    /// Nothing is written on error.
    pub fn put_str(&mut self, text: &str) -> Result<&mut Self> {
        let chars: Vec<char> = text.chars().collect();
        self.put_slice(&chars)
    }

    /// Writes the characters `start..end` of `text` at the position and advances the position.
    ///
    /// `start` and `end` count characters, not bytes.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`] if the buffer is read-only, otherwise
    /// [`Error::IndexOutOfBounds`] if `start..end` is not a range within the characters of
    /// `text`, otherwise [`Error::BufferOverflow`] if the range has more characters than there is
    /// space remaining.
    pub fn put_str_range(&mut self, text: &str, start: usize, end: usize) -> Result<&mut Self> {
        self.ensure_mutable()?;

        let chars: Vec<char> = text.chars().collect();
        check_from_to_index(start, end, chars.len())?;

        self.put_from(&chars, start, end - start)
    }

    /// The character at `index` relative to the position.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] unless `index < remaining()`.
    pub fn char_at(&self, index: usize) -> Result<char> {
        check_from_index_size(index, 1, self.remaining())?;
        self.get_at(self.position() + index)
    }

    /// Creates a buffer over the characters `start..end` relative to the position.
    ///
    /// The new buffer shares storage, offset and capacity with this one. Its position is
    /// `position() + start`, its limit `position() + end` and it has no mark.
    ///
    /// ```
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::copied_from_str("hello, world");
    /// buf.set_position(7)?;
    ///
    /// let word = buf.sub_sequence(0, 3)?;
    ///
    /// assert_eq!(word.to_string(), "wor");
    /// assert_eq!(word.position(), 7);
    /// assert_eq!(word.capacity(), 12);
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] unless `start <= end <= remaining()`.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<Self> {
        check_from_to_index(start, end, self.remaining())?;

        let position = self.position();
        let cursor = Cursor::with_bounds(position + start, position + end, self.capacity())?;

        Ok(Self {
            storage: self.storage.clone(),
            offset: self.offset,
            cursor,
            read_only: self.read_only,
            order: self.order,
        })
    }
}

/// Renders the remaining characters. The position does not move.
impl fmt::Display for Buffer<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|c| f.write_char(c))
    }
}

/// Appends at the position, failing with [`fmt::Error`] when the text does not fit.
impl Write for Buffer<char> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.put_str(s).is_err() {
            return Err(fmt::Error);
        }

        Ok(())
    }
}
