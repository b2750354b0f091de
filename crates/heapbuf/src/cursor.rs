// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Error, Result};

/// The navigation state of one view: `position`, `limit`, `capacity` and an optional `mark`.
///
/// Every method upholds `mark <= position <= limit <= capacity` (with an unset mark counting
/// as no constraint). Indices are relative to the window of the owning view.
///
/// A cursor is never shared - duplicating a view copies its cursor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Cursor {
    position: usize,
    limit: usize,
    capacity: usize,
    mark: Option<usize>,
}

impl Cursor {
    /// A cursor over a full window: position 0, limit at capacity, no mark.
    pub(crate) const fn new(capacity: usize) -> Self {
        Self {
            position: 0,
            limit: capacity,
            capacity,
            mark: None,
        }
    }

    /// A cursor with an explicit position and limit over a window of `capacity` elements.
    pub(crate) fn with_bounds(position: usize, limit: usize, capacity: usize) -> Result<Self> {
        let mut cursor = Self::new(capacity);
        cursor.set_limit(limit)?;
        cursor.set_position(position)?;
        Ok(cursor)
    }

    pub(crate) const fn position(&self) -> usize {
        self.position
    }

    pub(crate) const fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) const fn mark_value(&self) -> Option<usize> {
        self.mark
    }

    pub(crate) const fn remaining(&self) -> usize {
        // Cannot wrap: position <= limit.
        self.limit.wrapping_sub(self.position)
    }

    pub(crate) const fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    pub(crate) fn set_position(&mut self, position: usize) -> Result<()> {
        check_from_index_size(position, 0, self.limit)?;

        if self.mark.is_some_and(|mark| mark > position) {
            self.mark = None;
        }

        self.position = position;
        Ok(())
    }

    pub(crate) fn set_limit(&mut self, limit: usize) -> Result<()> {
        check_from_index_size(limit, 0, self.capacity)?;

        if self.position > limit {
            self.position = limit;
        }

        if self.mark.is_some_and(|mark| mark > limit) {
            self.mark = None;
        }

        self.limit = limit;
        Ok(())
    }

    pub(crate) fn mark(&mut self) {
        self.mark = Some(self.position);
    }

    pub(crate) fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(Error::InvalidMark)?;
        self.position = mark;
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.position = 0;
        self.limit = self.capacity;
        self.mark = None;
    }

    pub(crate) fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
    }

    pub(crate) fn rewind(&mut self) {
        self.position = 0;
        self.mark = None;
    }

    /// Returns the current position if `count` elements can be read from it.
    pub(crate) fn ensure_readable(&self, count: usize) -> Result<usize> {
        let remaining = self.remaining();

        if count > remaining {
            return Err(Error::BufferUnderflow {
                requested: count,
                remaining,
            });
        }

        Ok(self.position)
    }

    /// Returns the current position if `count` elements can be written from it.
    pub(crate) fn ensure_writable(&self, count: usize) -> Result<usize> {
        let remaining = self.remaining();

        if count > remaining {
            return Err(Error::BufferOverflow {
                requested: count,
                remaining,
            });
        }

        Ok(self.position)
    }

    /// Moves the position forward by `count` elements.
    ///
    /// The caller must have validated the move via `ensure_readable()` or `ensure_writable()`.
    pub(crate) fn advance(&mut self, count: usize) {
        debug_assert!(count <= self.remaining(), "advance past limit");

        self.position = self.position.wrapping_add(count);
    }

    /// Validates `index..index + len` against the limit.
    pub(crate) fn check_range(&self, index: usize, len: usize) -> Result<()> {
        check_from_index_size(index, len, self.limit)
    }

    /// Validates a single absolute index against the limit.
    pub(crate) fn check_index(&self, index: usize) -> Result<usize> {
        self.check_range(index, 1)?;
        Ok(index)
    }

    /// Applies the post-compaction state: the `remaining` elements now start at index 0.
    pub(crate) fn compacted(&mut self, remaining: usize) {
        debug_assert!(remaining <= self.capacity);

        self.limit = self.capacity;
        self.position = remaining;
        self.mark = None;
    }
}

/// Validates that `index..index + len` lies within `0..bound`, without overflowing.
pub(crate) fn check_from_index_size(index: usize, len: usize, bound: usize) -> Result<()> {
    match index.checked_add(len) {
        Some(end) if end <= bound => Ok(()),
        _ => Err(Error::IndexOutOfBounds { index, len, bound }),
    }
}

/// Validates that `start..end` is a well-formed range within `0..bound`.
pub(crate) fn check_from_to_index(start: usize, end: usize, bound: usize) -> Result<()> {
    if start > end || end > bound {
        return Err(Error::IndexOutOfBounds {
            index: start,
            len: end.saturating_sub(start),
            bound,
        });
    }

    Ok(())
}
